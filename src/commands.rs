//! Command interpretation layer.
//!
//! Responsibilities:
//! - Parse and validate slash commands from the input line
//! - Translate commands into explicit state mutations
//! - Launch generation workflows (guarded) and emit informational logs
//!
//! Non-responsibilities:
//! - Running the model call itself (workflow worker thread)
//! - UI rendering logic

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::Instant;

use crate::files;
use crate::llm::ollama::OllamaClient;
use crate::llm::prompt::{self, PromptTarget};
use crate::logger::{log, log_status};
use crate::output;
use crate::state::{AppState, LogLevel, SourceSelection, Tab};
use crate::workflow::{self, WorkflowEvent, WorkflowKind};

const COMMANDS: &[(&str, &str)] = &[
    ("/help", "list available commands"),
    ("/models", "re-read installed models from ollama"),
    ("/model <name>", "select the scenario model"),
    ("/autmodel <name>", "select the automation model"),
    ("/name <test name>", "set the test name used in output files"),
    ("/source code|analysis|both", "declare what the input files are"),
    ("/add <path or glob>", "add source files"),
    ("/remove <n> [m ...]", "remove files by their listed numbers"),
    ("/files", "list added files"),
    ("/generate", "generate test scenarios"),
    ("/automation", "generate Playwright automation code"),
    ("/edit", "open the current tab's text in $EDITOR"),
    ("/save", "save the current tab's text to a dated file"),
    ("/quit", "exit"),
];

pub fn handle_command(
    state: &mut AppState,
    client: &OllamaClient,
    tx: &Sender<WorkflowEvent>,
    cmd: &str,
) {
    state.clear_hint();
    state.clear_autocomplete();

    let cmd = cmd.strip_prefix('/').unwrap_or(cmd);

    match cmd {
        "help" => help(state),
        "models" => refresh_models(state, client),
        "files" => list_files(state),
        "generate" => generate_scenarios(state, client, tx),
        "automation" => generate_automation(state, client, tx),
        "edit" => request_edit(state),
        "save" => save_current_tab(state),
        "quit" | "exit" => state.ui.should_exit = true,

        cmd if cmd.starts_with("model ") => set_model(state, cmd["model ".len()..].trim()),
        cmd if cmd.starts_with("autmodel ") => {
            set_automation_model(state, cmd["autmodel ".len()..].trim())
        }
        cmd if cmd.starts_with("name ") => set_test_name(state, &cmd["name ".len()..]),
        cmd if cmd.starts_with("source ") => set_source(state, cmd["source ".len()..].trim()),
        cmd if cmd.starts_with("add ") => add_files(state, cmd["add ".len()..].trim()),
        cmd if cmd.starts_with("remove ") => remove_files(state, cmd["remove ".len()..].trim()),

        _ => {
            log(
                state,
                LogLevel::Warn,
                format!("Unknown command: /{} (try /help)", cmd),
            );
        }
    }
}

/* ============================================================
   Session setters
   ============================================================ */

fn help(state: &mut AppState) {
    for (usage, desc) in COMMANDS {
        log(state, LogLevel::Info, format!("{:28} {}", usage, desc));
    }
}

fn refresh_models(state: &mut AppState, client: &OllamaClient) {
    state.models = client.list_models();
    for m in state.models.clone() {
        log(state, LogLevel::Info, format!("  {}", m));
    }
    if !state.models_available() {
        log(
            state,
            LogLevel::Warn,
            "No installed models found. Is ollama on PATH?",
        );
    }
}

fn set_model(state: &mut AppState, name: &str) {
    if name.is_empty() {
        log(state, LogLevel::Warn, "Usage: /model <name>");
        return;
    }
    if !state.models.iter().any(|m| m.as_str() == name) {
        log(
            state,
            LogLevel::Warn,
            format!("{} is not in the installed list (keeping it anyway)", name),
        );
    }
    state.model = name.to_string();
    log(state, LogLevel::Success, format!("Scenario model: {}", name));
}

fn set_automation_model(state: &mut AppState, name: &str) {
    if name.is_empty() {
        log(state, LogLevel::Warn, "Usage: /autmodel <name>");
        return;
    }
    state.automation_model = name.to_string();
    log(
        state,
        LogLevel::Success,
        format!("Automation model: {}", name),
    );
}

fn set_test_name(state: &mut AppState, name: &str) {
    state.test_name = name.trim().to_string();
    let file_stem = output::sanitize_test_name(&state.test_name);
    log(
        state,
        LogLevel::Success,
        format!("Test name set (output files will use \"{}\")", file_stem),
    );
}

fn set_source(state: &mut AppState, value: &str) {
    match SourceSelection::parse(value) {
        Some(selection) => {
            state.source = selection;
            log(
                state,
                LogLevel::Success,
                format!("Source type: {}", selection.as_str()),
            );
            if selection == SourceSelection::Analysis {
                log(
                    state,
                    LogLevel::Info,
                    "Automation generation is unavailable for analysis-only input.",
                );
            }
        }
        None => {
            log(state, LogLevel::Warn, "Usage: /source code|analysis|both");
        }
    }
}

/* ============================================================
   File list
   ============================================================ */

fn add_files(state: &mut AppState, pattern: &str) {
    if pattern.is_empty() {
        log(state, LogLevel::Warn, "Usage: /add <path or glob>");
        return;
    }

    let entries = match glob::glob(pattern) {
        Ok(paths) => paths.filter_map(Result::ok).collect::<Vec<PathBuf>>(),
        Err(e) => {
            log(state, LogLevel::Warn, format!("Bad pattern: {}", e));
            return;
        }
    };

    if entries.is_empty() {
        log(
            state,
            LogLevel::Warn,
            format!("No files match {}", pattern),
        );
        return;
    }

    let mut added = 0;
    let mut skipped = 0;
    for path in entries {
        if path.is_dir() {
            continue;
        }
        if state.files.add(path) {
            added += 1;
        } else {
            skipped += 1;
        }
    }

    let mut msg = format!("Added {} file(s)", added);
    if skipped > 0 {
        msg.push_str(&format!(", {} duplicate(s) skipped", skipped));
    }
    log(state, LogLevel::Success, msg);
}

fn remove_files(state: &mut AppState, args: &str) {
    let mut indices = Vec::new();
    for token in args.split_whitespace() {
        match token.parse::<usize>() {
            // displayed numbering is 1-based
            Ok(n) if n >= 1 => indices.push(n - 1),
            _ => {
                log(
                    state,
                    LogLevel::Warn,
                    format!("Not a file number: {}", token),
                );
                return;
            }
        }
    }

    if indices.is_empty() {
        log(state, LogLevel::Warn, "Usage: /remove <n> [m ...]");
        return;
    }

    let removed = state.files.remove_indices(&indices);
    log(state, LogLevel::Success, format!("Removed {} file(s)", removed));
}

fn list_files(state: &mut AppState) {
    if state.files.is_empty() {
        log(state, LogLevel::Info, "No files added yet (/add <path>)");
        return;
    }
    let listing: Vec<String> = state
        .files
        .paths()
        .iter()
        .enumerate()
        .map(|(i, path)| format!("{:3}. {}", i + 1, path.display()))
        .collect();
    for line in listing {
        log(state, LogLevel::Info, line);
    }
}

/* ============================================================
   Generation workflows
   ============================================================ */

fn generate_scenarios(state: &mut AppState, client: &OllamaClient, tx: &Sender<WorkflowEvent>) {
    if state.generation_running() {
        log(
            state,
            LogLevel::Warn,
            "A generation is already running; wait for it to finish.",
        );
        return;
    }
    if !state.models_available() || state.model.is_empty() {
        log(
            state,
            LogLevel::Warn,
            "No model selected. Install one with `ollama pull` and run /models.",
        );
        return;
    }

    let prompt = prompt::build_prompt(state.source, PromptTarget::Scenarios);
    let contents = files::aggregate(state.files.paths());
    let request = prompt::compose_scenario_request(&prompt, &contents);

    if !state.scenario_flow.begin() {
        return;
    }
    let started = state.scenario_flow.started_label.clone().unwrap_or_default();
    state.ui.spinner_started_at = Some(Instant::now());
    log_status(
        state,
        format!("{} ⏳ Generating test scenarios...", started),
    );

    let client = client.clone();
    let model = state.model.clone();
    workflow::spawn_generation(
        WorkflowKind::Scenarios,
        started,
        move || client.invoke(&model, &request),
        tx.clone(),
    );
}

fn generate_automation(state: &mut AppState, client: &OllamaClient, tx: &Sender<WorkflowEvent>) {
    // precondition, checked before any process launch
    if state.source == SourceSelection::Analysis {
        log(
            state,
            LogLevel::Warn,
            "Automation code cannot be generated from analysis documentation only. \
             Please include source code files as well.",
        );
        return;
    }
    if state.generation_running() {
        log(
            state,
            LogLevel::Warn,
            "A generation is already running; wait for it to finish.",
        );
        return;
    }
    if !state.models_available() {
        log(
            state,
            LogLevel::Warn,
            "No model selected. Install one with `ollama pull` and run /models.",
        );
        return;
    }

    let prompt = prompt::build_prompt(state.source, PromptTarget::Automation);
    let contents = files::aggregate(state.files.paths());
    let request = prompt::compose_automation_request(&prompt, &state.scenarios, &contents);

    if !state.automation_flow.begin() {
        return;
    }
    let started = state
        .automation_flow
        .started_label
        .clone()
        .unwrap_or_default();
    state.ui.spinner_started_at = Some(Instant::now());
    log_status(
        state,
        format!("{} ⏳ Generating automation code...", started),
    );

    let client = client.clone();
    let model = if state.automation_model.is_empty() {
        state.model.clone()
    } else {
        state.automation_model.clone()
    };
    workflow::spawn_generation(
        WorkflowKind::Automation,
        started,
        move || client.invoke(&model, &request),
        tx.clone(),
    );
}

/* ============================================================
   Save / edit
   ============================================================ */

fn request_edit(state: &mut AppState) {
    let has_text = match state.ui.tab {
        Tab::Scenarios => !state.scenarios.is_empty(),
        Tab::Automation => !state.automation_code.is_empty(),
        Tab::Setup => false,
    };

    if !has_text {
        log(
            state,
            LogLevel::Warn,
            "Nothing to edit on this tab; generate something first.",
        );
        return;
    }
    state.ui.edit_requested = true;
}

fn save_current_tab(state: &mut AppState) {
    match state.ui.tab {
        Tab::Setup => {
            log(
                state,
                LogLevel::Warn,
                "Switch to the scenarios or automation tab to save its text.",
            );
        }
        Tab::Scenarios => {
            if state.scenarios.trim().is_empty() {
                log(state, LogLevel::Warn, "No scenarios to save yet.");
                return;
            }
            let path = output::scenario_path(&state.test_name);
            match output::save_text(&path, state.scenarios.trim()) {
                Ok(()) => {
                    log(
                        state,
                        LogLevel::Success,
                        format!("Saved {}", path.display()),
                    );
                    // mirror of the original save-and-continue flow
                    state.ui.tab = Tab::Automation;
                    state.ui.body_scroll = usize::MAX;
                }
                Err(e) => log(state, LogLevel::Error, e),
            }
        }
        Tab::Automation => {
            if state.automation_code.trim().is_empty() {
                log(state, LogLevel::Warn, "No automation code to save yet.");
                return;
            }
            let path = output::automation_path(&state.test_name);
            match output::save_text(&path, &state.automation_code) {
                Ok(()) => log(
                    state,
                    LogLevel::Success,
                    format!("Saved {}", path.display()),
                ),
                Err(e) => log(state, LogLevel::Error, e),
            }
        }
    }
}

/* ============================================================
   Hints
   ============================================================ */

pub fn update_command_hints(state: &mut AppState) {
    let input = state.ui.input.trim().to_string();
    if !input.starts_with('/') || input.len() < 2 {
        state.ui.hint = None;
        state.ui.autocomplete = None;
        return;
    }

    let matched = COMMANDS.iter().find(|(usage, _)| {
        usage
            .split_whitespace()
            .next()
            .unwrap_or("")
            .starts_with(input.as_str())
    });

    match matched {
        Some((usage, desc)) => {
            let word = usage.split_whitespace().next().unwrap_or("");
            state.ui.autocomplete = Some(word.to_string());
            state.set_hint(format!("{} — {}", usage, desc));
        }
        None => {
            state.ui.hint = None;
            state.ui.autocomplete = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::mpsc;

    fn harness() -> (AppState, OllamaClient, Sender<WorkflowEvent>) {
        let (tx, rx) = mpsc::channel();
        std::mem::forget(rx); // keep the channel open for the whole test
        let state = AppState::new();
        (state, OllamaClient::new("/nonexistent/scengen/ollama"), tx)
    }

    fn has_warning(state: &AppState, needle: &str) -> bool {
        state
            .logs
            .iter()
            .any(|l| matches!(l.level, LogLevel::Warn) && l.text.contains(needle))
    }

    #[test]
    fn source_command_switches_selection() {
        let (mut state, client, tx) = harness();

        handle_command(&mut state, &client, &tx, "/source both");
        assert_eq!(state.source, SourceSelection::Both);

        handle_command(&mut state, &client, &tx, "/source nonsense");
        assert_eq!(state.source, SourceSelection::Both);
        assert!(has_warning(&state, "Usage: /source"));
    }

    #[test]
    fn add_command_dedups_and_remove_is_one_based() {
        let (mut state, client, tx) = harness();

        let dir = std::env::temp_dir().join(format!("scengen_cmd_test_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let a = dir.join("a.rs");
        let b = dir.join("b.rs");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();

        handle_command(&mut state, &client, &tx, &format!("/add {}", a.display()));
        handle_command(&mut state, &client, &tx, &format!("/add {}", a.display()));
        handle_command(&mut state, &client, &tx, &format!("/add {}", b.display()));
        assert_eq!(state.files.len(), 2);

        handle_command(&mut state, &client, &tx, "/remove 1");
        assert_eq!(state.files.paths(), &[b.clone()]);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn add_command_expands_globs() {
        let (mut state, client, tx) = harness();

        let dir = std::env::temp_dir().join(format!("scengen_glob_test_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("x.ts"), "x").unwrap();
        fs::write(dir.join("y.ts"), "y").unwrap();
        fs::write(dir.join("z.css"), "z").unwrap();

        handle_command(
            &mut state,
            &client,
            &tx,
            &format!("/add {}/*.ts", dir.display()),
        );
        assert_eq!(state.files.len(), 2);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn automation_with_analysis_selection_is_rejected_before_launch() {
        let (mut state, client, tx) = harness();
        state.models = vec!["llama3:latest".into()];
        state.model = "llama3:latest".into();
        state.source = SourceSelection::Analysis;

        handle_command(&mut state, &client, &tx, "/automation");

        assert!(has_warning(&state, "analysis documentation only"));
        assert!(!state.automation_flow.is_running());
        assert!(state.ui.spinner_started_at.is_none());
    }

    #[test]
    fn generate_refuses_without_installed_models() {
        let (mut state, client, tx) = harness();
        state.models = vec![crate::state::NO_MODELS.into()];
        state.model = crate::state::NO_MODELS.into();

        handle_command(&mut state, &client, &tx, "/generate");

        assert!(has_warning(&state, "No model selected"));
        assert!(!state.scenario_flow.is_running());
    }

    #[test]
    fn generate_refuses_while_a_generation_runs() {
        let (mut state, client, tx) = harness();
        state.models = vec!["llama3:latest".into()];
        state.model = "llama3:latest".into();
        state.automation_flow.begin();

        handle_command(&mut state, &client, &tx, "/generate");

        assert!(has_warning(&state, "already running"));
        assert!(!state.scenario_flow.is_running());
    }

    #[test]
    fn save_on_setup_tab_only_hints() {
        let (mut state, client, tx) = harness();
        state.scenarios = "1. Test happy path".into();

        handle_command(&mut state, &client, &tx, "/save");
        assert!(has_warning(&state, "Switch to the scenarios"));
    }

    #[test]
    fn hints_follow_partial_commands() {
        let (mut state, _client, _tx) = harness();

        state.ui.input = "/so".into();
        update_command_hints(&mut state);
        assert_eq!(state.ui.autocomplete.as_deref(), Some("/source"));

        state.ui.input = "hello".into();
        update_command_hints(&mut state);
        assert!(state.ui.autocomplete.is_none());
    }
}
