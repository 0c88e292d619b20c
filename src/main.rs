mod commands;
mod config;
mod files;
mod llm;
mod logger;
mod output;
mod state;
mod ui;
mod workflow;

use std::{
    error::Error,
    fs, io,
    process::Command,
    sync::mpsc,
    time::Duration,
};

use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::{
    llm::ollama::OllamaClient,
    logger::{log, log_status},
    state::{AppState, LogLevel, Tab},
    ui::{main_ui::handle_event, tui::draw_ui},
    workflow::{WorkflowEvent, WorkflowKind},
};

#[derive(Parser)]
#[command(
    name = "scengen",
    version,
    about = "Terminal UI that turns source files into test scenarios and Playwright automation code using local Ollama models."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Print the locally installed Ollama models and exit
    Models,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let cfg = config::load();

    if let Some(CliCommand::Models) = cli.command {
        let client = OllamaClient::new(cfg.binary);
        for model in client.list_models() {
            println!("{}", model);
        }
        return Ok(());
    }

    run_tui(cfg)
}

fn run_tui(cfg: config::Config) -> Result<(), Box<dyn Error>> {
    setup_terminal()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let client = OllamaClient::new(cfg.binary.clone());
    let mut state = init_state(&cfg, &client);

    let (job_tx, job_rx) = mpsc::channel::<WorkflowEvent>();

    loop {
        draw_ui(&mut terminal, &mut state)?;

        if event::poll(Duration::from_millis(120))? {
            let ev = event::read()?;
            handle_event(&mut state, ev);
        }

        if state.ui.should_exit {
            break;
        }

        loop {
            match job_rx.try_recv() {
                Ok(event) => handle_workflow_event(&mut state, event),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }

        if state.ui.edit_requested {
            state.ui.edit_requested = false;
            if let Err(e) = edit_in_editor(&mut terminal, &mut state) {
                log(&mut state, LogLevel::Error, format!("Editor failed: {}", e));
            }
        }

        if state.ui.execution_pending {
            state.ui.execution_pending = false;

            let raw = state.commit_input();
            let text = raw.trim();

            if text.is_empty() {
                continue;
            }

            if text.starts_with('/') {
                commands::handle_command(&mut state, &client, &job_tx, text);
            } else {
                log(
                    &mut state,
                    LogLevel::Warn,
                    "Commands start with / (try /help)",
                );
            }
        }

        if !state.ui.execution_pending {
            commands::update_command_hints(&mut state);
        }
    }

    teardown_terminal(&mut terminal)?;
    Ok(())
}

fn handle_workflow_event(state: &mut AppState, event: WorkflowEvent) {
    let WorkflowEvent::Finished {
        kind,
        result,
        started,
    } = event;

    let ended = Local::now().format("%H:%M").to_string();
    state.ui.spinner_started_at = None;
    let elapsed = match kind {
        WorkflowKind::Scenarios => state.scenario_flow.started_at,
        WorkflowKind::Automation => state.automation_flow.started_at,
    }
    .map(|t| t.elapsed().as_secs());
    match kind {
        WorkflowKind::Scenarios => state.scenario_flow.finish(),
        WorkflowKind::Automation => state.automation_flow.finish(),
    }

    match result {
        Ok(text) => {
            match kind {
                WorkflowKind::Scenarios => {
                    state.scenarios = text;
                    state.ui.tab = Tab::Scenarios;
                }
                WorkflowKind::Automation => {
                    state.automation_code = text;
                    state.ui.tab = Tab::Automation;
                }
            }
            state.ui.body_scroll = usize::MAX;

            let label = match kind {
                WorkflowKind::Scenarios => "Test scenarios generated.",
                WorkflowKind::Automation => "Automation code generated.",
            };
            log_status(state, format!("{} → {} {}", started, ended, label));
            let took = elapsed.map(|s| format!(" in {}s", s)).unwrap_or_default();
            log(
                state,
                LogLevel::Success,
                format!("Finished generating {}{}.", kind.as_str(), took),
            );
        }
        Err(e) => {
            // tagged failure: distinct status, but the reason still lands in
            // the output pane so nothing is silently swallowed
            let reason = e.to_string();
            match kind {
                WorkflowKind::Scenarios => {
                    state.scenarios = format!("call failed: {}", reason);
                    state.ui.tab = Tab::Scenarios;
                }
                WorkflowKind::Automation => {
                    state.automation_code = format!("call failed: {}", reason);
                    state.ui.tab = Tab::Automation;
                }
            }
            state.ui.body_scroll = usize::MAX;
            state.ui.status = Some(format!("{} → {} call failed.", started, ended));
            log(state, LogLevel::Error, format!("call failed: {}", reason));
        }
    }
}

fn init_state(cfg: &config::Config, client: &OllamaClient) -> AppState {
    let mut state = AppState::new();

    state.models = client.list_models();
    state.model = cfg
        .default_model
        .clone()
        .filter(|m| state.models.iter().any(|have| have == m))
        .or_else(|| state.models.first().cloned())
        .unwrap_or_default();
    state.source = cfg.default_source;
    state.test_name = cfg.default_test_name.clone();

    log(
        &mut state,
        LogLevel::Info,
        format!("scengen {} — /help for commands", env!("CARGO_PKG_VERSION")),
    );
    if state.models_available() {
        let msg = format!(
            "{} model(s) installed, using {}",
            state.models.len(),
            state.model
        );
        log(&mut state, LogLevel::Info, msg);
    } else {
        log(
            &mut state,
            LogLevel::Warn,
            "No installed models found. Is ollama on PATH?",
        );
    }

    state
}

/// Suspends the TUI, opens the current tab's generated text in `$EDITOR`
/// via a temp file, and reads the result back.
fn edit_in_editor(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
) -> Result<(), Box<dyn Error>> {
    let text = match state.ui.tab {
        Tab::Scenarios => state.scenarios.clone(),
        Tab::Automation => state.automation_code.clone(),
        Tab::Setup => return Ok(()),
    };

    let path = std::env::temp_dir().join(format!("scengen_edit_{}.txt", std::process::id()));
    fs::write(&path, &text)?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".into());
    let status = Command::new("sh")
        .arg("-lc")
        .arg(format!("{} '{}'", editor, path.display()))
        .status();

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen, EnableMouseCapture)?;
    terminal.clear()?;

    match status {
        Ok(s) if s.success() => {
            let edited = fs::read_to_string(&path)?;
            match state.ui.tab {
                Tab::Scenarios => state.scenarios = edited,
                Tab::Automation => state.automation_code = edited,
                Tab::Setup => {}
            }
            log(state, LogLevel::Success, "Edit applied.");
        }
        Ok(s) => {
            log(
                state,
                LogLevel::Warn,
                format!("Editor exited with status {}; text unchanged.", s),
            );
        }
        Err(e) => {
            log(state, LogLevel::Error, format!("Editor failed: {}", e));
        }
    }

    let _ = fs::remove_file(path);
    Ok(())
}


fn setup_terminal() -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(())
}

fn teardown_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
