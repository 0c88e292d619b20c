use std::collections::VecDeque;
use std::time::Instant;

use crate::files::FileSet;
use crate::workflow::Workflow;

pub const MAX_LOGS: usize = 1000;

/// Placeholder offered when `ollama list` yields nothing usable.
pub const NO_MODELS: &str = "No models found";

/* ---------- source selection ---------- */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceSelection {
    #[default]
    Code,
    Analysis,
    Both,
}

impl SourceSelection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "code" => Some(SourceSelection::Code),
            "analysis" => Some(SourceSelection::Analysis),
            "both" => Some(SourceSelection::Both),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceSelection::Code => "code",
            SourceSelection::Analysis => "analysis",
            SourceSelection::Both => "both",
        }
    }
}

/* ---------- logging ---------- */

#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

#[derive(Clone, Debug)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
    pub at: Instant,
}

/* ---------- tabs ---------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Setup,
    Scenarios,
    Automation,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Setup => "1 Files & Model",
            Tab::Scenarios => "2 Test Scenarios",
            Tab::Automation => "3 Automation Code",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Setup => 0,
            Tab::Scenarios => 1,
            Tab::Automation => 2,
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::Setup => Tab::Scenarios,
            Tab::Scenarios => Tab::Automation,
            Tab::Automation => Tab::Setup,
        }
    }
}

/* ---------- ui state ---------- */

pub struct UiState {
    pub input: String,
    pub execution_pending: bool,
    pub should_exit: bool,

    pub history: Vec<String>,
    pub history_index: Option<usize>,
    pub hint: Option<String>,
    pub autocomplete: Option<String>,

    pub tab: Tab,
    pub body_scroll: usize,
    pub log_scroll: usize,
    /// Clamped maxima from the last render; scrolling keys use them to stay
    /// inside the pane.
    pub body_max_scroll: usize,
    pub log_max_scroll: usize,

    pub status: Option<String>,
    pub spinner_started_at: Option<Instant>,

    /// Set by `/edit`; the main loop suspends the terminal and runs $EDITOR.
    pub edit_requested: bool,
}

/* ---------- app state ---------- */

pub struct AppState {
    pub ui: UiState,
    pub logs: VecDeque<LogLine>,

    pub models: Vec<String>,
    pub model: String,
    pub automation_model: String,

    pub test_name: String,
    pub source: SourceSelection,
    pub files: FileSet,

    pub scenarios: String,
    pub automation_code: String,

    pub scenario_flow: Workflow,
    pub automation_flow: Workflow,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            ui: UiState {
                input: String::new(),
                execution_pending: false,
                should_exit: false,
                history: Vec::new(),
                history_index: None,
                hint: None,
                autocomplete: None,
                tab: Tab::Setup,
                body_scroll: usize::MAX,
                log_scroll: usize::MAX,
                body_max_scroll: 0,
                log_max_scroll: 0,
                status: None,
                spinner_started_at: None,
                edit_requested: false,
            },
            logs: VecDeque::new(),
            models: Vec::new(),
            model: String::new(),
            automation_model: String::new(),
            test_name: String::new(),
            source: SourceSelection::default(),
            files: FileSet::new(),
            scenarios: String::new(),
            automation_code: String::new(),
            scenario_flow: Workflow::new(),
            automation_flow: Workflow::new(),
        }
    }

    /// True while either workflow has an inference in flight. Both generation
    /// commands refuse to start while this holds, so at most one model call
    /// runs process-wide.
    pub fn generation_running(&self) -> bool {
        self.scenario_flow.is_running() || self.automation_flow.is_running()
    }

    /// True when the model selector holds something other than the fallback
    /// placeholder.
    pub fn models_available(&self) -> bool {
        !self.models.is_empty() && !(self.models.len() == 1 && self.models[0] == NO_MODELS)
    }

    pub fn push_char(&mut self, c: char) {
        self.ui.input.push(c);
        self.ui.history_index = None;
    }

    pub fn backspace(&mut self) {
        self.ui.input.pop();
    }

    pub fn history_prev(&mut self) {
        if self.ui.history.is_empty() {
            return;
        }

        let idx = match self.ui.history_index {
            Some(i) if i > 0 => i - 1,
            Some(i) => i,
            None => self.ui.history.len() - 1,
        };

        self.ui.history_index = Some(idx);
        self.ui.input = self.ui.history[idx].clone();
    }

    pub fn history_next(&mut self) {
        match self.ui.history_index {
            Some(i) if i + 1 < self.ui.history.len() => {
                self.ui.history_index = Some(i + 1);
                self.ui.input = self.ui.history[i + 1].clone();
            }
            _ => {
                self.ui.history_index = None;
                self.ui.input.clear();
            }
        }
    }

    pub fn commit_input(&mut self) -> String {
        let cmd = self.ui.input.trim().to_string();

        if !cmd.is_empty() {
            self.ui.history.push(cmd.clone());
        }

        self.ui.input.clear();
        self.ui.history_index = None;
        self.ui.hint = None;
        self.ui.autocomplete = None;

        cmd
    }

    pub fn set_hint(&mut self, hint: impl Into<String>) {
        self.ui.hint = Some(hint.into());
    }

    pub fn clear_hint(&mut self) {
        self.ui.hint = None;
    }

    pub fn clear_autocomplete(&mut self) {
        self.ui.autocomplete = None;
    }
}
