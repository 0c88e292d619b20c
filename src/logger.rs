use std::time::Instant;

use crate::state::{AppState, LogLevel, LogLine, MAX_LOGS};

pub fn log(state: &mut AppState, level: LogLevel, msg: impl Into<String>) {
    if state.logs.len() >= MAX_LOGS {
        state.logs.pop_front();
    }

    state.logs.push_back(LogLine {
        level,
        text: msg.into(),
        at: Instant::now(),
    });
}

/// Status messages land both in the log pane and in the status line.
pub fn log_status(state: &mut AppState, msg: impl Into<String>) {
    let msg = msg.into();
    state.ui.status = Some(msg.clone());
    log(state, LogLevel::Info, msg);
}
