//! Generation workflow lifecycle.
//!
//! Each of the two pipelines (scenario generation, automation generation) owns
//! one `Workflow`. `begin` is the only way into `Running`; it is guarded, so a
//! second invocation cannot start while one is in flight. The worker thread
//! performs exactly one blocking model call and hands its result back over an
//! mpsc channel; the main loop is the only mutator of shared state.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Instant;

use chrono::Local;

use crate::llm::ollama::InvokeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowKind {
    Scenarios,
    Automation,
}

impl WorkflowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowKind::Scenarios => "test scenarios",
            WorkflowKind::Automation => "automation code",
        }
    }
}

pub enum WorkflowEvent {
    Finished {
        kind: WorkflowKind,
        result: Result<String, InvokeError>,
        started: String,
    },
}

#[derive(Debug)]
pub struct Workflow {
    pub phase: Phase,
    pub started_at: Option<Instant>,
    pub started_label: Option<String>,
}

impl Workflow {
    pub fn new() -> Self {
        Workflow {
            phase: Phase::Idle,
            started_at: None,
            started_label: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Guarded transition into `Running`. Records the start instant and a
    /// clock label for the status line. Returns false when already running.
    pub fn begin(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.phase = Phase::Running;
        self.started_at = Some(Instant::now());
        self.started_label = Some(Local::now().format("%H:%M").to_string());
        true
    }

    pub fn finish(&mut self) {
        self.phase = Phase::Completed;
        self.started_at = None;
    }
}

/// Fire-and-forget: runs `job` on a fresh thread and reports completion over
/// `tx`. All outcomes, including launch failures, travel the same event path;
/// the receiver decides how to surface them.
pub fn spawn_generation<F>(kind: WorkflowKind, started: String, job: F, tx: Sender<WorkflowEvent>)
where
    F: FnOnce() -> Result<String, InvokeError> + Send + 'static,
{
    thread::spawn(move || {
        let result = job();
        let _ = tx.send(WorkflowEvent::Finished {
            kind,
            result,
            started,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn begin_is_rejected_while_running() {
        let mut flow = Workflow::new();
        assert!(flow.begin());
        assert!(flow.is_running());
        assert!(!flow.begin());
    }

    #[test]
    fn finish_allows_a_new_begin() {
        let mut flow = Workflow::new();
        assert!(flow.begin());
        flow.finish();
        assert_eq!(flow.phase, Phase::Completed);
        assert!(flow.begin());
    }

    #[test]
    fn begin_records_a_clock_label() {
        let mut flow = Workflow::new();
        flow.begin();
        let label = flow.started_label.as_deref().unwrap();
        // HH:MM
        assert_eq!(label.len(), 5);
        assert_eq!(label.as_bytes()[2], b':');
    }

    #[test]
    fn spawn_generation_delivers_success_over_the_channel() {
        let (tx, rx) = mpsc::channel();
        spawn_generation(
            WorkflowKind::Scenarios,
            "09:00".into(),
            || Ok("1. Test happy path".to_string()),
            tx,
        );

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkflowEvent::Finished {
                kind,
                result,
                started,
            } => {
                assert_eq!(kind, WorkflowKind::Scenarios);
                assert_eq!(result.unwrap(), "1. Test happy path");
                assert_eq!(started, "09:00");
            }
        }
    }

    #[test]
    fn spawn_generation_delivers_failure_over_the_same_path() {
        let (tx, rx) = mpsc::channel();
        spawn_generation(
            WorkflowKind::Automation,
            "09:00".into(),
            || Err(InvokeError::Spawn("no such file".into())),
            tx,
        );

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkflowEvent::Finished { kind, result, .. } => {
                assert_eq!(kind, WorkflowKind::Automation);
                assert!(matches!(result, Err(InvokeError::Spawn(_))));
            }
        }
    }
}
