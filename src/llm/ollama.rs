//! Subprocess bindings for the local Ollama binary.
//!
//! `list_models` shells out to `ollama list` and never fails: any problem
//! collapses into the `NO_MODELS` sentinel. `invoke` shells out to
//! `ollama run <model>` with the prompt on stdin and returns a tagged error
//! instead of passing failure text off as model output.

use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::state::NO_MODELS;

#[derive(Debug)]
pub enum InvokeError {
    /// The binary could not be launched at all.
    Spawn(String),
    /// The process started but its stdin could not be fed.
    Stdin(String),
    /// The process exited non-zero; carries what it wrote to stderr.
    ModelFailed { code: i32, stderr: String },
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::Spawn(e) => write!(f, "could not launch model runner: {}", e),
            InvokeError::Stdin(e) => write!(f, "could not send prompt to model runner: {}", e),
            InvokeError::ModelFailed { code, stderr } => {
                write!(f, "model runner exited with status {}: {}", code, stderr)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct OllamaClient {
    binary: String,
}

impl OllamaClient {
    pub fn new(binary: impl Into<String>) -> Self {
        OllamaClient {
            binary: binary.into(),
        }
    }

    /// Enumerates installed models. The first output line is the table
    /// header; each following non-blank line contributes its first
    /// whitespace-delimited token. Every failure mode degrades to the
    /// single-element sentinel list.
    pub fn list_models(&self) -> Vec<String> {
        let output = match Command::new(&self.binary).arg("list").output() {
            Ok(out) if out.status.success() => out,
            _ => return vec![NO_MODELS.to_string()],
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let models: Vec<String> = stdout
            .trim()
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect();

        if models.is_empty() {
            vec![NO_MODELS.to_string()]
        } else {
            models
        }
    }

    /// Runs one blocking inference. The prompt goes to the child's stdin as
    /// UTF-8; on exit 0 the trimmed stdout is the result.
    pub fn invoke(&self, model: &str, prompt: &str) -> Result<String, InvokeError> {
        let mut child = Command::new(&self.binary)
            .arg("run")
            .arg(model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| InvokeError::Spawn(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .map_err(|e| InvokeError::Stdin(e.to_string()))?;
            // dropped here, closing the pipe so the child sees EOF
        }

        let output = child
            .wait_with_output()
            .map_err(|e| InvokeError::Spawn(e.to_string()))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(InvokeError::ModelFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
