//! External-process recognizer
//!
//! Runs a configured NER program once per call. The program receives the
//! plain text on stdin and must print a JSON array on stdout:
//!
//! ```json
//! [{"text": "Jane Doe", "label": "PERSON"}, {"text": "Oslo", "label": "GPE"}]
//! ```
//!
//! Any `{model}` in the configured arguments is replaced with the model
//! identifier. A non-zero exit status, or output that is not such an array,
//! fails the call.

use super::EntityRecognizer;
use crate::domain::{EntityDetection, RecognizerError};
use std::io::Write;
use std::process::{Command, Stdio};

const MODEL_TOKEN: &str = "{model}";

/// Recognizer backed by an external program
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    model: String,
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// Create an adapter without checking that the model is available
    pub fn new(model: impl Into<String>, program: impl Into<String>, args: &[String]) -> Self {
        let model = model.into();
        let args = args
            .iter()
            .map(|arg| arg.replace(MODEL_TOKEN, &model))
            .collect();
        Self {
            model,
            program: program.into(),
            args,
        }
    }

    /// Create an adapter and probe it with empty input
    ///
    /// A program that cannot load the requested model is expected to exit
    /// with a non-zero status, which turns into [`RecognizerError::ModelLoad`].
    pub fn load(model: &str, program: &str, args: &[String]) -> Result<Self, RecognizerError> {
        let recognizer = Self::new(model, program, args);
        recognizer.run("").map_err(|e| match e {
            RecognizerError::Spawn { .. } => e,
            other => RecognizerError::ModelLoad {
                model: model.to_string(),
                reason: other.to_string(),
            },
        })?;
        Ok(recognizer)
    }

    fn run(&self, text: &str) -> Result<Vec<EntityDetection>, RecognizerError> {
        tracing::debug!(program = %self.program, args = ?self.args, "Spawning recognizer");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RecognizerError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        // stdin is written on its own thread while stdout is drained
        let writer = child.stdin.take().map(|mut stdin| {
            let input = text.to_string();
            std::thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| RecognizerError::InvalidOutput(e.to_string()))?;

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                    return Err(RecognizerError::InvalidOutput(format!(
                        "failed to write input: {e}"
                    )))
                }
                _ => {}
            }
        }

        if !output.status.success() {
            return Err(RecognizerError::ProcessFailed {
                model: self.model.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_detections(&output.stdout)
    }
}

impl EntityRecognizer for CommandRecognizer {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn detect(&self, text: &str) -> Result<Vec<EntityDetection>, RecognizerError> {
        let detections = self.run(text)?;
        tracing::debug!(model = %self.model, detections = detections.len(), "Recognizer finished");
        Ok(detections)
    }
}

/// Parse the JSON detection array printed by a recognizer program
///
/// Blank output is read as an empty array.
pub fn parse_detections(stdout: &[u8]) -> Result<Vec<EntityDetection>, RecognizerError> {
    let text = std::str::from_utf8(stdout)
        .map_err(|e| RecognizerError::InvalidOutput(format!("output is not UTF-8: {e}")))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(|e| RecognizerError::InvalidOutput(e.to_string()))
}
