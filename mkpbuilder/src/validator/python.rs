//! Python syntax checking through the system interpreter.
//!
//! Uses an external `python3` (standard on any Checkmk build host) so the
//! grammar always matches the Python that will run the plugin.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Deserialize;

use super::{SyntaxChecker, SyntaxIssue};
use crate::builder::{BuildError, BuildResult};

/// Default interpreter command.
const DEFAULT_INTERPRETER: &str = "python3";

/// Reads newline-separated paths from stdin and prints one JSON record per
/// file that fails to parse. Nothing is executed.
const CHECK_SCRIPT: &str = r#"
import ast, json, sys
for path in sys.stdin.read().splitlines():
    if not path:
        continue
    try:
        with open(path, 'r', encoding='utf-8') as f:
            source = f.read()
        ast.parse(source, filename=path)
    except SyntaxError as e:
        print(json.dumps({"path": path, "line": e.lineno or 0, "message": e.msg}))
    except Exception as e:
        print(json.dumps({"path": path, "line": 0, "message": str(e)}))
"#;

#[derive(Debug, Deserialize)]
struct IssueRecord {
    path: String,
    line: usize,
    message: String,
}

/// Syntax checker backed by a Python interpreter.
#[derive(Debug, Clone)]
pub struct PythonSyntaxChecker {
    interpreter: String,
}

impl Default for PythonSyntaxChecker {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
        }
    }
}

impl PythonSyntaxChecker {
    /// Create a checker using `python3` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific interpreter command.
    pub fn with_interpreter(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    fn unavailable(&self, reason: impl std::fmt::Display) -> BuildError {
        BuildError::SyntaxCheckerUnavailable(format!(
            "'{}' {}. Install Python 3 or skip validation with --no-validate.",
            self.interpreter, reason
        ))
    }
}

impl SyntaxChecker for PythonSyntaxChecker {
    fn check(&self, files: &[PathBuf]) -> BuildResult<Vec<SyntaxIssue>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let mut child = Command::new(&self.interpreter)
            .args(["-c", CHECK_SCRIPT])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.unavailable(format_args!("command not found: {}", e)))?;

        let input: String = files
            .iter()
            .map(|f| format!("{}\n", f.display()))
            .collect();
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .map_err(|e| self.unavailable(format_args!("could not be fed: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| self.unavailable(format_args!("failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.unavailable(format_args!("failed: {}", stderr.trim())));
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| -> BuildResult<SyntaxIssue> {
                let record: IssueRecord = serde_json::from_str(line).map_err(|e| {
                    self.unavailable(format_args!("produced unexpected output: {}", e))
                })?;
                Ok(SyntaxIssue {
                    path: PathBuf::from(record.path),
                    line: record.line,
                    message: record.message,
                })
            })
            .collect()
    }
}
