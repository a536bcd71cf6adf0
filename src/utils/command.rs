//! External-process execution primitives with consistent error handling.

use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Run a command, failing with a context-named error on a non-zero exit.
///
/// The `context` string names the phase ("git clone", "rsync", ...) and is
/// carried into the error so callers never have to reconstruct which external
/// tool failed.
pub fn run(program: &str, args: &[&str], context: &str) -> Result<()> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| Error::tool(context, e.to_string()))?;
    require_success(&output, context)
}

/// Run a command with `dir` as the working directory.
pub fn run_in(dir: &Path, program: &str, args: &[&str], context: &str) -> Result<()> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::tool(context, e.to_string()))?;
    require_success(&output, context)
}

/// Run a full command line through `sh -c` with `dir` as the working directory.
///
/// Shell execution is required for build commands: manifests carry complete
/// command lines ("npm run build", "make site && cp -r out gitstatic_build")
/// that may use pipes, chaining, and environment expansion.
pub fn run_shell_in(dir: &Path, command_line: &str, context: &str) -> Result<()> {
    let output = Command::new("sh")
        .args(["-c", command_line])
        .current_dir(dir)
        .output()
        .map_err(|e| Error::tool(context, e.to_string()))?;
    require_success(&output, context)
}

/// Check whether a program can be invoked at all (e.g. probing for rsync).
pub fn available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn require_success(output: &Output, context: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let exit_code = output.status.code().unwrap_or(1);
    let detail = error_text(output);
    if detail.is_empty() {
        Err(Error::tool(context, format!("exit code {}", exit_code)))
    } else {
        Err(Error::tool(
            context,
            format!("exit code {}: {}", exit_code, detail),
        ))
    }
}

/// Extract error text from command output.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn run_succeeds_with_valid_command() {
        assert!(run("true", &[], "truth check").is_ok());
    }

    #[test]
    fn run_fails_with_missing_program() {
        let result = run("nonexistent_command_xyz", &[], "missing program");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("missing program"));
    }

    #[test]
    fn run_in_reports_exit_code_on_failure() {
        let err = run_in(&PathBuf::from("/tmp"), "false", &[], "false check").unwrap_err();
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn run_shell_in_supports_chaining() {
        let dir = tempfile::tempdir().expect("tempdir");
        run_shell_in(dir.path(), "echo one > a.txt && echo two >> a.txt", "shell chain")
            .expect("shell chain should succeed");
        let content = std::fs::read_to_string(dir.path().join("a.txt")).expect("read a.txt");
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn run_shell_in_propagates_nonzero_exit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = run_shell_in(dir.path(), "exit 3", "shell exit").unwrap_err();
        assert!(err.to_string().contains("exit code 3"));
    }
}
