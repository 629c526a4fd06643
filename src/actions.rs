//! External-process actions
//!
//! Viewing, commenting and browser navigation are handed to the `gh` CLI,
//! which already knows the user's pager, editor and browser. The interactive
//! view only depends on the [`Actions`] trait.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::error::{NotifyError, Result};
use crate::notification::{Notification, SubjectKind};

/// Timeout for CLI availability checks
const CLI_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// One method per interactive action on the selected record
pub trait Actions {
    /// Read the subject with its comments in a pager
    fn view(&self, n: &Notification) -> Result<()>;

    /// Show the pull request diff, or the patch when `patch` is set
    fn view_diff(&self, n: &Notification, patch: bool) -> Result<()>;

    fn open_in_browser(&self, n: &Notification) -> Result<()>;

    /// Write a comment in the user's editor
    fn comment(&self, n: &Notification) -> Result<()>;
}

/// Check that `binary` runs (`binary --version`, 5s timeout)
pub fn binary_available(binary: &str) -> bool {
    Command::new(binary)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .and_then(|mut child| match child.wait_timeout(CLI_CHECK_TIMEOUT)? {
            Some(status) => Ok(status.success()),
            None => {
                let _ = child.kill();
                Ok(false)
            }
        })
        .unwrap_or(false)
}

/// Fail with [`NotifyError::MissingDependency`] unless `binary` runs
pub fn ensure_binary(binary: &str) -> Result<()> {
    if binary_available(binary) {
        Ok(())
    } else {
        Err(NotifyError::MissingDependency {
            binary: binary.to_string(),
        })
    }
}

/// Actions backed by the `gh` CLI
pub struct GhActions {
    gh: String,
}

impl GhActions {
    pub fn new() -> Self {
        Self {
            gh: "gh".to_string(),
        }
    }

    /// Use a specific `gh` binary
    pub fn with_cli_path(mut self, path: impl Into<String>) -> Self {
        self.gh = path.into();
        self
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        tracing::debug!(cli = %self.gh, ?args, "running");
        let status = Command::new(&self.gh).args(args).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(NotifyError::Action(format!(
                "'{} {}' exited with {}",
                self.gh,
                args.join(" "),
                status
            )))
        }
    }

    /// Pipe `gh api <url>` output through `$PAGER` (default `less -R`)
    fn page_api(&self, api_url: &str) -> Result<()> {
        let output = Command::new(&self.gh).args(["api", api_url]).output()?;
        if !output.status.success() {
            return Err(NotifyError::Action(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let pager = std::env::var("PAGER").unwrap_or_else(|_| "less -R".to_string());
        let mut parts = pager.split_whitespace();
        let program = parts.next().unwrap_or("less");
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            // The pager may quit before reading everything
            let _ = stdin.write_all(&output.stdout);
        }
        child.wait()?;
        Ok(())
    }
}

impl Default for GhActions {
    fn default() -> Self {
        Self::new()
    }
}

fn subject_url(n: &Notification) -> Result<String> {
    n.html_url().ok_or_else(|| {
        NotifyError::Action(format!("'{}' has no subject url", n.subject_title()))
    })
}

impl Actions for GhActions {
    fn view(&self, n: &Notification) -> Result<()> {
        match n.kind().gh_command() {
            Some(cmd) => self.run(&[cmd, "view", &subject_url(n)?, "--comments"]),
            None if !n.subject_url().is_empty() => self.page_api(n.subject_url()),
            None => self.open_in_browser(n),
        }
    }

    fn view_diff(&self, n: &Notification, patch: bool) -> Result<()> {
        if n.kind() != SubjectKind::PullRequest {
            return Err(NotifyError::Action(format!(
                "{} has no diff, only pull requests do",
                n.subject_type()
            )));
        }
        let url = subject_url(n)?;
        if patch {
            self.run(&["pr", "diff", &url, "--patch"])
        } else {
            self.run(&["pr", "diff", &url])
        }
    }

    fn open_in_browser(&self, n: &Notification) -> Result<()> {
        match (n.kind().gh_command(), n.kind()) {
            (Some(cmd), _) => self.run(&[cmd, "view", &subject_url(n)?, "--web"]),
            (None, SubjectKind::Commit) => {
                self.run(&["browse", n.number(), "--repo", n.repository_full_name()])
            }
            (None, _) => self.run(&["browse", "--repo", n.repository_full_name()]),
        }
    }

    fn comment(&self, n: &Notification) -> Result<()> {
        match n.kind().gh_command() {
            Some(cmd) => self.run(&[cmd, "comment", &subject_url(n)?, "--editor"]),
            None => Err(NotifyError::Action(format!(
                "Commenting on a {} is not supported",
                n.subject_type()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::fixtures::notification;

    #[test]
    fn test_missing_binary() {
        assert!(!binary_available("gh-notify-definitely-not-installed"));
        let err = ensure_binary("gh-notify-definitely-not-installed").unwrap_err();
        assert_eq!(err.to_string(), "install 'gh-notify-definitely-not-installed'");
    }

    #[test]
    fn test_diff_requires_pull_request() {
        let mut n = notification("1", "t", true);
        n.subject.kind = "Issue".to_string();
        let err = GhActions::new().view_diff(&n, false).unwrap_err();
        assert!(err.to_string().contains("only pull requests"));
    }

    #[test]
    fn test_comment_unsupported_kind() {
        let mut n = notification("1", "t", true);
        n.subject.kind = "Release".to_string();
        assert!(GhActions::new().comment(&n).is_err());
    }

    #[test]
    fn test_failed_process_is_action_error() {
        let actions = GhActions::new().with_cli_path("false");
        let n = notification("1", "t", true);
        let err = actions.view(&n).unwrap_err();
        assert!(matches!(err, NotifyError::Action(_)));
    }
}
