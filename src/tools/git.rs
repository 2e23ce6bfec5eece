//! Read-only access to the git staging area

use crate::tools::command::run_tool;
use crate::utils::Result;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// A repository addressed with `git -C <root>`
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
    timeout: Option<Duration>,
}

impl Git {
    pub fn new(root: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            root: root.into(),
            timeout,
        }
    }

    fn args<'a>(&self, rest: impl IntoIterator<Item = &'a str>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-C".into(), self.root.clone().into_os_string()];
        args.extend(rest.into_iter().map(OsString::from));
        args
    }

    /// False when `git` is missing or `root` is not inside a work tree
    pub async fn is_repository(&self) -> bool {
        run_tool("git", self.args(["rev-parse", "--git-dir"]), self.timeout)
            .await
            .success
    }

    /// Paths staged for the next commit
    pub async fn staged_files(&self) -> Result<Vec<String>> {
        let out = run_tool(
            "git",
            self.args(["diff", "--cached", "--name-only"]),
            self.timeout,
        )
        .await
        .require_success("git", "list staged files")?;
        Ok(parse_name_list(&out.stdout))
    }

    /// Staged diff of one path, `None` if git could not produce it
    pub async fn staged_diff(&self, path: &str) -> Option<String> {
        let out = run_tool(
            "git",
            self.args(["diff", "--cached", "--", path]),
            self.timeout,
        )
        .await;
        if out.success {
            Some(out.stdout)
        } else {
            tracing::debug!("git diff --cached {} failed: {}", path, out.stderr.trim());
            None
        }
    }
}

/// One path per non-blank line
pub fn parse_name_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
