//! Pre-commit scan of the git staging area for secrets
//!
//! Two passes: staged paths against [`patterns::SENSITIVE_PATHS`], then each
//! staged diff against [`patterns::CONTENT_PATTERNS`].

pub mod patterns;

use crate::tools::Git;
use crate::utils::Result;
use serde::Serialize;

/// One flagged file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub path: String,
    pub reason: String,
}

/// Findings for a set of staged files
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub staged: Vec<String>,
    pub sensitive_files: Vec<Finding>,
    pub sensitive_content: Vec<Finding>,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.sensitive_files.is_empty() && self.sensitive_content.is_empty()
    }

    pub fn problem_count(&self) -> usize {
        self.sensitive_files.len() + self.sensitive_content.len()
    }
}

/// Result of scanning a directory
#[derive(Debug)]
pub enum ScanOutcome {
    NotARepository,
    NothingStaged,
    Scanned(ScanReport),
}

/// Flag staged paths that match a sensitive-path rule
pub fn check_paths(staged: &[String]) -> Vec<Finding> {
    staged
        .iter()
        .filter(|path| !patterns::is_example(path))
        .filter_map(|path| {
            patterns::sensitive_reason(path).map(|reason| Finding {
                path: path.clone(),
                reason: reason.to_string(),
            })
        })
        .collect()
}

/// Whether a staged path's diff should be searched for secrets
pub fn wants_content_check(path: &str) -> bool {
    !patterns::is_example(path) && !patterns::is_binary(path)
}

/// Flag a staged diff that contains a secret pattern
pub fn check_content(path: &str, diff: &str) -> Option<Finding> {
    patterns::find_secret(diff).map(|pattern| Finding {
        path: path.to_string(),
        reason: format!("contains '{}'", pattern),
    })
}

/// Scan the staging area of `git`
pub async fn scan_staged(git: &Git) -> Result<ScanOutcome> {
    if !git.is_repository().await {
        return Ok(ScanOutcome::NotARepository);
    }

    let staged = git.staged_files().await?;
    if staged.is_empty() {
        return Ok(ScanOutcome::NothingStaged);
    }

    let sensitive_files = check_paths(&staged);

    let mut sensitive_content = Vec::new();
    for path in staged.iter().filter(|p| wants_content_check(p)) {
        if let Some(diff) = git.staged_diff(path).await {
            if let Some(finding) = check_content(path, &diff) {
                sensitive_content.push(finding);
            }
        }
    }

    Ok(ScanOutcome::Scanned(ScanReport {
        staged,
        sensitive_files,
        sensitive_content,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_check_paths_skips_examples() {
        let findings = check_paths(&staged(&[
            "data/server.key",
            "data/server.example.key",
            "README.md",
            "android/local.properties",
        ]));
        assert_eq!(
            findings,
            vec![
                Finding {
                    path: "data/server.key".to_string(),
                    reason: "Private key".to_string()
                },
                Finding {
                    path: "android/local.properties".to_string(),
                    reason: "Local build configuration".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_check_content() {
        let diff = "diff --git a/config.h b/config.h\n+#define API_KEY=\"abc\"\n";
        let finding = check_content("config.h", diff).unwrap();
        assert_eq!(finding.reason, "contains 'api_key='");
        assert!(check_content("main.c", "+int main() {}\n").is_none());
    }

    #[test]
    fn test_content_check_filter() {
        assert!(wants_content_check("src/config.h"));
        assert!(!wants_content_check("assets/logo.png"));
        assert!(!wants_content_check("config.example.h"));
    }

    #[test]
    fn test_report_counts() {
        let report = ScanReport {
            staged: staged(&["a.key", "b.h"]),
            sensitive_files: check_paths(&staged(&["a.key"])),
            sensitive_content: vec![],
        };
        assert!(!report.is_clean());
        assert_eq!(report.problem_count(), 1);
    }
}
