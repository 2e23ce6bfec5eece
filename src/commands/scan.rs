//! Pre-commit security scan command

use crate::scan::{scan_staged, Finding, ScanOutcome, ScanReport};
use crate::tools::Git;
use crate::utils::progress::{print_fail, print_header, print_info, print_pass, print_warning};
use crate::utils::Result;
use console::style;
use std::path::Path;
use std::time::Duration;

/// Scan the staging area of the repository at `repo`.
///
/// Returns `true` when it is safe to commit: nothing sensitive is staged,
/// nothing is staged at all, or `repo` is not a git repository.
pub async fn run_scan(repo: &Path, timeout: Option<Duration>) -> Result<bool> {
    print_header("Pre-commit security check");

    let git = Git::new(repo, timeout);
    match scan_staged(&git).await? {
        ScanOutcome::NotARepository => {
            print_warning(&format!("{} is not a git repository", repo.display()));
            Ok(true)
        }
        ScanOutcome::NothingStaged => {
            print_info("No staged files");
            Ok(true)
        }
        ScanOutcome::Scanned(report) => {
            print_report(&report);
            Ok(report.is_clean())
        }
    }
}

fn print_findings(findings: &[Finding]) {
    for finding in findings {
        println!("    {}", style(&finding.path).bold());
        println!("      Reason: {}", finding.reason);
    }
}

fn print_report(report: &ScanReport) {
    println!("\n  {} staged file(s):", report.staged.len());
    for path in &report.staged {
        println!("    - {}", path);
    }

    print_header("Results");

    if report.is_clean() {
        print_pass("No security problems detected, safe to commit");
        return;
    }

    if !report.sensitive_files.is_empty() {
        print_fail("Sensitive files staged:");
        print_findings(&report.sensitive_files);
    }

    if !report.sensitive_content.is_empty() {
        print_warning("Sensitive content staged:");
        print_findings(&report.sensitive_content);
    }

    print_header("How to fix");
    println!("  1. Unstage the sensitive files:");
    println!("     {}", style("git reset HEAD <file>").cyan());
    println!("  2. Add them to .gitignore if they are not there yet:");
    println!("     {}", style("echo '<file>' >> .gitignore").cyan());
    println!("  3. Move secrets out of the source, e.g. into environment variables");
    println!();
    println!(
        "{}",
        style(format!(
            "Do not commit: {} problem(s) found",
            report.problem_count()
        ))
        .red()
        .bold()
    );
}
