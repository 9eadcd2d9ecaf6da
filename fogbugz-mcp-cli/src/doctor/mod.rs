//! Diagnostics for a fogbugz-mcp installation
//!
//! Checks that FogBugz is configured and reachable and that an LLM is
//! available for `ask_agent`.
//!
//! ```no_run
//! use fogbugz_mcp_cli::doctor::Doctor;
//!
//! # async fn run() {
//! let mut doctor = Doctor::new();
//! let exit_code = doctor.run_diagnostics().await;
//! # }
//! ```
//!
//! The doctor returns exit codes:
//! - 0: All checks passed
//! - 1: Some warnings detected
//! - 2: Errors detected

use colored::*;

pub use types::*;

pub mod checks;
pub mod types;

/// Accumulates check results and prints the report
pub struct Doctor {
    checks: Vec<Check>,
}

impl Doctor {
    /// Create a new Doctor instance for running diagnostics
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Run all diagnostic checks, print the report and return the exit code
    pub async fn run_diagnostics(&mut self) -> i32 {
        println!("{}", "FogBugz MCP Doctor".bold().blue());
        println!("{}", "Running diagnostics...".dimmed());
        println!();

        self.run_checks().await;
        self.print_results();

        self.get_exit_code()
    }

    /// Run every check without printing
    pub async fn run_checks(&mut self) {
        checks::check_log_directory(&mut self.checks);

        let Some(config) = checks::check_configuration(&mut self.checks) else {
            return;
        };

        if checks::check_base_url(&mut self.checks, &config.fogbugz) {
            checks::check_fogbugz_reachable(&mut self.checks, &config.fogbugz).await;
        }
        checks::check_agent(&mut self.checks, &config);
    }

    /// Results collected so far
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Print the results grouped by category, then a summary
    pub fn print_results(&self) {
        let use_color = crate::cli::Cli::should_use_color();

        for category in [
            CheckCategory::Configuration,
            CheckCategory::Connectivity,
            CheckCategory::Agent,
        ] {
            let in_category: Vec<&Check> = self
                .checks
                .iter()
                .filter(|check| check.category == category)
                .collect();
            print_check_category(&in_category, category.heading(), use_color);
        }

        self.print_summary(use_color);
    }

    fn print_summary(&self, use_color: bool) {
        let counts = self.count_check_statuses();

        if use_color {
            println!("{}", "Summary:".bold().green());
        } else {
            println!("Summary:");
        }

        match (counts.error_count, counts.warning_count) {
            (0, 0) => println!("  All checks passed!"),
            (0, _) if use_color => println!(
                "  {} checks passed, {} warnings",
                counts.ok_count.to_string().green(),
                counts.warning_count.to_string().yellow()
            ),
            (0, _) => println!(
                "  {} checks passed, {} warnings",
                counts.ok_count, counts.warning_count
            ),
            _ if use_color => println!(
                "  {} checks passed, {} warnings, {} errors",
                counts.ok_count.to_string().green(),
                counts.warning_count.to_string().yellow(),
                counts.error_count.to_string().red()
            ),
            _ => println!(
                "  {} checks passed, {} warnings, {} errors",
                counts.ok_count, counts.warning_count, counts.error_count
            ),
        }
    }

    fn count_check_statuses(&self) -> CheckCounts {
        let count = |status: CheckStatus| self.checks.iter().filter(|c| c.status == status).count();
        CheckCounts {
            ok_count: count(CheckStatus::Ok),
            warning_count: count(CheckStatus::Warning),
            error_count: count(CheckStatus::Error),
        }
    }

    /// Get exit code based on check results
    ///
    /// - 0: All checks passed (no errors or warnings)
    /// - 1: At least one warning detected
    /// - 2: At least one error detected
    pub fn get_exit_code(&self) -> i32 {
        let has_error = self.checks.iter().any(|c| c.status == CheckStatus::Error);
        let has_warning = self.checks.iter().any(|c| c.status == CheckStatus::Warning);

        let exit_code = if has_error {
            ExitCode::Error
        } else if has_warning {
            ExitCode::Warning
        } else {
            ExitCode::Success
        };

        exit_code.into()
    }
}

impl Default for Doctor {
    fn default() -> Self {
        Self::new()
    }
}

fn print_check_category(checks: &[&Check], category_name: &str, use_color: bool) {
    if checks.is_empty() {
        return;
    }

    if use_color {
        println!("{}", category_name.bold().yellow());
    } else {
        println!("{category_name}");
    }
    for check in checks {
        print_check(check, use_color);
    }
    println!();
}

/// Print a single check result
fn print_check(check: &Check, use_color: bool) {
    let (symbol, color_fn): (&str, fn(&str) -> ColoredString) = match check.status {
        CheckStatus::Ok => ("✓", |s: &str| s.green()),
        CheckStatus::Warning => ("⚠", |s: &str| s.yellow()),
        CheckStatus::Error => ("✗", |s: &str| s.red()),
    };

    if use_color {
        println!(
            "  {} {} - {}",
            color_fn(symbol),
            check.name.bold(),
            check.message
        );
    } else {
        println!("  {} {} - {}", symbol, check.name, check.message);
    }

    if let Some(fix) = &check.fix {
        if use_color {
            println!("    {} {}", "→".dimmed(), fix.dimmed());
        } else {
            println!("    → {fix}");
        }
    }
}
