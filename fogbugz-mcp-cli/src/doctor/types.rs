//! Type definitions for the doctor module

/// Status of a diagnostic check
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CheckStatus {
    /// Check passed without issues
    Ok,
    /// Check passed but with potential issues
    Warning,
    /// Check failed with errors
    Error,
}

/// Exit codes for the doctor command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// All checks passed
    Success = 0,
    /// Warnings detected
    Warning = 1,
    /// Errors detected
    Error = 2,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Which section of the report a check belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckCategory {
    /// Settings read from the environment or the YAML file
    Configuration,
    /// Talking to FogBugz
    Connectivity,
    /// The LLM behind `ask_agent`
    Agent,
}

impl CheckCategory {
    /// Report heading for the category
    pub fn heading(self) -> &'static str {
        match self {
            CheckCategory::Configuration => "Configuration:",
            CheckCategory::Connectivity => "Connectivity:",
            CheckCategory::Agent => "Agent:",
        }
    }
}

/// Result of a single diagnostic check
#[derive(Debug, Clone)]
pub struct Check {
    /// Name of the check performed
    pub name: String,
    /// Report section
    pub category: CheckCategory,
    /// Status of the check (Ok, Warning, Error)
    pub status: CheckStatus,
    /// Descriptive message about the check result
    pub message: String,
    /// Optional fix suggestion for warnings or errors
    pub fix: Option<String>,
}

impl Check {
    /// Start building a check
    ///
    /// ```
    /// use fogbugz_mcp_cli::doctor::{Check, CheckCategory, CheckStatus};
    ///
    /// let check = Check::new("FogBugz URL", CheckCategory::Configuration, CheckStatus::Ok)
    ///     .with_message("https://example.fogbugz.com")
    ///     .build();
    /// assert!(check.fix.is_none());
    /// ```
    pub fn new(name: impl Into<String>, category: CheckCategory, status: CheckStatus) -> CheckBuilder {
        CheckBuilder {
            name: name.into(),
            category,
            status,
            message: String::new(),
            fix: None,
        }
    }
}

/// Builder for creating Check instances
pub struct CheckBuilder {
    name: String,
    category: CheckCategory,
    status: CheckStatus,
    message: String,
    fix: Option<String>,
}

impl CheckBuilder {
    /// Set the message for the check
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the fix suggestion for the check
    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    /// Build the Check instance
    pub fn build(self) -> Check {
        Check {
            name: self.name,
            category: self.category,
            status: self.status,
            message: self.message,
            fix: self.fix,
        }
    }
}

/// Counts of check results by status
pub(crate) struct CheckCounts {
    pub ok_count: usize,
    pub warning_count: usize,
    pub error_count: usize,
}
