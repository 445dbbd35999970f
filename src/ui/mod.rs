//! User-facing output for interactive and automation runs
//!
//! Interactive mode prints colored info/success/warning/error lines plus a
//! final recommendation. Automation mode emits single-line JSON records so
//! callers can make pass/fail decisions without parsing prose: errors and
//! warnings go to stderr, the health score to stdout.

use chrono::Utc;
use console::Style;
use serde_json::json;

use crate::error::FlotillaError;
use crate::health::{HealthReport, Verdict};

/// Output sink for one lifecycle run
#[derive(Debug, Clone)]
pub struct Reporter {
    automation: bool,
    operation_id: String,
}

impl Reporter {
    pub fn new(automation: bool, operation_id: impl Into<String>) -> Self {
        Self {
            automation,
            operation_id: operation_id.into(),
        }
    }

    pub fn is_automation(&self) -> bool {
        self.automation
    }

    /// Informational progress line; silent in automation mode
    pub fn info(&self, message: &str) {
        if !self.automation {
            println!("{} {}", Style::new().cyan().apply_to("→"), message);
        }
    }

    /// Success line; silent in automation mode
    pub fn success(&self, message: &str) {
        if !self.automation {
            println!("{} {}", Style::new().green().bold().apply_to("✓"), message);
        }
    }

    /// Non-fatal warning; a JSON line on stderr in automation mode
    pub fn warning(&self, message: &str) {
        if self.automation {
            let line = json!({
                "timestamp": Utc::now().to_rfc3339(),
                "level": "warning",
                "operation_id": self.operation_id,
                "message": message,
            });
            eprintln!("{line}");
        } else {
            eprintln!(
                "{} {}",
                Style::new().yellow().bold().apply_to("!"),
                message
            );
        }
    }

    /// Error channel: colored text interactively, one JSON line in automation
    pub fn error(&self, err: &FlotillaError) {
        if self.automation {
            let line = json!({
                "timestamp": Utc::now().to_rfc3339(),
                "level": "error",
                "operation_id": self.operation_id,
                "error_type": err.kind(),
                "message": err.to_string(),
                "suggested_action": err.suggested_action().unwrap_or_default(),
            });
            eprintln!("{line}");
        } else {
            eprintln!(
                "{} {}",
                Style::new().red().bold().apply_to("✗"),
                Style::new().red().apply_to(err)
            );
            if let Some(action) = err.suggested_action() {
                eprintln!("  {}", Style::new().dim().apply_to(action));
            }
        }
    }

    /// Final recommendation line shown after a lifecycle operation
    pub fn recommend(&self, message: &str) {
        if !self.automation {
            println!("\n{}", Style::new().bold().apply_to(message));
        }
    }

    /// Print a health report; in automation mode this is the single
    /// `health_check` JSON line
    pub fn health(&self, report: &HealthReport) {
        if self.automation {
            let line = json!({
                "timestamp": Utc::now().to_rfc3339(),
                "level": "health_check",
                "operation_id": self.operation_id,
                "checks_passed": report.checks_passed,
                "total_checks": report.total_checks,
                "health_percentage": report.percentage,
            });
            println!("{line}");
            return;
        }

        println!("{}", Style::new().bold().apply_to("Installation health:"));
        for check in &report.checks {
            let mark = if check.passed {
                Style::new().green().apply_to("✓")
            } else {
                Style::new().red().apply_to("✗")
            };
            println!("  {mark} {}", check.label);
        }
        let summary = format!(
            "{}/{} checks passed ({}%)",
            report.checks_passed, report.total_checks, report.percentage
        );
        match report.verdict {
            Verdict::Passed => self.success(&summary),
            Verdict::Partial => self.warning(&(summary + " - proceeding with warnings")),
            Verdict::Failed => {
                eprintln!("{} {summary}", Style::new().red().bold().apply_to("✗"));
            }
        }
    }
}
