// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::runner::{AnalysisOutcome, BatchSummary};
use crate::integrity::{IntegrityResults, IntegrityStatus, IntegrityStatusDetails};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report one analyzed file with colors
    pub fn report_outcome(outcome: &AnalysisOutcome) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "File:".bold(), outcome.path.display().to_string().cyan());
        println!("{}", "━".repeat(80).bright_black());

        match &outcome.result {
            Ok(results) => Self::report_results(results),
            Err(message) => println!("{} {}", "⚠️".yellow(), message.yellow()),
        }

        println!(
            "\n  {} {}",
            "Time:".bright_black(),
            Self::format_duration(outcome.duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Verdict, signals and plane of one analysis
    pub fn report_results(results: &IntegrityResults) {
        match results.status {
            IntegrityStatus::Intact => println!(
                "{} {}",
                "✅".green(),
                results.status.description().green().bold()
            ),
            IntegrityStatus::Compromised => println!(
                "{} {}",
                "❌".red(),
                results.status.description().red().bold()
            ),
        }

        println!("\n{}", "Signals:".bold());
        Self::print_signal("Mesh", results.mesh_status.as_ref());
        Self::print_signal("BBox area", results.bbox_status.as_ref());
        Self::print_signal("BBox variance", results.bbox_variance_status.as_ref());

        println!("\n{}", "Surface:".bold());
        println!(
            "  {} {}",
            "Triangles:".bright_black(),
            results.triangle_count().to_string().cyan()
        );
        println!(
            "  {} {}",
            "Components:".bright_black(),
            results.components.len().to_string().cyan()
        );
        match results.plane_slope_deg {
            Some(slope) => println!(
                "  {} {}",
                "Plane slope:".bright_black(),
                format!("{:.2}°", slope).cyan()
            ),
            None => println!("  {} {}", "Plane slope:".bright_black(), "n/a".bright_black()),
        }
    }

    fn print_signal(name: &str, signal: Option<&IntegrityStatusDetails>) {
        let label = format!("{}:", name);
        match signal {
            Some(details) if details.is_compromised() => println!(
                "  {} {} {}",
                label.bright_black(),
                "compromised".red(),
                details.details.bright_black()
            ),
            Some(details) => println!(
                "  {} {} {}",
                label.bright_black(),
                "intact".green(),
                details.details.bright_black()
            ),
            None => println!("  {} {}", label.bright_black(), "absent".bright_black()),
        }
    }

    /// Totals over a batch
    pub fn report_summary(summary: &BatchSummary) {
        println!("\n{}", "═".repeat(80).bright_black());
        println!("{}", "Analysis Summary".bold());
        println!("{}", "═".repeat(80).bright_black());
        println!("  {} {}", "Total:".bright_black(), summary.total.to_string().cyan());
        println!("  {} {}", "Intact:".bright_black(), summary.intact.to_string().green());
        println!(
            "  {} {}",
            "Compromised:".bright_black(),
            if summary.compromised > 0 {
                summary.compromised.to_string().red()
            } else {
                summary.compromised.to_string().green()
            }
        );
        println!(
            "  {} {}",
            "Failed:".bright_black(),
            if summary.failed > 0 {
                summary.failed.to_string().yellow()
            } else {
                summary.failed.to_string().green()
            }
        );
        println!("{}", "═".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(750)),
            "750µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(12_500)),
            "12.50ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(3)), "3.00s");
    }
}
