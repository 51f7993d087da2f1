use anyhow::Result;
use colored::Colorize;
use condottieri_scenarios::{ScenarioCheck, Violation};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ScenarioSummary<'a> {
    slug: &'a str,
    title: &'a str,
    setting: &'a str,
    start_year: u32,
    players: usize,
    valid: bool,
    violations: &'a [Violation],
}

impl<'a> ScenarioSummary<'a> {
    fn from_check(check: &'a ScenarioCheck) -> Self {
        Self {
            slug: &check.scenario.slug,
            title: &check.scenario.title,
            setting: &check.setting.slug,
            start_year: check.scenario.start_year,
            players: check.scenario.number_of_players(),
            valid: check.is_valid(),
            violations: &check.report.violations,
        }
    }
}

fn tally(checks: &[ScenarioCheck]) -> (usize, usize, usize) {
    let total = checks.len();
    let consistent = checks.iter().filter(|c| c.is_valid()).count();
    (total, consistent, total - consistent)
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    checks: &[ScenarioCheck],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Scenario Check Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=========================".cyan())?;

    let (total, consistent, inconsistent) = tally(checks);
    // Overall stats
    writeln!(out, "Total scenarios: {total}")?;
    writeln!(out, "Consistent: {}", consistent.to_string().green())?;
    writeln!(out, "Inconsistent: {}", inconsistent.to_string().red())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    // Individual results
    for check in checks {
        let status = if check.is_valid() {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{status} {} ({})",
            check.scenario.title.bold(),
            check.scenario.slug
        )?;
        writeln!(
            out,
            "   Setting: {} | Start year: {} | Players: {}",
            check.setting.slug,
            check.scenario.start_year,
            check.scenario.number_of_players()
        )?;

        if !check.report.is_valid() {
            writeln!(out, "   Violations:")?;
            for violation in &check.report {
                writeln!(
                    out,
                    "     • [{}] {}: {}",
                    violation.code.yellow(),
                    violation.entity,
                    violation.message.red()
                )?;
            }
        }
        writeln!(out)?;
    }

    let mut counts = std::collections::BTreeMap::new();
    for check in checks {
        for (code, count) in check.report.counts_by_code() {
            *counts.entry(code).or_insert(0) += count;
        }
    }
    if !counts.is_empty() {
        writeln!(out, "{}", "⚠️  Violations by kind".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        for (code, count) in counts {
            writeln!(out, "{code:32} {count}")?;
        }
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(
    out: &mut W,
    checks: &[ScenarioCheck],
) -> Result<()> {
    let summaries: Vec<_> = checks.iter().map(ScenarioSummary::from_check).collect();
    let json_output = serde_json::to_string_pretty(&summaries)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    checks: &[ScenarioCheck],
) -> Result<()> {
    writeln!(out, "# Condottieri Scenario Check Results\n")?;

    let (total, consistent, inconsistent) = tally(checks);
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total}")?;
    writeln!(out, "- **Consistent**: {consistent}")?;
    writeln!(out, "- **Inconsistent**: {inconsistent}\n")?;

    writeln!(out, "## Detailed Results\n")?;

    for check in checks {
        let status = if check.is_valid() { "✅" } else { "❌" };
        writeln!(out, "### {status} {} (`{}`)\n", check.scenario.title, check.scenario.slug)?;
        writeln!(out, "- **Setting**: {}", check.setting.slug)?;
        writeln!(out, "- **Start year**: {}", check.scenario.start_year)?;
        writeln!(out, "- **Players**: {}", check.scenario.number_of_players())?;

        if !check.report.is_valid() {
            writeln!(out, "\n| Code | Entity | Message |")?;
            writeln!(out, "|---|---|---|")?;
            for violation in &check.report {
                writeln!(
                    out,
                    "| `{}` | {} | {} |",
                    violation.code,
                    violation.entity,
                    violation.message.replace('|', "\\|")
                )?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
