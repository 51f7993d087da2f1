mod loader;
mod reports;
mod selection;
mod sink;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use condottieri_scenarios::{ScenarioCheck, ScenarioEngine, ScenarioLoader};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use loader::DirectoryLoader;
use selection::ScenarioSelection;
use sink::ReportSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary for a terminal
    Console,
    /// Machine-readable array of scenario summaries
    Json,
    /// Markdown document with a violation table per scenario
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "condottieri-checker", version)]
#[command(about = "Consistency checks for Condottieri settings and scenarios")]
struct Args {
    /// Data directory holding settings/ and scenarios/
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Scenarios to check (comma-separated slugs, or "all")
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let engine = ScenarioEngine::new(DirectoryLoader::new(&args.data));

    if maybe_list_scenarios(&args, &engine)? {
        return Ok(());
    }

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let checks = run_checks(&args, &engine)?;
    write_reports(&args, &checks, start_time)?;

    if checks.iter().any(|c| !c.is_valid()) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args, engine: &ScenarioEngine<DirectoryLoader>) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let slugs = engine.loader().scenario_slugs().with_context(|| {
        format!("failed to list scenarios in {}", engine.loader().root().display())
    })?;
    let mut sink = ReportSink::open(args.output.as_deref())?;
    writeln!(sink, "Available scenarios:")?;
    for slug in slugs {
        let title = engine
            .loader()
            .load_scenario(&slug)
            .map_or_else(|err| format!("<{err}>"), |scenario| scenario.title);
        writeln!(sink, "  {slug:25} - {title}")?;
    }
    sink.finish()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🏰 Condottieri Scenario Checker".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn run_checks(
    args: &Args,
    engine: &ScenarioEngine<DirectoryLoader>,
) -> Result<Vec<ScenarioCheck>> {
    let ScenarioSelection::Slugs(requested) = ScenarioSelection::parse(&args.scenarios) else {
        let checks = engine.check_all().with_context(|| {
            format!("failed to check scenarios in {}", engine.loader().root().display())
        })?;
        if args.verbose {
            for check in &checks {
                announce_check(check);
            }
        }
        return Ok(checks);
    };

    let mut checks = Vec::with_capacity(requested.len());
    for slug in &requested {
        let check = engine
            .check_scenario(slug)
            .with_context(|| format!("failed to check scenario {slug}"))?;
        if args.verbose {
            announce_check(&check);
        }
        checks.push(check);
    }
    Ok(checks)
}

fn announce_check(check: &ScenarioCheck) {
    let label = if check.is_valid() {
        check.scenario.slug.green()
    } else {
        check.scenario.slug.red()
    };
    eprintln!(
        "🔍 {label} on {}: {} violation(s)",
        check.setting.slug,
        check.report.len()
    );
}

fn write_reports(args: &Args, checks: &[ScenarioCheck], start_time: Instant) -> Result<()> {
    let mut sink = ReportSink::open(args.output.as_deref())?;

    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut sink, checks)?,
        ReportFormat::Markdown => {
            if checks.is_empty() {
                writeln!(
                    &mut sink,
                    "# Condottieri Scenario Check Results\n\n_No scenarios checked._"
                )?;
            } else {
                reports::generate_markdown_report(&mut sink, checks)?;
            }
        }
        ReportFormat::Console => {
            if checks.is_empty() {
                writeln!(&mut sink, "No scenarios checked.")?;
            } else {
                reports::generate_console_report(&mut sink, checks, start_time.elapsed())?;
            }
            writeln!(&mut sink)?;
            writeln!(&mut sink, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    sink.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");

    fn base_args() -> Args {
        Args {
            data: PathBuf::from(SAMPLE_DATA),
            scenarios: "all".to_string(),
            list_scenarios: false,
            report: ReportFormat::Json,
            verbose: false,
            output: None,
        }
    }

    fn engine(args: &Args) -> ScenarioEngine<DirectoryLoader> {
        ScenarioEngine::new(DirectoryLoader::new(&args.data))
    }

    #[test]
    fn args_parse_report_format() {
        let args = Args::parse_from([
            "condottieri-checker",
            "--data",
            "fixtures",
            "--report",
            "markdown",
            "--scenarios",
            "a,b",
        ]);
        assert_eq!(args.report, ReportFormat::Markdown);
        assert_eq!(args.data, PathBuf::from("fixtures"));
        assert_eq!(
            ScenarioSelection::parse(&args.scenarios),
            ScenarioSelection::Slugs(vec!["a".to_string(), "b".to_string()])
        );
        assert!(Args::try_parse_from(["condottieri-checker", "--report", "csv"]).is_err());
    }

    #[test]
    fn run_checks_all_and_selected() {
        let args = base_args();
        let all = run_checks(&args, &engine(&args)).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_valid());

        let selected = Args {
            scenarios: "italy-1454".to_string(),
            ..base_args()
        };
        let checks = run_checks(&selected, &engine(&selected)).unwrap();
        assert_eq!(checks[0].scenario.slug, "italy-1454");
    }

    #[test]
    fn run_checks_fails_for_unknown_scenario() {
        let args = Args {
            scenarios: "atlantis".to_string(),
            ..base_args()
        };
        let err = run_checks(&args, &engine(&args)).unwrap_err();
        assert!(format!("{err:#}").contains("atlantis"));
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = std::env::temp_dir().join("condottieri-scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args, &engine(&args)).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("Italy 1454"));
    }

    #[test]
    fn maybe_list_scenarios_returns_false_when_disabled() {
        let args = base_args();
        assert!(!maybe_list_scenarios(&args, &engine(&args)).unwrap());
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = std::env::temp_dir().join("condottieri-report.md");
        let args = Args {
            report: ReportFormat::Markdown,
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No scenarios checked"));
    }

    #[test]
    fn write_reports_emits_json_for_results() {
        let temp = std::env::temp_dir().join("condottieri-report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        let checks = run_checks(&args, &engine(&args)).unwrap();
        write_reports(&args, &checks, Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("\"slug\": \"italy-1454\""));
    }
}
