//! `caselint` - validate the simulator's cases against the minimal schema

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cases::extract_cases_named;
use crate::cli::args::{GlobalOpts, OutputFormat};
use crate::core::{Config, Project};
use crate::schema::loader::load_schema;
use crate::schema::validator::{CaseReport, CollectionValidator};

#[derive(clap::Args, Debug, Default)]
pub struct ValidateArgs {
    /// Schema file (default: data/case_schema_min.json under the content root)
    #[arg(long, env = "CASELINT_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Case data file (default: data/cases.js under the content root)
    #[arg(long, env = "CASELINT_CASES")]
    pub cases: Option<PathBuf>,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    cases_checked: usize,
    cases_passed: usize,
    cases_failed: usize,
    total_violations: usize,
}

/// Machine-readable run report for `--format json`
#[derive(Serialize)]
struct JsonReport<'a> {
    source: String,
    cases: usize,
    failed: usize,
    results: &'a [CaseReport],
}

/// Input files for one run
#[derive(Debug)]
struct Resources {
    schema: PathBuf,
    cases: PathBuf,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let resources = resolve_resources(&args, global)?;

    let schema = load_schema(&resources.schema)?;

    let source = resources.cases.display().to_string();
    let text = std::fs::read_to_string(&resources.cases)
        .map_err(|e| miette::miette!("Cannot read case data {}: {}", source, e))?;
    let cases = extract_cases_named(&text, &source)?;

    let text_output = global.format == OutputFormat::Text;
    let show_cases = text_output && !global.quiet;

    if text_output {
        println!(
            "{} Validating {} case(s) from {}...\n",
            style("→").blue(),
            cases.len(),
            source
        );
    }

    let mut validator = CollectionValidator::new(&schema);
    let mut stats = ValidationStats::default();
    let mut failed: Vec<CaseReport> = Vec::new();

    for case in &cases {
        let report = validator.check(case);
        stats.cases_checked += 1;
        stats.total_violations += report.violation_count();

        if report.is_valid() {
            stats.cases_passed += 1;
            if show_cases && global.verbose {
                println!("{} {}", style("✓").green(), report.id);
            }
            continue;
        }

        stats.cases_failed += 1;
        if show_cases {
            print_case(&report);
        }
        failed.push(report);
    }

    match global.format {
        OutputFormat::Text => print_summary(&stats),
        OutputFormat::Json => {
            let report = JsonReport {
                source,
                cases: stats.cases_checked,
                failed: stats.cases_failed,
                results: &failed,
            };
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
    }

    if stats.cases_failed > 0 {
        Err(miette::miette!(
            "Validation failed: {} of {} cases have violations",
            stats.cases_failed,
            stats.cases_checked
        ))
    } else {
        if text_output {
            println!(
                "{} OK: {} cases validated.",
                style("✓").green().bold(),
                stats.cases_checked
            );
        }
        Ok(())
    }
}

/// Pick the schema and case files: flags and env, then config files, then
/// the defaults under the content root
fn resolve_resources(args: &ValidateArgs, global: &GlobalOpts) -> Result<Resources> {
    let discovered = match &global.root {
        Some(root) => Ok(Project::at(root)),
        None => Project::discover(),
    };
    let project = discovered.as_ref().ok();
    let config = Config::load(project);

    let schema = args
        .schema
        .clone()
        .or(config.schema)
        .or_else(|| project.map(Project::schema_path));
    let cases = args
        .cases
        .clone()
        .or(config.cases)
        .or_else(|| project.map(Project::cases_path));

    match (schema, cases) {
        (Some(schema), Some(cases)) => Ok(Resources { schema, cases }),
        _ => Err(match discovered {
            Err(e) => e.into(),
            Ok(_) => miette::miette!("No schema or case data file configured"),
        }),
    }
}

/// Duplicate ids get a line of their own; content violations are listed
/// in a block under the case id
fn print_case(report: &CaseReport) {
    if let Some(duplicate) = &report.duplicate {
        println!("{} {}", style("✗").red(), style(duplicate).red());
    }
    if report.violations.is_empty() {
        return;
    }
    println!(
        "{} {} - {} violation(s)",
        style("✗").red(),
        report.id,
        report.violations.len()
    );
    for violation in &report.violations {
        println!("    - {}", style(violation).red());
    }
}

fn print_summary(stats: &ValidationStats) {
    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Cases checked:    {}", style(stats.cases_checked).cyan());
    println!("  Cases passed:     {}", style(stats.cases_passed).green());
    println!("  Cases failed:     {}", style(stats.cases_failed).red());
    println!("  Total violations: {}", style(stats.total_violations).red());
    println!();
}
