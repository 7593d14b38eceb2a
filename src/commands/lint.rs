use super::load_config;
use crate::cli::OutputFormat;
use crate::rules::Registry;
use crate::{Context, Engine, EngineOptions, Report, Result, Severity, loader};
use colored::*;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

pub struct LintArgs {
    pub file: PathBuf,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub rule_sets: Vec<String>,
    pub jobs: usize,
    pub timeout_ms: Option<u64>,
}

/// Lint one file and print the report. Returns false when a MUST violation was found.
pub fn execute_lint(args: &LintArgs) -> Result<bool> {
    let mut config = load_config(args.config.as_deref())?;
    if !args.rule_sets.is_empty() {
        config = config.with_rule_sets(args.rule_sets.iter().cloned());
    }

    let options = EngineOptions {
        jobs: args.jobs.max(1),
        budget: args.timeout_ms.map(Duration::from_millis),
    };
    let engine = Engine::from_config(&config, options)?;

    let document = loader::load_document(&args.file)?;
    let context = Context::new(&document)?;
    let report = engine.validate_context(&context)?;

    match args.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => {
            println!("{}", "Linting API document...".bright_blue());
            println!("  Path: {}", args.file.display());
            println!("  Version: {}", context.version());
            println!("  Rules: {}", engine.registry().enabled().count());
            println!();
            write_text(&mut std::io::stdout().lock(), &report, engine.registry())?;
        }
    }

    Ok(!report.has_must())
}

/// Violations grouped by severity, strongest first, then a summary line
pub fn write_text<W: Write>(out: &mut W, report: &Report, registry: &Registry) -> Result<()> {
    if report.is_empty() {
        writeln!(out, "{}", "✓ No violations found".green().bold())?;
        return Ok(());
    }

    let counts = report.count_by_severity();
    for (severity, count) in counts.iter().rev() {
        writeln!(out, "{}", paint(*severity, &format!("{} ({}):", severity, count)))?;
        for violation in report.violations().iter().filter(|v| v.severity() == *severity) {
            writeln!(
                out,
                "  - [{}] {}",
                violation.rule_id().cyan(),
                violation.description()
            )?;
            writeln!(out, "      at {}", pointer_text(violation.pointer()).bright_black())?;
            if let Some(rule) = registry.get(violation.rule_id()) {
                writeln!(out, "      see {}", rule.declaration.url().bright_black())?;
            }
        }
        writeln!(out)?;
    }

    let summary = counts
        .iter()
        .rev()
        .map(|(severity, count)| format!("{} {}", count, severity))
        .collect::<Vec<_>>()
        .join(", ");
    if report.has_must() {
        writeln!(out, "{}", format!("✗ {} violations: {}", report.len(), summary).red().bold())?;
    } else {
        writeln!(out, "{}", format!("⚠ {} violations: {}", report.len(), summary).yellow())?;
    }
    Ok(())
}

fn pointer_text(pointer: &crate::JsonPointer) -> String {
    if pointer.is_root() {
        "(document root)".to_string()
    } else {
        pointer.to_string()
    }
}

fn paint(severity: Severity, text: &str) -> ColoredString {
    match severity {
        Severity::Must => text.red().bold(),
        Severity::Should => text.yellow().bold(),
        Severity::May => text.blue(),
        Severity::Hint => text.normal(),
    }
}
