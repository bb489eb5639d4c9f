use crate::config::AnalyzerConfig;
use crate::core::{self, AnalyzeOptions, CancelFlag};
use crate::diagnostics::{Diagnostic, ErrorReport, JsonReport, Severity};
use crate::error::Result;
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "react-analyzer")]
#[command(about = "Static analysis for React codebases - cross-component performance hazards", long_about = None)]
#[command(version)]
struct Cli {
  /// Files or directories to analyze
  #[arg(default_value = ".")]
  paths: Vec<PathBuf>,

  /// Output as JSON
  #[arg(long)]
  json: bool,

  /// Include the component/state graph in JSON output
  #[arg(long)]
  graph: bool,

  /// Directory to start configuration discovery from (defaults to the first path)
  #[arg(long)]
  config_dir: Option<PathBuf>,

  /// Minimum severity to report: hint, warning or error
  #[arg(long, value_name = "LEVEL")]
  min_severity: Option<String>,

  /// Enable debug logging
  #[arg(short, long)]
  debug: bool,

  /// CI mode: suppress all logs, only output results
  #[arg(long)]
  ci: bool,
}

/// Exit codes: 0 clean, 1 diagnostics present, 2 engine/config error
pub fn run() -> i32 {
  let cli = Cli::parse();

  // Setup logging with cleaner formatting
  let log_level = if cli.ci {
    "error"
  } else if cli.debug {
    "debug"
  } else {
    "warn"
  };
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("react_analyzer={}", log_level).into()),
    )
    .without_time()
    .with_target(false)
    .init();

  match run_analysis(&cli) {
    Ok(exit_code) => exit_code,
    Err(e) => {
      if cli.json {
        match serde_json::to_string_pretty(&ErrorReport::from_error(&e)) {
          Ok(json) => println!("{}", json),
          Err(ser) => eprintln!("Error: {}", ser),
        }
      } else {
        eprintln!("{} {}", "Error:".red().bold(), e);
      }
      2
    }
  }
}

fn run_analysis(cli: &Cli) -> Result<i32> {
  let config_dir = match &cli.config_dir {
    Some(dir) => dir.clone(),
    None => {
      let first = cli.paths.first().cloned().unwrap_or_else(|| PathBuf::from("."));
      if first.is_file() {
        first.parent().map(Path::to_path_buf).unwrap_or(first)
      } else {
        first
      }
    }
  };

  let severity_threshold = match cli.min_severity.as_deref() {
    None => None,
    Some("hint") => Some(Severity::Hint),
    Some("warning") => Some(Severity::Warning),
    Some("error") => Some(Severity::Error),
    Some(other) => {
      return Err(crate::error::AnalyzerError::InvalidConfig(format!(
        "unknown severity '{}'; expected hint, warning or error",
        other
      )))
    }
  };

  debug!("Discovering configuration from {:?}", config_dir);
  let config = AnalyzerConfig::discover(&config_dir)?;

  let outcome = core::analyze(&AnalyzeOptions {
    paths: cli.paths.clone(),
    config,
    include_graph: cli.graph,
    severity_threshold,
    cancel: CancelFlag::new(),
  })?;

  if cli.json {
    let report = JsonReport {
      issues: &outcome.diagnostics,
      stats: &outcome.stats,
      graph: outcome.graph.as_ref(),
    };
    println!("{}", serde_json::to_string_pretty(&report).unwrap());
  } else {
    print_human(&outcome.diagnostics, &outcome.stats);
  }

  Ok(if outcome.diagnostics.is_empty() { 0 } else { 1 })
}

fn print_human(diagnostics: &[Diagnostic], stats: &crate::diagnostics::AnalysisStats) {
  let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
  let display = |path: &Path| -> String {
    pathdiff::diff_paths(path, &cwd)
      .unwrap_or_else(|| path.to_path_buf())
      .display()
      .to_string()
  };

  if diagnostics.is_empty() {
    println!(
      "{} {} file{} analyzed in {}ms",
      "No issues found.".green().bold(),
      stats.files_analyzed,
      if stats.files_analyzed == 1 { "" } else { "s" },
      stats.duration_ms
    );
    return;
  }

  let mut current_file: Option<&Path> = None;
  for diagnostic in diagnostics {
    if current_file != Some(diagnostic.file_path.as_path()) {
      if current_file.is_some() {
        println!();
      }
      println!("{}", display(&diagnostic.file_path).bold().underline());
      current_file = Some(diagnostic.file_path.as_path());
    }

    let marker = match diagnostic.severity {
      Severity::Error => "error".red().bold(),
      Severity::Warning => "warning".yellow().bold(),
      Severity::Hint => "hint".blue().bold(),
    };
    println!(
      "  {}:{}  {}  {}  {}",
      diagnostic.line,
      diagnostic.column,
      marker,
      diagnostic.rule.dimmed(),
      diagnostic.message
    );
    for related in &diagnostic.related {
      println!(
        "      {} {}:{}:{} {}",
        "->".dimmed(),
        display(&related.file_path).dimmed(),
        related.line,
        related.column,
        related.message.dimmed()
      );
    }
  }

  println!(
    "\n{} {} issue{} in {} of {} file{} ({}ms)",
    "Total:".bold(),
    stats.total_issues,
    if stats.total_issues == 1 { "" } else { "s" },
    stats.files_with_issues,
    stats.files_analyzed,
    if stats.files_analyzed == 1 { "" } else { "s" },
    stats.duration_ms
  );
}
