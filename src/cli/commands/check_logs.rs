//! dockhand check-logs - Tail a container's logs and look for error keywords.
//!
//! Detection is a case-sensitive substring test; it only changes what is
//! printed, never the exit status.

use std::fmt::Write as _;

use console::style;

use crate::config::AppConfig;
use crate::connector::ssh::{self, RemoteSession, SessionGuard};
use crate::error::Result;
use crate::ssh::CommandOutput;

pub const DEFAULT_LINES: usize = 50;

/// Most matching lines shown in a report.
pub const MAX_REPORTED_LINES: usize = 10;

/// Matched case-sensitively: `fatal` hits, `Fatal` and `FATAL` do not.
pub const ERROR_KEYWORDS: [&str; 6] = [
    "Error",
    "Exception",
    "Traceback",
    "FAILED",
    "CRITICAL",
    "fatal",
];

pub fn logs_command(container: &str, lines: usize) -> String {
    format!("docker logs {} --tail {}", container, lines)
}

pub fn contains_keyword(text: &str) -> bool {
    ERROR_KEYWORDS.iter().any(|kw| text.contains(kw))
}

/// Result of scanning one command's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogScan {
    pub has_errors: bool,
    /// First matching lines, in order, at most [`MAX_REPORTED_LINES`].
    pub error_lines: Vec<String>,
}

/// Scan stdout and stderr for error keywords.
///
/// The flag is decided per stream. Lines are collected from stdout and
/// stderr joined with no separator, so the last stdout line and the first
/// stderr line form a single line.
pub fn scan_logs(stdout: &str, stderr: &str) -> LogScan {
    let has_errors = contains_keyword(stdout) || contains_keyword(stderr);
    if !has_errors {
        return LogScan::default();
    }

    let combined = format!("{}{}", stdout, stderr);
    let error_lines = combined
        .split('\n')
        .filter(|line| contains_keyword(line))
        .take(MAX_REPORTED_LINES)
        .map(str::to_string)
        .collect();

    LogScan {
        has_errors,
        error_lines,
    }
}

/// Everything the check-logs command prints.
#[derive(Debug, Clone)]
pub struct LogReport {
    pub container: String,
    pub lines: usize,
    pub output: CommandOutput,
    pub scan: LogScan,
}

impl LogReport {
    pub fn new(container: impl Into<String>, lines: usize, output: CommandOutput) -> Self {
        let scan = scan_logs(&output.stdout, &output.stderr);
        Self {
            container: container.into(),
            lines,
            output,
            scan,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{}",
            style(format!(
                "=== LOGS: {} (last {} lines) ===",
                self.container, self.lines
            ))
            .cyan()
            .bold()
        );
        let _ = writeln!(out, "{}", self.output.stdout);

        if !self.output.stderr.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", style("=== STDERR ===").yellow().bold());
            let _ = writeln!(out, "{}", self.output.stderr);
        }

        let _ = writeln!(out);
        if self.scan.has_errors {
            let _ = writeln!(
                out,
                "{} {}",
                style("!").yellow().bold(),
                style("WARNING: Errors detected in logs!").yellow()
            );
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", style("Error lines:").bold());
            for line in &self.scan.error_lines {
                let _ = writeln!(out, "  {}", style(line).red());
            }
        } else {
            let _ = writeln!(out, "{} No errors detected", style("✓").green().bold());
        }

        out
    }
}

/// Execute the check-logs command.
pub async fn execute(config: &AppConfig, container: Option<String>, lines: usize) -> Result<()> {
    config.validate()?;
    let container = container
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| config.container.clone());

    println!(
        "{} Connecting to {}...",
        style("→").cyan().bold(),
        style(&config.host).white().bold()
    );
    let client = ssh::connect(config).await?;
    println!("{} Connected", style("✓").green().bold());
    println!();

    let guard = SessionGuard::new(client);
    let outcome = fetch(guard.session(), &container, lines).await;
    let report = guard.finish(outcome).await?;

    print!("{}", report.render());
    Ok(())
}

/// Fetch the last `lines` log lines of `container` and scan them.
pub async fn fetch<S: RemoteSession + ?Sized>(
    session: &S,
    container: &str,
    lines: usize,
) -> Result<LogReport> {
    let output = session.exec(&logs_command(container, lines)).await?;
    Ok(LogReport::new(container, lines, output))
}
