//! Terminal output for neon-build.
//!
//! Status lines go to stdout, problems to stderr; color is only used when the
//! stream supports it.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

/// Width labels are padded to in [`print_stat`].
const LABEL_WIDTH: usize = 14;

/// Library sizes: cdylibs range from KBs (release) to hundreds of MBs (debug).
pub fn format_bytes(bytes: u64) -> String {
  const UNITS: [&str; 3] = ["KB", "MB", "GB"];

  if bytes < 1024 {
    return format!("{bytes} B");
  }
  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit < UNITS.len() - 1 {
    value /= 1024.0;
    unit += 1;
  }
  format!("{value:.1} {}", UNITS[unit])
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  match secs {
    0 => format!("{}ms", duration.subsec_millis()),
    1..60 => format!("{}.{:02}s", secs, duration.subsec_millis() / 10),
    _ => format!("{}m {}s", secs / 60, secs % 60),
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {message}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {message}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue())
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

/// Print an indented `label: value` line with aligned values.
pub fn print_stat(label: &str, value: &str) {
  let label = format!("{:<width$}", format!("{label}:"), width = LABEL_WIDTH);
  println!("  {} {value}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()));
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{json}");
  Ok(())
}
