//! Timing and formatting helpers shared by the engine, reporters and assertions

use std::time::{Duration, Instant};

/// Wall-clock stopwatch reporting fractional milliseconds
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    started: Instant,
}

impl Timer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed time since start in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        duration_ms(self.elapsed())
    }
}

/// Convert a duration to fractional milliseconds
pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

/// Render milliseconds with two decimals, e.g. `12.50ms`
pub fn format_ms(ms: f64) -> String {
    format!("{:.2}ms", ms)
}

/// Render a count with thousands separators, e.g. `1,234`
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Side-by-side rendering of an actual/expected pair for failure messages
pub fn difference(actual: &str, expected: &str) -> String {
    let mut out = String::from("Difference (- actual, + expected)\n\n");

    for line in actual.lines() {
        out.push_str("- ");
        out.push_str(line);
        out.push('\n');
    }
    for line in expected.lines() {
        out.push_str("+ ");
        out.push_str(line);
        out.push('\n');
    }

    out.truncate(out.trim_end().len());
    out
}
