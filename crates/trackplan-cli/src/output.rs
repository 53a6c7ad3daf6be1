//! Output formatting utilities

use std::time::Duration;

use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Pretty JSON for machine-readable output
pub fn to_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

/// "1 event", "2 events"
pub fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

/// Elapsed time in seconds with millisecond precision
pub fn seconds(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    let unit = if (secs - 1.0).abs() < f64::EPSILON { "second" } else { "seconds" };
    format!("{:.3} {}", secs, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::from("whatever"), OutputFormat::Table);
    }

    #[test]
    fn test_count_and_seconds() {
        assert_eq!(count(1, "event"), "1 event");
        assert_eq!(count(0, "parameter"), "0 parameters");
        assert_eq!(count(3, "YAML file"), "3 YAML files");
        assert_eq!(seconds(Duration::from_millis(1500)), "1.500 seconds");
        assert_eq!(seconds(Duration::from_secs(1)), "1.000 second");
    }
}
