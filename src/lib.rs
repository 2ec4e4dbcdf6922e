//! # Shuttle Stats
//!
//! Head-to-head statistics for a badminton club, rendered to a static dashboard.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, games, derived statistics)
//! - **ingest**: CSV loading and row validation
//! - **calculate**: Pairwise table, leaderboards and daily series
//! - **render**: Self-contained HTML dashboard
//! - **storage**: Output artifacts on disk
//! - **config**: Configuration loading and validation
//! - **generate**: Mock datasets

pub mod calculate;
pub mod config;
pub mod generate;
pub mod ingest;
pub mod models;
pub mod render;
pub mod storage;

pub use models::*;

use chrono::NaiveDate;

/// Parse a CLI date argument (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Format an optional number for terminal tables, `-` when undefined.
pub fn format_optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-08-20"), NaiveDate::from_ymd_opt(2024, 8, 20));
        assert_eq!(parse_date(" 2024-12-01 "), NaiveDate::from_ymd_opt(2024, 12, 1));
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date("20/08/2024"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(66.6667), 1), "66.7");
        assert_eq!(format_optional(Some(-3.0), 2), "-3.00");
        assert_eq!(format_optional(None, 1), "-");
    }
}
