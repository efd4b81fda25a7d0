//! Cross-source comparison of key metrics (diagnostic only)

use crate::{CompanyOverview, DataSource};
use serde::Serialize;
use std::fmt;

/// Relative difference below which two values are considered the same
pub const DEFAULT_TOLERANCE_PCT: f64 = 5.0;

/// Verdict for one metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Close,
    Different,
    FormatError,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Close => "close",
            Self::Different => "different",
            Self::FormatError => "format_error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric: &'static str,
    pub left: String,
    pub right: String,
    /// `None` when either side is not numeric
    pub difference_pct: Option<f64>,
    pub status: MatchStatus,
}

/// Result of comparing two sources for one symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceComparison {
    pub symbol: String,
    pub left: DataSource,
    pub right: DataSource,
    pub tolerance_pct: f64,
    pub metrics: Vec<MetricComparison>,
}

impl SourceComparison {
    pub fn count(&self, status: MatchStatus) -> usize {
        self.metrics.iter().filter(|m| m.status == status).count()
    }
}

/// Compare one metric reported by two sources
///
/// The difference is relative to `left`; a zero `left` yields 0%. Values that
/// do not parse as numbers are a [`MatchStatus::FormatError`].
pub fn compare_metric(metric: &'static str, left: &str, right: &str, tolerance_pct: f64) -> MetricComparison {
    let parsed = (left.trim().parse::<f64>(), right.trim().parse::<f64>());
    let (difference_pct, status) = match parsed {
        (Ok(a), Ok(b)) if a.is_finite() && b.is_finite() => {
            let diff = if a == 0.0 { 0.0 } else { (a - b).abs() / a.abs() * 100.0 };
            let status = if diff < tolerance_pct {
                MatchStatus::Close
            } else {
                MatchStatus::Different
            };
            (Some(diff), status)
        }
        _ => (None, MatchStatus::FormatError),
    };

    MetricComparison {
        metric,
        left: left.to_string(),
        right: right.to_string(),
        difference_pct,
        status,
    }
}

/// Compare market cap, P/E, beta, EPS and book value of two overviews
///
/// Metrics missing from either side are left out.
pub fn cross_validate(left: &CompanyOverview, right: &CompanyOverview, tolerance_pct: f64) -> Vec<MetricComparison> {
    let pairs: [(&'static str, &Option<String>, &Option<String>); 5] = [
        ("market_cap", &left.market_cap, &right.market_cap),
        ("pe_ratio", &left.pe_ratio, &right.pe_ratio),
        ("beta", &left.beta, &right.beta),
        ("eps", &left.eps, &right.eps),
        ("book_value", &left.book_value, &right.book_value),
    ];

    pairs
        .into_iter()
        .filter_map(|(metric, a, b)| Some(compare_metric(metric, a.as_deref()?, b.as_deref()?, tolerance_pct)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_and_different() {
        let close = compare_metric("beta", "1.00", "1.04", DEFAULT_TOLERANCE_PCT);
        assert_eq!(close.status, MatchStatus::Close);
        assert!((close.difference_pct.unwrap() - 4.0).abs() < 1e-9);

        let different = compare_metric("beta", "1.00", "1.05", DEFAULT_TOLERANCE_PCT);
        assert_eq!(different.status, MatchStatus::Different);
    }

    #[test]
    fn test_zero_reference_is_zero_difference() {
        let m = compare_metric("eps", "0", "3.5", DEFAULT_TOLERANCE_PCT);
        assert_eq!(m.difference_pct, Some(0.0));
        assert_eq!(m.status, MatchStatus::Close);
    }

    #[test]
    fn test_non_numeric_is_format_error() {
        let m = compare_metric("pe_ratio", "None", "4.2", DEFAULT_TOLERANCE_PCT);
        assert_eq!(m.status, MatchStatus::FormatError);
        assert_eq!(m.difference_pct, None);
    }

    #[test]
    fn test_tolerance_is_configurable() {
        assert_eq!(compare_metric("beta", "1.0", "1.08", 10.0).status, MatchStatus::Close);
    }

    #[test]
    fn test_cross_validate_skips_missing() {
        let left = CompanyOverview {
            market_cap: Some("1000".into()),
            pe_ratio: Some("10".into()),
            beta: Some("abc".into()),
            ..CompanyOverview::default()
        };
        let right = CompanyOverview {
            market_cap: Some("1010".into()),
            pe_ratio: Some("12".into()),
            beta: Some("1.1".into()),
            eps: Some("2".into()),
            ..CompanyOverview::default()
        };

        let metrics = cross_validate(&left, &right, DEFAULT_TOLERANCE_PCT);
        let statuses: Vec<_> = metrics.iter().map(|m| (m.metric, m.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("market_cap", MatchStatus::Close),
                ("pe_ratio", MatchStatus::Different),
                ("beta", MatchStatus::FormatError),
            ]
        );
    }
}
