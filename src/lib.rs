//! # Expenditure Reconciler
//!
//! A library for reconciling two loosely-correlated monthly financial
//! sources — a row-per-department-per-month payroll/expenditure feed and a
//! static month→revenue table with a different date encoding — into one
//! immutable, queryable time-series structure keyed by month and
//! department.
//!
//! ## Core Concepts
//!
//! - **Month Key**: canonical `YYYY-MM` identifier; both source encodings
//!   normalize into it, and sorting keys sorts months
//! - **Department Key**: canonical short department name; unknown raw
//!   spellings pass through instead of failing
//! - **Coercion**: numeric cells degrade to zero when malformed, rows are
//!   only skipped for structural reasons, and nothing per-row is fatal
//! - **Reconciled Dataset**: the merged snapshot — month union from both
//!   sources, per-month department records, derived totals, earnings
//! - **Query Surface**: read-only range/series/share accessors the
//!   presentation layer consumes; every series carries a `MetricKind` tag
//!
//! ## Example
//!
//! ```rust,ignore
//! use expenditure_reconciler::*;
//!
//! let payload: serde_json::Value = fetch_the_feed_somehow()?;
//! let expenditure = rows_from_payload(payload)?;
//! let revenue = builtin_revenue_rows()?;
//!
//! let dataset = DashboardProcessor::process(&expenditure, &revenue)?;
//!
//! let months = months_in_range(&dataset, RangeSpec::LastN(12));
//! let totals: Vec<f64> =
//!     series_for(&dataset, months, &Metric::TotalExpenditure, &DepartmentFilter::All)
//!         .collect();
//! ```

pub mod coerce;
pub mod config;
pub mod department;
pub mod error;
pub mod feed;
pub mod format;
pub mod metrics;
pub mod month;
pub mod query;
pub mod reconcile;
pub mod revenue;

pub use coerce::{coerce_expenditure_row, ExpenditureRecord, RawExpenditureRow};
pub use config::{feed_row_schema, DashboardConfig};
pub use department::DepartmentKey;
pub use error::{DashboardError, Result};
#[cfg(feature = "fetch")]
pub use feed::fetch_expenditure_rows;
pub use feed::rows_from_payload;
pub use format::{format_brl, format_count, format_metric, format_percentage, month_label, month_label_short};
pub use metrics::{
    derived_series, derived_value, DerivedMetric, HeadcountBasis, MetricKind, MetricSeries,
};
pub use month::MonthKey;
pub use query::{
    department_share, months_in_range, series_for, DepartmentFilter, Metric, RangeSpec, ShareBasis,
};
pub use reconcile::{reconcile, MonthAggregate, ReconciledDataset};
pub use revenue::{builtin_revenue_rows, parse_revenue_csv, RawRevenueRow};

use log::{info, warn};
use std::sync::Arc;

pub struct DashboardProcessor;

impl DashboardProcessor {
    /// Runs one full reconciliation cycle over already-parsed rows.
    pub fn process(
        expenditure_rows: &[RawExpenditureRow],
        revenue_rows: &[RawRevenueRow],
    ) -> Result<ReconciledDataset> {
        info!(
            "Reconciling {} expenditure rows against {} revenue rows",
            expenditure_rows.len(),
            revenue_rows.len()
        );
        reconcile(expenditure_rows, revenue_rows)
    }

    /// Convenience entry point for a raw feed payload: validates the
    /// payload shape, then reconciles against the given revenue table.
    pub fn process_payload(
        payload: serde_json::Value,
        revenue_rows: &[RawRevenueRow],
    ) -> Result<ReconciledDataset> {
        let expenditure_rows = rows_from_payload(payload)?;
        Self::process(&expenditure_rows, revenue_rows)
    }
}

/// See [`DashboardProcessor::process`].
pub fn build_dashboard_dataset(
    expenditure_rows: &[RawExpenditureRow],
    revenue_rows: &[RawRevenueRow],
) -> Result<ReconciledDataset> {
    DashboardProcessor::process(expenditure_rows, revenue_rows)
}

/// What the presentation layer currently holds.
///
/// Construction is rebuild-from-scratch: a successful cycle swaps in a
/// brand-new immutable snapshot, a failed cycle records the error while
/// leaving the previous snapshot (if any) readable. Nothing is ever
/// mutated in place underneath a reader.
#[derive(Debug, Clone, Default)]
pub enum DashboardState {
    /// No cycle has completed yet.
    #[default]
    NotReady,
    Ready(Arc<ReconciledDataset>),
    Failed {
        message: String,
        previous: Option<Arc<ReconciledDataset>>,
    },
}

impl DashboardState {
    /// Consumes the outcome of a fetch-and-merge cycle and returns the
    /// next state.
    pub fn refreshed(self, outcome: Result<ReconciledDataset>) -> Self {
        match outcome {
            Ok(dataset) => Self::Ready(Arc::new(dataset)),
            Err(e) => {
                warn!("Dashboard cycle failed, keeping previous snapshot: {e}");
                let previous = match self {
                    Self::Ready(dataset) => Some(dataset),
                    Self::Failed { previous, .. } => previous,
                    Self::NotReady => None,
                };
                Self::Failed {
                    message: e.to_string(),
                    previous,
                }
            }
        }
    }

    /// The newest complete snapshot, if any cycle ever succeeded.
    pub fn dataset(&self) -> Option<&Arc<ReconciledDataset>> {
        match self {
            Self::Ready(dataset) => Some(dataset),
            Self::Failed { previous, .. } => previous.as_ref(),
            Self::NotReady => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> serde_json::Value {
        json!([
            {
                "Month": "2024-09",
                "Department": "Operação Geral",
                "Total": 8000.0,
                "Bonificacao 20": 400.0,
                "Employee Count": 10
            },
            {
                "Month": "2024-09",
                "Department": "Total Geral",
                "Total Geral": 8400.0
            },
        ])
    }

    #[test]
    fn test_end_to_end_processing() {
        let dataset =
            DashboardProcessor::process_payload(sample_payload(), &builtin_revenue_rows().unwrap())
                .unwrap();

        // 2024-09 through 2025-07 from the revenue table.
        assert_eq!(dataset.months().len(), 11);

        let sep = dataset.month(&"2024-09".parse().unwrap()).unwrap();
        assert_eq!(sep.total_expenditure(), 8400.0);
        assert_eq!(sep.earnings(), 623_628.74);
        assert_eq!(dataset.departments().len(), 1);
    }

    #[test]
    fn test_state_swaps_on_success_and_holds_on_failure() {
        let state = DashboardState::default();
        assert!(state.dataset().is_none());
        assert!(!state.is_ready());

        let state = state.refreshed(DashboardProcessor::process_payload(
            sample_payload(),
            &builtin_revenue_rows().unwrap(),
        ));
        assert!(state.is_ready());
        let first = Arc::clone(state.dataset().unwrap());

        // A failed cycle keeps the previous snapshot readable and records
        // the error.
        let state = state.refreshed(DashboardProcessor::process_payload(
            json!({"not": "an array"}),
            &[],
        ));
        assert!(!state.is_ready());
        assert!(state.error_message().unwrap().contains("Invalid feed format"));
        assert!(Arc::ptr_eq(state.dataset().unwrap(), &first));

        // Recovery swaps a fresh snapshot in.
        let state = state.refreshed(DashboardProcessor::process_payload(sample_payload(), &[]));
        assert!(state.is_ready());
        assert!(!Arc::ptr_eq(state.dataset().unwrap(), &first));
    }

    #[test]
    fn test_failure_before_first_success_has_no_dataset() {
        let state = DashboardState::default()
            .refreshed(DashboardProcessor::process_payload(json!(null), &[]));
        assert!(state.dataset().is_none());
        assert!(state.error_message().is_some());
    }
}
