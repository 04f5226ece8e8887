use crate::department::DepartmentKey;
use crate::month::MonthKey;
use crate::reconcile::{MonthAggregate, ReconciledDataset};
use serde::{Deserialize, Serialize};

/// How a series of values should be rendered. Decided at construction
/// time and carried with the series; formatting dispatches on this tag,
/// never on label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Currency,
    Count,
    Percentage,
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Currency => write!(f, "currency"),
            Self::Count => write!(f, "count"),
            Self::Percentage => write!(f, "percentage"),
        }
    }
}

/// Which headcount divides the earnings-per-employee figure: the whole
/// company, or a single department (typically the one denoting core
/// operations, configured in `DashboardConfig` rather than hardcoded).
#[derive(Debug, Clone, PartialEq)]
pub enum HeadcountBasis {
    Company,
    Department(DepartmentKey),
}

/// Per-month figures derived from an aggregate rather than stored in it.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedMetric {
    /// Earnings minus total expenditure.
    NetResult,
    /// Net result over earnings, as a ratio; 0 when earnings are 0.
    ProfitMargin,
    /// Total expenditure over total employees; 0 when there are none.
    ExpenditurePerEmployee,
    /// Earnings over the chosen headcount; 0 when it is 0.
    EarningsPerEmployee(HeadcountBasis),
}

impl DerivedMetric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Self::NetResult => MetricKind::Currency,
            Self::ProfitMargin => MetricKind::Percentage,
            Self::ExpenditurePerEmployee => MetricKind::Currency,
            Self::EarningsPerEmployee(_) => MetricKind::Currency,
        }
    }
}

/// A metric evaluated over an ordered month subsequence, tagged with its
/// rendering kind. Ratios stay ratios here; scaling to percent happens in
/// formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub kind: MetricKind,
    pub values: Vec<f64>,
}

pub fn net_result(aggregate: &MonthAggregate) -> f64 {
    aggregate.earnings() - aggregate.total_expenditure()
}

pub fn profit_margin(aggregate: &MonthAggregate) -> f64 {
    let earnings = aggregate.earnings();
    if earnings > 0.0 {
        net_result(aggregate) / earnings
    } else {
        0.0
    }
}

pub fn expenditure_per_employee(aggregate: &MonthAggregate) -> f64 {
    let employees = aggregate.total_employees();
    if employees > 0 {
        aggregate.total_expenditure() / employees as f64
    } else {
        0.0
    }
}

pub fn earnings_per_employee(aggregate: &MonthAggregate, basis: &HeadcountBasis) -> f64 {
    let headcount = match basis {
        HeadcountBasis::Company => aggregate.total_employees(),
        HeadcountBasis::Department(department) => aggregate
            .record(department)
            .map(|r| r.employee_count)
            .unwrap_or(0),
    };
    if headcount > 0 {
        aggregate.earnings() / headcount as f64
    } else {
        0.0
    }
}

pub fn derived_value(aggregate: &MonthAggregate, metric: &DerivedMetric) -> f64 {
    match metric {
        DerivedMetric::NetResult => net_result(aggregate),
        DerivedMetric::ProfitMargin => profit_margin(aggregate),
        DerivedMetric::ExpenditurePerEmployee => expenditure_per_employee(aggregate),
        DerivedMetric::EarningsPerEmployee(basis) => earnings_per_employee(aggregate, basis),
    }
}

/// Evaluates a derived metric over an ordered month subsequence. Months
/// missing from the dataset yield 0.
pub fn derived_series(
    dataset: &ReconciledDataset,
    months: &[MonthKey],
    metric: &DerivedMetric,
) -> MetricSeries {
    let values = months
        .iter()
        .map(|month| match dataset.month(month) {
            Some(aggregate) => derived_value(aggregate, metric),
            None => 0.0,
        })
        .collect();

    MetricSeries {
        kind: metric.kind(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
    use crate::revenue::RawRevenueRow;
    use serde_json::json;

    fn dataset() -> ReconciledDataset {
        let expenditure = vec![
            serde_json::from_value(json!({
                "Month": "2024-09",
                "Department": "Operação Geral",
                "Total": 8000.0,
                "Bonificacao 20": 0.0,
                "Employee Count": 10,
            }))
            .unwrap(),
            serde_json::from_value(json!({
                "Month": "2024-09",
                "Department": "Diretoria",
                "Total": 2000.0,
                "Bonificacao 20": 0.0,
                "Employee Count": 2,
            }))
            .unwrap(),
        ];
        let revenue = vec![RawRevenueRow {
            month: "set.-24".to_string(),
            amount: "R$ 12.000,00".to_string(),
        }];
        reconcile(&expenditure, &revenue).unwrap()
    }

    #[test]
    fn test_net_result_and_margin() {
        let dataset = dataset();
        let sep = dataset.month(&"2024-09".parse().unwrap()).unwrap();
        assert_eq!(net_result(sep), 2000.0);
        assert!((profit_margin(sep) - 2000.0 / 12000.0).abs() < 1e-12);
    }

    #[test]
    fn test_margin_is_zero_without_earnings() {
        let dataset = reconcile(
            &[serde_json::from_value(json!({
                "Month": "2024-09",
                "Department": "Apoio",
                "Total": 100.0,
            }))
            .unwrap()],
            &[],
        )
        .unwrap();
        let sep = dataset.month(&"2024-09".parse().unwrap()).unwrap();
        assert_eq!(profit_margin(sep), 0.0);
        assert_eq!(net_result(sep), -100.0);
    }

    #[test]
    fn test_per_employee_figures_guard_division() {
        let dataset = dataset();
        let sep = dataset.month(&"2024-09".parse().unwrap()).unwrap();
        assert!((expenditure_per_employee(sep) - 10000.0 / 12.0).abs() < 1e-9);
        assert_eq!(earnings_per_employee(sep, &HeadcountBasis::Company), 1000.0);

        let operations = HeadcountBasis::Department(DepartmentKey::resolve("Operação"));
        assert_eq!(earnings_per_employee(sep, &operations), 1200.0);

        let absent = HeadcountBasis::Department(DepartmentKey::resolve("Marketing"));
        assert_eq!(earnings_per_employee(sep, &absent), 0.0);
    }

    #[test]
    fn test_derived_series_carries_its_kind() {
        let dataset = dataset();
        let months: Vec<_> = dataset.months().to_vec();

        let margin = derived_series(&dataset, &months, &DerivedMetric::ProfitMargin);
        assert_eq!(margin.kind, MetricKind::Percentage);
        assert_eq!(margin.values.len(), 1);

        let net = derived_series(&dataset, &months, &DerivedMetric::NetResult);
        assert_eq!(net.kind, MetricKind::Currency);
        assert_eq!(net.values, vec![2000.0]);
    }
}
