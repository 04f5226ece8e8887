use crate::department::DepartmentKey;
use crate::metrics::MetricKind;
use crate::month::MonthKey;
use crate::reconcile::ReconciledDataset;

/// Which slice of the month sequence a consumer wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// Every reconciled month.
    All,
    /// The most recent N months, still in ascending order. Asking for
    /// more months than exist returns all of them.
    LastN(usize),
}

/// A stored per-month metric, directly readable from the aggregates.
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    TotalExpenditure,
    TotalEmployees,
    Earnings,
    DepartmentExpenditure(DepartmentKey),
    DepartmentHeadcount(DepartmentKey),
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Self::TotalExpenditure | Self::Earnings | Self::DepartmentExpenditure(_) => {
                MetricKind::Currency
            }
            Self::TotalEmployees | Self::DepartmentHeadcount(_) => MetricKind::Count,
        }
    }
}

/// Restricts which departments contribute to the aggregate metrics.
/// Department-specific metrics already name their department and ignore
/// the filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DepartmentFilter {
    #[default]
    All,
    Selected(Vec<DepartmentKey>),
}

/// The ordered month slice selected by `range`. Never errors: an
/// oversized N clamps to the full sequence.
pub fn months_in_range(dataset: &ReconciledDataset, range: RangeSpec) -> &[MonthKey] {
    let months = dataset.months();
    match range {
        RangeSpec::All => months,
        RangeSpec::LastN(n) => &months[months.len().saturating_sub(n)..],
    }
}

/// Lazily evaluates a metric over an ordered month subsequence, one value
/// per month. A month missing from the dataset, or a department missing
/// from a month, yields 0 — never an error.
pub fn series_for<'a>(
    dataset: &'a ReconciledDataset,
    months: &'a [MonthKey],
    metric: &'a Metric,
    filter: &'a DepartmentFilter,
) -> impl Iterator<Item = f64> + 'a {
    months
        .iter()
        .map(move |month| value_for(dataset, month, metric, filter))
}

fn value_for(
    dataset: &ReconciledDataset,
    month: &MonthKey,
    metric: &Metric,
    filter: &DepartmentFilter,
) -> f64 {
    let Some(aggregate) = dataset.month(month) else {
        return 0.0;
    };

    match metric {
        Metric::Earnings => aggregate.earnings(),
        Metric::TotalExpenditure => match filter {
            DepartmentFilter::All => aggregate.total_expenditure(),
            DepartmentFilter::Selected(departments) => departments
                .iter()
                .map(|d| aggregate.record(d).map(|r| r.total_with_bonus).unwrap_or(0.0))
                .sum(),
        },
        Metric::TotalEmployees => match filter {
            DepartmentFilter::All => aggregate.total_employees() as f64,
            DepartmentFilter::Selected(departments) => departments
                .iter()
                .map(|d| {
                    aggregate
                        .record(d)
                        .map(|r| r.employee_count as f64)
                        .unwrap_or(0.0)
                })
                .sum(),
        },
        Metric::DepartmentExpenditure(department) => aggregate
            .record(department)
            .map(|r| r.total_with_bonus)
            .unwrap_or(0.0),
        Metric::DepartmentHeadcount(department) => aggregate
            .record(department)
            .map(|r| r.employee_count as f64)
            .unwrap_or(0.0),
    }
}

/// Denominator choice for `department_share`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareBasis {
    /// Share of the month's total expenditure.
    TotalExpenditure,
    /// Share of the month's earnings (how much of the revenue this
    /// department's costs consume).
    Earnings,
}

/// One department's `total_with_bonus` as a ratio of the chosen
/// denominator. A zero denominator defaults to 1, so a department with no
/// costs in a month with no denominator contributes exactly 0 — never NaN.
pub fn department_share(
    dataset: &ReconciledDataset,
    month: &MonthKey,
    department: &DepartmentKey,
    basis: ShareBasis,
) -> f64 {
    let Some(aggregate) = dataset.month(month) else {
        return 0.0;
    };

    let numerator = aggregate
        .record(department)
        .map(|r| r.total_with_bonus)
        .unwrap_or(0.0);
    let denominator = match basis {
        ShareBasis::TotalExpenditure => aggregate.total_expenditure(),
        ShareBasis::Earnings => aggregate.earnings(),
    };
    let denominator = if denominator == 0.0 { 1.0 } else { denominator };

    numerator / denominator
}
