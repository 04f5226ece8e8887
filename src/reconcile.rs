use crate::coerce::{coerce_expenditure_row, raw_month_key, ExpenditureRecord, RawExpenditureRow};
use crate::department::DepartmentKey;
use crate::error::Result;
use crate::month::MonthKey;
use crate::revenue::RawRevenueRow;
use log::{info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Everything known about one calendar month after reconciliation.
///
/// `total_expenditure` and `total_employees` are derived: they are always
/// recomputed as sums over the current department entries and are never
/// mutated independently, which is why the fields are private.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthAggregate {
    departments: BTreeMap<DepartmentKey, ExpenditureRecord>,
    total_expenditure: f64,
    total_employees: u32,
    earnings: f64,
}

impl MonthAggregate {
    pub fn departments(&self) -> &BTreeMap<DepartmentKey, ExpenditureRecord> {
        &self.departments
    }

    pub fn record(&self, department: &DepartmentKey) -> Option<&ExpenditureRecord> {
        self.departments.get(department)
    }

    pub fn total_expenditure(&self) -> f64 {
        self.total_expenditure
    }

    pub fn total_employees(&self) -> u32 {
        self.total_employees
    }

    pub fn earnings(&self) -> f64 {
        self.earnings
    }

    fn recompute_totals(&mut self) {
        self.total_expenditure = self.departments.values().map(|r| r.total_with_bonus).sum();
        self.total_employees = self.departments.values().map(|r| r.employee_count).sum();
    }
}

/// Immutable merged snapshot of both sources, indexed by month and
/// department. Built in a single pass per fetch cycle; consumers only
/// read, refreshing means building a brand-new snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciledDataset {
    months: Vec<MonthKey>,
    departments: Vec<DepartmentKey>,
    by_month: BTreeMap<MonthKey, MonthAggregate>,
}

impl ReconciledDataset {
    /// All reconciled months, ascending and deduplicated — the union of
    /// months appearing in either source.
    pub fn months(&self) -> &[MonthKey] {
        &self.months
    }

    /// All departments seen in the expenditure feed, sorted for stable
    /// display order. The grand-total sentinel never appears here.
    pub fn departments(&self) -> &[DepartmentKey] {
        &self.departments
    }

    /// Lookup for one month. Present for every month in `months()`, even
    /// months one source never mentioned.
    pub fn month(&self, month: &MonthKey) -> Option<&MonthAggregate> {
        self.by_month.get(month)
    }

    /// JSON rendering of the whole snapshot for the presentation layer.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Merges the expenditure feed and the revenue table into one
/// `ReconciledDataset`.
///
/// The month set is the union over both raw sources, computed before any
/// coercion so that even rows later skipped (grand-total sentinels) still
/// prove their month exists. Every month gets a pre-initialized aggregate,
/// so downstream lookups never fail. Duplicate rows for the same
/// (month, department) pair keep the later row, with a warning.
///
/// A revenue row whose month cannot be normalized aborts the whole cycle:
/// the static table is trusted content and a bad entry there is a defect,
/// not noise.
pub fn reconcile(
    expenditure_rows: &[RawExpenditureRow],
    revenue_rows: &[RawRevenueRow],
) -> Result<ReconciledDataset> {
    // Normalize revenue months up front so a corrupt static table fails
    // before anything is built.
    let revenue: Vec<(MonthKey, f64)> = revenue_rows
        .iter()
        .map(|row| Ok((MonthKey::canonicalize(&row.month)?, row.parsed_amount())))
        .collect::<Result<_>>()?;

    let mut month_union: BTreeSet<MonthKey> = revenue.iter().map(|(m, _)| *m).collect();
    month_union.extend(expenditure_rows.iter().filter_map(raw_month_key));

    let mut by_month: BTreeMap<MonthKey, MonthAggregate> = month_union
        .into_iter()
        .map(|m| (m, MonthAggregate::default()))
        .collect();

    let mut department_union: BTreeSet<DepartmentKey> = BTreeSet::new();
    let mut kept = 0usize;
    let mut skipped = 0usize;

    for raw in expenditure_rows {
        let Some((month, department, record)) = coerce_expenditure_row(raw) else {
            skipped += 1;
            continue;
        };

        department_union.insert(department.clone());
        let aggregate = by_month
            .get_mut(&month)
            .expect("every coercible month is in the union");
        if aggregate.departments.insert(department.clone(), record).is_some() {
            warn!("Duplicate expenditure row for {month}/{department}; keeping the later one");
        }
        kept += 1;
    }

    for aggregate in by_month.values_mut() {
        aggregate.recompute_totals();
    }

    for (month, amount) in revenue {
        let aggregate = by_month
            .get_mut(&month)
            .expect("every revenue month is in the union");
        aggregate.earnings = amount;
    }

    let months: Vec<MonthKey> = by_month.keys().copied().collect();
    let departments: Vec<DepartmentKey> = department_union.into_iter().collect();

    info!(
        "Reconciled {kept} expenditure rows ({skipped} skipped) across {} months and {} departments",
        months.len(),
        departments.len()
    );

    Ok(ReconciledDataset {
        months,
        departments,
        by_month,
    })
}
