use crate::department::DepartmentKey;
use crate::month::MonthKey;
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the spreadsheet-backed expenditure feed, field names exactly
/// as the API emits them. Every numeric field may arrive as a number, a
/// numeric string, or be missing entirely, so fields stay as raw JSON
/// values until coercion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RawExpenditureRow {
    #[serde(rename = "Month", default)]
    pub month: Value,

    #[serde(rename = "Department", default)]
    pub department: Value,

    #[serde(rename = "Total", default)]
    pub total: Value,

    #[serde(rename = "Bonificacao 20", default)]
    pub bonus: Value,

    #[serde(rename = "Employee Count", default)]
    pub employee_count: Value,

    /// Pre-summed grand total, optional in the source.
    #[serde(rename = "Total Geral", default)]
    pub grand_total: Value,
}

/// Validated per-(month, department) expenditure figures. All fields are
/// zero-defaulted: bad cells degrade, they never reject the record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenditureRecord {
    pub total_before_bonus: f64,
    pub bonus: f64,
    pub employee_count: u32,
    pub total_with_bonus: f64,
}

/// Parse a raw JSON value into `f64` while being forgiving about the
/// formatting the spreadsheet emits: plain numbers, numeric strings with
/// surrounding whitespace, and pt-BR currency strings (`R$ 1.234,56`).
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

pub(crate) fn parse_numeric_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }

    // Locale fallback: strip the currency symbol, spaces and grouping
    // dots, then treat the comma as the decimal separator.
    let cleaned: String = s
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '"')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Integer variant: truncates fractional input, floors negatives at zero.
pub fn parse_count(value: &Value) -> Option<u32> {
    let v = parse_number(value)?;
    if !v.is_finite() {
        return None;
    }
    Some(v.trunc().max(0.0) as u32)
}

fn numeric_or_zero(name: &str, value: &Value) -> f64 {
    if value.is_null() {
        return 0.0;
    }
    match parse_number(value) {
        Some(v) => v,
        None => {
            debug!("Coercing unparseable {name} field {value:?} to 0");
            0.0
        }
    }
}

/// The month key of a raw row, if it has one. Used for the month union,
/// which includes rows that coercion later skips (a grand-total row still
/// proves its month exists).
pub fn raw_month_key(raw: &RawExpenditureRow) -> Option<MonthKey> {
    raw.month
        .as_str()
        .and_then(|s| MonthKey::canonicalize(s).ok())
}

/// Coerces one raw feed row into a keyed record.
///
/// Returns `None` (contributing nothing to any aggregate) when the row is
/// a grand-total sentinel, or when its month/department cannot be read at
/// all. Bad numeric cells degrade to zero instead; a single malformed row
/// never aborts the cycle.
pub fn coerce_expenditure_row(
    raw: &RawExpenditureRow,
) -> Option<(MonthKey, DepartmentKey, ExpenditureRecord)> {
    let month = match raw_month_key(raw) {
        Some(month) => month,
        None => {
            warn!("Skipping expenditure row without a readable month: {:?}", raw.month);
            return None;
        }
    };

    let department = match raw.department.as_str() {
        Some(name) => DepartmentKey::resolve(name),
        None => {
            warn!("Skipping {month} expenditure row without a department");
            return None;
        }
    };

    if department.is_grand_total() {
        debug!("Skipping pre-aggregated grand-total row for {month}");
        return None;
    }

    let total_before_bonus = numeric_or_zero("Total", &raw.total);
    let bonus = numeric_or_zero("Bonificacao 20", &raw.bonus);
    let employee_count = parse_count(&raw.employee_count).unwrap_or(0);
    let total_with_bonus = match parse_number(&raw.grand_total) {
        Some(v) => v,
        None => total_before_bonus + bonus,
    };

    Some((
        month,
        department,
        ExpenditureRecord {
            total_before_bonus,
            bonus,
            employee_count,
            total_with_bonus,
        },
    ))
}
