use crate::metrics::MetricKind;
use crate::month::MonthKey;
use num_format::{Locale, ToFormattedString};

const MONTH_NAMES_PT: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

/// Full display label for a month, e.g. `2024-09` → `"Setembro/2024"`.
pub fn month_label(month: &MonthKey) -> String {
    let name = MONTH_NAMES_PT[(month.month() - 1) as usize];
    format!("{}/{}", name, month.year())
}

/// Compact axis label, e.g. `2024-09` → `"09/24"`.
pub fn month_label_short(month: &MonthKey) -> String {
    format!("{:02}/{:02}", month.month(), month.year().rem_euclid(100))
}

/// Formats a value as Brazilian currency: `623628.74` → `"R$ 623.628,74"`.
/// Grouping dots come from the pt locale; the cent part is fixed at two
/// digits.
pub fn format_brl(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as i64;
    let grouped = (cents / 100).to_formatted_string(&Locale::pt);
    let magnitude = format!("R$ {},{:02}", grouped, cents % 100);
    if negative {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

/// Formats a headcount-style value with grouping and no decimals.
pub fn format_count(value: f64) -> String {
    (value.round() as i64).to_formatted_string(&Locale::pt)
}

/// Formats a ratio as a percentage with two decimals: `0.125` → `"12.50%"`.
pub fn format_percentage(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Renders a value according to its series' `MetricKind` tag.
pub fn format_metric(value: f64, kind: MetricKind) -> String {
    match kind {
        MetricKind::Currency => format_brl(value),
        MetricKind::Count => format_count(value),
        MetricKind::Percentage => format_percentage(value),
    }
}
