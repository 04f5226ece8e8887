use crate::error::{DashboardError, Result};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical calendar-month key. Renders as `YYYY-MM`, and the derived
/// ordering matches chronology, so sorted keys are sorted months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

/// pt-BR month abbreviations as they appear in the revenue table, in
/// calendar order ("set." is September, not a typo).
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Two-digit years below this pivot resolve to 20YY, the rest to 19YY.
/// Fixed rather than wall-clock-relative so conversion is deterministic.
const CENTURY_PIVOT: u32 = 50;

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Converts either month encoding used by the two sources into the
    /// canonical key:
    ///
    /// - `"2024-09"` (the feed's encoding) passes through unchanged, which
    ///   makes canonicalization idempotent;
    /// - `"set.-24"` (the revenue table's pt-BR encoding) is resolved via
    ///   the abbreviation table and the fixed century pivot.
    ///
    /// Anything else is an error: a bad abbreviation means the static
    /// revenue table itself is corrupt, which should fail loudly rather
    /// than degrade.
    pub fn canonicalize(input: &str) -> Result<Self> {
        let input = input.trim();

        if let Some(key) = Self::parse_canonical(input) {
            return Ok(key);
        }
        if let Some(key) = Self::parse_locale_abbrev(input) {
            return Ok(key);
        }

        Err(DashboardError::UnrecognizedMonthAbbreviation(
            input.to_string(),
        ))
    }

    /// Strict `YYYY-MM` parse: four-digit year, two-digit month, 01-12.
    fn parse_canonical(input: &str) -> Option<Self> {
        let (year, month) = input.split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        if !year.bytes().all(|b| b.is_ascii_digit()) || !month.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    /// `<abbrev>.-<YY>` parse, case-insensitive, tolerant of a missing
    /// trailing dot on the abbreviation.
    fn parse_locale_abbrev(input: &str) -> Option<Self> {
        let (abbrev, year_short) = input.split_once('-')?;
        let abbrev = abbrev.trim().trim_end_matches('.').to_lowercase();
        let index = MONTH_ABBREVIATIONS.iter().position(|a| *a == abbrev)?;

        let year_short = year_short.trim();
        if year_short.len() != 2 || !year_short.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let yy: u32 = year_short.parse().ok()?;
        let year = if yy < CENTURY_PIVOT {
            2000 + yy as i32
        } else {
            1900 + yy as i32
        };

        Self::new(year, index as u32 + 1)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("month key holds a valid year/month pair")
    }

    pub fn last_day(&self) -> NaiveDate {
        let next_month = if self.month == 12 { 1 } else { self.month + 1 };
        let next_year = if self.month == 12 {
            self.year + 1
        } else {
            self.year
        };

        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .expect("month key holds a valid year/month pair")
            .checked_sub_days(Days::new(1))
            .expect("first of a month always has a predecessor")
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::canonicalize(s)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::canonicalize(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_twelve_abbreviations() {
        let expected = [
            ("jan.-24", "2024-01"),
            ("fev.-24", "2024-02"),
            ("mar.-24", "2024-03"),
            ("abr.-24", "2024-04"),
            ("mai.-24", "2024-05"),
            ("jun.-24", "2024-06"),
            ("jul.-24", "2024-07"),
            ("ago.-24", "2024-08"),
            ("set.-24", "2024-09"),
            ("out.-24", "2024-10"),
            ("nov.-24", "2024-11"),
            ("dez.-24", "2024-12"),
        ];
        for (input, canonical) in expected {
            assert_eq!(MonthKey::canonicalize(input).unwrap().to_string(), canonical);
        }
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        let first = MonthKey::canonicalize("set.-24").unwrap();
        let second = MonthKey::canonicalize(&first.to_string()).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.to_string(), "2024-09");
    }

    #[test]
    fn test_century_pivot_boundary() {
        assert_eq!(MonthKey::canonicalize("jan.-49").unwrap().to_string(), "2049-01");
        assert_eq!(MonthKey::canonicalize("jan.-50").unwrap().to_string(), "1950-01");
        assert_eq!(MonthKey::canonicalize("dez.-00").unwrap().to_string(), "2000-12");
        assert_eq!(MonthKey::canonicalize("dez.-99").unwrap().to_string(), "1999-12");
    }

    #[test]
    fn test_case_and_whitespace_tolerance() {
        assert_eq!(MonthKey::canonicalize(" SET.-24 ").unwrap().to_string(), "2024-09");
        assert_eq!(MonthKey::canonicalize("Out.-25").unwrap().to_string(), "2025-10");
        assert_eq!(MonthKey::canonicalize("set-24").unwrap().to_string(), "2024-09");
    }

    #[test]
    fn test_unrecognized_abbreviation_is_an_error() {
        for bad in ["xyz.-24", "sep.-24", "set.-2024", "2024-13", "2024-9", ""] {
            assert!(
                matches!(
                    MonthKey::canonicalize(bad),
                    Err(DashboardError::UnrecognizedMonthAbbreviation(_))
                ),
                "expected error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_ordering_matches_chronology() {
        let mut keys = vec![
            MonthKey::canonicalize("2025-01").unwrap(),
            MonthKey::canonicalize("2024-09").unwrap(),
            MonthKey::canonicalize("2024-12").unwrap(),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(rendered, vec!["2024-09", "2024-12", "2025-01"]);
    }

    #[test]
    fn test_date_interop() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 17).unwrap();
        let key = MonthKey::from_date(date);
        assert_eq!(key.to_string(), "2024-09");
        assert_eq!(key.first_day(), NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        assert_eq!(key.last_day(), NaiveDate::from_ymd_opt(2024, 9, 30).unwrap());

        // February in a leap year.
        let feb = MonthKey::canonicalize("fev.-24").unwrap();
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        // December rolls the year for the last-day computation.
        let dec = MonthKey::canonicalize("dez.-24").unwrap();
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_serde_round_trip() {
        let key = MonthKey::canonicalize("2024-09").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-09\"");

        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);

        assert!(serde_json::from_str::<MonthKey>("\"not-a-month\"").is_err());
    }
}
