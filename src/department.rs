use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Canonical short department name, or a pass-through of an unknown raw
/// spelling. Unknown departments still have to render, so resolution never
/// fails; they just miss the curated display vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct DepartmentKey(String);

impl<'de> Deserialize<'de> for DepartmentKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::resolve(&raw))
    }
}

/// Fixed bidirectional mapping between the spreadsheet's long-form
/// department names and the short display names. Total at build time.
const DEPARTMENT_TABLE: [(&str, &str); 9] = [
    ("Administrativo Financeiro", "Administrativo"),
    ("Apoio", "Apoio"),
    ("Comercial", "Comercial"),
    ("Diretoria", "Diretoria"),
    ("Jurídico Externo", "Jurídico"),
    ("Marketing", "Marketing"),
    ("NEC", "NEC"),
    ("Operação Geral", "Operação"),
    ("RH / Departamento Pessoal", "RH"),
];

/// Reserved label for the source's pre-aggregated overall-total row.
const GRAND_TOTAL_SENTINEL: &str = "total geral";

impl DepartmentKey {
    /// Resolves a raw department spelling to its canonical key.
    ///
    /// Matching is case-insensitive and whitespace-trimmed, and succeeds
    /// against either side of the table, so a short display name resolves
    /// to itself. No match falls back to the trimmed input unchanged.
    pub fn resolve(raw: &str) -> Self {
        let trimmed = raw.trim();
        let needle = trimmed.to_lowercase();

        for (long, short) in DEPARTMENT_TABLE {
            if long.to_lowercase() == needle || short.to_lowercase() == needle {
                return Self(short.to_string());
            }
        }

        Self(trimmed.to_string())
    }

    /// True for the reserved "grand total" label, which marks a
    /// pre-summed overall row rather than a real department.
    pub fn is_grand_total(&self) -> bool {
        self.0.trim().to_lowercase() == GRAND_TOTAL_SENTINEL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The curated short-name vocabulary, in table order.
    pub fn known_departments() -> impl Iterator<Item = DepartmentKey> {
        DEPARTMENT_TABLE
            .iter()
            .map(|(_, short)| DepartmentKey(short.to_string()))
    }
}

impl fmt::Display for DepartmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
