use crate::coerce::RawExpenditureRow;
use crate::department::DepartmentKey;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Spreadsheet-backed endpoint the dashboard was built against.
const DEFAULT_FEED_URL: &str =
    "https://script.google.com/macros/s/AKfycbyHUho9j0-swZTJO4Fka_59Nv3GVFqo-Qfbp3yydchcKZaUUcs7HxlWZ5mUO6vjH4mPTA/exec";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DashboardConfig {
    #[schemars(
        description = "HTTP endpoint returning the expenditure feed as a JSON array of row objects"
    )]
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    #[schemars(
        description = "Department whose headcount denotes core operations, used by the earnings-per-operational-employee metric"
    )]
    #[serde(default = "default_operations_department")]
    pub operations_department: DepartmentKey,
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_operations_department() -> DepartmentKey {
    DepartmentKey::resolve("Operação")
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            operations_department: default_operations_department(),
        }
    }
}

impl DashboardConfig {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DashboardConfig)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// JSON schema of one expenditure feed row — the external contract the
/// spreadsheet API is expected to honor.
pub fn feed_row_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(RawExpenditureRow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.operations_department.as_str(), "Operação");
        assert!(config.feed_url.starts_with("https://"));
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.operations_department.as_str(), "Operação");

        let config: DashboardConfig =
            serde_json::from_str("{\"operations_department\": \"NEC\"}").unwrap();
        assert_eq!(config.operations_department.as_str(), "NEC");
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = DashboardConfig::schema_as_json().unwrap();
        assert!(schema_json.contains("feed_url"));
        assert!(schema_json.contains("operations_department"));

        let feed_schema = serde_json::to_string(&feed_row_schema()).unwrap();
        assert!(feed_schema.contains("Month"));
        assert!(feed_schema.contains("Bonificacao 20"));
    }
}
