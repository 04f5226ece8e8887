use crate::coerce::parse_numeric_str;
use crate::error::Result;
use log::debug;
use serde::{Deserialize, Serialize};

/// One row of the static month→revenue table. The month uses the pt-BR
/// abbreviation encoding and the amount is a formatted currency string;
/// both go through the same coercion discipline as the dynamic feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRevenueRow {
    #[serde(rename = "Mês")]
    pub month: String,

    #[serde(rename = "Faturamento")]
    pub amount: String,
}

/// Monthly revenue figures embedded at build time, as exported from the
/// source workbook. Trusted content: a row here that fails month
/// normalization is a defect, not noisy input.
const REVENUE_TABLE_CSV: &str = "\
Mês,Faturamento
set.-24,\"R$ 623.628,74\"
out.-24,\"R$ 490.251,93\"
nov.-24,\"R$ 444.936,70\"
dez.-24,\"R$ 242.416,72\"
jan.-25,\"R$ 708.662,16\"
fev.-25,\"R$ 482.203,04\"
mar.-25,\"R$ 571.218,45\"
abr.-25,\"R$ 529.025,05\"
mai.-25,\"R$ 133.723,72\"
jun.-25,\"R$ 567.155,13\"
jul.-25,\"R$ 513.826,17\"
";

impl RawRevenueRow {
    /// The revenue amount as a plain number, tolerant of the currency
    /// symbol and pt-BR separators. Unparseable degrades to zero.
    pub fn parsed_amount(&self) -> f64 {
        match parse_numeric_str(&self.amount) {
            Some(v) => v,
            None => {
                debug!("Coercing unparseable revenue amount {:?} to 0", self.amount);
                0.0
            }
        }
    }
}

/// The embedded revenue table, parsed.
pub fn builtin_revenue_rows() -> Result<Vec<RawRevenueRow>> {
    parse_revenue_csv(REVENUE_TABLE_CSV)
}

/// Parses a `Mês,Faturamento` CSV document into raw revenue rows. Quoted
/// amount cells keep their embedded comma, so centavos survive.
pub fn parse_revenue_csv(content: &str) -> Result<Vec<RawRevenueRow>> {
    let mut reader = csv::ReaderBuilder::new().from_reader(content.as_bytes());
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawRevenueRow>() {
        rows.push(result?);
    }
    Ok(rows)
}
