use serde::{Deserialize, Serialize};

use crate::calc;

/// Production goal record ("meta"), the only mutable entity of the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Assigned by the goals store on insert; immutable afterwards
    pub id: i32,
    pub item_code: String,
    /// Calendar date, always `YYYY-MM-DD`
    pub date: String,
    pub planned_quantity: f64,
    pub produced_quantity: f64,
    /// 0/1 on the wire and in storage
    #[serde(rename = "overtimeFlag")]
    pub overtime: i32,
    pub completion_percentage: f64,
}

/// Create/update request body: a `Meta` minus its id.
///
/// `planned_quantity` and `completion_percentage` are carried for display
/// parity with the client, but the server recomputes both from `item_code`,
/// `overtime` and `produced_quantity` before persisting. Client values are
/// advisory only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDraft {
    pub item_code: String,
    pub date: String,
    #[serde(default)]
    pub planned_quantity: f64,
    pub produced_quantity: f64,
    #[serde(rename = "overtimeFlag")]
    pub overtime: i32,
    #[serde(default)]
    pub completion_percentage: f64,
}

impl MetaDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.item_code.trim().is_empty() {
            return Err("O item é obrigatório.".into());
        }
        if !is_iso_date(&self.date) {
            return Err("Data inválida: use o formato YYYY-MM-DD.".into());
        }
        if !self.produced_quantity.is_finite() || self.produced_quantity <= 0.0 {
            return Err("A quantidade produzida deve ser um número positivo.".into());
        }
        if self.overtime != 0 && self.overtime != 1 {
            return Err("Hora extra deve ser 0 ou 1.".into());
        }
        Ok(())
    }

    /// Recompute the derived fields from the authoritative inputs.
    /// Fails when the planned quantity comes out non-positive (unknown item).
    pub fn with_derived(mut self) -> Result<Self, String> {
        let code = self.item_code.trim().to_string();
        let planned = calc::planned_quantity(&code, self.overtime == 1);
        if planned <= 0.0 {
            return Err(
                "Não é possível salvar uma meta com quantidade calculada igual ou inferior a zero."
                    .into(),
            );
        }
        self.item_code = code;
        self.planned_quantity = planned;
        self.completion_percentage =
            calc::completion_percentage(self.produced_quantity, planned);
        Ok(self)
    }
}

fn is_iso_date(s: &str) -> bool {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
