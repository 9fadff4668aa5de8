//! Export rendering for the current selection of metas.
//!
//! All renderers are pure byte producers so they run the same on native
//! targets (tests) and in the browser (wasm), where the frontend wraps the
//! result in a Blob download.

pub mod csv;
pub mod pdf;
pub mod xlsx;

use serde::{Deserialize, Serialize};

use crate::calc;
use crate::domain::meta::Meta;

/// Dataset name: used for the worksheet name, the document title and the
/// default file name stem.
pub const DATASET_NAME: &str = "Metas";

/// Column headers shared by every export format
pub const HEADERS: [&str; 8] = [
    "ID",
    "Item",
    "Descrição do Item",
    "Data",
    "Quantidade Programada",
    "Quantidade Produzida",
    "Hora Extra",
    "Percentual",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv;charset=utf-8;",
            Self::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Pdf => "application/pdf",
        }
    }
}

/// A meta joined with its item description, ready for rendering.
/// The overtime flag is already localized ("Sim"/"Não").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaExportRow {
    pub id: i32,
    pub item_code: String,
    pub item_description: String,
    pub date: String,
    pub planned_quantity: f64,
    pub produced_quantity: f64,
    pub overtime_label: String,
    pub completion_percentage: f64,
}

impl MetaExportRow {
    /// `item_description` is empty when the code has no match in the item
    /// list; that is rendered silently, not treated as an error.
    pub fn from_meta(meta: &Meta, item_description: &str) -> Self {
        Self {
            id: meta.id,
            item_code: meta.item_code.clone(),
            item_description: item_description.to_string(),
            date: meta.date.clone(),
            planned_quantity: meta.planned_quantity,
            produced_quantity: meta.produced_quantity,
            overtime_label: if meta.overtime == 1 { "Sim" } else { "Não" }.to_string(),
            completion_percentage: meta.completion_percentage,
        }
    }

    /// Cell values in header order
    pub fn cells(&self) -> [String; 8] {
        [
            self.id.to_string(),
            self.item_code.clone(),
            self.item_description.clone(),
            self.date.clone(),
            calc::format2(self.planned_quantity),
            calc::format2(self.produced_quantity),
            self.overtime_label.clone(),
            calc::format2(self.completion_percentage),
        ]
    }
}

/// Render the selection in the requested format.
pub fn render(format: ExportFormat, rows: &[MetaExportRow]) -> Result<Vec<u8>, String> {
    match format {
        ExportFormat::Csv => Ok(csv::render(rows).into_bytes()),
        ExportFormat::Xlsx => xlsx::render(rows),
        ExportFormat::Pdf => Ok(pdf::render(rows)),
    }
}

#[cfg(test)]
pub(crate) fn sample_rows(n: usize) -> Vec<MetaExportRow> {
    (0..n)
        .map(|i| MetaExportRow {
            id: i as i32 + 1,
            item_code: "PROD0070".into(),
            item_description: "BOBINA 50KG".into(),
            date: "2024-05-17".into(),
            planned_quantity: 78750.44,
            produced_quantity: 50000.0,
            overtime_label: if i % 2 == 0 { "Sim" } else { "Não" }.into(),
            completion_percentage: 63.49,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::meta::Meta;

    #[test]
    fn overtime_flag_is_localized() {
        let meta = Meta {
            id: 1,
            item_code: "PROD0070".into(),
            date: "2024-05-17".into(),
            planned_quantity: 78750.44,
            produced_quantity: 50000.0,
            overtime: 1,
            completion_percentage: 63.49,
        };
        let row = MetaExportRow::from_meta(&meta, "BOBINA 50KG");
        assert_eq!(row.overtime_label, "Sim");

        let meta = Meta { overtime: 0, ..meta };
        assert_eq!(MetaExportRow::from_meta(&meta, "").overtime_label, "Não");
    }

    #[test]
    fn missing_description_renders_empty() {
        let meta = Meta {
            id: 2,
            item_code: "XXXX0001".into(),
            date: "2024-05-17".into(),
            planned_quantity: 0.0,
            produced_quantity: 10.0,
            overtime: 0,
            completion_percentage: 0.0,
        };
        let row = MetaExportRow::from_meta(&meta, "");
        assert_eq!(row.cells()[2], "");
    }

    #[test]
    fn format_parse_and_mime() {
        assert_eq!(ExportFormat::parse("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("xlsx"), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::parse("pdf"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::parse("doc"), None);
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
    }
}
