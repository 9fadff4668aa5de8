//! Page state with pure transition methods, kept free of browser types so
//! the behavior is testable on the native target.

use std::collections::HashSet;

use contracts::calc;
use contracts::domain::item::Item;
use contracts::domain::meta::{Meta, MetaDraft};
use contracts::export::MetaExportRow;

#[derive(Clone, Debug)]
pub struct MetasState {
    pub items: Vec<Item>,
    pub metas: Vec<Meta>,

    // filter + client-side pagination
    pub filter: String,
    pub page: usize,
    pub page_size: usize,

    // checkbox selection, by meta id
    pub selected: HashSet<i32>,

    // entry form; produced quantity stays a raw string until submit
    pub editing_id: Option<i32>,
    pub form_item: String,
    pub form_date: String,
    pub form_produced: String,
    pub form_overtime: i32,

    pub is_loading: bool,
}

impl Default for MetasState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            metas: Vec::new(),
            filter: String::new(),
            page: 0,
            page_size: 10,
            selected: HashSet::new(),
            editing_id: None,
            form_item: String::new(),
            form_date: String::new(),
            form_produced: String::new(),
            form_overtime: 0,
            is_loading: false,
        }
    }
}

impl MetasState {
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Replace the loaded metas; selections of ids that no longer exist are
    /// dropped so a deleted record cannot stay exported
    pub fn set_metas(&mut self, metas: Vec<Meta>) {
        let ids: HashSet<i32> = metas.iter().map(|m| m.id).collect();
        self.selected.retain(|id| ids.contains(id));
        self.metas = metas;
    }

    /// Item description by trimmed code; empty when the catalog has no match
    pub fn description_for(&self, code: &str) -> String {
        let code = code.trim();
        self.items
            .iter()
            .find(|i| i.code == code)
            .map(|i| i.description.clone())
            .unwrap_or_default()
    }

    /// Case-insensitive substring filter over the item description OR the
    /// item code; empty filter returns everything
    pub fn filtered(&self) -> Vec<&Meta> {
        let needle = self.filter.trim().to_lowercase();
        self.metas
            .iter()
            .filter(|m| {
                if needle.is_empty() {
                    return true;
                }
                m.item_code.to_lowercase().contains(&needle)
                    || self
                        .description_for(&m.item_code)
                        .to_lowercase()
                        .contains(&needle)
            })
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        let count = self.filtered().len();
        if count == 0 || self.page_size == 0 {
            return 0;
        }
        count.div_ceil(self.page_size)
    }

    /// Rows of the current page, pagination applied after filtering.
    /// An out-of-range page is clamped to the last one.
    pub fn page_rows(&self) -> Vec<Meta> {
        let filtered = self.filtered();
        let total_pages = self.total_pages();
        let page = if total_pages == 0 {
            0
        } else {
            self.page.min(total_pages - 1)
        };
        filtered
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect()
    }

    pub fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 0;
    }

    pub fn toggle_selected(&mut self, id: i32) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn all_filtered_selected(&self) -> bool {
        let filtered = self.filtered();
        !filtered.is_empty() && filtered.iter().all(|m| self.selected.contains(&m.id))
    }

    /// Header checkbox semantics: operates on the filtered set only
    pub fn toggle_select_all(&mut self) {
        let ids: Vec<i32> = self.filtered().iter().map(|m| m.id).collect();
        if self.all_filtered_selected() {
            for id in ids {
                self.selected.remove(&id);
            }
        } else {
            self.selected.extend(ids);
        }
    }

    /// Populate the form from a record; false when the id is not loaded
    pub fn begin_edit(&mut self, id: i32) -> bool {
        let Some(meta) = self.metas.iter().find(|m| m.id == id) else {
            return false;
        };
        self.editing_id = Some(id);
        self.form_item = meta.item_code.clone();
        self.form_date = meta.date.clone();
        self.form_produced = calc::format2(meta.produced_quantity);
        self.form_overtime = meta.overtime;
        true
    }

    pub fn clear_form(&mut self) {
        self.editing_id = None;
        self.form_item.clear();
        self.form_date.clear();
        self.form_produced.clear();
        self.form_overtime = 0;
    }

    /// Live preview of the planned quantity for the current form inputs
    pub fn planned_preview(&self) -> f64 {
        calc::planned_quantity(&self.form_item, self.form_overtime == 1)
    }

    /// Live preview of the completion percentage
    pub fn percent_preview(&self) -> f64 {
        let produced = self.form_produced.trim().parse::<f64>().unwrap_or(0.0);
        calc::completion_percentage(produced, self.planned_preview())
    }

    /// Build the request body from the form. The derived fields carry the
    /// previews; the server recomputes them anyway.
    pub fn form_draft(&self) -> Result<MetaDraft, String> {
        if self.form_item.trim().is_empty()
            || self.form_date.trim().is_empty()
            || self.form_produced.trim().is_empty()
        {
            return Err("Todos os campos são obrigatórios.".to_string());
        }
        let produced = self
            .form_produced
            .trim()
            .parse::<f64>()
            .map_err(|_| "A quantidade produzida deve ser um número positivo.".to_string())?;

        let draft = MetaDraft {
            item_code: self.form_item.trim().to_string(),
            date: self.form_date.trim().to_string(),
            planned_quantity: self.planned_preview(),
            produced_quantity: produced,
            overtime: self.form_overtime,
            completion_percentage: self.percent_preview(),
        };
        draft.validate()?;
        Ok(draft)
    }

    /// Export rows for the current selection, in filtered display order
    pub fn selected_rows(&self) -> Vec<MetaExportRow> {
        self.filtered()
            .into_iter()
            .filter(|m| self.selected.contains(&m.id))
            .map(|m| MetaExportRow::from_meta(m, &self.description_for(&m.item_code)))
            .collect()
    }
}
