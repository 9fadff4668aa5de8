use super::{MetaExportRow, HEADERS};

/// Comma-separated, UTF-8 with BOM so spreadsheet tools pick up the
/// accented Portuguese headers correctly.
pub fn render(rows: &[MetaExportRow]) -> String {
    let mut out = String::from('\u{FEFF}');
    out.push_str(&HEADERS.map(escape_cell).join(","));
    out.push('\n');

    for row in rows {
        let cells = row.cells();
        let escaped: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }
    out
}

fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::super::sample_rows;
    use super::*;

    #[test]
    fn starts_with_bom_and_header() {
        let csv = render(&sample_rows(1));
        assert!(csv.starts_with('\u{FEFF}'));
        let header = csv.trim_start_matches('\u{FEFF}').lines().next().unwrap();
        assert!(header.starts_with("ID,Item,Descrição do Item,Data"));
    }

    #[test]
    fn one_line_per_row() {
        let csv = render(&sample_rows(3));
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.contains("PROD0070,BOBINA 50KG,2024-05-17,78750.44,50000.00"));
    }

    #[test]
    fn cells_with_separators_are_quoted() {
        let mut rows = sample_rows(1);
        rows[0].item_description = "BOBINA, \"GRANDE\"".into();
        let csv = render(&rows);
        assert!(csv.contains("\"BOBINA, \"\"GRANDE\"\"\""));
    }

    #[test]
    fn empty_selection_yields_header_only() {
        let csv = render(&[]);
        assert_eq!(csv.lines().count(), 1);
    }
}
