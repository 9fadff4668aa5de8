//! Paginated tabular PDF: dataset title on the first page, column headers
//! on every page, "Página N de M" footer.
//!
//! The document is assembled by hand (PDF 1.4, Type1 Helvetica with
//! WinAnsiEncoding so the Portuguese accents survive). Only the small
//! subset of the format needed for a text table is produced.

use super::{MetaExportRow, DATASET_NAME, HEADERS};

const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN: f64 = 40.0;
const ROW_HEIGHT: f64 = 14.0;
const FOOTER_Y: f64 = 30.0;
const BODY_FLOOR: f64 = 50.0;
const TITLE_Y: f64 = 782.0;
const FIRST_PAGE_TABLE_TOP: f64 = 750.0;
const NEXT_PAGE_TABLE_TOP: f64 = 800.0;

/// Column widths in points; sums to the printable width
const COLUMN_WIDTHS: [f64; 8] = [28.0, 62.0, 140.0, 62.0, 72.0, 72.0, 30.0, 49.0];

pub fn render(rows: &[MetaExportRow]) -> Vec<u8> {
    let total_pages = page_count(rows.len());

    let mut contents = Vec::with_capacity(total_pages);
    let mut remaining = rows;
    for page_no in 1..=total_pages {
        let table_top = if page_no == 1 {
            FIRST_PAGE_TABLE_TOP
        } else {
            NEXT_PAGE_TABLE_TOP
        };
        let capacity = rows_fitting(table_top);
        let take = capacity.min(remaining.len());
        let (page_rows, rest) = remaining.split_at(take);
        remaining = rest;
        contents.push(page_content(page_no, total_pages, table_top, page_rows));
    }

    assemble(contents)
}

/// Number of pages needed for `n_rows` data rows; never zero.
pub fn page_count(n_rows: usize) -> usize {
    let first = rows_fitting(FIRST_PAGE_TABLE_TOP);
    if n_rows <= first {
        return 1;
    }
    let rest = rows_fitting(NEXT_PAGE_TABLE_TOP);
    1 + (n_rows - first).div_ceil(rest)
}

/// Data rows fitting below a header drawn at `table_top`
fn rows_fitting(table_top: f64) -> usize {
    ((table_top - ROW_HEIGHT - BODY_FLOOR) / ROW_HEIGHT) as usize
}

fn page_content(
    page_no: usize,
    total_pages: usize,
    table_top: f64,
    rows: &[MetaExportRow],
) -> Vec<u8> {
    let mut ops = String::new();

    if page_no == 1 {
        text_op(&mut ops, "F2", 14.0, MARGIN, TITLE_Y, DATASET_NAME);
    }

    let mut y = table_top;
    for (header, x) in HEADERS.iter().zip(column_offsets()) {
        text_op(&mut ops, "F2", 8.0, x, y, header);
    }
    y -= ROW_HEIGHT;

    for row in rows {
        for ((cell, x), width) in row
            .cells()
            .iter()
            .zip(column_offsets())
            .zip(COLUMN_WIDTHS)
        {
            text_op(&mut ops, "F1", 8.0, x, y, &truncate_to_width(cell, width));
        }
        y -= ROW_HEIGHT;
    }

    let footer = format!("Página {} de {}", page_no, total_pages);
    text_op(
        &mut ops,
        "F1",
        8.0,
        PAGE_WIDTH / 2.0 - 30.0,
        FOOTER_Y,
        &footer,
    );

    latin1(&ops)
}

fn column_offsets() -> [f64; 8] {
    let mut offsets = [0.0; 8];
    let mut x = MARGIN;
    for (i, width) in COLUMN_WIDTHS.iter().enumerate() {
        offsets[i] = x;
        x += width;
    }
    offsets
}

fn text_op(ops: &mut String, font: &str, size: f64, x: f64, y: f64, text: &str) {
    ops.push_str(&format!(
        "BT /{} {} Tf {:.1} {:.1} Td ({}) Tj ET\n",
        font,
        size,
        x,
        y,
        escape_text(text)
    ));
}

/// Rough fit for 8pt Helvetica (~4pt average glyph advance)
fn truncate_to_width(text: &str, width: f64) -> String {
    let max_chars = (width / 4.0) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// WinAnsi is a Latin-1 superset; anything outside it degrades to '?'
fn latin1(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else if c == '…' {
                0x85
            } else {
                b'?'
            }
        })
        .collect()
}

/// Object layout: 1 catalog, 2 page tree, 3/4 fonts, then a page object and
/// a content stream per page.
fn assemble(contents: Vec<Vec<u8>>) -> Vec<u8> {
    let page_total = contents.len();
    let object_total = 4 + page_total * 2;

    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::with_capacity(object_total);

    out.extend_from_slice(b"%PDF-1.4\n");

    let kids: Vec<String> = (0..page_total)
        .map(|i| format!("{} 0 R", 5 + i * 2))
        .collect();

    push_object(
        &mut out,
        &mut offsets,
        1,
        "<< /Type /Catalog /Pages 2 0 R >>".into(),
    );
    push_object(
        &mut out,
        &mut offsets,
        2,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_total
        ),
    );
    push_object(
        &mut out,
        &mut offsets,
        3,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .into(),
    );
    push_object(
        &mut out,
        &mut offsets,
        4,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .into(),
    );

    for (i, content) in contents.into_iter().enumerate() {
        let page_id = 5 + i * 2;
        let stream_id = page_id + 1;
        push_object(
            &mut out,
            &mut offsets,
            page_id,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT, stream_id
            ),
        );

        offsets.push(out.len());
        out.extend_from_slice(
            format!("{} 0 obj\n<< /Length {} >>\nstream\n", stream_id, content.len()).as_bytes(),
        );
        out.extend_from_slice(&content);
        out.extend_from_slice(b"\nendstream\nendobj\n");
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", object_total + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            object_total + 1,
            xref_offset
        )
        .as_bytes(),
    );

    out
}

fn push_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, id: usize, body: String) {
    offsets.push(out.len());
    out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::super::sample_rows;
    use super::*;

    fn lossy(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn empty_selection_still_produces_one_page() {
        let bytes = render(&[]);
        let text = lossy(&bytes);
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.ends_with("%%EOF\n"));
        assert_eq!(text.matches("/Type /Page /Parent").count(), 1);
        assert!(text.contains("gina 1 de 1"));
    }

    #[test]
    fn title_appears_on_first_page_only() {
        let bytes = render(&sample_rows(120));
        let text = lossy(&bytes);
        assert_eq!(text.matches("(Metas) Tj").count(), 1);
    }

    #[test]
    fn row_overflow_paginates() {
        let first = rows_fitting(FIRST_PAGE_TABLE_TOP);
        assert_eq!(page_count(first), 1);
        assert_eq!(page_count(first + 1), 2);

        let bytes = render(&sample_rows(first + 1));
        let text = lossy(&bytes);
        assert_eq!(text.matches("/Type /Page /Parent").count(), 2);
        assert!(text.contains("gina 2 de 2"));
    }

    #[test]
    fn page_count_matches_capacity_arithmetic() {
        let first = rows_fitting(FIRST_PAGE_TABLE_TOP);
        let rest = rows_fitting(NEXT_PAGE_TABLE_TOP);
        assert_eq!(page_count(first + rest), 2);
        assert_eq!(page_count(first + rest + 1), 3);
    }

    #[test]
    fn parentheses_in_cells_are_escaped() {
        let mut rows = sample_rows(1);
        rows[0].item_description = "BOBINA (NOVA)".into();
        let bytes = render(&rows);
        assert!(lossy(&bytes).contains("BOBINA \\(NOVA\\)"));
    }

    #[test]
    fn xref_points_at_the_xref_table() {
        let bytes = render(&sample_rows(3));
        let text = lossy(&bytes);
        let startxref = text
            .rsplit("startxref\n")
            .next()
            .and_then(|t| t.lines().next())
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap();
        assert_eq!(&bytes[startxref..startxref + 4], b"xref");
    }
}
