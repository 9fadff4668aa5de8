use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{MetaExportRow, DATASET_NAME, HEADERS};

/// Minimal single-sheet SpreadsheetML workbook. Strings are inlined per
/// cell, which keeps the package self-contained (no shared-strings part).
pub fn render(rows: &[MetaExportRow]) -> Result<Vec<u8>, String> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 4] = [
        ("[Content_Types].xml", content_types()),
        ("_rels/.rels", root_rels()),
        ("xl/workbook.xml", workbook()),
        ("xl/_rels/workbook.xml.rels", workbook_rels()),
    ];
    for (name, body) in parts {
        zip.start_file(name, options)
            .map_err(|e| format!("xlsx: {e}"))?;
        zip.write_all(body.as_bytes())
            .map_err(|e| format!("xlsx: {e}"))?;
    }

    zip.start_file("xl/worksheets/sheet1.xml", options)
        .map_err(|e| format!("xlsx: {e}"))?;
    zip.write_all(worksheet(rows).as_bytes())
        .map_err(|e| format!("xlsx: {e}"))?;

    let cursor = zip.finish().map_err(|e| format!("xlsx: {e}"))?;
    Ok(cursor.into_inner())
}

fn content_types() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
        r#"</Types>"#,
    )
    .to_string()
}

fn root_rels() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
        r#"</Relationships>"#,
    )
    .to_string()
}

fn workbook() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>"#,
            r#"</workbook>"#,
        ),
        xml_escape(DATASET_NAME)
    )
}

fn workbook_rels() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
        r#"</Relationships>"#,
    )
    .to_string()
}

fn worksheet(rows: &[MetaExportRow]) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        "<sheetData>",
    ));

    xml.push_str("<row r=\"1\">");
    for header in HEADERS {
        xml.push_str(&inline_str_cell(header));
    }
    xml.push_str("</row>");

    for (i, row) in rows.iter().enumerate() {
        xml.push_str(&format!("<row r=\"{}\">", i + 2));
        xml.push_str(&number_cell(row.id as f64));
        xml.push_str(&inline_str_cell(&row.item_code));
        xml.push_str(&inline_str_cell(&row.item_description));
        xml.push_str(&inline_str_cell(&row.date));
        xml.push_str(&number_cell(row.planned_quantity));
        xml.push_str(&number_cell(row.produced_quantity));
        xml.push_str(&inline_str_cell(&row.overtime_label));
        xml.push_str(&number_cell(row.completion_percentage));
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn inline_str_cell(value: &str) -> String {
    format!(
        "<c t=\"inlineStr\"><is><t>{}</t></is></c>",
        xml_escape(value)
    )
}

fn number_cell(value: f64) -> String {
    format!("<c><v>{}</v></c>", value)
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
