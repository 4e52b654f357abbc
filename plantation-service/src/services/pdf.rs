//! Tabular PDF rendering for plucker reports.
//!
//! Kept as a pure function from (title, period, rows) to a byte stream so
//! the layout can be tested without touching storage.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};
use service_core::error::AppError;

use crate::services::report::ReportRow;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const ROW_HEIGHT: f32 = 7.0;

// Column label and left edge in millimetres.
const COLUMNS: [(&str, f32); 4] = [
    ("Name", 15.0),
    ("Total Collection (kg)", 80.0),
    ("Total Earnings (LKR)", 130.0),
    ("Status", 180.0),
];

fn mm(value: f32) -> Mm {
    Mm(value.into())
}

fn draw_table_header(layer: &PdfLayerReference, bold: &IndirectFontRef, y: f32) {
    for (label, x) in COLUMNS {
        layer.use_text(label, 10.0, mm(x), mm(y), bold);
    }
    let rule = Line {
        points: vec![
            (Point::new(mm(MARGIN), mm(y - 2.0)), false),
            (Point::new(mm(PAGE_WIDTH - MARGIN), mm(y - 2.0)), false),
        ],
        is_closed: false,
    };
    layer.set_outline_thickness(0.5);
    layer.add_line(rule);
}

/// Render the report table: title, period line, one header block per page
/// and one row per plucker, flowing onto extra pages as needed.
pub fn render_plucker_report(
    title: &str,
    period: &str,
    rows: &[ReportRow],
) -> Result<Vec<u8>, AppError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to load report font: {}", e))
    })?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to load report font: {}", e))
    })?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT - 20.0;

    layer.use_text(title, 18.0, mm(MARGIN), mm(y), &bold);
    y -= 10.0;
    layer.use_text(period, 11.0, mm(MARGIN), mm(y), &regular);
    y -= 12.0;
    draw_table_header(&layer, &bold, y);
    y -= ROW_HEIGHT;

    for row in rows {
        if y < MARGIN + ROW_HEIGHT {
            let (page, page_layer) = doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT - 20.0;
            draw_table_header(&layer, &bold, y);
            y -= ROW_HEIGHT;
        }

        let cells = [
            row.name.clone(),
            format!("{:.2}", row.total_collection),
            format!("{:.2}", row.total_earnings),
            row.status.clone(),
        ];
        for ((_, x), cell) in COLUMNS.iter().zip(cells) {
            layer.use_text(cell, 10.0, mm(*x), mm(y), &regular);
        }
        y -= ROW_HEIGHT;
    }

    doc.save_to_bytes().map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to serialize report PDF: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> ReportRow {
        ReportRow {
            name: name.to_string(),
            total_collection: 12.5,
            total_earnings: 31.25,
            status: "active".to_string(),
        }
    }

    #[test]
    fn renders_a_well_formed_pdf() {
        let bytes = render_plucker_report(
            "Plucker Performance Report",
            "Period: 2023-05-01 to 2023-05-31",
            &[row("Kamala"), row("Nimal")],
        )
        .expect("render");

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
    }

    #[test]
    fn renders_with_no_rows() {
        let bytes = render_plucker_report("Plucker Performance Report", "Period: -", &[])
            .expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_tables_flow_onto_extra_pages() {
        let rows: Vec<ReportRow> = (0..120).map(|i| row(&format!("Plucker {}", i))).collect();
        let long = render_plucker_report("Plucker Performance Report", "Period: -", &rows)
            .expect("render long");
        let short = render_plucker_report("Plucker Performance Report", "Period: -", &rows[..1])
            .expect("render short");

        // 120 rows cannot fit on one A4 page at this row height
        assert!(long.len() > short.len());
    }
}
