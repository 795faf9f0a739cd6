//! PDF rendering of the balance report.
//!
//! Thin wrapper over printpdf: a title, a header row, and one line per
//! balance, paginated on US Letter. All layout constants are in millimetres.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use thiserror::Error;

use crate::models::Balance;

/// US Letter page size.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;

const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 8.0;
const TITLE_SIZE: f32 = 18.0;
const HEADER_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 10.0;

/// Column x coordinates: product, location, quantity.
const COLUMNS_MM: [f32; 3] = [MARGIN_MM, 95.0, 165.0];

/// PDF rendering failed.
#[derive(Debug, Error)]
#[error("pdf rendering failed: {0}")]
pub struct PdfRenderError(String);

/// Render the balance report as PDF bytes.
///
/// The caller decides what to do with an empty report; this renderer assumes
/// at least the header is worth emitting.
///
/// # Errors
///
/// Returns [`PdfRenderError`] if the document cannot be assembled.
pub fn render_balance_pdf(balances: &[Balance]) -> Result<Vec<u8>, PdfRenderError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Inventory Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PdfRenderError(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PdfRenderError(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    layer.use_text("Inventory Report", TITLE_SIZE, Mm(MARGIN_MM), Mm(y), &bold);
    y -= 2.0 * LINE_HEIGHT_MM;

    let write_header = |layer: &printpdf::PdfLayerReference, y: f32| {
        layer.use_text("Product", HEADER_SIZE, Mm(COLUMNS_MM[0]), Mm(y), &bold);
        layer.use_text("Location", HEADER_SIZE, Mm(COLUMNS_MM[1]), Mm(y), &bold);
        layer.use_text("Quantity", HEADER_SIZE, Mm(COLUMNS_MM[2]), Mm(y), &bold);
    };
    write_header(&layer, y);
    y -= LINE_HEIGHT_MM;

    for balance in balances {
        if y < MARGIN_MM {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
            write_header(&layer, y);
            y -= LINE_HEIGHT_MM;
        }

        layer.use_text(
            &balance.product_name,
            BODY_SIZE,
            Mm(COLUMNS_MM[0]),
            Mm(y),
            &regular,
        );
        layer.use_text(
            &balance.location_name,
            BODY_SIZE,
            Mm(COLUMNS_MM[1]),
            Mm(y),
            &regular,
        );
        layer.use_text(
            balance.qty.to_string(),
            BODY_SIZE,
            Mm(COLUMNS_MM[2]),
            Mm(y),
            &regular,
        );
        y -= LINE_HEIGHT_MM;
    }

    doc.save_to_bytes().map_err(|e| PdfRenderError(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn balance(product: &str, location: &str, qty: i64) -> Balance {
        Balance {
            product_name: product.to_string(),
            location_name: location.to_string(),
            qty,
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let balances = vec![
            balance("Widget", "WarehouseA", 6),
            balance("Widget", "WarehouseB", 4),
        ];
        let bytes = render_balance_pdf(&balances).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_report_still_has_header() {
        let bytes = render_balance_pdf(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_render_paginates_long_reports() {
        // Enough rows to spill onto a second page.
        let balances: Vec<Balance> = (0..60)
            .map(|i| balance(&format!("Product {i}"), "WarehouseA", i))
            .collect();
        let bytes = render_balance_pdf(&balances).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
