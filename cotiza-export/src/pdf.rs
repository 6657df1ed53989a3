//! Quotation PDF renderer
//!
//! Draws the document directly (text and vector commands) on US Letter
//! pages. Layout: issuer letterhead resolved by origin, customer block,
//! one priced table per section, totals banner, thumbnail strip,
//! payment terms and a comments/signature footer.

use chrono::{Local, TimeZone};
use cotiza_core::pricing::{compute_line, compute_totals, format_money};
use printpdf::image_crate::codecs::{jpeg::JpegDecoder, png::PngDecoder};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point,
};
use shared::models::{LineItem, Quotation, Section};
use shared::util::format_date_dmy;
use std::collections::HashMap;
use tracing::warn;

use crate::{ExportError, ExportResult};

// US Letter, margins in mm
const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_RIGHT: f32 = 200.9;
const TOP_Y: f32 = 264.0;
const BOTTOM_Y: f32 = 20.0;

// Table column x positions
const COL_DESC: f32 = 15.0;
const COL_QTY: f32 = 118.0;
const COL_UNIT: f32 = 132.0;
const COL_DISC: f32 = 158.0;
const COL_TOTAL: f32 = 178.0;

const THUMB_HEIGHT: f32 = 20.0;
const THUMB_MAX_WIDTH: f32 = 30.0;

/// Renderer over one quotation snapshot plus its prefetched images
/// (URL to bytes; `None` entries render without a thumbnail)
pub struct QuotationPdf<'a> {
    quotation: &'a Quotation,
    images: &'a HashMap<String, Option<Vec<u8>>>,
}

impl<'a> QuotationPdf<'a> {
    pub fn new(quotation: &'a Quotation, images: &'a HashMap<String, Option<Vec<u8>>>) -> Self {
        Self { quotation, images }
    }

    /// Render to PDF bytes. Fails before drawing anything when the
    /// quotation has no items.
    pub fn render(&self) -> ExportResult<Vec<u8>> {
        if self.quotation.items.is_empty() {
            return Err(ExportError::EmptyQuotation);
        }

        let title = self
            .quotation
            .folio_code()
            .unwrap_or_else(|| "Cotización".to_string());
        let mut page = PageWriter::new(&title)?;

        self.draw_header(&mut page);
        self.draw_customer_block(&mut page);
        self.draw_item_tables(&mut page);
        self.draw_totals(&mut page);
        self.draw_thumbnails(&mut page);
        self.draw_payment_terms(&mut page);
        self.draw_footer(&mut page);

        page.finish()
    }

    fn draw_header(&self, page: &mut PageWriter) {
        let issuer = self.quotation.origin.issuer();

        page.text_at(issuer.name, 14.0, MARGIN_LEFT, page.y, true);
        let mut y = page.y - 6.0;
        page.text_at(&format!("RUT: {}", issuer.rut), 9.0, MARGIN_LEFT, y, false);
        y -= 4.5;
        page.text_at(issuer.address, 9.0, MARGIN_LEFT, y, false);
        y -= 4.5;
        page.text_at(
            &format!("{} / {}", issuer.phone, issuer.email),
            9.0,
            MARGIN_LEFT,
            y,
            false,
        );

        page.text_at("COTIZACIÓN", 16.0, 150.0, page.y, true);
        let code = self
            .quotation
            .folio_code()
            .unwrap_or_else(|| "BORRADOR".to_string());
        page.text_at(&code, 11.0, 150.0, page.y - 7.0, true);
        let date = self
            .quotation
            .created_at
            .and_then(|ms| Local.timestamp_millis_opt(ms).single())
            .unwrap_or_else(Local::now)
            .date_naive();
        page.text_at(
            &format!("Fecha: {}", format_date_dmy(date)),
            9.0,
            150.0,
            page.y - 13.0,
            false,
        );

        page.y = y - 5.0;
        page.hline(page.y);
        page.y -= 8.0;
    }

    fn draw_customer_block(&self, page: &mut PageWriter) {
        page.text_at("Señor(es):", 10.0, MARGIN_LEFT, page.y, true);
        let name = if self.quotation.entity_name.is_empty() {
            "Sin cliente"
        } else {
            self.quotation.entity_name.as_str()
        };
        page.text_at(name, 10.0, 40.0, page.y, false);
        page.y -= 10.0;
    }

    fn draw_item_tables(&self, page: &mut PageWriter) {
        let mut sections: Vec<&Section> = self.quotation.sections.iter().collect();
        sections.sort_by_key(|s| s.order_index);

        for section in &sections {
            let items: Vec<&LineItem> = self
                .quotation
                .items
                .iter()
                .filter(|i| i.section == Some(section.id))
                .collect();
            if items.is_empty() {
                continue;
            }
            self.draw_table(page, Some(section), &items);
        }

        let ungrouped: Vec<&LineItem> = self
            .quotation
            .items
            .iter()
            .filter(|i| match i.section {
                None => true,
                Some(sid) => !self.quotation.sections.iter().any(|s| s.id == sid),
            })
            .collect();
        if !ungrouped.is_empty() {
            let label = if sections.len() > 1 { Some("Otros") } else { None };
            self.draw_table_with_title(page, label, &ungrouped);
        }
    }

    fn draw_table(&self, page: &mut PageWriter, section: Option<&Section>, items: &[&LineItem]) {
        self.draw_table_with_title(page, section.map(|s| s.name.as_str()), items);
        if let Some(desc) = section.and_then(|s| s.description.as_deref()) {
            for line in wrap_text(desc, 100) {
                page.ensure_space(5.0);
                page.text_at(&line, 8.0, MARGIN_LEFT, page.y, false);
                page.y -= 4.0;
            }
            page.y -= 2.0;
        }
    }

    fn draw_table_with_title(
        &self,
        page: &mut PageWriter,
        title: Option<&str>,
        items: &[&LineItem],
    ) {
        page.ensure_space(20.0);
        if let Some(title) = title {
            page.text_at(title, 11.0, MARGIN_LEFT, page.y, true);
            page.y -= 6.0;
        }

        page.text_at("Descripción", 9.0, COL_DESC, page.y, true);
        page.text_at("Cant.", 9.0, COL_QTY, page.y, true);
        page.text_at("P. Unitario", 9.0, COL_UNIT, page.y, true);
        page.text_at("Desc.", 9.0, COL_DISC, page.y, true);
        page.text_at("Total", 9.0, COL_TOTAL, page.y, true);
        page.y -= 2.0;
        page.hline(page.y);
        page.y -= 5.0;

        let currency = self.quotation.currency;
        for item in items {
            let computed = compute_line(item);
            let desc_lines = item_description_lines(item);
            page.ensure_space(5.0 * desc_lines.len() as f32 + 4.0);

            page.text_at(&desc_lines[0], 9.0, COL_DESC, page.y, false);
            if item.kind.is_discount() {
                // Standalone reduction: its value goes in the discount
                // column and the total cell is not applicable
                page.text_at("1", 9.0, COL_QTY, page.y, false);
                page.text_at(
                    &format_money(item.unit_price, currency),
                    9.0,
                    COL_UNIT,
                    page.y,
                    false,
                );
                page.text_at(
                    &format_money(computed.discount_amount, currency),
                    9.0,
                    COL_DISC,
                    page.y,
                    false,
                );
                page.text_at("-", 9.0, COL_TOTAL, page.y, false);
            } else {
                page.text_at(&item.quantity.to_string(), 9.0, COL_QTY, page.y, false);
                page.text_at(
                    &format_money(item.unit_price, currency),
                    9.0,
                    COL_UNIT,
                    page.y,
                    false,
                );
                let discount = if item.has_discount && item.discount_percent > 0.0 {
                    format!("{}%", item.discount_percent)
                } else {
                    "-".to_string()
                };
                page.text_at(&discount, 9.0, COL_DISC, page.y, false);
                page.text_at(
                    &format_money(computed.line_total, currency),
                    9.0,
                    COL_TOTAL,
                    page.y,
                    false,
                );
            }
            page.y -= 5.0;

            for line in &desc_lines[1..] {
                page.ensure_space(5.0);
                page.text_at(line, 8.0, COL_DESC + 2.0, page.y, false);
                page.y -= 4.0;
            }
        }
        page.y -= 4.0;
    }

    fn draw_totals(&self, page: &mut PageWriter) {
        let totals = compute_totals(&self.quotation.items);
        let currency = self.quotation.currency;

        let mut rows: Vec<(&str, String, bool)> = vec![(
            "Subtotal",
            format_money(totals.gross_subtotal, currency),
            false,
        )];
        if totals.discounts > 0.0 {
            rows.push((
                "Descuentos",
                format!("-{}", format_money(totals.discounts, currency)),
                false,
            ));
            rows.push(("Neto", format_money(totals.subtotal, currency), false));
        }
        rows.push(("IVA (19%)", format_money(totals.tax, currency), false));
        rows.push(("TOTAL", format_money(totals.total, currency), true));

        page.ensure_space(6.0 * rows.len() as f32 + 6.0);
        page.hline_from(140.0, page.y + 2.0);
        for (label, value, bold) in rows {
            let size = if bold { 11.0 } else { 10.0 };
            page.text_at(label, size, 142.0, page.y - 4.0, true);
            page.text_at(&value, size, COL_TOTAL, page.y - 4.0, bold);
            page.y -= 6.0;
        }
        page.y -= 6.0;
    }

    fn draw_thumbnails(&self, page: &mut PageWriter) {
        let mut x = MARGIN_LEFT;
        let mut drew_any = false;

        for item in &self.quotation.items {
            let url = match item.image_url() {
                Some(url) => url,
                None => continue,
            };
            let bytes = match self.images.get(url) {
                Some(Some(bytes)) => bytes,
                _ => continue,
            };
            let image = match decode_image(bytes) {
                Some(image) => image,
                None => {
                    warn!(%url, "unsupported image format, skipping thumbnail");
                    continue;
                }
            };

            if !drew_any {
                page.ensure_space(THUMB_HEIGHT + 10.0);
                drew_any = true;
            }
            if x + THUMB_MAX_WIDTH > MARGIN_RIGHT {
                break;
            }

            // Natural size assumes the default 300 dpi placement
            let natural_w = image.image.width.0 as f32 * 25.4 / 300.0;
            let natural_h = image.image.height.0 as f32 * 25.4 / 300.0;
            if natural_w <= 0.0 || natural_h <= 0.0 {
                continue;
            }
            let scale = (THUMB_HEIGHT / natural_h).min(THUMB_MAX_WIDTH / natural_w);
            image.add_to_layer(
                page.layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(x)),
                    translate_y: Some(Mm(page.y - THUMB_HEIGHT)),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    ..Default::default()
                },
            );
            x += THUMB_MAX_WIDTH + 5.0;
        }

        if drew_any {
            page.y -= THUMB_HEIGHT + 8.0;
        }
    }

    fn draw_payment_terms(&self, page: &mut PageWriter) {
        let issuer = self.quotation.origin.issuer();
        let lines = 3 + issuer.bank_lines.len();
        page.ensure_space(4.5 * lines as f32 + 6.0);

        page.text_at("Forma de pago", 10.0, MARGIN_LEFT, page.y, true);
        page.y -= 5.0;
        page.text_at(
            "Transferencia electrónica. Validez de la oferta: 15 días.",
            9.0,
            MARGIN_LEFT,
            page.y,
            false,
        );
        page.y -= 5.0;
        for line in issuer.bank_lines {
            page.text_at(line, 9.0, MARGIN_LEFT, page.y, false);
            page.y -= 4.5;
        }
        page.y -= 4.0;
    }

    fn draw_footer(&self, page: &mut PageWriter) {
        let comment = self.quotation.comment.trim();
        if !comment.is_empty() {
            let lines = wrap_text(comment, 100);
            page.ensure_space(4.5 * lines.len() as f32 + 8.0);
            page.text_at("Observaciones", 10.0, MARGIN_LEFT, page.y, true);
            page.y -= 5.0;
            for line in lines {
                page.text_at(&line, 9.0, MARGIN_LEFT, page.y, false);
                page.y -= 4.5;
            }
            page.y -= 4.0;
        }

        page.ensure_space(16.0);
        page.hline_from(140.0, page.y - 8.0);
        page.text_at(
            self.quotation.origin.issuer().name,
            9.0,
            142.0,
            page.y - 13.0,
            false,
        );
    }
}

// ============================================================================
// Page cursor
// ============================================================================

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> ExportResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Capa 1");
        let layer = doc.get_page(page).get_layer(layer);
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        Ok(Self {
            doc,
            layer,
            font,
            bold,
            y: TOP_Y,
        })
    }

    fn text_at(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.font };
        self.layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    fn hline(&self, y: f32) {
        self.hline_from(MARGIN_LEFT, y);
    }

    fn hline_from(&self, x: f32, y: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x), Mm(y)), false),
                (Point::new(Mm(MARGIN_RIGHT), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    /// Break to a fresh page when fewer than `needed` mm remain
    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < BOTTOM_Y {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Capa 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_Y;
        }
    }

    fn finish(self) -> ExportResult<Vec<u8>> {
        let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
        self.doc.save(&mut writer)?;
        writer
            .into_inner()
            .map_err(|e| ExportError::Internal(e.to_string()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn item_description_lines(item: &LineItem) -> Vec<String> {
    let mut lines = wrap_text(&item.name, 60);
    if lines.is_empty() {
        lines.push("(sin nombre)".to_string());
    }
    if let Some(desc) = item.description.as_deref() {
        lines.extend(wrap_text(desc, 70));
    }
    lines
}

/// Greedy word wrap by character count
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn decode_image(bytes: &[u8]) -> Option<Image> {
    let cursor = std::io::Cursor::new(bytes);
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        PngDecoder::new(cursor).ok().and_then(|d| Image::try_from(d).ok())
    } else if bytes.starts_with(&[0xFF, 0xD8]) {
        JpegDecoder::new(cursor).ok().and_then(|d| Image::try_from(d).ok())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Currency, ItemKind, Origin, QuotationKind, QuotationState};

    fn make_quotation(items: Vec<LineItem>) -> Quotation {
        Quotation {
            id: Some("q1".to_string()),
            folio: Some(42),
            entity_id: Some(1),
            entity_name: "ACME Ltda.".to_string(),
            state: QuotationState::Generada,
            kind: QuotationKind::Cliente,
            origin: Origin::Servitec,
            comment: "Incluye traslado".to_string(),
            currency: Currency::Clp,
            exchange_rate: 1.0,
            sections: vec![Section {
                id: 1,
                name: "Servicios".to_string(),
                description: None,
                order_index: 0,
            }],
            items,
            created_at: Some(1_749_000_000_000),
            updated_at: None,
        }
    }

    fn make_item(id: i64, price: f64) -> LineItem {
        LineItem {
            id,
            section: Some(1),
            kind: ItemKind::Service { has_tax: true },
            name: format!("Servicio {id}"),
            description: Some("Incluye mano de obra y repuestos menores".to_string()),
            quantity: 1,
            unit_price: price,
            unit_price_clp: price,
            has_discount: false,
            discount_percent: 0.0,
        }
    }

    #[test]
    fn test_empty_quotation_is_rejected_before_drawing() {
        let quotation = make_quotation(vec![]);
        let images = HashMap::new();
        assert!(matches!(
            QuotationPdf::new(&quotation, &images).render(),
            Err(ExportError::EmptyQuotation)
        ));
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let quotation = make_quotation(vec![make_item(10, 45000.0)]);
        let images = HashMap::new();
        let bytes = QuotationPdf::new(&quotation, &images).render().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_many_items_still_render() {
        let items = (0..120).map(|i| make_item(i, 10000.0)).collect();
        let quotation = make_quotation(items);
        let images = HashMap::new();
        let bytes = QuotationPdf::new(&quotation, &images).render().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_missing_image_bytes_do_not_fail_render() {
        let mut item = make_item(10, 45000.0);
        item.kind = ItemKind::Product {
            cost_price: None,
            profit_percent: None,
            sku: None,
            image_url: Some("https://cdn.example.com/x.png".to_string()),
            has_tax: true,
        };
        let quotation = make_quotation(vec![item]);
        let mut images = HashMap::new();
        images.insert("https://cdn.example.com/x.png".to_string(), None);
        assert!(QuotationPdf::new(&quotation, &images).render().is_ok());
    }

    #[test]
    fn test_wrap_text_respects_limit() {
        let lines = wrap_text("uno dos tres cuatro cinco", 9);
        assert!(lines.iter().all(|l| l.chars().count() <= 9));
        assert_eq!(lines.join(" "), "uno dos tres cuatro cinco");
    }
}
