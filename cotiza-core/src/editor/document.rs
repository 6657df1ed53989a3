//! Quotation document transitions

use chrono::NaiveDate;
use shared::models::{
    CatalogProduct, CatalogService, Currency, ItemKind, LineItem, Origin, Quotation,
    QuotationKind, QuotationState, Section,
};
use shared::util::snowflake_id;
use std::collections::HashMap;
use tracing::debug;

use crate::pricing::{self, compute_totals, QuotationTotals};

use super::EditorError;

/// Kind selector for [`QuotationEditor::add_item`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewItem {
    Product,
    Service,
    /// Ad-hoc discount adjustment: starts at a 10% example percentage
    /// with the discount flag on, quantity locked to 1
    Discount,
}

/// Owner of one in-memory quotation for the duration of an editing
/// session. Nothing else mutates the document while an editor holds it.
#[derive(Debug, Clone)]
pub struct QuotationEditor {
    doc: Quotation,
}

impl QuotationEditor {
    /// Fresh draft with a single default section
    pub fn new(origin: Origin) -> Self {
        let doc = Quotation {
            id: None,
            folio: None,
            entity_id: None,
            entity_name: String::new(),
            state: QuotationState::Borrador,
            kind: QuotationKind::Cliente,
            origin,
            comment: String::new(),
            currency: Currency::Clp,
            exchange_rate: 1.0,
            sections: vec![Section {
                id: snowflake_id(),
                name: "General".to_string(),
                description: None,
                order_index: 0,
            }],
            items: vec![],
            created_at: None,
            updated_at: None,
        };
        Self { doc }
    }

    /// Resume editing a fetched quotation
    pub fn from_quotation(doc: Quotation) -> Self {
        Self { doc }
    }

    pub fn document(&self) -> &Quotation {
        &self.doc
    }

    pub fn into_document(self) -> Quotation {
        self.doc
    }

    // ========================================================================
    // Header fields
    // ========================================================================

    pub fn set_entity(&mut self, id: i64, name: impl Into<String>) {
        self.doc.entity_id = Some(id);
        self.doc.entity_name = name.into();
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.doc.comment = comment.into();
    }

    pub fn set_kind(&mut self, kind: QuotationKind) {
        self.doc.kind = kind;
    }

    pub fn set_origin(&mut self, origin: Origin) {
        self.doc.origin = origin;
    }

    /// Any state-to-state transition is permitted (manual override).
    pub fn set_state(&mut self, state: QuotationState) {
        debug!(from = ?self.doc.state, to = ?state, "quotation state change");
        self.doc.state = state;
    }

    // ========================================================================
    // Currency
    // ========================================================================

    /// Switch the active display currency, re-deriving every item's
    /// displayed price from its shadow CLP price. The rate is kept only
    /// while USD is active and reset to 1.0 on the way back to CLP.
    pub fn set_currency(&mut self, currency: Currency, rate: f64) -> Result<(), EditorError> {
        let rate = match currency {
            Currency::Clp => 1.0,
            Currency::Usd => {
                if rate <= 0.0 {
                    return Err(EditorError::InvalidRate(rate));
                }
                rate
            }
        };

        self.doc.currency = currency;
        self.doc.exchange_rate = rate;
        for item in &mut self.doc.items {
            item.unit_price = pricing::derive_displayed(item.unit_price_clp, currency, rate);
        }
        Ok(())
    }

    // ========================================================================
    // Sections
    // ========================================================================

    pub fn add_section(&mut self, name: impl Into<String>) -> i64 {
        let id = snowflake_id();
        let order_index = self.doc.sections.len() as i32;
        self.doc.sections.push(Section {
            id,
            name: name.into(),
            description: None,
            order_index,
        });
        id
    }

    pub fn rename_section(&mut self, id: i64, name: impl Into<String>) -> Result<(), EditorError> {
        let section = self
            .doc
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(EditorError::SectionNotFound(id))?;
        section.name = name.into();
        Ok(())
    }

    /// Items still referencing the section to be removed; callers warn
    /// the user with this count before confirming.
    pub fn section_item_count(&self, id: i64) -> usize {
        self.doc.items.iter().filter(|i| i.section == Some(id)).count()
    }

    /// Remove a section together with its items. Blocked only when it
    /// would leave the quotation without sections.
    pub fn remove_section(&mut self, id: i64) -> Result<(), EditorError> {
        if !self.doc.sections.iter().any(|s| s.id == id) {
            return Err(EditorError::SectionNotFound(id));
        }
        if self.doc.sections.len() == 1 {
            return Err(EditorError::LastSection);
        }
        self.doc.sections.retain(|s| s.id != id);
        self.doc.items.retain(|i| i.section != Some(id));
        Ok(())
    }

    /// Sections in display order (explicit index, stable on ties)
    pub fn ordered_sections(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.doc.sections.iter().collect();
        sections.sort_by_key(|s| s.order_index);
        sections
    }

    pub fn section_items(&self, id: i64) -> Vec<&LineItem> {
        self.doc.items.iter().filter(|i| i.section == Some(id)).collect()
    }

    /// Items whose section reference resolves to nothing (loose integer
    /// reference; rendered as "ungrouped", never fatal)
    pub fn ungrouped_items(&self) -> Vec<&LineItem> {
        self.doc
            .items
            .iter()
            .filter(|i| match i.section {
                None => true,
                Some(sid) => !self.doc.sections.iter().any(|s| s.id == sid),
            })
            .collect()
    }

    pub fn section_subtotal(&self, id: i64) -> QuotationTotals {
        let items: Vec<LineItem> = self
            .doc
            .items
            .iter()
            .filter(|i| i.section == Some(id))
            .cloned()
            .collect();
        compute_totals(&items)
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// Add a blank item of the given kind to a section. Product and
    /// service rows start empty awaiting a catalog pick or manual entry.
    pub fn add_item(&mut self, kind: NewItem, section: Option<i64>) -> Result<i64, EditorError> {
        if let Some(sid) = section {
            if !self.doc.sections.iter().any(|s| s.id == sid) {
                return Err(EditorError::SectionNotFound(sid));
            }
        }

        let id = snowflake_id();
        let item = match kind {
            NewItem::Product => LineItem {
                id,
                section,
                kind: ItemKind::Product {
                    cost_price: None,
                    profit_percent: None,
                    sku: None,
                    image_url: None,
                    has_tax: true,
                },
                name: String::new(),
                description: None,
                quantity: 1,
                unit_price: 0.0,
                unit_price_clp: 0.0,
                has_discount: false,
                discount_percent: 0.0,
            },
            NewItem::Service => LineItem {
                id,
                section,
                kind: ItemKind::Service { has_tax: true },
                name: String::new(),
                description: None,
                quantity: 1,
                unit_price: 0.0,
                unit_price_clp: 0.0,
                has_discount: false,
                discount_percent: 0.0,
            },
            NewItem::Discount => LineItem {
                id,
                section,
                kind: ItemKind::Discount,
                name: "Descuento".to_string(),
                description: None,
                quantity: 1,
                unit_price: 0.0,
                unit_price_clp: 0.0,
                has_discount: true,
                discount_percent: 10.0,
            },
        };
        self.doc.items.push(item);
        Ok(id)
    }

    /// Add a row from the product catalog, deriving the displayed price
    /// from the catalog's CLP price under the active currency
    pub fn add_catalog_product(
        &mut self,
        product: &CatalogProduct,
        section: Option<i64>,
    ) -> Result<i64, EditorError> {
        let id = self.add_item(NewItem::Product, section)?;
        let currency = self.doc.currency;
        let rate = self.doc.exchange_rate;
        let item = self.item_mut(id)?;
        item.name = product.name.clone();
        item.description = product.description.clone();
        item.unit_price_clp = product.price_clp;
        item.unit_price = pricing::derive_displayed(product.price_clp, currency, rate);
        item.kind = ItemKind::Product {
            cost_price: product.cost_price_clp,
            profit_percent: None,
            sku: product.sku.clone(),
            image_url: product.image_url.clone(),
            has_tax: true,
        };
        Ok(id)
    }

    pub fn add_catalog_service(
        &mut self,
        service: &CatalogService,
        section: Option<i64>,
    ) -> Result<i64, EditorError> {
        let id = self.add_item(NewItem::Service, section)?;
        let currency = self.doc.currency;
        let rate = self.doc.exchange_rate;
        let item = self.item_mut(id)?;
        item.name = service.name.clone();
        item.description = service.description.clone();
        item.unit_price_clp = service.price_clp;
        item.unit_price = pricing::derive_displayed(service.price_clp, currency, rate);
        Ok(id)
    }

    pub fn remove_item(&mut self, id: i64) -> Result<(), EditorError> {
        let before = self.doc.items.len();
        self.doc.items.retain(|i| i.id != id);
        if self.doc.items.len() == before {
            return Err(EditorError::ItemNotFound(id));
        }
        Ok(())
    }

    pub fn set_item_name(&mut self, id: i64, name: impl Into<String>) -> Result<(), EditorError> {
        self.item_mut(id)?.name = name.into();
        Ok(())
    }

    /// Update a user-entered displayed price, normalizing the shadow CLP
    /// price from it (the only direction the shadow field is written)
    pub fn set_item_price(&mut self, id: i64, displayed: f64) -> Result<(), EditorError> {
        if displayed < 0.0 {
            return Err(EditorError::Validation(format!(
                "El precio no puede ser negativo: {displayed}"
            )));
        }
        let currency = self.doc.currency;
        let rate = self.doc.exchange_rate;
        let item = self.item_mut(id)?;
        item.unit_price = displayed;
        item.unit_price_clp = pricing::to_clp(displayed, currency, rate);
        Ok(())
    }

    pub fn set_item_quantity(&mut self, id: i64, quantity: i32) -> Result<(), EditorError> {
        if quantity <= 0 {
            return Err(EditorError::Validation(format!(
                "La cantidad debe ser positiva: {quantity}"
            )));
        }
        let item = self.item_mut(id)?;
        if item.kind.is_discount() {
            return Err(EditorError::Validation(
                "La cantidad de un descuento es fija en 1".to_string(),
            ));
        }
        item.quantity = quantity;
        Ok(())
    }

    pub fn set_item_discount(
        &mut self,
        id: i64,
        has_discount: bool,
        percent: f64,
    ) -> Result<(), EditorError> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(EditorError::Validation(format!(
                "El descuento debe estar entre 0 y 100: {percent}"
            )));
        }
        let item = self.item_mut(id)?;
        item.has_discount = has_discount;
        item.discount_percent = percent;
        Ok(())
    }

    pub fn move_item_to_section(
        &mut self,
        id: i64,
        section: Option<i64>,
    ) -> Result<(), EditorError> {
        if let Some(sid) = section {
            if !self.doc.sections.iter().any(|s| s.id == sid) {
                return Err(EditorError::SectionNotFound(sid));
            }
        }
        self.item_mut(id)?.section = section;
        Ok(())
    }

    fn item_mut(&mut self, id: i64) -> Result<&mut LineItem, EditorError> {
        self.doc
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(EditorError::ItemNotFound(id))
    }

    // ========================================================================
    // Derived values and duplication
    // ========================================================================

    pub fn totals(&self) -> QuotationTotals {
        compute_totals(&self.doc.items)
    }

    /// Clone into a brand-new draft: fresh ids throughout, no folio, and
    /// a dated `(Copia DD/MM/YYYY)` marker on the comment. The marker is
    /// idempotent: duplicating an already-marked quotation does not
    /// stack a second one.
    pub fn duplicate(&self, today: NaiveDate) -> Quotation {
        let mut copy = self.doc.clone();
        copy.id = None;
        copy.folio = None;
        copy.state = QuotationState::Borrador;
        copy.created_at = None;
        copy.updated_at = None;

        // Fresh section ids, remapping the loose item references
        let mut id_map: HashMap<i64, i64> = HashMap::new();
        for section in &mut copy.sections {
            let new_id = snowflake_id();
            id_map.insert(section.id, new_id);
            section.id = new_id;
        }
        for item in &mut copy.items {
            item.id = snowflake_id();
            // Orphaned references stay orphaned: they already render as
            // ungrouped and the copy keeps that behavior.
            if let Some(old) = item.section {
                item.section = id_map.get(&old).copied().or(item.section);
            }
        }

        if !copy.comment.contains("(Copia") {
            let marker = format!("(Copia {})", shared::util::format_date_dmy(today));
            copy.comment = if copy.comment.trim().is_empty() {
                marker
            } else {
                format!("{} {}", copy.comment.trim(), marker)
            };
        }

        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with_service(price: f64) -> (QuotationEditor, i64) {
        let mut editor = QuotationEditor::new(Origin::Servitec);
        editor.set_entity(7, "ACME Ltda.");
        let section = editor.document().sections[0].id;
        let id = editor.add_item(NewItem::Service, Some(section)).unwrap();
        editor.set_item_name(id, "Soporte mensual").unwrap();
        editor.set_item_price(id, price).unwrap();
        (editor, id)
    }

    #[test]
    fn test_new_discount_item_defaults() {
        let mut editor = QuotationEditor::new(Origin::Servitec);
        let id = editor.add_item(NewItem::Discount, None).unwrap();
        let item = editor.document().items.iter().find(|i| i.id == id).unwrap();

        assert!(item.has_discount);
        assert_eq!(item.discount_percent, 10.0);
        assert_eq!(item.quantity, 1);
        assert!(item.kind.is_discount());
    }

    #[test]
    fn test_discount_quantity_locked() {
        let mut editor = QuotationEditor::new(Origin::Servitec);
        let id = editor.add_item(NewItem::Discount, None).unwrap();
        assert!(matches!(
            editor.set_item_quantity(id, 3),
            Err(EditorError::Validation(_))
        ));
    }

    #[test]
    fn test_currency_switch_rederives_from_shadow() {
        let (mut editor, id) = editor_with_service(1000.0);

        editor.set_currency(Currency::Usd, 950.0).unwrap();
        let item = editor.document().items.iter().find(|i| i.id == id).unwrap();
        assert!((item.unit_price - 1.0526).abs() < 0.001);
        assert_eq!(item.unit_price_clp, 1000.0);

        // Back to CLP: rate resets, displayed price is the shadow again
        editor.set_currency(Currency::Clp, 0.0).unwrap();
        let item = editor.document().items.iter().find(|i| i.id == id).unwrap();
        assert_eq!(item.unit_price, 1000.0);
        assert_eq!(editor.document().exchange_rate, 1.0);
    }

    #[test]
    fn test_repeated_currency_switch_does_not_drift() {
        let (mut editor, id) = editor_with_service(123457.0);
        for _ in 0..20 {
            editor.set_currency(Currency::Usd, 937.42).unwrap();
            editor.set_currency(Currency::Clp, 0.0).unwrap();
        }
        let item = editor.document().items.iter().find(|i| i.id == id).unwrap();
        assert_eq!(item.unit_price_clp, 123457.0);
        assert_eq!(item.unit_price, 123457.0);
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let (mut editor, _) = editor_with_service(1000.0);
        assert!(matches!(
            editor.set_currency(Currency::Usd, 0.0),
            Err(EditorError::InvalidRate(_))
        ));
        assert!(matches!(
            editor.set_currency(Currency::Usd, -3.0),
            Err(EditorError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_last_section_blocked() {
        let mut editor = QuotationEditor::new(Origin::Servitec);
        let only = editor.document().sections[0].id;
        assert!(matches!(
            editor.remove_section(only),
            Err(EditorError::LastSection)
        ));
    }

    #[test]
    fn test_remove_section_drops_its_items() {
        let (mut editor, _) = editor_with_service(1000.0);
        let extra = editor.add_section("Repuestos");
        let in_extra = editor.add_item(NewItem::Product, Some(extra)).unwrap();

        assert_eq!(editor.section_item_count(extra), 1);
        editor.remove_section(extra).unwrap();
        assert!(!editor.document().items.iter().any(|i| i.id == in_extra));
        assert_eq!(editor.document().items.len(), 1);
    }

    #[test]
    fn test_orphaned_reference_renders_ungrouped() {
        let (mut editor, id) = editor_with_service(1000.0);
        // Simulate a stale reference from the API
        editor.item_mut(id).unwrap().section = Some(999_999);
        assert_eq!(editor.ungrouped_items().len(), 1);
    }

    #[test]
    fn test_duplicate_appends_dated_marker() {
        let (mut editor, _) = editor_with_service(1000.0);
        editor.set_comment("Mantención anual");
        let today = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();

        let copy = editor.duplicate(today);
        assert_eq!(copy.comment, "Mantención anual (Copia 05/06/2025)");
        assert_eq!(copy.state, QuotationState::Borrador);
        assert!(copy.id.is_none());
        assert!(copy.folio.is_none());
    }

    #[test]
    fn test_duplicate_marker_is_idempotent() {
        let (mut editor, _) = editor_with_service(1000.0);
        editor.set_comment("Mantención anual");
        let today = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();

        let first = QuotationEditor::from_quotation(editor.duplicate(today));
        let second = first.duplicate(today);
        assert_eq!(second.comment, "Mantención anual (Copia 05/06/2025)");
    }

    #[test]
    fn test_duplicate_remaps_section_references() {
        let (mut editor, _) = editor_with_service(1000.0);
        let old_section = editor.document().sections[0].id;
        let copy = editor.duplicate(NaiveDate::from_ymd_opt(2025, 6, 5).unwrap());

        let new_section = copy.sections[0].id;
        assert_ne!(new_section, old_section);
        assert!(copy.items.iter().all(|i| i.section == Some(new_section)));
    }

    #[test]
    fn test_section_subtotal() {
        let (mut editor, _) = editor_with_service(1000.0);
        let extra = editor.add_section("Repuestos");
        let id = editor.add_item(NewItem::Service, Some(extra)).unwrap();
        editor.set_item_price(id, 500.0).unwrap();

        let subtotal = editor.section_subtotal(extra);
        assert_eq!(subtotal.gross_subtotal, 500.0);
    }
}
