//! Quotation line item model
//!
//! A line item is one priced row inside a quotation. The three kinds
//! (catalog product, catalog service, ad-hoc discount adjustment) carry
//! different payloads, so the kind is a tagged union rather than a string
//! tag with optional fields sprinkled on the side.

use serde::{Deserialize, Serialize};

/// Kind-specific payload of a line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    /// Catalog product row
    Product {
        /// Cost price, always in CLP (margin math only, never totals)
        #[serde(skip_serializing_if = "Option::is_none")]
        cost_price: Option<f64>,
        /// Declared profit percentage (informational)
        #[serde(skip_serializing_if = "Option::is_none")]
        profit_percent: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sku: Option<String>,
        /// Remote image URL, fetched lazily at export time
        #[serde(skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
        has_tax: bool,
    },
    /// Catalog service row
    Service { has_tax: bool },
    /// Ad-hoc discount adjustment. Quantity is fixed at 1; tax and
    /// profit are inapplicable and must render as "not applicable".
    Discount,
}

impl ItemKind {
    pub fn is_discount(&self) -> bool {
        matches!(self, ItemKind::Discount)
    }

    /// Whether tax applies to this row (never for discount adjustments)
    pub fn has_tax(&self) -> bool {
        match self {
            ItemKind::Product { has_tax, .. } => *has_tax,
            ItemKind::Service { has_tax } => *has_tax,
            ItemKind::Discount => false,
        }
    }
}

/// One priced row inside a quotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: i64,
    /// Loose section reference. An id that resolves to no section is
    /// rendered as "ungrouped", never treated as fatal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<i64>,
    pub kind: ItemKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Positive; locked to 1 for discount adjustments
    pub quantity: i32,
    /// Unit price as displayed in the quotation's active currency
    pub unit_price: f64,
    /// Unit price permanently normalized to CLP. Source of truth for
    /// margin math; displayed prices derive from it, never the reverse
    /// after a currency switch.
    pub unit_price_clp: f64,
    /// Gates `discount_percent`; when false the percentage is ignored
    /// even if non-zero
    pub has_discount: bool,
    /// 0-100
    pub discount_percent: f64,
}

impl LineItem {
    /// Image URL for product rows (the only kind that carries one)
    pub fn image_url(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Product { image_url, .. } => image_url.as_deref(),
            _ => None,
        }
    }
}
