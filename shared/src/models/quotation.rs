//! Quotation Model

use serde::{Deserialize, Serialize};

use super::line_item::LineItem;

/// Quotation lifecycle state.
///
/// The console deliberately permits direct transitions between any two
/// states (manual override by the back office), so no ordering is
/// enforced here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuotationState {
    #[default]
    Borrador,
    Generada,
    Enviada,
    Aprobada,
    Rechazada,
}

impl QuotationState {
    pub fn display_name(&self) -> &'static str {
        match self {
            QuotationState::Borrador => "Borrador",
            QuotationState::Generada => "Generada",
            QuotationState::Enviada => "Enviada",
            QuotationState::Aprobada => "Aprobada",
            QuotationState::Rechazada => "Rechazada",
        }
    }
}

/// Quotation kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuotationKind {
    #[default]
    Cliente,
    Interna,
    Proveedor,
}

/// Active display currency. Exactly one per quotation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    /// Chilean peso; integer display with thousands separators
    #[default]
    Clp,
    /// US dollar; two-decimal display, derived as `clp / exchange_rate`
    Usd,
}

/// Issuer identity selector. Each value resolves to a fixed letterhead
/// block (name, RUT, address, bank details) on exported documents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Origin {
    #[default]
    Servitec,
    ServitecSpa,
    Integra,
}

/// Letterhead block of one issuer identity
#[derive(Debug, Clone)]
pub struct IssuerInfo {
    pub name: &'static str,
    pub rut: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    /// Bank-transfer block printed under the payment terms
    pub bank_lines: &'static [&'static str],
}

impl Origin {
    pub fn issuer(&self) -> IssuerInfo {
        match self {
            Origin::Servitec => IssuerInfo {
                name: "Servitec Computación Ltda.",
                rut: "76.412.338-0",
                address: "Av. Libertad 1348, Of. 704, Viña del Mar",
                phone: "+56 32 269 4412",
                email: "contacto@servitec.cl",
                bank_lines: &[
                    "Banco de Chile, Cta. Cte. 168-03225-09",
                    "Titular: Servitec Computación Ltda.",
                    "RUT 76.412.338-0 - pagos@servitec.cl",
                ],
            },
            Origin::ServitecSpa => IssuerInfo {
                name: "Servitec Servicios Informáticos SpA",
                rut: "77.205.114-6",
                address: "Calle Valparaíso 572, Viña del Mar",
                phone: "+56 32 269 4412",
                email: "spa@servitec.cl",
                bank_lines: &[
                    "Banco Santander, Cta. Cte. 0-070-8841233-1",
                    "Titular: Servitec Servicios Informáticos SpA",
                    "RUT 77.205.114-6 - pagos@servitec.cl",
                ],
            },
            Origin::Integra => IssuerInfo {
                name: "Integra Soluciones TI Ltda.",
                rut: "76.980.427-K",
                address: "Av. Providencia 2133, Of. 310, Santiago",
                phone: "+56 2 2335 8740",
                email: "ventas@integrati.cl",
                bank_lines: &[
                    "Banco BCI, Cta. Cte. 77-03118-22",
                    "Titular: Integra Soluciones TI Ltda.",
                    "RUT 76.980.427-K - facturacion@integrati.cl",
                ],
            },
        }
    }
}

/// Named grouping of line items inside one quotation, for subtotaling
/// and print layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit ordering; ties broken by stable input order
    pub order_index: i32,
}

/// Quotation aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    /// Server-assigned document id (absent until first save)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Zero-padded sequential folio, assigned on first save
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folio: Option<i64>,
    pub entity_id: Option<i64>,
    /// Denormalized entity name snapshot (survives entity rename)
    #[serde(default)]
    pub entity_name: String,
    pub state: QuotationState,
    pub kind: QuotationKind,
    pub origin: Origin,
    #[serde(default)]
    pub comment: String,
    pub currency: Currency,
    /// CLP per USD. Meaningful only when `currency == Usd`; reset to 1.0
    /// when switching back to CLP.
    pub exchange_rate: f64,
    pub sections: Vec<Section>,
    pub items: Vec<LineItem>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Quotation {
    /// Zero-padded folio code for filenames and the document header.
    /// `None` while the quotation is an unsaved draft.
    pub fn folio_code(&self) -> Option<String> {
        self.folio.map(|folio| format!("COT-{:05}", folio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wire_format() {
        let s = serde_json::to_string(&QuotationState::Borrador).unwrap();
        assert_eq!(s, "\"BORRADOR\"");
    }

    #[test]
    fn test_folio_code_zero_padding() {
        let q = Quotation {
            id: None,
            folio: Some(42),
            entity_id: None,
            entity_name: String::new(),
            state: QuotationState::default(),
            kind: QuotationKind::default(),
            origin: Origin::default(),
            comment: String::new(),
            currency: Currency::default(),
            exchange_rate: 1.0,
            sections: vec![],
            items: vec![],
            created_at: None,
            updated_at: None,
        };
        assert_eq!(q.folio_code().as_deref(), Some("COT-00042"));

        let mut draft = q;
        draft.folio = None;
        assert!(draft.folio_code().is_none());
    }

    #[test]
    fn test_every_origin_has_bank_block() {
        for origin in [Origin::Servitec, Origin::ServitecSpa, Origin::Integra] {
            let issuer = origin.issuer();
            assert!(!issuer.bank_lines.is_empty());
            assert!(!issuer.rut.is_empty());
        }
    }
}
