use shared::models::{Currency, Quotation};

use super::EditorError;

/// Checks a quotation can be persisted or exported. The first failing
/// rule is returned as a user-facing Spanish message.
pub fn validate_for_save(doc: &Quotation) -> Result<(), EditorError> {
    if doc.entity_id.is_none() {
        return Err(EditorError::Validation(
            "Debe seleccionar un cliente".to_string(),
        ));
    }
    if doc.items.is_empty() {
        return Err(EditorError::Validation(
            "La cotización debe tener al menos un ítem".to_string(),
        ));
    }
    for item in &doc.items {
        if item.quantity <= 0 {
            return Err(EditorError::Validation(format!(
                "Cantidad inválida en \"{}\"",
                item.name
            )));
        }
        if item.unit_price < 0.0 {
            return Err(EditorError::Validation(format!(
                "Precio negativo en \"{}\"",
                item.name
            )));
        }
    }
    if doc.currency == Currency::Usd && doc.exchange_rate <= 0.0 {
        return Err(EditorError::Validation(
            "El tipo de cambio debe ser positivo".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{NewItem, QuotationEditor};
    use shared::models::Origin;

    #[test]
    fn test_requires_entity() {
        let mut editor = QuotationEditor::new(Origin::Servitec);
        editor.add_item(NewItem::Service, None).unwrap();
        assert!(validate_for_save(editor.document()).is_err());
    }

    #[test]
    fn test_requires_items() {
        let mut editor = QuotationEditor::new(Origin::Servitec);
        editor.set_entity(1, "ACME");
        assert!(validate_for_save(editor.document()).is_err());
    }

    #[test]
    fn test_valid_document_passes() {
        let mut editor = QuotationEditor::new(Origin::Servitec);
        editor.set_entity(1, "ACME");
        let id = editor.add_item(NewItem::Service, None).unwrap();
        editor.set_item_price(id, 1000.0).unwrap();
        assert!(validate_for_save(editor.document()).is_ok());
    }

    #[test]
    fn test_usd_requires_rate() {
        let mut editor = QuotationEditor::new(Origin::Servitec);
        editor.set_entity(1, "ACME");
        editor.add_item(NewItem::Service, None).unwrap();
        let mut doc = editor.into_document();
        doc.currency = Currency::Usd;
        doc.exchange_rate = 0.0;
        assert!(validate_for_save(&doc).is_err());
    }
}
