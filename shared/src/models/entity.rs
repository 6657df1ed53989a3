//! Entity (customer) Model

use serde::{Deserialize, Serialize};

/// Customer entity (razón social)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub name: String,
    /// Chilean tax identifier (RUT), formatted `NN.NNN.NNN-D`
    pub rut: String,
    #[serde(default)]
    pub address: String,
    pub commune: Option<String>,
    pub city: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Business line (giro) printed on exported documents
    pub business_line: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Create entity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityCreate {
    pub name: String,
    pub rut: String,
    pub address: Option<String>,
    pub commune: Option<String>,
    pub city: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub business_line: Option<String>,
}

/// Update entity payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EntityUpdate {
    pub name: Option<String>,
    pub rut: Option<String>,
    pub address: Option<String>,
    pub commune: Option<String>,
    pub city: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub business_line: Option<String>,
}
