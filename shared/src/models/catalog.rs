//! Catalog models (products and services offered by the business)

use serde::{Deserialize, Serialize};

/// Catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sale price in CLP
    pub price_clp: f64,
    /// Cost price in CLP (margin math only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price_clp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_active: bool,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price_clp: f64,
    pub cost_price_clp: Option<f64>,
    pub sku: Option<String>,
    pub image_url: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_clp: Option<f64>,
    pub cost_price_clp: Option<f64>,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Catalog service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogService {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sale price in CLP
    pub price_clp: f64,
    pub is_active: bool,
}

/// Create service payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
    pub description: Option<String>,
    pub price_clp: f64,
}

/// Update service payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_clp: Option<f64>,
    pub is_active: Option<bool>,
}
