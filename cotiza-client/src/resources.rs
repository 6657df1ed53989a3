//! Typed REST calls per resource
//!
//! Entities, catalog products/services and quotations expose the full
//! list/get/create/update/delete surface. Visits, companies and
//! technicians are read-only snapshots on the server side, so only
//! list and get are exposed for them.

use crate::{ApiResponse, ClientResult, NetworkClient};
use shared::models::{
    CatalogProduct, CatalogService, Company, Entity, EntityCreate, EntityUpdate, ProductCreate,
    ProductUpdate, Quotation, ServiceCreate, ServiceUpdate, Technician, VisitRecord,
};

/// Common list parameters (search text plus 1-based pagination, all
/// optional; `Default` yields an unscoped list)
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListQuery {
    pub fn search(text: &str) -> Self {
        Self {
            search: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            search: None,
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// Query-string suffix for a collection path (empty string when no
    /// parameter is set)
    fn to_query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(search) = self.search.as_deref() {
            if !search.is_empty() {
                params.push(format!("search={}", urlencode(search)));
            }
        }
        if let Some(page) = self.page {
            params.push(format!("page={page}"));
        }
        if let Some(page_size) = self.page_size {
            params.push(format!("page_size={page_size}"));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

impl NetworkClient {
    // ========================================================================
    // Entities (customers)
    // ========================================================================

    pub async fn list_entities(&self, query: &ListQuery) -> ClientResult<Vec<Entity>> {
        let path = format!("/api/entities{}", query.to_query_string());
        let resp: ApiResponse<Vec<Entity>> = self.get(&path).await?;
        Self::expect_data(resp)
    }

    pub async fn get_entity(&self, id: i64) -> ClientResult<Entity> {
        let resp: ApiResponse<Entity> = self.get(&format!("/api/entities/{id}")).await?;
        Self::expect_data(resp)
    }

    pub async fn create_entity(&self, entity: &EntityCreate) -> ClientResult<Entity> {
        let resp: ApiResponse<Entity> = self.post("/api/entities", entity).await?;
        Self::expect_data(resp)
    }

    pub async fn update_entity(&self, id: i64, entity: &EntityUpdate) -> ClientResult<Entity> {
        let resp: ApiResponse<Entity> = self.put(&format!("/api/entities/{id}"), entity).await?;
        Self::expect_data(resp)
    }

    pub async fn delete_entity(&self, id: i64) -> ClientResult<()> {
        let _: ApiResponse<()> = self.delete(&format!("/api/entities/{id}")).await?;
        Ok(())
    }

    // ========================================================================
    // Catalog products
    // ========================================================================

    pub async fn list_products(&self, query: &ListQuery) -> ClientResult<Vec<CatalogProduct>> {
        let path = format!("/api/products{}", query.to_query_string());
        let resp: ApiResponse<Vec<CatalogProduct>> = self.get(&path).await?;
        Self::expect_data(resp)
    }

    pub async fn get_product(&self, id: i64) -> ClientResult<CatalogProduct> {
        let resp: ApiResponse<CatalogProduct> = self.get(&format!("/api/products/{id}")).await?;
        Self::expect_data(resp)
    }

    pub async fn create_product(&self, product: &ProductCreate) -> ClientResult<CatalogProduct> {
        let resp: ApiResponse<CatalogProduct> = self.post("/api/products", product).await?;
        Self::expect_data(resp)
    }

    pub async fn update_product(
        &self,
        id: i64,
        product: &ProductUpdate,
    ) -> ClientResult<CatalogProduct> {
        let resp: ApiResponse<CatalogProduct> =
            self.put(&format!("/api/products/{id}"), product).await?;
        Self::expect_data(resp)
    }

    pub async fn delete_product(&self, id: i64) -> ClientResult<()> {
        let _: ApiResponse<()> = self.delete(&format!("/api/products/{id}")).await?;
        Ok(())
    }

    // ========================================================================
    // Catalog services
    // ========================================================================

    pub async fn list_services(&self, query: &ListQuery) -> ClientResult<Vec<CatalogService>> {
        let path = format!("/api/services{}", query.to_query_string());
        let resp: ApiResponse<Vec<CatalogService>> = self.get(&path).await?;
        Self::expect_data(resp)
    }

    pub async fn get_service(&self, id: i64) -> ClientResult<CatalogService> {
        let resp: ApiResponse<CatalogService> = self.get(&format!("/api/services/{id}")).await?;
        Self::expect_data(resp)
    }

    pub async fn create_service(&self, service: &ServiceCreate) -> ClientResult<CatalogService> {
        let resp: ApiResponse<CatalogService> = self.post("/api/services", service).await?;
        Self::expect_data(resp)
    }

    pub async fn update_service(
        &self,
        id: i64,
        service: &ServiceUpdate,
    ) -> ClientResult<CatalogService> {
        let resp: ApiResponse<CatalogService> =
            self.put(&format!("/api/services/{id}"), service).await?;
        Self::expect_data(resp)
    }

    pub async fn delete_service(&self, id: i64) -> ClientResult<()> {
        let _: ApiResponse<()> = self.delete(&format!("/api/services/{id}")).await?;
        Ok(())
    }

    // ========================================================================
    // Quotations
    // ========================================================================

    pub async fn list_quotations(&self, query: &ListQuery) -> ClientResult<Vec<Quotation>> {
        let path = format!("/api/quotations{}", query.to_query_string());
        let resp: ApiResponse<Vec<Quotation>> = self.get(&path).await?;
        Self::expect_data(resp)
    }

    pub async fn get_quotation(&self, id: &str) -> ClientResult<Quotation> {
        let resp: ApiResponse<Quotation> = self.get(&format!("/api/quotations/{id}")).await?;
        Self::expect_data(resp)
    }

    pub async fn create_quotation(&self, quotation: &Quotation) -> ClientResult<Quotation> {
        let resp: ApiResponse<Quotation> = self.post("/api/quotations", quotation).await?;
        Self::expect_data(resp)
    }

    pub async fn update_quotation(&self, id: &str, quotation: &Quotation) -> ClientResult<Quotation> {
        let resp: ApiResponse<Quotation> =
            self.put(&format!("/api/quotations/{id}"), quotation).await?;
        Self::expect_data(resp)
    }

    pub async fn delete_quotation(&self, id: &str) -> ClientResult<()> {
        let _: ApiResponse<()> = self.delete(&format!("/api/quotations/{id}")).await?;
        Ok(())
    }

    // ========================================================================
    // Visits and their lookups (read-only)
    // ========================================================================

    /// Full unpaginated visit list for export, optionally scoped by a
    /// date range (YYYY-MM-DD)
    pub async fn list_visits(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> ClientResult<Vec<VisitRecord>> {
        let mut path = "/api/visits?all=true".to_string();
        if let Some(from) = from {
            path.push_str(&format!("&from={}", urlencode(from)));
        }
        if let Some(to) = to {
            path.push_str(&format!("&to={}", urlencode(to)));
        }
        let resp: ApiResponse<Vec<VisitRecord>> = self.get(&path).await?;
        Self::expect_data(resp)
    }

    pub async fn get_visit(&self, id: i64) -> ClientResult<VisitRecord> {
        let resp: ApiResponse<VisitRecord> = self.get(&format!("/api/visits/{id}")).await?;
        Self::expect_data(resp)
    }

    pub async fn list_companies(&self, query: &ListQuery) -> ClientResult<Vec<Company>> {
        let path = format!("/api/companies{}", query.to_query_string());
        let resp: ApiResponse<Vec<Company>> = self.get(&path).await?;
        Self::expect_data(resp)
    }

    pub async fn get_company(&self, id: i64) -> ClientResult<Company> {
        let resp: ApiResponse<Company> = self.get(&format!("/api/companies/{id}")).await?;
        Self::expect_data(resp)
    }

    pub async fn list_technicians(&self, query: &ListQuery) -> ClientResult<Vec<Technician>> {
        let path = format!("/api/technicians{}", query.to_query_string());
        let resp: ApiResponse<Vec<Technician>> = self.get(&path).await?;
        Self::expect_data(resp)
    }

    pub async fn get_technician(&self, id: i64) -> ClientResult<Technician> {
        let resp: ApiResponse<Technician> = self.get(&format!("/api/technicians/{id}")).await?;
        Self::expect_data(resp)
    }
}

/// Minimal percent-encoding for query values
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencode_spaces_and_accents() {
        assert_eq!(urlencode("soporte anual"), "soporte%20anual");
        assert_eq!(urlencode("mantención"), "mantenci%C3%B3n");
        assert_eq!(urlencode("plain-name_1.0~x"), "plain-name_1.0~x");
    }

    #[test]
    fn test_list_query_defaults_to_no_suffix() {
        assert_eq!(ListQuery::default().to_query_string(), "");
        assert_eq!(ListQuery::search("").to_query_string(), "");
    }

    #[test]
    fn test_list_query_combines_search_and_pagination() {
        let query = ListQuery {
            search: Some("notebook hp".to_string()),
            page: Some(2),
            page_size: Some(50),
        };
        assert_eq!(
            query.to_query_string(),
            "?search=notebook%20hp&page=2&page_size=50"
        );
        assert_eq!(ListQuery::page(1, 25).to_query_string(), "?page=1&page_size=25");
    }
}
