//! Catalog handler.

use std::time::Instant;

use axum::Json;

use crate::catalog::{Catalog, catalog};
use crate::http::response::ApiResponse;

/// GET /api/v1/catalog - Every selectable website type, purpose, tone, feature and industry.
pub async fn get_catalog() -> Json<ApiResponse<Catalog>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let data = catalog();
    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(data, request_id, elapsed).with_link("self", "/api/v1/catalog"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_catalog() {
        let Json(resp) = get_catalog().await;
        let data = resp.data.unwrap();
        assert_eq!(data.features.len(), 5);
        assert_eq!(resp.links["self"], "/api/v1/catalog");
    }
}
