//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::{
    data::ProductUpdate,
    records::ProductStatus,
};

use crate::{extensions::*, products::errors::into_status_error, state::State};

use super::get::ProductResponse;

/// Update Product Request. Absent fields keep their current value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub discount_percent: Option<u8>,
    pub stock: Option<u32>,

    /// One of `available`, `out-of-stock`, `discontinued`
    pub status: Option<String>,
}

/// Update Product Handler
///
/// Partially updates a product. Admin only.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _admin = depot.admin_or_403()?;
    let request = json.into_inner();

    let status = match request.status.as_deref() {
        None => None,
        Some(value) => Some(
            ProductStatus::parse(value)
                .ok_or_else(|| StatusError::bad_request().brief("Unknown product status"))?,
        ),
    };

    let product = state
        .app
        .products
        .update_product(
            uuid.into_inner().into(),
            ProductUpdate {
                name: request.name,
                description: request.description,
                price: request.price,
                discount_percent: request.discount_percent,
                stock: request.stock,
                status,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront_app::domain::products::{
        MockProductsService, ProductsServiceError, records::ProductUuid,
    };
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, admin_service, make_product};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        admin_service(
            MockApp {
                products,
                ..MockApp::default()
            },
            Router::with_path("products/{uuid}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_update_price_returns_updated_product() -> TestResult {
        let uuid = ProductUuid::new();

        let mut product = make_product(uuid);
        product.price = 300;
        product.final_price = 300;

        let mut products = MockProductsService::new();

        products
            .expect_update_product()
            .once()
            .withf(move |u, update| {
                *u == uuid && update.price == Some(300) && update.name.is_none()
            })
            .return_once(move |_, _| Ok(product));

        let mut res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({ "price": 300 }))
            .send(&make_service(products))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.price, 300);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_status_returns_400() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products.expect_update_product().never();

        let res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({ "status": "on-fire" }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_update_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({ "stock": 2 }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
