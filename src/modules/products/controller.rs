use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::activity::model::NewActivity;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::products::model::{
    AdjustStockDto, CreateProductDto, PaginatedProductsResponse, Product, ProductFilterParams,
    UpdateProductDto,
};
use crate::modules::products::service::ProductService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a product
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductDto,
    responses(
        (status = 200, description = "Created product", body = Product),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn create_product(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<CreateProductDto>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::create(&state.db, dto).await?;

    state.activity.emit(
        NewActivity::new(auth_user.user_id()?, "products:create")
            .with_meta(json!({ "product_id": product.id }))
            .with_request_context(&headers),
    );

    Ok(Json(product))
}

/// List products with filters and pagination
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Page of products", body = PaginatedProductsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
    Query(params): Query<ProductFilterParams>,
) -> Result<Json<PaginatedProductsResponse>, AppError> {
    let page = ProductService::list(&state.db, &params).await?;
    Ok(Json(page))
}

/// Get one product by id
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::get(&state.db, id).await?;
    Ok(Json(product))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn update_product(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateProductDto>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::update(&state.db, id, dto).await?;

    state.activity.emit(
        NewActivity::new(auth_user.user_id()?, "products:update")
            .with_meta(json!({ "product_id": id }))
            .with_request_context(&headers),
    );

    Ok(Json(product))
}

/// Adjust product stock by a relative delta
#[utoipa::path(
    post,
    path = "/api/products/{id}/stock",
    request_body = AdjustStockDto,
    responses(
        (status = 200, description = "Product with adjusted stock", body = Product),
        (status = 400, description = "Stock would go negative", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn adjust_stock(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AdjustStockDto>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::adjust_stock(&state.db, id, dto.delta).await?;

    state.activity.emit(
        NewActivity::new(auth_user.user_id()?, "products:adjust-stock")
            .with_meta(json!({ "product_id": id, "delta": dto.delta }))
            .with_request_context(&headers),
    );

    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
#[instrument(skip(state, auth_user, headers))]
pub async fn delete_product(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    ProductService::delete(&state.db, id).await?;

    state.activity.emit(
        NewActivity::new(auth_user.user_id()?, "products:delete")
            .with_meta(json!({ "product_id": id }))
            .with_request_context(&headers),
    );

    Ok(Json(MessageResponse {
        message: "Product deleted".to_string(),
    }))
}
