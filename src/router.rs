use std::sync::Arc;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::{
    require_admin, require_authenticated, require_operations, require_sklad, require_targeting,
    require_warehouse,
};
use crate::modules::activity::router::init_activity_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::flows::router::{init_flows_router, init_public_flows_router};
use crate::modules::leads::router::{init_leads_router, init_public_leads_router};
use crate::modules::orders::router::init_orders_router;
use crate::modules::panel::router::init_panel_router;
use crate::modules::payouts::router::init_payouts_router;
use crate::modules::products::router::{init_catalogue_router, init_products_router};
use crate::modules::transactions::router::{
    init_balance_router, init_my_transactions_router, init_transactions_router,
};
use crate::modules::users::router::{init_profile_router, init_users_router};
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_governor::GovernorLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    let auth_governor = Arc::new(state.rate_limit_config.auth_governor_config());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_panel_router())
        .nest(
            "/api",
            Router::new()
                .nest(
                    "/auth",
                    init_auth_router().layer(GovernorLayer::new(auth_governor)),
                )
                .nest(
                    "/users",
                    init_profile_router().merge(
                        init_users_router().route_layer(middleware::from_fn_with_state(
                            state.clone(),
                            require_admin,
                        )),
                    ),
                )
                .nest(
                    "/activity",
                    init_activity_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest(
                    "/transactions",
                    init_my_transactions_router()
                        .route_layer(middleware::from_fn_with_state(
                            state.clone(),
                            require_authenticated,
                        ))
                        .merge(init_transactions_router().route_layer(
                            middleware::from_fn_with_state(state.clone(), require_admin),
                        )),
                )
                .nest(
                    "/balance",
                    init_balance_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_authenticated,
                    )),
                )
                .nest(
                    "/payouts",
                    init_payouts_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_authenticated,
                    )),
                )
                .nest(
                    "/products",
                    init_catalogue_router()
                        .route_layer(middleware::from_fn_with_state(
                            state.clone(),
                            require_authenticated,
                        ))
                        .merge(init_products_router().route_layer(
                            middleware::from_fn_with_state(state.clone(), require_warehouse),
                        )),
                )
                .nest(
                    "/flows",
                    init_public_flows_router().merge(init_flows_router().route_layer(
                        middleware::from_fn_with_state(state.clone(), require_targeting),
                    )),
                )
                .nest(
                    "/leads",
                    init_public_leads_router().merge(init_leads_router().route_layer(
                        middleware::from_fn_with_state(state.clone(), require_operations),
                    )),
                )
                .nest(
                    "/orders",
                    init_orders_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_sklad)),
                ),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
