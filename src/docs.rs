use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::activity::model::{ActivityLog, PaginatedActivityResponse};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, MessageResponse, RefreshRequest, RefreshResponse,
};
use crate::modules::flows::model::{CreateFlowDto, Flow, PaginatedFlowsResponse, VisitResponse};
use crate::modules::leads::controller::AcceptedLeadResponse;
use crate::modules::leads::model::{
    AcceptLeadDto, AssignOperatorDto, CreateLeadDto, Lead, LeadStatus, PaginatedLeadsResponse,
    SetLeadStatusDto,
};
use crate::modules::orders::model::{
    AdvanceOrderDto, Order, OrderStatus, PaginatedOrdersResponse,
};
use crate::modules::panel::controller::{LoginView, PanelView};
use crate::modules::payouts::model::{
    PaginatedPayoutsResponse, Payout, PayoutStatus, RejectPayoutDto, RequestPayoutDto,
};
use crate::modules::products::model::{
    AdjustStockDto, CreateProductDto, PaginatedProductsResponse, Product, UpdateProductDto,
};
use crate::modules::transactions::model::{
    BalanceResponse, CreateTransactionDto, PaginatedTransactionsResponse, Transaction,
    TransactionKind,
};
use crate::modules::users::model::{
    ChangePasswordDto, CreateUserDto, PaginatedUsersResponse, UpdateProfileDto, UpdateUserDto,
    User, UserRole,
};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::me,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::block_user,
        crate::modules::users::controller::unblock_user,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::change_password,
        crate::modules::activity::controller::list_activity,
        crate::modules::transactions::controller::create_transaction,
        crate::modules::transactions::controller::get_transactions,
        crate::modules::transactions::controller::get_my_transactions,
        crate::modules::transactions::controller::get_balance,
        crate::modules::payouts::controller::request_payout,
        crate::modules::payouts::controller::get_my_payouts,
        crate::modules::payouts::controller::get_payouts,
        crate::modules::payouts::controller::approve_payout,
        crate::modules::payouts::controller::reject_payout,
        crate::modules::payouts::controller::mark_payout_paid,
        crate::modules::products::controller::create_product,
        crate::modules::products::controller::get_products,
        crate::modules::products::controller::get_product,
        crate::modules::products::controller::update_product,
        crate::modules::products::controller::adjust_stock,
        crate::modules::products::controller::delete_product,
        crate::modules::flows::controller::create_flow,
        crate::modules::flows::controller::get_flows,
        crate::modules::flows::controller::get_flow,
        crate::modules::flows::controller::record_visit,
        crate::modules::leads::controller::create_lead,
        crate::modules::leads::controller::get_leads,
        crate::modules::leads::controller::get_lead,
        crate::modules::leads::controller::accept_lead,
        crate::modules::leads::controller::set_lead_status,
        crate::modules::leads::controller::assign_lead,
        crate::modules::orders::controller::get_orders,
        crate::modules::orders::controller::get_order,
        crate::modules::orders::controller::advance_order,
        crate::modules::panel::controller::panel_entry,
        crate::modules::panel::controller::login_surface,
        crate::modules::panel::controller::dashboard_landing,
    ),
    components(
        schemas(
            User,
            UserRole,
            CreateUserDto,
            UpdateUserDto,
            UpdateProfileDto,
            ChangePasswordDto,
            PaginatedUsersResponse,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            RefreshResponse,
            MessageResponse,
            ErrorResponse,
            ActivityLog,
            PaginatedActivityResponse,
            Transaction,
            TransactionKind,
            CreateTransactionDto,
            PaginatedTransactionsResponse,
            BalanceResponse,
            Payout,
            PayoutStatus,
            RequestPayoutDto,
            RejectPayoutDto,
            PaginatedPayoutsResponse,
            Product,
            CreateProductDto,
            UpdateProductDto,
            AdjustStockDto,
            PaginatedProductsResponse,
            Flow,
            CreateFlowDto,
            PaginatedFlowsResponse,
            VisitResponse,
            Lead,
            LeadStatus,
            CreateLeadDto,
            AcceptLeadDto,
            SetLeadStatusDto,
            AssignOperatorDto,
            AcceptedLeadResponse,
            PaginatedLeadsResponse,
            Order,
            OrderStatus,
            AdvanceOrderDto,
            PaginatedOrdersResponse,
            PanelView,
            LoginView,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, refresh and session cookies"),
        (name = "Users", description = "Account management"),
        (name = "Activity", description = "Append-only activity log"),
        (name = "Transactions", description = "Balance ledger"),
        (name = "Payouts", description = "Withdrawal requests and decisions"),
        (name = "Products", description = "Catalogue and stock"),
        (name = "Flows", description = "Targetolog traffic links"),
        (name = "Leads", description = "Lead capture and the operator desk"),
        (name = "Orders", description = "Fulfilment lifecycle"),
        (name = "Panel", description = "Cookie-gated panel entry surface"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
