//! Feature modules.
//!
//! Each module follows the same structure: `model.rs` for data types and
//! DTOs, `service.rs` for database logic, `controller.rs` for HTTP
//! handlers and `router.rs` for route wiring.
//!
//! - [`activity`]: append-only activity log
//! - [`auth`]: login, refresh, logout, session cookies
//! - [`flows`]: targetolog traffic links (oqim)
//! - [`leads`]: public lead capture and the operator desk
//! - [`orders`]: fulfilment lifecycle and delivery rewards
//! - [`panel`]: the cookie-gated panel entry surface
//! - [`payouts`]: withdrawal requests and decisions
//! - [`products`]: catalogue and stock
//! - [`transactions`]: the balance ledger
//! - [`users`]: accounts, roles, profiles

pub mod activity;
pub mod auth;
pub mod flows;
pub mod leads;
pub mod orders;
pub mod panel;
pub mod payouts;
pub mod products;
pub mod transactions;
pub mod users;
