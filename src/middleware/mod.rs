//! Middleware and extractors for cross-cutting request processing.
//!
//! # Modules
//!
//! - [`auth`]: bearer credential extraction and the authentication gate
//! - [`role`]: role authorization gate (group layers and per-operation
//!   extractors)
//! - [`route_access`]: the panel navigation state machine
//!
//! # Request admission flow
//!
//! 1. The token/role extractor locates a credential (header, then
//!    `?token=` query fallback) and the role claim.
//! 2. The authentication gate ([`auth::AuthUser`]) verifies the
//!    credential or rejects with 401.
//! 3. The role authorization gate ([`role::check_any_role`]) compares the
//!    declared required roles with the caller's role claim: empty set
//!    admits any authenticated caller, membership admits, otherwise 403.
//! 4. On the panel surface, [`route_access`] resolves the navigation to a
//!    terminal admit-or-redirect decision instead.

pub mod auth;
pub mod role;
pub mod route_access;
