//! Route access middleware for the panel surface.
//!
//! Guards navigation to `/panel` and `/dashboard/*`. Each incoming
//! navigation is resolved by the pure [`decide`] state machine:
//!
//! 1. no session cookies → redirect to the login surface, preserving the
//!    requested path as a `redirect` return target;
//! 2. session present, generic `/panel` entry → redirect to the role's
//!    canonical dashboard path;
//! 3. session present, foreign role segment → redirect to the caller's
//!    own canonical path;
//! 4. otherwise admit.
//!
//! Every transition is terminal for the request, and a redirect target
//! always admits on re-entry, so chains stop after one hop. Unknown role
//! cookie values normalize to the default role instead of failing.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::modules::users::model::UserRole;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
pub const ROLE_COOKIE: &str = "role";
pub const USER_ID_COOKIE: &str = "user_id";

pub const LOGIN_PATH: &str = "/kirish";
pub const PANEL_PATH: &str = "/panel";
pub const DASHBOARD_PREFIX: &str = "/dashboard";

/// The cookie-borne session state the panel router cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSession {
    pub role: UserRole,
}

/// Read the panel session from cookies. Requires both the access token
/// and the role cookie; a missing or garbled role slug normalizes to the
/// default role by policy.
pub fn session_from_cookies(jar: &CookieJar) -> Option<PanelSession> {
    let token = jar.get(ACCESS_TOKEN_COOKIE)?;
    if token.value().is_empty() {
        return None;
    }

    let role_cookie = jar.get(ROLE_COOKIE)?;
    Some(PanelSession {
        role: UserRole::normalize(role_cookie.value()),
    })
}

/// Terminal outcome for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    RedirectToLogin { return_to: String },
    RedirectToDashboard { path: String },
    Admit,
}

/// The route access state machine. Pure: one navigation in, one terminal
/// decision out.
pub fn decide(path: &str, session: Option<&PanelSession>) -> RouteDecision {
    let Some(session) = session else {
        return RouteDecision::RedirectToLogin {
            return_to: path.to_string(),
        };
    };

    let canonical = session.role.dashboard_segment();

    if path == PANEL_PATH {
        return RouteDecision::RedirectToDashboard {
            path: session.role.dashboard_path(),
        };
    }

    if let Some(rest) = path.strip_prefix(DASHBOARD_PREFIX) {
        let segment = rest.trim_start_matches('/').split('/').next().unwrap_or("");
        if segment != canonical {
            return RouteDecision::RedirectToDashboard {
                path: session.role.dashboard_path(),
            };
        }
    }

    RouteDecision::Admit
}

impl RouteDecision {
    pub fn into_redirect(self) -> Option<Redirect> {
        match self {
            RouteDecision::RedirectToLogin { return_to } => Some(Redirect::to(&format!(
                "{}?redirect={}",
                LOGIN_PATH, return_to
            ))),
            RouteDecision::RedirectToDashboard { path } => Some(Redirect::to(&path)),
            RouteDecision::Admit => None,
        }
    }
}

/// Axum middleware wrapping [`decide`] for the protected panel routes.
pub async fn route_access_middleware(req: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let session = session_from_cookies(&jar);

    match decide(req.uri().path(), session.as_ref()).into_redirect() {
        Some(redirect) => redirect.into_response(),
        None => next.run(req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: UserRole) -> PanelSession {
        PanelSession { role }
    }

    #[test]
    fn test_no_session_redirects_to_login_with_return_target() {
        let decision = decide("/dashboard/targetolog", None);
        assert_eq!(
            decision,
            RouteDecision::RedirectToLogin {
                return_to: "/dashboard/targetolog".to_string()
            }
        );
    }

    #[test]
    fn test_panel_entry_redirects_to_canonical_path() {
        for role in UserRole::ALL {
            let decision = decide(PANEL_PATH, Some(&session(role)));
            assert_eq!(
                decision,
                RouteDecision::RedirectToDashboard {
                    path: role.dashboard_path()
                }
            );
        }
    }

    #[test]
    fn test_foreign_segment_redirects_to_own_segment() {
        let decision = decide("/dashboard/superadmin", Some(&session(UserRole::Operator)));
        assert_eq!(
            decision,
            RouteDecision::RedirectToDashboard {
                path: "/dashboard/operator".to_string()
            }
        );
    }

    #[test]
    fn test_own_segment_is_admitted() {
        let decision = decide("/dashboard/operator", Some(&session(UserRole::Operator)));
        assert_eq!(decision, RouteDecision::Admit);
    }

    #[test]
    fn test_own_segment_subpath_is_admitted() {
        let decision = decide(
            "/dashboard/skladadmin/orders/42",
            Some(&session(UserRole::SkladAdmin)),
        );
        assert_eq!(decision, RouteDecision::Admit);
    }

    #[test]
    fn test_redirect_target_is_idempotent() {
        // Redirecting once must land on a path that decides Admit, so the
        // chain stops after one hop.
        for role in UserRole::ALL {
            for target in UserRole::ALL {
                let s = session(role);
                let first = decide(&target.dashboard_path(), Some(&s));
                if let RouteDecision::RedirectToDashboard { path } = first {
                    assert_eq!(decide(&path, Some(&s)), RouteDecision::Admit);
                }
            }
        }
    }

    #[test]
    fn test_bare_dashboard_redirects_to_canonical() {
        let decision = decide("/dashboard", Some(&session(UserRole::Admin)));
        assert_eq!(
            decision,
            RouteDecision::RedirectToDashboard {
                path: "/dashboard/admin".to_string()
            }
        );
    }

    #[test]
    fn test_garbled_role_cookie_lands_on_default_dashboard() {
        let jar = CookieJar::new()
            .add(axum_extra::extract::cookie::Cookie::new(
                ACCESS_TOKEN_COOKIE,
                "sometoken",
            ))
            .add(axum_extra::extract::cookie::Cookie::new(
                ROLE_COOKIE,
                "???garbled???",
            ));
        let session = session_from_cookies(&jar).unwrap();
        assert_eq!(session.role, UserRole::DEFAULT);

        let decision = decide(PANEL_PATH, Some(&session));
        assert_eq!(
            decision,
            RouteDecision::RedirectToDashboard {
                path: UserRole::DEFAULT.dashboard_path()
            }
        );
    }

    #[test]
    fn test_missing_role_cookie_means_no_session() {
        let jar = CookieJar::new().add(axum_extra::extract::cookie::Cookie::new(
            ACCESS_TOKEN_COOKIE,
            "sometoken",
        ));
        assert!(session_from_cookies(&jar).is_none());
    }

    #[test]
    fn test_empty_token_cookie_means_no_session() {
        let jar = CookieJar::new()
            .add(axum_extra::extract::cookie::Cookie::new(
                ACCESS_TOKEN_COOKIE,
                "",
            ))
            .add(axum_extra::extract::cookie::Cookie::new(
                ROLE_COOKIE,
                "admin",
            ));
        assert!(session_from_cookies(&jar).is_none());
    }
}
