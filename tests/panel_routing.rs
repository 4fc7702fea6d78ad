//! Panel navigation through the full router: login redirects, canonical
//! dashboard landing and cross-segment bouncing.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::test_app;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_session(uri: &str, role: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, format!("access_token=sometoken; role={role}"))
        .body(Body::empty())
        .unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect location")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn panel_without_cookies_redirects_to_login_with_return_target() {
    let response = test_app().oneshot(get("/panel")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/kirish?redirect=/panel");
}

#[tokio::test]
async fn dashboard_without_cookies_redirects_to_login_with_return_target() {
    let response = test_app()
        .oneshot(get("/dashboard/targetolog"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/kirish?redirect=/dashboard/targetolog"
    );
}

#[tokio::test]
async fn panel_with_session_lands_on_canonical_dashboard() {
    let response = test_app()
        .oneshot(get_with_session("/panel", "operator"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/operator");
}

#[tokio::test]
async fn foreign_segment_bounces_to_own_segment() {
    let response = test_app()
        .oneshot(get_with_session("/dashboard/superadmin", "operator"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/operator");
}

#[tokio::test]
async fn own_segment_is_served() {
    let response = test_app()
        .oneshot(get_with_session("/dashboard/operator", "operator"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn own_segment_subpath_is_served() {
    let response = test_app()
        .oneshot(get_with_session(
            "/dashboard/skladadmin/orders/42",
            "skladadmin",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn garbled_role_cookie_lands_on_default_dashboard() {
    let response = test_app()
        .oneshot(get_with_session("/panel", "???garbled???"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/targetolog");
}

#[tokio::test]
async fn login_surface_is_always_reachable() {
    let response = test_app()
        .oneshot(get("/kirish?redirect=/dashboard/admin"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn redirect_chain_terminates_after_one_hop() {
    // Follow the /panel redirect once; the target must serve directly.
    let first = test_app()
        .oneshot(get_with_session("/panel", "taminotchi"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    let target = location(&first);

    let second = test_app()
        .oneshot(get_with_session(&target, "taminotchi"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
}
