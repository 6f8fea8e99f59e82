use hemolink_application::{GuardDecision, return_location};
use hemolink_core::{Navigator, Permission, Role};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{TestApp, auth_payload};

#[tokio::test]
async fn member_is_turned_away_from_admin_area() {
    let app = TestApp::new("/admin/users").await;
    app.sign_in_as("MEMBER").await;

    let guard = app.client.guard().require_roles([Role::Admin]);
    let decision = app.client.enforce(&guard);

    assert!(matches!(decision, GuardDecision::DenyRole { .. }));
    assert_eq!(app.client.navigator().current_path(), "/unauthorized");
}

#[tokio::test]
async fn anonymous_visitor_is_sent_to_sign_in() {
    let app = TestApp::new("/profile").await;

    let decision = app.client.enforce(&app.client.guard());

    assert_eq!(
        decision,
        GuardDecision::DenyUnauthenticated {
            redirect_to: "/sign-in?redirect=%2Fprofile".to_string(),
            return_to: "/profile".to_string(),
        }
    );
    assert_eq!(
        app.client.navigator().current_path(),
        "/sign-in?redirect=%2Fprofile"
    );
}

#[tokio::test]
async fn visitor_returns_to_requested_page_after_sign_in() {
    let app = TestApp::new("/donations/42?tab=history").await;
    let guard = app.client.guard();
    app.client.enforce(&guard);

    app.sign_in_as("MEMBER").await;
    let target = return_location(&app.client.navigator().current_path())
        .expect("sign-in location keeps the requested page");
    app.client.navigator().redirect(&target);

    assert_eq!(target, "/donations/42?tab=history");
    assert_eq!(app.client.enforce(&guard), GuardDecision::Allow);
    assert_eq!(
        app.client.navigator().current_path(),
        "/donations/42?tab=history"
    );
}

#[tokio::test]
async fn staff_permission_admits_transporter() {
    let app = TestApp::new("/deliveries").await;
    app.sign_in_as("TRANSPORTER").await;

    let guard = app
        .client
        .guard()
        .require_permissions([Permission::TransporterAccess, Permission::ManagerAccess]);

    assert_eq!(app.client.enforce(&guard), GuardDecision::Allow);
    assert_eq!(app.client.navigator().current_path(), "/deliveries");
}

#[tokio::test]
async fn guard_settles_after_pending_sign_in() {
    let app = TestApp::new("/sign-in").await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-in"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(auth_payload(json!({ "id": "u1", "role": "ADMIN" })))
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .mount(&app.server)
        .await;

    let auth = app.client.facade();
    let mut sessions = app.client.subscribe();
    let guard = app.client.guard().require_roles([Role::Admin]);

    let (decision, _) = tokio::join!(
        async {
            sessions.wait_for(|s| s.loading).await.unwrap();
            guard.settle(&mut sessions, "/admin").await
        },
        auth.sign_in("a@b.com", "secret1"),
    );

    assert_eq!(decision, GuardDecision::Allow);
}
