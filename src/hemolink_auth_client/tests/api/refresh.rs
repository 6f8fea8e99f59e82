use hemolink_application::AuthActionError;
use std::time::Duration;

use hemolink_core::{ApiError, Navigator, Role, TokenKey, TokenPair, messages};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::TestApp;

#[tokio::test]
async fn expired_access_token_is_renewed_transparently() {
    let app = TestApp::new("/donations").await;
    app.sign_in_as("MEMBER").await;

    Mock::given(method("GET"))
        .and(path("/api/donations"))
        .and(header("Authorization", "Bearer at1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .and(body_json(json!({ "userId": "u1", "refreshToken": "rt1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "tokens": { "accessToken": "at2", "refreshToken": "rt2" } }
        })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/donations"))
        .and(header("Authorization", "Bearer at2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&app.server)
        .await;

    let body: Value = app.client.api().get("/donations").await.unwrap();

    assert_eq!(body, json!({ "data": [] }));
    let session = app.client.session();
    assert!(session.is_authenticated());
    assert_eq!(session.tokens, Some(TokenPair::new("at2", "rt2")));
    assert_eq!(session.error, None);
    assert_eq!(app.stored(TokenKey::AccessToken).await.as_deref(), Some("at2"));
    assert_eq!(app.stored(TokenKey::RefreshToken).await.as_deref(), Some("rt2"));
}

#[tokio::test]
async fn failed_refresh_forces_logout() {
    let app = TestApp::new("/donations").await;
    app.sign_in_as("MEMBER").await;
    let auth = app.client.facade();

    Mock::given(method("GET"))
        .and(path("/api/donations"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Refresh token expired" })),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    let result = app.client.api().get::<Value>("/donations").await;

    assert!(result.is_err());
    assert!(!auth.is_authenticated());
    assert_eq!(auth.user(), None);
    assert_eq!(auth.error_message(), Some(messages::SESSION_EXPIRED));
    for key in TokenKey::ALL {
        assert_eq!(app.stored(key).await, None, "{key:?} left behind");
    }
    assert_eq!(
        app.client.navigator().current_path(),
        "/sign-in?expired=true"
    );
}

#[tokio::test]
async fn refresh_without_session_never_hits_the_network() {
    let app = TestApp::new("/").await;

    let err = app.client.facade().refresh_token().await.unwrap().unwrap_err();

    assert_eq!(err, AuthActionError::NoRefreshToken);
    assert_eq!(app.request_count().await, 0);
    assert!(!app.client.session().loading);
}

#[tokio::test]
async fn explicit_refresh_replaces_user_and_tokens() {
    let app = TestApp::new("/").await;
    app.sign_in_as("MEMBER").await;

    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .and(body_json(json!({ "userId": "u1", "refreshToken": "rt1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "user": { "id": "u1", "email": "a@b.com", "role": "DOCTOR", "facilityId": "f2" },
                "tokens": { "accessToken": "at2" }
            }
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let auth = app.client.facade();
    auth.refresh_token().await.unwrap().unwrap();

    assert_eq!(auth.role(), Some(Role::Doctor));
    assert!(auth.is_same_facility(Some("f2")));
    assert!(!auth.is_loading());
    assert_eq!(
        app.client.session().tokens,
        Some(TokenPair::new("at2", "rt1"))
    );
}

#[tokio::test]
async fn concurrent_expiry_refreshes_once() {
    let app = TestApp::new("/dashboard").await;
    app.sign_in_as("MANAGER").await;

    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer at1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "tokens": { "accessToken": "at2" } } }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer at2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(4)
        .mount(&app.server)
        .await;

    let api = app.client.api();
    let results = tokio::join!(
        api.get::<Value>("/facilities"),
        api.get::<Value>("/blood-inventory"),
        api.get::<Value>("/staff"),
        api.get::<Value>("/events"),
    );

    assert!(results.0.is_ok() && results.1.is_ok() && results.2.is_ok() && results.3.is_ok());
    assert!(app.client.session().is_authenticated());
}

#[tokio::test]
async fn sign_out_during_refresh_leaves_store_empty() {
    let app = TestApp::new("/donations").await;
    app.sign_in_as("MEMBER").await;

    Mock::given(method("GET"))
        .and(path("/api/donations"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "data": { "tokens": { "accessToken": "at2", "refreshToken": "rt2" } }
                }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sign-out"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.server)
        .await;

    let auth = app.client.facade();
    let (result, signed_out) = tokio::join!(app.client.api().get::<Value>("/donations"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        auth.sign_out().await
    });

    assert_eq!(signed_out, Some(Ok(())));
    assert_eq!(result.unwrap_err(), ApiError::SessionReplaced);
    assert!(!app.client.session().is_authenticated());
    for key in TokenKey::ALL {
        assert_eq!(app.stored(key).await, None, "{key:?} written after sign-out");
    }
    assert_eq!(app.client.navigator().current_path(), "/donations");
}

#[tokio::test]
async fn sign_in_during_failing_refresh_keeps_new_session() {
    let app = TestApp::new("/donations").await;
    app.client
        .api()
        .store_session("u0", &TokenPair::new("at0", "rt0"))
        .await;

    Mock::given(method("GET"))
        .and(path("/api/donations"))
        .and(header("Authorization", "Bearer at0"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .and(body_json(json!({ "userId": "u0", "refreshToken": "rt0" })))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "Refresh token expired" }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    let (result, ()) = tokio::join!(app.client.api().get::<Value>("/donations"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        app.sign_in_as("DOCTOR").await;
    });

    assert!(result.unwrap_err().is_unauthorized());
    let session = app.client.session();
    assert!(session.is_authenticated());
    assert_eq!(session.role(), Some(Role::Doctor));
    assert_eq!(session.error, None);
    assert_eq!(app.stored(TokenKey::AccessToken).await.as_deref(), Some("at1"));
    assert_eq!(app.stored(TokenKey::UserId).await.as_deref(), Some("u1"));
    assert_eq!(app.client.navigator().current_path(), "/donations");
}
