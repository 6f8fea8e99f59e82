use hemolink_adapters::{FileTokenStore, HistoryNavigator};
use hemolink_auth_client::AuthClient;
use hemolink_core::{Role, TokenPair, TokenStore};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::{TestApp, settings_for};

async fn app_with_file_store(dir: &tempfile::TempDir) -> TestApp<FileTokenStore> {
    let server = MockServer::start().await;
    let store = FileTokenStore::open(dir.path().join("session.json")).await;
    let client = AuthClient::new(settings_for(&server), store, HistoryNavigator::new("/"))
        .expect("client builds");
    TestApp { server, client }
}

#[tokio::test]
async fn session_is_restored_from_previous_run() {
    let dir = tempfile::tempdir().unwrap();
    FileTokenStore::open(dir.path().join("session.json"))
        .await
        .store_session("u1", &TokenPair::new("at1", "rt1"))
        .await;

    let app = app_with_file_store(&dir).await;
    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .and(header("Authorization", "Bearer at1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "u1", "email": "a@b.com", "role": "DOCTOR", "facilityName": "Cho Ray" }
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    assert!(app.client.restore_session().await.unwrap());

    let session = app.client.session();
    assert!(session.is_authenticated());
    assert_eq!(session.role(), Some(Role::Doctor));
    assert_eq!(session.facility_name(), Some("Cho Ray"));
    assert_eq!(session.tokens, Some(TokenPair::new("at1", "rt1")));
    assert!(!session.loading);
}

#[tokio::test]
async fn nothing_stored_means_nothing_restored() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_file_store(&dir).await;

    assert!(!app.client.restore_session().await.unwrap());
    assert!(!app.client.session().is_authenticated());
    assert_eq!(app.request_count().await, 0);
}

#[tokio::test]
async fn profile_reload_replaces_user() {
    let app = TestApp::new("/profile").await;
    app.sign_in_as("MEMBER").await;
    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "user": {
                    "id": "u1",
                    "email": "a@b.com",
                    "role": "MEMBER",
                    "fullName": "Pham Dung"
                }
            }
        })))
        .mount(&app.server)
        .await;

    let user = app.client.store().reload_user().await.unwrap();

    assert_eq!(user.full_name.as_deref(), Some("Pham Dung"));
    assert_eq!(
        app.client.session().user.and_then(|u| u.full_name),
        Some("Pham Dung".to_string())
    );
}
