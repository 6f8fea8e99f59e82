use hemolink_application::AuthActionError;
use hemolink_core::{ApiError, Field, Role, SignUpForm, TokenKey, messages};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{TestApp, auth_payload};

#[tokio::test]
async fn sign_in_establishes_session_and_persists_tokens() {
    let app = TestApp::new("/sign-in").await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-in"))
        .and(body_json(json!({ "emailOrPhone": "a@b.com", "password": "secret1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(auth_payload(json!({ "id": "u1", "role": "MEMBER" }))),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    let auth = app.client.facade();
    let user = auth.sign_in("a@b.com", "secret1").await.unwrap().unwrap();

    assert_eq!(user.id, "u1");
    let session = app.client.session();
    assert_eq!(session.user.as_ref().map(|u| u.id.as_str()), Some("u1"));
    assert!(session.is_authenticated());
    assert!(!session.loading);
    assert_eq!(session.error, None);
    assert!(session.is_member());
    assert_eq!(app.stored(TokenKey::AccessToken).await.as_deref(), Some("at1"));
    assert_eq!(app.stored(TokenKey::RefreshToken).await.as_deref(), Some("rt1"));
    assert_eq!(app.stored(TokenKey::UserId).await.as_deref(), Some("u1"));
}

#[tokio::test]
async fn rejected_sign_in_records_backend_message() {
    let app = TestApp::new("/sign-in").await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-in"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&app.server)
        .await;

    let auth = app.client.facade();
    let err = auth.sign_in("a@b.com", "wrong-pass").await.unwrap().unwrap_err();

    assert_eq!(
        err,
        AuthActionError::Api(ApiError::Status {
            status: 401,
            message: "Invalid credentials".to_string()
        })
    );
    assert!(!auth.is_authenticated());
    assert!(!auth.is_loading());
    assert_eq!(auth.error().as_deref(), Some("Invalid credentials"));
    assert_eq!(
        auth.error_message(),
        Some("The email/phone number or password is incorrect.")
    );
    assert_ne!(auth.error_message(), Some(messages::GENERIC_FAILURE));
    assert_eq!(app.stored(TokenKey::AccessToken).await, None);
    // Bad credentials never start a refresh.
    assert_eq!(app.request_count().await, 1);
}

#[tokio::test]
async fn invalid_form_is_not_submitted() {
    let app = TestApp::new("/sign-in").await;

    let err = app
        .client
        .facade()
        .sign_in("not-an-email", "123")
        .await
        .unwrap()
        .unwrap_err();

    let AuthActionError::Validation(errors) = err else {
        panic!("expected validation errors, got {err:?}");
    };
    assert!(errors.for_field(Field::EmailOrPhone).is_some());
    assert!(errors.for_field(Field::Password).is_some());
    assert_eq!(app.request_count().await, 0);
}

#[tokio::test]
async fn sign_up_signs_the_donor_in() {
    let app = TestApp::new("/sign-up").await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sign-up"))
        .and(body_json(json!({
            "email": "donor@example.com",
            "password": "secret1",
            "fullName": "Le Van Chi",
            "phone": "0912345678"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(auth_payload(json!({
            "id": "u7",
            "email": "donor@example.com",
            "role": "MEMBER"
        }))))
        .expect(1)
        .mount(&app.server)
        .await;

    let user = app
        .client
        .facade()
        .sign_up(SignUpForm {
            email: "donor@example.com".to_string(),
            password: "secret1".to_string(),
            full_name: Some("Le Van Chi".to_string()),
            phone: Some("0912345678".to_string()),
            ..SignUpForm::default()
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(user.role, Role::Member);
    assert!(app.client.session().is_authenticated());
    assert_eq!(app.stored(TokenKey::UserId).await.as_deref(), Some("u7"));
}

#[tokio::test]
async fn sign_out_clears_everything_even_when_backend_fails() {
    let app = TestApp::new("/profile").await;
    app.sign_in_as("NURSE").await;
    Mock::given(method("POST"))
        .and(path("/api/sign-out"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.server)
        .await;

    let auth = app.client.facade();
    let outcome = auth.sign_out().await.unwrap();

    assert!(outcome.is_err());
    assert!(!auth.is_authenticated());
    assert_eq!(auth.user(), None);
    assert!(!auth.is_loading());
    for key in TokenKey::ALL {
        assert_eq!(app.stored(key).await, None, "{key:?} left behind");
    }
}
