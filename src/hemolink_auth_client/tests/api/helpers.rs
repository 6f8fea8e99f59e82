use hemolink_adapters::{HashMapTokenStore, HistoryNavigator, Settings};
use hemolink_auth_client::AuthClient;
use hemolink_core::{TokenKey, TokenStore};
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestApp<S = HashMapTokenStore> {
    pub server: MockServer,
    pub client: AuthClient<S, HistoryNavigator>,
}

pub fn settings_for(server: &MockServer) -> Settings {
    Settings {
        api_base_url: format!("{}/api", server.uri()),
        request_timeout_ms: 500,
        ..Settings::default()
    }
}

impl TestApp {
    pub async fn new(location: &str) -> Self {
        let server = MockServer::start().await;
        let client = AuthClient::new(
            settings_for(&server),
            HashMapTokenStore::new(),
            HistoryNavigator::new(location),
        )
        .expect("client builds");
        Self { server, client }
    }
}

impl<S: TokenStore> TestApp<S> {
    pub async fn stored(&self, key: TokenKey) -> Option<String> {
        self.client
            .api()
            .token_store()
            .get(key)
            .await
            .map(|value| value.expose_secret().clone())
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }

    /// Mount a sign-in endpoint answering with `user` and the `at1`/`rt1` pair.
    pub async fn mock_sign_in(&self, user: Value) {
        Mock::given(method("POST"))
            .and(path("/api/auth/sign-in"))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_payload(user)))
            .mount(&self.server)
            .await;
    }

    /// Sign in as `u1` with `role` through a throwaway view.
    pub async fn sign_in_as(&self, role: &str) {
        self.mock_sign_in(json!({
            "id": "u1",
            "email": "a@b.com",
            "role": role,
            "facilityId": "f1"
        }))
        .await;
        self.client
            .facade()
            .sign_in("a@b.com", "secret1")
            .await
            .expect("view is mounted")
            .expect("sign-in succeeds");
    }
}

pub fn auth_payload(user: Value) -> Value {
    json!({
        "data": {
            "user": user,
            "tokens": { "accessToken": "at1", "refreshToken": "rt1" }
        }
    })
}
