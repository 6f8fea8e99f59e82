pub mod env {
    pub const API_BASE_URL_ENV_VAR: &str = "API_BASE_URL";
    pub const WS_URL_ENV_VAR: &str = "WS_URL";
    pub const APP_MODE_ENV_VAR: &str = "APP_MODE";
    pub const REQUEST_TIMEOUT_MS_ENV_VAR: &str = "REQUEST_TIMEOUT_MS";
    pub const TOKEN_STORE_PATH_ENV_VAR: &str = "TOKEN_STORE_PATH";
    pub const SIGN_IN_PATH_ENV_VAR: &str = "SIGN_IN_PATH";
    pub const UNAUTHORIZED_PATH_ENV_VAR: &str = "UNAUTHORIZED_PATH";
}

pub mod defaults {
    pub const API_BASE_URL: &str = "http://localhost:8080/api";
    pub const WS_URL: &str = "ws://localhost:8080/ws";
    pub const REQUEST_TIMEOUT_MS: u64 = 10_000;
    pub const TOKEN_STORE_PATH: &str = ".hemolink/session.json";

    pub mod endpoints {
        pub const SIGN_UP: &str = "/auth/sign-up";
        pub const SIGN_IN: &str = "/auth/sign-in";
        pub const SIGN_OUT: &str = "/sign-out";
        pub const REFRESH_TOKEN: &str = "/refresh-token";
        pub const CURRENT_USER: &str = "/user/me";
    }
}

pub mod test {
    use std::time::Duration;

    pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(500);
}
