pub mod credentials;
pub mod permission;
pub mod role;
pub mod session;
pub mod tokens;
pub mod user;
