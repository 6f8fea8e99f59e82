pub mod file_token_store;
pub mod hashmap_token_store;

pub use file_token_store::FileTokenStore;
pub use hashmap_token_store::HashMapTokenStore;
