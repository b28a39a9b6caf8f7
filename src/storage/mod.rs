pub mod nonce_store;

pub use self::nonce_store::{log_mark_used_race, NonceRecord, NonceStore};
