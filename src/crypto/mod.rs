pub mod did;
pub mod signature;

pub use did::resolve as resolve_did;
pub use signature::{generate_signing_key, public_coordinates, sign_message, verify_signature};
