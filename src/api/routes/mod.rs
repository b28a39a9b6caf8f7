// Route module exports
pub mod challenge;
pub mod health;
pub mod verify;

// OpenAPI tag constants (shared across all route modules)
pub const CHALLENGE_TAG: &str = "Challenge";
pub const VERIFY_TAG: &str = "Verification";
pub const HEALTH_TAG: &str = "Health & Status";
