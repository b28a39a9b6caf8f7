pub mod assertion;

pub use assertion::{Assertion, Header};
