pub mod codec;
pub mod error;
pub mod id;
pub mod models;
pub mod validation;

// Re-export key types for easier usage
pub use codec::*;
pub use error::{BlockError, ValidationError};
pub use id::{IdProvider, SequentialIdProvider, UuidProvider, generate_id};
pub use models::*;
pub use validation::{BlockValidator, Validator};
