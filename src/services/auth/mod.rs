pub mod factory;
pub mod token_validator;

pub use factory::build_token_validator;
pub use token_validator::{Claims, SecretEncoding, TokenError, TokenValidator};
