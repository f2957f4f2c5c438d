pub mod claims;
pub mod errors;
pub mod manager;

pub use claims::Claims;
pub use errors::TokenError;
pub use manager::TokenManager;
