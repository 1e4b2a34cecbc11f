pub mod authority;
pub mod claims;
pub mod errors;
pub mod handler;

pub use authority::IssuedToken;
pub use authority::TokenAuthority;
pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
