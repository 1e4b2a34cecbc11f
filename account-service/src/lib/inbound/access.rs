pub mod errors;
pub mod policy;

pub use errors::AccessError;
pub use policy::extract_bearer;
pub use policy::AccessPolicy;
pub use policy::AuthenticatedUser;
pub use policy::EndpointClass;
pub use policy::PublicEndpoints;
