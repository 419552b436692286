pub mod claims;
pub mod guard;
pub mod verifier;

pub use claims::{Claims, JwtPayload};
pub use guard::{SERVICE_ROLE, UserRequirement, require_service, require_token, require_user};
pub use verifier::JwtVerifier;
