//! The request-handling pipeline: authenticate the signature,
//! aggregate and evaluate policies, hand the handler an [`Auth`] context.

pub mod authentication;
pub mod authorization;
pub mod canonical;
pub mod evaluator;

pub use authentication::{AuthenticatedRequest, AuthenticationConfig, RequestHeaders, authenticate};
pub use authorization::{Auth, authorize};
pub use evaluator::Decision;
