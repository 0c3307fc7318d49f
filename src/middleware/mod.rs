pub mod auth;
pub mod response;

pub use auth::{require_permission, RequirePermission};
pub use response::{error_envelope, not_found_fallback, ApiResponse, ApiResult};
