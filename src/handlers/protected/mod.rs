// handlers/protected/mod.rs - Handlers behind the permission guard
//
// Each route here is wrapped with `require_permission`, which verifies the
// bearer token and inserts the decoded `Claims` into request extensions
// before the handler runs.
pub mod drinks;

pub use drinks::*;
