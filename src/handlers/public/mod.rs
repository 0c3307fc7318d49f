// Public handlers: no authorization header required
pub mod drinks;
pub mod health;

pub use drinks::drinks_get;
pub use health::health_get;
