// handlers/mod.rs - Handlers split by security tier
//
// Public (no token) → Protected (bearer token with a permission per route)
pub mod protected;
pub mod public;
