// Candidate sessions: one isolated artifact namespace per candidate id.
// The store owns bytes on disk; status.rs owns the explicit lifecycle state.

pub mod artifact;
pub mod handlers;
pub mod status;
pub mod store;
