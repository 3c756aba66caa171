// The library cannot use unwraps.
#![deny(clippy::unwrap_used)]

// Asserts need to have a reason.
#![deny(clippy::missing_assert_message)]

// Gotta use all the results.
#![deny(unused_results)]

// The volume manager and everything below it.
pub mod volume;

// The line-oriented TCP front-end.
pub mod server;

// Error types are public, since every volume operation returns them.
pub mod error_types;

// Within the crate, we can use:
mod helpers;
