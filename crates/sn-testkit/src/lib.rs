//! Deterministic execution environment for scenario tests.
//!
//! The registry core assumes an external environment that provisions
//! accounts, serializes operation submission, and charges its own
//! processing cost per accepted operation. [`Harness`] is that environment
//! in miniature: no IO, no time, no randomness.
//!
//! Cost model: the processing cost is charged to the submitting caller as
//! soon as the environment accepts the operation, whether or not the
//! registry then rejects it. A successful purchase therefore costs the
//! buyer exactly `price + processing_cost`.

mod harness;

pub use harness::{Harness, SubmitError};
