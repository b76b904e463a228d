//! Remote procedure-call client boundary for volt-connect.
//!
//! The sink task talks to the database exclusively through the
//! [`ProcedureClient`] trait: asynchronous procedure invocations with a
//! completion event per accepted call, a `drain` that settles outstanding
//! invocations at the client layer, and a broadcast of connectivity
//! events. The wire-level client lives outside this repository; the
//! [`testing`] module ships a scripted in-memory implementation used by
//! the test suites.

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod response;
pub mod testing;

pub use client::{CompletionHandle, ProcedureClient, Submission};
pub use config::ClientConfig;
pub use error::ClientError;
pub use event::{ConnectionEvent, DisconnectCause};
pub use response::{CallResponse, ResponseStatus};
