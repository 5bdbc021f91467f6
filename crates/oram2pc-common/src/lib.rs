//! Common functionality for `oram2pc`.
//!
//! This crate provides the plumbing shared by the ORAM primitive protocols: the
//! party roles, the thread context carrying the I/O channel to the peer, a
//! single-threaded executor, and the rendezvous helper used to build ideal
//! functionalities for tests.
//!
//! This crate does not provide any cryptographic primitives, see `oram2pc-core`
//! for that.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

mod context;
mod executor;
mod id;
#[cfg(any(test, feature = "ideal"))]
pub mod ideal;
mod role;

pub use context::Context;
pub use executor::STExecutor;
pub use id::{Counter, ThreadId};
pub use role::{PartyId, Role};

#[cfg(any(test, feature = "test-utils"))]
pub use executor::test_st_executor;
