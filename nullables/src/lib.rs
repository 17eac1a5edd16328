//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator the commands talk to (config store, daemon, cache
//! filesystem, remote peers) sits behind a trait. This crate provides
//! test-friendly implementations that:
//! - never touch the filesystem or network
//! - can be configured to fail at a chosen step
//! - record their calls, optionally into one shared [`Journal`]
//!
//! Usage: swap real implementations for nullables in tests.

pub mod journal;
pub mod peers;
pub mod relocator;
pub mod services;
pub mod store;

pub use journal::Journal;
pub use peers::{NullNetworkInfo, NullPeerIdResolver};
pub use relocator::NullCacheRelocator;
pub use services::{NullServiceController, Response};
pub use store::NullConfigStore;
