//! Switching a chia installation between networks.
//!
//! [`NetworkSwitch`] coordinates three collaborators: the config store, the
//! daemon's service control, and the cache file relocator. Each is a trait
//! so the whole sequence can run against in-memory fakes.

pub mod error;
pub mod profile;
pub mod relocate;
pub mod show;
pub mod switch;

pub use error::SwitchError;
pub use profile::NetworkProfile;
pub use relocate::{CacheRelocator, FsCacheRelocator, RelocateOutcome, CACHE_FILES};
pub use show::{NetworkInfoSource, NetworkReport, RpcNetworkInfo, NOT_RUNNING};
pub use switch::{CacheRelocation, NetworkSwitch, RestartOutcome, SwitchReport};
