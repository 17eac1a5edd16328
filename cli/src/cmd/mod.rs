//! Command groups.

pub mod coins;
pub mod config;
pub mod data;
pub mod debug;
pub mod network;
