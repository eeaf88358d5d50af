//! Store Wizard - guided store setup and launch orchestration
//!
//! Library crate behind the `store-wizard` binary; the integration tests
//! drive the REST layer through it.

pub mod collaborators;
pub mod config;
pub mod launch;
pub mod logging;
pub mod notifications;
pub mod rest;
pub mod store;
pub mod wizard;
