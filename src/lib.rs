//! Orion - client-side query helper for the Orion orchestration API
//!
//! This library provides a table of named endpoints, a polling [`query::Query`]
//! handle, and a [`registry::Registry`] that pauses and resumes every live
//! poller at once (for example when the host application is backgrounded).

pub mod cli;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod logging;
pub mod query;
pub mod registry;
pub mod visibility;
