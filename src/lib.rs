//! Biolink - link-in-bio and invitation pages with built-in analytics
//!
//! Users maintain a public profile of links and publish invitation pages.
//! Every page view and link click is recorded as an analytics event; the
//! dashboard aggregates events into a 7-day series and exports them as CSV.
//!
//! # Architecture
//! - `analytics`: event types, daily bucketing, device classification, CSV export, recording
//! - `storage`: SeaORM backend and the `EventStore` interface
//! - `services`: profile / invitation / analytics business logic, GeoIP
//! - `api`: HTTP routes, session authentication middleware
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod session;
pub mod storage;
pub mod system;
pub mod utils;
