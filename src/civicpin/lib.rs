//! # civicpin Architecture
//!
//! civicpin is a small **issue reporting library**: residents file issues
//! (potholes, broken street lights, blocked drains) at a position on the map,
//! upvote them, and follow them through an update log until they are
//! resolved. The `civicpin` binary is one client of it.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Resolves id selectors, applies geocoding policy          │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic: load, patch, save                        │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DataStore trait                                 │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! External services (address geocoding, IP based location) sit behind the
//! [`geocode::Geocoder`] and [`locate::Locator`] traits. Their failures are
//! never fatal; every caller has a fallback.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never calls
//! `std::process::exit` and never assumes a terminal. Diagnostics go through
//! `tracing`; the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Issue`, `UpdateEntry`, `Category`, `Status`)
//! - [`filter`]: Filtering criteria and display order
//! - [`geocode`]: Address lookups and their cache
//! - [`locate`]: Approximate position from the caller's IP
//! - [`session`]: The per-user identity recorded on reports
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod geocode;
pub mod locate;
pub mod model;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;
