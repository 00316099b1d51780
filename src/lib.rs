//! Skinscout - skin-market deal detection and alerting.
//!
//! This crate polls skin marketplaces for candidate listings, scores each
//! one for profitability and risk, filters the stream down to actionable
//! deals, suppresses duplicate alerts, and keeps a bounded rolling history
//! that is snapshotted to disk each cycle.
//!
//! # Architecture
//!
//! The crate separates decision logic from I/O behind two ports:
//!
//! - **`domain`** - The evaluation pipeline: [`domain::Deal`] and its
//!   derived metrics, the [`domain::MarketAnalyzer`], the dedup cache, the
//!   filter pipeline, and the bounded history buffer. Pure and synchronous.
//! - **`port`** - Trait seams for external collaborators:
//!   [`port::Collector`] (marketplace data) and [`port::Notifier`]
//!   (alert delivery).
//! - **`adapter`** - Implementations of the ports: the BUFF marketplace
//!   collector, the Discord webhook notifier, and the JSON snapshot writer.
//! - **`app`** - The polling loop tying it all together: collect, filter,
//!   persist, notify.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML with validation
//! - [`domain`] - Deal scoring, filtering, dedup, and history
//! - [`error`] - Error types for the crate
//! - [`port`] - Trait definitions for collectors and notifiers
//! - [`adapter`] - BUFF, Discord, and snapshot implementations
//! - [`app`] - The polling loop
//!
//! # Example
//!
//! ```no_run
//! use skinscout::config::Config;
//! use skinscout::domain::{FilterPipeline, MarketAnalyzer};
//!
//! let config = Config::default();
//! let pipeline = FilterPipeline::new(
//!     MarketAnalyzer::new(),
//!     config.thresholds.clone(),
//!     config.dedup.max_entries,
//! );
//! ```

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
