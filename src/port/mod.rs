//! Trait definitions for external collaborators. Depend only on domain.
//!
//! Ports are the seams where I/O plugs into the evaluation pipeline:
//!
//! - [`Collector`] - a marketplace that yields candidate deals
//! - [`Notifier`] - a delivery channel for accepted-deal alerts
//!
//! Adapters in [`crate::adapter`] implement them; the polling loop in
//! [`crate::app`] consumes them as trait objects.

mod collector;
mod notifier;

pub use collector::Collector;
pub use notifier::{LogNotifier, Notifier, NotifierRegistry};
