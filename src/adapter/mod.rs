//! Port implementations: marketplace collectors, notification channels,
//! and the durable snapshot writer.

mod buff;
mod discord;
mod snapshot;

pub use buff::BuffCollector;
pub use discord::DiscordNotifier;
pub use snapshot::SnapshotWriter;
