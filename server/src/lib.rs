//! Lobby NPC engine.
//!
//! Stationary scripted NPCs that survive restarts, notice nearby players,
//! react to interaction and drive a paged item vendor. The host game loop
//! feeds events into [`NpcManager`] on its simulation thread and applies the
//! [`HostEffect`](lobby_shared::HostEffect)s it drains back out.

pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod interaction;
pub mod manager;
pub mod persistence;
pub mod scheduler;

pub use catalog::{ItemCatalog, PageLayout, VendorEntry};
pub use config::NpcConfig;
pub use entities::{InteractionBehavior, Npc};
pub use error::{NpcError, NpcResult};
pub use interaction::{InteractionDispatcher, MenuClick};
pub use manager::{CreateOutcome, NpcHandle, NpcManager, RemoveOutcome};
pub use scheduler::{ScheduledTask, Scheduler, TickScheduler};
