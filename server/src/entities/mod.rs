//! Server-side entity definitions.

mod npc;

pub use npc::{InteractionBehavior, Npc};
