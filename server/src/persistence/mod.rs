//! Durable storage for NPC records.
//!
//! Each NPC is written to its own file in a dedicated directory. Writes are
//! atomic per file; there is no cross-file transaction.

mod tag_store;

pub use tag_store::{npc_from_tag, npc_to_tag, read_record, write_record, DeleteOutcome, TagStore};
