//! Generational arena of live NPCs.

use std::collections::HashMap;

use lobby_shared::EntityId;

use crate::entities::Npc;

/// Stable reference to a live NPC; goes stale once the NPC is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NpcHandle {
    index: u32,
    generation: u32,
}

/// A live NPC and the host entity rendering it
#[derive(Debug)]
pub struct NpcEntry {
    pub npc: Npc,
    pub entity: EntityId,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    entry: Option<NpcEntry>,
}

#[derive(Debug, Default)]
pub struct NpcTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_name: HashMap<String, NpcHandle>,
    by_entity: HashMap<EntityId, NpcHandle>,
}

impl NpcTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Insert an NPC whose name is not yet present
    pub fn insert(&mut self, npc: Npc, entity: EntityId) -> Option<NpcHandle> {
        if self.by_name.contains_key(&npc.name) {
            return None;
        }

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let handle = NpcHandle {
            index,
            generation: slot.generation,
        };

        self.by_name.insert(npc.name.clone(), handle);
        self.by_entity.insert(entity, handle);
        slot.entry = Some(NpcEntry { npc, entity });
        Some(handle)
    }

    pub fn remove(&mut self, handle: NpcHandle) -> Option<NpcEntry> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.by_name.remove(&entry.npc.name);
        self.by_entity.remove(&entry.entity);
        Some(entry)
    }

    /// Remove every NPC in slot order; outstanding handles go stale
    pub fn drain(&mut self) -> Vec<NpcEntry> {
        let mut handles: Vec<NpcHandle> = self.by_name.values().copied().collect();
        handles.sort_by_key(|handle| handle.index);
        handles.into_iter().filter_map(|handle| self.remove(handle)).collect()
    }

    pub fn get(&self, handle: NpcHandle) -> Option<&NpcEntry> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    pub fn get_mut(&mut self, handle: NpcHandle) -> Option<&mut NpcEntry> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    pub fn handle_by_name(&self, name: &str) -> Option<NpcHandle> {
        self.by_name.get(name).copied()
    }

    pub fn handle_by_entity(&self, entity: EntityId) -> Option<NpcHandle> {
        self.by_entity.get(&entity).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NpcEntry> {
        self.slots.iter().filter_map(|slot| slot.entry.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut NpcEntry> {
        self.slots.iter_mut().filter_map(|slot| slot.entry.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::InteractionBehavior;
    use lobby_shared::{Location, SkinTexture};

    fn npc(name: &str) -> Npc {
        Npc::new(
            name,
            Location::new("lobby", 0.0, 0.0, 0.0),
            SkinTexture::default(),
            false,
            InteractionBehavior::None,
        )
    }

    #[test]
    fn test_names_are_unique() {
        let mut table = NpcTable::new();
        assert!(table.insert(npc("a"), EntityId(1)).is_some());
        assert!(table.insert(npc("a"), EntityId(2)).is_none());
        assert_eq!(table.len(), 1);
        assert!(table.handle_by_entity(EntityId(2)).is_none());
    }

    #[test]
    fn test_stale_handles_resolve_to_nothing() {
        let mut table = NpcTable::new();
        let old = table.insert(npc("a"), EntityId(1)).unwrap();
        assert!(table.remove(old).is_some());
        assert!(table.remove(old).is_none());

        // Slot is reused under a new generation
        let new = table.insert(npc("b"), EntityId(2)).unwrap();
        assert_ne!(old, new);
        assert!(table.get(old).is_none());
        assert_eq!(table.get(new).unwrap().npc.name, "b");
        assert!(table.handle_by_name("a").is_none());
        assert!(table.handle_by_entity(EntityId(1)).is_none());
    }
}
