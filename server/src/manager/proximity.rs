//! Range tracking between players and NPCs.
//!
//! A player enters an NPC's range once; every later in-range evaluation only
//! refreshes facing. Leaving range drops the player silently.

use log::debug;
use lobby_shared::{HostEffect, Location, PlayerId};

use super::table::{NpcEntry, NpcTable};

/// Range transition observed for one NPC during an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeChange {
    Entered,
    Stayed,
    Left,
    Outside,
}

#[derive(Debug, Clone)]
pub struct ProximityTracker {
    radius: f64,
}

impl ProximityTracker {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Evaluate one player against every NPC
    pub fn evaluate(
        &self,
        table: &mut NpcTable,
        player: PlayerId,
        location: &Location,
        effects: &mut Vec<HostEffect>,
    ) {
        for entry in table.iter_mut() {
            self.evaluate_one(entry, player, location, effects);
        }
    }

    /// Evaluate one player against one NPC and emit the matching reactions
    pub fn evaluate_one(
        &self,
        entry: &mut NpcEntry,
        player: PlayerId,
        location: &Location,
        effects: &mut Vec<HostEffect>,
    ) -> RangeChange {
        let npc = &mut entry.npc;
        let within = npc.location.same_world(location)
            && npc.location.distance_to(location) <= self.radius;

        let change = match (within, npc.is_in_range(player)) {
            (true, false) => {
                npc.track(player);
                debug!("{} entered range of NPC {}", player, npc.name);
                effects.push(HostEffect::Greet {
                    entity: entry.entity,
                    player,
                });
                RangeChange::Entered
            }
            (true, true) => RangeChange::Stayed,
            (false, true) => {
                npc.untrack(player);
                debug!("{} left range of NPC {}", player, npc.name);
                RangeChange::Left
            }
            (false, false) => RangeChange::Outside,
        };

        if within && npc.face_players {
            let (yaw, pitch) = npc.facing_towards(location);
            effects.push(HostEffect::Face {
                entity: entry.entity,
                player,
                yaw,
                pitch,
            });
        }
        change
    }

    /// Drop a player from every NPC's range set
    pub fn forget(&self, table: &mut NpcTable, player: PlayerId) {
        for entry in table.iter_mut() {
            entry.npc.untrack(player);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{InteractionBehavior, Npc};
    use lobby_shared::{EntityId, SkinTexture};

    fn table_with(face_players: bool) -> NpcTable {
        let mut table = NpcTable::new();
        table.insert(
            Npc::new(
                "Guide",
                Location::new("lobby", 0.0, 64.0, 0.0),
                SkinTexture::default(),
                face_players,
                InteractionBehavior::None,
            ),
            EntityId(1),
        );
        table
    }

    fn greets(effects: &[HostEffect]) -> usize {
        effects.iter().filter(|e| matches!(e, HostEffect::Greet { .. })).count()
    }

    #[test]
    fn test_enter_fires_once_on_monotonic_approach() {
        let tracker = ProximityTracker::new(30.0);
        let mut table = table_with(false);
        let player = PlayerId(1);
        let mut effects = Vec::new();
        let mut first_greet_at = None;

        for step in 0..=95 {
            let distance = 100.0 - step as f64;
            let before = greets(&effects);
            tracker.evaluate(&mut table, player, &Location::new("lobby", distance, 64.0, 0.0), &mut effects);
            if greets(&effects) > before && first_greet_at.is_none() {
                first_greet_at = Some(distance);
            }
        }

        assert_eq!(greets(&effects), 1);
        assert_eq!(first_greet_at, Some(30.0));
    }

    #[test]
    fn test_in_range_set_never_duplicates() {
        let tracker = ProximityTracker::new(30.0);
        let mut table = table_with(true);
        let player = PlayerId(3);
        let mut effects = Vec::new();

        for i in 0..50 {
            let spot = Location::new("lobby", (i % 10) as f64, 64.0, 1.0);
            tracker.evaluate(&mut table, player, &spot, &mut effects);
        }

        let entry = table.iter().next().unwrap();
        assert_eq!(entry.npc.players_in_range().len(), 1);
        assert_eq!(greets(&effects), 1);
        // Facing refreshes on every in-range evaluation
        let faces = effects.iter().filter(|e| matches!(e, HostEffect::Face { .. })).count();
        assert_eq!(faces, 50);
    }

    #[test]
    fn test_exit_is_silent_and_re_entry_greets_again() {
        let tracker = ProximityTracker::new(30.0);
        let mut table = table_with(false);
        let player = PlayerId(4);
        let mut effects = Vec::new();
        let entry = table.iter_mut().next().unwrap();

        let near = Location::new("lobby", 5.0, 64.0, 0.0);
        let far = Location::new("lobby", 50.0, 64.0, 0.0);
        assert_eq!(tracker.evaluate_one(entry, player, &near, &mut effects), RangeChange::Entered);
        assert_eq!(tracker.evaluate_one(entry, player, &far, &mut effects), RangeChange::Left);
        assert_eq!(effects.len(), 1);
        assert_eq!(tracker.evaluate_one(entry, player, &far, &mut effects), RangeChange::Outside);
        assert_eq!(tracker.evaluate_one(entry, player, &near, &mut effects), RangeChange::Entered);
        assert_eq!(greets(&effects), 2);
    }

    #[test]
    fn test_other_world_is_out_of_range() {
        let tracker = ProximityTracker::new(30.0);
        let mut table = table_with(true);
        let mut effects = Vec::new();
        tracker.evaluate(&mut table, PlayerId(5), &Location::new("arena", 0.0, 64.0, 0.0), &mut effects);
        assert!(effects.is_empty());
        assert!(table.iter().next().unwrap().npc.players_in_range().is_empty());
    }
}
