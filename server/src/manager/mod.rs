//! NPC lifecycle management.
//!
//! The manager owns every live NPC, persists them through the tag store and
//! is the single entry point for host events. Effects produced while handling
//! events are queued and handed to the host by [`NpcManager::drain_effects`].

mod proximity;
mod table;

pub use proximity::{ProximityTracker, RangeChange};
pub use table::{NpcEntry, NpcHandle, NpcTable};

use std::collections::HashMap;

use log::{debug, error, info, warn};
use lobby_shared::{CloseReason, EntityId, Hand, HostEffect, Location, PlayerId};

use crate::catalog::ItemCatalog;
use crate::config::NpcConfig;
use crate::entities::Npc;
use crate::error::{validate_name, NpcError, NpcResult};
use crate::interaction::{InteractionDispatcher, MenuClick, VendorSessions};
use crate::persistence::{DeleteOutcome, TagStore};
use crate::scheduler::{ScheduledTask, Scheduler, TickScheduler};

/// First host entity id handed out to NPCs
const FIRST_ENTITY_ID: u64 = 50_000;

/// Result of [`NpcManager::create`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Live and saved
    Created(NpcHandle),
    /// Live, but the record file could not be written
    Unsaved(NpcHandle),
    /// An NPC with this name already exists; nothing changed
    DuplicateName,
}

/// Result of [`NpcManager::remove`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Despawned and its file deleted
    Deleted,
    /// Despawned; there was no file to delete
    FileMissing,
    /// Despawned; the file could not be deleted
    DeleteFailed,
    /// No NPC with this name
    NotFound,
}

pub struct NpcManager<S: Scheduler = TickScheduler> {
    store: TagStore,
    table: NpcTable,
    tracker: ProximityTracker,
    dispatcher: InteractionDispatcher,
    scheduler: S,
    join_check_delay: u64,
    /// Last known location of every online player
    players: HashMap<PlayerId, Location>,
    next_entity_id: u64,
    outbox: Vec<HostEffect>,
}

impl NpcManager<TickScheduler> {
    pub fn new(config: &NpcConfig) -> Self {
        Self::with_scheduler(config, TickScheduler::new())
    }
}

impl<S: Scheduler> NpcManager<S> {
    pub fn with_scheduler(config: &NpcConfig, scheduler: S) -> Self {
        let catalog = match &config.catalog {
            Some(entries) => ItemCatalog::new(entries.clone(), 1),
            None => ItemCatalog::builtin(),
        };
        Self {
            store: TagStore::new(config.data_dir.clone(), config.file_extension.clone()),
            table: NpcTable::new(),
            tracker: ProximityTracker::new(config.detection_radius),
            dispatcher: InteractionDispatcher::new(catalog, config.vendor_title.clone()),
            scheduler,
            join_check_delay: config.join_check_delay_ticks,
            players: HashMap::new(),
            next_entity_id: FIRST_ENTITY_ID,
            outbox: Vec::new(),
        }
    }

    /// Replace the vendor catalog
    pub fn with_catalog(mut self, catalog: ItemCatalog) -> Self {
        let title = self.dispatcher.title().to_string();
        self.dispatcher = InteractionDispatcher::new(catalog, title);
        self
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load every record in the data directory and spawn it.
    ///
    /// Unreadable records are logged and skipped. Returns how many NPCs were
    /// loaded.
    pub fn load_all(&mut self) -> usize {
        if let Err(e) = self.store.ensure_dir() {
            error!("Cannot create NPC directory: {}", e);
            return 0;
        }
        let files = match self.store.record_files() {
            Ok(files) => files,
            Err(e) => {
                error!("Cannot list NPC directory: {}", e);
                return 0;
            }
        };

        let mut loaded = 0;
        for path in files {
            // The file stem is the NPC's key; remove and save address it by name
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                warn!("Skipping NPC file with a non UTF-8 name: {:?}", path);
                continue;
            };
            if let Err(e) = validate_name(&stem) {
                warn!("Skipping NPC file {:?}: {}", path, e);
                continue;
            }
            let mut npc = match self.store.read(&path) {
                Ok(npc) => npc,
                Err(e) => {
                    warn!("Failed to load NPC from file {:?}: {}", path, e);
                    continue;
                }
            };

            if stem != npc.name {
                warn!("NPC file {:?} holds NPC {:?}; using the file name", path, npc.name);
                npc.name = stem;
            }
            if self.table.contains_name(&npc.name) {
                warn!("Skipping {:?}: {}", path, NpcError::DuplicateName(npc.name.clone()));
                continue;
            }

            self.spawn(npc);
            loaded += 1;
        }

        info!("Successfully loaded {} NPCs.", loaded);
        loaded
    }

    /// Add, persist and spawn a new NPC.
    ///
    /// A failed save is logged and the NPC stays live without a file.
    pub fn create(&mut self, npc: Npc) -> NpcResult<CreateOutcome> {
        validate_name(&npc.name)?;
        npc.behavior.check().map_err(|reason| NpcError::InvalidBehavior {
            name: npc.name.clone(),
            reason,
        })?;
        if self.table.contains_name(&npc.name) {
            debug!("Ignoring create for existing NPC {:?}", npc.name);
            return Ok(CreateOutcome::DuplicateName);
        }

        let saved = match self.store.ensure_dir().and_then(|_| self.store.write(&npc)) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save NPC {:?}: {}", npc.name, e);
                false
            }
        };

        let Some(handle) = self.spawn(npc) else {
            return Ok(CreateOutcome::DuplicateName);
        };
        Ok(if saved {
            CreateOutcome::Created(handle)
        } else {
            CreateOutcome::Unsaved(handle)
        })
    }

    pub fn get(&self, name: &str) -> Option<&Npc> {
        let handle = self.table.handle_by_name(name)?;
        self.table.get(handle).map(|entry| &entry.npc)
    }

    pub fn handle(&self, name: &str) -> Option<NpcHandle> {
        self.table.handle_by_name(name)
    }

    pub fn entry(&self, handle: NpcHandle) -> Option<&NpcEntry> {
        self.table.get(handle)
    }

    /// Despawn an NPC and delete its record file
    pub fn remove(&mut self, name: &str) -> RemoveOutcome {
        let Some(entry) = self.table.handle_by_name(name).and_then(|h| self.table.remove(h)) else {
            return RemoveOutcome::NotFound;
        };
        self.outbox.push(HostEffect::Despawn { entity: entry.entity });

        match self.store.delete(name) {
            DeleteOutcome::Deleted => {
                info!("Successfully deleted NPC file for {:?}", name);
                RemoveOutcome::Deleted
            }
            DeleteOutcome::Missing => {
                warn!("NPC file not found for deletion: {:?}", name);
                RemoveOutcome::FileMissing
            }
            DeleteOutcome::Failed(e) => {
                warn!("Failed to delete NPC file: {}", e);
                RemoveOutcome::DeleteFailed
            }
        }
    }

    /// Toggle facing for an NPC and save the change
    pub fn set_face_players(&mut self, name: &str, enabled: bool) -> NpcResult<()> {
        let handle = self
            .table
            .handle_by_name(name)
            .ok_or_else(|| NpcError::NotFound(name.to_string()))?;
        let entry = self
            .table
            .get_mut(handle)
            .ok_or_else(|| NpcError::NotFound(name.to_string()))?;
        entry.npc.face_players = enabled;
        self.store.write(&entry.npc)
    }

    /// Despawn and unload every NPC, leaving record files in place.
    ///
    /// A later [`NpcManager::load_all`] brings them back.
    pub fn despawn_all(&mut self) {
        let entries = self.table.drain();
        for entry in &entries {
            self.outbox.push(HostEffect::Despawn { entity: entry.entity });
        }
        info!("Despawned {} NPCs", entries.len());
    }

    /// Names of all live NPCs, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.iter().map(|entry| entry.npc.name.clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn spawn(&mut self, npc: Npc) -> Option<NpcHandle> {
        let entity = EntityId(self.next_entity_id);
        let spawn = HostEffect::Spawn {
            entity,
            name: npc.name.clone(),
            location: npc.location.clone(),
            skin: npc.skin.clone(),
        };
        let handle = self.table.insert(npc, entity)?;
        self.next_entity_id += 1;

        self.outbox.push(spawn);
        let world = self.table.get(handle).map(|entry| entry.npc.location.world.clone());
        let mut viewers: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|(_, location)| Some(&location.world) == world.as_ref())
            .map(|(player, _)| *player)
            .collect();
        viewers.sort();
        for player in viewers {
            self.outbox.push(HostEffect::Show { entity, player });
        }
        Some(handle)
    }

    // =========================================================================
    // Host events
    // =========================================================================

    /// A player joined: show them their world's NPCs and check range once
    /// they settle
    pub fn on_player_join(&mut self, player: PlayerId, location: Location) {
        self.show_world(player, &location.world);
        self.players.insert(player, location);
        self.scheduler
            .run_later(self.join_check_delay, ScheduledTask::RangeCheck { player });
    }

    pub fn on_player_move(&mut self, player: PlayerId, location: Location) {
        let previous_world = self.players.get(&player).map(|l| l.world.clone());
        if let Some(previous) = previous_world.filter(|w| *w != location.world) {
            self.hide_world(player, &previous);
            self.show_world(player, &location.world);
        }
        self.tracker
            .evaluate(&mut self.table, player, &location, &mut self.outbox);
        self.players.insert(player, location);
    }

    fn show_world(&mut self, player: PlayerId, world: &str) {
        for entry in self.table.iter().filter(|e| e.npc.location.world == world) {
            self.outbox.push(HostEffect::Show {
                entity: entry.entity,
                player,
            });
        }
    }

    fn hide_world(&mut self, player: PlayerId, world: &str) {
        for entry in self.table.iter().filter(|e| e.npc.location.world == world) {
            self.outbox.push(HostEffect::Hide {
                entity: entry.entity,
                player,
            });
        }
    }

    pub fn on_player_quit(&mut self, player: PlayerId) {
        self.players.remove(&player);
        self.tracker.forget(&mut self.table, player);
        self.dispatcher.forget(player);
    }

    /// A player right-clicked an entity. Only main-hand events are handled.
    pub fn on_interact(&mut self, player: PlayerId, entity: EntityId, hand: Hand) {
        if hand != Hand::Main {
            debug!("Ignoring off-hand interaction from {} with {}", player, entity);
            return;
        }
        let Some(entry) = self.table.handle_by_entity(entity).and_then(|h| self.table.get(h)) else {
            return;
        };
        self.dispatcher
            .interact(&entry.npc, entry.entity, player, &mut self.outbox);
    }

    /// Returns true if the click was a vendor page-navigation click
    pub fn on_menu_click(&mut self, click: &MenuClick) -> bool {
        self.dispatcher.click(click, &mut self.outbox)
    }

    pub fn on_menu_close(&mut self, player: PlayerId, reason: CloseReason) {
        self.dispatcher.close(player, reason);
    }

    /// Run scheduled work due at `now`
    pub fn tick(&mut self, now: u64) {
        for task in self.scheduler.take_due(now) {
            match task {
                ScheduledTask::RangeCheck { player } => {
                    let Some(location) = self.players.get(&player).cloned() else {
                        debug!("Dropping range check for {} who is no longer online", player);
                        continue;
                    };
                    self.tracker
                        .evaluate(&mut self.table, player, &location, &mut self.outbox);
                }
            }
        }
    }

    /// Take every effect queued since the last drain
    pub fn drain_effects(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.outbox)
    }

    pub fn vendor_sessions(&self) -> &VendorSessions {
        self.dispatcher.sessions()
    }

    pub fn online_players(&self) -> usize {
        self.players.len()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
