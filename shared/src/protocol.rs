//! Events consumed from the host and effects emitted back to it.

use serde::{Deserialize, Serialize};

use crate::entities::{EntityId, Location, PlayerId, SkinTexture};
use crate::items::ItemStack;

/// Host simulation tick rate in Hz
pub const SERVER_TICK_RATE: u32 = 20;

/// Number of slots in a vendor menu (four rows of nine)
pub const MENU_SIZE: usize = 36;

/// Hand qualifier on an interaction event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Main,
    Off,
}

/// Which part of an open menu view a click landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickRegion {
    /// The menu's own slots
    Menu,
    /// The player's personal inventory below the menu
    PlayerInventory,
    /// Outside any inventory
    Outside,
}

/// Why the host closed a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    /// Closed by this extension, e.g. while replacing the view
    Plugin,
    Player,
    Disconnect,
    Teleport,
    Unknown,
}

/// Sounds played to players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    ButtonClick,
}

/// Renderable menu contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuView {
    pub title: String,
    pub slots: Vec<Option<ItemStack>>,
}

impl MenuView {
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slots: vec![None; MENU_SIZE],
        }
    }

    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    pub fn set(&mut self, slot: usize, stack: ItemStack) {
        if let Some(target) = self.slots.get_mut(slot) {
            *target = Some(stack);
        }
    }
}

/// Effects the engine asks the host to perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEffect {
    /// Spawn an NPC body in the world
    Spawn {
        entity: EntityId,
        name: String,
        location: Location,
        skin: SkinTexture,
    },

    /// Remove an NPC body from the world
    Despawn {
        entity: EntityId,
    },

    /// Make an NPC visible to one player
    Show {
        entity: EntityId,
        player: PlayerId,
    },

    /// Hide an NPC from one player
    Hide {
        entity: EntityId,
        player: PlayerId,
    },

    /// Turn an NPC's head and body, as seen by one player
    Face {
        entity: EntityId,
        player: PlayerId,
        yaw: f32,
        pitch: f32,
    },

    /// Greeting gesture when a player first comes into range
    Greet {
        entity: EntityId,
        player: PlayerId,
    },

    PlaySound {
        player: PlayerId,
        sound: Sound,
        volume: f32,
        pitch: f32,
    },

    /// Open a fresh menu for a player
    OpenMenu {
        player: PlayerId,
        menu: MenuView,
    },

    /// Replace the contents of a player's open menu in place
    RedrawMenu {
        player: PlayerId,
        menu: MenuView,
    },

    /// Send a player to another server endpoint
    Redirect {
        player: PlayerId,
        endpoint: String,
    },

    /// Cancel the click currently being processed
    CancelClick {
        player: PlayerId,
    },
}

impl HostEffect {
    pub fn serialize(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }
}
