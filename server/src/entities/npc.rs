//! Server-side NPC entity.

use std::collections::HashSet;
use std::fmt;

use lobby_shared::{Location, PlayerId, SkinTexture, PLAYER_EYE_HEIGHT};

/// What happens when a player interacts with an NPC
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionBehavior {
    /// No behavior beyond the proximity reactions
    #[default]
    None,
    /// Redirect the player to an arena endpoint
    SendToArena { endpoint: String },
    /// Open the paged item vendor
    Vendor,
}

impl InteractionBehavior {
    /// Name written to record files
    pub fn key(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::SendToArena { .. } => "SEND_TO_ARENA",
            Self::Vendor => "VENDOR",
        }
    }

    /// Rebuild a behavior from its record name and optional endpoint
    pub fn from_key(key: &str, endpoint: Option<&str>) -> Result<Self, String> {
        match key {
            "NONE" => Ok(Self::None),
            "VENDOR" => Ok(Self::Vendor),
            "SEND_TO_ARENA" => {
                let behavior = Self::SendToArena {
                    endpoint: endpoint.unwrap_or_default().to_string(),
                };
                behavior.check()?;
                Ok(behavior)
            }
            other => Err(format!("unknown behavior {:?}", other)),
        }
    }

    /// Reject behaviors that could not be read back from a record
    pub fn check(&self) -> Result<(), String> {
        match self {
            Self::SendToArena { endpoint } if endpoint.is_empty() => {
                Err("SEND_TO_ARENA behavior without arena_endpoint".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for InteractionBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendToArena { endpoint } => write!(f, "{} -> {}", self.key(), endpoint),
            _ => f.write_str(self.key()),
        }
    }
}

/// A stationary scripted actor
#[derive(Debug, Clone)]
pub struct Npc {
    pub name: String,
    pub location: Location,
    pub skin: SkinTexture,
    pub face_players: bool,
    pub behavior: InteractionBehavior,
    /// Players currently inside the detection radius. Never persisted.
    players_in_range: HashSet<PlayerId>,
}

impl Npc {
    pub fn new(
        name: impl Into<String>,
        location: Location,
        skin: SkinTexture,
        face_players: bool,
        behavior: InteractionBehavior,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            skin,
            face_players,
            behavior,
            players_in_range: HashSet::new(),
        }
    }

    pub fn players_in_range(&self) -> &HashSet<PlayerId> {
        &self.players_in_range
    }

    pub fn is_in_range(&self, player: PlayerId) -> bool {
        self.players_in_range.contains(&player)
    }

    /// Start tracking a player; true only on the transition into range
    pub fn track(&mut self, player: PlayerId) -> bool {
        self.players_in_range.insert(player)
    }

    /// Stop tracking a player; true if they were tracked
    pub fn untrack(&mut self, player: PlayerId) -> bool {
        self.players_in_range.remove(&player)
    }

    /// Yaw and pitch that point this NPC at a player's eyes
    pub fn facing_towards(&self, target: &Location) -> (f32, f32) {
        self.location.look_at(target, PLAYER_EYE_HEIGHT)
    }

    /// True when every durable field matches; range state is ignored
    pub fn same_record(&self, other: &Npc) -> bool {
        self.name == other.name
            && self.location == other.location
            && self.skin == other.skin
            && self.face_players == other.face_players
            && self.behavior == other.behavior
    }
}
