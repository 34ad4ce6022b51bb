//! Shared entity definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Height of a standing player's eyes above their feet
pub const PLAYER_EYE_HEIGHT: f64 = 1.62;

/// Identity of a connected player, as assigned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Identity of an entity spawned in the host world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// A world name plus position and orientation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn with_rotation(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }

    pub fn same_world(&self, other: &Location) -> bool {
        self.world == other.world
    }

    /// Euclidean distance, ignoring the world name
    pub fn distance_to(&self, other: &Location) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Yaw and pitch (degrees) that point from this location towards `target`.
    ///
    /// Yaw 0 faces +Z and grows clockwise towards -X; positive pitch looks down.
    pub fn look_at(&self, target: &Location, target_height: f64) -> (f32, f32) {
        let dx = target.x - self.x;
        let dy = (target.y + target_height) - (self.y + PLAYER_EYE_HEIGHT);
        let dz = target.z - self.z;
        let horizontal = (dx * dx + dz * dz).sqrt();

        let yaw = (-dx).atan2(dz).to_degrees();
        let pitch = (-dy).atan2(horizontal).to_degrees();
        (yaw as f32, pitch as f32)
    }
}

/// Texture reference and signature used to render an NPC's appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinTexture {
    pub texture: String,
    pub signature: String,
}

impl SkinTexture {
    pub fn new(texture: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            texture: texture.into(),
            signature: signature.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Location::new("lobby", 0.0, 64.0, 0.0);
        let b = Location::new("lobby", 3.0, 68.0, 0.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
        assert!(a.same_world(&b));
        assert!(!a.same_world(&Location::new("arena", 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_look_at_cardinal_directions() {
        let npc = Location::new("lobby", 0.0, 64.0, 0.0);

        let (yaw, pitch) = npc.look_at(&Location::new("lobby", 0.0, 64.0, 10.0), PLAYER_EYE_HEIGHT);
        assert!(yaw.abs() < 0.001);
        assert!(pitch.abs() < 0.001);

        let (yaw, _) = npc.look_at(&Location::new("lobby", -10.0, 64.0, 0.0), PLAYER_EYE_HEIGHT);
        assert!((yaw - 90.0).abs() < 0.001);

        // Target below the NPC's eyes means looking down
        let (_, pitch) = npc.look_at(&Location::new("lobby", 5.0, 60.0, 0.0), PLAYER_EYE_HEIGHT);
        assert!(pitch > 0.0);
    }
}
