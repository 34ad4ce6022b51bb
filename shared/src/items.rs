//! Item definitions shared between the host and the NPC engine.

use serde::{Deserialize, Serialize};

use crate::tag::TagCompound;

/// Item materials the vendor menu knows how to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    StoneButton,
    TippedArrow,
    Arrow,
    GoldenApple,
    EnchantedGoldenApple,
    EnderPearl,
    SplashPotion,
    TotemOfUndying,
    Obsidian,
    EndCrystal,
    ExperienceBottle,
}

impl Material {
    /// Largest stack the host allows for this material
    pub fn max_stack(&self) -> u8 {
        match self {
            Self::StoneButton | Self::TotemOfUndying | Self::SplashPotion => 1,
            Self::EnderPearl => 16,
            _ => 64,
        }
    }
}

/// Potion effects that can be applied to potions and tipped arrows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PotionType {
    InstantDamage,
    InstantHeal,
    Speed,
    Strength,
    FireResistance,
}

/// A stack of items placed into a menu slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: Material,
    pub amount: u8,
    pub display_name: Option<String>,
    /// Base potion, for potions and tipped arrows
    pub potion: Option<PotionType>,
    /// Custom metadata carried by the stack
    pub tag: Option<TagCompound>,
}

impl ItemStack {
    pub fn new(material: Material, amount: u8) -> Self {
        Self {
            material,
            amount: amount.clamp(1, material.max_stack()),
            display_name: None,
            potion: None,
            tag: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_potion(mut self, potion: PotionType) -> Self {
        self.potion = Some(potion);
        self
    }

    pub fn with_tag(mut self, tag: TagCompound) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn has_tag(&self) -> bool {
        self.tag.as_ref().is_some_and(|tag| !tag.is_empty())
    }
}
