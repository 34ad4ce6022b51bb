//! Vendor item catalog and page-navigation buttons.

use serde::{Deserialize, Serialize};

use lobby_shared::{ItemStack, Material, PotionType, Tag, TagCompound};

/// Metadata key holding a button's target page
pub const NAV_TAG_KEY: &str = "next_item_index";

/// Slots per menu row; tiered pages fill one row per variant
pub const BAND_WIDTH: usize = 9;

/// Slot of the "previous page" button
pub const PREVIOUS_BUTTON_SLOT: usize = 27;

/// Slot of the "next page" button
pub const NEXT_BUTTON_SLOT: usize = 35;

/// How a single-entry page fills the menu
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum PageLayout {
    /// Every slot holds the entry's stack
    #[default]
    Uniform,
    /// One row per potion variant, then an optional trailing row
    Tiered {
        variants: Vec<PotionType>,
        trailing: Option<ItemStack>,
    },
}

/// One vendor item definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorEntry {
    pub stack: ItemStack,
    #[serde(default)]
    pub layout: PageLayout,
}

impl VendorEntry {
    pub fn uniform(stack: ItemStack) -> Self {
        Self {
            stack,
            layout: PageLayout::Uniform,
        }
    }

    pub fn tiered(stack: ItemStack, variants: Vec<PotionType>, trailing: Option<ItemStack>) -> Self {
        Self {
            stack,
            layout: PageLayout::Tiered { variants, trailing },
        }
    }
}

/// Ordered catalog sliced into 1-based pages
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    entries: Vec<VendorEntry>,
    page_size: usize,
}

impl ItemCatalog {
    pub fn new(entries: Vec<VendorEntry>, page_size: usize) -> Self {
        Self {
            entries,
            page_size: page_size.max(1),
        }
    }

    /// The stock PvP-lobby vendor: one item definition per page
    pub fn builtin() -> Self {
        let entries = vec![
            VendorEntry::tiered(
                ItemStack::new(Material::TippedArrow, 64),
                vec![PotionType::InstantDamage, PotionType::Speed, PotionType::InstantHeal],
                Some(ItemStack::new(Material::Arrow, 64)),
            ),
            VendorEntry::uniform(ItemStack::new(Material::GoldenApple, 64)),
            VendorEntry::uniform(ItemStack::new(Material::EnchantedGoldenApple, 64)),
            VendorEntry::uniform(ItemStack::new(Material::EnderPearl, 16)),
            VendorEntry::uniform(
                ItemStack::new(Material::SplashPotion, 1).with_potion(PotionType::InstantHeal),
            ),
            VendorEntry::uniform(ItemStack::new(Material::TotemOfUndying, 1)),
            VendorEntry::uniform(ItemStack::new(Material::Obsidian, 64)),
            VendorEntry::uniform(ItemStack::new(Material::EndCrystal, 64)),
            VendorEntry::uniform(ItemStack::new(Material::ExperienceBottle, 64)),
        ];
        Self::new(entries, 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.entries.len().div_ceil(self.page_size)
    }

    pub fn contains_page(&self, index: usize) -> bool {
        index >= 1 && index <= self.page_count()
    }

    /// Entries shown on a 1-based page
    pub fn page(&self, index: usize) -> Option<&[VendorEntry]> {
        if !self.contains_page(index) {
            return None;
        }
        let start = (index - 1) * self.page_size;
        let end = (start + self.page_size).min(self.entries.len());
        Some(&self.entries[start..end])
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Build a navigation button pointing at `target` page
pub fn nav_button(target: usize, is_next: bool) -> ItemStack {
    let mut tag = TagCompound::new();
    tag.set_int(NAV_TAG_KEY, i32::try_from(target).unwrap_or(i32::MAX));
    let label = if is_next { "Next Page" } else { "Previous Page" };
    ItemStack::new(Material::StoneButton, 1)
        .named(format!("{} ({})", label, target))
        .with_tag(tag)
}

/// Target page of a navigation button, or `None` for anything else
pub fn button_target(stack: &ItemStack) -> Option<usize> {
    if stack.material != Material::StoneButton {
        return None;
    }
    match stack.tag.as_ref()?.get(NAV_TAG_KEY)? {
        Tag::Int(index) if *index >= 1 => usize::try_from(*index).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> ItemCatalog {
        let entries = (0..count)
            .map(|i| VendorEntry::uniform(ItemStack::new(Material::Obsidian, (i + 1) as u8)))
            .collect();
        ItemCatalog::new(entries, 9)
    }

    #[test]
    fn test_page_slicing() {
        let catalog = numbered(10);
        assert_eq!(catalog.page_count(), 2);
        assert_eq!(catalog.page(1).unwrap().len(), 9);
        assert_eq!(catalog.page(2).unwrap().len(), 1);
        assert!(catalog.page(0).is_none());
        assert!(catalog.page(3).is_none());
    }

    #[test]
    fn test_builtin_has_one_definition_per_page() {
        let catalog = ItemCatalog::builtin();
        assert_eq!(catalog.page_size(), 1);
        assert_eq!(catalog.page_count(), catalog.len());
        assert!(matches!(catalog.page(1).unwrap()[0].layout, PageLayout::Tiered { .. }));
    }

    #[test]
    fn test_button_metadata() {
        let next = nav_button(4, true);
        assert_eq!(button_target(&next), Some(4));

        // Right material without metadata is not a button
        assert_eq!(button_target(&ItemStack::new(Material::StoneButton, 1)), None);
        // Metadata on another material is ignored
        let mut tag = TagCompound::new();
        tag.set_int(NAV_TAG_KEY, 2);
        assert_eq!(button_target(&ItemStack::new(Material::Obsidian, 1).with_tag(tag)), None);
    }
}
