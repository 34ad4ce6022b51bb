//! Paged vendor menu state and rendering.

use std::collections::HashMap;

use lobby_shared::{MenuView, PlayerId, MENU_SIZE};

use crate::catalog::{
    nav_button, ItemCatalog, PageLayout, VendorEntry, BAND_WIDTH, NEXT_BUTTON_SLOT,
    PREVIOUS_BUTTON_SLOT,
};

/// An open vendor menu
#[derive(Debug, Clone, PartialEq)]
pub struct VendorSession {
    /// 1-based page currently displayed
    pub page: usize,
}

/// Open vendor menus, keyed by the player viewing them
#[derive(Debug, Default)]
pub struct VendorSessions {
    sessions: HashMap<PlayerId, VendorSession>,
}

impl VendorSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, player: PlayerId) -> bool {
        self.sessions.contains_key(&player)
    }

    pub fn get(&self, player: PlayerId) -> Option<&VendorSession> {
        self.sessions.get(&player)
    }

    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut VendorSession> {
        self.sessions.get_mut(&player)
    }

    pub fn open(&mut self, player: PlayerId, page: usize) {
        self.sessions.insert(player, VendorSession { page });
    }

    pub fn close(&mut self, player: PlayerId) -> bool {
        self.sessions.remove(&player).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Render a 1-based catalog page, or `None` if the page doesn't exist
pub fn render_page(catalog: &ItemCatalog, index: usize, title: &str) -> Option<MenuView> {
    let entries = catalog.page(index)?;
    let mut menu = MenuView::empty(title);

    // One definition per page fills the menu; larger pages list one entry per slot
    if catalog.page_size() == 1 {
        if let Some(entry) = entries.first() {
            fill_single(&mut menu, entry);
        }
    } else {
        let slots = (0..MENU_SIZE).filter(|s| *s != PREVIOUS_BUTTON_SLOT && *s != NEXT_BUTTON_SLOT);
        for (slot, entry) in slots.zip(entries) {
            menu.set(slot, entry.stack.clone());
        }
    }

    if index > 1 {
        menu.set(PREVIOUS_BUTTON_SLOT, nav_button(index - 1, false));
    }
    if index < catalog.page_count() {
        menu.set(NEXT_BUTTON_SLOT, nav_button(index + 1, true));
    }
    Some(menu)
}

/// Fill the whole menu from one item definition
fn fill_single(menu: &mut MenuView, entry: &VendorEntry) {
    match &entry.layout {
        PageLayout::Uniform => {
            for slot in 0..MENU_SIZE {
                menu.set(slot, entry.stack.clone());
            }
        }
        PageLayout::Tiered { variants, trailing } => {
            let bands = variants
                .iter()
                .map(|potion| entry.stack.clone().with_potion(*potion))
                .chain(trailing.iter().cloned());
            for (band, stack) in bands.enumerate().take(MENU_SIZE / BAND_WIDTH) {
                for slot in band * BAND_WIDTH..(band + 1) * BAND_WIDTH {
                    menu.set(slot, stack.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::button_target;
    use lobby_shared::{ItemStack, Material, PotionType};

    fn numbered(count: usize, page_size: usize) -> ItemCatalog {
        let entries = (0..count)
            .map(|i| VendorEntry::uniform(ItemStack::new(Material::Obsidian, (i + 1) as u8)))
            .collect();
        ItemCatalog::new(entries, page_size)
    }

    fn target_at(menu: &MenuView, slot: usize) -> Option<usize> {
        menu.get(slot).and_then(button_target)
    }

    #[test]
    fn test_paging_boundaries() {
        let catalog = numbered(10, 9);

        let first = render_page(&catalog, 1, "Vendor").unwrap();
        assert_eq!(target_at(&first, PREVIOUS_BUTTON_SLOT), None);
        assert_eq!(target_at(&first, NEXT_BUTTON_SLOT), Some(2));

        let last = render_page(&catalog, 2, "Vendor").unwrap();
        assert_eq!(target_at(&last, PREVIOUS_BUTTON_SLOT), Some(1));
        assert_eq!(target_at(&last, NEXT_BUTTON_SLOT), None);

        assert!(render_page(&catalog, 0, "Vendor").is_none());
        assert!(render_page(&catalog, 3, "Vendor").is_none());
    }

    #[test]
    fn test_multi_entry_page_skips_button_slots() {
        let catalog = numbered(10, 9);
        let first = render_page(&catalog, 1, "Vendor").unwrap();
        let items: Vec<u8> = first
            .slots
            .iter()
            .flatten()
            .filter(|s| s.material == Material::Obsidian)
            .map(|s| s.amount)
            .collect();
        assert_eq!(items, (1..=9).collect::<Vec<u8>>());

        let last = render_page(&catalog, 2, "Vendor").unwrap();
        assert_eq!(last.get(0).unwrap().amount, 10);
        assert!(last.get(1).is_none());
        assert!((1..MENU_SIZE)
            .filter(|s| *s != PREVIOUS_BUTTON_SLOT)
            .all(|s| last.get(s).is_none()));
    }

    #[test]
    fn test_middle_page_has_both_buttons() {
        let catalog = numbered(5, 1);
        let page = render_page(&catalog, 3, "Vendor").unwrap();
        assert_eq!(target_at(&page, PREVIOUS_BUTTON_SLOT), Some(2));
        assert_eq!(target_at(&page, NEXT_BUTTON_SLOT), Some(4));
        // Uniform fill everywhere else
        assert!((0..MENU_SIZE)
            .filter(|s| *s != PREVIOUS_BUTTON_SLOT && *s != NEXT_BUTTON_SLOT)
            .all(|s| page.get(s).unwrap().amount == 3));
    }

    #[test]
    fn test_tiered_page_fills_bands() {
        let catalog = ItemCatalog::builtin();
        let page = render_page(&catalog, 1, "Vendor").unwrap();

        let potion_at = |slot: usize| page.get(slot).unwrap().potion;
        assert!((0..9).all(|s| potion_at(s) == Some(PotionType::InstantDamage)));
        assert!((9..18).all(|s| potion_at(s) == Some(PotionType::Speed)));
        assert!((18..27).all(|s| potion_at(s) == Some(PotionType::InstantHeal)));
        assert!((28..35).all(|s| page.get(s).unwrap().material == Material::Arrow));

        // First page: the trailing band keeps slot 27, the next button takes 35
        assert_eq!(page.get(PREVIOUS_BUTTON_SLOT).unwrap().material, Material::Arrow);
        assert_eq!(target_at(&page, NEXT_BUTTON_SLOT), Some(2));
    }

    #[test]
    fn test_sessions() {
        let mut sessions = VendorSessions::new();
        let player = PlayerId(1);
        sessions.open(player, 1);
        assert!(sessions.is_open(player));
        sessions.get_mut(player).unwrap().page = 2;
        assert_eq!(sessions.get(player).unwrap().page, 2);
        assert!(sessions.close(player));
        assert!(!sessions.close(player));
        assert!(sessions.is_empty());
    }
}
