//! Routing of direct interactions and vendor menu events.

mod vendor;

pub use vendor::{render_page, VendorSession, VendorSessions};

use log::{debug, info, warn};
use lobby_shared::{ClickRegion, CloseReason, EntityId, HostEffect, ItemStack, PlayerId, Sound};

use crate::catalog::{button_target, ItemCatalog, NEXT_BUTTON_SLOT, PREVIOUS_BUTTON_SLOT};
use crate::entities::{InteractionBehavior, Npc};

/// Volume of the button click sound
const CLICK_VOLUME: f32 = 10.0;

/// A click inside an inventory view
#[derive(Debug, Clone)]
pub struct MenuClick {
    pub player: PlayerId,
    pub region: ClickRegion,
    pub slot: usize,
    /// Stack in the clicked slot, as the host sees it
    pub item: Option<ItemStack>,
}

#[derive(Debug)]
pub struct InteractionDispatcher {
    catalog: ItemCatalog,
    title: String,
    sessions: VendorSessions,
}

impl InteractionDispatcher {
    pub fn new(catalog: ItemCatalog, title: impl Into<String>) -> Self {
        Self {
            catalog,
            title: title.into(),
            sessions: VendorSessions::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sessions(&self) -> &VendorSessions {
        &self.sessions
    }

    /// Run an NPC's behavior for a player who interacted with it
    pub fn interact(&mut self, npc: &Npc, entity: EntityId, player: PlayerId, effects: &mut Vec<HostEffect>) {
        match &npc.behavior {
            InteractionBehavior::None => {
                debug!("{} interacted with {} ({}), no behavior", player, npc.name, entity);
            }
            InteractionBehavior::SendToArena { endpoint } => {
                info!("Sending {} to arena {} via NPC {}", player, endpoint, npc.name);
                effects.push(HostEffect::Redirect {
                    player,
                    endpoint: endpoint.clone(),
                });
            }
            InteractionBehavior::Vendor => self.open_vendor(player, effects),
        }
    }

    /// Open the vendor on its first page
    pub fn open_vendor(&mut self, player: PlayerId, effects: &mut Vec<HostEffect>) {
        let Some(menu) = render_page(&self.catalog, 1, &self.title) else {
            warn!("Vendor catalog is empty, not opening a menu for {}", player);
            return;
        };
        self.sessions.open(player, 1);
        effects.push(HostEffect::OpenMenu { player, menu });
    }

    /// Handle a menu click. Returns true if it was a page-navigation click.
    pub fn click(&mut self, click: &MenuClick, effects: &mut Vec<HostEffect>) -> bool {
        let player = click.player;
        let Some(session) = self.sessions.get_mut(player) else {
            return false;
        };
        if click.region != ClickRegion::Menu {
            return false;
        }
        // Buttons only ever render in the two navigation slots
        if click.slot != PREVIOUS_BUTTON_SLOT && click.slot != NEXT_BUTTON_SLOT {
            return false;
        }
        let Some(target) = click.item.as_ref().and_then(button_target) else {
            return false;
        };

        effects.push(HostEffect::CancelClick { player });
        effects.push(HostEffect::PlaySound {
            player,
            sound: Sound::ButtonClick,
            volume: CLICK_VOLUME,
            pitch: 1.0,
        });

        match render_page(&self.catalog, target, &self.title) {
            Some(menu) => {
                session.page = target;
                effects.push(HostEffect::RedrawMenu { player, menu });
            }
            None => warn!(
                "{} clicked a button for page {} but the catalog has {} pages",
                player,
                target,
                self.catalog.page_count()
            ),
        }
        true
    }

    /// Handle a menu closing; closes we caused ourselves keep the session
    pub fn close(&mut self, player: PlayerId, reason: CloseReason) {
        if reason == CloseReason::Plugin {
            return;
        }
        if self.sessions.close(player) {
            debug!("{} closed the vendor ({:?})", player, reason);
        }
    }

    pub fn forget(&mut self, player: PlayerId) {
        self.sessions.close(player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::nav_button;
    use lobby_shared::{Location, Material, SkinTexture};

    fn npc(behavior: InteractionBehavior) -> Npc {
        Npc::new("n", Location::new("lobby", 0.0, 0.0, 0.0), SkinTexture::default(), false, behavior)
    }

    fn button_click(player: PlayerId, region: ClickRegion, target: usize) -> MenuClick {
        MenuClick {
            player,
            region,
            slot: NEXT_BUTTON_SLOT,
            item: Some(nav_button(target, true)),
        }
    }

    #[test]
    fn test_behaviors_route_by_variant() {
        let mut dispatcher = InteractionDispatcher::new(ItemCatalog::builtin(), "Vendor");
        let player = PlayerId(1);
        let mut effects = Vec::new();

        dispatcher.interact(&npc(InteractionBehavior::None), EntityId(1), player, &mut effects);
        assert!(effects.is_empty());

        let arena = InteractionBehavior::SendToArena { endpoint: "arena:1".into() };
        dispatcher.interact(&npc(arena), EntityId(1), player, &mut effects);
        assert_eq!(effects, vec![HostEffect::Redirect { player, endpoint: "arena:1".into() }]);

        effects.clear();
        dispatcher.interact(&npc(InteractionBehavior::Vendor), EntityId(1), player, &mut effects);
        assert!(matches!(effects.as_slice(), [HostEffect::OpenMenu { .. }]));
        assert_eq!(dispatcher.sessions().get(player).unwrap().page, 1);
    }

    #[test]
    fn test_clicks_need_a_session_and_the_menu_region() {
        let mut dispatcher = InteractionDispatcher::new(ItemCatalog::builtin(), "Vendor");
        let player = PlayerId(2);
        let mut effects = Vec::new();

        assert!(!dispatcher.click(&button_click(player, ClickRegion::Menu, 2), &mut effects));

        dispatcher.open_vendor(player, &mut effects);
        effects.clear();
        assert!(!dispatcher.click(&button_click(player, ClickRegion::PlayerInventory, 2), &mut effects));

        let plain = MenuClick {
            player,
            region: ClickRegion::Menu,
            slot: 3,
            item: Some(ItemStack::new(Material::GoldenApple, 64)),
        };
        assert!(!dispatcher.click(&plain, &mut effects));

        let misplaced = MenuClick {
            slot: 4,
            ..button_click(player, ClickRegion::Menu, 2)
        };
        assert!(!dispatcher.click(&misplaced, &mut effects));
        assert!(effects.is_empty());
        assert_eq!(dispatcher.sessions().get(player).unwrap().page, 1);
    }

    #[test]
    fn test_button_click_turns_the_page() {
        let mut dispatcher = InteractionDispatcher::new(ItemCatalog::builtin(), "Vendor");
        let player = PlayerId(3);
        let mut effects = Vec::new();
        dispatcher.open_vendor(player, &mut effects);
        effects.clear();

        assert!(dispatcher.click(&button_click(player, ClickRegion::Menu, 2), &mut effects));
        assert_eq!(effects[0], HostEffect::CancelClick { player });
        assert!(matches!(effects[1], HostEffect::PlaySound { sound: Sound::ButtonClick, .. }));
        match &effects[2] {
            HostEffect::RedrawMenu { menu, .. } => {
                assert_eq!(menu.get(0).unwrap().material, Material::GoldenApple);
            }
            other => panic!("expected redraw, got {:?}", other),
        }
        assert_eq!(dispatcher.sessions().get(player).unwrap().page, 2);
    }

    #[test]
    fn test_out_of_range_button_is_cancelled_but_not_rendered() {
        let mut dispatcher = InteractionDispatcher::new(ItemCatalog::builtin(), "Vendor");
        let player = PlayerId(4);
        let mut effects = Vec::new();
        dispatcher.open_vendor(player, &mut effects);
        effects.clear();

        assert!(dispatcher.click(&button_click(player, ClickRegion::Menu, 99), &mut effects));
        assert_eq!(effects.len(), 2);
        assert_eq!(dispatcher.sessions().get(player).unwrap().page, 1);
    }

    #[test]
    fn test_plugin_close_keeps_session() {
        let mut dispatcher = InteractionDispatcher::new(ItemCatalog::builtin(), "Vendor");
        let player = PlayerId(5);
        let mut effects = Vec::new();
        dispatcher.open_vendor(player, &mut effects);

        dispatcher.close(player, CloseReason::Plugin);
        assert!(dispatcher.sessions().is_open(player));
        dispatcher.close(player, CloseReason::Player);
        assert!(!dispatcher.sessions().is_open(player));
    }
}
