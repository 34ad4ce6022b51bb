//! Headless demo host for the lobby NPC engine.
//!
//! Runs a fixed number of simulation ticks with one wandering player and
//! logs every effect the engine asks the host to perform.

use std::collections::HashMap;
use std::env;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use rand::Rng;

use lobby_npc::catalog::NEXT_BUTTON_SLOT;
use lobby_npc::{InteractionBehavior, MenuClick, Npc, NpcConfig, NpcManager};
use lobby_shared::{
    ClickRegion, CloseReason, EntityId, Hand, HostEffect, Location, MenuView, PlayerId,
    SkinTexture, SERVER_TICK_RATE,
};

/// Default number of ticks the demo runs for
const DEFAULT_DEMO_TICKS: u64 = 200;

/// How far the simulated player may wander from the origin
const WANDER_LIMIT: f64 = 60.0;

const LOBBY_WORLD: &str = "lobby";

/// State the demo host keeps about what it has rendered
#[derive(Default)]
struct DemoHost {
    entities: HashMap<EntityId, String>,
    open_menus: HashMap<PlayerId, MenuView>,
}

impl DemoHost {
    fn apply(&mut self, effect: HostEffect) {
        if let Ok(bytes) = effect.serialize() {
            debug!("Effect encoded to {} bytes", bytes.len());
        }
        match effect {
            HostEffect::Spawn { entity, name, location, .. } => {
                info!("Spawn {} as {} at ({:.1}, {:.1}, {:.1})", name, entity, location.x, location.y, location.z);
                self.entities.insert(entity, name);
            }
            HostEffect::Despawn { entity } => {
                info!("Despawn {}", self.name(entity));
                self.entities.remove(&entity);
            }
            HostEffect::Show { entity, player } => debug!("Show {} to {}", self.name(entity), player),
            HostEffect::Hide { entity, player } => debug!("Hide {} from {}", self.name(entity), player),
            HostEffect::Face { entity, player, yaw, pitch } => {
                debug!("{} faces {} (yaw {:.1}, pitch {:.1})", self.name(entity), player, yaw, pitch)
            }
            HostEffect::Greet { entity, player } => info!("{} greets {}", self.name(entity), player),
            HostEffect::PlaySound { player, sound, .. } => info!("Play {:?} to {}", sound, player),
            HostEffect::OpenMenu { player, menu } => {
                info!("Open '{}' for {}", menu.title, player);
                self.open_menus.insert(player, menu);
            }
            HostEffect::RedrawMenu { player, menu } => {
                info!("Redraw '{}' for {}", menu.title, player);
                self.open_menus.insert(player, menu);
            }
            HostEffect::Redirect { player, endpoint } => info!("Redirect {} to {}", player, endpoint),
            HostEffect::CancelClick { player } => debug!("Cancel click for {}", player),
        }
    }

    fn name(&self, entity: EntityId) -> &str {
        self.entities.get(&entity).map(String::as_str).unwrap_or("<unknown>")
    }

    fn entity_named(&self, name: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(entity, _)| *entity)
    }
}

fn demo_npcs() -> Vec<Npc> {
    vec![
        Npc::new(
            "Guide",
            Location::new(LOBBY_WORLD, 0.0, 64.0, 8.0).with_rotation(180.0, 0.0),
            SkinTexture::new("guide-texture", "guide-signature"),
            true,
            InteractionBehavior::None,
        ),
        Npc::new(
            "ArenaMaster",
            Location::new(LOBBY_WORLD, 20.0, 64.0, 0.0).with_rotation(90.0, 0.0),
            SkinTexture::new("arena-texture", "arena-signature"),
            true,
            InteractionBehavior::SendToArena {
                endpoint: "arena-1.local:25566".to_string(),
            },
        ),
        Npc::new(
            "Vendor",
            Location::new(LOBBY_WORLD, -12.0, 64.0, -4.0),
            SkinTexture::new("vendor-texture", "vendor-signature"),
            false,
            InteractionBehavior::Vendor,
        ),
    ]
}

fn env_ticks() -> u64 {
    env::var("LOBBY_NPC_DEMO_TICKS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DEMO_TICKS)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = env::var("LOBBY_NPC_CONFIG").unwrap_or_else(|_| "lobby_npc.json".to_string());
    let config = match NpcConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return;
        }
    };

    info!("Starting lobby NPC demo host...");
    info!("Tick rate: {} Hz, NPC directory {:?}", SERVER_TICK_RATE, config.data_dir);

    let mut manager = NpcManager::new(&config);
    if manager.load_all() == 0 {
        info!("No NPCs on disk, creating demo NPCs");
        for npc in demo_npcs() {
            if let Err(e) = manager.create(npc) {
                error!("Failed to create demo NPC: {}", e);
            }
        }
    }

    let mut host = DemoHost::default();
    for effect in manager.drain_effects() {
        host.apply(effect);
    }

    let player = PlayerId(1);
    let mut position = Location::new(LOBBY_WORLD, 0.0, 64.0, -40.0);
    manager.on_player_join(player, position.clone());

    let total_ticks = env_ticks();
    let tick_duration = Duration::from_secs_f64(1.0 / SERVER_TICK_RATE as f64);
    let mut rng = rand::thread_rng();

    for tick in 0..total_ticks {
        let tick_start = Instant::now();

        manager.tick(tick);

        // Walk towards the NPCs with some jitter
        position.x = (position.x + rng.gen_range(-1.0..1.0)).clamp(-WANDER_LIMIT, WANDER_LIMIT);
        position.z = (position.z + rng.gen_range(-0.5..1.0)).clamp(-WANDER_LIMIT, WANDER_LIMIT);
        manager.on_player_move(player, position.clone());

        match tick {
            60 => {
                if let Some(vendor) = host.entity_named("Vendor") {
                    // Hosts report both hands; only one opens the menu
                    manager.on_interact(player, vendor, Hand::Main);
                    manager.on_interact(player, vendor, Hand::Off);
                }
            }
            61 => {
                let item = host
                    .open_menus
                    .get(&player)
                    .and_then(|menu| menu.get(NEXT_BUTTON_SLOT))
                    .cloned();
                let click = MenuClick {
                    player,
                    region: ClickRegion::Menu,
                    slot: NEXT_BUTTON_SLOT,
                    item,
                };
                manager.on_menu_click(&click);
            }
            80 => {
                host.open_menus.remove(&player);
                manager.on_menu_close(player, CloseReason::Player);
            }
            100 => {
                if let Some(arena) = host.entity_named("ArenaMaster") {
                    manager.on_interact(player, arena, Hand::Main);
                }
            }
            _ => {}
        }

        for effect in manager.drain_effects() {
            host.apply(effect);
        }

        let elapsed = tick_start.elapsed();
        if elapsed < tick_duration {
            tokio::time::sleep(tick_duration - elapsed).await;
        }
    }

    manager.on_player_quit(player);
    manager.despawn_all();
    for effect in manager.drain_effects() {
        host.apply(effect);
    }
    info!("Demo finished after {} ticks", total_ticks);
}
