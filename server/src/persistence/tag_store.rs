//! One tagged-compound record file per NPC.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use lobby_shared::{Location, SkinTexture, TagCompound, TagError};

use crate::entities::{InteractionBehavior, Npc};
use crate::error::{NpcError, NpcResult};

const KEY_NAME: &str = "Name";
const KEY_LOCATION: &str = "Location";
const KEY_SKIN: &str = "Skin";
const KEY_FACE_PLAYERS: &str = "FacePlayers";
const KEY_BEHAVIOR: &str = "Behavior";
const KEY_ARENA_ENDPOINT: &str = "arena_endpoint";

/// Result of deleting a record file
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted,
    Missing,
    Failed(NpcError),
}

/// Convert an NPC into its durable compound
pub fn npc_to_tag(npc: &Npc) -> TagCompound {
    let mut location = TagCompound::new();
    location.set_string("World", npc.location.world.clone());
    location.set_double("X", npc.location.x);
    location.set_double("Y", npc.location.y);
    location.set_double("Z", npc.location.z);
    location.set_float("Yaw", npc.location.yaw);
    location.set_float("Pitch", npc.location.pitch);

    let mut skin = TagCompound::new();
    skin.set_string("texture", npc.skin.texture.clone());
    skin.set_string("signature", npc.skin.signature.clone());

    let mut root = TagCompound::new();
    root.set_string(KEY_NAME, npc.name.clone());
    root.set_compound(KEY_LOCATION, location);
    root.set_compound(KEY_SKIN, skin);
    root.set_bool(KEY_FACE_PLAYERS, npc.face_players);
    root.set_string(KEY_BEHAVIOR, npc.behavior.key());
    if let InteractionBehavior::SendToArena { endpoint } = &npc.behavior {
        root.set_string(KEY_ARENA_ENDPOINT, endpoint.clone());
    }
    root
}

/// Rebuild an NPC from its durable compound
pub fn npc_from_tag(root: &TagCompound) -> Result<Npc, String> {
    let fail = |e: TagError| e.to_string();

    let name = root.get_string(KEY_NAME).map_err(fail)?;

    let loc = root.get_compound(KEY_LOCATION).map_err(fail)?;
    let location = Location::new(
        loc.get_string("World").map_err(fail)?,
        loc.get_double("X").map_err(fail)?,
        loc.get_double("Y").map_err(fail)?,
        loc.get_double("Z").map_err(fail)?,
    )
    .with_rotation(
        loc.get_float("Yaw").map_err(fail)?,
        loc.get_float("Pitch").map_err(fail)?,
    );

    let skin = root.get_compound(KEY_SKIN).map_err(fail)?;
    let skin = SkinTexture::new(
        skin.get_string("texture").map_err(fail)?,
        skin.get_string("signature").map_err(fail)?,
    );

    let face_players = root.get_bool(KEY_FACE_PLAYERS).map_err(fail)?;

    let endpoint = match root.get_string(KEY_ARENA_ENDPOINT) {
        Ok(endpoint) => Some(endpoint),
        Err(TagError::MissingField(_)) => None,
        Err(e) => return Err(e.to_string()),
    };
    let behavior = InteractionBehavior::from_key(root.get_string(KEY_BEHAVIOR).map_err(fail)?, endpoint)?;

    Ok(Npc::new(name, location, skin, face_players, behavior))
}

/// Serialize an NPC and write it atomically to `path`
pub fn write_record(npc: &Npc, path: &Path) -> NpcResult<()> {
    let bytes = npc_to_tag(npc).encode()?;

    // Write beside the target, then rename over it
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, &bytes).map_err(|e| NpcError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(NpcError::io(path, e));
    }
    debug!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(())
}

/// Read and parse the record at `path`
pub fn read_record(path: &Path) -> NpcResult<Npc> {
    let bytes = fs::read(path).map_err(|e| NpcError::io(path, e))?;
    let root = TagCompound::decode(&bytes).map_err(|e| NpcError::corrupt(path, e))?;
    npc_from_tag(&root).map_err(|reason| NpcError::corrupt(path, reason))
}

/// Directory of NPC record files
#[derive(Debug, Clone)]
pub struct TagStore {
    dir: PathBuf,
    extension: String,
}

impl TagStore {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, self.extension))
    }

    /// Create the directory if needed
    pub fn ensure_dir(&self) -> NpcResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| NpcError::io(&self.dir, e))
    }

    /// Record files directly inside the directory, sorted by name
    pub fn record_files(&self) -> NpcResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| NpcError::io(&self.dir, e))?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == self.extension.as_str()))
            .collect();
        files.sort();
        Ok(files)
    }

    pub fn write(&self, npc: &Npc) -> NpcResult<()> {
        write_record(npc, &self.path_for(&npc.name))
    }

    pub fn read(&self, path: &Path) -> NpcResult<Npc> {
        read_record(path)
    }

    pub fn delete(&self, name: &str) -> DeleteOutcome {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => DeleteOutcome::Deleted,
            Err(e) if e.kind() == ErrorKind::NotFound => DeleteOutcome::Missing,
            Err(e) => DeleteOutcome::Failed(NpcError::io(path, e)),
        }
    }
}
