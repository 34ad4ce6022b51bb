//! Tagged compound container used for durable NPC records and item metadata.
//!
//! A compound is an ordered map of named fields. Each field holds one typed
//! [`Tag`], which may itself be a nested compound or a list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Magic prefix written in front of every encoded compound
pub const TAG_MAGIC: [u8; 4] = *b"LNPC";

/// Current container format version
pub const TAG_FORMAT_VERSION: u8 = 1;

/// Errors produced while encoding or decoding a compound
#[derive(Debug, Error)]
pub enum TagError {
    #[error("missing container header")]
    MissingHeader,
    #[error("bad container magic {0:?}")]
    BadMagic([u8; 4]),
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("field `{field}` has type {found}, expected {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A single typed value inside a compound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tag {
    Byte(i8),
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<Tag>),
    Compound(TagCompound),
}

impl Tag {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "byte",
            Tag::Bool(_) => "bool",
            Tag::Int(_) => "int",
            Tag::Long(_) => "long",
            Tag::Float(_) => "float",
            Tag::Double(_) => "double",
            Tag::String(_) => "string",
            Tag::List(_) => "list",
            Tag::Compound(_) => "compound",
        }
    }
}

/// Ordered map of named tags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagCompound {
    fields: BTreeMap<String, Tag>,
}

impl TagCompound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, tag: Tag) -> Option<Tag> {
        self.fields.insert(key.into(), tag)
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.fields.remove(key)
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, Tag::String(value.into()));
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.insert(key, Tag::Bool(value));
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i32) {
        self.insert(key, Tag::Int(value));
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f32) {
        self.insert(key, Tag::Float(value));
    }

    pub fn set_double(&mut self, key: impl Into<String>, value: f64) {
        self.insert(key, Tag::Double(value));
    }

    pub fn set_compound(&mut self, key: impl Into<String>, value: TagCompound) {
        self.insert(key, Tag::Compound(value));
    }

    fn require(&self, key: &str) -> Result<&Tag, TagError> {
        self.fields
            .get(key)
            .ok_or_else(|| TagError::MissingField(key.to_string()))
    }

    fn wrong_type(key: &str, expected: &'static str, found: &Tag) -> TagError {
        TagError::WrongType {
            field: key.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    pub fn get_string(&self, key: &str) -> Result<&str, TagError> {
        match self.require(key)? {
            Tag::String(value) => Ok(value),
            other => Err(Self::wrong_type(key, "string", other)),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, TagError> {
        match self.require(key)? {
            Tag::Bool(value) => Ok(*value),
            // Byte booleans are accepted for records written by byte-only tools
            Tag::Byte(value) => Ok(*value != 0),
            other => Err(Self::wrong_type(key, "bool", other)),
        }
    }

    pub fn get_int(&self, key: &str) -> Result<i32, TagError> {
        match self.require(key)? {
            Tag::Int(value) => Ok(*value),
            other => Err(Self::wrong_type(key, "int", other)),
        }
    }

    pub fn get_float(&self, key: &str) -> Result<f32, TagError> {
        match self.require(key)? {
            Tag::Float(value) => Ok(*value),
            other => Err(Self::wrong_type(key, "float", other)),
        }
    }

    pub fn get_double(&self, key: &str) -> Result<f64, TagError> {
        match self.require(key)? {
            Tag::Double(value) => Ok(*value),
            other => Err(Self::wrong_type(key, "double", other)),
        }
    }

    pub fn get_compound(&self, key: &str) -> Result<&TagCompound, TagError> {
        match self.require(key)? {
            Tag::Compound(value) => Ok(value),
            other => Err(Self::wrong_type(key, "compound", other)),
        }
    }

    /// Encode into the versioned binary container
    pub fn encode(&self) -> Result<Vec<u8>, TagError> {
        let body = bincode::serialize(self)?;
        let mut bytes = Vec::with_capacity(TAG_MAGIC.len() + 1 + body.len());
        bytes.extend_from_slice(&TAG_MAGIC);
        bytes.push(TAG_FORMAT_VERSION);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Decode a container produced by [`TagCompound::encode`]
    pub fn decode(bytes: &[u8]) -> Result<Self, TagError> {
        if bytes.len() < TAG_MAGIC.len() + 1 {
            return Err(TagError::MissingHeader);
        }
        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != TAG_MAGIC {
            return Err(TagError::BadMagic(magic));
        }
        let version = bytes[4];
        if version != TAG_FORMAT_VERSION {
            return Err(TagError::UnsupportedVersion(version));
        }
        Ok(bincode::deserialize(&bytes[5..])?)
    }
}
