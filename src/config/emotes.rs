use anyhow::{Context, Result};
use log::info;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::domain::Mode;

/// Chat emotes for characters and modes, keyed by their display name
#[derive(Debug, Clone, Default)]
pub struct Emotes {
    by_name: HashMap<String, String>,
}

impl Emotes {
    pub fn new(by_name: HashMap<String, String>) -> Self {
        Self { by_name }
    }

    /// Load the emote table from a JSON object file; a missing file yields no emotes
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read emote file {}", path.display()))?;
        let by_name: HashMap<String, String> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse emote file {}", path.display()))?;

        info!("Loaded {} emotes from {}", by_name.len(), path.display());
        Ok(Self { by_name })
    }

    pub fn character(&self, name: &str) -> &str {
        self.lookup(name)
    }

    pub fn mode(&self, mode: Mode) -> &str {
        self.lookup(mode.display_name())
    }

    fn lookup(&self, name: &str) -> &str {
        self.by_name.get(name).map(String::as_str).unwrap_or("")
    }
}
