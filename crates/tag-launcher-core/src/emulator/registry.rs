use crate::{CoreResult, emulator::EmulatorDefinition, store};

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{info, instrument};

/// Persisted mapping of emulator id to definition.
#[derive(Debug)]
pub struct EmulatorRegistry {
    path: PathBuf,
    entries: BTreeMap<String, EmulatorDefinition>,
}

impl EmulatorRegistry {
    /// Load the registry from `path`; a missing file yields an empty registry.
    ///
    /// Definitions without a display name are named after their id.
    #[track_caller]
    #[instrument]
    pub fn load(path: &Path) -> CoreResult<Self> {
        let mut entries: BTreeMap<String, EmulatorDefinition> =
            store::load_json(path)?.unwrap_or_default();

        for (id, def) in entries.iter_mut() {
            if def.display_name.trim().is_empty() {
                def.display_name = id.clone();
            }
        }

        info!(path = ?path, emulators = entries.len(), "Emulator registry loaded");

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Look up a definition.
    pub fn get(&self, id: &str) -> Option<&EmulatorDefinition> {
        self.entries.get(id)
    }

    /// Insert or replace a definition and persist the registry.
    ///
    /// On a save error the in-memory entry is kept.
    #[track_caller]
    #[instrument(skip(self, def))]
    pub fn put(&mut self, id: &str, def: EmulatorDefinition) -> CoreResult<()> {
        self.entries.insert(id.to_string(), def);
        store::save_json(&self.path, &self.entries)?;

        info!(emulator_id = %id, "Emulator saved");

        Ok(())
    }

    /// All definitions ordered by id.
    pub fn list(&self) -> impl Iterator<Item = (&str, &EmulatorDefinition)> {
        self.entries.iter().map(|(id, def)| (id.as_str(), def))
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no emulators are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File backing this registry.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
