//! Persisted mapping from tag UID to action.
//!
//! Every mutation rewrites the whole file atomically before returning. If the
//! write fails the in-memory change is kept and the error is returned, so the
//! operator can retry; the change is lost on restart otherwise.

use crate::{CoreResult, action::ActionSpec, store};

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use tracing::{info, instrument};

/// Result of [`Catalog::upsert`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    /// The UID was new.
    Inserted,
    /// The UID existed and the operator confirmed the overwrite.
    Replaced {
        /// Action that was overwritten.
        previous: ActionSpec,
    },
    /// The UID existed and the overwrite was declined. Nothing changed.
    Cancelled,
}

/// UID → action mapping backed by a JSON file.
#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    entries: BTreeMap<String, ActionSpec>,
}

impl Catalog {
    /// Load the catalog from `path`; a missing file yields an empty catalog.
    ///
    /// Legacy bare-string entries are normalized to typed actions here.
    #[track_caller]
    #[instrument]
    pub fn load(path: &Path) -> CoreResult<Self> {
        let entries: BTreeMap<String, ActionSpec> = store::load_json(path)?.unwrap_or_default();

        info!(path = ?path, tags = entries.len(), "Catalog loaded");

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Action bound to `uid`.
    pub fn lookup(&self, uid: &str) -> Option<&ActionSpec> {
        self.entries.get(uid)
    }

    /// Bind `uid` to `spec` and persist.
    ///
    /// When `uid` is already bound, `confirm` is called with the existing
    /// action; a `false` answer leaves the catalog untouched.
    #[track_caller]
    #[instrument(skip(self, spec, confirm))]
    pub fn upsert<F>(&mut self, uid: &str, spec: ActionSpec, confirm: F) -> CoreResult<UpsertOutcome>
    where
        F: FnOnce(&ActionSpec) -> bool,
    {
        if let Some(existing) = self.entries.get(uid)
            && !confirm(existing)
        {
            info!(uid = %uid, "Overwrite declined");
            return Ok(UpsertOutcome::Cancelled);
        }

        let outcome = match self.entries.insert(uid.to_string(), spec) {
            Some(previous) => UpsertOutcome::Replaced { previous },
            None => UpsertOutcome::Inserted,
        };

        self.save()?;

        info!(uid = %uid, outcome = ?outcome, "Tag saved");

        Ok(outcome)
    }

    /// Remove every listed UID and persist. Returns how many were present.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn remove(&mut self, uids: &BTreeSet<String>) -> CoreResult<usize> {
        let removed = uids
            .iter()
            .filter(|uid| self.entries.remove(uid.as_str()).is_some())
            .count();

        if removed > 0 {
            self.save()?;
        }

        info!(requested = uids.len(), removed, "Tags deleted");

        Ok(removed)
    }

    /// Every binding, ordered by UID.
    pub fn all(&self) -> impl Iterator<Item = (&str, &ActionSpec)> {
        self.entries.iter().map(|(uid, spec)| (uid.as_str(), spec))
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File backing this catalog.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[track_caller]
    fn save(&self) -> CoreResult<()> {
        store::save_json(&self.path, &self.entries)
    }
}
