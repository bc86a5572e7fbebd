use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::source::DownloadSource;

/// Deduplicated `source URL → destination` mapping computed before any transfer.
///
/// Both sides are unique. Re-inserting an identical pair is a no-op; a pair
/// that would remap either side is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransferPlan {
    entries: BTreeMap<String, PathBuf>,
    #[serde(skip)]
    by_destination: HashMap<PathBuf, String>,
}

impl TransferPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transfer. Returns `false` when the exact pair was already planned.
    pub fn insert(&mut self, url: impl Into<String>, destination: impl Into<PathBuf>) -> LauncherResult<bool> {
        let url = url.into();
        let destination = destination.into();

        if let Some(existing) = self.by_destination.get(&destination) {
            if *existing == url {
                return Ok(false);
            }
            return Err(LauncherError::PlanConflict {
                destination,
                existing: existing.clone(),
                incoming: url,
            });
        }

        if let Some(existing_dest) = self.entries.get(&url) {
            return Err(LauncherError::PlanConflict {
                destination,
                existing: existing_dest.display().to_string(),
                incoming: url,
            });
        }

        self.by_destination.insert(destination.clone(), url.clone());
        self.entries.insert(url, destination);
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PathBuf)> {
        self.entries.iter()
    }

    pub fn get(&self, url: &str) -> Option<&PathBuf> {
        self.entries.get(url)
    }

    pub fn contains_destination(&self, destination: &Path) -> bool {
        self.by_destination.contains_key(destination)
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &Path) -> bool,
    {
        let by_destination = &mut self.by_destination;
        self.entries.retain(|url, dest| {
            let kept = keep(url.as_str(), dest.as_path());
            if !kept {
                by_destination.remove(dest.as_path());
            }
            kept
        });
    }

    /// Same plan with every source URL rewritten for `source`.
    pub fn rewrite_sources(self, source: DownloadSource) -> LauncherResult<Self> {
        if source == DownloadSource::Official {
            return Ok(self);
        }

        let mut rewritten = TransferPlan::new();
        for (url, destination) in self.entries {
            rewritten.insert(source.rewrite(&url), destination)?;
        }
        Ok(rewritten)
    }

    /// `None` when nothing is planned.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
