//! Static sound and recitation reference data.
//!
//! The catalog is read-only at runtime. It is either the built-in set or a
//! TOML file named in the configuration.

mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::CatalogError;

/// A short, independently loopable background sound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientTrack {
    pub id: String,
    pub display_name: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reciter {
    pub id: String,
    pub display_name: String,
    /// Base locator; a track's source is `{source_base}/{track_id}.mp3`.
    pub source_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecitationTrack {
    pub id: String,
    pub display_name: String,
}

/// Ambient and recitation catalogs. Recitation tracks are kept in catalog
/// order; auto-advance walks that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub ambient: Vec<AmbientTrack>,
    #[serde(default)]
    pub reciters: Vec<Reciter>,
    #[serde(default)]
    pub recitation_tracks: Vec<RecitationTrack>,
}

impl Catalog {
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog =
            toml::from_str(content).map_err(|e| CatalogError::ParseFailed(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject empty and duplicate ids within each list.
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_ids("ambient track", self.ambient.iter().map(|t| t.id.as_str()))?;
        check_ids("reciter", self.reciters.iter().map(|r| r.id.as_str()))?;
        check_ids(
            "recitation track",
            self.recitation_tracks.iter().map(|t| t.id.as_str()),
        )
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn ambient_track(&self, id: &str) -> Option<&AmbientTrack> {
        self.ambient.iter().find(|t| t.id == id)
    }

    pub fn reciter(&self, id: &str) -> Option<&Reciter> {
        self.reciters.iter().find(|r| r.id == id)
    }

    pub fn recitation_track(&self, id: &str) -> Option<&RecitationTrack> {
        self.recitation_tracks.iter().find(|t| t.id == id)
    }

    /// The track after `id` in catalog order, wrapping from the last entry
    /// back to the first. `None` if `id` is not in the catalog.
    pub fn next_recitation_track(&self, id: &str) -> Option<&RecitationTrack> {
        let index = self.recitation_tracks.iter().position(|t| t.id == id)?;
        let next = (index + 1) % self.recitation_tracks.len();
        self.recitation_tracks.get(next)
    }

    /// Playable locator for a reciter and track, if both exist.
    pub fn recitation_source(&self, reciter_id: &str, track_id: &str) -> Option<String> {
        let reciter = self.reciter(reciter_id)?;
        let track = self.recitation_track(track_id)?;
        Some(format!(
            "{}/{}.mp3",
            reciter.source_base.trim_end_matches('/'),
            track.id
        ))
    }

    pub fn search_reciters(&self, query: &str) -> Vec<&Reciter> {
        let needle = query.to_lowercase();
        self.reciters
            .iter()
            .filter(|r| r.display_name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn search_recitation_tracks(&self, query: &str) -> Vec<&RecitationTrack> {
        let needle = query.to_lowercase();
        self.recitation_tracks
            .iter()
            .filter(|t| t.display_name.to_lowercase().contains(&needle) || t.id == query)
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(CatalogError::EmptyId { kind });
        }
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.ambient.len(), 8);
        assert_eq!(catalog.recitation_tracks.len(), 114);
        assert!(!catalog.reciters.is_empty());
    }

    #[test]
    fn next_track_wraps() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.next_recitation_track("001").unwrap().id, "002");
        assert_eq!(catalog.next_recitation_track("114").unwrap().id, "001");
        assert!(catalog.next_recitation_track("999").is_none());
    }

    #[test]
    fn source_composes_base_and_track() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[reciters]]
            id = "r1"
            display_name = "Reciter One"
            source_base = "https://audio.example/r1/"

            [[recitation_tracks]]
            id = "007"
            display_name = "Seven"
            "#,
        )
        .unwrap();
        assert_eq!(
            catalog.recitation_source("r1", "007").as_deref(),
            Some("https://audio.example/r1/007.mp3")
        );
        assert!(catalog.recitation_source("r1", "008").is_none());
        assert!(catalog.recitation_source("r2", "007").is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = Catalog::from_toml_str(
            r#"
            [[ambient]]
            id = "rain"
            display_name = "Rain"
            source = "rain.mp3"

            [[ambient]]
            id = "rain"
            display_name = "More Rain"
            source = "rain2.mp3"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { .. }));
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = Catalog::builtin();
        let hits = catalog.search_recitation_tracks("YASIN");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "036");
    }
}
