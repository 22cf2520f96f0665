use std::{collections::BTreeMap, fmt, path::Path};

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::types::Track;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    NoPreview,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NoPreview => write!(f, "This track has no preview available"),
        }
    }
}

impl std::error::Error for ResolveError {}

#[derive(Debug)]
pub enum CatalogError {
    IoError(std::io::Error),
    SerdeError(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::IoError(e) => write!(f, "cannot read fallback catalog: {e}"),
            CatalogError::SerdeError(e) => write!(f, "invalid fallback catalog: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Where a resolved URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Preview,
    Keyed,
    Generic,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Preview => "preview",
            SourceKind::Keyed => "fallback",
            SourceKind::Generic => "random fallback",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub url: String,
    pub kind: SourceKind,
}

/// Known-good audio URLs substituted for missing or broken previews.
///
/// `keyed` maps track identifiers to URLs, `generic` is the pool a random
/// pick is made from when nothing else matches, and `second_chance` is the
/// pool used after an attached source failed to play.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallbackCatalog {
    #[serde(default)]
    pub keyed: BTreeMap<String, String>,
    #[serde(default)]
    pub generic: Vec<String>,
    #[serde(default)]
    pub second_chance: Vec<String>,
}

const BUNDLED_KEYED: [(&str, &str); 7] = [
    (
        "hindi1",
        "https://cdns-preview-7.dzcdn.net/stream/c-74e01b78405a3c3b922035b718de4a00-3.mp3",
    ),
    (
        "hindi2",
        "https://cdns-preview-d.dzcdn.net/stream/c-d63da5a566c95c8da93545fae423cc0f-3.mp3",
    ),
    (
        "hindi3",
        "https://cdns-preview-7.dzcdn.net/stream/c-7aa136ec7d02b409bb4f79042633853b-5.mp3",
    ),
    (
        "hindi4",
        "https://cdns-preview-a.dzcdn.net/stream/c-af5e39ba1b02a0ef330c915c5213ace0-4.mp3",
    ),
    (
        "english1",
        "https://cdns-preview-d.dzcdn.net/stream/c-d6cfc27f9615c3a2ff20d17638880210-6.mp3",
    ),
    (
        "english2",
        "https://cdns-preview-2.dzcdn.net/stream/c-2673d0d4ad19734c7bf0ce740d60a484-5.mp3",
    ),
    (
        "english3",
        "https://cdns-preview-e.dzcdn.net/stream/c-e77d23e0c8ed7567a507a6d1b6a9ca1b-6.mp3",
    ),
];

const BUNDLED_SECOND_CHANCE: [&str; 5] = [
    "https://cdn.freesound.org/previews/649/649586_5674468-lq.mp3",
    "https://www2.cs.uic.edu/~i101/SoundFiles/CantinaBand3.wav",
    "https://www2.cs.uic.edu/~i101/SoundFiles/taunt.wav",
    "https://www2.cs.uic.edu/~i101/SoundFiles/BabyElephantWalk60.wav",
    "https://www2.cs.uic.edu/~i101/SoundFiles/StarWars60.wav",
];

fn pick<'a, G: Rng + ?Sized>(pool: &'a [String], rng: &mut G) -> Option<&'a str> {
    let candidates: Vec<&str> = pool
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .collect();
    candidates.choose(rng).copied()
}

impl FallbackCatalog {
    /// The catalog shipped with the binary. The generic pool is the keyed
    /// previews themselves.
    pub fn bundled() -> Self {
        let keyed: BTreeMap<String, String> = BUNDLED_KEYED
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let generic = keyed.values().cloned().collect();

        Self {
            keyed,
            generic,
            second_chance: BUNDLED_SECOND_CHANCE.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Reads a catalog from a JSON document.
    ///
    /// All three fields are optional in the document:
    ///
    /// ```json
    /// {
    ///   "keyed": { "hindi1": "https://cdn.example/h1.mp3" },
    ///   "generic": ["https://cdn.example/any.mp3"],
    ///   "second_chance": ["https://cdn.example/reliable.wav"]
    /// }
    /// ```
    ///
    /// # Returns
    ///
    /// The catalog, [`CatalogError::IoError`] when the file cannot be read or
    /// [`CatalogError::SerdeError`] when it is not a catalog document.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = async_fs::read_to_string(path.as_ref())
            .await
            .map_err(CatalogError::IoError)?;
        serde_json::from_str(&content).map_err(CatalogError::SerdeError)
    }

    /// No resolution candidate at all.
    pub fn is_empty(&self) -> bool {
        self.keyed.values().all(|u| u.trim().is_empty())
            && self.generic.iter().all(|u| u.trim().is_empty())
    }

    /// Picks the URL to attach for `track`.
    ///
    /// Order: the track's own preview, the keyed entry for its id, then a
    /// uniform pick from the generic pool. Blank URLs count as missing at
    /// every step.
    ///
    /// # Arguments
    ///
    /// * `track` - The track about to be attached
    /// * `rng` - Random source for the generic pick
    ///
    /// # Returns
    ///
    /// The URL with the [`SourceKind`] it came from, or
    /// [`ResolveError::NoPreview`] when no step produced a URL. Its message is
    /// what the player shows inline.
    pub fn resolve<G: Rng + ?Sized>(
        &self,
        track: &Track,
        rng: &mut G,
    ) -> Result<ResolvedSource, ResolveError> {
        if let Some(preview) = track.preview_url() {
            return Ok(ResolvedSource {
                url: preview.to_string(),
                kind: SourceKind::Preview,
            });
        }

        if let Some(url) = self
            .keyed
            .get(&track.id)
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
        {
            return Ok(ResolvedSource {
                url: url.to_string(),
                kind: SourceKind::Keyed,
            });
        }

        pick(&self.generic, rng)
            .map(|url| ResolvedSource {
                url: url.to_string(),
                kind: SourceKind::Generic,
            })
            .ok_or(ResolveError::NoPreview)
    }

    /// URL to try after the attached source failed.
    ///
    /// Spotify-hosted previews are kept as they are; anything else is swapped
    /// for a random reliable sample. The caller compares the result with the
    /// URL that failed to decide whether a retry makes sense.
    pub fn second_chance<G: Rng + ?Sized>(
        &self,
        preview: Option<&str>,
        rng: &mut G,
    ) -> Option<String> {
        if let Some(url) = preview.map(str::trim) {
            if url.starts_with("http") && (url.contains("spotify") || url.contains("audio-preview"))
            {
                return Some(url.to_string());
            }
        }

        pick(&self.second_chance, rng).map(str::to_string)
    }
}
