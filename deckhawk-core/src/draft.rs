use crate::deck::{ColumnLayout, DeckState};
use crate::error::DeckError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

const DRAFT_FORMAT_VERSION: u32 = 1;

/// A locally persisted, unsaved deck edit session: the whole deck plus the
/// column layout, keyed by a draft id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: String,
    pub deck: DeckState,
    pub layout: ColumnLayout,
}

impl Draft {
    pub fn new() -> Draft {
        Draft {
            id: Uuid::new_v4().to_string(),
            deck: DeckState::new(),
            layout: ColumnLayout::default(),
        }
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

/// Versioned on-disk envelope. Unknown versions are treated as corrupt
/// rather than guessed at.
#[derive(Serialize, Deserialize, Debug)]
struct DraftFile {
    version: u32,
    saved_at: OffsetDateTime,
    draft: Draft,
}

/// Local draft storage: one JSON file per draft id.
///
/// Failure semantics are deliberately soft. A store that cannot write
/// degrades to "changes are not durable across reloads" - auto_save
/// reports the miss and the editor keeps working. Writes are
/// last-write-wins; a draft is assumed to have a single owner at a time
/// (concurrent editors of the same id are not coordinated).
#[derive(Debug, Clone)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn new() -> Result<Self, DeckError> {
        let dir = ProjectDirs::from("", "", "deckhawk")
            .map(|proj_dirs| proj_dirs.data_dir().join("drafts"))
            .ok_or_else(|| DeckError::Storage("Could not determine data directory".to_string()))?;
        Self::with_dir(dir)
    }

    /// Store rooted at an explicit directory (tests, portable installs).
    pub fn with_dir(dir: PathBuf) -> Result<Self, DeckError> {
        fs::create_dir_all(&dir)
            .map_err(|e| DeckError::Storage(format!("Failed to create draft directory: {}", e)))?;
        Ok(DraftStore { dir })
    }

    fn draft_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("draft-{}.json", id))
    }

    /// Allocates a new draft id and empty deck skeleton. Nothing is written
    /// until the first auto_save.
    pub fn create_draft(&self) -> Draft {
        let draft = Draft::new();
        debug!(draft_id = %draft.id, "Created new draft");
        draft
    }

    /// Loads a stored draft. Absent or unreadable drafts yield None; a
    /// corrupt file is logged and treated as absent.
    pub fn load_draft(&self, id: &str) -> Option<Draft> {
        let path = self.draft_path(id);
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(draft_id = %id, error = %e, "Failed to read draft file");
                return None;
            }
        };
        match serde_json::from_str::<DraftFile>(&content) {
            Ok(file) if file.version == DRAFT_FORMAT_VERSION => Some(file.draft),
            Ok(file) => {
                warn!(
                    draft_id = %id,
                    version = file.version,
                    "Draft file has unsupported version, ignoring"
                );
                None
            }
            Err(e) => {
                warn!(draft_id = %id, error = %e, "Draft file is corrupt, ignoring");
                None
            }
        }
    }

    /// Idempotently overwrites the stored draft. Returns whether the write
    /// stuck; a failure is non-fatal and only means the session is not
    /// durable.
    pub fn auto_save(&self, draft: &Draft) -> bool {
        let file = DraftFile {
            version: DRAFT_FORMAT_VERSION,
            saved_at: OffsetDateTime::now_utc(),
            draft: draft.clone(),
        };
        let json = match serde_json::to_string_pretty(&file) {
            Ok(json) => json,
            Err(e) => {
                warn!(draft_id = %draft.id, error = %e, "Failed to serialize draft");
                return false;
            }
        };
        match fs::write(self.draft_path(&draft.id), json) {
            Ok(()) => {
                debug!(draft_id = %draft.id, "Draft autosaved");
                true
            }
            Err(e) => {
                warn!(
                    draft_id = %draft.id,
                    error = %e,
                    "Draft autosave failed; changes are not durable"
                );
                false
            }
        }
    }

    /// Removes the stored draft, after a successful server-side save or an
    /// explicit discard.
    pub fn delete_draft(&self, id: &str) -> bool {
        let path = self.draft_path(id);
        if !path.exists() {
            return false;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(draft_id = %id, "Draft deleted");
                true
            }
            Err(e) => {
                warn!(draft_id = %id, error = %e, "Failed to delete draft");
                false
            }
        }
    }

    /// Ids of every stored draft, for recovery listings.
    pub fn list_draft_ids(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                name.strip_prefix("draft-")?
                    .strip_suffix(".json")
                    .map(String::from)
            })
            .collect();
        ids.sort();
        ids
    }
}
