//! Snapshot of a solver grid as a flat list of pattern ids
//!
//! One entry per cell in row-major order, holding the collapsed pattern's id
//! or [`UNSET_PATTERN_ID`] for cells that were still undetermined. Encoded as
//! JSON, `{"cells":[0,3,-1,...]}`.

use crate::algorithm::cell::Cell;
use crate::io::configuration::UNSET_PATTERN_ID;
use crate::io::error::{Result, WfcError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serializable grid snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    cells: Vec<i64>,
}

impl SavedState {
    /// Wrap raw entries
    pub const fn new(cells: Vec<i64>) -> Self {
        Self { cells }
    }

    /// Snapshot with every one of `count` cells unset
    pub fn unset(count: usize) -> Self {
        Self {
            cells: vec![UNSET_PATTERN_ID; count],
        }
    }

    /// Record the pattern id of every collapsed cell
    pub fn from_cells(cells: &[Cell]) -> Self {
        Self {
            cells: cells
                .iter()
                .map(|cell| cell.pattern_id().map_or(UNSET_PATTERN_ID, |id| id as i64))
                .collect(),
        }
    }

    /// Raw entries in cell order
    pub fn entries(&self) -> &[i64] {
        &self.cells
    }

    /// Number of entries
    pub const fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when there are no entries
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of entries holding a pattern id
    pub fn determined_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&entry| entry != UNSET_PATTERN_ID)
            .count()
    }

    /// Encode as JSON
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the text is not a valid snapshot
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write the snapshot to a file
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|e| WfcError::Serialization {
            path: Some(path.to_path_buf()),
            source: e,
        })?;
        fs::write(path, text).map_err(|e| WfcError::FileSystem {
            path: path.to_path_buf(),
            operation: "write saved state",
            source: e,
        })
    }

    /// Read a snapshot from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| WfcError::FileSystem {
            path: path.to_path_buf(),
            operation: "read saved state",
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| WfcError::Serialization {
            path: Some(path.to_path_buf()),
            source: e,
        })
    }
}
