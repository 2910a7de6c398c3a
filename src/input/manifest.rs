use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::input::InputError;

pub const MANIFEST_FILE: &str = "transcriptions.json";

/// Maps each generated image (relative to its dataset folder) to the text it renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcriptions {
    entries: BTreeMap<String, String>,
}

impl Transcriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dst_path: &Path, text: impl Into<String>) {
        self.entries.insert(manifest_key(dst_path), text.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn read(dir: &Path) -> Result<Self, InputError> {
        let path = manifest_path(dir);
        let text = fs::read_to_string(&path)?;
        serde_json::from_str(&text)
            .map_err(|e| InputError::Parse(format!("{}: {e}", path.display())))
    }

    /// Writes `transcriptions.json` into `dir` and returns its path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, InputError> {
        let path = manifest_path(dir);
        let mut w = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut w, self)
            .map_err(|e| InputError::Parse(format!("{}: {e}", path.display())))?;
        writeln!(w)?;
        w.flush()?;
        Ok(path)
    }
}

pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE)
}

pub fn has_manifest(dir: &Path) -> bool {
    manifest_path(dir).is_file()
}

fn manifest_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
