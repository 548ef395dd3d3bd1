use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::SessionHistoryData;

const HISTORY_FILE: &str = "history.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocadrill");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "unreadable store file, starting fresh");
                T::default()
            }),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read store file");
                T::default()
            }
        }
    }

    /// Write to a temp file and rename over the target so a crash never
    /// leaves a half-written file behind.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_history(&self) -> SessionHistoryData {
        let data: SessionHistoryData = self.load(HISTORY_FILE);
        if data.needs_reset() {
            tracing::warn!(
                found = data.schema_version,
                "history schema changed, starting fresh"
            );
            return SessionHistoryData::default();
        }
        data
    }

    pub fn save_history(&self, data: &SessionHistoryData) -> Result<()> {
        self.save(HISTORY_FILE, data)
    }
}
