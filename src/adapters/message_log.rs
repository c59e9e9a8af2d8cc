use crate::domain::model::SentMessage;
use crate::domain::ports::MessageStore;
use crate::utils::error::{NotifierError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Append-only notification log in a JSON-lines file.
///
/// Opened once per run and held for the whole run; the handle is released
/// on drop whichever way the run ends. Lookups re-read the whole file —
/// the log stays small enough that scanning beats indexing here.
pub struct FileMessageLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileMessageLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }
}

#[async_trait]
impl MessageStore for FileMessageLog {
    async fn append(&self, message: &SentMessage) -> Result<()> {
        let line = serde_json::to_string(message)?;
        let mut file = self.file.lock().map_err(|_| NotifierError::StoreError {
            message: "Message log lock poisoned".to_string(),
        })?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        Ok(())
    }

    async fn find_by_pattern(&self, pattern: &Regex) -> Result<Option<SentMessage>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let message: SentMessage = serde_json::from_str(line)?;
            if pattern.is_match(&message.text.replace('\n', " ")) {
                return Ok(Some(message));
            }
        }
        Ok(None)
    }
}
