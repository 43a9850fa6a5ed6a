use std::path::PathBuf;

/// A trade log written by one bot, and the label its rows are tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    pub label: String,
    pub path: PathBuf,
}

impl LogSource {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}
