use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::stats::ModeSnapshot;

/// Weekly leaderboards of one community, as posted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedReport {
    pub community_id: String,
    pub date: NaiveDate,
    pub modes: Vec<ModeSnapshot>,
}

/// File-based archive of weekly reports, one JSON file per community and day
pub struct ReportArchive {
    archive_dir: PathBuf,
}

impl ReportArchive {
    pub fn new<P: AsRef<Path>>(archive_dir: P) -> Result<Self> {
        let archive_dir = archive_dir.as_ref().to_path_buf();
        fs::create_dir_all(&archive_dir).context("Failed to create report archive directory")?;

        Ok(Self { archive_dir })
    }

    /// Save a report, replacing any report of the same community and day
    pub fn save(&self, report: &ArchivedReport) -> Result<PathBuf> {
        let dir = self.archive_dir.join(sanitize(&report.community_id));
        fs::create_dir_all(&dir).context("Failed to create community archive directory")?;

        let file_path = dir.join(format!("{}.json", report.date));
        self.write_json(&file_path, report)?;
        info!("Archived report: {}", file_path.display());
        Ok(file_path)
    }

    pub fn load(&self, community_id: &str, date: NaiveDate) -> Result<Option<ArchivedReport>> {
        let file_path = self
            .archive_dir
            .join(sanitize(community_id))
            .join(format!("{date}.json"));
        self.read_json_opt(&file_path)
    }

    // --- Helper Methods ---

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json).context("Failed to write archive file")?;
        Ok(())
    }

    fn read_json_opt<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        let data = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
        Ok(Some(data))
    }
}

/// Community ids become directory names
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mode;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let archive = ReportArchive::new(dir.path().join("reports")).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        let report = ArchivedReport {
            community_id: "guild-1".to_string(),
            date,
            modes: vec![ModeSnapshot {
                mode: Mode::Bounty,
                maps: vec![],
            }],
        };

        let path = archive.save(&report).unwrap();

        assert!(path.ends_with("guild-1/2024-03-17.json"));
        assert_eq!(archive.load("guild-1", date).unwrap(), Some(report));
        assert_eq!(archive.load("guild-2", date).unwrap(), None);
    }

    #[test]
    fn test_ids_are_safe_directory_names() {
        assert_eq!(sanitize("../etc"), "___etc");
        assert_eq!(sanitize("1084821494506475560"), "1084821494506475560");
    }
}
