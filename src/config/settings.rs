use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default name of the directory holding snapshot images.
pub const SNAPSHOTS_DIR_NAME: &str = "__snapshots__";

/// プロジェクト単位のデフォルト設定。
///
/// `pdf_snapshot.yaml` から読み込まれ、呼び出し側の `CompareOptions` で
/// 指定されなかった項目を埋める。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dpi: u32,
    pub tolerance: f64,
    pub combine_pages: bool,
    pub fail_on_missing_snapshot: bool,
    pub snapshots_dir_name: String,
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dpi: 144,
            tolerance: 0.0,
            combine_pages: true,
            fail_on_missing_snapshot: false,
            snapshots_dir_name: SNAPSHOTS_DIR_NAME.to_string(),
            pdfium_library_path: None,
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        let settings: Settings = serde_yml::from_str(yaml).map_err(|e| {
            crate::error::SnapshotError::config(format!("Failed to parse settings YAML: {e}"))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// スナップショットディレクトリ名はパス区切りを含まない単一要素であること。
    fn validate(&self) -> crate::error::Result<()> {
        let name = self.snapshots_dir_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(crate::error::SnapshotError::config(format!(
                "snapshots_dir_name must be a single directory name, got '{name}'"
            )));
        }
        if self.dpi == 0 {
            return Err(crate::error::SnapshotError::config("dpi must be greater than 0"));
        }
        Ok(())
    }
}
