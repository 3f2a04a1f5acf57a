pub mod options;
pub mod settings;

use settings::Settings;
use std::path::Path;

/// File name of the project settings looked up next to the snapshots.
pub const SETTINGS_FILE_NAME: &str = "pdf_snapshot.yaml";

/// ディレクトリ内の `pdf_snapshot.yaml` を読み込む。
///
/// ファイルが存在しなければデフォルト設定を返す。
pub fn load_settings_for_dir(dir: &Path) -> crate::error::Result<Settings> {
    let settings_path = dir.join(SETTINGS_FILE_NAME);

    if settings_path.exists() {
        Settings::from_file(&settings_path)
    } else {
        Ok(Settings::default())
    }
}
