use std::path::Path;

use countdown_core::settings::{DEFAULT_ICON_ATTENTION, DEFAULT_ICON_NORMAL};
use tracing::debug;

use crate::AppError;

const BUNDLED: [(&str, &[u8]); 2] = [
    (
        DEFAULT_ICON_NORMAL,
        include_bytes!("../../icons/watch-normal.svg"),
    ),
    (
        DEFAULT_ICON_ATTENTION,
        include_bytes!("../../icons/watch-attention.svg"),
    ),
];

/// Writes the bundled icons into `dir` where they are missing.
/// Existing files are left alone. Returns how many were written.
pub fn install_bundled(dir: &Path) -> Result<usize, AppError> {
    let mut written = 0;
    for (name, bytes) in BUNDLED {
        let path = dir.join(name);
        if path.exists() {
            continue;
        }
        std::fs::create_dir_all(dir).map_err(AppError::Io)?;
        std::fs::write(&path, bytes).map_err(AppError::Io)?;
        debug!(path=?path, "installed bundled icon");
        written += 1;
    }
    Ok(written)
}
