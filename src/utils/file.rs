use std::{collections::BTreeMap, fs::{self, File}, io::{ErrorKind, Write}, path::{Path, PathBuf}};

use crate::models::CommunityId;
use crate::state::StoreError;

pub type CountMap = BTreeMap<CommunityId, u64>;

/// Reads the counter file. A missing file is an empty map, not an error.
pub fn load_counts(path: &Path) -> Result<Option<CountMap>, StoreError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::Io { path: path.to_path_buf(), source: e }),
    };

    serde_json::from_str(&data)
        .map(Some)
        .map_err(|e| StoreError::Json { path: path.to_path_buf(), source: e })
}

/// Rewrites the whole counter file. The map goes to a sibling temp file first
/// and is renamed over the target, so a crash mid-write leaves the old file.
pub fn save_counts(path: &Path, counts: &CountMap) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(counts)
        .map_err(|e| StoreError::Json { path: path.to_path_buf(), source: e })?;

    let tmp = temp_path(path);
    let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };

    let mut file = File::create(&tmp).map_err(io_err)?;
    file.write_all(json.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);

    fs::rename(&tmp, path).map_err(io_err)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
