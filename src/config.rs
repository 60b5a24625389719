use crate::store::MusicStore;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "mixtape";
const STATE_FILE: &str = "playlists.json";

pub fn config_root() -> Result<PathBuf> {
    if let Ok(override_dir) = env::var("MIXTAPE_CONFIG_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .context("neither HOME nor USERPROFILE is set")?;
    Ok(PathBuf::from(home).join(".config").join(APP_DIR))
}

pub fn state_path() -> Result<PathBuf> {
    Ok(config_root()?.join(STATE_FILE))
}

pub fn ensure_config_dir() -> Result<PathBuf> {
    let root = config_root()?;
    fs::create_dir_all(&root).with_context(|| format!("failed to create {}", root.display()))?;
    Ok(root)
}

pub fn load_store() -> Result<MusicStore> {
    let path = state_path()?;
    if !path.exists() {
        return Ok(MusicStore::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read state file {}", path.display()))?;
    let store: MusicStore = serde_json::from_str(&raw)
        .with_context(|| format!("state file {} is corrupt", path.display()))?;
    Ok(store)
}

// Written to a sibling temp file and renamed into place, so a crash
// mid-write leaves either the old document or the new one.
pub fn save_store(store: &MusicStore) -> Result<()> {
    ensure_config_dir()?;
    let path = state_path()?;
    let json = serde_json::to_string_pretty(store)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, &path).with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn config_dir_override(dir: &Path) -> MutexGuard<'static, ()> {
        let guard = ENV_LOCK.lock().expect("env lock");
        unsafe {
            env::set_var("MIXTAPE_CONFIG_DIR", dir.to_string_lossy().as_ref());
        }
        guard
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().expect("tempdir");
        let _guard = config_dir_override(dir.path());

        let mut store = MusicStore::default();
        store.add_track(Path::new("/music/a.mp3"));
        store.add_track(Path::new("/music/b.mp3"));
        store.create_playlist("mix");
        store.add_track_to_playlist("mix", Path::new("/music/b.mp3"));

        save_store(&store).expect("save");
        let loaded = load_store().expect("load");
        assert_eq!(loaded, store);
    }

    #[test]
    fn missing_state_file_loads_empty_store() {
        let dir = tempdir().expect("tempdir");
        let _guard = config_dir_override(dir.path());

        let loaded = load_store().expect("load");
        assert_eq!(loaded, MusicStore::default());
    }

    #[test]
    fn malformed_state_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let _guard = config_dir_override(dir.path());

        fs::write(dir.path().join(STATE_FILE), "{ \"library\": 42 }").expect("write");
        let err = load_store().expect_err("corrupt state should not load");
        assert!(err.to_string().contains("corrupt"), "unexpected: {err:#}");
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let _guard = config_dir_override(dir.path());

        fs::write(dir.path().join(STATE_FILE), "{}").expect("write");
        let loaded = load_store().expect("load");
        assert!(loaded.library.is_empty());
        assert!(loaded.playlists.is_empty());
    }

    #[test]
    fn save_leaves_no_temp_residue() {
        let dir = tempdir().expect("tempdir");
        let _guard = config_dir_override(dir.path());

        save_store(&MusicStore::default()).expect("save");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
