use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// Serializes to exactly the on-disk document shape:
// { "library": [paths...], "playlists": { name: [paths...] } }
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicStore {
    #[serde(default)]
    pub library: Vec<PathBuf>,
    #[serde(default)]
    pub playlists: HashMap<String, Vec<PathBuf>>,
}

impl MusicStore {
    pub fn add_track(&mut self, path: &Path) -> bool {
        if self.library.iter().any(|known| known == path) {
            return false;
        }
        self.library.push(path.to_path_buf());
        true
    }

    pub fn create_playlist(&mut self, name: &str) -> bool {
        if name.is_empty() || self.playlists.contains_key(name) {
            return false;
        }
        self.playlists.insert(name.to_string(), Vec::new());
        true
    }

    pub fn remove_playlist(&mut self, name: &str) -> bool {
        self.playlists.remove(name).is_some()
    }

    pub fn add_track_to_playlist(&mut self, name: &str, path: &Path) -> bool {
        if !self.library.iter().any(|known| known == path) {
            return false;
        }
        let Some(tracks) = self.playlists.get_mut(name) else {
            return false;
        };
        if tracks.iter().any(|known| known == path) {
            return false;
        }
        tracks.push(path.to_path_buf());
        true
    }

    pub fn filter_tracks<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Path> + 'a {
        let needle = query.to_lowercase();
        self.library
            .iter()
            .filter(move |path| {
                path.to_string_lossy()
                    .to_lowercase()
                    .contains(needle.as_str())
            })
            .map(PathBuf::as_path)
    }

    pub fn tracks(&self) -> &[PathBuf] {
        &self.library
    }

    pub fn playlist(&self, name: &str) -> Option<&[PathBuf]> {
        self.playlists.get(name).map(Vec::as_slice)
    }

    pub fn playlist_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.playlists.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_tracks(paths: &[&str]) -> MusicStore {
        let mut store = MusicStore::default();
        for path in paths {
            store.add_track(Path::new(path));
        }
        store
    }

    #[test]
    fn duplicate_track_keeps_original_position() {
        let mut store = store_with_tracks(&["/a.mp3", "/b.mp3"]);
        assert!(!store.add_track(Path::new("/a.mp3")));
        assert_eq!(
            store.tracks(),
            &[PathBuf::from("/a.mp3"), PathBuf::from("/b.mp3")]
        );
    }

    #[test]
    fn create_playlist_rejects_empty_name() {
        let mut store = MusicStore::default();
        assert!(!store.create_playlist(""));
        assert!(store.playlists.is_empty());
    }

    #[test]
    fn create_playlist_with_existing_name_keeps_contents() {
        let mut store = store_with_tracks(&["/a.mp3"]);
        assert!(store.create_playlist("mix"));
        assert!(store.add_track_to_playlist("mix", Path::new("/a.mp3")));

        assert!(!store.create_playlist("mix"));
        assert_eq!(store.playlist("mix"), Some(&[PathBuf::from("/a.mp3")][..]));
    }

    #[test]
    fn playlist_add_requires_known_playlist_and_library_track() {
        let mut store = store_with_tracks(&["/a.mp3"]);
        store.create_playlist("mix");

        assert!(!store.add_track_to_playlist("nope", Path::new("/a.mp3")));
        assert!(!store.add_track_to_playlist("mix", Path::new("/missing.mp3")));
        assert!(store.add_track_to_playlist("mix", Path::new("/a.mp3")));
        assert!(!store.add_track_to_playlist("mix", Path::new("/a.mp3")));
        assert_eq!(store.playlist("mix").map(<[PathBuf]>::len), Some(1));
    }

    #[test]
    fn filter_is_case_insensitive_and_keeps_library_order() {
        let store = store_with_tracks(&["/music/ABC.mp3", "/music/xyz.mp3", "/other/abcd.flac"]);

        let hits: Vec<&Path> = store.filter_tracks("abc").collect();
        assert_eq!(
            hits,
            vec![Path::new("/music/ABC.mp3"), Path::new("/other/abcd.flac")]
        );
    }

    #[test]
    fn filter_with_empty_query_yields_whole_library() {
        let store = store_with_tracks(&["/a.mp3", "/b.mp3"]);
        assert_eq!(store.filter_tracks("").count(), 2);
    }

    #[test]
    fn remove_playlist_reports_whether_it_existed() {
        let mut store = MusicStore::default();
        store.create_playlist("mix");
        assert!(store.remove_playlist("mix"));
        assert!(!store.remove_playlist("mix"));
    }

    #[test]
    fn playlist_names_are_sorted_for_display() {
        let mut store = MusicStore::default();
        store.create_playlist("zeta");
        store.create_playlist("alpha");
        assert_eq!(store.playlist_names(), vec!["alpha", "zeta"]);
    }
}
