use gridiron_game::CareerStorage;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Saves each career as `<key>.json` under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl CareerStorage for FileStorage {
    type Error = std::io::Error;

    fn save_snapshot(&self, key: &str, contents: &str) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        log::debug!("writing {} bytes to {}", contents.len(), path.display());
        fs::write(path, contents)
    }

    fn load_snapshot(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn delete_snapshot(&self, key: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}
