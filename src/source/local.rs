//! Station files already on disk, laid out as `<root>/<year>/<file>.gz`.

use std::path::{Path, PathBuf};

use super::FileSource;
use crate::error::FileError;

pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: &Path) -> Self {
        LocalSource {
            root: root.to_path_buf(),
        }
    }
}

impl FileSource for LocalSource {
    async fn list(&self, year: i32) -> Result<Vec<String>, FileError> {
        let dir = self.root.join(year.to_string());
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| FileError::TransportFailure(format!("{}: {}", dir.display(), e)))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FileError::TransportFailure(e.to_string()))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".gz") {
                names.push(name);
            }
        }
        names.sort();

        Ok(names)
    }

    async fn fetch(&self, year: i32, file_name: &str) -> Result<Vec<u8>, FileError> {
        let path = self.root.join(year.to_string()).join(file_name);

        tokio::fs::read(&path)
            .await
            .map_err(|e| FileError::TransportFailure(format!("{}: {}", path.display(), e)))
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn should_list_gz_files_sorted() {
        let tmp = TempDir::new().unwrap();
        let year_dir = tmp.path().join("2017");
        fs::create_dir(&year_dir).unwrap();
        fs::write(year_dir.join("b-1-2017.gz"), b"x").unwrap();
        fs::write(year_dir.join("a-1-2017.gz"), b"y").unwrap();
        fs::write(year_dir.join("readme.txt"), b"z").unwrap();

        let source = LocalSource::new(tmp.path());
        let names = source.list(2017).await.unwrap();

        assert_eq!(names, vec!["a-1-2017.gz", "b-1-2017.gz"]);
        assert_eq!(source.fetch(2017, "a-1-2017.gz").await.unwrap(), b"y");
    }

    #[tokio::test]
    async fn should_report_missing_year_as_transport_failure() {
        let tmp = TempDir::new().unwrap();
        let source = LocalSource::new(tmp.path());

        assert!(matches!(
            source.list(1901).await,
            Err(FileError::TransportFailure(_))
        ));
        assert!(matches!(
            source.fetch(1901, "nope.gz").await,
            Err(FileError::TransportFailure(_))
        ));
    }
}
