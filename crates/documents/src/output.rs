use crate::error::{DocumentError, DocumentResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// A rendered document and the file name it is offered under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Write the document into `dir` under its file name.
    ///
    /// The bytes go to a temporary sibling first and are renamed into place;
    /// the temporary file is removed if any step fails.
    pub fn save_to(&self, dir: &Path) -> DocumentResult<PathBuf> {
        if self.file_name.is_empty() || self.file_name.contains(['/', '\\']) {
            return Err(DocumentError::InvalidPath(self.file_name.clone()));
        }

        fs::create_dir_all(dir)?;
        let target = dir.join(&self.file_name);
        let tmp_path = dir.join(format!(".{}.tmp", self.file_name));

        let result = (|| -> std::io::Result<()> {
            let mut tmp_file = File::create(&tmp_path)?;
            tmp_file.write_all(&self.bytes)?;
            tmp_file.sync_all()?;
            drop(tmp_file);
            fs::rename(&tmp_path, &target)
        })();

        if let Err(err) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }

        info!(path = %target.display(), size = self.bytes.len(), "document saved");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_writes_under_file_name() {
        let dir = TempDir::new().unwrap();
        let document = Document::new("relatorio-Ana.pdf", b"%PDF-1.3 test".to_vec());

        let path = document.save_to(&dir.path().join("out")).unwrap();

        assert_eq!(path, dir.path().join("out").join("relatorio-Ana.pdf"));
        assert_eq!(fs::read(&path).unwrap(), document.bytes);
        assert!(!dir.path().join("out").join(".relatorio-Ana.pdf.tmp").exists());
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        // A directory already occupies the target name, so the rename fails
        fs::create_dir(dir.path().join("taken.pdf")).unwrap();
        fs::write(dir.path().join("taken.pdf").join("keep"), b"x").unwrap();

        let document = Document::new("taken.pdf", b"%PDF".to_vec());
        assert!(document.save_to(dir.path()).is_err());
        assert!(!dir.path().join(".taken.pdf.tmp").exists());
    }

    #[test]
    fn test_rejects_path_separators() {
        let dir = TempDir::new().unwrap();
        let document = Document::new("../escape.pdf", vec![]);
        assert!(matches!(
            document.save_to(dir.path()),
            Err(DocumentError::InvalidPath(_))
        ));
    }
}
