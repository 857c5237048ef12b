use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};

/// Directory name under the platform data dir holding everything docsight writes
pub const APP_DIR_NAME: &str = "com.docsight.app";

/// Platform-specific application base directory
/// (e.g. `~/Library/Application Support/com.docsight.app`)
pub fn app_base_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR_NAME))
}

/// Filesystem access scoped beneath the application base directory
///
/// Every path handed to `ScopedFs` is relative to `base_dir`. Absolute paths,
/// parent-directory references and backslashes are rejected so callers can
/// never reach outside the app's own data directory. The user-selected input
/// document never goes through here: it's read once by the shell and passed
/// around as bytes.
#[derive(Debug, Clone)]
pub struct ScopedFs {
    base_dir: PathBuf,
}

impl ScopedFs {
    /// Create a ScopedFs rooted at the platform app data directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The app data directory cannot be determined
    /// - The base directory cannot be created
    pub fn new() -> Result<Self> {
        let base_dir = app_base_dir().ok_or_else(|| {
            AppError::Persistence("Failed to determine app data directory".to_string())
        })?;
        Self::with_base_dir(base_dir)
    }

    /// Create a ScopedFs rooted at a custom directory (used by tests and by `new`)
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&base_dir).map_err(|e| {
            AppError::Persistence(format!(
                "Failed to create app directory {:?}: {}",
                base_dir, e
            ))
        })?;
        Ok(Self { base_dir })
    }

    /// Get the base directory all operations are scoped to
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a relative path inside the scope
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if:
    /// - The path is empty
    /// - The path is absolute
    /// - The path contains `..` or backslashes (path traversal)
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        if relative.trim().is_empty() {
            return Err(AppError::Validation("Path cannot be empty".to_string()));
        }

        if relative.contains('\\') {
            return Err(AppError::Validation(format!(
                "Invalid path '{}': path traversal not allowed",
                relative
            )));
        }

        let path = Path::new(relative);
        let escapes = path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || path.is_absolute() {
            return Err(AppError::Validation(format!(
                "Invalid path '{}': path traversal not allowed",
                relative
            )));
        }

        Ok(self.base_dir.join(path))
    }

    pub async fn exists(&self, relative: &str) -> Result<bool> {
        let path = self.resolve(relative)?;
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }

    pub async fn read_text(&self, relative: &str) -> Result<String> {
        let path = self.resolve(relative)?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::Persistence(format!("Failed to read {:?}: {}", path, e)))
    }

    /// Write a text file atomically (temp file + rename), creating parent dirs
    pub async fn write_text(&self, relative: &str, content: &str) -> Result<()> {
        let path = self.resolve(relative)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Persistence(format!("Failed to create directory {:?}: {}", parent, e))
            })?;
        }

        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        tokio::fs::write(&temp_path, content).await.map_err(|e| {
            AppError::Persistence(format!("Failed to write temporary file {:?}: {}", temp_path, e))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            AppError::Persistence(format!("Failed to rename {:?} into place: {}", path, e))
        })?;

        Ok(())
    }

    pub async fn make_directory(&self, relative: &str) -> Result<()> {
        let path = self.resolve(relative)?;
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| AppError::Persistence(format!("Failed to create {:?}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped() -> (tempfile::TempDir, ScopedFs) {
        let dir = tempfile::tempdir().unwrap();
        let fs = ScopedFs::with_base_dir(dir.path().join("app")).unwrap();
        (dir, fs)
    }

    #[tokio::test]
    async fn test_write_then_read_text() {
        let (_dir, fs) = scoped();
        fs.write_text("nested/summaries.json", "[]").await.unwrap();

        assert!(fs.exists("nested/summaries.json").await.unwrap());
        assert_eq!(fs.read_text("nested/summaries.json").await.unwrap(), "[]");
        // No temp file left behind
        assert!(!fs.exists("nested/summaries.json.tmp").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_missing_file() {
        let (_dir, fs) = scoped();
        assert!(!fs.exists("nope.json").await.unwrap());
    }

    #[tokio::test]
    async fn test_make_directory() {
        let (_dir, fs) = scoped();
        fs.make_directory("logs").await.unwrap();
        assert!(fs.base_dir().join("logs").is_dir());
    }

    #[test]
    fn test_resolve_rejects_parent_dir() {
        let (_dir, fs) = scoped();
        let result = fs.resolve("../../../etc/passwd");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_resolve_rejects_absolute() {
        let (_dir, fs) = scoped();
        assert!(fs.resolve("/etc/passwd").is_err());
    }

    #[test]
    fn test_resolve_rejects_backslash() {
        let (_dir, fs) = scoped();
        assert!(fs.resolve("..\\secrets").is_err());
    }

    #[test]
    fn test_resolve_rejects_empty() {
        let (_dir, fs) = scoped();
        assert!(fs.resolve("  ").is_err());
    }

    #[test]
    fn test_resolve_stays_under_base() {
        let (_dir, fs) = scoped();
        let path = fs.resolve("settings.json").unwrap();
        assert!(path.starts_with(fs.base_dir()));
    }
}
