use std::env;
use std::path::{Path, PathBuf};

use crate::error::AssetError;

/// Finds lesson images by file name in a short, ordered list of directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocator {
    dirs: Vec<PathBuf>,
}

impl AssetLocator {
    #[must_use]
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// `<base>/image`, then `<base>` itself.
    #[must_use]
    pub fn with_base(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self::new(vec![base.join("image"), base.to_path_buf()])
    }

    /// `MAGLAB_ASSET_DIR` (if set) first, then `image/` and `.` under the
    /// working directory.
    #[must_use]
    pub fn from_env() -> Self {
        let base = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut locator = Self::with_base(base);
        if let Ok(extra) = env::var("MAGLAB_ASSET_DIR") {
            if !extra.trim().is_empty() {
                locator.dirs.insert(0, PathBuf::from(extra));
            }
        }
        locator
    }

    /// Search `dir` before the existing candidates.
    #[must_use]
    pub fn prepend(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.insert(0, dir.into());
        self
    }

    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// # Errors
    ///
    /// Returns `AssetError::NotFound` when no candidate directory holds `name`.
    pub fn locate(&self, name: &str) -> Result<PathBuf, AssetError> {
        self.dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| AssetError::NotFound {
                name: name.to_owned(),
                searched: self.dirs.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("maglab-assets-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("image")).unwrap();
        dir
    }

    #[test]
    fn prefers_image_subdirectory() {
        let base = scratch_dir("prefer");
        fs::write(base.join("image").join("a.png"), b"x").unwrap();
        fs::write(base.join("a.png"), b"y").unwrap();

        let locator = AssetLocator::with_base(&base);
        assert_eq!(locator.locate("a.png").unwrap(), base.join("image").join("a.png"));
        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn falls_back_to_base_then_reports_not_found() {
        let base = scratch_dir("fallback");
        fs::write(base.join("b.png"), b"y").unwrap();

        let locator = AssetLocator::with_base(&base);
        assert_eq!(locator.locate("b.png").unwrap(), base.join("b.png"));

        let err = locator.locate("missing.png").unwrap_err();
        let AssetError::NotFound { name, searched } = err;
        assert_eq!(name, "missing.png");
        assert_eq!(searched.len(), 2);
        fs::remove_dir_all(&base).unwrap();
    }
}
