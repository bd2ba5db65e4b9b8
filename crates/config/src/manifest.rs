use crate::error::{ErrorKind, Result};
use crate::fields::Fields;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Format, Toml};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A batch described in a file: the files in order plus per-file edits.
///
/// ```toml
/// [fields]
/// artist = "Nova Lane"
///
/// [[files]]
/// path = "masters/night_drive.mp3"
/// title = "Night Drive"
///
/// [[files]]
/// path = "cover.png"
/// file_name = "NOVA-LANE-COVER.JPG"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Naming fields for this batch, over configured defaults.
    pub fields: Fields,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestFile {
    pub path: PathBuf,
    /// Custom title used when no batch-wide title is set.
    pub title: Option<String>,
    /// Exact output name, bypassing generation.
    pub file_name: Option<String>,
}

impl Manifest {
    /// Read a TOML manifest. Relative file paths are resolved against the
    /// manifest's own directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            exn::bail!(ErrorKind::Manifest(format!("{} does not exist", path.display())));
        }
        let mut manifest = Self::from_figment(Figment::from(Toml::file(path)))?;
        let base = path.parent().unwrap_or(Path::new(""));
        for file in &mut manifest.files {
            if file.path.is_relative() {
                file.path = base.join(&file.path);
            }
        }
        tracing::debug!(path = %path.display(), files = manifest.files.len(), "Loaded manifest");
        Ok(manifest)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let manifest: Manifest =
            figment.extract().or_raise(|| ErrorKind::Manifest("failed to extract".to_string()))?;
        if manifest.files.is_empty() {
            exn::bail!(ErrorKind::Manifest("no files listed".to_string()));
        }
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.toml");
        std::fs::write(
            &path,
            r#"
            [fields]
            artist = "Nova Lane"

            [[files]]
            path = "masters/night_drive.mp3"
            title = "Night Drive"

            [[files]]
            path = "/absolute/cover.png"
            file_name = "COVER.JPG"
            "#,
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.fields.artist.as_deref(), Some("Nova Lane"));
        assert_eq!(manifest.files.len(), 2);
        assert_eq!(manifest.files[0].path, dir.path().join("masters/night_drive.mp3"));
        assert_eq!(manifest.files[0].title.as_deref(), Some("Night Drive"));
        assert_eq!(manifest.files[0].file_name, None);
        assert_eq!(manifest.files[1].path, PathBuf::from("/absolute/cover.png"));
        assert_eq!(manifest.files[1].file_name.as_deref(), Some("COVER.JPG"));
    }

    #[test]
    fn test_empty_manifest() {
        let err = Manifest::from_figment(Figment::from(Toml::string(""))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Manifest(_)));
    }

    #[test]
    fn test_unknown_key() {
        let toml = "[[files]]\npath = \"a.mp3\"\nartist = \"misplaced\"";
        let err = Manifest::from_figment(Figment::from(Toml::string(toml))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Manifest(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Manifest::load("/nonexistent/stamp/batch.toml").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Manifest(_)));
    }
}
