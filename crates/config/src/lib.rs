//! Layered configuration for stamp.
//!
//! Sources are merged with [`figment`], later sources overriding earlier
//! ones:
//!
//! 1. built-in defaults
//! 2. `stamp.{toml,yaml,yml,json}` in the platform configuration directory
//! 3. the same files in the current working directory
//! 4. an explicit configuration file, if given
//! 5. `STAMP_`-prefixed environment variables, nested keys split on `__`
//!    (`STAMP_CONVERT__MAX_SIZE=52428800`)

pub mod error;
mod fields;
mod manifest;

pub use crate::fields::Fields;
pub use crate::manifest::{Manifest, ManifestFile};
use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use serde::Deserialize;
use stamp_archive::{ArchiveName, Method};
use stamp_naming::Convention;
use std::path::{Path, PathBuf};

const FILE_STEM: &str = "stamp";
const ENV_PREFIX: &str = "STAMP_";
/// Files larger than this are not converted.
pub const DEFAULT_MAX_CONVERT_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Naming fields applied to every batch before manifest and command-line values.
    pub defaults: Fields,
    /// An `upon` template replacing the built-in naming layout.
    pub template: Option<String>,
    /// Keep the template output's case instead of uppercasing it.
    pub preserve_case: bool,
    pub convert: ConvertConfig,
    pub archive: ArchiveConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Convert files as they are added to a batch.
    pub auto: bool,
    pub max_size: u64,
    /// Fall back to an `ffmpeg` binary when native decoding fails.
    pub ffmpeg: bool,
    /// Explicit ffmpeg binary; discovered on `PATH` when unset.
    pub ffmpeg_path: Option<PathBuf>,
}
impl Default for ConvertConfig {
    fn default() -> Self {
        Self { auto: false, max_size: DEFAULT_MAX_CONVERT_SIZE, ffmpeg: true, ffmpeg_path: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Archive file name; `.zip` is appended when missing.
    pub name: Option<String>,
    pub method: Method,
}
impl ArchiveConfig {
    pub fn archive_name(&self) -> Result<ArchiveName> {
        match &self.name {
            Some(name) => ArchiveName::new(name).or_raise(|| ErrorKind::Config(format!("archive.name = {name:?}"))),
            None => Ok(ArchiveName::default()),
        }
    }
}

impl Config {
    /// Load configuration from every standard source plus `explicit`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(dirs) = ProjectDirs::from("", "", FILE_STEM) {
            tracing::trace!(dir = %dirs.config_dir().display(), "Searching platform config directory");
            figment = merge_files(figment, dirs.config_dir());
        }
        figment = merge_files(figment, Path::new("."));
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::Config(format!("{} does not exist", path.display())));
            }
            figment = merge_file(figment, path);
        }
        // `STAMP_CONFIG` names the explicit file on the command line; it is not a key.
        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__")))
    }

    /// Extract from an already-assembled figment (defaults fill the gaps).
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Config("failed to extract".to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.template.as_deref().is_some_and(|t| t.trim().is_empty()) {
            exn::bail!(ErrorKind::Config("template must not be blank".to_string()));
        }
        self.archive.archive_name()?;
        let mut convention = Convention::default();
        self.defaults.apply(&mut convention).or_raise(|| {
            let asset = self.defaults.asset_type.as_deref().unwrap_or_default();
            ErrorKind::Config(format!("defaults.asset_type = {asset:?} is not offered for this media type"))
        })?;
        Ok(())
    }
}

fn merge_files(figment: Figment, dir: &Path) -> Figment {
    ["toml", "yaml", "yml", "json"]
        .iter()
        .map(|ext| dir.join(format!("{FILE_STEM}.{ext}")))
        .filter(|path| path.is_file())
        .fold(figment, |figment, path| merge_file(figment, &path))
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    tracing::debug!(path = %path.display(), "Loading configuration file");
    match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use stamp_naming::MediaType;

    fn from_toml(toml: &str) -> Result<Config> {
        Config::from_figment(Figment::from(Toml::string(toml)))
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.convert.auto);
        assert!(config.convert.ffmpeg);
        assert_eq!(config.convert.max_size, DEFAULT_MAX_CONVERT_SIZE);
        assert_eq!(config.archive.method, Method::Stored);
        assert_eq!(config.archive.archive_name().unwrap().as_str(), "renamed_files.zip");
    }

    #[test]
    fn test_full_toml() {
        let config = from_toml(
            r#"
            template = "{{ artist }}-{{ title }}"
            preserve_case = true

            [defaults]
            entity = "LABEL"
            media_type = "video"
            asset_type = "trailer"

            [convert]
            auto = true
            max_size = 52428800

            [archive]
            name = "deliverables"
            method = "deflate"
            "#,
        )
        .unwrap();
        assert_eq!(config.template.as_deref(), Some("{{ artist }}-{{ title }}"));
        assert!(config.preserve_case);
        assert_eq!(config.defaults.entity.as_deref(), Some("LABEL"));
        assert_eq!(config.defaults.media_type, Some(MediaType::Video));
        assert!(config.convert.auto);
        assert_eq!(config.convert.max_size, 50 * 1024 * 1024);
        assert_eq!(config.archive.method, Method::Deflated);
        assert_eq!(config.archive.archive_name().unwrap().as_str(), "deliverables.zip");
    }

    #[rstest::rstest]
    #[case("[defaults]\nmedia_type = \"podcast\"")]
    #[case("[archive]\nmethod = \"lz4\"")]
    #[case("[archive]\nname = \"../escape\"")]
    #[case("template = \"  \"")]
    #[case("unknown_key = 1")]
    #[case("[defaults]\nasset_type = \"bogus\"")]
    #[case("[defaults]\nmedia_type = \"image\"\nasset_type = \"trailer\"")]
    fn test_invalid(#[case] toml: &str) {
        let err = from_toml(toml).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Config(_)));
    }

    #[test]
    fn test_layering() {
        Jail::expect_with(|jail| {
            jail.create_file("stamp.toml", "[defaults]\nentity = \"FROM CWD\"\nartist = \"CWD ARTIST\"")?;
            jail.create_file("override.yaml", "defaults:\n  artist: FROM EXPLICIT\n")?;
            jail.set_env("STAMP_CONVERT__AUTO", "true");
            jail.set_env("STAMP_ARCHIVE__METHOD", "deflate");

            let config = Config::load(Some(Path::new("override.yaml"))).unwrap();
            assert_eq!(config.defaults.entity.as_deref(), Some("FROM CWD"));
            assert_eq!(config.defaults.artist.as_deref(), Some("FROM EXPLICIT"));
            assert!(config.convert.auto);
            assert_eq!(config.archive.method, Method::Deflated);
            Ok(())
        });
    }

    #[test]
    fn test_config_path_variable_is_not_a_key() {
        Jail::expect_with(|jail| {
            jail.create_file("mine.toml", "[defaults]\nentity = \"MINE\"")?;
            jail.set_env("STAMP_CONFIG", "mine.toml");

            let config = Config::load(Some(Path::new("mine.toml"))).unwrap();
            assert_eq!(config.defaults.entity.as_deref(), Some("MINE"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        Jail::expect_with(|_| {
            let err = Config::load(Some(Path::new("missing.toml"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Config(_)));
            Ok(())
        });
    }
}
