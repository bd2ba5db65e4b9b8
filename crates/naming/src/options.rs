//! Fixed option lists offered for the naming fields.

use crate::error::{Error, ErrorKind, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Suggested locations, alphabetical. Free-text locations are also accepted.
pub const LOCATIONS: [&str; 27] = [
    "ATLANTA",
    "AUSTIN",
    "BOSTON",
    "CALGARY",
    "CHICAGO",
    "DALLAS",
    "DENVER",
    "DETROIT",
    "HOUSTON",
    "LAS VEGAS",
    "LOS ANGELES",
    "MIAMI",
    "MINNEAPOLIS",
    "MONTREAL",
    "NASHVILLE",
    "NEW ORLEANS",
    "NEW YORK",
    "PHILADELPHIA",
    "PHOENIX",
    "PORTLAND",
    "SAN DIEGO",
    "SAN FRANCISCO",
    "SEATTLE",
    "ST. LOUIS",
    "TORONTO",
    "VANCOUVER",
    "WASHINGTON DC",
];

const AUDIO_ASSETS: &[&str] = &["TRACK", "INSTRUMENTAL"];
const VIDEO_ASSETS: &[&str] = &[
    "APPLE MOTION",
    "CONTENT",
    "LYRIC VIDEO",
    "MUSIC VIDEO",
    "SPOTIFY CANVAS",
    "TRAILER",
    "VISUALIZER",
];
const IMAGE_ASSETS: &[&str] = &["COVER ART", "PRESS PHOTO"];

/// The kind of deliverable being named. Selects which asset types are offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum MediaType {
    #[default]
    Audio,
    Video,
    Image,
}
impl MediaType {
    pub const ALL: [MediaType; 3] = [MediaType::Audio, MediaType::Video, MediaType::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Audio => "audio",
            MediaType::Video => "video",
            MediaType::Image => "image",
        }
    }

    /// Asset types available for this media type. The first entry is the default.
    pub fn asset_types(&self) -> &'static [&'static str] {
        match self {
            MediaType::Audio => AUDIO_ASSETS,
            MediaType::Video => VIDEO_ASSETS,
            MediaType::Image => IMAGE_ASSETS,
        }
    }

    pub fn default_asset_type(&self) -> AssetType {
        AssetType(self.asset_types()[0])
    }
}
impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
impl FromStr for MediaType {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "audio" => Ok(MediaType::Audio),
            "video" => Ok(MediaType::Video),
            "image" => Ok(MediaType::Image),
            _ => exn::bail!(ErrorKind::UnknownMediaType(s.to_string())),
        }
    }
}
impl TryFrom<String> for MediaType {
    type Error = ErrorKind;
    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse().map_err(|e: Error| (*e).clone())
    }
}

/// An asset type drawn from the option list of a [`MediaType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetType(&'static str);
impl AssetType {
    /// Looks up `name` (case-insensitive, surrounding whitespace ignored) among
    /// the asset types offered for `media`.
    pub fn new(media: MediaType, name: &str) -> Result<Self> {
        let wanted = name.trim().to_uppercase();
        match media.asset_types().iter().find(|candidate| **candidate == wanted) {
            Some(found) => Ok(AssetType(found)),
            None => exn::bail!(ErrorKind::UnknownAssetType { asset: name.to_string(), media: media.as_str() }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}
impl Display for AssetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
