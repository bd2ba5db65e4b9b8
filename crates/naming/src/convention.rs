use crate::options::{AssetType, MediaType};
use time::{Date, OffsetDateTime};

pub const DEFAULT_PRODUCTION_STAGE: &str = "FINAL";
pub const DEFAULT_ENTITY: &str = "PRAIRY";

/// The naming-convention fields shared by every file in a batch.
///
/// Empty strings mean "not set" and are left out of generated names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convention {
    pub production_stage: String,
    pub entity: String,
    pub include_date: bool,
    pub date: Date,
    pub location: String,
    pub artist: String,
    /// Batch-wide title. When set it overrides every per-file title.
    pub title: String,
    media_type: MediaType,
    asset_type: AssetType,
    pub creative1: String,
    pub creative2: String,
    pub uploader: String,
}
impl Default for Convention {
    fn default() -> Self {
        let media_type = MediaType::default();
        Self {
            production_stage: DEFAULT_PRODUCTION_STAGE.to_string(),
            entity: DEFAULT_ENTITY.to_string(),
            include_date: true,
            date: today(),
            location: String::new(),
            artist: String::new(),
            title: String::new(),
            media_type,
            asset_type: media_type.default_asset_type(),
            creative1: String::new(),
            creative2: String::new(),
            uploader: String::new(),
        }
    }
}
impl Convention {
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    /// Switches media type, resetting the asset type to that media type's default.
    pub fn set_media_type(&mut self, media_type: MediaType) {
        self.media_type = media_type;
        self.asset_type = media_type.default_asset_type();
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.set_media_type(media_type);
        self
    }

    /// Sets the asset type by name, validated against the current media type.
    pub fn set_asset_type(&mut self, name: &str) -> crate::error::Result<()> {
        self.asset_type = AssetType::new(self.media_type, name)?;
        Ok(())
    }
}

/// Today's date in the local timezone, falling back to UTC when the local
/// offset can't be determined (e.g. multi-threaded processes on some Unixes).
pub fn today() -> Date {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()).date()
}

/// Formats a date as `MMDDYYYY`.
pub fn format_date(date: Date) -> String {
    format!("{:02}{:02}{:04}", u8::from(date.month()), date.day(), date.year())
}
