use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Deserialize;
use stamp_naming::{Convention, MediaType};

/// Naming-convention values that may or may not be set.
///
/// Used for configured defaults, manifest overrides and command-line
/// arguments alike; later layers are [merged](Fields::merge) over earlier ones
/// and the result is [applied](Fields::apply) to a [`Convention`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fields {
    pub production_stage: Option<String>,
    pub entity: Option<String>,
    pub include_date: Option<bool>,
    pub media_type: Option<MediaType>,
    pub asset_type: Option<String>,
    pub location: Option<String>,
    pub artist: Option<String>,
    pub title: Option<String>,
    pub creative1: Option<String>,
    pub creative2: Option<String>,
    pub uploader: Option<String>,
}
impl Fields {
    /// Overlay `other` on top of `self`: every value set in `other` wins.
    #[must_use]
    pub fn merge(self, other: Fields) -> Fields {
        Fields {
            production_stage: other.production_stage.or(self.production_stage),
            entity: other.entity.or(self.entity),
            include_date: other.include_date.or(self.include_date),
            media_type: other.media_type.or(self.media_type),
            asset_type: other.asset_type.or(self.asset_type),
            location: other.location.or(self.location),
            artist: other.artist.or(self.artist),
            title: other.title.or(self.title),
            creative1: other.creative1.or(self.creative1),
            creative2: other.creative2.or(self.creative2),
            uploader: other.uploader.or(self.uploader),
        }
    }

    /// Write every set value into `convention`.
    ///
    /// The media type is applied before the asset type, so an asset type is
    /// validated against the media type chosen in the same layer.
    pub fn apply(&self, convention: &mut Convention) -> Result<()> {
        let text = [
            (&self.production_stage, &mut convention.production_stage),
            (&self.entity, &mut convention.entity),
            (&self.location, &mut convention.location),
            (&self.artist, &mut convention.artist),
            (&self.title, &mut convention.title),
            (&self.creative1, &mut convention.creative1),
            (&self.creative2, &mut convention.creative2),
            (&self.uploader, &mut convention.uploader),
        ];
        for (value, field) in text {
            if let Some(value) = value {
                *field = value.trim().to_string();
            }
        }
        if let Some(include_date) = self.include_date {
            convention.include_date = include_date;
        }
        if let Some(media_type) = self.media_type {
            convention.set_media_type(media_type);
        }
        if let Some(asset_type) = &self.asset_type {
            convention.set_asset_type(asset_type).or_raise(|| ErrorKind::Field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_values() {
        let base = Fields { entity: Some("PRAIRY".to_string()), artist: Some("BASE".to_string()), ..Default::default() };
        let overlay = Fields { artist: Some("NOVA LANE".to_string()), ..Default::default() };
        let merged = base.merge(overlay);
        assert_eq!(merged.entity.as_deref(), Some("PRAIRY"));
        assert_eq!(merged.artist.as_deref(), Some("NOVA LANE"));
        assert_eq!(merged.title, None);
    }

    #[test]
    fn test_apply() {
        let fields = Fields {
            production_stage: Some("DRAFT".to_string()),
            include_date: Some(false),
            media_type: Some(MediaType::Video),
            asset_type: Some("music video".to_string()),
            artist: Some("  Nova Lane ".to_string()),
            ..Default::default()
        };
        let mut convention = Convention::default();
        fields.apply(&mut convention).unwrap();
        assert_eq!(convention.production_stage, "DRAFT");
        assert_eq!(convention.entity, "PRAIRY");
        assert!(!convention.include_date);
        assert_eq!(convention.media_type(), MediaType::Video);
        assert_eq!(convention.asset_type().as_str(), "MUSIC VIDEO");
        assert_eq!(convention.artist, "Nova Lane");
    }

    #[test]
    fn test_apply_media_type_resets_asset_type() {
        let mut convention = Convention::default();
        Fields { media_type: Some(MediaType::Image), ..Default::default() }.apply(&mut convention).unwrap();
        assert_eq!(convention.asset_type().as_str(), "COVER ART");
    }

    #[test]
    fn test_apply_rejects_foreign_asset_type() {
        let fields = Fields { asset_type: Some("COVER ART".to_string()), ..Default::default() };
        let err = fields.apply(&mut Convention::default()).unwrap_err();
        assert_eq!(*err, ErrorKind::Field);
    }
}
