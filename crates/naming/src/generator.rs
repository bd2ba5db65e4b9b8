//! Filename generation for batch files.
//!
//! Converts a [`Convention`] plus per-file [`Subject`] data into a
//! deterministic file name. By default names follow the house layout: the
//! non-empty fields joined with hyphens, the 1-based position appended, the
//! original extension kept, everything uppercased:
//!
//! ```text
//! STAGE-ENTITY-MMDDYYYY-LOCATION-ARTIST-TITLE-ASSET-CREATIVE1-CREATIVE2-UPLOADER-ID.EXT
//! ```
//!
//! A custom [upon] template can replace the layout. The template syntax follows
//! upon's Mustache-like conventions (`{{ variable }}`, `{{ value|formatter }}`),
//! extended with:
//!
//! - **`slug`**: converts strings to URL-safe slugs, stripping quotation marks
//!   first to avoid artifacts like leading/trailing hyphens.
//! - **`upper`**: uppercases a string.
//! - **`truncate`**: keeps the first `n` characters of a string, usable as
//!   either `truncate(value, n)` or `{{ value|truncate: n }}`.
//!
//! # Template Variables
//!
//! | Variable      | Type     | Description                                   |
//! |---------------|----------|-----------------------------------------------|
//! | `stage`       | `String` | Production stage (e.g. `FINAL`)               |
//! | `entity`      | `String` | Owning entity                                 |
//! | `date`        | `String` | `MMDDYYYY`, empty when dates are disabled     |
//! | `location`    | `String` | Location, possibly empty                      |
//! | `artist`      | `String` | Artist                                        |
//! | `title`       | `String` | Resolved title for this file                  |
//! | `media`       | `String` | `audio`, `video` or `image`                   |
//! | `asset`       | `String` | Asset type (e.g. `COVER ART`)                 |
//! | `creative1`   | `String` | First creative credit                         |
//! | `creative2`   | `String` | Second creative credit                        |
//! | `uploader`    | `String` | Uploader                                      |
//! | `id`          | `u64`    | 1-based position of the file in the batch     |
//! | `ext`         | `String` | Original extension, empty when there is none  |
//! | `original`    | `String` | Original file name                            |
//!
//! # Example
//!
//! ```
//! use stamp_naming::{Convention, NameGenerator, Subject};
//! use time::{Date, Month};
//!
//! let mut convention = Convention::default();
//! convention.date = Date::from_calendar_date(2024, Month::March, 7).unwrap();
//! convention.artist = "Nova".into();
//!
//! let subject = Subject::new(0, "night drive.mp3");
//! let name = NameGenerator::default().generate(&convention, &subject).unwrap();
//! assert_eq!(name, "FINAL-PRAIRY-03072024-NOVA-NIGHT DRIVE-TRACK-1.MP3");
//!
//! let custom: NameGenerator = "{{ artist|slug }}_{{ id }}.{{ ext }}".parse().unwrap();
//! assert_eq!(custom.generate(&convention, &subject).unwrap(), "NOVA_1.MP3");
//! ```

use crate::convention::{Convention, format_date};
use crate::error::{Error, ErrorKind, Result};
use crate::sanitize::{clean_part, sanitize};
use crate::title::{extension, extract_title};
use exn::ResultExt;
use std::str::FromStr;
use tracing::instrument;
use upon::{Engine, Template};

/// Per-file inputs to name generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject<'a> {
    /// 0-based position in the batch.
    pub position: usize,
    /// The current file name (after any conversion).
    pub file_name: &'a str,
    pub custom_title: Option<&'a str>,
    /// Title guessed from the name the file was added with.
    pub original_title: Option<&'a str>,
}
impl<'a> Subject<'a> {
    /// A subject whose original title is guessed from `file_name`. Prefer
    /// setting [`original_title`](Self::original_title) explicitly when the
    /// file has been renamed by a conversion since it was added.
    pub fn new(position: usize, file_name: &'a str) -> Self {
        Self { position, file_name, custom_title: None, original_title: None }
    }

    pub fn with_custom_title(mut self, title: impl Into<Option<&'a str>>) -> Self {
        self.custom_title = title.into().filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_original_title(mut self, title: impl Into<Option<&'a str>>) -> Self {
        self.original_title = title.into();
        self
    }

    /// Batch title, then custom title, then original title.
    fn resolve_title(&self, convention: &Convention) -> String {
        if !convention.title.trim().is_empty() {
            return convention.title.clone();
        }
        if let Some(custom) = self.custom_title {
            return custom.to_string();
        }
        match self.original_title {
            Some(original) => original.to_string(),
            None => extract_title(self.file_name),
        }
    }
}

enum Layout {
    Convention,
    Template { engine: Engine<'static>, template: Template<'static> },
}

/// Generates deterministic file names from a [`Convention`] and a [`Subject`].
///
/// [`Default`] uses the built-in layout. [`FromStr`] compiles a custom
/// template eagerly so that syntax errors surface at creation time rather
/// than at render time.
///
/// Every generated name is validated by [`sanitize`](crate::sanitize), so it
/// is always a single path segment.
pub struct NameGenerator {
    layout: Layout,
    preserve_case: bool,
}
impl Default for NameGenerator {
    fn default() -> Self {
        Self { layout: Layout::Convention, preserve_case: false }
    }
}
impl FromStr for NameGenerator {
    type Err = Error;

    /// Compiles the given template string into a reusable [`NameGenerator`].
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        // Compile the template early so we can fail-fast in construction.
        let template = engine.compile(s.to_string()).or_raise(|| ErrorKind::Template)?;
        Ok(Self { layout: Layout::Template { engine, template }, preserve_case: false })
    }
}
impl NameGenerator {
    /// Uses `template` when given, the built-in layout otherwise.
    pub fn new(template: Option<&str>) -> Result<Self> {
        match template.map(str::trim).filter(|t| !t.is_empty()) {
            Some(template) => template.parse(),
            None => Ok(Self::default()),
        }
    }

    /// Keeps the case produced by the template instead of uppercasing it.
    pub fn preserve_case(mut self, preserve: bool) -> Self {
        self.preserve_case = preserve;
        self
    }

    #[instrument(skip_all, fields(position = subject.position, file = subject.file_name))]
    pub fn generate(&self, convention: &Convention, subject: &Subject<'_>) -> Result<String> {
        let name = match &self.layout {
            Layout::Convention => Self::layout(convention, subject),
            Layout::Template { engine, template } => template
                .render(engine, Self::parameters(convention, subject))
                .to_string()
                .or_raise(|| ErrorKind::Template)?,
        };
        let name = if self.preserve_case { name } else { name.to_uppercase() };
        sanitize(name)
    }

    /// The built-in layout: non-empty parts joined with `-`, then the extension.
    fn layout(convention: &Convention, subject: &Subject<'_>) -> String {
        let date = convention.include_date.then(|| format_date(convention.date));
        let parts = [
            Some(convention.production_stage.clone()),
            Some(convention.entity.clone()),
            date,
            Some(convention.location.clone()),
            Some(convention.artist.clone()),
            Some(subject.resolve_title(convention)),
            Some(convention.asset_type().to_string()),
            Some(convention.creative1.clone()),
            Some(convention.creative2.clone()),
            Some(convention.uploader.clone()),
            Some((subject.position + 1).to_string()),
        ];
        let stem = parts
            .into_iter()
            .flatten()
            .map(|part| clean_part(&part))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        match extension(subject.file_name) {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        }
    }

    /// Builds the [`upon::Value`] map exposed to the template engine.
    fn parameters(convention: &Convention, subject: &Subject<'_>) -> upon::Value {
        let date = match convention.include_date {
            true => format_date(convention.date),
            false => String::new(),
        };
        upon::value! {
            stage: clean_part(&convention.production_stage),
            entity: clean_part(&convention.entity),
            date: date,
            location: clean_part(&convention.location),
            artist: clean_part(&convention.artist),
            title: clean_part(&subject.resolve_title(convention)),
            media: convention.media_type().as_str(),
            asset: convention.asset_type().as_str(),
            creative1: clean_part(&convention.creative1),
            creative2: clean_part(&convention.creative2),
            uploader: clean_part(&convention.uploader),
            id: (subject.position as u64) + 1,
            ext: extension(subject.file_name).unwrap_or_default(),
            original: subject.file_name,
        }
    }
}

/// Template formatters and functions that keep names filename-friendly.
mod addons {
    use rslug::slugify;
    use upon::{Engine, Value, fmt as upon_fmt};

    /// Straight, curly and angled quotes. `"Club Mix"` would otherwise slug
    /// to `-club-mix-`.
    fn is_quote_mark(c: char) -> bool {
        matches!(c, '\'' | '"' | '`' | '\u{2018}'..='\u{201F}' | '\u{00AB}' | '\u{00BB}' | '\u{2039}' | '\u{203A}')
    }

    fn slug(s: &str) -> String {
        let unquoted: String = s.chars().filter(|&c| !is_quote_mark(c)).collect();
        slugify!(&unquoted)
    }

    /// Applies `transform` to strings; other values render as usual.
    fn on_strings(
        transform: fn(&str) -> String,
    ) -> impl Fn(&mut upon_fmt::Formatter<'_>, &Value) -> upon_fmt::Result + Send + Sync + 'static {
        move |f, value| match value {
            Value::String(s) => upon_fmt::default(f, &Value::String(transform(s))),
            other => upon_fmt::default(f, other),
        }
    }

    /// The first `max_chars` characters of `s`.
    fn truncate(s: &str, max_chars: usize) -> String {
        s.chars().take(max_chars).collect()
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("slug", on_strings(slug));
        engine.add_formatter("upper", on_strings(str::to_uppercase));
        engine.add_function("truncate", truncate);
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MediaType;
    use time::macros::date;

    fn make_convention() -> Convention {
        let mut convention = Convention::default();
        convention.date = date!(2024 - 06 - 15);
        convention.artist = "Nova Lane".to_string();
        convention
    }

    #[test]
    fn test_generates_default_layout() {
        let convention = make_convention();
        let subject = Subject::new(0, "01 - Night_Drive (Club Mix).mp3");
        let name = NameGenerator::default().generate(&convention, &subject).unwrap();
        assert_eq!(name, "FINAL-PRAIRY-06152024-NOVA LANE-NIGHT DRIVE-TRACK-1.MP3");
    }

    #[test]
    fn test_includes_every_field_in_order() {
        let mut convention = make_convention();
        convention.location = "Los Angeles".to_string();
        convention.title = "Sunrise".to_string();
        convention.creative1 = "dp one".to_string();
        convention.creative2 = "editor".to_string();
        convention.uploader = "sam".to_string();
        convention.set_media_type(MediaType::Video);
        convention.set_asset_type("music video").unwrap();
        let subject = Subject::new(4, "clip.mov");
        let name = NameGenerator::default().generate(&convention, &subject).unwrap();
        assert_eq!(name, "FINAL-PRAIRY-06152024-LOS ANGELES-NOVA LANE-SUNRISE-MUSIC VIDEO-DP ONE-EDITOR-SAM-5.MOV");
    }

    #[test]
    fn test_omits_date_when_disabled() {
        let mut convention = make_convention();
        convention.include_date = false;
        let subject = Subject::new(1, "a.wav");
        let name = NameGenerator::default().generate(&convention, &subject).unwrap();
        assert_eq!(name, "FINAL-PRAIRY-NOVA LANE-A-TRACK-2.WAV");
    }

    #[test]
    fn test_title_precedence() {
        let mut convention = make_convention();
        let subject = Subject::new(0, "guess me.wav").with_custom_title("Custom").with_original_title("ORIGINAL");
        let generator = NameGenerator::default();
        assert!(generator.generate(&convention, &subject).unwrap().contains("-CUSTOM-"));

        let subject = Subject::new(0, "guess me.wav").with_original_title("ORIGINAL");
        assert!(generator.generate(&convention, &subject).unwrap().contains("-ORIGINAL-"));

        let subject = Subject::new(0, "guess me.wav").with_custom_title("   ");
        assert!(generator.generate(&convention, &subject).unwrap().contains("-GUESS ME-"));

        convention.title = "Batch".to_string();
        let subject = Subject::new(0, "guess me.wav").with_custom_title("Custom");
        assert!(generator.generate(&convention, &subject).unwrap().contains("-BATCH-"));
    }

    #[test]
    fn test_skips_empty_parts() {
        let mut convention = make_convention();
        convention.production_stage = String::new();
        convention.entity = "  ".to_string();
        convention.include_date = false;
        convention.artist = String::new();
        let subject = Subject::new(2, "123.wav");
        let name = NameGenerator::default().generate(&convention, &subject).unwrap();
        assert_eq!(name, "TRACK-3.WAV");
    }

    #[test]
    fn test_name_without_extension() {
        let convention = make_convention();
        let subject = Subject::new(0, "README");
        let name = NameGenerator::default().generate(&convention, &subject).unwrap();
        assert_eq!(name, "FINAL-PRAIRY-06152024-NOVA LANE-TRACK-1");
    }

    #[test]
    fn test_separators_in_fields_are_replaced() {
        let mut convention = make_convention();
        convention.artist = "AC/DC".to_string();
        let subject = Subject::new(0, "x.wav").with_custom_title("Back\\Black");
        let name = NameGenerator::default().generate(&convention, &subject).unwrap();
        assert_eq!(name, "FINAL-PRAIRY-06152024-AC-DC-BACK-BLACK-TRACK-1.WAV");
    }

    #[test]
    fn test_is_deterministic() {
        let convention = make_convention();
        let subject = Subject::new(7, "same.wav");
        let generator = NameGenerator::default();
        assert_eq!(
            generator.generate(&convention, &subject).unwrap(),
            generator.generate(&convention, &subject).unwrap()
        );
    }

    #[test]
    fn test_template_layout() {
        let convention = make_convention();
        let subject = Subject::new(0, "night drive.mp3");
        let generator: NameGenerator = "{{ artist|slug }}_{{ title|slug }}_{{ id }}.{{ ext }}".parse().unwrap();
        assert_eq!(generator.generate(&convention, &subject).unwrap(), "NOVA-LANE_NIGHT-DRIVE_1.MP3");
    }

    #[test]
    fn test_template_preserve_case() {
        let convention = make_convention();
        let subject = Subject::new(0, "night drive.mp3");
        let generator = "{{ artist|slug }}-{{ asset }}.{{ ext }}".parse::<NameGenerator>().unwrap().preserve_case(true);
        assert_eq!(generator.generate(&convention, &subject).unwrap(), "nova-lane-TRACK.mp3");
    }

    #[test]
    fn test_template_truncate() {
        let convention = make_convention();
        let subject = Subject::new(0, "a.wav").with_custom_title("A Very Long Title Indeed");
        let generator: NameGenerator = "{{ title|truncate: 10|slug }}".parse().unwrap();
        assert_eq!(generator.generate(&convention, &subject).unwrap(), "A-VERY-LON");
    }

    #[test]
    fn test_template_upper_formatter() {
        let convention = make_convention();
        let subject = Subject::new(0, "a.wav");
        let generator = "{{ media|upper }}-{{ id }}".parse::<NameGenerator>().unwrap().preserve_case(true);
        assert_eq!(generator.generate(&convention, &subject).unwrap(), "AUDIO-1");
    }

    #[test]
    fn test_template_syntax_error_fails_early() {
        assert!("{{ artist".parse::<NameGenerator>().is_err());
    }

    #[test]
    fn test_template_rejects_path_output() {
        let convention = make_convention();
        let subject = Subject::new(0, "a.wav");
        let generator: NameGenerator = "{{ stage }}/{{ id }}".parse().unwrap();
        assert!(generator.generate(&convention, &subject).is_err());
    }

    #[test]
    fn test_empty_template_uses_layout() {
        let convention = make_convention();
        let subject = Subject::new(0, "a.wav");
        let generator = NameGenerator::new(Some("  ")).unwrap();
        assert_eq!(generator.generate(&convention, &subject).unwrap(), "FINAL-PRAIRY-06152024-NOVA LANE-A-TRACK-1.WAV");
    }
}
