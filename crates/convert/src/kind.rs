use stamp_naming::{extension, replace_extension};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Media formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Png,
    Jpeg,
    Wav,
    Mp3,
    M4a,
    Aac,
    Ogg,
    Webm,
    Other,
}
impl MediaKind {
    /// Detect the media kind from a file name's extension (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match extension(name).map(str::to_lowercase).as_deref() {
            Some("png") => MediaKind::Png,
            Some("jpg" | "jpeg") => MediaKind::Jpeg,
            Some("wav" | "wave") => MediaKind::Wav,
            Some("mp3") => MediaKind::Mp3,
            Some("m4a" | "mp4") => MediaKind::M4a,
            Some("aac") => MediaKind::Aac,
            Some("ogg" | "oga") => MediaKind::Ogg,
            Some("webm" | "weba") => MediaKind::Webm,
            _ => MediaKind::Other,
        }
    }

    /// The MIME type conventionally associated with this kind.
    #[must_use]
    pub fn mime(&self) -> &'static str {
        match self {
            MediaKind::Png => "image/png",
            MediaKind::Jpeg => "image/jpeg",
            MediaKind::Wav => "audio/wav",
            MediaKind::Mp3 => "audio/mpeg",
            MediaKind::M4a => "audio/mp4",
            MediaKind::Aac => "audio/aac",
            MediaKind::Ogg => "audio/ogg",
            MediaKind::Webm => "audio/webm",
            MediaKind::Other => "application/octet-stream",
        }
    }

    #[must_use]
    pub fn is_audio(&self) -> bool {
        self.mime().starts_with("audio/")
    }

    /// Compressed audio that converts to WAV.
    #[must_use]
    pub fn is_convertible_audio(&self) -> bool {
        matches!(self, MediaKind::Mp3 | MediaKind::M4a | MediaKind::Aac | MediaKind::Ogg | MediaKind::Webm)
    }

    /// What this kind converts into, if anything.
    #[must_use]
    pub fn target(&self) -> Option<Target> {
        match self {
            MediaKind::Png => Some(Target::Jpeg),
            kind if kind.is_convertible_audio() => Some(Target::Wav),
            _ => None,
        }
    }
}
impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.mime())
    }
}

/// The output format of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Jpeg,
    Wav,
}
impl Target {
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Target::Jpeg => "jpg",
            Target::Wav => "wav",
        }
    }

    #[must_use]
    pub fn mime(&self) -> &'static str {
        match self {
            Target::Jpeg => "image/jpeg",
            Target::Wav => "audio/wav",
        }
    }

    /// The file name a converted file is given.
    ///
    /// JPEG output only swaps a trailing `.png` (any case); names without one
    /// are left untouched. WAV output always replaces the final extension.
    #[must_use]
    pub fn rename(&self, name: &str) -> String {
        match self {
            Target::Jpeg => match name.len().checked_sub(4) {
                Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".png") => {
                    format!("{}.jpg", &name[..cut])
                },
                _ => name.to_string(),
            },
            Target::Wav => replace_extension(name, self.extension()),
        }
    }
}
