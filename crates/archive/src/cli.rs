//! Command-line handling of `--compress [METHOD]`.

use crate::Method;
use crate::error::Error;

/// How the archive method was chosen on the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Preference {
    /// `--compress <METHOD>`
    Explicit(Method),
    /// `--compress` with no method.
    Implicit,
    /// No `--compress` at all; the configured method applies.
    NotSpecified,
}
impl TryFrom<Option<Option<String>>> for Preference {
    type Error = Error;
    /// Takes the value clap produces for an optional-value flag.
    fn try_from(flag: Option<Option<String>>) -> Result<Self, Self::Error> {
        Ok(match flag.map(|value| value.filter(|v| !v.trim().is_empty())) {
            None => Self::NotSpecified,
            Some(None) => Self::Implicit,
            Some(Some(method)) => Self::Explicit(method.parse()?),
        })
    }
}
impl Preference {
    /// The method to bundle with, given the configured one.
    ///
    /// A bare `--compress` asks for compression, so it turns a configured
    /// [`Stored`](Method::Stored) into [`Deflated`](Method::Deflated).
    pub fn resolve(&self, configured: Method) -> Method {
        match *self {
            Self::Explicit(method) => method,
            Self::Implicit if configured == Method::Stored => Method::Deflated,
            Self::Implicit | Self::NotSpecified => configured,
        }
    }
}
