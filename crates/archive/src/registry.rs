use crate::error::{ErrorKind, Result};
use std::collections::HashMap;

/// Highest numeric suffix tried before giving up on a name.
const MAX_SUFFIX: usize = 100;

/// The outcome of claiming a name in a [`Registry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// The requested name was free.
    Fresh(String),
    /// The requested name was taken by different content; a suffixed name was
    /// assigned instead.
    Renamed { requested: String, assigned: String },
    /// Identical content was already registered under this name.
    Duplicate(String),
}
impl Claim {
    /// The name to write under, or `None` for a duplicate.
    pub fn name(&self) -> Option<&str> {
        match self {
            Claim::Fresh(name) | Claim::Renamed { assigned: name, .. } => Some(name),
            Claim::Duplicate(_) => None,
        }
    }
}

/// Keeps output names unique, keyed by content hash.
///
/// Shared by ZIP bundling and directory export so both follow the same
/// collision rules.
#[derive(Debug, Default)]
pub struct Registry {
    names: HashMap<String, blake3::Hash>,
}
impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Reserve `name` for `data`.
    ///
    /// Taken names get a `-2`, `-3`, ... suffix before the extension, unless
    /// one of the existing candidates already holds identical content.
    pub fn claim(&mut self, name: &str, data: &[u8]) -> Result<Claim> {
        let hash = blake3::hash(data);
        match self.names.get(name) {
            None => {
                self.names.insert(name.to_string(), hash);
                return Ok(Claim::Fresh(name.to_string()));
            },
            Some(existing) if *existing == hash => return Ok(Claim::Duplicate(name.to_string())),
            Some(_) => {},
        }
        for n in 2..=MAX_SUFFIX {
            let candidate = with_suffix(name, n);
            match self.names.get(&candidate) {
                None => {
                    tracing::debug!(requested = name, assigned = %candidate, "Entry name taken; renamed");
                    self.names.insert(candidate.clone(), hash);
                    return Ok(Claim::Renamed { requested: name.to_string(), assigned: candidate });
                },
                Some(existing) if *existing == hash => return Ok(Claim::Duplicate(candidate)),
                Some(_) => {},
            }
        }
        exn::bail!(ErrorKind::Conflict(name.to_string()));
    }
}

/// `NAME.EXT` becomes `NAME-n.EXT`; names without an extension get `-n` appended.
fn with_suffix(name: &str, n: usize) -> String {
    match stamp_naming::extension(name) {
        Some(ext) => {
            let stem = &name[..name.len() - ext.len() - 1];
            format!("{stem}-{n}.{ext}")
        },
        None => format!("{name}-{n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("A.WAV", 2, "A-2.WAV")]
    #[case("A.B.WAV", 3, "A.B-3.WAV")]
    #[case("NOEXT", 2, "NOEXT-2")]
    fn test_with_suffix(#[case] name: &str, #[case] n: usize, #[case] expected: &str) {
        assert_eq!(with_suffix(name, n), expected);
    }

    #[test]
    fn test_claim_fresh_then_renamed() {
        let mut registry = Registry::new();
        assert_eq!(registry.claim("A.WAV", b"one").unwrap(), Claim::Fresh("A.WAV".to_string()));
        assert_eq!(
            registry.claim("A.WAV", b"two").unwrap(),
            Claim::Renamed { requested: "A.WAV".to_string(), assigned: "A-2.WAV".to_string() }
        );
        assert_eq!(
            registry.claim("A.WAV", b"three").unwrap(),
            Claim::Renamed { requested: "A.WAV".to_string(), assigned: "A-3.WAV".to_string() }
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_claim_duplicate() {
        let mut registry = Registry::new();
        registry.claim("A.WAV", b"one").unwrap();
        registry.claim("A.WAV", b"two").unwrap();
        assert_eq!(registry.claim("A.WAV", b"one").unwrap(), Claim::Duplicate("A.WAV".to_string()));
        assert_eq!(registry.claim("A.WAV", b"two").unwrap(), Claim::Duplicate("A-2.WAV".to_string()));
        assert_eq!(registry.len(), 2);
        assert_eq!(Claim::Duplicate("A.WAV".to_string()).name(), None);
    }

    #[test]
    fn test_claim_conflict() {
        let mut registry = Registry::new();
        for i in 0..MAX_SUFFIX {
            registry.claim("A.WAV", i.to_string().as_bytes()).unwrap();
        }
        let err = registry.claim("A.WAV", b"one too many").unwrap_err();
        assert_eq!(*err, ErrorKind::Conflict("A.WAV".to_string()));
    }
}
