use crate::Method;
use crate::error::{Error, ErrorKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use zip::CompressionMethod;

impl FromStr for Method {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "store" | "stored" | "none" => Ok(Method::Stored),
            "deflate" | "deflated" | "gz" | "gzip" => Ok(Method::Deflated),
            #[cfg(feature = "bzip2")]
            "bz2" | "bzip2" => Ok(Method::Bzip2),
            #[cfg(not(feature = "bzip2"))]
            "bz2" | "bzip2" => exn::bail!(ErrorKind::DisabledMethod(s.to_string())),
            #[cfg(feature = "zstd")]
            "zst" | "zstd" => Ok(Method::Zstd),
            #[cfg(not(feature = "zstd"))]
            "zst" | "zstd" => exn::bail!(ErrorKind::DisabledMethod(s.to_string())),
            _ => exn::bail!(ErrorKind::UnsupportedMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for Method {
    type Error = ErrorKind;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(|e: Error| (*e).clone())
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl From<Method> for CompressionMethod {
    fn from(value: Method) -> Self {
        match value {
            Method::Stored => CompressionMethod::Stored,
            Method::Deflated => CompressionMethod::Deflated,
            #[cfg(feature = "bzip2")]
            Method::Bzip2 => CompressionMethod::Bzip2,
            #[cfg(feature = "zstd")]
            Method::Zstd => CompressionMethod::Zstd,
        }
    }
}

impl Method {
    /// Returns the short name for configuration (for displaying to user)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Stored => "store",
            Method::Deflated => "deflate",
            #[cfg(feature = "bzip2")]
            Method::Bzip2 => "bzip2",
            #[cfg(feature = "zstd")]
            Method::Zstd => "zstd",
        }
    }

    /// Every method compiled into this build.
    pub fn available() -> Vec<Method> {
        vec![
            Method::Stored,
            Method::Deflated,
            #[cfg(feature = "bzip2")]
            Method::Bzip2,
            #[cfg(feature = "zstd")]
            Method::Zstd,
        ]
    }
}

#[cfg(test)]
mod tests {
    use crate::Method;
    use rstest::rstest;
    use zip::CompressionMethod;

    #[rstest]
    #[case("store", Method::Stored)]
    #[case("none", Method::Stored)]
    #[case("STORED", Method::Stored)]
    #[case("deflate", Method::Deflated)]
    #[case("gz", Method::Deflated)]
    #[cfg_attr(feature = "bzip2", case("bz2", Method::Bzip2))]
    #[cfg_attr(feature = "bzip2", case("bzip2", Method::Bzip2))]
    #[cfg_attr(feature = "zstd", case("zst", Method::Zstd))]
    #[cfg_attr(feature = "zstd", case("zstd", Method::Zstd))]
    fn test_from_str(#[case] test: &str, #[case] expected: Method) {
        assert_eq!(test.parse::<Method>().unwrap(), expected);
    }

    #[rstest]
    #[case("invalid")]
    #[case("lz4")]
    #[case(" ")]
    fn test_from_str_invalid(#[case] test: &str) {
        assert!(test.parse::<Method>().is_err());
    }

    #[test]
    fn test_as_str_round_trips() {
        for method in Method::available() {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn test_zip_method() {
        assert_eq!(CompressionMethod::from(Method::Stored), CompressionMethod::Stored);
        assert_eq!(CompressionMethod::from(Method::Deflated), CompressionMethod::Deflated);
    }
}
