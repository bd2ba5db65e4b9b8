//! CLI Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

/// What the command was doing when it failed.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration or manifest could not be loaded.
    #[display("could not load configuration")]
    Config,
    /// A command-line value was rejected.
    #[display("invalid argument: {_0}")]
    Argument(#[error(not(source))] String),
    /// Naming fields or template could not be applied.
    #[display("naming failed")]
    Naming,
    /// A batch operation failed.
    #[display("batch operation failed")]
    Batch,
    /// An output file could not be written.
    #[display("could not write output")]
    Io,
}
