//! Naming conventions for media deliverables.
//!
//! A [`Convention`] holds the batch-wide fields (production stage, entity,
//! date, artist, ...), a [`Subject`] the per-file inputs, and a
//! [`NameGenerator`] combines the two into a standardized file name.

mod convention;
pub mod error;
mod generator;
mod options;
mod sanitize;
mod title;

pub use crate::convention::{Convention, DEFAULT_ENTITY, DEFAULT_PRODUCTION_STAGE, format_date, today};
pub use crate::generator::{NameGenerator, Subject};
pub use crate::options::{AssetType, LOCATIONS, MediaType};
pub use crate::sanitize::sanitize;
pub use crate::title::{extension, extract_title, replace_extension};
