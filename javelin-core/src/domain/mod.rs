//! Shared migration vocabulary
//!
//! Types every other crate speaks in: the Java version scale, the catalog of
//! conversion types a job can request, and issue severities.

pub mod conversion;
pub mod severity;
pub mod version;

pub use conversion::{ConversionType, ConversionTypeInfo, UnknownConversionType};
pub use severity::Severity;
pub use version::{
    JavaVersionOption, MAX_SUPPORTED_VERSION, MIN_SUPPORTED_VERSION, VersionParseError,
    is_lts, java_version_catalog, parse_java_version,
};
