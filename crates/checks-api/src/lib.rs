//! Gitea Checks API
//!
//! The generic, provider-agnostic description of a CI check that a build
//! hands over for publishing:
//! - [`ChecksDetails`]: name, status, conclusion, details URL, timestamps
//! - [`ChecksOutput`]: title, summary, text, annotations and images
//! - [`ChecksAction`]: user actions offered alongside the check
//!
//! Nothing here knows about a concrete provider; the mapping to Gitea lives
//! in `gitea-checks-core`.

pub mod details;
pub mod output;
pub mod status;

pub use details::{ChecksAction, ChecksDetails, ChecksDetailsBuilder};
pub use output::{
    AnnotationLevel, ChecksAnnotation, ChecksAnnotationBuilder, ChecksImage, ChecksOutput,
    ChecksOutputBuilder, TRUNCATION_MARKER,
};
pub use status::{ChecksConclusion, ChecksStatus};
