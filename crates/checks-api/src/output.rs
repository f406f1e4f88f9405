//! Check output: summary text, annotations and images.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Appended to a summary that had to be cut to fit a provider limit.
pub const TRUNCATION_MARKER: &str = "...";

/// Severity of an annotation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationLevel {
    #[default]
    None,
    Notice,
    Warning,
    Failure,
}

impl fmt::Display for AnnotationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnnotationLevel::None => "NONE",
            AnnotationLevel::Notice => "NOTICE",
            AnnotationLevel::Warning => "WARNING",
            AnnotationLevel::Failure => "FAILURE",
        };
        f.write_str(name)
    }
}

/// A message attached to a file location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecksAnnotation {
    pub path: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub start_column: Option<u32>,
    pub end_column: Option<u32>,
    #[serde(default)]
    pub annotation_level: AnnotationLevel,
    pub message: Option<String>,
    pub title: Option<String>,
    pub raw_details: Option<String>,
}

impl ChecksAnnotation {
    pub fn builder() -> ChecksAnnotationBuilder {
        ChecksAnnotationBuilder::default()
    }
}

impl fmt::Display for ChecksAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChecksAnnotation{{path={}, start_line={}, end_line={}, start_column={}, end_column={}, \
             annotation_level={}, message={}, title={}, raw_details={}}}",
            quoted(&self.path),
            number(self.start_line),
            number(self.end_line),
            number(self.start_column),
            number(self.end_column),
            self.annotation_level,
            quoted(&self.message),
            quoted(&self.title),
            quoted(&self.raw_details),
        )
    }
}

/// Builder for [`ChecksAnnotation`].
#[derive(Debug, Clone, Default)]
pub struct ChecksAnnotationBuilder {
    annotation: ChecksAnnotation,
}

impl ChecksAnnotationBuilder {
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.annotation.path = Some(path.into());
        self
    }

    /// Set start and end line to the same line.
    pub fn line(mut self, line: u32) -> Self {
        self.annotation.start_line = Some(line);
        self.annotation.end_line = Some(line);
        self
    }

    pub fn start_line(mut self, line: u32) -> Self {
        self.annotation.start_line = Some(line);
        self
    }

    pub fn end_line(mut self, line: u32) -> Self {
        self.annotation.end_line = Some(line);
        self
    }

    pub fn start_column(mut self, column: u32) -> Self {
        self.annotation.start_column = Some(column);
        self
    }

    pub fn end_column(mut self, column: u32) -> Self {
        self.annotation.end_column = Some(column);
        self
    }

    pub fn annotation_level(mut self, level: AnnotationLevel) -> Self {
        self.annotation.annotation_level = level;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.annotation.message = Some(message.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.annotation.title = Some(title.into());
        self
    }

    pub fn raw_details(mut self, raw_details: impl Into<String>) -> Self {
        self.annotation.raw_details = Some(raw_details.into());
        self
    }

    pub fn build(self) -> ChecksAnnotation {
        self.annotation
    }
}

/// An image rendered with the check output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecksImage {
    pub alt: String,
    pub image_url: String,
    pub caption: Option<String>,
}

impl ChecksImage {
    pub fn new(alt: impl Into<String>, image_url: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            alt: alt.into(),
            image_url: image_url.into(),
            caption,
        }
    }
}

impl fmt::Display for ChecksImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChecksImage{{alt='{}', image_url='{}', caption={}}}",
            self.alt,
            self.image_url,
            quoted(&self.caption)
        )
    }
}

/// Rich output of a check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecksOutput {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub annotations: Vec<ChecksAnnotation>,
    #[serde(default)]
    pub images: Vec<ChecksImage>,
}

impl ChecksOutput {
    pub fn builder() -> ChecksOutputBuilder {
        ChecksOutputBuilder::default()
    }

    /// Return the summary cut to at most `max_chars` characters.
    ///
    /// When the summary is longer, its tail is replaced with
    /// [`TRUNCATION_MARKER`] so the result still fits the limit.
    pub fn summary_truncated(&self, max_chars: usize) -> Option<String> {
        self.summary
            .as_deref()
            .map(|summary| truncate_chars(summary, max_chars))
    }
}

impl fmt::Display for ChecksOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChecksOutput{{title={}, summary={}, text={}, annotations=[{}], images=[{}]}}",
            quoted(&self.title),
            quoted(&self.summary),
            quoted(&self.text),
            join(&self.annotations),
            join(&self.images),
        )
    }
}

/// Builder for [`ChecksOutput`].
#[derive(Debug, Clone, Default)]
pub struct ChecksOutputBuilder {
    output: ChecksOutput,
}

impl ChecksOutputBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.output.title = Some(title.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.output.summary = Some(summary.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.output.text = Some(text.into());
        self
    }

    pub fn annotations(mut self, annotations: Vec<ChecksAnnotation>) -> Self {
        self.output.annotations = annotations;
        self
    }

    pub fn add_annotation(mut self, annotation: ChecksAnnotation) -> Self {
        self.output.annotations.push(annotation);
        self
    }

    pub fn images(mut self, images: Vec<ChecksImage>) -> Self {
        self.output.images = images;
        self
    }

    pub fn build(self) -> ChecksOutput {
        self.output
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    if max_chars <= marker_len {
        return value.chars().take(max_chars).collect();
    }

    let mut truncated: String = value.chars().take(max_chars - marker_len).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

pub(crate) fn quoted(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("'{v}'"),
        None => "none".to_string(),
    }
}

fn number(value: Option<u32>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

pub(crate) fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_truncated_keeps_short_summary() {
        let output = ChecksOutput::builder().summary("all good").build();
        assert_eq!(output.summary_truncated(256).as_deref(), Some("all good"));
    }

    #[test]
    fn test_summary_truncated_cuts_long_summary_to_limit() {
        let output = ChecksOutput::builder().summary("x".repeat(300)).build();
        let summary = output.summary_truncated(256).unwrap();

        assert_eq!(summary.chars().count(), 256);
        assert!(summary.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_summary_truncated_respects_char_boundaries() {
        let output = ChecksOutput::builder().summary("ü".repeat(20)).build();
        let summary = output.summary_truncated(10).unwrap();

        assert_eq!(summary.chars().count(), 10);
        assert!(summary.starts_with("üüüüüüü"));
    }

    #[test]
    fn test_summary_truncated_absent_without_summary() {
        let output = ChecksOutput::builder().title("only a title").build();
        assert!(output.summary_truncated(256).is_none());
    }

    #[test]
    fn test_line_sets_start_and_end() {
        let annotation = ChecksAnnotation::builder().path("Jenkinsfile").line(3).build();
        assert_eq!(annotation.start_line, Some(3));
        assert_eq!(annotation.end_line, Some(3));
    }

    #[test]
    fn test_annotation_display_lists_all_fields() {
        let annotation = ChecksAnnotation::builder()
            .path("Jenkinsfile")
            .start_line(1)
            .end_line(2)
            .start_column(0)
            .end_column(20)
            .annotation_level(AnnotationLevel::Warning)
            .message("say hello to Jenkins")
            .build();

        let rendered = annotation.to_string();
        assert!(rendered.contains("path='Jenkinsfile'"));
        assert!(rendered.contains("start_line=1"));
        assert!(rendered.contains("end_line=2"));
        assert!(rendered.contains("start_column=0"));
        assert!(rendered.contains("end_column=20"));
        assert!(rendered.contains("annotation_level=WARNING"));
        assert!(rendered.contains("message='say hello to Jenkins'"));
        assert!(rendered.contains("title=none"));
    }
}
