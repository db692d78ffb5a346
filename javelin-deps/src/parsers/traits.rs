//! Traits for build manifest parsers

use crate::domain::{BuildTool, ParsedManifest};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },
}

/// Reads one kind of build file
pub trait ManifestParser: Send + Sync {
    /// Check if this parser supports the given filename
    fn supports_file(&self, filename: &str) -> bool;

    fn parse(&self, content: &str) -> Result<ParsedManifest, ParseError>;

    fn build_tool(&self) -> BuildTool;

    /// Higher wins when a project carries more than one manifest
    fn priority(&self) -> u8 {
        0
    }
}

/// Picks the parser for a manifest file name
pub struct ParserFactory {
    parsers: Vec<Box<dyn ManifestParser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    pub fn new() -> Self {
        let mut parsers: Vec<Box<dyn ManifestParser>> = vec![
            Box::new(super::maven::MavenParser::new()),
            Box::new(super::gradle::GradleParser::new()),
        ];
        parsers.sort_by_key(|p| std::cmp::Reverse(p.priority()));
        Self { parsers }
    }

    pub fn parser_for(&self, filename: &str) -> Option<&dyn ManifestParser> {
        self.parsers
            .iter()
            .find(|p| p.supports_file(filename))
            .map(|p| p.as_ref())
    }

    pub fn parser_for_tool(&self, tool: BuildTool) -> Option<&dyn ManifestParser> {
        self.parsers
            .iter()
            .find(|p| p.build_tool() == tool)
            .map(|p| p.as_ref())
    }
}
