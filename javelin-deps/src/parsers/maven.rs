//! Maven pom.xml parser

use javelin_core::parse_java_version;
use quick_xml::Reader;
use quick_xml::events::Event;

use super::traits::{ManifestParser, ParseError};
use crate::domain::{BuildTool, ManifestDependency, ParsedManifest};

/// Parser for Maven pom.xml files
pub struct MavenParser;

impl Default for MavenParser {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct DeclaredVersions {
    compiler_source: Option<u32>,
    java_version: Option<u32>,
    release: Option<u32>,
}

impl DeclaredVersions {
    /// `maven.compiler.source` wins over `java.version`, which wins over `release`.
    fn resolve(&self) -> Option<u32> {
        self.compiler_source.or(self.java_version).or(self.release)
    }
}

impl MavenParser {
    pub fn new() -> Self {
        Self
    }

    fn extract(&self, content: &str) -> Result<ParsedManifest, ParseError> {
        let mut reader = Reader::from_str(content);
        let mut buf = Vec::new();

        let mut path: Vec<String> = Vec::new();
        let mut current: Option<ManifestDependency> = None;
        let mut dependencies = Vec::new();
        let mut versions = DeclaredVersions::default();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if name == "dependency" {
                        current = Some(ManifestDependency::new("", ""));
                    }
                    path.push(name);
                }
                Ok(Event::End(_)) => {
                    if path.pop().as_deref() == Some("dependency") {
                        if let Some(dep) = current.take() {
                            if !dep.group_id.is_empty() && !dep.artifact_id.is_empty() {
                                dependencies.push(dep);
                            }
                        }
                    }
                }
                Ok(Event::Text(t)) => {
                    let text = reader
                        .decoder()
                        .decode(t.as_ref())
                        .unwrap_or_default()
                        .trim()
                        .to_string();
                    if !text.is_empty() {
                        let depth = path.len();
                        let tag = path.last().map(String::as_str);
                        let parent = depth
                            .checked_sub(2)
                            .and_then(|i| path.get(i))
                            .map(String::as_str);

                        match (parent, current.as_mut()) {
                            (Some("dependency"), Some(dep)) => match tag {
                                Some("groupId") => dep.group_id = text,
                                Some("artifactId") => dep.artifact_id = text,
                                Some("version") => dep.version = Some(text),
                                Some("scope") => dep.scope = Some(text),
                                _ => {}
                            },
                            _ => match tag {
                                Some("maven.compiler.source") => {
                                    versions.compiler_source = parse_java_version(&text).ok()
                                }
                                Some("java.version") => {
                                    versions.java_version = parse_java_version(&text).ok()
                                }
                                Some("maven.compiler.release") | Some("release") => {
                                    if versions.release.is_none() {
                                        versions.release = parse_java_version(&text).ok();
                                    }
                                }
                                _ => {}
                            },
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ParseError::Xml {
                        position: reader.error_position(),
                        message: e.to_string(),
                    });
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(ParsedManifest {
            dependencies,
            declared_java_version: versions.resolve(),
        })
    }
}

impl ManifestParser for MavenParser {
    fn supports_file(&self, filename: &str) -> bool {
        filename == "pom.xml"
    }

    fn parse(&self, content: &str) -> Result<ParsedManifest, ParseError> {
        self.extract(content)
    }

    fn build_tool(&self) -> BuildTool {
        BuildTool::Maven
    }

    fn priority(&self) -> u8 {
        10
    }
}
