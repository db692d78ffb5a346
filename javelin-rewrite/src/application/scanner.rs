//! Issue detection over a project tree

use std::path::Path;
use std::sync::Arc;

use javelin_core::ConversionType;
use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::domain::{DetectionRule, FileKind, Issue, IssueStatus, MatchMode, ScanError, ScanReport, snippet};
use crate::infrastructure::discovery::SourceDiscovery;
use crate::infrastructure::encoding::{SourceReadError, read_source_file};
use crate::infrastructure::regex_cache::get_regex;
use crate::infrastructure::rules::RuleCatalog;

/// Runs the active detection rules over every file kind they target
#[derive(Debug, Clone)]
pub struct IssueScanner {
    catalog: Arc<RuleCatalog>,
    discovery: SourceDiscovery,
}

impl Default for IssueScanner {
    fn default() -> Self {
        Self::new(Arc::new(RuleCatalog::new()))
    }
}

/// Where a rule matched inside a file
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineMatch {
    line: usize,
    column: usize,
    text: String,
}

fn matching_lines<'a>(pattern: &'a Regex, content: &'a str) -> impl Iterator<Item = LineMatch> + 'a {
    content.lines().enumerate().filter_map(move |(idx, line)| {
        pattern.find(line).map(|m| LineMatch {
            line: idx + 1,
            column: line[..m.start()].chars().count() + 1,
            text: line.to_string(),
        })
    })
}

fn compile(rule: &DetectionRule) -> Result<Regex, ScanError> {
    get_regex(&rule.pattern).map_err(|source| ScanError::Pattern {
        rule_id: rule.id.clone(),
        source,
    })
}

impl IssueScanner {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self {
            catalog,
            discovery: SourceDiscovery::new(),
        }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Scans `root` with every detection rule active for the selection.
    /// Files that cannot be read are recorded and skipped.
    #[instrument(skip(self, selected), fields(root = %root.display()))]
    pub fn scan(
        &self,
        root: &Path,
        selected: &[ConversionType],
        source: u32,
        target: u32,
    ) -> ScanReport {
        info!("Starting issue scan");
        let rules: Vec<&DetectionRule> = self
            .catalog
            .detection_rules(selected, source, target)
            .collect();

        let mut kinds: Vec<FileKind> = Vec::new();
        for rule in &rules {
            if !kinds.contains(&rule.file_kind) {
                kinds.push(rule.file_kind);
            }
        }

        let mut report = ScanReport::default();
        let mut sequence = 0usize;

        for kind in kinds {
            let kind_rules: Vec<&DetectionRule> =
                rules.iter().copied().filter(|r| r.file_kind == kind).collect();

            for relative in self.discovery.paths_for(root, kind) {
                let path = root.join(&relative);
                if !path.is_file() {
                    continue;
                }
                let content = match read_source_file(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(file = %relative, error = ?e, "Skipping unreadable file");
                        report.skipped.push(ScanError::from_read(path, e));
                        continue;
                    }
                };
                report.files_scanned += 1;

                let (issues, failed) =
                    self.scan_file(&kind_rules, &relative, &content, selected, &mut sequence);
                debug!(file = %relative, issue_count = issues.len(), "Scanned file");
                report.issues.extend(issues);
                report.skipped.extend(failed);
            }
        }

        info!(
            issue_count = report.issues.len(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            files_scanned = report.files_scanned,
            skipped = report.skipped.len(),
            "Issue scan completed"
        );
        report
    }

    /// Issues raised by `rules` in one file, plus the rules that could not run.
    /// `sequence` numbers issues across a whole scan.
    pub fn scan_file(
        &self,
        rules: &[&DetectionRule],
        relative: &str,
        content: &str,
        selected: &[ConversionType],
        sequence: &mut usize,
    ) -> (Vec<Issue>, Vec<ScanError>) {
        let mut issues = Vec::new();
        let mut failed = Vec::new();
        for rule in rules {
            let pattern = match compile(rule) {
                Ok(pattern) => pattern,
                Err(e) => {
                    warn!(file = %relative, rule_id = %rule.id, error = %e, "Skipping rule");
                    failed.push(e);
                    continue;
                }
            };
            let mut hits = matching_lines(&pattern, content);
            let hits: Vec<LineMatch> = match rule.match_mode {
                MatchMode::FirstPerFile => hits.next().into_iter().collect(),
                MatchMode::EveryLine => hits.collect(),
            };
            for hit in hits {
                *sequence += 1;
                issues.push(self.issue_for(rule, relative, hit, selected, *sequence));
            }
        }
        (issues, failed)
    }

    fn issue_for(
        &self,
        rule: &DetectionRule,
        relative: &str,
        hit: LineMatch,
        selected: &[ConversionType],
        sequence: usize,
    ) -> Issue {
        let conversion_type = if selected.contains(&rule.group) {
            rule.group
        } else {
            ConversionType::JavaVersion
        };
        Issue {
            id: Issue::format_id(sequence),
            severity: rule.severity,
            status: IssueStatus::Detected,
            category: rule.category.clone(),
            message: rule.message.clone(),
            file_path: relative.to_string(),
            line: Some(hit.line),
            column: Some(hit.column),
            code_snippet: Some(snippet(&hit.text)),
            suggested_fix: rule.suggested_fix.clone(),
            conversion_type,
            rule_id: rule.id.clone(),
            fixed_at: None,
        }
    }

    /// Whether the issue's own rule no longer matches its file. A deleted file
    /// counts as resolved, an unknown rule never does.
    pub fn is_resolved(&self, root: &Path, issue: &Issue) -> Result<bool, ScanError> {
        let Some(rule) = self.catalog.detection_rule(&issue.rule_id) else {
            return Ok(false);
        };
        let path = root.join(&issue.file_path);
        let content = match read_source_file(&path) {
            Ok(content) => content,
            Err(SourceReadError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(true);
            }
            Err(e) => return Err(ScanError::from_read(path, e)),
        };

        let pattern = compile(rule)?;
        let mut hits = matching_lines(&pattern, &content);
        let resolved = match rule.match_mode {
            MatchMode::FirstPerFile => hits.next().is_none(),
            // Line numbers shift as rewrites add lines, so compare the text
            MatchMode::EveryLine => match issue.code_snippet.as_deref() {
                Some(expected) => !hits.any(|hit| snippet(&hit.text) == expected),
                None => hits.next().is_none(),
            },
        };
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Rule, Trigger};
    use javelin_core::Severity;
    use std::fs;

    fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_one_issue_per_rule_and_file() {
        let dir = project(&[(
            "src/main/java/App.java",
            "class App {\n  Integer a = new Integer(1);\n  Integer b = new Integer(2);\n}\n",
        )]);
        let report = IssueScanner::default().scan(dir.path(), &[ConversionType::JavaVersion], 8, 17);
        let wrapper: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.message.contains("Integer"))
            .collect();
        assert_eq!(wrapper.len(), 1);
        assert_eq!(wrapper[0].line, Some(2));
        assert_eq!(wrapper[0].code_snippet.as_deref(), Some("Integer a = new Integer(1);"));
        assert_eq!(wrapper[0].file_path, "src/main/java/App.java");
    }

    #[test]
    fn test_group_falls_back_to_java_version() {
        let dir = project(&[(
            "src/main/java/Web.java",
            "import javax.servlet.http.HttpServlet;\nclass Web {}\n",
        )]);
        let scanner = IssueScanner::default();

        let report = scanner.scan(dir.path(), &[ConversionType::JavaVersion], 8, 17);
        let issue = report.issues.iter().find(|i| i.category == "Package Migration").unwrap();
        assert_eq!(issue.conversion_type, ConversionType::JavaVersion);

        let report = scanner.scan(
            dir.path(),
            &[ConversionType::JavaVersion, ConversionType::JavaxToJakarta],
            8,
            17,
        );
        let issue = report.issues.iter().find(|i| i.category == "Package Migration").unwrap();
        assert_eq!(issue.conversion_type, ConversionType::JavaxToJakarta);
    }

    #[test]
    fn test_javax_group_inactive_below_17_without_selection() {
        let dir = project(&[(
            "src/main/java/Web.java",
            "import javax.servlet.http.HttpServlet;\n",
        )]);
        let report = IssueScanner::default().scan(dir.path(), &[ConversionType::JavaVersion], 8, 11);
        assert!(report.issues.iter().all(|i| i.category != "Package Migration"));
    }

    #[test]
    fn test_pom_reports_every_spring_boot_2_line() {
        let dir = project(&[(
            "pom.xml",
            concat!(
                "<project>\n",
                "  <parent><artifactId>spring-boot-starter-parent</artifactId><version>2.7.5</version></parent>\n",
                "  <properties><spring-boot.version>2.6.0</spring-boot.version></properties>\n",
                "  <dependency><artifactId>spring-boot-starter-web</artifactId><version>2.7.5</version></dependency>\n",
                "  <artifactId>widget</artifactId><version>2.1</version>\n",
                "  <artifactId>spring-boot-starter-test</artifactId>\n",
                "  <version>2.7.5</version>\n",
                "</project>\n",
            ),
        )]);
        let report = IssueScanner::default().scan(dir.path(), &[ConversionType::JavaVersion], 8, 17);
        let pins: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.category == "Dependency Update")
            .collect();
        assert_eq!(pins.len(), 2);
        assert_eq!(pins[0].line, Some(2));
        assert_eq!(pins[1].line, Some(4));
        assert!(pins.iter().all(|i| i.is_warning()));
        assert_eq!(pins[0].suggested_fix.as_deref(), Some("<version>3.2.0</version>"));
    }

    #[test]
    fn test_issue_ids_are_sequential() {
        let dir = project(&[
            ("src/main/java/A.java", "Long x = new Long(1L);\n"),
            ("src/main/java/B.java", "Double d = new Double(1.0);\n"),
        ]);
        let report = IssueScanner::default().scan(dir.path(), &[ConversionType::JavaVersion], 8, 11);
        let ids: Vec<_> = report.issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["ISS-0001", "ISS-0002"]);
    }

    #[test]
    fn test_is_resolved_follows_file_content() {
        let dir = project(&[("src/main/java/A.java", "Long x = new Long(1L);\n")]);
        let scanner = IssueScanner::default();
        let report = scanner.scan(dir.path(), &[ConversionType::JavaVersion], 8, 11);
        let issue = &report.issues[0];
        assert!(!scanner.is_resolved(dir.path(), issue).unwrap());

        fs::write(dir.path().join("src/main/java/A.java"), "Long x = Long.valueOf(1L);\n").unwrap();
        assert!(scanner.is_resolved(dir.path(), issue).unwrap());
    }

    #[test]
    fn test_broken_pattern_only_drops_its_own_rule() {
        let rule = |id: &str, pattern: &str| {
            Rule::Detect(DetectionRule {
                id: id.to_string(),
                group: ConversionType::JavaVersion,
                triggers: vec![Trigger::any()],
                pattern: pattern.to_string(),
                file_kind: FileKind::JavaSource,
                match_mode: MatchMode::FirstPerFile,
                severity: Severity::Error,
                category: "Deprecated Method".to_string(),
                message: id.to_string(),
                suggested_fix: None,
            })
        };
        let catalog = RuleCatalog::with_rules(vec![
            rule("broken", r"new Integer("),
            rule("wrapper", r"new Integer\s*\("),
        ]);
        let dir = project(&[("src/main/java/App.java", "Integer a = new Integer(1);\n")]);

        let report = IssueScanner::new(Arc::new(catalog)).scan(dir.path(), &[ConversionType::JavaVersion], 8, 17);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].rule_id, "wrapper");
        assert!(matches!(
            report.skipped.as_slice(),
            [ScanError::Pattern { rule_id, .. }] if rule_id == "broken"
        ));
    }

    #[test]
    fn test_binary_file_is_skipped() {
        let dir = project(&[("src/main/java/A.java", "Long x = new Long(1L);\n")]);
        fs::write(dir.path().join("src/main/java/Blob.java"), [0u8, 159, 146, 150, 0]).unwrap();
        let report = IssueScanner::default().scan(dir.path(), &[ConversionType::JavaVersion], 8, 11);
        assert_eq!(report.files_scanned, 1);
        assert!(matches!(report.skipped.as_slice(), [ScanError::Binary { .. }]));
    }
}
