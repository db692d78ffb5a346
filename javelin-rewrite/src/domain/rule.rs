//! Rule types for detection, rewriting and manifest generation
//!
//! A rule is pure data: a trigger deciding when it is active, a pattern, the
//! kind of file it reads, and what to do on a match. The catalog keeps rules in
//! an ordered list and the engines walk that list in order.

use javelin_core::{ConversionType, Severity};
use serde::{Deserialize, Serialize};

// =============================================================================
// Triggers
// =============================================================================

/// Which pass or selection a trigger listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "conversion", rename_all = "snake_case")]
pub enum Selector {
    /// Active when the conversion is selected (detection) or its pass runs (rewrite)
    Conversion(ConversionType),
    /// The heuristic code-quality pass
    BusinessLogic,
    /// Active regardless of the selection
    Any,
}

/// Version condition over the (source, target) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "version", rename_all = "snake_case")]
pub enum VersionPredicate {
    Always,
    TargetAtLeast(u32),
    /// Source below the threshold and target at or above it
    Crossing(u32),
}

impl VersionPredicate {
    pub fn holds(&self, source: u32, target: u32) -> bool {
        match *self {
            Self::Always => true,
            Self::TargetAtLeast(n) => target >= n,
            Self::Crossing(n) => source < n && target >= n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trigger {
    pub selector: Selector,
    pub versions: VersionPredicate,
}

impl Trigger {
    pub fn conversion(conversion: ConversionType) -> Self {
        Self {
            selector: Selector::Conversion(conversion),
            versions: VersionPredicate::Always,
        }
    }

    pub fn java_version(versions: VersionPredicate) -> Self {
        Self {
            selector: Selector::Conversion(ConversionType::JavaVersion),
            versions,
        }
    }

    pub fn business_logic() -> Self {
        Self {
            selector: Selector::BusinessLogic,
            versions: VersionPredicate::Always,
        }
    }

    pub fn any() -> Self {
        Self {
            selector: Selector::Any,
            versions: VersionPredicate::Always,
        }
    }

    /// Detection semantics: is this trigger satisfied by a selected set of conversions?
    pub fn selected_by(&self, selected: &[ConversionType], source: u32, target: u32) -> bool {
        let selector_matches = match self.selector {
            Selector::Conversion(c) => selected.contains(&c),
            Selector::BusinessLogic => false,
            Selector::Any => true,
        };
        selector_matches && self.versions.holds(source, target)
    }

    /// Rewrite semantics: does this trigger fire inside the given pass?
    pub fn fires_in(&self, pass: Selector, source: u32, target: u32) -> bool {
        self.selector == pass && self.versions.holds(source, target)
    }
}

// =============================================================================
// Targets
// =============================================================================

/// The kind of file a rule reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Every discovered `.java` file
    JavaSource,
    /// Root `pom.xml`
    MavenManifest,
    /// Root `build.gradle` or `build.gradle.kts`
    GradleScript,
    /// `application*.properties` under `src/main/resources`
    Properties,
}

/// How often a detection rule may report inside one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// First matching line wins
    FirstPerFile,
    /// One issue per matching line
    EveryLine,
}

// =============================================================================
// Rule variants
// =============================================================================

/// Common metadata for all rule types
pub trait RuleMetadata {
    fn id(&self) -> &str;
    fn description(&self) -> &str;
    fn triggers(&self) -> &[Trigger];
}

/// Emits an issue for lines matching a pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRule {
    pub id: String,
    /// Conversion the issue is attributed to when that conversion was selected
    pub group: ConversionType,
    pub triggers: Vec<Trigger>,
    pub pattern: String,
    pub file_kind: FileKind,
    pub match_mode: MatchMode,
    pub severity: Severity,
    pub category: String,
    pub message: String,
    #[serde(default)]
    pub suggested_fix: Option<String>,
}

/// Named rewrites that need more than a regex template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteFunction {
    /// `if (x != null && x.equals(` becomes `if (Objects.equals(x, `
    NullSafeEquals,
    /// `x.equals("lit")` becomes `"lit".equals(x)` for plain identifiers
    LiteralFirstEquals,
    /// `Objects.requireNonNull` guards for reference parameters of public methods
    NullGuardParameters,
    /// Adds `import java.util.Objects;` when the file uses `Objects.` without importing it
    EnsureObjectsImport,
    /// Spring Boot 2.x parent version becomes 3.2.0
    SpringBootParentVersion,
    /// Inserts Java version properties when the pom declares none, and pairs a lone compiler source with a target
    JavaVersionProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Replacement {
    /// Regex replacement template. `{target}` expands to the target version first.
    Template { template: String },
    /// Appends `// comment` to matching lines not already carrying it
    LineAnnotation {
        comment: String,
        /// Skip the whole file when it contains this text (case-insensitive)
        #[serde(default)]
        skip_if_file_contains: Option<String>,
    },
    Function { function: RewriteFunction },
}

/// Rewrites matching text in place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRule {
    pub id: String,
    pub triggers: Vec<Trigger>,
    /// Match pattern. For functions it also acts as a prefilter.
    pub pattern: String,
    pub file_kind: FileKind,
    pub replacement: Replacement,
    pub description: String,
    /// Stays idle when this conversion is also part of the plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unless_selected: Option<ConversionType>,
}

impl RewriteRule {
    /// Active for a plan that selected these conversions
    pub fn allowed_by(&self, selected: &[ConversionType]) -> bool {
        self.unless_selected.is_none_or(|c| !selected.contains(&c))
    }
}

/// Build-tool swaps that synthesize manifest files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    /// pom.xml into build.gradle and settings.gradle
    GradleFromMaven,
    /// build.gradle into pom.xml
    MavenFromGradle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRule {
    pub id: String,
    pub triggers: Vec<Trigger>,
    pub source: FileKind,
    pub generator: GeneratorKind,
    pub description: String,
}

/// A catalog rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "rule_type")]
pub enum Rule {
    #[serde(rename = "detect")]
    Detect(DetectionRule),
    #[serde(rename = "rewrite")]
    Rewrite(RewriteRule),
    #[serde(rename = "generate")]
    Generate(GenerationRule),
}

impl RuleMetadata for DetectionRule {
    fn id(&self) -> &str {
        &self.id
    }
    fn description(&self) -> &str {
        &self.message
    }
    fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }
}

impl RuleMetadata for RewriteRule {
    fn id(&self) -> &str {
        &self.id
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }
}

impl RuleMetadata for GenerationRule {
    fn id(&self) -> &str {
        &self.id
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }
}

impl RuleMetadata for Rule {
    fn id(&self) -> &str {
        match self {
            Rule::Detect(r) => r.id(),
            Rule::Rewrite(r) => r.id(),
            Rule::Generate(r) => r.id(),
        }
    }

    fn description(&self) -> &str {
        match self {
            Rule::Detect(r) => r.description(),
            Rule::Rewrite(r) => r.description(),
            Rule::Generate(r) => r.description(),
        }
    }

    fn triggers(&self) -> &[Trigger] {
        match self {
            Rule::Detect(r) => r.triggers(),
            Rule::Rewrite(r) => r.triggers(),
            Rule::Generate(r) => r.triggers(),
        }
    }
}

impl Rule {
    /// Rewrite rules built this way give way to `conversion` when both are planned
    pub fn unless_selected(mut self, conversion: ConversionType) -> Self {
        if let Rule::Rewrite(rule) = &mut self {
            rule.unless_selected = Some(conversion);
        }
        self
    }

    /// Active for detection under this selection
    pub fn selected_by(&self, selected: &[ConversionType], source: u32, target: u32) -> bool {
        self.triggers()
            .iter()
            .any(|t| t.selected_by(selected, source, target))
    }

    /// Active inside a pass
    pub fn fires_in(&self, pass: Selector, source: u32, target: u32) -> bool {
        self.triggers()
            .iter()
            .any(|t| t.fires_in(pass, source, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_requires_source_below_threshold() {
        let p = VersionPredicate::Crossing(8);
        assert!(p.holds(7, 8));
        assert!(p.holds(7, 17));
        assert!(!p.holds(8, 17));
        assert!(!p.holds(6, 7));
    }

    #[test]
    fn test_widened_trigger_activates_without_selection() {
        let triggers = [
            Trigger::conversion(ConversionType::JavaxToJakarta),
            Trigger::java_version(VersionPredicate::TargetAtLeast(17)),
        ];
        let selected = [ConversionType::JavaVersion];
        assert!(triggers.iter().any(|t| t.selected_by(&selected, 8, 17)));
        assert!(!triggers.iter().any(|t| t.selected_by(&selected, 8, 11)));
    }

    #[test]
    fn test_rule_serializes_with_type_tag() {
        let rule = Rule::Rewrite(RewriteRule {
            id: "x".to_string(),
            triggers: vec![Trigger::business_logic()],
            pattern: "a".to_string(),
            file_kind: FileKind::JavaSource,
            replacement: Replacement::Template {
                template: "b".to_string(),
            },
            description: "d".to_string(),
            unless_selected: None,
        });
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["rule_type"], "rewrite");
        assert_eq!(json["replacement"]["kind"], "template");
        assert!(json.get("unless_selected").is_none());
    }

    #[test]
    fn test_unless_selected_idles_under_conflicting_plan() {
        let rule = Rule::Rewrite(RewriteRule {
            id: "x".to_string(),
            triggers: vec![Trigger::java_version(VersionPredicate::TargetAtLeast(17))],
            pattern: "a".to_string(),
            file_kind: FileKind::JavaSource,
            replacement: Replacement::Template {
                template: "b".to_string(),
            },
            description: "d".to_string(),
            unless_selected: None,
        })
        .unless_selected(ConversionType::JakartaToJavax);
        let Rule::Rewrite(rule) = rule else {
            panic!("expected a rewrite rule");
        };
        assert!(rule.allowed_by(&[ConversionType::JavaVersion]));
        assert!(!rule.allowed_by(&[ConversionType::JavaVersion, ConversionType::JakartaToJavax]));
    }
}
