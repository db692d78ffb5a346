//! Migration rule catalog

mod default_rules;
pub mod recipes;

pub use default_rules::get_default_rules;
pub use recipes::{Recipe, recipe_catalog, recipes_for};

use javelin_core::ConversionType;
use tracing::debug;

use crate::domain::{DetectionRule, GenerationRule, RewriteRule, Rule, RuleMetadata, Selector};

/// Ordered, append-only list of rules
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleCatalog {
    /// Catalog with the built-in rules
    pub fn new() -> Self {
        Self::with_rules(get_default_rules())
    }

    pub fn with_rules(rules: Vec<Rule>) -> Self {
        debug!(rule_count = rules.len(), "Creating rule catalog");
        Self { rules }
    }

    /// Appends a rule after every existing one
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id() == id)
    }

    pub fn detection_rule(&self, id: &str) -> Option<&DetectionRule> {
        match self.get(id) {
            Some(Rule::Detect(rule)) => Some(rule),
            _ => None,
        }
    }

    /// Detection rules active for a selection, in catalog order
    pub fn detection_rules<'a>(
        &'a self,
        selected: &'a [ConversionType],
        source: u32,
        target: u32,
    ) -> impl Iterator<Item = &'a DetectionRule> + 'a {
        self.rules.iter().filter_map(move |rule| match rule {
            Rule::Detect(d) if rule.selected_by(selected, source, target) => Some(d),
            _ => None,
        })
    }

    /// Rewrite rules firing inside a pass, in catalog order
    pub fn rewrite_rules(
        &self,
        pass: Selector,
        source: u32,
        target: u32,
    ) -> impl Iterator<Item = &RewriteRule> + '_ {
        self.rules.iter().filter_map(move |rule| match rule {
            Rule::Rewrite(r) if rule.fires_in(pass, source, target) => Some(r),
            _ => None,
        })
    }

    pub fn generation_rules(
        &self,
        pass: Selector,
        source: u32,
        target: u32,
    ) -> impl Iterator<Item = &GenerationRule> + '_ {
        self.rules.iter().filter_map(move |rule| match rule {
            Rule::Generate(g) if rule.fires_in(pass, source, target) => Some(g),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileKind;

    #[test]
    fn test_java_version_pass_runs_sources_before_manifests() {
        let catalog = RuleCatalog::new();
        let kinds: Vec<FileKind> = catalog
            .rewrite_rules(Selector::Conversion(ConversionType::JavaVersion), 8, 21)
            .map(|r| r.file_kind)
            .collect();
        let first_manifest = kinds
            .iter()
            .position(|k| *k != FileKind::JavaSource)
            .unwrap();
        assert!(kinds[first_manifest..].iter().all(|k| *k != FileKind::JavaSource));
    }

    #[test]
    fn test_version_gates_filter_rewrites() {
        let catalog = RuleCatalog::new();
        let pass = Selector::Conversion(ConversionType::JavaVersion);
        let to_11: Vec<_> = catalog.rewrite_rules(pass, 8, 11).map(|r| r.id.clone()).collect();
        assert!(to_11.contains(&"jv11-is-blank".to_string()));
        assert!(!to_11.contains(&"jv17-jakarta-imports".to_string()));
        assert!(!to_11.contains(&"jv8-list-sort".to_string()));

        let from_7: Vec<_> = catalog.rewrite_rules(pass, 7, 8).map(|r| r.id.clone()).collect();
        assert!(from_7.contains(&"jv8-list-sort".to_string()));
    }

    #[test]
    fn test_business_logic_rules_only_fire_in_their_pass() {
        let catalog = RuleCatalog::new();
        assert!(
            catalog
                .rewrite_rules(Selector::Conversion(ConversionType::JavaVersion), 8, 17)
                .all(|r| !r.id.starts_with("bl-"))
        );
        assert!(catalog.rewrite_rules(Selector::BusinessLogic, 8, 17).count() > 0);
    }

    #[test]
    fn test_pushed_rules_come_last() {
        let mut catalog = RuleCatalog::with_rules(Vec::new());
        catalog.push(get_default_rules().remove(0));
        assert_eq!(catalog.len(), 1);
    }
}
