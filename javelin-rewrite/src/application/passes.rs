//! One transformation pass over a [`SourceStore`]
//!
//! Both migration and preview go through here; only the store differs.

use tracing::{debug, trace, warn};

use crate::domain::{
    AppliedRewrite, FileKind, FileOutcome, GenerationRule, GeneratorKind, MigrationPlan,
    RewriteRule, Selector, TransformationError,
};
use crate::infrastructure::discovery::SourceDiscovery;
use crate::infrastructure::generators::{GeneratedFile, gradle_from_maven, maven_from_gradle};
use crate::infrastructure::rewriter::{RewriteContext, apply_rule};
use crate::infrastructure::rules::RuleCatalog;
use crate::infrastructure::store::SourceStore;

/// What a pass did: changed files, files read, and files it had to skip
#[derive(Debug, Default)]
pub struct PassOutcome {
    pub files_scanned: usize,
    pub outcomes: Vec<FileOutcome>,
    pub skipped: Vec<TransformationError>,
}

pub struct PassRunner<'a> {
    catalog: &'a RuleCatalog,
    discovery: &'a SourceDiscovery,
}

impl<'a> PassRunner<'a> {
    pub fn new(catalog: &'a RuleCatalog, discovery: &'a SourceDiscovery) -> Self {
        Self { catalog, discovery }
    }

    pub fn run(&self, store: &mut dyn SourceStore, pass: Selector, plan: &MigrationPlan) -> PassOutcome {
        let ctx = RewriteContext::new(plan.source_version, plan.target_version);
        let rules: Vec<&RewriteRule> = self
            .catalog
            .rewrite_rules(pass, ctx.source_version, ctx.target_version)
            .filter(|rule| rule.allowed_by(&plan.conversions))
            .collect();

        // File kinds in the order their first rule appears
        let mut kinds: Vec<FileKind> = Vec::new();
        for rule in &rules {
            if !kinds.contains(&rule.file_kind) {
                kinds.push(rule.file_kind);
            }
        }

        let mut result = PassOutcome::default();
        for kind in kinds {
            let kind_rules: Vec<&RewriteRule> =
                rules.iter().copied().filter(|r| r.file_kind == kind).collect();
            for relative in self.discovery.paths_for(store.root(), kind) {
                match self.rewrite_file(store, &relative, &kind_rules, &ctx) {
                    Ok(Some(outcome)) => {
                        result.files_scanned += 1;
                        if outcome.changed() {
                            result.outcomes.push(outcome);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(file = %relative, error = %e, "Skipping file");
                        result.skipped.push(e);
                    }
                }
            }
        }

        let generators: Vec<&GenerationRule> = self
            .catalog
            .generation_rules(pass, ctx.source_version, ctx.target_version)
            .collect();
        for rule in generators {
            match self.generate(store, rule, &ctx) {
                Ok(outcomes) => result.outcomes.extend(outcomes),
                Err(e) => {
                    warn!(rule_id = %rule.id, error = %e, "Build file generation failed");
                    result.skipped.push(e);
                }
            }
        }

        debug!(
            pass = ?pass,
            files_scanned = result.files_scanned,
            files_changed = result.outcomes.len(),
            skipped = result.skipped.len(),
            "Pass completed"
        );
        result
    }

    /// Applies `rules` in order. `None` when the file does not exist.
    fn rewrite_file(
        &self,
        store: &mut dyn SourceStore,
        relative: &str,
        rules: &[&RewriteRule],
        ctx: &RewriteContext,
    ) -> Result<Option<FileOutcome>, TransformationError> {
        let Some(original) = store.read(relative)? else {
            return Ok(None);
        };

        let mut content = original.clone();
        let mut rewrites = Vec::new();
        for rule in rules {
            let applied = apply_rule(rule, &content, ctx).map_err(|source| {
                TransformationError::Pattern {
                    rule_id: rule.id.clone(),
                    source,
                }
            })?;
            if let Some(rewritten) = applied {
                trace!(file = %relative, rule_id = %rule.id, occurrences = rewritten.occurrences, "Rule applied");
                rewrites.push(AppliedRewrite {
                    rule_id: rule.id.clone(),
                    description: rule.description.clone(),
                    pattern: rule.pattern.clone(),
                    replacement: rule.replacement.summary(),
                    occurrences: rewritten.occurrences,
                });
                content = rewritten.content;
            }
        }

        if content != original {
            store.write(relative, &content)?;
        }
        Ok(Some(FileOutcome {
            path: relative.to_string(),
            original: Some(original),
            updated: content,
            rewrites,
        }))
    }

    fn generate(
        &self,
        store: &mut dyn SourceStore,
        rule: &GenerationRule,
        ctx: &RewriteContext,
    ) -> Result<Vec<FileOutcome>, TransformationError> {
        let Some(source_path) = self.discovery.paths_for(store.root(), rule.source).into_iter().next() else {
            return Ok(Vec::new());
        };
        let Some(manifest) = store.read(&source_path)? else {
            debug!(rule_id = %rule.id, file = %source_path, "No manifest to convert");
            return Ok(Vec::new());
        };

        let generated: Vec<GeneratedFile> = match rule.generator {
            GeneratorKind::GradleFromMaven => gradle_from_maven(&manifest, ctx.target_version),
            GeneratorKind::MavenFromGradle => maven_from_gradle(&manifest, ctx.target_version),
        }
        .map_err(|source| TransformationError::Manifest {
            path: store.root().join(&source_path),
            source,
        })?;

        let mut outcomes = Vec::new();
        for file in generated {
            let existing = store.read(file.path)?;
            if existing.as_deref() == Some(file.content.as_str()) {
                continue;
            }
            store.write(file.path, &file.content)?;
            outcomes.push(FileOutcome {
                path: file.path.to_string(),
                original: existing,
                updated: file.content,
                rewrites: vec![AppliedRewrite {
                    rule_id: rule.id.clone(),
                    description: rule.description.clone(),
                    pattern: source_path.clone(),
                    replacement: file.path.to_string(),
                    occurrences: 1,
                }],
            });
        }
        Ok(outcomes)
    }
}
