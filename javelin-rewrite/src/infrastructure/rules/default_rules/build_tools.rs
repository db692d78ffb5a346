//! Build tool swaps

use javelin_core::ConversionType;

use crate::domain::{FileKind, GenerationRule, GeneratorKind, Rule, Trigger};

pub fn get_build_tool_rules() -> Vec<Rule> {
    vec![
        Rule::Generate(GenerationRule {
            id: "maven-to-gradle".to_string(),
            triggers: vec![Trigger::conversion(ConversionType::MavenToGradle)],
            source: FileKind::MavenManifest,
            generator: GeneratorKind::GradleFromMaven,
            description: "Generate build.gradle and settings.gradle from pom.xml".to_string(),
        }),
        Rule::Generate(GenerationRule {
            id: "gradle-to-maven".to_string(),
            triggers: vec![Trigger::conversion(ConversionType::GradleToMaven)],
            source: FileKind::GradleScript,
            generator: GeneratorKind::MavenFromGradle,
            description: "Generate pom.xml from build.gradle".to_string(),
        }),
    ]
}
