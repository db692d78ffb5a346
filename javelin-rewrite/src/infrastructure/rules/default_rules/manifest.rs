//! Build manifest rewrites run at the end of the `java_version` pass

use javelin_core::ConversionType;

use super::{function, jakarta_coordinate_rules, rewrite};
use crate::domain::{FileKind, RewriteFunction, Rule, Trigger, VersionPredicate};

fn pom(id: &str, versions: VersionPredicate, pattern: &str, template: &str, description: &str) -> Rule {
    rewrite(
        id,
        vec![Trigger::java_version(versions)],
        FileKind::MavenManifest,
        pattern,
        template,
        description,
    )
}

fn gradle(id: &str, pattern: &str, template: &str, description: &str) -> Rule {
    rewrite(
        id,
        vec![Trigger::java_version(VersionPredicate::Always)],
        FileKind::GradleScript,
        pattern,
        template,
        description,
    )
}

/// Java version declarations, tried in order
const POM_VERSION_TAGS: &[(&str, &str, &str)] = &[
    ("pom-compiler-source", r"<maven\.compiler\.source>[^<$]+</maven\.compiler\.source>", "<maven.compiler.source>{target}</maven.compiler.source>"),
    ("pom-compiler-target", r"<maven\.compiler\.target>[^<$]+</maven\.compiler\.target>", "<maven.compiler.target>{target}</maven.compiler.target>"),
    ("pom-compiler-release", r"<maven\.compiler\.release>[^<$]+</maven\.compiler\.release>", "<maven.compiler.release>{target}</maven.compiler.release>"),
    ("pom-java-version", r"<java\.version>[^<$]+</java\.version>", "<java.version>{target}</java.version>"),
    ("pom-plugin-source-dotted", r"<source>1\.\d+</source>", "<source>{target}</source>"),
    ("pom-plugin-target-dotted", r"<target>1\.\d+</target>", "<target>{target}</target>"),
    ("pom-plugin-source", r"<source>\d+</source>", "<source>{target}</source>"),
    ("pom-plugin-target", r"<target>\d+</target>", "<target>{target}</target>"),
    ("pom-plugin-release", r"<release>\d+</release>", "<release>{target}</release>"),
];

pub fn get_manifest_rules() -> Vec<Rule> {
    use VersionPredicate::{Always, TargetAtLeast};

    let mut rules: Vec<Rule> = POM_VERSION_TAGS
        .iter()
        .map(|(id, pattern, template)| pom(id, Always, pattern, template, "Set Java version"))
        .collect();

    rules.push(function(
        "pom-java-version-properties",
        vec![Trigger::java_version(Always)],
        FileKind::MavenManifest,
        r"</project>",
        RewriteFunction::JavaVersionProperties,
        "Declare Java version properties",
    ));

    rules.push(pom(
        "pom-spring-boot-version",
        TargetAtLeast(17),
        r"<spring-boot\.version>2\.[^<]+</spring-boot\.version>",
        "<spring-boot.version>3.2.0</spring-boot.version>",
        "Upgrade Spring Boot to 3.2.0",
    ));

    rules.extend(
        jakarta_coordinate_rules("pom-jakarta", &[Trigger::java_version(TargetAtLeast(17))])
            .into_iter()
            .map(|rule| rule.unless_selected(ConversionType::JakartaToJavax)),
    );

    rules.extend([
        gradle(
            "gradle-source-compatibility",
            r#"sourceCompatibility\s*=\s*(?:JavaVersion\.VERSION_[0-9_]+|['"][0-9.]+['"]|[0-9.]+)"#,
            "sourceCompatibility = '{target}'",
            "Set Java version",
        ),
        gradle(
            "gradle-target-compatibility",
            r#"targetCompatibility\s*=\s*(?:JavaVersion\.VERSION_[0-9_]+|['"][0-9.]+['"]|[0-9.]+)"#,
            "targetCompatibility = '{target}'",
            "Set Java version",
        ),
        gradle(
            "gradle-toolchain",
            r"JavaLanguageVersion\.of\(\s*\d+\s*\)",
            "JavaLanguageVersion.of({target})",
            "Set Java toolchain version",
        ),
    ]);

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::rewriter::{RewriteContext, apply_rule};

    fn run_all(src: &str, source: u32, target: u32, kind: FileKind) -> String {
        let ctx = RewriteContext::new(source, target);
        let mut content = src.to_string();
        for rule in get_manifest_rules() {
            let Rule::Rewrite(rw) = rule else { continue };
            if rw.file_kind != kind
                || !rw.triggers.iter().any(|t| t.versions.holds(source, target))
            {
                continue;
            }
            if let Some(out) = apply_rule(&rw, &content, &ctx).unwrap() {
                content = out.content;
            }
        }
        content
    }

    #[test]
    fn test_java_7_pom_to_11_gains_target() {
        let src = "<project>\n  <modelVersion>4.0.0</modelVersion>\n  <properties>\n    <maven.compiler.source>7</maven.compiler.source>\n  </properties>\n</project>\n";
        let out = run_all(src, 7, 11, FileKind::MavenManifest);
        assert!(out.contains("<maven.compiler.source>11</maven.compiler.source>"));
        assert!(out.contains("<maven.compiler.target>11</maven.compiler.target>"));
        assert_eq!(run_all(&out, 7, 11, FileKind::MavenManifest), out);
    }

    #[test]
    fn test_placeholders_are_left_alone() {
        let src = "<project><properties><maven.compiler.source>${java.version}</maven.compiler.source><maven.compiler.target>${java.version}</maven.compiler.target><java.version>1.8</java.version></properties></project>";
        let out = run_all(src, 8, 17, FileKind::MavenManifest);
        assert!(out.contains("<maven.compiler.source>${java.version}</maven.compiler.source>"));
        assert!(out.contains("<java.version>17</java.version>"));
    }

    #[test]
    fn test_java_17_swaps_javax_coordinates() {
        let src = "<project><dependency><groupId>javax.servlet</groupId><artifactId>javax.servlet-api</artifactId></dependency><spring-boot.version>2.7.18</spring-boot.version><java.version>11</java.version></project>";
        let out = run_all(src, 11, 17, FileKind::MavenManifest);
        assert!(out.contains("<groupId>jakarta.servlet</groupId><artifactId>jakarta.servlet-api</artifactId>"));
        assert!(out.contains("<spring-boot.version>3.2.0</spring-boot.version>"));
    }

    #[test]
    fn test_gradle_compatibility() {
        let src = "java {\n    sourceCompatibility = JavaVersion.VERSION_1_8\n    targetCompatibility = '1.8'\n}\n";
        let out = run_all(src, 8, 17, FileKind::GradleScript);
        assert!(out.contains("sourceCompatibility = '17'"));
        assert!(out.contains("targetCompatibility = '17'"));
    }
}
