//! Framework conversion passes

use javelin_core::ConversionType;

use super::{JAKARTA_COORDINATES, JAKARTA_PACKAGES, function, jakarta_coordinate_rules, rewrite};
use crate::domain::{FileKind, RewriteFunction, Rule, Trigger};

fn on(conversion: ConversionType) -> Vec<Trigger> {
    vec![Trigger::conversion(conversion)]
}

fn javax_to_jakarta() -> Vec<Rule> {
    let c = ConversionType::JavaxToJakarta;
    let mut rules = vec![rewrite(
        "javax-to-jakarta-imports",
        on(c),
        FileKind::JavaSource,
        &format!(r"(import\s+(?:static\s+)?)javax\.({JAKARTA_PACKAGES})\."),
        "${1}jakarta.$2.",
        "javax.* → jakarta.* imports",
    )];
    rules.extend(jakarta_coordinate_rules("javax-to-jakarta-pom", &on(c)));
    rules
}

fn jakarta_to_javax() -> Vec<Rule> {
    let c = ConversionType::JakartaToJavax;
    let mut rules = vec![rewrite(
        "jakarta-to-javax-imports",
        on(c),
        FileKind::JavaSource,
        &format!(r"(import\s+(?:static\s+)?)jakarta\.({JAKARTA_PACKAGES})\."),
        "${1}javax.$2.",
        "jakarta.* → javax.* imports",
    )];
    for (old_group, old_artifact, new_group, new_artifact) in JAKARTA_COORDINATES {
        rules.push(rewrite(
            &format!("jakarta-to-javax-pom-group-{new_group}"),
            on(c),
            FileKind::MavenManifest,
            &format!("<groupId>{}</groupId>", regex::escape(new_group)),
            &format!("<groupId>{old_group}</groupId>"),
            &format!("{new_group} → {old_group}"),
        ));
        rules.push(rewrite(
            &format!("jakarta-to-javax-pom-artifact-{new_artifact}"),
            on(c),
            FileKind::MavenManifest,
            &format!("<artifactId>{}</artifactId>", regex::escape(new_artifact)),
            &format!("<artifactId>{old_artifact}</artifactId>"),
            &format!("{new_artifact} → {old_artifact}"),
        ));
    }
    rules
}

fn spring_boot_2_to_3() -> Vec<Rule> {
    let c = ConversionType::SpringBoot2To3;
    let java = |id: &str, pattern: &str, template: &str, description: &str| {
        rewrite(id, on(c), FileKind::JavaSource, pattern, template, description)
    };

    vec![
        rewrite(
            "spring-boot-3-version-property",
            on(c),
            FileKind::MavenManifest,
            r"<spring-boot\.version>2\.[^<]+</spring-boot\.version>",
            "<spring-boot.version>3.2.0</spring-boot.version>",
            "Updated Spring Boot to 3.2.0",
        ),
        function(
            "spring-boot-3-parent",
            on(c),
            FileKind::MavenManifest,
            r"<parent>",
            RewriteFunction::SpringBootParentVersion,
            "Updated Spring Boot parent to 3.2.0",
        ),
        rewrite(
            "spring-boot-3-gradle-plugin",
            on(c),
            FileKind::GradleScript,
            r#"id\s*\(?\s*['"]org\.springframework\.boot['"]\s*\)?\s+version\s+['"]2\.[^'"]*['"]"#,
            "id 'org.springframework.boot' version '3.2.0'",
            "Updated Spring Boot plugin to 3.2.0",
        ),
        rewrite(
            "spring-boot-3-sql-init",
            on(c),
            FileKind::Properties,
            r"spring\.datasource\.initialization-mode",
            "spring.sql.init.mode",
            "Updated application.properties",
        ),
        java(
            "spring-boot-3-method-security",
            r"\bEnableGlobalMethodSecurity\b",
            "EnableMethodSecurity",
            "@EnableGlobalMethodSecurity → @EnableMethodSecurity",
        ),
        java(
            "spring-boot-3-request-matchers",
            r"\.(?:antMatchers|mvcMatchers)\(",
            ".requestMatchers(",
            "antMatchers()/mvcMatchers() → requestMatchers()",
        ),
        java(
            "spring-boot-3-jakarta-imports",
            &format!(r"(import\s+(?:static\s+)?)javax\.({JAKARTA_PACKAGES})\."),
            "${1}jakarta.$2.",
            "javax.* → jakarta.* imports",
        ),
    ]
}

fn junit_4_to_5() -> Vec<Rule> {
    let c = ConversionType::Junit4To5;
    let java = |id: &str, pattern: &str, template: &str, description: &str| {
        rewrite(id, on(c), FileKind::JavaSource, pattern, template, description)
    };

    vec![
        java("junit5-import-test", r"import org\.junit\.Test;", "import org.junit.jupiter.api.Test;", "JUnit 4 → JUnit 5 imports"),
        java("junit5-import-before", r"import org\.junit\.Before;", "import org.junit.jupiter.api.BeforeEach;", "JUnit 4 → JUnit 5 imports"),
        java("junit5-import-after", r"import org\.junit\.After;", "import org.junit.jupiter.api.AfterEach;", "JUnit 4 → JUnit 5 imports"),
        java("junit5-import-before-class", r"import org\.junit\.BeforeClass;", "import org.junit.jupiter.api.BeforeAll;", "JUnit 4 → JUnit 5 imports"),
        java("junit5-import-after-class", r"import org\.junit\.AfterClass;", "import org.junit.jupiter.api.AfterAll;", "JUnit 4 → JUnit 5 imports"),
        java("junit5-import-ignore", r"import org\.junit\.Ignore;", "import org.junit.jupiter.api.Disabled;", "JUnit 4 → JUnit 5 imports"),
        java("junit5-import-run-with", r"import org\.junit\.runner\.RunWith;", "import org.junit.jupiter.api.extension.ExtendWith;", "JUnit 4 → JUnit 5 imports"),
        java("junit5-import-assert", r"import org\.junit\.Assert;", "import org.junit.jupiter.api.Assertions;", "JUnit 4 → JUnit 5 imports"),
        java("junit5-import-static-assert", r"import static org\.junit\.Assert\.", "import static org.junit.jupiter.api.Assertions.", "JUnit 4 → JUnit 5 imports"),
        java("junit5-before", r"@Before\b", "@BeforeEach", "@Before → @BeforeEach"),
        java("junit5-after", r"@After\b", "@AfterEach", "@After → @AfterEach"),
        java("junit5-before-class", r"@BeforeClass\b", "@BeforeAll", "@BeforeClass → @BeforeAll"),
        java("junit5-after-class", r"@AfterClass\b", "@AfterAll", "@AfterClass → @AfterAll"),
        java("junit5-ignore", r"@Ignore\b", "@Disabled", "@Ignore → @Disabled"),
        java("junit5-run-with", r"@RunWith\b", "@ExtendWith", "@RunWith → @ExtendWith"),
        java("junit5-assert-calls", r"(^|[^.\w])Assert\.", "${1}Assertions.", "Assert → Assertions"),
    ]
}

fn log4j_to_slf4j() -> Vec<Rule> {
    let c = ConversionType::Log4jToSlf4j;
    vec![
        rewrite(
            "slf4j-import-logger",
            on(c),
            FileKind::JavaSource,
            r"import org\.apache\.log4j\.Logger;",
            "import org.slf4j.Logger;\nimport org.slf4j.LoggerFactory;",
            "Log4j → SLF4J imports",
        ),
        rewrite(
            "slf4j-logger-factory",
            on(c),
            FileKind::JavaSource,
            r"\bLogger\.getLogger\s*\(",
            "LoggerFactory.getLogger(",
            "Logger.getLogger() → LoggerFactory.getLogger()",
        ),
    ]
}

pub fn get_framework_rules() -> Vec<Rule> {
    let mut rules = javax_to_jakarta();
    rules.extend(jakarta_to_javax());
    rules.extend(spring_boot_2_to_3());
    rules.extend(junit_4_to_5());
    rules.extend(log4j_to_slf4j());
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Selector;
    use crate::infrastructure::rewriter::{RewriteContext, apply_rule};

    fn run_pass(conversion: ConversionType, kind: FileKind, src: &str) -> String {
        let ctx = RewriteContext::new(8, 17);
        let mut content = src.to_string();
        for rule in get_framework_rules() {
            if !rule.fires_in(Selector::Conversion(conversion), 8, 17) {
                continue;
            }
            let Rule::Rewrite(rw) = rule else { continue };
            if rw.file_kind != kind {
                continue;
            }
            if let Some(out) = apply_rule(&rw, &content, &ctx).unwrap() {
                content = out.content;
            }
        }
        content
    }

    #[test]
    fn test_junit_annotations_do_not_collide() {
        let src = "import org.junit.Before;\nimport org.junit.BeforeClass;\n@BeforeClass static void a() {}\n@Before void b() {}\n";
        let out = run_pass(ConversionType::Junit4To5, FileKind::JavaSource, src);
        assert_eq!(
            out,
            "import org.junit.jupiter.api.BeforeEach;\nimport org.junit.jupiter.api.BeforeAll;\n@BeforeAll static void a() {}\n@BeforeEach void b() {}\n"
        );
        assert_eq!(run_pass(ConversionType::Junit4To5, FileKind::JavaSource, &out), out);
    }

    #[test]
    fn test_assert_calls_keep_qualified_names() {
        let src = "Assert.assertTrue(x);\norg.junit.Assert.fail();\n";
        let out = run_pass(ConversionType::Junit4To5, FileKind::JavaSource, src);
        assert!(out.starts_with("Assertions.assertTrue(x);"));
        assert!(out.contains("org.junit.Assert.fail();"));
    }

    #[test]
    fn test_jakarta_round_trip_is_symmetric() {
        let src = "import javax.persistence.Entity;\n";
        let jakarta = run_pass(ConversionType::JavaxToJakarta, FileKind::JavaSource, src);
        assert_eq!(jakarta, "import jakarta.persistence.Entity;\n");
        let back = run_pass(ConversionType::JakartaToJavax, FileKind::JavaSource, &jakarta);
        assert_eq!(back, src);
    }

    #[test]
    fn test_log4j_logger_becomes_slf4j() {
        let src = "import org.apache.log4j.Logger;\nprivate static final Logger LOG = Logger.getLogger(A.class);\n";
        let out = run_pass(ConversionType::Log4jToSlf4j, FileKind::JavaSource, src);
        assert!(out.contains("import org.slf4j.LoggerFactory;"));
        assert!(out.contains("LoggerFactory.getLogger(A.class)"));
    }

    #[test]
    fn test_spring_security_matchers() {
        let src = "http.authorizeRequests().antMatchers(\"/a\").permitAll().mvcMatchers(\"/b\");";
        let out = run_pass(ConversionType::SpringBoot2To3, FileKind::JavaSource, src);
        assert_eq!(
            out,
            "http.authorizeRequests().requestMatchers(\"/a\").permitAll().requestMatchers(\"/b\");"
        );
    }
}
