//! Detection rules feeding the issue list of a job

use javelin_core::{ConversionType, Severity};

use super::detect;
use crate::domain::{DetectionRule, FileKind, MatchMode, Rule, Trigger, VersionPredicate};

fn java_version(versions: VersionPredicate) -> Vec<Trigger> {
    vec![Trigger::java_version(versions)]
}

fn deprecated_api_rules() -> Vec<Rule> {
    let always = || java_version(VersionPredicate::Always);
    let jv = ConversionType::JavaVersion;
    let mut rules: Vec<Rule> = ["Integer", "Long", "Double", "Boolean"]
        .into_iter()
        .map(|wrapper| {
            detect(
                &format!("detect-new-{}", wrapper.to_lowercase()),
                jv,
                always(),
                &format!(r"new {wrapper}\s*\("),
                Severity::Error,
                "Deprecated Method",
                &format!("new {wrapper}() is deprecated - use {wrapper}.valueOf()"),
            )
        })
        .collect();

    rules.extend([
        detect(
            "detect-class-new-instance",
            jv,
            always(),
            r"\w\.newInstance\s*\(\s*\)",
            Severity::Error,
            "Deprecated Method",
            "Class.newInstance() is deprecated - use getDeclaredConstructor().newInstance()",
        ),
        detect(
            "detect-util-date",
            jv,
            always(),
            r"new Date\s*\(\s*\)",
            Severity::Warning,
            "Deprecated API",
            "Consider using java.time.LocalDateTime instead of java.util.Date",
        ),
        detect(
            "detect-simple-date-format",
            jv,
            always(),
            r"SimpleDateFormat",
            Severity::Warning,
            "Thread Safety",
            "SimpleDateFormat is not thread-safe - consider DateTimeFormatter",
        ),
        detect(
            "detect-raw-list",
            jv,
            always(),
            r"List\s+\w+\s*=",
            Severity::Warning,
            "Type Safety",
            "Raw type usage detected - use generics List<T>",
        ),
        detect(
            "detect-raw-map",
            jv,
            always(),
            r"Map\s+\w+\s*=",
            Severity::Warning,
            "Type Safety",
            "Raw type usage detected - use generics Map<K,V>",
        ),
        detect(
            "detect-sun-misc",
            jv,
            java_version(VersionPredicate::TargetAtLeast(9)),
            r"sun\.misc\.",
            Severity::Error,
            "Removed Class",
            "sun.misc.* classes removed in Java 9+ - use standard alternatives",
        ),
    ]);
    rules
}

fn jakarta_rules() -> Vec<Rule> {
    // Selected directly, or implied by a Java 17+ upgrade
    let triggers = || {
        vec![
            Trigger::conversion(ConversionType::JavaxToJakarta),
            Trigger::java_version(VersionPredicate::TargetAtLeast(17)),
        ]
    };
    let group = ConversionType::JavaxToJakarta;
    let package = |id: &str, pkg: &str, severity: Severity, message: &str| {
        detect(
            id,
            group,
            triggers(),
            &format!(r"import javax\.{}\.", pkg.replace('.', r"\.")),
            severity,
            "Package Migration",
            message,
        )
    };

    vec![
        package(
            "detect-javax-servlet",
            "servlet",
            Severity::Error,
            "javax.servlet.* → jakarta.servlet.* (required for Java 17+/Spring Boot 3)",
        ),
        package(
            "detect-javax-persistence",
            "persistence",
            Severity::Error,
            "javax.persistence.* → jakarta.persistence.* (required for Java 17+)",
        ),
        package(
            "detect-javax-validation",
            "validation",
            Severity::Error,
            "javax.validation.* → jakarta.validation.* (required for Java 17+)",
        ),
        package(
            "detect-javax-annotation",
            "annotation",
            Severity::Warning,
            "javax.annotation.* → jakarta.annotation.* (recommended for Java 17+)",
        ),
        package(
            "detect-javax-inject",
            "inject",
            Severity::Error,
            "javax.inject.* → jakarta.inject.* (required for Jakarta EE)",
        ),
        package(
            "detect-javax-ws-rs",
            "ws.rs",
            Severity::Error,
            "javax.ws.rs.* → jakarta.ws.rs.* (required for JAX-RS 3.x)",
        ),
    ]
}

fn spring_security_rules() -> Vec<Rule> {
    let group = ConversionType::SpringBoot2To3;
    let triggers = || vec![Trigger::conversion(group)];
    vec![
        detect(
            "detect-web-security-configurer-adapter",
            group,
            triggers(),
            r"WebSecurityConfigurerAdapter",
            Severity::Error,
            "Security Config",
            "WebSecurityConfigurerAdapter removed in Spring Security 6 - use SecurityFilterChain",
        ),
        detect(
            "detect-enable-global-method-security",
            group,
            triggers(),
            r"@EnableGlobalMethodSecurity",
            Severity::Warning,
            "Security Config",
            "@EnableGlobalMethodSecurity deprecated - use @EnableMethodSecurity",
        ),
        detect(
            "detect-ant-matchers",
            group,
            triggers(),
            r"antMatchers",
            Severity::Error,
            "Security Config",
            "antMatchers() removed - use requestMatchers()",
        ),
        detect(
            "detect-mvc-matchers",
            group,
            triggers(),
            r"mvcMatchers",
            Severity::Error,
            "Security Config",
            "mvcMatchers() removed - use requestMatchers()",
        ),
    ]
}

fn junit_rules() -> Vec<Rule> {
    let group = ConversionType::Junit4To5;
    let triggers = || vec![Trigger::conversion(group)];
    let import = |id: &str, pattern: &str, severity: Severity, message: &str| {
        detect(id, group, triggers(), pattern, severity, "Import Change", message)
    };
    vec![
        import(
            "detect-junit4-test",
            r"import org\.junit\.Test;",
            Severity::Error,
            "org.junit.Test → org.junit.jupiter.api.Test",
        ),
        import(
            "detect-junit4-before",
            r"import org\.junit\.Before;",
            Severity::Warning,
            "@Before → @BeforeEach (JUnit 5)",
        ),
        import(
            "detect-junit4-after",
            r"import org\.junit\.After;",
            Severity::Warning,
            "@After → @AfterEach (JUnit 5)",
        ),
        import(
            "detect-junit4-before-class",
            r"import org\.junit\.BeforeClass;",
            Severity::Warning,
            "@BeforeClass → @BeforeAll (JUnit 5)",
        ),
        import(
            "detect-junit4-ignore",
            r"import org\.junit\.Ignore;",
            Severity::Warning,
            "@Ignore → @Disabled (JUnit 5)",
        ),
        detect(
            "detect-junit4-run-with",
            group,
            triggers(),
            r"@RunWith",
            Severity::Warning,
            "Annotation Change",
            "@RunWith → @ExtendWith (JUnit 5)",
        ),
    ]
}

fn log4j_rules() -> Vec<Rule> {
    let group = ConversionType::Log4jToSlf4j;
    vec![
        detect(
            "detect-log4j-import",
            group,
            vec![Trigger::conversion(group)],
            r"import org\.apache\.log4j\.",
            Severity::Error,
            "Import Change",
            "org.apache.log4j.* → org.slf4j.* (SLF4J facade)",
        ),
        detect(
            "detect-log4j-get-logger",
            group,
            vec![Trigger::conversion(group)],
            r"Logger\.getLogger\s*\(",
            Severity::Error,
            "Logger Factory",
            "Logger.getLogger() → LoggerFactory.getLogger()",
        ),
    ]
}

/// Spring Boot 2.x pins in the root pom: a line naming spring-boot next to a `<version>2.x`.
/// Reported on every such line regardless of selection.
fn manifest_rules() -> Vec<Rule> {
    vec![Rule::Detect(DetectionRule {
        id: "detect-spring-boot-2-pin".to_string(),
        group: ConversionType::JavaVersion,
        triggers: vec![Trigger::any()],
        pattern: r"(?i:spring-boot).*<version>2\.[0-9]|<version>2\.[0-9].*(?i:spring-boot)".to_string(),
        file_kind: FileKind::MavenManifest,
        match_mode: MatchMode::EveryLine,
        severity: Severity::Warning,
        category: "Dependency Update".to_string(),
        message: "Spring Boot 2.x should be upgraded to 3.x for Java 17+".to_string(),
        suggested_fix: Some("<version>3.2.0</version>".to_string()),
    })]
}

/// Detection rules in scan order
pub fn get_detection_rules() -> Vec<Rule> {
    let mut rules = deprecated_api_rules();
    rules.extend(jakarta_rules());
    rules.extend(spring_security_rules());
    rules.extend(junit_rules());
    rules.extend(log4j_rules());
    rules.extend(manifest_rules());
    rules
}
