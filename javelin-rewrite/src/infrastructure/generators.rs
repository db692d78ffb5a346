//! Build file synthesis for build tool swaps

use javelin_deps::{GradleParser, ManifestDependency, ManifestParser, MavenParser, ParseError};

pub const SETTINGS_GRADLE: &str = "settings.gradle";
pub const PROJECT_NAME: &str = "migrated-project";
pub const PROJECT_GROUP: &str = "com.example";
pub const PROJECT_VERSION: &str = "1.0.0-SNAPSHOT";

const SPRING_BOOT_VERSION: &str = "3.2.0";
const DEPENDENCY_MANAGEMENT_VERSION: &str = "1.1.4";

/// A file a generator wants written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: &'static str,
    pub content: String,
}

fn gradle_declaration(dep: &ManifestDependency) -> String {
    let configuration = if dep.is_test() {
        "testImplementation"
    } else {
        "implementation"
    };
    match dep.version.as_deref() {
        Some(version) if !version.starts_with("${") => format!(
            "    {configuration} '{}:{}:{}'\n",
            dep.group_id, dep.artifact_id, version
        ),
        _ => format!("    {configuration} '{}:{}'\n", dep.group_id, dep.artifact_id),
    }
}

/// `build.gradle` and `settings.gradle` equivalent to a pom
pub fn gradle_from_maven(pom: &str, target: u32) -> Result<Vec<GeneratedFile>, ParseError> {
    let manifest = MavenParser::new().parse(pom)?;
    let uses_spring_boot = pom.contains("spring-boot");

    let mut build = String::from("plugins {\n    id 'java'\n");
    if uses_spring_boot {
        build.push_str(&format!(
            "    id 'org.springframework.boot' version '{SPRING_BOOT_VERSION}'\n    id 'io.spring.dependency-management' version '{DEPENDENCY_MANAGEMENT_VERSION}'\n"
        ));
    }
    build.push_str(&format!(
        "}}\n\ngroup = '{PROJECT_GROUP}'\nversion = '{PROJECT_VERSION}'\n\njava {{\n    sourceCompatibility = '{target}'\n}}\n\nrepositories {{\n    mavenCentral()\n}}\n\ndependencies {{\n"
    ));
    for dep in &manifest.dependencies {
        build.push_str(&gradle_declaration(dep));
    }
    build.push_str("}\n\ntest {\n    useJUnitPlatform()\n}\n");

    Ok(vec![
        GeneratedFile {
            path: "build.gradle",
            content: build,
        },
        GeneratedFile {
            path: SETTINGS_GRADLE,
            content: format!("rootProject.name = '{PROJECT_NAME}'\n"),
        },
    ])
}

fn maven_dependency(dep: &ManifestDependency) -> String {
    let mut xml = format!(
        "        <dependency>\n            <groupId>{}</groupId>\n            <artifactId>{}</artifactId>\n",
        dep.group_id, dep.artifact_id
    );
    if let Some(version) = &dep.version {
        xml.push_str(&format!("            <version>{version}</version>\n"));
    }
    if dep.is_test() {
        xml.push_str("            <scope>test</scope>\n");
    }
    xml.push_str("        </dependency>\n");
    xml
}

/// `pom.xml` equivalent to a Gradle build script
pub fn maven_from_gradle(script: &str, target: u32) -> Result<Vec<GeneratedFile>, ParseError> {
    let manifest = GradleParser::new().parse(script)?;
    let dependencies: String = manifest.dependencies.iter().map(maven_dependency).collect();

    let pom = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 https://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>

    <groupId>{PROJECT_GROUP}</groupId>
    <artifactId>{PROJECT_NAME}</artifactId>
    <version>{PROJECT_VERSION}</version>

    <properties>
        <java.version>{target}</java.version>
        <maven.compiler.source>{target}</maven.compiler.source>
        <maven.compiler.target>{target}</maven.compiler.target>
        <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
    </properties>

    <dependencies>
{dependencies}    </dependencies>
</project>
"#
    );

    Ok(vec![GeneratedFile {
        path: "pom.xml",
        content: pom,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<project>
  <parent><groupId>org.springframework.boot</groupId><artifactId>spring-boot-starter-parent</artifactId><version>3.1.0</version></parent>
  <dependencies>
    <dependency><groupId>org.springframework.boot</groupId><artifactId>spring-boot-starter-web</artifactId></dependency>
    <dependency><groupId>junit</groupId><artifactId>junit</artifactId><version>4.13.2</version><scope>test</scope></dependency>
  </dependencies>
</project>"#;

    #[test]
    fn test_gradle_from_spring_boot_pom() {
        let files = gradle_from_maven(POM, 17).unwrap();
        let build = &files[0].content;
        assert!(build.contains("id 'org.springframework.boot' version '3.2.0'"));
        assert!(build.contains("sourceCompatibility = '17'"));
        assert!(build.contains("    implementation 'org.springframework.boot:spring-boot-starter-web'\n"));
        assert!(build.contains("    testImplementation 'junit:junit:4.13.2'\n"));
        assert_eq!(files[1].content, "rootProject.name = 'migrated-project'\n");
    }

    #[test]
    fn test_pom_from_gradle_round_trips_through_parser() {
        let script = "dependencies {\n    implementation 'com.google.guava:guava:33.0.0-jre'\n    testImplementation 'org.junit.jupiter:junit-jupiter:5.10.0'\n}\n";
        let files = maven_from_gradle(script, 21).unwrap();
        let parsed = MavenParser::new().parse(&files[0].content).unwrap();
        assert_eq!(parsed.declared_java_version, Some(21));
        assert_eq!(parsed.dependencies.len(), 2);
        assert!(parsed.dependencies[1].is_test());
    }

    #[test]
    fn test_malformed_pom_is_an_error() {
        assert!(gradle_from_maven("<project><dependencies></project>", 17).is_err());
    }
}
