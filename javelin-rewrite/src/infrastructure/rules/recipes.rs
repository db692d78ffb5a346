//! OpenRewrite recipe catalog
//!
//! Recipes are listed for clients and recorded in job logs. Nothing here runs
//! them.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Recipe {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const RECIPES: &[Recipe] = &[
    Recipe {
        id: "org.openrewrite.java.migrate.JavaVersion7to8",
        name: "Java 7 to 8",
        description: "Migrate Java 7 code to Java 8, including lambda expressions and stream API",
    },
    Recipe {
        id: "org.openrewrite.java.migrate.JavaVersion8to11",
        name: "Java 8 to 11",
        description: "Migrate Java 8 code to Java 11, including module system updates",
    },
    Recipe {
        id: "org.openrewrite.java.migrate.JavaVersion11to17",
        name: "Java 11 to 17",
        description: "Migrate Java 11 code to Java 17 with new language features",
    },
    Recipe {
        id: "org.openrewrite.java.migrate.JavaVersion17to21",
        name: "Java 17 to 21",
        description: "Migrate Java 17 code to Java 21 with virtual threads and pattern matching",
    },
    Recipe {
        id: "org.openrewrite.java.migrate.UpgradeToJava17",
        name: "Upgrade to Java 17 (Full)",
        description: "Complete migration to Java 17 LTS from any older version",
    },
    Recipe {
        id: "org.openrewrite.java.migrate.UpgradeToJava21",
        name: "Upgrade to Java 21 (Full)",
        description: "Complete migration to Java 21 LTS from any older version",
    },
    Recipe {
        id: "org.openrewrite.java.spring.boot3.UpgradeSpringBoot_3_0",
        name: "Spring Boot 3.0 Upgrade",
        description: "Migrate Spring Boot 2.x to 3.0",
    },
    Recipe {
        id: "org.openrewrite.java.dependencies.UpgradeDependencyVersion",
        name: "Upgrade Dependencies",
        description: "Upgrade dependency versions to latest compatible versions",
    },
    Recipe {
        id: "org.openrewrite.java.cleanup.CommonStaticAnalysis",
        name: "Static Analysis Fixes",
        description: "Fix common static analysis issues",
    },
    Recipe {
        id: "org.openrewrite.java.cleanup.UnnecessaryThrows",
        name: "Remove Unnecessary Throws",
        description: "Remove unnecessary throws declarations",
    },
];

pub fn recipe_catalog() -> &'static [Recipe] {
    RECIPES
}

/// Recipe ids covering a version path
pub fn recipes_for(source: u32, target: u32) -> Vec<&'static str> {
    let mut recipes = Vec::new();
    if source <= 7 && target >= 8 {
        recipes.push("org.openrewrite.java.migrate.Java8TypeAnnotations");
        recipes.push("org.openrewrite.java.migrate.cobertura.RemoveCoberturaMavenPlugin");
    }
    if source <= 8 && target >= 11 {
        recipes.push("org.openrewrite.java.migrate.javax.AddJaxbDependencies");
        recipes.push("org.openrewrite.java.migrate.javax.AddJaxwsDependencies");
    }
    if source <= 11 && target >= 17 {
        recipes.push("org.openrewrite.java.migrate.UpgradeToJava17");
    }
    if target >= 21 {
        recipes.push("org.openrewrite.java.migrate.UpgradeToJava21");
    }
    recipes.push("org.openrewrite.java.cleanup.CommonStaticAnalysis");
    recipes.push("org.openrewrite.java.format.AutoFormat");
    recipes
}
