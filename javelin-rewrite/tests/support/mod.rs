//! Project fixtures for javelin-rewrite integration tests

use std::path::Path;
use tempfile::TempDir;

/// Creates a temporary project holding `files` (relative path, content)
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for (relative, content) in files {
        write(dir.path(), relative, content.as_bytes());
    }
    dir
}

pub fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create fixture dirs");
    }
    std::fs::write(path, content).expect("write fixture file");
}

pub fn read(root: &Path, relative: &str) -> String {
    std::fs::read_to_string(root.join(relative)).expect("read fixture file")
}

pub const SERVLET_APP: &str = r#"package com.example;

import javax.servlet.HttpServlet;

public class App extends HttpServlet {
    public Integer count() {
        return new Integer(5);
    }
}
"#;

pub const JAVA_7_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.example</groupId>
    <artifactId>legacy</artifactId>
    <version>1.0</version>
    <properties>
        <maven.compiler.source>7</maven.compiler.source>
    </properties>
</project>
"#;

pub const SERVLET_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.example</groupId>
    <artifactId>legacy</artifactId>
    <version>1.0</version>
    <properties>
        <maven.compiler.source>8</maven.compiler.source>
        <maven.compiler.target>8</maven.compiler.target>
    </properties>
    <dependencies>
        <dependency>
            <groupId>javax.servlet</groupId>
            <artifactId>javax.servlet-api</artifactId>
            <version>4.0.1</version>
        </dependency>
    </dependencies>
</project>
"#;
