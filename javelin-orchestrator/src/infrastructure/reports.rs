//! Downloadable artifacts for a job: an HTML report and a JMeter test plan

use std::fmt::Write as _;

use javelin_rewrite::ApiEndpoint;
use quick_xml::escape::escape;

use crate::domain::entities::MigrationJob;
use crate::domain::value_objects::JobStatus;

/// Log lines included in the HTML report
pub const REPORT_LOG_LINES: usize = 50;

const SAMPLE_ENDPOINTS: [(&str, &str); 4] = [
    ("GET", "/api/health"),
    ("GET", "/api/users"),
    ("POST", "/api/users"),
    ("GET", "/api/products"),
];

fn status_color(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Completed => "#48bb78",
        JobStatus::Failed => "#f56565",
        JobStatus::Cancelled | JobStatus::Pending => "#6b7280",
        _ => "#ed8936",
    }
}

pub fn render_html_report(job: &MigrationJob) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Java Migration Report - {id}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        .header {{ background: #667eea; color: white; padding: 20px; border-radius: 8px; }}
        .section {{ margin: 20px 0; padding: 20px; border: 1px solid #ddd; border-radius: 8px; }}
        .metric {{ display: inline-block; margin: 10px; padding: 10px; background: #f0f0f0; border-radius: 4px; }}
        .logs {{ background: #f5f5f5; padding: 10px; border-radius: 4px; font-family: monospace; }}
    </style>
</head>
<body>
    <div class="header">
        <h1>Java Migration Report</h1>
        <p>Job ID: {id}</p>
        <p>Status: <span style="color: {color}">{status}</span></p>
    </div>
    <div class="section">
        <h2>Migration Summary</h2>
        <div class="metric">Source: {source}</div>
        <div class="metric">Target: {target}</div>
        <div class="metric">Java: {from} → {to}</div>
        <div class="metric">Files Modified: {files}</div>
        <div class="metric">Issues Fixed: {fixed}</div>
    </div>
"#,
        id = job.job_id,
        color = status_color(job.status),
        status = job.status.to_string().to_uppercase(),
        source = escape(&job.source_repo),
        target = escape(job.target_repo.as_deref().unwrap_or("N/A")),
        from = escape(&job.source_java_version),
        to = escape(&job.target_java_version),
        files = job.files_modified,
        fixed = job.issues_fixed,
    );

    if let Some(error) = &job.error_message {
        let _ = writeln!(
            html,
            "    <div class=\"section\"><h2>Error</h2><p>{}</p></div>",
            escape(error)
        );
    }

    html.push_str("    <div class=\"section\">\n        <h2>Migration Logs</h2>\n        <div class=\"logs\">\n");
    let skip = job.migration_log.len().saturating_sub(REPORT_LOG_LINES);
    for line in job.migration_log.iter().skip(skip) {
        let _ = writeln!(html, "            <div>{}</div>", escape(line));
    }
    html.push_str("        </div>\n    </div>\n</body>\n</html>\n");
    html
}

/// Endpoints to load-test: the detected ones, or a fixed sample set
fn plan_endpoints(job: &MigrationJob) -> Vec<(String, String)> {
    if job.api_endpoints.is_empty() {
        SAMPLE_ENDPOINTS
            .iter()
            .map(|(method, path)| (method.to_string(), path.to_string()))
            .collect()
    } else {
        job.api_endpoints
            .iter()
            .map(|ApiEndpoint { method, path, .. }| (method.to_uppercase(), path.clone()))
            .collect()
    }
}

fn argument(name: &str, value: &str) -> String {
    format!(
        r#"          <elementProp name="{name}" elementType="Argument">
            <stringProp name="Argument.name">{name}</stringProp>
            <stringProp name="Argument.value">{value}</stringProp>
            <stringProp name="Argument.metadata">=</stringProp>
          </elementProp>
"#
    )
}

fn sampler(method: &str, path: &str) -> String {
    let method = escape(method);
    let path = escape(path);
    format!(
        r#"        <HTTPSamplerProxy guiclass="HttpTestSampleGui" testclass="HTTPSamplerProxy" testname="{method} {path}" enabled="true">
          <elementProp name="HTTPsampler.Arguments" elementType="Arguments" guiclass="HTTPArgumentsPanel" testclass="Arguments" testname="User Defined Variables" enabled="true">
            <collectionProp name="Arguments.arguments"/>
          </elementProp>
          <stringProp name="HTTPSampler.domain">${{__P(BASE_URL,localhost)}}</stringProp>
          <stringProp name="HTTPSampler.port">8080</stringProp>
          <stringProp name="HTTPSampler.protocol">http</stringProp>
          <stringProp name="HTTPSampler.path">{path}</stringProp>
          <stringProp name="HTTPSampler.method">{method}</stringProp>
          <boolProp name="HTTPSampler.follow_redirects">true</boolProp>
          <boolProp name="HTTPSampler.use_keepalive">true</boolProp>
        </HTTPSamplerProxy>
        <hashTree>
          <ResponseAssertion guiclass="AssertionGui" testclass="ResponseAssertion" testname="Response Code Assertion" enabled="true">
            <collectionProp name="Asserion.test_strings">
              <stringProp name="51751">200</stringProp>
            </collectionProp>
            <stringProp name="Assertion.test_field">Assertion.response_code</stringProp>
            <boolProp name="Assertion.assume_success">false</boolProp>
            <intProp name="Assertion.test_type">1</intProp>
          </ResponseAssertion>
          <hashTree/>
        </hashTree>
"#
    )
}

pub fn render_jmeter_plan(job: &MigrationJob) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<jmeterTestPlan version="1.2" properties="5.0" jmeter="5.6.3">
  <hashTree>
    <TestPlan guiclass="TestPlanGui" testclass="TestPlan" testname="Migration API Tests - {id}" enabled="true">
      <stringProp name="TestPlan.comments">Generated JMeter test plan for migrated APIs</stringProp>
      <boolProp name="TestPlan.functional_mode">false</boolProp>
      <boolProp name="TestPlan.serialize_threadgroups">false</boolProp>
      <elementProp name="TestPlan.user_defined_variables" elementType="Arguments" guiclass="ArgumentsPanel" testclass="Arguments" testname="User Defined Variables" enabled="true">
        <collectionProp name="Arguments.arguments">
"#,
        id = job.job_id
    );
    for (name, value) in [
        ("BASE_URL", "http://localhost:8080"),
        ("THREAD_COUNT", "10"),
        ("RAMP_UP_TIME", "30"),
        ("LOOP_COUNT", "5"),
    ] {
        xml.push_str(&argument(name, value));
    }
    xml.push_str(
        r#"        </collectionProp>
      </elementProp>
    </TestPlan>
    <hashTree>
      <ThreadGroup guiclass="ThreadGroupGui" testclass="ThreadGroup" testname="API Test Thread Group" enabled="true">
        <stringProp name="ThreadGroup.on_sample_error">continue</stringProp>
        <elementProp name="ThreadGroup.main_controller" elementType="LoopController" guiclass="LoopControlGui" testclass="LoopController" testname="Loop Controller" enabled="true">
          <boolProp name="LoopController.continue_forever">false</boolProp>
          <stringProp name="LoopController.loops">${LOOP_COUNT}</stringProp>
        </elementProp>
        <stringProp name="ThreadGroup.num_threads">${THREAD_COUNT}</stringProp>
        <stringProp name="ThreadGroup.ramp_time">${RAMP_UP_TIME}</stringProp>
        <boolProp name="ThreadGroup.scheduler">false</boolProp>
      </ThreadGroup>
      <hashTree>
        <ConfigTestElement guiclass="HttpDefaultsGui" testclass="ConfigTestElement" testname="HTTP Request Defaults" enabled="true">
          <elementProp name="HTTPsampler.Arguments" elementType="Arguments" guiclass="HTTPArgumentsPanel" testclass="Arguments" testname="User Defined Variables" enabled="true">
            <collectionProp name="Arguments.arguments"/>
          </elementProp>
          <stringProp name="HTTPSampler.connect_timeout">60000</stringProp>
          <stringProp name="HTTPSampler.response_timeout">60000</stringProp>
        </ConfigTestElement>
        <hashTree/>
        <HeaderManager guiclass="HeaderPanel" testclass="HeaderManager" testname="HTTP Header Manager" enabled="true">
          <collectionProp name="HeaderManager.headers">
            <elementProp name="" elementType="Header">
              <stringProp name="Header.name">Content-Type</stringProp>
              <stringProp name="Header.value">application/json</stringProp>
            </elementProp>
          </collectionProp>
        </HeaderManager>
        <hashTree/>
"#,
    );
    for (method, path) in plan_endpoints(job) {
        xml.push_str(&sampler(&method, &path));
    }
    xml.push_str("      </hashTree>\n    </hashTree>\n  </hashTree>\n</jmeterTestPlan>\n");
    xml
}
