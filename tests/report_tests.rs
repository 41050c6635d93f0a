mod common;

use common::fixtures::SPECIFICATION;
use common::{TestResult, fixture_builder, init_logger};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_report_lists_every_artifact() -> TestResult {
    init_logger();
    let generation = fixture_builder(SPECIFICATION)?.build()?.generate()?;
    assert_eq!(generation.artifacts.len(), 2);
    assert_eq!(generation.reports.len(), 1);

    let report = &generation.reports[0];
    assert_eq!(report.title(), "WebGen report");
    assert_eq!(report.file_name(), "webgen_report.html");

    let content = report.content();
    assert!(content.contains("<thead><tr><th>Title</th><th>Data inputs</th><th>Data outputs</th></tr></thead>"));
    assert!(content.contains(
        "<tr><td><a href=\"main_page.html\">Main page</a></td><td>1</td><td>2</td></tr>\n\
         <tr><td><a href=\"contact.html\">Contact</a></td><td>2</td><td>1</td></tr>"
    ));
    Ok(())
}

#[test]
fn test_report_title_is_configurable() -> TestResult {
    init_logger();
    let generation = fixture_builder("== Only")?
        .with_report_title("Site summary")
        .build()?
        .generate()?;
    let report = &generation.reports[0];
    assert_eq!(report.file_name(), "site_summary.html");
    assert!(report.content().contains("<title>Site summary</title>"));
    assert!(report.content().contains("<td><a href=\"only.html\">Only</a></td><td>0</td><td>0</td>"));
    Ok(())
}

#[test]
fn test_generation_is_saved_to_disk() -> TestResult {
    init_logger();
    let dir = tempdir()?;
    let out = dir.path().join("site");
    let generation = fixture_builder(SPECIFICATION)?.build()?.generate()?;
    generation.save_artifacts_to_dir(&out)?;
    generation.save_reports_to_dir(&out)?;

    for artifact in generation.artifacts.iter().chain(&generation.reports) {
        let written = fs::read_to_string(out.join(artifact.file_name()))?;
        assert_eq!(written, artifact.content());
    }
    assert!(out.join("main_page.html").is_file());
    assert!(out.join("contact.html").is_file());
    assert!(out.join("webgen_report.html").is_file());
    Ok(())
}

#[test]
fn test_templates_dir_shadows_bundled_templates() -> TestResult {
    init_logger();
    let dir = tempdir()?;
    fs::write(dir.path().join("label.html"), "<b id=\"${id}\">${title}</b>\n")?;

    let artifacts = fixture_builder("== Page\n{label Hello}\n{section Kept}")?
        .with_templates_dir(dir.path())
        .build()?
        .generate_artifacts()?;
    let content = artifacts[0].content();
    assert!(content.contains("<b id=\"hello\">Hello</b>"));
    assert!(content.contains("<section id=\"kept\""));
    Ok(())
}
