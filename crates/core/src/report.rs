//! Synthetic inputs for the report pass.
//!
//! The report is produced by running the generator again: the bundled
//! report specification renders a table whose rows come from an XML
//! document built here from the finished artifacts.

use crate::artifact::Artifact;
use crate::error::WebGenError;
use std::fmt::Write;
use webgen_types::normalize_id;

pub const DEFAULT_REPORT_TITLE: &str = "WebGen report";
pub const REPORT_SPECIFICATION: &str = "webgen-reporting-specification";
pub const REPORT_SPECIFICATION_EXTENSION: &str = ".wiki";

/// Id the untitled `{table}` of the report specification is issued.
const REPORT_TABLE: &str = "_table";

fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

fn link(artifact: &Artifact) -> String {
    format!("<a href=\"{}\">{}</a>", artifact.file_name(), artifact.title())
}

/// XML with one `<artifact>` row per artifact, under
/// `<normalize(report_title)>/_table`.
pub fn report_data(report_title: &str, artifacts: &[Artifact]) -> Result<String, WebGenError> {
    let context = normalize_id(report_title);
    if !context.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err(WebGenError::Config(format!(
            "Report title '{report_title}' must start with a letter"
        )));
    }

    let mut xml = format!("<{context}>\n<{REPORT_TABLE}>\n");
    for artifact in artifacts {
        // writing to a String cannot fail
        let _ = write!(
            xml,
            "<artifact>\n<title>{}</title>\n<data_inputs>{}</data_inputs>\n<data_outputs>{}</data_outputs>\n</artifact>\n",
            cdata(&link(artifact)),
            artifact.data_inputs(),
            artifact.data_outputs()
        );
    }
    let _ = write!(xml, "</{REPORT_TABLE}>\n</{context}>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactBuilder;
    use crate::output::Fragment;
    use webgen_source::DataTree;

    fn artifact(title: &str, inputs: usize, outputs: usize) -> Artifact {
        let mut builder = ArtifactBuilder::new(title, Fragment::leaf(""));
        (0..inputs).for_each(|_| builder.count_input());
        builder.count_outputs(outputs);
        builder.finish()
    }

    #[test]
    fn test_report_rows() {
        let xml = report_data(
            DEFAULT_REPORT_TITLE,
            &[artifact("Main page", 1, 2), artifact("Contact", 3, 0)],
        )
        .unwrap();
        let tree = DataTree::parse(&xml).unwrap();
        let rows = tree.rows_at(Some("webgen_report"), "_table");
        assert_eq!(rows.len(), 2);

        let title = rows[0].child_element("title").unwrap().text_content();
        assert_eq!(title, "<a href=\"main_page.html\">Main page</a>");
        assert_eq!(
            rows[1].child_element("data_inputs").unwrap().text_content(),
            "3"
        );
        assert_eq!(
            rows[1].child_element("data_outputs").unwrap().text_content(),
            "0"
        );
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let xml = report_data("Report", &[artifact("a]]>b", 0, 0)]).unwrap();
        let tree = DataTree::parse(&xml).unwrap();
        let title = tree.rows_at(Some("report"), "_table")[0]
            .child_element("title")
            .unwrap()
            .text_content();
        assert_eq!(title, "<a href=\"ab.html\">a]]>b</a>");
    }

    #[test]
    fn test_title_must_make_an_element_name() {
        let err = report_data("2024 report", &[]).unwrap_err();
        assert!(matches!(err, WebGenError::Config(_)));
    }
}
