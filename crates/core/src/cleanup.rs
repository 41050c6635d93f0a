//! Passes run over finished artifacts.

use crate::artifact::Artifact;
use crate::error::WebGenError;
use crate::expand::LINE_BREAK;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use webgen_traits::{Replacements, TemplateProvider};

static AUTOMENU_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{automenu:([^}]+)\}").expect("automenu pattern is valid"));
static EMPTY_WRAPPER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<legend></legend>|<caption></caption>|<h2[^>]*></h2>").expect("wrapper pattern is valid")
});
static EMPTY_ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s*[a-z\-_]*="""#).expect("attribute pattern is valid"));
static HEAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<head>(.*?)</head>").expect("head pattern is valid"));

/// One `item` instantiation per artifact, linking to it.
pub fn build_menu(
    templates: &dyn TemplateProvider,
    artifacts: &[Artifact],
    item: &str,
) -> Result<String, WebGenError> {
    let mut entries = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let mut replacements = Replacements::new();
        replacements.insert("url".to_string(), artifact.file_name().to_string());
        replacements.insert("title".to_string(), artifact.title().to_string());
        entries.push(templates.get(item, Some(&replacements))?);
    }
    Ok(entries.join(LINE_BREAK))
}

/// Replaces every `${automenu:item}` with a menu of all artifacts.
pub fn apply_automenu(artifacts: &mut [Artifact], templates: &dyn TemplateProvider) -> Result<(), WebGenError> {
    let mut menus: HashMap<String, String> = HashMap::new();
    for index in 0..artifacts.len() {
        let placeholders: Vec<(String, String)> = AUTOMENU_RE
            .captures_iter(artifacts[index].content())
            .map(|caps| (caps[0].to_string(), caps[1].to_string()))
            .unique()
            .collect();
        if placeholders.is_empty() {
            continue;
        }

        let mut content = artifacts[index].content().to_string();
        for (placeholder, item) in placeholders {
            if !menus.contains_key(&item) {
                let menu = build_menu(templates, artifacts, &item)?;
                menus.insert(item.clone(), menu);
            }
            content = content.replace(&placeholder, &menus[&item]);
        }
        artifacts[index].set_content(content);
    }
    Ok(())
}

/// Drops `<legend></legend>`, `<caption></caption>` and `<h2 ...></h2>`.
pub fn remove_empty_wrappers(content: &str) -> String {
    EMPTY_WRAPPER_RE.replace_all(content, "").into_owned()
}

/// Drops attributes whose value is empty, e.g. ` class=""`.
pub fn remove_empty_attributes(content: &str) -> String {
    EMPTY_ATTRIBUTE_RE.replace_all(content, "").into_owned()
}

/// Moves the lines of every additional `<head>` block into the first one.
///
/// Lines already present in the merged head are not repeated.
pub fn merge_head_sections(content: &str) -> String {
    let blocks: Vec<(Range<usize>, &str)> = HEAD_RE
        .captures_iter(content)
        .filter_map(|caps| Some((caps.get(0)?.range(), caps.get(1)?.as_str())))
        .collect();
    if blocks.len() < 2 {
        return content.to_string();
    }

    let mut seen: HashSet<&str> = blocks[0]
        .1
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let extra: Vec<&str> = blocks[1..]
        .iter()
        .flat_map(|(_, inner)| inner.lines().map(str::trim))
        .filter(|l| !l.is_empty() && seen.insert(*l))
        .collect();
    log::debug!("Merging {} head blocks ({} new lines)", blocks.len(), extra.len());

    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for (i, (range, inner)) in blocks.iter().enumerate() {
        out.push_str(&content[last..range.start]);
        if i == 0 {
            out.push_str("<head>");
            out.push_str(inner);
            for line in &extra {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(line);
                out.push('\n');
            }
            out.push_str("</head>");
        }
        last = range.end;
    }
    out.push_str(&content[last..]);
    out
}

/// The per-artifact passes that follow the automenu, in order.
pub fn finalize(content: &str) -> String {
    let content = remove_empty_wrappers(content);
    let content = remove_empty_attributes(&content);
    merge_head_sections(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use webgen_resource::TemplateFinder;

    #[test]
    fn test_empty_wrappers() {
        let html = "<fieldset><legend></legend><caption></caption><h2 id=\"x_heading\"></h2><h2>Kept</h2></fieldset>";
        assert_eq!(remove_empty_wrappers(html), "<fieldset><h2>Kept</h2></fieldset>");
    }

    #[test]
    fn test_empty_attributes() {
        assert_eq!(
            remove_empty_attributes("<th class=\"\">A</th><input value=\"\" data-x=\"1\">"),
            "<th>A</th><input data-x=\"1\">"
        );
    }

    #[test]
    fn test_merge_heads() {
        let html = "<head>\n<title>T</title>\n</head>\n<body>\n<head>\n<title>T</title>\n<link href=\"a.css\">\n</head>\n<p>x</p>\n</body>";
        assert_eq!(
            merge_head_sections(html),
            "<head>\n<title>T</title>\n<link href=\"a.css\">\n</head>\n<body>\n\n<p>x</p>\n</body>"
        );
    }

    #[test]
    fn test_single_head_untouched() {
        let html = "<head><title>T</title></head><body></body>";
        assert_eq!(merge_head_sections(html), html);
    }

    fn artifact(title: &str, content: &str) -> Artifact {
        let builder = crate::artifact::ArtifactBuilder::new(title, crate::output::Fragment::leaf(""));
        let mut artifact = builder.finish();
        artifact.set_content(content.to_string());
        artifact
    }

    #[test]
    fn test_automenu_lists_every_artifact() {
        let mut artifacts = vec![
            artifact("Main page", "<ul>\n${automenu:menu-item}\n</ul>"),
            artifact("Second page", "<p>no menu</p>"),
        ];
        apply_automenu(&mut artifacts, &TemplateFinder::new()).unwrap();
        assert_eq!(
            artifacts[0].content(),
            "<ul>\n<li><a href=\"main_page.html\">Main page</a></li>\n<li><a href=\"second_page.html\">Second page</a></li>\n</ul>"
        );
        assert_eq!(artifacts[1].content(), "<p>no menu</p>");
    }

    #[test]
    fn test_automenu_unknown_item_template() {
        let mut artifacts = vec![artifact("Main page", "${automenu:nope}")];
        let err = apply_automenu(&mut artifacts, &TemplateFinder::new()).unwrap_err();
        assert!(matches!(err, WebGenError::TemplateNotFound { .. }));
    }
}
