//! Data Binding Resolver.
//!
//! Maps a component to rows (or a single value) in the data tree. Lookups
//! are pure: nothing is cached between components and absent data always
//! resolves to an empty sequence or empty text.

use crate::component::{Component, DataSource, Parameter};
use webgen_source::{DataNode, DataTree};
use webgen_types::normalize_id;

/// Context element consulted after the artifact's own context.
pub const DEFAULT_DATA_CONTEXT: &str = "default";

/// The `(context, name)` pairs tried in order for an ambient lookup.
pub fn search_paths(artifact_title: &str, component_id: &str, component_title: &str) -> Vec<(String, String)> {
    let artifact_context = normalize_id(artifact_title);
    let title_id = normalize_id(component_title);
    let by_title = !component_title.is_empty() && title_id != component_id;

    let mut paths = vec![(artifact_context.clone(), component_id.to_string())];
    if by_title {
        paths.push((artifact_context, title_id.clone()));
    }
    paths.push((DEFAULT_DATA_CONTEXT.to_string(), component_id.to_string()));
    if by_title {
        paths.push((DEFAULT_DATA_CONTEXT.to_string(), title_id));
    }
    paths
}

/// Rows bound to a component.
///
/// An embedded tree wins over everything: its rows are the children of its
/// document element. Otherwise the ambient tree is searched along
/// [`search_paths`], stopping at the first path that yields rows.
pub fn resolve_rows<'t>(
    ambient: Option<&'t DataTree>,
    component: &'t Component,
    artifact_title: &str,
    component_id: &str,
) -> Vec<DataNode<'t>> {
    match component.data() {
        DataSource::Embedded(tree) => tree
            .document_element()
            .map(|root| root.element_children().collect())
            .unwrap_or_default(),
        DataSource::Ambient => {
            let Some(tree) = ambient else {
                return Vec::new();
            };
            for (context, name) in search_paths(artifact_title, component_id, component.title()) {
                let rows = tree.rows_at(Some(&context), &name);
                log::debug!("Rows at '{}/{}': {}", context, name, rows.len());
                if !rows.is_empty() {
                    return rows;
                }
            }
            Vec::new()
        }
    }
}

/// A single value bound to `data_id`, with the same precedence as rows.
pub fn resolve_scalar(
    ambient: Option<&DataTree>,
    component: &Component,
    artifact_title: &str,
    data_id: &str,
) -> String {
    let found = match component.data() {
        DataSource::Embedded(tree) => tree.text_at(None, data_id),
        DataSource::Ambient => ambient.and_then(|tree| {
            search_paths(artifact_title, data_id, component.title())
                .into_iter()
                .find_map(|(context, name)| tree.text_at(Some(&context), &name))
        }),
    };
    found.unwrap_or_default()
}

/// The field nodes of one row, one per parameter.
///
/// Without parameters the row's first child stands in for the single field.
/// A parameter with no matching child yields `None`.
pub fn row_fields<'t>(row: DataNode<'t>, parameters: &[Parameter]) -> Vec<Option<DataNode<'t>>> {
    if parameters.is_empty() {
        return vec![row.first_child()];
    }
    parameters
        .iter()
        .map(|p| row.child_element(&normalize_id(p.name())))
        .collect()
}

pub fn field_text(field: Option<DataNode<'_>>) -> String {
    field.map(|f| f.text_content()).unwrap_or_default()
}

// Text nodes answer attribute and element lookups through their parent.
fn owning_element(field: Option<DataNode<'_>>) -> Option<DataNode<'_>> {
    let field = field?;
    if field.is_text() { field.parent() } else { Some(field) }
}

/// Value of attribute `name` on the field, or empty text.
pub fn attribute_of(field: Option<DataNode<'_>>, name: &str) -> String {
    owning_element(field)
        .and_then(|e| e.attribute(name))
        .unwrap_or_default()
        .to_string()
}

/// Text of the field's child element `name`, or empty text.
pub fn element_of(field: Option<DataNode<'_>>, name: &str) -> String {
    owning_element(field)
        .and_then(|e| e.child_element(name))
        .map(|e| e.text_content())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentParser;
    use std::sync::Arc;

    const DATA: &str = r#"<data>
<main_page>
  <_table><row><cola>A1</cola><colb>B1</colb></row><row><cola>A2</cola><colb>B2</colb></row></_table>
  <visitors>57</visitors>
</main_page>
<default>
  <prices><row><item currency="EUR">10<note>net</note></item></row></prices>
  <visitors>3</visitors>
  <motd>Welcome</motd>
</default>
</data>"#;

    fn tree() -> DataTree {
        DataTree::parse(DATA).unwrap()
    }

    fn component(line: &str) -> Component {
        ComponentParser::new().parse(line).unwrap()
    }

    #[test]
    fn test_search_paths_order() {
        let paths = search_paths("Main page", "price_list", "Prices");
        let paths: Vec<(&str, &str)> = paths.iter().map(|(c, n)| (c.as_str(), n.as_str())).collect();
        assert_eq!(
            paths,
            vec![
                ("main_page", "price_list"),
                ("main_page", "prices"),
                ("default", "price_list"),
                ("default", "prices"),
            ]
        );
    }

    #[test]
    fn test_search_paths_skip_title_when_it_is_the_id() {
        assert_eq!(search_paths("Main page", "prices", "Prices").len(), 2);
        assert_eq!(search_paths("Main page", "_table", "").len(), 2);
    }

    #[test]
    fn test_rows_under_artifact_context() {
        let tree = tree();
        let table = component("{table|ColA|ColB}");
        let rows = resolve_rows(Some(&tree), &table, "Main page", "_table");
        assert_eq!(rows.len(), 2);
        let fields = row_fields(rows[1], table.parameters());
        assert_eq!(field_text(fields[0]), "A2");
        assert_eq!(field_text(fields[1]), "B2");
    }

    #[test]
    fn test_rows_fall_back_to_default_context() {
        let tree = tree();
        let prices = component("{table Prices|Item}");
        let rows = resolve_rows(Some(&tree), &prices, "Main page", "prices_1");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_no_data_yields_no_rows() {
        let table = component("{table|ColA}");
        assert!(resolve_rows(None, &table, "Main page", "_table").is_empty());
        let tree = tree();
        assert!(resolve_rows(Some(&tree), &table, "Other page", "_missing").is_empty());
    }

    #[test]
    fn test_embedded_tree_overrides_ambient() {
        let ambient = tree();
        let embedded = DataTree::parse("<list><a>1</a><b>2</b><c>3</c></list>").unwrap();
        let table = component("{table|ColA}").with_data(DataSource::Embedded(Arc::new(embedded)));
        let rows = resolve_rows(Some(&ambient), &table, "Main page", "_table");
        let names: Vec<&str> = rows.iter().filter_map(|r| r.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_field_is_empty() {
        let tree = tree();
        let table = component("{table|ColA|Missing|ColB}");
        let rows = resolve_rows(Some(&tree), &table, "Main page", "_table");
        let fields = row_fields(rows[0], table.parameters());
        let texts: Vec<String> = fields.into_iter().map(field_text).collect();
        assert_eq!(texts, vec!["A1", "", "B1"]);
    }

    #[test]
    fn test_field_without_parameters_is_first_child() {
        let tree = tree();
        let list = component("{list Prices}");
        let rows = resolve_rows(Some(&tree), &list, "Main page", "prices");
        let fields = row_fields(rows[0], list.parameters());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].and_then(|f| f.name()), Some("item"));
    }

    #[test]
    fn test_attribute_and_element_lookups() {
        let tree = tree();
        let list = component("{list Prices}");
        let rows = resolve_rows(Some(&tree), &list, "Main page", "prices");
        let item = rows[0].first_child();
        assert_eq!(attribute_of(item, "currency"), "EUR");
        assert_eq!(attribute_of(item, "missing"), "");
        assert_eq!(element_of(item, "note"), "net");
        assert_eq!(element_of(item, "missing"), "");

        let text = item.and_then(|i| i.first_child());
        assert_eq!(attribute_of(text, "currency"), "EUR");
        assert_eq!(attribute_of(None, "currency"), "");
    }

    #[test]
    fn test_scalar_precedence() {
        let tree = tree();
        let text = component("{text Visitors}");
        assert_eq!(resolve_scalar(Some(&tree), &text, "Main page", "visitors"), "57");
        assert_eq!(resolve_scalar(Some(&tree), &text, "Other page", "visitors"), "3");
        let motd = component("{text Motd}");
        assert_eq!(resolve_scalar(Some(&tree), &motd, "Main page", "motd"), "Welcome");
        let nothing = component("{text Nothing}");
        assert_eq!(resolve_scalar(Some(&tree), &nothing, "Main page", "nothing"), "");
        assert_eq!(resolve_scalar(None, &motd, "Main page", "motd"), "");
    }
}
