//! Artifacts and the per-artifact accumulator that builds them.

use crate::output::{ContextStack, Fragment, NodeIndex, OutputTree};
use serde::Serialize;
use webgen_types::{IdRegistry, normalize_id};

/// Extension of generated pages.
pub const ARTIFACT_EXTENSION: &str = ".html";

/// One generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    title: String,
    content: String,
    file_name: String,
    data_inputs: usize,
    data_outputs: usize,
}

impl Artifact {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn data_inputs(&self) -> usize {
        self.data_inputs
    }

    pub fn data_outputs(&self) -> usize {
        self.data_outputs
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }
}

/// File name of the page generated for `title`.
pub fn artifact_file_name(title: &str) -> String {
    format!("{}{}", normalize_id(title), ARTIFACT_EXTENSION)
}

/// Mutable state while one artifact is generated: its ids, its output
/// tree, the open insertion points and the data counters.
#[derive(Debug)]
pub struct ArtifactBuilder {
    title: String,
    ids: IdRegistry,
    tree: OutputTree,
    contexts: ContextStack,
    data_inputs: usize,
    data_outputs: usize,
}

impl ArtifactBuilder {
    /// Starts an artifact whose page skeleton is `page`.
    pub fn new(title: impl Into<String>, page: Fragment) -> Self {
        let tree = OutputTree::new(page);
        let contexts = ContextStack::new(tree.root());
        Self {
            title: title.into(),
            ids: IdRegistry::new(),
            tree,
            contexts,
            data_inputs: 0,
            data_outputs: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn ids(&self) -> &IdRegistry {
        &self.ids
    }

    pub fn ids_mut(&mut self) -> &mut IdRegistry {
        &mut self.ids
    }

    pub fn data_inputs(&self) -> usize {
        self.data_inputs
    }

    pub fn data_outputs(&self) -> usize {
        self.data_outputs
    }

    pub fn count_input(&mut self) {
        self.data_inputs += 1;
    }

    pub fn count_outputs(&mut self, n: usize) {
        self.data_outputs += n;
    }

    /// Closes every context deeper than `level`.
    pub fn enter_level(&mut self, level: usize) {
        self.contexts.enter_level(level);
    }

    pub fn depth(&self) -> usize {
        self.contexts.depth()
    }

    /// Inserts a fragment at the current insertion point and opens it for
    /// more deeply nested lines.
    pub fn insert(&mut self, fragment: Fragment) -> NodeIndex {
        let index = self.tree.append(self.contexts.current(), fragment);
        self.contexts.push(index);
        index
    }

    /// Renders the output tree into the finished artifact.
    pub fn finish(self) -> Artifact {
        log::info!(
            "Finished artifact '{}' ({} inputs, {} outputs)",
            self.title,
            self.data_inputs,
            self.data_outputs
        );
        Artifact {
            file_name: artifact_file_name(&self.title),
            content: self.tree.render(),
            title: self.title,
            data_inputs: self.data_inputs,
            data_outputs: self.data_outputs,
        }
    }
}
