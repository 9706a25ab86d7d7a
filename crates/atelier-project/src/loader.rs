//! Deserializes a JSON tree description into a [`Project`], fetching
//! non-inlined content from a [`TemplateSource`].

use futures::future::{self, BoxFuture, FutureExt};
use tracing::debug;

use crate::error::{ProjectError, ProjectResult};
use crate::schema::TreeNode;
use crate::source::TemplateSource;
use crate::tree::{Directory, FileContent, FileType, Node, Project, SourceFile};

/// Parses `json` and populates `project` with the described tree.
///
/// The project's name and top-level children are replaced. Sibling nodes are
/// built concurrently; their attachment order is the input order regardless
/// of which fetch completes first. Returns the parsed [`TreeNode`] so callers
/// can inspect the raw description.
pub async fn load_project(
    json: &str,
    project: &mut Project,
    source: &dyn TemplateSource,
) -> ProjectResult<TreeNode> {
    let tree: TreeNode = serde_json::from_str(json)?;

    project.name = tree.name.clone();
    project.root = Directory::new(tree.name.clone());
    if let Some(children) = &tree.children {
        let built =
            future::try_join_all(children.iter().map(|child| build_node(child, source))).await?;
        for node in built {
            project.root.push(node);
        }
    }
    debug!(project = %project.name, nodes = project.root.len(), "project tree loaded");
    Ok(tree)
}

fn build_node<'a>(
    node: &'a TreeNode,
    source: &'a dyn TemplateSource,
) -> BoxFuture<'a, ProjectResult<Node>> {
    async move {
        match &node.children {
            Some(children) => {
                let built =
                    future::try_join_all(children.iter().map(|child| build_node(child, source)))
                        .await?;
                let mut dir = Directory::new(node.name.clone());
                for child in built {
                    dir.push(child);
                }
                Ok(Node::Directory(dir))
            }
            None => build_file(node, source).await.map(Node::File),
        }
    }
    .boxed()
}

async fn build_file(node: &TreeNode, source: &dyn TemplateSource) -> ProjectResult<SourceFile> {
    let kind = node
        .kind
        .as_deref()
        .map(FileType::from_tag)
        .unwrap_or_else(|| FileType::from_name(&node.name));

    let content = match &node.data {
        Some(Some(text)) => FileContent::Text(text.clone()),
        Some(None) => FileContent::empty(),
        None => {
            debug!(name = %node.name, "fetching template content");
            let bytes = source
                .fetch(&node.name)
                .await
                .map_err(|err| ProjectError::Fetch {
                    name: node.name.clone(),
                    reason: err.to_string(),
                })?;
            if kind.is_binary() {
                // Small modules are often valid UTF-8; the type tag, not a
                // sniff, decides for binary kinds.
                FileContent::Binary(bytes)
            } else {
                FileContent::from_fetched(bytes)
            }
        }
    };

    let mut file = SourceFile::new(node.name.clone(), kind, content);
    file.description = node.description.clone();
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryTemplateSource;
    use async_trait::async_trait;
    use std::io;
    use std::time::Duration;

    /// Wraps a memory source with a per-entry artificial delay so tests can
    /// force fetches to complete out of input order.
    struct SlowSource {
        inner: MemoryTemplateSource,
        delays: Vec<(String, Duration)>,
    }

    #[async_trait]
    impl TemplateSource for SlowSource {
        async fn fetch(&self, name: &str) -> io::Result<Vec<u8>> {
            if let Some((_, delay)) = self.delays.iter().find(|(n, _)| n == name) {
                tokio::time::sleep(*delay).await;
            }
            self.inner.fetch(name).await
        }
    }

    #[tokio::test]
    async fn directories_and_files_attach_in_input_order() {
        let json = r#"{
            "name": "root",
            "children": [
                {"name": "a.txt", "type": "text", "data": "hi"},
                {"name": "b", "children": []}
            ]
        }"#;
        let mut project = Project::new("placeholder");
        let source = MemoryTemplateSource::new();

        let tree = load_project(json, &mut project, &source).await.unwrap();
        assert_eq!(tree.name, "root");
        assert_eq!(project.name, "root");
        assert_eq!(project.root.len(), 2);
        assert_eq!(project.root.children()[0].name(), "a.txt");
        assert_eq!(project.root.children()[1].name(), "b");
        assert!(project.root.dir("b").unwrap().is_empty());
        assert_eq!(
            project.find_file("a.txt").unwrap().content.as_text(),
            Some("hi")
        );
    }

    #[tokio::test]
    async fn null_data_is_blank_and_absent_data_fetches() {
        let json = r#"{
            "name": "root",
            "children": [
                {"name": "blank.c", "type": "c", "data": null},
                {"name": "fetched.c", "type": "c"}
            ]
        }"#;
        let mut project = Project::new("placeholder");
        let mut source = MemoryTemplateSource::new();
        source.insert_text("fetched.c", "int y;");

        load_project(json, &mut project, &source).await.unwrap();
        let blank = project.find_file("blank.c").unwrap();
        assert_eq!(blank.content, FileContent::empty());
        let fetched = project.find_file("fetched.c").unwrap();
        assert_eq!(fetched.content.as_text(), Some("int y;"));
    }

    #[tokio::test]
    async fn module_typed_fetches_stay_binary_even_when_utf8() {
        // The empty-module header decodes as UTF-8; the declared type must
        // keep it binary anyway.
        let module = vec![0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];
        let json = r#"{
            "name": "root",
            "children": [
                {"name": "a.wasm", "type": "wasm"},
                {"name": "notes.md", "type": "markdown"}
            ]
        }"#;
        let mut project = Project::new("placeholder");
        let mut source = MemoryTemplateSource::new();
        source.insert("a.wasm", module.clone());
        source.insert_text("notes.md", "# hi");

        load_project(json, &mut project, &source).await.unwrap();
        assert_eq!(
            project.find_file("a.wasm").unwrap().content,
            FileContent::Binary(module)
        );
        assert_eq!(
            project.find_file("notes.md").unwrap().content.as_text(),
            Some("# hi")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_first_fetch_does_not_reorder_siblings() {
        let json = r#"{
            "name": "root",
            "children": [
                {"name": "slow.txt"},
                {"name": "fast.txt"}
            ]
        }"#;
        let mut inner = MemoryTemplateSource::new();
        inner.insert_text("slow.txt", "slow");
        inner.insert_text("fast.txt", "fast");
        let source = SlowSource {
            inner,
            delays: vec![
                ("slow.txt".to_string(), Duration::from_millis(500)),
                ("fast.txt".to_string(), Duration::from_millis(1)),
            ],
        };

        let mut project = Project::new("placeholder");
        load_project(json, &mut project, &source).await.unwrap();
        assert_eq!(project.root.children()[0].name(), "slow.txt");
        assert_eq!(project.root.children()[1].name(), "fast.txt");
    }

    #[tokio::test]
    async fn fetch_failures_name_the_offending_node() {
        let json = r#"{"name": "root", "children": [{"name": "missing.c"}]}"#;
        let mut project = Project::new("placeholder");
        let source = MemoryTemplateSource::new();

        let err = load_project(json, &mut project, &source)
            .await
            .unwrap_err();
        match err {
            ProjectError::Fetch { name, .. } => assert_eq!(name, "missing.c"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let mut project = Project::new("placeholder");
        let source = MemoryTemplateSource::new();
        let err = load_project("{not json", &mut project, &source)
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::Parse(_)));
    }

    #[tokio::test]
    async fn loaded_project_serializes_back_to_the_same_tree() {
        let json = r#"{"name":"root","children":[{"name":"a.txt","type":"text","data":"hi"},{"name":"empty.txt","type":"text","data":null}]}"#;
        let mut project = Project::new("placeholder");
        let source = MemoryTemplateSource::new();

        load_project(json, &mut project, &source).await.unwrap();
        let round_tripped = serde_json::to_string(&project.to_tree()).unwrap();
        assert_eq!(round_tripped, json);
    }
}
