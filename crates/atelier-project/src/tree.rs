//! In-memory project tree: directories, source files, and their content.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::TreeNode;

/// Type tag carried by every file in the tree.
///
/// Unknown tags are preserved verbatim so that a project round-trips through
/// serialization without losing information it did not understand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum FileType {
    C,
    Cpp,
    Rust,
    Wat,
    Wasm,
    JavaScript,
    TypeScript,
    Markdown,
    Html,
    Json,
    Text,
    Other(String),
}

impl FileType {
    /// Parses a type tag as it appears in a tree description.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "c" => FileType::C,
            "cpp" | "c++" => FileType::Cpp,
            "rust" | "rs" => FileType::Rust,
            "wat" | "wast" => FileType::Wat,
            "wasm" => FileType::Wasm,
            "js" | "javascript" => FileType::JavaScript,
            "ts" | "typescript" => FileType::TypeScript,
            "markdown" | "md" => FileType::Markdown,
            "html" => FileType::Html,
            "json" => FileType::Json,
            "text" | "txt" => FileType::Text,
            other => FileType::Other(other.to_string()),
        }
    }

    /// Guesses a type from a file name's extension. Falls back to text.
    pub fn from_name(name: &str) -> Self {
        match name.rsplit_once('.') {
            Some((_, ext)) => Self::from_tag(&ext.to_ascii_lowercase()),
            None => FileType::Text,
        }
    }

    /// Canonical tag for this type.
    pub fn tag(&self) -> &str {
        match self {
            FileType::C => "c",
            FileType::Cpp => "cpp",
            FileType::Rust => "rust",
            FileType::Wat => "wat",
            FileType::Wasm => "wasm",
            FileType::JavaScript => "js",
            FileType::TypeScript => "ts",
            FileType::Markdown => "markdown",
            FileType::Html => "html",
            FileType::Json => "json",
            FileType::Text => "text",
            FileType::Other(tag) => tag,
        }
    }

    /// Whether content of this type is a binary payload rather than text.
    pub fn is_binary(&self) -> bool {
        matches!(self, FileType::Wasm)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<String> for FileType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<FileType> for String {
    fn from(kind: FileType) -> Self {
        kind.tag().to_string()
    }
}

/// Content stored in a file node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    /// Intentionally blank text content.
    pub fn empty() -> Self {
        FileContent::Text(String::new())
    }

    /// Classifies fetched bytes: valid UTF-8 becomes text, anything else
    /// stays binary.
    pub fn from_fetched(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => FileContent::Text(text),
            Err(err) => FileContent::Binary(err.into_bytes()),
        }
    }

    /// Content as raw bytes, regardless of variant.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Text(text) => text.as_bytes(),
            FileContent::Binary(bytes) => bytes,
        }
    }

    /// Content as text, when it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileContent::Text(text) => Some(text),
            FileContent::Binary(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// A leaf of the project tree.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name, unique within its parent directory.
    pub name: String,
    /// Declared or inferred type tag.
    pub kind: FileType,
    /// Current content; post-processors replace this in place.
    pub content: FileContent,
    /// Optional human-readable provenance or description.
    pub description: Option<String>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, kind: FileType, content: FileContent) -> Self {
        Self {
            name: name.into(),
            kind,
            content,
            description: None,
        }
    }

    /// Convenience constructor for text files.
    pub fn text(name: impl Into<String>, kind: FileType, text: impl Into<String>) -> Self {
        Self::new(name, kind, FileContent::Text(text.into()))
    }

    /// Convenience constructor for binary files.
    pub fn binary(name: impl Into<String>, kind: FileType, bytes: Vec<u8>) -> Self {
        Self::new(name, kind, FileContent::Binary(bytes))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A node of the project tree.
#[derive(Debug, Clone)]
pub enum Node {
    File(SourceFile),
    Directory(Directory),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => &file.name,
            Node::Directory(dir) => &dir.name,
        }
    }

    pub fn as_file(&self) -> Option<&SourceFile> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        }
    }
}

/// An ordered collection of child nodes.
///
/// Children keep the order they were attached in; names are unique within a
/// directory and [`Directory::upsert_file`] replaces content in place rather
/// than appending a duplicate.
#[derive(Debug, Clone)]
pub struct Directory {
    pub name: String,
    children: Vec<Node>,
}

impl Directory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Appends a child, preserving attachment order.
    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|child| child.name() == name)
    }

    /// Looks up a child file by name.
    pub fn file(&self, name: &str) -> Option<&SourceFile> {
        self.get(name).and_then(Node::as_file)
    }

    pub fn file_mut(&mut self, name: &str) -> Option<&mut SourceFile> {
        match self.get_mut(name) {
            Some(Node::File(file)) => Some(file),
            _ => None,
        }
    }

    /// Looks up a child directory by name.
    pub fn dir(&self, name: &str) -> Option<&Directory> {
        self.get(name).and_then(Node::as_directory)
    }

    pub fn dir_mut(&mut self, name: &str) -> Option<&mut Directory> {
        match self.get_mut(name) {
            Some(Node::Directory(dir)) => Some(dir),
            _ => None,
        }
    }

    /// Inserts a file, replacing an existing child of the same name in
    /// place. Replacement keeps the child's position; a new file is appended
    /// at the end.
    pub fn upsert_file(&mut self, file: SourceFile) {
        match self.get_mut(&file.name) {
            Some(Node::File(existing)) => *existing = file,
            Some(other) => *other = Node::File(file),
            None => self.children.push(Node::File(file)),
        }
    }
}

/// A named project: a root directory plus the project name.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub root: Directory,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let root = Directory::new(name.clone());
        Self { name, root }
    }

    /// Resolves the parent directory of a `/`-separated path, returning the
    /// parent and the leaf name. Returns `None` when an intermediate segment
    /// is missing or not a directory.
    pub fn file_parent_mut<'a>(&mut self, path: &'a str) -> Option<(&mut Directory, &'a str)> {
        let mut parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        let leaf = parts.pop()?;
        let mut current = &mut self.root;
        for part in parts {
            current = current.dir_mut(part)?;
        }
        Some((current, leaf))
    }

    /// Finds a file by `/`-separated path.
    pub fn find_file(&self, path: &str) -> Option<&SourceFile> {
        let mut parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        let leaf = parts.pop()?;
        let mut current = &self.root;
        for part in parts {
            current = current.dir(part)?;
        }
        current.file(leaf)
    }

    /// Serializes the project back into the JSON tree schema. Text content
    /// is inlined (empty text as an explicit null); binary content is left
    /// un-inlined for the source to provide again.
    pub fn to_tree(&self) -> TreeNode {
        TreeNode {
            name: self.name.clone(),
            children: Some(self.root.children().iter().map(node_to_tree).collect()),
            kind: None,
            data: None,
            description: None,
        }
    }
}

fn node_to_tree(node: &Node) -> TreeNode {
    match node {
        Node::Directory(dir) => TreeNode {
            name: dir.name.clone(),
            children: Some(dir.children().iter().map(node_to_tree).collect()),
            kind: None,
            data: None,
            description: None,
        },
        Node::File(file) => TreeNode {
            name: file.name.clone(),
            children: None,
            kind: Some(file.kind.tag().to_string()),
            data: match &file.content {
                FileContent::Text(text) if text.is_empty() => Some(None),
                FileContent::Text(text) => Some(Some(text.clone())),
                FileContent::Binary(_) => None,
            },
            description: file.description.clone(),
        },
    }
}
