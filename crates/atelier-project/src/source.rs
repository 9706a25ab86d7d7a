//! Template content sources for files whose data is not inlined in the tree.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Provides content for tree nodes that carry no inline `data`.
///
/// Implementations are consulted with the node's own name; how that name maps
/// to storage is up to the source.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn fetch(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Reads template content from files under a base directory.
#[derive(Debug, Clone)]
pub struct DirTemplateSource {
    base: PathBuf,
}

impl DirTemplateSource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl TemplateSource for DirTemplateSource {
    async fn fetch(&self, name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.base.join(name)).await
    }
}

/// In-memory source, mainly for tests and embedded templates.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateSource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(name.into(), bytes);
    }

    pub fn insert_text(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(name.into(), text.into().into_bytes());
    }
}

#[async_trait]
impl TemplateSource for MemoryTemplateSource {
    async fn fetch(&self, name: &str) -> io::Result<Vec<u8>> {
        self.entries.get(name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no template entry {name}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn memory_source_round_trips() {
        let mut source = MemoryTemplateSource::new();
        source.insert_text("hello.c", "int x;");
        assert_eq!(source.fetch("hello.c").await.unwrap(), b"int x;");
        assert!(source.fetch("missing.c").await.is_err());
    }

    #[tokio::test]
    async fn dir_source_reads_relative_to_base() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("main.c"), b"int main;")
            .await
            .unwrap();

        let source = DirTemplateSource::new(dir.path());
        assert_eq!(source.fetch("main.c").await.unwrap(), b"int main;");
        assert!(source.fetch("absent.c").await.is_err());
    }
}
