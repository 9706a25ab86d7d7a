//! Built-in `markdown` engine.

use async_trait::async_trait;
use pulldown_cmark::{html, Options, Parser};
use std::sync::Arc;

use crate::contract::{EngineHandle, EngineProvider, MarkdownRenderer};
use crate::error::EngineResult;
use crate::id::CapabilityId;

/// CommonMark renderer with the GitHub-flavored extensions enabled.
pub struct CommonMarkRenderer;

impl CommonMarkRenderer {
    pub const LABEL: &'static str = "commonmark renderer";
}

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        let parser = Parser::new_ext(markdown, options);
        let mut output = String::new();
        html::push_html(&mut output, parser);
        output
    }
}

#[async_trait]
impl EngineProvider for CommonMarkRenderer {
    fn capability(&self) -> CapabilityId {
        CapabilityId::Markdown
    }

    fn label(&self) -> &str {
        Self::LABEL
    }

    async fn activate(&self) -> EngineResult<EngineHandle> {
        Ok(EngineHandle::Renderer(Arc::new(CommonMarkRenderer)))
    }
}
