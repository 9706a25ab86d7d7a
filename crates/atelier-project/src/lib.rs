//! Project tree model and deserialization for the Atelier workbench.
//!
//! A [`Project`] is an ordered tree of directories and source files. Projects
//! are reconstructed from a JSON tree description by [`load_project`], which
//! fetches file content from a [`TemplateSource`] whenever the description
//! does not inline it. Post-processing layers attach new artifacts to the
//! tree as siblings of the files they were derived from; nothing in this
//! crate ever deletes a node.

mod error;
mod loader;
mod schema;
mod source;
mod tree;

pub use error::ProjectError;
pub use loader::load_project;
pub use schema::TreeNode;
pub use source::{DirTemplateSource, MemoryTemplateSource, TemplateSource};
pub use tree::{Directory, FileContent, FileType, Node, Project, SourceFile};
