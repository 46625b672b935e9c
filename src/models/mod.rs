//! Data models: blob tree, compiled AST shapes, panels, layout, projects.

pub mod ast;
pub mod blob_tree;
pub mod layout;
pub mod panel;
pub mod project;

pub use ast::{
    AstAttribute, AstBlock, AstChoice, AstInline, AstText, CompiledDocument, Diagnostic,
    DiagnosticSeverity, FileContents, InlineKind, MatchKind, Recompiled, TextPart, TextRange,
};
pub use blob_tree::{
    check_name_format, display_stem, stored_name, BlobBody, BlobId, BlobKind, BlobNode, BlobRow,
    BlobTree, BlobTreeError, CreationIntent, FolderState, NameError, TreeSnapshot,
};
pub use layout::WorkspaceLayout;
pub use panel::{Panel, PanelId};
pub use project::{Project, ProjectMetadata, ProjectSnapshot};
