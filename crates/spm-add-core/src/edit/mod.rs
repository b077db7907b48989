//! Structural editing of manifest trees
//!
//! Editors never mutate a tree. Each operation returns a [`TreeEdit`]: the
//! node to replace and its replacement green node. Applying the edit
//! rebuilds only the ancestors of that node and shares everything else with
//! the previous tree.

mod arguments;
mod array;
mod indent;
mod list;
pub mod make;

pub use arguments::ArgumentEditor;
pub use array::ArrayEditor;
pub use indent::{FormatOptions, IndentStyle};

use rowan::GreenNode;

use crate::cst::{ManifestSyntaxNode, SyntaxTree};

/// Replacement of a single node
#[derive(Debug, Clone)]
pub struct TreeEdit {
    target: ManifestSyntaxNode,
    replacement: GreenNode,
}

impl TreeEdit {
    pub fn new(target: ManifestSyntaxNode, replacement: GreenNode) -> Self {
        Self {
            target,
            replacement,
        }
    }

    pub fn target(&self) -> &ManifestSyntaxNode {
        &self.target
    }

    pub fn replacement(&self) -> &GreenNode {
        &self.replacement
    }

    /// Whether applying the edit would leave the tree unchanged
    pub fn is_noop(&self) -> bool {
        *self.target.green() == *self.replacement
    }

    /// Build the new tree
    pub fn apply(&self) -> SyntaxTree {
        tracing::trace!(
            kind = ?self.target.kind(),
            range = ?self.target.text_range(),
            "applying tree edit"
        );
        SyntaxTree::from_green(self.target.replace_with(self.replacement.clone()))
    }
}
