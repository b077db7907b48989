//! Printer for manifest CSTs
//!
//! Emits token texts in order and nothing else. Trivia synthesized by the
//! editors is printed exactly like trivia that came from the source.

use rowan::{GreenNodeData, NodeOrToken};

/// Print a green subtree
pub fn print_green(node: &GreenNodeData) -> String {
    let mut output = String::with_capacity(u32::from(node.text_len()) as usize);
    write_green(node, &mut output);
    output
}

fn write_green(node: &GreenNodeData, output: &mut String) {
    for child in node.children() {
        match child {
            NodeOrToken::Node(node) => write_green(node, output),
            NodeOrToken::Token(token) => output.push_str(token.text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::SyntaxTree;

    #[test]
    fn test_print_matches_red_text() {
        let source = "import PackageDescription\n\nlet package = Package(\n    name: \"A\" /* c */,\n)\n";
        let tree = SyntaxTree::parse(source).unwrap();
        assert_eq!(print_green(tree.green()), source);
        assert_eq!(tree.syntax().text().to_string(), source);
    }
}
