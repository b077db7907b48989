//! Indentation style and layout options for synthesized trivia

use serde::{Deserialize, Serialize};

use crate::cst::ManifestSyntaxToken;
use crate::cst::trivia::{detect_line_ending, line_indentation};

/// Unit of one indentation level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndentStyle {
    /// Columns per level (also the width a tab counts for)
    pub width: usize,
    pub use_tabs: bool,
}

impl Default for IndentStyle {
    fn default() -> Self {
        Self::spaces(4)
    }
}

impl IndentStyle {
    pub fn spaces(width: usize) -> Self {
        Self {
            width: width.max(1),
            use_tabs: false,
        }
    }

    pub fn tabs() -> Self {
        Self {
            width: 4,
            use_tabs: true,
        }
    }

    /// Infer the style from the first indented lines of `text`
    ///
    /// Tabs win if the first indented line starts with one. Otherwise the
    /// smallest indentation between 2 and 8 spaces is the unit.
    pub fn detect(text: &str) -> Self {
        let mut smallest: Option<usize> = None;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with('\t') {
                if smallest.is_none() {
                    return Self::tabs();
                }
                continue;
            }
            let spaces = line.len() - line.trim_start_matches(' ').len();
            if (2..=8).contains(&spaces) {
                smallest = Some(smallest.map_or(spaces, |s| s.min(spaces)));
            }
        }
        smallest.map_or_else(Self::default, Self::spaces)
    }

    pub fn unit(&self) -> String {
        self.render(1)
    }

    /// Indentation text for `level` levels
    pub fn render(&self, level: usize) -> String {
        if self.use_tabs {
            "\t".repeat(level)
        } else {
            " ".repeat(level * self.width)
        }
    }

    /// Number of whole levels in an indentation prefix
    pub fn level_of(&self, indentation: &str) -> usize {
        let columns: usize = indentation
            .chars()
            .map(|c| if c == '\t' { self.width } else { 1 })
            .sum();
        columns / self.width.max(1)
    }

    /// Level of the line holding `token`
    pub fn line_level(&self, token: &ManifestSyntaxToken) -> usize {
        self.level_of(&line_indentation(token))
    }
}

/// Layout conventions applied to synthesized nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub indent: IndentStyle,
    pub line_ending: &'static str,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: IndentStyle::default(),
            line_ending: "\n",
        }
    }
}

impl FormatOptions {
    /// Detect indentation and line endings from the document
    pub fn detect(text: &str) -> Self {
        Self {
            indent: IndentStyle::detect(text),
            line_ending: detect_line_ending(text),
        }
    }

    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }
}
