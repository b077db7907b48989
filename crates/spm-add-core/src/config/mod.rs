//! Configuration for spm-add
//!
//! A `.spm-add.toml` (or `spm-add.toml`) file is looked up from the manifest
//! directory upward. Every key is optional; missing keys fall back to what
//! is detected from the manifest.
//!
//! ```toml
//! [format]
//! indent_width = 2
//! use_tabs = false
//!
//! [defaults]
//! branch = "develop"
//! ```

mod loader;

pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};

use crate::edit::IndentStyle;
use crate::error::SpmAddError;
use crate::result::Result;

/// Default branch for packages without known versions
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpmAddConfig {
    #[serde(default)]
    pub format: FormatConfiguration,
    #[serde(default)]
    pub defaults: DefaultsConfiguration,
}

/// Layout of inserted code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatConfiguration {
    /// Spaces per indentation level
    pub indent_width: Option<usize>,
    pub use_tabs: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfiguration {
    /// Branch used when a package has no known versions
    pub branch: Option<String>,
}

impl SpmAddConfig {
    /// Indent style forced by the config, if it sets any format key
    pub fn indent_style(&self) -> Option<IndentStyle> {
        let FormatConfiguration {
            indent_width,
            use_tabs,
        } = self.format;
        match (indent_width, use_tabs) {
            (None, None) => None,
            (width, Some(true)) => Some(IndentStyle {
                width: width.unwrap_or(IndentStyle::tabs().width).max(1),
                use_tabs: true,
            }),
            (width, _) => Some(IndentStyle::spaces(width.unwrap_or(IndentStyle::default().width))),
        }
    }

    /// Reject values no layout can use
    pub fn validate(&self) -> Result<()> {
        if self.format.indent_width == Some(0) {
            return Err(SpmAddError::config_error(
                "format.indent_width must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn branch(&self) -> &str {
        self.defaults.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }
}
