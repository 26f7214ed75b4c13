//! Notebook to flat text encoder
//!
//! Every cell becomes one fenced block. The fence is chosen per cell so that
//! no line of the cell can close it early.

use crate::document::{Block, FlatDocument, MARKDOWN_TAG};
use crate::fence::{MIN_FENCE_LENGTH, select_fence_with_min};
use crate::kernel::DEFAULT_LANGUAGE;
use crate::notebook::{Cell, Notebook};

/// Options for the text encoder
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Tag for code blocks when the notebook declares no kernel language
    pub default_language: String,
    /// Shortest fence emitted
    pub min_fence_length: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            min_fence_length: MIN_FENCE_LENGTH,
        }
    }
}

/// Encode a notebook as flat text with default options
///
/// `display_name` goes into the `# <name>` header line.
pub fn encode(notebook: &Notebook, display_name: &str) -> String {
    encode_with_options(notebook, display_name, &EncodeOptions::default())
}

/// Encode a notebook as flat text
pub fn encode_with_options(
    notebook: &Notebook,
    display_name: &str,
    options: &EncodeOptions,
) -> String {
    notebook_to_flat(notebook, display_name, options).render()
}

/// Build the flat document for a notebook without rendering it
pub fn notebook_to_flat(
    notebook: &Notebook,
    display_name: &str,
    options: &EncodeOptions,
) -> FlatDocument {
    let kernel_language = notebook
        .kernel_language()
        .unwrap_or(options.default_language.as_str());

    let blocks = notebook
        .cells
        .iter()
        .map(|cell| {
            let fence = select_fence_with_min(cell.source(), options.min_fence_length);
            let tag = match cell {
                Cell::Markdown { .. } => MARKDOWN_TAG,
                Cell::Code { .. } => kernel_language,
            };
            Block::fenced(fence, tag, cell.source())
        })
        .collect();

    FlatDocument {
        header: Some(display_name.to_string()),
        blocks,
    }
}
