//! Flat fenced-block text document
//!
//! ````text
//! # analysis.ipynb
//!
//! ```markdown
//! # Title
//! ```
//!
//! ```python
//! print(1)
//! ```
//! ````

use crate::notebook::Cell;

/// Tag marking a block as a markdown cell
pub const MARKDOWN_TAG: &str = "markdown";

/// A parsed or to-be-rendered flat text document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatDocument {
    /// Name from the `# <name>` header line; informational only
    pub header: Option<String>,
    pub blocks: Vec<Block>,
}

/// One block of the flat document, corresponding to one notebook cell
///
/// Bare text found outside any fence is kept as a block with an empty fence
/// and the markdown tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub fence: String,
    pub tag: String,
    pub body: Vec<String>,
}

impl Block {
    /// A fenced block whose body is `source` split into lines
    pub fn fenced(fence: impl Into<String>, tag: impl Into<String>, source: &str) -> Self {
        Self {
            fence: fence.into(),
            tag: tag.into(),
            body: source.split('\n').map(String::from).collect(),
        }
    }

    /// An unfenced run of text, read back as markdown
    pub fn bare(body: Vec<String>) -> Self {
        Self {
            fence: String::new(),
            tag: MARKDOWN_TAG.to_string(),
            body,
        }
    }

    pub fn is_fenced(&self) -> bool {
        !self.fence.is_empty()
    }

    pub fn is_markdown(&self) -> bool {
        self.tag == MARKDOWN_TAG
    }

    /// Body lines joined back into cell source
    pub fn source(&self) -> String {
        self.body.join("\n")
    }

    /// The cell this block stands for
    pub fn to_cell(&self) -> Cell {
        if self.is_markdown() {
            Cell::markdown(self.source())
        } else {
            Cell::code(self.source())
        }
    }
}

impl FlatDocument {
    /// Render to text: header, a blank line, then each block followed by a
    /// blank separator line.
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.blocks.len() * 3 + 1);

        if let Some(name) = &self.header {
            lines.push(format!("# {name}\n"));
        }

        for block in &self.blocks {
            if block.is_fenced() {
                lines.push(format!("{}{}", block.fence, block.tag));
                lines.push(block.source());
                lines.push(format!("{}\n", block.fence));
            } else {
                lines.push(format!("{}\n", block.source()));
            }
        }

        lines.join("\n")
    }
}
