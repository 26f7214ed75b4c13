//! Flat text to notebook decoder
//!
//! A single forward pass over the lines of the document. The scanner is in
//! one of three states: between blocks, inside a fence, or collecting bare
//! text. Nothing in the input is rejected: an unterminated fence takes the
//! rest of the document, and unfenced text becomes markdown.

use crate::document::{Block, FlatDocument};
use crate::kernel::{self, DEFAULT_LANGUAGE};
use crate::notebook::Notebook;

/// Decode flat text into a notebook
pub fn decode(text: &str) -> Notebook {
    FlatDocument::parse(text).into_notebook()
}

impl FlatDocument {
    /// Scan flat text into blocks
    pub fn parse(text: &str) -> Self {
        Scanner::new(text).scan()
    }

    /// Turn blocks into cells and derive the kernel from the code tags.
    ///
    /// The last code tag other than `python` decides the kernel; markdown
    /// blocks are ignored for detection.
    pub fn into_notebook(self) -> Notebook {
        let mut language: &str = DEFAULT_LANGUAGE;
        let mut cells = Vec::with_capacity(self.blocks.len());

        for block in &self.blocks {
            let cell = block.to_cell();
            if cell.is_code() && !block.tag.is_empty() && block.tag != DEFAULT_LANGUAGE {
                if block.tag != language {
                    tracing::debug!(language = %block.tag, "detected kernel language");
                }
                language = block.tag.as_str();
            }
            cells.push(cell);
        }

        Notebook {
            cells,
            metadata: kernel::metadata_for(language),
        }
    }
}

/// Scanner state
enum State {
    Between,
    InFence {
        fence: String,
        tag: String,
        body: Vec<String>,
    },
    BareText {
        body: Vec<String>,
    },
}

/// Line scanner over a flat document
struct Scanner<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    header: Option<String>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        let mut lines: Vec<&str> = text.split('\n').collect();

        // The `# <name>` header is informational; drop it before scanning
        let header = lines
            .first()
            .and_then(|l| l.strip_prefix("# "))
            .map(|name| name.trim_end().to_string());
        if header.is_some() {
            lines.remove(0);
        }

        Self {
            lines,
            pos: 0,
            header,
        }
    }

    fn scan(mut self) -> FlatDocument {
        let mut blocks = Vec::new();
        let mut state = State::Between;

        while let Some(&line) = self.lines.get(self.pos) {
            state = match state {
                State::Between => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        self.pos += 1;
                        State::Between
                    } else if let Some((fence, tag)) = parse_fence_open(trimmed) {
                        self.pos += 1;
                        State::InFence {
                            fence: fence.to_string(),
                            tag: tag.to_string(),
                            body: Vec::new(),
                        }
                    } else {
                        // Re-read this line as the start of bare text
                        State::BareText { body: Vec::new() }
                    }
                }
                State::InFence {
                    fence,
                    tag,
                    mut body,
                } => {
                    self.pos += 1;
                    if line.trim() == fence {
                        blocks.push(Block { fence, tag, body });
                        State::Between
                    } else {
                        body.push(line.to_string());
                        State::InFence { fence, tag, body }
                    }
                }
                State::BareText { mut body } => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() || parse_fence_open(trimmed).is_some() {
                        // The terminating line is handled by the next state
                        if !body.is_empty() {
                            blocks.push(Block::bare(body));
                        }
                        State::Between
                    } else {
                        body.push(line.to_string());
                        self.pos += 1;
                        State::BareText { body }
                    }
                }
            };
        }

        match state {
            State::Between => {}
            State::InFence { fence, tag, body } => {
                tracing::debug!(%fence, %tag, lines = body.len(), "unterminated fence at end of input");
                blocks.push(Block { fence, tag, body });
            }
            State::BareText { body } => {
                if !body.is_empty() {
                    blocks.push(Block::bare(body));
                }
            }
        }

        FlatDocument {
            header: self.header,
            blocks,
        }
    }
}

/// Recognise a fence-open line: one or more backticks followed by an
/// optional run of word characters, and nothing else.
///
/// Returns the fence and the tag.
pub fn parse_fence_open(trimmed: &str) -> Option<(&str, &str)> {
    let tag_start = trimmed.find(|c: char| c != '`').unwrap_or(trimmed.len());
    if tag_start == 0 {
        return None;
    }

    let (fence, tag) = trimmed.split_at(tag_start);
    if tag.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Some((fence, tag))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::Cell;

    #[test]
    fn test_parse_fence_open() {
        assert_eq!(parse_fence_open("```"), Some(("```", "")));
        assert_eq!(parse_fence_open("```python"), Some(("```", "python")));
        assert_eq!(parse_fence_open("`````r"), Some(("`````", "r")));
        assert_eq!(parse_fence_open("`x"), Some(("`", "x")));
        assert_eq!(parse_fence_open("```my_lang2"), Some(("```", "my_lang2")));
        assert_eq!(parse_fence_open("```python extra"), None);
        assert_eq!(parse_fence_open("```{r}"), None);
        assert_eq!(parse_fence_open("```c++"), None);
        assert_eq!(parse_fence_open("``` `"), None);
        assert_eq!(parse_fence_open("text"), None);
        assert_eq!(parse_fence_open(""), None);
    }

    #[test]
    fn test_decode_markdown_and_code() {
        let nb = decode("# nb.ipynb\n\n```markdown\n# Title\n```\n\n```python\nprint(1)\n```\n");
        assert_eq!(
            nb.cells,
            vec![Cell::markdown("# Title"), Cell::code("print(1)")]
        );
        assert_eq!(nb.kernel_language(), Some("python"));
        let spec = nb.metadata.kernelspec.unwrap();
        assert_eq!(spec.name, "python3");
        assert_eq!(spec.display_name, "Python 3");
        assert_eq!(nb.metadata.language_info.unwrap().name, "python");
    }

    #[test]
    fn test_header_is_stripped() {
        let doc = FlatDocument::parse("# analysis.ipynb\n\n```markdown\nhi\n```\n");
        assert_eq!(doc.header.as_deref(), Some("analysis.ipynb"));
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn test_only_first_line_is_header() {
        let nb = decode("plain first line\n# heading later\n");
        assert_eq!(
            nb.cells,
            vec![Cell::markdown("plain first line\n# heading later")]
        );
    }

    #[test]
    fn test_r_block_switches_kernel() {
        let nb = decode("```r\nx <- 1\n```\n");
        let spec = nb.metadata.kernelspec.as_ref().unwrap();
        assert_eq!(spec.name, "ir");
        assert_eq!(spec.display_name, "R");
        assert_eq!(spec.language.as_deref(), Some("r"));
        assert_eq!(nb.metadata.language_info.as_ref().unwrap().name, "r");
    }

    #[test]
    fn test_last_language_wins() {
        let nb = decode("```julia\na\n```\n\n```python\nb\n```\n\n```javascript\nc\n```\n\n```python\nd\n```\n");
        let spec = nb.metadata.kernelspec.unwrap();
        assert_eq!(spec.name, "nodejs");
        assert_eq!(spec.display_name, "Node.js");
        assert_eq!(nb.cells.len(), 4);
        assert!(nb.cells.iter().all(Cell::is_code));
    }

    #[test]
    fn test_markdown_never_sets_language() {
        let nb = decode("```scala\nval x = 1\n```\n\n```markdown\ntext\n```\n");
        assert_eq!(nb.kernel_language(), Some("scala"));
        assert_eq!(nb.metadata.kernelspec.unwrap().display_name, "Scala");
    }

    #[test]
    fn test_untagged_block_is_code() {
        let nb = decode("```\nls -la\n```\n");
        assert_eq!(nb.cells, vec![Cell::code("ls -la")]);
        assert_eq!(nb.kernel_language(), Some("python"));
    }

    #[test]
    fn test_longer_fence_keeps_inner_fences() {
        let nb = decode("````markdown\nExample:\n```python\nx = 1\n```\n````\n");
        assert_eq!(
            nb.cells,
            vec![Cell::markdown("Example:\n```python\nx = 1\n```")]
        );
    }

    #[test]
    fn test_closing_fence_may_be_indented() {
        let nb = decode("```python\nx = 1\n   ```   \n");
        assert_eq!(nb.cells, vec![Cell::code("x = 1")]);
    }

    #[test]
    fn test_unterminated_fence_takes_rest() {
        let nb = decode("```python\nx = 1\n\n```markdown\nnot closed");
        assert_eq!(
            nb.cells,
            vec![Cell::code("x = 1\n\n```markdown\nnot closed")]
        );
    }

    #[test]
    fn test_pure_prose() {
        let nb = decode("Just some prose.\nAcross two lines.");
        assert_eq!(
            nb.cells,
            vec![Cell::markdown("Just some prose.\nAcross two lines.")]
        );
    }

    #[test]
    fn test_bare_text_split_by_blank_lines_and_fences() {
        let nb = decode("intro\n\n\nsecond para\n```python\nx\n```\ntrailing");
        assert_eq!(
            nb.cells,
            vec![
                Cell::markdown("intro"),
                Cell::markdown("second para"),
                Cell::code("x"),
                Cell::markdown("trailing"),
            ]
        );
    }

    #[test]
    fn test_stray_characters_make_bare_text() {
        let nb = decode("```python run\nx = 1\n```\n");
        // The opener is prose; the closer opens an unterminated block
        assert_eq!(
            nb.cells,
            vec![Cell::markdown("```python run\nx = 1"), Cell::code("")]
        );
    }

    #[test]
    fn test_empty_input() {
        let nb = decode("");
        assert!(nb.cells.is_empty());
        assert_eq!(nb.kernel_language(), Some("python"));

        assert!(decode("# only.ipynb\n\n\n").cells.is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let nb = decode("```markdown\r\nhello\r\n```\r\n");
        assert_eq!(nb.cells, vec![Cell::markdown("hello\r")]);
    }
}
