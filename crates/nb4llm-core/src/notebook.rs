//! Notebook model and nbformat 4 JSON codec
//!
//! Only what the text format carries is modelled: the cell sequence, each
//! cell's kind and source, and the kernel metadata. Outputs, execution counts
//! and other metadata are dropped on read and written empty.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Major nbformat version this crate reads and writes
pub const NBFORMAT: u32 = 4;

/// Minor nbformat version written (cell ids are not emitted)
pub const NBFORMAT_MINOR: u32 = 4;

/// Notebook codec errors
#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("Invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing nbformat version")]
    MissingVersion,

    #[error("Unsupported nbformat version {major}.{minor} (only version 4 is supported)")]
    UnsupportedVersion { major: u64, minor: u64 },
}

/// A notebook: ordered cells plus kernel metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub metadata: Metadata,
}

/// A notebook cell
///
/// Code cells carry no language of their own; they run in the notebook's
/// kernel language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Markdown { source: String },
    Code { source: String },
}

impl Cell {
    pub fn markdown(source: impl Into<String>) -> Self {
        Cell::Markdown {
            source: source.into(),
        }
    }

    pub fn code(source: impl Into<String>) -> Self {
        Cell::Code {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Cell::Markdown { source } | Cell::Code { source } => source,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Cell::Code { .. })
    }
}

/// Notebook-level metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernelspec: Option<KernelSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_info: Option<LanguageInfo>,
}

/// Kernel specification (`metadata.kernelspec`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Language description (`metadata.language_info`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codemirror_mode: Option<CodemirrorMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbconvert_exporter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pygments_lexer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodemirrorMode {
    pub name: String,
    pub version: u32,
}

impl Metadata {
    /// Read metadata leniently: a malformed entry is treated as absent.
    fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).cloned();
        Metadata {
            kernelspec: field("kernelspec").and_then(|v| serde_json::from_value(v).ok()),
            language_info: field("language_info").and_then(|v| serde_json::from_value(v).ok()),
        }
    }
}

impl Notebook {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: Metadata::default(),
        }
    }

    /// Declared kernel language (`metadata.kernelspec.language`), if any
    pub fn kernel_language(&self) -> Option<&str> {
        self.metadata
            .kernelspec
            .as_ref()
            .and_then(|k| k.language.as_deref())
    }

    /// Parse an nbformat 4 notebook
    pub fn from_json(json: &str) -> Result<Self, NotebookError> {
        let value: Value = serde_json::from_str(json)?;

        let major = value
            .get("nbformat")
            .and_then(Value::as_u64)
            .ok_or(NotebookError::MissingVersion)?;
        if major != u64::from(NBFORMAT) {
            let minor = value
                .get("nbformat_minor")
                .and_then(Value::as_u64)
                .unwrap_or(0);
            return Err(NotebookError::UnsupportedVersion { major, minor });
        }

        let raw: RawNotebook = serde_json::from_value(value)?;
        let mut cells = Vec::with_capacity(raw.cells.len());
        for (index, cell) in raw.cells.into_iter().enumerate() {
            match cell.cell_type.as_str() {
                "markdown" => cells.push(Cell::Markdown {
                    source: cell.source,
                }),
                "code" => cells.push(Cell::Code {
                    source: cell.source,
                }),
                other => {
                    tracing::debug!(index, cell_type = other, "skipping cell");
                }
            }
        }

        Ok(Notebook {
            cells,
            metadata: Metadata::from_value(&raw.metadata),
        })
    }

    /// Serialize as nbformat 4 JSON, laid out the way Jupyter writes it
    /// (sorted keys, one-space indent, trailing newline)
    pub fn to_json(&self) -> Result<String, NotebookError> {
        let file = NotebookFile {
            cells: self.cells.iter().map(CellFile::from).collect(),
            metadata: &self.metadata,
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        };

        // Going through Value sorts object keys
        let value = serde_json::to_value(&file)?;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;

        let mut json = String::from_utf8_lossy(&buf).into_owned();
        json.push('\n');
        Ok(json)
    }
}

#[derive(Deserialize)]
struct RawNotebook {
    cells: Vec<RawCell>,
    #[serde(default)]
    metadata: Value,
}

#[derive(Deserialize)]
struct RawCell {
    cell_type: String,
    #[serde(default, deserialize_with = "deserialize_multiline")]
    source: String,
}

/// nbformat stores multiline strings either whole or split into lines
fn deserialize_multiline<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Multiline {
        Whole(String),
        Lines(Vec<String>),
    }

    Ok(match Multiline::deserialize(deserializer)? {
        Multiline::Whole(s) => s,
        Multiline::Lines(lines) => lines.concat(),
    })
}

#[derive(Serialize)]
struct NotebookFile<'a> {
    cells: Vec<CellFile<'a>>,
    metadata: &'a Metadata,
    nbformat: u32,
    nbformat_minor: u32,
}

#[derive(Serialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
enum CellFile<'a> {
    Markdown {
        metadata: Map<String, Value>,
        source: Vec<&'a str>,
    },
    Code {
        execution_count: Option<u32>,
        metadata: Map<String, Value>,
        outputs: Vec<Value>,
        source: Vec<&'a str>,
    },
}

impl<'a> From<&'a Cell> for CellFile<'a> {
    fn from(cell: &'a Cell) -> Self {
        let source = cell.source().split_inclusive('\n').collect();
        match cell {
            Cell::Markdown { .. } => CellFile::Markdown {
                metadata: Map::new(),
                source,
            },
            Cell::Code { .. } => CellFile::Code {
                execution_count: None,
                metadata: Map::new(),
                outputs: Vec::new(),
                source,
            },
        }
    }
}
