//! nb4llm-core: Core library for converting Jupyter notebooks to and from
//! fenced plain text
//!
//! This crate provides:
//! - Fence selection that never collides with backticks inside a cell
//! - Notebook model and nbformat 4 JSON reading/writing
//! - Notebook to flat text encoding
//! - Flat text to notebook decoding, with kernel language detection
//!
//! # Example
//!
//! ```
//! use nb4llm_core::{Cell, Notebook, decode, encode};
//!
//! let nb = Notebook::new(vec![Cell::markdown("# Title"), Cell::code("print(1)")]);
//! let text = encode(&nb, "nb.ipynb");
//! assert!(text.starts_with("# nb.ipynb\n"));
//!
//! let back = decode(&text);
//! assert_eq!(back.cells, nb.cells);
//! ```

pub mod convert;
pub mod decoder;
pub mod document;
pub mod encoder;
pub mod fence;
pub mod kernel;
pub mod notebook;

pub use convert::{ipynb_to_text, text_to_ipynb};
pub use decoder::decode;
pub use document::{Block, FlatDocument};
pub use encoder::{EncodeOptions, encode, encode_with_options, notebook_to_flat};
pub use fence::{select_fence, select_fence_with_min};
pub use kernel::DEFAULT_LANGUAGE;
pub use notebook::{Cell, KernelSpec, LanguageInfo, Metadata, Notebook, NotebookError};
