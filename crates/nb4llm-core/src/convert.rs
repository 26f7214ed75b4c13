//! String-level conversions
//!
//! These compose the notebook JSON codec with the encoder and decoder. The
//! whole result is built in memory; callers write it out only on success.

use crate::decoder::decode;
use crate::encoder::{EncodeOptions, encode_with_options};
use crate::notebook::{Notebook, NotebookError};

/// Convert notebook JSON to flat text
pub fn ipynb_to_text(
    json: &str,
    display_name: &str,
    options: &EncodeOptions,
) -> Result<String, NotebookError> {
    let notebook = Notebook::from_json(json)?;
    Ok(encode_with_options(&notebook, display_name, options))
}

/// Convert flat text to notebook JSON
pub fn text_to_ipynb(text: &str) -> Result<String, NotebookError> {
    decode(text).to_json()
}
