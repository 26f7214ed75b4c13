//! Kernel language table
//!
//! Maps a language tag to the kernelspec and `language_info` written into a
//! notebook. Tags missing from the table get a kernel named after the tag.

use crate::notebook::{CodemirrorMode, KernelSpec, LanguageInfo, Metadata};

/// Kernel language assumed when a notebook does not declare one
pub const DEFAULT_LANGUAGE: &str = "python";

/// Static description of a known kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelProfile {
    pub language: &'static str,
    pub kernel_name: &'static str,
    pub display_name: &'static str,
    pub file_extension: &'static str,
    pub mimetype: &'static str,
}

const KNOWN_KERNELS: &[KernelProfile] = &[
    KernelProfile {
        language: "python",
        kernel_name: "python3",
        display_name: "Python 3",
        file_extension: ".py",
        mimetype: "text/x-python",
    },
    KernelProfile {
        language: "r",
        kernel_name: "ir",
        display_name: "R",
        file_extension: ".r",
        mimetype: "text/x-r-source",
    },
    KernelProfile {
        language: "julia",
        kernel_name: "julia-1.8",
        display_name: "Julia 1.8.5",
        file_extension: ".jl",
        mimetype: "text/julia",
    },
    KernelProfile {
        language: "javascript",
        kernel_name: "nodejs",
        display_name: "Node.js",
        file_extension: ".js",
        mimetype: "application/javascript",
    },
];

/// Look up a language in the table of known kernels
pub fn known_kernel(language: &str) -> Option<&'static KernelProfile> {
    KNOWN_KERNELS.iter().find(|k| k.language == language)
}

/// Build the kernelspec for a language tag
pub fn kernelspec_for(language: &str) -> KernelSpec {
    match known_kernel(language) {
        Some(profile) => KernelSpec {
            name: profile.kernel_name.to_string(),
            display_name: profile.display_name.to_string(),
            language: Some(profile.language.to_string()),
        },
        None => KernelSpec {
            name: language.to_string(),
            display_name: capitalize(language),
            language: Some(language.to_string()),
        },
    }
}

/// Build the `language_info` block for a language tag
pub fn language_info_for(language: &str) -> LanguageInfo {
    let mut info = LanguageInfo {
        name: language.to_string(),
        ..Default::default()
    };

    if let Some(profile) = known_kernel(language) {
        info.file_extension = Some(profile.file_extension.to_string());
        info.mimetype = Some(profile.mimetype.to_string());
    }

    // IPython kernels advertise their lexer and exporter as well
    if language == DEFAULT_LANGUAGE {
        info.codemirror_mode = Some(CodemirrorMode {
            name: "ipython".to_string(),
            version: 3,
        });
        info.nbconvert_exporter = Some("python".to_string());
        info.pygments_lexer = Some("ipython3".to_string());
        info.version = Some("3.8.0".to_string());
    }

    info
}

/// Notebook metadata for a kernel language
pub fn metadata_for(language: &str) -> Metadata {
    Metadata {
        kernelspec: Some(kernelspec_for(language)),
        language_info: Some(language_info_for(language)),
    }
}

/// Upper-case the first character and lower-case the rest ("rust" -> "Rust")
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kernels() {
        let r = kernelspec_for("r");
        assert_eq!(r.name, "ir");
        assert_eq!(r.display_name, "R");
        assert_eq!(r.language.as_deref(), Some("r"));

        let julia = kernelspec_for("julia");
        assert_eq!(julia.name, "julia-1.8");
        assert_eq!(julia.display_name, "Julia 1.8.5");

        let js = kernelspec_for("javascript");
        assert_eq!(js.name, "nodejs");
        assert_eq!(js.display_name, "Node.js");

        let py = kernelspec_for("python");
        assert_eq!(py.name, "python3");
        assert_eq!(py.display_name, "Python 3");
    }

    #[test]
    fn test_unknown_kernel_uses_tag() {
        let spec = kernelspec_for("rust");
        assert_eq!(spec.name, "rust");
        assert_eq!(spec.display_name, "Rust");
        assert_eq!(spec.language.as_deref(), Some("rust"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("scala"), "Scala");
        assert_eq!(capitalize("SQL"), "Sql");
        assert_eq!(capitalize("c_plus"), "C_plus");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_language_info_follows_kernel() {
        let py = language_info_for("python");
        assert_eq!(py.name, "python");
        assert_eq!(py.pygments_lexer.as_deref(), Some("ipython3"));
        assert!(py.codemirror_mode.is_some());

        let r = language_info_for("r");
        assert_eq!(r.name, "r");
        assert_eq!(r.file_extension.as_deref(), Some(".r"));
        assert!(r.codemirror_mode.is_none());

        let other = language_info_for("bash");
        assert_eq!(other.name, "bash");
        assert!(other.file_extension.is_none());
        assert!(other.mimetype.is_none());
    }
}
