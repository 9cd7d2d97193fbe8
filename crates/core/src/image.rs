//! Named images: a draw route plus the identifiers generated code uses.

use crate::route::DrawRoute;
use std::path::Path;

/// Identifier forms of an image name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName {
    /// Lower-case with `_` separators, used for output file names.
    pub snake_case: String,
    /// UpperCamelCase, used inside generated identifiers.
    pub camel_case: String,
}

impl ImageName {
    pub fn new(raw: &str) -> Self {
        let mut snake_case: String = raw
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        if snake_case.is_empty() {
            snake_case.push_str("image");
        }
        let camel_case = snake_case
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                chars
                    .next()
                    .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
                    .unwrap_or_default()
            })
            .collect();
        Self {
            snake_case,
            camel_case,
        }
    }

    /// Name derived from a file's stem.
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(&stem)
    }

    /// Name of page `index` of a split document: the first page keeps the
    /// base name, later pages get `_1`, `_2`, ...
    pub fn for_page(&self, index: usize) -> Self {
        if index == 0 {
            self.clone()
        } else {
            Self {
                snake_case: format!("{}_{index}", self.snake_case),
                camel_case: format!("{}{index}", self.camel_case),
            }
        }
    }
}

/// One vector image ready for code generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub name: ImageName,
    pub route: DrawRoute,
}

impl Image {
    pub fn new(name: ImageName, route: DrawRoute) -> Self {
        Self { name, route }
    }
}
