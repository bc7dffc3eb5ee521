/*
 * Defines `Filter`, a named group of file extensions offered to the user for
 * narrowing the visible files in a dialog. Construction normalises the input
 * (trimming, stripping leading `*` and `.`) and rejects anything the native
 * filter table cannot represent, so the encoder never sees an empty spec.
 */
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The display name was empty or only whitespace.
    EmptyDisplayName,
    /// No usable extension remained after normalisation.
    NoExtensions { display_name: String },
    /// The same extension was listed twice (compared case-insensitively).
    DuplicateExtension {
        display_name: String,
        extension: String,
    },
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::EmptyDisplayName => {
                write!(f, "Filter display name must not be empty or whitespace")
            }
            FilterError::NoExtensions { display_name } => write!(
                f,
                "Filter '{display_name}' must contain at least one non-empty extension"
            ),
            FilterError::DuplicateExtension {
                display_name,
                extension,
            } => write!(
                f,
                "Filter '{display_name}' lists extension '{extension}' more than once"
            ),
        }
    }
}

impl std::error::Error for FilterError {}

pub type Result<T> = std::result::Result<T, FilterError>;

/// An immutable, validated extension filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FilterDescriptor", into = "FilterDescriptor")]
pub struct Filter {
    display_name: String,
    extensions: Vec<String>,
}

/// The unvalidated on-disk shape of a `Filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub name: String,
    pub extensions: Vec<String>,
}

impl Filter {
    /*
     * Builds a filter from a display name and extension list. Each extension is
     * trimmed and loses any leading `*` and `.` characters, so "*.wav", ".wav"
     * and "wav" all become "wav". Blank entries are dropped. Fails if the name
     * is blank, no extension survives, or an extension repeats.
     */
    pub fn new<I, S>(display_name: &str, extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(FilterError::EmptyDisplayName);
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::new();
        for raw in extensions {
            let extension = normalize_extension(raw.as_ref());
            if extension.is_empty() {
                continue;
            }
            if !seen.insert(extension.to_lowercase()) {
                return Err(FilterError::DuplicateExtension {
                    display_name: display_name.to_string(),
                    extension,
                });
            }
            normalized.push(extension);
        }

        if normalized.is_empty() {
            return Err(FilterError::NoExtensions {
                display_name: display_name.to_string(),
            });
        }

        Ok(Filter {
            display_name: display_name.to_string(),
            extensions: normalized,
        })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Extensions without their leading `*.`, in the order they were given.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

fn normalize_extension(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(['*', '.'])
        .trim()
        .to_string()
}

impl TryFrom<FilterDescriptor> for Filter {
    type Error = FilterError;

    fn try_from(descriptor: FilterDescriptor) -> Result<Self> {
        Filter::new(&descriptor.name, descriptor.extensions)
    }
}

impl From<Filter> for FilterDescriptor {
    fn from(filter: Filter) -> Self {
        FilterDescriptor {
            name: filter.display_name,
            extensions: filter.extensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_name_and_strips_extension_prefixes() {
        let filter = Filter::new("  Audio ", ["*.wav", ".mp3", " flac ", "*ogg"]).unwrap();
        assert_eq!(filter.display_name(), "Audio");
        assert_eq!(filter.extensions(), &["wav", "mp3", "flac", "ogg"]);
    }

    #[test]
    fn test_new_drops_blank_extensions() {
        let filter = Filter::new("Text", ["", "  ", "txt", "*."]).unwrap();
        assert_eq!(filter.extensions(), &["txt"]);
    }

    #[test]
    fn test_new_rejects_blank_name() {
        assert_eq!(Filter::new("   ", ["txt"]), Err(FilterError::EmptyDisplayName));
    }

    #[test]
    fn test_new_rejects_no_extensions() {
        let result = Filter::new("Nothing", Vec::<String>::new());
        assert_eq!(
            result,
            Err(FilterError::NoExtensions {
                display_name: "Nothing".to_string()
            })
        );
        assert!(Filter::new("Blank", [" ", "*."]).is_err());
    }

    #[test]
    fn test_new_rejects_duplicates_case_insensitively() {
        let result = Filter::new("Images", ["png", "*.PNG"]);
        assert!(matches!(
            result,
            Err(FilterError::DuplicateExtension { ref extension, .. }) if extension == "PNG"
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let filter: Filter =
            serde_json::from_str(r#"{"name":"Images","extensions":["*.png","jpg"]}"#).unwrap();
        assert_eq!(filter.extensions(), &["png", "jpg"]);

        let bad = serde_json::from_str::<Filter>(r#"{"name":"","extensions":["png"]}"#);
        assert!(bad.is_err());
    }
}
