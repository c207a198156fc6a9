//! A single sample entry in the manifest.

use std::path::Path;

use serde::Deserialize;

/// Name of the record that terminates the manifest.
pub const END_SENTINEL: &str = "__end__";

/// Image path component meaning "no screenshot available".
pub const NO_IMAGE: &str = "none";

/// Tag marking a sample as buildable with the web toolchain.
pub const WEB_TOOLCHAIN_TAG: &str = "emscripten";

/// One demo sample as described by the manifest.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SampleRecord {
    /// Unique sample name
    pub name: String,

    /// Source path relative to the repository's sample root
    #[serde(default, rename = "src", alias = "source_path")]
    pub source_path: String,

    /// Screenshot path, or a path ending in `none`
    #[serde(default, rename = "image", alias = "image_path")]
    pub image_path: String,

    /// Category tags
    #[serde(default, rename = "type", alias = "types")]
    pub types: Vec<String>,

    /// Free-text description, shown as the thumbnail tooltip
    #[serde(default, rename = "desc", alias = "description")]
    pub description: String,
}

impl SampleRecord {
    /// Whether this is the end-of-list marker.
    pub fn is_sentinel(&self) -> bool {
        self.name == END_SENTINEL
    }

    /// Whether the sample is tagged for the web toolchain.
    pub fn targets_web(&self) -> bool {
        self.has_type(WEB_TOOLCHAIN_TAG)
    }

    /// Whether the sample carries the given category tag.
    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    /// File name of the screenshot, or `None` when the sample has no image.
    pub fn image_file_name(&self) -> Option<&str> {
        let name = Path::new(&self.image_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(NO_IMAGE);

        if name == NO_IMAGE {
            None
        } else {
            Some(name)
        }
    }
}
