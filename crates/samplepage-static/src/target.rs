//! Web compilation targets and the artifacts each one produces.

/// One of the two web output flavors of the toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    AsmJs,
    Wasm,
}

/// A generated file expected in a target's build output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Artifact {
    /// Extension appended to the sample name, without the leading dot
    pub extension: &'static str,

    /// Deploy under `<name>.<extension>.txt` so servers treat it as text
    pub text_suffix: bool,
}

impl Artifact {
    const fn plain(extension: &'static str) -> Self {
        Self {
            extension,
            text_suffix: false,
        }
    }

    const fn as_text(extension: &'static str) -> Self {
        Self {
            extension,
            text_suffix: true,
        }
    }

    /// File name in the build output directory.
    pub fn source_name(&self, sample: &str) -> String {
        format!("{}.{}", sample, self.extension)
    }

    /// File name in the deploy directory.
    pub fn deploy_name(&self, sample: &str) -> String {
        if self.text_suffix {
            format!("{}.{}.txt", sample, self.extension)
        } else {
            self.source_name(sample)
        }
    }
}

const ASMJS_ARTIFACTS: &[Artifact] = &[Artifact::plain("js"), Artifact::plain("html.mem")];

const WASM_ARTIFACTS: &[Artifact] = &[
    Artifact::plain("js"),
    Artifact::plain("wasm.mappedGlobals"),
    Artifact::as_text("html.mem"),
    Artifact::as_text("wasm"),
];

impl Target {
    /// Targets in build order.
    pub const ALL: [Target; 2] = [Target::AsmJs, Target::Wasm];

    /// Subdirectory of the deploy root holding this target's pages.
    pub fn dir_name(self) -> &'static str {
        match self {
            Target::AsmJs => "asmjs",
            Target::Wasm => "wasm",
        }
    }

    /// Link text in the gallery.
    pub fn label(self) -> &'static str {
        match self {
            Target::AsmJs => "asm.js",
            Target::Wasm => "wasm",
        }
    }

    /// Per-sample page template in the project's web directory.
    pub fn page_template(self) -> &'static str {
        match self {
            Target::AsmJs => "emsc.html",
            Target::Wasm => "wasm.html",
        }
    }

    pub fn artifacts(self) -> &'static [Artifact] {
        match self {
            Target::AsmJs => ASMJS_ARTIFACTS,
            Target::Wasm => WASM_ARTIFACTS,
        }
    }

    /// Relative URL of a sample's page for this target.
    pub fn page_href(self, sample: &str) -> String {
        format!("{}/{}.html", self.dir_name(), sample)
    }
}
