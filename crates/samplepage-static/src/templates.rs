//! Placeholder substitution for the project's HTML templates, and the
//! thumbnail gallery rendered into the page shell.

use std::collections::HashMap;
use std::sync::LazyLock;

use minijinja::{context, Environment};
use regex::Regex;
use samplepage_manifest::Manifest;

use crate::target::Target;

/// `$$`, `$name` or `${name}`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:(?P<escaped>\$)|(?P<named>[_A-Za-z][_A-Za-z0-9]*)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\})")
        .expect("placeholder pattern is valid")
});

/// How unknown placeholders are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
    /// Unknown placeholders are left in the output verbatim.
    Partial,
    /// Unknown placeholders are an error.
    Strict,
}

/// Errors that can occur when rendering templates.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Unknown placeholder: ${0}")]
    UnknownPlaceholder(String),

    #[error("Failed to render gallery: {0}")]
    Gallery(String),
}

/// Substitute `vars` into `template`.
///
/// `$$` always renders as a single `$`. A lone `$` that does not start a
/// placeholder is copied through unchanged in both modes.
pub fn render(
    template: &str,
    vars: &HashMap<&str, &str>,
    mode: Substitution,
) -> Result<String, RenderError> {
    let mut output = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        output.push_str(&template[last..whole.start()]);
        last = whole.end();

        if caps.name("escaped").is_some() {
            output.push('$');
            continue;
        }

        let key = caps
            .name("named")
            .or_else(|| caps.name("braced"))
            .map(|m| m.as_str())
            .unwrap_or_default();

        match (vars.get(key), mode) {
            (Some(value), _) => output.push_str(value),
            (None, Substitution::Partial) => output.push_str(whole.as_str()),
            (None, Substitution::Strict) => {
                return Err(RenderError::UnknownPlaceholder(key.to_string()))
            }
        }
    }

    output.push_str(&template[last..]);
    Ok(output)
}

/// The block linking back to the parent gallery, always rendered first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ParentGallery {
    pub title: String,
    pub url: String,
    pub image: String,
}

impl Default for ParentGallery {
    fn default() -> Self {
        Self {
            title: "To Core Samples...".to_string(),
            url: "http://floooh.github.com/oryol/index.html".to_string(),
            image: "core_samples.jpg".to_string(),
        }
    }
}

/// Placeholder image used for samples without a screenshot.
pub const DEFAULT_IMAGE: &str = "dummy.jpg";

/// A thumbnail in the gallery.
#[derive(Debug, Clone, serde::Serialize)]
struct Thumb<'a> {
    name: &'a str,
    page: String,
    image: &'a str,
    description: &'a str,
    links: Vec<TargetLink>,
}

#[derive(Debug, Clone, serde::Serialize)]
struct TargetLink {
    href: String,
    label: &'static str,
}

/// Renders the thumbnail gallery HTML fragment.
pub struct GalleryRenderer {
    env: Environment<'static>,
}

impl GalleryRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.add_filter("attr", escape_attribute);

        env.add_template_owned("gallery".to_string(), GALLERY_TEMPLATE.to_string())
            .map_err(|e| RenderError::Gallery(e.to_string()))?;

        Ok(Self { env })
    }

    /// Render the gallery for `manifest`, in manifest order.
    ///
    /// A target link is listed for a sample only when the target is in
    /// `enabled` and the sample is tagged for the web toolchain.
    pub fn render(
        &self,
        manifest: &Manifest,
        enabled: &[Target],
        parent: &ParentGallery,
    ) -> Result<String, RenderError> {
        let thumbs: Vec<Thumb> = manifest
            .samples()
            .map(|sample| {
                let links = Target::ALL
                    .into_iter()
                    .filter(|t| enabled.contains(t) && sample.targets_web())
                    .map(|t| TargetLink {
                        href: t.page_href(&sample.name),
                        label: t.label(),
                    })
                    .collect();

                Thumb {
                    name: &sample.name,
                    page: Target::AsmJs.page_href(&sample.name),
                    image: sample.image_file_name().unwrap_or(DEFAULT_IMAGE),
                    description: &sample.description,
                    links,
                }
            })
            .collect();

        let tmpl = self
            .env
            .get_template("gallery")
            .map_err(|e| RenderError::Gallery(e.to_string()))?;

        tmpl.render(context! { parent => parent, thumbs => thumbs })
            .map_err(|e| RenderError::Gallery(e.to_string()))
    }
}

/// Escape text for a double-quoted HTML attribute. Slashes stay as they are.
fn escape_attribute(value: String) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

const GALLERY_TEMPLATE: &str = r##"<div class="thumb">
  <div class="thumb-title">{{ parent.title }}</div>
  <div class="img-frame"><a href="{{ parent.url }}"><img class="image" src="{{ parent.image }}"></img></a></div>
</div>
{% for thumb in thumbs %}
<div class="thumb">
  <div class="thumb-title">{{ thumb.name }}</div>
  <div class="img-frame"><a href="{{ thumb.page }}"><img class="image" src="{{ thumb.image }}" title="{{ thumb.description|attr }}"></img></a></div>
  <div class="thumb-bar">
    <ul class="thumb-list">
{% for link in thumb.links %}
      <li class="thumb-item"><a class="thumb-link" href="{{ link.href }}">{{ link.label }}</a></li>
{% endfor %}
    </ul>
  </div>
</div>
{% endfor %}
"##;
