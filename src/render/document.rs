//! Render invoker and template injection.
//!
//! # Responsibilities
//! - Call the renderer for a URL and query
//! - Remove stale initial-data scripts from the template
//! - Inject head, initial data and body into the placeholders
//!
//! # Design Decisions
//! - Plain text substitution, no HTML parsing
//! - A missing placeholder skips that injection instead of failing
//! - Renderer errors propagate untouched; callers pick the failure policy
//! - `<` in the data payload is written as `\u003c`, so the payload can never
//!   close its own script tag and the stale-script pattern always spans it

use std::sync::OnceLock;
use std::time::Instant;

use regex::Regex;

use crate::observability::metrics;
use crate::render::provider::{Render, RenderError, RenderResult};
use crate::routing::QueryMap;

/// Replaced with the head fragment and the initial-data script.
pub const HEAD_PLACEHOLDER: &str = "<!--app-head-->";

/// Replaced with the body fragment.
pub const HTML_PLACEHOLDER: &str = "<!--app-html-->";

fn initial_data_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)<script[^>]*>window\.__INITIAL_DATA__\s*=\s*[^<]*</script>")
            .expect("initial data pattern is valid")
    })
}

/// The `<script>` block carrying `data`, or `None` for a null payload.
pub fn initial_data_script(data: &serde_json::Value) -> Option<String> {
    if data.is_null() {
        return None;
    }
    let json = data.to_string().replace('<', "\\u003c");
    Some(format!("<script>window.__INITIAL_DATA__ = {json};</script>"))
}

/// Remove every initial-data script from `template`.
pub fn strip_initial_data(template: &str) -> String {
    initial_data_pattern().replace_all(template, "").into_owned()
}

/// Inject a render result into `template`.
///
/// When the head placeholder is gone (the input is an already-injected
/// document) the new data script takes the place of the old one, so a
/// document never carries more than one initial-data block.
pub fn inject(template: &str, rendered: &RenderResult) -> String {
    let script = rendered.data.as_ref().and_then(initial_data_script);
    let stale_at = initial_data_pattern().find(template).map(|m| m.start());
    let mut html = strip_initial_data(template);

    if html.contains(HEAD_PLACEHOLDER) {
        let mut head = rendered.head.clone().unwrap_or_default();
        if let Some(script) = &script {
            head.push(' ');
            head.push_str(script);
        }
        html = html.replacen(HEAD_PLACEHOLDER, &head, 1);
    } else if let (Some(at), Some(script)) = (stale_at, &script) {
        // Everything before the first stale script is unchanged by stripping.
        html.insert_str(at, script);
    }

    html.replacen(HTML_PLACEHOLDER, &rendered.html, 1)
}

/// Render `url` with `renderer` and inject the result into `template`.
pub async fn render_document(
    template: &str,
    url: &str,
    query: &QueryMap,
    renderer: &dyn Render,
) -> Result<String, RenderError> {
    let start = Instant::now();
    let rendered = match renderer.render(url, query).await {
        Ok(rendered) => {
            metrics::record_render("ok", start);
            rendered
        }
        Err(e) => {
            metrics::record_render("error", start);
            return Err(e);
        }
    };

    Ok(inject(template, &rendered))
}
