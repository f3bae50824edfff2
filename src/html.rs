//! Separation of markup and script: split `<script>` bodies out of an HTML
//! string so markup can be injected and scripts evaluated independently.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("script pattern"));

/// Result of [`separate_js`]: the markup with script tags stripped, and the
/// script bodies joined by newlines in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparatedHtml {
    pub html: String,
    pub script: String,
}

pub fn separate_js(input: &str) -> SeparatedHtml {
    let mut scripts = Vec::new();
    let html = SCRIPT_BLOCK.replace_all(input, |caps: &Captures<'_>| {
        scripts.push(caps[1].to_string());
        String::new()
    });
    SeparatedHtml {
        html: html.into_owned(),
        script: scripts.join("\n"),
    }
}
