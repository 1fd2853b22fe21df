use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::filters::Filters;
use super::language::Language;
use crate::error::Result;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[^>]*>").unwrap());

/// A remote coding problem as seen by the encoder.
pub trait Challenge {
    /// Human readable statement, free of markup.
    fn prompt(&self) -> String;

    /// Starter code for `language`; `SnippetNotFound` when the platform
    /// offers none.
    fn snippet(&self, language: Language) -> Result<String>;

    /// Extra files to write beside the source file, keyed by file name.
    fn files(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// The filters that identify this challenge on its platform.
    fn identify(&self) -> Filters;
}

pub fn strip_html(s: &str) -> String {
    TAG.replace_all(s, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        let html = "<p>Given an array <code>nums</code>&nbsp;return&nbsp;<em>indices</em>.</p>\n<pre>1 &lt; 2 &amp;&amp; 3 &gt; 2</pre>";
        assert_eq!(
            strip_html(html),
            "Given an array nums return indices.\n1 < 2 && 3 > 2"
        );
    }

    #[test]
    fn test_strip_html_decodes_amp_last() {
        assert_eq!(strip_html("&amp;lt;"), "&lt;");
    }
}
