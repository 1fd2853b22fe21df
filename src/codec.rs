use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::models::{Challenge, CommentStyle, Filters, Language};

static METADATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9_-]+) metadata:\s*").unwrap());

/// Platform and filters recovered from a source file's metadata line.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub platform: String,
    pub filters: Filters,
}

fn begin_marker(platform: &str) -> String {
    format!("{} submit region begin", platform)
}

fn end_marker(platform: &str) -> String {
    format!("{} submit region end", platform)
}

/// Split every occurrence of `token` with a space, e.g. `*/` becomes `* /`.
/// Repeats until none is left, since `""""` still holds `"""` after one pass.
fn break_up(line: &str, token: &str) -> String {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return line.to_string();
    };
    let split = format!("{} {}", first, chars.as_str());

    let mut out = line.to_string();
    while out.contains(token) {
        out = out.replace(token, &split);
    }
    out
}

/// Make sure prose can't end the header comment early. Nesting comments
/// also lose their opener, or the final closer would only end the inner one.
fn neutralize(line: &str, style: &CommentStyle) -> String {
    let out = break_up(line, style.block_close);
    if style.nests {
        break_up(&out, style.block_open)
    } else {
        out
    }
}

fn write_header(out: &mut String, header: &str, style: &CommentStyle) {
    if style.has_block() {
        out.push_str(style.block_open);
        out.push('\n');
        for line in header.lines() {
            let commented = format!("{}{}", style.block_line, neutralize(line, style));
            out.push_str(commented.trim_end());
            out.push('\n');
        }
        out.push_str(style.block_close);
        out.push('\n');
    } else {
        for line in header.lines() {
            let commented = format!("{}{}", style.line, line);
            out.push_str(commented.trim_end());
            out.push('\n');
        }
    }
}

/// Render a challenge as a source file: a comment header carrying the
/// metadata line and the prompt, then the starter snippet between the
/// submission region markers.
pub fn encode(
    platform: &str,
    language: Language,
    filters: &Filters,
    challenge: &dyn Challenge,
) -> Result<String> {
    let snippet = challenge.snippet(language)?;

    let header = format!(
        "{} metadata: {}\n\n{}",
        platform,
        filters.render(),
        challenge.prompt().trim_end()
    );

    let mut out = String::new();
    write_header(&mut out, &header, &language.comment_style());

    let prefix = language.region_prefix();
    out.push('\n');
    out.push_str(&format!("{}{}\n", prefix, begin_marker(platform)));
    out.push_str(&snippet);
    out.push('\n');
    out.push_str(&format!("{}{}\n", prefix, end_marker(platform)));
    out.push('\n');

    Ok(out)
}

fn is_marker(line: &str, marker: &str) -> bool {
    line.trim_start_matches(|c: char| !c.is_alphanumeric())
        .starts_with(marker)
}

/// Recover the solution from between the submission region markers.
///
/// Bytes are returned exactly as written, except for the newline that
/// separates the solution from the end marker.
pub fn decode(platform: &str, text: &str) -> Result<String> {
    let begin = begin_marker(platform);
    let end = end_marker(platform);

    let mut offset = 0;
    let mut start = None;
    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        match start {
            None => {
                if is_marker(line, &begin) {
                    start = Some(offset);
                }
            }
            Some(start) => {
                if is_marker(line, &end) {
                    let region = &text[start..line_start];
                    return Ok(region.strip_suffix('\n').unwrap_or(region).to_string());
                }
            }
        }
    }

    Err(Error::NoSubmissionRegion)
}

/// Find the first `<platform> metadata: k=v ...` line.
pub fn read_metadata(text: &str) -> Option<Metadata> {
    text.lines().find_map(|line| {
        let caps = METADATA.captures(line)?;
        let whole = caps.get(0)?;
        Some(Metadata {
            platform: caps[1].to_string(),
            filters: Filters::parse(&line[whole.end()..]),
        })
    })
}
