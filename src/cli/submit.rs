use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{resolve_language, target_filters, Context, Target};
use crate::codec;
use crate::display::display_report;
use crate::error::Result;
use crate::models::{Filters, Platform, Report, UserConfig};
use crate::provider::Provider;

pub fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Work out platform, language and filters for a source file. Explicit flags
/// win over the file's metadata line.
pub fn resolve(
    provider: Option<Platform>,
    target: &Target,
    path: Option<PathBuf>,
    text: &str,
    user_config: &UserConfig,
) -> Result<Context> {
    let metadata = codec::read_metadata(text);

    let platform = match (provider, &metadata) {
        (Some(platform), _) => platform,
        (None, Some(metadata)) => Platform::from_name(&metadata.platform)?,
        (None, None) => user_config.default_provider.unwrap_or(Platform::Leetcode),
    };

    let tagged = metadata.map(|m| m.filters).unwrap_or_default();
    let filters = tagged.merge(&target_filters(target)?);
    let language = resolve_language(target, &filters, path.as_deref(), user_config)?;
    debug!(%platform, %language, %filters, "resolved submission");

    Ok(Context {
        platform,
        language,
        filters,
        path,
    })
}

/// Decode the solution, submit it and print the verdict.
pub fn submit(ctx: &Context, provider: &dyn Provider, text: &str) -> Result<Report> {
    let code = codec::decode(ctx.platform.name(), text)?;
    let lang = provider.localize_language(ctx.language)?;
    debug!(%lang, bytes = code.len(), "decoded solution");

    let mut filters: Filters = ctx.filters.clone();
    filters.remove("lang");

    let outcome = provider.submit(&filters, ctx.language, &code)?;
    info!(submission = %outcome.identify(), verdict = ?outcome.verdict(), "judged");

    let report = outcome.classify();
    display_report(&report);
    Ok(report)
}
