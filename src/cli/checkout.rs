use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::Context;
use crate::codec;
use crate::error::Result;
use crate::provider::Provider;

/// Fetch the challenge named by the context (or the next one matching its
/// filters) and write it out as a source file.
pub fn checkout(ctx: &Context, provider: &dyn Provider) -> Result<()> {
    provider.localize_language(ctx.language)?;

    let filters = if ctx.filters.contains("slug") {
        ctx.filters.clone()
    } else {
        let next = provider.find_next_challenge(&ctx.filters)?;
        info!(next = %next, "picked next challenge");
        ctx.filters.merge(&next)
    };

    let challenge = provider.get_challenge(&filters)?;
    let mut metadata = challenge.identify();
    metadata.add("lang", ctx.language.key())?;

    let text = codec::encode(
        ctx.platform.name(),
        ctx.language,
        &metadata,
        challenge.as_ref(),
    )?;

    let Some(path) = &ctx.path else {
        print!("{}", text);
        if !challenge.files().is_empty() {
            warn!("extra challenge files are only written when a path is given");
        }
        return Ok(());
    };

    let target = destination(path, metadata.get_or_default("slug"), ctx.language.extension());
    if write_new(&target, &text)? {
        println!(
            "Checked out {} ({})",
            target.display(),
            ctx.language.display_name()
        );
    }

    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    for (name, contents) in challenge.files() {
        let extra = dir.join(name);
        if write_new(&extra, &contents)? {
            println!("Wrote {}", extra.display());
        }
    }

    Ok(())
}

fn destination(path: &Path, slug: &str, extension: &str) -> PathBuf {
    if path.is_dir() {
        path.join(format!("{}.{}", slug, extension))
    } else {
        path.to_path_buf()
    }
}

/// Write `contents` unless the file already exists.
fn write_new(path: &Path, contents: &str) -> Result<bool> {
    if path.exists() {
        warn!(path = %path.display(), "file already exists, not overwriting");
        return Ok(false);
    }
    fs::write(path, contents)?;
    Ok(true)
}
