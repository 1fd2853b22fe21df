mod checkout;
mod login;
mod submit;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::error::{Error, Result};
use crate::exit_codes;
use crate::models::{config, BackendConfig, Filters, Language, Platform, UserConfig};
use crate::provider::{self, Provider};

#[derive(Parser)]
#[command(name = "coderound")]
#[command(about = "Check out judge challenges as source files and submit them back", long_about = None)]
pub struct Cli {
    /// Judge platform, defaults to the one in the file or in the config
    #[arg(long, global = true, value_enum)]
    pub provider: Option<Platform>,

    /// Log requests and poll attempts to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that name a challenge.
#[derive(Args, Debug, Default)]
pub struct Target {
    /// Challenge slug
    #[arg(short = 'p', long = "problem")]
    pub slug: Option<String>,

    /// Numeric question id (leetcode)
    #[arg(short, long)]
    pub id: Option<String>,

    /// Language key or file extension, e.g. rust, cpp, py
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Contest slug (hackerrank)
    #[arg(short, long)]
    pub contest: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a challenge out as a source file
    Checkout {
        #[command(flatten)]
        target: Target,

        #[arg(short, long)]
        difficulty: Option<String>,

        /// todo, attempted or solved (leetcode); unsolved, solved (hackerrank)
        #[arg(long)]
        status: Option<String>,

        /// A single tag / subdomain slug
        #[arg(short, long)]
        tags: Option<String>,

        /// Track to search in (hackerrank)
        #[arg(long)]
        track: Option<String>,

        /// Directory or file to write to, stdout when absent
        path: Option<PathBuf>,
    },
    /// Submit a checked out source file
    Submit {
        #[command(flatten)]
        target: Target,

        /// Buy locked test cases to show why a submission failed (hackerrank)
        #[arg(long)]
        purchase: bool,

        /// Source file, stdin when absent
        path: Option<PathBuf>,
    },
    /// Store session credentials for a platform
    Login {
        #[arg(value_enum, value_name = "PROVIDER")]
        platform: Platform,

        #[arg(long)]
        csrf: Option<String>,

        #[arg(long)]
        session: Option<String>,

        /// Header carrying the CSRF token, if the platform renamed it
        #[arg(long)]
        csrf_header: Option<String>,
    },
}

/// Everything a command resolved from flags, config and file metadata.
#[derive(Debug, Clone)]
pub struct Context {
    pub platform: Platform,
    pub language: Language,
    pub filters: Filters,
    pub path: Option<PathBuf>,
}

/// Runs the command and returns the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Checkout {
            target,
            difficulty,
            status,
            tags,
            track,
            path,
        } => {
            let user_config = config::load_config()?;
            let mut filters = target_filters(&target)?;
            for (key, value) in [
                ("difficulty", &difficulty),
                ("status", &status),
                ("tags", &tags),
                ("track", &track),
            ] {
                if let Some(value) = value {
                    filters.add(key, value)?;
                }
            }

            let platform = cli
                .provider
                .or(user_config.default_provider)
                .unwrap_or(Platform::Leetcode);
            let language = resolve_language(&target, &filters, path.as_deref(), &user_config)?;
            let ctx = Context {
                platform,
                language,
                filters,
                path,
            };

            let provider = connect(platform, user_config.backend(platform)?.clone())?;
            checkout::checkout(&ctx, provider.as_ref())?;
            Ok(exit_codes::SUCCESS)
        }
        Commands::Submit {
            target,
            purchase,
            path,
        } => {
            let user_config = config::load_config()?;
            let text = submit::read_source(path.as_deref())?;
            let ctx = submit::resolve(cli.provider, &target, path, &text, &user_config)?;

            let mut backend = user_config.backend(ctx.platform)?.clone();
            backend.purchase_testcases |= purchase;
            let provider = connect(ctx.platform, backend)?;

            let report = submit::submit(&ctx, provider.as_ref(), &text)?;
            Ok(report.exit_code())
        }
        Commands::Login {
            platform,
            csrf,
            session,
            csrf_header,
        } => {
            let path = config::get_config_path()?;
            login::login(&path, platform, csrf, session, csrf_header)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn target_filters(target: &Target) -> Result<Filters> {
    let mut filters = Filters::new();
    for (key, value) in [
        ("slug", &target.slug),
        ("id", &target.id),
        ("contest", &target.contest),
    ] {
        if let Some(value) = value {
            filters.add(key, value)?;
        }
    }
    Ok(filters)
}

/// `--lang`, then the `lang` filter, then the file extension, then the
/// configured default.
fn resolve_language(
    target: &Target,
    filters: &Filters,
    path: Option<&Path>,
    user_config: &UserConfig,
) -> Result<Language> {
    if let Some(lang) = &target.lang {
        return Language::from_key(lang).or_else(|_| Language::from_extension(lang));
    }
    if filters.contains("lang") {
        return Language::from_key(filters.get("lang")?);
    }
    if let Some(ext) = path
        .filter(|p| !p.is_dir())
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
    {
        return Language::from_extension(ext);
    }
    user_config.default_language.ok_or_else(|| Error::UnknownLanguage {
        name: "none given, pass --lang".to_string(),
    })
}

fn connect(platform: Platform, backend: BackendConfig) -> Result<Box<dyn Provider>> {
    let provider = provider::connect(platform, &backend)?;
    if !provider.is_signed_in()? {
        return Err(Error::NotSignedIn {
            platform: platform.to_string(),
        });
    }
    debug!(%platform, "signed in");
    Ok(provider)
}
