pub mod hackerrank;
pub mod leetcode;
pub mod transport;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{BackendConfig, Challenge, Filters, Language, Platform, SubmissionReport};
use crate::submission::Schedule;

pub use hackerrank::HackerRank;
pub use leetcode::LeetCode;
use transport::HttpTransport;

/// Everything the CLI needs from a judge platform.
pub trait Provider {
    fn platform(&self) -> Platform;

    fn is_signed_in(&self) -> Result<bool>;

    /// The platform's identifier for `language`.
    fn localize_language(&self, language: Language) -> Result<&'static str> {
        language
            .platform_slug(self.platform())
            .ok_or_else(|| Error::UnknownLanguage {
                name: format!("{} on {}", language.key(), self.platform()),
            })
    }

    fn get_challenge(&self, filters: &Filters) -> Result<Box<dyn Challenge>>;

    /// Filters identifying a challenge that matches the given constraints.
    fn find_next_challenge(&self, filters: &Filters) -> Result<Filters>;

    fn submit(
        &self,
        filters: &Filters,
        language: Language,
        code: &str,
    ) -> Result<Box<dyn SubmissionReport>>;
}

/// Build the provider for `platform` over a real HTTP transport.
pub fn connect(platform: Platform, config: &BackendConfig) -> Result<Box<dyn Provider>> {
    let transport = HttpTransport::new(platform, config)?;
    let schedule = Schedule::new(config.poll_timeout(platform));

    let provider: Box<dyn Provider> = match platform {
        Platform::Leetcode => Box::new(LeetCode::new(transport, schedule)),
        Platform::Hackerrank => Box::new(
            HackerRank::new(transport, schedule).purchase_testcases(config.purchase_testcases),
        ),
    };
    Ok(provider)
}

/// Add an identifying pair, skipping values the platform returned that are
/// not usable as tokens.
pub(crate) fn add_identity(filters: &mut Filters, key: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    if let Err(e) = filters.add(key, value) {
        warn!(%key, %value, "skipping identity filter: {}", e);
    }
}

/// Judges send `null` for fields they have nothing to say about yet; read
/// those as the field's default.
pub(crate) fn or_default<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
