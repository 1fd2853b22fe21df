use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Leetcode,
    Hackerrank,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Leetcode, Platform::Hackerrank];

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Leetcode => "leetcode",
            Platform::Hackerrank => "hackerrank",
        }
    }

    pub fn from_name(name: &str) -> Result<Platform> {
        Platform::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| Error::UnknownProvider {
                name: name.to_string(),
            })
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Platform::Leetcode => "https://leetcode.com",
            Platform::Hackerrank => "https://www.hackerrank.com",
        }
    }

    pub fn session_cookie(&self) -> &'static str {
        match self {
            Platform::Leetcode => "LEETCODE_SESSION",
            Platform::Hackerrank => "_hrank_session",
        }
    }

    pub fn default_csrf_header(&self) -> &'static str {
        match self {
            Platform::Leetcode => "X-CSRFToken",
            Platform::Hackerrank => "X-CSRF-Token",
        }
    }

    /// How long a submission may stay in the judge queue before giving up.
    pub fn default_poll_timeout(&self) -> Duration {
        match self {
            Platform::Leetcode => Duration::from_secs(120),
            Platform::Hackerrank => Duration::from_secs(5),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
