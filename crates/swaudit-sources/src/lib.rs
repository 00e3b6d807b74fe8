//! Evidence sources.
//!
//! Each source performs bounded, blocking HTTP requests and returns a raw signal or a
//! [`SourceError`]. Sources never classify; that is the domain crate's job.

#![forbid(unsafe_code)]

mod config;
mod error;
mod github;
mod http;
mod myjvn;
mod search;

use swaudit_domain::evidence::{ActivitySignal, VulnerabilitySignal};
use swaudit_types::Citation;

pub use config::{ActivityConfig, SearchConfig, SourceSettings, VulnerabilityDbConfig};
pub use error::SourceError;
pub use github::{GithubActivitySource, parse_repository};
pub use myjvn::{MyJvnSource, parse_overview};
pub use search::SerpApiSearch;

/// Web search returning bounded `{title, url, snippet}` hits.
pub trait SearchSource {
    fn search(&self, query: &str) -> Result<Vec<Citation>, SourceError>;
}

/// Vulnerability database lookup.
pub trait VulnerabilitySource {
    fn vulnerability_count(
        &self,
        subject: &str,
        lookback_years: u32,
    ) -> Result<VulnerabilitySignal, SourceError>;
}

/// Source-hosting activity lookup.
pub trait ActivitySource {
    fn activity(&self, repository: &str, window_days: u32) -> Result<ActivitySignal, SourceError>;
}
