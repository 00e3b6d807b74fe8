/// SerpAPI-compatible web search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub endpoint: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub num_results: u32,
    /// `hl` parameter.
    pub language: String,
    /// `gl` parameter.
    pub country: String,
}

/// MyJVN API (`getVulnOverviewList`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VulnerabilityDbConfig {
    pub endpoint: String,
    /// Human-facing search page cited alongside the count.
    pub search_page: String,
    pub timeout_secs: u64,
}

/// GitHub REST API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityConfig {
    pub endpoint: String,
    /// Environment variable holding an optional access token.
    pub token_env: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSettings {
    pub search: SearchConfig,
    pub vulnerability: VulnerabilityDbConfig,
    pub activity: ActivityConfig,
}
