use crate::http::{build_client, get, url_with_params};
use crate::{ActivityConfig, ActivitySource, SourceError};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use swaudit_domain::evidence::ActivitySignal;
use swaudit_types::Citation;
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, OffsetDateTime};
use tracing::debug;

/// Page size for commit and release listings. Counts saturate at this value.
const PAGE_SIZE: &str = "100";

#[derive(Deserialize)]
struct CommitEntry {
    #[serde(default)]
    html_url: String,
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    #[serde(default)]
    message: String,
    author: Option<Signature>,
    committer: Option<Signature>,
}

#[derive(Deserialize)]
struct Signature {
    date: Option<String>,
}

#[derive(Deserialize)]
struct ReleaseEntry {
    #[serde(default)]
    tag_name: String,
    #[serde(default)]
    html_url: String,
    created_at: Option<String>,
}

/// GitHub repository activity (commits and releases within a window).
pub struct GithubActivitySource {
    config: ActivityConfig,
    token: Option<String>,
    client: Client,
    now: OffsetDateTime,
}

impl GithubActivitySource {
    pub fn new(
        config: ActivityConfig,
        token: Option<String>,
        now: OffsetDateTime,
    ) -> Result<Self, SourceError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self {
            config,
            token: token.filter(|t| !t.trim().is_empty()),
            client,
            now,
        })
    }

    /// Read the optional token from the configured environment variable.
    pub fn from_env(config: ActivityConfig, now: OffsetDateTime) -> Result<Self, SourceError> {
        let token = std::env::var(&config.token_env).ok();
        Self::new(config, token, now)
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Accept", "application/vnd.github+json".to_string()),
            ("X-GitHub-Api-Version", "2022-11-28".to_string()),
        ];
        if let Some(token) = &self.token {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        headers
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let base = format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path);
        let url = url_with_params(&base, params)?;
        let body = get(&self.client, url, &self.headers(), self.config.timeout_secs)?;
        serde_json::from_slice(&body).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

impl ActivitySource for GithubActivitySource {
    fn activity(&self, repository: &str, window_days: u32) -> Result<ActivitySignal, SourceError> {
        let (owner, repo) = parse_repository(repository)?;
        let since = self
            .now
            .checked_sub(Duration::days(i64::from(window_days)))
            .ok_or_else(|| SourceError::Parse(format!("activity window of {window_days} days")))?;
        let since_param = since
            .format(&Rfc3339)
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        debug!(%owner, %repo, window_days, "repository activity lookup");
        let commits_path = format!("repos/{owner}/{repo}/commits");
        let commits: Vec<CommitEntry> = self.fetch(
            &commits_path,
            &[("since", since_param.as_str()), ("per_page", PAGE_SIZE)],
        )?;

        // Nothing in the window: look up the latest commit overall so the report can say when.
        let latest: Vec<CommitEntry> = if commits.is_empty() {
            self.fetch(&commits_path, &[("per_page", "1")])?
        } else {
            Vec::new()
        };
        let newest = commits.first().or(latest.first());
        let last_commit = newest.and_then(commit_date);

        let releases: Vec<ReleaseEntry> = self.fetch(
            &format!("repos/{owner}/{repo}/releases"),
            &[("per_page", PAGE_SIZE)],
        )?;
        let recent_releases: Vec<&ReleaseEntry> = releases
            .iter()
            .filter(|r| {
                r.created_at
                    .as_deref()
                    .and_then(parse_timestamp)
                    .is_some_and(|t| t >= since)
            })
            .collect();

        let mut citations = vec![Citation {
            title: format!("{owner}/{repo}"),
            url: format!("https://github.com/{owner}/{repo}"),
            snippet: String::new(),
        }];
        if let Some(c) = newest {
            citations.push(Citation {
                title: c.commit.message.lines().next().unwrap_or("").to_string(),
                url: c.html_url.clone(),
                snippet: String::new(),
            });
        }
        if let Some(r) = recent_releases.first() {
            citations.push(Citation {
                title: r.tag_name.clone(),
                url: r.html_url.clone(),
                snippet: String::new(),
            });
        }

        debug!(
            %owner,
            %repo,
            commits = commits.len(),
            releases = recent_releases.len(),
            "repository activity lookup done"
        );
        Ok(ActivitySignal {
            commit_count: commits.len() as u64,
            release_count: recent_releases.len() as u64,
            last_commit,
            as_of: self.now.date(),
            citations,
        })
    }
}

fn commit_date(entry: &CommitEntry) -> Option<Date> {
    let author = entry.commit.author.as_ref().and_then(|s| s.date.as_deref());
    let committer = entry
        .commit
        .committer
        .as_ref()
        .and_then(|s| s.date.as_deref());
    author
        .or(committer)
        .and_then(parse_timestamp)
        .map(|t| t.date())
}

fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).ok()
}

/// Accepts `owner/repo` or a `github.com` URL (`https://github.com/owner/repo[.git][/...]`).
pub fn parse_repository(input: &str) -> Result<(String, String), SourceError> {
    let invalid = || SourceError::InvalidRepository(input.to_string());
    let trimmed = input.trim();

    let path = if let Some(rest) = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
    {
        let rest = rest.strip_prefix("www.").unwrap_or(rest);
        rest.strip_prefix("github.com/").ok_or_else(invalid)?
    } else if trimmed.contains("://") {
        return Err(invalid());
    } else {
        trimmed
    };

    let mut parts = path.split('/').filter(|p| !p.is_empty());
    let owner = parts.next().ok_or_else(invalid)?;
    let repo = parts.next().ok_or_else(invalid)?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    let valid = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    if !valid(owner) || !valid(repo) {
        return Err(invalid());
    }
    Ok((owner.to_string(), repo.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_urls_and_short_form() {
        let expected = ("apache".to_string(), "httpd".to_string());
        assert_eq!(parse_repository("apache/httpd").unwrap(), expected);
        assert_eq!(
            parse_repository("https://github.com/apache/httpd").unwrap(),
            expected
        );
        assert_eq!(
            parse_repository("https://www.github.com/apache/httpd.git").unwrap(),
            expected
        );
        assert_eq!(
            parse_repository("https://github.com/apache/httpd/tree/trunk").unwrap(),
            expected
        );
    }

    #[test]
    fn rejects_other_hosts_and_partial_paths() {
        assert!(parse_repository("https://gitlab.com/apache/httpd").is_err());
        assert!(parse_repository("https://github.com/apache").is_err());
        assert!(parse_repository("ftp://github.com/apache/httpd").is_err());
        assert!(parse_repository("apache/ht tpd").is_err());
    }
}
