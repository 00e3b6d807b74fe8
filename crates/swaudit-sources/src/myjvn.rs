use crate::http::{build_client, get, url_with_params};
use crate::{SourceError, VulnerabilityDbConfig, VulnerabilitySource};
use reqwest::blocking::Client;
use swaudit_domain::evidence::VulnerabilitySignal;
use swaudit_types::Citation;
use time::Date;
use tracing::debug;

const DESCRIPTION_LIMIT: usize = 200;

/// MyJVN `getVulnOverviewList` client.
pub struct MyJvnSource {
    config: VulnerabilityDbConfig,
    client: Client,
    /// Reference date for the lookback window.
    as_of: Date,
}

impl MyJvnSource {
    pub fn new(config: VulnerabilityDbConfig, as_of: Date) -> Result<Self, SourceError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self {
            config,
            client,
            as_of,
        })
    }

    fn search_page_citation(&self, subject: &str) -> Result<Citation, SourceError> {
        let url = url_with_params(
            &self.config.search_page,
            &[
                ("mode", "_vulnerability_search_IA_VulnSearch"),
                ("keyword", subject),
            ],
        )?;
        Ok(Citation {
            title: format!("JVN iPedia search: {subject}"),
            url: url.to_string(),
            snippet: String::new(),
        })
    }
}

impl VulnerabilitySource for MyJvnSource {
    fn vulnerability_count(
        &self,
        subject: &str,
        lookback_years: u32,
    ) -> Result<VulnerabilitySignal, SourceError> {
        let start_year = (self.as_of.year() - lookback_years as i32).to_string();
        let url = url_with_params(
            &self.config.endpoint,
            &[
                ("method", "getVulnOverviewList"),
                ("feed", "hnd"),
                ("keyword", subject),
                ("rangeDatePublished", "n"),
                ("rangeDateFirstPublished", "n"),
                ("datePublicStartY", start_year.as_str()),
            ],
        )?;

        debug!(subject, start_year = start_year.as_str(), "vulnerability lookup");
        let body = get(&self.client, url, &[], self.config.timeout_secs)?;
        let text = std::str::from_utf8(&body).map_err(|e| SourceError::Parse(e.to_string()))?;

        let mut signal = parse_overview(text)?;
        signal.citations.insert(0, self.search_page_citation(subject)?);
        debug!(subject, count = signal.count, "vulnerability lookup done");
        Ok(signal)
    }
}

/// Parse a `getVulnOverviewList` response.
///
/// The count is the status block's `totalRes`; when that is absent, the `item` elements in the
/// response are counted. A non-zero `retCd` or a non-empty `errCd` is a service error.
pub fn parse_overview(xml: &str) -> Result<VulnerabilitySignal, SourceError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| SourceError::Parse(e.to_string()))?;

    let status = doc.descendants().find(|n| n.has_tag_name("Status"));
    let mut total: Option<u64> = None;
    if let Some(status) = status {
        let ret_cd = status.attribute("retCd").unwrap_or("0").trim();
        let err_cd = status.attribute("errCd").unwrap_or("").trim();
        if (!ret_cd.is_empty() && ret_cd != "0") || !err_cd.is_empty() {
            let message = status
                .attribute("errMsg")
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(err_cd);
            return Err(SourceError::Service(format!("MyJVN error {err_cd}: {message}")));
        }
        total = status
            .attribute("totalRes")
            .and_then(|t| t.trim().parse::<u64>().ok());
    }

    let citations: Vec<Citation> = doc
        .descendants()
        .filter(|n| n.has_tag_name("item"))
        .map(|item| {
            let child = |name: &str| {
                item.children()
                    .find(|c| c.has_tag_name(name))
                    .and_then(|c| c.text())
                    .map(str::trim)
                    .unwrap_or("")
                    .to_string()
            };
            Citation {
                title: child("title"),
                url: child("link"),
                snippet: truncate(&child("description"), DESCRIPTION_LIMIT),
            }
        })
        .collect();

    Ok(VulnerabilitySignal {
        count: total.unwrap_or(citations.len() as u64),
        citations,
    })
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push_str("...");
    out
}
