use crate::SourceError;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::io::Read;
use std::time::Duration;

const USER_AGENT: &str = concat!("swaudit/", env!("CARGO_PKG_VERSION"));

/// Hard upper bound on response bodies.
const MAX_RESPONSE_BYTES: u64 = 8 * 1024 * 1024;

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, SourceError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .redirect(Policy::limited(5))
        .build()
        .map_err(|e| SourceError::Transport(format!("http client build failed: {e}")))
}

pub(crate) fn url_with_params(base: &str, params: &[(&str, &str)]) -> Result<Url, SourceError> {
    Url::parse_with_params(base, params)
        .map_err(|e| SourceError::Transport(format!("invalid url {base}: {e}")))
}

/// GET `url` and return the body of a 2xx response.
pub(crate) fn get(
    client: &Client,
    url: Url,
    headers: &[(&str, String)],
    timeout_secs: u64,
) -> Result<Vec<u8>, SourceError> {
    let mut request = client.get(url);
    for (name, value) in headers {
        request = request.header(*name, value.as_str());
    }

    let response = request.send().map_err(|e| classify(e, timeout_secs))?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }

    let mut body = Vec::new();
    response
        .take(MAX_RESPONSE_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|e| SourceError::Transport(format!("failed to read response: {e}")))?;
    if body.len() as u64 > MAX_RESPONSE_BYTES {
        return Err(SourceError::Parse("response exceeds size limit".to_string()));
    }
    Ok(body)
}

fn classify(err: reqwest::Error, timeout_secs: u64) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout(timeout_secs)
    } else {
        // The url may carry an api key.
        SourceError::Transport(err.without_url().to_string())
    }
}
