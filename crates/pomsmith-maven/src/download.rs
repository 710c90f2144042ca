//! Metadata downloading from Maven repositories.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;

use pomsmith_util::errors::PomsmithError;

use crate::repository::MavenRepository;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a shared blocking client for repository requests.
pub fn build_client() -> Result<Client, PomsmithError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("pomsmith/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| PomsmithError::Network {
            message: format!("Failed to create HTTP client: {e}"),
        })
}

/// Attach the repository's credentials from `[credentials.<name>]`. A
/// password without a username is sent as a bearer token.
fn authorize(request: RequestBuilder, repo: &MavenRepository) -> RequestBuilder {
    if repo.has_auth() {
        tracing::debug!("authenticating to {}", repo.name);
    }
    match (repo.username.as_deref(), repo.password.as_deref()) {
        (Some(user), password) => request.basic_auth(user, password),
        (None, Some(token)) => request.bearer_auth(token),
        (None, None) => request,
    }
}

/// Download a text document, with authentication and retries.
///
/// Returns `Ok(None)` for 404 (not published in this repository). Server
/// errors, timeouts and connection failures are retried.
pub fn download_text(
    client: &Client,
    repo: &MavenRepository,
    url: &str,
) -> Result<Option<String>, PomsmithError> {
    let mut last_err = String::new();

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            tracing::debug!("retrying {url} (attempt {})", attempt + 1);
            std::thread::sleep(RETRY_DELAY * attempt);
        }

        let request = authorize(client.get(url), repo);
        match request.send() {
            Ok(resp) => {
                let status = resp.status();
                if status == StatusCode::NOT_FOUND {
                    tracing::debug!("{url} not found in {}", repo.name);
                    return Ok(None);
                }
                if status.is_server_error() {
                    last_err = format!("HTTP {status} from {url}");
                    continue;
                }
                if !status.is_success() {
                    return Err(PomsmithError::Network {
                        message: format!("HTTP {status} fetching {url}"),
                    });
                }
                let body = resp.text().map_err(|e| PomsmithError::Network {
                    message: format!("Failed to read response from {url}: {e}"),
                })?;
                return Ok(Some(body));
            }
            Err(e) if e.is_timeout() || e.is_connect() => {
                last_err = e.to_string();
                continue;
            }
            Err(e) => {
                return Err(PomsmithError::Network {
                    message: format!("Request to {url} failed: {e}"),
                });
            }
        }
    }

    Err(PomsmithError::Network {
        message: format!("Failed after {MAX_RETRIES} attempts for {url}: {last_err}"),
    })
}
