// src/core/net.rs
// Blocking HTTP POST with timeout and retry/backoff.

use std::thread;

use reqwest::blocking::{Client, Response};

use crate::config::options::ClientOptions;
use crate::error::FetchError;
use crate::progress::Progress;

pub fn build_client(opts: &ClientOptions) -> Result<Client, FetchError> {
    Ok(Client::builder()
        .user_agent(opts.user_agent.as_str())
        .timeout(opts.timeout())
        .build()?)
}

/// POST `form` to `url` with `query`, retrying transient failures.
///
/// Retries transport errors (connect/timeout) and the statuses in
/// `RETRY_STATUSES`. Any other response is returned as-is for the caller
/// to judge. After the last retry the final error or response wins.
pub fn post_form(
    client: &Client,
    opts: &ClientOptions,
    query: &[(&str, &str)],
    form: &[(&'static str, String)],
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<Response, FetchError> {
    let attempts = opts.max_retries.saturating_add(1);
    let mut attempt = 1u32;

    loop {
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Fetching data… (attempt {attempt}/{attempts})"));
        }
        logd!("Net: POST {} attempt {attempt}/{attempts}", opts.api_url);

        let result = client.post(&opts.api_url).query(query).form(form).send();

        let retry_reason = match &result {
            Ok(resp) if ClientOptions::should_retry_status(resp.status().as_u16()) => {
                Some(format!("status {}", resp.status().as_u16()))
            }
            Ok(_) => None,
            Err(e) if e.is_timeout() || e.is_connect() => Some(e.to_string()),
            Err(_) => None,
        };

        match retry_reason {
            Some(reason) if attempt < attempts => {
                let delay = opts.backoff_delay(attempt);
                logw!("Net: attempt {attempt} failed ({reason}), retrying in {delay:?}");
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("Retrying in {:.1}s ({reason})", delay.as_secs_f64()));
                }
                thread::sleep(delay);
                attempt += 1;
            }
            _ => return Ok(result?),
        }
    }
}
