use crate::config::Config;
use crate::feed::FeedError;
use isahc::config::RedirectPolicy;
use isahc::prelude::*;
use isahc::HttpClient;
use std::sync::OnceLock;
use std::time::Duration;

static CLIENT: OnceLock<HttpClient> = OnceLock::new();

pub fn client() -> &'static HttpClient {
    CLIENT.get_or_init(init_client)
}

pub fn read_url(url: &str) -> Result<String, FeedError> {
    match client().get(url) {
        Ok(mut response) => {
            if !response.status().is_success() {
                return Err(FeedError::Fetch(format!(
                    "{} responded with {}",
                    url,
                    response.status()
                )));
            }

            response
                .text()
                .map_err(|error| FeedError::Fetch(format!("{}", error)))
        }
        Err(error) => Err(FeedError::Fetch(format!("{}", error))),
    }
}

fn init_client() -> HttpClient {
    HttpClient::builder()
        .redirect_policy(RedirectPolicy::Limit(10))
        .timeout(request_timeout_seconds())
        .build()
        .unwrap()
}

fn request_timeout_seconds() -> Duration {
    let secs = Config::request_timeout_in_seconds();

    Duration::from_secs(secs)
}
