use std::env;

const DEFAULT_REQUEST_TIMEOUT: u64 = 10;
const DEFAULT_PARSE_WORKER_TIMEOUT: u64 = 5;

pub struct Config;

impl Config {
    pub fn feed_url() -> Option<String> {
        env::var("FEED_URL").ok()
    }

    pub fn request_timeout_in_seconds() -> u64 {
        Self::read_u64("REQUEST_TIMEOUT_IN_SECONDS", DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn parse_worker_timeout_in_seconds() -> u64 {
        Self::read_u64("PARSE_WORKER_TIMEOUT_IN_SECONDS", DEFAULT_PARSE_WORKER_TIMEOUT)
    }

    pub fn glitch_font_pool() -> Vec<String> {
        match env::var("GLITCH_FONTS") {
            Ok(value) => value
                .split(',')
                .map(|font| font.trim().to_string())
                .filter(|font| !font.is_empty())
                .collect(),
            Err(_) => vec![],
        }
    }

    fn read_u64(name: &str, default: u64) -> u64 {
        match env::var(name) {
            Ok(value) => value.parse::<u64>().unwrap_or(default),
            Err(_) => default,
        }
    }
}
