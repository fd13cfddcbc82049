pub mod background;
pub mod parser;

pub use background::BackgroundParser;
pub use parser::SyncParser;

use crate::http_client;
use chrono::DateTime;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("failed to fetch feed: {0}")]
    Fetch(String),

    #[error("{0}")]
    Schema(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationDate {
    pub date: String,
    pub timezone: String,
}

impl PublicationDate {
    /// `date` holds Unix seconds as a decimal string in the wire format.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let seconds = self.date.parse::<i64>().ok()?;

        DateTime::from_timestamp(seconds, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub heading: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    pub description: Option<String>,
    pub content: String,
    pub pub_date: Option<PublicationDate>,
}

impl PostRecord {
    pub fn display_heading(&self) -> &str {
        match &self.heading {
            Some(heading) if !heading.is_empty() => heading,
            _ => &self.title,
        }
    }
}

pub trait ParseFeed {
    fn parse(&self, raw: &str) -> Result<Vec<PostRecord>, FeedError>;
}

pub fn load_feed(url: &str) -> Result<Vec<PostRecord>, FeedError> {
    let body = http_client::read_url(url)?;

    parse_feed(&body)
}

pub fn parse_feed(raw: &str) -> Result<Vec<PostRecord>, FeedError> {
    if background::worker_available() {
        BackgroundParser.parse(raw)
    } else {
        SyncParser.parse(raw)
    }
}
