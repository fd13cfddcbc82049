use crate::config::Config;
use crate::feed::{FeedError, ParseFeed, PostRecord, SyncParser};
use std::sync::mpsc;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

const PROBE_FEED: &str =
    "<feed><channel><item><title>probe</title><id>0</id></item></channel></feed>";

static WORKER_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Parses the feed on a disposable worker thread, one per call. The input
/// is moved into the worker and records come back over a channel, so the
/// two threads share nothing.
pub struct BackgroundParser;

#[derive(Debug)]
pub enum WorkerFailure {
    Spawn(String),
    Disconnected,
    TimedOut,
}

impl BackgroundParser {
    /// The outer `Err` is a worker-level failure; the inner result is the
    /// parse outcome as the worker reported it.
    pub fn try_parse(
        &self,
        raw: &str,
    ) -> Result<Result<Vec<PostRecord>, FeedError>, WorkerFailure> {
        let (sender, receiver) = mpsc::channel();
        let raw = raw.to_string();

        let handle = thread::Builder::new()
            .name("feed-parser".to_string())
            .spawn(move || {
                let _ = sender.send(SyncParser.parse(&raw));
            })
            .map_err(|error| WorkerFailure::Spawn(format!("{}", error)))?;

        let result = match receiver.recv_timeout(worker_timeout()) {
            Ok(result) => Ok(result),
            Err(RecvTimeoutError::Timeout) => Err(WorkerFailure::TimedOut),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerFailure::Disconnected),
        };

        // A timed-out worker is left to finish detached; it holds no
        // state the caller can observe.
        if result.is_ok() {
            let _ = handle.join();
        }

        result
    }
}

impl ParseFeed for BackgroundParser {
    fn parse(&self, raw: &str) -> Result<Vec<PostRecord>, FeedError> {
        match self.try_parse(raw) {
            Ok(result) => result,
            Err(failure) => {
                log::warn!(
                    "Background feed parse failed ({:?}), retrying synchronously",
                    failure
                );

                SyncParser.parse(raw)
            }
        }
    }
}

/// Probed once per process; a failing probe pins all parses to the
/// calling thread.
pub fn worker_available() -> bool {
    *WORKER_AVAILABLE.get_or_init(probe_worker)
}

fn probe_worker() -> bool {
    matches!(BackgroundParser.try_parse(PROBE_FEED), Ok(Ok(_)))
}

fn worker_timeout() -> Duration {
    Duration::from_secs(Config::parse_worker_timeout_in_seconds())
}

#[cfg(test)]
mod tests {
    use super::{worker_available, BackgroundParser};
    use crate::feed::{FeedError, ParseFeed, SyncParser};

    #[test]
    fn it_reports_an_available_worker() {
        assert!(worker_available());
    }

    #[test]
    fn it_produces_the_same_records_as_the_sync_parser() {
        let feed = "<feed><channel>\
            <item><title>First</title><id>a</id><content><p>one</p></content></item>\
            <item><title>Second</title><id>b</id></item>\
            </channel></feed>";

        let background = BackgroundParser.parse(feed).unwrap();
        let sync = SyncParser.parse(feed).unwrap();

        assert_eq!(background, sync);
    }

    #[test]
    fn it_surfaces_schema_errors_from_the_worker() {
        let result = BackgroundParser.parse("<feed><channel></channel></feed>");

        assert_eq!(
            result,
            Err(FeedError::Schema("feed channel contains no items".to_string()))
        );
    }
}
