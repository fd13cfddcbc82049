use chrono::DateTime;
use glitchfeed::feed::{parse_feed, BackgroundParser, FeedError, ParseFeed, SyncParser};
use std::fs;

#[test]
fn it_parses_the_example_feed_in_document_order() {
    let xml_feed = fs::read_to_string("./tests/support/blog_feed_example.xml").unwrap();

    let records = parse_feed(&xml_feed).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].id, "signal-decay");
    assert_eq!(records[1].id, "redactions");
    assert_eq!(records[2].id, "transmission-3");
}

#[test]
fn it_extracts_item_fields_from_the_example_feed() {
    let xml_feed = fs::read_to_string("./tests/support/blog_feed_example.xml").unwrap();

    let records = parse_feed(&xml_feed).unwrap();
    let first = &records[0];

    assert_eq!(first.title, "Signal Decay");
    assert_eq!(first.display_heading(), "Signal Decay, Revisited");
    assert_eq!(first.post_type.as_deref(), Some("essay"));
    assert_eq!(
        first.description.as_deref(),
        Some("On the half-life of personal archives.")
    );
    assert!(first.content.contains("<censor>hunter2</censor>"));

    let published = first.pub_date.as_ref().unwrap();
    assert_eq!(published.timezone, "GMT");
    assert_eq!(
        published.to_utc(),
        DateTime::from_timestamp(1_700_000_000, 0)
    );

    assert_eq!(records[1].display_heading(), "Redactions");
}

#[test]
fn it_parses_identically_on_both_execution_paths() {
    let xml_feed = fs::read_to_string("./tests/support/blog_feed_example.xml").unwrap();

    let background = BackgroundParser.parse(&xml_feed).unwrap();
    let sync = SyncParser.parse(&xml_feed).unwrap();

    assert_eq!(background, sync);
}

#[test]
fn it_fails_on_a_channel_without_items() {
    let result = parse_feed("<feed><channel></channel></feed>");

    assert_eq!(
        result,
        Err(FeedError::Schema("feed channel contains no items".to_string()))
    );
}

#[test]
fn it_fails_the_whole_load_on_a_single_bad_item() {
    let feed = "<feed><channel>\
        <item><title>Good</title><id>good</id></item>\
        <item><title>Bad</title></item>\
        <item><title>Also good</title><id>also-good</id></item>\
        </channel></feed>";

    let result = parse_feed(feed);

    assert_eq!(
        result,
        Err(FeedError::Schema(
            "feed item 2 is missing required element <id>".to_string()
        ))
    );
}
