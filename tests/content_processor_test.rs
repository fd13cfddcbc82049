use glitchfeed::content::{process_content, ContentProcessor};
use glitchfeed::feed::parse_feed;
use std::fs;

#[test]
fn it_censors_content_from_a_parsed_feed() {
    let feed = "<feed><channel><item>\
        <title>T</title><id>1</id>\
        <content><censor>hi</censor></content>\
        </item></channel></feed>";

    let records = parse_feed(feed).unwrap();
    assert_eq!(records[0].id, "1");
    assert_eq!(records[0].title, "T");

    let output = process_content(&records[0].content, &[]);

    assert_eq!(output.matches('\u{2588}').count(), 2);
    assert!(!output.contains("hi"));
}

#[test]
fn it_processes_every_post_of_the_example_feed() {
    let xml_feed = fs::read_to_string("./tests/support/blog_feed_example.xml").unwrap();
    let records = parse_feed(&xml_feed).unwrap();

    let processor = ContentProcessor::builder()
        .font_pool(vec!["VT323".to_string(), "Rubik Glitch".to_string()])
        .seed(Some(99))
        .build();

    let first = processor.process(&records[0].content);
    assert!(first.contains("The rest rot loudly."));
    assert!(first.contains("<br>"));
    assert!(!first.contains("<br/>"));
    assert_eq!(first.matches('\u{2588}').count(), "hunter2".len());
    assert!(!first.contains("hunter2"));

    let second = processor.process(&records[1].content);
    assert!(second.contains("class=\"partially-censored\""));
    assert!(!second.contains("classified"));
    assert_eq!(second.matches("glitch-char").count(), "static".len());

    let third = processor.process(&records[2].content);
    let slots = third.matches("glitch-char").count();
    assert!((3..=7).contains(&slots));
}

#[test]
fn it_returns_plain_html_unchanged() {
    let content = "<p>no custom tags here</p>";

    assert_eq!(process_content(content, &[]), content);
}
