use crate::feed::{FeedError, ParseFeed, PostRecord, PublicationDate};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// Parses the feed on the calling thread.
pub struct SyncParser;

impl ParseFeed for SyncParser {
    fn parse(&self, raw: &str) -> Result<Vec<PostRecord>, FeedError> {
        let document = scan_document(raw)?;

        if !document.saw_feed {
            return Err(FeedError::Schema(
                "feed document has no <feed> root element".to_string(),
            ));
        }

        if !document.saw_channel {
            return Err(FeedError::Schema(
                "feed document has no <channel> element".to_string(),
            ));
        }

        if document.items.is_empty() {
            return Err(FeedError::Schema(
                "feed channel contains no items".to_string(),
            ));
        }

        document
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| build_record(item, index + 1))
            .collect()
    }
}

#[derive(Default)]
struct RawItem {
    id: Option<String>,
    title: Option<String>,
    heading: Option<String>,
    post_type: Option<String>,
    description: Option<String>,
    content: Option<String>,
    pub_date: Option<PublicationDate>,
}

#[derive(Default)]
struct ScannedDocument {
    saw_feed: bool,
    saw_channel: bool,
    items: Vec<RawItem>,
}

fn scan_document(raw: &str) -> Result<ScannedDocument, FeedError> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut document = ScannedDocument::default();
    let mut in_channel = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"feed" => document.saw_feed = true,
                b"channel" => {
                    document.saw_channel = true;
                    in_channel = true;
                }
                b"item" if in_channel => document.items.push(read_item(&mut reader)?),
                _ => (),
            },
            // Self-closed forms still count for validation: an empty
            // item must fail the load, not vanish from it.
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"feed" => document.saw_feed = true,
                b"channel" => document.saw_channel = true,
                b"item" if in_channel => document.items.push(RawItem::default()),
                _ => (),
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"channel" {
                    in_channel = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(error) => return Err(malformed(error)),
            Ok(_) => (),
        }
    }

    Ok(document)
}

fn read_item(reader: &mut Reader<&[u8]>) -> Result<RawItem, FeedError> {
    let mut item = RawItem::default();
    let mut current_element = String::new();
    let mut in_pub_date = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                // The content body is HTML plus custom tags, captured as
                // raw markup rather than descended into.
                b"content" => {
                    let inner = reader.read_text(e.name()).map_err(malformed)?;
                    item.content = Some(inner.into_owned());
                }
                b"pubDate" => {
                    in_pub_date = true;
                    item.pub_date = Some(empty_publication_date());
                }
                name => current_element = String::from_utf8_lossy(name).to_string(),
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"content" => item.content = Some(String::new()),
                b"pubDate" => item.pub_date = Some(empty_publication_date()),
                _ => (),
            },
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(malformed)?.to_string();

                assign_field(&mut item, &current_element, in_pub_date, text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).to_string();

                assign_field(&mut item, &current_element, in_pub_date, text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" => break,
                b"pubDate" => in_pub_date = false,
                _ => current_element.clear(),
            },
            Ok(Event::Eof) => {
                return Err(FeedError::Schema(
                    "malformed feed document: unexpected end of document inside <item>"
                        .to_string(),
                ))
            }
            Err(error) => return Err(malformed(error)),
            Ok(_) => (),
        }
    }

    Ok(item)
}

fn assign_field(item: &mut RawItem, element: &str, in_pub_date: bool, text: String) {
    if text.is_empty() {
        return;
    }

    if in_pub_date {
        if let Some(pub_date) = &mut item.pub_date {
            match element {
                "date" => pub_date.date = text,
                "timezone" => pub_date.timezone = text,
                _ => (),
            }
        }

        return;
    }

    match element {
        "title" => item.title = Some(text),
        "id" => item.id = Some(text),
        "heading" => item.heading = Some(text),
        "type" => item.post_type = Some(text),
        "description" => item.description = Some(text),
        _ => (),
    }
}

fn build_record(item: RawItem, position: usize) -> Result<PostRecord, FeedError> {
    let title = required_field(item.title, "title", position)?;
    let id = required_field(item.id, "id", position)?;

    Ok(PostRecord {
        id,
        title,
        heading: item.heading,
        post_type: item.post_type,
        description: item.description,
        content: item.content.unwrap_or_default(),
        pub_date: item.pub_date,
    })
}

fn required_field(
    value: Option<String>,
    name: &str,
    position: usize,
) -> Result<String, FeedError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(FeedError::Schema(format!(
            "feed item {} is missing required element <{}>",
            position, name
        ))),
    }
}

fn empty_publication_date() -> PublicationDate {
    PublicationDate {
        date: String::new(),
        timezone: String::new(),
    }
}

fn malformed(error: impl std::fmt::Display) -> FeedError {
    FeedError::Schema(format!("malformed feed document: {}", error))
}
