pub mod processor;

pub use processor::{process_content, ContentProcessor};
