use dotenv::dotenv;
use glitchfeed::config::Config;
use glitchfeed::content::ContentProcessor;
use glitchfeed::feed;

fn main() {
    dotenv().ok();
    env_logger::init();

    let url = match Config::feed_url() {
        Some(url) => url,
        None => {
            log::error!("No FEED_URL environment variable found");
            return;
        }
    };

    match feed::load_feed(&url) {
        Ok(posts) => {
            let processor = ContentProcessor::builder()
                .font_pool(Config::glitch_font_pool())
                .build();

            for post in posts {
                println!("# {} ({})", post.display_heading(), post.id);

                if let Some(date) = post.pub_date.as_ref().and_then(|d| d.to_utc()) {
                    println!("published {}", date);
                }

                println!("{}\n", processor.process(&post.content));
            }
        }
        Err(error) => log::error!("Failed to load feed: {}", error),
    }
}
