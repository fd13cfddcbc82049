use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use regex::Captures;
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;
use typed_builder::TypedBuilder as Builder;

const CENSOR_GLYPH: &str = "\u{2588}";

// Words at or below this length pass through a partial censor untouched.
const PCENSOR_REVEAL_THRESHOLD: usize = 3;

const GLITCH_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^*()-_=+[]{};:?~";
const GLITCH_MIN_INTENSITY: u32 = 2;
const GLITCH_MAX_INTENSITY: u32 = 10;
const GLITCH_SPEED_BASE: f32 = 1.2;
const GLITCH_SPEED_MIN: f32 = 0.05;
const GLITCH_EMPTY_MIN_LENGTH: usize = 3;
const GLITCH_EMPTY_MAX_LENGTH: usize = 7;

const FALLBACK_FONT: &str = "monospace";

/// Rewrites the custom inline tags of a post body into render-ready
/// markup. Ordinary HTML passes through untouched; the whole result is
/// normalized by an HTML reparse at the end, so unclosed tags never leak
/// into the surrounding page.
#[derive(Builder)]
pub struct ContentProcessor {
    #[builder(setter(into), default)]
    font_pool: Vec<String>,
    #[builder(setter(into), default)]
    seed: Option<u64>,
}

impl ContentProcessor {
    pub fn process(&self, content: &str) -> String {
        let mut rng = self.rng();

        let expanded = expand_void_elements(content);
        let censored = apply_censor(&expanded);
        let partially_censored = apply_partial_censor(&censored);
        let glitched = self.apply_glitch(&partially_censored, &mut rng);

        sanitize(&glitched)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn apply_glitch(&self, content: &str, rng: &mut StdRng) -> String {
        let replaced = glitch_regex().replace_all(content, |caps: &Captures| {
            self.render_glitch(&caps[1], &caps[2], rng)
        });

        glitch_empty_regex()
            .replace_all(&replaced, |caps: &Captures| {
                self.render_glitch(&caps[1], "", rng)
            })
            .into_owned()
    }

    fn render_glitch(&self, raw_intensity: &str, text: &str, rng: &mut StdRng) -> String {
        let intensity = raw_intensity
            .parse::<u32>()
            .unwrap_or(GLITCH_MAX_INTENSITY)
            .clamp(GLITCH_MIN_INTENSITY, GLITCH_MAX_INTENSITY);
        let speed = animation_speed(intensity);

        let scrambled: String = if text.trim().is_empty() {
            let length = rng.gen_range(GLITCH_EMPTY_MIN_LENGTH..=GLITCH_EMPTY_MAX_LENGTH);

            (0..length)
                .map(|_| self.wrap_glitch_char(speed, rng))
                .collect()
        } else {
            text.chars()
                .map(|ch| {
                    if ch == ' ' {
                        " ".to_string()
                    } else {
                        self.wrap_glitch_char(speed, rng)
                    }
                })
                .collect()
        };

        format!("<span class=\"glitched\">{}</span>", scrambled)
    }

    fn wrap_glitch_char(&self, speed: f32, rng: &mut StdRng) -> String {
        let glyph = random_glitch_char(rng);
        let font_family = match self.random_font(rng) {
            None => FALLBACK_FONT.to_string(),
            Some(font) => format!("'{}', {}", font, FALLBACK_FONT),
        };

        format!(
            "<span class=\"glitch-char\" style=\"font-family:{};animation-duration:{:.2}s\">{}</span>",
            font_family, speed, glyph
        )
    }

    fn random_font(&self, rng: &mut StdRng) -> Option<&str> {
        if self.font_pool.is_empty() {
            return None;
        }

        let index = rng.gen_range(0..self.font_pool.len());

        Some(&self.font_pool[index])
    }
}

pub fn process_content(content: &str, font_pool: &[String]) -> String {
    ContentProcessor::builder()
        .font_pool(font_pool.to_vec())
        .build()
        .process(content)
}

/// XML serialization self-closes void elements; HTML rendering wants the
/// plain open forms back.
fn expand_void_elements(content: &str) -> String {
    let breaks = void_element_regex().replace_all(content, "<$1>");

    img_element_regex().replace_all(&breaks, "<$1>").into_owned()
}

fn apply_censor(content: &str) -> String {
    censor_regex()
        .replace_all(content, |caps: &Captures| {
            let glyphs = CENSOR_GLYPH.repeat(caps[1].chars().count());

            format!("<span class=\"censored\">{}</span>", glyphs)
        })
        .into_owned()
}

fn apply_partial_censor(content: &str) -> String {
    pcensor_regex()
        .replace_all(content, |caps: &Captures| {
            let masked = caps[1]
                .split_whitespace()
                .map(mask_word)
                .collect::<Vec<String>>()
                .join(" ");

            format!("<span class=\"partially-censored\">{}</span>", masked)
        })
        .into_owned()
}

fn mask_word(word: &str) -> String {
    let length = word.chars().count();

    if length <= PCENSOR_REVEAL_THRESHOLD {
        return word.to_string();
    }

    let visible = length * 3 / 10;

    word.chars()
        .enumerate()
        .map(|(index, ch)| if index < visible { ch } else { '*' })
        .collect()
}

fn random_glitch_char(rng: &mut StdRng) -> char {
    let index = rng.gen_range(0..GLITCH_CHARS.len());

    GLITCH_CHARS[index] as char
}

/// Monotonically decreasing in intensity and never zero, so the
/// animation cannot stall.
fn animation_speed(intensity: u32) -> f32 {
    (GLITCH_SPEED_BASE / intensity as f32).max(GLITCH_SPEED_MIN)
}

fn sanitize(content: &str) -> String {
    let fragment = Html::parse_fragment(content);

    fragment.root_element().inner_html()
}

fn void_element_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();

    REGEX.get_or_init(|| Regex::new(r"<(br|hr)\s*/>").unwrap())
}

fn img_element_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();

    REGEX.get_or_init(|| Regex::new(r"<(img\b[^>]*?)\s*/>").unwrap())
}

fn censor_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();

    REGEX.get_or_init(|| Regex::new(r"(?s)<censor>(.*?)</censor>").unwrap())
}

fn pcensor_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();

    REGEX.get_or_init(|| Regex::new(r"(?s)<PCensor>(.*?)</PCensor>").unwrap())
}

fn glitch_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();

    REGEX.get_or_init(|| {
        Regex::new(r#"(?s)<glitch\s+intensity="(\d+)"\s*>(.*?)</glitch>"#).unwrap()
    })
}

fn glitch_empty_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();

    REGEX.get_or_init(|| Regex::new(r#"<glitch\s+intensity="(\d+)"\s*/>"#).unwrap())
}
