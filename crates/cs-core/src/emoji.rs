//! Emoji detection and naming.
//!
//! Text is segmented into extended grapheme clusters so multi-codepoint
//! emoji (skin tones, ZWJ families, flags) stay whole. Membership and labels
//! come from an [`EmojiLexicon`]; [`UnicodeLexicon`] is the bundled one.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Code points that make a grapheme cluster count as an emoji.
///
/// Property data is the Unicode 15.0 snapshot compiled into `regex-syntax`.
static EMOJI_CODEPOINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{Extended_Pictographic}\p{Regional_Indicator}]").unwrap());

const VARIATION_SELECTOR_16: char = '\u{fe0f}';

/// Decides which grapheme clusters are emoji and what they are called.
pub trait EmojiLexicon {
    /// Returns true if the cluster should be collected as an emoji.
    fn is_emoji_cluster(&self, cluster: &str) -> bool;

    /// Returns the canonical label for an emoji cluster, if known.
    fn describe(&self, cluster: &str) -> Option<String>;
}

/// Lexicon backed by Unicode emoji properties and the `emojis` name table.
///
/// Labels use the `:snake_case_name:` form, e.g. `😀` becomes `:grinning_face:`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeLexicon;

impl EmojiLexicon for UnicodeLexicon {
    fn is_emoji_cluster(&self, cluster: &str) -> bool {
        EMOJI_CODEPOINT_RE.is_match(cluster)
    }

    fn describe(&self, cluster: &str) -> Option<String> {
        let emoji = emojis::get(cluster)
            .or_else(|| emojis::get(&cluster.replace(VARIATION_SELECTOR_16, "")))
            .or_else(|| emojis::get(&format!("{cluster}{VARIATION_SELECTOR_16}")))?;
        Some(to_label(emoji.name()))
    }
}

/// Turns a CLDR short name into a `:label:` token.
fn to_label(name: &str) -> String {
    let body: String = name
        .chars()
        .filter(|c| !matches!(c, ':' | ',' | '.' | '“' | '”' | '’'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!(":{body}:")
}

/// Collects emoji clusters from `text` in order, repeats included.
pub fn extract_emojis<L: EmojiLexicon + ?Sized>(text: &str, lexicon: &L) -> Vec<String> {
    text.graphemes(true)
        .filter(|cluster| lexicon.is_emoji_cluster(cluster))
        .map(str::to_string)
        .collect()
}

/// Maps each glyph to its label. Glyphs the lexicon cannot name pass through
/// unchanged.
pub fn describe_all<L: EmojiLexicon + ?Sized>(glyphs: &[String], lexicon: &L) -> Vec<String> {
    glyphs
        .iter()
        .map(|glyph| lexicon.describe(glyph).unwrap_or_else(|| glyph.clone()))
        .collect()
}
