use std::sync::OnceLock;

use crate::foundation::error::OgResult;
use crate::text::measure::{FontSpec, WidthMeasurer};

/// Atomic, break-eligible unit of text.
///
/// The width memo is filled on first measurement. A chunk sequence is measured under a single
/// [`FontSpec`]; re-measuring with another font returns the memoized width.
#[derive(Debug, Clone)]
pub struct TextChunk {
    text: String,
    width: OnceLock<f32>,
}

impl TextChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            width: OnceLock::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Memoized width, if this chunk has been measured.
    pub fn cached_width(&self) -> Option<f32> {
        self.width.get().copied()
    }

    /// Width under `font`, measured once and memoized.
    pub fn width(&self, font: &FontSpec, measurer: &mut dyn WidthMeasurer) -> OgResult<f32> {
        if let Some(w) = self.width.get() {
            return Ok(*w);
        }
        let w = measurer.measure(&self.text, font)?;
        Ok(*self.width.get_or_init(|| w))
    }
}

impl PartialEq for TextChunk {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for TextChunk {}

/// Splits unspaced text into chunks at linguistically permissible break positions.
///
/// Implementations only decide *where* to break; [`Segmenter::segment`] does the slicing, so
/// every policy is lossless and order-preserving.
pub trait Segmenter: Send + Sync {
    /// Char indices in `1..chars.len()`, strictly increasing, where a chunk boundary falls.
    fn boundaries(&self, chars: &[char]) -> Vec<usize>;

    fn segment(&self, text: &str) -> Vec<TextChunk> {
        if text.is_empty() {
            return Vec::new();
        }
        let chars: Vec<char> = text.chars().collect();
        let mut out = Vec::new();
        let mut start = 0usize;
        for b in self.boundaries(&chars) {
            // Out-of-order or out-of-range boundaries from a model are ignored.
            if b <= start || b >= chars.len() {
                continue;
            }
            out.push(TextChunk::new(chars[start..b].iter().collect::<String>()));
            start = b;
        }
        out.push(TextChunk::new(chars[start..].iter().collect::<String>()));
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharClass {
    Han,
    Hiragana,
    Katakana,
    Alnum,
    Open,
    Close,
    Space,
    Other,
}

fn classify(c: char) -> CharClass {
    match c {
        '\u{3041}'..='\u{309F}' => CharClass::Hiragana,
        '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
            if c == '\u{30FB}' {
                CharClass::Close
            } else {
                CharClass::Katakana
            }
        }
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}' | '々' | '〆' => {
            CharClass::Han
        }
        '「' | '『' | '（' | '(' | '[' | '［' | '【' | '〈' | '《' | '〔' | '{' | '｛' | '“' | '‘' => {
            CharClass::Open
        }
        '」' | '』' | '）' | ')' | ']' | '］' | '】' | '〉' | '》' | '〕' | '}' | '｝' | '”' | '’'
        | '、' | '。' | '，' | '．' | '！' | '？' | '：' | '；' | ',' | '.' | '!' | '?' | ':' | ';'
        | '〜' | '…' => CharClass::Close,
        '０'..='９' | 'Ａ'..='Ｚ' | 'ａ'..='ｚ' => CharClass::Alnum,
        c if c.is_whitespace() => CharClass::Space,
        c if c.is_alphanumeric() => CharClass::Alnum,
        _ => CharClass::Other,
    }
}

/// Default segmentation policy: runs of one script class, with trailing kana and punctuation
/// attached to the run they follow.
///
/// `今日はいい天気です` becomes `今日はいい` / `天気です`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptRunSegmenter;

impl ScriptRunSegmenter {
    pub fn new() -> Self {
        Self
    }

    fn breaks_between(prev: CharClass, cur: CharClass) -> bool {
        use CharClass::*;
        match (prev, cur) {
            (Open, _) => false,
            (_, Hiragana | Close | Space) => false,
            (Space, _) => true,
            (a, b) if a == b => false,
            _ => true,
        }
    }
}

impl Segmenter for ScriptRunSegmenter {
    fn boundaries(&self, chars: &[char]) -> Vec<usize> {
        let mut out = Vec::new();
        for i in 1..chars.len() {
            if Self::breaks_between(classify(chars[i - 1]), classify(chars[i])) {
                out.push(i);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/segment.rs"]
mod tests;
