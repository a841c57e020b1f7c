use super::*;
use crate::text::fixed::FixedAdvanceText;

fn texts(chunks: &[TextChunk]) -> Vec<&str> {
    chunks.iter().map(TextChunk::text).collect()
}

fn joined(chunks: &[TextChunk]) -> String {
    chunks.iter().map(TextChunk::text).collect()
}

#[test]
fn empty_input_yields_no_chunks() {
    assert!(ScriptRunSegmenter::new().segment("").is_empty());
}

#[test]
fn japanese_sentence_splits_before_kanji_after_kana() {
    let chunks = ScriptRunSegmenter::new().segment("今日はいい天気です");
    assert_eq!(texts(&chunks), vec!["今日はいい", "天気です"]);
}

#[test]
fn latin_runs_keep_their_particles() {
    let chunks = ScriptRunSegmenter::new().segment("Rustで始める正規表現エンジン入門");
    assert_eq!(
        texts(&chunks),
        vec!["Rustで", "始める", "正規表現", "エンジン", "入門"]
    );
}

#[test]
fn brackets_and_punctuation_stick_to_their_neighbours() {
    let chunks = ScriptRunSegmenter::new().segment("「型」について、考える。");
    assert_eq!(texts(&chunks), vec!["「型」について、", "考える。"]);
}

#[test]
fn spaces_stay_at_the_end_of_the_preceding_chunk() {
    let chunks = ScriptRunSegmenter::new().segment("hello  world");
    assert_eq!(texts(&chunks), vec!["hello  ", "world"]);
}

#[test]
fn segmentation_is_lossless_across_mixed_input() {
    let seg = ScriptRunSegmenter::new();
    let samples = [
        "今日はいい天気です",
        "2023年のRust 1.70リリースノートを読む",
        "ｆｕｌｌｗｉｄｔｈ１２３とカタカナ・テスト",
        "🎉絵文字も(ちゃんと)残る!?",
        "a",
        "   ",
        "々〆ヶ",
    ];
    for s in samples {
        let chunks = seg.segment(s);
        assert_eq!(joined(&chunks), s, "round trip failed for {s:?}");
        assert!(chunks.iter().all(|c| !c.text().is_empty()));
    }
}

#[test]
fn segmentation_is_deterministic() {
    let seg = ScriptRunSegmenter::new();
    let a = seg.segment("形式言語とオートマトンの話");
    let b = seg.segment("形式言語とオートマトンの話");
    assert_eq!(a, b);
}

struct BadBoundaries;

impl Segmenter for BadBoundaries {
    fn boundaries(&self, chars: &[char]) -> Vec<usize> {
        vec![0, 2, 2, 1, chars.len(), chars.len() + 5, 3]
    }
}

#[test]
fn malformed_boundaries_cannot_break_losslessness() {
    let chunks = BadBoundaries.segment("abcdef");
    assert_eq!(texts(&chunks), vec!["ab", "c", "def"]);
}

#[test]
fn chunk_width_is_measured_once() {
    let font = FontSpec::new(None, 32.0, 400.0);
    let mut m = FixedAdvanceText::new(1.0);
    let chunk = TextChunk::new("天気");
    assert_eq!(chunk.cached_width(), None);
    assert_eq!(chunk.width(&font, &mut m).unwrap(), 64.0);
    assert_eq!(chunk.width(&font, &mut m).unwrap(), 64.0);
    assert_eq!(m.measure_calls(), 1);
    assert_eq!(chunk.cached_width(), Some(64.0));
}
