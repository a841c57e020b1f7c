use super::*;
use crate::text::fixed::FixedAdvanceText;
use crate::text::segment::{ScriptRunSegmenter, Segmenter};

fn title_params() -> WrapParams {
    WrapParams {
        max_width: 530.0,
        line_height: 40.0,
        origin: Point::new(335.0, 330.0),
    }
}

fn title_font() -> FontSpec {
    FontSpec::new(None, 32.0, 400.0)
}

fn chunks(parts: &[&str]) -> Vec<TextChunk> {
    parts.iter().map(|p| TextChunk::new(*p)).collect()
}

fn line_texts(layout: &LayoutResult) -> Vec<String> {
    layout.lines().iter().map(Line::text).collect()
}

#[test]
fn two_line_japanese_title_respects_width_and_order() {
    // 60px per char: "今日はいい" = 300, "天気です" = 240, 540 > 530.
    let mut m = FixedAdvanceText::new(1.875);
    let title = "今日はいい天気です";
    let cs = ScriptRunSegmenter::new().segment(title);
    let layout = wrap_chunks(&cs, &title_params(), &title_font(), &mut m).unwrap();

    assert_eq!(line_texts(&layout), vec!["今日はいい", "天気です"]);
    assert_eq!(layout.text(), title);
    for line in layout.lines() {
        assert!(line.width() <= 530.0, "line too wide: {}", line.width());
    }
    assert_eq!(layout.lines()[0].y(), 330.0);
    assert_eq!(layout.lines()[1].y(), 370.0);
    assert_eq!(layout.lines()[1].chunks()[0].x, 335.0);
}

#[test]
fn empty_title_has_no_lines() {
    let mut m = FixedAdvanceText::new(1.0);
    let layout = wrap_chunks(&[], &title_params(), &title_font(), &mut m).unwrap();
    assert!(layout.is_empty());
    assert_eq!(layout.bounds(), Rect::new(335.0, 330.0, 335.0, 330.0));
    assert_eq!(m.measure_calls(), 0);
}

#[test]
fn oversized_chunk_gets_its_own_line() {
    let mut m = FixedAdvanceText::new(1.0).with_char_width('X', 900.0);
    let cs = chunks(&["ab", "X", "cd"]);
    let layout = wrap_chunks(&cs, &title_params(), &title_font(), &mut m).unwrap();

    assert_eq!(line_texts(&layout), vec!["ab", "X", "cd"]);
    let overflow = &layout.lines()[1];
    assert!(overflow.is_overflow(530.0));
    assert_eq!(overflow.width(), 900.0);
    assert_eq!(overflow.chunks()[0].x, 335.0);
    assert!(!layout.lines()[0].is_overflow(530.0));
}

#[test]
fn leading_oversized_chunk_does_not_leave_a_blank_line() {
    let mut m = FixedAdvanceText::new(1.0).with_char_width('X', 900.0);
    let cs = chunks(&["X", "a"]);
    let layout = wrap_chunks(&cs, &title_params(), &title_font(), &mut m).unwrap();
    assert_eq!(line_texts(&layout), vec!["X", "a"]);
    assert_eq!(layout.lines()[0].y(), 330.0);
}

#[test]
fn chunks_are_placed_left_to_right() {
    let mut m = FixedAdvanceText::new(1.0);
    let cs = chunks(&["あ", "いう", "えおか"]);
    let layout = wrap_chunks(&cs, &title_params(), &title_font(), &mut m).unwrap();
    let xs: Vec<f64> = layout.lines()[0].chunks().iter().map(|c| c.x).collect();
    assert_eq!(xs, vec![335.0, 367.0, 431.0]);
    assert_eq!(layout.lines()[0].width(), 192.0);
}

#[test]
fn a_chunk_that_exactly_fills_the_line_stays() {
    let mut m = FixedAdvanceText::new(1.0)
        .with_char_width('a', 500.0)
        .with_char_width('b', 30.0);
    let cs = chunks(&["a", "b", "b"]);
    let layout = wrap_chunks(&cs, &title_params(), &title_font(), &mut m).unwrap();
    assert_eq!(line_texts(&layout), vec!["ab", "b"]);
    assert_eq!(layout.lines()[0].width(), 530.0);
}

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn generated_chunks(seed: u64) -> Vec<TextChunk> {
    const ALPHABET: [char; 8] = ['あ', '天', 'カ', 'a', 'W', '1', '。', 'X'];
    let mut state = seed;
    let count = (mix64(seed) % 24) as usize;
    (0..count)
        .map(|_| {
            state = mix64(state);
            let len = 1 + (state % 6) as usize;
            let text: String = (0..len)
                .map(|k| ALPHABET[(mix64(state + k as u64) % 8) as usize])
                .collect();
            TextChunk::new(text)
        })
        .collect()
}

#[test]
fn generated_titles_keep_every_layout_invariant() {
    let params = title_params();
    let font = title_font();
    for seed in 0..200u64 {
        let cs = generated_chunks(seed);
        let expected: String = cs.iter().map(TextChunk::text).collect();
        let mut m = FixedAdvanceText::new(1.0).with_char_width('X', 700.0);
        let layout = wrap_chunks(&cs, &params, &font, &mut m).unwrap();

        assert_eq!(layout.text(), expected, "seed {seed}");
        for (n, line) in layout.lines().iter().enumerate() {
            assert!(!line.chunks().is_empty());
            assert!(
                line.width() <= params.max_width || line.is_overflow(params.max_width),
                "seed {seed} line {n} width {}",
                line.width()
            );
            assert_eq!(line.y(), params.origin.y + n as f64 * params.line_height);
            let sum: f64 = line.chunks().iter().map(|c| c.width).sum();
            assert_eq!(sum, line.width());
        }
        for pair in layout.lines().windows(2) {
            assert!(pair[1].y() > pair[0].y());
        }
    }
}

#[test]
fn wrapping_is_deterministic() {
    let params = title_params();
    let font = title_font();
    let cs = generated_chunks(7);
    let a = wrap_chunks(&cs, &params, &font, &mut FixedAdvanceText::new(1.3)).unwrap();
    let b = wrap_chunks(&cs, &params, &font, &mut FixedAdvanceText::new(1.3)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn bounds_cover_every_line_band() {
    let mut m = FixedAdvanceText::new(1.875);
    let cs = ScriptRunSegmenter::new().segment("今日はいい天気です");
    let layout = wrap_chunks(&cs, &title_params(), &title_font(), &mut m).unwrap();
    assert_eq!(layout.bounds(), Rect::new(335.0, 290.0, 635.0, 370.0));
}

#[test]
fn invalid_params_are_rejected_before_measuring() {
    let mut m = FixedAdvanceText::new(1.0);
    let params = WrapParams {
        line_height: 0.0,
        ..title_params()
    };
    let err = wrap_chunks(&chunks(&["a"]), &params, &title_font(), &mut m).unwrap_err();
    assert!(matches!(err, OgError::Validation(_)));
    assert_eq!(m.measure_calls(), 0);
}

#[test]
fn measurement_failures_propagate() {
    let mut m = FixedAdvanceText::new(1.0);
    let err = wrap_chunks(
        &chunks(&["ok", "\u{FFFD}"]),
        &title_params(),
        &title_font(),
        &mut m,
    )
    .unwrap_err();
    assert!(matches!(err, OgError::Render(_)));
}
