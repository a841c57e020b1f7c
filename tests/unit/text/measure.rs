use super::*;
use crate::test_support::system_font;

fn parley() -> Option<ParleyText> {
    let (path, bytes) = system_font()?;
    let fonts = FontSet::from_bytes(vec![(path, bytes)]).unwrap();
    Some(ParleyText::new(&fonts).unwrap())
}

fn body_font() -> FontSpec {
    FontSpec::new(None, 24.0, 400.0)
}

#[test]
fn font_spec_validation() {
    assert!(body_font().validate().is_ok());
    assert!(FontSpec::new(None, 0.0, 400.0).validate().is_err());
    assert!(FontSpec::new(None, f32::INFINITY, 400.0).validate().is_err());
    assert!(FontSpec::new(None, 24.0, 0.0).validate().is_err());
    assert!(FontSpec::new(None, 24.0, 1200.0).validate().is_err());
    assert!(FontSpec::new(Some("  ".into()), 24.0, 400.0).validate().is_err());
}

#[test]
fn widths_grow_with_text_and_size() {
    let Some(mut text) = parley() else {
        return;
    };
    assert!(!text.default_family().is_empty());

    let font = body_font();
    assert_eq!(text.measure("", &font).unwrap(), 0.0);
    let ab = text.measure("ab", &font).unwrap();
    let abc = text.measure("abc", &font).unwrap();
    assert!(ab > 0.0);
    assert!(abc > ab);

    let big = text
        .measure("ab", &FontSpec::new(None, 48.0, 400.0))
        .unwrap();
    assert!((big - 2.0 * ab).abs() < 1.0, "48px {big} vs 24px {ab}");
}

#[test]
fn measurement_is_deterministic() {
    let Some(mut text) = parley() else {
        return;
    };
    let a = text.measure("makenowjust-labs/blog", &body_font()).unwrap();
    let b = text.measure("makenowjust-labs/blog", &body_font()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unknown_family_is_a_render_error() {
    let Some(mut text) = parley() else {
        return;
    };
    let font = FontSpec::new(Some("No Such Family 1234".into()), 24.0, 400.0);
    let err = text.measure("abc", &font).unwrap_err();
    assert!(matches!(err, OgError::Render(_)));
}

#[test]
fn missing_glyphs_are_a_render_error() {
    let Some(mut text) = parley() else {
        return;
    };
    // Latin-only system fonts carry no Han glyphs and nothing else is registered.
    let err = text.measure("天気", &body_font()).unwrap_err();
    assert!(matches!(err, OgError::Render(_)));
}

#[test]
fn fill_text_paints_near_the_baseline() {
    let Some(mut text) = parley() else {
        return;
    };
    let mut ctx = vello_cpu::RenderContext::new(200, 60);
    text.fill_text(
        &mut ctx,
        "Hello",
        &body_font(),
        Rgba8::opaque(0, 0, 0),
        Point::new(10.0, 40.0),
    )
    .unwrap();
    let mut pixmap = vello_cpu::Pixmap::new(200, 60);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    let data = pixmap.data_as_u8_slice();
    let inked = |x0: usize, x1: usize, y0: usize, y1: usize| {
        (y0..y1).any(|y| (x0..x1).any(|x| data[(y * 200 + x) * 4 + 3] > 0))
    };
    assert!(inked(10, 120, 20, 41), "no glyph pixels above the baseline");
    assert!(!inked(0, 9, 0, 60), "ink left of the pen start");
    assert!(!inked(0, 200, 0, 10), "ink far above the text");
}

#[test]
fn trailing_spaces_count_toward_the_width() {
    let Some(mut text) = parley() else {
        return;
    };
    let font = body_font();
    let bare = text.measure("Rust", &font).unwrap();
    let spaced = text.measure("Rust ", &font).unwrap();
    assert!(spaced > bare, "'Rust ' {spaced} vs 'Rust' {bare}");
    assert!(text.measure(" ", &font).unwrap() > 0.0);
}

#[test]
fn spaced_titles_keep_the_gap_between_words() {
    use crate::text::segment::{ScriptRunSegmenter, Segmenter};
    use crate::text::wrap::{WrapParams, wrap_chunks};

    let Some(mut text) = parley() else {
        return;
    };
    let font = body_font();
    let chunks = ScriptRunSegmenter::new().segment("Rust is fun");
    let params = WrapParams {
        max_width: 1000.0,
        line_height: 30.0,
        origin: Point::new(100.0, 50.0),
    };
    let layout = wrap_chunks(&chunks, &params, &font, &mut text).unwrap();
    assert_eq!(layout.lines().len(), 1);

    let placed = layout.lines()[0].chunks();
    assert_eq!(placed[0].chunk.text(), "Rust ");
    let word = text.measure("Rust", &font).unwrap();
    assert!(placed[1].x > 100.0 + f64::from(word));
    assert_eq!(placed[1].x, placed[0].x + placed[0].width);
}

#[test]
fn workers_share_font_blobs_with_the_font_set() {
    let Some((path, bytes)) = system_font() else {
        return;
    };
    let fonts = FontSet::from_bytes(vec![(path, bytes)]).unwrap();
    let blob = fonts.files().next().unwrap().clone();
    let before = blob.strong_count();

    let a = ParleyText::new(&fonts).unwrap();
    let b = ParleyText::new(&fonts).unwrap();
    assert!(blob.strong_count() > before);
    for painter in [&a, &b] {
        assert!(!painter.paint_fonts.is_empty());
        for ((id, _), data) in &painter.paint_fonts {
            assert_eq!(*id, blob.id());
            assert_eq!(data.data.id(), blob.id());
        }
    }
}
