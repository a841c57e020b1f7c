use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(OgError::input("x").to_string().contains("input error:"));
    assert!(OgError::render("x").to_string().contains("render error:"));
    assert!(OgError::asset("x").to_string().contains("asset error:"));
    assert!(
        OgError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = OgError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn asset_from_keeps_context_chain() {
    let err = anyhow::Error::new(std::io::Error::other("no such file"))
        .context("read background 'bg.jpg'");
    let msg = OgError::asset_from(err).to_string();
    assert!(msg.starts_with("asset error:"));
    assert!(msg.contains("bg.jpg"));
    assert!(msg.contains("no such file"));
}

#[test]
fn stage_serializes_in_snake_case() {
    assert_eq!(serde_json::to_string(&Stage::Layout).unwrap(), "\"layout\"");
    assert_eq!(Stage::Encode.to_string(), "encode");
}

#[test]
fn record_error_names_record_and_stage() {
    let err = RecordError::new("2023-01-05-hello", Stage::Input, OgError::input("missing title"));
    assert_eq!(err.stage, Stage::Input);
    let msg = err.to_string();
    assert!(msg.contains("2023-01-05-hello"));
    assert!(msg.contains("input stage"));
    assert!(msg.contains("missing title"));
}
