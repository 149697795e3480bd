use super::*;
use crate::backend::soft::SoftwareBackend;
use crate::foundation::core::WindowHandleKind;

#[test]
fn empty_object_yields_defaults() {
    let s = BackendSettings::from_json_str("{}").unwrap();
    assert_eq!(s, BackendSettings::default());
    assert_eq!(s.viewport, Viewport::new(0, 0, 1, 1));
    assert_eq!(s.background, Color::BLACK);
    assert_eq!(s.pixel_format, PixelFormat::Rgba);
}

#[test]
fn partial_json_overrides_fields() {
    let s = BackendSettings::from_json_str(
        r#"{
            "viewport": { "left": 10, "top": 20, "width": 800, "height": 600 },
            "background": { "r": 0.5, "g": 0.25, "b": 0.0, "a": 1.0 },
            "pixel_format": "bgra"
        }"#,
    )
    .unwrap();
    assert_eq!(s.viewport, Viewport::new(10, 20, 800, 600));
    assert_eq!(s.background, Color::rgba(0.5, 0.25, 0.0, 1.0));
    assert_eq!(s.pixel_format, PixelFormat::Bgra);
}

#[test]
fn malformed_and_unknown_fields_are_serde_errors() {
    assert!(matches!(
        BackendSettings::from_json_str("{"),
        Err(R3dError::Serde(_))
    ));
    assert!(matches!(
        BackendSettings::from_json_str(r#"{ "vsync": true }"#),
        Err(R3dError::Serde(_))
    ));
}

#[test]
fn negative_viewport_is_rejected() {
    let err = BackendSettings::from_json_str(
        r#"{ "viewport": { "left": 0, "top": 0, "width": -1, "height": 4 } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, R3dError::Validation(_)));
}

#[test]
fn json_string_roundtrips() {
    let s = BackendSettings {
        viewport: Viewport::new(1, 2, 3, 4),
        background: Color::WHITE,
        pixel_format: PixelFormat::Rgb,
    };
    let text = s.to_json_string().unwrap();
    assert_eq!(BackendSettings::from_json_str(&text).unwrap(), s);
}

#[test]
fn missing_file_is_wrapped_io_error() {
    let err = BackendSettings::from_json_file(Path::new("target/does/not/exist.json"))
        .unwrap_err();
    assert!(matches!(err, R3dError::Other(_)));
    assert!(err.to_string().contains("open settings"));
}

#[test]
fn apply_pushes_viewport_and_color() {
    let s = BackendSettings {
        viewport: Viewport::new(10, 20, 800, 600),
        background: Color::rgba(0.0, 0.0, 1.0, 1.0),
        pixel_format: PixelFormat::Rgba,
    };
    let mut backend = SoftwareBackend::new(WindowHandleKind::X11, PixelFormat::Rgba);
    s.apply(&mut backend).unwrap();
    assert_eq!(backend.base().location(), s.viewport);
    assert_eq!(backend.base().bg_color(), s.background);
}

#[test]
fn read_pixels_uses_configured_format() {
    let s = BackendSettings {
        viewport: Viewport::new(0, 0, 3, 2),
        background: Color::rgba(1.0, 0.0, 0.0, 1.0),
        pixel_format: PixelFormat::Bgr,
    };
    let mut backend = SoftwareBackend::new(WindowHandleKind::X11, PixelFormat::Rgba);
    s.apply(&mut backend).unwrap();
    backend.start().unwrap();

    let px = s.read_pixels(&mut backend).unwrap();
    assert_eq!(px.len(), 3 * 2 * 3);
    assert!(px.chunks_exact(3).all(|p| p == [0, 0, 255]));
    assert_eq!(
        s.pixel_format.convert_to_rgba8(&px)[..4],
        [255, 0, 0, 255]
    );
}
