use super::*;

#[test]
fn default_style_matches_reference_treatment() {
    let s = GlassStyle::default();
    assert_eq!(
        s.backdrop_filter("lg_filter"),
        "url(#lg_filter) blur(10px) contrast(1.05) brightness(1.05) saturate(1.05)"
    );
    let decls = s.css_declarations("lg_filter");
    let background = decls.iter().find(|(k, _)| *k == "background").unwrap();
    assert_eq!(background.1, "rgba(240, 240, 240, 0.8)");
    let border = decls.iter().find(|(k, _)| *k == "border").unwrap();
    assert_eq!(border.1, "1px solid rgba(200, 200, 200, 0.3)");
    let shadow = decls.iter().find(|(k, _)| *k == "box-shadow").unwrap();
    assert_eq!(shadow.1, "0 4px 20px rgba(0, 0, 0, 0.1)");
}

#[test]
fn style_validation_rejects_out_of_range() {
    assert!(GlassStyle::default().validate().is_ok());

    let s = GlassStyle {
        blur_px: -1.0,
        ..GlassStyle::default()
    };
    assert!(s.validate().is_err());

    let s = GlassStyle {
        tint: Color::rgba(0, 0, 0, 1.5),
        ..GlassStyle::default()
    };
    assert!(s.validate().is_err());

    let s = GlassStyle {
        blur_px: 85.0,
        ..GlassStyle::default()
    };
    assert!(s.validate().is_ok());
    let s = GlassStyle {
        blur_px: 86.0,
        ..GlassStyle::default()
    };
    assert!(s.validate().is_err());

    let s = GlassStyle {
        contrast: f32::NAN,
        ..GlassStyle::default()
    };
    assert!(s.validate().is_err());
}

#[test]
fn style_deserializes_with_defaults() {
    let s: GlassStyle = serde_json::from_str(r#"{ "blur_px": 4.0 }"#).unwrap();
    assert_eq!(s.blur_px, 4.0);
    assert_eq!(s.tint, GlassStyle::default().tint);
}
