use serde_json::json;

use super::*;

#[test]
fn builtin_registers_every_kind() {
    let r = TransformRegistry::builtin();
    let kinds: Vec<_> = r.kinds().map(|k| k.kind).collect();
    assert_eq!(
        kinds,
        [
            "alpha_from_rgb",
            "assemble",
            "break_flipbook",
            "color_correction",
            "crop",
            "decimate",
            "fade",
            "fix_borders",
            "loop",
            "premultiply_alpha",
            "remap_color",
            "remove_background",
            "resize",
            "retime",
            "rotate",
        ]
    );
    assert!(r.contains("loop"));
    assert!(!TransformRegistry::new().contains("loop"));
}

#[test]
fn unknown_kind_is_a_validation_error() {
    let r = TransformRegistry::builtin();
    assert!(matches!(
        r.create("blur", json!({})),
        Err(SeqError::Validation(_))
    ));
}

#[test]
fn missing_params_take_defaults() {
    let r = TransformRegistry::builtin();
    let t = r.create("resize", json!({ "width": 64 })).unwrap();
    assert_eq!(t.label(), "Resize (64x256)");
    assert_eq!(t.params().unwrap(), json!({ "width": 64, "height": 256 }));

    let d = r.create_default("decimate").unwrap();
    assert_eq!(d.params().unwrap(), json!({ "by": 3 }));
}

#[test]
fn invalid_params_are_rejected() {
    let r = TransformRegistry::builtin();
    assert!(matches!(
        r.create("decimate", json!({ "by": 0 })),
        Err(SeqError::Validation(_))
    ));
    assert!(matches!(
        r.create("decimate", json!({ "by": "three" })),
        Err(SeqError::Serde(_))
    ));
    assert!(r.create("break_flipbook", json!({ "cols": 100, "rows": 100 })).is_err());
    assert!(r.create("color_correction", json!({ "contrast": 3.0 })).is_err());
    assert!(r.create("fix_borders", json!({ "exponent": 0.1 })).is_err());
    assert!(r.create("remap_color", json!({ "gradient": [] })).is_err());
    assert!(matches!(
        r.create("remap_color", json!({ "source": "hue" })),
        Err(SeqError::Serde(_))
    ));
}

#[test]
fn params_rebuild_an_equal_transform() {
    let r = TransformRegistry::builtin();
    for info in r.kinds() {
        let t = r.create_default(info.kind).unwrap();
        let params = t.params().unwrap();
        let rebuilt = r.create(info.kind, params.clone()).unwrap();
        assert_eq!(rebuilt.params().unwrap(), params, "{}", info.kind);
        assert_eq!(rebuilt.kind(), info.kind);
    }
}
