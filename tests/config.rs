//! Loading operation options from JSON.
#![cfg(feature = "serde")]

use pixshade::{
    ColorKey, ColorRamp, ColorSpec, CompositeOp, InterpolateOptions, MaskShape, Rgb, Scaling,
    ShadeOptions, SpreadOptions,
};

#[test]
fn test_shade_options_from_json() {
    let json = r##"{
        "interpolate": {
            "ramp": [{"r": 255, "g": 192, "b": 203}, {"r": 255, "g": 0, "b": 0}],
            "how": "log",
            "span": [0.0, 100.0]
        },
        "color_key": {"a": [255, 0, 0], "b": "#0000FF", "c": "orange"},
        "colorize": {"min_alpha": 40}
    }"##;
    let opts: ShadeOptions = serde_json::from_str(json).unwrap();
    assert_eq!(
        opts.interpolate.ramp,
        ColorRamp::two(Rgb::new(255, 192, 203), Rgb::new(255, 0, 0))
    );
    assert!(matches!(opts.interpolate.how, Scaling::Log));
    assert_eq!(opts.interpolate.span, Some((0.0, 100.0)));
    let Some(ColorKey::Map(map)) = &opts.color_key else {
        panic!("expected a category map, got {:?}", opts.color_key);
    };
    assert_eq!(map["a"], ColorSpec::Tuple(255, 0, 0));
    assert_eq!(map["b"], ColorSpec::from("#0000FF"));
    assert_eq!(opts.colorize.min_alpha, 40);
    assert!(matches!(opts.colorize.how, Scaling::Cbrt));
}

#[test]
fn test_defaults_fill_missing_fields() {
    let opts: SpreadOptions = serde_json::from_str(r#"{"how": "add"}"#).unwrap();
    assert_eq!(opts.px, 1);
    assert_eq!(opts.shape, MaskShape::Circle);
    assert_eq!(opts.how, CompositeOp::Add);
    assert!(opts.mask.is_none());

    let json = r#"{"mask": [[true, false, true], [false, true, false], [true, false, true]]}"#;
    let opts: SpreadOptions = serde_json::from_str(json).unwrap();
    assert_eq!(opts.mask.map(|m| m.count()), Some(5));
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(serde_json::from_str::<InterpolateOptions>(r#"{"how": "eq_hist"}"#).is_err());
    let one_stop = r#"{"ramp": [{"r": 1, "g": 2, "b": 3}]}"#;
    assert!(serde_json::from_str::<InterpolateOptions>(one_stop).is_err());
    let even_mask = r#"{"mask": [[true, true], [true, true]]}"#;
    assert!(serde_json::from_str::<SpreadOptions>(even_mask).is_err());
    assert!(serde_json::from_str::<SpreadOptions>(r#"{"how": "xor"}"#).is_err());
}

#[test]
fn test_round_trip() {
    let opts = InterpolateOptions::default().with_how(Scaling::Linear).with_span(1.0, 2.0);
    let json = serde_json::to_string(&opts).unwrap();
    let back: InterpolateOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back.ramp, opts.ramp);
    assert_eq!(back.span, opts.span);
    assert!(matches!(back.how, Scaling::Linear));

    let custom = InterpolateOptions::default().with_how(Scaling::custom(|x| x));
    assert!(serde_json::to_string(&custom).is_err());
}
