use super::*;

#[test]
fn viewport_rejects_negative_or_nan_sizes() {
    assert!(Viewport::new(-1.0, 10.0, 1.0).is_err());
    assert!(Viewport::new(10.0, f64::NAN, 1.0).is_err());
    assert!(Viewport::new(0.0, 0.0, 1.0).is_ok());
}

#[test]
fn unset_device_pixel_ratio_falls_back_to_one() {
    for dpr in [0.0, -2.0, f64::NAN, f64::INFINITY] {
        let vp = Viewport::new(100.0, 100.0, dpr).unwrap();
        assert_eq!(vp.dpr(), 1.0);
    }
    assert_eq!(Viewport::new(100.0, 100.0, 2.5).unwrap().dpr(), 2.5);
}

#[test]
fn premul_rounds_and_keeps_alpha() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);
    assert_eq!(Rgba8Premul::from_straight_rgba(9, 9, 9, 0), Rgba8Premul::transparent());
}

#[test]
fn hsla_primaries() {
    assert_eq!(
        Rgba8Premul::from_hsla(0.0, 1.0, 0.5, 1.0).to_array(),
        [255, 0, 0, 255]
    );
    assert_eq!(
        Rgba8Premul::from_hsla(120.0, 1.0, 0.5, 1.0).to_array(),
        [0, 255, 0, 255]
    );
    assert_eq!(
        Rgba8Premul::from_hsla(240.0, 1.0, 0.5, 1.0).to_array(),
        [0, 0, 255, 255]
    );
    assert_eq!(
        Rgba8Premul::from_hsla(600.0, 0.0, 1.0, 1.0).to_array(),
        [255, 255, 255, 255]
    );
}

#[test]
fn hsla_alpha_is_clamped_and_premultiplied() {
    let c = Rgba8Premul::from_hsla(200.0, 0.9, 0.7, 2.0);
    assert_eq!(c.a, 255);
    let c = Rgba8Premul::from_hsla(200.0, 0.9, 0.7, 0.0);
    assert_eq!(c, Rgba8Premul::transparent());
    let half = Rgba8Premul::from_hsla(200.0, 0.9, 0.7, 0.5);
    assert!(half.r <= half.a && half.g <= half.a && half.b <= half.a);
}
