use super::*;

fn field(w: f64, h: f64, dpr: f64) -> BeamField {
    BeamField::new(BeamConfig::default(), Size::new(w, h), dpr)
}

#[test]
fn population_is_one_and_a_half_times_the_floor() {
    let f = field(384.0, 640.0, 1.0);
    assert_eq!(f.beams().len(), 30);
    assert!(f.beams().len() >= MINIMUM_BEAMS);
}

#[test]
fn default_blur_stacks_canvas_and_element_blurs() {
    let blur = BeamConfig::default().blur_px;
    assert!((blur - 37.0).abs() < 1e-9);
    assert!(blur > CANVAS_BLUR_PX && blur < CANVAS_BLUR_PX + ELEMENT_BLUR_PX);
}

#[test]
fn spawned_beams_respect_their_ranges() {
    let (w, h) = (384.0, 640.0);
    let f = field(w, h, 2.0);
    for b in f.beams() {
        assert!(b.width >= 30.0 && b.width < 90.0);
        assert_eq!(b.length, h * 2.5);
        assert!(b.angle >= -35.0 && b.angle < -25.0);
        assert!(b.speed >= 0.6 && b.speed < 1.8);
        assert!(b.opacity >= 0.12 && b.opacity < 0.28);
        assert!(b.hue >= 190.0 && b.hue < 260.0);
        assert!(b.pulse >= 0.0 && b.pulse < TAU);
        assert!(b.pulse_speed >= 0.02 && b.pulse_speed < 0.05);
        assert!(b.x >= -0.25 * w && b.x < 1.25 * w);
        assert!(b.y >= -0.25 * h && b.y < 1.25 * h);
    }
}

#[test]
fn every_resize_rebuilds_a_full_valid_population() {
    let mut f = field(100.0, 100.0, 1.0);
    let before = f.beams().to_vec();
    for (w, h, dpr) in [(0.0, 0.0, 1.0), (320.0, 480.0, 3.0), (1.0, 5000.0, 0.5)] {
        f.resize(Size::new(w, h), dpr);
        assert_eq!(f.beams().len(), 30);
        for b in f.beams() {
            assert!(b.width >= 0.0);
            assert!(b.length >= 0.0);
        }
    }
    assert_eq!(f.generation(), 4);
    assert_ne!(f.beams(), &before[..]);
}

#[test]
fn backing_store_uses_device_pixel_ratio_and_never_collapses() {
    let m = SurfaceMetrics::new(Size::new(100.5, 50.2), 2.0);
    assert_eq!(m.backing_width, 201);
    assert_eq!(m.backing_height, 100);

    let m = SurfaceMetrics::new(Size::new(0.0, 0.0), 2.0);
    assert_eq!((m.backing_width, m.backing_height), (1, 1));

    let m = SurfaceMetrics::new(Size::new(10.0, 10.0), 0.0);
    assert_eq!(m.dpr, 1.0);
    assert_eq!(m.backing_width, 10);
}

#[test]
fn repeated_resizes_do_not_accumulate_scale() {
    let mut m = SurfaceMetrics::new(Size::new(10.0, 10.0), 2.0);
    for _ in 0..5 {
        m.resize(Size::new(10.0, 10.0), 2.0);
    }
    assert_eq!(m.transform, Affine::scale(2.0));
    m.resize(Size::new(10.0, 10.0), 1.5);
    assert_eq!(m.transform, Affine::scale(1.5));
}

#[test]
fn tick_moves_beams_up_and_advances_pulse() {
    let mut f = field(200.0, 200.0, 1.0);
    let before = f.beams().to_vec();
    f.tick();
    for (a, b) in before.iter().zip(f.beams()) {
        if b.y <= a.y {
            assert!((a.y - a.speed - b.y).abs() < 1e-9);
            assert!((a.pulse + a.pulse_speed - b.pulse).abs() < 1e-9);
        }
    }
}

#[test]
fn exited_beams_are_recycled_to_the_bottom_before_the_next_draw() {
    let (w, h) = (300.0, 200.0);
    let mut f = field(w, h, 1.0);
    let total = f.beams().len();
    let mut recycled_any = false;
    for _ in 0..2000 {
        let before = f.beams().to_vec();
        let recycled = f.tick();
        recycled_any |= recycled > 0;
        for (index, (a, b)) in before.iter().zip(f.beams()).enumerate() {
            assert!(!b.has_exited_top(), "beam {index} left visible contract");
            let moved_y = a.y - a.speed;
            if moved_y + a.length < -RECYCLE_MARGIN {
                assert_eq!(b.y, h + RECYCLE_MARGIN);
                let spacing = w / 3.0;
                let center = (index % 3) as f64 * spacing + spacing / 2.0;
                assert!((b.x - center).abs() <= spacing * 0.25);
                assert!(b.width >= 100.0 && b.width < 220.0);
                assert!(b.speed >= 0.5 && b.speed < 0.9);
                assert!(b.opacity >= 0.35 && b.opacity < 0.55);
                let hue = 160.0 + (index as f64 * 120.0) / total as f64;
                assert!((b.hue - hue).abs() < 1e-9);
                assert_eq!(b.length, a.length);
            }
        }
    }
    assert!(recycled_any);
}

#[test]
fn same_seed_same_field() {
    let a = field(320.0, 240.0, 1.0);
    let b = field(320.0, 240.0, 1.0);
    assert_eq!(a.beams(), b.beams());

    let other = BeamField::new(
        BeamConfig {
            seed: 99,
            ..BeamConfig::default()
        },
        Size::new(320.0, 240.0),
        1.0,
    );
    assert_ne!(a.beams(), other.beams());
}

#[test]
fn pulsing_opacity_follows_intensity_presets() {
    let mut beam = field(10.0, 10.0, 1.0).beams()[0];
    beam.opacity = 0.5;
    beam.pulse = 0.0;
    assert!((beam.pulsing_opacity(Intensity::Subtle) - 0.5 * 0.8 * 0.8).abs() < 1e-12);
    assert!((beam.pulsing_opacity(Intensity::Medium) - 0.5 * 0.8 * 1.2).abs() < 1e-12);
    beam.pulse = std::f64::consts::FRAC_PI_2;
    assert!((beam.pulsing_opacity(Intensity::Strong) - 0.5 * 1.0 * 1.6).abs() < 1e-12);
}

#[test]
fn intensity_parses_and_rejects_unknown() {
    assert_eq!("strong".parse::<Intensity>().unwrap(), Intensity::Strong);
    assert!("blinding".parse::<Intensity>().is_err());
    assert_eq!(Intensity::default(), Intensity::Medium);
}

#[test]
fn config_rejects_negative_blur() {
    let cfg = BeamConfig {
        blur_px: -1.0,
        ..BeamConfig::default()
    };
    assert!(cfg.validate().is_err());
    assert!(BeamConfig::default().validate().is_ok());
}
