use super::*;

#[test]
fn extent_flags_track_edges() {
    let at = |offset| {
        ScrollExtent::from_metrics(ScrollMetrics {
            offset,
            scroll_width: 1000.0,
            client_width: 400.0,
        })
    };
    let left = at(0.0);
    assert!(!left.can_scroll_left && left.can_scroll_right);
    let mid = at(250.0);
    assert!(mid.can_scroll_left && mid.can_scroll_right);
    let right = at(600.0);
    assert!(right.can_scroll_left && !right.can_scroll_right);
}

#[test]
fn content_narrower_than_viewport_cannot_scroll() {
    let e = ScrollExtent::from_metrics(ScrollMetrics {
        offset: 0.0,
        scroll_width: 300.0,
        client_width: 400.0,
    });
    assert!(!e.can_scroll_left && !e.can_scroll_right);
}

#[test]
fn default_extent_assumes_left_edge() {
    let e = ScrollExtent::default();
    assert!(!e.can_scroll_left);
    assert!(e.can_scroll_right);
}

#[test]
fn instant_scrolls_are_clamped() {
    let mut strip = HeadlessStrip::new(1000.0, 400.0);
    strip.scroll_to(5000.0, ScrollBehavior::Instant);
    assert_eq!(strip.metrics().offset, 600.0);
    strip.scroll_by(-10_000.0, ScrollBehavior::Instant);
    assert_eq!(strip.metrics().offset, 0.0);
    assert_eq!(strip.metrics().max_offset(), 600.0);
}

#[test]
fn smooth_scroll_settles_on_target_after_advancing() {
    let mut strip = HeadlessStrip::new(1000.0, 400.0);
    strip.scroll_by(300.0, ScrollBehavior::Smooth);
    assert!(strip.is_scrolling());
    assert_eq!(strip.metrics().offset, 0.0);

    let mut moved = 0;
    while strip.is_scrolling() {
        if strip.advance(1.0 / 60.0) {
            moved += 1;
        }
    }
    assert!(moved > 1);
    assert_eq!(strip.metrics().offset, 300.0);
    assert!(!strip.advance(1.0));
}

#[test]
fn smooth_scroll_to_current_offset_is_a_no_op() {
    let mut strip = HeadlessStrip::new(1000.0, 400.0);
    strip.scroll_to(0.0, ScrollBehavior::Smooth);
    assert!(!strip.is_scrolling());

    let mut instant = HeadlessStrip::new(1000.0, 400.0).with_smooth_secs(0.0);
    instant.scroll_to(120.0, ScrollBehavior::Smooth);
    assert_eq!(instant.metrics().offset, 120.0);
}

#[test]
fn shrinking_content_reclamps_offset() {
    let mut strip = HeadlessStrip::new(1000.0, 400.0);
    strip.scroll_to(600.0, ScrollBehavior::Instant);
    strip.set_extent(700.0, 400.0);
    assert_eq!(strip.metrics().offset, 300.0);
}

#[test]
fn strip_for_cards_uses_layout_pitch() {
    let layout = crate::carousel::CardLayout {
        card_width: 384.0,
        gap: 8.0,
    };
    let strip = HeadlessStrip::for_cards(4, layout, 1000.0);
    assert_eq!(strip.metrics().scroll_width, 4.0 * 392.0);
    let small = HeadlessStrip::for_cards(1, layout, 1000.0);
    assert_eq!(small.metrics().scroll_width, 1000.0);
}
