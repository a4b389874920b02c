use super::*;

#[test]
fn wraps_on_word_boundaries() {
    assert_eq!(wrap_words("MATHAN KUMAR", 8), ["MATHAN", "KUMAR"]);
    assert_eq!(wrap_words("AB CD EF", 5), ["AB CD", "EF"]);
    assert_eq!(wrap_words("  spaced   out  ", 20), ["spaced out"]);
    assert!(wrap_words("", 8).is_empty());
    assert!(wrap_words("   ", 8).is_empty());
}

#[test]
fn overlong_words_are_broken() {
    assert_eq!(wrap_words("ABCDEFGHIJ", 4), ["ABCD", "EFGH", "IJ"]);
    assert_eq!(wrap_words("A ABCDEFGHIJ", 4), ["A", "ABCD", "EFGH", "IJ"]);
    assert_eq!(wrap_words("ÄÖÜ", 2), ["ÄÖ", "Ü"]);
}

#[test]
fn name_budget_follows_heading_width() {
    assert_eq!(CardLayout::name_width(), 258.0);
    assert_eq!(CardLayout::name_budget(), 8);
}

#[test]
fn panel_and_code_are_centered() {
    let l = CardLayout::compute("MATHAN KUMAR", 280.0);
    assert_eq!(l.name_lines, ["MATHAN", "KUMAR"]);
    assert_eq!(l.panel.width(), 336.0);
    assert_eq!(l.panel.x0, 57.0);
    assert_eq!(l.code_origin.x, 85.0);
    assert_eq!(l.code_origin.y - l.panel.y0, PANEL_PADDING);
    assert_eq!(l.divider.width(), DIVIDER_WIDTH);
    assert_eq!(l.divider.center().x, 225.0);
}

#[test]
fn elements_stack_top_to_bottom() {
    let l = CardLayout::compute("MATHAN KUMAR", 280.0);
    assert!(l.name_origin.y >= l.branding.y0);
    assert!(l.divider.y0 > l.name_origin.y + NAME_LINE_HEIGHT);
    assert!(l.subtitle_origin.y > l.divider.y1);
    assert!((l.branding.y1 - (l.subtitle_origin.y + SUBTITLE_LINE_HEIGHT)).abs() < 1e-9);
    assert!((l.panel.y0 - l.branding.y1 - 64.0).abs() < 1e-9);
    assert!((l.footer.y0 - l.panel.y1 - 48.0).abs() < 1e-9);
    assert_eq!(l.footer_lines, [FOOTER_TEXT]);
}

#[test]
fn content_is_vertically_centered() {
    for name in ["ANA", "MATHAN KUMAR", "A VERY LONG NAME THAT WRAPS A LOT"] {
        let l = CardLayout::compute(name, 280.0);
        let above = l.branding.y0;
        let below = f64::from(FRAME_SIZE.height) - l.footer.y1;
        assert!((above - below).abs() < 1e-9, "{name}: {above} vs {below}");
    }
}

#[test]
fn hearts_flank_the_name() {
    let l = CardLayout::compute("ANA", 280.0);
    let [left, right] = l.hearts;
    assert_eq!(left.width(), HEART_SIZE);
    assert!((225.0 - left.x1 - (right.x0 - 225.0)).abs() < 1e-9);
    assert!(left.x1 <= 225.0 - CardLayout::name_width() / 2.0);
    assert!((left.center().y - (l.name_origin.y + NAME_LINE_HEIGHT / 2.0)).abs() < 1e-9);
}
