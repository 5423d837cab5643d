use super::*;
use crate::subtitle::tokens::subtitle_tokens;

#[test]
fn style_scales_with_resolution() {
    let tuning = Tuning::default();
    let hd = SubtitleStyle::for_canvas(Canvas::new(1920, 1080), &tuning);
    assert_eq!(hd.font_px, 40.0);
    assert_eq!(hd.bottom_px, 120.0);
    assert_eq!(hd.settle_px, 20.0);

    let small = SubtitleStyle::for_canvas(Canvas::new(320, 180), &tuning);
    assert!((small.font_px - 12.8).abs() < 1e-4);
    assert!((small.bottom_px - 20.0).abs() < 1e-9);
}

#[test]
fn opacity_fades_in_and_out() {
    // One-second word: fade is min(0.3, 1/3) = 0.3.
    assert_eq!(word_opacity(0.0, 1.0, 0.3), 0.0);
    assert!((word_opacity(0.15, 1.0, 0.3) - 0.5).abs() < 1e-6);
    assert_eq!(word_opacity(0.5, 1.0, 0.3), 1.0);
    assert!((word_opacity(0.85, 1.0, 0.3) - 0.5).abs() < 1e-6);
    assert_eq!(word_opacity(1.0, 1.0, 0.3), 0.0);
    assert_eq!(word_opacity(-0.1, 1.0, 0.3), 0.0);
}

#[test]
fn short_words_fade_over_a_third() {
    // 0.3 s word: fade is 0.1 s.
    assert!((word_opacity(0.05, 0.3, 0.3) - 0.5).abs() < 1e-6);
    assert_eq!(word_opacity(0.15, 0.3, 0.3), 1.0);
}

#[test]
fn settle_reaches_rest_at_forty_percent() {
    assert_eq!(settle_offset(0.0, 1.0, 20.0), 20.0);
    assert!((settle_offset(0.2, 1.0, 20.0) - 10.0).abs() < 1e-9);
    assert_eq!(settle_offset(0.4, 1.0, 20.0), 0.0);
    assert_eq!(settle_offset(0.9, 1.0, 20.0), 0.0);
}

#[test]
fn xml_is_escaped() {
    assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
}

#[test]
fn crop_finds_ink_bounds() {
    let mut f = FrameRGBA::transparent(Canvas::new(6, 4));
    for (x, y) in [(2usize, 1usize), (4, 2)] {
        let i = (y * 6 + x) * 4;
        f.data[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
    }
    let (sprite, origin) = crop_to_ink(&f);
    let sprite = sprite.unwrap();
    assert_eq!(origin, (2, 1));
    assert_eq!((sprite.width, sprite.height), (3, 2));

    let (none, _) = crop_to_ink(&FrameRGBA::transparent(Canvas::new(3, 3)));
    assert!(none.is_none());
}

#[test]
fn empty_overlay_needs_no_fonts() {
    let canvas = Canvas::new(64, 36);
    let style = SubtitleStyle::for_canvas(canvas, &Tuning::default());
    let fonts = FontBook::empty();
    let overlay = SubtitleOverlay::render(&[], canvas, style, &fonts).unwrap();
    assert!(overlay.is_empty());

    let tokens = subtitle_tokens("hello", 1.0);
    assert!(SubtitleOverlay::render(&tokens, canvas, style, &fonts).is_err());
}

#[test]
fn words_draw_only_inside_their_window() {
    let fonts = FontBook::system();
    if fonts.is_empty() {
        eprintln!("skipping: no system fonts");
        return;
    }
    let canvas = Canvas::new(320, 180);
    let style = SubtitleStyle::for_canvas(canvas, &Tuning::default());
    let tokens = subtitle_tokens("hello brave world", 3.0);
    let overlay = SubtitleOverlay::render(&tokens, canvas, style, &fonts).unwrap();
    assert_eq!(overlay.tokens().count(), 3);

    let base = FrameRGBA::solid(canvas, [0, 0, 0, 255]);

    let mut visible = base.clone();
    overlay.draw(&mut visible, 1.5);
    assert_ne!(visible, base);
    // Text sits in the lower part of the frame.
    let top_half_changed = visible.data[..visible.data.len() / 2] != base.data[..base.data.len() / 2];
    assert!(!top_half_changed);

    let mut past_end = base.clone();
    overlay.draw(&mut past_end, 3.0);
    assert_eq!(past_end, base);
}

#[test]
fn overlay_clip_is_transparent_between_words() {
    let canvas = Canvas::new(32, 18);
    let style = SubtitleStyle::for_canvas(canvas, &Tuning::default());
    let overlay = SubtitleOverlay::render(&[], canvas, style, &FontBook::empty()).unwrap();
    let fps = Fps::whole(10).unwrap();
    let clip = overlay.into_clip(fps, 12).unwrap();
    assert_eq!(clip.frames(), 12);
    assert!(clip.audio().is_none());
    let frame = clip.render(5).unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}
