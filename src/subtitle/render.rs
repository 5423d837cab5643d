use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::effects::composite::blit_over;
use crate::foundation::core::{Canvas, Fps, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::scene::model::Tuning;
use crate::subtitle::tokens::SubtitleToken;
use crate::timeline::clip::{Clip, FrameSource};

/// Near-white word colours, cycled by word index.
pub const PALETTE: [&str; 5] = ["#FFFFFF", "#F5F5F5", "#FAFAFA", "#F0F0F0", "#EFEFEF"];

const STROKE_WIDTH: f32 = 1.5;
/// Share of the word window spent settling into place.
const SETTLE_FRACTION: f64 = 0.4;

/// Fonts available to the subtitle rasterizer.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl FontBook {
    /// System fonts plus any `.ttf`/`.otf`/`.ttc` files in `extra_dirs`.
    pub fn load(extra_dirs: &[&Path]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in extra_dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        Self { db: Arc::new(db) }
    }

    pub fn system() -> Self {
        Self::load(&[])
    }

    /// No fonts at all; only empty overlays can be rendered with it.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    fn options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: self.db.clone(),
            font_resolver: bold_sans_resolver(),
            ..Default::default()
        }
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };
    for path in rd.flatten().map(|e| e.path()) {
        let is_font = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"));
        if is_font && db.load_font_file(&path).is_err() {
            tracing::debug!(path = %path.display(), "skipping unreadable font file");
        }
    }
}

// Requested families first, then any sans face, then whatever is installed.
fn bold_sans_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    _ => usvg::fontdb::Family::SansSerif,
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

/// Resolution-dependent subtitle layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubtitleStyle {
    pub font_px: f32,
    /// Distance from the bottom edge to the top of the text box, in pixels.
    pub bottom_px: f64,
    /// Upward settle distance in pixels.
    pub settle_px: f64,
    pub max_fade_secs: f64,
}

impl SubtitleStyle {
    /// Font capped at `subtitle_font_max_px` and at 1/25 of the width; offsets scale with height.
    pub fn for_canvas(canvas: Canvas, tuning: &Tuning) -> Self {
        let lines = f64::from(canvas.height) / 1080.0;
        Self {
            font_px: tuning
                .subtitle_font_max_px
                .min(canvas.width as f32 / 25.0)
                .max(1.0),
            bottom_px: tuning.subtitle_bottom_px * lines,
            settle_px: tuning.subtitle_settle_px * lines,
            max_fade_secs: tuning.subtitle_max_fade_secs,
        }
    }
}

/// Opacity of a word `local_t` seconds into a window of `duration` seconds.
///
/// Linear fade in and fade out, each lasting `min(max_fade, duration / 3)`.
pub fn word_opacity(local_t: f64, duration: f64, max_fade: f64) -> f32 {
    if !(local_t >= 0.0 && local_t < duration) {
        return 0.0;
    }
    let fade = max_fade.min(duration / 3.0);
    if fade <= 0.0 {
        return 1.0;
    }
    let fade_in = local_t / fade;
    let fade_out = (duration - local_t) / fade;
    fade_in.min(fade_out).clamp(0.0, 1.0) as f32
}

/// Remaining upward offset while a word settles, reaching zero at 40% of its window.
pub fn settle_offset(local_t: f64, duration: f64, settle_px: f64) -> f64 {
    let window = duration * SETTLE_FRACTION;
    if window <= 0.0 {
        return 0.0;
    }
    settle_px * (1.0 - (local_t / window).clamp(0.0, 1.0))
}

#[derive(Debug)]
struct WordSprite {
    token: SubtitleToken,
    /// Cropped premultiplied glyph raster; `None` when nothing was drawn.
    sprite: Option<FrameRGBA>,
    /// Sprite origin relative to the text box's top-left corner.
    origin: (i64, i64),
}

/// Rasterized word-by-word subtitles for one scene.
#[derive(Debug)]
pub struct SubtitleOverlay {
    canvas: Canvas,
    style: SubtitleStyle,
    words: Vec<WordSprite>,
}

impl SubtitleOverlay {
    /// Rasterize every token once. An empty token list yields an empty overlay.
    #[tracing::instrument(skip(tokens, fonts), fields(words = tokens.len()))]
    pub fn render(
        tokens: &[SubtitleToken],
        canvas: Canvas,
        style: SubtitleStyle,
        fonts: &FontBook,
    ) -> ReelResult<Self> {
        if tokens.is_empty() {
            return Ok(Self {
                canvas,
                style,
                words: Vec::new(),
            });
        }
        if fonts.is_empty() {
            return Err(ReelError::evaluation("no fonts available for subtitles"));
        }

        let words = tokens
            .par_iter()
            .enumerate()
            .map(|(i, token)| -> ReelResult<WordSprite> {
                let svg = word_svg(&token.word, PALETTE[i % PALETTE.len()], canvas, style);
                let (sprite, origin) = rasterize(&svg, &fonts.options())?;
                Ok(WordSprite {
                    token: token.clone(),
                    sprite,
                    origin,
                })
            })
            .collect::<ReelResult<Vec<_>>>()?;

        Ok(Self {
            canvas,
            style,
            words,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &SubtitleToken> {
        self.words.iter().map(|w| &w.token)
    }

    /// Draw the word visible at scene-local time `t` onto `frame`.
    pub fn draw(&self, frame: &mut FrameRGBA, t: f64) {
        let Some(word) = self.words.iter().find(|w| w.token.contains(t)) else {
            return;
        };
        let Some(sprite) = word.sprite.as_ref() else {
            return;
        };
        let local = t - word.token.start_time;
        let opacity = word_opacity(local, word.token.duration, self.style.max_fade_secs);
        let rise = settle_offset(local, word.token.duration, self.style.settle_px);
        let top = f64::from(self.canvas.height) - self.style.bottom_px - rise;
        blit_over(
            frame,
            sprite,
            word.origin.0,
            top.round() as i64 + word.origin.1,
            opacity,
        );
    }

    /// The overlay on its own, as a transparent clip of `frames` frames.
    pub fn into_clip(self, fps: Fps, frames: u64) -> ReelResult<Clip> {
        let canvas = self.canvas;
        Clip::from_fn(canvas, fps, frames, move |i| {
            let mut frame = FrameRGBA::transparent(canvas);
            self.draw(&mut frame, fps.frames_to_secs(i));
            Ok(frame)
        })
    }
}

struct Subtitled {
    base: Box<dyn FrameSource>,
    overlay: SubtitleOverlay,
    fps: Fps,
}

impl FrameSource for Subtitled {
    fn render(&self, frame: u64) -> ReelResult<FrameRGBA> {
        let mut out = self.base.render(frame)?;
        self.overlay.draw(&mut out, self.fps.frames_to_secs(frame));
        Ok(out)
    }
}

/// Layer `overlay` over every frame of `clip`. Length and audio are unchanged.
pub fn overlay_subtitles(clip: Clip, overlay: SubtitleOverlay) -> Clip {
    if overlay.is_empty() {
        return clip;
    }
    let fps = clip.fps();
    clip.map_source(|base| Box::new(Subtitled { base, overlay, fps }))
}

fn word_svg(word: &str, fill: &str, canvas: Canvas, style: SubtitleStyle) -> String {
    let (w, h, baseline) = text_box(canvas, style);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><text x="{x}" y="{baseline}" text-anchor="middle" font-family="Arial, Helvetica, 'Liberation Sans', 'DejaVu Sans', sans-serif" font-weight="bold" font-size="{size}" fill="{fill}" stroke="black" stroke-width="{STROKE_WIDTH}" paint-order="stroke">{text}</text></svg>"#,
        x = f64::from(w) / 2.0,
        size = style.font_px,
        text = escape_xml(word),
    )
}

/// Text box spans the canvas width; returns `(width, height, baseline)`.
fn text_box(canvas: Canvas, style: SubtitleStyle) -> (u32, u32, f32) {
    let h = (style.font_px * 1.6).ceil().max(1.0) as u32;
    (canvas.width, h, style.font_px * 1.2)
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn rasterize(svg: &str, opts: &usvg::Options<'_>) -> ReelResult<(Option<FrameRGBA>, (i64, i64))> {
    let tree = usvg::Tree::from_str(svg, opts)
        .map_err(|e| ReelError::evaluation(format!("subtitle svg parse failed: {e}")))?;
    let size = tree.size();
    let (w, h) = (size.width().ceil() as u32, size.height().ceil() as u32);
    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| ReelError::evaluation("failed to allocate subtitle pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    let full = FrameRGBA {
        width: w,
        height: h,
        data: pixmap.data().to_vec(),
        premultiplied: true,
    };
    Ok(crop_to_ink(&full))
}

/// Crop to the bounding box of non-transparent pixels.
fn crop_to_ink(frame: &FrameRGBA) -> (Option<FrameRGBA>, (i64, i64)) {
    let (w, h) = (frame.width as usize, frame.height as usize);
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for y in 0..h {
        for x in 0..w {
            if frame.data[(y * w + x) * 4 + 3] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    let Some((x0, y0, x1, y1)) = bounds else {
        return (None, (0, 0));
    };

    let cw = x1 - x0 + 1;
    let mut data = Vec::with_capacity(cw * (y1 - y0 + 1) * 4);
    for y in y0..=y1 {
        let start = (y * w + x0) * 4;
        data.extend_from_slice(&frame.data[start..start + cw * 4]);
    }
    let sprite = FrameRGBA {
        width: cw as u32,
        height: (y1 - y0 + 1) as u32,
        data,
        premultiplied: true,
    };
    (Some(sprite), (x0 as i64, y0 as i64))
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/render.rs"]
mod tests;
