//! Terminal backend
//!
//! Rasterizes the world into an RGB pixel grid and paints it with
//! half-block glyphs, two pixels per character cell. The grid resizes to
//! the terminal every frame and letterboxes the fixed 320x240 view.
//!
//! Input distinguishes two terminal generations: with the kitty keyboard
//! protocol we get real press/release events and track held keys exactly;
//! without it we infer "held" from the key-repeat stream, and a press only
//! counts as new once the inferred hold has lapsed.

use std::io::{self, Stdout, Write, stdout};
use std::mem;
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute,
    event::{
        self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use glam::Vec2;

use crate::app::InputSource;
use crate::assets::SpriteSheet;
use crate::consts::{VIEW_H, VIEW_W};
use crate::render::Canvas;
use crate::sim::color::Rgba;
use crate::sim::rect::Rect;
use crate::sim::tick::TickInput;

/// Sprite pixels below this alpha are not drawn
const SPRITE_ALPHA_CUTOFF: u8 = 128;

/// World-space colors below this alpha are not drawn
const SHAPE_ALPHA_CUTOFF: f32 = 0.5;

/// Without release events, a key counts as held for this long after its
/// last press or repeat. Long enough to bridge the initial repeat delay
/// of common terminals.
const KEY_HOLD_WINDOW: Duration = Duration::from_millis(350);

/// Maps world coordinates (origin center, y up) onto a letterboxed pixel
/// surface (origin top-left, y down)
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    scale: f32,
    ox: f32,
    oy: f32,
}

impl Viewport {
    pub fn new(px_w: u32, px_h: u32) -> Self {
        let scale = (px_w as f32 / VIEW_W).min(px_h as f32 / VIEW_H);
        Self {
            scale,
            ox: (px_w as f32 - VIEW_W * scale) / 2.0,
            oy: (px_h as f32 - VIEW_H * scale) / 2.0,
        }
    }

    /// World point to fractional pixel coordinates
    pub fn to_px(&self, world: Vec2) -> (f32, f32) {
        (
            self.ox + (world.x + VIEW_W / 2.0) * self.scale,
            self.oy + (VIEW_H / 2.0 - world.y) * self.scale,
        )
    }

    /// World rect to a pixel rect `(x, y, w, h)`, top-left anchored.
    /// Never collapses below one pixel so thin platforms stay visible.
    pub fn to_px_rect(&self, rect: Rect) -> (i32, i32, i32, i32) {
        let (x, y) = self.to_px(Vec2::new(rect.min.x, rect.max.y));
        let w = (rect.w() * self.scale).round().max(1.0);
        let h = (rect.h() * self.scale).round().max(1.0);
        (x.round() as i32, y.round() as i32, w as i32, h as i32)
    }

    /// World length to pixels
    pub fn to_px_len(&self, len: f32) -> f32 {
        len * self.scale
    }
}

/// RGB surface; height is terminal rows times two
#[derive(Debug)]
pub struct PixelGrid {
    w: usize,
    h: usize,
    px: Vec<[u8; 3]>,
}

impl PixelGrid {
    pub fn new(w: usize, h: usize) -> Self {
        Self { w, h, px: vec![[0; 3]; w * h] }
    }

    pub fn resize_and_fill(&mut self, w: usize, h: usize, color: [u8; 3]) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, color);
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = color;
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: [u8; 3]) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, color);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: [u8; 3]) {
        let x0 = (cx - r).floor() as i32;
        let x1 = (cx + r).ceil() as i32;
        let y0 = (cy - r).floor() as i32;
        let y1 = (cy + r).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.set(x, y, color);
                }
            }
        }
    }

    /// Nearest-neighbor blit of a sheet frame into the pixel rect.
    /// Transparent sprite pixels are skipped; `flip_x` mirrors the frame.
    pub fn blit(
        &mut self,
        sheet: &SpriteSheet,
        frame: Rect,
        x0: i32,
        y0: i32,
        w: i32,
        h: i32,
        flip_x: bool,
    ) {
        if w <= 0 || h <= 0 {
            return;
        }
        for dy in 0..h {
            let v = (dy as f32 + 0.5) / h as f32;
            let sy = frame.min.y + v * frame.h();
            for dx in 0..w {
                let u = (dx as f32 + 0.5) / w as f32;
                let u = if flip_x { 1.0 - u } else { u };
                let sx = frame.min.x + u * frame.w();

                let sx = (sx as u32).min(sheet.width().saturating_sub(1));
                let sy = (sy as u32).min(sheet.height().saturating_sub(1));
                let [r, g, b, a] = sheet.pixel(sx, sy);
                if a >= SPRITE_ALPHA_CUTOFF {
                    self.set(x0 + dx, y0 + dy, [r, g, b]);
                }
            }
        }
    }

    /// Paint the grid with half blocks, one glyph per pixel pair. Color
    /// escapes are only emitted when the color actually changes.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = [0u8; 3];
        let mut prev_bg = [0u8; 3];
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, SetBackgroundColor(rgb(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, SetForegroundColor(rgb(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, SetBackgroundColor(rgb(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, Print('\u{2580}'))?; // ▀
                }
            }
            if row < rows - 1 {
                queue!(out, ResetColor, Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, ResetColor)?;
        Ok(())
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

/// Canvas that owns the terminal: raw mode, alternate screen, hidden
/// cursor. All of it is restored on drop.
pub struct TermCanvas {
    out: Stdout,
    grid: PixelGrid,
    view: Viewport,
    status: Option<String>,
    key_release: bool,
}

impl TermCanvas {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let key_release = terminal::supports_keyboard_enhancement().unwrap_or(false);

        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        if key_release {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES),
            )?;
        }

        let (cols, rows) = terminal::size()?;
        let (pw, ph) = (cols as usize, rows as usize * 2);
        Ok(Self {
            out,
            grid: PixelGrid::new(pw, ph),
            view: Viewport::new(pw as u32, ph as u32),
            status: None,
            key_release,
        })
    }

    /// Whether the terminal reports key release events
    pub fn key_release_supported(&self) -> bool {
        self.key_release
    }
}

impl Drop for TermCanvas {
    fn drop(&mut self) {
        if self.key_release {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

impl Canvas for TermCanvas {
    fn clear(&mut self, color: Rgba) {
        // Picks up terminal resizes without listening for resize events
        let (pw, ph) = match terminal::size() {
            Ok((cols, rows)) => (cols as usize, rows as usize * 2),
            Err(_) => (self.grid.w, self.grid.h),
        };
        self.grid.resize_and_fill(pw, ph, color.to_rgb8());
        self.view = Viewport::new(pw as u32, ph as u32);
        self.status = None;
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgba) {
        if color.a < SHAPE_ALPHA_CUTOFF {
            return;
        }
        let (x, y, w, h) = self.view.to_px_rect(rect);
        self.grid.fill_rect(x, y, w, h, color.to_rgb8());
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if color.a < SHAPE_ALPHA_CUTOFF {
            return;
        }
        let (cx, cy) = self.view.to_px(center);
        self.grid
            .fill_circle(cx, cy, self.view.to_px_len(radius), color.to_rgb8());
    }

    fn draw_sprite(&mut self, sheet: &SpriteSheet, frame: Rect, dest: Rect, flip_x: bool) {
        let (x, y, w, h) = self.view.to_px_rect(dest);
        self.grid.blit(sheet, frame, x, y, w, h, flip_x);
    }

    fn status(&mut self, line: &str) {
        self.status = Some(line.to_string());
    }

    fn present(&mut self) -> io::Result<()> {
        self.grid.render(&mut self.out)?;
        if let Some(line) = self.status.take() {
            queue!(
                self.out,
                cursor::MoveTo(0, 0),
                SetForegroundColor(Color::White),
                SetBackgroundColor(Color::Black),
                Print(&line),
                ResetColor,
            )?;
        }
        self.out.flush()
    }
}

/// Held state of one key
#[derive(Debug, Default, Clone, Copy)]
struct HeldKey {
    down: bool,
    last_seen: Option<Instant>,
}

impl HeldKey {
    fn press(&mut self, now: Instant) {
        self.down = true;
        self.last_seen = Some(now);
    }

    fn release(&mut self) {
        self.down = false;
        self.last_seen = None;
    }

    /// Exact mode trusts press/release; inferred mode decays after the
    /// hold window
    fn is_held(&self, now: Instant, exact: bool) -> bool {
        if exact {
            self.down
        } else {
            self.last_seen
                .is_some_and(|seen| now.duration_since(seen) < KEY_HOLD_WINDOW)
        }
    }
}

/// Keyboard state machine feeding the frame loop.
///
/// Run and slow motion report sampled key state. Jump and restart latch
/// the press edge instead and surrender it on the next snapshot, so a
/// held key jumps once and rescues once per press.
pub struct TermInput {
    exact: bool,
    left: HeldKey,
    right: HeldKey,
    jump: HeldKey,
    slow: HeldKey,
    restart: HeldKey,
    jump_edge: bool,
    restart_edge: bool,
    quit: bool,
}

impl TermInput {
    pub fn new(exact: bool) -> Self {
        Self {
            exact,
            left: HeldKey::default(),
            right: HeldKey::default(),
            jump: HeldKey::default(),
            slow: HeldKey::default(),
            restart: HeldKey::default(),
            jump_edge: false,
            restart_edge: false,
            quit: false,
        }
    }

    fn apply_key(&mut self, code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind, now: Instant) {
        if kind == KeyEventKind::Press
            && (code == KeyCode::Char('q')
                || code == KeyCode::Esc
                || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL)))
        {
            self.quit = true;
            return;
        }

        let exact = self.exact;
        let (key, edge) = match code {
            KeyCode::Left => (&mut self.left, None),
            KeyCode::Right => (&mut self.right, None),
            KeyCode::Up | KeyCode::Char(' ') => (&mut self.jump, Some(&mut self.jump_edge)),
            KeyCode::Tab => (&mut self.slow, None),
            KeyCode::Enter => (&mut self.restart, Some(&mut self.restart_edge)),
            _ => return,
        };
        match kind {
            KeyEventKind::Press => {
                // Legacy terminals repeat as a press stream, so a press
                // is only an edge while the key does not read as held
                if let Some(edge) = edge {
                    if !key.is_held(now, exact) {
                        *edge = true;
                    }
                }
                key.press(now);
            }
            KeyEventKind::Repeat => key.press(now),
            KeyEventKind::Release => key.release(),
        }
    }

    /// One frame of control state; press edges reset once read
    fn snapshot(&mut self, now: Instant) -> TickInput {
        TickInput {
            left: self.left.is_held(now, self.exact),
            right: self.right.is_held(now, self.exact),
            jump: mem::take(&mut self.jump_edge),
            slow_motion: self.slow.is_held(now, self.exact),
            restart: mem::take(&mut self.restart_edge),
        }
    }
}

impl InputSource for TermInput {
    fn poll(&mut self) -> io::Result<Option<TickInput>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.apply_key(key.code, key.modifiers, key.kind, Instant::now());
            }
        }
        if self.quit {
            return Ok(None);
        }
        Ok(Some(self.snapshot(Instant::now())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_exact_fit() {
        let view = Viewport::new(320, 240);
        assert_eq!(view.to_px(Vec2::ZERO), (160.0, 120.0));
        assert_eq!(view.to_px(Vec2::new(-160.0, 120.0)), (0.0, 0.0));
        assert_eq!(view.to_px(Vec2::new(160.0, -120.0)), (320.0, 240.0));
    }

    #[test]
    fn test_viewport_letterboxes_wide_terminal() {
        let view = Viewport::new(400, 240);
        assert_eq!(view.scale, 1.0);
        // 40px margins left and right, none above
        assert_eq!(view.to_px(Vec2::new(-160.0, 120.0)), (40.0, 0.0));
        assert_eq!(view.to_px(Vec2::new(160.0, 120.0)), (360.0, 0.0));
    }

    #[test]
    fn test_viewport_scales_down() {
        let view = Viewport::new(160, 120);
        assert_eq!(view.scale, 0.5);
        assert_eq!(view.to_px(Vec2::ZERO), (80.0, 60.0));
    }

    #[test]
    fn test_viewport_y_axis_flips() {
        let view = Viewport::new(320, 240);
        let (_, top) = view.to_px(Vec2::new(0.0, 100.0));
        let (_, bottom) = view.to_px(Vec2::new(0.0, -100.0));
        assert!(top < bottom);
    }

    #[test]
    fn test_px_rect_anchors_top_left() {
        let view = Viewport::new(320, 240);
        let (x, y, w, h) = view.to_px_rect(Rect::new(-160.0, 118.0, -80.0, 120.0));
        assert_eq!((x, y, w, h), (0, 0, 80, 2));
    }

    #[test]
    fn test_px_rect_keeps_thin_rects_visible() {
        let view = Viewport::new(80, 60);
        let (.., h) = view.to_px_rect(Rect::new(0.0, 0.0, 40.0, 2.0));
        assert_eq!(h, 1);
    }

    #[test]
    fn test_grid_ignores_out_of_bounds() {
        let mut grid = PixelGrid::new(4, 4);
        grid.set(-1, 0, [255, 0, 0]);
        grid.set(0, -1, [255, 0, 0]);
        grid.set(4, 0, [255, 0, 0]);
        grid.set(2, 2, [255, 0, 0]);
        assert_eq!(grid.get(2, 2), [255, 0, 0]);
        assert_eq!(grid.get(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_blit_flip_mirrors_columns() {
        let mut image = image::RgbaImage::new(2, 1);
        image.put_pixel(0, 0, image::Rgba([10, 0, 0, 255]));
        image.put_pixel(1, 0, image::Rgba([20, 0, 0, 255]));
        let sheet = SpriteSheet::from(image);
        let frame = Rect::new(0.0, 0.0, 2.0, 1.0);

        let mut grid = PixelGrid::new(2, 1);
        grid.blit(&sheet, frame, 0, 0, 2, 1, false);
        assert_eq!(grid.get(0, 0), [10, 0, 0]);
        assert_eq!(grid.get(1, 0), [20, 0, 0]);

        grid.blit(&sheet, frame, 0, 0, 2, 1, true);
        assert_eq!(grid.get(0, 0), [20, 0, 0]);
        assert_eq!(grid.get(1, 0), [10, 0, 0]);
    }

    #[test]
    fn test_blit_skips_transparent_pixels() {
        let mut image = image::RgbaImage::new(1, 1);
        image.put_pixel(0, 0, image::Rgba([255, 255, 255, 0]));
        let sheet = SpriteSheet::from(image);

        let mut grid = PixelGrid::new(1, 1);
        grid.set(0, 0, [7, 7, 7]);
        grid.blit(&sheet, Rect::new(0.0, 0.0, 1.0, 1.0), 0, 0, 1, 1, false);
        assert_eq!(grid.get(0, 0), [7, 7, 7]);
    }

    #[test]
    fn test_render_emits_half_blocks() {
        let mut grid = PixelGrid::new(1, 2);
        grid.set(0, 0, [255, 0, 0]);
        grid.set(0, 1, [0, 0, 255]);
        let mut out = Vec::new();
        grid.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\u{2580}'));
    }

    #[test]
    fn test_render_blank_row_uses_spaces() {
        let grid = PixelGrid::new(2, 2);
        let mut out = Vec::new();
        grid.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains('\u{2580}'));
        assert!(text.contains("  "));
    }

    #[test]
    fn test_exact_mode_tracks_press_and_release() {
        let mut input = TermInput::new(true);
        let now = Instant::now();
        input.apply_key(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Press, now);
        assert!(input.snapshot(now).left);
        input.apply_key(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Release, now);
        assert!(!input.snapshot(now).left);
    }

    #[test]
    fn test_inferred_mode_decays_after_hold_window() {
        let mut input = TermInput::new(false);
        let now = Instant::now();
        input.apply_key(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Press, now);
        assert!(input.snapshot(now).right);
        assert!(input.snapshot(now + Duration::from_millis(100)).right);
        assert!(!input.snapshot(now + KEY_HOLD_WINDOW).right);
    }

    #[test]
    fn test_inferred_mode_refreshes_on_repeat() {
        let mut input = TermInput::new(false);
        let now = Instant::now();
        input.apply_key(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Press, now);
        let later = now + Duration::from_millis(300);
        input.apply_key(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Press, later);
        assert!(input.snapshot(later + Duration::from_millis(300)).right);
    }

    #[test]
    fn test_jump_is_a_press_edge() {
        let mut input = TermInput::new(true);
        let t0 = Instant::now();
        input.apply_key(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Press, t0);
        assert!(input.snapshot(t0).jump);

        // Holding the key repeats, but the edge is spent
        for i in 1..10u64 {
            let t = t0 + Duration::from_millis(i * 50);
            input.apply_key(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Repeat, t);
            assert!(!input.snapshot(t).jump);
        }

        // A release and a fresh press open a new edge
        let t = t0 + Duration::from_millis(500);
        input.apply_key(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Release, t);
        input.apply_key(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Press, t);
        assert!(input.snapshot(t).jump);
    }

    #[test]
    fn test_legacy_press_stream_jumps_once() {
        // Without release events key repeat arrives as more presses; a
        // burst inside the hold window is one jump
        let mut input = TermInput::new(false);
        let t0 = Instant::now();
        let mut jumps = 0;
        for i in 0..12u64 {
            let t = t0 + Duration::from_millis(i * 100);
            input.apply_key(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Press, t);
            if input.snapshot(t).jump {
                jumps += 1;
            }
        }
        assert_eq!(jumps, 1);

        // Once the stream stops and the hold lapses, a press reads as new
        let t = t0 + Duration::from_millis(1200) + KEY_HOLD_WINDOW;
        input.apply_key(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Press, t);
        assert!(input.snapshot(t).jump);
    }

    #[test]
    fn test_restart_is_a_press_edge() {
        let mut input = TermInput::new(true);
        let t0 = Instant::now();
        input.apply_key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Press, t0);
        assert!(input.snapshot(t0).restart);

        // Held enter stays quiet until the next press
        let t1 = t0 + Duration::from_millis(50);
        input.apply_key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Repeat, t1);
        assert!(!input.snapshot(t1).restart);
    }

    #[test]
    fn test_quit_keys() {
        for (code, modifiers) in [
            (KeyCode::Char('q'), KeyModifiers::NONE),
            (KeyCode::Esc, KeyModifiers::NONE),
            (KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut input = TermInput::new(true);
            input.apply_key(code, modifiers, KeyEventKind::Press, Instant::now());
            assert!(input.quit);
        }
    }

    #[test]
    fn test_space_also_jumps() {
        let mut input = TermInput::new(true);
        let now = Instant::now();
        input.apply_key(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Press, now);
        assert!(input.snapshot(now).jump);
    }
}
