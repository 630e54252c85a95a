//! Document-space painting
//!
//! Widgets draw in document coordinates (page rows, page columns); the
//! painter shifts by the scroll position and clips to the page area, so an
//! element pushed off screen by its entrance offset is simply cut.

use devolution_core::motion::Rgb;
use devolution_core::scene::VisualState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};
use unicode_width::UnicodeWidthChar;

use crate::layout::{cols, ROW_PX};
use crate::theme::{faded, Theme};

/// Below this opacity nothing is drawn
const INVISIBLE: f64 = 0.05;
/// Tilt or depth rotation (degrees) still rendered as slanted text
const TILT_VISIBLE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl DocRect {
    pub fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + i32::from(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y + i32::from(self.height)
    }

    /// Area inside a one-cell border plus `pad` columns of padding
    pub fn inner(&self, pad: u16) -> DocRect {
        DocRect::new(
            self.x + 1 + i32::from(pad),
            self.y + 1,
            self.width.saturating_sub(2 + pad * 2),
            self.height.saturating_sub(2),
        )
    }

    /// Resize horizontally around the center
    pub fn scaled(&self, scale: f64) -> DocRect {
        if !scale.is_finite() || scale <= 0.0 {
            return DocRect::new(self.x, self.y, 0, self.height);
        }
        let width = (f64::from(self.width) * scale).round().clamp(0.0, f64::from(u16::MAX)) as u16;
        let dx = (i32::from(self.width) - i32::from(width)) / 2;
        DocRect::new(self.x + dx, self.y, width, self.height)
    }
}

/// How an element's visual state shows up in cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effect {
    pub dx: i32,
    pub dy: i32,
    pub opacity: f64,
    pub tilted: bool,
}

impl Effect {
    pub const NONE: Effect = Effect {
        dx: 0,
        dy: 0,
        opacity: 1.0,
        tilted: false,
    };

    pub fn of(visual: &VisualState) -> Self {
        Self {
            dx: cols(visual.translate_x),
            dy: (visual.translate_y / ROW_PX).round() as i32,
            opacity: visual.opacity.clamp(0.0, 1.0),
            tilted: visual.rotate_x.abs() > TILT_VISIBLE || visual.rotate_y.abs() > TILT_VISIBLE,
        }
    }

    /// Combine with the effect of the enclosing element
    pub fn within(self, parent: Effect) -> Self {
        Self {
            dx: self.dx + parent.dx,
            dy: self.dy + parent.dy,
            opacity: self.opacity * parent.opacity,
            tilted: self.tilted || parent.tilted,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > INVISIBLE
    }

    pub fn shift(&self, rect: DocRect) -> DocRect {
        DocRect::new(rect.x + self.dx, rect.y + self.dy, rect.width, rect.height)
    }

    pub fn style(&self, theme: &Theme, fg: Rgb, bg: Rgb) -> Style {
        let mut style = Style::default()
            .fg(faded(fg, theme.page_bg, self.opacity))
            .bg(faded(bg, theme.page_bg, self.opacity));
        if self.tilted {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }
}

/// Columns of `width` uncovered by a left-to-right clip wipe
pub fn clip_width(width: u16, reveal: f64) -> u16 {
    let reveal = if reveal.is_finite() { reveal.clamp(0.0, 1.0) } else { 1.0 };
    (f64::from(width) * reveal).ceil() as u16
}

pub struct Painter<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    left: i32,
    scroll: i32,
}

impl<'a> Painter<'a> {
    /// `left` is the page column drawn at the area's left edge
    pub fn new(buf: &'a mut Buffer, area: Rect, left: u16, scroll: u16) -> Self {
        Self {
            buf,
            area,
            left: i32::from(left),
            scroll: i32::from(scroll),
        }
    }

    fn cell_at(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let sx = i32::from(self.area.x) + x - self.left;
        let sy = i32::from(self.area.y) + y - self.scroll;
        let inside = sx >= i32::from(self.area.x)
            && sx < i32::from(self.area.right())
            && sy >= i32::from(self.area.y)
            && sy < i32::from(self.area.bottom());
        inside.then(|| (sx as u16, sy as u16))
    }

    pub fn put(&mut self, x: i32, y: i32, symbol: &str, style: Style) {
        if let Some(pos) = self.cell_at(x, y) {
            if let Some(cell) = self.buf.cell_mut(pos) {
                cell.set_symbol(symbol).set_style(style);
            }
        }
    }

    pub fn fill(&mut self, rect: DocRect, style: Style) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.put(x, y, " ", style);
            }
        }
    }

    /// Write `text` starting at (`x`, `y`), cut after `max_width` columns
    pub fn text(&mut self, x: i32, y: i32, text: &str, max_width: u16, style: Style) {
        let limit = x + i32::from(max_width);
        let mut col = x;
        let mut symbol = [0u8; 4];
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as i32;
            if w == 0 {
                continue;
            }
            if col + w > limit {
                break;
            }
            self.put(col, y, ch.encode_utf8(&mut symbol), style);
            col += w;
        }
    }

    pub fn border(&mut self, rect: DocRect, style: Style) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
        for x in rect.x + 1..right {
            self.put(x, rect.y, "─", style);
            self.put(x, bottom, "─", style);
        }
        for y in rect.y + 1..bottom {
            self.put(rect.x, y, "│", style);
            self.put(right, y, "│", style);
        }
        self.put(rect.x, rect.y, "┌", style);
        self.put(right, rect.y, "┐", style);
        self.put(rect.x, bottom, "└", style);
        self.put(right, bottom, "┘", style);
    }

    /// Filled box with a border
    pub fn panel(&mut self, rect: DocRect, fill: Style, border: Style) {
        self.fill(rect, fill);
        self.border(rect, border);
    }
}
