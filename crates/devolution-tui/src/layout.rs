//! Terminal layout of the landing page
//!
//! The core measures everything in layout pixels. One terminal row is
//! [`ROW_PX`] pixels and one column [`COL_PX`], so the configured offsets
//! (an 80px rise, a 50px slide) keep their proportions on screen.
//!
//! Layout runs every frame: an opening panel grows the page and pushes the
//! cards below it down, and the triggers must see those new positions.

use devolution_core::scene::{ElementId, Scene};
use devolution_core::section::RevealSection;
use devolution_core::LandingPage;
use unicode_width::UnicodeWidthStr;

pub const ROW_PX: f64 = 16.0;
pub const COL_PX: f64 = 8.0;

const MAX_WIDTH: u16 = 96;
const MIN_WIDTH: u16 = 24;
const HERO_ROWS: u16 = 3;

/// A vertical run of rows in document space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowSpan {
    pub top: u16,
    pub height: u16,
}

impl RowSpan {
    pub fn new(top: u16, height: u16) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> u16 {
        self.top.saturating_add(self.height)
    }

    pub fn contains(&self, row: u16) -> bool {
        row >= self.top && row < self.bottom()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CardLayout {
    pub card: RowSpan,
    /// Question line
    pub header: RowSpan,
    /// Answer panel at its current animated height
    pub content: RowSpan,
    pub answer_lines: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FaqLayout {
    pub section: RowSpan,
    pub heading: RowSpan,
    pub container: RowSpan,
    pub cards: Vec<CardLayout>,
}

#[derive(Debug, Clone, Default)]
pub struct RevealLayout {
    pub container: RowSpan,
    pub heading: RowSpan,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub width: u16,
    /// Left edge and width of the centered column
    pub left: u16,
    pub column: u16,
    pub hero: RowSpan,
    pub faq: FaqLayout,
    pub join: RevealLayout,
    pub partner: RevealLayout,
    pub total_rows: u16,
}

impl PageLayout {
    /// Index of the card covering document row `row`
    pub fn card_at(&self, row: u16) -> Option<usize> {
        self.faq.cards.iter().position(|c| c.card.contains(row))
    }

    pub fn max_scroll(&self, viewport_rows: u16) -> u16 {
        self.total_rows.saturating_sub(viewport_rows)
    }
}

pub fn px(rows: u16) -> f64 {
    f64::from(rows) * ROW_PX
}

/// Rows covered by a pixel height, rounded to the nearest row
pub fn rows(px: f64) -> u16 {
    if !px.is_finite() || px <= 0.0 {
        return 0;
    }
    (px / ROW_PX).round().min(f64::from(u16::MAX)) as u16
}

/// Whole columns covered by a pixel offset
pub fn cols(px: f64) -> i32 {
    if !px.is_finite() {
        return 0;
    }
    (px / COL_PX).round() as i32
}

/// Lay the page out for a terminal `width` columns wide and publish every
/// element box to the scene
pub fn lay_out(page: &mut LandingPage, width: u16) -> PageLayout {
    let column = width.saturating_sub(4).clamp(MIN_WIDTH, MAX_WIDTH);
    let left = width.saturating_sub(column) / 2;
    // container border + padding, card border + padding
    let text_width = usize::from(column.saturating_sub(8)).max(8);

    let scene = &mut page.stage.scene;
    let mut row: u16 = 0;

    let hero = RowSpan::new(row, HERO_ROWS);
    row = hero.bottom().saturating_add(1);

    // FAQ
    let section_top = row;
    let heading = RowSpan::new(row, 3);
    place(scene, page.faq.heading, heading);
    row = heading.bottom().saturating_add(1);

    let container_top = row;
    row = row.saturating_add(2);
    let mut cards = Vec::with_capacity(page.faq.accordion().len());
    for item in page.faq.accordion().items() {
        let el = item.elements;
        let answer_lines = wrap(&item.entry.answer, text_width);
        scene.set_natural_height(el.content, px(line_count(&answer_lines)));

        let content_rows = scene
            .get(el.content)
            .map(|e| rows(e.resolved_height()))
            .unwrap_or(0);
        let card = RowSpan::new(row, content_rows.saturating_add(3));
        let header = RowSpan::new(row.saturating_add(1), 1);
        let content = RowSpan::new(row.saturating_add(2), content_rows);

        place(scene, el.card, card);
        place(scene, el.label, header);
        place(scene, el.icon, header);
        scene.set_layout(el.content, px(content.top), px(content_rows));

        cards.push(CardLayout {
            card,
            header,
            content,
            answer_lines,
        });
        row = card.bottom().saturating_add(1);
    }
    let container = RowSpan::new(container_top, row.saturating_add(1) - container_top);
    place(scene, page.faq.container, container);
    for control in &page.faq.controls {
        place(scene, *control, RowSpan::new(container_top, 1));
    }
    row = container.bottom().saturating_add(2);
    let section = RowSpan::new(section_top, row - section_top);
    place(scene, page.faq.section, section);
    let faq = FaqLayout {
        section,
        heading,
        container,
        cards,
    };

    // Join the conversation, then Partner with us
    let mut reveal = |section: &RevealSection, row: &mut u16| {
        let mut lines = wrap(&section.copy.tagline, text_width);
        lines.push(String::new());
        lines.extend(wrap(&section.copy.body, text_width));

        let container = RowSpan::new(*row, line_count(&lines).saturating_add(4));
        let heading = RowSpan::new(row.saturating_add(1), 1);
        place(scene, section.section, container);
        place(scene, section.container, container);
        place(scene, section.heading, heading);
        for decoration in &section.decorations {
            place(scene, *decoration, RowSpan::new(container.top, 1));
        }
        *row = container.bottom().saturating_add(2);
        RevealLayout {
            container,
            heading,
            lines,
        }
    };
    let join = reveal(&page.join, &mut row);
    let partner = reveal(&page.partner, &mut row);

    PageLayout {
        width,
        left,
        column,
        hero,
        faq,
        join,
        partner,
        total_rows: row,
    }
}

/// Rows taken by wrapped text, capped at the addressable height
fn line_count(lines: &[String]) -> u16 {
    u16::try_from(lines.len()).unwrap_or(u16::MAX)
}

fn place(scene: &mut Scene, id: ElementId, span: RowSpan) {
    scene.set_layout(id, px(span.top), px(span.height));
}

/// Greedy word wrap by display width; overlong words are split
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.width()
        } else {
            line.width() + 1 + word.width()
        };
        if needed <= width {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if word.width() <= width {
            line.push_str(word);
            continue;
        }
        for ch in word.chars() {
            let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            if line.width() + ch_width > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            line.push(ch);
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}
