use devolution_core::content::question_badge;
use devolution_core::motion::Rgb;
use devolution_core::scene::{ElementId, Scene, VisualState};
use devolution_core::section::RevealSection;
use ratatui::{buffer::Buffer, layout::Rect, style::Modifier, style::Style};

use super::paint::{clip_width, DocRect, Effect, Painter};
use crate::app::App;
use crate::layout::{RevealLayout, RowSpan};
use crate::theme::{color, Theme};

/// Lift (in px) at which a floating control is drawn raised
const LIFT_PX: f64 = 3.0;
const FAQ_TITLE: &str = "FREQUENTLY ASKED QUESTIONS";

pub struct PageWidget;

impl PageWidget {
    pub fn render(buf: &mut Buffer, area: Rect, app: &App) {
        let theme = &app.theme;
        let page_style = Style::default().bg(color(theme.page_bg)).fg(color(theme.ink));
        buf.set_style(area, page_style);

        let mut painter = Painter::new(buf, area, 0, app.scroll.current_scroll());
        let column = DocRect::new(
            i32::from(app.layout.left),
            0,
            app.layout.column,
            app.layout.total_rows,
        );

        render_hero(&mut painter, column, app);
        render_faq(&mut painter, column, app);
        render_reveal_card(
            &mut painter,
            column,
            &app.page.stage.scene,
            &app.page.join,
            &app.layout.join,
            theme.join_card,
            theme,
        );
        render_reveal_card(
            &mut painter,
            column,
            &app.page.stage.scene,
            &app.page.partner,
            &app.layout.partner,
            theme.partner_card,
            theme,
        );
    }
}

fn visual(scene: &Scene, id: ElementId) -> VisualState {
    scene.visual(id).copied().unwrap_or_default()
}

fn span_rect(column: DocRect, span: RowSpan) -> DocRect {
    DocRect::new(column.x, i32::from(span.top), column.width, span.height)
}

fn centered_x(column: DocRect, width: u16) -> i32 {
    column.x + (i32::from(column.width) - i32::from(width)).max(0) / 2
}

fn render_hero(painter: &mut Painter, column: DocRect, app: &App) {
    let theme = &app.theme;
    let event = &app.config.event;
    let top = i32::from(app.layout.hero.top);
    let lines = [
        (
            event.name.as_str(),
            Style::default()
                .fg(color(theme.accent))
                .add_modifier(Modifier::BOLD),
        ),
        (event.hashtag.as_str(), Style::default().fg(color(theme.ink))),
        (
            "[o] get your tickets",
            Style::default().fg(color(theme.muted)),
        ),
    ];
    for (row, (text, style)) in lines.into_iter().enumerate() {
        let width = text.chars().count() as u16;
        painter.text(
            centered_x(column, width),
            top + row as i32,
            text,
            column.width,
            style.bg(color(theme.page_bg)),
        );
    }
}

/// Icon glyph for a chevron rotated by `degrees` (0 points down)
pub fn chevron(degrees: f64) -> &'static str {
    let d = if degrees.is_finite() { degrees.rem_euclid(360.0) } else { 0.0 };
    match d {
        d if !(45.0..315.0).contains(&d) => "▼",
        d if d < 135.0 => "◀",
        d if d < 225.0 => "▲",
        _ => "▶",
    }
}

/// Window-control dot at its current pop-in scale and float lift
pub fn control_glyph(visual: &VisualState) -> &'static str {
    if visual.scale < 0.35 {
        "·"
    } else if visual.scale < 0.8 {
        "•"
    } else if visual.translate_y < -LIFT_PX {
        "◉"
    } else {
        "●"
    }
}

fn render_controls(
    painter: &mut Painter,
    scene: &Scene,
    controls: &[ElementId],
    origin: (i32, i32),
    parent: Effect,
    bg: Rgb,
    theme: &Theme,
) {
    for (k, (id, dot)) in controls.iter().zip(theme.controls()).enumerate() {
        let v = visual(scene, *id);
        let effect = Effect::of(&v).within(parent);
        if !effect.is_visible() {
            continue;
        }
        painter.put(
            origin.0 + 2 + 2 * k as i32,
            origin.1,
            control_glyph(&v),
            effect.style(theme, dot, bg),
        );
    }
}

fn render_faq(painter: &mut Painter, column: DocRect, app: &App) {
    let theme = &app.theme;
    let scene = &app.page.stage.scene;
    let faq = &app.page.faq;
    let layout = &app.layout.faq;

    // heading: pink label wiped in from the left
    let heading_visual = visual(scene, faq.heading);
    let heading_effect = Effect::of(&heading_visual);
    if heading_effect.is_visible() {
        let full = FAQ_TITLE.chars().count() as u16 + 4;
        let width = clip_width(full, heading_visual.clip_reveal);
        let rect = heading_effect.shift(DocRect::new(
            centered_x(column, full),
            i32::from(layout.heading.top),
            width,
            layout.heading.height,
        ));
        let style = heading_effect
            .style(theme, theme.ink, theme.faq_heading)
            .add_modifier(Modifier::BOLD);
        painter.panel(rect, style, style);
        painter.text(rect.x + 2, rect.y + 1, FAQ_TITLE, width.saturating_sub(3), style);
    }

    let container_effect = Effect::of(&visual(scene, faq.container));
    if !container_effect.is_visible() {
        return;
    }
    let container = container_effect.shift(span_rect(column, layout.container));
    let container_style = container_effect.style(theme, theme.ink, theme.faq_card);
    painter.panel(container, container_style, container_style);
    render_controls(
        painter,
        scene,
        &faq.controls,
        (container.x, container.y),
        container_effect,
        theme.faq_card,
        theme,
    );

    let cards_x = container.inner(1);
    for (index, (item, card_layout)) in faq
        .accordion()
        .items()
        .iter()
        .zip(&layout.cards)
        .enumerate()
    {
        let el = item.elements;
        let card_visual = visual(scene, el.card);
        let effect = Effect::of(&card_visual).within(container_effect);
        if !effect.is_visible() {
            continue;
        }
        let base = DocRect::new(
            cards_x.x,
            i32::from(card_layout.card.top),
            cards_x.width,
            card_layout.card.height,
        );
        let rect = effect.shift(base.scaled(card_visual.scale));
        let selected = index == app.selected;

        let fill = effect.style(theme, theme.ink, Rgb::WHITE);
        let mut border = fill;
        if selected {
            border = effect
                .style(theme, theme.selection, Rgb::WHITE)
                .add_modifier(Modifier::BOLD);
        }
        painter.panel(rect, fill, border);

        // header: badge, question in the label color, chevron at the right
        let header_y = rect.y + 1;
        let inner = rect.inner(1);
        let badge = format!("{} ", question_badge(index));
        let label_color = visual(scene, el.label).color;
        painter.text(inner.x, header_y, &badge, inner.width, fill.add_modifier(Modifier::BOLD));
        let question_x = inner.x + badge.chars().count() as i32;
        painter.text(
            question_x,
            header_y,
            &item.entry.question,
            inner.width.saturating_sub(badge.chars().count() as u16 + 2),
            effect
                .style(theme, label_color, Rgb::WHITE)
                .add_modifier(Modifier::BOLD),
        );
        let icon = visual(scene, el.icon);
        painter.put(inner.right() - 1, header_y, chevron(icon.rotation), fill);

        // answer panel, clipped to its animated height
        let content_effect = Effect::of(&visual(scene, el.content)).within(effect);
        if content_effect.is_visible() {
            let style = content_effect.style(theme, theme.ink, Rgb::WHITE);
            let rows = usize::from(card_layout.content.height);
            for (k, line) in card_layout.answer_lines.iter().take(rows).enumerate() {
                painter.text(inner.x, header_y + 1 + k as i32, line, inner.width, style);
            }
        }
    }
}

fn render_reveal_card(
    painter: &mut Painter,
    column: DocRect,
    scene: &Scene,
    section: &RevealSection,
    layout: &RevealLayout,
    fill: Rgb,
    theme: &Theme,
) {
    let effect = Effect::of(&visual(scene, section.container));
    if !effect.is_visible() {
        return;
    }
    let rect = effect.shift(span_rect(column, layout.container));
    let style = effect.style(theme, theme.ink, fill);
    painter.panel(rect, style, style);
    render_controls(
        painter,
        scene,
        &section.decorations,
        (rect.x, rect.y),
        effect,
        fill,
        theme,
    );

    let inner = rect.inner(2);
    let heading_visual = visual(scene, section.heading);
    let heading_effect = Effect::of(&heading_visual).within(effect);
    if heading_effect.is_visible() {
        let title = section.copy.title.to_uppercase();
        let full = title.chars().count() as u16;
        painter.text(
            centered_x(inner, full) + heading_effect.dx,
            rect.y + 1 + heading_effect.dy,
            &title,
            clip_width(full, heading_visual.clip_reveal),
            heading_effect
                .style(theme, theme.ink, fill)
                .add_modifier(Modifier::BOLD),
        );
    }
    for (k, line) in layout.lines.iter().enumerate() {
        let width = line.chars().count() as u16;
        painter.text(
            centered_x(inner, width),
            rect.y + 3 + k as i32,
            line,
            inner.width,
            style,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chevron_follows_rotation() {
        assert_eq!(chevron(0.0), "▼");
        assert_eq!(chevron(90.0), "◀");
        assert_eq!(chevron(180.0), "▲");
        assert_eq!(chevron(196.0), "▲");
        assert_eq!(chevron(-10.0), "▼");
        assert_eq!(chevron(f64::NAN), "▼");
    }

    #[test]
    fn test_control_glyph_tracks_pop_in() {
        let mut v = VisualState {
            scale: 0.0,
            ..Default::default()
        };
        assert_eq!(control_glyph(&v), "·");
        v.scale = 1.0;
        assert_eq!(control_glyph(&v), "●");
        v.translate_y = -6.0;
        assert_eq!(control_glyph(&v), "◉");
    }
}
