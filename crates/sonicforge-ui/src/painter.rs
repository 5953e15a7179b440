//! Paint draw commands with egui.

use egui::{pos2, vec2, Align2, FontId, Painter, Rect, Stroke};

use crate::render::{Anchor, DrawCommand};
use crate::theme::Theme;

/// Paint `commands` with their origin at `origin`.
pub fn paint(painter: &Painter, origin: egui::Pos2, commands: &[DrawCommand]) {
    for cmd in commands {
        match cmd {
            DrawCommand::Rect { rect, fill } => {
                if rect.w <= 0.0 || rect.h <= 0.0 {
                    continue;
                }
                let r = Rect::from_min_size(origin + vec2(rect.x, rect.y), vec2(rect.w, rect.h));
                painter.rect_filled(r, 0.0, Theme::fill(*fill));
            }
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => {
                painter.line_segment(
                    [
                        origin + vec2(from.0, from.1),
                        origin + vec2(to.0, to.1),
                    ],
                    Stroke::new(*width, Theme::fill(*color)),
                );
            }
            DrawCommand::Text {
                pos,
                text,
                size,
                anchor,
                color,
            } => {
                let align = match anchor {
                    Anchor::Left => Align2::LEFT_BOTTOM,
                    Anchor::Center => Align2::CENTER_BOTTOM,
                    Anchor::Right => Align2::RIGHT_BOTTOM,
                };
                painter.text(
                    origin + vec2(pos.0, pos.1),
                    align,
                    text,
                    FontId::monospace(*size),
                    Theme::fill(*color),
                );
            }
        }
    }
}

/// Allocate a `width` × `height` area and paint into it.
pub fn paint_in(
    ui: &mut egui::Ui,
    size: egui::Vec2,
    sense: egui::Sense,
    commands: impl FnOnce(f32, f32) -> Vec<DrawCommand>,
) -> egui::Response {
    let (response, painter) = ui.allocate_painter(size, sense);
    let rect = response.rect;
    let cmds = commands(rect.width(), rect.height());
    paint(&painter, pos2(rect.min.x, rect.min.y), &cmds);
    response
}
