//! Dark studio theme: fixed palette, frames and the draw-role colors.

use egui::{Color32, Rounding, Stroke, Vec2};

use crate::render::Fill;

/// Central theme; every color the editor paints comes from here.
pub struct Theme;

impl Theme {
    // ── Typography ─────────────────────────────────────────────
    pub const FONT_XS: f32 = 10.0; // axis labels, dB marks
    pub const FONT_SM: f32 = 12.0; // body, labels, buttons
    pub const FONT_MD: f32 = 14.0; // section headers
    pub const FONT_LG: f32 = 18.0; // panel titles

    // ── Spacing (4px base) ─────────────────────────────────────
    pub const SPACE_XS: f32 = 4.0;
    pub const SPACE_SM: f32 = 8.0;
    pub const SPACE_MD: f32 = 16.0;

    // ── Border radius ──────────────────────────────────────────
    pub const RADIUS: f32 = 6.0;
    pub const RADIUS_LG: f32 = 12.0;

    pub const STROKE_SUBTLE: f32 = 0.5;

    // ── Backgrounds ────────────────────────────────────────────
    pub const fn bg() -> Color32 {
        Color32::from_rgb(10, 10, 10)
    }
    pub const fn bg1() -> Color32 {
        Color32::from_rgb(17, 24, 39)
    }
    pub const fn bg2() -> Color32 {
        Color32::from_rgb(31, 41, 55)
    }
    pub const fn bg3() -> Color32 {
        Color32::from_rgb(55, 65, 81)
    }

    // ── Text ───────────────────────────────────────────────────
    pub const fn t1() -> Color32 {
        Color32::from_rgb(243, 244, 246)
    }
    pub const fn t2() -> Color32 {
        Color32::from_rgb(156, 163, 175)
    }
    pub const fn t3() -> Color32 {
        Color32::from_rgb(107, 114, 128)
    }

    // ── Accents ────────────────────────────────────────────────
    pub const fn green() -> Color32 {
        Color32::from_rgb(74, 222, 128)
    }
    pub const fn cyan() -> Color32 {
        Color32::from_rgb(34, 211, 238)
    }
    pub const fn purple() -> Color32 {
        Color32::from_rgb(168, 85, 247)
    }
    pub const fn amber() -> Color32 {
        Color32::from_rgb(251, 191, 36)
    }
    pub const fn red() -> Color32 {
        Color32::from_rgb(239, 68, 68)
    }

    /// Return a color with replaced alpha.
    pub const fn with_alpha(c: Color32, a: u8) -> Color32 {
        Color32::from_rgba_premultiplied(
            (c.r() as u16 * a as u16 / 255) as u8,
            (c.g() as u16 * a as u16 / 255) as u8,
            (c.b() as u16 * a as u16 / 255) as u8,
            a,
        )
    }

    /// HSL (degrees, 0..1, 0..1) to an opaque color.
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Color32 {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let to_u8 = |v: f32| ((v + m).clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Color of a draw-command fill role.
    pub fn fill(fill: Fill) -> Color32 {
        match fill {
            Fill::Background => Self::bg(),
            Fill::Trough => Self::bg2(),
            Fill::WaveBar => Self::green(),
            Fill::Selection => Self::with_alpha(Self::cyan(), 64),
            Fill::Playhead => Self::red(),
            Fill::AxisTick => Self::bg3(),
            Fill::AxisText => Self::t3(),
            Fill::MeterLevel => Self::green(),
            Fill::PeakHold { hot: true } => Self::red(),
            Fill::PeakHold { hot: false } => Self::amber(),
            Fill::Clip => Self::red(),
            Fill::ScaleText => Self::t3(),
            Fill::ChannelLabel => Self::t2(),
            Fill::Grid => Self::with_alpha(Self::bg3(), 128),
            Fill::SpectrumBar { hue } => Self::hsl(hue, 0.7, 0.5),
            Fill::SpectrumPeak => Color32::WHITE,
        }
    }

    // ── Frames ─────────────────────────────────────────────────

    /// Standard side panel frame.
    pub fn panel_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Self::bg1())
            .inner_margin(egui::Margin::same(Self::SPACE_SM))
    }

    /// Card around a display leaf (meters, spectrum, effects).
    pub fn card_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Self::bg2())
            .stroke(Stroke::new(Self::STROKE_SUBTLE, Self::bg3()))
            .rounding(Rounding::same(Self::RADIUS))
            .inner_margin(egui::Margin::same(Self::SPACE_SM))
    }

    /// Floating help window.
    pub fn glass_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Color32::from_rgba_premultiplied(10, 12, 20, 235))
            .stroke(Stroke::new(Self::STROKE_SUBTLE, Self::bg3()))
            .rounding(Rounding::same(Self::RADIUS_LG))
            .inner_margin(egui::Margin::same(14.0))
            .shadow(egui::epaint::Shadow {
                offset: Vec2::new(0.0, 8.0),
                blur: 32.0,
                spread: 0.0,
                color: Color32::from_rgba_premultiplied(0, 0, 0, 100),
            })
    }

    /// Apply the theme to an egui context.
    pub fn apply(ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let visuals = &mut style.visuals;
        *visuals = egui::Visuals::dark();

        visuals.panel_fill = Self::bg1();
        visuals.window_fill = Self::bg2();
        visuals.extreme_bg_color = Self::bg();
        visuals.faint_bg_color = Self::bg2();

        visuals.widgets.inactive.bg_fill = Self::bg3();
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Self::t2());
        visuals.widgets.inactive.rounding = Rounding::same(Self::RADIUS);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Self::t1());
        visuals.widgets.hovered.rounding = Rounding::same(Self::RADIUS);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, Self::green());
        visuals.widgets.active.rounding = Rounding::same(Self::RADIUS);

        visuals.selection.bg_fill = Self::with_alpha(Self::green(), 60);
        visuals.selection.stroke = Stroke::new(1.0, Self::green());
        visuals.window_rounding = Rounding::same(Self::RADIUS_LG);

        style.interaction.tooltip_delay = 0.4;
        ctx.set_style(style);
    }
}
