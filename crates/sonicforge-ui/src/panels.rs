//! egui widgets for the editor window.
//!
//! Every panel reads and mutates [`EditorState`]; drawing of the waveform,
//! meters and spectrum goes through the draw-command IR.

use egui::{self, vec2, Align2, Color32, RichText, Sense, Vec2};
use sonicforge_audio::{format_db, MeterState, SpectrumAnalyzer};
use sonicforge_core::format_duration;
use sonicforge_media::format_file_size;
use sonicforge_timeline::{EffectRack, EqBands, TrackList};
use uuid::Uuid;

use crate::commands::{CommandRegistry, Modifiers};
use crate::editor::{EditorState, HostRequest};
use crate::notifications::{ErrorLog, Severity, Toast};
use crate::painter::paint_in;
use crate::render::{render_meters, render_spectrum, RenderOptions};
use crate::theme::Theme;
use crate::zoom::{ViewMode, MAX_LEVEL, MIN_LEVEL, PRESETS, SLIDER_STEP};

/// Seconds a toast stays on screen.
const TOAST_SECONDS: f64 = 4.0;

/// Widget-local state that is not part of the editing session.
#[derive(Debug, Default)]
pub struct PanelState {
    pub save_prompt_open: bool,
    pub save_name: String,
    toasts: Vec<(Toast, f64)>,
}

// ── Keyboard ───────────────────────────────────────────────────

/// Name used by the command registry for an egui key.
pub fn key_name(key: egui::Key) -> Option<&'static str> {
    use egui::Key;
    Some(match key {
        Key::Space => "Space",
        Key::Escape => "Escape",
        Key::ArrowLeft => "Left",
        Key::ArrowRight => "Right",
        Key::Home => "Home",
        Key::End => "End",
        Key::Delete => "Delete",
        Key::Backspace => "Backspace",
        Key::Equals => "=",
        Key::Plus => "+",
        Key::Minus => "-",
        Key::Num0 => "0",
        Key::F1 => "F1",
        Key::A => "A",
        Key::C => "C",
        Key::E => "E",
        Key::I => "I",
        Key::O => "O",
        Key::S => "S",
        Key::V => "V",
        Key::X => "X",
        Key::Y => "Y",
        Key::Z => "Z",
        _ => return None,
    })
}

pub fn modifiers_from_egui(m: egui::Modifiers) -> Modifiers {
    Modifiers {
        ctrl: m.ctrl,
        shift: m.shift,
        alt: m.alt,
        command: m.mac_cmd,
    }
}

/// Resolve this frame's key presses and dispatch them.
pub fn handle_shortcuts(
    ctx: &egui::Context,
    registry: &CommandRegistry,
    editor: &mut EditorState,
) -> Vec<HostRequest> {
    let typing = ctx.wants_keyboard_input();
    let presses: Vec<(egui::Key, egui::Modifiers)> = ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|e| match e {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => Some((*key, *modifiers)),
                _ => None,
            })
            .collect()
    });

    presses
        .into_iter()
        .filter_map(|(key, mods)| {
            let name = key_name(key)?;
            let action = registry.resolve(name, modifiers_from_egui(mods), typing)?;
            editor.dispatch(action)
        })
        .collect()
}

// ── Transport and toolbar ──────────────────────────────────────

pub fn show_transport(ui: &mut egui::Ui, editor: &mut EditorState) -> Option<HostRequest> {
    let mut request = None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = vec2(Theme::SPACE_XS, 0.0);
        if ui.button("Import").clicked() {
            request = Some(HostRequest::PickImportFile);
        }
        let can_export = editor.loaded_file().is_some();
        if ui.add_enabled(can_export, egui::Button::new("Export")).clicked() {
            request = Some(HostRequest::PickExportDir);
        }
        if ui.button("Save").clicked() {
            request = Some(HostRequest::PromptProjectName);
        }
        ui.separator();

        let canvas = &mut editor.canvas;
        if ui.button("⏮").on_hover_text("Go to start").clicked() {
            canvas.seek_to_start();
        }
        let play_label = if canvas.is_playing() { "⏸" } else { "▶" };
        if ui.button(play_label).on_hover_text("Play/Pause").clicked() {
            canvas.toggle_play();
        }
        if ui.button("⏹").on_hover_text("Stop").clicked() {
            canvas.stop();
        }
        if ui.button("⏭").on_hover_text("Go to end").clicked() {
            canvas.seek_to_end();
        }

        ui.label(
            RichText::new(format!(
                "{} / {}",
                format_duration(canvas.position()),
                format_duration(canvas.duration())
            ))
            .monospace()
            .color(Theme::green()),
        );
        ui.separator();

        let mut volume = canvas.volume();
        ui.label(RichText::new("Vol").size(Theme::FONT_XS).color(Theme::t2()));
        if ui
            .add(egui::Slider::new(&mut volume, 0..=100).suffix("%"))
            .changed()
        {
            canvas.set_volume(volume);
        }

        if let Some(file) = editor.loaded_file() {
            ui.separator();
            ui.label(
                RichText::new(format!("{} ({})", file.name, format_file_size(file.size)))
                    .size(Theme::FONT_XS)
                    .color(Theme::t2()),
            );
        }
    });
    request
}

pub fn show_zoom_toolbar(ui: &mut egui::Ui, editor: &mut EditorState) {
    ui.horizontal(|ui| {
        let zoom = &mut editor.zoom;
        let mut changed = false;
        if ui.add_enabled(zoom.can_zoom_out(), egui::Button::new("−")).clicked() {
            zoom.zoom_out();
            changed = true;
        }
        let mut level = zoom.level();
        if ui
            .add(
                egui::Slider::new(&mut level, MIN_LEVEL..=MAX_LEVEL)
                    .step_by(SLIDER_STEP as f64)
                    .suffix("%"),
            )
            .changed()
        {
            zoom.set_level(level);
            changed = true;
        }
        if ui.add_enabled(zoom.can_zoom_in(), egui::Button::new("+")).clicked() {
            zoom.zoom_in();
            changed = true;
        }
        for preset in PRESETS {
            if ui
                .selectable_label(zoom.level() == preset, format!("{}%", preset))
                .clicked()
            {
                zoom.set_level(preset);
                changed = true;
            }
        }
        if ui.button("Fit").clicked() {
            zoom.fit();
            changed = true;
        }
        ui.label(RichText::new(zoom.description()).size(Theme::FONT_XS).color(Theme::t3()));

        ui.separator();
        for mode in ViewMode::ALL {
            if ui.selectable_label(zoom.view_mode == mode, mode.label()).clicked() {
                zoom.view_mode = mode;
            }
        }
        if changed {
            editor.sync_zoom();
        }
    });
}

// ── Waveform ───────────────────────────────────────────────────

/// Waveform canvas with pointer selection.
pub fn show_waveform(ui: &mut egui::Ui, editor: &mut EditorState, height: f32) {
    let size = Vec2::new(ui.available_width(), height);
    let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
    let rect = response.rect;
    let canvas = &mut editor.canvas;
    canvas.set_size(rect.width(), rect.height());

    let (pressed, released, mods, pointer) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.modifiers,
            i.pointer.interact_pos(),
        )
    });
    if pressed && response.hovered() {
        if let Some(pos) = pointer {
            canvas.pointer_down(pos.x - rect.min.x, modifiers_from_egui(mods));
        }
    }
    if response.dragged() {
        if let Some(pos) = pointer {
            canvas.pointer_move(pos.x - rect.min.x);
        }
    }
    if released && canvas.is_dragging() {
        canvas.pointer_up();
    }

    let cmds = canvas.render(rect.width(), rect.height(), &RenderOptions::default());
    crate::painter::paint(&painter, rect.min, &cmds);

    if let Some(sel) = editor.reported_selection() {
        ui.label(
            RichText::new(format!(
                "Selection {} – {} ({:.1}s)",
                format_duration(sel.start),
                format_duration(sel.end),
                sel.duration()
            ))
            .size(Theme::FONT_XS)
            .color(Theme::cyan()),
        );
    }
}

// ── Meters and spectrum ────────────────────────────────────────

pub fn show_meters(ui: &mut egui::Ui, meters: &mut MeterState) {
    Theme::card_frame().show(ui, |ui| {
        ui.label(RichText::new("LEVELS").size(Theme::FONT_XS).strong().color(Theme::t3()));
        paint_in(ui, vec2(100.0, 180.0), Sense::hover(), |w, h| {
            render_meters(meters, w, h)
        });
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!(
                    "L {}  R {}",
                    format_db(meters.levels.left),
                    format_db(meters.levels.right)
                ))
                .monospace()
                .size(Theme::FONT_XS),
            );
        });
        let mut hold = meters.peak_hold;
        if ui.checkbox(&mut hold, "Peak hold").changed() {
            meters.toggle_peak_hold();
        }
    });
}

pub fn show_spectrum(ui: &mut egui::Ui, analyzer: &mut SpectrumAnalyzer) {
    Theme::card_frame().show(ui, |ui| {
        ui.label(RichText::new("SPECTRUM").size(Theme::FONT_XS).strong().color(Theme::t3()));
        let width = ui.available_width();
        paint_in(ui, vec2(width, 140.0), Sense::hover(), |w, h| {
            render_spectrum(analyzer, w, h)
        });
        ui.horizontal(|ui| {
            let mut sensitivity = analyzer.sensitivity();
            if ui
                .add(egui::Slider::new(&mut sensitivity, 0.0..=100.0).text("Sensitivity"))
                .changed()
            {
                analyzer.set_sensitivity(sensitivity);
            }
            let mut smoothing = analyzer.smoothing();
            if ui
                .add(egui::Slider::new(&mut smoothing, 0.0..=100.0).text("Smoothing"))
                .changed()
            {
                analyzer.set_smoothing(smoothing);
            }
            ui.checkbox(&mut analyzer.show_peaks, "Peaks");
        });
    });
}

// ── Tracks ─────────────────────────────────────────────────────

fn toggle_button(ui: &mut egui::Ui, label: &str, on: bool, accent: Color32) -> bool {
    let text = RichText::new(label)
        .size(Theme::FONT_XS)
        .color(if on { Color32::BLACK } else { Theme::t2() });
    let fill = if on { accent } else { Theme::bg3() };
    ui.add(egui::Button::new(text).fill(fill).min_size(vec2(20.0, 18.0)))
        .clicked()
}

pub fn show_tracks(ui: &mut egui::Ui, tracks: &mut TrackList, errors: &ErrorLog) {
    let ids: Vec<Uuid> = tracks.iter().map(|t| t.id).collect();
    for id in ids {
        let Some(track) = tracks.get(id).cloned() else {
            continue;
        };
        let color = Color32::from_rgb(track.color.0, track.color.1, track.color.2);
        let audible = tracks.is_audible(id);
        ui.horizontal(|ui| {
            let (dot, painter) = ui.allocate_painter(vec2(8.0, 8.0), Sense::hover());
            painter.circle_filled(dot.rect.center(), 4.0, color);
            let name_color = if audible { Theme::t1() } else { Theme::t3() };
            ui.label(RichText::new(&track.name).color(name_color));

            let mute = toggle_button(ui, "M", track.muted, Theme::amber());
            let solo = toggle_button(ui, "S", track.solo, Theme::green());
            let lock = toggle_button(ui, "🔒", track.locked, Theme::red());
            let show = toggle_button(ui, "👁", track.visible, Theme::cyan());
            let mut volume = track.volume();
            let volume_changed = ui
                .add_enabled(
                    !track.locked,
                    egui::Slider::new(&mut volume, 0..=100).suffix("%"),
                )
                .changed();

            let result = if mute {
                tracks.toggle_mute(id).map(|_| ())
            } else if solo {
                tracks.toggle_solo(id).map(|_| ())
            } else if lock {
                tracks.toggle_lock(id).map(|_| ())
            } else if show {
                tracks.toggle_visible(id).map(|_| ())
            } else if volume_changed {
                tracks.set_volume(id, volume)
            } else {
                Ok(())
            };
            if let Err(e) = result {
                errors.report(&e.into());
            }
        });
    }
    ui.label(
        RichText::new(format!("{} of {} tracks audible", tracks.active_count(), tracks.len()))
            .size(Theme::FONT_XS)
            .color(Theme::t3()),
    );
}

// ── Effects ────────────────────────────────────────────────────

pub fn show_effects(ui: &mut egui::Ui, rack: &mut EffectRack, eq: &mut EqBands, errors: &ErrorLog) {
    Theme::card_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new("EFFECTS").size(Theme::FONT_XS).strong().color(Theme::t3()));
            ui.label(
                RichText::new(format!("{} active", rack.active_count()))
                    .size(Theme::FONT_XS)
                    .color(Theme::green()),
            );
            if ui.small_button("Reset all").clicked() {
                rack.reset_all();
            }
        });

        let slots = rack.slots().to_vec();
        for slot in slots {
            ui.horizontal(|ui| {
                let mut enabled = slot.enabled;
                if ui.checkbox(&mut enabled, slot.kind.display_name()).changed() {
                    if let Err(e) = rack.toggle(slot.kind) {
                        errors.report(&e.into());
                    }
                }
                let mut intensity = slot.intensity;
                let resp = ui
                    .add_enabled(slot.enabled, egui::Slider::new(&mut intensity, 0..=100))
                    .on_hover_text(slot.kind.description());
                if resp.changed() {
                    if let Err(e) = rack.set_intensity(slot.kind, intensity) {
                        errors.report(&e.into());
                    }
                }
            });
        }

        ui.add_space(Theme::SPACE_SM);
        ui.horizontal(|ui| {
            ui.label(RichText::new("EQ").size(Theme::FONT_XS).strong().color(Theme::t3()));
            if ui.add_enabled(!eq.is_flat(), egui::Button::new("Flatten").small()).clicked() {
                eq.flatten();
            }
        });
        let bands = eq.bands().to_vec();
        ui.horizontal(|ui| {
            for (i, band) in bands.iter().enumerate() {
                ui.vertical(|ui| {
                    let mut gain = band.gain_db;
                    let max = EqBands::MAX_GAIN_DB;
                    if ui
                        .add(egui::Slider::new(&mut gain, -max..=max).vertical().show_value(false))
                        .on_hover_text(format!("{:+} dB", band.gain_db))
                        .changed()
                    {
                        eq.set_gain(i, gain);
                    }
                    ui.label(RichText::new(&band.label).size(Theme::FONT_XS).color(Theme::t3()));
                });
            }
        });
    });
}

// ── Projects ───────────────────────────────────────────────────

pub fn show_projects(ui: &mut egui::Ui, editor: &mut EditorState) {
    ui.label(RichText::new("PROJECTS").size(Theme::FONT_XS).strong().color(Theme::t3()));
    if let Some(current) = editor.current_project() {
        ui.label(RichText::new(format!("Open: {}", current)).color(Theme::green()));
    }

    let rows: Vec<(Uuid, String, String)> = editor
        .library
        .list()
        .into_iter()
        .map(|p| {
            let detail = format!(
                "{} · {} tracks · {}",
                format_duration(p.duration),
                p.tracks,
                if p.effects.is_empty() {
                    "no effects".to_string()
                } else {
                    p.effects.join(", ")
                }
            );
            (p.id, p.name.clone(), detail)
        })
        .collect();

    for (id, name, detail) in rows {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(&name).color(Theme::t1()));
                ui.label(RichText::new(detail).size(Theme::FONT_XS).color(Theme::t3()));
            });
            if ui.small_button("Open").clicked() {
                if let Err(e) = editor.load_project(id) {
                    editor.errors.report(&e);
                } else {
                    editor.errors.info(format!("Opened {}", name));
                }
            }
            if ui.small_button("Delete").clicked() {
                match editor.delete_project(id) {
                    Ok(_) => editor.errors.info(format!("Deleted {}", name)),
                    Err(e) => editor.errors.report(&e),
                }
            }
        });
    }
}

/// Project-name prompt shown after a save request.
pub fn show_save_prompt(ctx: &egui::Context, state: &mut PanelState, editor: &mut EditorState) {
    if !state.save_prompt_open {
        return;
    }
    let mut open = true;
    let mut submitted = false;
    egui::Window::new("Save Project")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .open(&mut open)
        .show(ctx, |ui| {
            let resp = ui.text_edit_singleline(&mut state.save_name);
            let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Save").clicked() || enter {
                submitted = true;
            }
        });

    if submitted {
        match editor.save_project(&state.save_name) {
            Ok(project) => {
                editor.errors.info(format!("Saved {}", project.name));
                state.save_name.clear();
                open = false;
            }
            Err(e) => editor.errors.report(&e),
        }
    }
    state.save_prompt_open = open;
}

// ── Help and toasts ────────────────────────────────────────────

pub fn show_help(ctx: &egui::Context, registry: &CommandRegistry, open: &mut bool) {
    egui::Window::new("Keyboard Shortcuts")
        .open(open)
        .frame(Theme::glass_frame())
        .collapsible(false)
        .show(ctx, |ui| {
            for (category, commands) in registry.help_catalog() {
                ui.label(
                    RichText::new(category.label())
                        .size(Theme::FONT_MD)
                        .strong()
                        .color(Theme::t1()),
                );
                egui::Grid::new(category.label()).num_columns(2).show(ui, |ui| {
                    for cmd in commands {
                        ui.label(RichText::new(cmd.description).color(Theme::t2()));
                        let keys: Vec<String> = cmd.shortcuts.iter().map(|s| s.display()).collect();
                        ui.label(RichText::new(keys.join(" / ")).monospace().color(Theme::green()));
                        ui.end_row();
                    }
                });
                ui.add_space(Theme::SPACE_SM);
            }
        });
}

pub fn show_toasts(ctx: &egui::Context, state: &mut PanelState, errors: &ErrorLog) {
    let now = ctx.input(|i| i.time);
    for toast in errors.take_toasts() {
        state.toasts.push((toast, now + TOAST_SECONDS));
    }
    state.toasts.retain(|(_, expires)| *expires > now);
    if state.toasts.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(Align2::RIGHT_BOTTOM, vec2(-Theme::SPACE_MD, -Theme::SPACE_MD))
        .show(ctx, |ui| {
            for (toast, _) in &state.toasts {
                let accent = match toast.severity {
                    Severity::Info => Theme::green(),
                    Severity::Warning => Theme::amber(),
                    Severity::Error | Severity::Critical => Theme::red(),
                };
                Theme::card_frame().stroke(egui::Stroke::new(1.0, accent)).show(ui, |ui| {
                    ui.label(RichText::new(&toast.title).color(Theme::t1()));
                    if let Some(desc) = &toast.description {
                        ui.label(RichText::new(desc).size(Theme::FONT_XS).color(Theme::t2()));
                    }
                });
            }
        });
    ctx.request_repaint_after(std::time::Duration::from_millis(250));
}
