//! Interactive closed-path membrane viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation and
//! implements [`eframe::App`] to drive, render and export it.

use std::sync::Arc;

use eframe::App;
use glam::Vec2;
use membrane_core::{
    AccelerationPolicy, ClosedPathSimulation, Config, DrawStyle, SimError, Surface, Sweep,
    types::VertexId,
};
use rand::rng;

use crate::{cli::Settings, export};

/// Main application state for the interactive viewer.
///
/// The per-frame update is:
/// 1. Handle keyboard shortcuts (Space pauses, `S` exports) and any
///    finished screenshots.
/// 2. Keep the simulation viewport in sync with the canvas size.
/// 3. Draw the path, then step it if `running` and `step_interval` has
///    elapsed.
///
/// ### Fields
/// - `sim` - The closed-path simulation being shown.
/// - `settings` - Start-up settings; `reset` re-seeds from them.
/// - `style` - Stroke weights handed to [`ClosedPathSimulation::draw`].
/// - `rng` - Random source for jitter and export file names.
///
/// - `running` - Whether the simulation auto-advances.
/// - `zoom` / `pan` - World-to-screen mapping.
/// - `last_new_ids` - Vertices inserted by the last step (highlighted).
/// - `jitter_scale` - Speed given to every vertex by "Jitter".
///
/// - `step_interval` - Minimum time between automatic steps (seconds).
/// - `last_step_time` / `last_step_dt` - Step timing for the status bar.
pub struct Viewer {
    sim: ClosedPathSimulation,
    settings: Settings,
    style: DrawStyle,

    rng: rand::rngs::ThreadRng,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    last_new_ids: Vec<VertexId>,
    jitter_scale: f32,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

/// Draws onto an egui painter on behalf of the simulation.
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    viewer: &'a Viewer,
    rect: egui::Rect,
}

impl Surface for PainterSurface<'_> {
    fn point(&mut self, id: VertexId, pos: Vec2, weight: f32) {
        let color = if self.viewer.last_new_ids.contains(&id) {
            egui::Color32::RED
        } else {
            egui::Color32::WHITE
        };
        let p = self.viewer.world_to_screen(pos, self.rect);
        let r = (weight * 0.5 * self.viewer.zoom).max(1.0);
        self.painter.circle_filled(p, r, color);
    }

    fn line(&mut self, from: Vec2, to: Vec2, weight: f32) {
        let a = self.viewer.world_to_screen(from, self.rect);
        let b = self.viewer.world_to_screen(to, self.rect);
        let stroke = egui::Stroke::new(weight * self.viewer.zoom, egui::Color32::WHITE);
        self.painter.line_segment([a, b], stroke);
    }
}

impl Viewer {
    /// Creates a running viewer seeded from `settings`.
    ///
    /// ### Errors
    /// Anything [`ClosedPathSimulation::initialize`] rejects.
    pub fn new(settings: Settings) -> Result<Self, SimError> {
        let sim = ClosedPathSimulation::initialize(
            settings.primitive,
            settings.width,
            settings.height,
            settings.cfg.clone(),
        )?;

        Ok(Self {
            sim,
            settings,
            style: DrawStyle::default(),
            rng: rng(),
            running: true,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            last_new_ids: Vec::with_capacity(2),
            jitter_scale: 1.0,
            step_interval: 1.0 / 60.0,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    /// Re-seeds the path in the current viewport with the current
    /// constants, and stops auto-running.
    ///
    /// If the constants are rejected the old simulation is kept.
    fn reset(&mut self) {
        let viewport = self.sim.viewport();
        match ClosedPathSimulation::initialize(
            self.settings.primitive,
            viewport.width,
            viewport.height,
            self.sim.config().clone(),
        ) {
            Ok(sim) => {
                self.sim = sim;
                self.last_new_ids.clear();
                self.running = false;
            }
            Err(e) => ftlog::error!("Reset failed: {e}"),
        }
    }

    fn toggle_pause(&mut self) {
        self.running = !self.running;
        ftlog::info!("{}", if self.running { "Resumed" } else { "Paused" });
    }

    /// Advances the simulation by a single step and remembers which
    /// vertices it inserted.
    fn step_once(&mut self) {
        let report = self.sim.step();
        self.last_new_ids = report.inserted;
    }

    fn jitter(&mut self) {
        self.sim.jitter(self.jitter_scale, &mut self.rng);
    }

    /// Asks the backend for a screenshot; it arrives as an
    /// [`egui::Event::Screenshot`] on a later frame.
    fn request_export(&self, ctx: &egui::Context) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }

    fn save_screenshots(&mut self, ctx: &egui::Context) {
        let shots: Vec<Arc<egui::ColorImage>> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Screenshot { image, .. } => Some(Arc::clone(image)),
                    _ => None,
                })
                .collect()
        });

        for image in shots {
            match export::save_frame(&image, &self.settings.out_dir, &mut self.rng) {
                Ok(path) => ftlog::info!("Exported frame to {path:?}"),
                Err(e) => ftlog::error!("Export failed: {e}"),
            }
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (toggle, export) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::S),
            )
        });
        if toggle {
            self.toggle_pause();
        }
        if export {
            self.request_export(ctx);
        }
    }

    /// Converts a simulation position to screen-space.
    ///
    /// The simulation viewport centre maps to the centre of `rect`;
    /// offsets from it are scaled by `zoom` and shifted by `pan`. Both
    /// spaces have y pointing down.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let offset = (p - self.sim.viewport().center()) * self.zoom;
        egui::pos2(
            center.x + offset.x + self.pan.x,
            center.y + offset.y + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (p.y - center.y - self.pan.y) / self.zoom;
        self.sim.viewport().center() + Vec2::new(x, y)
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, export, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.toggle_pause();
                }

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                if ui.button("Jitter").clicked() {
                    self.jitter();
                }
                ui.add(
                    egui::DragValue::new(&mut self.jitter_scale)
                        .prefix("scale = ")
                        .range(0.0..=20.0)
                        .speed(0.1),
                );

                ui.separator();
                if ui.button("Export").clicked() {
                    self.request_export(ctx);
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (timing, vertex and step counts).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("vertices = {}", self.sim.len()));
                ui.label(format!("steps = {}", self.sim.steps()));
                if !self.running {
                    ui.label("paused");
                }
            });
        });
    }

    /// Builds the right-hand panel for the simulation constants.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Repulsion");
                let cfg = self.sim.config_mut();
                Self::labeled_drag_f32(ui, "gravity:", &mut cfg.gravity, 0.0..=20.0, 0.05);
                Self::labeled_drag_f32(
                    ui,
                    "repulsion_scale:",
                    &mut cfg.repulsion_scale,
                    0.0..=10.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "min_separation:",
                    &mut cfg.min_separation,
                    1e-4..=10.0,
                    0.001,
                );

                ui.separator();
                ui.label("Subdivision");
                Self::labeled_drag_f32(ui, "dist_break:", &mut cfg.dist_break, 1.0..=1000.0, 1.0);

                ui.separator();
                ui.label("Acceleration");
                ui.radio_value(&mut cfg.acceleration, AccelerationPolicy::Accumulate, "accumulate");
                ui.radio_value(
                    &mut cfg.acceleration,
                    AccelerationPolicy::ResetEachStep,
                    "reset each step",
                );

                ui.label("Sweep");
                ui.radio_value(&mut cfg.sweep, Sweep::Phased, "phased");
                ui.radio_value(&mut cfg.sweep, Sweep::Interleaved, "interleaved");

                ui.separator();
                ui.label("Initial shape (applied on reset)");
                Self::labeled_drag_usize(ui, "vertex_count:", &mut cfg.vertex_count, 3..=500, 1.0);
                Self::labeled_drag_f32(ui, "radius:", &mut cfg.radius, 1.0..=1000.0, 1.0);

                ui.separator();
                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.005),
                );

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    *self.sim.config_mut() = Config::default();
                }
            });
    }

    /// Builds the central panel where the path is drawn and stepped.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                // The simulation follows the canvas size without moving vertices.
                let size = rect.size();
                let viewport = self.sim.viewport();
                if size.x > 0.0
                    && size.y > 0.0
                    && (size.x != viewport.width || size.y != viewport.height)
                    && let Err(e) = self.sim.on_resize(size.x, size.y)
                {
                    ftlog::warn!("Ignoring canvas size: {e}");
                }

                // Pan with drag.
                if response.dragged() {
                    self.pan += response.drag_delta();
                }

                // Zoom around the mouse cursor.
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                    let world_before = self.screen_to_world(pointer_screen, rect);

                    let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                    self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                    let screen_after = self.world_to_screen(world_before, rect);
                    self.pan += pointer_screen - screen_after;
                }

                let mut surface = PainterSurface {
                    painter: &painter,
                    viewer: &*self,
                    rect,
                };
                self.sim.draw(&mut surface, &self.style);

                // Auto-run simulation if requested.
                if self.running {
                    let now = ctx.input(|i| i.time);
                    let elapsed = now - self.last_step_time;
                    if elapsed >= self.step_interval {
                        if self.last_step_time > 0.0 {
                            self.last_step_dt = elapsed;
                        }
                        self.step_once();
                        self.last_step_time = now;
                    }

                    ctx.request_repaint();
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that handles input and builds all panels for each
    /// frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.save_screenshots(ctx);

        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
