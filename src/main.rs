//! Plexus Studio RS - Main Application
//! eframe host driving the plexus effect once per frame

use eframe::egui;
use plexus_studio::{FrameSurface, PainterSurface, ParamKind, PlexusConfig, PlexusEffect};
use std::path::Path;
use std::time::Instant;

/// Main application state
struct PlexusApp {
    effect: PlexusEffect,
    config: PlexusConfig,
    last_update: Instant,
    last_dt: f32,
    paused: bool,
    show_settings: bool,
    selected_preset: usize,
    canvas_size: (u32, u32),
}

impl PlexusApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Dark theme to match the effect
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_unmultiplied(10, 14, 24, 245);
        visuals.panel_fill = egui::Color32::from_rgba_unmultiplied(14, 18, 30, 240);
        cc.egui_ctx.set_visuals(visuals);

        let config = PlexusConfig::default();
        Self {
            effect: PlexusEffect::new(config.clone(), 1280.0, 720.0),
            config,
            last_update: Instant::now(),
            last_dt: 0.016,
            paused: false,
            show_settings: true,
            selected_preset: 0,
            canvas_size: (1280, 720),
        }
    }

    fn save_snapshot(&self, path: &Path) -> anyhow::Result<()> {
        let (width, height) = self.canvas_size;
        let mut surface = FrameSurface::new(width.max(1), height.max(1));
        self.effect.render(&mut surface);
        surface.to_image().save(path)?;
        log::info!("Saved snapshot to {}", path.display());
        Ok(())
    }

    fn save_preset(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.config)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn load_preset(&mut self, path: &Path) -> anyhow::Result<()> {
        let json = std::fs::read_to_string(path)?;
        let config: PlexusConfig = serde_json::from_str(&json)?;
        self.apply_config(config);
        Ok(())
    }

    fn apply_config(&mut self, config: PlexusConfig) {
        self.effect.set_config(config);
        self.config = self.effect.config().clone();
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Plexus Studio RS");
                ui.separator();

                let pause_label = if self.paused { "▶ Resume" } else { "⏸ Pause" };
                if ui.button(pause_label).clicked() {
                    self.paused = !self.paused;
                }

                if ui.button("📷 Snapshot").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("PNG image", &["png"])
                        .save_file()
                    {
                        if let Err(e) = self.save_snapshot(&path) {
                            log::error!("Snapshot failed: {e:#}");
                        }
                    }
                }

                ui.separator();
                ui.toggle_value(&mut self.show_settings, "⚙ Settings");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let fps = 1.0 / self.last_dt.max(0.001);
                    ui.label(format!("FPS: {:.0}", fps));
                    ui.label(format!("particles: {}", self.effect.particle_count()));
                });
            });
        });
    }

    fn render_settings_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("settings_panel")
            .min_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Settings");
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label("Preset:");
                    let names = PlexusConfig::preset_names();
                    egui::ComboBox::from_id_salt("preset_combo")
                        .selected_text(names.get(self.selected_preset).copied().unwrap_or("Default"))
                        .show_ui(ui, |ui| {
                            for (i, name) in names.iter().enumerate() {
                                if ui.selectable_value(&mut self.selected_preset, i, *name).changed()
                                {
                                    self.apply_config(PlexusConfig::preset(name));
                                }
                            }
                        });
                });

                ui.separator();

                let mut changed = false;
                for spec in PlexusEffect::config_schema() {
                    let mut value = self.config.get(spec.name);
                    let mut slider =
                        egui::Slider::new(&mut value, spec.min..=spec.max).text(spec.name);
                    if spec.kind == ParamKind::Int {
                        slider = slider.integer();
                    }
                    if ui.add(slider).on_hover_text(spec.description).changed() {
                        self.config.set(spec.name, value);
                        changed = true;
                    }
                }
                if changed {
                    self.apply_config(self.config.clone());
                }

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("💾 Save Preset").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .save_file()
                        {
                            if let Err(e) = self.save_preset(&path) {
                                log::error!("Could not save preset: {e:#}");
                            }
                        }
                    }
                    if ui.button("📂 Load Preset").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .pick_file()
                        {
                            if let Err(e) = self.load_preset(&path) {
                                log::error!("Could not load preset: {e:#}");
                            }
                        }
                    }
                });
            });
    }

    fn render_canvas(&mut self, ctx: &egui::Context, dt: f32) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());

            self.canvas_size = (rect.width().max(1.0) as u32, rect.height().max(1.0) as u32);
            self.effect.resize(rect.width(), rect.height());

            if !self.paused {
                self.effect.update(dt);
            }

            let painter = ui.painter_at(rect);
            let mut surface = PainterSurface::new(&painter, rect);
            self.effect.render(&mut surface);
        });
    }
}

impl eframe::App for PlexusApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;
        self.last_dt = dt;

        self.render_top_bar(ctx);
        if self.show_settings {
            self.render_settings_panel(ctx);
        }
        self.render_canvas(ctx, dt);

        // Continuous repaint keeps the animation running
        ctx.request_repaint();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Plexus Studio RS",
        options,
        Box::new(|cc| Ok(Box::new(PlexusApp::new(cc)))),
    )
}
