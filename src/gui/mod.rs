mod history_panel;
mod solution_panel;

use crate::capture;
use crate::settings::Settings;
use crate::sketch::export;
use crate::sketch::surface::{SketchSurface, SketchTool, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};
use crate::solve::client::SolveClient;
use crate::solve::orchestrator::{SolveOrchestrator, SubmitOutcome};
use eframe::egui::{self, Color32, Pos2, Sense, TextureHandle, TextureOptions};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::sync::Arc;
use std::time::Duration;

pub struct MathScribeApp {
    settings: Settings,
    surface: SketchSurface,
    orchestrator: SolveOrchestrator,
    toasts: Toasts,
    canvas_texture: Option<TextureHandle>,
    texture_revision: Option<u64>,
}

impl MathScribeApp {
    pub fn new(settings: Settings, client: Arc<dyn SolveClient>) -> Self {
        let surface = SketchSurface::new(
            settings.background_rgba(),
            settings.pen_rgba(),
            settings.line_width,
        );
        let orchestrator = SolveOrchestrator::new(client, settings.history_limit);
        let toasts = Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]);
        Self {
            settings,
            surface,
            orchestrator,
            toasts,
            canvas_texture: None,
            texture_revision: None,
        }
    }

    fn add_toast(&mut self, kind: ToastKind, text: String) {
        if !self.settings.enable_toasts {
            return;
        }
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default()
                .duration_in_seconds(self.settings.toast_duration as f64),
        });
    }

    fn submit_image(&mut self, image: String) {
        match self.orchestrator.submit(image) {
            SubmitOutcome::Accepted => {}
            SubmitOutcome::RejectedBusy => {
                tracing::debug!("ignoring submission while a solve is in flight");
            }
        }
    }

    fn solve_canvas(&mut self) {
        match self.surface.export() {
            Ok(image) => self.submit_image(image),
            Err(err) => {
                tracing::error!(error = %err, "failed to export the canvas");
                self.orchestrator
                    .report_failure(format!("Could not capture the drawing: {err}"));
            }
        }
    }

    fn upload_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
            .pick_file()
        else {
            return;
        };
        match capture::image_file_to_data_uri(&path) {
            Ok(image) => self.submit_image(image),
            Err(err) => self.orchestrator.report_failure(err.display_message()),
        }
    }

    fn save_drawing(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(export::timestamped_filename(chrono::Local::now()))
            .save_file()
        else {
            return;
        };
        match export::save_png(self.surface.raster(), &path) {
            Ok(()) => self.add_toast(
                ToastKind::Success,
                format!("Saved drawing to {}", path.display()),
            ),
            Err(err) => self.add_toast(ToastKind::Error, format!("Failed to save drawing: {err}")),
        }
    }

    fn copy_text(&mut self, text: String) {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.add_toast(ToastKind::Success, "Copied to clipboard".to_string()),
            Err(err) => self.add_toast(ToastKind::Error, format!("Clipboard error: {err}")),
        }
    }

    fn header_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Σ MathScribe");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Upload Image").clicked() {
                    self.upload_image();
                }
                if ui.button("Save Drawing").clicked() {
                    self.save_drawing();
                }
            });
        });
    }

    fn toolbar_ui(&mut self, ui: &mut egui::Ui) {
        let solving = self.orchestrator.is_solving();
        ui.horizontal(|ui| {
            let mut tool = self.surface.tool();
            ui.selectable_value(&mut tool, SketchTool::Pen, "Pen");
            ui.selectable_value(&mut tool, SketchTool::Eraser, "Eraser");
            self.surface.set_tool(tool);

            ui.separator();
            if ui.button("Clear").clicked() {
                self.surface.clear();
            }

            ui.separator();
            let mut width = self.surface.stroke_width();
            ui.add(egui::Slider::new(&mut width, MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).text("Width"));
            self.surface.set_stroke_width(width);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = if solving { "Solving…" } else { "Solve Equation" };
                if ui.add_enabled(!solving, egui::Button::new(label)).clicked() {
                    self.solve_canvas();
                }
                if solving {
                    ui.add(egui::Spinner::new());
                }
            });
        });
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let avail = ui.available_size();
        let width = avail.x.max(1.0) as u32;
        let height = avail.y.max(1.0) as u32;
        if (width, height) != self.surface.size() {
            // Resizing reallocates the raster, which drops the drawing.
            self.surface.configure(width, height);
        }

        let (response, painter) = ui.allocate_painter(avail, Sense::drag());
        let origin = response.rect.min;
        // Pointer and touch positions arrive in viewport coordinates; the
        // widget origin offset maps them onto the raster.
        let to_canvas = |pos: Pos2| {
            let local = pos - origin;
            (local.x.round() as i32, local.y.round() as i32)
        };

        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.surface.begin_stroke(to_canvas(pos));
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.surface.extend_stroke(to_canvas(pos));
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.surface.end_stroke();
        }

        self.sync_canvas_texture(ui.ctx());
        if let Some(texture) = &self.canvas_texture {
            painter.image(
                texture.id(),
                response.rect,
                egui::Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        if self.orchestrator.is_solving() {
            painter.rect_filled(
                response.rect,
                0.0,
                Color32::from_rgba_unmultiplied(255, 255, 255, 160),
            );
            let center = response.rect.center();
            ui.put(
                egui::Rect::from_center_size(center, egui::vec2(32.0, 32.0)),
                egui::Spinner::new().size(28.0),
            );
            painter.text(
                center + egui::vec2(0.0, 28.0),
                egui::Align2::CENTER_TOP,
                "Analyzing your handwriting…",
                egui::FontId::proportional(15.0),
                Color32::from_rgb(49, 46, 129),
            );
        }
    }

    fn sync_canvas_texture(&mut self, ctx: &egui::Context) {
        if self.canvas_texture.is_some() && self.texture_revision == Some(self.surface.revision()) {
            return;
        }
        let (width, height) = self.surface.size();
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            self.surface.pixels(),
        );
        match &mut self.canvas_texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.canvas_texture =
                    Some(ctx.load_texture("canvas", image, TextureOptions::NEAREST));
            }
        }
        self.texture_revision = Some(self.surface.revision());
    }
}

impl eframe::App for MathScribeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.orchestrator.poll() {
            ctx.request_repaint();
        }
        let solving = self.orchestrator.is_solving();
        self.surface.set_locked(solving);
        if solving {
            // Keep polling for the worker's reply while the spinner runs.
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.header_ui(ui);
        });

        let mut copy_request = None;
        egui::SidePanel::right("results")
            .default_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    copy_request = solution_panel::show(ui, &mut self.orchestrator);
                    history_panel::show(ui, &mut self.orchestrator);
                });
            });
        if let Some(text) = copy_request {
            self.copy_text(text);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.toolbar_ui(ui);
            ui.separator();
            self.canvas_ui(ui);
        });

        self.toasts.show(ctx);
    }
}
