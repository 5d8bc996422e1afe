use crate::solve::orchestrator::{PrimaryView, SolveOrchestrator};
use crate::solve::solution::MathSolution;
use eframe::egui::{self, Color32, RichText};

const HEADER_COLOR: Color32 = Color32::from_rgb(79, 70, 229);
const RESULT_COLOR: Color32 = Color32::from_rgb(5, 150, 105);
const ERROR_TEXT: Color32 = Color32::from_rgb(185, 28, 28);
const ERROR_FILL: Color32 = Color32::from_rgb(254, 242, 242);

/// Render the primary view for the current session state. Returns the text
/// the user asked to copy to the clipboard, if any.
pub fn show(ui: &mut egui::Ui, orchestrator: &mut SolveOrchestrator) -> Option<String> {
    match orchestrator.state().primary_view() {
        PrimaryView::Empty => {
            empty_state(ui);
            None
        }
        PrimaryView::Processing => {
            processing_state(ui);
            None
        }
        PrimaryView::ErrorBanner => {
            let message = orchestrator.state().error.clone().unwrap_or_default();
            if error_banner(ui, &message) {
                orchestrator.dismiss_error();
            }
            None
        }
        PrimaryView::Solution => {
            let solution = orchestrator.state().solution.clone();
            solution.as_ref().and_then(|solution| solution_view(ui, solution))
        }
    }
}

fn empty_state(ui: &mut egui::Ui) {
    ui.add_space(24.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("No solution yet").strong());
        ui.add_space(4.0);
        ui.label(
            RichText::new("Draw an equation on the canvas and press Solve.")
                .weak()
                .small(),
        );
    });
}

fn processing_state(ui: &mut egui::Ui) {
    ui.add_space(24.0);
    ui.vertical_centered(|ui| {
        ui.add(egui::Spinner::new());
        ui.add_space(4.0);
        ui.label(RichText::new("Waiting for the solver…").weak().small());
    });
}

/// Returns true when the user clicked Dismiss.
fn error_banner(ui: &mut egui::Ui, message: &str) -> bool {
    let mut dismissed = false;
    egui::Frame::none()
        .fill(ERROR_FILL)
        .stroke(egui::Stroke::new(1.0, ERROR_TEXT))
        .rounding(6.0)
        .inner_margin(egui::Margin::same(10.0))
        .show(ui, |ui| {
            ui.label(
                RichText::new("Something went wrong")
                    .strong()
                    .color(ERROR_TEXT),
            );
            ui.add_space(4.0);
            ui.label(RichText::new(message).color(ERROR_TEXT));
            ui.add_space(6.0);
            if ui.button("Dismiss").clicked() {
                dismissed = true;
            }
        });
    dismissed
}

fn section_label(ui: &mut egui::Ui, title: &str) {
    ui.label(RichText::new(title).small().weak().strong());
}

fn solution_view(ui: &mut egui::Ui, solution: &MathSolution) -> Option<String> {
    let mut copy_request = None;

    ui.label(RichText::new("Solution Breakdown").heading().color(HEADER_COLOR));
    ui.add_space(8.0);

    section_label(ui, "DETECTED EQUATION");
    ui.group(|ui| {
        ui.label(RichText::new(&solution.equation).monospace().size(18.0));
    });
    ui.horizontal(|ui| {
        ui.label(RichText::new(&solution.latex).monospace().small().weak());
        if ui.small_button("Copy LaTeX").clicked() {
            copy_request = Some(solution.latex.clone());
        }
    });
    ui.add_space(8.0);

    section_label(ui, "STEPS");
    for (index, step) in solution.steps.iter().enumerate() {
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new(format!("{}.", index + 1)).strong().color(HEADER_COLOR));
            ui.label(step);
        });
    }
    ui.add_space(8.0);

    section_label(ui, "FINAL RESULT");
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(&solution.result)
                .strong()
                .size(24.0)
                .color(RESULT_COLOR),
        );
        if ui.small_button("Copy").clicked() {
            copy_request = Some(solution.result.clone());
        }
    });
    ui.add_space(8.0);

    section_label(ui, "THE CONCEPT");
    ui.label(RichText::new(format!("\u{201c}{}\u{201d}", solution.explanation)).italics());

    copy_request
}
