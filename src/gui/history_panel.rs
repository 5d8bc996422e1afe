use crate::solve::orchestrator::SolveOrchestrator;
use eframe::egui::{self, RichText};

/// History list below the solution view; hidden while empty.
pub fn show(ui: &mut egui::Ui, orchestrator: &mut SolveOrchestrator) {
    if orchestrator.state().history.is_empty() {
        return;
    }

    ui.add_space(16.0);
    ui.separator();
    ui.horizontal(|ui| {
        ui.label(RichText::new("RECENT HISTORY").small().weak().strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("Clear").clicked() {
                orchestrator.clear_history();
            }
        });
    });

    let entries: Vec<(usize, String)> = orchestrator
        .state()
        .history
        .entries()
        .iter()
        .enumerate()
        .map(|(index, solution)| {
            (
                index,
                format!("{}  =  {}", solution.equation, solution.result),
            )
        })
        .collect();

    for (index, label) in entries {
        if ui.selectable_label(false, label).clicked() {
            orchestrator.select_history_item(index);
        }
    }
}
