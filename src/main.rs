use anyhow::Context;
use eframe::egui;
use mathscribe::gui::MathScribeApp;
use mathscribe::settings::Settings;
use mathscribe::solve::client::GeminiSolveClient;
use mathscribe::{logging, solve::client::SolveClient};
use std::sync::Arc;

const SETTINGS_FILE: &str = "settings.json";

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(settings.debug_logging);

    let client: Arc<dyn SolveClient> =
        Arc::new(GeminiSolveClient::from_settings(&settings).context("configure solve client")?);

    let (width, height) = settings.window_size.unwrap_or((1100.0, 700.0));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("MathScribe")
            .with_inner_size([width, height])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "MathScribe",
        native_options,
        Box::new(move |_cc| Box::new(MathScribeApp::new(settings, client))),
    )
    .map_err(|err| anyhow::anyhow!("failed to start the UI: {err}"))
}
