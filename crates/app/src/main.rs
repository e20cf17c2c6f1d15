mod state;
mod ui;

use eframe::egui;
use state::AppState;
use treemap_core::{dataset, Selection};

struct TreemapApp {
    state: AppState,
}

impl TreemapApp {
    fn new(_cc: &eframe::CreationContext<'_>, selection: Selection) -> Self {
        let mut state = AppState::new(selection);
        state.start_load();
        Self { state }
    }
}

impl eframe::App for TreemapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::draw(&mut self.state, ctx);
    }
}

/// Accepts either a bare key (`movies`) or a query string (`?data=movies`).
fn initial_selection() -> Selection {
    match std::env::args().nth(1) {
        Some(arg) if arg.starts_with('?') || arg.contains('=') => dataset::from_query(&arg),
        Some(arg) => Selection::parse(Some(arg.as_str())),
        None => Selection::parse(None),
    }
}

fn main() -> eframe::Result<()> {
    treemap_core::logging::init("info");
    let selection = initial_selection();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1060.0, 900.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Treemap",
        options,
        Box::new(|cc| Ok(Box::new(TreemapApp::new(cc, selection)))),
    )
}
