#![warn(clippy::all, rust_2018_idioms)]

mod app;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // an optional map to open right away
    let map_path = std::env::args().nth(1);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("Smart Courier"),
        ..Default::default()
    };
    eframe::run_native(
        "Smart Courier",
        native_options,
        Box::new(|cc| Box::new(app::App::new(cc, map_path))),
    )
}
