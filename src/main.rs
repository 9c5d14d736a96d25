//! Favicon Downloader
//!
//! A cross-platform GUI application that downloads website favicons via the
//! Google favicon service.

use eframe::egui;

use favicon_downloader::{gui, icon};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1040.0, 680.0])
            .with_min_inner_size([900.0, 600.0])
            .with_icon(icon::app_icon()),
        ..Default::default()
    };

    eframe::run_native(
        "Favicon Downloader",
        options,
        Box::new(|cc| Ok(Box::new(gui::App::new(cc)))),
    )
}
