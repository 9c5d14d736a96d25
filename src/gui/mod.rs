//! GUI module using egui/eframe
//!
//! Provides the graphical user interface for the favicon downloader.

mod app;
pub mod theme;

pub use app::App;
