//! Main application state and UI implementation

use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use super::theme::ThemePreset;
use crate::api::{FetchError, FetchRequest};
use crate::config::Preferences;

/// Icon sizes offered by the size selector
pub const SIZE_CHOICES: [u32; 9] = [16, 32, 48, 64, 96, 128, 192, 256, 512];

/// Main application state
pub struct App {
    /// Domain or URL to fetch the favicon for
    target_input: String,
    /// Directory downloaded icons are written into
    output_dir: String,
    /// Selected icon size in pixels
    selected_size: u32,
    /// Active theme preset
    theme: ThemePreset,
    /// Status/log messages
    log_messages: Vec<LogMessage>,
    /// Receiver for the in-flight fetch result
    fetch_receiver: Option<Receiver<Result<PathBuf, FetchError>>>,
    /// Is a fetch in progress?
    fetch_in_progress: bool,
    /// Preview texture of the last downloaded icon
    preview_texture: Option<egui::TextureHandle>,
    /// Path of the last downloaded icon
    preview_path: Option<PathBuf>,
    /// Message shown instead of a preview (SVG payloads, decode failures)
    preview_note: Option<String>,
}

/// A log message with severity level
#[derive(Clone)]
struct LogMessage {
    text: String,
    level: LogLevel,
}

#[derive(Clone, Copy, PartialEq)]
enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl App {
    /// Create a new App instance from persisted preferences
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let prefs = Preferences::load();
        let theme = ThemePreset::from_str(&prefs.theme);
        cc.egui_ctx.set_visuals(theme.visuals());

        let selected_size = if SIZE_CHOICES.contains(&prefs.size) {
            prefs.size
        } else {
            128
        };

        Self {
            target_input: String::new(),
            output_dir: prefs.output_dir,
            selected_size,
            theme,
            log_messages: Vec::new(),
            fetch_receiver: None,
            fetch_in_progress: false,
            preview_texture: None,
            preview_path: None,
            preview_note: None,
        }
    }

    /// Add a log message
    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogMessage {
            text: message.into(),
            level,
        });
        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    /// Persist the current settings
    fn save_prefs(&self) {
        let prefs = Preferences {
            theme: self.theme.as_str().to_string(),
            output_dir: self.output_dir.clone(),
            size: self.selected_size,
        };
        if let Err(e) = prefs.save() {
            log::warn!("Failed to save preferences: {}", e);
        }
    }

    /// Start an async favicon fetch
    fn start_fetch(&mut self) {
        if self.fetch_in_progress {
            return;
        }

        let target = self.target_input.trim().to_string();
        if target.is_empty() {
            self.log(LogLevel::Warning, "Enter a website URL first");
            return;
        }
        let output_dir = self.output_dir.trim().to_string();
        if output_dir.is_empty() {
            self.log(LogLevel::Warning, "Choose an output directory first");
            return;
        }

        self.log(LogLevel::Info, format!("Fetching icon: {}", target));
        self.log(LogLevel::Info, format!("Save directory: {}", output_dir));
        self.log(
            LogLevel::Info,
            format!("Size: {0}x{0}", self.selected_size),
        );

        let request = FetchRequest::new(target, output_dir, self.selected_size);
        let (tx, rx) = mpsc::channel();

        self.fetch_in_progress = true;
        self.fetch_receiver = Some(rx);
        self.preview_texture = None;
        self.preview_path = None;
        self.preview_note = None;

        thread::spawn(move || {
            let result = request.fetch();
            let _ = tx.send(result);
        });
    }

    /// Poll for the fetch result
    fn poll_fetch(&mut self, ctx: &egui::Context) {
        if let Some(ref receiver) = self.fetch_receiver {
            match receiver.try_recv() {
                Ok(Ok(path)) => {
                    self.fetch_in_progress = false;
                    self.fetch_receiver = None;
                    self.log(LogLevel::Success, "Download complete");
                    self.log(LogLevel::Success, format!("Saved to {}", path.display()));
                    self.load_preview(ctx, &path);
                }
                Ok(Err(e)) => {
                    self.fetch_in_progress = false;
                    self.fetch_receiver = None;
                    if matches!(e, FetchError::NoIconFound { .. }) {
                        self.log(
                            LogLevel::Warning,
                            format!("{} - the service may have no icon for this site", e),
                        );
                    } else {
                        self.log(LogLevel::Error, e.to_string());
                    }
                }
                Err(TryRecvError::Empty) => {
                    // Still downloading, keep waiting
                }
                Err(TryRecvError::Disconnected) => {
                    self.fetch_in_progress = false;
                    self.fetch_receiver = None;
                    self.log(LogLevel::Error, "Fetch thread terminated unexpectedly");
                }
            }
        }
    }

    /// Load a downloaded icon file into the preview pane
    fn load_preview(&mut self, ctx: &egui::Context, path: &Path) {
        self.preview_path = Some(path.to_path_buf());

        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        if is_svg {
            self.preview_note = Some("Preview not available for SVG icons".to_string());
            return;
        }

        let loaded = std::fs::read(path)
            .map_err(|e| format!("Failed to read file: {}", e))
            .and_then(|bytes| load_image_from_bytes(&bytes));

        match loaded {
            Ok(color_image) => {
                let texture =
                    ctx.load_texture("favicon_preview", color_image, egui::TextureOptions::NEAREST);
                self.preview_texture = Some(texture);
            }
            Err(e) => {
                log::warn!("Preview failed for {}: {}", path.display(), e);
                self.preview_note = Some(format!("Could not preview image: {}", e));
            }
        }
    }
}

/// Load image from bytes into egui ColorImage
fn load_image_from_bytes(bytes: &[u8]) -> Result<egui::ColorImage, String> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    let size = [image.width() as usize, image.height() as usize];
    let image_buffer = image.to_rgba8();
    let pixels = image_buffer.as_flat_samples();

    Ok(egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()))
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll for the fetch result
        self.poll_fetch(ctx);

        // Request repaint while downloading
        if self.fetch_in_progress {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        let palette = self.theme.palette();

        // Top panel with title and theme selection
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Favicon Downloader");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("v{}", env!("CARGO_PKG_VERSION")));
                    ui.separator();

                    let mut changed = false;
                    egui::ComboBox::new("theme_combo", "Theme")
                        .selected_text(self.theme.display_name())
                        .show_ui(ui, |ui| {
                            for preset in ThemePreset::ALL {
                                if ui
                                    .selectable_value(&mut self.theme, preset, preset.display_name())
                                    .clicked()
                                {
                                    changed = true;
                                }
                            }
                        });
                    if changed {
                        ctx.set_visuals(self.theme.visuals());
                        self.save_prefs();
                    }
                });
            });
            ui.add_space(4.0);
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.add_space(2.0);
            if self.fetch_in_progress {
                ui.colored_label(egui::Color32::YELLOW, "Downloading...");
            } else {
                ui.colored_label(palette.success, "Idle");
            }
            ui.add_space(2.0);
        });

        // Main central panel
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut fetch_requested = false;

            ui.group(|ui| {
                ui.heading("Download");
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.label("Website URL:");
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.target_input)
                            .desired_width(f32::INFINITY)
                            .hint_text("github.com or https://example.org"),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        fetch_requested = true;
                    }
                });

                ui.add_space(4.0);

                let mut dir_changed = false;
                ui.horizontal(|ui| {
                    ui.label("Output directory:");
                    let available_width = ui.available_width() - 90.0; // Reserve space for button
                    ui.add(
                        egui::TextEdit::singleline(&mut self.output_dir)
                            .desired_width(available_width.max(200.0)),
                    );
                    if ui.button("Browse...").clicked() {
                        let mut dialog = rfd::FileDialog::new();
                        let current = Path::new(&self.output_dir);
                        if current.is_dir() {
                            dialog = dialog.set_directory(current);
                        }
                        if let Some(path) = dialog.pick_folder() {
                            self.output_dir = path.display().to_string();
                            dir_changed = true;
                        }
                    }
                });
                if dir_changed {
                    self.save_prefs();
                }

                ui.add_space(4.0);

                ui.horizontal(|ui| {
                    ui.label("Icon size:");
                    let mut changed = false;
                    egui::ComboBox::new("size_combo", "")
                        .selected_text(format!("{0}x{0}", self.selected_size))
                        .show_ui(ui, |ui| {
                            for size in SIZE_CHOICES {
                                if ui
                                    .selectable_value(
                                        &mut self.selected_size,
                                        size,
                                        format!("{0}x{0}", size),
                                    )
                                    .clicked()
                                {
                                    changed = true;
                                }
                            }
                        });
                    if changed {
                        self.save_prefs();
                    }
                });

                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.add_enabled_ui(!self.fetch_in_progress, |ui| {
                        if ui.button("Download icon").clicked() {
                            fetch_requested = true;
                        }
                    });
                    if self.fetch_in_progress {
                        ui.spinner();
                        ui.label("Downloading...");
                    }
                });
            });

            if fetch_requested {
                self.start_fetch();
            }

            ui.add_space(8.0);

            // Log and preview side by side
            ui.columns(2, |columns| {
                columns[0].group(|ui| {
                    ui.heading("Log");
                    ui.add_space(4.0);

                    egui::ScrollArea::vertical()
                        .id_salt("log_scroll")
                        .auto_shrink([false, false])
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for msg in &self.log_messages {
                                let color = match msg.level {
                                    LogLevel::Info => palette.subtext,
                                    LogLevel::Success => palette.success,
                                    LogLevel::Warning => egui::Color32::YELLOW,
                                    LogLevel::Error => egui::Color32::RED,
                                };
                                ui.colored_label(color, &msg.text);
                            }
                        });
                });

                columns[1].group(|ui| {
                    ui.heading("Preview");
                    ui.add_space(4.0);

                    if let Some(ref texture) = self.preview_texture {
                        let size = texture.size_vec2();
                        // Scale to fit the preview area; small icons get enlarged
                        let max_size = 220.0;
                        let scale = (max_size / size.x).min(max_size / size.y).min(4.0);
                        let display_size = egui::vec2(size.x * scale, size.y * scale);

                        ui.vertical_centered(|ui| {
                            ui.image((texture.id(), display_size));
                            ui.label(format!("{}x{}", size.x as u32, size.y as u32));
                        });
                    } else if let Some(ref note) = self.preview_note {
                        ui.colored_label(palette.subtext, note);
                    } else {
                        ui.colored_label(palette.subtext, "Downloaded icons appear here");
                    }

                    if let Some(ref path) = self.preview_path {
                        ui.add_space(4.0);
                        ui.label(
                            egui::RichText::new(path.display().to_string())
                                .small()
                                .color(palette.subtext),
                        );
                    }
                });
            });
        });
    }
}
