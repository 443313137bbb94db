use crate::config::Settings;
use crate::converter;
use crate::error::ConvertError;
use crate::folder_picker::{browse_into, NativeFolderDialog};
use crate::preview::{self, PreviewSlot, PreviewToken};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

const SUCCESS_MESSAGE: &str = "GIF created successfully!";

/// Encodes the animation and decodes it back for the preview.
fn build_gif(
    source: &Path,
    destination: &Path,
    settings: &Settings,
) -> Result<(PathBuf, Vec<RgbaImage>), ConvertError> {
    let output = converter::convert(source, destination, settings)?;
    let frames = preview::decode_frames(&output)?;
    Ok((output, frames))
}

pub enum Signal {
    Success {
        output: PathBuf,
        frames: Vec<RgbaImage>,
    },
    Error(ConvertError),
}

#[derive(PartialEq, Debug)]
pub enum AppState {
    Idle,
    Processing,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Status {
    Neutral,
    Success(String),
    Failure(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Neutral => "",
            Status::Success(text) | Status::Failure(text) => text.as_str(),
        }
    }

    pub fn color(&self) -> Option<egui::Color32> {
        match self {
            Status::Neutral => None,
            Status::Success(_) => Some(egui::Color32::GREEN),
            Status::Failure(_) => Some(egui::Color32::RED),
        }
    }
}

pub struct GifApp {
    pub source_folder: String,
    pub destination_folder: String,
    pub settings: Settings,
    pub state: AppState,
    pub status: Status,
    pub last_output: Option<PathBuf>,
    pub preview: PreviewSlot<egui::TextureHandle>,
    pub preview_token: Option<PreviewToken>,
    pub channel: (mpsc::Sender<Signal>, mpsc::Receiver<Signal>),
}

impl Default for GifApp {
    fn default() -> Self {
        Self {
            source_folder: String::new(),
            destination_folder: String::new(),
            settings: Settings::default(),
            state: AppState::Idle,
            status: Status::Neutral,
            last_output: None,
            preview: PreviewSlot::default(),
            preview_token: None,
            channel: mpsc::channel::<Signal>(),
        }
    }
}

impl GifApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn build_folders_view(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("folders_panel").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.add_enabled_ui(self.state != AppState::Processing, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label("Source Folder:");
                    ui.add(egui::TextEdit::singleline(&mut self.source_folder).desired_width(400.0));
                    if ui.button("Browse").clicked() {
                        browse_into(&NativeFolderDialog, &mut self.source_folder);
                    }

                    ui.add_space(10.0);

                    ui.label("Destination Folder:");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.destination_folder)
                            .desired_width(400.0),
                    );
                    if ui.button("Browse").clicked() {
                        browse_into(&NativeFolderDialog, &mut self.destination_folder);
                    }
                });
            });
            ui.add_space(10.0);
        });
    }

    pub fn build_preview_view(&mut self, ctx: &egui::Context) {
        use egui_extras::{Size, StripBuilder};
        egui::CentralPanel::default().show(ctx, |ui| {
            StripBuilder::new(ui)
                .size(Size::remainder().at_least(100.0)) // for the animation
                .size(Size::exact(18.0)) // for the frame counter
                .vertical(|mut strip| match self.preview.active() {
                    Some(preview) => {
                        strip.cell(|ui| {
                            ui.vertical_centered(|ui| {
                                let texture =
                                    egui::load::SizedTexture::from_handle(preview.current());
                                ui.add(egui::Image::from_texture(texture).shrink_to_fit());
                            });
                        });
                        strip.cell(|ui| {
                            ui.vertical_centered(|ui| {
                                ui.weak(format!(
                                    "frame {} / {}",
                                    preview.index() + 1,
                                    preview.frame_count()
                                ));
                            });
                        });
                    }
                    None => {
                        strip.empty();
                        strip.empty();
                    }
                });
        });
    }

    pub fn build_processing_view(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                match self.state {
                    AppState::Processing => {
                        ui.spinner();
                    }
                    AppState::Idle => {
                        if ui
                            .button(egui::RichText::new("Create GIF").heading())
                            .clicked()
                        {
                            self.process(ctx);
                        }
                    }
                }
                let mut text = egui::RichText::new(self.status.text());
                if let Some(color) = self.status.color() {
                    text = text.color(color);
                }
                ui.label(text);
                if let Some(output) = &self.last_output {
                    ui.monospace(output.display().to_string());
                }
            });
            ui.add_space(10.0);
        });
    }

    pub fn poll(&mut self, ctx: &egui::Context) {
        while let Ok(signal) = self.channel.1.try_recv() {
            self.apply(signal, ctx);
        }
    }

    pub fn apply(&mut self, signal: Signal, ctx: &egui::Context) {
        self.state = AppState::Idle;
        match signal {
            Signal::Success { output, frames } => {
                log::info!("Created {} ({} frames)", output.display(), frames.len());
                let textures = frames
                    .iter()
                    .enumerate()
                    .map(|(index, frame)| {
                        let size = [frame.width() as usize, frame.height() as usize];
                        ctx.load_texture(
                            format!("preview-{}", index),
                            egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw()),
                            egui::TextureOptions::default(),
                        )
                    })
                    .collect();
                self.preview_token =
                    self.preview
                        .start(textures, self.settings.preview_interval, Instant::now());
                self.status = Status::Success(SUCCESS_MESSAGE.to_owned());
                self.last_output = Some(output);
            }
            Signal::Error(error) => {
                log::warn!("GIF creation failed: {}", error);
                self.preview.cancel();
                self.preview_token = None;
                self.last_output = None;
                self.status = Status::Failure(error.status_message());
            }
        }
    }

    pub fn process(&mut self, ctx: &egui::Context) {
        self.state = AppState::Processing;
        self.status = Status::Neutral;

        let sender = self.channel.0.clone();
        let source = PathBuf::from(&self.source_folder);
        let destination = PathBuf::from(&self.destination_folder);
        let settings = self.settings.clone();
        let ctx = ctx.clone();
        log::info!(
            "Creating GIF from {} into {}",
            source.display(),
            destination.display()
        );
        async_std::task::spawn(async move {
            let signal = match build_gif(&source, &destination, &settings) {
                Ok((output, frames)) => Signal::Success { output, frames },
                Err(e) => Signal::Error(e),
            };
            let _ = sender.send(signal);
            ctx.request_repaint();
        });
    }

    fn drive_preview(&mut self, ctx: &egui::Context) {
        let Some(token) = self.preview_token else {
            return;
        };
        if !self.preview.is_running(token) {
            self.preview_token = None;
            return;
        }
        if let Some(wait) = self.preview.tick(token, Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}

impl eframe::App for GifApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll(ctx);

        self.drive_preview(ctx);

        self.build_folders_view(ctx);

        self.build_processing_view(ctx);

        self.build_preview_view(ctx);
    }
}
