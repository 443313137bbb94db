//! Application configuration constants.

use std::time::Duration;

pub const WINDOW_TITLE: &str = "Image 2 GIF";
pub const WINDOW_WIDTH: f32 = 1200.0;
pub const WINDOW_HEIGHT: f32 = 1000.0;

/// Name of the animation written into the destination folder.
pub const OUTPUT_FILE_NAME: &str = "output.gif";

/// Extension (without dot) of the still images picked up from the source folder.
pub const IMAGE_EXTENSION: &str = "png";

pub const PREVIEW_INTERVAL_MS: u64 = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub output_file_name: String,
    pub image_extension: String,
    pub preview_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_file_name: OUTPUT_FILE_NAME.to_owned(),
            image_extension: IMAGE_EXTENSION.to_owned(),
            preview_interval: Duration::from_millis(PREVIEW_INTERVAL_MS),
        }
    }
}
