use crate::config::Settings;
use crate::error::{ConvertError, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Frame, ImageError};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

fn has_extension(name: &str, extension: &str) -> bool {
    name.to_lowercase()
        .ends_with(&format!(".{}", extension.to_lowercase()))
}

/// Lists the images of `source` that become frames, in frame order.
///
/// Only the file name is checked: entries are kept when their name ends with
/// the image extension (any case) and are ordered by plain string comparison
/// of their names.
pub fn collect_frame_paths(source: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let unreadable = |e| ConvertError::SourceUnreadable {
        path: source.to_path_buf(),
        source: e,
    };

    let mut frames: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(source).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if has_extension(&name, extension) {
            frames.push((name, entry.path()));
        }
    }
    frames.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(frames.into_iter().map(|(_, path)| path).collect())
}

/// Builds `<destination>/<output file>` from the images found in `source`.
///
/// Nothing is written unless both folders exist and at least one image was
/// found. An existing output file is overwritten, and a failure halfway
/// through leaves whatever was already written in place.
pub fn convert(source: &Path, destination: &Path, settings: &Settings) -> Result<PathBuf> {
    if !source.is_dir() || !destination.is_dir() {
        return Err(ConvertError::InvalidInput);
    }

    let frames = collect_frame_paths(source, &settings.image_extension)?;
    if frames.is_empty() {
        return Err(ConvertError::EmptySource);
    }

    let output = destination.join(&settings.output_file_name);
    log::info!(
        "Encoding {} frame(s) from {} into {}",
        frames.len(),
        source.display(),
        output.display()
    );

    let write_failure = |e: ImageError| ConvertError::WriteFailure {
        path: output.clone(),
        source: e,
    };

    let file = File::create(&output).map_err(|e| write_failure(ImageError::IoError(e)))?;
    let mut writer = BufWriter::new(file);
    {
        // The trailer is written when the encoder goes away.
        let mut encoder = GifEncoder::new(&mut writer);
        encoder.set_repeat(Repeat::Infinite).map_err(write_failure)?;

        for path in &frames {
            let image = image::open(path).map_err(|e| ConvertError::DecodeFailure {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Appending frame {}", path.display());
            encoder
                .encode_frame(Frame::new(image.into_rgba8()))
                .map_err(write_failure)?;
        }
    }
    writer
        .flush()
        .map_err(|e| write_failure(ImageError::IoError(e)))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn write_png(dir: &Path, name: &str, color: Rgba<u8>) -> anyhow::Result<()> {
        // The format is picked explicitly since upper-case extensions are used too.
        RgbaImage::from_pixel(4, 4, color)
            .save_with_format(dir.join(name), image::ImageFormat::Png)?;
        Ok(())
    }

    fn frame_colors(gif: &Path) -> anyhow::Result<Vec<Rgba<u8>>> {
        Ok(preview::decode_frames(gif)?
            .iter()
            .map(|frame| *frame.get_pixel(0, 0))
            .collect())
    }

    #[test]
    fn test_frames_follow_name_order_and_skip_other_files() -> anyhow::Result<()> {
        let source = tempdir()?;
        let destination = tempdir()?;
        write_png(source.path(), "b.PNG", GREEN)?;
        write_png(source.path(), "a.png", RED)?;
        fs::write(source.path().join("c.txt"), b"not an image")?;

        let output = convert(source.path(), destination.path(), &Settings::default())?;

        assert_eq!(output, destination.path().join("output.gif"));
        assert_eq!(frame_colors(&output)?, vec![RED, GREEN]);
        Ok(())
    }

    #[test]
    fn test_collect_uses_ordinal_name_order() -> anyhow::Result<()> {
        let source = tempdir()?;
        for name in ["b.png", "a.Png", "B.png", "10.png", "9.png", "notes.png.bak"] {
            fs::write(source.path().join(name), b"")?;
        }

        let names: Vec<String> = collect_frame_paths(source.path(), "png")?
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["10.png", "9.png", "B.png", "a.Png", "b.png"]);
        Ok(())
    }

    #[test]
    fn test_missing_source_is_invalid_input() -> anyhow::Result<()> {
        let root = tempdir()?;
        let destination = tempdir()?;

        let result = convert(
            &root.path().join("missing"),
            destination.path(),
            &Settings::default(),
        );

        assert!(matches!(result, Err(ConvertError::InvalidInput)));
        assert_eq!(fs::read_dir(destination.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_source_file_is_invalid_input() -> anyhow::Result<()> {
        let root = tempdir()?;
        let destination = tempdir()?;
        let file = root.path().join("frame.png");
        write_png(root.path(), "frame.png", RED)?;

        let result = convert(&file, destination.path(), &Settings::default());

        assert!(matches!(result, Err(ConvertError::InvalidInput)));
        assert_eq!(fs::read_dir(destination.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_missing_destination_is_invalid_input() -> anyhow::Result<()> {
        let source = tempdir()?;
        let root = tempdir()?;
        write_png(source.path(), "a.png", RED)?;
        let destination = root.path().join("missing");

        let result = convert(source.path(), &destination, &Settings::default());

        assert!(matches!(result, Err(ConvertError::InvalidInput)));
        assert!(!destination.exists());
        Ok(())
    }

    #[test]
    fn test_no_images_writes_nothing() -> anyhow::Result<()> {
        let source = tempdir()?;
        let destination = tempdir()?;
        fs::write(source.path().join("readme.txt"), b"hello")?;

        let result = convert(source.path(), destination.path(), &Settings::default());

        assert!(matches!(result, Err(ConvertError::EmptySource)));
        assert!(!destination.path().join("output.gif").exists());
        Ok(())
    }

    #[test]
    fn test_fake_png_is_decode_failure() -> anyhow::Result<()> {
        let source = tempdir()?;
        let destination = tempdir()?;
        write_png(source.path(), "a.png", RED)?;
        fs::write(source.path().join("b.png"), b"renamed text file")?;

        let result = convert(source.path(), destination.path(), &Settings::default());

        match result {
            Err(ConvertError::DecodeFailure { path, .. }) => {
                assert_eq!(path, source.path().join("b.png"))
            }
            other => panic!("expected a decode failure, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_output_path_is_directory_is_write_failure() -> anyhow::Result<()> {
        let source = tempdir()?;
        let destination = tempdir()?;
        write_png(source.path(), "a.png", RED)?;
        fs::create_dir(destination.path().join("output.gif"))?;

        let result = convert(source.path(), destination.path(), &Settings::default());

        match result {
            Err(ConvertError::WriteFailure { path, .. }) => {
                assert_eq!(path, destination.path().join("output.gif"))
            }
            other => panic!("expected a write failure, got {:?}", other),
        }
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_full_disk_is_write_failure() -> anyhow::Result<()> {
        let source = tempdir()?;
        let destination = tempdir()?;
        write_png(source.path(), "a.png", RED)?;
        std::os::unix::fs::symlink("/dev/full", destination.path().join("output.gif"))?;

        let result = convert(source.path(), destination.path(), &Settings::default());

        assert!(matches!(result, Err(ConvertError::WriteFailure { .. })));
        Ok(())
    }

    #[test]
    fn test_removed_source_is_unreadable() -> anyhow::Result<()> {
        let root = tempdir()?;
        let source = root.path().join("frames");
        fs::create_dir(&source)?;
        fs::remove_dir(&source)?;

        let error = collect_frame_paths(&source, "png").err().unwrap();

        assert!(matches!(error, ConvertError::SourceUnreadable { .. }));
        assert!(error.status_message().starts_with("Error: failed to read "));
        Ok(())
    }

    #[test]
    fn test_second_run_replaces_output() -> anyhow::Result<()> {
        let source = tempdir()?;
        let destination = tempdir()?;
        let settings = Settings::default();
        write_png(source.path(), "a.png", RED)?;
        write_png(source.path(), "b.png", GREEN)?;
        write_png(source.path(), "c.png", BLUE)?;
        let output = convert(source.path(), destination.path(), &settings)?;
        assert_eq!(frame_colors(&output)?.len(), 3);

        fs::remove_file(source.path().join("a.png"))?;
        fs::remove_file(source.path().join("c.png"))?;
        let output = convert(source.path(), destination.path(), &settings)?;

        assert_eq!(frame_colors(&output)?, vec![GREEN]);
        Ok(())
    }
}
