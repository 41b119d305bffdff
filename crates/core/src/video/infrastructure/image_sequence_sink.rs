use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::display_sink::DisplaySink;
use crate::video::domain::quit_signal::QuitSignal;

/// Writes each annotated frame to `<dir>/frame_<index>.<ext>` using the
/// `image` crate.
pub struct ImageSequenceSink {
    dir: PathBuf,
    extension: String,
    quit: QuitSignal,
    opened: bool,
    written: usize,
}

impl ImageSequenceSink {
    /// PNG output.
    pub fn new(dir: &Path, quit: QuitSignal) -> Self {
        Self {
            dir: dir.to_path_buf(),
            extension: "png".to_string(),
            quit,
            opened: false,
            written: 0,
        }
    }

    /// Any extension the `image` crate can encode, e.g. `jpg`.
    pub fn with_extension(mut self, extension: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let ext = extension.trim_start_matches('.').to_lowercase();
        if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Err(format!("unsupported image extension: {extension}").into());
        }
        self.extension = ext;
        Ok(self)
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.{}", self.extension))
    }
}

impl DisplaySink for ImageSequenceSink {
    fn open(&mut self, metadata: &VideoMetadata) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&self.dir)?;
        log::info!(
            "Writing {}x{} frames to {}",
            metadata.width,
            metadata.height,
            self.dir.display()
        );
        self.opened = true;
        self.written = 0;
        Ok(())
    }

    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if !self.opened {
            return Err("ImageSequenceSink: not opened".into());
        }
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        img.save(self.frame_path(frame.index()))?;
        self.written += 1;
        Ok(())
    }

    fn poll_quit(&mut self, timeout: Duration) -> bool {
        self.quit.wait(timeout)
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.opened {
            log::info!("Wrote {} images to {}", self.written, self.dir.display());
            self.opened = false;
        }
        Ok(())
    }
}
