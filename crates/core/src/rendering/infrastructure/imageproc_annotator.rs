use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::classification::domain::emotion::Emotion;
use crate::rendering::domain::frame_annotator::{FrameAnnotator, Overlay};
use crate::shared::frame::Frame;

/// Outline thickness in pixels.
const BOX_THICKNESS: i32 = 2;

/// DejaVu Sans, used when no font file is given.
const BUNDLED_FONT: &[u8] = include_bytes!("../../../assets/DejaVuSans.ttf");

/// Height of the label bar if no font could be loaded.
const BAR_HEIGHT: u32 = 14;

const TEXT_SCALE: f32 = 18.0;
const TEXT_PADDING: i32 = 3;
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Colour that identifies each emotion on screen.
pub fn emotion_color(emotion: Emotion) -> Rgb<u8> {
    match emotion {
        Emotion::Anger => Rgb([220, 40, 40]),
        Emotion::Happy => Rgb([250, 200, 30]),
        Emotion::Neutral => Rgb([200, 200, 200]),
        Emotion::Surprise => Rgb([40, 170, 240]),
    }
}

/// Draws a hollow box around the face and a filled label bar with the
/// emotion name above it (inside the box when there is no room above).
pub struct ImageprocAnnotator {
    font: Option<FontArc>,
    scale: PxScale,
}

impl ImageprocAnnotator {
    /// Labels are drawn with the bundled DejaVu Sans.
    pub fn new() -> Self {
        let font = match FontArc::try_from_slice(BUNDLED_FONT) {
            Ok(font) => Some(font),
            Err(e) => {
                log::warn!("Bundled label font unusable ({e}); drawing bars without text");
                None
            }
        };
        Self {
            font,
            scale: PxScale::from(TEXT_SCALE),
        }
    }

    /// Load a TTF/OTF font for label text.
    pub fn with_font(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let bytes = std::fs::read(path)
            .map_err(|e| format!("failed to read font {}: {e}", path.display()))?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| format!("invalid font {}: {e}", path.display()))?;
        Ok(Self {
            font: Some(font),
            scale: PxScale::from(TEXT_SCALE),
        })
    }

    fn bar_size(&self, text: &str, box_width: u32) -> (u32, u32) {
        match self.font {
            Some(ref font) => {
                let (w, h) = text_size(self.scale, font, text);
                (w + 2 * TEXT_PADDING as u32, h + 2 * TEXT_PADDING as u32)
            }
            None => (box_width, BAR_HEIGHT),
        }
    }
}

impl Default for ImageprocAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAnnotator for ImageprocAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        overlay: &Overlay,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("cannot annotate a {}-channel frame", frame.channels()).into());
        }
        let region = overlay.region;
        if region.is_empty() || region.width() < 0 || region.height() < 0 {
            return Ok(());
        }

        let mut image = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("frame buffer does not match its dimensions")?;
        let color = emotion_color(overlay.emotion);

        for t in 0..BOX_THICKNESS {
            let w = region.width() - 2 * t;
            let h = region.height() - 2 * t;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(region.x_min + t, region.y_min + t).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut image, rect, color);
        }

        let text = overlay.emotion.label();
        let (bar_w, bar_h) = self.bar_size(text, region.width() as u32);
        let bar_y = if region.y_min >= bar_h as i32 {
            region.y_min - bar_h as i32
        } else {
            region.y_min
        };
        draw_filled_rect_mut(
            &mut image,
            Rect::at(region.x_min, bar_y).of_size(bar_w.max(1), bar_h.max(1)),
            color,
        );
        if let Some(ref font) = self.font {
            draw_text_mut(
                &mut image,
                TEXT_COLOR,
                region.x_min + TEXT_PADDING,
                bar_y + TEXT_PADDING,
                self.scale,
                font,
                text,
            );
        }

        frame.data_mut().copy_from_slice(image.as_raw());
        Ok(())
    }
}
