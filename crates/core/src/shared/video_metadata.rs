use super::shape::Shape;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// 0 when the source does not report a rate.
    pub fps: f64,
    /// 0 for live sources.
    pub total_frames: usize,
    pub codec: String,
    /// Device path, file path or URL as opened.
    pub source: String,
}

impl VideoMetadata {
    pub fn shape(&self) -> Shape {
        Shape::new(self.width, self.height)
    }

    /// Frame rate to encode at: the reported rate rounded, or 30.
    pub fn output_fps(&self) -> i32 {
        let fps = self.fps.round() as i32;
        if fps <= 0 {
            30
        } else {
            fps
        }
    }
}
