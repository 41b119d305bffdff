use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Produces frames one at a time from a camera, file or stream.
///
/// Implementations handle I/O details (device probing, codec, container
/// format) while the loop works with the abstract `Frame` and
/// `VideoMetadata` types.
pub trait FrameSource {
    /// Acquires the device or input and returns its metadata.
    fn open(&mut self) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Next RGB frame, or `Ok(None)` once the source is exhausted.
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the device. Safe to call more than once.
    fn close(&mut self);
}
