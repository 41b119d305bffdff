use std::time::Duration;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Where annotated frames go, and where the user asks to stop.
pub trait DisplaySink {
    fn open(&mut self, metadata: &VideoMetadata) -> Result<(), Box<dyn std::error::Error>>;

    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Waits up to `timeout` for a quit request.
    fn poll_quit(&mut self, timeout: Duration) -> bool;

    /// Flushes and releases the sink. Safe to call more than once.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
