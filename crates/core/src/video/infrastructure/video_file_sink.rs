use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::display_sink::DisplaySink;
use crate::video::domain::quit_signal::QuitSignal;

/// Encodes annotated frames to a video file via ffmpeg-next.
pub struct VideoFileSink {
    path: PathBuf,
    quit: QuitSignal,
    encoding: Option<Encoding>,
}

struct Encoding {
    octx: ffmpeg_next::format::context::Output,
    encoder: ffmpeg_next::codec::encoder::video::Encoder,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    time_base: ffmpeg_next::Rational,
    frame_count: usize,
}

/// Output stream index; the sink writes a single video stream.
const VIDEO_STREAM_INDEX: usize = 0;

impl VideoFileSink {
    pub fn new(path: &Path, quit: QuitSignal) -> Self {
        Self {
            path: path.to_path_buf(),
            quit,
            encoding: None,
        }
    }
}

impl DisplaySink for VideoFileSink {
    fn open(&mut self, metadata: &VideoMetadata) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut octx = ffmpeg_next::format::output(&self.path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        // Use MPEG4 as a widely compatible encoder
        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4)
            .ok_or("MPEG4 encoder not found")?;

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        let fps = metadata.output_fps();
        let time_base = ffmpeg_next::Rational(1, fps);
        encoder_ctx.set_width(metadata.width);
        encoder_ctx.set_height(metadata.height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(time_base);
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);

        octx.write_header()?;

        // RGB -> YUV
        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            metadata.width,
            metadata.height,
            ffmpeg_next::format::Pixel::YUV420P,
            metadata.width,
            metadata.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::info!(
            "Writing {}x{} @ {fps} fps to {}",
            metadata.width,
            metadata.height,
            self.path.display()
        );

        self.encoding = Some(Encoding {
            octx,
            encoder,
            scaler,
            width: metadata.width,
            height: metadata.height,
            time_base,
            frame_count: 0,
        });
        Ok(())
    }

    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let enc = self.encoding.as_mut().ok_or("VideoFileSink: not opened")?;
        if frame.width() != enc.width || frame.height() != enc.height || frame.channels() != 3 {
            return Err(format!(
                "frame {}x{}x{} does not match the {}x{} RGB output",
                frame.width(),
                frame.height(),
                frame.channels(),
                enc.width,
                enc.height
            )
            .into());
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            enc.width,
            enc.height,
        );

        let stride = rgb_frame.stride(0);
        let row_bytes = enc.width as usize * 3;
        let data = rgb_frame.data_mut(0);
        let src = frame.data();

        // Copy pixel data, respecting stride
        for row in 0..enc.height as usize {
            let src_start = row * row_bytes;
            let dst_start = row * stride;
            data[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src[src_start..src_start + row_bytes]);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        enc.scaler.run(&rgb_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(enc.frame_count as i64));

        enc.encoder.send_frame(&yuv_frame)?;
        enc.drain_packets()?;

        enc.frame_count += 1;
        Ok(())
    }

    fn poll_quit(&mut self, timeout: Duration) -> bool {
        self.quit.wait(timeout)
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(mut enc) = self.encoding.take() else {
            return Ok(());
        };
        enc.encoder.send_eof()?;
        enc.drain_packets()?;
        enc.octx.write_trailer()?;
        log::info!(
            "Wrote {} frames to {}",
            enc.frame_count,
            self.path.display()
        );
        Ok(())
    }
}

impl Encoding {
    fn drain_packets(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let ost_time_base = self
            .octx
            .stream(VIDEO_STREAM_INDEX)
            .ok_or("output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while self.encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(VIDEO_STREAM_INDEX);
            encoded.rescale_ts(self.time_base, ost_time_base);
            encoded.write_interleaved(&mut self.octx)?;
        }
        Ok(())
    }
}
