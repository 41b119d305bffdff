use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_source::FrameSource;

/// Decodes frames from a camera, file or stream URL via ffmpeg-next
/// (libavdevice + libavformat + libavcodec).
///
/// Converts each decoded frame to RGB24 and wraps it in a [`Frame`].
pub struct FfmpegFrameSource {
    source: String,
    stream: Option<OpenStream>,
}

/// What ffmpeg is asked to open, and through which input device, if any.
#[derive(Debug, PartialEq, Eq)]
struct InputTarget {
    url: String,
    device_format: Option<&'static str>,
}

/// Everything that lives between `open` and `close`.
struct OpenStream {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    video_stream_index: usize,
    frame_index: usize,
    flushing: bool,
    done: bool,
}

impl FfmpegFrameSource {
    /// `source` is a camera index (`0`), a device path, a file path or a
    /// URL. On Windows a DirectShow source (`video=<device name>`) is also
    /// accepted.
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            stream: None,
        }
    }
}

/// Maps a bare camera index onto the platform capture device: v4l2 on
/// Linux, AVFoundation on macOS. Windows has no index addressing in
/// DirectShow, so an index is rejected there. Anything else is handed to
/// ffmpeg to probe.
fn resolve_input(source: &str) -> Result<InputTarget, String> {
    let trimmed = source.trim();
    if let Ok(index) = trimmed.parse::<u32>() {
        return camera_target(index);
    }
    Ok(named_device(trimmed).unwrap_or_else(|| InputTarget {
        url: source.to_string(),
        device_format: None,
    }))
}

#[cfg(target_os = "windows")]
fn named_device(source: &str) -> Option<InputTarget> {
    source.starts_with("video=").then(|| InputTarget {
        url: source.to_string(),
        device_format: Some("dshow"),
    })
}

#[cfg(not(target_os = "windows"))]
fn named_device(_source: &str) -> Option<InputTarget> {
    None
}

#[cfg(target_os = "linux")]
fn camera_target(index: u32) -> Result<InputTarget, String> {
    Ok(InputTarget {
        url: format!("/dev/video{index}"),
        device_format: Some("v4l2"),
    })
}

#[cfg(target_os = "macos")]
fn camera_target(index: u32) -> Result<InputTarget, String> {
    // "<video>:<audio>"; audio is not captured.
    Ok(InputTarget {
        url: format!("{index}:none"),
        device_format: Some("avfoundation"),
    })
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn camera_target(index: u32) -> Result<InputTarget, String> {
    Err(format!(
        "camera index {index} is not supported on this platform; \
         pass a device source such as video=<device name>"
    ))
}

fn open_input(
    target: &InputTarget,
) -> Result<ffmpeg_next::format::context::Input, Box<dyn std::error::Error>> {
    let Some(name) = target.device_format else {
        return Ok(ffmpeg_next::format::input(&target.url)?);
    };
    let device = ffmpeg_next::device::input::video()
        .find(|format| format.name() == name)
        .ok_or_else(|| format!("ffmpeg was built without the {name} input device"))?;
    let format = ffmpeg_next::format::format::Format::Input(device);
    match ffmpeg_next::format::open(&target.url, &format)? {
        ffmpeg_next::format::context::Context::Input(ictx) => Ok(ictx),
        ffmpeg_next::format::context::Context::Output(_) => {
            Err(format!("{name} opened {} as an output", target.url).into())
        }
    }
}

impl FrameSource for FfmpegFrameSource {
    fn open(&mut self) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;
        ffmpeg_next::device::register_all();

        let target = resolve_input(&self.source)?;
        let ictx = open_input(&target)
            .map_err(|e| format!("cannot open {}: {e}", target.url))?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let rate = stream.rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let width = decoder.width();
        let height = decoder.height();
        let metadata = VideoMetadata {
            width,
            height,
            fps,
            total_frames: stream.frames().max(0) as usize,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source: target.url.clone(),
        };

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::info!(
            "Opened {} ({}x{} @ {:.1} fps, {})",
            target.url,
            width,
            height,
            fps,
            metadata.codec
        );

        self.stream = Some(OpenStream {
            ictx,
            decoder,
            scaler,
            width,
            height,
            video_stream_index,
            frame_index: 0,
            flushing: false,
            done: false,
        });

        Ok(metadata)
    }

    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let stream = self
            .stream
            .as_mut()
            .ok_or("FfmpegFrameSource: not opened")?;
        stream.next_frame()
    }

    fn close(&mut self) {
        if self.stream.take().is_some() {
            log::debug!("Closed {}", self.source);
        }
    }
}

impl OpenStream {
    fn try_receive(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }
        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(&decoded, &mut rgb_frame)?;

        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        let frame = Frame::new(pixels, self.width, self.height, 3, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if self.done {
            return Ok(None);
        }

        if let Some(frame) = self.try_receive()? {
            return Ok(Some(frame));
        }

        if self.flushing {
            self.done = true;
            return Ok(None);
        }

        loop {
            let Some((stream, packet)) = self.ictx.packets().next() else {
                let _ = self.decoder.send_eof();
                self.flushing = true;
                if let Some(frame) = self.try_receive()? {
                    return Ok(Some(frame));
                }
                self.done = true;
                return Ok(None);
            };

            if stream.index() != self.video_stream_index {
                continue;
            }

            if self.decoder.send_packet(&packet).is_err() {
                continue;
            }

            if let Some(frame) = self.try_receive()? {
                return Ok(Some(frame));
            }
        }
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg frames may have padding bytes at the end of each row (stride > width*3).
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
