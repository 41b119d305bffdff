use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use moodlens_core::classification::domain::emotion_classifier::EmotionClassifier;
use moodlens_core::classification::infrastructure::onnx_emotion_classifier::OnnxEmotionClassifier;
use moodlens_core::detection::domain::face_detector::FaceDetector;
use moodlens_core::detection::infrastructure::onnx_grid_detector::OnnxGridDetector;
use moodlens_core::pipeline::inference_loop::InferenceLoop;
use moodlens_core::pipeline::pipeline_config::PipelineConfig;
use moodlens_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use moodlens_core::rendering::infrastructure::imageproc_annotator::ImageprocAnnotator;
use moodlens_core::shared::constants::{CLASSIFIER_MODEL_NAME, DETECTOR_MODEL_NAME};
use moodlens_core::shared::model_resolver::{self, ModelRequest};
use moodlens_core::video::domain::display_sink::DisplaySink;
use moodlens_core::video::domain::quit_signal::QuitSignal;
use moodlens_core::video::infrastructure::ffmpeg_frame_source::FfmpegFrameSource;
use moodlens_core::video::infrastructure::image_sequence_sink::ImageSequenceSink;
use moodlens_core::video::infrastructure::video_file_sink::VideoFileSink;

/// Real-time face detection and emotion recognition.
#[derive(Parser, Debug)]
#[command(name = "moodlens")]
struct Cli {
    /// Camera index, device path, video file or stream URL.
    #[arg(long, default_value = "0")]
    source: String,

    /// Face detector ONNX model (default: cached, bundled or downloaded).
    #[arg(long)]
    detector_model: Option<PathBuf>,

    /// Emotion classifier ONNX model (default: cached, bundled or downloaded).
    #[arg(long)]
    classifier_model: Option<PathBuf>,

    /// Directory searched for bundled models.
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Download URL for the detector model when it is not found locally.
    #[arg(long)]
    detector_url: Option<String>,

    /// Download URL for the classifier model when it is not found locally.
    #[arg(long)]
    classifier_url: Option<String>,

    /// JSON file with pipeline settings; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Detection confidence threshold (0.0-1.0).
    #[arg(long)]
    threshold: Option<f64>,

    /// Write the annotated stream to this video file.
    #[arg(long, conflicts_with = "frames_dir")]
    output: Option<PathBuf>,

    /// Write each annotated frame as an image into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Image format for --frames-dir (png, jpg, bmp, ...).
    #[arg(long, default_value = "png")]
    frame_format: String,

    /// TTF/OTF font for the emotion label.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let quit = QuitSignal::new();
    let handler_quit = quit.clone();
    ctrlc::set_handler(move || handler_quit.trigger())?;

    let mut sink = build_sink(&cli, quit)?;
    let detector = build_detector(&cli, &config)?;
    let classifier = build_classifier(&cli, &config)?;
    let annotator = match cli.font {
        Some(ref font) => ImageprocAnnotator::with_font(font)?,
        None => ImageprocAnnotator::new(),
    };

    let mut inference = InferenceLoop::new(
        detector,
        classifier,
        Box::new(annotator),
        config,
        Box::new(StdoutPipelineLogger::default()),
    )?;
    let mut source = FfmpegFrameSource::new(&cli.source);

    let report = inference.run(&mut source, sink.as_mut())?;
    println!(
        "{} frames, {} with a face, {} classified ({:?})",
        report.frames, report.faces, report.classified, report.stop_reason
    );
    Ok(())
}

/// Config file first, then flag overrides, then validation.
fn build_config(cli: &Cli) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut config = match cli.config {
        Some(ref path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    if cli.max_frames.is_some() {
        config.max_frames = cli.max_frames;
    }
    config.validate()?;
    Ok(config)
}

fn build_sink(
    cli: &Cli,
    quit: QuitSignal,
) -> Result<Box<dyn DisplaySink>, Box<dyn std::error::Error>> {
    match (&cli.output, &cli.frames_dir) {
        (Some(path), None) => Ok(Box::new(VideoFileSink::new(path, quit))),
        (None, Some(dir)) => Ok(Box::new(
            ImageSequenceSink::new(dir, quit).with_extension(&cli.frame_format)?,
        )),
        _ => Err("exactly one of --output or --frames-dir is required".into()),
    }
}

fn build_detector(
    cli: &Cli,
    config: &PipelineConfig,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let model_path = resolve_model(
        DETECTOR_MODEL_NAME,
        cli.detector_model.as_deref(),
        cli.models_dir.as_deref(),
        cli.detector_url.as_deref(),
    )?;
    log::info!("Detector model: {}", model_path.display());
    Ok(Box::new(OnnxGridDetector::new(
        &model_path,
        config.grid,
        config.detector_input,
    )?))
}

fn build_classifier(
    cli: &Cli,
    config: &PipelineConfig,
) -> Result<Box<dyn EmotionClassifier>, Box<dyn std::error::Error>> {
    let model_path = resolve_model(
        CLASSIFIER_MODEL_NAME,
        cli.classifier_model.as_deref(),
        cli.models_dir.as_deref(),
        cli.classifier_url.as_deref(),
    )?;
    log::info!("Classifier model: {}", model_path.display());
    Ok(Box::new(OnnxEmotionClassifier::new(
        &model_path,
        config.classifier_input,
    )?))
}

fn resolve_model(
    name: &str,
    explicit: Option<&Path>,
    bundled_dir: Option<&Path>,
    url: Option<&str>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let request = ModelRequest {
        explicit,
        bundled_dir,
        url,
        ..ModelRequest::named(name)
    };
    let label = name.to_string();
    let path = model_resolver::resolve(
        &request,
        Some(Box::new(move |downloaded: u64, total: u64| {
            download_progress(&label, downloaded, total)
        })),
    )?;
    Ok(path)
}

fn download_progress(name: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {name}... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading {name}... {downloaded} bytes");
    }
}
