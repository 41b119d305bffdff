//! The capture → detect → classify → render loop.
//!
//! One frame is fully processed before the next is captured. The only state
//! kept across iterations is the previous capture time (for fps).

use std::time::Instant;

use crate::classification::domain::emotion_classifier::{emotion_from_scores, EmotionClassifier};
use crate::detection::domain::bounding_box::PixelBox;
use crate::detection::domain::detection::select_best;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_extractor::{
    display_region, face_crop_region, ExtractError, FaceExtractor,
};
use crate::rendering::domain::frame_annotator::{FrameAnnotator, Overlay};
use crate::shared::frame::Frame;
use crate::video::domain::display_sink::DisplaySink;
use crate::video::domain::frame_source::FrameSource;

use super::pipeline_config::PipelineConfig;
use super::pipeline_error::{ModelStage, PipelineError};
use super::pipeline_logger::PipelineLogger;
use super::throughput_meter::ThroughputMeter;

/// What happened to one frame before it was shown.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// No candidate reached the threshold; the raw frame is shown.
    NoFace,
    /// A face was found but its crop clipped to nothing; the raw frame is
    /// shown.
    EmptyCrop(PixelBox),
    /// The overlay was drawn onto the frame.
    Classified { overlay: Overlay, confidence: f64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    /// The source failed to yield a frame. Treated like end of stream.
    CaptureFailed(String),
    QuitRequested,
    FrameLimit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopReport {
    pub frames: usize,
    /// Frames where the best detection reached the threshold.
    pub faces: usize,
    pub classified: usize,
    pub stop_reason: StopReason,
}

/// Closes the source and sink exactly once, whichever way the loop exits.
struct OpenResources<'a> {
    source: &'a mut dyn FrameSource,
    sink: &'a mut dyn DisplaySink,
    sink_open: bool,
    released: bool,
}

impl<'a> OpenResources<'a> {
    fn new(source: &'a mut dyn FrameSource, sink: &'a mut dyn DisplaySink) -> Self {
        Self {
            source,
            sink,
            sink_open: false,
            released: false,
        }
    }

    /// Normal-exit release; a failing sink close is reported.
    fn release(mut self) -> Result<(), PipelineError> {
        self.released = true;
        self.source.close();
        if self.sink_open {
            self.sink.close().map_err(PipelineError::DisplayClose)?;
        }
        Ok(())
    }
}

impl Drop for OpenResources<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.source.close();
        if self.sink_open {
            if let Err(e) = self.sink.close() {
                log::warn!("Failed to close display: {e}");
            }
        }
    }
}

/// Owns the models and runs them over frames from a source.
pub struct InferenceLoop {
    detector: Box<dyn FaceDetector>,
    classifier: Box<dyn EmotionClassifier>,
    annotator: Box<dyn FrameAnnotator>,
    extractor: FaceExtractor,
    config: PipelineConfig,
    logger: Box<dyn PipelineLogger>,
}

impl InferenceLoop {
    /// Validates `config`. Face crops are sized to the classifier's input.
    pub fn new(
        detector: Box<dyn FaceDetector>,
        classifier: Box<dyn EmotionClassifier>,
        annotator: Box<dyn FrameAnnotator>,
        config: PipelineConfig,
        logger: Box<dyn PipelineLogger>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let extractor = FaceExtractor::new(classifier.input_shape());
        Ok(Self {
            detector,
            classifier,
            annotator,
            extractor,
            config,
            logger,
        })
    }

    /// Runs until the source is exhausted or fails, quit is requested, or
    /// the frame limit is hit. Source and sink are opened here and closed
    /// before returning, on success and on error.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn DisplaySink,
    ) -> Result<LoopReport, PipelineError> {
        let metadata = source.open().map_err(PipelineError::SourceOpen)?;
        let mut resources = OpenResources::new(source, sink);
        resources
            .sink
            .open(&metadata)
            .map_err(PipelineError::DisplayOpen)?;
        resources.sink_open = true;

        self.logger.info(&format!(
            "Running on {} ({}x{}), detector {}, classifier {}",
            metadata.source,
            metadata.width,
            metadata.height,
            self.detector.input_shape(),
            self.extractor.target()
        ));

        let mut meter = ThroughputMeter::new();
        let mut frames = 0;
        let mut faces = 0;
        let mut classified = 0;

        let stop_reason = loop {
            if self.config.max_frames.is_some_and(|max| frames >= max) {
                break StopReason::FrameLimit;
            }

            let t0 = Instant::now();
            let mut frame = match resources.source.read() {
                Ok(Some(frame)) => frame,
                Ok(None) => break StopReason::EndOfStream,
                Err(e) => {
                    log::warn!("Capture failed: {e}");
                    break StopReason::CaptureFailed(e.to_string());
                }
            };
            if let Some(fps) = meter.tick_at(t0) {
                self.logger.metric("fps", fps);
            }
            self.logger.timing("capture", elapsed_ms(t0));

            match self.process_frame(&mut frame)? {
                FrameOutcome::NoFace => {}
                FrameOutcome::EmptyCrop(_) => faces += 1,
                FrameOutcome::Classified { .. } => {
                    faces += 1;
                    classified += 1;
                }
            }

            let t = Instant::now();
            resources
                .sink
                .show(&frame)
                .map_err(|e| PipelineError::Display {
                    frame: frame.index(),
                    source: e,
                })?;
            self.logger.timing("display", elapsed_ms(t));

            frames += 1;
            self.logger.progress(frames, metadata.total_frames);

            if resources.sink.poll_quit(self.config.quit_poll()) {
                break StopReason::QuitRequested;
            }
        };

        resources.release()?;
        log::info!("Stopped after {frames} frames: {stop_reason:?}");
        self.logger.summary();

        Ok(LoopReport {
            frames,
            faces,
            classified,
            stop_reason,
        })
    }

    /// Detects, classifies and annotates one frame in place.
    ///
    /// Geometry flows detector pixels → frame pixels; the crop is squared
    /// from the box height, the drawn box is not.
    pub fn process_frame(&mut self, frame: &mut Frame) -> Result<FrameOutcome, PipelineError> {
        let index = frame.index();
        let t = Instant::now();
        let detections = self
            .detector
            .detect(frame)
            .map_err(|e| PipelineError::ModelExecution {
                stage: ModelStage::Detector,
                frame: index,
                source: e,
            })?;
        self.logger.timing("detect", elapsed_ms(t));

        let Some(best) = select_best(&detections) else {
            return Ok(FrameOutcome::NoFace);
        };
        if best.confidence < self.config.threshold {
            log::trace!("Frame {index}: best confidence {:.3} below threshold", best.confidence);
            return Ok(FrameOutcome::NoFace);
        }

        let detector_shape = self.detector.input_shape();
        let frame_shape = frame.shape();
        let crop = face_crop_region(&best.bbox, detector_shape, frame_shape);

        let t = Instant::now();
        let face = match self.extractor.extract(frame, crop) {
            Ok(face) => face,
            Err(ExtractError::EmptyRegion(region)) => {
                log::debug!("Frame {index}: face crop {region:?} is empty, skipping");
                return Ok(FrameOutcome::EmptyCrop(region));
            }
            Err(e) => {
                return Err(PipelineError::Extraction {
                    frame: index,
                    source: e,
                })
            }
        };
        self.logger.timing("extract", elapsed_ms(t));

        let t = Instant::now();
        let classifier_err = |source: Box<dyn std::error::Error>| PipelineError::ModelExecution {
            stage: ModelStage::Classifier,
            frame: index,
            source,
        };
        let scores = self.classifier.scores(&face).map_err(classifier_err)?;
        let emotion =
            emotion_from_scores(&scores).map_err(|e| classifier_err(Box::new(e)))?;
        self.logger.timing("classify", elapsed_ms(t));

        let overlay = Overlay {
            region: display_region(&best.bbox, detector_shape, frame_shape),
            emotion,
        };
        let t = Instant::now();
        self.annotator
            .annotate(frame, &overlay)
            .map_err(|e| PipelineError::Annotation {
                frame: index,
                source: e,
            })?;
        self.logger.timing("annotate", elapsed_ms(t));

        log::debug!(
            "Frame {index}: {emotion} at {:?} (confidence {:.2})",
            overlay.region,
            best.confidence
        );
        Ok(FrameOutcome::Classified {
            overlay,
            confidence: best.confidence,
        })
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::domain::emotion::Emotion;
    use crate::detection::domain::bounding_box::CenterBox;
    use crate::detection::domain::detection::Detection;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::shape::Shape;
    use crate::shared::video_metadata::VideoMetadata;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    // ── Stubs ────────────────────────────────────────────────────────

    enum DetectorScript {
        Boxes(Vec<Detection>),
        Fail,
    }

    struct StubDetector {
        script: DetectorScript,
    }

    impl FaceDetector for StubDetector {
        fn input_shape(&self) -> Shape {
            Shape::square(320)
        }

        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            match self.script {
                DetectorScript::Boxes(ref boxes) => Ok(boxes.clone()),
                DetectorScript::Fail => Err("session run failed".into()),
            }
        }
    }

    #[derive(Default)]
    struct ClassifierLog {
        calls: usize,
        faces: Vec<(u32, u32, u8)>,
    }

    struct StubClassifier {
        scores: Vec<f32>,
        log: Arc<Mutex<ClassifierLog>>,
    }

    impl EmotionClassifier for StubClassifier {
        fn input_shape(&self) -> Shape {
            Shape::square(64)
        }

        fn scores(&mut self, face: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
            let mut log = self.log.lock().unwrap();
            log.calls += 1;
            log.faces.push((face.width(), face.height(), face.channels()));
            Ok(self.scores.clone())
        }
    }

    /// Records overlays and marks pixel (0, 0) so tests can tell annotated
    /// frames from raw ones.
    struct StubAnnotator {
        overlays: Rc<RefCell<Vec<Overlay>>>,
    }

    impl FrameAnnotator for StubAnnotator {
        fn annotate(
            &self,
            frame: &mut Frame,
            overlay: &Overlay,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.overlays.borrow_mut().push(*overlay);
            frame.data_mut()[0] = 255;
            Ok(())
        }
    }

    struct StubSource {
        frames: VecDeque<Result<Option<Frame>, String>>,
        endless: Option<Frame>,
        fail_open: bool,
        closes: Rc<RefCell<usize>>,
    }

    impl StubSource {
        fn new(frames: Vec<Result<Option<Frame>, String>>) -> Self {
            Self {
                frames: frames.into(),
                endless: None,
                fail_open: false,
                closes: Rc::new(RefCell::new(0)),
            }
        }

        fn endless(frame: Frame) -> Self {
            Self {
                endless: Some(frame),
                ..Self::new(Vec::new())
            }
        }
    }

    impl FrameSource for StubSource {
        fn open(&mut self) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
            if self.fail_open {
                return Err("no such device".into());
            }
            Ok(VideoMetadata {
                width: 640,
                height: 480,
                fps: 30.0,
                total_frames: 0,
                codec: "rawvideo".to_string(),
                source: "stub".to_string(),
            })
        }

        fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            if let Some(ref frame) = self.endless {
                return Ok(Some(frame.clone()));
            }
            match self.frames.pop_front() {
                Some(Ok(frame)) => Ok(frame),
                Some(Err(e)) => Err(e.into()),
                None => Ok(None),
            }
        }

        fn close(&mut self) {
            *self.closes.borrow_mut() += 1;
        }
    }

    #[derive(Default)]
    struct StubSink {
        shown: Vec<Frame>,
        opens: usize,
        closes: usize,
        quit_after: Option<usize>,
        fail_open: bool,
        fail_show: bool,
    }

    impl DisplaySink for StubSink {
        fn open(&mut self, _metadata: &VideoMetadata) -> Result<(), Box<dyn std::error::Error>> {
            self.opens += 1;
            if self.fail_open {
                return Err("output not writable".into());
            }
            Ok(())
        }

        fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail_show {
                return Err("window closed".into());
            }
            self.shown.push(frame.clone());
            Ok(())
        }

        fn poll_quit(&mut self, _timeout: Duration) -> bool {
            self.quit_after.is_some_and(|n| self.shown.len() >= n)
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.closes += 1;
            Ok(())
        }
    }

    // ── Harness ──────────────────────────────────────────────────────

    struct Harness {
        inference: InferenceLoop,
        classifier_log: Arc<Mutex<ClassifierLog>>,
        overlays: Rc<RefCell<Vec<Overlay>>>,
    }

    fn harness(script: DetectorScript, scores: Vec<f32>, config: PipelineConfig) -> Harness {
        let classifier_log = Arc::new(Mutex::new(ClassifierLog::default()));
        let overlays = Rc::new(RefCell::new(Vec::new()));
        let inference = InferenceLoop::new(
            Box::new(StubDetector { script }),
            Box::new(StubClassifier {
                scores,
                log: classifier_log.clone(),
            }),
            Box::new(StubAnnotator {
                overlays: overlays.clone(),
            }),
            config,
            Box::new(NullPipelineLogger),
        )
        .unwrap();
        Harness {
            inference,
            classifier_log,
            overlays,
        }
    }

    fn detection(x: f64, y: f64, w: f64, h: f64, confidence: f64) -> Detection {
        Detection {
            bbox: CenterBox::new(x, y, w, h),
            confidence,
            row: 0,
            col: 0,
            slot: 0,
        }
    }

    fn gray_frame(index: usize) -> Frame {
        Frame::new(vec![90u8; 640 * 480 * 3], 640, 480, 3, index)
    }

    const HAPPY: [f32; 4] = [0.1, 0.6, 0.2, 0.1];

    // ── Scenarios ────────────────────────────────────────────────────

    #[test]
    fn test_below_threshold_renders_raw_frame_without_classifying() {
        let mut h = harness(
            DetectorScript::Boxes(vec![detection(160.0, 160.0, 40.0, 60.0, 0.35)]),
            HAPPY.to_vec(),
            PipelineConfig::default(),
        );
        let mut source = StubSource::new(vec![Ok(Some(gray_frame(0)))]);
        let mut sink = StubSink::default();

        let report = h.inference.run(&mut source, &mut sink).unwrap();

        assert_eq!(report.frames, 1);
        assert_eq!(report.faces, 0);
        assert_eq!(report.classified, 0);
        assert_eq!(report.stop_reason, StopReason::EndOfStream);
        assert_eq!(h.classifier_log.lock().unwrap().calls, 0);
        assert!(h.overlays.borrow().is_empty());
        assert_eq!(sink.shown.len(), 1);
        assert_eq!(sink.shown[0].data(), gray_frame(0).data());
    }

    #[test]
    fn test_confident_face_is_classified_and_drawn() {
        let mut h = harness(
            DetectorScript::Boxes(vec![
                detection(20.0, 20.0, 10.0, 10.0, 0.2),
                detection(160.0, 160.0, 40.0, 60.0, 0.9),
            ]),
            HAPPY.to_vec(),
            PipelineConfig::default(),
        );
        let mut frame = gray_frame(3);

        let outcome = h.inference.process_frame(&mut frame).unwrap();

        let expected = Overlay {
            region: PixelBox::new(280, 195, 360, 285),
            emotion: Emotion::Happy,
        };
        assert_eq!(
            outcome,
            FrameOutcome::Classified {
                overlay: expected,
                confidence: 0.9
            }
        );
        let log = h.classifier_log.lock().unwrap();
        assert_eq!(log.calls, 1);
        assert_eq!(log.faces, vec![(64, 64, 1)]);
        assert_eq!(h.overlays.borrow().as_slice(), &[expected]);
        assert_eq!(frame.data()[0], 255);
    }

    #[test]
    fn test_confidence_equal_to_threshold_is_a_face() {
        let mut h = harness(
            DetectorScript::Boxes(vec![detection(160.0, 160.0, 40.0, 60.0, 0.4)]),
            HAPPY.to_vec(),
            PipelineConfig::default(),
        );
        let outcome = h.inference.process_frame(&mut gray_frame(0)).unwrap();
        assert!(matches!(outcome, FrameOutcome::Classified { .. }));
    }

    #[test]
    fn test_no_detections_is_no_face() {
        let mut h = harness(
            DetectorScript::Boxes(Vec::new()),
            HAPPY.to_vec(),
            PipelineConfig::default(),
        );
        let outcome = h.inference.process_frame(&mut gray_frame(0)).unwrap();
        assert_eq!(outcome, FrameOutcome::NoFace);
    }

    #[test]
    fn test_edge_box_with_empty_crop_renders_raw_frame() {
        let mut h = harness(
            DetectorScript::Boxes(vec![detection(-40.0, 160.0, 20.0, 30.0, 0.95)]),
            HAPPY.to_vec(),
            PipelineConfig::default(),
        );
        let mut source = StubSource::new(vec![Ok(Some(gray_frame(0))), Ok(Some(gray_frame(1)))]);
        let mut sink = StubSink::default();

        let report = h.inference.run(&mut source, &mut sink).unwrap();

        assert_eq!(report.frames, 2);
        assert_eq!(report.faces, 2);
        assert_eq!(report.classified, 0);
        assert_eq!(h.classifier_log.lock().unwrap().calls, 0);
        assert!(sink.shown.iter().all(|f| f.data()[0] == 90));
    }

    #[test]
    fn test_camera_failing_on_first_read_stops_cleanly() {
        let mut h = harness(
            DetectorScript::Boxes(Vec::new()),
            HAPPY.to_vec(),
            PipelineConfig::default(),
        );
        let mut source = StubSource::new(vec![Err("device unplugged".to_string())]);
        let closes = source.closes.clone();
        let mut sink = StubSink::default();

        let report = h.inference.run(&mut source, &mut sink).unwrap();

        assert_eq!(report.frames, 0);
        assert_eq!(
            report.stop_reason,
            StopReason::CaptureFailed("device unplugged".to_string())
        );
        assert_eq!(*closes.borrow(), 1);
        assert_eq!(sink.opens, 1);
        assert_eq!(sink.closes, 1);
        assert!(sink.shown.is_empty());
    }

    #[test]
    fn test_detector_failure_is_fatal_and_releases_resources() {
        let mut h = harness(DetectorScript::Fail, HAPPY.to_vec(), PipelineConfig::default());
        let mut source = StubSource::new(vec![Ok(Some(gray_frame(7)))]);
        let closes = source.closes.clone();
        let mut sink = StubSink::default();

        let err = h.inference.run(&mut source, &mut sink).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::ModelExecution {
                stage: ModelStage::Detector,
                frame: 7,
                ..
            }
        ));
        assert_eq!(*closes.borrow(), 1);
        assert_eq!(sink.closes, 1);
        assert!(sink.shown.is_empty());
    }

    #[test]
    fn test_classifier_with_wrong_score_count_is_fatal() {
        let mut h = harness(
            DetectorScript::Boxes(vec![detection(160.0, 160.0, 40.0, 60.0, 0.9)]),
            vec![0.5, 0.5],
            PipelineConfig::default(),
        );
        let err = h.inference.process_frame(&mut gray_frame(2)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ModelExecution {
                stage: ModelStage::Classifier,
                frame: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_display_failure_is_fatal_and_releases_resources() {
        let mut h = harness(
            DetectorScript::Boxes(Vec::new()),
            HAPPY.to_vec(),
            PipelineConfig::default(),
        );
        let mut source = StubSource::new(vec![Ok(Some(gray_frame(0)))]);
        let closes = source.closes.clone();
        let mut sink = StubSink {
            fail_show: true,
            ..StubSink::default()
        };

        let err = h.inference.run(&mut source, &mut sink).unwrap_err();

        assert!(matches!(err, PipelineError::Display { frame: 0, .. }));
        assert_eq!(*closes.borrow(), 1);
        assert_eq!(sink.closes, 1);
    }

    #[test]
    fn test_quit_request_stops_between_frames() {
        let mut h = harness(
            DetectorScript::Boxes(Vec::new()),
            HAPPY.to_vec(),
            PipelineConfig::default(),
        );
        let mut source = StubSource::endless(gray_frame(0));
        let mut sink = StubSink {
            quit_after: Some(3),
            ..StubSink::default()
        };

        let report = h.inference.run(&mut source, &mut sink).unwrap();

        assert_eq!(report.frames, 3);
        assert_eq!(report.stop_reason, StopReason::QuitRequested);
        assert_eq!(sink.closes, 1);
    }

    #[test]
    fn test_frame_limit() {
        let config = PipelineConfig {
            max_frames: Some(4),
            ..PipelineConfig::default()
        };
        let mut h = harness(DetectorScript::Boxes(Vec::new()), HAPPY.to_vec(), config);
        let mut source = StubSource::endless(gray_frame(0));
        let mut sink = StubSink::default();

        let report = h.inference.run(&mut source, &mut sink).unwrap();

        assert_eq!(report.frames, 4);
        assert_eq!(report.stop_reason, StopReason::FrameLimit);
    }

    #[test]
    fn test_source_open_failure_touches_nothing() {
        let mut h = harness(
            DetectorScript::Boxes(Vec::new()),
            HAPPY.to_vec(),
            PipelineConfig::default(),
        );
        let mut source = StubSource {
            fail_open: true,
            ..StubSource::new(Vec::new())
        };
        let mut sink = StubSink::default();

        let err = h.inference.run(&mut source, &mut sink).unwrap_err();

        assert!(matches!(err, PipelineError::SourceOpen(_)));
        assert_eq!(sink.opens, 0);
        assert_eq!(sink.closes, 0);
    }

    #[test]
    fn test_display_open_failure_releases_source() {
        let mut h = harness(
            DetectorScript::Boxes(Vec::new()),
            HAPPY.to_vec(),
            PipelineConfig::default(),
        );
        let mut source = StubSource::new(vec![Ok(Some(gray_frame(0)))]);
        let closes = source.closes.clone();
        let mut sink = StubSink {
            fail_open: true,
            ..StubSink::default()
        };

        let err = h.inference.run(&mut source, &mut sink).unwrap_err();

        assert!(matches!(err, PipelineError::DisplayOpen(_)));
        assert_eq!(*closes.borrow(), 1);
        assert_eq!(sink.closes, 0);
        assert!(sink.shown.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_before_loop() {
        let config = PipelineConfig {
            threshold: 2.0,
            ..PipelineConfig::default()
        };
        let result = InferenceLoop::new(
            Box::new(StubDetector {
                script: DetectorScript::Boxes(Vec::new()),
            }),
            Box::new(StubClassifier {
                scores: HAPPY.to_vec(),
                log: Arc::default(),
            }),
            Box::new(StubAnnotator {
                overlays: Rc::default(),
            }),
            config,
            Box::new(NullPipelineLogger),
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_mixed_frames_are_counted() {
        // Frame 0 confident, frame 1 end of stream.
        let mut h = harness(
            DetectorScript::Boxes(vec![detection(160.0, 160.0, 40.0, 60.0, 0.9)]),
            HAPPY.to_vec(),
            PipelineConfig::default(),
        );
        let mut source = StubSource::new(vec![Ok(Some(gray_frame(0))), Ok(None)]);
        let mut sink = StubSink::default();

        let report = h.inference.run(&mut source, &mut sink).unwrap();

        assert_eq!(
            report,
            LoopReport {
                frames: 1,
                faces: 1,
                classified: 1,
                stop_reason: StopReason::EndOfStream,
            }
        );
        assert_eq!(sink.shown[0].data()[0], 255);
    }
}
