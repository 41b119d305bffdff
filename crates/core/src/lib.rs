pub mod classification {
    pub mod domain {
        pub mod emotion;
        pub mod emotion_classifier;
    }
    pub mod infrastructure {
        pub mod onnx_emotion_classifier;
    }
}

pub mod detection {
    pub mod domain {
        pub mod bounding_box;
        pub mod detection;
        pub mod face_detector;
        pub mod face_extractor;
        pub mod grid_decoder;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod inference_loop;
    pub mod pipeline_config;
    pub mod pipeline_error;
    pub mod pipeline_logger;
    pub mod throughput_meter;
}

pub mod rendering {
    pub mod domain {
        pub mod frame_annotator;
    }
    pub mod infrastructure {
        pub mod imageproc_annotator;
    }
}

pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod model_resolver;
    pub mod onnx_session;
    pub mod shape;
    pub mod video_metadata;
}

pub mod video {
    pub mod domain {
        pub mod display_sink;
        pub mod frame_source;
        pub mod quit_signal;
    }
    pub mod infrastructure {
        pub mod ffmpeg_frame_source;
        pub mod image_sequence_sink;
        pub mod video_file_sink;
    }
}
