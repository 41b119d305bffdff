pub mod onnx_grid_detector;
