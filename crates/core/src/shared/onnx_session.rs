use std::path::Path;

use ort::session::Session;
use ort::value::ValueType;

use super::shape::Shape;

/// Return the preferred ONNX execution providers for the current platform.
///
/// Falls back to CPU if the platform-specific provider is unavailable.
pub fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

/// Builds a session on the preferred providers with one intra-op thread
/// per available core.
pub fn load_session(model_path: &Path) -> Result<Session, Box<dyn std::error::Error>> {
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    log::debug!(
        "Loading {} ({threads} intra-op threads)",
        model_path.display()
    );
    let session = Session::builder()?
        .with_execution_providers(preferred_execution_providers())?
        .with_intra_threads(threads)?
        .commit_from_file(model_path)?;
    Ok(session)
}

/// Spatial size of the first input, read from an NCHW shape.
///
/// `None` when the model declares dynamic height or width.
pub fn static_input_shape(session: &Session) -> Option<Shape> {
    let input = session.inputs().first()?;
    if let ValueType::Tensor { ref shape, .. } = input.dtype() {
        if shape.len() >= 4 && shape[2] > 0 && shape[3] > 0 {
            return Some(Shape::new(shape[3] as u32, shape[2] as u32));
        }
    }
    None
}
