use super::bounding_box::CenterBox;

/// One candidate box decoded from the detector grid.
///
/// Geometry is in absolute detector-input pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub bbox: CenterBox,
    pub confidence: f64,
    /// Grid cell the box was predicted by.
    pub row: usize,
    pub col: usize,
    /// Box index within the cell.
    pub slot: usize,
}

/// Picks the single most confident detection.
///
/// Frames are assumed to hold at most one face, so there is no
/// non-maximum suppression. On exact ties the earliest detection in the
/// slice wins; decoders emit row-major cell order, then slot order. NaN
/// confidences never win.
pub fn select_best(detections: &[Detection]) -> Option<Detection> {
    let mut best: Option<Detection> = None;
    for det in detections {
        if det.confidence.is_nan() {
            continue;
        }
        match best {
            Some(ref current) if det.confidence <= current.confidence => {}
            _ => best = Some(*det),
        }
    }
    best
}
