pub mod check;
pub mod config;
pub mod replay;

use std::path::Path;

use facegest_common::error::{FacegestError, FacegestResult};
use facegest_signal_model::frame::{parse_frame_lines, parse_header, FaceFrame, RecordingHeader};

/// Read a landmark recording and its optional header line.
///
/// Malformed lines fail with a `Parse` error carrying the line number.
pub fn load_recording(path: &Path) -> FacegestResult<(Option<RecordingHeader>, Vec<FaceFrame>)> {
    if !path.exists() {
        return Err(FacegestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let frames = parse_frame_lines(&content)
        .map(|(line, frame)| frame.map_err(|e| FacegestError::parse(line, e.to_string())))
        .collect::<FacegestResult<Vec<_>>>()?;
    Ok((parse_header(&content), frames))
}
