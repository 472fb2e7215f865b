//! Validate a landmark recording before replaying it.

use std::path::PathBuf;

use facegest_common::config::AppConfig;
use facegest_signal_model::landmark::LandmarkLayout;

use super::load_recording;

pub fn run(config: &AppConfig, path: PathBuf) -> anyhow::Result<()> {
    println!("Checking recording at: {}", path.display());

    let (header, frames) = load_recording(&path)?;
    let layout = LandmarkLayout::face_mesh();

    match &header {
        Some(h) => println!(
            "  Header: schema {}, detector {}, {} fps",
            h.schema_version, h.detector, h.fps
        ),
        None => println!("  Header: none"),
    }
    println!("  Frames: {}", frames.len());

    let mut issues = Vec::new();
    let mut face_frames = 0usize;
    let mut previous_ts = None;

    for (i, frame) in frames.iter().enumerate() {
        if let Some(prev) = previous_ts {
            if frame.timestamp_ns < prev {
                issues.push(format!(
                    "frame {i}: timestamp {} goes backwards (previous {prev})",
                    frame.timestamp_ns
                ));
            }
        }
        previous_ts = Some(frame.timestamp_ns);

        let Some(landmarks) = &frame.landmarks else {
            continue;
        };
        face_frames += 1;
        if let Some(index) = layout.first_missing(landmarks) {
            issues.push(format!(
                "frame {i}: landmark {index} missing ({} points)",
                landmarks.len()
            ));
        } else if landmarks.points().iter().any(|p| !p.is_finite()) {
            issues.push(format!("frame {i}: non-finite landmark coordinates"));
        }
    }

    println!("  Frames with a face: {face_frames}");
    if face_frames < config.gestures.calibration_frames as usize {
        println!(
            "  [WARN] Fewer face frames than the {}-frame brow calibration",
            config.gestures.calibration_frames
        );
    }

    if issues.is_empty() {
        println!("\nRecording is valid.");
        return Ok(());
    }

    println!("\nValidation issues:");
    for issue in &issues {
        println!("  - {issue}");
    }
    anyhow::bail!("{} issue(s) found", issues.len())
}
