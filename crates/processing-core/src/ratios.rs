//! Geometric ratios derived from facial landmarks.
//!
//! Each ratio divides a vertical distance by a horizontal one so the result
//! is independent of how far the face is from the camera:
//!
//! - **EAR** (eye aspect ratio): lid gap over eye width, averaged over both eyes.
//! - **MAR** (mouth aspect ratio): lip gap over mouth width.
//! - **Brow ratio:** vertical lid-to-brow distance over eye width, averaged
//!   over both sides. Image `y` grows downward, so the distance is taken as
//!   `lid_y - brow_y` and grows as the brow is raised.
//!
//! A zero or non-finite denominator makes that ratio degenerate for the
//! frame. [`RatioExtractor::sample`] reports it as `None` so the session can
//! leave the channel untouched; the flattened [`GestureSignal`] shows `0`.

use facegest_common::error::{FacegestError, FacegestResult};
use facegest_signal_model::gesture::{GestureSignal, RatioSample};
use facegest_signal_model::landmark::{
    BrowIndices, EyeIndices, LandmarkLayout, LandmarkSet, MouthIndices, Point2D,
};

/// Converts a landmark set into the three gesture ratios.
#[derive(Debug, Clone, Default)]
pub struct RatioExtractor {
    layout: LandmarkLayout,
}

impl RatioExtractor {
    pub fn new(layout: LandmarkLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LandmarkLayout {
        &self.layout
    }

    /// Measure EAR, MAR and brow ratio for one frame.
    ///
    /// Fails with `InsufficientLandmarks` if the set is shorter than the
    /// layout requires; no partial sample is produced. A channel whose
    /// geometry is degenerate is `None`.
    pub fn sample(&self, landmarks: &LandmarkSet) -> FacegestResult<RatioSample> {
        if let Some(index) = self.layout.first_missing(landmarks) {
            return Err(FacegestError::insufficient_landmarks(
                index,
                landmarks.len(),
            ));
        }

        // Either eye collapsing makes the average meaningless.
        let left_ear = checked_eye_ratio(landmarks, &self.layout.left_eye)?;
        let right_ear = checked_eye_ratio(landmarks, &self.layout.right_eye)?;

        Ok(RatioSample {
            ear: left_ear.zip(right_ear).map(|(l, r)| (l + r) / 2.0),
            mar: checked_mouth_ratio(landmarks, &self.layout.mouth)?,
            brow: checked_brow_ratio(landmarks, &self.layout)?,
        })
    }

    /// [`Self::sample`] flattened, degenerate channels reading `0`.
    pub fn extract(&self, landmarks: &LandmarkSet) -> FacegestResult<GestureSignal> {
        Ok(self.sample(landmarks)?.to_signal())
    }
}

/// Lid gap over corner-to-corner width for one eye, `0` when degenerate.
pub fn eye_aspect_ratio(landmarks: &LandmarkSet, eye: &EyeIndices) -> FacegestResult<f64> {
    Ok(checked_eye_ratio(landmarks, eye)?.unwrap_or(0.0))
}

/// Lip gap over corner-to-corner width, `0` when degenerate.
pub fn mouth_aspect_ratio(landmarks: &LandmarkSet, mouth: &MouthIndices) -> FacegestResult<f64> {
    Ok(checked_mouth_ratio(landmarks, mouth)?.unwrap_or(0.0))
}

/// Brow elevation over the upper lid, normalized by eye width and averaged
/// over both sides. `0` if either eye width is degenerate.
pub fn brow_ratio(landmarks: &LandmarkSet, layout: &LandmarkLayout) -> FacegestResult<f64> {
    Ok(checked_brow_ratio(landmarks, layout)?.unwrap_or(0.0))
}

fn checked_eye_ratio(landmarks: &LandmarkSet, eye: &EyeIndices) -> FacegestResult<Option<f64>> {
    let vertical = point(landmarks, eye.top)?.distance_to(&point(landmarks, eye.bottom)?);
    Ok(checked_ratio(vertical, eye_width(landmarks, eye)?))
}

fn checked_mouth_ratio(
    landmarks: &LandmarkSet,
    mouth: &MouthIndices,
) -> FacegestResult<Option<f64>> {
    let vertical = point(landmarks, mouth.top)?.distance_to(&point(landmarks, mouth.bottom)?);
    let horizontal = point(landmarks, mouth.left)?.distance_to(&point(landmarks, mouth.right)?);
    Ok(checked_ratio(vertical, horizontal))
}

fn checked_brow_ratio(
    landmarks: &LandmarkSet,
    layout: &LandmarkLayout,
) -> FacegestResult<Option<f64>> {
    let left = brow_elevation(landmarks, &layout.left_brow)?;
    let right = brow_elevation(landmarks, &layout.right_brow)?;
    let left = checked_ratio(left, eye_width(landmarks, &layout.left_eye)?);
    let right = checked_ratio(right, eye_width(landmarks, &layout.right_eye)?);

    Ok(left
        .zip(right)
        .map(|(l, r)| (l + r) / 2.0)
        .filter(|ratio| ratio.is_finite()))
}

fn eye_width(landmarks: &LandmarkSet, eye: &EyeIndices) -> FacegestResult<f64> {
    Ok(point(landmarks, eye.outer)?.distance_to(&point(landmarks, eye.inner)?))
}

/// `lid_mean_y - brow_mean_y`: positive when the brow sits above the lid.
fn brow_elevation(landmarks: &LandmarkSet, side: &BrowIndices) -> FacegestResult<f64> {
    Ok(mean_y(landmarks, &side.upper_lid)? - mean_y(landmarks, &side.brow)?)
}

fn mean_y(landmarks: &LandmarkSet, indices: &[usize]) -> FacegestResult<f64> {
    let mut sum = 0.0;
    for &i in indices {
        sum += point(landmarks, i)?.y;
    }
    Ok(sum / indices.len() as f64)
}

fn point(landmarks: &LandmarkSet, index: usize) -> FacegestResult<Point2D> {
    landmarks
        .get(index)
        .copied()
        .ok_or_else(|| FacegestError::insufficient_landmarks(index, landmarks.len()))
}

fn checked_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if !denominator.is_finite() || denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator).filter(|ratio| ratio.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{collapsed_eyes, face, Face};
    use proptest::prelude::*;

    #[test]
    fn test_ratios_of_known_geometry() {
        let signal = RatioExtractor::default().extract(&face(Face::default())).unwrap();
        assert!((signal.ear - 0.35).abs() < 1e-9, "ear={}", signal.ear);
        assert!((signal.mar - 0.125).abs() < 1e-9, "mar={}", signal.mar);
        assert!((signal.brow - 0.5).abs() < 1e-9, "brow={}", signal.brow);
    }

    #[test]
    fn test_closed_eyes_lower_ear() {
        let extractor = RatioExtractor::default();
        let open = extractor.extract(&face(Face::default())).unwrap();
        let closed = extractor
            .extract(&face(Face {
                eye_gap: 0.005,
                ..Default::default()
            }))
            .unwrap();
        assert!(closed.ear < open.ear);
        assert!(closed.ear < 0.25);
    }

    #[test]
    fn test_raised_brow_increases_ratio() {
        let extractor = RatioExtractor::default();
        let neutral = extractor.extract(&face(Face::default())).unwrap();
        let raised = extractor
            .extract(&face(Face {
                brow_height: 0.06,
                ..Default::default()
            }))
            .unwrap();
        assert!(raised.brow > neutral.brow);
    }

    #[test]
    fn test_missing_landmarks_rejected() {
        let short = LandmarkSet::new(vec![Point2D::new(0.5, 0.5); 120]);
        let err = RatioExtractor::default().extract(&short).unwrap_err();
        assert!(matches!(
            err,
            FacegestError::InsufficientLandmarks {
                index: 133,
                available: 120
            }
        ));
    }

    #[test]
    fn test_one_collapsed_eye_marks_ear_and_brow_degenerate() {
        let layout = LandmarkLayout::face_mesh();
        let mut set = face(Face::default());
        let inner = set.points()[layout.left_eye.inner];
        set.points_mut()[layout.left_eye.outer] = inner;

        let sample = RatioExtractor::default().sample(&set).unwrap();
        assert_eq!(sample.ear, None);
        assert_eq!(sample.brow, None);
        assert!((sample.mar.unwrap() - 0.125).abs() < 1e-9);

        let signal = RatioExtractor::default().extract(&set).unwrap();
        assert_eq!((signal.ear, signal.brow), (0.0, 0.0));
        assert!(signal.is_finite());
    }

    #[test]
    fn test_both_eyes_collapsed() {
        let sample = RatioExtractor::default()
            .sample(&collapsed_eyes(Face::default()))
            .unwrap();
        assert_eq!((sample.ear, sample.brow), (None, None));
        assert!(sample.mar.is_some());
    }

    #[test]
    fn test_non_finite_eye_width_zeroes_brow() {
        let layout = LandmarkLayout::face_mesh();
        let mut set = face(Face::default());
        set.points_mut()[layout.right_eye.outer] = Point2D::new(f64::INFINITY, 0.4);

        let sample = RatioExtractor::default().sample(&set).unwrap();
        assert_eq!(sample.brow, None);
        assert_eq!(brow_ratio(&set, &layout).unwrap(), 0.0);
        assert!(sample.to_signal().is_finite());
    }

    #[test]
    fn test_collapsed_mouth_width_zeroes_mar() {
        let layout = LandmarkLayout::face_mesh();
        let mut set = face(Face::default());
        let left = set.points()[layout.mouth.left];
        set.points_mut()[layout.mouth.right] = left;

        let sample = RatioExtractor::default().sample(&set).unwrap();
        assert_eq!(sample.mar, None);
        assert!(sample.ear.is_some());
        assert_eq!(mouth_aspect_ratio(&set, &layout.mouth).unwrap(), 0.0);
    }

    #[test]
    fn test_closed_eye_is_not_degenerate() {
        // Zero lid gap is a real measurement, only the width can collapse.
        let sample = RatioExtractor::default()
            .sample(&face(Face {
                eye_gap: 0.0,
                ..Default::default()
            }))
            .unwrap();
        assert_eq!(sample.ear, Some(0.0));
    }

    proptest! {
        #[test]
        fn prop_ratios_are_finite(
            coords in proptest::collection::vec((0.0f64..=1.0, 0.0f64..=1.0), 478)
        ) {
            let set = LandmarkSet::new(
                coords.into_iter().map(|(x, y)| Point2D::new(x, y)).collect(),
            );
            let signal = RatioExtractor::default().extract(&set).unwrap();
            prop_assert!(signal.is_finite());
        }

        #[test]
        fn prop_brow_tracks_height(height in 0.01f64..0.1) {
            let set = face(Face { brow_height: height, ..Default::default() });
            let signal = RatioExtractor::default().extract(&set).unwrap();
            // eye width is 0.1 on both sides
            prop_assert!((signal.brow - height / 0.1).abs() < 1e-9);
        }
    }
}
