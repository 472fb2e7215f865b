//! Facial landmark points and the anatomical index layout.
//!
//! All coordinates are normalized to `[0.0, 1.0]` relative to the image:
//! `(0.0, 0.0)` is top-left and `y` grows downward.

use serde::{Deserialize, Serialize};

/// A 2D normalized point.
///
/// Extra fields emitted by detectors (e.g. a `z` depth) are ignored on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The ordered landmark points for one detected face in one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Point2D>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    /// Point at a detector index, if present.
    pub fn get(&self, index: usize) -> Option<&Point2D> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Mutable access for hosts that build frames incrementally.
    pub fn points_mut(&mut self) -> &mut Vec<Point2D> {
        &mut self.points
    }
}

impl From<Vec<Point2D>> for LandmarkSet {
    fn from(points: Vec<Point2D>) -> Self {
        Self::new(points)
    }
}

/// Indices of the four points describing one eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeIndices {
    /// Corner furthest from the nose.
    pub outer: usize,
    /// Corner nearest the nose.
    pub inner: usize,
    /// Middle of the upper lid.
    pub top: usize,
    /// Middle of the lower lid.
    pub bottom: usize,
}

/// Indices of the four points describing the inner lip contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouthIndices {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

/// Brow and upper-lid points averaged for one side of the face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowIndices {
    pub brow: Vec<usize>,
    pub upper_lid: Vec<usize>,
}

/// Fixed mapping from anatomical features to detector point indices.
///
/// Shared with the landmark provider's point numbering scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkLayout {
    pub left_eye: EyeIndices,
    pub right_eye: EyeIndices,
    pub mouth: MouthIndices,
    pub left_brow: BrowIndices,
    pub right_brow: BrowIndices,
}

impl LandmarkLayout {
    /// MediaPipe FaceMesh numbering (468/478 point mesh).
    pub fn face_mesh() -> Self {
        Self {
            left_eye: EyeIndices {
                outer: 33,
                inner: 133,
                top: 159,
                bottom: 145,
            },
            right_eye: EyeIndices {
                outer: 263,
                inner: 362,
                top: 386,
                bottom: 374,
            },
            mouth: MouthIndices {
                left: 78,
                right: 308,
                top: 13,
                bottom: 14,
            },
            left_brow: BrowIndices {
                brow: vec![65, 66, 70],
                upper_lid: vec![159, 160, 161],
            },
            right_brow: BrowIndices {
                brow: vec![295, 296, 300],
                upper_lid: vec![386, 387, 388],
            },
        }
    }

    /// Every index the layout reads, in no particular order.
    pub fn required_indices(&self) -> Vec<usize> {
        let eye = |e: &EyeIndices| [e.outer, e.inner, e.top, e.bottom];
        let mut indices = Vec::with_capacity(28);
        indices.extend(eye(&self.left_eye));
        indices.extend(eye(&self.right_eye));
        indices.extend([
            self.mouth.left,
            self.mouth.right,
            self.mouth.top,
            self.mouth.bottom,
        ]);
        for side in [&self.left_brow, &self.right_brow] {
            indices.extend(side.brow.iter().copied());
            indices.extend(side.upper_lid.iter().copied());
        }
        indices
    }

    /// Smallest landmark count that satisfies the layout.
    pub fn min_points(&self) -> usize {
        self.required_indices()
            .into_iter()
            .max()
            .map_or(0, |max| max + 1)
    }

    /// First required index missing from `landmarks`, if any.
    pub fn first_missing(&self, landmarks: &LandmarkSet) -> Option<usize> {
        self.required_indices()
            .into_iter()
            .filter(|&i| i >= landmarks.len())
            .min()
    }
}

impl Default for LandmarkLayout {
    fn default() -> Self {
        Self::face_mesh()
    }
}
