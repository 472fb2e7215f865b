//! Synthetic FaceMesh-shaped landmark sets for tests.

use facegest_signal_model::landmark::{LandmarkLayout, LandmarkSet, Point2D};

/// Geometry knobs for a synthetic face. Eye widths are 0.1 and the mouth
/// is 0.16 wide, so the defaults give EAR 0.35, MAR 0.125 and brow 0.5.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub eye_gap: f64,
    pub mouth_gap: f64,
    /// Lid-to-brow vertical distance.
    pub brow_height: f64,
}

impl Default for Face {
    fn default() -> Self {
        Self {
            eye_gap: 0.035,
            mouth_gap: 0.02,
            brow_height: 0.05,
        }
    }
}

/// Build a 478-point set with the requested geometry.
pub fn face(shape: Face) -> LandmarkSet {
    let layout = LandmarkLayout::face_mesh();
    let mut points = vec![Point2D::new(0.5, 0.5); 478];
    let lid_y = 0.40;

    for (eye, side, cx) in [
        (&layout.left_eye, &layout.left_brow, 0.35),
        (&layout.right_eye, &layout.right_brow, 0.65),
    ] {
        points[eye.outer] = Point2D::new(cx - 0.05, lid_y);
        points[eye.inner] = Point2D::new(cx + 0.05, lid_y);
        for &i in &side.upper_lid {
            points[i] = Point2D::new(cx, lid_y - shape.eye_gap / 2.0);
        }
        points[eye.bottom] = Point2D::new(cx, lid_y + shape.eye_gap / 2.0);
        for &i in &side.brow {
            points[i] = Point2D::new(cx, lid_y - shape.eye_gap / 2.0 - shape.brow_height);
        }
    }

    points[layout.mouth.left] = Point2D::new(0.42, 0.70);
    points[layout.mouth.right] = Point2D::new(0.58, 0.70);
    points[layout.mouth.top] = Point2D::new(0.50, 0.70 - shape.mouth_gap / 2.0);
    points[layout.mouth.bottom] = Point2D::new(0.50, 0.70 + shape.mouth_gap / 2.0);

    LandmarkSet::new(points)
}

/// `shape` with both eye corners collapsed onto each other, as a detector
/// glitch produces. Every ratio normalized by eye width is unmeasurable.
pub fn collapsed_eyes(shape: Face) -> LandmarkSet {
    let layout = LandmarkLayout::face_mesh();
    let mut set = face(shape);
    for eye in [&layout.left_eye, &layout.right_eye] {
        let inner = set.points()[eye.inner];
        set.points_mut()[eye.outer] = inner;
    }
    set
}
