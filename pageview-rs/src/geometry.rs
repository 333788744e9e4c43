//! Rotation math shared by the transformer and the page's inverse mapping.

/// Rotation pivot for [`ImageTransformer::rotate`](crate::ImageTransformer::rotate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pivot {
    /// Top-left corner of the image.
    #[default]
    Origin,
    /// Center of the image.
    Center,
}

impl Pivot {
    pub(crate) fn point(self, width: f64, height: f64) -> (f64, f64) {
        match self {
            Pivot::Origin => (0.0, 0.0),
            Pivot::Center => (width / 2.0, height / 2.0),
        }
    }
}

/// Cosine and sine of a clockwise rotation (y axis pointing down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rotation {
    pub cos: f64,
    pub sin: f64,
}

impl Rotation {
    /// The angle is reduced modulo 360 first. Quarter turns yield exact values so
    /// that 90 degree rotations map pixel centers onto pixel centers.
    /// Returns None for non-finite angles.
    pub(crate) fn from_degrees(degrees: f64) -> Option<Self> {
        if !degrees.is_finite() {
            return None;
        }
        let mut normalized = degrees.rem_euclid(360.0);
        // rem_euclid rounds tiny negative angles up to exactly 360.
        if normalized >= 360.0 {
            normalized = 0.0;
        }
        let quarter = normalized / 90.0;
        let (cos, sin) = if quarter.fract() == 0.0 {
            match quarter as u32 % 4 {
                0 => (1.0, 0.0),
                1 => (0.0, 1.0),
                2 => (-1.0, 0.0),
                _ => (0.0, -1.0),
            }
        } else {
            let radians = normalized.to_radians();
            (radians.cos(), radians.sin())
        };
        Some(Self { cos, sin })
    }

    /// True when the rotation is a whole number of quarter turns.
    pub(crate) fn is_axis_aligned(&self) -> bool {
        self.cos == 0.0 || self.sin == 0.0
    }

    /// The reverse rotation.
    pub(crate) fn inverse(self) -> Self {
        Self {
            cos: self.cos,
            sin: -self.sin,
        }
    }

    /// Rotate (x, y) about `pivot`.
    pub(crate) fn apply(&self, (x, y): (f64, f64), pivot: (f64, f64)) -> (f64, f64) {
        let (dx, dy) = (x - pivot.0, y - pivot.1);
        (
            self.cos * dx - self.sin * dy + pivot.0,
            self.sin * dx + self.cos * dy + pivot.1,
        )
    }

    /// Axis-aligned bounding box of a `width` x `height` rectangle rotated about `pivot`.
    pub(crate) fn bounds(&self, width: f64, height: f64, pivot: (f64, f64)) -> Bounds {
        let corners = [(0.0, 0.0), (width, 0.0), (0.0, height), (width, height)];
        let mut bounds = Bounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for corner in corners {
            let (x, y) = self.apply(corner, pivot);
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }
        bounds
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Whole-pixel size of the box, rounding partial pixels up.
    pub(crate) fn pixel_size(&self) -> (f64, f64) {
        // Tolerate float noise on box edges that should land on whole pixels.
        const EPSILON: f64 = 1e-6;
        (
            (self.max_x - self.min_x - EPSILON).ceil().max(1.0),
            (self.max_y - self.min_y - EPSILON).ceil().max(1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_turns_are_exact() {
        assert_eq!(
            Rotation::from_degrees(90.0),
            Some(Rotation { cos: 0.0, sin: 1.0 })
        );
        assert_eq!(
            Rotation::from_degrees(270.0),
            Some(Rotation {
                cos: 0.0,
                sin: -1.0
            })
        );
        assert_eq!(Rotation::from_degrees(720.0), Rotation::from_degrees(0.0));
        assert_eq!(Rotation::from_degrees(-90.0), Rotation::from_degrees(270.0));
    }

    #[test]
    fn test_tiny_negative_angle_is_identity() {
        assert_eq!(Rotation::from_degrees(-1e-20), Rotation::from_degrees(0.0));
        assert_eq!(Rotation::from_degrees(-1e-20 - 360.0), Rotation::from_degrees(0.0));
    }

    #[test]
    fn test_non_finite_angle() {
        assert!(Rotation::from_degrees(f64::NAN).is_none());
        assert!(Rotation::from_degrees(f64::INFINITY).is_none());
    }

    #[test]
    fn test_bounds_quarter_turn_about_origin() {
        let rotation = Rotation::from_degrees(90.0).unwrap();
        let bounds = rotation.bounds(700.0, 900.0, (0.0, 0.0));
        assert_eq!(bounds.min_x, -900.0);
        assert_eq!(bounds.min_y, 0.0);
        assert_eq!(bounds.pixel_size(), (900.0, 700.0));
    }

    #[test]
    fn test_bounds_diagonal() {
        let rotation = Rotation::from_degrees(45.0).unwrap();
        assert!(!rotation.is_axis_aligned());
        let bounds = rotation.bounds(10.0, 10.0, (0.0, 0.0));
        // 10 * sqrt(2) = 14.14.. rounds up
        assert_eq!(bounds.pixel_size(), (15.0, 15.0));
    }

    #[test]
    fn test_inverse_undoes_rotation() {
        let rotation = Rotation::from_degrees(90.0).unwrap();
        let p = rotation.apply((3.0, 4.0), (0.0, 0.0));
        assert_eq!(p, (-4.0, 3.0));
        assert_eq!(rotation.inverse().apply(p, (0.0, 0.0)), (3.0, 4.0));
    }
}
