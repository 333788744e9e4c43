//! Stepped zoom levels.

use crate::error::{PageViewError, PageViewResult};
use serde::{Deserialize, Serialize};

/// Zoom levels used when no catalog is configured.
pub const DEFAULT_ZOOM_LEVELS: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 3.0];

/// A fixed, strictly ascending, non-empty list of allowed zoom factors.
///
/// Zoom in/out buttons move between neighbouring entries. Lookups clamp at the
/// ends of the catalog instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ZoomCatalog {
    levels: Vec<f64>,
}

impl ZoomCatalog {
    /// Build a catalog, rejecting empty, unordered or non-positive level lists.
    pub fn new(levels: Vec<f64>) -> PageViewResult<Self> {
        if levels.is_empty() {
            return Err(PageViewError::InvalidZoomFactor(
                "zoom catalog is empty".to_string(),
            ));
        }
        for &level in &levels {
            validate_zoom_factor(level)?;
        }
        if levels.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(PageViewError::InvalidZoomFactor(format!(
                "zoom catalog must be strictly ascending: {:?}",
                levels
            )));
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Smallest level.
    pub fn min(&self) -> f64 {
        self.levels[0]
    }

    /// Largest level.
    pub fn max(&self) -> f64 {
        self.levels[self.levels.len() - 1]
    }

    /// The smallest level strictly greater than `current`, or the largest level
    /// if `current` is already at or above it.
    pub fn step_in(&self, current: f64) -> f64 {
        self.levels
            .iter()
            .copied()
            .filter(|&level| level > current)
            .reduce(f64::min)
            .unwrap_or_else(|| self.max())
    }

    /// The largest level strictly less than `current`, or the smallest level
    /// if `current` is already at or below it.
    pub fn step_out(&self, current: f64) -> f64 {
        self.levels
            .iter()
            .copied()
            .filter(|&level| level < current)
            .reduce(f64::max)
            .unwrap_or_else(|| self.min())
    }
}

impl Default for ZoomCatalog {
    fn default() -> Self {
        Self {
            levels: DEFAULT_ZOOM_LEVELS.to_vec(),
        }
    }
}

impl TryFrom<Vec<f64>> for ZoomCatalog {
    type Error = PageViewError;

    fn try_from(levels: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<ZoomCatalog> for Vec<f64> {
    fn from(catalog: ZoomCatalog) -> Self {
        catalog.levels
    }
}

/// Accept only positive, finite zoom factors.
pub fn validate_zoom_factor(factor: f64) -> PageViewResult<f64> {
    if factor.is_finite() && factor > 0.0 {
        Ok(factor)
    } else {
        Err(PageViewError::InvalidZoomFactor(format!(
            "{} (must be positive and finite)",
            factor
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn catalog() -> ZoomCatalog {
        ZoomCatalog::new(vec![0.25, 0.5, 1.0, 2.0, 3.0]).unwrap()
    }

    #[test]
    fn test_step_from_middle() {
        let catalog = catalog();
        assert_eq!(catalog.step_in(1.0), 2.0);
        assert_eq!(catalog.step_out(1.0), 0.5);
    }

    #[test]
    fn test_step_clamps_at_ends() {
        let catalog = catalog();
        assert_eq!(catalog.step_in(3.0), 3.0);
        assert_eq!(catalog.step_in(10.0), 3.0);
        assert_eq!(catalog.step_out(0.25), 0.25);
        assert_eq!(catalog.step_out(0.01), 0.25);
    }

    #[rstest]
    #[case(0.3, 0.5, 0.25)]
    #[case(1.5, 2.0, 1.0)]
    #[case(0.1, 0.25, 0.25)]
    #[case(2.999, 3.0, 2.0)]
    fn test_step_from_off_catalog_factor(
        #[case] current: f64,
        #[case] expected_in: f64,
        #[case] expected_out: f64,
    ) {
        let catalog = catalog();
        assert_eq!(catalog.step_in(current), expected_in);
        assert_eq!(catalog.step_out(current), expected_out);
    }

    #[test]
    fn test_step_in_visits_every_level_once() {
        let catalog = ZoomCatalog::default();
        let mut visited = vec![catalog.min()];
        let mut current = catalog.min();
        loop {
            let next = catalog.step_in(current);
            if next == current {
                break;
            }
            visited.push(next);
            current = next;
        }
        assert_eq!(visited, catalog.levels());
        assert_eq!(current, catalog.max());
    }

    #[test]
    fn test_step_out_visits_every_level_once() {
        let catalog = ZoomCatalog::default();
        let mut visited = vec![catalog.max()];
        let mut current = catalog.max();
        while catalog.step_out(current) != current {
            current = catalog.step_out(current);
            visited.push(current);
        }
        visited.reverse();
        assert_eq!(visited, catalog.levels());
    }

    #[test]
    fn test_single_level_catalog() {
        let catalog = ZoomCatalog::new(vec![1.0]).unwrap();
        assert_eq!(catalog.step_in(1.0), 1.0);
        assert_eq!(catalog.step_out(1.0), 1.0);
        assert_eq!(catalog.step_in(0.5), 1.0);
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![1.0, 0.5])]
    #[case(vec![0.5, 0.5])]
    #[case(vec![0.0, 1.0])]
    #[case(vec![-1.0, 1.0])]
    #[case(vec![1.0, f64::INFINITY])]
    #[case(vec![f64::NAN])]
    fn test_invalid_catalog(#[case] levels: Vec<f64>) {
        assert!(matches!(
            ZoomCatalog::new(levels),
            Err(PageViewError::InvalidZoomFactor(_))
        ));
    }

    #[test]
    fn test_validate_zoom_factor() {
        assert_eq!(validate_zoom_factor(1.5).unwrap(), 1.5);
        assert!(validate_zoom_factor(0.0).is_err());
        assert!(validate_zoom_factor(-1.0).is_err());
        assert!(validate_zoom_factor(f64::NAN).is_err());
        assert!(validate_zoom_factor(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_catalog_serde() {
        let catalog: ZoomCatalog = serde_json::from_str("[0.5, 1, 4]").unwrap();
        assert_eq!(catalog.levels(), &[0.5, 1.0, 4.0]);
        assert_eq!(serde_json::to_string(&catalog).unwrap(), "[0.5,1.0,4.0]");
        assert!(serde_json::from_str::<ZoomCatalog>("[]").is_err());
    }
}
