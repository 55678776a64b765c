use log::{debug, warn};
use rand::{seq::SliceRandom, Rng};

use crate::classify::Classifier;
use crate::grid::Point;
use crate::surface::Surface;

/// Where the courier goes when no safe point exists
pub const FALLBACK_POINT: Point = Point::new(100, 100);

/// Every safe point on the step lattice, scanned column by column.
///
/// Samples the whole surface, O(width * height / step²). Meant for user actions, not per frame.
pub fn safe_points<S: Surface + ?Sized>(surface: &S, classifier: &Classifier) -> Vec<Point> {
    let (width, height) = surface.dimensions();
    let step = classifier.step() as usize;

    let mut points = Vec::new();
    for x in (0..width).step_by(step) {
        for y in (0..height).step_by(step) {
            let p = Point::new(x as i32, y as i32);
            if classifier.is_safe(p, surface) {
                points.push(p);
            }
        }
    }
    points
}

/// Draws one safe point uniformly at random.
///
/// Returns `fallback` unchecked when there is no surface or nothing on it is safe.
pub fn sample_random_safe<S, R>(
    surface: Option<&S>,
    classifier: &Classifier,
    rng: &mut R,
    fallback: Point,
) -> Point
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    let Some(surface) = surface else {
        debug!("no map loaded, using {}", fallback);
        return fallback;
    };

    let points = safe_points(surface, classifier);
    match points.choose(rng) {
        Some(p) => {
            debug!("picked {} out of {} safe points", p, points.len());
            *p
        }
        None => {
            warn!("map has no safe points, using {}", fallback);
            fallback
        }
    }
}

#[cfg(test)]
mod test {
    use image::RgbImage;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::test_util::{ascii_surface, road_surface};

    #[test]
    fn test_safe_points_scan_order() {
        let surface = ascii_surface(&[
            "####", //
            "####", //
            "####", //
            "####", //
        ]);
        let classifier = Classifier::default();

        assert_eq!(
            safe_points(&surface, &classifier),
            vec![
                Point::new(5, 5),
                Point::new(5, 10),
                Point::new(10, 5),
                Point::new(10, 10)
            ]
        );
    }

    #[test]
    fn test_single_safe_point_always_chosen() {
        // gray square covering pixels 0..=10, only (5, 5) has its whole neighborhood on it
        let surface = road_surface(15, 15, |x, y| x <= 10 && y <= 10);
        let classifier = Classifier::default();
        assert_eq!(safe_points(&surface, &classifier), vec![Point::new(5, 5)]);

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(
                sample_random_safe(Some(&surface), &classifier, &mut rng, FALLBACK_POINT),
                Point::new(5, 5)
            );
        }
    }

    #[test]
    fn test_no_safe_point_falls_back() {
        let classifier = Classifier::default();
        let mut rng = StdRng::seed_from_u64(1);

        let surface = road_surface(50, 50, |_, _| false);
        assert_eq!(
            sample_random_safe(Some(&surface), &classifier, &mut rng, FALLBACK_POINT),
            Point::new(100, 100)
        );

        // too small to have an interior
        let surface = road_surface(10, 10, |_, _| true);
        assert_eq!(
            sample_random_safe(Some(&surface), &classifier, &mut rng, FALLBACK_POINT),
            Point::new(100, 100)
        );

        assert_eq!(
            sample_random_safe::<RgbImage, _>(None, &classifier, &mut rng, FALLBACK_POINT),
            Point::new(100, 100)
        );
    }

    #[test]
    fn test_samples_are_safe_and_spread() {
        let surface = road_surface(40, 40, |_, _| true);
        let classifier = Classifier::default();
        let all = safe_points(&surface, &classifier);
        assert_eq!(all.len(), 36);

        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let p = sample_random_safe(Some(&surface), &classifier, &mut rng, FALLBACK_POINT);
            assert!(classifier.is_safe(p, &surface));
            seen.insert(p);
        }
        assert_eq!(seen.len(), all.len());
    }
}
