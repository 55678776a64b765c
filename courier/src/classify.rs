use serde::{Deserialize, Serialize};

use crate::grid::Point;
use crate::surface::{self, Color, Surface};

/// The gray used for roads by the bundled maps
pub const ROAD_GRAY: Color = Color::rgb(90, 90, 90);

/// Pixel distance between neighboring lattice points
pub const DEFAULT_STEP: u32 = 5;

/// Decides which colors count as road
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoadPolicy {
    /// Exactly this color
    Exact { reference: Color },
    /// Every channel within `[min, max]`
    Band { min: u8, max: u8 },
}

impl Default for RoadPolicy {
    fn default() -> Self {
        RoadPolicy::Exact {
            reference: ROAD_GRAY,
        }
    }
}

impl RoadPolicy {
    /// Grays of any shade between 90 and 150, tolerates antialiased or recompressed maps
    pub const fn tolerance_band() -> Self {
        RoadPolicy::Band { min: 90, max: 150 }
    }

    /// Switch between exact and banded matching. A policy that is already of the
    /// requested kind is returned untouched, custom values included.
    pub fn with_tolerance(self, tolerant: bool) -> Self {
        match (self, tolerant) {
            (RoadPolicy::Band { .. }, true) | (RoadPolicy::Exact { .. }, false) => self,
            (RoadPolicy::Exact { .. }, true) => RoadPolicy::tolerance_band(),
            (RoadPolicy::Band { .. }, false) => RoadPolicy::default(),
        }
    }

    pub fn matches(&self, color: Color) -> bool {
        match *self {
            RoadPolicy::Exact { reference } => color == reference,
            RoadPolicy::Band { min, max } => color
                .channels()
                .iter()
                .all(|c| (min..=max).contains(c)),
        }
    }
}

/// How much of the surroundings must be road before a point may be entered
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Only the point itself
    Road,
    /// The point and the eight points one step around it
    #[default]
    Safe,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classifier {
    policy: RoadPolicy,
    step: u32,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(RoadPolicy::default(), DEFAULT_STEP)
    }
}

impl Classifier {
    /// A zero step is bumped to one
    pub fn new(policy: RoadPolicy, step: u32) -> Self {
        Self {
            policy,
            step: step.max(1),
        }
    }

    pub fn policy(&self) -> RoadPolicy {
        self.policy
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn is_road(&self, color: Color) -> bool {
        self.policy.matches(color)
    }

    /// Points outside the surface are never road
    pub fn is_road_at<S: Surface + ?Sized>(&self, point: Point, surface: &S) -> bool {
        surface::sample(surface, point).map_or(false, |color| self.is_road(color))
    }

    /// Road at the point and at the 3x3 block of samples one step around it.
    ///
    /// Keeps paths off road edges, a point within one step of the border is never safe.
    pub fn is_safe<S: Surface + ?Sized>(&self, point: Point, surface: &S) -> bool {
        let step = self.step as i32;
        [-step, 0, step].iter().all(|&dx| {
            [-step, 0, step]
                .iter()
                .all(|&dy| self.is_road_at(point.offset(dx, dy), surface))
        })
    }

    pub fn is_passable<S: Surface + ?Sized>(
        &self,
        point: Point,
        surface: &S,
        strictness: Strictness,
    ) -> bool {
        match strictness {
            Strictness::Road => self.is_road_at(point, surface),
            Strictness::Safe => self.is_safe(point, surface),
        }
    }
}

#[cfg(test)]
mod test {
    use image::{Rgb, RgbImage};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::test_util::{ascii_surface, road_surface};

    #[test]
    fn test_exact_policy() {
        let classifier = Classifier::default();
        assert!(classifier.is_road(Color::rgb(90, 90, 90)));
        assert!(!classifier.is_road(Color::rgb(91, 90, 90)));
        assert!(!classifier.is_road(Color::rgb(128, 128, 128)));

        let classifier = Classifier::new(
            RoadPolicy::Exact {
                reference: Color::rgb(128, 128, 128),
            },
            5,
        );
        assert!(classifier.is_road(Color::rgb(128, 128, 128)));
        assert!(!classifier.is_road(ROAD_GRAY));
    }

    #[test]
    fn test_band_policy() {
        let classifier = Classifier::new(RoadPolicy::tolerance_band(), 5);
        assert!(classifier.is_road(Color::rgb(90, 90, 90)));
        assert!(classifier.is_road(Color::rgb(150, 150, 150)));
        assert!(classifier.is_road(Color::rgb(90, 120, 150)));
        assert!(!classifier.is_road(Color::rgb(89, 120, 120)));
        assert!(!classifier.is_road(Color::rgb(120, 151, 120)));
        assert!(!classifier.is_road(Color::rgb(0, 0, 0)));
    }

    #[test]
    fn test_with_tolerance_keeps_custom_values() {
        let light = RoadPolicy::Exact {
            reference: Color::rgb(128, 128, 128),
        };
        assert_eq!(light.with_tolerance(false), light);
        assert_eq!(light.with_tolerance(true), RoadPolicy::tolerance_band());

        let narrow = RoadPolicy::Band { min: 100, max: 120 };
        assert_eq!(narrow.with_tolerance(true), narrow);
        assert_eq!(narrow.with_tolerance(false), RoadPolicy::default());
    }

    #[test]
    fn test_zero_step_is_bumped() {
        assert_eq!(Classifier::new(RoadPolicy::default(), 0).step(), 1);
    }

    #[test]
    fn test_out_of_bounds_is_not_road() {
        let surface = road_surface(10, 10, |_, _| true);
        let classifier = Classifier::default();

        for point in [
            Point::new(-1, 0),
            Point::new(0, -1),
            Point::new(10, 5),
            Point::new(5, 10),
            Point::new(-100, -100),
        ] {
            assert!(!classifier.is_road_at(point, &surface));
            assert!(!classifier.is_safe(point, &surface));
        }
        assert!(classifier.is_road_at(Point::new(9, 9), &surface));
    }

    #[test]
    fn test_safe_needs_whole_neighborhood() {
        let surface = ascii_surface(&[
            "#####", //
            "#####", //
            "####.", //
            "#####", //
        ]);
        let classifier = Classifier::default();

        assert!(classifier.is_safe(Point::new(5, 5), &surface));
        assert!(classifier.is_safe(Point::new(10, 5), &surface));
        assert!(classifier.is_safe(Point::new(5, 10), &surface));
        // next to the hole at (20, 10)
        assert!(!classifier.is_safe(Point::new(15, 5), &surface));
        assert!(!classifier.is_safe(Point::new(15, 15), &surface));
        // on the border
        assert!(!classifier.is_safe(Point::new(0, 5), &surface));
        assert!(!classifier.is_safe(Point::new(5, 15), &surface));

        assert!(classifier.is_passable(Point::new(15, 5), &surface, Strictness::Road));
        assert!(!classifier.is_passable(Point::new(15, 5), &surface, Strictness::Safe));
    }

    #[test]
    fn test_safe_implies_road_around() {
        let mut rng = StdRng::seed_from_u64(7);
        // mostly road with scattered holes
        let surface = RgbImage::from_fn(60, 60, |_, _| {
            if rng.gen_bool(0.97) {
                Rgb(ROAD_GRAY.channels())
            } else {
                Rgb([255, 255, 255])
            }
        });
        let classifier = Classifier::default();

        let mut safe = 0;
        for x in -5..65 {
            for y in -5..65 {
                let p = Point::new(x, y);
                if classifier.is_safe(p, &surface) {
                    safe += 1;
                    for dx in [-5, 0, 5] {
                        for dy in [-5, 0, 5] {
                            assert!(classifier.is_road_at(p.offset(dx, dy), &surface));
                        }
                    }
                }
            }
        }
        assert!(safe > 0);
    }
}
