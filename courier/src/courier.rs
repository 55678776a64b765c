use std::collections::VecDeque;

use crate::grid::Point;

/// The agent that walks a planned path, one waypoint per tick
#[derive(Clone, Debug, PartialEq)]
pub struct Courier {
    position: Point,
    path: VecDeque<Point>,
    moving: bool,
    /// degrees, counter-clockwise from the positive x axis with y pointing down the screen
    heading: f32,
}

impl Courier {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            path: VecDeque::new(),
            moving: false,
            heading: 0.0,
        }
    }

    /// Place the courier at `start` with a fresh path, stopped.
    ///
    /// Position and path change together, nobody sees one without the other.
    pub fn assign(&mut self, start: Point, path: Vec<Point>) {
        self.position = start;
        self.path = path.into();
        self.moving = false;
    }

    pub fn start(&mut self) {
        self.moving = true;
    }

    pub fn stop(&mut self) {
        self.moving = false;
    }

    /// Advance to the next waypoint if moving. Running out of path stops the courier.
    pub fn step(&mut self) -> Option<Point> {
        if !self.moving {
            return None;
        }
        let Some(next) = self.path.pop_front() else {
            self.moving = false;
            return None;
        };

        let (dx, dy) = (next.x - self.position.x, next.y - self.position.y);
        if dx != 0 || dy != 0 {
            self.heading = (-dy as f32).atan2(dx as f32).to_degrees();
        }
        self.position = next;

        if self.path.is_empty() {
            self.moving = false;
        }
        Some(next)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Waypoints not yet reached, next one first
    pub fn remaining(&self) -> impl Iterator<Item = &Point> + '_ {
        self.path.iter()
    }

    pub fn remaining_len(&self) -> usize {
        self.path.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_heading(courier: &Courier, expected: f32) {
        assert!(
            (courier.heading() - expected).abs() < 1e-3,
            "heading {} != {}",
            courier.heading(),
            expected
        );
    }

    fn route() -> Vec<Point> {
        vec![
            Point::new(5, 0),
            Point::new(10, 0),
            Point::new(10, 5),
            Point::new(10, 10),
        ]
    }

    #[test]
    fn test_stopped_courier_stays() {
        let mut courier = Courier::new(Point::new(100, 100));
        courier.assign(Point::new(0, 0), route());

        assert!(!courier.is_moving());
        assert_eq!(courier.step(), None);
        assert_eq!(courier.position(), Point::new(0, 0));
        assert_eq!(courier.remaining_len(), 4);
    }

    #[test]
    fn test_walks_path_and_stops_at_end() {
        let mut courier = Courier::new(Point::new(100, 100));
        courier.assign(Point::new(0, 0), route());
        courier.start();

        assert_eq!(courier.step(), Some(Point::new(5, 0)));
        assert_heading(&courier, 0.0);
        assert_eq!(courier.step(), Some(Point::new(10, 0)));
        // moving down the screen
        assert_eq!(courier.step(), Some(Point::new(10, 5)));
        assert_heading(&courier, -90.0);
        assert!(courier.is_moving());
        assert_eq!(courier.step(), Some(Point::new(10, 10)));

        assert!(!courier.is_moving());
        assert_eq!(courier.step(), None);
        assert_eq!(courier.position(), Point::new(10, 10));
        assert_eq!(courier.remaining().count(), 0);
    }

    #[test]
    fn test_stop_and_resume() {
        let mut courier = Courier::new(Point::new(0, 0));
        courier.assign(Point::new(20, 20), vec![Point::new(15, 20), Point::new(15, 15)]);
        courier.start();
        courier.step();
        courier.stop();

        assert_eq!(courier.step(), None);
        assert_eq!(courier.position(), Point::new(15, 20));
        assert_heading(&courier, 180.0);

        courier.start();
        assert_eq!(courier.step(), Some(Point::new(15, 15)));
        assert_heading(&courier, 90.0);
    }

    #[test]
    fn test_start_without_path() {
        let mut courier = Courier::new(Point::new(100, 100));
        courier.start();
        assert_eq!(courier.step(), None);
        assert!(!courier.is_moving());
        assert_eq!(courier.position(), Point::new(100, 100));
    }

    #[test]
    fn test_assign_replaces_path_and_stops() {
        let mut courier = Courier::new(Point::new(0, 0));
        courier.assign(Point::new(0, 0), route());
        courier.start();
        courier.step();

        courier.assign(Point::new(50, 50), vec![Point::new(55, 50)]);
        assert!(!courier.is_moving());
        assert_eq!(courier.position(), Point::new(50, 50));
        assert_eq!(
            courier.remaining().copied().collect::<Vec<_>>(),
            vec![Point::new(55, 50)]
        );
    }
}
