use std::path::Path;

use anyhow::Context;
use image::{Rgba, RgbaImage};
use log::info;

use crate::classify::ROAD_GRAY;

const GRASS: Rgba<u8> = Rgba([112, 170, 88, 255]);
const BLOCK: Rgba<u8> = Rgba([214, 196, 160, 255]);

/// Decode any image format the `image` crate understands
pub fn load_map(path: impl AsRef<Path>) -> anyhow::Result<RgbaImage> {
    let path = path.as_ref();
    let img = image::open(path).with_context(|| format!("loading map {}", path.display()))?;
    info!(
        "loaded map {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img.to_rgba8())
}

/// A town of rectangular blocks separated by gray roads, with a park cutting
/// some of the streets so that routes have to go around it.
pub fn demo_map(width: u32, height: u32) -> RgbaImage {
    const ROAD: u32 = 24;
    const BLOCK_W: u32 = 150;
    const BLOCK_H: u32 = 110;

    let road = Rgba([ROAD_GRAY.r, ROAD_GRAY.g, ROAD_GRAY.b, 255]);
    let park_x = width / 3..width / 3 + BLOCK_W + ROAD;
    let park_y = height / 3..height / 3 + BLOCK_H + ROAD;

    RgbaImage::from_fn(width, height, |x, y| {
        if park_x.contains(&x) && park_y.contains(&y) {
            return GRASS;
        }
        let on_avenue = x % (BLOCK_W + ROAD) < ROAD;
        let on_street = y % (BLOCK_H + ROAD) < ROAD;
        if on_avenue || on_street {
            road
        } else {
            BLOCK
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Planner, Point};

    #[test]
    fn test_demo_map_has_connected_roads() {
        let map = demo_map(1000, 700);
        let planner = Planner::default();

        let safe = planner.safe_points(&map);
        assert!(safe.len() > 100);

        // opposite corners of the road network
        let start = *safe.first().unwrap();
        let goal = *safe.last().unwrap();
        let path = planner.plan(start, goal, Some(&map));
        assert!(!path.is_empty());
        assert_eq!(path.last(), Some(&goal));
        assert!(path.iter().all(|p| planner.is_safe(*p, &map)));

        assert!(!planner.is_safe(Point::new(1, 1), &map));
    }

    #[test]
    fn test_load_map_reports_missing_file() {
        let err = load_map("does/not/exist.png").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.png"));
    }
}
