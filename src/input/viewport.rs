//! Window to scene space mapping
//!
//! The scene keeps a fixed aspect ratio. When the window does not match it,
//! the scene is centered and the rest of the window is left as black bars.

use glam::Vec2;

/// Region of the window the scene is drawn into, in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Bottom-left corner
    pub origin: Vec2,
    pub size: Vec2,
}

impl Viewport {
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Largest centered viewport with the scene's aspect ratio
    #[must_use]
    pub fn letterbox(window: Vec2, scene: Vec2) -> Self {
        let scene_ratio = scene.x / scene.y;
        let window_ratio = window.x / window.y.max(1.0);

        if window_ratio >= scene_ratio {
            // Bars left and right
            let width = window.y * scene_ratio;
            Self::new(Vec2::new((window.x - width) / 2.0, 0.0), Vec2::new(width, window.y))
        } else {
            // Bars top and bottom
            let height = window.x / scene_ratio;
            Self::new(Vec2::new(0.0, (window.y - height) / 2.0), Vec2::new(window.x, height))
        }
    }

    /// Map a window point into scene coordinates
    #[must_use]
    pub fn to_scene(&self, window_point: Vec2, scene: Vec2) -> Vec2 {
        (window_point - self.origin) * (scene / self.size)
    }

    /// Map a window-space motion delta into scene units
    #[must_use]
    pub fn delta_to_scene(&self, window_delta: Vec2, scene: Vec2) -> Vec2 {
        window_delta * (scene / self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: Vec2 = Vec2::new(1920.0, 1080.0);

    #[test]
    fn test_matching_ratio_fills_window() {
        let viewport = Viewport::letterbox(Vec2::new(960.0, 540.0), SCENE);
        assert_eq!(viewport, Viewport::new(Vec2::ZERO, Vec2::new(960.0, 540.0)));
        assert_eq!(
            viewport.to_scene(Vec2::new(480.0, 270.0), SCENE),
            Vec2::new(960.0, 540.0)
        );
    }

    #[test]
    fn test_wide_window_gets_side_bars() {
        let viewport = Viewport::letterbox(Vec2::new(1200.0, 540.0), SCENE);
        assert_eq!(viewport.origin, Vec2::new(120.0, 0.0));
        assert_eq!(viewport.size, Vec2::new(960.0, 540.0));
        assert_eq!(viewport.to_scene(Vec2::new(120.0, 0.0), SCENE), Vec2::ZERO);
    }

    #[test]
    fn test_tall_window_gets_top_bars() {
        let viewport = Viewport::letterbox(Vec2::new(960.0, 740.0), SCENE);
        assert_eq!(viewport.origin, Vec2::new(0.0, 100.0));
        assert_eq!(viewport.size, Vec2::new(960.0, 540.0));
        assert_eq!(
            viewport.delta_to_scene(Vec2::new(1.0, 1.0), SCENE),
            Vec2::new(2.0, 2.0)
        );
    }
}
