//! Progress to visual parameter mapping

use crate::config::LayoutMetrics;

use super::Progress;

const BACKDROP_MAX_OPACITY: f64 = 0.7;
const MINI_CORNER_RADIUS: f64 = 12.0;

/// Everything the renderer needs to place the player for one progress value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualParams {
    pub backdrop_opacity: f64,
    pub container_height: f64,
    pub container_top: f64,
    pub bottom_margin: f64,
    pub corner_radius: f64,
    pub mini_player_opacity: f64,
    pub full_player_opacity: f64,
}

/// Linear map of `value` from `domain` onto `range`, clamped at both ends.
fn interpolate(value: f64, domain: (f64, f64), range: (f64, f64)) -> f64 {
    let (d0, d1) = domain;
    let (r0, r1) = range;
    let t = ((value - d0) / (d1 - d0)).clamp(0.0, 1.0);
    r0 + (r1 - r0) * t
}

pub fn derive(progress: Progress, layout: &LayoutMetrics) -> VisualParams {
    let p = progress.value();
    VisualParams {
        backdrop_opacity: interpolate(p, (0.0, 1.0), (0.0, BACKDROP_MAX_OPACITY)),
        container_height: interpolate(p, (0.0, 1.0), (layout.mini_height, layout.screen_height)),
        container_top: interpolate(p, (0.0, 1.0), (layout.mini_top(), 0.0)),
        bottom_margin: interpolate(p, (0.0, 1.0), (layout.mini_margin_bottom, 0.0)),
        corner_radius: interpolate(p, (0.0, 0.2), (MINI_CORNER_RADIUS, 0.0)),
        mini_player_opacity: interpolate(p, (0.0, 0.3), (1.0, 0.0)),
        full_player_opacity: interpolate(p, (0.7, 1.0), (0.0, 1.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_collapsed_values() {
        let layout = LayoutMetrics::default();
        let params = derive(Progress::COLLAPSED, &layout);
        assert_eq!(params.backdrop_opacity, 0.0);
        assert_eq!(params.container_height, layout.mini_height);
        assert_eq!(params.container_top, layout.mini_top());
        assert_eq!(params.bottom_margin, layout.mini_margin_bottom);
        assert_eq!(params.corner_radius, 12.0);
        assert_eq!(params.mini_player_opacity, 1.0);
        assert_eq!(params.full_player_opacity, 0.0);
    }

    #[test]
    fn test_expanded_values() {
        let layout = LayoutMetrics::default();
        let params = derive(Progress::EXPANDED, &layout);
        assert!(close(params.backdrop_opacity, 0.7));
        assert_eq!(params.container_height, layout.screen_height);
        assert_eq!(params.container_top, 0.0);
        assert_eq!(params.bottom_margin, 0.0);
        assert_eq!(params.corner_radius, 0.0);
        assert_eq!(params.mini_player_opacity, 0.0);
        assert_eq!(params.full_player_opacity, 1.0);
    }

    #[test]
    fn test_sub_ranges_clamp() {
        let layout = LayoutMetrics::default();

        let early = derive(Progress::new(0.1), &layout);
        assert!(close(early.corner_radius, 6.0));
        assert!(close(early.mini_player_opacity, 2.0 / 3.0));
        assert_eq!(early.full_player_opacity, 0.0);

        let middle = derive(Progress::new(0.5), &layout);
        assert_eq!(middle.corner_radius, 0.0);
        assert_eq!(middle.mini_player_opacity, 0.0);
        assert_eq!(middle.full_player_opacity, 0.0);
        assert!(close(middle.backdrop_opacity, 0.35));
        assert!(close(
            middle.container_height,
            (layout.mini_height + layout.screen_height) / 2.0
        ));

        let late = derive(Progress::new(0.85), &layout);
        assert!(close(late.full_player_opacity, 0.5));
    }

    #[test]
    fn test_derive_is_pure() {
        let layout = LayoutMetrics::with_screen_height(1024.0);
        let p = Progress::new(0.42);
        assert_eq!(derive(p, &layout), derive(p, &layout));
    }
}
