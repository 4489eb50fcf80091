use eframe::egui::{Pos2, Vec2};

pub(super) trait ConnectorPath {
    fn path(&self, start: Pos2, end: Pos2, scale: f32) -> Vec<Pos2>;
}

#[derive(Clone, Copy, Debug)]
pub(super) struct EndArrow {
    pub(super) length: f32,
    pub(super) half_width: f32,
}

impl Default for EndArrow {
    fn default() -> Self {
        Self {
            length: 6.0,
            half_width: 3.0,
        }
    }
}

impl ConnectorPath for EndArrow {
    fn path(&self, start: Pos2, end: Pos2, scale: f32) -> Vec<Pos2> {
        let delta = end - start;
        let length = delta.length();
        if length <= f32::EPSILON {
            return Vec::new();
        }

        let direction = delta / length;
        let normal = Vec2::new(-direction.y, direction.x);
        let base = end - direction * (self.length * scale);
        let wing = normal * (self.half_width * scale);

        vec![end, base + wing, base - wing]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_points_along_the_segment() {
        let arrow = EndArrow::default();
        let path = arrow.path(Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0), 1.5);

        assert_eq!(path.len(), 3);
        assert_eq!(path[0], Pos2::new(10.0, 0.0));
        assert!((path[1].x - 1.0).abs() < 1e-5);
        assert!((path[1].y - 4.5).abs() < 1e-5);
        assert!((path[2].y + 4.5).abs() < 1e-5);
    }

    #[test]
    fn degenerate_segments_have_no_marker() {
        let point = Pos2::new(3.0, 4.0);
        assert!(EndArrow::default().path(point, point, 1.0).is_empty());
    }
}
