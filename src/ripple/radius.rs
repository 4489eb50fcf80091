#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusModel {
    domain_max: u64,
    max_radius: f32,
}

impl RadiusModel {
    pub const DEFAULT_MAX_RADIUS: f32 = 20.0;

    pub fn new(domain_max: u64, max_radius: f32) -> Self {
        Self {
            domain_max,
            max_radius: max_radius.max(0.0),
        }
    }

    pub fn radius(&self, total_bytes: u64) -> f32 {
        if self.domain_max == 0 || total_bytes == 0 {
            return 0.0;
        }

        let ratio = total_bytes as f64 / self.domain_max as f64;
        (ratio.sqrt() * self.max_radius as f64) as f32
    }

    pub fn spacing(&self, total_bytes: u64) -> f32 {
        self.radius(total_bytes) * 2.0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn endpoints_of_the_scale() {
        let model = RadiusModel::new(100, RadiusModel::DEFAULT_MAX_RADIUS);
        assert_eq!(model.radius(0), 0.0);
        assert!((model.radius(100) - 20.0).abs() < 1e-5);
        assert!((model.radius(25) - 10.0).abs() < 1e-5);
    }

    #[test]
    fn zero_domain_collapses_every_radius() {
        let model = RadiusModel::new(0, RadiusModel::DEFAULT_MAX_RADIUS);
        assert_eq!(model.radius(0), 0.0);
        assert_eq!(model.radius(42), 0.0);
    }

    proptest! {
        #[test]
        fn radius_is_monotonic(
            domain_max in 1u64..10_000_000,
            a in 0u64..20_000_000,
            b in 0u64..20_000_000,
        ) {
            let model = RadiusModel::new(domain_max, RadiusModel::DEFAULT_MAX_RADIUS);
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(model.radius(low) <= model.radius(high));
            prop_assert!(model.radius(low) >= 0.0);
        }

        #[test]
        fn radius_is_zero_only_for_empty_nodes(domain_max in 1u64..1_000_000, bytes in 0u64..1_000_000) {
            let model = RadiusModel::new(domain_max, RadiusModel::DEFAULT_MAX_RADIUS);
            prop_assert_eq!(model.radius(bytes) == 0.0, bytes == 0);
        }
    }
}
