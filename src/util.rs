use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0usize;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

pub fn format_percent(value: u64, total: u64) -> String {
    if total == 0 {
        return "--".to_owned();
    }
    format!("{:.1}%", value as f64 / total as f64 * 100.0)
}

pub fn stable_unit(key: &str) -> f32 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let hash = hasher.finish();
    ((hash & 0xffff_ffff) as f64 / (u32::MAX as f64 + 1.0)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_binary_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MiB");
    }

    #[test]
    fn formats_share_of_total() {
        assert_eq!(format_percent(25, 100), "25.0%");
        assert_eq!(format_percent(1, 0), "--");
    }

    #[test]
    fn stable_unit_is_deterministic_and_bounded() {
        let a = stable_unit("src/components");
        assert_eq!(a, stable_unit("src/components"));
        assert!((0.0..1.0).contains(&a));
    }
}
