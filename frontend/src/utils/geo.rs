use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Six decimals, the precision the location picker shows.
    pub fn display(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        let jakarta = Coordinates::new(-6.2088, 106.8456);
        assert_eq!(haversine_km(jakarta, jakarta), 0.0);
    }

    #[test]
    fn one_degree_of_longitude_at_equator_is_about_111_km() {
        let d = haversine_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        assert!((d - 111.2).abs() / 111.2 < 0.01, "distance was {}", d);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates::new(-6.2088, 106.8456);
        let b = Coordinates::new(-6.9175, 107.6191);
        let ab = haversine_km(a, b);
        let ba = haversine_km(b, a);
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab > 100.0 && ab < 130.0);
    }

    #[test]
    fn validity_checks_both_ranges() {
        assert!(Coordinates::new(90.0, -180.0).is_valid());
        assert!(!Coordinates::new(90.1, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, 180.5).is_valid());
        assert_eq!(Coordinates::new(-6.2, 106.8).display(), "-6.200000, 106.800000");
    }
}
