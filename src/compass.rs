// QS Compass — Orientation Classifier
//
// Fuses one gravity vector and one magnetic-field vector (device frame, any
// magnitude) into a rotation matrix, pulls the azimuth out of it, and maps
// the azimuth to one of eight direction labels.

use core::fmt;

use crate::config::MIN_HORIZONTAL_FIELD;

/// Row-major 3x3 rotation matrix from device frame to world frame
/// (x = east, y = magnetic north, z = sky).
pub type RotationMatrix = [f32; 9];

// ---------------------------------------------------------------------------
// Direction labels
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    EN,
    E,
    ES,
    S,
    WS,
    W,
    WN,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Self::N,
        Self::EN,
        Self::E,
        Self::ES,
        Self::S,
        Self::WS,
        Self::W,
        Self::WN,
    ];

    /// Map whole degrees to a label. Values outside [0, 360) are wrapped first.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            0..=4 | 355..=359 => Self::N,
            5..=84 => Self::EN,
            85..=94 => Self::E,
            95..=174 => Self::ES,
            175..=184 => Self::S,
            185..=264 => Self::WS,
            265..=274 => Self::W,
            _ => Self::WN,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::EN => "EN",
            Self::E => "E",
            Self::ES => "ES",
            Self::S => "S",
            Self::WS => "WS",
            Self::W => "W",
            Self::WN => "WN",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Heading
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading {
    /// Azimuth as produced by [`orientation`], in (-π, π].
    pub azimuth_rad: f32,
    /// Azimuth in degrees before normalisation; drives the rose rotation.
    pub raw_degrees: f32,
    /// Whole degrees in [0, 360), used for the label and the text.
    pub degrees: u16,
    pub direction: Direction,
}

impl Heading {
    pub fn from_azimuth(azimuth_rad: f32) -> Self {
        Self::from_raw_degrees(azimuth_rad, azimuth_rad.to_degrees())
    }

    fn from_raw_degrees(azimuth_rad: f32, raw_degrees: f32) -> Self {
        // Truncate toward zero first, then wrap: -10.4° reads as 350°.
        let degrees = (raw_degrees as i32).rem_euclid(360);
        Self {
            azimuth_rad,
            raw_degrees,
            degrees: degrees as u16,
            direction: Direction::from_degrees(degrees),
        }
    }

    /// Clockwise rotation to apply to the rose so that its north pointer
    /// points at magnetic north.
    pub fn rose_rotation_degrees(&self) -> f32 {
        360.0 - self.raw_degrees
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}°", self.direction, self.degrees)
    }
}

// ---------------------------------------------------------------------------
// Rotation matrix / orientation
// ---------------------------------------------------------------------------
/// Device orientation in radians. Only `azimuth` drives the heading;
/// `pitch` and `roll` are kept for inspection and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub azimuth: f32,
    pub pitch: f32,
    pub roll: f32,
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

fn scale(v: [f32; 3], k: f32) -> [f32; 3] {
    [v[0] * k, v[1] * k, v[2] * k]
}

/// Build the device-to-world rotation matrix from gravity and the
/// geomagnetic field.
///
/// Returns `None` when the horizontal field component is too small to define
/// east, which happens in free fall, with a zero gravity vector, or when the
/// device points straight along the field lines.
pub fn rotation_matrix(gravity: [f32; 3], geomagnetic: [f32; 3]) -> Option<RotationMatrix> {
    let h = cross(geomagnetic, gravity);
    let norm_h = norm(h);
    if norm_h.is_nan() || norm_h < MIN_HORIZONTAL_FIELD {
        return None;
    }
    let h = scale(h, 1.0 / norm_h);
    let a = scale(gravity, 1.0 / norm(gravity));
    let m = cross(a, h);

    Some([
        h[0], h[1], h[2], //
        m[0], m[1], m[2], //
        a[0], a[1], a[2],
    ])
}

/// Euler angles (radians) of a rotation matrix from [`rotation_matrix`].
pub fn orientation(r: &RotationMatrix) -> Orientation {
    Orientation {
        azimuth: r[1].atan2(r[4]),
        pitch: (-r[7]).asin(),
        roll: (-r[6]).atan2(r[8]),
    }
}

/// Classify one gravity/field pair into a heading.
pub fn classify(gravity: [f32; 3], magnetic: [f32; 3]) -> Option<Heading> {
    let r = rotation_matrix(gravity, magnetic)?;
    Some(Heading::from_azimuth(orientation(&r).azimuth))
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f32 = 9.81;

    #[test]
    fn test_bin_edges() {
        let cases = [
            (0, Direction::N),
            (4, Direction::N),
            (5, Direction::EN),
            (84, Direction::EN),
            (85, Direction::E),
            (94, Direction::E),
            (95, Direction::ES),
            (174, Direction::ES),
            (175, Direction::S),
            (184, Direction::S),
            (185, Direction::WS),
            (264, Direction::WS),
            (265, Direction::W),
            (274, Direction::W),
            (275, Direction::WN),
            (354, Direction::WN),
            (355, Direction::N),
            (359, Direction::N),
        ];
        for (degrees, expected) in cases {
            assert_eq!(Direction::from_degrees(degrees), expected, "at {degrees}°");
        }
    }

    #[test]
    fn test_every_degree_has_one_label() {
        let mut counts = [0usize; 8];
        for d in 0..360 {
            let dir = Direction::from_degrees(d);
            let idx = Direction::ALL.iter().position(|x| *x == dir).unwrap();
            counts[idx] += 1;
        }
        assert_eq!(counts, [10, 80, 10, 80, 10, 80, 10, 80]);
    }

    #[test]
    fn test_out_of_range_wraps() {
        assert_eq!(Direction::from_degrees(360), Direction::N);
        assert_eq!(Direction::from_degrees(-90), Direction::W);
        assert_eq!(Direction::from_degrees(450), Direction::E);
    }

    #[test]
    fn test_negative_azimuth_normalizes() {
        let heading = Heading::from_raw_degrees(-0.174_532_93, -10.0);
        assert_eq!(heading.degrees, 350);
        assert_eq!(heading.direction, Direction::WN);

        // Just west of north wraps into the upper half of the N bin.
        let heading = Heading::from_raw_degrees(-0.052_359_88, -3.0);
        assert_eq!(heading.degrees, 357);
        assert_eq!(heading.direction, Direction::N);

        // Truncation happens before wrapping.
        let heading = Heading::from_azimuth((-10.6f32).to_radians());
        assert_eq!(heading.degrees, 350);

        let heading = Heading::from_raw_degrees(-0.0087, -0.5);
        assert_eq!(heading.degrees, 0);
        assert_eq!(heading.direction, Direction::N);
    }

    #[test]
    fn test_display_text() {
        let heading = Heading::from_azimuth(42.7f32.to_radians());
        assert_eq!(heading.to_string(), "EN 42°");
    }

    #[test]
    fn test_rose_rotation_uses_raw_angle() {
        let heading = Heading::from_azimuth((-90.0f32).to_radians());
        assert!((heading.rose_rotation_degrees() - 450.0).abs() < 1e-3);
    }

    #[test]
    fn test_flat_facing_north() {
        // Device flat, top edge toward magnetic north, northern hemisphere dip.
        let heading = classify([0.0, 0.0, G], [0.0, 22.0, -40.0]).unwrap();
        assert_eq!(heading.degrees, 0);
        assert_eq!(heading.direction, Direction::N);
    }

    #[test]
    fn test_flat_facing_east() {
        let r = rotation_matrix([0.0, 0.0, G], [-22.0, 0.0, -40.0]).unwrap();
        let o = orientation(&r);
        assert!((o.azimuth.to_degrees() - 90.0).abs() < 0.01);
        assert!(o.pitch.abs() < 1e-4);
        assert!(o.roll.abs() < 1e-4);
        assert_eq!(Heading::from_azimuth(o.azimuth).direction, Direction::E);
    }

    #[test]
    fn test_tilt_shows_in_pitch_not_azimuth() {
        // Top edge raised 30°, still facing north.
        let tilt = 30f32.to_radians();
        let gravity = [0.0, G * tilt.sin(), G * tilt.cos()];
        let r = rotation_matrix(gravity, [0.0, 22.0, -40.0]).unwrap();
        let o = orientation(&r);
        assert!((o.pitch.to_degrees() + 30.0).abs() < 0.01);
        assert!(o.roll.abs() < 1e-4);
        assert!(o.azimuth.abs() < 1e-4);
    }

    #[test]
    fn test_flat_facing_west_goes_through_negative_angle() {
        let heading = classify([0.0, 0.0, G], [22.0, 0.0, -40.0]).unwrap();
        assert!(heading.raw_degrees < 0.0);
        assert!((270..=271).contains(&heading.degrees));
        assert_eq!(heading.direction, Direction::W);
    }

    #[test]
    fn test_magnitude_does_not_matter() {
        let a = classify([0.0, 0.0, 1.0], [-5.0, 5.0, -8.0]).unwrap();
        let b = classify([0.0, 0.0, 100.0], [-50.0, 50.0, -80.0]).unwrap();
        assert!((a.raw_degrees - b.raw_degrees).abs() < 1e-3);
        assert!((a.raw_degrees - 45.0).abs() < 1e-3);
        assert_eq!(a.direction, Direction::EN);
        assert_eq!(b.direction, Direction::EN);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(rotation_matrix([0.0, 0.0, 0.0], [0.0, 22.0, -40.0]).is_none());
        assert!(rotation_matrix([0.0, 0.0, G], [0.0, 0.0, -40.0]).is_none());
        assert!(classify([0.0, 0.0, G], [0.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn test_rotation_matrix_is_orthonormal() {
        let r = rotation_matrix([1.2, -0.4, 9.6], [12.0, 18.0, -35.0]).unwrap();
        for row in 0..3 {
            let v = [r[row * 3], r[row * 3 + 1], r[row * 3 + 2]];
            assert!((norm(v) - 1.0).abs() < 1e-4);
        }
        let dot = r[0] * r[3] + r[1] * r[4] + r[2] * r[5];
        assert!(dot.abs() < 1e-4);
    }
}
