// QS Compass — Sample Rendezvous
//
// Keeps the latest accelerometer and magnetometer vectors. A heading is
// computed only once both have arrived since the previous heading; taking
// the pair clears both freshness flags in the same call.

use crate::compass::{self, Heading};
use crate::events::{SensorKind, SensorSample};

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    values: [f32; 3],
    fresh: bool,
}

impl Slot {
    fn store(&mut self, values: [f32; 3]) {
        self.values = values;
        self.fresh = true;
    }
}

#[derive(Debug, Clone, Default)]
pub struct SamplePair {
    gravity: Slot,
    magnetic: Slot,
}

impl SamplePair {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest vector for `kind` and mark it fresh.
    pub fn update(&mut self, kind: SensorKind, values: [f32; 3]) {
        match kind {
            SensorKind::Accelerometer => self.gravity.store(values),
            SensorKind::MagneticField => self.magnetic.store(values),
        }
    }

    pub fn push(&mut self, sample: &SensorSample) {
        self.update(sample.kind, sample.values);
    }

    /// Whether a sample of `kind` is waiting to be paired. Inspection only;
    /// the controller goes through `try_take` / `try_classify`.
    pub fn is_fresh(&self, kind: SensorKind) -> bool {
        match kind {
            SensorKind::Accelerometer => self.gravity.fresh,
            SensorKind::MagneticField => self.magnetic.fresh,
        }
    }

    /// `(gravity, magnetic)` if both are fresh; both become stale.
    /// Leaves the flags untouched otherwise.
    pub fn try_take(&mut self) -> Option<([f32; 3], [f32; 3])> {
        if !(self.gravity.fresh && self.magnetic.fresh) {
            return None;
        }
        self.gravity.fresh = false;
        self.magnetic.fresh = false;
        Some((self.gravity.values, self.magnetic.values))
    }

    /// Take a fresh pair and run it through the classifier.
    ///
    /// The pair is consumed even when the vectors are degenerate, so a bad
    /// reading never gets classified twice.
    pub fn try_classify(&mut self) -> Option<Heading> {
        let (gravity, magnetic) = self.try_take()?;
        let heading = compass::classify(gravity, magnetic);
        if heading.is_none() {
            log::debug!("Rotation matrix undefined for g={:?} m={:?}", gravity, magnetic);
        }
        heading
    }

    /// Forget pending samples, e.g. after the sensors were unsubscribed.
    pub fn clear(&mut self) {
        self.gravity.fresh = false;
        self.magnetic.fresh = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compass::Direction;

    const GRAVITY: [f32; 3] = [0.0, 0.0, 9.81];
    const NORTH: [f32; 3] = [0.0, 22.0, -40.0];
    const EAST: [f32; 3] = [-22.0, 0.0, -40.0];

    #[test]
    fn test_needs_both_kinds() {
        let mut pair = SamplePair::new();
        assert!(pair.try_classify().is_none());

        pair.update(SensorKind::Accelerometer, GRAVITY);
        assert!(pair.try_classify().is_none());
        assert!(pair.is_fresh(SensorKind::Accelerometer));

        pair.update(SensorKind::MagneticField, NORTH);
        let heading = pair.try_classify().unwrap();
        assert_eq!(heading.direction, Direction::N);
        assert!(!pair.is_fresh(SensorKind::Accelerometer));
        assert!(!pair.is_fresh(SensorKind::MagneticField));
    }

    #[test]
    fn test_repeated_accelerometer_does_not_reclassify() {
        let mut pair = SamplePair::new();
        pair.update(SensorKind::Accelerometer, GRAVITY);
        pair.update(SensorKind::MagneticField, NORTH);
        assert!(pair.try_classify().is_some());

        pair.update(SensorKind::Accelerometer, GRAVITY);
        assert!(pair.try_classify().is_none());
        pair.update(SensorKind::Accelerometer, GRAVITY);
        assert!(pair.try_classify().is_none());

        pair.update(SensorKind::MagneticField, EAST);
        assert_eq!(pair.try_classify().unwrap().direction, Direction::E);
    }

    #[test]
    fn test_latest_sample_wins() {
        let mut pair = SamplePair::new();
        pair.push(&SensorSample::magnetic_field(NORTH, 10));
        pair.push(&SensorSample::magnetic_field(EAST, 20));
        pair.push(&SensorSample::accelerometer(GRAVITY, 30));
        assert_eq!(pair.try_classify().unwrap().direction, Direction::E);
    }

    #[test]
    fn test_degenerate_pair_is_consumed() {
        let mut pair = SamplePair::new();
        pair.update(SensorKind::Accelerometer, [0.0; 3]);
        pair.update(SensorKind::MagneticField, NORTH);
        assert!(pair.try_classify().is_none());
        assert!(!pair.is_fresh(SensorKind::MagneticField));

        pair.update(SensorKind::Accelerometer, GRAVITY);
        assert!(pair.try_classify().is_none());
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut pair = SamplePair::new();
        pair.update(SensorKind::Accelerometer, GRAVITY);
        pair.clear();
        pair.update(SensorKind::MagneticField, NORTH);
        assert!(pair.try_take().is_none());
    }
}
