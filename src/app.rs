// QS Compass — Application Controller
//
// Owns everything the UI shows: the sample rendezvous, the ambient state
// machine, the last heading and the hardware verdict from boot. The caller
// feeds it events and reads back `screen()` and `sensors_enabled()`.

use rand::Rng;

use crate::ambient::{DisplayState, Effect, Offset};
use crate::compass::Heading;
use crate::error::CompassError;
use crate::events::{AmbientEvent, SensorKind, SensorSample};
use crate::rendezvous::SamplePair;

/// Which required sensors answered at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareSupport {
    pub accelerometer: bool,
    pub magnetometer: bool,
}

impl HardwareSupport {
    pub const ALL: HardwareSupport = HardwareSupport { accelerometer: true, magnetometer: true };

    pub fn missing(&self) -> Vec<SensorKind> {
        let mut missing = Vec::new();
        if !self.magnetometer {
            missing.push(SensorKind::MagneticField);
        }
        if !self.accelerometer {
            missing.push(SensorKind::Accelerometer);
        }
        missing
    }

    /// `Err` names the first missing sensor.
    pub fn check(&self) -> Result<(), CompassError> {
        match self.missing().first() {
            Some(kind) => Err(CompassError::SensorMissing(*kind)),
            None => Ok(()),
        }
    }
}

/// What the display should show right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    /// `heading` is `None` until the first pair has been classified.
    Compass { heading: Option<Heading> },
    Ambient { offset: Offset },
    Unsupported { missing: SensorKind },
}

pub struct CompassApp {
    missing: Option<SensorKind>,
    samples: SamplePair,
    state: DisplayState,
    heading: Option<Heading>,
    subscribed: bool,
}

impl CompassApp {
    pub fn new(support: HardwareSupport) -> Self {
        for kind in support.missing() {
            log::warn!("{}", kind.missing_message());
        }
        let missing = match support.check() {
            Err(CompassError::SensorMissing(kind)) => Some(kind),
            _ => None,
        };
        Self {
            missing,
            samples: SamplePair::new(),
            state: DisplayState::default(),
            heading: None,
            subscribed: false,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.missing.is_none()
    }

    pub fn sensors_enabled(&self) -> bool {
        self.subscribed
    }

    pub fn heading(&self) -> Option<Heading> {
        self.heading
    }

    pub fn display_state(&self) -> DisplayState {
        self.state
    }

    /// Subscribe to both sensors, unless unsupported or ambient.
    /// Returns whether the sensors are now enabled.
    pub fn resume(&mut self) -> bool {
        if self.is_supported() && !self.state.is_ambient() && !self.subscribed {
            log::info!("Subscribing to accelerometer and magnetometer");
            self.subscribed = true;
        }
        self.subscribed
    }

    pub fn stop(&mut self) {
        if self.subscribed {
            log::info!("Unsubscribing from sensors");
        }
        self.subscribed = false;
        self.samples.clear();
    }

    /// Feed one sensor sample; returns a heading when the pair completed.
    pub fn on_sample(&mut self, sample: &SensorSample) -> Option<Heading> {
        if !self.subscribed {
            return None;
        }
        log::debug!("{} update {:?} @{}ms", sample.kind, sample.values, sample.timestamp_ms);
        self.samples.push(sample);

        let heading = self.samples.try_classify()?;
        self.heading = Some(heading);
        Some(heading)
    }

    /// Run an ambient callback through the state machine and apply the
    /// subscription effects. Returns every effect for the caller's layout.
    pub fn on_ambient<R: Rng + ?Sized>(&mut self, event: AmbientEvent, rng: &mut R) -> Vec<Effect> {
        if !self.is_supported() {
            return Vec::new();
        }
        let effects = self.state.transition(event, rng);
        for effect in &effects {
            match effect {
                Effect::SubscribeSensors => {
                    self.resume();
                }
                Effect::UnsubscribeSensors => self.stop(),
                Effect::ShowCompass | Effect::ShowAmbient | Effect::SetPadding(_) => {}
            }
        }
        effects
    }

    pub fn screen(&self) -> Screen {
        if let Some(missing) = self.missing {
            return Screen::Unsupported { missing };
        }
        match self.state {
            DisplayState::Active => Screen::Compass { heading: self.heading },
            DisplayState::Ambient { offset, .. } => Screen::Ambient { offset },
        }
    }
}
