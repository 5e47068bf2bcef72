// QS Compass — System Events & Data Types

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor Data
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Accelerometer,
    MagneticField,
}

impl SensorKind {
    /// Message shown when the sensor cannot be found at boot.
    pub fn missing_message(&self) -> &'static str {
        match self {
            Self::Accelerometer => "Accelerometer Not Found",
            Self::MagneticField => "Magnetic Not Found",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accelerometer => f.write_str("accelerometer"),
            Self::MagneticField => f.write_str("magnetometer"),
        }
    }
}

/// One 3-axis reading. Accelerometer values are m/s², magnetometer values µT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub kind: SensorKind,
    pub values: [f32; 3],
    /// Milliseconds since boot; only used for ordering and logs.
    pub timestamp_ms: u32,
}

impl SensorSample {
    pub fn accelerometer(values: [f32; 3], timestamp_ms: u32) -> Self {
        Self { kind: SensorKind::Accelerometer, values, timestamp_ms }
    }

    pub fn magnetic_field(values: [f32; 3], timestamp_ms: u32) -> Self {
        Self { kind: SensorKind::MagneticField, values, timestamp_ms }
    }
}

// ---------------------------------------------------------------------------
// Ambient callbacks
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientEvent {
    /// Entering low-power display mode.
    Enter { burn_in_protection: bool },
    /// Periodic refresh while ambient.
    Update,
    /// Leaving low-power display mode.
    Exit,
}

// ---------------------------------------------------------------------------
// UI Events — sent to the UI task via channel
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy)]
pub enum UiEvent {
    /// A raw sensor sample arrived from the sensor task.
    Sample(SensorSample),
    /// Ambient mode callback from the power task.
    Ambient(AmbientEvent),
    /// Single button click detected.
    ButtonClick,
}
