use crate::events::SensorKind;

/// Errors surfaced by the compass core and its drivers.
#[derive(Debug, thiserror::Error)]
pub enum CompassError {
    #[error("{}", .0.missing_message())]
    SensorMissing(SensorKind),

    #[error("I2C bus error: {0}")]
    Bus(String),

    #[error("Display error: {0}")]
    Display(String),

    #[error("Invalid command: {0:?}")]
    InvalidCommand(String),
}
