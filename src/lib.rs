// QS Compass — Core Library
//
// Everything that does not touch a peripheral: orientation maths, the sample
// rendezvous, the ambient state machine, the application controller and
// screen rendering. The firmware binary wires these to the real sensors,
// panel and button; host builds exercise them directly.

pub mod ambient;
pub mod app;
pub mod compass;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod rendezvous;
pub mod sim;

pub use ambient::{DisplayState, Effect, Offset};
pub use app::{CompassApp, HardwareSupport, Screen};
pub use compass::{classify, Direction, Heading};
pub use error::CompassError;
pub use events::{AmbientEvent, SensorKind, SensorSample, UiEvent};
pub use rendezvous::SamplePair;
