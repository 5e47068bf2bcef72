// QS Compass — Peripheral Drivers
//
// Register-level drivers over the shared I2C bus. Written by hand to avoid
// external crate version conflicts with esp-idf-hal.

use std::sync::Mutex;

use esp_idf_hal::i2c::I2cDriver;

pub mod imu;
pub mod magnetometer;
pub mod oled;

/// Thread-safe handle to a shared I2C bus.
pub type SharedBus = &'static Mutex<I2cDriver<'static>>;
