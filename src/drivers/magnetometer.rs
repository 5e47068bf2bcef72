// QS Compass — LIS3MDL Magnetometer Driver
//
// Continuous conversion at 20 Hz, ±4 gauss. Axes are mounted parallel to the
// MPU6050 so both vectors share the device frame.

use qscompass::error::CompassError;

use super::SharedBus;
use crate::config::*;

const REG_WHO_AM_I: u8 = 0x0F;
const REG_CTRL_REG1: u8 = 0x20;
const REG_CTRL_REG2: u8 = 0x21;
const REG_CTRL_REG3: u8 = 0x22;
const REG_CTRL_REG4: u8 = 0x23;
const REG_OUT_X_L: u8 = 0x28;
const WHO_AM_I_EXPECTED: u8 = 0x3D;

/// Sub-address bit that enables register auto-increment on burst reads.
const AUTO_INCREMENT: u8 = 0x80;

pub struct Lis3mdl {
    bus: SharedBus,
}

impl Lis3mdl {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    pub fn is_connected(&self) -> bool {
        let Ok(mut bus) = self.bus.lock() else {
            return false;
        };
        let mut buf = [0u8; 1];
        match bus.write_read(I2C_ADDR_LIS3MDL, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS) {
            Ok(()) => buf[0] == WHO_AM_I_EXPECTED,
            Err(_) => false,
        }
    }

    pub fn init(&self) -> anyhow::Result<()> {
        let mut bus = self
            .bus
            .lock()
            .map_err(|_| CompassError::Bus("I2C mutex poisoned".into()))?;

        // X/Y ultra-high-performance, ODR 20 Hz
        bus.write(I2C_ADDR_LIS3MDL, &[REG_CTRL_REG1, 0x74], I2C_TIMEOUT_TICKS)?;

        // Full scale ±4 gauss
        bus.write(I2C_ADDR_LIS3MDL, &[REG_CTRL_REG2, 0x00], I2C_TIMEOUT_TICKS)?;

        // Continuous-conversion mode
        bus.write(I2C_ADDR_LIS3MDL, &[REG_CTRL_REG3, 0x00], I2C_TIMEOUT_TICKS)?;

        // Z ultra-high-performance
        bus.write(I2C_ADDR_LIS3MDL, &[REG_CTRL_REG4, 0x0C], I2C_TIMEOUT_TICKS)?;

        log::info!("LIS3MDL initialised (±4 gauss, 20Hz)");
        Ok(())
    }

    /// Burst-read the three field axes, in µT.
    pub fn read_field(&self) -> anyhow::Result<[f32; 3]> {
        let mut bus = self
            .bus
            .lock()
            .map_err(|_| CompassError::Bus("I2C mutex poisoned".into()))?;
        let mut raw = [0u8; 6];
        bus.write_read(
            I2C_ADDR_LIS3MDL,
            &[REG_OUT_X_L | AUTO_INCREMENT],
            &mut raw,
            I2C_TIMEOUT_TICKS,
        )?;

        let axis = |lo: u8, hi: u8| i16::from_le_bytes([lo, hi]) as f32 / MAG_SCALE_4GAUSS * MICROTESLA_PER_GAUSS;
        Ok([axis(raw[0], raw[1]), axis(raw[2], raw[3]), axis(raw[4], raw[5])])
    }
}
