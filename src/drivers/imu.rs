// QS Compass — MPU6050 Accelerometer Driver
//
// Only the accelerometer is used: it supplies the gravity vector for the
// orientation maths. The gyroscope stays in standby.

use qscompass::error::CompassError;

use super::SharedBus;
use crate::config::*;

// MPU6050 register addresses
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_PWR_MGMT_2: u8 = 0x6C;
const REG_CONFIG: u8 = 0x1A;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of 6-byte accel burst
const REG_WHO_AM_I: u8 = 0x75;
const WHO_AM_I_EXPECTED: u8 = 0x68;

pub struct Mpu6050 {
    bus: SharedBus,
}

impl Mpu6050 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&self) -> bool {
        let Ok(mut bus) = self.bus.lock() else {
            return false;
        };
        let mut buf = [0u8; 1];
        match bus.write_read(I2C_ADDR_MPU6050, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS) {
            Ok(()) => buf[0] == WHO_AM_I_EXPECTED,
            Err(_) => false,
        }
    }

    /// Wake the sensor, accel ±2 g, DLPF 21 Hz, gyro axes in standby.
    pub fn init(&self) -> anyhow::Result<()> {
        let mut bus = self
            .bus
            .lock()
            .map_err(|_| CompassError::Bus("I2C mutex poisoned".into()))?;

        // Wake up (clear SLEEP bit)
        bus.write(I2C_ADDR_MPU6050, &[REG_PWR_MGMT_1, 0x00], I2C_TIMEOUT_TICKS)?;

        // STBY_XG | STBY_YG | STBY_ZG
        bus.write(I2C_ADDR_MPU6050, &[REG_PWR_MGMT_2, 0x07], I2C_TIMEOUT_TICKS)?;

        // DLPF bandwidth 21 Hz
        bus.write(I2C_ADDR_MPU6050, &[REG_CONFIG, 0x04], I2C_TIMEOUT_TICKS)?;

        // Accelerometer: ±2 g
        bus.write(I2C_ADDR_MPU6050, &[REG_ACCEL_CONFIG, 0x00], I2C_TIMEOUT_TICKS)?;

        log::info!("MPU6050 initialised (±2g, DLPF 21Hz, gyro standby)");
        Ok(())
    }

    /// Burst-read the three accel axes, in m/s².
    pub fn read_accel(&self) -> anyhow::Result<[f32; 3]> {
        let mut bus = self
            .bus
            .lock()
            .map_err(|_| CompassError::Bus("I2C mutex poisoned".into()))?;
        let mut raw = [0u8; 6];
        bus.write_read(I2C_ADDR_MPU6050, &[REG_ACCEL_XOUT_H], &mut raw, I2C_TIMEOUT_TICKS)?;

        let axis = |hi: u8, lo: u8| i16::from_be_bytes([hi, lo]) as f32 / ACCEL_SCALE_2G * STANDARD_GRAVITY;
        Ok([axis(raw[0], raw[1]), axis(raw[2], raw[3]), axis(raw[4], raw[5])])
    }
}
