// QS Compass — Sensor Task
//
// While the sensors are subscribed, polls the accelerometer and the
// magnetometer on their own intervals and pushes each reading to the UI task.
// While unsubscribed (ambient, or hardware missing) the bus is left alone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use qscompass::events::{SensorSample, UiEvent};

use crate::config::*;
use crate::drivers::imu::Mpu6050;
use crate::drivers::magnetometer::Lis3mdl;
use crate::drivers::SharedBus;

pub fn sensor_task(bus: SharedBus, ui_tx: Sender<UiEvent>, sensors_enabled: Arc<AtomicBool>) {
    log::info!("Sensor task started");

    let imu = Mpu6050::new(bus);
    if let Err(e) = imu.init() {
        log::error!("MPU6050 init failed in sensor task: {}", e);
        return;
    }
    let mag = Lis3mdl::new(bus);
    if let Err(e) = mag.init() {
        log::error!("LIS3MDL init failed in sensor task: {}", e);
        return;
    }

    let accel_interval = Duration::from_millis(ACCEL_SAMPLE_INTERVAL_MS);
    let mag_interval = Duration::from_millis(MAG_SAMPLE_INTERVAL_MS);
    let mut last_mag: Option<Instant> = None;

    loop {
        if !sensors_enabled.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(SENSOR_IDLE_POLL_MS));
            continue;
        }

        let tick_start = Instant::now();

        match imu.read_accel() {
            Ok(values) => {
                if ui_tx.send(UiEvent::Sample(SensorSample::accelerometer(values, crate::now_ms()))).is_err() {
                    log::warn!("UI channel closed — exiting sensor task");
                    return;
                }
            }
            Err(e) => log::warn!("Accelerometer read error: {}", e),
        }

        if last_mag.map_or(true, |t| tick_start.duration_since(t) >= mag_interval) {
            last_mag = Some(tick_start);
            match mag.read_field() {
                Ok(values) => {
                    if ui_tx.send(UiEvent::Sample(SensorSample::magnetic_field(values, crate::now_ms()))).is_err() {
                        log::warn!("UI channel closed — exiting sensor task");
                        return;
                    }
                }
                Err(e) => log::warn!("Magnetometer read error: {}", e),
            }
        }

        // Sleep for the remainder of the accelerometer interval.
        let elapsed = tick_start.elapsed();
        if elapsed < accel_interval {
            thread::sleep(accel_interval - elapsed);
        }
    }
}
