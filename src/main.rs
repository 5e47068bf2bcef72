// QS Compass — Firmware Entry Point
//
// Boot sequence (watch):
//   1. Bring up the shared I2C bus and the OLED.
//   2. Probe the MPU6050 and the LIS3MDL. A missing sensor is reported on
//      screen and sensor-driven functions stay off for the session.
//   3. Spawn the UI, power and (when supported) sensor tasks.
//
// Ambient mode is entered after a period without button activity and left
// on the next click.
//
// On any other target this binary runs the host simulator over stdin.

#[cfg(target_os = "espidf")]
use qscompass::config;

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod input;
#[cfg(target_os = "espidf")]
mod tasks;

#[cfg(target_os = "espidf")]
pub use firmware::now_ms;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::atomic::{AtomicBool, AtomicU32};
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{AnyInputPin, Input, InputPin, PinDriver};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use qscompass::app::HardwareSupport;

    use crate::config::*;
    use crate::drivers::imu::Mpu6050;
    use crate::drivers::magnetometer::Lis3mdl;
    use crate::drivers::oled::OledDisplay;
    use crate::tasks;

    // -----------------------------------------------------------------------
    // Utility: milliseconds since boot (wraps at ~49 days — fine for timeouts)
    // -----------------------------------------------------------------------
    pub fn now_ms() -> u32 {
        unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as u32 }
    }

    pub fn run() -> anyhow::Result<()> {
        // Link esp-idf-sys runtime patches and initialise logging.
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("QS Compass firmware starting…");

        // ---- Peripherals --------------------------------------------------
        let peripherals = Peripherals::take()?;

        // Button GPIO (pull-up, active LOW).
        let button = PinDriver::input(peripherals.pins.gpio3.downgrade_input())?;
        configure_pullup(&button);

        // ---- I2C bus (shared between OLED, MPU6050 and LIS3MDL) -----------
        let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio6, // SDA
            peripherals.pins.gpio7, // SCL
            &i2c_config,
        )?;
        // SAFETY: The I2C peripheral is a singleton obtained from `Peripherals::take()`.
        // It will live for the entire programme duration (embedded firmware never exits).
        let i2c_bus: &'static Mutex<I2cDriver<'static>> =
            Box::leak(Box::new(Mutex::new(unsafe { core::mem::transmute(i2c) })));

        let mut display = OledDisplay::new(i2c_bus);
        if let Err(e) = display.init() {
            // Keep going so the sensors can still be debugged via serial.
            log::error!("{}", e);
        }

        // ---- Hardware check ----------------------------------------------
        let support = HardwareSupport {
            accelerometer: Mpu6050::new(i2c_bus).is_connected(),
            magnetometer: Lis3mdl::new(i2c_bus).is_connected(),
        };
        if let Err(e) = support.check() {
            log::error!("Hardware check failed: {} — compass disabled", e);
        }

        // ---- Channels -----------------------------------------------------
        let (ui_tx, ui_rx) = mpsc::channel();

        // ---- Shared state -------------------------------------------------
        let sensors_enabled = Arc::new(AtomicBool::new(false));
        let last_activity_ms = Arc::new(AtomicU32::new(now_ms()));

        // SAFETY: GPIO peripheral lives forever, same argument as I2C above.
        let button_static: PinDriver<'static, AnyInputPin, Input> =
            unsafe { core::mem::transmute(button) };

        // ---- Spawn tasks (map to FreeRTOS tasks via std::thread) -----------
        if support.check().is_ok() {
            let sensor_tx = ui_tx.clone();
            let sensor_enabled = Arc::clone(&sensors_enabled);
            thread::Builder::new()
                .name("sensor".into())
                .stack_size(STACK_SENSOR)
                .spawn(move || {
                    tasks::sensor::sensor_task(i2c_bus, sensor_tx, sensor_enabled);
                })?;
        }

        let ui_enabled = Arc::clone(&sensors_enabled);
        let ui_activity = Arc::clone(&last_activity_ms);
        let ui_tx_for_input = ui_tx.clone();
        thread::Builder::new()
            .name("ui".into())
            .stack_size(STACK_UI)
            .spawn(move || {
                tasks::ui::ui_task(
                    i2c_bus,
                    button_static,
                    support,
                    ui_rx,
                    ui_tx_for_input,
                    ui_enabled,
                    ui_activity,
                );
            })?;

        let pwr_activity = Arc::clone(&last_activity_ms);
        thread::Builder::new()
            .name("power".into())
            .stack_size(STACK_POWER)
            .spawn(move || {
                tasks::power::power_task(ui_tx, pwr_activity);
            })?;

        // Main thread has nothing left to do — park it forever.
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }

    /// Internal pull-up on the button. `PinDriver::set_pull` needs an
    /// input/output pin, which the downgraded input pin is not.
    fn configure_pullup(_pin: &PinDriver<'_, AnyInputPin, Input>) {
        unsafe {
            esp_idf_sys::gpio_set_pull_mode(
                PIN_BUTTON,
                esp_idf_sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY,
            );
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io;

    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use qscompass::app::{CompassApp, HardwareSupport};
    use qscompass::sim;

    /// `--no-accelerometer` / `--no-magnetometer` simulate missing hardware.
    pub fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let mut support = HardwareSupport::ALL;
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--no-accelerometer" => support.accelerometer = false,
                "--no-magnetometer" => support.magnetometer = false,
                other => anyhow::bail!("unknown argument: {}", other),
            }
        }

        log::info!("QS Compass simulator reading commands from stdin");
        let mut app = CompassApp::new(support);
        let mut rng = SmallRng::from_entropy();
        sim::run(&mut app, io::stdin().lock(), io::stdout().lock(), &mut rng)
    }
}
