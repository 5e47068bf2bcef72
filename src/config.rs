// QS Compass — Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_BUTTON: i32 = 3;      // D1/A1 — User button (INPUT_PULLUP, active LOW)
pub const PIN_I2C_SDA: i32 = 6;     // D4    — I2C data line
pub const PIN_I2C_SCL: i32 = 7;     // D5    — I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MPU6050: u8 = 0x68;
pub const I2C_ADDR_LIS3MDL: u8 = 0x1C;
pub const I2C_ADDR_OLED: u8 = 0x3C;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Display (SSD1306 OLED)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024

/// Diameter of the compass rose drawn on the left half of the screen.
pub const ROSE_DIAMETER: u32 = 60;

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_SENSOR: usize = 4096;
pub const STACK_UI: usize = 8192;
pub const STACK_POWER: usize = 4096;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const ACCEL_SAMPLE_INTERVAL_MS: u64 = 20;          // 50 Hz
pub const MAG_SAMPLE_INTERVAL_MS: u64 = 50;            // 20 Hz (ODR 20 Hz below)
pub const SENSOR_IDLE_POLL_MS: u64 = 100;              // flag poll while unsubscribed
pub const UI_POLL_INTERVAL_MS: u64 = 10;               // 100 Hz input poll / refresh
pub const POWER_CHECK_INTERVAL_MS: u64 = 1000;
pub const DEBOUNCE_MS: u64 = 50;
pub const INACTIVITY_TIMEOUT_MS: u32 = 30_000;         // 30 seconds → ambient
pub const AMBIENT_UPDATE_INTERVAL_MS: u32 = 60_000;    // one ambient tick per minute

// ---------------------------------------------------------------------------
// Ambient mode
// ---------------------------------------------------------------------------
/// Maximum burn-in jitter on each axis, in pixels.
pub const BURN_IN_OFFSET_PX: i32 = 10;

/// Whether the panel asks for burn-in protection while ambient.
pub const BURN_IN_PROTECTION: bool = cfg!(feature = "burn-in-protection");

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------
/// Below this |gravity x field| the rotation matrix is undefined
/// (free fall, or pointing straight at the magnetic pole).
pub const MIN_HORIZONTAL_FIELD: f32 = 0.1;

// ---------------------------------------------------------------------------
// Sensor Scale Factors
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_2G: f32 = 16384.0;  // LSB/g  at ±2 g
pub const STANDARD_GRAVITY: f32 = 9.806_65; // m/s² per g
pub const MAG_SCALE_4GAUSS: f32 = 6842.0; // LSB/gauss at ±4 gauss
pub const MICROTESLA_PER_GAUSS: f32 = 100.0;
