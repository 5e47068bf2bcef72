// QS Compass — SSD1306 OLED Driver
//
// Streams a `FrameBuffer` to a 128x64 SSD1306 in horizontal addressing mode.
// Contrast is lowered while ambient; that is the panel's "dark background".

use qscompass::display::FrameBuffer;
use qscompass::error::CompassError;

use super::SharedBus;
use crate::config::*;

const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

const CMD_SET_CONTRAST: u8 = 0x81;
const CMD_DISPLAY_OFF: u8 = 0xAE;
const CMD_DISPLAY_ON: u8 = 0xAF;
const CMD_COLUMN_ADDR: u8 = 0x21;
const CMD_PAGE_ADDR: u8 = 0x22;

pub const CONTRAST_NORMAL: u8 = 0xCF;
pub const CONTRAST_AMBIENT: u8 = 0x01;

/// Data bytes per I2C transaction (plus the control byte).
const CHUNK: usize = 16;

const INIT_SEQUENCE: &[u8] = &[
    CMD_DISPLAY_OFF,
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex 64
    0xD3, 0x00, // display offset
    0x40,       // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1,       // segment remap
    0xC8,       // COM scan descending
    0xDA, 0x12, // COM pins
    CMD_SET_CONTRAST, CONTRAST_NORMAL,
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH
    0xA4,       // resume from RAM
    0xA6,       // normal (not inverted)
    CMD_DISPLAY_ON,
];

pub struct OledDisplay {
    bus: SharedBus,
}

impl OledDisplay {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    fn command(&self, bytes: &[u8]) -> anyhow::Result<()> {
        let mut bus = self
            .bus
            .lock()
            .map_err(|_| CompassError::Bus("I2C mutex poisoned".into()))?;
        for &byte in bytes {
            bus.write(I2C_ADDR_OLED, &[CONTROL_COMMAND, byte], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }

    /// Verify the panel acknowledges its address.
    pub fn is_connected(&self) -> bool {
        match self.bus.lock() {
            Ok(mut bus) => bus
                .write(I2C_ADDR_OLED, &[CONTROL_COMMAND, 0xE3], I2C_TIMEOUT_TICKS)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn init(&mut self) -> anyhow::Result<()> {
        if !self.is_connected() {
            return Err(CompassError::Display(format!("no SSD1306 at {:#04x}", I2C_ADDR_OLED)).into());
        }
        self.command(INIT_SEQUENCE)?;
        log::info!("SSD1306 initialised ({}x{})", SCREEN_WIDTH, SCREEN_HEIGHT);
        Ok(())
    }

    pub fn set_contrast(&mut self, contrast: u8) -> anyhow::Result<()> {
        self.command(&[CMD_SET_CONTRAST, contrast])
    }

    /// Push the whole frame buffer to the panel.
    pub fn flush(&mut self, frame: &FrameBuffer) -> anyhow::Result<()> {
        self.command(&[
            CMD_COLUMN_ADDR,
            0,
            (SCREEN_WIDTH - 1) as u8,
            CMD_PAGE_ADDR,
            0,
            (SCREEN_HEIGHT / 8 - 1) as u8,
        ])?;

        let mut bus = self
            .bus
            .lock()
            .map_err(|_| CompassError::Bus("I2C mutex poisoned".into()))?;
        let mut packet = [0u8; CHUNK + 1];
        packet[0] = CONTROL_DATA;
        for chunk in frame.as_bytes().chunks(CHUNK) {
            packet[1..=chunk.len()].copy_from_slice(chunk);
            bus.write(I2C_ADDR_OLED, &packet[..=chunk.len()], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }
}
