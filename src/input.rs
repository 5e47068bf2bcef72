// QS Compass — Button Input Manager
//
// Debounced single-click detection, polled at ~100 Hz from the UI task.
// A click is reported on the release edge.

use std::sync::mpsc::Sender;
use std::time::Instant;

use esp_idf_hal::gpio::{AnyInputPin, Input, PinDriver};

use qscompass::events::UiEvent;

use crate::config::*;

pub struct InputManager<'d> {
    pin: PinDriver<'d, AnyInputPin, Input>,
    ui_tx: Sender<UiEvent>,

    // Debounce state
    last_raw: bool,
    last_debounce: Instant,

    button_down: bool,
}

impl<'d> InputManager<'d> {
    pub fn new(pin: PinDriver<'d, AnyInputPin, Input>, ui_tx: Sender<UiEvent>) -> Self {
        Self {
            pin,
            ui_tx,
            last_raw: true, // pull-up → idle HIGH
            last_debounce: Instant::now(),
            button_down: false,
        }
    }

    /// Call every ~10 ms from the UI task loop.
    pub fn update(&mut self) {
        let current = self.pin.is_high(); // true = released (pull-up)
        let now = Instant::now();

        // ---- debounce filter ----
        if current != self.last_raw {
            self.last_debounce = now;
        }
        self.last_raw = current;

        let stable_ms = now.duration_since(self.last_debounce).as_millis() as u64;
        if stable_ms < DEBOUNCE_MS {
            return;
        }

        let pressed = !current; // active LOW

        if pressed && !self.button_down {
            self.button_down = true;
        }

        if !pressed && self.button_down {
            self.button_down = false;
            let _ = self.ui_tx.send(UiEvent::ButtonClick);
        }
    }
}
