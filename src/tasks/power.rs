// QS Compass — Power Management Task
//
// Plays the platform's role for ambient mode: after a period without user
// activity it asks the UI to enter ambient mode, then sends one update tick
// per interval until activity resumes. Leaving ambient mode is the UI task's
// job (button click); this task only notices that it happened.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use qscompass::events::{AmbientEvent, UiEvent};

use crate::config::*;

pub fn power_task(ui_tx: Sender<UiEvent>, last_activity_ms: Arc<AtomicU32>) {
    log::info!("Power task started");

    let check_interval = Duration::from_millis(POWER_CHECK_INTERVAL_MS);
    let mut ambient = false;
    let mut last_tick_ms: u32 = 0;

    loop {
        let now = crate::now_ms();
        let idle_ms = now.wrapping_sub(last_activity_ms.load(Ordering::Relaxed));

        if !ambient && idle_ms > INACTIVITY_TIMEOUT_MS {
            log::info!("Inactivity timeout ({} ms) — entering ambient mode", INACTIVITY_TIMEOUT_MS);
            let event = AmbientEvent::Enter { burn_in_protection: BURN_IN_PROTECTION };
            if ui_tx.send(UiEvent::Ambient(event)).is_err() {
                log::warn!("UI channel closed — exiting power task");
                return;
            }
            ambient = true;
            last_tick_ms = now;
        } else if ambient && idle_ms <= INACTIVITY_TIMEOUT_MS {
            // The UI saw a click and already left ambient mode.
            ambient = false;
        } else if ambient && now.wrapping_sub(last_tick_ms) >= AMBIENT_UPDATE_INTERVAL_MS {
            if ui_tx.send(UiEvent::Ambient(AmbientEvent::Update)).is_err() {
                log::warn!("UI channel closed — exiting power task");
                return;
            }
            last_tick_ms = now;
        }

        thread::sleep(check_interval);
    }
}
