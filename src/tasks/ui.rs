// QS Compass — UI Task
//
// Owns the OLED, the button and the `CompassApp` controller. Sensor samples
// and ambient callbacks arrive on the UI channel; the screen is redrawn only
// when what it shows has changed.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyInputPin, Input, PinDriver};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use qscompass::ambient::Effect;
use qscompass::app::{CompassApp, HardwareSupport};
use qscompass::display::{draw_screen, FrameBuffer};
use qscompass::events::{AmbientEvent, UiEvent};

use crate::config::*;
use crate::drivers::oled::{OledDisplay, CONTRAST_AMBIENT, CONTRAST_NORMAL};
use crate::drivers::SharedBus;
use crate::input::InputManager;

pub fn ui_task(
    bus: SharedBus,
    button_pin: PinDriver<'static, AnyInputPin, Input>,
    support: HardwareSupport,
    ui_rx: Receiver<UiEvent>,
    ui_tx: Sender<UiEvent>,
    sensors_enabled: Arc<AtomicBool>,
    last_activity_ms: Arc<AtomicU32>,
) {
    log::info!("UI task started");

    let mut display = OledDisplay::new(bus);
    let mut input = InputManager::new(button_pin, ui_tx);
    let mut frame = FrameBuffer::new();
    let mut rng = SmallRng::from_entropy();

    let mut app = CompassApp::new(support);
    sensors_enabled.store(app.resume(), Ordering::Relaxed);

    let mut shown = app.screen();
    redraw(&mut display, &mut frame, &app);

    let poll_interval = Duration::from_millis(UI_POLL_INTERVAL_MS);

    loop {
        // 1. Poll the button (handles debounce internally).
        input.update();

        // 2. Drain all pending UI events (non-blocking).
        while let Ok(event) = ui_rx.try_recv() {
            match event {
                UiEvent::Sample(sample) => {
                    if let Some(heading) = app.on_sample(&sample) {
                        log::debug!("Heading {} (raw {:.1}°)", heading, heading.raw_degrees);
                    }
                }

                UiEvent::Ambient(ambient) => {
                    let effects = app.on_ambient(ambient, &mut rng);
                    apply_contrast(&mut display, &effects);
                }

                UiEvent::ButtonClick => {
                    last_activity_ms.store(crate::now_ms(), Ordering::Relaxed);
                    if app.display_state().is_ambient() {
                        let effects = app.on_ambient(AmbientEvent::Exit, &mut rng);
                        apply_contrast(&mut display, &effects);
                    }
                }
            }
        }

        sensors_enabled.store(app.sensors_enabled(), Ordering::Relaxed);

        // 3. Redraw on change.
        let screen = app.screen();
        if screen != shown {
            redraw(&mut display, &mut frame, &app);
            shown = screen;
        }

        thread::sleep(poll_interval);
    }
}

fn apply_contrast(display: &mut OledDisplay, effects: &[Effect]) {
    for effect in effects {
        let result = match effect {
            Effect::ShowAmbient => display.set_contrast(CONTRAST_AMBIENT),
            Effect::ShowCompass => display.set_contrast(CONTRAST_NORMAL),
            _ => Ok(()),
        };
        if let Err(e) = result {
            log::error!("Display error: {}", e);
        }
    }
}

fn redraw(display: &mut OledDisplay, frame: &mut FrameBuffer, app: &CompassApp) {
    // Drawing into the frame buffer is infallible.
    let _ = draw_screen(frame, &app.screen());
    if let Err(e) = display.flush(frame) {
        log::error!("Display error: {}", e);
    }
}
