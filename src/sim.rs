// QS Compass — Host Simulator
//
// Drives `CompassApp` from a line-oriented script instead of real sensors,
// so the whole event path can be exercised off the watch:
//
//   acc <x> <y> <z>     accelerometer sample (m/s²)
//   mag <x> <y> <z>     magnetometer sample (µT)
//   enter [burn-in]     enter ambient mode
//   tick                ambient update
//   exit                leave ambient mode
//   stop | resume       sensor subscription lifecycle
//
// Blank lines and lines starting with '#' are skipped.

use std::io::{BufRead, Write};

use rand::Rng;

use crate::app::{CompassApp, Screen};
use crate::error::CompassError;
use crate::events::{AmbientEvent, SensorSample};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Sample(SensorSample),
    Ambient(AmbientEvent),
    Stop,
    Resume,
}

fn parse_vector<'a>(mut parts: impl Iterator<Item = &'a str>, line: &str) -> Result<[f32; 3], CompassError> {
    let mut values = [0.0f32; 3];
    for value in values.iter_mut() {
        let token = parts
            .next()
            .ok_or_else(|| CompassError::InvalidCommand(line.to_string()))?;
        *value = token
            .parse()
            .map_err(|_| CompassError::InvalidCommand(line.to_string()))?;
    }
    if parts.next().is_some() {
        return Err(CompassError::InvalidCommand(line.to_string()));
    }
    Ok(values)
}

/// Parse one script line. `Ok(None)` for blanks and comments.
pub fn parse_command(line: &str, timestamp_ms: u32) -> Result<Option<Command>, CompassError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let command = match parts.next() {
        Some("acc") => Command::Sample(SensorSample::accelerometer(parse_vector(parts, line)?, timestamp_ms)),
        Some("mag") => Command::Sample(SensorSample::magnetic_field(parse_vector(parts, line)?, timestamp_ms)),
        Some("enter") => {
            let burn_in_protection = match parts.next() {
                None => false,
                Some("burn-in") => true,
                Some(_) => return Err(CompassError::InvalidCommand(line.to_string())),
            };
            Command::Ambient(AmbientEvent::Enter { burn_in_protection })
        }
        Some("tick") => Command::Ambient(AmbientEvent::Update),
        Some("exit") => Command::Ambient(AmbientEvent::Exit),
        Some("stop") => Command::Stop,
        Some("resume") => Command::Resume,
        _ => return Err(CompassError::InvalidCommand(line.to_string())),
    };
    Ok(Some(command))
}

fn describe(screen: &Screen) -> String {
    match screen {
        Screen::Compass { heading: Some(h) } => format!("compass {}", h),
        Screen::Compass { heading: None } => String::from("compass --"),
        Screen::Ambient { offset } => format!("ambient ({}, {})", offset.x, offset.y),
        Screen::Unsupported { missing } => format!("unsupported: {}", missing.missing_message()),
    }
}

/// Replay `input` against `app`, writing one line to `out` for each new
/// heading and each screen change. Bad lines are logged and skipped.
pub fn run<R, W, G>(app: &mut CompassApp, input: R, mut out: W, rng: &mut G) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    app.resume();
    let mut last_screen = app.screen();
    writeln!(out, "screen {}", describe(&last_screen))?;

    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        let command = match parse_command(&line, line_no as u32) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("line {}: {}", line_no + 1, e);
                continue;
            }
        };

        match command {
            Command::Sample(sample) => {
                if let Some(heading) = app.on_sample(&sample) {
                    writeln!(out, "heading {} ({:.1}°)", heading, heading.raw_degrees)?;
                }
            }
            Command::Ambient(event) => {
                app.on_ambient(event, rng);
            }
            Command::Stop => app.stop(),
            Command::Resume => {
                app.resume();
            }
        }

        let screen = app.screen();
        if screen != last_screen {
            writeln!(out, "screen {}", describe(&screen))?;
            last_screen = screen;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::HardwareSupport;
    use crate::events::SensorKind;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn replay(support: HardwareSupport, script: &str) -> Vec<String> {
        let mut app = CompassApp::new(support);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut out = Vec::new();
        run(&mut app, script.as_bytes(), &mut out, &mut rng).unwrap();
        String::from_utf8(out).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  ", 0).unwrap(), None);
        assert_eq!(parse_command("# comment", 0).unwrap(), None);
        assert_eq!(
            parse_command("acc 0 0 9.81", 5).unwrap(),
            Some(Command::Sample(SensorSample::accelerometer([0.0, 0.0, 9.81], 5)))
        );
        assert_eq!(
            parse_command("enter burn-in", 0).unwrap(),
            Some(Command::Ambient(AmbientEvent::Enter { burn_in_protection: true }))
        );
        assert_eq!(
            parse_command("enter", 0).unwrap(),
            Some(Command::Ambient(AmbientEvent::Enter { burn_in_protection: false }))
        );
        assert!(parse_command("mag 1 2", 0).is_err());
        assert!(parse_command("mag 1 2 3 4", 0).is_err());
        assert!(parse_command("acc x 0 0", 0).is_err());
        assert!(parse_command("spin", 0).is_err());
    }

    #[test]
    fn test_replay_headings_and_ambient() {
        let out = replay(
            HardwareSupport::ALL,
            "acc 0 0 9.81\n\
             acc 0 0 9.81\n\
             mag -22 0 -40\n\
             bogus line\n\
             enter burn-in\n\
             mag 0 22 -40\n\
             acc 0 0 9.81\n\
             exit\n\
             mag 0 22 -40\n\
             acc 0 0 9.81\n",
        );

        assert_eq!(out[0], "screen compass --");
        assert!(out[1].starts_with("heading E 9"), "{}", out[1]);
        assert!(out[2].starts_with("screen compass E 9"), "{}", out[2]);
        assert_eq!(out[3], "screen ambient (0, 0)");
        // Samples during ambient are dropped; nothing until after exit.
        assert!(out[4].starts_with("screen compass E 9"), "{}", out[4]);
        assert!(out[5].starts_with("heading N 0°"), "{}", out[5]);
        assert_eq!(out[6], "screen compass N 0°");
        assert_eq!(out.len(), 7);
    }

    #[test]
    fn test_replay_just_west_of_north_reads_wn() {
        let out = replay(HardwareSupport::ALL, "acc 0 0 9.81\nmag 5.7 40 -40\n");
        assert_eq!(out[0], "screen compass --");
        assert!(out[1].starts_with("heading WN 352° (-8.1°)"), "{}", out[1]);
        assert_eq!(out[2], "screen compass WN 352°");
    }

    #[test]
    fn test_replay_unsupported() {
        let support = HardwareSupport { accelerometer: false, magnetometer: true };
        let out = replay(support, "acc 0 0 9.81\nmag 0 22 -40\nenter burn-in\n");
        assert_eq!(
            out,
            vec![format!("screen unsupported: {}", SensorKind::Accelerometer.missing_message())]
        );
    }
}
