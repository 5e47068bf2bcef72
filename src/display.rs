// QS Compass — Screen Rendering
//
// A 1-bit frame buffer laid out the way the SSD1306 expects it (8 vertical
// pixels per byte, one page per 8 rows), plus the three screens the watch
// can show. Everything here is plain embedded-graphics, so it renders the
// same on the watch and in host tests.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_5X8, ascii::FONT_6X10, iso_8859_1::FONT_10X20, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, Triangle},
    text::{Alignment, Text},
};

use crate::ambient::Offset;
use crate::app::Screen;
use crate::compass::Heading;
use crate::config::*;

// ---------------------------------------------------------------------------
// Frame buffer
// ---------------------------------------------------------------------------
pub struct FrameBuffer {
    buf: [u8; DISPLAY_BUFFER_SIZE],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self { buf: [0; DISPLAY_BUFFER_SIZE] }
    }

    /// Raw pages, ready to stream to the panel.
    pub fn as_bytes(&self) -> &[u8; DISPLAY_BUFFER_SIZE] {
        &self.buf
    }

    /// Reads one pixel back. Off-screen reads are unlit. This and
    /// `lit_count` are an inspection API for checking rendered frames.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        let (idx, bit) = Self::locate(x, y);
        self.buf[idx] & bit != 0
    }

    /// Number of lit pixels in the whole frame.
    pub fn lit_count(&self) -> u32 {
        self.buf.iter().map(|b| b.count_ones()).sum()
    }

    fn locate(x: u32, y: u32) -> (usize, u8) {
        let idx = x as usize + (y as usize / 8) * SCREEN_WIDTH as usize;
        (idx, 1 << (y % 8))
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
                continue;
            }
            let (idx, bit) = Self::locate(x, y);
            match color {
                BinaryColor::On => self.buf[idx] |= bit,
                BinaryColor::Off => self.buf[idx] &= !bit,
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.buf.fill(fill);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Rotate `point` clockwise (screen coordinates, y down) around `centre`.
pub fn rotate_point(point: Point, centre: Point, degrees: f32) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = (point.x - centre.x) as f32;
    let dy = (point.y - centre.y) as f32;
    Point::new(
        centre.x + (dx * cos - dy * sin).round() as i32,
        centre.y + (dx * sin + dy * cos).round() as i32,
    )
}

fn rose_centre() -> Point {
    Point::new(SCREEN_HEIGHT as i32 / 2, SCREEN_HEIGHT as i32 / 2)
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------
pub fn draw_screen<D>(target: &mut D, screen: &Screen) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    match screen {
        Screen::Compass { heading } => draw_compass(target, heading.as_ref()),
        Screen::Ambient { offset } => draw_ambient(target, *offset),
        Screen::Unsupported { missing } => {
            draw_tip(target, "Not supported", Offset::ORIGIN)?;
            Text::with_alignment(
                missing.missing_message(),
                Point::new(SCREEN_WIDTH as i32 / 2, SCREEN_HEIGHT as i32 / 2 + 16),
                MonoTextStyle::new(&FONT_5X8, BinaryColor::On),
                Alignment::Center,
            )
            .draw(target)?;
            Ok(())
        }
    }
}

/// Rose on the left, rotated so its filled pointer marks magnetic north;
/// label and degrees on the right.
fn draw_compass<D>(target: &mut D, heading: Option<&Heading>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let centre = rose_centre();
    let radius = ROSE_DIAMETER as i32 / 2;
    let rotation = heading.map(|h| h.rose_rotation_degrees()).unwrap_or(0.0);
    let rot = |x: i32, y: i32| rotate_point(centre + Point::new(x, y), centre, rotation);

    Circle::with_center(centre, ROSE_DIAMETER)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)?;

    Triangle::new(rot(0, -radius + 4), rot(-6, 0), rot(6, 0))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;

    Triangle::new(rot(0, radius - 4), rot(-6, 0), rot(6, 0))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)?;

    let text_x = (SCREEN_WIDTH + SCREEN_HEIGHT) as i32 / 2;
    let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    let (label, degrees) = match heading {
        Some(h) => (h.direction.label(), format!("{}°", h.degrees)),
        None => ("--", String::from("---")),
    };
    Text::with_alignment(label, Point::new(text_x, 26), style, Alignment::Center).draw(target)?;
    Text::with_alignment(&degrees, Point::new(text_x, 50), style, Alignment::Center).draw(target)?;
    Ok(())
}

fn draw_ambient<D>(target: &mut D, offset: Offset) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_tip(target, "Ambient mode", offset)
}

fn draw_tip<D>(target: &mut D, tip: &str, offset: Offset) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let anchor = Point::new(SCREEN_WIDTH as i32 / 2, SCREEN_HEIGHT as i32 / 2)
        + Point::new(offset.x, offset.y);
    Text::with_alignment(
        tip,
        anchor,
        MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
        Alignment::Center,
    )
    .draw(target)?;
    Ok(())
}
