// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! SSD1306 128x64 OLED over I2C.

use display_interface::DisplayError;
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_5X8},
        MonoFont, MonoTextStyleBuilder,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use reflex_common::{TextDisplay, TextSize};
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};

pub struct OledDisplay<I> {
    display: Ssd1306<I2CInterface<I>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>,
}

impl<I> OledDisplay<I>
where
    I: embedded_hal::i2c::I2c,
{
    pub fn new(i2c: I) -> Result<Self, DisplayError> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        display.init()?;
        display.clear_buffer();
        display.flush()?;

        Ok(Self { display })
    }

    fn draw(&mut self, lines: &[&str], size: TextSize) -> Result<(), DisplayError> {
        let font: &MonoFont = match size {
            TextSize::Normal => &FONT_5X8,
            TextSize::Large => &FONT_10X20,
        };
        let style = MonoTextStyleBuilder::new()
            .font(font)
            .text_color(BinaryColor::On)
            .build();
        let line_height = font.character_size.height as i32;

        self.display.clear_buffer();
        for (row, line) in lines.iter().enumerate() {
            let origin = Point::new(0, row as i32 * line_height);
            Text::with_baseline(line, origin, style, Baseline::Top).draw(&mut self.display)?;
        }
        self.display.flush()
    }
}

impl<I> TextDisplay for OledDisplay<I>
where
    I: embedded_hal::i2c::I2c,
{
    fn show_text(&mut self, lines: &[&str], size: TextSize) {
        if let Err(e) = self.draw(lines, size) {
            defmt::warn!("Display: draw failed: {}", defmt::Debug2Format(&e));
        }
    }

    fn clear(&mut self) {
        self.display.clear_buffer();
        if self.display.flush().is_err() {
            defmt::warn!("Display: flush failed");
        }
    }
}
