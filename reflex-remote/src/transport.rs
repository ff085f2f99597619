// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Line-oriented serial transport to the game.

use std::io::{self, BufRead, BufReader, Write};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use serialport::SerialPort;

use reflex_common::command::Command;
use reflex_common::Reply;

pub struct Transport {
    port: BufReader<Box<dyn SerialPort>>,
}

impl Transport {
    /// Open `port`. `timeout_ms` is the quiet period after which a read gives up.
    pub fn new(port: &str, baud: u32, timeout_ms: u64) -> Result<Self> {
        let mut serial = serialport::new(port, baud)
            .timeout(Duration::from_millis(timeout_ms))
            .open()
            .with_context(|| format!("Failed to open {port}"))?;

        // The device only talks to a host that has raised DTR.
        serial
            .write_data_terminal_ready(true)
            .context("Failed to set DTR")?;

        Ok(Self {
            port: BufReader::new(serial),
        })
    }

    pub fn send_line(&mut self, line: &str) -> Result<()> {
        let port = self.port.get_mut();
        port.write_all(line.as_bytes())?;
        port.write_all(b"\n")?;
        port.flush()?;
        Ok(())
    }

    /// Next line including its terminator, or `None` after a quiet timeout.
    pub fn read_raw_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        match self.port.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line)),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                Ok((!line.is_empty()).then_some(line))
            }
            Err(e) => Err(e).context("Serial read failed"),
        }
    }

    /// Next line without its terminator, or `None` after a quiet timeout.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self
            .read_raw_line()?
            .map(|line| line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Send `command` and wait for its status line.
    ///
    /// Data lines that arrive first (a result from a round started on the
    /// device, for instance) are echoed to stdout.
    pub fn request(&mut self, command: &Command) -> Result<String> {
        self.send_line(&command.to_string())?;
        loop {
            let Some(line) = self.read_line()? else {
                bail!("No reply to {command}");
            };
            if Reply::parse(&line).is_status() {
                return Ok(line);
            }
            println!("{line}");
        }
    }

    /// Collect raw lines until the device goes quiet.
    pub fn read_until_idle(&mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(line) = self.read_raw_line()? {
            text.push_str(&line);
        }
        Ok(text)
    }

    /// Wait up to `limit` for a line satisfying `pred`, echoing the others.
    pub fn wait_for<F>(&mut self, limit: Duration, mut pred: F) -> Result<Option<String>>
    where
        F: FnMut(&str) -> bool,
    {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            match self.read_line()? {
                Some(line) if pred(&line) => return Ok(Some(line)),
                Some(line) => println!("{line}"),
                None => {}
            }
        }
        Ok(None)
    }
}
