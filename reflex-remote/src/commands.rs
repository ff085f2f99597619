// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command implementations for the game's line protocol.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use reflex_common::command::{Command, Line};
use reflex_common::config::{GREEN_RANGE_MS, RED_RANGE_MS, YELLOW_RANGE_MS};
use reflex_common::Reply;

use crate::transport::Transport;

/// Longest possible round plus slack for the result to arrive.
const ROUND_TIMEOUT: Duration =
    Duration::from_millis((RED_RANGE_MS.1 + YELLOW_RANGE_MS.1 + GREEN_RANGE_MS.1 + 2000) as u64);

/// Print a status reply and turn `ERROR:` into a failure.
fn check(status: &str) -> Result<()> {
    match Reply::parse(status) {
        Reply::Ok(msg) => println!("{msg}"),
        Reply::Warning(msg) => println!("warning: {msg}"),
        Reply::Error(msg) => bail!("Device error: {msg}"),
        Reply::Data(line) => bail!("Unexpected reply: {line}"),
    }
    Ok(())
}

/// Set the number of active players.
pub fn select_players(transport: &mut Transport, count: u32) -> Result<()> {
    let status = transport.request(&Command::SelectPlayers(Some(count)))?;
    check(&status)
}

/// Rename player `index` (one-based).
pub fn set_player(transport: &mut Transport, index: u32, name: &str) -> Result<()> {
    let name = Line::try_from(name).map_err(|_| anyhow::anyhow!("Name too long: {name}"))?;
    let status = transport.request(&Command::SetPlayer {
        index: Some(index),
        name,
    })?;
    check(&status)
}

/// Start a round, optionally waiting for and printing its result.
pub fn start(transport: &mut Transport, wait: bool) -> Result<()> {
    let status = transport.request(&Command::Start)?;
    check(&status)?;
    if !wait {
        return Ok(());
    }

    let spinner = spinner("Waiting for the round to finish...")?;
    let header = transport.wait_for(ROUND_TIMEOUT, |line| line.starts_with("Game result:"))?;
    spinner.finish_and_clear();

    let Some(header) = header else {
        bail!("No result within {} s", ROUND_TIMEOUT.as_secs());
    };
    println!("{header}");
    while let Some(line) = transport.read_line()? {
        println!("{line}");
    }
    Ok(())
}

/// Download the history log to stdout or `output`.
pub fn history(transport: &mut Transport, output: Option<&Path>) -> Result<()> {
    let status = transport.request(&Command::ViewHistory)?;
    if let Reply::Error(msg) = Reply::parse(&status) {
        bail!("Device error: {msg}");
    }

    let spinner = spinner("Receiving history...")?;
    let raw = transport.read_until_idle()?;
    spinner.finish_and_clear();

    let text = join_chunks(&raw);
    match output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("History saved to {} ({} bytes)", path.display(), text.len());
        }
        None if text.is_empty() => println!("History is empty"),
        None => print!("{text}"),
    }
    Ok(())
}

/// Print the leaderboard.
pub fn leaderboard(transport: &mut Transport) -> Result<()> {
    let status = transport.request(&Command::ViewLeaderboard)?;
    check(&status)?;
    while let Some(line) = transport.read_line()? {
        println!("  {line}");
    }
    Ok(())
}

/// Clear the history on the device.
pub fn delete_history(transport: &mut Transport) -> Result<()> {
    let status = transport.request(&Command::DeleteHistory)?;
    check(&status)
}

/// Send one line verbatim and print everything until the device goes quiet.
pub fn raw(transport: &mut Transport, line: &str) -> Result<()> {
    transport.send_line(line)?;
    while let Some(reply) = transport.read_line()? {
        println!("{reply}");
    }
    Ok(())
}

/// Print every line the device sends until interrupted.
pub fn monitor(transport: &mut Transport) -> Result<()> {
    println!("Monitoring, press Ctrl-C to stop");
    loop {
        if let Some(line) = transport.read_line()? {
            println!("{line}");
        }
    }
}

/// Each history chunk is sent as its own line ending in CRLF, while the log
/// itself only contains LF, so dropping every CRLF restores the log.
pub fn join_chunks(raw: &str) -> String {
    raw.replace("\r\n", "")
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
