//! Desktop effects backed by the real OS: synthesized keys, default handlers
//! and detached child processes.

use crate::ChordGuard;

use std::{
    path::Path,
    process::{Command, Stdio},
    thread,
};

use enigo::Key;
use tag_launcher_core::{CoreError, CoreResult, Desktop, KeyName};
use tracing::{debug, info, instrument, warn};

/// [`Desktop`] for the machine the launcher runs on.
///
/// Holds no input handle; `Enigo` is created per chord inside [`ChordGuard`].
#[derive(Debug, Default)]
pub struct SystemDesktop;

impl Desktop for SystemDesktop {
    #[instrument(skip(self))]
    fn press_chord(&mut self, keys: &[KeyName]) -> CoreResult<()> {
        let mapped = keys
            .iter()
            .map(|key| enigo_key(*key))
            .collect::<CoreResult<Vec<Key>>>()?;

        ChordGuard::press(&mapped)?;
        debug!(keys = ?keys, "Chord pressed");
        Ok(())
    }

    #[instrument(skip(self))]
    fn open_url(&mut self, url: &str) -> CoreResult<()> {
        open::that(url).map_err(|e| CoreError::capability("browser", e.to_string()))?;
        info!(url, "URL opened");
        Ok(())
    }

    #[instrument(skip(self))]
    fn open_path(&mut self, path: &Path) -> CoreResult<()> {
        open::that(path).map_err(|e| {
            CoreError::capability("file association", format!("{}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "File opened");
        Ok(())
    }

    #[instrument(skip(self))]
    fn spawn_detached(&mut self, program: &Path, args: &[String]) -> CoreResult<u32> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                CoreError::capability("process", format!("{}: {}", program.display(), e))
            })?;

        let pid = child.id();

        // Reaper: collects the exit status so terminated children never linger.
        let reaper = thread::Builder::new()
            .name(format!("reaper-{}", pid))
            .spawn(move || match child.wait() {
                Ok(status) => debug!(pid, status = %status, "Child exited"),
                Err(e) => warn!(pid, error = %e, "Failed to wait for child"),
            });
        if let Err(e) = reaper {
            warn!(pid, error = %e, "Failed to start reaper thread");
        }

        info!(pid, program = %program.display(), "Process spawned");
        Ok(pid)
    }
}

/// Map a chord key onto the input synthesizer's key.
#[track_caller]
pub(crate) fn enigo_key(key: KeyName) -> CoreResult<Key> {
    let mapped = match key {
        KeyName::Control => Key::Control,
        KeyName::Alt => Key::Alt,
        KeyName::Shift => Key::Shift,
        KeyName::Meta => Key::Meta,
        KeyName::Tab => Key::Tab,
        KeyName::Enter => Key::Return,
        KeyName::Escape => Key::Escape,
        KeyName::Space => Key::Space,
        KeyName::Backspace => Key::Backspace,
        KeyName::Delete => Key::Delete,
        KeyName::Home => Key::Home,
        KeyName::End => Key::End,
        KeyName::PageUp => Key::PageUp,
        KeyName::PageDown => Key::PageDown,
        KeyName::Up => Key::UpArrow,
        KeyName::Down => Key::DownArrow,
        KeyName::Left => Key::LeftArrow,
        KeyName::Right => Key::RightArrow,
        KeyName::PrintScreen => print_screen()?,
        KeyName::Function(n) => function_key(n)?,
        KeyName::Char(c) => Key::Unicode(c.to_ascii_lowercase()),
    };
    Ok(mapped)
}

#[cfg(not(target_os = "macos"))]
#[track_caller]
fn print_screen() -> CoreResult<Key> {
    Ok(Key::PrintScr)
}

#[cfg(target_os = "macos")]
#[track_caller]
fn print_screen() -> CoreResult<Key> {
    Err(CoreError::capability(
        "keyboard",
        "print screen has no key on this platform",
    ))
}

#[track_caller]
fn function_key(n: u8) -> CoreResult<Key> {
    let key = match n {
        1 => Key::F1,
        2 => Key::F2,
        3 => Key::F3,
        4 => Key::F4,
        5 => Key::F5,
        6 => Key::F6,
        7 => Key::F7,
        8 => Key::F8,
        9 => Key::F9,
        10 => Key::F10,
        11 => Key::F11,
        12 => Key::F12,
        13 => Key::F13,
        14 => Key::F14,
        15 => Key::F15,
        16 => Key::F16,
        17 => Key::F17,
        18 => Key::F18,
        19 => Key::F19,
        20 => Key::F20,
        other => {
            return Err(CoreError::capability(
                "keyboard",
                format!("no function key F{}", other),
            ));
        }
    };
    Ok(key)
}
