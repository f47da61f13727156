use std::{thread, time::Duration};

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tag_launcher_core::{CoreError, CoreResult};

/// Gap between key events. Some applications drop events sent back to back.
const KEY_EVENT_DELAY: Duration = Duration::from_millis(10);

/// RAII guard that guarantees every held key is released when dropped.
///
/// Prevents a stuck keyboard if the final click fails or panics. Release
/// happens in reverse press order with best-effort semantics; the OS resets
/// modifier state on the next physical key press anyway.
pub struct ChordGuard {
    enigo: Enigo,
    held: Vec<Key>,
}

impl ChordGuard {
    /// Press `keys` as one chord: all but the last held, the last clicked.
    #[track_caller]
    pub(crate) fn press(keys: &[Key]) -> CoreResult<()> {
        let Some((last, held)) = keys.split_last() else {
            return Ok(());
        };

        let mut guard = Self::hold(held)?;
        guard.click(*last)
        // Guard drops here and releases the held keys.
    }

    #[track_caller]
    fn hold(keys: &[Key]) -> CoreResult<Self> {
        let enigo = Enigo::new(&Settings::default()).map_err(|e| {
            CoreError::capability("keyboard", format!("Failed to create Enigo: {}", e))
        })?;

        let mut guard = Self {
            enigo,
            held: Vec::with_capacity(keys.len()),
        };

        for key in keys {
            guard.enigo.key(*key, Direction::Press).map_err(|e| {
                CoreError::capability("keyboard", format!("Failed to press {:?}: {}", key, e))
            })?;
            guard.held.push(*key);
            thread::sleep(KEY_EVENT_DELAY);
        }

        Ok(guard)
    }

    #[track_caller]
    fn click(&mut self, key: Key) -> CoreResult<()> {
        self.enigo.key(key, Direction::Click).map_err(|e| {
            CoreError::capability("keyboard", format!("Failed to click {:?}: {}", key, e))
        })?;
        thread::sleep(KEY_EVENT_DELAY);
        Ok(())
    }
}

impl Drop for ChordGuard {
    fn drop(&mut self) {
        for key in self.held.iter().rev() {
            let _ = self.enigo.key(*key, Direction::Release);
        }
    }
}
