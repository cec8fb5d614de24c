use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::{write_text_atomic, InputEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An input event stamped with the tick counter value it arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct RecordedInput {
    pub(crate) tick: u64,
    pub(crate) event: InputEvent,
}

#[derive(Debug, Error)]
pub(crate) enum RecordingError {
    #[error("failed to read recorded inputs {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse recorded inputs {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("failed to encode recorded inputs: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write recorded inputs {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Records live inputs per tick and replays scripted ones. Used to author
/// the AI-driven actor's run by playing it by hand.
#[derive(Debug, Default)]
pub(crate) struct InputRecorder {
    tick: u64,
    recording: bool,
    recorded: Vec<RecordedInput>,
    script: VecDeque<RecordedInput>,
}

impl InputRecorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn is_recording(&self) -> bool {
        self.recording
    }

    pub(crate) fn start_recording(&mut self) {
        self.recording = true;
        self.recorded.clear();
    }

    pub(crate) fn stop_recording(&mut self) -> Vec<RecordedInput> {
        self.recording = false;
        std::mem::take(&mut self.recorded)
    }

    pub(crate) fn record(&mut self, event: InputEvent) {
        if self.recording {
            self.recorded.push(RecordedInput {
                tick: self.tick,
                event,
            });
        }
    }

    /// Replaces any pending script. Events keep their relative order within
    /// a tick.
    pub(crate) fn playback(&mut self, mut events: Vec<RecordedInput>) {
        events.sort_by_key(|recorded| recorded.tick);
        self.script = events.into();
    }

    #[cfg(test)]
    pub(crate) fn pending_playback(&self) -> usize {
        self.script.len()
    }

    /// Scripted events due at or before the current tick.
    pub(crate) fn take_due(&mut self) -> Vec<InputEvent> {
        let mut due = Vec::new();
        while let Some(next) = self.script.front() {
            if next.tick > self.tick {
                break;
            }
            due.push(next.event);
            self.script.pop_front();
        }
        due
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick = self.tick.saturating_add(1);
    }
}

/// `Ok(None)` when the file does not exist.
pub(crate) fn load_recording(path: &Path) -> Result<Option<Vec<RecordedInput>>, RecordingError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RecordingError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let deserializer = &mut serde_json::Deserializer::from_str(&raw);
    let events = serde_path_to_error::deserialize(deserializer).map_err(|source| {
        RecordingError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(Some(events))
}

pub(crate) fn save_recording(path: &Path, events: &[RecordedInput]) -> Result<(), RecordingError> {
    let text = serde_json::to_string_pretty(events).map_err(RecordingError::Encode)?;
    write_text_atomic(path, &text).map_err(|source| RecordingError::Write {
        path: path.to_path_buf(),
        source,
    })
}
