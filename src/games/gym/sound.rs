//! Fire-and-forget sound cues.
//!
//! Game code only enqueues; the frontend drains the queue once per frame and
//! hands it to the audio backend.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Lift,
    Crit,
    Purchase,
    Milestone,
    LevelUp,
    Error,
}

/// Pending cues dropped past this many per frame.
const MAX_QUEUED: usize = 16;

#[derive(Debug, Default)]
pub struct SoundCues {
    enabled: bool,
    queue: Vec<SoundCue>,
}

impl SoundCues {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, queue: Vec::new() }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.queue.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn play(&mut self, cue: SoundCue) {
        if self.enabled && self.queue.len() < MAX_QUEUED {
            self.queue.push(cue);
        }
    }

    pub fn drain(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.queue)
    }
}
