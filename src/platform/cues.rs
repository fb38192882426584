//! Audio cue dispatch
//!
//! Playback lives outside the core. The session only fires notifications
//! through [`CueSink`] and never waits on them.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Card answered correctly
    Correct,
    /// Card answered with the wrong direction
    Incorrect,
    /// Card ran out of time
    Timeout,
    /// Score entered a deeper stage
    Milestone,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Correct => "correct",
            Cue::Incorrect => "incorrect",
            Cue::Timeout => "timeout",
            Cue::Milestone => "milestone",
        }
    }
}

/// Fire-and-forget audio notifications
pub trait CueSink {
    fn play_correct_cue(&mut self);
    fn play_incorrect_cue(&mut self);
    fn play_timeout_cue(&mut self);
    fn play_milestone_cue(&mut self);

    fn play(&mut self, cue: Cue) {
        match cue {
            Cue::Correct => self.play_correct_cue(),
            Cue::Incorrect => self.play_incorrect_cue(),
            Cue::Timeout => self.play_timeout_cue(),
            Cue::Milestone => self.play_milestone_cue(),
        }
    }
}

/// Muted output
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCues;

impl CueSink for SilentCues {
    fn play_correct_cue(&mut self) {}
    fn play_incorrect_cue(&mut self) {}
    fn play_timeout_cue(&mut self) {}
    fn play_milestone_cue(&mut self) {}
}

/// Queues cues for a host that plays them on its own schedule
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    pending: Vec<Cue>,
    muted: bool,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute; muted cues are discarded, not queued
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn pending(&self) -> &[Cue] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.pending)
    }

    fn push(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        log::trace!("cue: {}", cue.as_str());
        self.pending.push(cue);
    }
}

impl CueSink for CueLog {
    fn play_correct_cue(&mut self) {
        self.push(Cue::Correct);
    }

    fn play_incorrect_cue(&mut self) {
        self.push(Cue::Incorrect);
    }

    fn play_timeout_cue(&mut self) {
        self.push(Cue::Timeout);
    }

    fn play_milestone_cue(&mut self) {
        self.push(Cue::Milestone);
    }
}
