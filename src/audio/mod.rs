//! Overlay audio
//!
//! Each overlay that makes noise owns one `AudioTrack` and stops it when it
//! closes. Clip end is polled by the overlay on tick, not delivered as a
//! callback. The browser backend lives in `web`; `HeadlessAudio` stands in
//! for it natively and in tests.

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::RefCell;
use std::rc::Rc;

/// Sampled clips played by overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    GoatLaugh,
    DragonGrowl,
    JungleAmbience,
    HyperspaceHum,
}

impl AudioCue {
    pub fn url(&self) -> &'static str {
        match self {
            AudioCue::GoatLaugh => {
                "https://upload.wikimedia.org/wikipedia/commons/7/77/Maniacal_laugh.ogg"
            }
            AudioCue::DragonGrowl => {
                "https://actions.google.com/sounds/v1/horror/monster_alien_growl_panted.ogg"
            }
            AudioCue::JungleAmbience => {
                "https://actions.google.com/sounds/v1/ambiences/jungle_atmosphere_late_night.ogg"
            }
            AudioCue::HyperspaceHum => {
                "https://actions.google.com/sounds/v1/science_fiction/scifi_drone_low.ogg"
            }
        }
    }

    /// Clip volume before the user's master volume
    pub fn base_volume(&self) -> f32 {
        match self {
            AudioCue::GoatLaugh => 0.7,
            AudioCue::DragonGrowl => 0.6,
            AudioCue::JungleAmbience => 0.4,
            AudioCue::HyperspaceHum => 0.6,
        }
    }

    pub fn looping(&self) -> bool {
        matches!(self, AudioCue::JungleAmbience | AudioCue::HyperspaceHum)
    }
}

/// Procedural one-shots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Number flicker while the die rolls
    DiceShuffle,
    /// Ordinary final roll
    DiceSettle,
    /// Natural 20
    CriticalHit,
    /// Natural 1
    CriticalFailure,
    /// A firework burst
    FireworkPop,
}

/// A playing clip owned by one overlay
pub trait AudioTrack {
    fn cue(&self) -> AudioCue;
    /// Stop playback; further calls do nothing
    fn stop(&mut self);
    fn is_stopped(&self) -> bool;
    /// Clip reached its natural end (never true for looping clips)
    fn has_ended(&self) -> bool;
}

pub trait AudioBackend {
    /// Start a clip at `volume` (already scaled by settings)
    fn play(&mut self, cue: AudioCue, volume: f32) -> Box<dyn AudioTrack>;
    fn effect(&mut self, effect: SoundEffect, volume: f32);
}

/// What a headless backend was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    Played { cue: AudioCue, volume: f32 },
    Stopped(AudioCue),
    Effect(SoundEffect),
}

#[derive(Debug, Default)]
struct HeadlessState {
    events: Vec<AudioEvent>,
    /// Tracks that have been started and not stopped
    playing: Vec<(u64, AudioCue)>,
    /// Tracks whose clip should report a natural end
    ended: Vec<u64>,
    next_id: u64,
}

/// Backend that records requests instead of making sound
#[derive(Debug, Clone, Default)]
pub struct HeadlessAudio {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.state.borrow().events.clone()
    }

    /// Cues currently playing
    pub fn playing(&self) -> Vec<AudioCue> {
        self.state.borrow().playing.iter().map(|(_, c)| *c).collect()
    }

    /// Pretend every playing non-looping clip just finished
    pub fn finish_clips(&self) {
        let mut state = self.state.borrow_mut();
        let finished: Vec<u64> = state
            .playing
            .iter()
            .filter(|(_, cue)| !cue.looping())
            .map(|(id, _)| *id)
            .collect();
        state.ended.extend(finished);
    }
}

impl AudioBackend for HeadlessAudio {
    fn play(&mut self, cue: AudioCue, volume: f32) -> Box<dyn AudioTrack> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.events.push(AudioEvent::Played { cue, volume });
        state.playing.push((id, cue));
        log::debug!("audio: play {cue:?} at {volume:.2}");
        Box::new(HeadlessTrack {
            id,
            cue,
            stopped: false,
            state: self.state.clone(),
        })
    }

    fn effect(&mut self, effect: SoundEffect, _volume: f32) {
        self.state.borrow_mut().events.push(AudioEvent::Effect(effect));
    }
}

struct HeadlessTrack {
    id: u64,
    cue: AudioCue,
    stopped: bool,
    state: Rc<RefCell<HeadlessState>>,
}

impl AudioTrack for HeadlessTrack {
    fn cue(&self) -> AudioCue {
        self.cue
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        let mut state = self.state.borrow_mut();
        state.playing.retain(|(id, _)| *id != self.id);
        state.events.push(AudioEvent::Stopped(self.cue));
        log::debug!("audio: stop {:?}", self.cue);
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn has_ended(&self) -> bool {
        !self.stopped && self.state.borrow().ended.contains(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_table() {
        assert_eq!(AudioCue::GoatLaugh.base_volume(), 0.7);
        assert_eq!(AudioCue::JungleAmbience.base_volume(), 0.4);
        assert!(AudioCue::HyperspaceHum.looping());
        assert!(!AudioCue::DragonGrowl.looping());
        assert!(AudioCue::GoatLaugh.url().ends_with(".ogg"));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut audio = HeadlessAudio::new();
        let mut track = audio.play(AudioCue::GoatLaugh, 0.7);
        assert_eq!(audio.playing(), vec![AudioCue::GoatLaugh]);
        track.stop();
        track.stop();
        assert!(audio.playing().is_empty());
        let stops = audio
            .events()
            .iter()
            .filter(|e| matches!(e, AudioEvent::Stopped(_)))
            .count();
        assert_eq!(stops, 1);
    }

    #[test]
    fn test_looping_clips_never_end() {
        let mut audio = HeadlessAudio::new();
        let jungle = audio.play(AudioCue::JungleAmbience, 0.4);
        let goat = audio.play(AudioCue::GoatLaugh, 0.7);
        audio.finish_clips();
        assert!(!jungle.has_ended());
        assert!(goat.has_ended());
    }
}
