//! A single mounted overlay
//!
//! The controller owns everything the overlay acquired on mount: the tick
//! subscription, the audio track, the auto-close timer and the page scroll
//! lock. `close` releases all of them exactly once no matter which exit path
//! gets there first, and dropping the controller closes it too.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use super::{ActiveOverlay, CloseReason, OverlaySignal, Scene};
use crate::Viewport;
use crate::audio::{AudioBackend, AudioCue, AudioTrack};
use crate::consts::{DRAGON_DURATION, GOAT_DURATION};
use crate::settings::Settings;
use crate::sim::{Countdown, Frame, FrameClock, TickSubscription};

/// Page-level locks shared between overlays and the host
#[derive(Debug, Clone, Default)]
pub struct PageLocks {
    scroll: Rc<Cell<u32>>,
}

impl PageLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_scroll(&self) -> ScrollLock {
        self.scroll.set(self.scroll.get() + 1);
        ScrollLock {
            count: self.scroll.clone(),
            held: true,
        }
    }

    /// Whether the page body should stop scrolling
    pub fn scroll_locked(&self) -> bool {
        self.scroll.get() > 0
    }
}

/// Held while an overlay blocks page scrolling
#[derive(Debug)]
pub struct ScrollLock {
    count: Rc<Cell<u32>>,
    held: bool,
}

impl ScrollLock {
    pub fn release(&mut self) {
        if self.held {
            self.held = false;
            self.count.set(self.count.get().saturating_sub(1));
        }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// What an overlay acquires on mount and which exits it honours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountPolicy {
    pub audio: Option<AudioCue>,
    pub auto_close: Option<f32>,
    pub close_on_click: bool,
    pub close_on_audio_end: bool,
    pub scroll_lock: bool,
}

impl MountPolicy {
    pub fn for_overlay(overlay: ActiveOverlay) -> Self {
        let base = MountPolicy {
            audio: None,
            auto_close: None,
            close_on_click: true,
            close_on_audio_end: false,
            scroll_lock: false,
        };
        match overlay {
            ActiveOverlay::Goat => MountPolicy {
                audio: Some(AudioCue::GoatLaugh),
                auto_close: Some(GOAT_DURATION),
                close_on_audio_end: true,
                ..base
            },
            ActiveOverlay::Dragon => MountPolicy {
                audio: Some(AudioCue::DragonGrowl),
                auto_close: Some(DRAGON_DURATION),
                ..base
            },
            // Only the exit button closes the jungle
            ActiveOverlay::Jungle => MountPolicy {
                audio: Some(AudioCue::JungleAmbience),
                close_on_click: false,
                ..base
            },
            ActiveOverlay::Admin => MountPolicy {
                scroll_lock: true,
                ..base
            },
            ActiveOverlay::Hyperspace => MountPolicy {
                audio: Some(AudioCue::HyperspaceHum),
                ..base
            },
            _ => base,
        }
    }
}

pub struct OverlayController {
    overlay: ActiveOverlay,
    scene: Scene,
    policy: MountPolicy,
    subscription: Option<TickSubscription>,
    audio: Option<Box<dyn AudioTrack>>,
    auto_close: Option<Countdown>,
    scroll_lock: Option<ScrollLock>,
    closed: Option<CloseReason>,
    master_volume: f32,
}

impl OverlayController {
    /// Mount `scene` and acquire what its policy asks for
    pub fn mount(
        overlay: ActiveOverlay,
        scene: Scene,
        clock: &FrameClock,
        audio: &mut dyn AudioBackend,
        page: &PageLocks,
        settings: &Settings,
    ) -> Self {
        let policy = MountPolicy::for_overlay(overlay);
        let track = policy
            .audio
            .map(|cue| audio.play(cue, settings.effective_volume(cue.base_volume())));

        log::info!("overlay mounted: {overlay:?} ({})", scene.name());

        Self {
            overlay,
            scene,
            policy,
            subscription: Some(clock.subscribe()),
            audio: track,
            auto_close: policy.auto_close.map(Countdown::new),
            scroll_lock: policy.scroll_lock.then(|| page.lock_scroll()),
            closed: None,
            master_volume: settings.effective_volume(1.0),
        }
    }

    pub fn overlay(&self) -> ActiveOverlay {
        self.overlay
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn policy(&self) -> MountPolicy {
        self.policy
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_some()
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        self.closed
    }

    /// Whether this overlay still holds a live tick subscription
    pub fn is_ticking(&self) -> bool {
        self.subscription.as_ref().is_some_and(TickSubscription::is_live)
    }

    pub fn holds_audio(&self) -> bool {
        self.audio.is_some()
    }

    pub fn holds_scroll_lock(&self) -> bool {
        self.scroll_lock.is_some()
    }

    /// Advance one frame
    pub fn tick(&mut self, frame: Frame, audio: &mut dyn AudioBackend) -> OverlaySignal {
        if self.is_closed() {
            return OverlaySignal::Close(self.closed.unwrap_or(CloseReason::Dropped));
        }

        for sound in self.scene.tick(frame.dt) {
            audio.effect(sound, self.master_volume);
        }

        if let Some(timer) = &mut self.auto_close
            && timer.tick(frame.dt)
        {
            return OverlaySignal::Close(CloseReason::AutoTimeout);
        }

        if self.policy.close_on_audio_end
            && self.audio.as_ref().is_some_and(|track| track.has_ended())
        {
            return OverlaySignal::Close(CloseReason::AudioEnded);
        }

        OverlaySignal::Continue
    }

    /// Click anywhere on the overlay
    pub fn on_click(&self) -> OverlaySignal {
        if self.policy.close_on_click && !self.is_closed() {
            OverlaySignal::Close(CloseReason::ClickDismiss)
        } else {
            OverlaySignal::Continue
        }
    }

    pub fn on_pointer(&mut self, pos: Vec2, now: f64, viewport: Viewport) {
        if !self.is_closed() {
            self.scene.on_pointer(pos, now, viewport);
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.scene.resize(viewport);
    }

    pub fn page_shake(&self) -> Vec2 {
        if self.is_closed() {
            Vec2::ZERO
        } else {
            self.scene.page_shake()
        }
    }

    /// Release everything. Returns true only for the call that did the work.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        if self.closed.is_some() {
            return false;
        }
        self.closed = Some(reason);

        if let Some(mut sub) = self.subscription.take() {
            sub.cancel();
        }
        if let Some(mut track) = self.audio.take() {
            track.stop();
        }
        self.auto_close = None;
        if let Some(mut lock) = self.scroll_lock.take() {
            lock.release();
        }

        log::info!("overlay closed: {:?} ({reason:?})", self.overlay);
        true
    }
}

impl Drop for OverlayController {
    fn drop(&mut self) {
        self.close(CloseReason::Dropped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioEvent, HeadlessAudio};
    use crate::consts::FRAME_DT;

    struct Harness {
        clock: FrameClock,
        audio: HeadlessAudio,
        page: PageLocks,
        settings: Settings,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                clock: FrameClock::new(),
                audio: HeadlessAudio::new(),
                page: PageLocks::new(),
                settings: Settings::default(),
            }
        }

        fn mount(&mut self, overlay: ActiveOverlay) -> OverlayController {
            let vp = Viewport::new(800.0, 600.0);
            let scene = Scene::build(overlay, vp, 7, &self.settings).unwrap();
            OverlayController::mount(
                overlay,
                scene,
                &self.clock,
                &mut self.audio,
                &self.page,
                &self.settings,
            )
        }

        fn run(&mut self, c: &mut OverlayController, frames: usize) -> OverlaySignal {
            for _ in 0..frames {
                let Some(frame) = self.clock.advance(FRAME_DT) else {
                    return OverlaySignal::Continue;
                };
                let signal = c.tick(frame, &mut self.audio);
                if signal != OverlaySignal::Continue {
                    return signal;
                }
            }
            OverlaySignal::Continue
        }
    }

    #[test]
    fn test_mount_acquires_resources() {
        let mut h = Harness::new();
        let c = h.mount(ActiveOverlay::Goat);
        assert!(c.is_ticking());
        assert!(c.holds_audio());
        assert_eq!(h.clock.active_count(), 1);
        assert_eq!(h.audio.playing(), vec![AudioCue::GoatLaugh]);
        assert_eq!(
            h.audio.events()[0],
            AudioEvent::Played {
                cue: AudioCue::GoatLaugh,
                volume: 0.7
            }
        );
    }

    #[test]
    fn test_goat_auto_closes() {
        let mut h = Harness::new();
        let mut c = h.mount(ActiveOverlay::Goat);
        // Not yet at 4.9s
        assert_eq!(h.run(&mut c, 294), OverlaySignal::Continue);
        assert_eq!(
            h.run(&mut c, 10),
            OverlaySignal::Close(CloseReason::AutoTimeout)
        );
    }

    #[test]
    fn test_goat_closes_on_audio_end() {
        let mut h = Harness::new();
        let mut c = h.mount(ActiveOverlay::Goat);
        h.run(&mut c, 10);
        h.audio.finish_clips();
        assert_eq!(h.run(&mut c, 1), OverlaySignal::Close(CloseReason::AudioEnded));
    }

    #[test]
    fn test_close_releases_everything_once() {
        let mut h = Harness::new();
        let mut c = h.mount(ActiveOverlay::Admin);
        assert!(h.page.scroll_locked());

        assert!(c.close(CloseReason::ClickDismiss));
        assert!(!c.close(CloseReason::AutoTimeout));
        assert_eq!(c.close_reason(), Some(CloseReason::ClickDismiss));
        assert!(!h.page.scroll_locked());
        assert_eq!(h.clock.active_count(), 0);
        assert!(!c.is_ticking());
    }

    #[test]
    fn test_auto_close_after_manual_close_is_inert() {
        let mut h = Harness::new();
        let mut c = h.mount(ActiveOverlay::Dragon);
        h.run(&mut c, 30);
        assert!(c.close(CloseReason::ClickDismiss));
        // Clock has no subscribers left, so nothing more is delivered
        assert!(h.clock.advance(FRAME_DT).is_none());
        let stops = h
            .audio
            .events()
            .iter()
            .filter(|e| matches!(e, AudioEvent::Stopped(AudioCue::DragonGrowl)))
            .count();
        assert_eq!(stops, 1);
    }

    #[test]
    fn test_drop_releases() {
        let mut h = Harness::new();
        {
            let _c = h.mount(ActiveOverlay::Hyperspace);
            assert_eq!(h.audio.playing(), vec![AudioCue::HyperspaceHum]);
        }
        assert!(h.audio.playing().is_empty());
        assert_eq!(h.clock.active_count(), 0);
    }

    #[test]
    fn test_jungle_ignores_clicks() {
        let mut h = Harness::new();
        let c = h.mount(ActiveOverlay::Jungle);
        assert_eq!(c.on_click(), OverlaySignal::Continue);
        let fire = h.mount(ActiveOverlay::Fire);
        assert_eq!(fire.on_click(), OverlaySignal::Close(CloseReason::ClickDismiss));
    }

    #[test]
    fn test_muted_volume() {
        let mut h = Harness::new();
        h.settings.muted = true;
        let _c = h.mount(ActiveOverlay::Dragon);
        assert_eq!(
            h.audio.events()[0],
            AudioEvent::Played {
                cue: AudioCue::DragonGrowl,
                volume: 0.0
            }
        );
    }
}
