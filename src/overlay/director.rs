//! The single owner of overlay state
//!
//! Input from the page (keys, clicks, pointer, resize) and frames from the
//! host all come through here. The director turns trigger matches and
//! controller signals into mount/unmount transitions, so at most one overlay
//! is ever mounted.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{
    ActiveOverlay, CloseReason, EffectKind, OverlayController, OverlaySignal, PageLocks, Scene,
};
use crate::Viewport;
use crate::audio::AudioBackend;
use crate::consts::HYPERSPACE_CLICKS;
use crate::gesture::{ClickCounter, GestureDetector, Trigger};
use crate::settings::Settings;
use crate::sim::{Frame, FrameClock};

pub struct OverlayDirector {
    settings: Settings,
    viewport: Viewport,
    clock: FrameClock,
    audio: Box<dyn AudioBackend>,
    page: PageLocks,
    detector: GestureDetector,
    title_clicks: ClickCounter,
    active: Option<OverlayController>,
    rng: Pcg32,
    last_closed: Option<(ActiveOverlay, CloseReason)>,
}

impl OverlayDirector {
    pub fn new(
        settings: Settings,
        viewport: Viewport,
        audio: Box<dyn AudioBackend>,
        seed: u64,
    ) -> Self {
        Self {
            settings,
            viewport,
            clock: FrameClock::new(),
            audio,
            page: PageLocks::new(),
            detector: GestureDetector::new(),
            title_clicks: ClickCounter::new(HYPERSPACE_CLICKS),
            active: None,
            rng: Pcg32::seed_from_u64(seed),
            last_closed: None,
        }
    }

    pub fn active(&self) -> ActiveOverlay {
        self.active
            .as_ref()
            .map_or(ActiveOverlay::None, OverlayController::overlay)
    }

    pub fn controller(&self) -> Option<&OverlayController> {
        self.active.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.active.as_ref().map(OverlayController::scene)
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Applies to overlays mounted from now on
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn last_closed(&self) -> Option<(ActiveOverlay, CloseReason)> {
        self.last_closed
    }

    pub fn title_clicks(&self) -> u32 {
        self.title_clicks.count()
    }

    /// Whether the page underneath should stop scrolling
    pub fn scroll_locked(&self) -> bool {
        self.page.scroll_locked()
    }

    /// Whether the host should keep requesting animation frames
    pub fn wants_frames(&self) -> bool {
        self.clock.active_count() > 0
    }

    pub fn page_shake(&self) -> Vec2 {
        self.active
            .as_ref()
            .map_or(Vec2::ZERO, OverlayController::page_shake)
    }

    /// Caption text for the current overlay
    pub fn caption(&self) -> Option<String> {
        let controller = self.active.as_ref()?;
        controller
            .scene()
            .headline()
            .or_else(|| controller.overlay().caption().map(str::to_owned))
    }

    /// Mount `overlay`, replacing whatever is showing
    pub fn open(&mut self, overlay: ActiveOverlay) {
        self.close(CloseReason::Replaced);

        let seed = self.rng.random::<u64>();
        let Some(scene) = Scene::build(overlay, self.viewport, seed, &self.settings) else {
            return;
        };
        let controller = OverlayController::mount(
            overlay,
            scene,
            &self.clock,
            self.audio.as_mut(),
            &self.page,
            &self.settings,
        );
        self.active = Some(controller);
    }

    /// Unmount the current overlay, if any. Returns true if one was closed.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        let Some(mut controller) = self.active.take() else {
            return false;
        };
        let overlay = controller.overlay();
        if controller.close(reason) {
            self.last_closed = Some((overlay, reason));
        }
        if overlay == ActiveOverlay::Hyperspace {
            self.title_clicks.reset();
        }
        true
    }

    /// Keyboard input (`KeyboardEvent.key`)
    pub fn key_down(&mut self, key: &str) -> Option<Trigger> {
        let trigger = self.detector.push(key)?;
        let overlay = match trigger {
            Trigger::Konami => ActiveOverlay::Fire,
            Trigger::Goat => ActiveOverlay::Goat,
            Trigger::Dragon => ActiveOverlay::Dragon,
            Trigger::Jungle => ActiveOverlay::Jungle,
            Trigger::Admin => ActiveOverlay::Admin,
        };
        self.open(overlay);
        Some(trigger)
    }

    /// Footer effect button; choosing the showing effect again turns it off
    pub fn trigger_effect(&mut self, id: &str) {
        if id == "nature" {
            self.open(ActiveOverlay::Jungle);
            return;
        }
        let Some(kind) = EffectKind::from_id(id) else {
            log::warn!("unknown effect id: {id}");
            return;
        };
        if self.active() == ActiveOverlay::SpecialEffect(kind) {
            self.close(CloseReason::Toggled);
        } else {
            self.open(ActiveOverlay::SpecialEffect(kind));
        }
    }

    pub fn roll_dice(&mut self) {
        self.open(ActiveOverlay::Dice);
    }

    /// Click on the skills section title
    pub fn skills_title_click(&mut self) {
        if self.active() == ActiveOverlay::Hyperspace {
            self.close(CloseReason::Toggled);
            return;
        }
        if self.title_clicks.click() {
            self.open(ActiveOverlay::Hyperspace);
        }
    }

    /// Click on the overlay surface
    pub fn click(&mut self) {
        let signal = self
            .active
            .as_ref()
            .map_or(OverlaySignal::Continue, OverlayController::on_click);
        self.apply(signal);
    }

    /// The overlay's close button
    pub fn close_button(&mut self) {
        self.close(CloseReason::Explicit);
    }

    /// Pointer moved to `pos` at `now` seconds
    pub fn pointer_move(&mut self, pos: Vec2, now: f64) {
        let viewport = self.viewport;
        if let Some(controller) = &mut self.active {
            controller.on_pointer(pos, now, viewport);
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(controller) = &mut self.active {
            controller.resize(viewport);
        }
    }

    /// Advance one display refresh. `None` once nothing is subscribed.
    pub fn frame(&mut self, dt: f32) -> Option<Frame> {
        let frame = self.clock.advance(dt)?;
        let signal = match &mut self.active {
            Some(controller) => controller.tick(frame, self.audio.as_mut()),
            None => OverlaySignal::Continue,
        };
        self.apply(signal);
        Some(frame)
    }

    fn apply(&mut self, signal: OverlaySignal) {
        if let OverlaySignal::Close(reason) = signal {
            self.close(reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCue, HeadlessAudio};
    use crate::consts::FRAME_DT;
    use crate::gesture::KONAMI;

    fn director() -> (OverlayDirector, HeadlessAudio) {
        let audio = HeadlessAudio::new();
        let d = OverlayDirector::new(
            Settings::default(),
            Viewport::new(800.0, 600.0),
            Box::new(audio.clone()),
            99,
        );
        (d, audio)
    }

    fn type_word(d: &mut OverlayDirector, word: &str) {
        for c in word.chars() {
            d.key_down(&c.to_string());
        }
    }

    #[test]
    fn test_konami_opens_fire() {
        let (mut d, _) = director();
        for key in KONAMI {
            d.key_down(key);
        }
        assert_eq!(d.active(), ActiveOverlay::Fire);
        assert!(d.wants_frames());
        assert!(d.frame(FRAME_DT).is_some());
    }

    #[test]
    fn test_overlays_are_exclusive() {
        let (mut d, audio) = director();
        type_word(&mut d, "goat");
        assert_eq!(d.active(), ActiveOverlay::Goat);
        type_word(&mut d, "dragon");
        assert_eq!(d.active(), ActiveOverlay::Dragon);
        assert_eq!(d.clock().active_count(), 1);
        assert_eq!(audio.playing(), vec![AudioCue::DragonGrowl]);
        assert_eq!(
            d.last_closed(),
            Some((ActiveOverlay::Goat, CloseReason::Replaced))
        );
    }

    #[test]
    fn test_effect_toggle() {
        let (mut d, _) = director();
        d.trigger_effect("cats");
        assert_eq!(d.active(), ActiveOverlay::SpecialEffect(EffectKind::Cats));
        d.trigger_effect("nerd");
        assert_eq!(d.active(), ActiveOverlay::SpecialEffect(EffectKind::Nerd));
        d.trigger_effect("nerd");
        assert_eq!(d.active(), ActiveOverlay::None);
        assert!(!d.wants_frames());

        d.trigger_effect("nature");
        assert_eq!(d.active(), ActiveOverlay::Jungle);
        d.trigger_effect("bogus");
        assert_eq!(d.active(), ActiveOverlay::Jungle);
    }

    #[test]
    fn test_hyperspace_title_clicks() {
        let (mut d, _) = director();
        for _ in 0..4 {
            d.skills_title_click();
        }
        assert_eq!(d.active(), ActiveOverlay::None);
        d.skills_title_click();
        assert_eq!(d.active(), ActiveOverlay::Hyperspace);
        assert_eq!(d.title_clicks(), 0);

        // One click turns it off again
        d.skills_title_click();
        assert_eq!(d.active(), ActiveOverlay::None);
        assert_eq!(
            d.last_closed(),
            Some((ActiveOverlay::Hyperspace, CloseReason::Toggled))
        );
    }

    #[test]
    fn test_click_dismiss_vs_jungle() {
        let (mut d, _) = director();
        d.roll_dice();
        d.click();
        assert_eq!(d.active(), ActiveOverlay::None);

        type_word(&mut d, "jungle");
        d.click();
        assert_eq!(d.active(), ActiveOverlay::Jungle);
        d.close_button();
        assert_eq!(d.active(), ActiveOverlay::None);
        assert_eq!(
            d.last_closed(),
            Some((ActiveOverlay::Jungle, CloseReason::Explicit))
        );
    }

    #[test]
    fn test_goat_times_out_and_stops_frames() {
        let (mut d, audio) = director();
        type_word(&mut d, "goat");
        let mut frames = 0;
        while d.frame(FRAME_DT).is_some() {
            frames += 1;
            assert!(frames < 400);
        }
        assert_eq!(d.active(), ActiveOverlay::None);
        assert_eq!(
            d.last_closed(),
            Some((ActiveOverlay::Goat, CloseReason::AutoTimeout))
        );
        assert!(audio.playing().is_empty());
        // Late click after the timeout is harmless
        d.click();
        assert!(d.frame(FRAME_DT).is_none());
    }

    #[test]
    fn test_admin_scroll_lock() {
        let (mut d, _) = director();
        type_word(&mut d, "admin");
        assert!(d.scroll_locked());
        d.click();
        assert!(!d.scroll_locked());
    }

    #[test]
    fn test_dragon_shakes_page() {
        let (mut d, _) = director();
        type_word(&mut d, "dragon");
        let mut shook = false;
        for _ in 0..30 {
            d.frame(FRAME_DT);
            shook |= d.page_shake() != Vec2::ZERO;
        }
        assert!(shook);
        d.click();
        assert_eq!(d.page_shake(), Vec2::ZERO);
    }

    #[test]
    fn test_dice_caption_shows_result() {
        let (mut d, _) = director();
        d.roll_dice();
        assert_eq!(d.caption().as_deref(), ActiveOverlay::Dice.caption());
        for _ in 0..100 {
            d.frame(FRAME_DT);
        }
        let caption = d.caption().unwrap_or_default();
        assert!(
            caption.starts_with("CRITICAL") || caption.starts_with("SKILL CHECK"),
            "{caption}"
        );
    }
}
