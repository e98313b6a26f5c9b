//! Simulation state behind each overlay

use glam::Vec2;

use super::{ActiveOverlay, EffectKind};
use crate::Viewport;
use crate::audio::SoundEffect;
use crate::settings::Settings;
use crate::sim::{
    CatRain, DiceRoller, DragonFlight, FireGrid, GoatShow, JungleScene, Lightsaber, MatrixRain,
    PointerTrail, RollOutcome, Starfield,
};

/// Dim backdrop opacity behind the admin guide
pub const ADMIN_BACKDROP: f32 = 0.6;

pub enum Scene {
    Fire(FireGrid),
    Goat(GoatShow),
    Dragon(DragonFlight),
    Jungle(JungleScene),
    Lightsaber(Lightsaber),
    Cats(CatRain),
    Matrix(MatrixRain),
    Trail(PointerTrail),
    Admin,
    Hyperspace(Starfield),
    Dice(DiceRoller),
}

impl Scene {
    /// Fresh simulation for `overlay`; `None` for `ActiveOverlay::None`
    pub fn build(
        overlay: ActiveOverlay,
        viewport: Viewport,
        seed: u64,
        settings: &Settings,
    ) -> Option<Self> {
        let scene = match overlay {
            ActiveOverlay::None => return None,
            ActiveOverlay::Fire => Scene::Fire(FireGrid::new(seed, settings.fire_reseed())),
            ActiveOverlay::Goat => Scene::Goat(GoatShow::new(settings.effective_strobe())),
            ActiveOverlay::Dragon => {
                Scene::Dragon(DragonFlight::new(viewport, settings.effective_page_shake()))
            }
            ActiveOverlay::Jungle => Scene::Jungle(JungleScene::new(viewport, seed)),
            ActiveOverlay::SpecialEffect(kind) => match kind {
                EffectKind::StarWars => Scene::Lightsaber(Lightsaber::new(viewport)),
                EffectKind::Cats => Scene::Cats(CatRain::new(viewport, seed)),
                EffectKind::Nerd => Scene::Matrix(MatrixRain::new(viewport, seed)),
                EffectKind::Music | EffectKind::Science | EffectKind::Math | EffectKind::Astronomy => {
                    let theme = kind.trail_theme()?;
                    Scene::Trail(PointerTrail::new(theme, seed))
                }
            },
            ActiveOverlay::Admin => Scene::Admin,
            ActiveOverlay::Hyperspace => Scene::Hyperspace(Starfield::new(
                settings.quality.star_count(),
                viewport,
                seed,
            )),
            ActiveOverlay::Dice => Scene::Dice(DiceRoller::new(
                viewport,
                seed,
                settings.quality.max_particles(),
            )),
        };
        Some(scene)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scene::Fire(_) => "fire",
            Scene::Goat(_) => "goat",
            Scene::Dragon(_) => "dragon",
            Scene::Jungle(_) => "jungle",
            Scene::Lightsaber(_) => "lightsaber",
            Scene::Cats(_) => "cats",
            Scene::Matrix(_) => "matrix",
            Scene::Trail(_) => "trail",
            Scene::Admin => "admin",
            Scene::Hyperspace(_) => "hyperspace",
            Scene::Dice(_) => "dice",
        }
    }

    /// Advance one frame; returns procedural sounds to play
    pub fn tick(&mut self, dt: f32) -> Vec<SoundEffect> {
        let mut sounds = Vec::new();
        match self {
            Scene::Fire(grid) => grid.step(),
            Scene::Goat(show) => show.tick(dt),
            Scene::Dragon(flight) => flight.tick(dt),
            Scene::Jungle(jungle) => jungle.tick(dt),
            Scene::Lightsaber(saber) => saber.tick(dt),
            Scene::Cats(rain) => rain.step(),
            Scene::Matrix(rain) => rain.tick(dt),
            Scene::Trail(trail) => trail.tick(dt),
            Scene::Admin => {}
            Scene::Hyperspace(field) => {
                field.step();
            }
            Scene::Dice(roller) => {
                let events = roller.tick(dt);
                if events.shuffled {
                    sounds.push(SoundEffect::DiceShuffle);
                }
                match events.settled {
                    Some(RollOutcome::CriticalHit) => sounds.push(SoundEffect::CriticalHit),
                    Some(RollOutcome::CriticalFailure) => sounds.push(SoundEffect::CriticalFailure),
                    Some(RollOutcome::Normal(_)) => sounds.push(SoundEffect::DiceSettle),
                    None => {}
                }
                for _ in 0..events.bursts {
                    sounds.push(SoundEffect::FireworkPop);
                }
            }
        }
        sounds
    }

    /// Pointer moved to `pos` at `now` seconds
    pub fn on_pointer(&mut self, pos: Vec2, now: f64, viewport: Viewport) {
        match self {
            Scene::Fire(grid) => grid.wind_mut().aim(viewport.normalized_x(pos.x)),
            Scene::Lightsaber(saber) => saber.on_pointer(pos),
            Scene::Trail(trail) => {
                trail.on_pointer(pos, now);
            }
            _ => {}
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        match self {
            Scene::Dragon(flight) => flight.resize(viewport),
            Scene::Jungle(jungle) => jungle.resize(viewport),
            Scene::Cats(rain) => rain.resize(viewport),
            Scene::Matrix(rain) => rain.resize(viewport),
            Scene::Hyperspace(field) => field.resize(viewport),
            Scene::Dice(roller) => roller.resize(viewport),
            // Fire is a fixed grid stretched over the viewport; the rest are
            // positioned at draw time
            _ => {}
        }
    }

    /// Offset to apply to the page underneath
    pub fn page_shake(&self) -> Vec2 {
        match self {
            Scene::Dragon(flight) => flight.page_shake(),
            _ => Vec2::ZERO,
        }
    }

    /// Roll headline once the die has settled
    pub fn headline(&self) -> Option<String> {
        match self {
            Scene::Dice(roller) => roller
                .outcome()
                .map(|o| format!("{} ({})", o.headline(), roller.display())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_build_every_overlay() {
        let settings = Settings::default();
        assert!(Scene::build(ActiveOverlay::None, vp(), 1, &settings).is_none());
        let mut overlays = vec![
            ActiveOverlay::Fire,
            ActiveOverlay::Goat,
            ActiveOverlay::Dragon,
            ActiveOverlay::Jungle,
            ActiveOverlay::Admin,
            ActiveOverlay::Hyperspace,
            ActiveOverlay::Dice,
        ];
        overlays.extend(EffectKind::ALL.map(ActiveOverlay::SpecialEffect));
        for overlay in overlays {
            let scene = Scene::build(overlay, vp(), 1, &settings);
            assert!(scene.is_some(), "{overlay:?}");
        }
    }

    #[test]
    fn test_star_count_follows_quality() {
        let settings = Settings::from_preset(crate::QualityPreset::Low);
        let Some(Scene::Hyperspace(field)) =
            Scene::build(ActiveOverlay::Hyperspace, vp(), 1, &settings)
        else {
            panic!("expected a starfield");
        };
        assert_eq!(field.stars().len(), 300);
    }

    #[test]
    fn test_pointer_aims_fire_wind() {
        let settings = Settings::default();
        let mut scene = Scene::build(ActiveOverlay::Fire, vp(), 1, &settings).unwrap();
        scene.on_pointer(Vec2::new(800.0, 300.0), 0.0, vp());
        let Scene::Fire(grid) = &scene else {
            panic!("expected fire");
        };
        assert_eq!(grid.wind().target(), crate::consts::MAX_WIND);
    }

    #[test]
    fn test_dice_emits_sounds() {
        let settings = Settings::default();
        let mut scene = Scene::build(ActiveOverlay::Dice, vp(), 5, &settings).unwrap();
        let mut all = Vec::new();
        for _ in 0..120 {
            all.extend(scene.tick(crate::consts::FRAME_DT));
        }
        assert!(all.contains(&SoundEffect::DiceShuffle));
        assert!(all.iter().any(|s| matches!(
            s,
            SoundEffect::DiceSettle | SoundEffect::CriticalHit | SoundEffect::CriticalFailure
        )));
        assert!(scene.headline().is_some());
    }
}
