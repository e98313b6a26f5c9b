//! Property tests over the overlay simulations and the director

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use portfolio_fx::audio::HeadlessAudio;
use portfolio_fx::consts::{FRAME_DT, MAX_WIND};
use portfolio_fx::gesture::{GESTURE_CAPACITY, KONAMI};
use portfolio_fx::overlay::CloseReason;
use portfolio_fx::sim::{
    FireGrid, PALETTE_MAX, ParticleSystem, Reseed, Starfield, WindBias, intensity_rgba,
};
use portfolio_fx::{ActiveOverlay, GestureDetector, OverlayDirector, Settings, Trigger, Viewport};

fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]".prop_map(String::from),
        Just("ArrowUp".to_string()),
        Just("ArrowDown".to_string()),
        Just("ArrowLeft".to_string()),
        Just("ArrowRight".to_string()),
        Just("Shift".to_string()),
    ]
}

/// Input a visitor could produce against the director
#[derive(Debug, Clone)]
enum Action {
    Key(String),
    Effect(&'static str),
    Dice,
    Title,
    Click,
    Close,
    Frames(u8),
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        key_strategy().prop_map(Action::Key),
        prop::sample::select(vec![
            "starwars", "cats", "nerd", "music", "science", "math", "astronomy", "nature", "bogus"
        ])
        .prop_map(Action::Effect),
        Just(Action::Dice),
        Just(Action::Title),
        Just(Action::Click),
        Just(Action::Close),
        (1u8..60).prop_map(Action::Frames),
    ]
}

proptest! {
    #[test]
    fn fire_cells_stay_in_palette(
        seed in any::<u64>(),
        width in 1usize..40,
        height in 1usize..30,
        wind in -1.0f32..1.0,
        sustained in any::<bool>(),
        steps in 1usize..60,
    ) {
        let reseed = if sustained { Reseed::EveryTick } else { Reseed::Once };
        let mut grid = FireGrid::with_size(width, height, seed, reseed);
        grid.wind_mut().aim(wind);
        for _ in 0..steps {
            grid.step();
        }
        prop_assert_eq!(grid.cells().len(), width * height);
        prop_assert!(grid.cells().iter().all(|&c| c <= PALETTE_MAX));
        for &c in grid.cells() {
            let rgba = intensity_rgba(c);
            prop_assert!(rgba[3] > 0);
        }
    }

    #[test]
    fn wind_converges_to_target(target in -1.0f32..1.0) {
        let mut wind = WindBias::default();
        wind.aim(target);
        for _ in 0..500 {
            wind.step();
        }
        prop_assert!((wind.current() - target * MAX_WIND).abs() < 1e-2);
        prop_assert!(wind.current().abs() <= MAX_WIND + 1e-3);
    }

    #[test]
    fn stars_stay_in_front_of_camera(seed in any::<u64>(), steps in 1usize..300) {
        let vp = Viewport::new(640.0, 480.0);
        let mut field = Starfield::new(200, vp, seed);
        for _ in 0..steps {
            field.step();
        }
        let far = field.far_plane();
        for star in field.stars() {
            prop_assert!(star.pos.z > 0.0 && star.pos.z <= far + 1e-3);
        }
    }

    #[test]
    fn particles_never_exceed_capacity(
        seed in any::<u64>(),
        capacity in 0usize..200,
        bursts in 1usize..10,
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut system = ParticleSystem::new(capacity);
        for _ in 0..bursts {
            system.burst(Vec2::new(320.0, 240.0), &mut rng);
            prop_assert!(system.len() <= capacity);
            system.step();
        }
        // Everything fades out eventually
        for _ in 0..200 {
            system.step();
        }
        prop_assert!(system.is_empty());
        prop_assert_eq!(system.spawned(), system.removed());
    }

    #[test]
    fn gesture_buffer_is_bounded(keys in prop::collection::vec(key_strategy(), 0..200)) {
        let mut detector = GestureDetector::new();
        for key in &keys {
            detector.push(key);
            prop_assert!(detector.len() <= GESTURE_CAPACITY);
        }
    }

    #[test]
    fn konami_fires_after_any_prefix(prefix in prop::collection::vec(key_strategy(), 0..30)) {
        let mut detector = GestureDetector::new();
        for key in &prefix {
            detector.push(key);
        }
        let mut fired = None;
        for key in KONAMI {
            fired = detector.push(key).or(fired);
        }
        prop_assert_eq!(fired, Some(Trigger::Konami));
        prop_assert!(detector.is_empty());
    }

    #[test]
    fn konami_interrupted_does_not_fire(
        split in 1usize..KONAMI.len(),
        noise in "[c-z]",
    ) {
        let mut detector = GestureDetector::new();
        let mut fired = Vec::new();
        for key in &KONAMI[..split] {
            fired.extend(detector.push(key));
        }
        fired.extend(detector.push(&noise));
        for key in &KONAMI[split..] {
            fired.extend(detector.push(key));
        }
        prop_assert!(!fired.contains(&Trigger::Konami));
    }

    #[test]
    fn director_keeps_one_overlay(actions in prop::collection::vec(action_strategy(), 1..60)) {
        let audio = HeadlessAudio::new();
        let mut director = OverlayDirector::new(
            Settings::default(),
            Viewport::new(800.0, 600.0),
            Box::new(audio.clone()),
            1,
        );

        for action in actions {
            match action {
                Action::Key(key) => {
                    director.key_down(&key);
                }
                Action::Effect(id) => director.trigger_effect(id),
                Action::Dice => director.roll_dice(),
                Action::Title => director.skills_title_click(),
                Action::Click => director.click(),
                Action::Close => {
                    director.close_button();
                }
                Action::Frames(n) => {
                    for _ in 0..n {
                        director.frame(FRAME_DT);
                    }
                }
            }

            let mounted = !director.active().is_none();
            prop_assert_eq!(director.clock().active_count(), usize::from(mounted));
            prop_assert_eq!(director.wants_frames(), mounted);
            prop_assert!(audio.playing().len() <= 1);
            prop_assert_eq!(
                director.scroll_locked(),
                director.active() == ActiveOverlay::Admin
            );
            if !mounted {
                prop_assert!(audio.playing().is_empty());
                prop_assert_eq!(director.page_shake(), Vec2::ZERO);
            }
        }
    }
}

#[test]
fn fire_scenario_200_ticks() {
    let mut grid = FireGrid::new(42, Reseed::Once);
    for _ in 0..200 {
        grid.step();
    }
    assert_eq!(grid.ticks(), 200);
    assert!(grid.cells().iter().all(|&c| c <= PALETTE_MAX));
}

#[test]
fn every_exit_path_releases_resources() {
    let exits: [(&str, fn(&mut OverlayDirector)); 3] = [
        ("click", OverlayDirector::click),
        ("close button", OverlayDirector::close_button),
        ("replaced", OverlayDirector::roll_dice),
    ];
    for (name, exit) in exits {
        let audio = HeadlessAudio::new();
        let mut director = OverlayDirector::new(
            Settings::default(),
            Viewport::default(),
            Box::new(audio.clone()),
            9,
        );
        for c in "dragon".chars() {
            director.key_down(&c.to_string());
        }
        director.frame(FRAME_DT);
        exit(&mut director);

        assert!(audio.playing().is_empty(), "{name}");
        let closed = director.last_closed().map(|(overlay, _)| overlay);
        assert_eq!(closed, Some(ActiveOverlay::Dragon), "{name}");
        if name == "replaced" {
            assert_eq!(
                director.last_closed(),
                Some((ActiveOverlay::Dragon, CloseReason::Replaced))
            );
        }
    }
}
