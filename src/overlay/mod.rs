//! Overlay lifecycle
//!
//! - `scene`: the simulation behind each overlay
//! - `controller`: one mounted overlay and the resources it holds
//! - `director`: the single owner of which overlay is showing

pub mod controller;
pub mod director;
pub mod scene;

pub use controller::{MountPolicy, OverlayController, PageLocks, ScrollLock};
pub use director::OverlayDirector;
pub use scene::Scene;

use crate::sim::TrailTheme;

/// Footer-triggered special effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    StarWars,
    Cats,
    Nerd,
    Music,
    Science,
    Math,
    Astronomy,
}

impl EffectKind {
    pub const ALL: [EffectKind; 7] = [
        EffectKind::StarWars,
        EffectKind::Cats,
        EffectKind::Nerd,
        EffectKind::Music,
        EffectKind::Science,
        EffectKind::Math,
        EffectKind::Astronomy,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            EffectKind::StarWars => "starwars",
            EffectKind::Cats => "cats",
            EffectKind::Nerd => "nerd",
            EffectKind::Music => "music",
            EffectKind::Science => "science",
            EffectKind::Math => "math",
            EffectKind::Astronomy => "astronomy",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    /// Theme for the pointer-trail family
    pub fn trail_theme(&self) -> Option<TrailTheme> {
        match self {
            EffectKind::Music => Some(TrailTheme::Music),
            EffectKind::Science => Some(TrailTheme::Science),
            EffectKind::Math => Some(TrailTheme::Math),
            EffectKind::Astronomy => Some(TrailTheme::Astronomy),
            _ => None,
        }
    }
}

/// Which overlay is showing; at most one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveOverlay {
    #[default]
    None,
    Fire,
    Goat,
    Dragon,
    Jungle,
    SpecialEffect(EffectKind),
    Admin,
    Hyperspace,
    Dice,
}

impl ActiveOverlay {
    pub fn is_none(&self) -> bool {
        matches!(self, ActiveOverlay::None)
    }

    /// Text shown in the caption element while mounted
    pub fn caption(&self) -> Option<&'static str> {
        match self {
            ActiveOverlay::None => None,
            ActiveOverlay::Fire => Some("IT'S HOT IN HERE - click to extinguish"),
            ActiveOverlay::Goat => Some("THE G.O.A.T. - PRINCE OF DARKNESS"),
            ActiveOverlay::Dragon => Some("DRAGON ALERT - click to stop the earthquake"),
            ActiveOverlay::Jungle => Some("Welcome to the jungle - use Exit Ecosystem to leave"),
            ActiveOverlay::SpecialEffect(_) => Some("CHAOS MODE ENGAGED: click anywhere to exit"),
            ActiveOverlay::Admin => Some("Portfolio maintenance guide"),
            ActiveOverlay::Hyperspace => Some("JUMPING TO HYPERSPACE - click to drop out"),
            ActiveOverlay::Dice => Some("Rolling for skill check..."),
        }
    }
}

/// Why an overlay went away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    AutoTimeout,
    /// Close button
    Explicit,
    ClickDismiss,
    AudioEnded,
    /// Another overlay took its place
    Replaced,
    /// Toggled off by the control that opened it
    Toggled,
    Dropped,
}

/// What a controller asks of the director after a tick or input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlaySignal {
    Continue,
    Close(CloseReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_ids_round_trip() {
        for kind in EffectKind::ALL {
            assert_eq!(EffectKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(EffectKind::from_id("nature"), None);
        assert_eq!(EffectKind::from_id("StarWars"), None);
    }

    #[test]
    fn test_trail_family() {
        assert_eq!(EffectKind::Math.trail_theme(), Some(TrailTheme::Math));
        assert_eq!(EffectKind::Cats.trail_theme(), None);
    }

    #[test]
    fn test_captions() {
        assert!(ActiveOverlay::None.caption().is_none());
        assert!(ActiveOverlay::Dice.caption().is_some());
        assert!(ActiveOverlay::default().is_none());
    }
}
