//! Overlay simulations
//!
//! Everything here is pure state stepping:
//! - Seeded RNG only (one `Pcg32` per mounted overlay)
//! - Stepped by the frame clock, never by wall-clock callbacks
//! - No rendering or platform dependencies

pub mod clock;
pub mod d20;
pub mod dragon;
pub mod fire;
pub mod goat;
pub mod jungle;
pub mod keyframes;
pub mod matrix;
pub mod particles;
pub mod rain;
pub mod saber;
pub mod starfield;
pub mod timer;
pub mod trail;

pub use clock::{Frame, FrameClock, SubscriptionId, TickSubscription};
pub use d20::{DiceRoller, RollEvents, RollOutcome, RollPhase};
pub use dragon::{DragonFlight, DragonPose, ShadowPose};
pub use fire::{FIRE_PALETTE, FireGrid, PALETTE_MAX, Reseed, WindBias, intensity_rgba};
pub use goat::{GoatFrame, GoatShow};
pub use jungle::{JungleScene, LeafPose, VinePose};
pub use keyframes::{Ease, Repeat, Track};
pub use matrix::{GlyphStamp, MatrixRain};
pub use particles::{Particle, ParticleSystem};
pub use rain::{CatRain, FallingBody};
pub use saber::{Lightsaber, Spring};
pub use starfield::{StarPoint, Starfield, Streak};
pub use timer::{Countdown, Interval};
pub use trail::{Glyph, PointerTrail, SymbolPose, TrailSymbol, TrailTheme};
