//! Browser audio: `<audio>` elements for clips, Web Audio oscillators for
//! the procedural dice cues

use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use super::{AudioBackend, AudioCue, AudioTrack, SoundEffect};

pub struct WebAudio {
    ctx: Option<AudioContext>,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudio {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - dice sounds disabled");
        }
        Self { ctx }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short blip, `delay` seconds from now
    fn blip(ctx: &AudioContext, freq: f32, osc_type: OscillatorType, vol: f32, delay: f64, len: f64) {
        let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;
        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + len)
            .ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + len + 0.05).ok();
    }

    fn play_shuffle(ctx: &AudioContext, vol: f32) {
        Self::blip(ctx, 900.0, OscillatorType::Square, vol * 0.08, 0.0, 0.03);
    }

    fn play_settle(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [520.0, 780.0].iter().enumerate() {
            Self::blip(ctx, *freq, OscillatorType::Sine, vol * 0.3, i as f64 * 0.1, 0.3);
        }
    }

    /// Rising arpeggio
    fn play_critical_hit(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
            Self::blip(ctx, *freq, OscillatorType::Triangle, vol * 0.25, i as f64 * 0.08, 0.25);
        }
    }

    /// Sad descending thud
    fn play_critical_failure(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.6)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(40.0, t + 0.6)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.7).ok();
    }

    fn play_pop(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 1200.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(1200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(200.0, t + 0.12)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }
}

impl AudioBackend for WebAudio {
    fn play(&mut self, cue: AudioCue, volume: f32) -> Box<dyn AudioTrack> {
        let element = match HtmlAudioElement::new_with_src(cue.url()) {
            Ok(el) => Some(el),
            Err(e) => {
                log::warn!("Could not create audio element for {cue:?}: {e:?}");
                None
            }
        };

        if let Some(el) = &element {
            el.set_volume(volume.clamp(0.0, 1.0) as f64);
            el.set_loop(cue.looping());
            match el.play() {
                Ok(promise) => {
                    // Autoplay policy rejects the promise without a prior gesture
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Err(e) = JsFuture::from(promise).await {
                            log::warn!("Audio playback blocked for {cue:?}: {e:?}");
                        }
                    });
                }
                Err(e) => log::warn!("Audio playback failed for {cue:?}: {e:?}"),
            }
        }

        Box::new(WebTrack {
            cue,
            element,
            stopped: false,
        })
    }

    fn effect(&mut self, effect: SoundEffect, volume: f32) {
        if volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::DiceShuffle => Self::play_shuffle(ctx, volume),
            SoundEffect::DiceSettle => Self::play_settle(ctx, volume),
            SoundEffect::CriticalHit => Self::play_critical_hit(ctx, volume),
            SoundEffect::CriticalFailure => Self::play_critical_failure(ctx, volume),
            SoundEffect::FireworkPop => Self::play_pop(ctx, volume),
        }
    }
}

struct WebTrack {
    cue: AudioCue,
    element: Option<HtmlAudioElement>,
    stopped: bool,
}

impl AudioTrack for WebTrack {
    fn cue(&self) -> AudioCue {
        self.cue
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Some(el) = self.element.take()
            && let Err(e) = el.pause()
        {
            log::warn!("Failed to pause {:?}: {e:?}", self.cue);
        }
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn has_ended(&self) -> bool {
        self.element.as_ref().is_some_and(|el| el.ended())
    }
}
