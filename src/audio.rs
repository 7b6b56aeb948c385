//! Web Audio output for sound cues: one short oscillator beep per cue.

use web_sys::{AudioContext, OscillatorType};

use crate::games::gym::sound::SoundCue;

/// (frequency Hz, duration s, waveform) per cue.
fn voice(cue: SoundCue) -> (f32, f64, OscillatorType) {
    match cue {
        SoundCue::Lift => (220.0, 0.05, OscillatorType::Square),
        SoundCue::Crit => (440.0, 0.09, OscillatorType::Sawtooth),
        SoundCue::Purchase => (660.0, 0.07, OscillatorType::Triangle),
        SoundCue::Milestone => (880.0, 0.18, OscillatorType::Triangle),
        SoundCue::LevelUp => (523.0, 0.30, OscillatorType::Sine),
        SoundCue::Error => (110.0, 0.12, OscillatorType::Square),
    }
}

const VOLUME: f32 = 0.08;

/// Lazily created so the context starts after the first user gesture.
#[derive(Default)]
pub struct Audio {
    ctx: Option<AudioContext>,
}

impl Audio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play_all(&mut self, cues: &[SoundCue]) {
        for cue in cues {
            if self.play(*cue).is_none() {
                web_sys::console::warn_1(&format!("audio: could not play {:?}", cue).into());
                return;
            }
        }
    }

    fn context(&mut self) -> Option<&AudioContext> {
        if self.ctx.is_none() {
            self.ctx = AudioContext::new().ok();
        }
        self.ctx.as_ref()
    }

    fn play(&mut self, cue: SoundCue) -> Option<()> {
        let (freq, duration, wave) = voice(cue);
        let ctx = self.context()?;
        let now = ctx.current_time();

        let osc = ctx.create_oscillator().ok()?;
        osc.set_type(wave);
        osc.frequency().set_value(freq);

        let gain = ctx.create_gain().ok()?;
        let level = gain.gain();
        level.set_value_at_time(VOLUME, now).ok()?;
        level.exponential_ramp_to_value_at_time(0.001, now + duration).ok()?;

        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        osc.start().ok()?;
        osc.stop_with_when(now + duration).ok()?;
        Some(())
    }
}
