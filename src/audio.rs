//! Procedural sound effects.
//!
//! Each effect is a small set of parameterized voices (waveform, frequency
//! sweep, amplitude envelope) rendered offline into a 16-bit mono WAV buffer
//! and loaded into the audio backend once at startup. Triggers are
//! fire-and-forget; overlapping calls layer on the mixer. If any buffer fails
//! to load the synth runs permanently silent instead of erroring.

use macroquad::audio::{
    PlaySoundParams, Sound, load_sound_from_bytes, play_sound, set_sound_volume, stop_sound,
};

use crate::error::AudioError;

const SAMPLE_RATE: u32 = 44_100;

/// Exponential envelopes decay to this floor, mirroring ramp-to-near-zero.
const ENVELOPE_FLOOR: f32 = 0.01;

pub const DEFAULT_MASTER_VOLUME: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Noise,
}

/// One time-bounded generator inside an effect.
///
/// Frequency sweeps exponentially from `start_freq` to `end_freq` over the
/// voice duration. The amplitude envelope ramps linearly to `peak` over
/// `attack`, then decays exponentially to the floor -- or holds at `peak`
/// when `sustain` is set (used by the looped ambient tone).
#[derive(Debug, Clone, Copy)]
pub struct Voice {
    pub waveform: Waveform,
    pub start_freq: f32,
    pub end_freq: f32,
    /// Offset into the effect, seconds.
    pub start: f32,
    pub duration: f32,
    pub attack: f32,
    pub peak: f32,
    pub sustain: bool,
    /// Optional one-pole low-pass cutoff sweep (start Hz, end Hz).
    pub lowpass: Option<(f32, f32)>,
}

impl Voice {
    fn tone(waveform: Waveform, start_freq: f32, end_freq: f32, duration: f32, peak: f32) -> Self {
        Self {
            waveform,
            start_freq,
            end_freq,
            start: 0.0,
            duration,
            attack: 0.0,
            peak,
            sustain: false,
            lowpass: None,
        }
    }
}

// Voice tables for the five effects plus the ambient tone.

fn startup_voices() -> Vec<Voice> {
    vec![
        // Low pulse rising underneath.
        Voice {
            attack: 0.1,
            ..Voice::tone(Waveform::Sawtooth, 40.0, 80.0, 2.0, 0.3)
        },
        // High sweep arriving half a second in.
        Voice {
            start: 0.5,
            attack: 0.1,
            ..Voice::tone(Waveform::Sine, 2000.0, 4000.0, 1.0, 0.2)
        },
    ]
}

fn eat_voices() -> Vec<Voice> {
    vec![
        Voice::tone(Waveform::Square, 800.0, 1200.0, 0.2, 0.4),
        Voice::tone(Waveform::Sine, 1600.0, 2400.0, 0.2, 0.2),
    ]
}

fn move_voices() -> Vec<Voice> {
    vec![Voice::tone(Waveform::Sine, 200.0, 200.0, 0.05, 0.1)]
}

fn click_voices() -> Vec<Voice> {
    vec![Voice::tone(Waveform::Square, 1000.0, 1500.0, 0.1, 0.3)]
}

fn game_over_voices() -> Vec<Voice> {
    vec![
        // Falling drone.
        Voice::tone(Waveform::Sawtooth, 400.0, 100.0, 1.5, 0.5),
        // Glitch noise swept through a closing low-pass.
        Voice {
            start: 0.2,
            attack: 0.1,
            lowpass: Some((2000.0, 200.0)),
            ..Voice::tone(Waveform::Noise, 0.0, 0.0, 1.3, 0.1)
        },
    ]
}

fn ambient_voices() -> Vec<Voice> {
    vec![Voice {
        sustain: true,
        ..Voice::tone(Waveform::Sine, 60.0, 60.0, 2.0, 0.05)
    }]
}

struct EffectBank {
    startup: Sound,
    eat: Sound,
    movement: Sound,
    click: Sound,
    game_over: Sound,
    ambient: Sound,
}

/// Owns the pre-rendered effects, the master volume, and the enabled flag.
pub struct AudioSynth {
    master_volume: f32,
    enabled: bool,
    bank: Option<EffectBank>,
    ambient_playing: bool,
}

impl AudioSynth {
    /// Renders and loads every effect. Degrades to silent mode on failure.
    pub async fn new() -> Self {
        let bank = match load_bank().await {
            Ok(bank) => {
                log::info!("audio synth initialized");
                Some(bank)
            }
            Err(e) => {
                log::warn!("{e}, running silent");
                None
            }
        };
        Self {
            master_volume: DEFAULT_MASTER_VOLUME,
            enabled: true,
            bank,
            ambient_playing: false,
        }
    }

    pub fn play_startup_sound(&self) {
        self.play(|b| &b.startup);
    }

    pub fn play_eat_sound(&self) {
        self.play(|b| &b.eat);
    }

    pub fn play_move_sound(&self) {
        self.play(|b| &b.movement);
    }

    pub fn play_click_sound(&self) {
        self.play(|b| &b.click);
    }

    pub fn play_game_over_sound(&self) {
        self.play(|b| &b.game_over);
    }

    /// Starts the looped ambient tone; restarts it if already playing.
    pub fn play_ambient_sound(&mut self) {
        if !self.enabled {
            return;
        }
        let Some(bank) = &self.bank else { return };
        if self.ambient_playing {
            stop_sound(&bank.ambient);
        }
        play_sound(
            &bank.ambient,
            PlaySoundParams {
                looped: true,
                volume: self.master_volume,
            },
        );
        self.ambient_playing = true;
    }

    pub fn stop_ambient_sound(&mut self) {
        if let Some(bank) = &self.bank
            && self.ambient_playing
        {
            stop_sound(&bank.ambient);
        }
        self.ambient_playing = false;
    }

    /// Clamped to [0, 1]; the ambient tone picks the change up live.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
        self.refresh_ambient_volume();
    }

    /// Flips the enabled flag and returns the new state.
    pub fn toggle_sound(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.refresh_ambient_volume();
        self.enabled
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Volume applied to playback: master volume, or 0 while muted.
    pub fn effective_volume(&self) -> f32 {
        if self.enabled { self.master_volume } else { 0.0 }
    }

    fn play(&self, pick: impl Fn(&EffectBank) -> &Sound) {
        if !self.enabled {
            return;
        }
        let Some(bank) = &self.bank else { return };
        play_sound(
            pick(bank),
            PlaySoundParams {
                looped: false,
                volume: self.master_volume,
            },
        );
    }

    fn refresh_ambient_volume(&self) {
        if let Some(bank) = &self.bank
            && self.ambient_playing
        {
            set_sound_volume(&bank.ambient, self.effective_volume());
        }
    }
}

#[cfg(test)]
impl AudioSynth {
    /// Silent-mode synth for tests; no audio backend required.
    pub(crate) fn disabled() -> Self {
        Self {
            master_volume: DEFAULT_MASTER_VOLUME,
            enabled: true,
            bank: None,
            ambient_playing: false,
        }
    }
}

async fn load_bank() -> Result<EffectBank, AudioError> {
    Ok(EffectBank {
        startup: load_effect(&startup_voices()).await?,
        eat: load_effect(&eat_voices()).await?,
        movement: load_effect(&move_voices()).await?,
        click: load_effect(&click_voices()).await?,
        game_over: load_effect(&game_over_voices()).await?,
        ambient: load_effect(&ambient_voices()).await?,
    })
}

async fn load_effect(voices: &[Voice]) -> Result<Sound, AudioError> {
    let wav = encode_wav(&render_effect(voices));
    load_sound_from_bytes(&wav)
        .await
        .map_err(|e| AudioError::Unavailable(format!("{e:?}")))
}

/// Mixes the voices into a mono sample buffer at unit gain. The master
/// volume is applied at playback time, never baked into the buffer.
fn render_effect(voices: &[Voice]) -> Vec<i16> {
    let total = voices
        .iter()
        .map(|v| v.start + v.duration)
        .fold(0.0f32, f32::max);
    let n = (total * SAMPLE_RATE as f32).ceil() as usize;
    let dt = 1.0 / SAMPLE_RATE as f32;
    let mut mix = vec![0.0f32; n];

    for voice in voices {
        let first = (voice.start * SAMPLE_RATE as f32) as usize;
        let count = (voice.duration * SAMPLE_RATE as f32) as usize;
        let mut filter_state = 0.0f32;

        for i in 0..count.min(n.saturating_sub(first)) {
            let t = i as f32 * dt;
            let mut sample = oscillate(voice, t);
            if let Some((from, to)) = voice.lowpass {
                let cutoff = sweep(from, to, t / voice.duration);
                let rc = 1.0 / (std::f32::consts::TAU * cutoff);
                filter_state += (dt / (rc + dt)) * (sample - filter_state);
                sample = filter_state;
            }
            mix[first + i] += sample * envelope(voice, t);
        }
    }

    mix.iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

fn oscillate(voice: &Voice, t: f32) -> f32 {
    let phase = phase_at(voice, t);
    match voice.waveform {
        Waveform::Sine => (std::f32::consts::TAU * phase).sin(),
        Waveform::Square => {
            if phase.fract() < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => 2.0 * phase.fract() - 1.0,
        Waveform::Noise => macroquad::rand::gen_range(-1.0, 1.0),
    }
}

/// Exponential sweep between two frequencies over normalized progress `x`
/// (0 → `from`, 1 → `to`), matching the pitch sweep convention so a filter
/// cutoff tracks perceptual frequency.
fn sweep(from: f32, to: f32, x: f32) -> f32 {
    from * (to / from).powf(x)
}

/// Accumulated cycles at `t` for an exponential frequency sweep. Integrating
/// the sweep keeps the phase continuous, so sweeps do not click.
fn phase_at(voice: &Voice, t: f32) -> f32 {
    let (f0, f1) = (voice.start_freq, voice.end_freq);
    if (f1 - f0).abs() < f32::EPSILON || voice.duration <= 0.0 {
        return f0 * t;
    }
    let ratio = f1 / f0;
    f0 * voice.duration / ratio.ln() * (ratio.powf(t / voice.duration) - 1.0)
}

fn envelope(voice: &Voice, t: f32) -> f32 {
    if t < 0.0 || t >= voice.duration {
        return 0.0;
    }
    if voice.attack > 0.0 && t < voice.attack {
        return voice.peak * t / voice.attack;
    }
    if voice.sustain {
        return voice.peak;
    }
    let tail = voice.duration - voice.attack;
    if tail <= 0.0 {
        return voice.peak;
    }
    let ratio = (ENVELOPE_FLOOR / voice.peak).min(1.0);
    voice.peak * ratio.powf((t - voice.attack) / tail)
}

/// PCM16 mono WAV container around the rendered samples.
fn encode_wav(samples: &[i16]) -> Vec<u8> {
    let data_size = (samples.len() * 2) as u32;
    let mut out = Vec::with_capacity(44 + samples.len() * 2);

    let block_align: u16 = 2;
    let byte_rate: u32 = SAMPLE_RATE * u32::from(block_align);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_size).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent_synth() -> AudioSynth {
        AudioSynth::disabled()
    }

    #[test]
    fn master_volume_is_clamped() {
        let mut synth = silent_synth();
        synth.set_master_volume(1.5);
        assert_eq!(synth.master_volume(), 1.0);
        synth.set_master_volume(-0.5);
        assert_eq!(synth.master_volume(), 0.0);
    }

    #[test]
    fn zero_volume_triggers_are_silent_and_do_not_panic() {
        let mut synth = silent_synth();
        synth.set_master_volume(0.0);
        assert_eq!(synth.effective_volume(), 0.0);

        synth.play_startup_sound();
        synth.play_eat_sound();
        synth.play_move_sound();
        synth.play_click_sound();
        synth.play_game_over_sound();
        synth.play_ambient_sound();
        synth.stop_ambient_sound();
    }

    #[test]
    fn toggle_returns_new_state_and_mutes() {
        let mut synth = silent_synth();
        assert!(!synth.toggle_sound());
        assert!(!synth.is_enabled());
        assert_eq!(synth.effective_volume(), 0.0);

        assert!(synth.toggle_sound());
        assert_eq!(synth.effective_volume(), DEFAULT_MASTER_VOLUME);
    }

    #[test]
    fn unavailable_synth_triggers_are_no_ops() {
        let synth = silent_synth();
        synth.play_eat_sound();
        synth.play_game_over_sound();
    }

    #[test]
    fn flat_sweep_phase_is_linear() {
        let voice = Voice::tone(Waveform::Sine, 200.0, 200.0, 1.0, 1.0);
        assert!((phase_at(&voice, 0.5) - 100.0).abs() < 1e-3);
        assert!((phase_at(&voice, 1.0) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn sweep_phase_starts_at_zero_and_grows_monotonically() {
        let voice = Voice::tone(Waveform::Square, 800.0, 1200.0, 0.2, 1.0);
        assert_eq!(phase_at(&voice, 0.0), 0.0);
        let mut last = 0.0;
        for i in 1..=10 {
            let p = phase_at(&voice, 0.02 * i as f32);
            assert!(p > last);
            last = p;
        }
    }

    #[test]
    fn envelope_attacks_then_decays_within_peak() {
        let voice = Voice {
            attack: 0.1,
            ..Voice::tone(Waveform::Sine, 100.0, 100.0, 1.0, 0.5)
        };
        assert_eq!(envelope(&voice, 0.0), 0.0);
        assert!((envelope(&voice, 0.05) - 0.25).abs() < 1e-6);
        assert!((envelope(&voice, 0.1) - 0.5).abs() < 1e-6);
        assert!(envelope(&voice, 0.6) < 0.5);
        assert!(envelope(&voice, 0.999) <= 0.5 * ENVELOPE_FLOOR / 0.5 + 1e-3);
        assert_eq!(envelope(&voice, 1.0), 0.0);
    }

    #[test]
    fn sustained_voice_holds_peak() {
        let voice = Voice {
            sustain: true,
            ..Voice::tone(Waveform::Sine, 60.0, 60.0, 2.0, 0.05)
        };
        assert_eq!(envelope(&voice, 1.0), 0.05);
        assert_eq!(envelope(&voice, 1.99), 0.05);
    }

    #[test]
    fn rendered_effect_covers_the_longest_voice() {
        let samples = render_effect(&startup_voices());
        let expected = (2.0 * SAMPLE_RATE as f32).ceil() as usize;
        assert_eq!(samples.len(), expected);
        // The delayed sweep voice must leave the opening silent-ish except
        // for the bass pulse, which is still inside its attack at t=0.
        assert_eq!(samples[0], 0);
    }

    #[test]
    fn delayed_voice_is_silent_before_its_start() {
        let voices = vec![Voice {
            start: 0.5,
            ..Voice::tone(Waveform::Sine, 440.0, 440.0, 0.5, 0.5)
        }];
        let samples = render_effect(&voices);
        let first = (0.5 * SAMPLE_RATE as f32) as usize;
        assert!(samples[..first].iter().all(|&s| s == 0));
        assert!(samples[first..].iter().any(|&s| s != 0));
    }

    #[test]
    fn mixed_voices_stay_in_range() {
        let samples = render_effect(&game_over_voices());
        assert!(!samples.is_empty());
        // i16 conversion clamps; make sure something audible was produced.
        assert!(samples.iter().any(|&s| s.unsigned_abs() > 1000));
    }

    #[test]
    fn wav_header_is_well_formed() {
        let wav = encode_wav(&[0, 1, -1, 2]);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 8);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u16::from_le_bytes(wav[20..22].try_into().unwrap()), 1);
        assert_eq!(u16::from_le_bytes(wav[22..24].try_into().unwrap()), 1);
        assert_eq!(
            u32::from_le_bytes(wav[24..28].try_into().unwrap()),
            SAMPLE_RATE
        );
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 8);
        assert_eq!(wav.len(), 44 + 8);
    }
}
