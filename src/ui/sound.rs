//! Sound engine: procedural 8-bit style cues via rodio.
//!
//! Every `SoundClip` is synthesized into an in-memory WAV buffer at init time.
//! Playback is fire-and-forget (non-blocking) via rodio's Sink.
//!
//! Compile without the "sound" feature to disable audio entirely
//! (the stub SoundEngine does nothing).

use crate::sim::audio::{AudioSink, SoundClip};

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::f32::consts::PI;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::sim::audio::SoundClip;

    const SAMPLE_RATE: u32 = 22050;

    const ALL_CLIPS: [SoundClip; 11] = [
        SoundClip::Treasure,
        SoundClip::DrinkPotion,
        SoundClip::WarriorAttack,
        SoundClip::MageAttack,
        SoundClip::ArcherAttack,
        SoundClip::GoblinAttack,
        SoundClip::OrcAttack,
        SoundClip::DragonAttack,
        SoundClip::GameOver,
        SoundClip::EnemyDie,
        SoundClip::Footsteps,
    ];

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        volume: f32,
        clips: HashMap<SoundClip, Arc<Vec<u8>>>,
    }

    impl SoundEngine {
        /// `None` when no output device is available.
        pub fn new(volume: f32) -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            let clips = ALL_CLIPS
                .iter()
                .map(|&clip| (clip, Arc::new(make_wav(&synthesize(clip)))))
                .collect();
            Some(SoundEngine { _stream: stream, handle, volume, clips })
        }

        pub(super) fn play_clip(&self, clip: SoundClip) {
            let Some(buf) = self.clips.get(&clip) else { return };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.set_volume(self.volume);
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }

    fn synthesize(clip: SoundClip) -> Vec<f32> {
        match clip {
            SoundClip::Treasure      => gen_arpeggio(&[1047.0, 1319.0, 1568.0], 0.045),
            SoundClip::DrinkPotion   => gen_sweep(300.0, 700.0, 0.18, 0.0),
            SoundClip::WarriorAttack => gen_sweep(500.0, 150.0, 0.10, 0.6),
            SoundClip::MageAttack    => gen_sweep(900.0, 1800.0, 0.14, 0.1),
            SoundClip::ArcherAttack  => gen_sweep(1200.0, 800.0, 0.06, 0.0),
            SoundClip::GoblinAttack  => gen_sweep(700.0, 400.0, 0.08, 0.3),
            SoundClip::OrcAttack     => gen_sweep(220.0, 120.0, 0.16, 0.4),
            SoundClip::DragonAttack  => gen_sweep(160.0, 60.0, 0.35, 0.7),
            SoundClip::GameOver      => gen_arpeggio(&[440.0, 370.0, 311.0, 261.0], 0.12),
            SoundClip::EnemyDie      => gen_sweep(600.0, 200.0, 0.15, 0.0),
            SoundClip::Footsteps     => gen_sweep(180.0, 140.0, 0.04, 0.8),
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Pitch sweep from `f0` to `f1`, mixed with `noise` (0..1) of LCG noise.
    fn gen_sweep(f0: f32, f1: f32, duration: f32, noise: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 12345;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = f0 + (f1 - f0) * t;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * freq * 2.0 * PI).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let hiss = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(0.7);
                (tone * (1.0 - noise) + hiss * noise) * env * 0.3
            })
            .collect()
    }

    /// Sequence of short notes with a square-ish timbre.
    fn gen_arpeggio(notes: &[f32], note_dur: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * 2.0 * PI).sin() * 0.7
                    + (t * freq * 3.0 * 2.0 * PI).sin() * 0.3;
                samples.push(wave * env * 0.25);
            }
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_volume: f32) -> Option<Self> { Some(SoundEngine) }
    fn play_clip(&self, _clip: SoundClip) {}
}

impl AudioSink for SoundEngine {
    fn play(&self, clip: SoundClip) {
        tracing::trace!("play {}", clip.file_name());
        self.play_clip(clip);
    }
}
