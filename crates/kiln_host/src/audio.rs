//! # Sound Bank
//!
//! Decoded samples plus the playback state of each. Handles index into the
//! bank; the mixer walks every playing voice and sums it into an output
//! buffer. There is no output device here: a backend pulls from
//! [`SoundBank::mix_into`].

use std::io::Cursor;

use kiln_core::{SoundCommand, SoundHandle};

/// Decoded PCM data, interleaved, normalized to [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct SoundData {
    /// Interleaved samples.
    pub samples: Vec<f32>,
    /// Channel count.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
}

impl SoundData {
    /// Decodes a WAV file held in memory.
    ///
    /// # Errors
    ///
    /// Returns the decoder error for malformed or unsupported files.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_wav(bytes: &[u8]) -> Result<Self, hound::Error> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|s| s as f32 / max_value))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(Self {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        })
    }
}

/// Playback state of one voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    /// Silent, cursor at the start.
    Stopped,
    /// Producing samples.
    Playing {
        /// Wraps to the start instead of stopping.
        looped: bool,
    },
    /// Silent, cursor held.
    Paused {
        /// Loop flag to restore on resume.
        looped: bool,
    },
}

#[derive(Debug)]
struct Voice {
    name: String,
    data: SoundData,
    state: VoiceState,
    cursor: usize,
}

/// Every loaded sample and its playback state.
#[derive(Debug, Default)]
pub struct SoundBank {
    voices: Vec<Voice>,
}

impl SoundBank {
    /// Creates an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of loaded samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// True if nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Voices currently playing.
    #[must_use]
    pub fn playing(&self) -> usize {
        self.voices
            .iter()
            .filter(|voice| matches!(voice.state, VoiceState::Playing { .. }))
            .count()
    }

    /// Drops every voice. Handles issued before the call become unknown and
    /// numbering starts over at 1.
    pub fn clear(&mut self) {
        let released = self.voices.len();
        self.voices.clear();
        tracing::debug!(released, "sound bank cleared");
    }

    /// Adds a stopped voice and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the bank already holds `u32::MAX` samples.
    pub fn insert(&mut self, name: &str, data: SoundData) -> SoundHandle {
        self.voices.push(Voice {
            name: name.to_owned(),
            data,
            state: VoiceState::Stopped,
            cursor: 0,
        });
        let raw = u32::try_from(self.voices.len()).expect("sound bank handle space exhausted");
        SoundHandle::new(raw)
    }

    fn voice_mut(&mut self, handle: SoundHandle) -> Option<&mut Voice> {
        let index = (handle.raw() as usize).checked_sub(1)?;
        self.voices.get_mut(index)
    }

    /// Playback state, or `None` for inert and unknown handles.
    #[must_use]
    pub fn state(&self, handle: SoundHandle) -> Option<VoiceState> {
        let index = (handle.raw() as usize).checked_sub(1)?;
        self.voices.get(index).map(|voice| voice.state)
    }

    /// Logical name a handle was loaded under.
    #[must_use]
    pub fn name(&self, handle: SoundHandle) -> Option<&str> {
        let index = (handle.raw() as usize).checked_sub(1)?;
        self.voices.get(index).map(|voice| voice.name.as_str())
    }

    /// Applies a playback command. Inert and unknown handles are ignored.
    pub fn control(&mut self, handle: SoundHandle, command: SoundCommand) {
        let Some(voice) = self.voice_mut(handle) else {
            return;
        };

        voice.state = match (command, voice.state) {
            (SoundCommand::Play { looped }, _) => {
                voice.cursor = 0;
                VoiceState::Playing { looped }
            }
            (SoundCommand::Pause, VoiceState::Playing { looped }) => VoiceState::Paused { looped },
            (SoundCommand::Resume, VoiceState::Paused { looped }) => VoiceState::Playing { looped },
            (SoundCommand::Stop, _) => {
                voice.cursor = 0;
                VoiceState::Stopped
            }
            (_, unchanged) => unchanged,
        };
        tracing::trace!(sample = %voice.name, state = ?voice.state, "sound command applied");
    }

    /// Adds every playing voice into `output` and advances their cursors.
    ///
    /// `output` is interleaved in the voices' own channel layout; voices
    /// are summed sample by sample without resampling.
    pub fn mix_into(&mut self, output: &mut [f32]) {
        for voice in &mut self.voices {
            let VoiceState::Playing { looped } = voice.state else {
                continue;
            };
            let samples = &voice.data.samples;
            if samples.is_empty() {
                voice.state = VoiceState::Stopped;
                continue;
            }

            for out in output.iter_mut() {
                if voice.cursor >= samples.len() {
                    if looped {
                        voice.cursor = 0;
                    } else {
                        voice.state = VoiceState::Stopped;
                        voice.cursor = 0;
                        break;
                    }
                }
                *out += samples[voice.cursor];
                voice.cursor += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(samples: &[f32]) -> SoundData {
        SoundData {
            samples: samples.to_vec(),
            channels: 1,
            sample_rate: 44_100,
        }
    }

    fn wav_bytes(samples: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_int_wav() {
        let decoded = SoundData::from_wav(&wav_bytes(&[0, 16384, -16384])).unwrap();
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.sample_rate, 44_100);
        assert_eq!(decoded.samples, vec![0.0, 0.5, -0.5]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(SoundData::from_wav(b"not a wav file").is_err());
    }

    #[test]
    fn test_handles_start_at_one() {
        let mut bank = SoundBank::new();
        let handle = bank.insert("a.wav", data(&[0.1]));
        assert_eq!(handle.raw(), 1);
        assert!(!handle.is_inert());
        assert_eq!(bank.state(handle), Some(VoiceState::Stopped));
        assert_eq!(bank.name(handle), Some("a.wav"));
        assert_eq!(bank.state(SoundHandle::INERT), None);
    }

    #[test]
    fn test_command_transitions() {
        let mut bank = SoundBank::new();
        let handle = bank.insert("a.wav", data(&[0.1, 0.2]));

        bank.control(handle, SoundCommand::Resume);
        assert_eq!(bank.state(handle), Some(VoiceState::Stopped));

        bank.control(handle, SoundCommand::Play { looped: true });
        bank.control(handle, SoundCommand::Pause);
        assert_eq!(bank.state(handle), Some(VoiceState::Paused { looped: true }));

        bank.control(handle, SoundCommand::Resume);
        assert_eq!(bank.state(handle), Some(VoiceState::Playing { looped: true }));

        bank.control(handle, SoundCommand::Stop);
        assert_eq!(bank.state(handle), Some(VoiceState::Stopped));
    }

    #[test]
    fn test_unknown_handle_is_ignored() {
        let mut bank = SoundBank::new();
        bank.control(SoundHandle::new(9), SoundCommand::Play { looped: false });
        bank.control(SoundHandle::INERT, SoundCommand::Stop);
        assert!(bank.is_empty());
    }

    #[test]
    fn test_mix_loops_and_stops() {
        let mut bank = SoundBank::new();
        let looped = bank.insert("loop.wav", data(&[1.0, 2.0]));
        let once = bank.insert("once.wav", data(&[10.0]));
        bank.control(looped, SoundCommand::Play { looped: true });
        bank.control(once, SoundCommand::Play { looped: false });

        let mut out = [0.0f32; 5];
        bank.mix_into(&mut out);
        assert_eq!(out, [11.0, 2.0, 1.0, 2.0, 1.0]);
        assert_eq!(bank.state(once), Some(VoiceState::Stopped));
        assert_eq!(bank.state(looped), Some(VoiceState::Playing { looped: true }));
    }

    #[test]
    fn test_paused_voice_holds_position() {
        let mut bank = SoundBank::new();
        let handle = bank.insert("a.wav", data(&[1.0, 2.0, 3.0]));
        bank.control(handle, SoundCommand::Play { looped: false });

        let mut out = [0.0f32; 1];
        bank.mix_into(&mut out);
        bank.control(handle, SoundCommand::Pause);
        let mut silent = [0.0f32; 2];
        bank.mix_into(&mut silent);
        assert_eq!(silent, [0.0, 0.0]);

        bank.control(handle, SoundCommand::Resume);
        let mut rest = [0.0f32; 2];
        bank.mix_into(&mut rest);
        assert_eq!(rest, [2.0, 3.0]);
    }

    #[test]
    fn test_clear_releases_every_voice() {
        let mut bank = SoundBank::new();
        let first = bank.insert("a.wav", data(&[1.0]));
        bank.control(first, SoundCommand::Play { looped: true });
        assert_eq!(bank.playing(), 1);

        bank.clear();
        assert!(bank.is_empty());
        assert_eq!(bank.playing(), 0);
        assert_eq!(bank.state(first), None);
        assert_eq!(bank.insert("a.wav", data(&[1.0])).raw(), 1);
    }
}
