use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired, AudioStatus};
use sdl2::Sdl;

const TONE_HZ: i32 = 440;
const TONE_VOLUME: f32 = 0.25;
const SAMPLE_RATE: i32 = 44100;

/// Square wave that plays while the sound timer is running.
pub struct Tone {
    device: AudioDevice<SquareWave>,
}

impl Tone {
    pub fn from_sdl_context(sdl_context: &Sdl) -> Result<Self, String> {
        let audio_subsystem = sdl_context.audio()?;

        let desired_spec = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: None,
        };

        let device = audio_subsystem.open_playback(None, &desired_spec, |spec| {
            SquareWave::new(spec.freq)
        })?;

        Ok(Tone { device })
    }

    /// Starts or pauses playback to match `on`.
    pub fn set(&self, on: bool) {
        let playing = self.device.status() == AudioStatus::Playing;
        if on && !playing {
            self.device.resume();
        } else if !on && playing {
            self.device.pause();
        }
    }
}

/// Alternates between `+TONE_VOLUME` and `-TONE_VOLUME` every half period.
pub struct SquareWave {
    half_period: u32,
    position: u32,
}

impl SquareWave {
    fn new(sample_rate: i32) -> Self {
        Self {
            half_period: (sample_rate / (2 * TONE_HZ)).max(1) as u32,
            position: 0,
        }
    }
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            let high = self.position < self.half_period;
            *sample = if high { TONE_VOLUME } else { -TONE_VOLUME };
            self.position = (self.position + 1) % (2 * self.half_period);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_wave_shape() {
        let mut wave = SquareWave::new(8 * TONE_HZ);
        let mut out = [0.0; 12];

        wave.callback(&mut out);

        assert_eq!(out[..4], [TONE_VOLUME; 4]);
        assert_eq!(out[4..8], [-TONE_VOLUME; 4]);
        assert_eq!(out[8..], [TONE_VOLUME; 4]);
    }
}
