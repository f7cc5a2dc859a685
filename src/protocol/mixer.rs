//! Mixer snapshot payload
//!
//! A MixerData packet is a concatenation of seven fixed sub-records followed
//! by six fixed channel records, with no length prefixes anywhere. A width
//! change in any sub-record shifts everything after it, so the decoder
//! asserts the cumulative consumed byte count equals the fixed total and
//! fails with `SizeMismatch` otherwise.

use super::wire::{Reader, TextField, Writer};
use super::{DataType, Error, Result, MAX_CHANNELS, MIXER_NAME_LEN};

/// Mixer identity record (32 bytes)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MixerInfo {
    /// Mixer ID
    pub mixer_id: u8,
    /// Mixer type
    pub mixer_type: u8,
    /// Reserved
    pub reserved1: [u8; 2],
    /// Mixer name, 16 raw bytes on the wire
    pub mixer_name: TextField<MIXER_NAME_LEN>,
    /// Reserved
    pub reserved2: [u8; 12],
}

impl MixerInfo {
    const LEN: usize = 32;

    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            mixer_id: r.u8()?,
            mixer_type: r.u8()?,
            reserved1: r.array()?,
            mixer_name: r.text_field()?,
            reserved2: r.array()?,
        })
    }

    fn encode(&self, w: &mut Writer) {
        w.u8(self.mixer_id);
        w.u8(self.mixer_type);
        w.raw(&self.reserved1);
        w.text_field(&self.mixer_name);
        w.raw(&self.reserved2);
    }
}

/// Master channel strip (27 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MasterChannel {
    /// Reserved (mic levels)
    pub reserved1: [u8; 2],
    /// Mic EQ high
    pub mic_eq_hi: u8,
    /// Mic EQ low
    pub mic_eq_low: u8,
    /// Master audio level
    pub master_audio_level: u8,
    /// Master fader level
    pub master_fader_level: u8,
    /// Reserved
    pub reserved2: [u8; 4],
    /// Link cue A
    pub link_cue_a: u8,
    /// Link cue B
    pub link_cue_b: u8,
    /// Master filter
    pub master_filter: u8,
    /// Reserved
    pub reserved3: u8,
    /// Master cue A
    pub master_cue_a: u8,
    /// Master cue B
    pub master_cue_b: u8,
    /// Reserved
    pub reserved4: u8,
    /// Master isolator on/off
    pub isolator_on: u8,
    /// Master isolator high band
    pub isolator_high: u8,
    /// Master isolator mid band
    pub isolator_mid: u8,
    /// Master isolator low band
    pub isolator_low: u8,
    /// Reserved
    pub reserved5: u8,
    /// Filter HPF
    pub filter_hpf: u8,
    /// Filter LPF
    pub filter_lpf: u8,
    /// Filter resonance
    pub filter_resonance: u8,
    /// Reserved
    pub reserved6: [u8; 2],
}

impl MasterChannel {
    const LEN: usize = 27;

    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            reserved1: r.array()?,
            mic_eq_hi: r.u8()?,
            mic_eq_low: r.u8()?,
            master_audio_level: r.u8()?,
            master_fader_level: r.u8()?,
            reserved2: r.array()?,
            link_cue_a: r.u8()?,
            link_cue_b: r.u8()?,
            master_filter: r.u8()?,
            reserved3: r.u8()?,
            master_cue_a: r.u8()?,
            master_cue_b: r.u8()?,
            reserved4: r.u8()?,
            isolator_on: r.u8()?,
            isolator_high: r.u8()?,
            isolator_mid: r.u8()?,
            isolator_low: r.u8()?,
            reserved5: r.u8()?,
            filter_hpf: r.u8()?,
            filter_lpf: r.u8()?,
            filter_resonance: r.u8()?,
            reserved6: r.array()?,
        })
    }

    fn encode(&self, w: &mut Writer) {
        w.raw(&self.reserved1);
        w.u8(self.mic_eq_hi);
        w.u8(self.mic_eq_low);
        w.u8(self.master_audio_level);
        w.u8(self.master_fader_level);
        w.raw(&self.reserved2);
        w.u8(self.link_cue_a);
        w.u8(self.link_cue_b);
        w.u8(self.master_filter);
        w.u8(self.reserved3);
        w.u8(self.master_cue_a);
        w.u8(self.master_cue_b);
        w.u8(self.reserved4);
        w.u8(self.isolator_on);
        w.u8(self.isolator_high);
        w.u8(self.isolator_mid);
        w.u8(self.isolator_low);
        w.u8(self.reserved5);
        w.u8(self.filter_hpf);
        w.u8(self.filter_lpf);
        w.u8(self.filter_resonance);
        w.raw(&self.reserved6);
    }
}

/// Send/return FX section (13 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SendReturnFx {
    /// Send FX effect
    pub effect: u8,
    /// Send FX ext 1
    pub ext1: u8,
    /// Send FX ext 2
    pub ext2: u8,
    /// Send FX master mix
    pub master_mix: u8,
    /// Send FX size/feedback
    pub size_feedback: u8,
    /// Send FX time
    pub time: u8,
    /// Send FX HPF
    pub hpf: u8,
    /// Send FX level
    pub level: u8,
    /// Send return 3 source switch
    pub return3_source: u8,
    /// Send return 3 type switch
    pub return3_type: u8,
    /// Send return 3 on/off
    pub return3_on: u8,
    /// Send return 3 level
    pub return3_level: u8,
    /// Reserved
    pub reserved: u8,
}

impl SendReturnFx {
    const LEN: usize = 13;

    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            effect: r.u8()?,
            ext1: r.u8()?,
            ext2: r.u8()?,
            master_mix: r.u8()?,
            size_feedback: r.u8()?,
            time: r.u8()?,
            hpf: r.u8()?,
            level: r.u8()?,
            return3_source: r.u8()?,
            return3_type: r.u8()?,
            return3_on: r.u8()?,
            return3_level: r.u8()?,
            reserved: r.u8()?,
        })
    }

    fn encode(&self, w: &mut Writer) {
        w.u8(self.effect);
        w.u8(self.ext1);
        w.u8(self.ext2);
        w.u8(self.master_mix);
        w.u8(self.size_feedback);
        w.u8(self.time);
        w.u8(self.hpf);
        w.u8(self.level);
        w.u8(self.return3_source);
        w.u8(self.return3_type);
        w.u8(self.return3_on);
        w.u8(self.return3_level);
        w.u8(self.reserved);
    }
}

/// Crossfader section (3 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrossFader {
    /// Channel fader curve setting
    pub channel_fader_curve: u8,
    /// Crossfader curve setting
    pub cross_fader_curve: u8,
    /// Crossfader level
    pub level: u8,
}

impl CrossFader {
    const LEN: usize = 3;

    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            channel_fader_curve: r.u8()?,
            cross_fader_curve: r.u8()?,
            level: r.u8()?,
        })
    }

    fn encode(&self, w: &mut Writer) {
        w.u8(self.channel_fader_curve);
        w.u8(self.cross_fader_curve);
        w.u8(self.level);
    }
}

/// Beat FX section (7 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeatFx {
    /// Beat FX on/off
    pub on: u8,
    /// Beat FX level/depth
    pub level: u8,
    /// Beat FX channel select
    pub channel_select: u8,
    /// Beat FX select
    pub select: u8,
    /// Beat FX frequency high
    pub freq_high: u8,
    /// Beat FX frequency mid
    pub freq_mid: u8,
    /// Beat FX frequency low
    pub freq_low: u8,
}

impl BeatFx {
    const LEN: usize = 7;

    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            on: r.u8()?,
            level: r.u8()?,
            channel_select: r.u8()?,
            select: r.u8()?,
            freq_high: r.u8()?,
            freq_mid: r.u8()?,
            freq_low: r.u8()?,
        })
    }

    fn encode(&self, w: &mut Writer) {
        w.u8(self.on);
        w.u8(self.level);
        w.u8(self.channel_select);
        w.u8(self.select);
        w.u8(self.freq_high);
        w.u8(self.freq_mid);
        w.u8(self.freq_low);
    }
}

/// Headphones section (5 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Headphones {
    /// Pre EQ
    pub pre_eq: u8,
    /// A level
    pub a_level: u8,
    /// A mix
    pub a_mix: u8,
    /// B level
    pub b_level: u8,
    /// B mix
    pub b_mix: u8,
}

impl Headphones {
    const LEN: usize = 5;

    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            pre_eq: r.u8()?,
            a_level: r.u8()?,
            a_mix: r.u8()?,
            b_level: r.u8()?,
            b_mix: r.u8()?,
        })
    }

    fn encode(&self, w: &mut Writer) {
        w.u8(self.pre_eq);
        w.u8(self.a_level);
        w.u8(self.a_mix);
        w.u8(self.b_level);
        w.u8(self.b_mix);
    }
}

/// Booth section (13 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Booth {
    /// Booth level
    pub level: u8,
    /// Booth EQ high
    pub eq_high: u8,
    /// Booth EQ low
    pub eq_low: u8,
    /// Reserved
    pub reserved: [u8; 10],
}

impl Booth {
    const LEN: usize = 13;

    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            level: r.u8()?,
            eq_high: r.u8()?,
            eq_low: r.u8()?,
            reserved: r.array()?,
        })
    }

    fn encode(&self, w: &mut Writer) {
        w.u8(self.level);
        w.u8(self.eq_high);
        w.u8(self.eq_low);
        w.raw(&self.reserved);
    }
}

/// One input channel strip (24 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MixerChannel {
    /// Channel source setting
    pub source_select: u8,
    /// Channel audio level
    pub audio_level: u8,
    /// Channel fader level
    pub fader_level: u8,
    /// Trim level
    pub trim_level: u8,
    /// Compressor level
    pub comp_level: u8,
    /// EQ high
    pub eq_hi_level: u8,
    /// EQ high-mid
    pub eq_hi_mid_level: u8,
    /// EQ low-mid
    pub eq_lo_mid_level: u8,
    /// EQ low
    pub eq_low_level: u8,
    /// Color level
    pub color_level: u8,
    /// Send amount
    pub send: u8,
    /// Cue A assign
    pub cue_a: u8,
    /// Cue B assign
    pub cue_b: u8,
    /// Crossfader assign
    pub crossfader_assign: u8,
    /// Reserved
    pub reserved: [u8; 10],
}

impl MixerChannel {
    const LEN: usize = 24;

    fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            source_select: r.u8()?,
            audio_level: r.u8()?,
            fader_level: r.u8()?,
            trim_level: r.u8()?,
            comp_level: r.u8()?,
            eq_hi_level: r.u8()?,
            eq_hi_mid_level: r.u8()?,
            eq_lo_mid_level: r.u8()?,
            eq_low_level: r.u8()?,
            color_level: r.u8()?,
            send: r.u8()?,
            cue_a: r.u8()?,
            cue_b: r.u8()?,
            crossfader_assign: r.u8()?,
            reserved: r.array()?,
        })
    }

    fn encode(&self, w: &mut Writer) {
        w.u8(self.source_select);
        w.u8(self.audio_level);
        w.u8(self.fader_level);
        w.u8(self.trim_level);
        w.u8(self.comp_level);
        w.u8(self.eq_hi_level);
        w.u8(self.eq_hi_mid_level);
        w.u8(self.eq_lo_mid_level);
        w.u8(self.eq_low_level);
        w.u8(self.color_level);
        w.u8(self.send);
        w.u8(self.cue_a);
        w.u8(self.cue_b);
        w.u8(self.crossfader_assign);
        w.raw(&self.reserved);
    }
}

/// Mixer body (246 bytes): full front-panel snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixerSnapshot {
    /// Data type byte, 150 for mixer
    pub data_type: u8,
    /// Layer identifier (0 for mixer-wide data)
    pub layer_id: u8,
    /// Mixer identity
    pub info: MixerInfo,
    /// Master channel strip
    pub master: MasterChannel,
    /// Send/return FX
    pub send_return_fx: SendReturnFx,
    /// Crossfader
    pub crossfader: CrossFader,
    /// Beat FX
    pub beat_fx: BeatFx,
    /// Headphones
    pub headphones: Headphones,
    /// Booth output
    pub booth: Booth,
    /// Input channels, fixed array of 6
    pub channels: [MixerChannel; MAX_CHANNELS],
}

impl Default for MixerSnapshot {
    fn default() -> Self {
        Self {
            data_type: DataType::Mixer.as_u8(),
            layer_id: 0,
            info: MixerInfo::default(),
            master: MasterChannel::default(),
            send_return_fx: SendReturnFx::default(),
            crossfader: CrossFader::default(),
            beat_fx: BeatFx::default(),
            headphones: Headphones::default(),
            booth: Booth::default(),
            channels: [MixerChannel::default(); MAX_CHANNELS],
        }
    }
}

impl MixerSnapshot {
    /// Fixed body length in bytes
    pub const LEN: usize = 2
        + MixerInfo::LEN
        + MasterChannel::LEN
        + SendReturnFx::LEN
        + CrossFader::LEN
        + BeatFx::LEN
        + Headphones::LEN
        + Booth::LEN
        + MixerChannel::LEN * MAX_CHANNELS;

    /// Decode the body following the header.
    ///
    /// Sub-records carry no length prefixes, so the decoder cross-checks the
    /// cumulative consumed byte count against [`MixerSnapshot::LEN`].
    pub fn decode(r: &mut Reader) -> Result<Self> {
        let start = r.consumed();

        let snapshot = Self {
            data_type: r.u8()?,
            layer_id: r.u8()?,
            info: MixerInfo::decode(r)?,
            master: MasterChannel::decode(r)?,
            send_return_fx: SendReturnFx::decode(r)?,
            crossfader: CrossFader::decode(r)?,
            beat_fx: BeatFx::decode(r)?,
            headphones: Headphones::decode(r)?,
            booth: Booth::decode(r)?,
            channels: {
                let mut channels = [MixerChannel::default(); MAX_CHANNELS];
                for channel in &mut channels {
                    *channel = MixerChannel::decode(r)?;
                }
                channels
            },
        };

        let consumed = r.consumed() - start;
        if consumed != Self::LEN {
            return Err(Error::SizeMismatch {
                expected: Self::LEN,
                got: consumed,
            });
        }
        Ok(snapshot)
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        let start = w.len();

        w.u8(self.data_type);
        w.u8(self.layer_id);
        self.info.encode(w);
        self.master.encode(w);
        self.send_return_fx.encode(w);
        self.crossfader.encode(w);
        self.beat_fx.encode(w);
        self.headphones.encode(w);
        self.booth.encode(w);
        for channel in &self.channels {
            channel.encode(w);
        }

        let written = w.len() - start;
        if written != Self::LEN {
            return Err(Error::SizeMismatch {
                expected: Self::LEN,
                got: written,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn busy_snapshot() -> MixerSnapshot {
        let mut snapshot = MixerSnapshot {
            info: MixerInfo {
                mixer_id: 1,
                mixer_type: 2,
                mixer_name: "DJM-V10".into(),
                ..MixerInfo::default()
            },
            crossfader: CrossFader {
                channel_fader_curve: 1,
                cross_fader_curve: 2,
                level: 127,
            },
            ..MixerSnapshot::default()
        };
        snapshot.master.master_audio_level = 200;
        snapshot.master.isolator_on = 1;
        snapshot.booth.reserved[9] = 0xEE;
        for (i, channel) in snapshot.channels.iter_mut().enumerate() {
            channel.source_select = i as u8;
            channel.fader_level = 255 - i as u8;
            channel.reserved[0] = 0x11;
        }
        snapshot
    }

    #[test]
    fn mixer_fixed_total_is_246() {
        assert_eq!(MixerSnapshot::LEN, 246);
    }

    #[test]
    fn mixer_roundtrip_preserves_reserved_bytes() {
        let snapshot = busy_snapshot();
        let mut w = Writer::new();
        snapshot.encode(&mut w).unwrap();
        assert_eq!(w.len(), MixerSnapshot::LEN);
        let mut r = Reader::new(Bytes::from(w.into_vec()));
        let decoded = MixerSnapshot::decode(&mut r).unwrap();
        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.booth.reserved[9], 0xEE);
    }

    #[test]
    fn mixer_truncated_mid_record_is_error() {
        let mut w = Writer::new();
        busy_snapshot().encode(&mut w).unwrap();
        let encoded = w.into_vec();
        // Cut inside the channel array.
        let mut r = Reader::new(Bytes::from(encoded[..200].to_vec()));
        assert!(matches!(
            MixerSnapshot::decode(&mut r),
            Err(Error::Truncated { .. })
        ));
    }
}
