use std::collections::HashMap;
use std::fmt::Display;

use crate::RafDataGeneration;

/// A white-balance slot: a fixed illuminant preset, one of the numbered
/// custom slots, or the as-shot reading.
///
/// Slot identity is stable across all block generations even though the
/// storage tag IDs differ between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json_dump", derive(serde::Serialize))]
pub enum Illuminant {
    Auto,
    Daylight,
    Shade,
    FluorescentDaylight,
    FluorescentDayWhite,
    FluorescentWhite,
    FluorescentWarmWhite,
    FluorescentLiving,
    Tungsten,
    Flash,
    AsShot,
    Custom(u8),
}

impl Illuminant {
    /// The numbered custom slots, in storage order. At most 6 exist.
    pub(crate) fn custom(index: u32) -> Self {
        debug_assert!(index < 6);
        Self::Custom(index as u8 + 1)
    }
}

impl Display for Illuminant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Custom(n) => write!(f, "Custom{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// One normalized white-balance reading: R, G (even rows), B, G (odd rows).
///
/// The block stores readings in GRGB order; they are swizzled to RGBG on
/// decode. Double-width records carry two stacked readings which are
/// averaged pairwise with integer truncation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json_dump", derive(serde::Serialize))]
pub struct WbCoeffs(pub [i32; 4]);

impl WbCoeffs {
    /// From one stored GRGB reading.
    pub(crate) fn from_grgb(g1: u16, r: u16, b: u16, g2: u16) -> Self {
        Self([r.into(), g1.into(), b.into(), g2.into()])
    }

    /// From a 3-value reading where one green stands for both.
    pub(crate) fn from_grb(g: u16, r: u16, b: u16) -> Self {
        Self([r.into(), g.into(), b.into(), g.into()])
    }

    pub(crate) fn average(self, other: Self) -> Self {
        let mut out = [0i32; 4];
        for (o, (a, b)) in out.iter_mut().zip(self.0.iter().zip(other.0.iter())) {
            *o = (a + b) / 2;
        }
        Self(out)
    }

    /// Legacy-family reference-illuminant correction; scales R and B only.
    pub(crate) fn corrected(mut self, corr: Option<(f64, f64)>) -> Self {
        if let Some((r_corr, b_corr)) = corr {
            self.0[0] = (self.0[0] as f64 * r_corr) as i32;
            self.0[2] = (self.0[2] as f64 * b_corr) as i32;
        }
        self
    }
}

/// One point of the correlated-color-temperature curve.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "json_dump", derive(serde::Serialize))]
pub struct CctEntry {
    pub kelvin: f32,
    /// RGBG coefficients at this temperature.
    pub rgbg: [f32; 4],
}

/// Per-channel black offsets, RGBG order. Records of 16 bytes carry two
/// interleaved sets; [`Self::channel_black`] averages them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json_dump", derive(serde::Serialize))]
pub struct BlackLevels {
    pub first: [u16; 4],
    pub second: Option<[u16; 4]>,
}

impl BlackLevels {
    pub fn channel_black(&self) -> [u16; 4] {
        match self.second {
            Some(second) => {
                let mut out = [0u16; 4];
                for (o, (a, b)) in out.iter_mut().zip(self.first.iter().zip(second.iter())) {
                    *o = ((u32::from(*a) + u32::from(*b)) / 2) as u16;
                }
                out
            }
            None => self.first,
        }
    }
}

/// Camera identity pulled from the fixed header region of an
/// Adobe-converted private block.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "json_dump", derive(serde::Serialize))]
pub struct CameraIdent {
    /// 12-character serial signature.
    pub serial_signature: String,
    /// 4-character sensor id, embedded in the signature.
    pub sensor_id: String,
    /// Numeric camera id: the trailing decimal digits of the signature.
    pub camera_id: Option<u64>,
    /// Model name, e.g. `X100F`.
    pub model: String,
    /// 4-character firmware-side format version, e.g. `0100`.
    pub raf_version: String,
}

/// Everything the makernote decode produces. Plain data; the color pipeline
/// downstream consumes it as-is.
///
/// White-balance keys are present only if decoded; an absent key means "not
/// available for this shot". The worst outcome of a hostile block is an
/// empty table, never an abort.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "json_dump", derive(serde::Serialize))]
pub struct Makernote {
    pub generation: RafDataGeneration,
    /// `(width, height)` of the raw frame, when a generation supplies them.
    pub raw_dimensions: Option<(u32, u32)>,
    pub white_balance: HashMap<Illuminant, WbCoeffs>,
    /// CCT curve, ordered by the fixed calibration-temperature ladder.
    /// Possibly empty, never partial.
    pub cct: Vec<CctEntry>,
    pub black: Option<BlackLevels>,
    /// Raw exposure bias, in EV.
    pub exposure_shift: Option<f32>,
    /// Relative-exposure compensation, in EV.
    pub brightness_compensation: Option<f32>,
    /// Present for the Adobe-converted dialect only; native files carry the
    /// model in the host EXIF instead.
    pub camera: Option<CameraIdent>,
}

impl Makernote {
    pub fn wb(&self, slot: Illuminant) -> Option<&WbCoeffs> {
        self.white_balance.get(&slot)
    }
}
