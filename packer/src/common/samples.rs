use std::fmt::Debug;

use half::f16;

use crate::precision::PrecisionMode;

/// Sample storage of a scalar plane or packed image.
#[derive(Clone, Debug, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    F16(Vec<f16>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::F16(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw little-endian bytes of the samples.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Samples::U8(v) => v,
            Samples::F16(v) => bytemuck::cast_slice(v),
        }
    }

    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            Samples::U8(v) => Some(v),
            Samples::F16(_) => None,
        }
    }

    pub fn as_f16(&self) -> Option<&[f16]> {
        match self {
            Samples::F16(v) => Some(v),
            Samples::U8(_) => None,
        }
    }

    pub fn precision(&self) -> PrecisionMode {
        match self {
            Samples::U8(_) => PrecisionMode::Standard,
            Samples::F16(_) => PrecisionMode::HighPrecision,
        }
    }
}

/// Scalar type stored in planes and packed images.
pub trait PlaneSample: bytemuck::Pod + Send + Sync + PartialEq + Debug {
    const ZERO: Self;
    const OPAQUE: Self;

    fn into_samples(samples: Vec<Self>) -> Samples;
}

impl PlaneSample for u8 {
    const ZERO: Self = 0;
    const OPAQUE: Self = u8::MAX;

    fn into_samples(samples: Vec<Self>) -> Samples {
        Samples::U8(samples)
    }
}

impl PlaneSample for f16 {
    const ZERO: Self = f16::ZERO;
    const OPAQUE: Self = f16::ONE;

    fn into_samples(samples: Vec<Self>) -> Samples {
        Samples::F16(samples)
    }
}
