use crate::common::samples::PlaneSample;

/// One of the four logical channels of a packed image.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ChannelSlot {
    R = 0,
    G = 1,
    B = 2,
    A = 3,
}

impl ChannelSlot {
    /// All slots in logical interleave order.
    pub const ALL: [ChannelSlot; 4] = [ChannelSlot::R, ChannelSlot::G, ChannelSlot::B, ChannelSlot::A];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Fill value for a slot without input: zero for color, opaque for alpha.
    pub fn default_sample<S: PlaneSample>(self) -> S {
        match self {
            ChannelSlot::A => S::OPAQUE,
            _ => S::ZERO,
        }
    }
}

impl std::fmt::Display for ChannelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelSlot::R => write!(f, "R"),
            ChannelSlot::G => write!(f, "G"),
            ChannelSlot::B => write!(f, "B"),
            ChannelSlot::A => write!(f, "A"),
        }
    }
}
