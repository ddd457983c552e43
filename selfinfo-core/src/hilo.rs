use std::fmt;
use std::io;

use byteorder::{ReadBytesExt, LE};
use serde::{Serialize, Serializer};

/// A 64-bit quantity stored as two 32-bit halves.
///
/// On disk the low word comes first, so the pair is a plain little-endian
/// `u64`. The halves are kept separate because the container reports them
/// that way (the info block id is displayed as `hi` then `lo`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HiLo64 {
    pub lo: u32,
    pub hi: u32,
}

impl HiLo64 {
    pub const SIZE: u64 = 8;

    pub fn new(hi: u32, lo: u32) -> Self {
        Self { lo, hi }
    }

    /// `hi << 32 | lo`
    pub fn value(&self) -> u64 {
        (u64::from(self.hi) << 32) | u64::from(self.lo)
    }

    pub fn from_reader<R: io::Read>(r: &mut R) -> io::Result<Self> {
        let lo = r.read_u32::<LE>()?;
        let hi = r.read_u32::<LE>()?;
        Ok(Self { lo, hi })
    }
}

impl From<u64> for HiLo64 {
    fn from(v: u64) -> Self {
        Self {
            lo: v as u32,
            hi: (v >> 32) as u32,
        }
    }
}

impl From<HiLo64> for u64 {
    fn from(v: HiLo64) -> Self {
        v.value()
    }
}

impl fmt::LowerHex for HiLo64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value(), f)
    }
}

impl Serialize for HiLo64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value())
    }
}
