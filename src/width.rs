use std::fmt;

/// Operand width. Scalar operations use W8..W64; packed operations use W64 (MMX), W128 and W256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
    W128,
    W256,
}

impl Width {
    pub fn bits(self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
            Width::W64 => 64,
            Width::W128 => 128,
            Width::W256 => 256,
        }
    }
    pub fn bytes(self) -> usize { self.bits() as usize / 8 }
    pub fn from_bits(bits: u32) -> Option<Width> {
        match bits {
            8 => Some(Width::W8),
            16 => Some(Width::W16),
            32 => Some(Width::W32),
            64 => Some(Width::W64),
            128 => Some(Width::W128),
            256 => Some(Width::W256),
            _ => None,
        }
    }
    pub fn is_scalar(self) -> bool { self <= Width::W64 }
    /// Mask of the low `bits()` bits. Vector widths saturate to all-ones.
    pub fn mask(self) -> u64 {
        match self {
            Width::W8 => 0xff,
            Width::W16 => 0xffff,
            Width::W32 => 0xffff_ffff,
            _ => u64::MAX,
        }
    }
    pub fn sign_bit(self) -> u64 { 1u64 << (self.bits().min(64) - 1) }
    pub fn trunc(self, val: u64) -> u64 { val & self.mask() }
    pub fn is_negative(self, val: u64) -> bool { val & self.sign_bit() != 0 }
    /// Sign-extend the low `bits()` of `val` to 64 bits.
    pub fn sext(self, val: u64) -> i64 {
        let shift = 64 - self.bits().min(64);
        ((val << shift) as i64) >> shift
    }
    /// Mask applied to shift counts
    pub fn count_mask(self) -> u64 {
        if self == Width::W64 {
            0x3f
        } else {
            0x1f
        }
    }
    /// The width with twice as many bits, as used by widening multiply and divide.
    pub fn double(self) -> Option<Width> { Width::from_bits(self.bits() * 2) }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.bits()) }
}

/// Signedness strategy of an instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Unsigned,
    Signed,
}

impl Sign {
    /// Interpret the low `w` bits of `val` with this signedness.
    pub fn widen(self, val: u64, w: Width) -> i128 {
        match self {
            Sign::Unsigned => w.trunc(val) as i128,
            Sign::Signed => w.sext(val) as i128,
        }
    }
}

/// Up to 256 bits of register or memory contents, least significant quadword first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lanes(pub [u64; 4]);

impl Lanes {
    pub fn scalar(val: u64) -> Lanes { Lanes([val, 0, 0, 0]) }
    pub fn low(&self) -> u64 { self.0[0] }
    fn quads(w: Width) -> usize { (w.bits() as usize).div_ceil(64) }
    /// Keep only the low `w` bits.
    pub fn trunc(self, w: Width) -> Lanes {
        let mut out = Lanes::default();
        let n = Lanes::quads(w);
        out.0[..n].copy_from_slice(&self.0[..n]);
        out.0[0] &= w.mask();
        out
    }
    pub fn zip(self, other: Lanes, f: impl Fn(u64, u64) -> u64) -> Lanes {
        let mut out = Lanes::default();
        for i in 0..4 {
            out.0[i] = f(self.0[i], other.0[i]);
        }
        out
    }
    pub fn is_zero(&self) -> bool { self.0.iter().all(|q| *q == 0) }
    pub fn from_le_bytes(bytes: &[u8]) -> Lanes {
        let mut out = Lanes::default();
        for (i, b) in bytes.iter().take(32).enumerate() {
            out.0[i / 8] |= (*b as u64) << ((i % 8) * 8);
        }
        out
    }
    pub fn to_le_bytes(&self, w: Width) -> Vec<u8> {
        (0..w.bytes()).map(|i| (self.0[i / 8] >> ((i % 8) * 8)) as u8).collect()
    }
}

impl fmt::Display for Lanes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0[1..].iter().all(|q| *q == 0) {
            write!(f, "{:x}", self.0[0])
        } else {
            write!(f, "{:016x}_{:016x}_{:016x}_{:016x}", self.0[3], self.0[2], self.0[1], self.0[0])
        }
    }
}
