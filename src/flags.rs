//! Status flags and the flag algebra.
//!
//! Every flag is three-valued: besides clear and set it may be architecturally
//! undefined, in which case the core never pins it to a concrete value.
use crate::width::{Sign, Width};
use std::fmt;

/// Value of a single status flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Flag {
    #[default]
    Clear,
    Set,
    Undefined,
}

impl Flag {
    /// `Some(bool)` for a concrete flag, `None` when undefined
    pub fn value(self) -> Option<bool> {
        match self {
            Flag::Clear => Some(false),
            Flag::Set => Some(true),
            Flag::Undefined => None,
        }
    }
    pub fn is_undefined(self) -> bool { self == Flag::Undefined }
    pub fn short(self) -> char {
        match self {
            Flag::Clear => '0',
            Flag::Set => '1',
            Flag::Undefined => '?',
        }
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Flag {
        if b {
            Flag::Set
        } else {
            Flag::Clear
        }
    }
}

/// The six arithmetic status flags, in RFLAGS bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagName {
    CF = 0,
    PF,
    AF,
    ZF,
    SF,
    OF,
}

/// Metadata about each status flag
pub struct FlagInfo {
    pub flag: FlagName,
    pub mask: u64,
    pub short: &'static str,
    pub name: &'static str,
}

#[rustfmt::skip]
pub static FLAG_TABLE: [FlagInfo; 6] = [
    FlagInfo {flag: FlagName::CF, mask: 0x001, short: "CF", name: "carry"},
    FlagInfo {flag: FlagName::PF, mask: 0x004, short: "PF", name: "parity"},
    FlagInfo {flag: FlagName::AF, mask: 0x010, short: "AF", name: "auxiliary carry"},
    FlagInfo {flag: FlagName::ZF, mask: 0x040, short: "ZF", name: "zero"},
    FlagInfo {flag: FlagName::SF, mask: 0x080, short: "SF", name: "sign"},
    FlagInfo {flag: FlagName::OF, mask: 0x800, short: "OF", name: "overflow"},
];

impl FlagName {
    pub fn info(&self) -> &'static FlagInfo { &FLAG_TABLE[*self as usize] }
    pub fn all() -> impl Iterator<Item = FlagName> { FLAG_TABLE.iter().map(|i| i.flag) }
}

/// The arithmetic flag set. A fresh set has every flag clear.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct Flags {
    bits: [Flag; 6],
}

impl Flags {
    pub fn get(&self, f: FlagName) -> Flag { self.bits[f as usize] }
    pub fn set(&mut self, f: FlagName, val: Flag) { self.bits[f as usize] = val; }
    /// Build a concrete flag set from the low bits of an RFLAGS image.
    pub fn from_rflags(rflags: u64) -> Flags {
        let mut flags = Flags::default();
        for info in &FLAG_TABLE {
            flags.set(info.flag, Flag::from(rflags & info.mask != 0));
        }
        flags
    }
    /// RFLAGS image of the set, or None if any flag is undefined.
    pub fn to_rflags(&self) -> Option<u64> {
        let mut out = 0u64;
        for info in &FLAG_TABLE {
            if self.get(info.flag).value()? {
                out |= info.mask;
            }
        }
        Some(out)
    }
    pub fn undefined(&self) -> Vec<FlagName> { FlagName::all().filter(|f| self.get(*f).is_undefined()).collect() }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, info) in FLAG_TABLE.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, concat!(green!("{}:"), "{}"), info.short, self.get(info.flag).short())?;
        }
        Ok(())
    }
}

/// Operation tag selecting the carry/overflow rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Add,
    Sub,
    Mul,
    Logical,
}

/// Even parity of the low byte
pub fn parity(res: u64) -> bool { (res as u8).count_ones() % 2 == 0 }
pub fn zero(res: u64, w: Width) -> bool { w.trunc(res) == 0 }
pub fn sign(res: u64, w: Width) -> bool { w.is_negative(res) }
/// Carry out of bit 3
pub fn aux_carry(lhs: u64, rhs: u64, res: u64) -> bool { bit!(lhs ^ rhs ^ res, 4) }

/// Carry (borrow for subtraction) of `lhs op rhs == res`, inputs already truncated to `w`.
pub fn carry(tag: Tag, lhs: u64, rhs: u64, res: u64, w: Width) -> bool {
    let (lhs, rhs, res) = (w.trunc(lhs), w.trunc(rhs), w.trunc(res));
    match tag {
        Tag::Add => res < lhs,
        Tag::Sub => lhs < rhs,
        Tag::Mul | Tag::Logical => false,
    }
}

/// Signed overflow of `lhs op rhs == res`.
pub fn overflow(tag: Tag, lhs: u64, rhs: u64, res: u64, w: Width) -> bool {
    match tag {
        Tag::Add => w.is_negative((lhs ^ res) & (rhs ^ res)),
        Tag::Sub => w.is_negative((lhs ^ rhs) & (lhs ^ res)),
        Tag::Mul | Tag::Logical => false,
    }
}

/// Two-stage carry of `a op b op c` as computed by ADC/SBB.
pub fn carry_chain(tag: Tag, a: u64, b: u64, c: u64, w: Width) -> bool {
    let ab = apply(tag, a, b, w);
    let abc = apply(tag, ab, c, w);
    carry(tag, a, b, ab, w) || carry(tag, ab, c, abc, w)
}

/// Wrapping add or subtract at width `w`.
pub fn apply(tag: Tag, lhs: u64, rhs: u64, w: Width) -> u64 {
    match tag {
        Tag::Sub => w.trunc(lhs.wrapping_sub(rhs)),
        _ => w.trunc(lhs.wrapping_add(rhs)),
    }
}

/// True if the full product `wide` does not survive truncation to `w`
/// with the given signedness.
pub fn mul_lost(wide: i128, w: Width, sign: Sign) -> bool {
    let low = (wide as u128 as u64) & w.mask();
    sign.widen(low, w) != wide
}
