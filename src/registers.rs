//! x86-64 register file: general purpose registers with their overlapping views,
//! MMX and XMM/YMM vector registers, and the arithmetic flags.
use crate::flags::Flags;
use crate::width::{Lanes, Width};
use std::fmt;

/// General purpose registers, in encoding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gpr {
    Rax = 0,
    Rcx,
    Rdx,
    Rbx,
    Rsp,
    Rbp,
    Rsi,
    Rdi,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}
const GPR_NAMES: &[&str] = &[
    "rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi", "r8", "r9", "r10", "r11", "r12", "r13", "r14", "r15",
];

impl Gpr {
    pub fn to_str(self) -> &'static str { GPR_NAMES[self as usize] }
    /// The low `w` bits of this register (AL, AX, EAX, RAX style views).
    pub fn at(self, w: Width) -> Reg {
        let part = match w {
            Width::W8 => Part::Low8,
            Width::W16 => Part::Word,
            Width::W32 => Part::Dword,
            _ => Part::Qword,
        };
        Reg::Gpr(self, part)
    }
    /// AH/CH/DH/BH; only the first four registers have a high-byte view.
    pub fn high(self) -> Option<Reg> {
        match self {
            Gpr::Rax | Gpr::Rcx | Gpr::Rdx | Gpr::Rbx => Some(Reg::Gpr(self, Part::High8)),
            _ => None,
        }
    }
}

/// Which slice of a general purpose register an operand names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Low8,  // bits 7:0
    High8, // bits 15:8
    Word,  // bits 15:0
    Dword, // bits 31:0, writes zero bits 63:32
    Qword, // bits 63:0
}

/// Encoding of an instruction writing an XMM register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enc {
    /// legacy SSE: bits 255:128 of the YMM register are preserved
    Legacy,
    /// VEX: bits 255:128 of the YMM register are zeroed
    Vex,
}

/// A register operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Gpr(Gpr, Part),
    Mmx(u8),
    Xmm(u8, Enc),
    Ymm(u8),
}

impl Reg {
    pub fn width(&self) -> Width {
        match self {
            Reg::Gpr(_, Part::Low8) | Reg::Gpr(_, Part::High8) => Width::W8,
            Reg::Gpr(_, Part::Word) => Width::W16,
            Reg::Gpr(_, Part::Dword) => Width::W32,
            Reg::Gpr(_, Part::Qword) | Reg::Mmx(_) => Width::W64,
            Reg::Xmm(..) => Width::W128,
            Reg::Ymm(_) => Width::W256,
        }
    }
    pub fn is_gpr(&self) -> bool { matches!(self, Reg::Gpr(..)) }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reg::Gpr(g, Part::Qword) => write!(f, "{}", g.to_str()),
            Reg::Gpr(g, part) => write!(f, "{}.{:?}", g.to_str(), part),
            Reg::Mmx(i) => write!(f, "mm{}", i),
            Reg::Xmm(i, _) => write!(f, "xmm{}", i),
            Reg::Ymm(i) => write!(f, "ymm{}", i),
        }
    }
}

/// Storage for the full register file.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Regs {
    pub gpr: [u64; 16],     // general purpose registers, indexed by Gpr
    pub flags: Flags,       // arithmetic status flags
    pub mmx: [u64; 8],      // mm0..mm7
    pub ymm: [[u64; 4]; 16], // ymm0..ymm15, xmm is the low half
}

impl Regs {
    pub fn get(&self, g: Gpr) -> u64 { self.gpr[g as usize] }
    pub fn set(&mut self, g: Gpr, val: u64) { self.gpr[g as usize] = val; }
    /// Read a register operand; the value is zero-extended into the lanes.
    pub fn read(&self, reg: Reg) -> Lanes {
        match reg {
            Reg::Gpr(g, part) => {
                let full = self.get(g);
                Lanes::scalar(match part {
                    Part::Low8 => full & 0xff,
                    Part::High8 => (full >> 8) & 0xff,
                    Part::Word => full & 0xffff,
                    Part::Dword => full & 0xffff_ffff,
                    Part::Qword => full,
                })
            }
            Reg::Mmx(i) => Lanes::scalar(self.mmx[i as usize & 7]),
            Reg::Xmm(i, _) => Lanes(self.ymm[i as usize & 15]).trunc(Width::W128),
            Reg::Ymm(i) => Lanes(self.ymm[i as usize & 15]),
        }
    }
    /// Write a register operand, applying the x86-64 write policy: 8 and 16-bit
    /// writes merge, 32-bit writes zero-extend, legacy XMM writes keep the upper
    /// YMM half and VEX XMM writes clear it.
    pub fn write(&mut self, reg: Reg, val: Lanes) {
        match reg {
            Reg::Gpr(g, part) => {
                let old = self.get(g);
                let v = val.low();
                let new = match part {
                    Part::Low8 => (old & !0xff) | (v & 0xff),
                    Part::High8 => (old & !0xff00) | ((v & 0xff) << 8),
                    Part::Word => (old & !0xffff) | (v & 0xffff),
                    Part::Dword => v & 0xffff_ffff,
                    Part::Qword => v,
                };
                self.set(g, new);
            }
            Reg::Mmx(i) => self.mmx[i as usize & 7] = val.low(),
            Reg::Xmm(i, enc) => {
                let slot = &mut self.ymm[i as usize & 15];
                slot[0] = val.0[0];
                slot[1] = val.0[1];
                if enc == Enc::Vex {
                    slot[2] = 0;
                    slot[3] = 0;
                }
            }
            Reg::Ymm(i) => self.ymm[i as usize & 15] = val.0,
        }
    }
}

impl fmt::Debug for Regs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { <Regs as fmt::Display>::fmt(self, f) }
}
impl fmt::Display for Regs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, name) in GPR_NAMES.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, concat!(blue!("{}:"), "{:x}"), name, self.gpr[i])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_writes_merge() {
        let mut r = Regs::default();
        r.set(Gpr::Rax, 0x1122_3344_5566_7788);
        r.write(Gpr::Rax.at(Width::W8), Lanes::scalar(0xaa));
        assert_eq!(r.get(Gpr::Rax), 0x1122_3344_5566_77aa);
        r.write(Gpr::Rax.high().unwrap(), Lanes::scalar(0xbb));
        assert_eq!(r.get(Gpr::Rax), 0x1122_3344_5566_bbaa);
        r.write(Gpr::Rax.at(Width::W16), Lanes::scalar(0x1_cccc));
        assert_eq!(r.get(Gpr::Rax), 0x1122_3344_5566_cccc);
        assert_eq!(r.read(Gpr::Rax.high().unwrap()).low(), 0xcc);
    }
    #[test]
    fn dword_write_zero_extends() {
        let mut r = Regs::default();
        r.set(Gpr::R9, u64::MAX);
        r.write(Gpr::R9.at(Width::W32), Lanes::scalar(0x8000_0000));
        assert_eq!(r.get(Gpr::R9), 0x8000_0000);
        assert!(Gpr::R9.high().is_none());
    }
    #[test]
    fn xmm_upper_half_by_encoding() {
        let mut r = Regs::default();
        r.write(Reg::Ymm(3), Lanes([1, 2, 3, 4]));
        r.write(Reg::Xmm(3, Enc::Legacy), Lanes([5, 6, 7, 8]));
        assert_eq!(r.read(Reg::Ymm(3)), Lanes([5, 6, 3, 4]));
        r.write(Reg::Xmm(3, Enc::Vex), Lanes([9, 10, 0, 0]));
        assert_eq!(r.read(Reg::Ymm(3)), Lanes([9, 10, 0, 0]));
        assert_eq!(r.read(Reg::Xmm(3, Enc::Legacy)), Lanes([9, 10, 0, 0]));
    }
}
