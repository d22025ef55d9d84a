use super::*;
use std::fmt;

/// A memory operand: an already computed effective address and an access width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mem {
    pub addr: u64,
    pub width: Width,
}

/// An instruction operand as delivered by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// register, read only
    Reg(Reg),
    /// register, read-write
    RegW(Reg),
    /// memory, read only
    Mem(Mem),
    /// memory, read-write
    MemW(Mem),
    /// immediate, already extended to the operation width
    Imm(u64, Width),
}

/// Operand kind as listed in a selection-table shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum Kind {
    R,
    RW,
    M,
    MW,
    I,
}

impl Operand {
    pub fn reg(r: Reg) -> Operand { Operand::Reg(r) }
    pub fn reg_w(r: Reg) -> Operand { Operand::RegW(r) }
    pub fn mem(addr: u64, width: Width) -> Operand { Operand::Mem(Mem { addr, width }) }
    pub fn mem_w(addr: u64, width: Width) -> Operand { Operand::MemW(Mem { addr, width }) }
    pub fn imm(val: u64, width: Width) -> Operand { Operand::Imm(width.trunc(val), width) }
    pub fn kind(&self) -> Kind {
        match self {
            Operand::Reg(_) => Kind::R,
            Operand::RegW(_) => Kind::RW,
            Operand::Mem(_) => Kind::M,
            Operand::MemW(_) => Kind::MW,
            Operand::Imm(..) => Kind::I,
        }
    }
    pub fn width(&self) -> Width {
        match self {
            Operand::Reg(r) | Operand::RegW(r) => r.width(),
            Operand::Mem(m) | Operand::MemW(m) => m.width,
            Operand::Imm(_, w) => *w,
        }
    }
    pub fn is_register(&self) -> bool { matches!(self, Operand::Reg(_) | Operand::RegW(_)) }
    pub fn is_writable(&self) -> bool { matches!(self, Operand::RegW(_) | Operand::MemW(_)) }
    /// The register behind a register operand
    pub fn as_reg(&self) -> Option<Reg> {
        match self {
            Operand::Reg(r) | Operand::RegW(r) => Some(*r),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Reg(r) | Operand::RegW(r) => write!(f, "{}", r),
            Operand::Mem(m) | Operand::MemW(m) => write!(f, "m{}[{:#x}]", m.width, m.addr),
            Operand::Imm(v, _) => write!(f, "${:#x}", v),
        }
    }
}

/// Check operands against a shape. Read-only slots accept read-write operands.
pub fn check_shape(shape: &[Kind], ops: &[Operand]) -> Result<(), Error> {
    if shape.len() != ops.len() {
        return Err(operand_err!("expected {} operands, got {}", shape.len(), ops.len()));
    }
    for (i, (want, op)) in shape.iter().zip(ops).enumerate() {
        let ok = match want {
            Kind::R => op.is_register(),
            Kind::M => matches!(op, Operand::Mem(_) | Operand::MemW(_)),
            kind => *kind == op.kind(),
        };
        if !ok {
            return Err(operand_err!("operand {} ({}) does not match {:?}", i, op, want));
        }
    }
    Ok(())
}
