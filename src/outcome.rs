use super::*;
use crate::config::{Options, UndefRead};
use crate::flags::Tag;
use crate::memory::WriteRecord;
use std::fmt;

/// Ordering marker for the downstream optimizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Barrier {
    /// no reordering of the surrounding effects by the compiler
    Compiler,
    /// full store/load fence
    StoreLoad,
}

/// One element of the emitted representation of an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    WriteReg(Reg, Lanes),
    WriteMem(Mem, Lanes),
    Barrier(Barrier),
    SetFlag(FlagName, Flag),
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Effect::WriteReg(r, v) => write!(f, "{} <- {}", r, v),
            Effect::WriteMem(m, v) => write!(f, "m{}[{:#x}] <- {}", m.width, m.addr, v),
            Effect::Barrier(b) => write!(f, concat!(yellow!("barrier"), " {:?}"), b),
            Effect::SetFlag(n, v) => write!(f, "{} <- {}", n.info().short, v.short()),
        }
    }
}

/// The result of evaluating one instruction: a working copy of the registers,
/// memory writes that have not been applied yet, and the ordered effect list.
/// Nothing here touches the machine state until the evaluator commits it.
pub struct Outcome<'a> {
    /// registers before this instruction
    pub pre: Regs,
    /// registers as a result of this instruction
    pub ctx: Regs,
    /// memory as it was before this instruction
    pub mem: &'a Memory,
    /// memory writes, in program order
    pub writes: Vec<WriteRecord>,
    /// all the effects of this instruction, in program order
    pub effects: Vec<Effect>,
    pub opts: &'a Options,
}

impl<'a> Outcome<'a> {
    pub fn new(regs: Regs, mem: &'a Memory, opts: &'a Options) -> Outcome<'a> {
        Outcome {
            pre: regs,
            ctx: regs,
            mem,
            writes: Vec::new(),
            effects: Vec::new(),
            opts,
        }
    }

    //
    // reads
    //
    fn read_mem(&self, m: &Mem) -> Result<Lanes, Error> {
        let mut buf = Vec::with_capacity(m.width.bytes());
        for i in 0..m.width.bytes() as u64 {
            let addr = m.addr.wrapping_add(i);
            let pending = self.writes.iter().rev().find_map(|w| w.byte_at(addr));
            buf.push(match pending {
                Some(b) => b,
                None => self.mem.read_u8(addr)?,
            });
        }
        Ok(Lanes::from_le_bytes(&buf))
    }
    /// Read any operand as lanes, zero-extended.
    pub fn read_lanes(&self, op: &Operand) -> Result<Lanes, Error> {
        match op {
            Operand::Reg(r) | Operand::RegW(r) => Ok(self.ctx.read(*r)),
            Operand::Mem(m) | Operand::MemW(m) => self.read_mem(m),
            Operand::Imm(v, w) => Ok(Lanes::scalar(w.trunc(*v))),
        }
    }
    /// Read a scalar operand (at most 64 bits).
    pub fn read(&self, op: &Operand) -> Result<u64, Error> {
        if !op.width().is_scalar() {
            return Err(operand_err!("{} is not a scalar operand", op));
        }
        Ok(self.read_lanes(op)?.low())
    }
    /// Read an implicit register operand
    pub fn read_reg(&self, reg: Reg) -> u64 { self.ctx.read(reg).low() }
    pub fn flag(&self, name: FlagName) -> Flag { self.ctx.flags.get(name) }
    /// The incoming carry of ADC/SBB, resolved through the undefined-read policy.
    pub fn carry_in(&self) -> Result<bool, Error> {
        match self.flag(FlagName::CF).value() {
            Some(b) => Ok(b),
            None => match self.opts.undef_read {
                UndefRead::Error => Err(runtime_err!(
                    ErrorKind::UndefinedFlag,
                    Some(self.pre),
                    "instruction reads CF while it is undefined"
                )),
                UndefRead::Clear | UndefRead::Set => {
                    let b = self.opts.undef_read == UndefRead::Set;
                    tracing::warn!(value = b, "reading undefined CF");
                    Ok(b)
                }
            },
        }
    }

    //
    // writes
    //
    /// Write to an operand; the value is truncated to the operand width.
    pub fn write_lanes(&mut self, op: &Operand, val: Lanes) -> Result<(), Error> {
        match op {
            Operand::RegW(r) => {
                self.write_reg_lanes(*r, val);
                Ok(())
            }
            Operand::MemW(m) => {
                if !self.mem.is_mapped(m.addr, m.width.bytes()) {
                    return Err(memory_err!("write of {} bytes to unmapped address {:#x}", m.width.bytes(), m.addr));
                }
                let val = val.trunc(m.width);
                self.writes.push(WriteRecord { addr: m.addr, width: m.width, val });
                self.effects.push(Effect::WriteMem(*m, val));
                Ok(())
            }
            _ => Err(operand_err!("cannot write to read-only operand {}", op)),
        }
    }
    pub fn write(&mut self, op: &Operand, val: u64) -> Result<(), Error> { self.write_lanes(op, Lanes::scalar(val)) }
    fn write_reg_lanes(&mut self, reg: Reg, val: Lanes) {
        let val = val.trunc(reg.width());
        self.ctx.write(reg, val);
        self.effects.push(Effect::WriteReg(reg, val));
    }
    /// Write an implicit register operand
    pub fn write_reg(&mut self, reg: Reg, val: u64) { self.write_reg_lanes(reg, Lanes::scalar(val)) }
    pub fn barrier(&mut self, b: Barrier) { self.effects.push(Effect::Barrier(b)); }
    pub fn set_flag(&mut self, name: FlagName, val: Flag) {
        self.ctx.flags.set(name, val);
        self.effects.push(Effect::SetFlag(name, val));
    }

    //
    // flag recipes
    //
    /// Full add/sub recipe with an explicit carry (ADD/SUB/CMP/ADC/SBB/XADD).
    pub fn flags_arith(&mut self, cf: bool, tag: Tag, lhs: u64, rhs: u64, res: u64, w: Width) {
        self.set_flag(FlagName::CF, Flag::from(cf));
        self.flags_inc_dec(tag, lhs, rhs, res, w);
    }
    /// Every arithmetic flag except CF (INC/DEC/NEG).
    pub fn flags_inc_dec(&mut self, tag: Tag, lhs: u64, rhs: u64, res: u64, w: Width) {
        self.set_flag(FlagName::PF, Flag::from(flags::parity(res)));
        self.set_flag(FlagName::AF, Flag::from(flags::aux_carry(lhs, rhs, res)));
        self.set_flag(FlagName::ZF, Flag::from(flags::zero(res, w)));
        self.set_flag(FlagName::SF, Flag::from(flags::sign(res, w)));
        self.set_flag(FlagName::OF, Flag::from(flags::overflow(tag, lhs, rhs, res, w)));
    }
    /// CF=OF=lost; SF from the truncated result for signed multiplies only.
    pub fn flags_mul(&mut self, lost: bool, res: u64, w: Width, sign: Sign) {
        let sf = match sign {
            Sign::Signed => Flag::from(flags::sign(res, w)),
            Sign::Unsigned => Flag::Undefined,
        };
        self.set_flag(FlagName::CF, Flag::from(lost));
        self.set_flag(FlagName::PF, Flag::Undefined);
        self.set_flag(FlagName::AF, Flag::Undefined);
        self.set_flag(FlagName::ZF, Flag::Undefined);
        self.set_flag(FlagName::SF, sf);
        self.set_flag(FlagName::OF, Flag::from(lost));
    }
    pub fn flags_logical(&mut self, res: u64, w: Width) {
        self.set_flag(FlagName::CF, Flag::Clear);
        self.set_flag(FlagName::PF, Flag::from(flags::parity(res)));
        self.set_flag(FlagName::AF, Flag::Undefined);
        self.set_flag(FlagName::ZF, Flag::from(flags::zero(res, w)));
        self.set_flag(FlagName::SF, Flag::from(flags::sign(res, w)));
        self.set_flag(FlagName::OF, Flag::Clear);
    }
    /// Every arithmetic flag becomes undefined.
    pub fn flags_undefined(&mut self) {
        for name in FlagName::all() {
            self.set_flag(name, Flag::Undefined);
        }
    }
}
