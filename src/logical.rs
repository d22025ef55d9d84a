//! AND, OR, XOR, NOT, TEST and the packed bitwise family (PAND, PANDN, POR,
//! PXOR and their PS/PD aliases, PTEST).
use super::*;
use crate::instructions::Instance;

fn logical(o: &mut Outcome, i: &Instance, f: fn(u64, u64) -> u64) -> Result<(), Error> {
    let w = i.width;
    let lhs = w.trunc(o.read(&i.ops[1])?);
    let rhs = w.trunc(o.read(&i.ops[2])?);
    let res = w.trunc(f(lhs, rhs));
    o.write(&i.ops[0], res)?;
    o.barrier(Barrier::Compiler);
    o.flags_logical(res, w);
    Ok(())
}
pub(crate) fn __and(o: &mut Outcome, i: &Instance) -> Result<(), Error> { logical(o, i, |a, b| a & b) }
pub(crate) fn __or(o: &mut Outcome, i: &Instance) -> Result<(), Error> { logical(o, i, |a, b| a | b) }
pub(crate) fn __xor(o: &mut Outcome, i: &Instance) -> Result<(), Error> { logical(o, i, |a, b| a ^ b) }

/// NOT never touches the flags
pub(crate) fn __not(o: &mut Outcome, i: &Instance) -> Result<(), Error> {
    let val = o.read(&i.ops[1])?;
    o.write(&i.ops[0], i.width.trunc(!val))
}

/// TEST sets flags from AND's result without writing it
pub(crate) fn __test(o: &mut Outcome, i: &Instance) -> Result<(), Error> {
    let w = i.width;
    let res = w.trunc(o.read(&i.ops[0])? & o.read(&i.ops[1])?);
    o.flags_logical(res, w);
    Ok(())
}

fn vector_reg(op: &Operand) -> Result<Reg, Error> {
    match op.as_reg() {
        Some(r) if !r.is_gpr() => Ok(r),
        _ => Err(operand_err!("{} is not a vector register", op)),
    }
}

// Packed forms: [dst, src1, src2] over the full register width. All six flags end up clear.
fn packed(o: &mut Outcome, i: &Instance, f: fn(u64, u64) -> u64) -> Result<(), Error> {
    let w = vector_reg(&i.ops[0])?.width();
    let src1 = o.read_lanes(&i.ops[1])?;
    let src2 = o.read_lanes(&i.ops[2])?;
    o.write_lanes(&i.ops[0], src1.zip(src2, f).trunc(w))?;
    o.barrier(Barrier::Compiler);
    for name in FlagName::all() {
        o.set_flag(name, Flag::Clear);
    }
    Ok(())
}
pub(crate) fn __pand(o: &mut Outcome, i: &Instance) -> Result<(), Error> { packed(o, i, |a, b| a & b) }
pub(crate) fn __pandn(o: &mut Outcome, i: &Instance) -> Result<(), Error> { packed(o, i, |a, b| !a & b) }
pub(crate) fn __por(o: &mut Outcome, i: &Instance) -> Result<(), Error> { packed(o, i, |a, b| a | b) }
pub(crate) fn __pxor(o: &mut Outcome, i: &Instance) -> Result<(), Error> { packed(o, i, |a, b| a ^ b) }

/// PTEST/VPTEST: ZF = (src1 & src2) == 0, CF = (!src1 & src2) == 0, the rest cleared
pub(crate) fn __ptest(o: &mut Outcome, i: &Instance) -> Result<(), Error> {
    let w = vector_reg(&i.ops[0])?.width();
    let src1 = o.read_lanes(&i.ops[0])?;
    let src2 = o.read_lanes(&i.ops[1])?;
    o.barrier(Barrier::Compiler);
    let and = src1.zip(src2, |a, b| a & b).trunc(w);
    let andn = src1.zip(src2, |a, b| !a & b).trunc(w);
    o.set_flag(FlagName::CF, Flag::from(andn.is_zero()));
    o.set_flag(FlagName::PF, Flag::Clear);
    o.set_flag(FlagName::AF, Flag::Clear);
    o.set_flag(FlagName::ZF, Flag::from(and.is_zero()));
    o.set_flag(FlagName::SF, Flag::Clear);
    o.set_flag(FlagName::OF, Flag::Clear);
    Ok(())
}
