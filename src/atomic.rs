//! XADD. Operands are [dst, src1, exchange, src2]: dst/src1 name the first
//! operand (register or memory), exchange/src2 the register operand.
use super::*;
use crate::flags::Tag;
use crate::instructions::Instance;

/// XADD is a full barrier. Memory forms get their atomic bracketing from the
/// lifter, so only the register form emits an explicit store/load fence.
pub(crate) fn __xadd(o: &mut Outcome, i: &Instance) -> Result<(), Error> {
    let w = i.width;
    if i.ops[0].is_register() {
        o.barrier(Barrier::StoreLoad);
    }
    let src1 = w.trunc(o.read(&i.ops[1])?);
    let src2 = w.trunc(o.read(&i.ops[3])?);
    let res = flags::apply(Tag::Add, src1, src2, w);
    o.write(&i.ops[0], res)?;
    o.barrier(Barrier::Compiler);
    o.write(&i.ops[2], src1)?;
    o.barrier(Barrier::Compiler);
    o.flags_arith(flags::carry(Tag::Add, src1, src2, res, w), Tag::Add, src1, src2, res, w);
    Ok(())
}
