//! Multiply and divide: truncating IMUL, the accumulator forms of MUL/IMUL,
//! MULX, and DIV/IDIV with their divide-error faults.
use super::*;
use crate::instructions::Instance;

/// A double-width product split at the operation width
struct Product {
    lo: u64,
    hi: u64,
    /// the product does not fit in `lo` alone
    lost: bool,
}

fn widening_mul(sign: Sign, a: u64, b: u64, w: Width) -> Product {
    let bits = w.bits();
    match sign {
        Sign::Unsigned => {
            let p = (w.trunc(a) as u128) * (w.trunc(b) as u128);
            let hi = (p >> bits) as u64 & w.mask();
            Product { lo: p as u64 & w.mask(), hi, lost: hi != 0 }
        }
        Sign::Signed => {
            let p = (w.sext(a) as i128) * (w.sext(b) as i128);
            Product {
                lo: p as u64 & w.mask(),
                hi: (p >> bits) as u64 & w.mask(),
                lost: flags::mul_lost(p, w, sign),
            }
        }
    }
}

/// IMUL r, r/m and IMUL r, r/m, imm: [dst, src1, src2]
pub(crate) fn __imul(o: &mut Outcome, i: &Instance) -> Result<(), Error> {
    let w = i.width;
    let a = o.read(&i.ops[1])?;
    let b = o.read(&i.ops[2])?;
    let p = widening_mul(i.sign, a, b, w);
    o.write(&i.ops[0], p.lo)?;
    o.barrier(Barrier::Compiler);
    o.flags_mul(p.lost, p.lo, w, i.sign);
    Ok(())
}

/// MUL/IMUL r/m: AX = AL * src for bytes, rDX:rAX = rAX * src otherwise
pub(crate) fn __mul_acc(o: &mut Outcome, i: &Instance) -> Result<(), Error> {
    let w = i.width;
    let src = o.read(&i.ops[0])?;
    let acc = o.read_reg(Gpr::Rax.at(w));
    let p = widening_mul(i.sign, acc, src, w);
    if w == Width::W8 {
        o.write_reg(Gpr::Rax.at(Width::W16), (p.hi << 8) | p.lo);
    } else {
        o.write_reg(Gpr::Rax.at(w), p.lo);
        o.write_reg(Gpr::Rdx.at(w), p.hi);
    }
    o.barrier(Barrier::Compiler);
    o.flags_mul(p.lost, p.lo, w, i.sign);
    Ok(())
}

/// MULX hi, lo, src: unsigned rDX * src, no flags. The high half is written
/// last so it wins when both destinations name the same register.
pub(crate) fn __mulx(o: &mut Outcome, i: &Instance) -> Result<(), Error> {
    let w = i.width;
    let src = o.read(&i.ops[2])?;
    let rdx = o.read_reg(Gpr::Rdx.at(w));
    let p = widening_mul(Sign::Unsigned, rdx, src, w);
    o.write(&i.ops[1], p.lo)?;
    o.write(&i.ops[0], p.hi)?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum DivFault {
    Zero,
    Overflow,
}

/// Divide the double-width value hi:lo by `divisor`, returning (quotient, remainder)
/// truncated to `w`. With `checked` off an out-of-range quotient is truncated.
fn divide(sign: Sign, hi: u64, lo: u64, divisor: u64, w: Width, checked: bool) -> Result<(u64, u64), DivFault> {
    let bits = w.bits();
    let joined = ((w.trunc(hi) as u128) << bits) | w.trunc(lo) as u128;
    if w.trunc(divisor) == 0 {
        return Err(DivFault::Zero);
    }
    let (q, r) = match sign {
        Sign::Unsigned => {
            let d = w.trunc(divisor) as u128;
            let q = joined / d;
            if checked && q >> bits != 0 {
                return Err(DivFault::Overflow);
            }
            (q as u64, (joined % d) as u64)
        }
        Sign::Signed => {
            // sign-extend the 2w-bit dividend
            let shift = 128 - 2 * bits;
            let n = ((joined << shift) as i128) >> shift;
            let d = w.sext(divisor) as i128;
            let q = match n.checked_div(d) {
                Some(q) => q,
                None if checked => return Err(DivFault::Overflow),
                None => n.wrapping_div(d),
            };
            let min = -(1i128 << (bits - 1));
            let max = (1i128 << (bits - 1)) - 1;
            if checked && !(min..=max).contains(&q) {
                return Err(DivFault::Overflow);
            }
            (q as u64, n.wrapping_rem(d) as u64)
        }
    };
    Ok((w.trunc(q), w.trunc(r)))
}

/// DIV/IDIV r/m. Faults are raised before anything is written.
pub(crate) fn __div_acc(o: &mut Outcome, i: &Instance) -> Result<(), Error> {
    let w = i.width;
    let divisor = o.read(&i.ops[0])?;
    let (hi, lo) = if w == Width::W8 {
        let ax = o.read_reg(Gpr::Rax.at(Width::W16));
        (ax >> 8, ax & 0xff)
    } else {
        (o.read_reg(Gpr::Rdx.at(w)), o.read_reg(Gpr::Rax.at(w)))
    };
    let (q, r) = match divide(i.sign, hi, lo, divisor, w, o.opts.div_checks()) {
        Ok(qr) => qr,
        Err(DivFault::Zero) => {
            return Err(runtime_err!(ErrorKind::DivideByZero, Some(o.pre), "{}-bit divide by zero", w))
        }
        Err(DivFault::Overflow) => {
            return Err(runtime_err!(
                ErrorKind::DivideOverflow,
                Some(o.pre),
                "{}-bit quotient of {:#x}:{:#x} / {:#x} does not fit",
                w,
                hi,
                lo,
                divisor
            ))
        }
    };
    if w == Width::W8 {
        o.write_reg(Gpr::Rax.at(Width::W8), q);
        o.write_reg(Reg::Gpr(Gpr::Rax, Part::High8), r);
    } else {
        o.write_reg(Gpr::Rax.at(w), q);
        o.write_reg(Gpr::Rdx.at(w), r);
    }
    o.barrier(Barrier::Compiler);
    o.flags_undefined();
    Ok(())
}
