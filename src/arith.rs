//! ADD, SUB, CMP, INC, DEC, NEG, ADC and SBB.
//!
//! All of these operate at the instantiation width; destination handles may be
//! wider, in which case the register write policy decides what happens to the
//! upper bits.
use super::*;
use crate::flags::Tag;
use crate::instructions::Instance;

fn binary(o: &mut Outcome, i: &Instance, tag: Tag, write: bool) -> Result<(), Error> {
    let w = i.width;
    let lhs = w.trunc(o.read(&i.ops[write as usize])?);
    let rhs = w.trunc(o.read(&i.ops[write as usize + 1])?);
    let res = flags::apply(tag, lhs, rhs, w);
    if write {
        o.write(&i.ops[0], res)?;
    }
    o.barrier(Barrier::Compiler);
    o.flags_arith(flags::carry(tag, lhs, rhs, res, w), tag, lhs, rhs, res, w);
    Ok(())
}
// Read-write forms list the destination twice: [dst, src1, src2], src1 being the
// same location as dst. CMP has no destination.
pub(crate) fn __add(o: &mut Outcome, i: &Instance) -> Result<(), Error> { binary(o, i, Tag::Add, true) }
pub(crate) fn __sub(o: &mut Outcome, i: &Instance) -> Result<(), Error> { binary(o, i, Tag::Sub, true) }
pub(crate) fn __cmp(o: &mut Outcome, i: &Instance) -> Result<(), Error> { binary(o, i, Tag::Sub, false) }

fn step(o: &mut Outcome, i: &Instance, tag: Tag) -> Result<(), Error> {
    let w = i.width;
    let val = w.trunc(o.read(&i.ops[1])?);
    let res = flags::apply(tag, val, 1, w);
    o.write(&i.ops[0], res)?;
    o.barrier(Barrier::Compiler);
    o.flags_inc_dec(tag, val, 1, res, w);
    Ok(())
}
pub(crate) fn __inc(o: &mut Outcome, i: &Instance) -> Result<(), Error> { step(o, i, Tag::Add) }
pub(crate) fn __dec(o: &mut Outcome, i: &Instance) -> Result<(), Error> { step(o, i, Tag::Sub) }

pub(crate) fn __neg(o: &mut Outcome, i: &Instance) -> Result<(), Error> {
    let w = i.width;
    let val = w.trunc(o.read(&i.ops[1])?);
    let res = flags::apply(Tag::Sub, 0, val, w);
    o.write(&i.ops[0], res)?;
    o.barrier(Barrier::Compiler);
    o.flags_arith(val != 0, Tag::Sub, 0, val, res, w);
    Ok(())
}

fn with_carry(o: &mut Outcome, i: &Instance, tag: Tag) -> Result<(), Error> {
    let w = i.width;
    let lhs = w.trunc(o.read(&i.ops[1])?);
    let rhs = w.trunc(o.read(&i.ops[2])?);
    let carry = o.carry_in()? as u64;
    let res = flags::apply(tag, flags::apply(tag, lhs, rhs, w), carry, w);
    o.write(&i.ops[0], res)?;
    o.barrier(Barrier::Compiler);
    let cf = flags::carry_chain(tag, lhs, rhs, carry, w);
    o.flags_arith(cf, tag, lhs, rhs, res, w);
    Ok(())
}
pub(crate) fn __adc(o: &mut Outcome, i: &Instance) -> Result<(), Error> { with_carry(o, i, Tag::Add) }
pub(crate) fn __sbb(o: &mut Outcome, i: &Instance) -> Result<(), Error> { with_carry(o, i, Tag::Sub) }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::*;
    use proptest::prelude::*;

    #[test]
    fn add_byte_wraps_to_zero() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.regs.set(Gpr::Rax, 0xff);
        core.exec("ADD_AL_IMMb_8", &[rw(Gpr::Rax, W8), r(Gpr::Rax, W8), imm(1, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rax), 0);
        assert_flags(&core, "CF=1 PF=1 AF=1 ZF=1 SF=0 OF=0");
        Ok(())
    }
    #[test]
    fn add_writes_then_fences_then_flags() -> Result<(), Error> {
        let mut core = Core::new();
        let fx = core.exec("ADD_GPRv_GPRv_01_32", &[rw(Gpr::Rcx, W32), r(Gpr::Rcx, W32), r(Gpr::Rdx, W32)])?;
        assert!(matches!(fx[0], Effect::WriteReg(..)));
        assert_eq!(fx[1], Effect::Barrier(Barrier::Compiler));
        assert!(fx[2..].iter().all(|e| matches!(e, Effect::SetFlag(..))));
        assert_eq!(fx.len(), 8);
        Ok(())
    }
    #[test]
    fn dword_add_zero_extends_destination() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.regs.set(Gpr::Rbx, 0xffff_ffff_0000_0001);
        core.exec("ADD_GPRv_IMMz_32", &[rw(Gpr::Rbx, W32), r(Gpr::Rbx, W32), imm(2, W32)])?;
        assert_eq!(core.state.regs.get(Gpr::Rbx), 3);
        Ok(())
    }
    #[test]
    fn cmp_does_not_write() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.regs.set(Gpr::Rax, 5);
        let fx = core.exec("CMP_GPRv_IMMz_64", &[r(Gpr::Rax, W64), imm(7, W64)])?;
        assert_eq!(core.state.regs.get(Gpr::Rax), 5);
        assert!(!fx.iter().any(|e| matches!(e, Effect::WriteReg(..) | Effect::WriteMem(..))));
        assert_flags(&core, "CF=1 ZF=0 SF=1 OF=0");
        Ok(())
    }
    #[test]
    fn sub_memory_destination() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.mem.load(0x2000, &[0x00, 0x80]);
        core.exec("SUB_MEMv_IMMb_16", &[mw(0x2000, W16), m(0x2000, W16), imm(1, W16)])?;
        assert_eq!(core.state.mem.read(0x2000, W16)?.low(), 0x7fff);
        assert_flags(&core, "CF=0 OF=1 SF=0 AF=1");
        Ok(())
    }
    #[test]
    fn inc_dec_leave_carry_alone() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.regs.flags.set(FlagName::CF, Flag::Undefined);
        core.state.regs.set(Gpr::Rsi, 0x7f);
        core.exec("INC_GPR8_8", &[rw(Gpr::Rsi, W8), r(Gpr::Rsi, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rsi), 0x80);
        assert_flags(&core, "CF=? OF=1 SF=1 ZF=0");
        core.exec("DEC_GPRv_FFr1_64", &[rw(Gpr::Rdi, W64), r(Gpr::Rdi, W64)])?;
        assert_eq!(core.state.regs.get(Gpr::Rdi), u64::MAX);
        assert_flags(&core, "CF=? OF=0 SF=1 AF=1");
        Ok(())
    }
    #[test]
    fn neg_carry_is_nonzero_source() -> Result<(), Error> {
        let mut core = Core::new();
        for x in 0..=0xffu64 {
            core.state.regs.set(Gpr::Rdx, x);
            core.exec("NEG_GPR8_8", &[rw(Gpr::Rdx, W8), r(Gpr::Rdx, W8)])?;
            assert_eq!(core.state.regs.flags.get(FlagName::CF), Flag::from(x != 0));
            assert_eq!(core.state.regs.get(Gpr::Rdx), x.wrapping_neg() & 0xff);
            assert_eq!(core.state.regs.flags.get(FlagName::OF), Flag::from(x == 0x80));
        }
        Ok(())
    }
    #[test]
    fn adc_carry_chain() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.regs.flags.set(FlagName::CF, Flag::Set);
        core.state.regs.set(Gpr::Rbx, 0xff);
        core.exec("ADC_GPR8_GPR8_10_8", &[rw(Gpr::Rax, W8), r(Gpr::Rax, W8), r(Gpr::Rbx, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rax), 0);
        assert_flags(&core, "CF=1 ZF=1");
        Ok(())
    }
    #[test]
    fn sbb_borrows_through_carry() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.regs.flags.set(FlagName::CF, Flag::Set);
        core.state.regs.set(Gpr::Rax, 5);
        core.state.regs.set(Gpr::Rcx, 5);
        core.exec("SBB_GPRv_GPRv_19_16", &[rw(Gpr::Rax, W16), r(Gpr::Rax, W16), r(Gpr::Rcx, W16)])?;
        assert_eq!(core.state.regs.get(Gpr::Rax), 0xffff);
        assert_flags(&core, "CF=1 ZF=0 SF=1 OF=0");
        Ok(())
    }
    #[test]
    fn adc_after_wide_shift_reads_carry_as_clear() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.regs.set(Gpr::Rax, 0x81);
        core.state.regs.set(Gpr::Rbx, 0x01);
        core.exec("SHL_GPR8_IMMb_C0r4_8", &[rw(Gpr::Rax, W8), r(Gpr::Rax, W8), imm(9, W8)])?;
        assert_flags(&core, "CF=?");
        core.exec("ADC_GPR8_GPR8_10_8", &[rw(Gpr::Rax, W8), r(Gpr::Rax, W8), r(Gpr::Rbx, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rax), 0x01);
        assert_flags(&core, "CF=0 ZF=0");
        Ok(())
    }
    #[test]
    fn strict_policy_refuses_undefined_carry() -> Result<(), Error> {
        let mut opts = Options::default();
        opts.undef_read = UndefRead::Error;
        let mut core = Core::with_options(opts)?;
        core.state.regs.flags.set(FlagName::CF, Flag::Undefined);
        let before = core.state.clone();
        let e = core.exec("SBB_GPR8_GPR8_18_8", &[rw(Gpr::Rax, W8), r(Gpr::Rax, W8), r(Gpr::Rbx, W8)]).unwrap_err();
        assert_eq!(e.kind, ErrorKind::UndefinedFlag);
        assert_eq!(core.state, before);
        Ok(())
    }

    fn run(iform: &str, w: Width, a: u64, b: u64, cf: bool) -> Result<Regs, Error> {
        let mut core = Core::new();
        core.state.regs.set(Gpr::Rax, a);
        core.state.regs.set(Gpr::Rcx, b);
        core.state.regs.flags.set(FlagName::CF, Flag::from(cf));
        core.exec(iform, &[rw(Gpr::Rax, w), r(Gpr::Rax, w), r(Gpr::Rcx, w)])?;
        Ok(core.state.regs)
    }
    fn width_of(i: usize) -> (Width, &'static str, &'static str, &'static str) {
        match i {
            0 => (W8, "ADD_GPR8_GPR8_00_8", "SUB_GPR8_GPR8_28_8", "ADC_GPR8_GPR8_10_8"),
            1 => (W16, "ADD_GPRv_GPRv_01_16", "SUB_GPRv_GPRv_29_16", "ADC_GPRv_GPRv_11_16"),
            2 => (W32, "ADD_GPRv_GPRv_01_32", "SUB_GPRv_GPRv_29_32", "ADC_GPRv_GPRv_11_32"),
            _ => (W64, "ADD_GPRv_GPRv_01_64", "SUB_GPRv_GPRv_29_64", "ADC_GPRv_GPRv_11_64"),
        }
    }

    proptest! {
        #[test]
        fn add_sub_match_wide_arithmetic(a in any::<u64>(), b in any::<u64>(), i in 0usize..4) {
            let (w, add, sub, _) = width_of(i);
            let (a, b) = (w.trunc(a), w.trunc(b));
            let (ua, ub) = (a as u128, b as u128);
            let (sa, sb) = (w.sext(a) as i128, w.sext(b) as i128);
            let min = -(1i128 << (w.bits() - 1));
            let max = (1i128 << (w.bits() - 1)) - 1;

            let regs = run(add, w, a, b, false).unwrap();
            prop_assert_eq!(regs.get(Gpr::Rax) & w.mask(), w.trunc((ua + ub) as u64));
            prop_assert_eq!(regs.flags.get(FlagName::CF), Flag::from((ua + ub) >> w.bits() != 0));
            prop_assert_eq!(regs.flags.get(FlagName::OF), Flag::from(!(min..=max).contains(&(sa + sb))));

            let regs = run(sub, w, a, b, false).unwrap();
            prop_assert_eq!(regs.flags.get(FlagName::CF), Flag::from(ua < ub));
            prop_assert_eq!(regs.flags.get(FlagName::OF), Flag::from(!(min..=max).contains(&(sa - sb))));
        }

        #[test]
        fn adc_with_carry_is_adc_of_successor(a in any::<u64>(), b in any::<u64>(), i in 0usize..4) {
            let (w, _, _, adc) = width_of(i);
            let (a, b) = (w.trunc(a), w.trunc(b));
            prop_assume!(b != w.mask());
            let with = run(adc, w, a, b, true).unwrap();
            let without = run(adc, w, a, b + 1, false).unwrap();
            prop_assert_eq!(with.get(Gpr::Rax), without.get(Gpr::Rax));
            for f in [FlagName::CF, FlagName::ZF, FlagName::SF, FlagName::PF] {
                prop_assert_eq!(with.flags.get(f), without.flags.get(f));
            }
        }
    }
}
