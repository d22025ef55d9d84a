//! SHL, SHR and SAR. The count is masked to 6 bits for 64-bit operands and to
//! 5 bits otherwise; a masked count of zero is a complete no-op.
use super::*;
use crate::instructions::Instance;

fn finish(o: &mut Outcome, i: &Instance, res: u64, cf: Flag, of: Flag) -> Result<(), Error> {
    let w = i.width;
    o.write(&i.ops[0], res)?;
    o.barrier(Barrier::Compiler);
    o.set_flag(FlagName::CF, cf);
    o.set_flag(FlagName::PF, Flag::from(flags::parity(res)));
    o.set_flag(FlagName::AF, Flag::Undefined);
    o.set_flag(FlagName::ZF, Flag::from(flags::zero(res, w)));
    o.set_flag(FlagName::SF, Flag::from(flags::sign(res, w)));
    o.set_flag(FlagName::OF, of);
    Ok(())
}

fn operands(o: &Outcome, i: &Instance) -> Result<(u64, u64), Error> {
    let w = i.width;
    let val = w.trunc(o.read(&i.ops[1])?);
    let count = o.read(&i.ops[2])? & w.count_mask();
    Ok((val, count))
}

pub(crate) fn __shl(o: &mut Outcome, i: &Instance) -> Result<(), Error> {
    let w = i.width;
    let (val, count) = operands(o, i)?;
    if count == 0 {
        return Ok(());
    }
    let (res, cf, of) = if count == 1 {
        let res = w.trunc(val << 1);
        let msb = w.is_negative(val);
        (res, Flag::from(msb), Flag::from(xor!(msb, w.is_negative(res))))
    } else if count < w.bits() as u64 {
        let partial = w.trunc(val << (count - 1));
        (w.trunc(partial << 1), Flag::from(w.is_negative(partial)), Flag::Undefined)
    } else {
        (0, Flag::Undefined, Flag::Undefined)
    };
    finish(o, i, res, cf, of)
}

/// SHR for unsigned instantiations, SAR for signed ones
pub(crate) fn __shr(o: &mut Outcome, i: &Instance) -> Result<(), Error> {
    let w = i.width;
    let (val, count) = operands(o, i)?;
    if count == 0 {
        return Ok(());
    }
    let shr = |n: u64| -> u64 {
        match i.sign {
            Sign::Unsigned => val >> n,
            Sign::Signed => w.trunc((w.sext(val) >> n) as u64),
        }
    };
    let (res, cf, of) = if count == 1 {
        let of = match i.sign {
            Sign::Unsigned => w.is_negative(val),
            Sign::Signed => false,
        };
        (shr(1), Flag::from(bit!(val, 0)), Flag::from(of))
    } else if count < w.bits() as u64 {
        let partial = shr(count - 1);
        (shr(count), Flag::from(bit!(partial, 0)), Flag::Undefined)
    } else {
        let fill = match i.sign {
            Sign::Signed if w.is_negative(val) => w.mask(),
            _ => 0,
        };
        (fill, Flag::Undefined, Flag::Undefined)
    };
    finish(o, i, res, cf, of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::*;
    use proptest::prelude::*;

    #[test]
    fn sar_byte_past_width() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.regs.set(Gpr::Rax, 0x80);
        core.exec("SAR_GPR8_IMMb_8", &[rw(Gpr::Rax, W8), r(Gpr::Rax, W8), imm(9, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rax), 0xff);
        assert_flags(&core, "CF=? OF=? AF=? SF=1 ZF=0 PF=1");
        core.state.regs.set(Gpr::Rax, 0x40);
        core.exec("SAR_GPR8_IMMb_8", &[rw(Gpr::Rax, W8), r(Gpr::Rax, W8), imm(31, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rax), 0);
        Ok(())
    }
    #[test]
    fn zero_count_is_a_no_op() -> Result<(), Error> {
        for (iform, w, count) in [
            ("SHL_GPRv_IMMb_C1r4_32", W32, 32u64),
            ("SHR_GPRv_CL_64", W64, 64),
            ("SAR_GPR8_CL_8", W8, 0xe0),
            ("SHL_GPR8_IMMb_C0r6_8", W8, 0),
        ] {
            let mut core = Core::new();
            core.state.regs.set(Gpr::Rax, 0x1234_5678_9abc_def0);
            core.state.regs.set(Gpr::Rcx, count);
            core.state.regs.flags = Flags::from_rflags(0x8d5);
            core.state.regs.flags.set(FlagName::AF, Flag::Undefined);
            let before = core.state.clone();
            let count_op = if iform.contains("_CL_") { r(Gpr::Rcx, W8) } else { imm(count, W8) };
            let fx = core.exec(iform, &[rw(Gpr::Rax, w), r(Gpr::Rax, w), count_op])?;
            assert!(fx.is_empty(), "{}", iform);
            assert_eq!(core.state, before, "{}", iform);
        }
        Ok(())
    }
    #[test]
    fn shift_by_one_overflow() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.regs.set(Gpr::Rbx, 0x40);
        core.exec("SHL_GPR8_ONE_D0r4_8", &[rw(Gpr::Rbx, W8), r(Gpr::Rbx, W8), imm(1, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rbx), 0x80);
        assert_flags(&core, "CF=0 OF=1 SF=1");
        core.exec("SHL_GPR8_ONE_D0r4_8", &[rw(Gpr::Rbx, W8), r(Gpr::Rbx, W8), imm(1, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rbx), 0);
        assert_flags(&core, "CF=1 OF=1 ZF=1");

        core.state.regs.set(Gpr::Rbx, 0x8001);
        core.exec("SHR_GPRv_ONE_16", &[rw(Gpr::Rbx, W16), r(Gpr::Rbx, W16), imm(1, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rbx), 0x4000);
        assert_flags(&core, "CF=1 OF=1 SF=0");

        core.state.regs.set(Gpr::Rbx, 0x8001);
        core.exec("SAR_GPRv_ONE_16", &[rw(Gpr::Rbx, W16), r(Gpr::Rbx, W16), imm(1, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rbx), 0xc000);
        assert_flags(&core, "CF=1 OF=0 SF=1");
        Ok(())
    }
    #[test]
    fn multi_bit_shifts() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.regs.set(Gpr::Rdx, 0x0000_0000_f000_0001);
        core.state.regs.set(Gpr::Rcx, 4);
        core.exec("SHL_GPRv_CL_D3r4_32", &[rw(Gpr::Rdx, W32), r(Gpr::Rdx, W32), r(Gpr::Rcx, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rdx), 0x10);
        assert_flags(&core, "CF=1 OF=? ZF=0");

        core.state.regs.set(Gpr::Rdx, 0x8000_0000_0000_0010);
        core.exec("SHR_GPRv_IMMb_64", &[rw(Gpr::Rdx, W64), r(Gpr::Rdx, W64), imm(5, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rdx), 0x0400_0000_0000_0000);
        assert_flags(&core, "CF=1 OF=? SF=0");

        core.state.regs.set(Gpr::Rdx, 0x8000_0000_0000_0000);
        core.exec("SAR_GPRv_IMMb_64", &[rw(Gpr::Rdx, W64), r(Gpr::Rdx, W64), imm(63, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rdx), u64::MAX);
        assert_flags(&core, "CF=0 SF=1");
        Ok(())
    }
    #[test]
    fn count_is_masked() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.regs.set(Gpr::Rsi, 1);
        // 33 & 0x1f == 1
        core.exec("SHL_GPRv_IMMb_C1r4_32", &[rw(Gpr::Rsi, W32), r(Gpr::Rsi, W32), imm(33, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rsi), 2);
        // 16-bit operands keep counts up to 31, shifting everything out
        core.exec("SHL_GPRv_IMMb_C1r4_16", &[rw(Gpr::Rsi, W16), r(Gpr::Rsi, W16), imm(17, W8)])?;
        assert_eq!(core.state.regs.get(Gpr::Rsi), 0);
        assert_flags(&core, "CF=? OF=? ZF=1");
        Ok(())
    }
    #[test]
    fn shift_memory_operand() -> Result<(), Error> {
        let mut core = Core::new();
        core.state.mem.load(0x500, &[0x81]);
        core.exec("SHR_MEMb_ONE_8", &[mw(0x500, W8), m(0x500, W8), imm(1, W8)])?;
        assert_eq!(core.state.mem.read_u8(0x500)?, 0x40);
        assert_flags(&core, "CF=1 OF=1");
        Ok(())
    }

    fn cl_form(op: usize, w: Width) -> &'static str {
        match (op, w) {
            (0, W8) => "SHL_GPR8_CL_D2r4_8",
            (0, W16) => "SHL_GPRv_CL_D3r4_16",
            (0, W32) => "SHL_GPRv_CL_D3r4_32",
            (0, _) => "SHL_GPRv_CL_D3r4_64",
            (1, W8) => "SHR_GPR8_CL_8",
            (1, W16) => "SHR_GPRv_CL_16",
            (1, W32) => "SHR_GPRv_CL_32",
            (1, _) => "SHR_GPRv_CL_64",
            (_, W8) => "SAR_GPR8_CL_8",
            (_, W16) => "SAR_GPRv_CL_16",
            (_, W32) => "SAR_GPRv_CL_32",
            (_, _) => "SAR_GPRv_CL_64",
        }
    }

    proptest! {
        #[test]
        fn masked_zero_count_keeps_any_state(
            op in 0usize..3,
            w in prop_oneof![Just(W8), Just(W16), Just(W32), Just(W64)],
            val in any::<u64>(),
            k in 0u64..8,
            rflags in 0u64..0x1000,
            undef in 0u64..0x1000,
        ) {
            let iform = cl_form(op, w);
            let count = (k * (w.count_mask() + 1)) & 0xff;
            let mut core = Core::new();
            core.state.regs.set(Gpr::Rax, val);
            core.state.regs.set(Gpr::Rcx, count);
            core.state.regs.flags = flags_image(rflags, undef);
            let before = core.state.clone();
            let fx = core.exec(iform, &[rw(Gpr::Rax, w), r(Gpr::Rax, w), r(Gpr::Rcx, W8)]).unwrap();
            prop_assert!(fx.is_empty());
            prop_assert_eq!(core.state, before);
        }
    }
}
