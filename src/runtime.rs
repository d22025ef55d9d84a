//! Implements the evaluation engine: select, check, evaluate, then commit.
use super::*;
use crate::instructions::{Entry, Instance};
use crate::operand::check_shape;
use std::sync::Arc;

impl Core {
    /// Evaluate one instruction selected by its form key.
    /// On success the machine state is updated and the ordered effects are returned.
    /// On failure (fault, bad operands, unmapped memory, undefined flag read)
    /// the machine state is left exactly as it was.
    pub fn exec(&mut self, iform: &str, ops: &[Operand]) -> Result<Vec<Effect>, Error> {
        let table = Arc::clone(&self.table);
        let entry = table.lookup(iform)?;
        self.exec_entry(entry, ops)
    }
    /// Same as exec, for a caller that already holds the table entry
    pub fn exec_entry(&mut self, entry: &Entry, ops: &[Operand]) -> Result<Vec<Effect>, Error> {
        check_shape(entry.shape, ops)?;
        let inst = Instance {
            width: entry.width,
            sign: entry.sign,
            ops,
        };
        let mut o = Outcome::new(self.state.regs, &self.state.mem, &self.options);
        if let Err(e) = (entry.eval)(&mut o, &inst) {
            if e.is_fault() {
                (self.on_fault)(&self.state, &e);
            }
            return Err(e);
        }
        let Outcome { ctx, writes, effects, .. } = o;
        self.state.mem.commit(&writes)?;
        self.state.regs = ctx;
        self.instruction_count += 1;
        if self.options.trace {
            tracing::debug!("{} {}", entry.name, ops.iter().map(|o| o.to_string()).collect::<Vec<_>>().join(", "));
            for e in &effects {
                tracing::debug!("    {}", e);
            }
        }
        Ok(effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn unknown_key() {
        let mut core = Core::new();
        let e = core.exec("FROB_GPRv_32", &[]).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Lookup);
        assert_eq!(core.instruction_count, 0);
    }
    #[test]
    fn shape_mismatch_leaves_state() {
        let mut core = Core::new();
        let before = core.state.clone();
        // destination is not writable
        let e = core.exec("ADD_GPRv_GPRv_01_32", &[r(Gpr::Rax, W32), r(Gpr::Rax, W32), r(Gpr::Rbx, W32)]).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Operand);
        let e = core.exec("ADD_GPRv_GPRv_01_32", &[rw(Gpr::Rax, W32)]).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Operand);
        assert_eq!(core.state, before);
    }
    #[test]
    fn unmapped_write_is_atomic() {
        let mut core = Core::new();
        // two of the four bytes are mapped
        core.state.mem.load(0xffe, &[1, 2]);
        core.state.regs.set(Gpr::Rax, 0x7777);
        let before = core.state.clone();
        let e = core.exec("ADD_MEMv_GPRv_32", &[mw(0xffe, W32), m(0xffe, W32), r(Gpr::Rax, W32)]).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Memory);
        assert_eq!(core.state, before);
    }
    #[test]
    fn fault_hook_sees_pre_state() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut core = Core::new();
        let log = Rc::clone(&seen);
        core.set_fault_hook(move |s, e| log.borrow_mut().push((s.regs.get(Gpr::Rax), e.kind)));
        core.state.regs.set(Gpr::Rax, 42);
        assert!(core.exec("DIV_GPRv_32", &[r(Gpr::Rcx, W32)]).is_err());
        // lookup errors are not faults
        assert!(core.exec("DIV_GPRv_12", &[r(Gpr::Rcx, W32)]).is_err());
        assert_eq!(*seen.borrow(), vec![(42, ErrorKind::DivideByZero)]);
    }
    #[test]
    fn commit_counts_instructions() -> Result<(), Error> {
        let mut core = Core::with_options(Options::default())?;
        core.options.trace = true;
        core.exec("INC_GPRv_FFr0_64", &[rw(Gpr::Rax, W64), r(Gpr::Rax, W64)])?;
        core.exec("INC_GPRv_FFr0_64", &[rw(Gpr::Rax, W64), r(Gpr::Rax, W64)])?;
        assert_eq!(core.instruction_count, 2);
        assert_eq!(core.state.regs.get(Gpr::Rax), 2);
        let entry = core.table().lookup("DEC_GPRv_FFr1_64")?.clone();
        core.exec_entry(&entry, &[rw(Gpr::Rax, W64), r(Gpr::Rax, W64)])?;
        assert_eq!(core.state.regs.get(Gpr::Rax), 1);
        Ok(())
    }
}
