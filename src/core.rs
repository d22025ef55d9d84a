use super::*;
use crate::instructions::{Table, TABLE};
use std::sync::Arc;

/// The machine state visible to the semantics: registers, flags and memory.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct State {
    pub regs: Regs,
    pub mem: Memory,
}

pub type FaultHook = Box<dyn FnMut(&State, &Error)>;

/// The Core struct evaluates single instructions against a State.
/// Its implementation spans core.rs and runtime.rs.
pub struct Core {
    pub state: State,
    pub options: Options,
    pub(crate) table: Arc<Table>,
    /// called for every #DE the evaluator raises, before the error is returned
    pub(crate) on_fault: FaultHook,
    /// the number of instructions committed since the core was created
    pub instruction_count: u64,
}

impl Core {
    /// A core with default options, sharing the process-wide selection table
    pub fn new() -> Core {
        Core {
            state: State::default(),
            options: Options::default(),
            table: Arc::clone(&TABLE),
            on_fault: Box::new(log_fault),
            instruction_count: 0,
        }
    }
    pub fn with_options(options: Options) -> Result<Core, Error> {
        let table = Arc::new(Table::build(&options)?);
        Ok(Core {
            state: State::default(),
            options,
            table,
            on_fault: Box::new(log_fault),
            instruction_count: 0,
        })
    }
    /// Replace the handler invoked when an instruction faults
    pub fn set_fault_hook(&mut self, hook: impl FnMut(&State, &Error) + 'static) { self.on_fault = Box::new(hook); }
    pub fn table(&self) -> &Table { &self.table }
}

impl Default for Core {
    fn default() -> Self { Core::new() }
}

fn log_fault(state: &State, e: &Error) {
    tracing::warn!(kind = ?e.kind, rax = state.regs.get(Gpr::Rax), rdx = state.regs.get(Gpr::Rdx), "{}", e.msg);
}
