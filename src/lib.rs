//! # Bit-exact x86/x86-64 instruction semantics for a binary lifter.
//!
//! Each supported instruction form is selected by a key such as
//! `ADD_GPRv_IMMz_32` and evaluated against a register file and memory.
//! Evaluation produces an ordered list of effects (register writes, memory
//! writes, barriers, flag updates) and, if it succeeds, commits them.
//! Flags are tri-state: clear, set or architecturally undefined.
//!
//! ```
//! use x86sem::{Core, Gpr, Operand, Width};
//!
//! let mut core = Core::new();
//! core.state.regs.set(Gpr::Rax, 0xff);
//! let al = Gpr::Rax.at(Width::W8);
//! core.exec("ADD_AL_IMMb_8", &[Operand::reg_w(al), Operand::reg(al), Operand::imm(1, Width::W8)])?;
//! assert_eq!(core.state.regs.get(Gpr::Rax), 0);
//! # Ok::<(), x86sem::Error>(())
//! ```
//!
//! ## Options
//! [`Options`] is a clap parser, so a host tool can expose the same switches
//! on its own command line (`--ia32`, `--no-vex`, `--no-div-checks`,
//! `--undef-read`, `--trace`).
#[macro_use]
mod macros;
pub mod arith;
pub mod atomic;
pub mod config;
pub mod core;
pub mod error;
pub mod flags;
pub mod instructions;
pub mod logical;
pub mod memory;
pub mod muldiv;
pub mod operand;
pub mod outcome;
pub mod registers;
mod runtime;
pub mod shift;
pub mod width;
pub use crate::config::{Options, UndefRead};
pub use crate::core::{Core, State};
pub use crate::error::*;
pub use crate::flags::{Flag, FlagName, Flags};
pub use crate::memory::Memory;
pub use crate::operand::{Kind, Mem, Operand};
pub use crate::outcome::{Barrier, Effect, Outcome};
pub use crate::registers::{Enc, Gpr, Part, Reg, Regs};
pub use crate::width::{Lanes, Sign, Width};
