use crate::registers;
use std::fmt;

/// Error type shared by every evaluation path of the semantics core
pub struct Error {
    pub kind: ErrorKind,
    pub ctx: Option<registers::Regs>,
    pub msg: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// #DE raised because the divisor was zero
    DivideByZero,
    /// #DE raised because the quotient does not fit the destination width
    DivideOverflow,
    /// an instruction consumed a flag whose value is architecturally undefined
    UndefinedFlag,
    /// operand count/kind mismatch or a write through a read-only operand
    Operand,
    /// access to unmapped memory
    Memory,
    /// no selection-table entry for the requested key
    Lookup,
    /// catch-all for other errors
    General,
}

impl Error {
    pub fn new(kind: ErrorKind, ctx: Option<registers::Regs>, message: &str) -> Error {
        Error {
            kind,
            ctx,
            msg: String::from(message),
        }
    }
    /// True for errors the hardware would raise as an exception
    pub fn is_fault(&self) -> bool { matches!(self.kind, ErrorKind::DivideByZero | ErrorKind::DivideOverflow) }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({:?}): {}", red!("x86sem::Error"), self.kind, self.msg)
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut res = write!(f, "{}", self.msg);
        if res.is_ok() {
            if let Some(ctx) = self.ctx.as_ref() {
                res = write!(f, "\nContext: {} -> ({})", ctx, ctx.flags);
            }
        }
        res
    }
}
impl std::error::Error for Error {}
