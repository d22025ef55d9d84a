use clap::{Parser, ValueEnum};

/// What to do when an instruction consumes a flag that is currently undefined.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum UndefRead {
    /// Treat the flag as clear
    Clear,
    /// Treat the flag as set
    Set,
    /// Fail the instruction with ErrorKind::UndefinedFlag
    Error,
}

#[derive(Parser, Debug, Clone)]
#[command(author,version,about,long_about=None)]
pub struct Options {
    /// Model 32-bit protected mode instead of 64-bit long mode
    #[arg(long)]
    pub ia32: bool,

    /// Exclude VEX-encoded (AVX, BMI2) instruction forms from the selection table
    #[arg(long)]
    pub no_vex: bool,

    /// Skip the quotient range check on DIV/IDIV (a zero divisor still faults)
    #[arg(long)]
    pub no_div_checks: bool,

    /// Policy for instructions that read an undefined flag
    #[arg(long, value_enum, default_value_t = UndefRead::Clear)]
    pub undef_read: UndefRead,

    /// Log every evaluated instruction and its effects
    #[arg(short, long)]
    pub trace: bool,
}

impl Default for Options {
    fn default() -> Self { Options::parse_from(["x86sem"]) }
}

impl Options {
    pub fn long_mode(&self) -> bool { !self.ia32 }
    pub fn vex(&self) -> bool { !self.no_vex }
    pub fn div_checks(&self) -> bool { !self.no_div_checks }
}
