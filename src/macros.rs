macro_rules! general_err {
    ($($msg:expr),+) => {
        Error::new(crate::ErrorKind::General, None, format!($($msg),+).as_str())
    };
}
macro_rules! lookup_err {
    ($($msg:expr),+) => {
        Error::new(
            crate::ErrorKind::Lookup,
            None,
            format!("{} {}", red!("Lookup Error"), format!($($msg),+)).as_str(),
        )
    };
}
macro_rules! operand_err {
    ($($msg:expr),+) => {
        Error::new(
            crate::ErrorKind::Operand,
            None,
            format!("{} {}", red!("Operand Error"), format!($($msg),+)).as_str(),
        )
    };
}
macro_rules! memory_err {
    ($($msg:expr),+) => {
        Error::new(
            crate::ErrorKind::Memory,
            None,
            format!("{} {}", red!("Memory Error"), format!($($msg),+)).as_str(),
        )
    };
}
// architectural faults carry the register context the instruction started from
macro_rules! runtime_err {
    ($kind:expr, $ctx:expr, $($msg:expr),+) => {
        Error::new(
            $kind,
            $ctx,
            format!("{} {}", red!("Runtime Error"), format!($($msg),+)).as_str(),
        )
    };
}
macro_rules! xor {
    ($a: expr, $b: expr) => {
        ((($a) && !($b)) || (!($a) && ($b)))
    };
}
macro_rules! bit {
    ($a: expr, $b: expr) => {
        (((($a) as u64) & (1u64 << ($b) as u32)) != 0)
    };
}
macro_rules! color {
    ($color: literal, $msg: expr) => {
        concat!("\x1b[", $color, "m", $msg, "\x1b[0m")
    };
}
macro_rules! red {
    ($msg:expr) => {
        color!(91, $msg)
    };
}
macro_rules! green {
    ($msg:expr) => {
        color!(92, $msg)
    };
}
macro_rules! yellow {
    ($msg:expr) => {
        color!(93, $msg)
    };
}
macro_rules! blue {
    ($msg:expr) => {
        color!(94, $msg)
    };
}
