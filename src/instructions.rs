//! The instruction selection table: maps form keys such as `ADD_GPRv_IMMz_32`
//! to one semantic instantiation (evaluation function, width, signedness,
//! operand shape).
use super::*;
use crate::operand::Kind::{self, I, M, MW, R, RW};
use crate::{arith, atomic, logical, muldiv, shift};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

pub type EvalFn = fn(&mut Outcome, &Instance) -> Result<(), Error>;

/// One instruction being evaluated: the entry's instantiation parameters plus
/// the decoded operands.
pub struct Instance<'a> {
    pub width: Width,
    pub sign: Sign,
    pub ops: &'a [Operand],
}

/// Which widths a row expands to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizes {
    /// 8 bits (`b` forms)
    B,
    /// 16, 32 and 64 bits (`v` forms); the 64-bit entry exists in long mode only
    V,
    /// 8, 16, 32 and 64 bits (accumulator `MEMv`/`GPRv` forms of MUL/DIV)
    BV,
    /// exactly one width, taken as the key suffix
    Only(Width),
}

/// Processor modes a row applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Any,
    /// 64-bit long mode only
    Long,
    /// outside long mode only (encodings that are invalid or repurposed in 64-bit mode)
    Legacy,
}

/// ISA extension gating a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ext {
    Base,
    Vex,
}

/// One row of the static table.
pub struct Descriptor {
    /// the form key without its width suffix
    pub iform: &'static str,
    /// the evaluation function for this instruction
    pub eval: EvalFn,
    pub sign: Sign,
    /// the operand kinds expected, in order
    pub shape: &'static [Kind],
    pub sizes: Sizes,
    pub mode: Mode,
    pub ext: Ext,
}

/// A selection table entry: one row instantiated at one width.
#[derive(Clone)]
pub struct Entry {
    pub key: IselKey,
    pub name: String,
    pub eval: EvalFn,
    pub sign: Sign,
    pub width: Width,
    pub shape: &'static [Kind],
    pub mode: Mode,
    pub ext: Ext,
}
// Can't derive Debug because of EvalFn.
impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("sign", &self.sign)
            .field("width", &self.width)
            .field("shape", &self.shape)
            .field("mode", &self.mode)
            .field("ext", &self.ext)
            .finish()
    }
}

/// A parsed form key: mnemonic, operand form and width suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IselKey {
    pub mnemonic: String,
    pub form: String,
    pub width: Width,
}

lazy_static! {
    static ref KEY_RE: Regex = Regex::new(r"^(?P<mn>[A-Z][A-Za-z0-9]*?)(?:_(?P<form>[A-Za-z0-9_]+?))?_(?P<w>8|16|32|64|128|256)$")
        .unwrap();
}

impl IselKey {
    pub fn parse(key: &str) -> Result<IselKey, Error> {
        let caps = KEY_RE.captures(key).ok_or_else(|| lookup_err!("malformed selection key '{}'", key))?;
        let width = caps["w"]
            .parse::<u32>()
            .ok()
            .and_then(Width::from_bits)
            .ok_or_else(|| lookup_err!("bad width in selection key '{}'", key))?;
        Ok(IselKey {
            mnemonic: caps["mn"].to_string(),
            form: caps.name("form").map_or("", |m| m.as_str()).to_string(),
            width,
        })
    }
}

impl fmt::Display for IselKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.form.is_empty() {
            write!(f, "{}_{}", self.mnemonic, self.width)
        } else {
            write!(f, "{}_{}_{}", self.mnemonic, self.form, self.width)
        }
    }
}

/// The built selection table. Read-only after construction.
#[derive(Debug, Default)]
pub struct Table {
    entries: HashMap<String, Entry>,
    by_mnemonic: BTreeMap<String, Vec<String>>,
}

impl Table {
    /// Expand every descriptor row permitted by `opts`.
    pub fn build(opts: &Options) -> Result<Table, Error> {
        let mut t = Table::default();
        for desc in DESCRIPTORS.iter().flat_map(|rows| rows.iter()) {
            if desc.ext == Ext::Vex && !opts.vex() {
                continue;
            }
            for (width, mode) in expand(desc) {
                let applies = match mode {
                    Mode::Any => true,
                    Mode::Long => opts.long_mode(),
                    Mode::Legacy => !opts.long_mode(),
                };
                if applies {
                    t.insert(desc, width, mode)?;
                }
            }
        }
        tracing::debug!(entries = t.len(), long_mode = opts.long_mode(), vex = opts.vex(), "built selection table");
        Ok(t)
    }
    fn insert(&mut self, desc: &Descriptor, width: Width, mode: Mode) -> Result<(), Error> {
        let name = format!("{}_{}", desc.iform, width);
        let key = IselKey::parse(&name)?;
        if self.entries.contains_key(&name) {
            return Err(general_err!("duplicate selection key {}", name));
        }
        self.by_mnemonic.entry(key.mnemonic.clone()).or_default().push(name.clone());
        let entry = Entry {
            key,
            name: name.clone(),
            eval: desc.eval,
            sign: desc.sign,
            width,
            shape: desc.shape,
            mode,
            ext: desc.ext,
        };
        self.entries.insert(name, entry);
        Ok(())
    }
    pub fn get(&self, key: &str) -> Option<&Entry> { self.entries.get(key) }
    pub fn lookup(&self, key: &str) -> Result<&Entry, Error> {
        self.get(key).ok_or_else(|| lookup_err!("no selection entry for {}", key))
    }
    /// All entries registered for a mnemonic, in key order
    pub fn mnemonic(&self, mn: &str) -> Vec<&Entry> {
        let mut v: Vec<&Entry> = self.by_mnemonic.get(mn).into_iter().flatten().filter_map(|k| self.get(k)).collect();
        v.sort_by(|a, b| a.name.cmp(&b.name));
        v
    }
    pub fn mnemonics(&self) -> impl Iterator<Item = &str> { self.by_mnemonic.keys().map(|k| k.as_str()) }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

fn expand(desc: &Descriptor) -> Vec<(Width, Mode)> {
    let widths: &[Width] = match desc.sizes {
        Sizes::B => &[Width::W8],
        Sizes::V => &[Width::W16, Width::W32, Width::W64],
        Sizes::BV => &[Width::W8, Width::W16, Width::W32, Width::W64],
        Sizes::Only(ref w) => std::slice::from_ref(w),
    };
    widths
        .iter()
        .filter_map(|w| {
            let needs_long = *w == Width::W64 && desc.sizes != Sizes::Only(Width::W64);
            match (desc.mode, needs_long) {
                (Mode::Legacy, true) => None,
                (Mode::Any, true) => Some((*w, Mode::Long)),
                (mode, _) => Some((*w, mode)),
            }
        })
        .collect()
}

lazy_static! {
    /// The table for the default options, shared by every Core that uses them
    pub static ref TABLE: Arc<Table> = Arc::new(Table::build(&Options::default()).expect("default selection table"));
}

//
// instruction table
//
const RW_R_I: &[Kind] = &[RW, R, I];
const RW_R_R: &[Kind] = &[RW, R, R];
const RW_R_M: &[Kind] = &[RW, R, M];
const RW_M_I: &[Kind] = &[RW, M, I];
const MW_M_I: &[Kind] = &[MW, M, I];
const MW_M_R: &[Kind] = &[MW, M, R];
const RW_RW_R: &[Kind] = &[RW, RW, R];
const RW_RW_M: &[Kind] = &[RW, RW, M];
const MW_M_RW_R: &[Kind] = &[MW, M, RW, R];
const RW_R_RW_R: &[Kind] = &[RW, R, RW, R];
const RW_R: &[Kind] = &[RW, R];
const MW_M: &[Kind] = &[MW, M];
const R_I: &[Kind] = &[R, I];
const R_R: &[Kind] = &[R, R];
const R_M: &[Kind] = &[R, M];
const M_I: &[Kind] = &[M, I];
const M_R: &[Kind] = &[M, R];
const ONE_R: &[Kind] = &[R];
const ONE_M: &[Kind] = &[M];

use Ext::{Base, Vex};
use Mode::{Any, Legacy, Long};
use crate::width::Sign::{Signed as S, Unsigned as U};
use Sizes::{Only, B, BV, V};
use crate::width::Width::{W128, W256, W32, W64};
type D = Descriptor;

// The 18 forms shared by ADD, SUB, ADC, SBB, AND, OR and XOR.
macro_rules! alu_rows {
    ($mn:literal, $eval:expr, $r:literal, $o0:literal, $o1:literal, $o2:literal, $o3:literal) => {
        &[
            D{iform: concat!($mn, "_MEMb_IMMb_80r", $r),  eval: $eval, sign: U, shape: MW_M_I, sizes: B, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_GPR8_IMMb_80r", $r),  eval: $eval, sign: U, shape: RW_R_I, sizes: B, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_MEMv_IMMz"),          eval: $eval, sign: U, shape: MW_M_I, sizes: V, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_GPRv_IMMz"),          eval: $eval, sign: U, shape: RW_R_I, sizes: V, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_MEMb_IMMb_82r", $r),  eval: $eval, sign: U, shape: MW_M_I, sizes: B, mode: Legacy, ext: Base},
            D{iform: concat!($mn, "_GPR8_IMMb_82r", $r),  eval: $eval, sign: U, shape: RW_R_I, sizes: B, mode: Legacy, ext: Base},
            D{iform: concat!($mn, "_MEMv_IMMb"),          eval: $eval, sign: U, shape: MW_M_I, sizes: V, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_GPRv_IMMb"),          eval: $eval, sign: U, shape: RW_R_I, sizes: V, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_MEMb_GPR8"),          eval: $eval, sign: U, shape: MW_M_R, sizes: B, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_GPR8_GPR8_", $o0),    eval: $eval, sign: U, shape: RW_R_R, sizes: B, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_MEMv_GPRv"),          eval: $eval, sign: U, shape: MW_M_R, sizes: V, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_GPRv_GPRv_", $o1),    eval: $eval, sign: U, shape: RW_R_R, sizes: V, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_GPR8_MEMb"),          eval: $eval, sign: U, shape: RW_R_M, sizes: B, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_GPR8_GPR8_", $o2),    eval: $eval, sign: U, shape: RW_R_R, sizes: B, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_GPRv_MEMv"),          eval: $eval, sign: U, shape: RW_R_M, sizes: V, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_GPRv_GPRv_", $o3),    eval: $eval, sign: U, shape: RW_R_R, sizes: V, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_AL_IMMb"),            eval: $eval, sign: U, shape: RW_R_I, sizes: B, mode: Any,    ext: Base},
            D{iform: concat!($mn, "_OrAX_IMMz"),          eval: $eval, sign: U, shape: RW_R_I, sizes: V, mode: Any,    ext: Base},
        ]
    };
}

// SHR and SAR share one evaluation function; the signedness picks the fill.
macro_rules! shift_right_rows {
    ($mn:literal, $sign:expr) => {
        &[
            D{iform: concat!($mn, "_MEMb_IMMb"), eval: shift::__shr, sign: $sign, shape: MW_M_I, sizes: B, mode: Any, ext: Base},
            D{iform: concat!($mn, "_GPR8_IMMb"), eval: shift::__shr, sign: $sign, shape: RW_R_I, sizes: B, mode: Any, ext: Base},
            D{iform: concat!($mn, "_MEMv_IMMb"), eval: shift::__shr, sign: $sign, shape: MW_M_I, sizes: V, mode: Any, ext: Base},
            D{iform: concat!($mn, "_GPRv_IMMb"), eval: shift::__shr, sign: $sign, shape: RW_R_I, sizes: V, mode: Any, ext: Base},
            D{iform: concat!($mn, "_MEMb_ONE"),  eval: shift::__shr, sign: $sign, shape: MW_M_I, sizes: B, mode: Any, ext: Base},
            D{iform: concat!($mn, "_GPR8_ONE"),  eval: shift::__shr, sign: $sign, shape: RW_R_I, sizes: B, mode: Any, ext: Base},
            D{iform: concat!($mn, "_MEMv_ONE"),  eval: shift::__shr, sign: $sign, shape: MW_M_I, sizes: V, mode: Any, ext: Base},
            D{iform: concat!($mn, "_GPRv_ONE"),  eval: shift::__shr, sign: $sign, shape: RW_R_I, sizes: V, mode: Any, ext: Base},
            D{iform: concat!($mn, "_MEMb_CL"),   eval: shift::__shr, sign: $sign, shape: MW_M_R, sizes: B, mode: Any, ext: Base},
            D{iform: concat!($mn, "_GPR8_CL"),   eval: shift::__shr, sign: $sign, shape: RW_R_R, sizes: B, mode: Any, ext: Base},
            D{iform: concat!($mn, "_MEMv_CL"),   eval: shift::__shr, sign: $sign, shape: MW_M_R, sizes: V, mode: Any, ext: Base},
            D{iform: concat!($mn, "_GPRv_CL"),   eval: shift::__shr, sign: $sign, shape: RW_R_R, sizes: V, mode: Any, ext: Base},
        ]
    };
}

// SHL has two encodings (/4 and /6) for every form.
macro_rules! shift_left_rows {
    ($r:literal) => {
        &[
            D{iform: concat!("SHL_MEMb_IMMb_C0r", $r), eval: shift::__shl, sign: U, shape: MW_M_I, sizes: B, mode: Any, ext: Base},
            D{iform: concat!("SHL_GPR8_IMMb_C0r", $r), eval: shift::__shl, sign: U, shape: RW_R_I, sizes: B, mode: Any, ext: Base},
            D{iform: concat!("SHL_MEMv_IMMb_C1r", $r), eval: shift::__shl, sign: U, shape: MW_M_I, sizes: V, mode: Any, ext: Base},
            D{iform: concat!("SHL_GPRv_IMMb_C1r", $r), eval: shift::__shl, sign: U, shape: RW_R_I, sizes: V, mode: Any, ext: Base},
            D{iform: concat!("SHL_MEMb_ONE_D0r", $r),  eval: shift::__shl, sign: U, shape: MW_M_I, sizes: B, mode: Any, ext: Base},
            D{iform: concat!("SHL_GPR8_ONE_D0r", $r),  eval: shift::__shl, sign: U, shape: RW_R_I, sizes: B, mode: Any, ext: Base},
            D{iform: concat!("SHL_MEMv_ONE_D1r", $r),  eval: shift::__shl, sign: U, shape: MW_M_I, sizes: V, mode: Any, ext: Base},
            D{iform: concat!("SHL_GPRv_ONE_D1r", $r),  eval: shift::__shl, sign: U, shape: RW_R_I, sizes: V, mode: Any, ext: Base},
            D{iform: concat!("SHL_MEMb_CL_D2r", $r),   eval: shift::__shl, sign: U, shape: MW_M_R, sizes: B, mode: Any, ext: Base},
            D{iform: concat!("SHL_GPR8_CL_D2r", $r),   eval: shift::__shl, sign: U, shape: RW_R_R, sizes: B, mode: Any, ext: Base},
            D{iform: concat!("SHL_MEMv_CL_D3r", $r),   eval: shift::__shl, sign: U, shape: MW_M_R, sizes: V, mode: Any, ext: Base},
            D{iform: concat!("SHL_GPRv_CL_D3r", $r),   eval: shift::__shl, sign: U, shape: RW_R_R, sizes: V, mode: Any, ext: Base},
        ]
    };
}

// Packed bitwise family: MMX, SSE integer, SSE PS/PD aliases and their VEX forms.
macro_rules! packed_rows {
    ($p:literal, $vp:literal, $pd:literal, $ps:literal, $vpd:literal, $vps:literal, $eval:expr) => {
        &[
            D{iform: concat!($p, "q_MEMq"),                eval: $eval, sign: U, shape: RW_R_M, sizes: Only(W64),  mode: Any, ext: Base},
            D{iform: concat!($p, "qq"),                    eval: $eval, sign: U, shape: RW_R_R, sizes: Only(W64),  mode: Any, ext: Base},
            D{iform: concat!($p, "_XMMdq_MEMdq"),          eval: $eval, sign: U, shape: RW_R_M, sizes: Only(W32),  mode: Any, ext: Base},
            D{iform: concat!($p, "_XMMdq_XMMdq"),          eval: $eval, sign: U, shape: RW_R_R, sizes: Only(W32),  mode: Any, ext: Base},
            D{iform: concat!($vp, "_XMMdq_XMMdq_MEMdq"),   eval: $eval, sign: U, shape: RW_R_M, sizes: Only(W128), mode: Any, ext: Vex},
            D{iform: concat!($vp, "_XMMdq_XMMdq_XMMdq"),   eval: $eval, sign: U, shape: RW_R_R, sizes: Only(W128), mode: Any, ext: Vex},
            D{iform: concat!($vp, "_YMMqq_YMMqq_MEMqq"),   eval: $eval, sign: U, shape: RW_R_M, sizes: Only(W256), mode: Any, ext: Vex},
            D{iform: concat!($vp, "_YMMqq_YMMqq_YMMqq"),   eval: $eval, sign: U, shape: RW_R_R, sizes: Only(W256), mode: Any, ext: Vex},
            D{iform: concat!($pd, "_XMMpd_MEMpd"),         eval: $eval, sign: U, shape: RW_R_M, sizes: Only(W64),  mode: Any, ext: Base},
            D{iform: concat!($pd, "_XMMpd_XMMpd"),         eval: $eval, sign: U, shape: RW_R_R, sizes: Only(W64),  mode: Any, ext: Base},
            D{iform: concat!($ps, "_XMMps_MEMps"),         eval: $eval, sign: U, shape: RW_R_M, sizes: Only(W32),  mode: Any, ext: Base},
            D{iform: concat!($ps, "_XMMps_XMMps"),         eval: $eval, sign: U, shape: RW_R_R, sizes: Only(W32),  mode: Any, ext: Base},
            D{iform: concat!($vpd, "_XMMdq_XMMdq_MEMdq"),  eval: $eval, sign: U, shape: RW_R_M, sizes: Only(W64),  mode: Any, ext: Vex},
            D{iform: concat!($vpd, "_XMMdq_XMMdq_XMMdq"),  eval: $eval, sign: U, shape: RW_R_R, sizes: Only(W64),  mode: Any, ext: Vex},
            D{iform: concat!($vpd, "_YMMqq_YMMqq_MEMqq"),  eval: $eval, sign: U, shape: RW_R_M, sizes: Only(W64),  mode: Any, ext: Vex},
            D{iform: concat!($vpd, "_YMMqq_YMMqq_YMMqq"),  eval: $eval, sign: U, shape: RW_R_R, sizes: Only(W64),  mode: Any, ext: Vex},
            D{iform: concat!($vps, "_XMMdq_XMMdq_MEMdq"),  eval: $eval, sign: U, shape: RW_R_M, sizes: Only(W32),  mode: Any, ext: Vex},
            D{iform: concat!($vps, "_XMMdq_XMMdq_XMMdq"),  eval: $eval, sign: U, shape: RW_R_R, sizes: Only(W32),  mode: Any, ext: Vex},
            D{iform: concat!($vps, "_YMMqq_YMMqq_MEMqq"),  eval: $eval, sign: U, shape: RW_R_M, sizes: Only(W32),  mode: Any, ext: Vex},
            D{iform: concat!($vps, "_YMMqq_YMMqq_YMMqq"),  eval: $eval, sign: U, shape: RW_R_R, sizes: Only(W32),  mode: Any, ext: Vex},
        ]
    };
}

#[rustfmt::skip]
pub const DESCRIPTORS: &[&[Descriptor]] = &[
    alu_rows!("ADD", arith::__add, "0", "00", "01", "02", "03"),
    alu_rows!("OR",  logical::__or, "1", "08", "09", "0A", "0B"),
    alu_rows!("ADC", arith::__adc, "2", "10", "11", "12", "13"),
    alu_rows!("SBB", arith::__sbb, "3", "18", "19", "1A", "1B"),
    alu_rows!("AND", logical::__and, "4", "20", "21", "22", "23"),
    alu_rows!("SUB", arith::__sub, "5", "28", "29", "2A", "2B"),
    alu_rows!("XOR", logical::__xor, "6", "30", "31", "32", "33"),
    &[
        D{iform: "CMP_MEMb_IMMb_80r7", eval: arith::__cmp, sign: U, shape: M_I, sizes: B, mode: Any,    ext: Base},
        D{iform: "CMP_GPR8_IMMb_80r7", eval: arith::__cmp, sign: U, shape: R_I, sizes: B, mode: Any,    ext: Base},
        D{iform: "CMP_MEMv_IMMz",      eval: arith::__cmp, sign: U, shape: M_I, sizes: V, mode: Any,    ext: Base},
        D{iform: "CMP_GPRv_IMMz",      eval: arith::__cmp, sign: U, shape: R_I, sizes: V, mode: Any,    ext: Base},
        D{iform: "CMP_MEMb_IMMb_82r7", eval: arith::__cmp, sign: U, shape: M_I, sizes: B, mode: Legacy, ext: Base},
        D{iform: "CMP_GPR8_IMMb_82r7", eval: arith::__cmp, sign: U, shape: R_I, sizes: B, mode: Legacy, ext: Base},
        D{iform: "CMP_MEMv_IMMb",      eval: arith::__cmp, sign: U, shape: M_I, sizes: V, mode: Any,    ext: Base},
        D{iform: "CMP_GPRv_IMMb",      eval: arith::__cmp, sign: U, shape: R_I, sizes: V, mode: Any,    ext: Base},
        D{iform: "CMP_MEMb_GPR8",      eval: arith::__cmp, sign: U, shape: M_R, sizes: B, mode: Any,    ext: Base},
        D{iform: "CMP_GPR8_GPR8_38",   eval: arith::__cmp, sign: U, shape: R_R, sizes: B, mode: Any,    ext: Base},
        D{iform: "CMP_MEMv_GPRv",      eval: arith::__cmp, sign: U, shape: M_R, sizes: V, mode: Any,    ext: Base},
        D{iform: "CMP_GPRv_GPRv_39",   eval: arith::__cmp, sign: U, shape: R_R, sizes: V, mode: Any,    ext: Base},
        D{iform: "CMP_GPR8_GPR8_3A",   eval: arith::__cmp, sign: U, shape: R_R, sizes: B, mode: Any,    ext: Base},
        D{iform: "CMP_GPR8_MEMb",      eval: arith::__cmp, sign: U, shape: R_M, sizes: B, mode: Any,    ext: Base},
        D{iform: "CMP_GPRv_GPRv_3B",   eval: arith::__cmp, sign: U, shape: R_R, sizes: V, mode: Any,    ext: Base},
        D{iform: "CMP_GPRv_MEMv",      eval: arith::__cmp, sign: U, shape: R_M, sizes: V, mode: Any,    ext: Base},
        D{iform: "CMP_AL_IMMb",        eval: arith::__cmp, sign: U, shape: R_I, sizes: B, mode: Any,    ext: Base},
        D{iform: "CMP_OrAX_IMMz",      eval: arith::__cmp, sign: U, shape: R_I, sizes: V, mode: Any,    ext: Base},
    ],
    &[
        D{iform: "TEST_MEMb_IMMb_F6r0",  eval: logical::__test, sign: U, shape: M_I, sizes: B, mode: Any, ext: Base},
        D{iform: "TEST_MEMb_IMMb_F6r1",  eval: logical::__test, sign: U, shape: M_I, sizes: B, mode: Any, ext: Base},
        D{iform: "TEST_GPR8_IMMb_F6r0",  eval: logical::__test, sign: U, shape: R_I, sizes: B, mode: Any, ext: Base},
        D{iform: "TEST_GPR8_IMMb_F6r1",  eval: logical::__test, sign: U, shape: R_I, sizes: B, mode: Any, ext: Base},
        D{iform: "TEST_MEMv_IMMz_F7r0",  eval: logical::__test, sign: U, shape: M_I, sizes: V, mode: Any, ext: Base},
        D{iform: "TEST_MEMv_IMMz_F7r1",  eval: logical::__test, sign: U, shape: M_I, sizes: V, mode: Any, ext: Base},
        D{iform: "TEST_GPRv_IMMz_F7r0",  eval: logical::__test, sign: U, shape: R_I, sizes: V, mode: Any, ext: Base},
        D{iform: "TEST_GPRv_IMMz_F7r1",  eval: logical::__test, sign: U, shape: R_I, sizes: V, mode: Any, ext: Base},
        D{iform: "TEST_MEMb_GPR8",       eval: logical::__test, sign: U, shape: M_R, sizes: B, mode: Any, ext: Base},
        D{iform: "TEST_GPR8_GPR8",       eval: logical::__test, sign: U, shape: R_R, sizes: B, mode: Any, ext: Base},
        D{iform: "TEST_MEMv_GPRv",       eval: logical::__test, sign: U, shape: M_R, sizes: V, mode: Any, ext: Base},
        D{iform: "TEST_GPRv_GPRv",       eval: logical::__test, sign: U, shape: R_R, sizes: V, mode: Any, ext: Base},
        D{iform: "TEST_AL_IMMb",         eval: logical::__test, sign: U, shape: R_I, sizes: B, mode: Any, ext: Base},
        D{iform: "TEST_OrAX_IMMz",       eval: logical::__test, sign: U, shape: R_I, sizes: V, mode: Any, ext: Base},
    ],
    &[
        D{iform: "INC_MEMb",      eval: arith::__inc,   sign: U, shape: MW_M, sizes: B, mode: Any,    ext: Base},
        D{iform: "INC_GPR8",      eval: arith::__inc,   sign: U, shape: RW_R, sizes: B, mode: Any,    ext: Base},
        D{iform: "INC_MEMv",      eval: arith::__inc,   sign: U, shape: MW_M, sizes: V, mode: Any,    ext: Base},
        D{iform: "INC_GPRv_FFr0", eval: arith::__inc,   sign: U, shape: RW_R, sizes: V, mode: Any,    ext: Base},
        D{iform: "INC_GPRv_40",   eval: arith::__inc,   sign: U, shape: RW_R, sizes: V, mode: Legacy, ext: Base},
        D{iform: "DEC_MEMb",      eval: arith::__dec,   sign: U, shape: MW_M, sizes: B, mode: Any,    ext: Base},
        D{iform: "DEC_GPR8",      eval: arith::__dec,   sign: U, shape: RW_R, sizes: B, mode: Any,    ext: Base},
        D{iform: "DEC_MEMv",      eval: arith::__dec,   sign: U, shape: MW_M, sizes: V, mode: Any,    ext: Base},
        D{iform: "DEC_GPRv_FFr1", eval: arith::__dec,   sign: U, shape: RW_R, sizes: V, mode: Any,    ext: Base},
        D{iform: "DEC_GPRv_48",   eval: arith::__dec,   sign: U, shape: RW_R, sizes: V, mode: Legacy, ext: Base},
        D{iform: "NEG_MEMb",      eval: arith::__neg,   sign: U, shape: MW_M, sizes: B, mode: Any,    ext: Base},
        D{iform: "NEG_GPR8",      eval: arith::__neg,   sign: U, shape: RW_R, sizes: B, mode: Any,    ext: Base},
        D{iform: "NEG_MEMv",      eval: arith::__neg,   sign: U, shape: MW_M, sizes: V, mode: Any,    ext: Base},
        D{iform: "NEG_GPRv",      eval: arith::__neg,   sign: U, shape: RW_R, sizes: V, mode: Any,    ext: Base},
        D{iform: "NOT_MEMb",      eval: logical::__not, sign: U, shape: MW_M, sizes: B, mode: Any,    ext: Base},
        D{iform: "NOT_GPR8",      eval: logical::__not, sign: U, shape: RW_R, sizes: B, mode: Any,    ext: Base},
        D{iform: "NOT_MEMv",      eval: logical::__not, sign: U, shape: MW_M, sizes: V, mode: Any,    ext: Base},
        D{iform: "NOT_GPRv",      eval: logical::__not, sign: U, shape: RW_R, sizes: V, mode: Any,    ext: Base},
    ],
    &[
        D{iform: "XADD_MEMb_GPR8", eval: atomic::__xadd, sign: U, shape: MW_M_RW_R, sizes: B, mode: Any, ext: Base},
        D{iform: "XADD_GPR8_GPR8", eval: atomic::__xadd, sign: U, shape: RW_R_RW_R, sizes: B, mode: Any, ext: Base},
        D{iform: "XADD_MEMv_GPRv", eval: atomic::__xadd, sign: U, shape: MW_M_RW_R, sizes: V, mode: Any, ext: Base},
        D{iform: "XADD_GPRv_GPRv", eval: atomic::__xadd, sign: U, shape: RW_R_RW_R, sizes: V, mode: Any, ext: Base},
    ],
    &[
        D{iform: "IMUL_MEMb",            eval: muldiv::__mul_acc, sign: S, shape: ONE_M,   sizes: B,  mode: Any,  ext: Base},
        D{iform: "IMUL_GPR8",            eval: muldiv::__mul_acc, sign: S, shape: ONE_R,   sizes: B,  mode: Any,  ext: Base},
        D{iform: "IMUL_MEMv",            eval: muldiv::__mul_acc, sign: S, shape: ONE_M,   sizes: BV, mode: Any,  ext: Base},
        D{iform: "IMUL_GPRv",            eval: muldiv::__mul_acc, sign: S, shape: ONE_R,   sizes: BV, mode: Any,  ext: Base},
        D{iform: "IMUL_GPRv_MEMv_IMMz",  eval: muldiv::__imul,    sign: S, shape: RW_M_I,  sizes: V,  mode: Any,  ext: Base},
        D{iform: "IMUL_GPRv_GPRv_IMMz",  eval: muldiv::__imul,    sign: S, shape: RW_R_I,  sizes: V,  mode: Any,  ext: Base},
        D{iform: "IMUL_GPRv_MEMv_IMMb",  eval: muldiv::__imul,    sign: S, shape: RW_M_I,  sizes: V,  mode: Any,  ext: Base},
        D{iform: "IMUL_GPRv_GPRv_IMMb",  eval: muldiv::__imul,    sign: S, shape: RW_R_I,  sizes: V,  mode: Any,  ext: Base},
        D{iform: "IMUL_GPRv_MEMv",       eval: muldiv::__imul,    sign: S, shape: RW_R_M,  sizes: V,  mode: Any,  ext: Base},
        D{iform: "IMUL_GPRv_GPRv",       eval: muldiv::__imul,    sign: S, shape: RW_R_R,  sizes: V,  mode: Any,  ext: Base},
        D{iform: "MUL_GPR8",             eval: muldiv::__mul_acc, sign: U, shape: ONE_R,   sizes: B,  mode: Any,  ext: Base},
        D{iform: "MUL_MEMb",             eval: muldiv::__mul_acc, sign: U, shape: ONE_M,   sizes: B,  mode: Any,  ext: Base},
        D{iform: "MUL_MEMv",             eval: muldiv::__mul_acc, sign: U, shape: ONE_M,   sizes: BV, mode: Any,  ext: Base},
        D{iform: "MUL_GPRv",             eval: muldiv::__mul_acc, sign: U, shape: ONE_R,   sizes: BV, mode: Any,  ext: Base},
        D{iform: "MULX_VGPR32d_VGPR32d_VGPR32d", eval: muldiv::__mulx, sign: U, shape: RW_RW_R, sizes: Only(W32), mode: Any,  ext: Vex},
        D{iform: "MULX_VGPR32d_VGPR32d_MEMd",    eval: muldiv::__mulx, sign: U, shape: RW_RW_M, sizes: Only(W32), mode: Any,  ext: Vex},
        D{iform: "MULX_VGPR64q_VGPR64q_VGPR64q", eval: muldiv::__mulx, sign: U, shape: RW_RW_R, sizes: Only(W64), mode: Long, ext: Vex},
        D{iform: "MULX_VGPR64q_VGPR64q_MEMq",    eval: muldiv::__mulx, sign: U, shape: RW_RW_M, sizes: Only(W64), mode: Long, ext: Vex},
        D{iform: "IDIV_MEMb",            eval: muldiv::__div_acc, sign: S, shape: ONE_M,   sizes: B,  mode: Any,  ext: Base},
        D{iform: "IDIV_GPR8",            eval: muldiv::__div_acc, sign: S, shape: ONE_R,   sizes: B,  mode: Any,  ext: Base},
        D{iform: "IDIV_MEMv",            eval: muldiv::__div_acc, sign: S, shape: ONE_M,   sizes: BV, mode: Any,  ext: Base},
        D{iform: "IDIV_GPRv",            eval: muldiv::__div_acc, sign: S, shape: ONE_R,   sizes: BV, mode: Any,  ext: Base},
        D{iform: "DIV_MEMb",             eval: muldiv::__div_acc, sign: U, shape: ONE_M,   sizes: B,  mode: Any,  ext: Base},
        D{iform: "DIV_GPR8",             eval: muldiv::__div_acc, sign: U, shape: ONE_R,   sizes: B,  mode: Any,  ext: Base},
        D{iform: "DIV_MEMv",             eval: muldiv::__div_acc, sign: U, shape: ONE_M,   sizes: BV, mode: Any,  ext: Base},
        D{iform: "DIV_GPRv",             eval: muldiv::__div_acc, sign: U, shape: ONE_R,   sizes: BV, mode: Any,  ext: Base},
    ],
    shift_right_rows!("SHR", U),
    shift_right_rows!("SAR", S),
    shift_left_rows!("4"),
    shift_left_rows!("6"),
    packed_rows!("PXOR",  "VPXOR",  "XORPD",  "XORPS",  "VXORPD",  "VXORPS",  logical::__pxor),
    packed_rows!("PAND",  "VPAND",  "ANDPD",  "ANDPS",  "VANDPD",  "VANDPS",  logical::__pand),
    packed_rows!("PANDN", "VPANDN", "ANDNPD", "ANDNPS", "VANDNPD", "VANDNPS", logical::__pandn),
    packed_rows!("POR",   "VPOR",   "ORPD",   "ORPS",   "VORPD",   "VORPS",   logical::__por),
    &[
        D{iform: "PTEST_XMMdq_MEMdq",  eval: logical::__ptest, sign: U, shape: R_M, sizes: Only(W32), mode: Any, ext: Base},
        D{iform: "PTEST_XMMdq_XMMdq",  eval: logical::__ptest, sign: U, shape: R_R, sizes: Only(W32), mode: Any, ext: Base},
        D{iform: "VPTEST_XMMdq_MEMdq", eval: logical::__ptest, sign: U, shape: R_M, sizes: Only(W32), mode: Any, ext: Vex},
        D{iform: "VPTEST_XMMdq_XMMdq", eval: logical::__ptest, sign: U, shape: R_R, sizes: Only(W32), mode: Any, ext: Vex},
        D{iform: "VPTEST_YMMqq_MEMqq", eval: logical::__ptest, sign: U, shape: R_M, sizes: Only(W32), mode: Any, ext: Vex},
        D{iform: "VPTEST_YMMqq_YMMqq", eval: logical::__ptest, sign: U, shape: R_R, sizes: Only(W32), mode: Any, ext: Vex},
    ],
];
