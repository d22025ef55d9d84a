use super::*;
use std::collections::BTreeMap;

/// Sparse byte-addressed memory. Only mapped bytes may be read or written.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Memory {
    bytes: BTreeMap<u64, u8>,
}

/// A pending memory write recorded by an instruction and applied on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRecord {
    pub addr: u64,
    pub width: Width,
    pub val: Lanes,
}

impl WriteRecord {
    /// The byte this record writes at `addr`, if it covers it
    pub fn byte_at(&self, addr: u64) -> Option<u8> {
        let off = addr.wrapping_sub(self.addr);
        if off < self.width.bytes() as u64 {
            Some((self.val.0[off as usize / 8] >> ((off % 8) * 8)) as u8)
        } else {
            None
        }
    }
}

impl Memory {
    pub fn new() -> Memory { Memory::default() }
    /// Map `len` zeroed bytes starting at `addr`. Already mapped bytes keep their contents.
    pub fn map(&mut self, addr: u64, len: u64) {
        for i in 0..len {
            self.bytes.entry(addr.wrapping_add(i)).or_insert(0);
        }
    }
    /// Map and fill memory starting at `addr`
    pub fn load(&mut self, addr: u64, data: &[u8]) {
        for (i, b) in data.iter().enumerate() {
            self.bytes.insert(addr.wrapping_add(i as u64), *b);
        }
    }
    pub fn is_mapped(&self, addr: u64, len: usize) -> bool {
        (0..len as u64).all(|i| self.bytes.contains_key(&addr.wrapping_add(i)))
    }
    pub fn read_u8(&self, addr: u64) -> Result<u8, Error> {
        self.bytes.get(&addr).copied().ok_or_else(|| memory_err!("read of unmapped address {:#x}", addr))
    }
    /// Read `w` bytes little-endian
    pub fn read(&self, addr: u64, w: Width) -> Result<Lanes, Error> {
        let mut buf = Vec::with_capacity(w.bytes());
        for i in 0..w.bytes() as u64 {
            buf.push(self.read_u8(addr.wrapping_add(i))?);
        }
        Ok(Lanes::from_le_bytes(&buf))
    }
    fn check(&self, rec: &WriteRecord) -> Result<(), Error> {
        if !self.is_mapped(rec.addr, rec.width.bytes()) {
            return Err(memory_err!("write of {} bytes to unmapped address {:#x}", rec.width.bytes(), rec.addr));
        }
        Ok(())
    }
    fn apply(&mut self, rec: &WriteRecord) {
        for (i, b) in rec.val.to_le_bytes(rec.width).into_iter().enumerate() {
            self.bytes.insert(rec.addr.wrapping_add(i as u64), b);
        }
    }
    /// Apply a write; every byte must already be mapped.
    pub fn write(&mut self, rec: &WriteRecord) -> Result<(), Error> {
        self.check(rec)?;
        self.apply(rec);
        Ok(())
    }
    /// Apply a batch of writes in order. Nothing is written unless every record is mapped.
    pub fn commit(&mut self, recs: &[WriteRecord]) -> Result<(), Error> {
        for rec in recs {
            self.check(rec)?;
        }
        for rec in recs {
            self.apply(rec);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_round_trip() -> Result<(), Error> {
        let mut m = Memory::new();
        m.map(0x1000, 8);
        m.write(&WriteRecord { addr: 0x1000, width: Width::W32, val: Lanes::scalar(0xdead_beef) })?;
        assert_eq!(m.read_u8(0x1000)?, 0xef);
        assert_eq!(m.read(0x1000, Width::W16)?.low(), 0xbeef);
        assert_eq!(m.read(0x1000, Width::W64)?.low(), 0xdead_beef);
        Ok(())
    }
    #[test]
    fn unmapped_access_fails() {
        let mut m = Memory::new();
        m.load(0x10, &[1, 2, 3]);
        assert!(m.is_mapped(0x10, 3));
        assert!(!m.is_mapped(0x10, 4));
        let e = m.read(0x11, Width::W32).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Memory);
        let rec = WriteRecord { addr: 0x12, width: Width::W16, val: Lanes::scalar(0xffff) };
        assert!(m.write(&rec).is_err());
        // a failed write leaves memory untouched
        assert_eq!(m.read_u8(0x12).unwrap(), 3);
    }
    #[test]
    fn commit_is_all_or_nothing() -> Result<(), Error> {
        let mut m = Memory::new();
        m.load(0x40, &[0; 4]);
        let ok = WriteRecord { addr: 0x40, width: Width::W16, val: Lanes::scalar(0xaaaa) };
        let bad = WriteRecord { addr: 0x42, width: Width::W32, val: Lanes::scalar(0xbbbb_bbbb) };
        let e = m.commit(&[ok, bad]).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Memory);
        assert_eq!(m.read(0x40, Width::W32)?.low(), 0);
        // later records win where they overlap
        let over = WriteRecord { addr: 0x41, width: Width::W8, val: Lanes::scalar(0x11) };
        m.commit(&[ok, over])?;
        assert_eq!(m.read(0x40, Width::W32)?.low(), 0x11aa);
        Ok(())
    }
    #[test]
    fn record_covers_bytes() {
        let rec = WriteRecord { addr: 0x20, width: Width::W16, val: Lanes::scalar(0x1234) };
        assert_eq!(rec.byte_at(0x20), Some(0x34));
        assert_eq!(rec.byte_at(0x21), Some(0x12));
        assert_eq!(rec.byte_at(0x22), None);
        assert_eq!(rec.byte_at(0x1f), None);
    }
}
