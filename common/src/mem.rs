use crate::asm::Ins;
use crate::constants::*;

use std::collections::HashMap;
use std::fmt;

use log::trace;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemError {
    #[error("Value {val} out of range for word at address {addr}")]
    ValueOutOfRange { addr: u32, val: i64 },

    #[error("Address {0} out of range")]
    InvalidAddress(u64),
}

// Sparse word store. Unwritten addresses read as zero. The length is the
// highest address ever written plus one, and is maintained on every write.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    cells: HashMap<u32, u32>,
    len: usize,
}

impl Memory {
    pub fn new() -> Memory {
        Default::default()
    }

    pub fn read(&self, addr: u32) -> u32 {
        self.cells.get(&addr).copied().unwrap_or(0)
    }

    pub fn write(&mut self, addr: u32, val: i64) -> Result<(), MemError> {
        let word = u32::try_from(val).map_err(|_| MemError::ValueOutOfRange{addr, val})?;
        self.write_word(addr, word);
        Ok(())
    }

    // Infallible form of write() for values that are already words.
    pub fn write_word(&mut self, addr: u32, word: u32) {
        trace!("Mem: writing {word:#x} to {addr}");
        self.cells.insert(addr, word);
        self.len = self.len.max(addr as usize + 1);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter{mem: self, addr: 0}
    }

    pub fn read_acc(&self) -> u32 {
        self.read(ACC_ADDR)
    }

    pub fn write_acc(&mut self, val: u32) {
        self.write_word(ACC_ADDR, val);
    }

    pub fn flag_cmp(&self) -> u32 {
        self.read(FLAG_ADDR)
    }

    pub fn set_flag_cmp(&mut self, less: bool) {
        self.write_word(FLAG_ADDR, less as u32);
    }

    // Writes the encoded instructions from PROG_START on, overwriting whatever
    // was there.
    pub fn load_program(&mut self, prog: &[Ins]) -> Result<(), MemError> {
        for (offset, ins) in prog.iter().enumerate() {
            let addr = u64::from(PROG_START) + offset as u64;
            let addr = u32::try_from(addr).map_err(|_| MemError::InvalidAddress(addr))?;
            self.write_word(addr, ins.value());
        }
        Ok(())
    }

    pub fn dump(&self) -> impl Iterator<Item = DumpEntry> + '_ {
        self.iter()
            .enumerate()
            .map(|(addr, word)| DumpEntry{addr: addr as u32, word})
    }
}

impl<'a> IntoIterator for &'a Memory {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

pub struct Iter<'a> {
    mem: &'a Memory,
    addr: usize,
}

impl Iterator for Iter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.addr >= self.mem.len() {
            return None;
        }
        let word = self.mem.read(self.addr as u32);
        self.addr += 1;
        Some(word)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.mem.len().saturating_sub(self.addr);
        (rem, Some(rem))
    }
}

impl ExactSizeIterator for Iter<'_> {}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpEntry {
    pub addr: u32,
    pub word: u32,
}

impl DumpEntry {
    pub fn hi(&self) -> u16 {
        (self.word >> u16::BITS) as u16
    }

    pub fn lo(&self) -> u16 {
        self.word as u16
    }
}

impl fmt::Display for DumpEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{:#06x}] {:04x} {:04x}", self.addr, self.hi(), self.lo())
    }
}
