use common::constants::PROG_START;
use common::mem::Memory;

use log::trace;

// This is separate so a mutable borrow can be passed to the MMIO handlers.
#[derive(Debug)]
pub struct EmulatorState {
    num_ins: usize,
    mem: Memory,
    ptr: u32,
}

impl EmulatorState {
    pub fn new() -> Self {
        EmulatorState {
            num_ins: 0usize,
            mem: Memory::new(),
            ptr: PROG_START,
        }
    }

    pub fn inc_ins(&mut self) {
        self.num_ins += 1;
    }

    pub fn num_ins(&self) -> usize {
        self.num_ins
    }

    pub fn mem(&self) -> &Memory {
        &self.mem
    }

    pub fn mem_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    pub fn ptr(&self) -> u32 {
        self.ptr
    }

    pub fn set_ptr(&mut self, ptr: u32) {
        trace!("Ptr: {} -> {ptr}", self.ptr);
        self.ptr = ptr;
    }
}

impl Default for EmulatorState {
    fn default() -> Self {
        Self::new()
    }
}
