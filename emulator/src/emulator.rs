use common::asm::*;
use common::constants::*;
use common::mem::{MemError, Memory};
use crate::EmulatorState;
use crate::MMIOHandler;
use crate::run_queue::{RunQueue, Step};

use std::fmt;

use delegate::delegate;
use derive_more::IsVariant;
use log::{debug, error, info};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum ExecRet {
    Ok,
    Jump(u32),
    Halt,
}

// How a run that didn't fault came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Stop {
    Halt,
    BudgetExhausted,
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Stop::Halt => "halt",
            Stop::BudgetExhausted => "budget exhausted",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("Segmentation fault: ptr {ptr} past end of memory (length {len})")]
    SegmentationFault { ptr: u64, len: usize },

    #[error("Unrecognized opcode {opcode} in word {word:#010x} at address {addr}")]
    UnrecognizedOpcode { addr: u32, word: u32, opcode: u32 },

    #[error("Memory error executing word {word:#010x} at address {addr}: {source}")]
    Memory { addr: u32, word: u32, source: MemError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Tick,
    Poll(usize),
}


pub struct Emulator {
    state: EmulatorState,
    devices: Vec<Box<dyn MMIOHandler>>,
    max_ins: Option<usize>,
}

impl Emulator {
    pub fn new() -> Emulator {
        Emulator {
            state: EmulatorState::new(),
            devices: vec![],
            max_ins: None,
        }
    }

    delegate! {
        to self.state {
            pub fn ptr(&self) -> u32;
            pub fn set_ptr(&mut self, ptr: u32);
            pub fn num_ins(&self) -> usize;
            pub fn mem(&self) -> &Memory;
            pub fn mem_mut(&mut self) -> &mut Memory;
        }
    }

    pub fn get_state(&self) -> &EmulatorState {
        &self.state
    }

    pub fn get_state_mut(&mut self) -> &mut EmulatorState {
        &mut self.state
    }

    // Devices are polled in the order they were added.
    pub fn set_mmio_handler(&mut self, handler: impl MMIOHandler + 'static) {
        self.devices.push(Box::new(handler));
    }

    // Caps the number of instructions a run may execute. None means no limit.
    pub fn set_max_ins(&mut self, max_ins: Option<usize>) {
        self.max_ins = max_ins;
    }

    pub fn load_program(&mut self, prog: &[Ins]) -> Result<(), MemError> {
        self.state.mem_mut().load_program(prog)
    }

    pub fn run_at(&mut self, ptr: u32) -> Result<Stop, Fault> {
        self.state.set_ptr(ptr);
        self.run()
    }

    // Run until a halt, a fault, or the instruction budget runs out. The
    // devices are queued ahead of the CPU, so each instruction is preceded by
    // one poll of every device.
    pub fn run(&mut self) -> Result<Stop, Fault> {
        info!("Starting at {}", self.state.ptr());

        let mut queue = RunQueue::new();
        for idx in 0..self.devices.len() {
            queue.push(Task::Poll(idx));
        }
        queue.push(Task::Tick);

        let ret = queue.run(|task| match task {
            Task::Poll(idx) => {
                self.devices[idx].poll(&mut self.state);
                Step::Continue
            },
            Task::Tick => match self.run_ins() {
                Ok(ExecRet::Halt) => Step::Stop(Ok(Stop::Halt)),
                Ok(_) if self.budget_exhausted() => Step::Stop(Ok(Stop::BudgetExhausted)),
                Ok(_) => Step::Continue,
                Err(fault) => Step::Stop(Err(fault)),
            },
        });
        let Some(ret) = ret else {
            unreachable!("CPU task left the run queue without stopping");
        };

        for dev in self.devices.iter_mut() {
            dev.flush();
        }

        match &ret {
            Ok(stop) => info!("Stopped ({stop}) at {} after {} instructions", self.state.ptr(), self.state.num_ins()),
            Err(fault) => error!("{fault} after {} instructions", self.state.num_ins()),
        }
        ret
    }

    fn budget_exhausted(&self) -> bool {
        self.max_ins.is_some_and(|max| self.state.num_ins() >= max)
    }

    // Execute the instruction at ptr and move ptr to the next one. A halt
    // leaves ptr on the HLT, and a fault leaves it on the faulting instruction.
    pub fn run_ins(&mut self) -> Result<ExecRet, Fault> {
        let ptr = self.state.ptr();
        let word = self.state.mem().read(ptr);
        let Some(ins) = Ins::decode(word) else {
            return Err(Fault::UnrecognizedOpcode{addr: ptr, word, opcode: word >> Opcode::SHIFT});
        };
        debug!("@{ptr}: {} {} {}", ins.mnemonic(), ins.lo(), ins.hi());

        let ret = self.exec(&ins).map_err(|source| Fault::Memory{addr: ptr, word, source})?;
        self.state.inc_ins();

        let next = match ret {
            ExecRet::Halt => return Ok(ret),
            ExecRet::Jump(target) => u64::from(target),
            ExecRet::Ok => u64::from(ptr) + 1,
        };

        let len = self.state.mem().len();
        match u32::try_from(next) {
            Ok(next) if next as usize <= len => self.state.set_ptr(next),
            _ => return Err(Fault::SegmentationFault{ptr: next, len}),
        }
        Ok(ret)
    }

    // A plain operand is its own value. A reference is the word it points at.
    fn resolve(&self, operand: Operand) -> u32 {
        let val = u32::from(operand.val);
        if operand.is_ref {
            self.state.mem().read(val)
        } else {
            val
        }
    }

    fn exec(&mut self, ins: &Ins) -> Result<ExecRet, MemError> {
        let lo = self.resolve(ins.lo());
        let hi = self.resolve(ins.hi());
        let mem = self.state.mem_mut();

        match ins.op() {
            Opcode::Nul => (),
            Opcode::Sta => {
                let acc = mem.read_acc();
                mem.write_word(lo, acc);
            },
            Opcode::Lda => mem.write_acc(lo),
            Opcode::Inc => {
                let val = i64::from(mem.read(lo)) + 1;
                mem.write(lo, val)?;
            },
            Opcode::Dec => {
                let val = i64::from(mem.read(lo)) - 1;
                mem.write(lo, val)?;
            },
            Opcode::Add => {
                let sum = mem.read(lo).wrapping_add(mem.read(hi)) & ARITH_MASK;
                mem.write_word(lo, sum);
            },
            // hi is a literal here, not an address.
            Opcode::Sub => {
                let diff = mem.read(lo).wrapping_sub(hi) & ARITH_MASK;
                mem.write_word(lo, diff);
            },
            Opcode::Jmp => return Ok(ExecRet::Jump(lo)),
            Opcode::Mov => {
                let val = mem.read(hi);
                mem.write_word(lo, val);
            },
            Opcode::Cmp => {
                let less = mem.read(lo) < mem.read(hi);
                mem.set_flag_cmp(less);
            },
            Opcode::Bra => if mem.flag_cmp() == 0 {
                return Ok(ExecRet::Jump(lo));
            },
            Opcode::Brb => if mem.flag_cmp() == 1 {
                return Ok(ExecRet::Jump(lo));
            },
            Opcode::Hlt => return Ok(ExecRet::Halt),
        }
        Ok(ExecRet::Ok)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
