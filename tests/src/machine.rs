use as_lib::assemble;
use emu_lib::io::teleprinter::{PipePrinter, Teleprinter};
use emu_lib::{Emulator, Fault, Stop};

use std::sync::Arc;

pub struct Run {
    pub emu: Emulator,
    pub out: Arc<PipePrinter>,
    pub ret: Result<Stop, Fault>,
}

impl Run {
    pub fn mem(&self, addr: u32) -> u32 {
        self.emu.mem().read(addr)
    }
}

// Assembles and loads the program, lets the caller poke at the machine, then
// runs it with the teleprinter output captured.
pub fn run_with(asm: &str, setup: impl FnOnce(&mut Emulator)) -> Run {
    let prog = assemble(asm).unwrap();
    let out = Arc::new(PipePrinter::default());

    let mut emu = Emulator::new();
    emu.set_mmio_handler(Teleprinter::new(out.clone()));
    emu.load_program(&prog.ins).unwrap();
    setup(&mut emu);

    let ret = emu.run();
    Run{emu, out, ret}
}

pub fn run(asm: &str) -> Run {
    run_with(asm, |_| ())
}
