pub mod teleprinter;

use crate::EmulatorState;

// A device gets one poll per activation of its task on the run queue, and
// talks to the program only through memory.
pub trait MMIOHandler: Send {
    fn poll(&mut self, state: &mut EmulatorState);

    // Called once when the machine stops, for whatever reason.
    fn flush(&mut self) {}
}
