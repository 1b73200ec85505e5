use std::io::{stdout, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::EmulatorState;
use crate::io::MMIOHandler;
use common::constants::IO_ADDR;

use log::{debug, error, warn};

pub trait Printer: Send + Sync {
    fn write(&self, text: &str);
}

#[derive(Default, Clone, Copy)]
struct StdoutPrinter();

impl Printer for StdoutPrinter {
    fn write(&self, text: &str) {
        let mut out = stdout().lock();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            error!("Teleprinter: error writing to stdout: {e}");
        }
    }
}

const STDOUT: StdoutPrinter = StdoutPrinter();


#[derive(Default)]
pub struct PipePrinter {
    buf: Mutex<String>,
}

impl Printer for PipePrinter {
    fn write(&self, text: &str) {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner).push_str(text);
    }
}

impl PipePrinter {
    pub fn take(&self) -> String {
        let mut buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *buf)
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

////////////////////////////////////////////////////////////////////////////////

// Drains the output port. A non-zero word there is a character waiting to be
// printed; the device acknowledges it by writing the port back to zero.
pub struct Teleprinter {
    device: Arc<dyn Printer>,
    buf: Vec<u32>,
}

impl Default for Teleprinter {
    fn default() -> Self {
        Teleprinter::new_to_stdout()
    }
}

impl Teleprinter {
    pub const ADDR: u32 = IO_ADDR;

    pub fn new_to_stdout() -> Self {
        Self::new(Arc::new(STDOUT))
    }

    pub fn new(printer: Arc<dyn Printer>) -> Self {
        Teleprinter{
            device: printer,
            buf: vec![],
        }
    }

    fn to_char(val: u32) -> char {
        char::from_u32(val).unwrap_or_else(|| {
            warn!("Teleprinter: {val:#x} is not a valid code point");
            char::REPLACEMENT_CHARACTER
        })
    }
}

impl MMIOHandler for Teleprinter {
    fn poll(&mut self, state: &mut EmulatorState) {
        let val = state.mem().read(Self::ADDR);
        if val != 0 {
            debug!("Teleprinter: read {val:#x}");
            self.buf.push(val);
            state.mem_mut().write_word(Self::ADDR, 0);
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let text: String = self.buf.drain(..).map(Self::to_char).collect();
        debug!("Teleprinter: flushing {text:?}");
        self.device.write(&text);
    }
}
