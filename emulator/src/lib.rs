pub mod emulator;
pub mod emulator_state;
pub mod io;
pub mod run_queue;

pub use emulator::{Emulator, ExecRet, Fault, Stop};
pub use emulator_state::EmulatorState;
pub use io::MMIOHandler;
