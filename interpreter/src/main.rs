use std::process::ExitCode;

use as_lib::assemble;
use emu_lib::{Emulator, Stop};
use emu_lib::io::teleprinter::Teleprinter;

use clap::{Parser, ValueEnum};
use clap_stdin::FileOrStdin;
use log::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> LevelFilter {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// LRC Interpreter: assembles a program and runs it
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Input assembly file, or - for stdin
    input: FileOrStdin,

    /// Print the contents of memory after the run
    #[arg(long)]
    dump: bool,

    /// Log level. Overrides RUST_LOG
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Stop after this many instructions
    #[arg(long)]
    max_ins: Option<usize>,
}

// Exit status when the instruction budget runs out before a HLT.
const EXIT_BUDGET: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(level) = args.log_level {
        logger.filter_level(level.into());
    }
    logger.init();

    let input = match args.input.contents() {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            return ExitCode::FAILURE;
        }
    };

    let prog = match assemble(input.as_str()) {
        Ok(prog) => prog,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut emu = Emulator::new();
    emu.set_mmio_handler(Teleprinter::new_to_stdout());
    emu.set_max_ins(args.max_ins);
    if let Err(e) = emu.load_program(&prog.ins) {
        eprintln!("Error loading program: {e}");
        return ExitCode::FAILURE;
    }

    let ret = emu.run();

    if args.dump {
        println!();
        for entry in emu.mem().dump() {
            println!("{entry}");
        }
    }

    match ret {
        Ok(Stop::Halt) => ExitCode::SUCCESS,
        Ok(Stop::BudgetExhausted) => {
            eprintln!("Stopped after {} instructions without halting", emu.num_ins());
            ExitCode::from(EXIT_BUDGET)
        },
        Err(fault) => {
            eprintln!("{fault}");
            ExitCode::FAILURE
        },
    }
}
