use std::process::ExitCode;

use as_lib::assemble;
use common::constants::PROG_START;

use clap::Parser;
use clap_stdin::FileOrStdin;

/// LRC Assembler: prints a listing of the assembled program
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Input assembly file, or - for stdin
    input: FileOrStdin,

    /// Also print the label table
    #[arg(long, short)]
    labels: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
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

    for (ins, addr) in prog.ins.iter().zip(PROG_START..) {
        println!("{addr:>5}  {:08x}  {ins}", ins.value());
    }

    if args.labels {
        let mut labels: Vec<_> = prog.labels.iter().collect();
        labels.sort_by_key(|(_, v)| v.addr);
        println!();
        for (label, v) in labels {
            println!("{label}:\t{}", v.addr);
        }
    }

    ExitCode::SUCCESS
}
