use lalrpop_util::lalrpop_mod;

pub mod assembler;
pub mod helpers;
pub mod ir;
pub mod misc;

lalrpop_mod!(grammar, "/grammar.rs");

pub use assembler::{assemble, compile, find_labels, prepare, AsmError, LabelValue, Program, SourceLine};
pub use misc::EvalError;
