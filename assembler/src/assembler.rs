
use std::collections::HashMap;

use crate::ir::*;
use crate::misc::{eval_expr, parse_arg, EvalError};
use common::asm::*;
use common::constants::PROG_START;

use log::{debug, trace, warn};
use thiserror::Error;

#[derive(Debug)]
pub struct Program {
    pub ins: Vec<Ins>,
    pub labels: HashMap<String, LabelValue>,
}

impl Program {
    pub fn label_addr(&self, label: &str) -> Option<u32> {
        self.labels.get(label).map(|x| x.addr)
    }
}

pub fn assemble(prog: &str) -> Result<Program, AsmError> {
    let lines = prepare(prog);
    let labels = find_labels(&lines)?;
    let ins = compile(&lines, &labels)?;
    Ok(Program{ins, labels})
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelValue {
    pub addr: u32,
    pub line: usize,
}

#[derive(Debug, Error)]
pub enum AsmError {
    #[error("Line {line}: unrecognized instruction \"{text}\"")]
    UnrecognizedInstruction { line: usize, text: String },

    #[error("Line {line}: label '{label}' conflicts with previous definition on line {first}")]
    DuplicateLabel { label: String, line: usize, first: usize },

    #[error("Line {line}: {op} takes {expected} operand(s), found {found}")]
    OperandCount { line: usize, op: Opcode, expected: usize, found: usize },

    #[error("Line {line}: \"{text}\": {source}")]
    Eval { line: usize, text: String, source: EvalError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub line: usize, // 1-based
    pub text: &'a str,
}

// Trim every line, dropping blanks and comments.
pub fn prepare(prog: &str) -> Vec<SourceLine<'_>> {
    prog.lines()
        .zip(1..)
        .map(|(text, line)| SourceLine{line, text: text.trim()})
        .filter(|x| !x.text.is_empty() && !x.text.starts_with('#'))
        .collect()
}

// Returns the label name and whatever follows the colon.
fn split_label(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))?;
    let rest = text[end..].strip_prefix(':')?;
    Some((&text[..end], rest.trim()))
}

// A mnemonic must be followed by nothing or a space.
fn split_mnemonic(text: &str) -> Option<(Opcode, &str)> {
    let op = Opcode::from_mnemonic(text.get(..3)?)?;
    let rest = &text[3..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some((op, rest))
}

fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(idx) => &text[..idx],
        None => text,
    }
}

fn parse_cmd(src: &SourceLine) -> Result<Option<Cmd>, AsmError> {
    let Some((op, rest)) = split_mnemonic(src.text) else {
        return Ok(None);
    };

    let operands = strip_comment(rest).trim();
    let mut args = vec![];
    if !operands.is_empty() {
        for part in operands.split(',') {
            let arg = parse_arg(part).map_err(|source| AsmError::Eval{
                line: src.line,
                text: src.text.to_string(),
                source,
            })?;
            args.push(arg);
        }
    }

    if args.len() != op.arity() {
        return Err(AsmError::OperandCount{
            line: src.line,
            op,
            expected: op.arity(),
            found: args.len(),
        });
    }

    Ok(Some(Cmd{op, args}))
}

fn parse_stmt(src: &SourceLine) -> Result<Stmt, AsmError> {
    let unrecognized = || AsmError::UnrecognizedInstruction{
        line: src.line,
        text: src.text.to_string(),
    };

    if let Some((label, rest)) = split_label(src.text) {
        if strip_comment(rest).trim().is_empty() {
            return Ok(Stmt::new(src.line, Some(label.to_string()), None));
        }
        let cmd = parse_cmd(&SourceLine{line: src.line, text: rest})?.ok_or_else(unrecognized)?;
        return Ok(Stmt::new(src.line, Some(label.to_string()), Some(cmd)));
    }

    let cmd = parse_cmd(src)?.ok_or_else(unrecognized)?;
    Ok(Stmt::new(src.line, None, Some(cmd)))
}

// First pass. A label's address is PROG_START plus the index of its line.
pub fn find_labels(lines: &[SourceLine]) -> Result<HashMap<String, LabelValue>, AsmError> {
    let mut labels: HashMap<String, LabelValue> = HashMap::new();
    for (src, addr) in lines.iter().zip(PROG_START..) {
        let Some((label, _)) = split_label(src.text) else {
            continue;
        };

        if let Some(existing) = labels.get(label) {
            return Err(AsmError::DuplicateLabel{
                label: label.to_string(),
                line: src.line,
                first: existing.line,
            });
        }
        trace!("Label \"{label}\" at {addr}, line {}", src.line);
        labels.insert(label.to_string(), LabelValue{addr, line: src.line});
    }
    Ok(labels)
}

fn resolve_arg(arg: &Arg, stmt: &Stmt, text: &str, addrs: &HashMap<String, u32>) -> Result<Operand, AsmError> {
    let val = eval_expr(&arg.expr, addrs).map_err(|source| AsmError::Eval{
        line: stmt.line,
        text: text.to_string(),
        source,
    })?;
    // Negative values are meant to wrap, large positive ones probably aren't.
    if val.val >= 1 << (Operand::VAL_BITS + 1) {
        warn!("Line {}: operand {} truncated to {} bits", stmt.line, val.val, Operand::VAL_BITS + 1);
    }
    let mut operand = Operand::from_i64(val.val);
    operand.is_ref |= arg.is_ref;
    Ok(operand)
}

// Second pass: one instruction per prepared line.
pub fn compile(lines: &[SourceLine], labels: &HashMap<String, LabelValue>) -> Result<Vec<Ins>, AsmError> {
    let addrs: HashMap<String, u32> = labels
        .iter()
        .map(|(k, v)| (k.clone(), v.addr))
        .collect();

    let mut out = Vec::with_capacity(lines.len());
    for (src, addr) in lines.iter().zip(PROG_START..) {
        let stmt = parse_stmt(src)?;

        let ins = match &stmt.cmd {
            None => {
                assert!(stmt.is_label_only());
                Ins::nul()
            },
            Some(cmd) => {
                let mut operands = [Operand::default(); 2];
                for (arg, operand) in cmd.args.iter().zip(operands.iter_mut()) {
                    *operand = resolve_arg(arg, &stmt, src.text, &addrs)?;
                }
                Ins::new(cmd.op, operands[0], operands[1])
            },
        };

        debug!("{addr}: {ins}\t(line {}: {})", src.line, src.text);
        out.push(ins);
    }
    Ok(out)
}
