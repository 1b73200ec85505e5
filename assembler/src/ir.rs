use common::asm::Opcode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinOp {
    pub fn to_char(self) -> char {
        use BinOp::*;
        match self {
            Add => '+',
            Sub => '-',
            Mul => '*',
            Div => '/',
            Rem => '%',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Num(i64),
    Label(String),
    Neg(Box<Expr>),
    Op(Box<Expr>, BinOp, Box<Expr>),
}

// One comma-separated operand. A leading '@' sets the reference bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub is_ref: bool,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    pub op: Opcode,
    pub args: Vec<Arg>,
}

// A prepared source line. Each occupies exactly one word of the program, so
// its index among the prepared lines fixes its address.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub line: usize, // 1-based, in the original source
    pub label_def: Option<String>,
    pub cmd: Option<Cmd>,
}

impl Stmt {
    pub fn new(line: usize, label_def: Option<String>, cmd: Option<Cmd>) -> Stmt {
        Stmt{line, label_def, cmd}
    }

    // Label-only lines still take up a slot, filled with a NUL.
    pub fn is_label_only(&self) -> bool {
        self.label_def.is_some() && self.cmd.is_none()
    }
}
