use std::fmt;

use derive_more::IsVariant;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq, Hash, IsVariant)]
pub enum Opcode {
    Nul = 0, // Also emitted for label lines
    Sta,
    Lda,
    Inc,
    Dec,
    Add,
    Sub,
    Jmp,
    Mov,
    Cmp,
    Bra,
    Brb,
    Hlt,
}

impl Opcode {
    pub const NUM_BITS: u32 = 4;
    pub const SHIFT: u32 = u32::BITS - Self::NUM_BITS;
    pub const MASK: u32 = (1u32 << Self::NUM_BITS) - 1;

    pub const ALL: [Opcode; 13] = [
        Opcode::Nul,
        Opcode::Sta,
        Opcode::Lda,
        Opcode::Inc,
        Opcode::Dec,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Jmp,
        Opcode::Mov,
        Opcode::Cmp,
        Opcode::Bra,
        Opcode::Brb,
        Opcode::Hlt,
    ];

    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Nul => "NUL",
            Sta => "STA",
            Lda => "LDA",
            Inc => "INC",
            Dec => "DEC",
            Add => "ADD",
            Sub => "SUB",
            Jmp => "JMP",
            Mov => "MOV",
            Cmp => "CMP",
            Bra => "BRA",
            Brb => "BRB",
            Hlt => "HLT",
        }
    }

    pub fn from_mnemonic(s: &str) -> Option<Opcode> {
        Self::ALL.iter().copied().find(|op| op.mnemonic() == s)
    }

    // Number of operands the assembler expects.
    pub fn arity(self) -> usize {
        use Opcode::*;
        match self {
            Nul | Hlt => 0,
            Sta | Lda | Inc | Dec | Jmp | Bra | Brb => 1,
            Add | Sub | Mov | Cmp => 2,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.mnemonic())
    }
}


////////////////////////////////////////////////////////////////////////////////


/// A 12-bit magnitude plus a reference (indirect) flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Operand {
    pub val: u16,
    pub is_ref: bool,
}

impl Operand {
    pub const VAL_BITS: u32 = 12;
    pub const VAL_MASK: u32 = (1u32 << Self::VAL_BITS) - 1;
    pub const REF_MASK: u32 = 1u32 << Self::VAL_BITS;

    // Width of the lo/hi fields in an encoded instruction. The top bit is reserved.
    pub const FIELD_BITS: u32 = 14;
    pub const FIELD_MASK: u32 = (1u32 << Self::FIELD_BITS) - 1;

    pub fn new(val: u16, is_ref: bool) -> Operand {
        assert!(u32::from(val) <= Self::VAL_MASK, "Operand {val} doesn't fit in {} bits", Self::VAL_BITS);
        Operand{val, is_ref}
    }

    pub fn from_raw(raw: u32) -> Operand {
        Operand{
            val: (raw & Self::VAL_MASK) as u16,
            is_ref: (raw & Self::REF_MASK) != 0,
        }
    }

    // Two's complement truncation, so -1 becomes @4095.
    pub fn from_i64(val: i64) -> Operand {
        Self::from_raw(val as u32)
    }

    pub fn to_raw(self) -> u32 {
        u32::from(self.val) | ((self.is_ref as u32) << Self::VAL_BITS)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_ref {
            write!(f, "@{}", self.val)
        } else {
            write!(f, "{}", self.val)
        }
    }
}


////////////////////////////////////////////////////////////////////////////////


// Instructions are built once, by the assembler or by decoding a word, and are
// never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ins {
    op: Opcode,
    lo: Operand,
    hi: Operand,
    value: u32,
}

impl Ins {
    const LO_SHIFT: u32 = Operand::FIELD_BITS;

    pub fn new(op: Opcode, lo: Operand, hi: Operand) -> Ins {
        let value = (op.to_u32().unwrap() << Opcode::SHIFT)
            | (lo.to_raw() << Self::LO_SHIFT)
            | hi.to_raw();
        Ins{op, lo, hi, value}
    }

    pub fn nul() -> Ins {
        Self::new(Opcode::Nul, Operand::default(), Operand::default())
    }

    pub fn op(&self) -> Opcode {
        self.op
    }

    pub fn mnemonic(&self) -> &'static str {
        self.op.mnemonic()
    }

    pub fn lo(&self) -> Operand {
        self.lo
    }

    pub fn hi(&self) -> Operand {
        self.hi
    }

    // The encoded word, the only thing that is written to memory.
    pub fn value(&self) -> u32 {
        self.value
    }

    // Returns None for the unassigned opcodes 13 through 15. Reserved operand
    // bits are ignored.
    pub fn decode(word: u32) -> Option<Ins> {
        let op = Opcode::from_u32((word >> Opcode::SHIFT) & Opcode::MASK)?;
        let lo = Operand::from_raw((word >> Self::LO_SHIFT) & Operand::FIELD_MASK);
        let hi = Operand::from_raw(word & Operand::FIELD_MASK);
        Some(Self::new(op, lo, hi))
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.arity() {
            0 => write!(f, "{}", self.op),
            1 => write!(f, "{}\t{}", self.op, self.lo),
            _ => write!(f, "{}\t{}, {}", self.op, self.lo, self.hi),
        }
    }
}
