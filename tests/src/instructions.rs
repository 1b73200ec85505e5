use crate::machine::{run, run_with};
use as_lib::assemble;
use common::asm::{Ins, Opcode};
use common::constants::*;
use emu_lib::Stop;

#[test]
fn nul() {
    let r = run("NUL\nNUL\nHLT");
    assert_eq!(r.ret, Ok(Stop::Halt));
    assert_eq!(r.emu.num_ins(), 3);
    assert_eq!(r.emu.ptr(), PROG_START + 2);
}

#[test]
fn lda_sta() {
    let r = run("LDA 7\nSTA 200\nHLT");
    assert_eq!(r.ret, Ok(Stop::Halt));
    assert_eq!(r.mem(ACC_ADDR), 7);
    assert_eq!(r.mem(200), 7);
}

#[test]
fn lda_is_immediate() {
    let r = run_with("LDA 200\nHLT", |emu| emu.mem_mut().write_word(200, 99));
    assert_eq!(r.emu.mem().read_acc(), 200);
}

#[test]
fn inc_dec_inverse() {
    for val in [0, 1, 41, 65535, u32::MAX - 1] {
        let r = run_with("INC 200\nDEC 200\nHLT", |emu| emu.mem_mut().write_word(200, val));
        assert_eq!(r.ret, Ok(Stop::Halt));
        assert_eq!(r.mem(200), val, "INC then DEC of {val}");
    }
}

#[test]
fn inc_not_wrapped() {
    // Only ADD and SUB reduce modulo 2^16.
    let r = run_with("INC 200\nHLT", |emu| emu.mem_mut().write_word(200, 65535));
    assert_eq!(r.mem(200), 65536);
}

#[test]
fn add() {
    let r = run_with("ADD 200, 201\nHLT", |emu| {
        emu.mem_mut().write_word(200, 3);
        emu.mem_mut().write_word(201, 4);
    });
    assert_eq!(r.mem(200), 7);
    assert_eq!(r.mem(201), 4);
}

#[test]
fn add_wraps() {
    let r = run_with("ADD 200, 201\nHLT", |emu| {
        emu.mem_mut().write_word(200, 65535);
        emu.mem_mut().write_word(201, 2);
    });
    assert_eq!(r.mem(200), 1);
}

#[test]
fn sub_literal() {
    let r = run_with("SUB 200, 3\nHLT", |emu| {
        emu.mem_mut().write_word(200, 10);
        emu.mem_mut().write_word(3, 100);
    });
    assert_eq!(r.mem(200), 7);
}

#[test]
fn sub_wraps() {
    let r = run_with("SUB 200, 2\nHLT", |emu| emu.mem_mut().write_word(200, 1));
    assert_eq!(r.mem(200), 65535);

    let r = run("SUB 200, 1\nHLT");
    assert_eq!(r.mem(200), 0xffff);
}

#[test]
fn sub_masks_high_bits() {
    let r = run_with("SUB 200, 0\nHLT", |emu| emu.mem_mut().write_word(200, 0x1_2345));
    assert_eq!(r.mem(200), 0x2345);
}

#[test]
fn mov() {
    let r = run_with("MOV 200, 201\nHLT", |emu| emu.mem_mut().write_word(201, 0xdead_beef));
    assert_eq!(r.mem(200), 0xdead_beef);
    assert_eq!(r.mem(201), 0xdead_beef);
}

#[test]
fn hlt_stops() {
    let r = run("HLT\nINC 200\nHLT");
    assert_eq!(r.ret, Ok(Stop::Halt));
    assert_eq!(r.mem(200), 0);
    assert_eq!(r.emu.ptr(), PROG_START);
}

#[test]
fn assembled_words_decode() {
    let asm = "
        NUL
        STA 1
        LDA 2
        INC 3
        DEC 4
        ADD 5, 6
        SUB 7, 4095
        JMP 9
        MOV 10, 11
        CMP 12, 13
        BRA 14
        BRB 15
        HLT
    ";
    let prog = assemble(asm).unwrap();
    let mut mem = common::mem::Memory::new();
    mem.load_program(&prog.ins).unwrap();

    let expected = [
        ("NUL", 0, 0), ("STA", 1, 0), ("LDA", 2, 0), ("INC", 3, 0), ("DEC", 4, 0),
        ("ADD", 5, 6), ("SUB", 7, 4095), ("JMP", 9, 0), ("MOV", 10, 11), ("CMP", 12, 13),
        ("BRA", 14, 0), ("BRB", 15, 0), ("HLT", 0, 0),
    ];
    for ((mnemonic, lo, hi), addr) in expected.into_iter().zip(PROG_START..) {
        let ins = Ins::decode(mem.read(addr)).unwrap();
        assert_eq!(ins.mnemonic(), mnemonic);
        assert_eq!(ins.lo().val, lo);
        assert_eq!(ins.hi().val, hi);
        assert!(!ins.lo().is_ref && !ins.hi().is_ref);
    }
    assert_eq!(prog.ins.len(), Opcode::ALL.len());
}
