use crate::machine::{run, run_with};
use common::constants::*;
use emu_lib::Stop;

fn branch(ins: &str, flag: u32, should_take: bool) {
    let asm = format!("
        {ins} taken

        LDA 1
        HLT

    taken:
        LDA 2
        HLT
    ");

    let r = run_with(&asm, |emu| emu.mem_mut().write_word(FLAG_ADDR, flag));
    assert_eq!(r.ret, Ok(Stop::Halt));
    let taken = match r.emu.mem().read_acc() {
        1 => false,
        2 => true,
        acc => panic!("Invalid acc: {acc}"),
    };
    assert_eq!(taken, should_take, "{ins} with flag {flag}");
}

#[test]
fn jmp() {
    branch("JMP", 0, true);
    branch("JMP", 1, true);
}

#[test]
fn bra() {
    branch("BRA", 0, true);
    branch("BRA", 1, false);
}

#[test]
fn brb() {
    branch("BRB", 0, false);
    branch("BRB", 1, true);
}

#[test]
fn cmp_flag() {
    for (a, b, flag) in [(3, 5, 1), (5, 3, 0), (4, 4, 0), (0, u32::MAX, 1)] {
        let r = run_with("CMP 200, 201\nHLT", |emu| {
            emu.mem_mut().write_word(200, a);
            emu.mem_mut().write_word(201, b);
            emu.mem_mut().write_word(FLAG_ADDR, 7);
        });
        assert_eq!(r.mem(FLAG_ADDR), flag, "CMP {a}, {b}");
    }
}

#[test]
fn cmp_then_branch() {
    let asm = "
        CMP 3, 5
        BRA not_less
        BRB less
        HLT
    not_less:
        LDA 1
        HLT
    less:
        LDA 2
        HLT
    ";
    let r = run_with(asm, |emu| {
        emu.mem_mut().write_word(3, 3);
        emu.mem_mut().write_word(5, 5);
    });
    assert_eq!(r.mem(FLAG_ADDR), 1);
    assert_eq!(r.emu.mem().read_acc(), 2);
}

#[test]
fn backward_branch_loop() {
    let asm = "
        LDA 5
        STA 201
    loop: INC 200
        CMP 200, 201
        BRB loop
        HLT
    ";
    let r = run(asm);
    assert_eq!(r.ret, Ok(Stop::Halt));
    assert_eq!(r.mem(200), 5);
    assert_eq!(r.mem(FLAG_ADDR), 0);
}
