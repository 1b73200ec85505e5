use crate::machine::{run, run_with};
use common::constants::IO_ADDR;
use emu_lib::{Fault, Stop};

#[test]
fn echo() {
    let r = run("LDA 65\nSTA 0\nHLT");
    assert_eq!(r.ret, Ok(Stop::Halt));
    assert_eq!(r.out.take(), "A");
    assert_eq!(r.mem(IO_ADDR), 0);
}

#[test]
fn hello() {
    let r = run(include_str!("../../demos/hello.lrc"));
    assert_eq!(r.ret, Ok(Stop::Halt));
    assert_eq!(r.out.take(), "Hello, world!\n");
}

#[test]
fn repeated_char() {
    // The same value written twice is two characters, since the device
    // clears the port in between.
    let r = run("LDA 122\nSTA 0\nSTA 0\nSTA 0\nHLT");
    assert_eq!(r.out.take(), "zzz");
}

#[test]
fn silent() {
    let r = run("INC 200\nHLT");
    assert!(r.out.is_empty());
}

#[test]
fn mov_to_port() {
    let r = run_with("MOV 0, 200\nHLT", |emu| emu.mem_mut().write_word(200, 'é' as u32));
    assert_eq!(r.out.take(), "é");
    assert_eq!(r.mem(200), 'é' as u32);
}

#[test]
fn pending_before_first_ins() {
    // The device is polled before the first instruction.
    let r = run_with("HLT", |emu| emu.mem_mut().write_word(IO_ADDR, 'q' as u32));
    assert_eq!(r.out.take(), "q");
}

#[test]
fn output_kept_on_fault() {
    let r = run("LDA 33\nSTA 0\nDEC 200\nHLT");
    assert!(matches!(r.ret, Err(Fault::Memory{..})));
    assert_eq!(r.out.take(), "!");
}

#[test]
fn invalid_code_point() {
    let r = run_with("MOV 0, 200\nHLT", |emu| emu.mem_mut().write_word(200, 0xd800));
    assert_eq!(r.out.take(), "\u{fffd}");
}
