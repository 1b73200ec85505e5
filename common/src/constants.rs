pub const IO_ADDR: u32 = 0; // Output port, drained by the teleprinter
pub const ACC_ADDR: u32 = 17; // Accumulator
pub const FLAG_ADDR: u32 = 25; // Comparison flag
pub const PROG_START: u32 = 33;

// ADD and SUB operate on 16-bit quantities even though words are 32 bits.
pub const ARITH_MASK: u32 = 0xffff;
