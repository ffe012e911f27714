//! An instruction-level MOS 6502 emulator.
//!
//! [`Cpu`] owns the register file and a flat 64KB [`Memory`]. Load a memory
//! image (vectors included), call [`Cpu::reset`], then drive it with
//! [`Cpu::step`] or [`Cpu::run`]. Decimal mode and undocumented opcodes are
//! not emulated.

pub mod addressing;
pub mod cpu;
pub mod disassembler;
pub mod error;
pub mod instructions;
pub mod memory;
pub mod opcodes;
pub mod status;

pub use addressing::{AddressingMode, EffectiveLocation, IndexPenalty};
pub use cpu::{Cpu, DecodedOpcode, Interrupt, TerminationReason, RESET_CYCLES};
pub use error::{DecodeError, EncodeError, StackBoundaryNotice};
pub use instructions::{Instruction, Operand};
pub use memory::{Memory, IRQ_VECTOR, MEMORY_SIZE, NMI_VECTOR, RESET_VECTOR};
pub use opcodes::{Mnemonic, OPCODE_TABLE};
pub use status::{Flag, ProcessorStatus};
