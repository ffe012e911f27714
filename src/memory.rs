use crate::error::StackBoundaryNotice;

pub const MEMORY_SIZE: usize = 0x10000;

pub const STACK_PAGE: u16 = 0x0100;
pub const STACK_PAGE_END: u16 = 0x01FF;

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Flat 64KB address space.
///
/// Every access primitive takes the cycle counter it charges, one cycle per
/// byte touched. `peek`/`poke` are for loaders and inspectors and charge
/// nothing.
#[derive(Clone, Eq, PartialEq)]
pub struct Memory {
    data: Vec<u8>,
}

impl Default for Memory {
    fn default() -> Self {
        return Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Memory {{ vectors: NMI {:04X}, RESET {:04X}, IRQ {:04X} }}",
                                 self.peek_word(NMI_VECTOR),
                                 self.peek_word(RESET_VECTOR),
                                 self.peek_word(IRQ_VECTOR)))
    }
}

impl Memory {
    pub fn new() -> Self {
        return Self {
            data: vec![0; MEMORY_SIZE],
        }
    }

    pub fn from_image(image: &[u8; MEMORY_SIZE]) -> Self {
        return Self {
            data: image.to_vec(),
        }
    }

    /// Copies `bytes` in starting at `start`, wrapping past 0xFFFF.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        let mut address = start;
        for &byte in bytes {
            self.poke(address, byte);
            address = address.wrapping_add(1);
        }
    }

    pub fn read(&self, address: u16, cycles: &mut u64) -> u8 {
        *cycles += 1;
        return self.data[address as usize]
    }

    pub fn read_and_advance(&self, address: &mut u16, cycles: &mut u64) -> u8 {
        let byte = self.read(*address, cycles);
        *address = address.wrapping_add(1);
        return byte
    }

    pub fn read_word(&self, address: u16, cycles: &mut u64) -> u16 {
        let word_lo = self.read(address, cycles);
        let word_hi = self.read(address.wrapping_add(1), cycles);
        return u16::from_le_bytes([word_lo, word_hi])
    }

    pub fn read_word_and_advance(&self, address: &mut u16, cycles: &mut u64) -> u16 {
        let word_lo = self.read_and_advance(address, cycles);
        let word_hi = self.read_and_advance(address, cycles);
        return u16::from_le_bytes([word_lo, word_hi])
    }

    /// Reads a pointer stored in the zero page. The high byte of a pointer
    /// at 0xFF comes from 0x00, not 0x100.
    pub fn read_zero_page_word(&self, address: u8, cycles: &mut u64) -> u16 {
        let word_lo = self.read(address as u16, cycles);
        let word_hi = self.read(address.wrapping_add(1) as u16, cycles);
        return u16::from_le_bytes([word_lo, word_hi])
    }

    pub fn write(&mut self, address: u16, value: u8, cycles: &mut u64) -> Option<StackBoundaryNotice> {
        *cycles += 1;
        self.data[address as usize] = value;

        if is_stack_page(address) {
            return Some(StackBoundaryNotice { address, value })
        }
        return None
    }

    /// Writes at `0x0100 + sp` and moves the stack pointer down.
    pub fn push(&mut self, sp: &mut u8, value: u8, cycles: &mut u64) {
        *cycles += 1;
        self.data[stack_address(*sp) as usize] = value;
        *sp = sp.wrapping_sub(1);
    }

    /// Moves the stack pointer up and reads at `0x0100 + sp`.
    pub fn pull(&self, sp: &mut u8, cycles: &mut u64) -> u8 {
        *sp = sp.wrapping_add(1);
        return self.read(stack_address(*sp), cycles)
    }

    pub fn peek(&self, address: u16) -> u8 {
        return self.data[address as usize]
    }

    pub fn peek_word(&self, address: u16) -> u16 {
        return u16::from_le_bytes([self.peek(address), self.peek(address.wrapping_add(1))])
    }

    pub fn poke(&mut self, address: u16, value: u8) {
        self.data[address as usize] = value;
    }

    pub fn poke_word(&mut self, address: u16, value: u16) {
        let [word_lo, word_hi] = value.to_le_bytes();
        self.poke(address, word_lo);
        self.poke(address.wrapping_add(1), word_hi);
    }
}

pub fn stack_address(sp: u8) -> u16 {
    return STACK_PAGE | sp as u16
}

pub fn is_stack_page(address: u16) -> bool {
    return (STACK_PAGE..=STACK_PAGE_END).contains(&address)
}

pub fn same_page(a: u16, b: u16) -> bool {
    return (a & 0xFF00) == (b & 0xFF00)
}
