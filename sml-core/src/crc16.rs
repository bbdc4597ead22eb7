//! CRC16 checksum used by SML messages and transport frames
//!
//! SML uses CRC-16/X-25 (polynomial 0x1021 bit-reversed, initial value
//! 0xFFFF, final XOR 0xFFFF). The checksum travels low byte first, so the
//! values returned here are byte-swapped: writing them big-endian yields the
//! wire order.

/// CRC calculation constants
const INITIAL_CRC: u16 = 0xFFFF;
const FINAL_XOR: u16 = 0xFFFF;
const KEY: u16 = 0x8408; // Bit-reversed 1021

/// Precomputed CRC table
static CRC_TABLE: once_cell::sync::Lazy<[u16; 256]> = once_cell::sync::Lazy::new(|| {
    let mut table = [0u16; 256];
    for b in 0..=0xFF {
        let mut v = b as u16;
        for _ in 0..8 {
            if (v & 1) == 1 {
                v = (v >> 1) ^ KEY;
            } else {
                v >>= 1;
            }
        }
        table[b as usize] = v;
    }
    table
});

/// Incremental CRC16 calculator
#[derive(Debug, Clone)]
pub struct Crc16 {
    init: u16,
    final_xor: u16,
    value: u16,
}

impl Crc16 {
    /// Create a new X-25 calculator, the variant mandated by SML
    pub fn new() -> Self {
        Self::with_params(INITIAL_CRC, FINAL_XOR)
    }

    /// Create a Kermit calculator (initial value 0, no final XOR)
    pub fn kermit() -> Self {
        Self::with_params(0x0000, 0x0000)
    }

    fn with_params(init: u16, final_xor: u16) -> Self {
        Self {
            init,
            final_xor,
            value: init,
        }
    }

    /// Reset the calculator to its initial state
    pub fn reset(&mut self) {
        self.value = self.init;
    }

    /// Update the CRC with a single byte
    pub fn update(&mut self, data: u8) {
        self.value = (self.value >> 8) ^ CRC_TABLE[((self.value ^ data as u16) & 0xFF) as usize];
    }

    /// Update the CRC with multiple bytes
    pub fn update_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    /// Checksum in SML order (big-endian encoding gives the wire bytes)
    pub fn value(&self) -> u16 {
        (self.value ^ self.final_xor).swap_bytes()
    }

    /// Checksum as it appears on the wire
    pub fn value_bytes(&self) -> [u8; 2] {
        self.value().to_be_bytes()
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculate the SML CRC16 (X-25) of `data`
pub fn crc16(data: &[u8]) -> u16 {
    let mut calc = Crc16::new();
    calc.update_bytes(data);
    calc.value()
}

/// Calculate the CRC16/Kermit of `data`, emitted by some meter firmwares
/// for the transport frame checksum
pub fn crc16_kermit(data: &[u8]) -> u16 {
    let mut calc = Crc16::kermit();
    calc.update_bytes(data);
    calc.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_check_value() {
        assert_eq!(crc16(b"123456789"), 0x6E90);
    }

    #[test]
    fn test_crc16_kermit_check_value() {
        assert_eq!(crc16_kermit(b"123456789"), 0x8921);
    }

    #[test]
    fn test_incremental_matches_oneshot() {
        let mut calc = Crc16::new();
        calc.update_bytes(b"1234");
        calc.update_bytes(b"56789");
        assert_eq!(calc.value(), crc16(b"123456789"));
        assert_eq!(calc.value_bytes(), [0x6E, 0x90]);
    }

    #[test]
    fn test_crc_reset() {
        let mut calc = Crc16::new();
        calc.update(0x01);
        calc.reset();
        calc.update_bytes(b"123456789");
        assert_eq!(calc.value(), 0x6E90);
    }

    #[test]
    fn test_single_bit_flip_detected() {
        let data = b"123456789".to_vec();
        let reference = crc16(&data);
        for i in 0..data.len() {
            for bit in 0..8 {
                let mut flipped = data.clone();
                flipped[i] ^= 1 << bit;
                assert_ne!(crc16(&flipped), reference, "byte {i} bit {bit}");
            }
        }
    }
}
