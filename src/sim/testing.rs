//! Test helpers for forcing random branches

use rand::RngCore;

/// An RNG that always yields the same word.
///
/// `FixedRng::low()` makes every `random::<f32>()` return 0.0 (every chance
/// roll succeeds); `FixedRng::high()` returns just under 1.0 (every roll fails).
pub struct FixedRng(pub u32);

impl FixedRng {
    pub fn low() -> Self {
        FixedRng(0)
    }

    pub fn high() -> Self {
        FixedRng(u32::MAX)
    }
}

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.0) << 32) | u64::from(self.0)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.0.to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
