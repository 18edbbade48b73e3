//! Small deterministic PRNG for effects.

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// `SplitMix64` generator
///
/// Not cryptographic; good enough to scatter sparks and needs no hardware
/// entropy source.
#[derive(Debug, Clone)]
pub struct SplitMix {
    state: u64,
}

impl SplitMix {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Top `n` bits of the next output, `n` in `1..=32`
    pub fn bits(&mut self, n: u32) -> u32 {
        (self.next_u64() >> (64 - n.clamp(1, 32))) as u32
    }

    /// Uniform-ish value in `0..bound`; zero when `bound` is zero
    pub fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        (self.next_u64() % bound as u64) as usize
    }

    pub fn coin(&mut self) -> bool {
        self.bits(1) == 1
    }
}
