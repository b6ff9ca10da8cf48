use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

// Spin jitter sources. The live game draws from the thread RNG; replays and
// simulations use a seeded HMAC-SHA256 stream so a run can be repeated.

pub type HmacSha256 = Hmac<Sha256>;

/// Source of the random extra turns added to each reel's spin.
pub trait Jitter {
    /// A value in `0..bound`. `bound` of zero yields zero.
    fn next_below(&mut self, bound: u32) -> u32;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadJitter;

impl Jitter for ThreadJitter {
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..bound)
    }
}

pub fn derive_floats(hmac_bytes: &[u8], count: usize) -> Vec<f64> {
    use sha2::Digest;
    // Successive 4-byte chunks as big-endian u32 mapped to [0,1)
    let mut out = Vec::with_capacity(count);
    let mut buffer = hmac_bytes.to_vec();
    let mut i = 0usize;
    while out.len() < count {
        if i + 4 > buffer.len() {
            buffer = Sha256::digest(&buffer).to_vec();
            i = 0;
            continue;
        }
        let chunk = &buffer[i..i + 4];
        let v = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        out.push((v as f64) / (u32::MAX as f64 + 1.0));
        i += 4;
    }
    out
}

/// Deterministic jitter keyed by a seed. Every block of draws is the
/// HMAC-SHA256 of `"jitter:<nonce>"`; the nonce advances when a block runs dry.
pub struct SeededJitter {
    seed: String,
    nonce: u64,
    pending: Vec<f64>,
}

impl SeededJitter {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            nonce: 0,
            pending: Vec::new(),
        }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    fn hmac_bytes(&self) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(self.seed.as_bytes()).expect("HMAC key");
        mac.update(format!("jitter:{}", self.nonce).as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }

    fn next_float(&mut self) -> f64 {
        if self.pending.is_empty() {
            let mut block = derive_floats(&self.hmac_bytes(), 8);
            block.reverse();
            self.pending = block;
            self.nonce += 1;
        }
        self.pending.pop().unwrap_or_default()
    }
}

impl Jitter for SeededJitter {
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        let v = (self.next_float() * bound as f64).floor() as u32;
        v.min(bound - 1)
    }
}
