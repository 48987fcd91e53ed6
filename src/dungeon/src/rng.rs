//src/dungeon/src/rng.rs
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Seed for floor `floor` of the run seeded with `run_seed`.
///
/// Floors are independent of each other, so regenerating one floor never
/// shifts the layout of the next.
pub fn floor_seed(run_seed: u64, floor: u32) -> u64 {
    let mut bytes = [0u8; 12];
    bytes[..8].copy_from_slice(&run_seed.to_le_bytes());
    bytes[8..].copy_from_slice(&floor.to_le_bytes());
    seahash::hash(&bytes)
}

/// 地牢专用的确定性RNG，只序列化种子
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct DungeonRng {
    rng: Pcg32,
    seed: u64,
}

impl DungeonRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// RNG for one floor of a run.
    pub fn for_floor(run_seed: u64, floor: u32) -> Self {
        Self::new(floor_seed(run_seed, floor))
    }

    /// 获取当前种子值
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 重置RNG状态（使用当前种子）
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
    }
}

impl From<u64> for DungeonRng {
    fn from(seed: u64) -> Self {
        Self::new(seed)
    }
}

impl From<DungeonRng> for u64 {
    fn from(rng: DungeonRng) -> Self {
        rng.seed
    }
}

impl RngCore for DungeonRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }
}
