use std::fmt;

/// Chunk width (X axis) in voxels.
pub const CHUNK_SIZE_X: usize = 16;
/// Chunk height (Y axis) in voxels.
pub const CHUNK_SIZE_Y: usize = 256;
/// Chunk depth (Z axis) in voxels.
pub const CHUNK_SIZE_Z: usize = 16;
/// Total voxel count per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z;

/// Block identifier referencing the block table.
pub type BlockId = u16;

/// Reserved ID for air.
pub const BLOCK_AIR: BlockId = 0;
/// ID for stone.
pub const BLOCK_STONE: BlockId = 1;
/// ID for dirt.
pub const BLOCK_DIRT: BlockId = 2;
/// ID for grass-topped dirt.
pub const BLOCK_GRASS: BlockId = 3;
/// ID for sand.
pub const BLOCK_SAND: BlockId = 4;
/// ID for water (source or flowing, treated alike here).
pub const BLOCK_WATER: BlockId = 5;
/// ID for lava.
pub const BLOCK_LAVA: BlockId = 6;
/// ID for bedrock, the unbreakable world floor.
pub const BLOCK_BEDROCK: BlockId = 7;
/// ID for obsidian.
pub const BLOCK_OBSIDIAN: BlockId = 8;
/// ID for oak logs.
pub const BLOCK_OAK_LOG: BlockId = 9;
/// ID for oak planks.
pub const BLOCK_OAK_PLANKS: BlockId = 10;
/// ID for leaves.
pub const BLOCK_LEAVES: BlockId = 11;
/// ID for tall grass decoration.
pub const BLOCK_TALL_GRASS: BlockId = 12;
/// ID for the crafting table.
pub const BLOCK_CRAFTING_TABLE: BlockId = 13;
/// ID for coal ore.
pub const BLOCK_COAL_ORE: BlockId = 14;
/// ID for iron ore.
pub const BLOCK_IRON_ORE: BlockId = 15;
/// ID for gold ore.
pub const BLOCK_GOLD_ORE: BlockId = 16;
/// ID for diamond ore.
pub const BLOCK_DIAMOND_ORE: BlockId = 17;
/// ID for the furnace.
pub const BLOCK_FURNACE: BlockId = 18;
/// ID for TNT.
pub const BLOCK_TNT: BlockId = 19;
/// ID for an oak door cell.
pub const BLOCK_OAK_DOOR: BlockId = 20;
/// ID for the head half of a bed.
pub const BLOCK_BED_HEAD: BlockId = 21;
/// ID for the foot half of a bed.
pub const BLOCK_BED_FOOT: BlockId = 22;
/// ID for a torch.
pub const BLOCK_TORCH: BlockId = 23;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    /// Static per-block capabilities consulted by the simulation.
    pub struct BlockFlags: u8 {
        /// Liquid cells: never valid ground, never carved by explosions.
        const LIQUID = 0b0000_0001;
        /// Decorative vegetation: skipped when scanning for ground.
        const FOLIAGE = 0b0000_0010;
        /// Survives any explosion.
        const BLAST_IMMUNE = 0b0000_0100;
        /// Re-ignites instead of being destroyed when caught in a blast.
        const EXPLOSIVE = 0b0000_1000;
        /// Participates in the linked-pair table (doors, beds).
        const LINKED = 0b0001_0000;
    }
}

/// Look up the static flags for a block id.
///
/// Unknown ids get empty flags, which makes them plain destructible solids.
pub fn block_flags(id: BlockId) -> BlockFlags {
    match id {
        BLOCK_WATER | BLOCK_LAVA => BlockFlags::LIQUID | BlockFlags::BLAST_IMMUNE,
        BLOCK_LEAVES | BLOCK_TALL_GRASS | BLOCK_TORCH => BlockFlags::FOLIAGE,
        BLOCK_BEDROCK | BLOCK_OBSIDIAN => BlockFlags::BLAST_IMMUNE,
        BLOCK_TNT => BlockFlags::EXPLOSIVE,
        BLOCK_OAK_DOOR | BLOCK_BED_HEAD | BLOCK_BED_FOOT => BlockFlags::LINKED,
        _ => BlockFlags::empty(),
    }
}

/// Whether a block counts as solid ground for mobs and spawn checks.
pub fn is_ground(id: BlockId) -> bool {
    id != BLOCK_AIR && !block_flags(id).intersects(BlockFlags::LIQUID | BlockFlags::FOLIAGE)
}

/// A block-aligned world position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chunk containing this position.
    pub fn chunk(self) -> ChunkPos {
        ChunkPos {
            x: self.x.div_euclid(CHUNK_SIZE_X as i32),
            z: self.z.div_euclid(CHUNK_SIZE_Z as i32),
        }
    }

    /// Euclidean distance between the centers of two cells.
    pub fn distance_to(self, other: BlockPos) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        let dz = (self.z - other.z) as f64;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance from this cell's center to an arbitrary point.
    pub fn distance_to_point(self, x: f64, y: f64, z: f64) -> f64 {
        let dx = self.x as f64 + 0.5 - x;
        let dy = self.y as f64 + 0.5 - y;
        let dz = self.z as f64 + 0.5 - z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Chunk coordinate (X,Z) in chunk space.
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, then z).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Chunk storing a dense block array plus the remesh version counter.
pub struct Chunk {
    position: ChunkPos,
    blocks: Vec<BlockId>,
    version: u64,
}

impl Chunk {
    /// Allocate a fresh chunk filled with air.
    pub fn new(position: ChunkPos) -> Self {
        Self {
            position,
            blocks: vec![BLOCK_AIR; CHUNK_VOLUME],
            version: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < CHUNK_SIZE_X);
        debug_assert!(y < CHUNK_SIZE_Y);
        debug_assert!(z < CHUNK_SIZE_Z);
        (y * CHUNK_SIZE_Z + z) * CHUNK_SIZE_X + x
    }

    /// Fetch a block id at chunk-local coordinates.
    pub fn block(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[Self::index(x, y, z)]
    }

    /// Overwrite a block at chunk-local coordinates.
    ///
    /// Does not touch the version counter; callers bump it so batch edits can
    /// bump once per chunk.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        self.blocks[Self::index(x, y, z)] = id;
    }

    /// Monotonic change counter consumed by the external remesher.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bump the version counter, returning the new value.
    pub fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }
}
