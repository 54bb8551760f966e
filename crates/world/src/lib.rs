mod ai;
mod block_event;
mod chunk;
mod crafting;
mod inventory;
mod mob;
mod smelting;
mod time;
mod world;

pub use ai::*;
pub use block_event::*;
pub use chunk::*;
pub use crafting::*;
pub use inventory::*;
pub use mob::*;
pub use smelting::*;
pub use time::*;
pub use world::*;
