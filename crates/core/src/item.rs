//! Item identifiers and per-item static data.
//!
//! Items are a closed enum rather than free-form ids so crafting grids and
//! drop tables stay exhaustively matchable. String keys exist for configs,
//! recipe JSON, and logging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown item key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown item key `{key}`")]
pub struct ItemParseError {
    /// The offending input.
    pub key: String,
}

/// Item type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    // Blocks as items
    /// Stone block item.
    Stone,
    /// Cobblestone, dropped by stone.
    Cobblestone,
    /// Dirt block item.
    Dirt,
    /// Sand block item.
    Sand,
    /// Oak log.
    OakLog,
    /// Oak planks.
    OakPlanks,
    /// Crafting table block item.
    CraftingTable,
    /// Furnace block item.
    Furnace,
    /// Torch.
    Torch,
    /// TNT block item.
    Tnt,
    /// Oak door item (places the linked door pair).
    OakDoor,
    /// Bed item (places the two-cell bed pair).
    Bed,

    // Materials
    /// Stick.
    Stick,
    /// Coal.
    Coal,
    /// Iron ore chunk.
    IronOre,
    /// Smelted iron ingot.
    IronIngot,
    /// Gold ore chunk.
    GoldOre,
    /// Smelted gold ingot.
    GoldIngot,
    /// Diamond.
    Diamond,
    /// Gunpowder, dropped by creepers.
    Gunpowder,
    /// String, dropped by spiders.
    String,
    /// Bone, dropped by skeletons.
    Bone,
    /// Feather, dropped by chickens.
    Feather,
    /// Wool, dropped by sheep.
    Wool,
    /// Leather, dropped by cows.
    Leather,

    // Food
    /// Raw porkchop, dropped by pigs.
    RawPork,
    /// Cooked porkchop.
    CookedPork,
    /// Raw beef, dropped by cows.
    RawBeef,
    /// Cooked beef.
    CookedBeef,
    /// Rotten flesh, dropped by zombies.
    RottenFlesh,
}

impl ItemType {
    /// Canonical lowercase string key for configs/logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            ItemType::Stone => "stone",
            ItemType::Cobblestone => "cobblestone",
            ItemType::Dirt => "dirt",
            ItemType::Sand => "sand",
            ItemType::OakLog => "oak_log",
            ItemType::OakPlanks => "oak_planks",
            ItemType::CraftingTable => "crafting_table",
            ItemType::Furnace => "furnace",
            ItemType::Torch => "torch",
            ItemType::Tnt => "tnt",
            ItemType::OakDoor => "oak_door",
            ItemType::Bed => "bed",
            ItemType::Stick => "stick",
            ItemType::Coal => "coal",
            ItemType::IronOre => "iron_ore",
            ItemType::IronIngot => "iron_ingot",
            ItemType::GoldOre => "gold_ore",
            ItemType::GoldIngot => "gold_ingot",
            ItemType::Diamond => "diamond",
            ItemType::Gunpowder => "gunpowder",
            ItemType::String => "string",
            ItemType::Bone => "bone",
            ItemType::Feather => "feather",
            ItemType::Wool => "wool",
            ItemType::Leather => "leather",
            ItemType::RawPork => "raw_pork",
            ItemType::CookedPork => "cooked_pork",
            ItemType::RawBeef => "raw_beef",
            ItemType::CookedBeef => "cooked_beef",
            ItemType::RottenFlesh => "rotten_flesh",
        }
    }

    /// Parse an item type from a string key (case-insensitive).
    pub fn parse(input: &str) -> Result<Self, ItemParseError> {
        let key = input.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|item| item.as_str() == key)
            .ok_or(ItemParseError { key })
    }

    /// Every item, in declaration order.
    pub const ALL: &'static [ItemType] = &[
        ItemType::Stone,
        ItemType::Cobblestone,
        ItemType::Dirt,
        ItemType::Sand,
        ItemType::OakLog,
        ItemType::OakPlanks,
        ItemType::CraftingTable,
        ItemType::Furnace,
        ItemType::Torch,
        ItemType::Tnt,
        ItemType::OakDoor,
        ItemType::Bed,
        ItemType::Stick,
        ItemType::Coal,
        ItemType::IronOre,
        ItemType::IronIngot,
        ItemType::GoldOre,
        ItemType::GoldIngot,
        ItemType::Diamond,
        ItemType::Gunpowder,
        ItemType::String,
        ItemType::Bone,
        ItemType::Feather,
        ItemType::Wool,
        ItemType::Leather,
        ItemType::RawPork,
        ItemType::CookedPork,
        ItemType::RawBeef,
        ItemType::CookedBeef,
        ItemType::RottenFlesh,
    ];

    /// Maximum stack size in an inventory slot.
    pub fn max_stack_size(self) -> u8 {
        64
    }
}
