//! Inventory storage backing the facade's item-acceptance entry point.
//!
//! Provides a 36-slot inventory with stack merging and counting; crafting
//! consumption and death payouts go through this.

use boxcraft_core::ItemType;
use serde::{Deserialize, Serialize};

/// Number of slots in the player inventory.
pub const INVENTORY_SIZE: usize = 36;

/// A stack of identical items in one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type held.
    pub item: ItemType,
    /// Number of items (1..=max stack size).
    pub count: u8,
}

impl ItemStack {
    /// Create a new item stack.
    pub fn new(item: ItemType, count: u8) -> Self {
        Self { item, count }
    }

    /// Check if this stack is at max capacity.
    pub fn is_full(&self) -> bool {
        self.count >= self.item.max_stack_size()
    }

    /// Remaining space in this stack.
    pub fn remaining_space(&self) -> u8 {
        self.item.max_stack_size().saturating_sub(self.count)
    }

    /// Try to add items to this stack, returning the amount that didn't fit.
    pub fn add(&mut self, amount: u8) -> u8 {
        let added = amount.min(self.remaining_space());
        self.count += added;
        amount - added
    }

    /// Try to remove items, returning the amount actually removed.
    pub fn remove(&mut self, amount: u8) -> u8 {
        let removed = amount.min(self.count);
        self.count -= removed;
        removed
    }
}

/// Player inventory with fixed slot count.
#[derive(Debug, Clone)]
pub struct Inventory {
    slots: [Option<ItemStack>; INVENTORY_SIZE],
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Create a new empty inventory.
    pub fn new() -> Self {
        Self {
            slots: [None; INVENTORY_SIZE],
        }
    }

    /// Get an item stack from a slot.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot)?.as_ref()
    }

    /// Set an item stack in a slot.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        if slot >= INVENTORY_SIZE {
            return false;
        }
        self.slots[slot] = stack;
        true
    }

    /// Total capacity remaining for a given item across partial stacks and
    /// empty slots.
    pub fn space_for(&self, item: ItemType) -> u32 {
        let mut space = 0u32;
        for slot in &self.slots {
            match slot {
                Some(stack) if stack.item == item => space += stack.remaining_space() as u32,
                None => space += item.max_stack_size() as u32,
                _ => {}
            }
        }
        space
    }

    /// Try to add an item stack, merging with existing stacks first.
    /// Returns the remainder that couldn't fit, if any.
    pub fn add_item(&mut self, mut stack: ItemStack) -> Option<ItemStack> {
        for existing in self.slots.iter_mut().flatten() {
            if existing.item == stack.item && !existing.is_full() {
                let remainder = existing.add(stack.count);
                if remainder == 0 {
                    return None;
                }
                stack.count = remainder;
            }
        }
        for slot in &mut self.slots {
            if slot.is_none() {
                *slot = Some(stack);
                return None;
            }
        }
        Some(stack)
    }

    /// Count how many of an item the inventory holds.
    pub fn count_item(&self, item: ItemType) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item == item)
            .map(|stack| stack.count as u32)
            .sum()
    }

    /// Check whether at least `count` of an item is present.
    pub fn has_item(&self, item: ItemType, count: u8) -> bool {
        self.count_item(item) >= count as u32
    }

    /// Remove up to `count` of an item, returning the amount removed.
    pub fn remove_item(&mut self, item: ItemType, count: u8) -> u8 {
        let mut remaining = count;
        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if let Some(stack) = slot {
                if stack.item == item {
                    remaining -= stack.remove(remaining);
                    if stack.count == 0 {
                        *slot = None;
                    }
                }
            }
        }
        count - remaining
    }

    /// Check if the inventory holds nothing.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_merges_into_existing_stacks() {
        let mut inv = Inventory::new();
        assert!(inv.add_item(ItemStack::new(ItemType::Stick, 60)).is_none());
        assert!(inv.add_item(ItemStack::new(ItemType::Stick, 10)).is_none());
        assert_eq!(inv.count_item(ItemType::Stick), 70);
        // 60 + 10 spills into a second slot.
        assert_eq!(inv.get(0).unwrap().count, 64);
        assert_eq!(inv.get(1).unwrap().count, 6);
    }

    #[test]
    fn remove_spans_multiple_stacks() {
        let mut inv = Inventory::new();
        inv.add_item(ItemStack::new(ItemType::Coal, 64));
        inv.add_item(ItemStack::new(ItemType::Coal, 10));
        assert_eq!(inv.remove_item(ItemType::Coal, 70), 70);
        assert_eq!(inv.count_item(ItemType::Coal), 4);
        assert_eq!(inv.remove_item(ItemType::Coal, 64), 4);
        assert!(inv.is_empty());
    }

    #[test]
    fn space_for_counts_partials_and_empties() {
        let mut inv = Inventory::new();
        for slot in 0..INVENTORY_SIZE - 1 {
            inv.set(slot, Some(ItemStack::new(ItemType::Stone, 64)));
        }
        inv.set(
            INVENTORY_SIZE - 1,
            Some(ItemStack::new(ItemType::Gunpowder, 60)),
        );
        assert_eq!(inv.space_for(ItemType::Gunpowder), 4);
        assert_eq!(inv.space_for(ItemType::Diamond), 0);
    }

    #[test]
    fn has_item_checks_totals() {
        let mut inv = Inventory::new();
        inv.add_item(ItemStack::new(ItemType::Bone, 3));
        assert!(inv.has_item(ItemType::Bone, 3));
        assert!(!inv.has_item(ItemType::Bone, 4));
        assert!(!inv.has_item(ItemType::Feather, 1));
    }
}
