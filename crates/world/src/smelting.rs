//! Smelting recipes, the fuel table, and tick-counted furnace state.

use boxcraft_core::ItemType;
use serde::{Deserialize, Serialize};

/// Cook duration of a standard smelt, in ticks (10 s at 20 TPS).
pub const DEFAULT_COOK_TICKS: u32 = 200;

/// A smelting recipe: input item -> output item over a fixed cook time.
#[derive(Debug, Clone, Copy)]
pub struct SmeltRecipe {
    pub input: ItemType,
    pub output: ItemType,
    pub count: u8,
    /// Discrete cook duration, in ticks.
    pub cook_ticks: u32,
}

/// All available smelting recipes.
pub const SMELT_RECIPES: &[SmeltRecipe] = &[
    SmeltRecipe {
        input: ItemType::IronOre,
        output: ItemType::IronIngot,
        count: 1,
        cook_ticks: DEFAULT_COOK_TICKS,
    },
    SmeltRecipe {
        input: ItemType::GoldOre,
        output: ItemType::GoldIngot,
        count: 1,
        cook_ticks: DEFAULT_COOK_TICKS,
    },
    SmeltRecipe {
        input: ItemType::RawPork,
        output: ItemType::CookedPork,
        count: 1,
        cook_ticks: DEFAULT_COOK_TICKS,
    },
    SmeltRecipe {
        input: ItemType::RawBeef,
        output: ItemType::CookedBeef,
        count: 1,
        cook_ticks: DEFAULT_COOK_TICKS,
    },
];

/// Look up the smelting recipe for an input item.
pub fn smelt_recipe(input: ItemType) -> Option<&'static SmeltRecipe> {
    SMELT_RECIPES.iter().find(|r| r.input == input)
}

/// Fuel burn values, in default-duration smelts per item.
#[derive(Debug, Clone, Copy)]
pub struct FuelValue {
    pub item: ItemType,
    /// Number of default smelts one item of this fuel powers.
    pub burn_units: f32,
}

/// All valid fuel items and their burn values.
pub const FUEL_VALUES: &[FuelValue] = &[
    FuelValue {
        item: ItemType::Coal,
        burn_units: 8.0,
    },
    FuelValue {
        item: ItemType::OakLog,
        burn_units: 1.5,
    },
    FuelValue {
        item: ItemType::OakPlanks,
        burn_units: 0.5,
    },
    FuelValue {
        item: ItemType::Stick,
        burn_units: 0.25,
    },
];

/// Burn value for a fuel item (0.0 if not valid fuel, never an error).
pub fn fuel_burn_units(item: ItemType) -> f32 {
    FUEL_VALUES
        .iter()
        .find(|f| f.item == item)
        .map(|f| f.burn_units)
        .unwrap_or(0.0)
}

/// Check if an item is valid fuel.
pub fn is_fuel(item: ItemType) -> bool {
    fuel_burn_units(item) > 0.0
}

/// State of a furnace in the world, advanced once per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FurnaceState {
    /// Item in the input slot (type and count).
    pub input: Option<(ItemType, u32)>,
    /// Item in the fuel slot (type and count).
    pub fuel: Option<(ItemType, u32)>,
    /// Item in the output slot (type and count).
    pub output: Option<(ItemType, u32)>,
    /// Cook progress on the current item, in ticks.
    pub cook_ticks_done: u32,
    /// Remaining burn time from consumed fuel, in ticks.
    pub burn_ticks_remaining: u32,
    /// Whether the furnace is currently active (lit).
    pub is_lit: bool,
}

impl Default for FurnaceState {
    fn default() -> Self {
        Self::new()
    }
}

impl FurnaceState {
    /// Create a new empty furnace.
    pub fn new() -> Self {
        Self {
            input: None,
            fuel: None,
            output: None,
            cook_ticks_done: 0,
            burn_ticks_remaining: 0,
            is_lit: false,
        }
    }

    /// Advance the furnace by one tick.
    ///
    /// Returns `true` if the lit state changed (for the block-appearance
    /// swap outside this core).
    pub fn update(&mut self) -> bool {
        let was_lit = self.is_lit;

        if self.can_smelt() {
            if self.burn_ticks_remaining == 0 {
                self.consume_fuel_unit();
            }

            if self.burn_ticks_remaining > 0 {
                self.is_lit = true;
                self.burn_ticks_remaining -= 1;
                self.cook_ticks_done += 1;

                let done = self
                    .input
                    .and_then(|(item, _)| smelt_recipe(item))
                    .is_some_and(|recipe| self.cook_ticks_done >= recipe.cook_ticks);
                if done {
                    self.complete_smelt();
                    self.cook_ticks_done = 0;
                }
            } else {
                self.is_lit = false;
            }
        } else {
            self.cook_ticks_done = 0;
            self.is_lit = self.burn_ticks_remaining > 0;
            if self.burn_ticks_remaining > 0 {
                self.burn_ticks_remaining -= 1;
            }
        }

        was_lit != self.is_lit
    }

    /// Check if the furnace can smelt (valid input, room for the output).
    fn can_smelt(&self) -> bool {
        let Some((input_type, _)) = self.input else {
            return false;
        };
        let Some(recipe) = smelt_recipe(input_type) else {
            return false;
        };
        match self.output {
            None => true,
            Some((out_type, out_count)) => {
                out_type == recipe.output && out_count < recipe.output.max_stack_size() as u32
            }
        }
    }

    fn consume_fuel_unit(&mut self) {
        if let Some((fuel_type, fuel_count)) = &mut self.fuel {
            let burn_units = fuel_burn_units(*fuel_type);
            if burn_units > 0.0 && *fuel_count > 0 {
                self.burn_ticks_remaining = (burn_units * DEFAULT_COOK_TICKS as f32) as u32;
                *fuel_count -= 1;
                if *fuel_count == 0 {
                    self.fuel = None;
                }
            }
        }
    }

    /// Move one cooked item from input to output.
    fn complete_smelt(&mut self) {
        let Some((input_type, input_count)) = &mut self.input else {
            return;
        };
        let Some(recipe) = smelt_recipe(*input_type) else {
            return;
        };
        *input_count -= 1;
        let exhausted = *input_count == 0;
        let (output, count) = (recipe.output, recipe.count as u32);
        if exhausted {
            self.input = None;
        }
        match &mut self.output {
            None => self.output = Some((output, count)),
            Some((_, out_count)) => *out_count += count,
        }
    }

    /// Add items to the input slot.
    ///
    /// Returns the number of items that couldn't be added (the full count
    /// for non-smeltable items).
    pub fn add_input(&mut self, item: ItemType, count: u32) -> u32 {
        if smelt_recipe(item).is_none() {
            return count;
        }
        Self::add_to_slot(&mut self.input, item, count)
    }

    /// Add items to the fuel slot.
    ///
    /// Returns the number of items that couldn't be added (the full count
    /// for non-fuel items).
    pub fn add_fuel(&mut self, item: ItemType, count: u32) -> u32 {
        if !is_fuel(item) {
            return count;
        }
        Self::add_to_slot(&mut self.fuel, item, count)
    }

    fn add_to_slot(slot: &mut Option<(ItemType, u32)>, item: ItemType, count: u32) -> u32 {
        let max = item.max_stack_size() as u32;
        match slot {
            None => {
                let added = count.min(max);
                *slot = Some((item, added));
                count - added
            }
            Some((existing, existing_count)) => {
                if *existing != item {
                    return count;
                }
                let space = max.saturating_sub(*existing_count);
                let added = count.min(space);
                *existing_count += added;
                count - added
            }
        }
    }

    /// Take everything from the output slot.
    pub fn take_output(&mut self) -> Option<(ItemType, u32)> {
        self.output.take()
    }

    /// Take everything from the input slot.
    pub fn take_input(&mut self) -> Option<(ItemType, u32)> {
        self.cook_ticks_done = 0;
        self.input.take()
    }

    /// Take everything from the fuel slot.
    pub fn take_fuel(&mut self) -> Option<(ItemType, u32)> {
        self.fuel.take()
    }
}
