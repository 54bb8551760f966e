//! Crafting recipes and the grid matcher.
//!
//! Shaped recipes match up to translation: the pattern's tight bounding box
//! is re-based onto the grid's, so a recipe authored top-left still matches
//! when the player lays it out centered. Shapeless recipes compare item
//! multisets. Matching is first-wins in registry declaration order.

use anyhow::{Context, Result};
use boxcraft_core::ItemType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A square crafting grid of item cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftingGrid {
    slots: Vec<Option<ItemType>>,
    size: usize,
}

impl CraftingGrid {
    /// Create an empty `size` x `size` grid.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size * size],
            size,
        }
    }

    /// Build a grid from row-major slots. Slot counts that aren't a full
    /// `size * size` square are rejected.
    pub fn from_slots(slots: &[Option<ItemType>], size: usize) -> Option<Self> {
        if slots.len() != size * size {
            return None;
        }
        Some(Self {
            slots: slots.to_vec(),
            size,
        })
    }

    /// Grid edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the item at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Option<ItemType> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.slots[row * self.size + col]
    }

    /// Set the item at (row, col).
    pub fn set(&mut self, row: usize, col: usize, item: Option<ItemType>) -> bool {
        if row >= self.size || col >= self.size {
            return false;
        }
        self.slots[row * self.size + col] = item;
        true
    }

    /// Clear the grid.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Check if every cell is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Occupied cells as (row, col, item).
    pub fn occupied_cells(&self) -> Vec<(usize, usize, ItemType)> {
        let mut cells = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if let Some(item) = self.slots[row * self.size + col] {
                    cells.push((row, col, item));
                }
            }
        }
        cells
    }
}

/// The result handed back to UI-adjacent code on a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftOutput {
    /// Item produced.
    pub item: ItemType,
    /// How many are produced.
    pub count: u8,
    /// Human-readable recipe name.
    pub name: String,
}

/// A position-dependent recipe. Pattern rows need not be padded to equal
/// length; only occupied cells participate in matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapedRecipe {
    /// Human-readable name.
    pub name: String,
    /// 2D pattern of cells, row-major.
    pub pattern: Vec<Vec<Option<ItemType>>>,
    /// Item produced.
    pub result: ItemType,
    /// Output count.
    pub count: u8,
}

/// An order-independent recipe: the grid must hold exactly this multiset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapelessRecipe {
    /// Human-readable name.
    pub name: String,
    /// Required ingredient multiset.
    pub ingredients: Vec<ItemType>,
    /// Item produced.
    pub result: ItemType,
    /// Output count.
    pub count: u8,
}

/// A crafting recipe of either kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recipe {
    /// Layout must match up to translation.
    Shaped(ShapedRecipe),
    /// Only the ingredient multiset matters.
    Shapeless(ShapelessRecipe),
}

impl Recipe {
    fn name(&self) -> &str {
        match self {
            Recipe::Shaped(r) => &r.name,
            Recipe::Shapeless(r) => &r.name,
        }
    }

    fn output(&self) -> (ItemType, u8) {
        match self {
            Recipe::Shaped(r) => (r.result, r.count),
            Recipe::Shapeless(r) => (r.result, r.count),
        }
    }
}

fn cell_bounds(cells: &[(usize, usize, ItemType)]) -> Option<(usize, usize, usize, usize)> {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for &(row, col, _) in cells {
        bounds = Some(match bounds {
            None => (row, col, row, col),
            Some((r0, c0, r1, c1)) => (r0.min(row), c0.min(col), r1.max(row), c1.max(col)),
        });
    }
    bounds
}

impl ShapedRecipe {
    fn pattern_cells(&self) -> Vec<(usize, usize, ItemType)> {
        let mut cells = Vec::new();
        for (row, row_cells) in self.pattern.iter().enumerate() {
            for (col, cell) in row_cells.iter().enumerate() {
                if let Some(item) = cell {
                    cells.push((row, col, *item));
                }
            }
        }
        cells
    }

    /// Position-invariant match: equal cell counts, equal bounding-box
    /// dimensions, then exact per-cell comparison after re-basing the
    /// pattern onto the grid's bounding box origin.
    pub fn matches(&self, grid: &CraftingGrid) -> bool {
        let pattern = self.pattern_cells();
        let grid_cells = grid.occupied_cells();
        if pattern.is_empty() || pattern.len() != grid_cells.len() {
            return false;
        }

        let (pr0, pc0, pr1, pc1) = match cell_bounds(&pattern) {
            Some(b) => b,
            None => return false,
        };
        let (gr0, gc0, gr1, gc1) = match cell_bounds(&grid_cells) {
            Some(b) => b,
            None => return false,
        };
        if pr1 - pr0 != gr1 - gr0 || pc1 - pc0 != gc1 - gc0 {
            return false;
        }

        let occupied: HashMap<(usize, usize), ItemType> = grid_cells
            .iter()
            .map(|&(row, col, item)| ((row, col), item))
            .collect();
        pattern.iter().all(|&(row, col, item)| {
            let translated = (row - pr0 + gr0, col - pc0 + gc0);
            occupied.get(&translated) == Some(&item)
        })
    }
}

impl ShapelessRecipe {
    /// Multiset match: same cardinality, every ingredient removable
    /// one-for-one from a working copy of the grid's items.
    pub fn matches(&self, grid: &CraftingGrid) -> bool {
        let mut pool: Vec<ItemType> = grid
            .occupied_cells()
            .into_iter()
            .map(|(_, _, item)| item)
            .collect();
        if pool.is_empty() || pool.len() != self.ingredients.len() {
            return false;
        }
        for ingredient in &self.ingredients {
            match pool.iter().position(|item| item == ingredient) {
                Some(index) => {
                    pool.swap_remove(index);
                }
                None => return false,
            }
        }
        true
    }
}

/// Ordered recipe registry; declaration order is match priority.
#[derive(Debug, Clone, Default)]
pub struct RecipeRegistry {
    recipes: Vec<Recipe>,
}

impl RecipeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            recipes: Vec::new(),
        }
    }

    /// Load recipes from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read recipe file")?;
        Self::load_from_str(&content)
    }

    /// Load recipes from a JSON string.
    pub fn load_from_str(content: &str) -> Result<Self> {
        let recipes: Vec<Recipe> =
            serde_json::from_str(content).context("Failed to parse recipe JSON")?;
        Ok(Self { recipes })
    }

    /// Append a recipe; later entries have lower match priority.
    pub fn add(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    /// All recipes in priority order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Number of registered recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the registry holds no recipes.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Resolve a grid against the registry. Empty grids return `None`
    /// without scanning; otherwise the first matching recipe in declaration
    /// order wins.
    pub fn match_grid(&self, grid: &CraftingGrid) -> Option<CraftOutput> {
        if grid.is_empty() {
            return None;
        }
        for recipe in &self.recipes {
            let matched = match recipe {
                Recipe::Shaped(shaped) => shaped.matches(grid),
                Recipe::Shapeless(shapeless) => shapeless.matches(grid),
            };
            if matched {
                let (item, count) = recipe.output();
                return Some(CraftOutput {
                    item,
                    count,
                    name: recipe.name().to_string(),
                });
            }
        }
        None
    }

    /// Registry with the built-in recipe set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        let shaped = |name: &str, pattern: Vec<Vec<Option<ItemType>>>, result, count| {
            Recipe::Shaped(ShapedRecipe {
                name: name.to_string(),
                pattern,
                result,
                count,
            })
        };
        let shapeless = |name: &str, ingredients: Vec<ItemType>, result, count| {
            Recipe::Shapeless(ShapelessRecipe {
                name: name.to_string(),
                ingredients,
                result,
                count,
            })
        };

        let p = Some(ItemType::OakPlanks);
        let w = Some(ItemType::Wool);
        let g = Some(ItemType::Gunpowder);
        let s = Some(ItemType::Sand);
        let c = Some(ItemType::Cobblestone);

        registry.add(shapeless(
            "Oak Planks",
            vec![ItemType::OakLog],
            ItemType::OakPlanks,
            4,
        ));
        registry.add(shaped(
            "Sticks",
            vec![vec![p], vec![p]],
            ItemType::Stick,
            4,
        ));
        registry.add(shaped(
            "Torches",
            vec![vec![Some(ItemType::Coal)], vec![Some(ItemType::Stick)]],
            ItemType::Torch,
            4,
        ));
        registry.add(shaped(
            "Crafting Table",
            vec![vec![p, p], vec![p, p]],
            ItemType::CraftingTable,
            1,
        ));
        registry.add(shaped(
            "Furnace",
            vec![vec![c, c, c], vec![c, None, c], vec![c, c, c]],
            ItemType::Furnace,
            1,
        ));
        registry.add(shaped(
            "TNT",
            vec![vec![g, s, g], vec![s, g, s], vec![g, s, g]],
            ItemType::Tnt,
            1,
        ));
        registry.add(shaped(
            "Oak Door",
            vec![vec![p, p], vec![p, p], vec![p, p]],
            ItemType::OakDoor,
            1,
        ));
        registry.add(shaped(
            "Bed",
            vec![vec![w, w, w], vec![p, p, p]],
            ItemType::Bed,
            1,
        ));

        registry
    }
}

/// Facade entry point: resolve a row-major slot array against the registry.
///
/// A slot count that doesn't form a `grid_size` square is invalid input and
/// resolves to "no match" rather than an error.
pub fn match_recipe(
    registry: &RecipeRegistry,
    slots: &[Option<ItemType>],
    grid_size: usize,
) -> Option<CraftOutput> {
    let grid = CraftingGrid::from_slots(slots, grid_size)?;
    registry.match_grid(&grid)
}
