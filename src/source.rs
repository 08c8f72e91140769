//! Loading menu snapshots and options.
//!
//! A menu file is a JSON array of items:
//!
//! ```json
//! [
//!   {"id": 1, "name": "Veg Burger", "price": 149, "category": "Burgers", "is_veg": true},
//!   {"id": 7, "name": "Coke", "price": 49, "category": "Beverages", "is_available": false}
//! ]
//! ```
//!
//! `is_veg` and `is_available` default to `true`; other fields are ignored.
//! An options file is a JSON object with any subset of the [`Options`] fields.

use crate::api::Options;
use crate::error::{Error, Result};
use crate::MenuItem;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read a menu snapshot from a JSON file.
pub fn load_menu(path: impl AsRef<Path>) -> Result<Vec<MenuItem>> {
    let menu: Vec<MenuItem> = read_json(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), items = menu.len(), "menu loaded");
    Ok(menu)
}

/// Read and validate options from a JSON file.
pub fn load_options(path: impl AsRef<Path>) -> Result<Options> {
    let options: Options = read_json(path.as_ref())?;
    options.validate()?;
    Ok(options)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&text).map_err(|source| Error::Json { path: path.to_path_buf(), source })
}

/// The built-in seed menu.
pub fn default_menu() -> Vec<MenuItem> {
    const SEED: &[(&str, f64, &str, bool)] = &[
        ("Veg Burger", 149.0, "Burgers", true),
        ("Chicken Burger", 199.0, "Burgers", false),
        ("Margherita Pizza", 299.0, "Pizza", true),
        ("Pepperoni Pizza", 349.0, "Pizza", false),
        ("Farmhouse Pizza", 329.0, "Pizza", true),
        ("French Fries", 99.0, "Sides", true),
        ("Coke", 49.0, "Beverages", true),
        ("Cold Coffee", 129.0, "Beverages", true),
        ("Paneer Tikka", 219.0, "Starters", true),
        ("Chicken Wings", 249.0, "Starters", false),
        ("Veg Biryani", 199.0, "Main Course", true),
        ("Chicken Biryani", 279.0, "Main Course", false),
        ("Masala Dosa", 129.0, "South Indian", true),
        ("Chocolate Brownie", 149.0, "Desserts", true),
        ("Gulab Jamun", 89.0, "Desserts", true),
        ("Mojito", 99.0, "Beverages", true),
        ("Tandoori Chicken", 299.0, "Starters", false),
        ("Pasta Alfredo", 229.0, "Main Course", true),
        ("Naan Bread", 49.0, "Sides", true),
        ("Mango Lassi", 79.0, "Beverages", true),
    ];

    SEED.iter()
        .zip(1..)
        .map(|(&(name, price, category, is_veg), id)| MenuItem::new(id, name, price, category, is_veg))
        .collect()
}
