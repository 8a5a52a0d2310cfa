// Symbol inventory for Symbol Scout.
// The result of one extraction: declared functions, declared classes, and
// imported names, each deduplicated in first-encountered order.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The three name categories an inventory tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolCategory {
    Function,
    Class,
    Import,
}

impl SymbolCategory {
    pub fn name(&self) -> &'static str {
        match self {
            SymbolCategory::Function => "functions",
            SymbolCategory::Class => "classes",
            SymbolCategory::Import => "imports",
        }
    }
}

impl std::fmt::Display for SymbolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Deduplicated symbol names found in one tree (or merged over many).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInventory {
    pub functions: IndexSet<String>,
    pub classes: IndexSet<String>,
    pub imports: IndexSet<String>,
}

impl SymbolInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` under `category`. Returns `false` if it was already there,
    /// in which case its original position is kept.
    pub fn add(&mut self, category: SymbolCategory, name: &str) -> bool {
        let set = self.category_mut(category);
        if set.contains(name) {
            return false;
        }
        set.insert(name.to_string())
    }

    pub fn category(&self, category: SymbolCategory) -> &IndexSet<String> {
        match category {
            SymbolCategory::Function => &self.functions,
            SymbolCategory::Class => &self.classes,
            SymbolCategory::Import => &self.imports,
        }
    }

    fn category_mut(&mut self, category: SymbolCategory) -> &mut IndexSet<String> {
        match category {
            SymbolCategory::Function => &mut self.functions,
            SymbolCategory::Class => &mut self.classes,
            SymbolCategory::Import => &mut self.imports,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty() && self.imports.is_empty()
    }

    /// Total number of names across all categories.
    pub fn len(&self) -> usize {
        self.functions.len() + self.classes.len() + self.imports.len()
    }

    /// Union `other` into `self`. Names already present keep their position;
    /// new names are appended in `other`'s order.
    pub fn merge(&mut self, other: &SymbolInventory) {
        for category in [
            SymbolCategory::Function,
            SymbolCategory::Class,
            SymbolCategory::Import,
        ] {
            for name in other.category(category) {
                self.add(category, name);
            }
        }
    }

    /// The names of `self` that do not appear in `used`, in inventory order.
    pub fn unreferenced(&self, used: &IndexSet<String>) -> SymbolInventory {
        let keep = |set: &IndexSet<String>| -> IndexSet<String> {
            set.iter().filter(|name| !used.contains(*name)).cloned().collect()
        };
        SymbolInventory {
            functions: keep(&self.functions),
            classes: keep(&self.classes),
            imports: keep(&self.imports),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_dedups_and_keeps_first_position() {
        let mut inv = SymbolInventory::new();
        assert!(inv.add(SymbolCategory::Function, "b"));
        assert!(inv.add(SymbolCategory::Function, "a"));
        assert!(!inv.add(SymbolCategory::Function, "b"));

        let names: Vec<&str> = inv.functions.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_categories_are_independent() {
        let mut inv = SymbolInventory::new();
        inv.add(SymbolCategory::Function, "Foo");
        inv.add(SymbolCategory::Class, "Foo");
        assert_eq!(inv.functions.len(), 1);
        assert_eq!(inv.classes.len(), 1);
        assert!(inv.imports.is_empty());
        assert_eq!(inv.len(), 2);
    }

    #[test]
    fn test_merge_appends_new_names_only() {
        let mut left = SymbolInventory::new();
        left.add(SymbolCategory::Import, "x");
        left.add(SymbolCategory::Import, "y");

        let mut right = SymbolInventory::new();
        right.add(SymbolCategory::Import, "z");
        right.add(SymbolCategory::Import, "x");
        right.add(SymbolCategory::Class, "A");

        left.merge(&right);
        let imports: Vec<&str> = left.imports.iter().map(String::as_str).collect();
        assert_eq!(imports, vec!["x", "y", "z"]);
        assert!(left.classes.contains("A"));
    }

    #[test]
    fn test_unreferenced_keeps_order_and_drops_used() {
        let mut inv = SymbolInventory::new();
        inv.add(SymbolCategory::Function, "main");
        inv.add(SymbolCategory::Function, "helper");
        inv.add(SymbolCategory::Function, "dead");
        inv.add(SymbolCategory::Class, "Widget");
        inv.add(SymbolCategory::Import, "os.path");

        let used: IndexSet<String> = ["helper", "Widget", "os"]
            .into_iter()
            .map(String::from)
            .collect();
        let unused = inv.unreferenced(&used);

        let functions: Vec<&str> = unused.functions.iter().map(String::as_str).collect();
        assert_eq!(functions, vec!["main", "dead"]);
        assert!(unused.classes.is_empty());
        assert!(unused.imports.contains("os.path"));
    }

    #[test]
    fn test_serializes_as_ordered_lists() {
        let mut inv = SymbolInventory::new();
        inv.add(SymbolCategory::Function, "zeta");
        inv.add(SymbolCategory::Function, "alpha");
        let json = serde_json::to_string(&inv).unwrap();
        assert_eq!(
            json,
            r#"{"functions":["zeta","alpha"],"classes":[],"imports":[]}"#
        );
    }
}
