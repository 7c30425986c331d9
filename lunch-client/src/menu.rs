//! Menu sections and the employee cart

use shared::{MenuItem, OrderItem, Preset};
use std::collections::BTreeMap;

/// Menu items of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
    pub category: String,
    pub items: Vec<MenuItem>,
}

/// Group items by category, keeping the order categories first appear in.
pub fn group_by_category(items: &[MenuItem]) -> Vec<MenuSection> {
    let mut sections: Vec<MenuSection> = Vec::new();
    for item in items {
        match sections.iter_mut().find(|s| s.category == item.category()) {
            Some(section) => section.items.push(item.clone()),
            None => sections.push(MenuSection {
                category: item.category().to_string(),
                items: vec![item.clone()],
            }),
        }
    }
    sections
}

/// Items the employee is about to order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: BTreeMap<String, i64>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str) {
        *self.items.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Decrement; the line disappears at zero
    pub fn remove(&mut self, name: &str) {
        if let Some(qty) = self.items.get_mut(name) {
            *qty -= 1;
            if *qty <= 0 {
                self.items.remove(name);
            }
        }
    }

    pub fn quantity(&self, name: &str) -> i64 {
        self.items.get(name).copied().unwrap_or(0)
    }

    /// Adds the preset's order text as one line; returns its requirements.
    pub fn apply_preset<'a>(&mut self, preset: &'a Preset) -> &'a str {
        if !preset.order_text.is_empty() {
            self.add(&preset.order_text);
        }
        &preset.requirements
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lines sorted by name
    pub fn items(&self) -> Vec<OrderItem> {
        self.items
            .iter()
            .map(|(name, qty)| OrderItem::new(name.clone(), *qty))
            .collect()
    }

    /// Fallback order text, e.g. `"Dosa x1, Tea x2"`
    pub fn order_text(&self) -> String {
        self.items
            .iter()
            .map(|(name, qty)| format!("{name} x{qty}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::parse_order_text;

    fn item(name: &str, category: Option<&str>) -> MenuItem {
        MenuItem {
            name: name.into(),
            category: category.map(Into::into),
            available: true,
            image: None,
        }
    }

    #[test]
    fn test_group_by_category_keeps_first_seen_order() {
        let items = vec![
            item("Tea", Some("Drinks")),
            item("Dosa", Some("Mains")),
            item("Coffee", Some("Drinks")),
            item("Mystery", None),
        ];
        let sections = group_by_category(&items);
        let names: Vec<&str> = sections.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Drinks", "Mains", "Menu"]);
        assert_eq!(sections[0].items.len(), 2);
    }

    #[test]
    fn test_cart_add_remove() {
        let mut cart = Cart::new();
        cart.add("Tea");
        cart.add("Tea");
        cart.add("Dosa");
        cart.remove("Dosa");
        cart.remove("Idli");
        assert_eq!(cart.quantity("Tea"), 2);
        assert_eq!(cart.quantity("Dosa"), 0);
        assert_eq!(cart.items(), vec![OrderItem::new("Tea", 2)]);
    }

    #[test]
    fn test_cart_order_text_parses_back() {
        let mut cart = Cart::new();
        cart.add("Tea");
        cart.add("Dosa");
        cart.add("Tea");
        assert_eq!(cart.order_text(), "Dosa x1, Tea x2");
        assert_eq!(parse_order_text(&cart.order_text()), cart.items());
    }

    #[test]
    fn test_apply_preset() {
        let mut cart = Cart::new();
        let preset = Preset {
            name: "Usual".into(),
            order_text: "Idli".into(),
            requirements: "less spicy".into(),
            ..Default::default()
        };
        assert_eq!(cart.apply_preset(&preset), "less spicy");
        assert_eq!(cart.quantity("Idli"), 1);
    }
}
