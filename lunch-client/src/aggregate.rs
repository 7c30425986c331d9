//! Order aggregation
//!
//! Turns the flat order list into what the chef board shows: the hero list
//! (with a short grace period for cancellations) and per-item totals across
//! concurrent orders.

use chrono::{DateTime, Utc};
use regex::Regex;
use shared::{Order, OrderItem, OrderStatus};
use std::collections::HashMap;
use std::sync::LazyLock;

/// How long a cancelled order stays on the hero list, in milliseconds
pub const CANCELLED_GRACE_MS: i64 = 60_000;

/// `"<name>"` or `"<name> x<N>"`, case-insensitive `x`
static ITEM_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.*?)(?:\s*x\s*([0-9]+))?$").expect("item token pattern is valid")
});

/// Item total across several orders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedItem {
    pub name: String,
    pub total_qty: i64,
}

/// Parse free-text order descriptions such as `"Rice x2, Soda"`.
///
/// Tokens with an empty name or a non-positive quantity are dropped.
pub fn parse_order_text(text: &str) -> Vec<OrderItem> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let (name, qty) = match ITEM_TOKEN.captures(part) {
                Some(caps) => {
                    let name = caps.get(1).map_or("", |m| m.as_str().trim());
                    let qty = match caps.get(2) {
                        Some(digits) => digits.as_str().parse::<i64>().ok()?,
                        None => 1,
                    };
                    (name, qty)
                }
                None => (part, 1),
            };
            (!name.is_empty() && qty > 0).then(|| OrderItem::new(name, qty))
        })
        .collect()
}

/// Items of an order: the structured list when present, else the parsed text.
pub fn order_items(order: &Order) -> Vec<OrderItem> {
    if !order.order_items.is_empty() {
        return order
            .order_items
            .iter()
            .map(|item| OrderItem::new(item.name.trim(), item.qty))
            .filter(|item| !item.name.is_empty() && item.qty > 0)
            .collect();
    }
    parse_order_text(&order.order_text)
}

/// Grouping key: lower-cased with runs of whitespace collapsed
pub fn normalize_item_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Sum quantities per normalized item name and keep groups above one.
///
/// Output is ordered by quantity (descending), then name. A group's display
/// name is the smallest spelling observed, so the result does not depend on
/// the order of the input.
pub fn group_items<'a, I>(orders: I) -> Vec<GroupedItem>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut totals: HashMap<String, GroupedItem> = HashMap::new();
    for order in orders {
        for item in order_items(order) {
            let key = normalize_item_name(&item.name);
            if key.is_empty() {
                continue;
            }
            totals
                .entry(key)
                .and_modify(|group| {
                    group.total_qty = group.total_qty.saturating_add(item.qty);
                    if item.name < group.name {
                        group.name = item.name.clone();
                    }
                })
                .or_insert_with(|| GroupedItem {
                    name: item.name.clone(),
                    total_qty: item.qty,
                });
        }
    }

    let mut grouped: Vec<GroupedItem> = totals
        .into_values()
        .filter(|group| group.total_qty > 1)
        .collect();
    grouped.sort_by(|a, b| b.total_qty.cmp(&a.total_qty).then_with(|| a.name.cmp(&b.name)));
    grouped
}

/// Whether an order belongs on the hero list at `now`.
///
/// Cancelled orders stay for [`CANCELLED_GRACE_MS`]; one without a readable
/// cancellation time stays as well.
pub fn is_hero_visible(order: &Order, now: DateTime<Utc>) -> bool {
    if order.status != OrderStatus::Cancelled {
        return true;
    }
    match order.cancelled() {
        Some(cancelled_at) => (now - cancelled_at).num_milliseconds() <= CANCELLED_GRACE_MS,
        None => true,
    }
}

/// Orders shown on the hero list, in payload order
pub fn hero_orders(orders: &[Order], now: DateTime<Utc>) -> Vec<&Order> {
    orders.iter().filter(|order| is_hero_visible(order, now)).collect()
}

/// Grouped totals for the orders still on the board, cancellations excluded
pub fn board_groups(hero: &[&Order]) -> Vec<GroupedItem> {
    group_items(
        hero.iter()
            .copied()
            .filter(|order| order.status != OrderStatus::Cancelled),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn with_items(items: &[(&str, i64)]) -> Order {
        Order {
            order_items: items.iter().map(|(n, q)| OrderItem::new(*n, *q)).collect(),
            ..Default::default()
        }
    }

    fn with_text(text: &str) -> Order {
        Order {
            order_text: text.to_string(),
            ..Default::default()
        }
    }

    fn group(name: &str, total_qty: i64) -> GroupedItem {
        GroupedItem {
            name: name.to_string(),
            total_qty,
        }
    }

    #[test]
    fn test_parse_order_text() {
        assert_eq!(
            parse_order_text("Rice x2, Soda"),
            vec![OrderItem::new("Rice", 2), OrderItem::new("Soda", 1)]
        );
    }

    #[test]
    fn test_parse_order_text_edge_tokens() {
        assert_eq!(
            parse_order_text(" Fried Rice X 3 ,, Box , x4, Tea x0 "),
            vec![OrderItem::new("Fried Rice", 3), OrderItem::new("Box", 1)]
        );
        assert!(parse_order_text("").is_empty());
        assert!(parse_order_text(" , ").is_empty());
    }

    #[test]
    fn test_structured_items_win_over_text() {
        let order = Order {
            order_text: "Pasta x9".into(),
            order_items: vec![OrderItem::new("  Dosa ", 2), OrderItem::new("", 3), OrderItem::new("Idli", 0)],
            ..Default::default()
        };
        assert_eq!(order_items(&order), vec![OrderItem::new("Dosa", 2)]);
    }

    #[test]
    fn test_normalize_item_name() {
        assert_eq!(normalize_item_name("  Fried   RICE "), "fried rice");
    }

    #[test]
    fn test_group_merges_case_variants() {
        let orders = vec![with_items(&[("Rice", 1)]), with_items(&[("rice", 1)])];
        assert_eq!(group_items(&orders), vec![group("Rice", 2)]);
    }

    #[test]
    fn test_group_excludes_singletons_and_sorts() {
        let orders = vec![
            with_text("Tea x2, Coffee"),
            with_items(&[("Chips", 1), ("tea", 1)]),
            with_text("Chips, Juice x2, Coffee"),
        ];
        assert_eq!(
            group_items(&orders),
            vec![group("Tea", 3), group("Chips", 2), group("Coffee", 2), group("Juice", 2)]
        );
    }

    #[test]
    fn test_group_is_order_independent() {
        let orders = vec![
            with_items(&[("rice", 1), ("Soda", 2)]),
            with_text("Rice x2, Noodles"),
            with_items(&[("noodles", 1), ("RICE", 1)]),
        ];
        let expected = group_items(&orders);
        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for perm in permutations {
            let shuffled: Vec<Order> = perm.iter().map(|i| orders[*i].clone()).collect();
            assert_eq!(group_items(&shuffled), expected);
        }
        assert_eq!(expected[0], group("RICE", 4));
    }

    #[test]
    fn test_cancelled_visibility_window() {
        let now = Utc::now();
        let cancelled = |ago: i64| Order {
            status: OrderStatus::Cancelled,
            cancelled_at: Some((now - TimeDelta::seconds(ago)).to_rfc3339()),
            ..Default::default()
        };
        assert!(is_hero_visible(&cancelled(30), now));
        assert!(!is_hero_visible(&cancelled(90), now));

        let unknown = Order {
            status: OrderStatus::Cancelled,
            cancelled_at: Some("??".into()),
            ..Default::default()
        };
        assert!(is_hero_visible(&unknown, now));
    }

    #[test]
    fn test_board_groups_ignore_cancelled_orders() {
        let now = Utc::now();
        let orders = vec![
            with_items(&[("Dosa", 1)]),
            Order {
                status: OrderStatus::Cancelled,
                cancelled_at: Some((now - TimeDelta::seconds(10)).to_rfc3339()),
                order_items: vec![OrderItem::new("Dosa", 1)],
                ..Default::default()
            },
            Order {
                status: OrderStatus::Cancelled,
                cancelled_at: Some((now - TimeDelta::minutes(5)).to_rfc3339()),
                order_items: vec![OrderItem::new("Dosa", 4)],
                ..Default::default()
            },
        ];
        let hero = hero_orders(&orders, now);
        assert_eq!(hero.len(), 2);
        assert!(board_groups(&hero).is_empty());
    }
}
