use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

const MIN_ITEM_CHARS: usize = 3;

fn is_candidate(line: &str) -> bool {
    line.contains("ingredient") || (line.contains('-') && !line.contains(':'))
}

fn clean(line: &str) -> &str {
    lazy_static! {
        static ref LEADING_MARKERS: Regex = Regex::new(r"^[-\s*]+").unwrap();
    }
    let rest = match LEADING_MARKERS.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    };
    rest.trim()
}

/// Derives a shopping list from free-form meal plan text.
///
/// Lines mentioning "ingredient", or holding a hyphen but no colon, are
/// taken as items. Bullet markers are stripped, items under three
/// characters dropped, and repeats removed keeping the first occurrence.
pub fn extract_grocery_list(plan_text: &str) -> Vec<String> {
    // `seen` answers membership; `items` carries the order.
    let mut seen: HashSet<&str> = HashSet::new();
    let mut items = Vec::new();
    for item in plan_text
        .lines()
        .filter(|l| is_candidate(l))
        .map(clean)
        .filter(|i| i.chars().count() >= MIN_ITEM_CHARS)
    {
        if seen.insert(item) {
            items.push(item.to_string());
        }
    }
    items
}
