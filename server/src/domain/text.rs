//! Small text-normalization helpers shared by the form-facing services.

/// Proper-case a name: "north masjid" → "North Masjid".
pub fn proper_case(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a unit short code: "KG" → "Kg".
pub fn standardize_unit(unit: &str) -> String {
    let mut chars = unit.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
