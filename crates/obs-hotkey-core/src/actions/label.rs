use std::collections::BTreeMap;

/// Configured label for `action_id`, or its titleized form.
pub fn display_label(action_id: &str, labels: &BTreeMap<String, String>) -> String {
    labels
        .get(action_id)
        .filter(|label| !label.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| titleize(action_id))
}

/// `toggle_recording` -> `Toggle Recording`.
pub fn titleize(action_id: &str) -> String {
    action_id
        .split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
