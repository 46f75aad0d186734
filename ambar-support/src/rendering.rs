//! Text rendering for container diagnostics.
//!
//! Error messages name types the way a reader would write them, so
//! `my_game::player::PlayerController` shows up as `PlayerController`
//! and a resolution chain reads left to right.

/// Joins a resolution chain with arrows.
///
/// # Examples
/// ```
/// use ambar_support::rendering::render_chain;
///
/// let chain = ["PlayerController", "InputRouter", "PlayerController"];
/// assert_eq!(render_chain(&chain), "PlayerController → InputRouter → PlayerController");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Strips module paths from every segment of a type name.
///
/// ```
/// use ambar_support::rendering::shorten_type_name;
///
/// assert_eq!(shorten_type_name("my_game::audio::Mixer"), "Mixer");
/// assert_eq!(
///     shorten_type_name("alloc::rc::Rc<dyn my_game::log::Sink>"),
///     "Rc<dyn Sink>"
/// );
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            '<' | '>' | ',' | ' ' | '&' | '(' | ')' | '[' | ']' | ';' => {
                result.push_str(&segment);
                result.push(ch);
                segment.clear();
            }
            _ => segment.push(ch),
        }
    }

    result.push_str(&segment);
    result
}

/// Ranks `available` type names by how close they are to `requested`.
///
/// Used for "did you mean" hints. Substring hits on the full path win,
/// then hits on the short name, then names sharing a prefix of at
/// least three characters. The requested name itself is never suggested.
pub fn suggest_similar(requested: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = shorten_type_name(name).to_lowercase();

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            if name_short.contains(&requested_short) || requested_short.contains(&name_short) {
                return Some((name, 80));
            }

            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            (common >= 3).then_some((name, common * 10))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored.dedup_by(|a, b| a.0 == b.0);
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}
