//! Display name → filesystem-safe identifier.

use std::collections::HashMap;

/// Identifier used when a name sanitizes to the empty string.
pub const EMPTY_NAME_PLACEHOLDER: &str = "icon";

/// Lower-case `name`, turn each whitespace run into a single `-`, and drop
/// every character outside `[a-z0-9-]`.
///
/// Total but not injective: `"Arrow Left"` and `"arrow-left"` both map to
/// `"arrow-left"`. Use [`IdentifierAllocator`] to keep identifiers unique.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('-');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            out.push(ch);
        }
    }
    out
}

/// Result of [`IdentifierAllocator::allocate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub identifier: String,
    /// Set when the sanitized name was taken; holds (base, first owner's source name).
    pub collided_with: Option<(String, String)>,
    /// The name sanitized to nothing and fell back to [`EMPTY_NAME_PLACEHOLDER`].
    pub was_empty: bool,
}

/// Hands out unique identifiers in call order.
///
/// The first name to claim a base keeps it; later claimants get `-2`, `-3`, …
/// (skipping any suffix already taken).
#[derive(Debug, Default)]
pub struct IdentifierAllocator {
    owners: HashMap<String, String>,
}

impl IdentifierAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, source_name: &str) -> Allocation {
        let mut base = sanitize(source_name);
        let was_empty = base.is_empty();
        if was_empty {
            base = EMPTY_NAME_PLACEHOLDER.to_string();
        }

        let Some(first_owner) = self.owners.get(&base).cloned() else {
            self.owners.insert(base.clone(), source_name.to_string());
            return Allocation {
                identifier: base,
                collided_with: None,
                was_empty,
            };
        };

        let mut n = 2u32;
        let identifier = loop {
            let candidate = format!("{base}-{n}");
            if !self.owners.contains_key(&candidate) {
                break candidate;
            }
            n += 1;
        };
        self.owners
            .insert(identifier.clone(), source_name.to_string());
        Allocation {
            identifier,
            collided_with: Some((base, first_owner)),
            was_empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Arrow Left", "arrow-left")]
    #[case("arrow-left", "arrow-left")]
    #[case("  Padded  Name ", "-padded-name-")]
    #[case("Tab\tand\nnewline", "tab-and-newline")]
    #[case("Icon/Close (24px)", "iconclose-24px")]
    #[case("ÄÖÜ smile", "-smile")]
    #[case("UPPER_snake", "uppersnake")]
    #[case("", "")]
    fn sanitize_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[test]
    fn sanitize_output_alphabet() {
        let out = sanitize("Wéird  ✓ Näme #42 — final");
        assert!(out
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn first_claim_keeps_base() {
        let mut alloc = IdentifierAllocator::new();
        let a = alloc.allocate("Arrow Left");
        assert_eq!(a.identifier, "arrow-left");
        assert!(a.collided_with.is_none());
    }

    #[test]
    fn collisions_get_numeric_suffixes_in_order() {
        let mut alloc = IdentifierAllocator::new();
        alloc.allocate("Arrow Left");
        let second = alloc.allocate("arrow-left");
        let third = alloc.allocate("ARROW LEFT");
        assert_eq!(second.identifier, "arrow-left-2");
        assert_eq!(
            second.collided_with,
            Some(("arrow-left".to_string(), "Arrow Left".to_string()))
        );
        assert_eq!(third.identifier, "arrow-left-3");
    }

    #[test]
    fn suffix_skips_names_already_taken() {
        let mut alloc = IdentifierAllocator::new();
        alloc.allocate("star");
        alloc.allocate("star-2");
        let clash = alloc.allocate("Star");
        assert_eq!(clash.identifier, "star-3");
    }

    #[test]
    fn empty_names_use_placeholder() {
        let mut alloc = IdentifierAllocator::new();
        let first = alloc.allocate("✓✓");
        let second = alloc.allocate("???");
        assert!(first.was_empty);
        assert_eq!(first.identifier, "icon");
        assert_eq!(second.identifier, "icon-2");
    }
}
