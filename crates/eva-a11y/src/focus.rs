//! Focus Management
//!
//! Index arithmetic for roving tabindex groups and focus traps. The current
//! index is always supplied by the caller (derived from the focused node), so
//! nothing here caches focus state.

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// No tabindex (or unparseable): only natively focusable elements take focus
    Unset,
    /// tabindex < 0: focusable by script, skipped by Tab
    Programmatic,
    /// tabindex >= 0: in the Tab sequence
    Sequential(i32),
}

impl TabIndex {
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Self::Programmatic,
            Ok(n) => Self::Sequential(n),
            Err(_) => Self::Unset,
        }
    }

    pub fn is_focusable(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    pub fn is_tabbable(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

/// Cursor movement inside a composite widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Previous,
    First,
    Last,
}

/// Move a roving cursor over `len` items.
///
/// `current` is `None` when focus is outside the group: Next lands on the
/// first item, Previous on the last. Without `wrap` the cursor stays put at
/// either boundary.
pub fn step(current: Option<usize>, len: usize, nav: Navigation, wrap: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    Some(match (nav, current) {
        (Navigation::First, _) => 0,
        (Navigation::Last, _) => last,
        (Navigation::Next, None) => 0,
        (Navigation::Previous, None) => last,
        (Navigation::Next, Some(i)) if i >= last => if wrap { 0 } else { last },
        (Navigation::Next, Some(i)) => i + 1,
        (Navigation::Previous, Some(0)) => if wrap { last } else { 0 },
        (Navigation::Previous, Some(i)) => (i - 1).min(last),
    })
}

/// Tab / Shift+Tab inside a focus trap: always cycles
pub fn cycle(current: Option<usize>, len: usize, backwards: bool) -> Option<usize> {
    let nav = if backwards { Navigation::Previous } else { Navigation::Next };
    step(current, len, nav, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_index() {
        assert_eq!(TabIndex::parse("-1"), TabIndex::Programmatic);
        assert!(TabIndex::parse("-1").is_focusable());
        assert!(!TabIndex::parse("-1").is_tabbable());
        assert!(TabIndex::parse("0").is_tabbable());
        assert_eq!(TabIndex::parse("abc"), TabIndex::Unset);
    }

    #[test]
    fn test_step_wraps() {
        assert_eq!(step(Some(2), 3, Navigation::Next, true), Some(0));
        assert_eq!(step(Some(0), 3, Navigation::Previous, true), Some(2));
    }

    #[test]
    fn test_step_clamps_without_wrap() {
        assert_eq!(step(Some(2), 3, Navigation::Next, false), Some(2));
        assert_eq!(step(Some(0), 3, Navigation::Previous, false), Some(0));
        assert_eq!(step(Some(1), 3, Navigation::Next, false), Some(2));
    }

    #[test]
    fn test_step_from_outside() {
        assert_eq!(step(None, 4, Navigation::Next, false), Some(0));
        assert_eq!(step(None, 4, Navigation::Previous, false), Some(3));
        assert_eq!(step(Some(1), 4, Navigation::Last, false), Some(3));
        assert_eq!(step(None, 0, Navigation::First, true), None);
    }

    #[test]
    fn test_cycle() {
        assert_eq!(cycle(Some(1), 2, false), Some(0));
        assert_eq!(cycle(Some(0), 2, true), Some(1));
    }
}
