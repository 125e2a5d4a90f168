//! Roving tabindex
//!
//! Shared cursor handling for composite widgets. The current position is
//! read from the focused node on every key press and never stored.

use std::str::FromStr;

use eva_a11y::{Navigation, step};
use eva_dom::{Key, NodeId};
use eva_runtime::Context;

/// Layout axis of a composite widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl FromStr for Orientation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            _ => Err(()),
        }
    }
}

/// Map a key to cursor movement along `orientation` (`None` accepts both axes)
pub fn navigation(key: Key, orientation: Option<Orientation>) -> Option<Navigation> {
    let horizontal = orientation != Some(Orientation::Vertical);
    let vertical = orientation != Some(Orientation::Horizontal);
    match key {
        Key::ArrowRight if horizontal => Some(Navigation::Next),
        Key::ArrowLeft if horizontal => Some(Navigation::Previous),
        Key::ArrowDown if vertical => Some(Navigation::Next),
        Key::ArrowUp if vertical => Some(Navigation::Previous),
        Key::Home => Some(Navigation::First),
        Key::End => Some(Navigation::Last),
        _ => None,
    }
}

/// Index of the target holding focus (on it or inside it)
pub fn focused_index(ctx: &Context<'_>, targets: &[NodeId]) -> Option<usize> {
    let focused = ctx.active_element()?;
    targets.iter().position(|&t| ctx.contains(t, focused))
}

/// Give `active` the single `tabindex="0"`; every other target gets `-1`
pub fn apply_tabindex(ctx: &mut Context<'_>, targets: &[NodeId], active: Option<usize>) {
    for (i, &target) in targets.iter().enumerate() {
        let value = if Some(i) == active { "0" } else { "-1" };
        ctx.set_attr(target, "tabindex", value);
    }
}

/// Move focus within `targets`. Returns the new index when focus moved.
pub fn move_focus(
    ctx: &mut Context<'_>,
    targets: &[NodeId],
    nav: Navigation,
    wrap: bool,
) -> Option<usize> {
    let current = focused_index(ctx, targets);
    let next = step(current, targets.len(), nav, wrap)?;
    if Some(next) == current {
        return None;
    }
    ctx.focus(targets[next]).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_axes() {
        assert_eq!(navigation(Key::ArrowDown, Some(Orientation::Vertical)), Some(Navigation::Next));
        assert_eq!(navigation(Key::ArrowDown, Some(Orientation::Horizontal)), None);
        assert_eq!(navigation(Key::ArrowLeft, Some(Orientation::Horizontal)), Some(Navigation::Previous));
        assert_eq!(navigation(Key::ArrowUp, None), Some(Navigation::Previous));
        assert_eq!(navigation(Key::End, Some(Orientation::Vertical)), Some(Navigation::Last));
        assert_eq!(navigation(Key::Enter, None), None);
    }

    #[test]
    fn test_orientation_parse() {
        assert_eq!("vertical".parse::<Orientation>(), Ok(Orientation::Vertical));
        assert!("diagonal".parse::<Orientation>().is_err());
    }
}
