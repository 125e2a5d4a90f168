//! ARIA Support
//!
//! Roles the component library assigns, and attribute value helpers.

use std::str::FromStr;

use crate::A11yError;

/// ARIA role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    // Landmark / structure
    Region,
    Group,
    Heading,
    Separator,
    Presentation,
    Status,
    Alert,

    // Widget roles
    AlertDialog,
    Button,
    Combobox,
    Dialog,
    ListBox,
    Menu,
    MenuBar,
    MenuItem,
    MenuItemCheckbox,
    MenuItemRadio,
    Option,
    Radio,
    RadioGroup,
    Tab,
    TabList,
    TabPanel,
}

impl AriaRole {
    /// Attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Group => "group",
            Self::Heading => "heading",
            Self::Separator => "separator",
            Self::Presentation => "presentation",
            Self::Status => "status",
            Self::Alert => "alert",
            Self::AlertDialog => "alertdialog",
            Self::Button => "button",
            Self::Combobox => "combobox",
            Self::Dialog => "dialog",
            Self::ListBox => "listbox",
            Self::Menu => "menu",
            Self::MenuBar => "menubar",
            Self::MenuItem => "menuitem",
            Self::MenuItemCheckbox => "menuitemcheckbox",
            Self::MenuItemRadio => "menuitemradio",
            Self::Option => "option",
            Self::Radio => "radio",
            Self::RadioGroup => "radiogroup",
            Self::Tab => "tab",
            Self::TabList => "tablist",
            Self::TabPanel => "tabpanel",
        }
    }

    /// Roles a menu accepts on its entries
    pub fn is_menu_item(&self) -> bool {
        matches!(self, Self::MenuItem | Self::MenuItemCheckbox | Self::MenuItemRadio)
    }
}

impl FromStr for AriaRole {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "region" => Self::Region,
            "group" => Self::Group,
            "heading" => Self::Heading,
            "separator" => Self::Separator,
            "none" | "presentation" => Self::Presentation,
            "status" => Self::Status,
            "alert" => Self::Alert,
            "alertdialog" => Self::AlertDialog,
            "button" => Self::Button,
            "combobox" => Self::Combobox,
            "dialog" => Self::Dialog,
            "listbox" => Self::ListBox,
            "menu" => Self::Menu,
            "menubar" => Self::MenuBar,
            "menuitem" => Self::MenuItem,
            "menuitemcheckbox" => Self::MenuItemCheckbox,
            "menuitemradio" => Self::MenuItemRadio,
            "option" => Self::Option,
            "radio" => Self::Radio,
            "radiogroup" => Self::RadioGroup,
            "tab" => Self::Tab,
            "tablist" => Self::TabList,
            "tabpanel" => Self::TabPanel,
            _ => return Err(A11yError::InvalidRole(s.to_string())),
        })
    }
}

/// Live region mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveRegionMode {
    Off,
    #[default]
    Polite,
    Assertive,
}

impl LiveRegionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// `aria-*` boolean value
#[inline]
pub fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!("menuitem".parse::<AriaRole>(), Ok(AriaRole::MenuItem));
        assert_eq!(" TabList ".parse::<AriaRole>(), Ok(AriaRole::TabList));
        assert_eq!("none".parse::<AriaRole>(), Ok(AriaRole::Presentation));
        assert_eq!(
            "carousel".parse::<AriaRole>(),
            Err(A11yError::InvalidRole("carousel".into()))
        );
    }

    #[test]
    fn test_menu_item_roles() {
        assert!(AriaRole::MenuItemRadio.is_menu_item());
        assert!("menuitemcheckbox".parse::<AriaRole>().is_ok_and(|r| r.is_menu_item()));
        assert!(!AriaRole::Option.is_menu_item());
    }

    #[test]
    fn test_aria_bool() {
        assert_eq!(aria_bool(true), "true");
        assert_eq!(aria_bool(false), "false");
        assert_eq!(LiveRegionMode::default().as_str(), "polite");
    }
}
