//! EVA Components
//!
//! Accessible composite widgets and leaf elements built on `eva-runtime`.
//!
//! Features:
//! - Accordion (single or multiple open)
//! - Dropdown, context and menubar menus
//! - Tabs, carousel, select and radio group
//! - Modal overlays (dialog, alert dialog, sheet, drawer)
//! - Leaf elements (button, badge, card, input, separator)
//!
//! Groups and items talk through bubbling events; the group is always the
//! single source of truth and mirrors its state back into item attributes.

pub mod accordion;
pub mod carousel;
pub mod leaf;
pub mod menu;
pub mod menubar;
pub mod overlay;
pub mod radio_group;
pub mod roving;
pub mod select;
pub mod tabs;

mod popup;

pub use accordion::{Accordion, AccordionItem};
pub use carousel::{Carousel, CarouselItem};
pub use leaf::{Badge, Button, Card, Input, Separator};
pub use menu::{ContextMenu, DropdownMenu, MenuItem, MenuLabel, MenuSeparator};
pub use menubar::{Menubar, MenubarMenu};
pub use overlay::{Overlay, OverlayKind};
pub use radio_group::{RadioGroup, RadioGroupItem};
pub use roving::Orientation;
pub use select::{Select, SelectItem};
pub use tabs::{Tabs, TabsContent, TabsList, TabsTrigger};

use eva_runtime::{Factory, Runtime, RuntimeError};

/// Element tag names
pub mod tags {
    pub const ACCORDION: &str = "eva-accordion";
    pub const ACCORDION_ITEM: &str = "eva-accordion-item";

    pub const DROPDOWN_MENU: &str = "eva-dropdown-menu";
    pub const CONTEXT_MENU: &str = "eva-context-menu";
    pub const MENUBAR: &str = "eva-menubar";
    pub const MENUBAR_MENU: &str = "eva-menubar-menu";
    pub const MENU_ITEM: &str = "eva-menu-item";
    pub const MENU_SEPARATOR: &str = "eva-menu-separator";
    pub const MENU_LABEL: &str = "eva-menu-label";

    pub const TABS: &str = "eva-tabs";
    pub const TABS_LIST: &str = "eva-tabs-list";
    pub const TABS_TRIGGER: &str = "eva-tabs-trigger";
    pub const TABS_CONTENT: &str = "eva-tabs-content";

    pub const CAROUSEL: &str = "eva-carousel";
    pub const CAROUSEL_ITEM: &str = "eva-carousel-item";

    pub const SELECT: &str = "eva-select";
    pub const SELECT_ITEM: &str = "eva-select-item";

    pub const RADIO_GROUP: &str = "eva-radio-group";
    pub const RADIO_GROUP_ITEM: &str = "eva-radio-group-item";

    pub const DIALOG: &str = "eva-dialog";
    pub const ALERT_DIALOG: &str = "eva-alert-dialog";
    pub const SHEET: &str = "eva-sheet";
    pub const DRAWER: &str = "eva-drawer";

    pub const BUTTON: &str = "eva-button";
    pub const BADGE: &str = "eva-badge";
    pub const CARD: &str = "eva-card";
    pub const INPUT: &str = "eva-input";
    pub const SEPARATOR: &str = "eva-separator";
}

/// Tag, observed attributes and factory of every element in the library
pub const DEFINITIONS: &[(&str, &[&str], Factory)] = &[
    (tags::ACCORDION, Accordion::OBSERVED, Accordion::create),
    (tags::ACCORDION_ITEM, AccordionItem::OBSERVED, AccordionItem::create),
    (tags::DROPDOWN_MENU, DropdownMenu::OBSERVED, DropdownMenu::create),
    (tags::CONTEXT_MENU, ContextMenu::OBSERVED, ContextMenu::create),
    (tags::MENUBAR, &[], Menubar::create),
    (tags::MENUBAR_MENU, MenubarMenu::OBSERVED, MenubarMenu::create),
    (tags::MENU_ITEM, MenuItem::OBSERVED, MenuItem::create),
    (tags::MENU_SEPARATOR, &[], MenuSeparator::create),
    (tags::MENU_LABEL, &[], MenuLabel::create),
    (tags::TABS, Tabs::OBSERVED, Tabs::create),
    (tags::TABS_LIST, &[], TabsList::create),
    (tags::TABS_TRIGGER, TabsTrigger::OBSERVED, TabsTrigger::create),
    (tags::TABS_CONTENT, TabsContent::OBSERVED, TabsContent::create),
    (tags::CAROUSEL, Carousel::OBSERVED, Carousel::create),
    (tags::CAROUSEL_ITEM, &[], CarouselItem::create),
    (tags::SELECT, Select::OBSERVED, Select::create),
    (tags::SELECT_ITEM, SelectItem::OBSERVED, SelectItem::create),
    (tags::RADIO_GROUP, RadioGroup::OBSERVED, RadioGroup::create),
    (tags::RADIO_GROUP_ITEM, RadioGroupItem::OBSERVED, RadioGroupItem::create),
    (tags::DIALOG, Overlay::OBSERVED, Overlay::dialog),
    (tags::ALERT_DIALOG, Overlay::OBSERVED, Overlay::alert_dialog),
    (tags::SHEET, Overlay::OBSERVED, Overlay::sheet),
    (tags::DRAWER, Overlay::OBSERVED, Overlay::drawer),
    (tags::BUTTON, Button::OBSERVED, Button::create),
    (tags::BADGE, Badge::OBSERVED, Badge::create),
    (tags::CARD, &[], Card::create),
    (tags::INPUT, Input::OBSERVED, Input::create),
    (tags::SEPARATOR, Separator::OBSERVED, Separator::create),
];

/// Register every element with `rt`
pub fn define_all(rt: &mut Runtime) -> Result<(), RuntimeError> {
    for &(name, observed, factory) in DEFINITIONS {
        rt.define(name, observed, factory)?;
    }
    tracing::debug!("Defined {} EVA elements", DEFINITIONS.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eva_runtime::Config;

    #[test]
    fn test_define_all() {
        let mut rt = Runtime::new(Config::default());
        define_all(&mut rt).unwrap();
        assert_eq!(rt.registry().len(), DEFINITIONS.len());
        assert!(rt.registry().is_defined(tags::RADIO_GROUP_ITEM));
        assert!(matches!(define_all(&mut rt), Err(RuntimeError::AlreadyDefined(_))));
    }

    #[test]
    fn test_tag_names_are_valid() {
        for (name, _, _) in DEFINITIONS {
            assert!(eva_runtime::ElementRegistry::is_valid_name(name), "{name}");
        }
    }
}
