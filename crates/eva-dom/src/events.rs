//! DOM Events
//!
//! Typed event vocabulary shared by the runtime and every component.
//! Component events always bubble and cross render-root boundaries, so a
//! group controller sees what its items emit.

use crate::NodeId;

/// Event names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    // Input events
    Click,
    ContextMenu,
    KeyDown,
    MouseEnter,
    MouseLeave,

    // Component events
    /// Disclosure state of a single item changed (`Open`)
    Toggle,
    /// Accordion item opened or closed (`Toggle`)
    AccordionToggle,
    /// Popup or overlay opened or closed (`Open`)
    OpenChange,
    /// Menu item activated (`Value`)
    Select,
    /// Committed value of a group changed (`Value`)
    Change,
    /// Tab trigger asks its group to activate it (`Value`)
    TabSelect,
    /// Radio item asks its group to check it (`Value`)
    RadioSelect,
    /// Carousel moved to another slide (`Index`)
    SlideChange,
    /// Item element attached and wants to join its group
    ItemConnected,
    /// Overlay was dismissed
    Close,
}

impl EventName {
    /// DOM event type string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::ContextMenu => "contextmenu",
            Self::KeyDown => "keydown",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::Toggle => "toggle",
            Self::AccordionToggle => "accordion-toggle",
            Self::OpenChange => "open-change",
            Self::Select => "select",
            Self::Change => "change",
            Self::TabSelect => "tab-select",
            Self::RadioSelect => "radio-select",
            Self::SlideChange => "slide-change",
            Self::ItemConnected => "item-connected",
            Self::Close => "close",
        }
    }

    /// Parse from an event type string
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "click" => Self::Click,
            "contextmenu" => Self::ContextMenu,
            "keydown" => Self::KeyDown,
            "mouseenter" => Self::MouseEnter,
            "mouseleave" => Self::MouseLeave,
            "toggle" => Self::Toggle,
            "accordion-toggle" => Self::AccordionToggle,
            "open-change" => Self::OpenChange,
            "select" => Self::Select,
            "change" => Self::Change,
            "tab-select" => Self::TabSelect,
            "radio-select" => Self::RadioSelect,
            "slide-change" => Self::SlideChange,
            "item-connected" => Self::ItemConnected,
            "close" => Self::Close,
            _ => return None,
        })
    }
}

/// Typed event payload
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    None,
    Open { open: bool },
    Toggle { id: String, open: bool },
    Value { value: String },
    Index { index: usize },
}

impl EventDetail {
    /// Value payload, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value { value } => Some(value),
            _ => None,
        }
    }

    /// Open flag carried by `Open` and `Toggle` payloads
    pub fn open(&self) -> Option<bool> {
        match self {
            Self::Open { open } | Self::Toggle { open, .. } => Some(*open),
            _ => None,
        }
    }
}

/// Keyboard keys the widgets react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Character(char),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => return None,
                }
            }
        })
    }

    /// Enter or Space: the two activation keys
    pub fn is_activation(&self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    Capture,
    #[default]
    Bubble,
}

/// Event being dispatched through the tree
#[derive(Debug, Clone)]
pub struct Event {
    pub name: EventName,
    /// Node the event was fired at (not retargeted)
    pub target: NodeId,
    /// Node whose handler is currently running
    pub current_target: NodeId,
    pub detail: EventDetail,
    pub key: Option<Key>,
    pub shift_key: bool,
    pub client_x: f64,
    pub client_y: f64,
    pub bubbles: bool,
    pub composed: bool,
    pub cancelable: bool,
    pub phase: Phase,
    path: Vec<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create a bubbling, composed, cancelable event
    pub fn new(name: EventName, target: NodeId) -> Self {
        Self {
            name,
            target,
            current_target: target,
            detail: EventDetail::None,
            key: None,
            shift_key: false,
            client_x: 0.0,
            client_y: 0.0,
            bubbles: true,
            composed: true,
            cancelable: true,
            phase: Phase::Bubble,
            path: Vec::new(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Component event with a payload
    pub fn custom(name: EventName, target: NodeId, detail: EventDetail) -> Self {
        Self {
            detail,
            cancelable: false,
            ..Self::new(name, target)
        }
    }

    /// Create click event
    pub fn click(target: NodeId) -> Self {
        Self::new(EventName::Click, target)
    }

    /// Create keydown event
    pub fn key_down(target: NodeId, key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventName::KeyDown, target)
        }
    }

    /// Create contextmenu event at viewport coordinates
    pub fn context_menu(target: NodeId, x: f64, y: f64) -> Self {
        Self {
            client_x: x,
            client_y: y,
            ..Self::new(EventName::ContextMenu, target)
        }
    }

    /// Create mouseenter/mouseleave event (does not bubble)
    pub fn hover(target: NodeId, entering: bool) -> Self {
        let name = if entering { EventName::MouseEnter } else { EventName::MouseLeave };
        Self {
            bubbles: false,
            cancelable: false,
            ..Self::new(name, target)
        }
    }

    /// Builder: set Shift modifier
    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift_key = shift;
        self
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Nodes the event travels through, target first
    pub fn composed_path(&self) -> &[NodeId] {
        &self.path
    }

    /// Install the propagation path (done once by the dispatcher)
    pub fn set_path(&mut self, path: Vec<NodeId>) {
        self.path = path;
    }

    /// Check if the event passes through `node`
    pub fn in_path(&self, node: NodeId) -> bool {
        self.path.contains(&node)
    }
}
