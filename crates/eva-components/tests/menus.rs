mod common;

use common::*;
use eva_components::tags::{CONTEXT_MENU, DROPDOWN_MENU, MENU_ITEM, MENU_SEPARATOR, MENUBAR, MENUBAR_MENU};
use eva_runtime::Runtime;
use eva_runtime::dom::{EventDetail, EventName, Key, NodeId, Rect};

fn dropdown(rt: &mut Runtime) -> (NodeId, NodeId, Vec<NodeId>) {
    let menu = create(rt, DROPDOWN_MENU, &[]);
    let trigger = child(rt, menu, "button", &[("slot", "trigger")], "Actions");
    let mut items = vec![
        child(rt, menu, MENU_ITEM, &[("value", "edit")], "Edit"),
        child(rt, menu, MENU_ITEM, &[("value", "copy")], "Copy"),
    ];
    child(rt, menu, MENU_SEPARATOR, &[], "");
    items.push(child(rt, menu, MENU_ITEM, &[], "Delete"));
    attach(rt, menu);
    (menu, trigger, items)
}

#[test]
fn test_dropdown_escape_releases_listener() {
    let mut rt = runtime();
    let (menu, trigger, items) = dropdown(&mut rt);
    let body = rt.body();
    let outside = child(&mut rt, body, "button", &[], "Elsewhere");
    let log = record(&mut rt, menu, EventName::OpenChange);

    rt.click(trigger);
    assert!(has(&rt, menu, "open"));
    assert_eq!(rt.active_element(), Some(items[0]));
    assert_eq!(rt.document_listener_count(), 2);
    assert_eq!(attr(&rt, trigger, "aria-expanded").as_deref(), Some("true"));

    rt.key_down(Key::Escape);
    assert!(!has(&rt, menu, "open"));
    assert_eq!(rt.document_listener_count(), 0);
    assert_eq!(rt.active_element(), Some(trigger));

    rt.click(outside);
    rt.click(outside);
    let log = log.borrow();
    assert_eq!(*log, vec![EventDetail::Open { open: true }, EventDetail::Open { open: false }]);
}

#[test]
fn test_repeated_open_does_not_stack_listeners() {
    let mut rt = runtime();
    let (_, trigger, _) = dropdown(&mut rt);
    for _ in 0..5 {
        rt.click(trigger);
        assert_eq!(rt.document_listener_count(), 2);
        rt.click(trigger);
        assert_eq!(rt.document_listener_count(), 0);
    }
}

#[test]
fn test_dropdown_arrows_wrap() {
    let mut rt = runtime();
    let (_, trigger, items) = dropdown(&mut rt);
    rt.focus(trigger);

    // ArrowUp on the closed trigger opens at the last item
    rt.key_down(Key::ArrowUp);
    assert_eq!(rt.active_element(), Some(items[2]));

    rt.key_down(Key::ArrowDown);
    assert_eq!(rt.active_element(), Some(items[0]));
    rt.key_down(Key::ArrowUp);
    assert_eq!(rt.active_element(), Some(items[2]));
    rt.key_down(Key::Home);
    assert_eq!(rt.active_element(), Some(items[0]));

    let stops: Vec<NodeId> = items
        .iter()
        .copied()
        .filter(|&i| rt.get_attribute(i, "tabindex") == Some("0"))
        .collect();
    assert_eq!(stops, vec![items[0]]);
}

#[test]
fn test_dropdown_select_closes() {
    let mut rt = runtime();
    let (menu, trigger, items) = dropdown(&mut rt);
    let selected = record(&mut rt, menu, EventName::Select);

    rt.click(trigger);
    rt.key_down(Key::ArrowDown);
    rt.key_down(Key::Enter);
    assert!(!has(&rt, menu, "open"));
    assert_eq!(rt.active_element(), Some(trigger));

    rt.click(trigger);
    rt.click(items[2]);
    assert_eq!(values(&selected), vec!["copy", "Delete"]);
}

#[test]
fn test_dropdown_skips_disabled_items() {
    let mut rt = runtime();
    let (_, trigger, items) = dropdown(&mut rt);
    rt.set_attribute(items[1], "disabled", "").unwrap();
    assert_eq!(attr(&rt, items[1], "aria-disabled").as_deref(), Some("true"));

    rt.click(trigger);
    rt.key_down(Key::ArrowDown);
    assert_eq!(rt.active_element(), Some(items[2]));
}

#[test]
fn test_dropdown_outside_click() {
    let mut rt = runtime();
    let (menu, trigger, _) = dropdown(&mut rt);
    let body = rt.body();
    let outside = child(&mut rt, body, "button", &[], "Elsewhere");

    rt.click(trigger);
    rt.click(outside);
    assert!(!has(&rt, menu, "open"));
    assert_eq!(rt.document_listener_count(), 0);
}

#[test]
fn test_dropdown_flips_above_near_bottom() {
    let mut rt = runtime();
    let (menu, trigger, _) = dropdown(&mut rt);
    rt.set_layout_rect(trigger, Rect::new(100.0, 760.0, 80.0, 30.0));

    rt.click(trigger);
    rt.run_frames();
    let content = part(&rt, menu, "content");
    assert_eq!(attr(&rt, content, "data-side").as_deref(), Some("top"));
    assert!(!has(&rt, content, "hidden"));
}

fn context_menu(rt: &mut Runtime) -> (NodeId, NodeId, Vec<NodeId>) {
    let menu = create(rt, CONTEXT_MENU, &[]);
    let area = child(rt, menu, "div", &[("slot", "trigger")], "Right-click here");
    let items = ["Back", "Forward", "Reload"]
        .iter()
        .map(|label| child(rt, menu, MENU_ITEM, &[], label))
        .collect();
    attach(rt, menu);
    (menu, area, items)
}

#[test]
fn test_context_menu_suppresses_native_menu() {
    let mut rt = runtime();
    let (menu, area, items) = context_menu(&mut rt);

    assert!(!rt.context_menu(area, 40.0, 50.0));
    assert!(has(&rt, menu, "open"));
    assert_eq!(rt.active_element(), Some(items[0]));

    rt.run_frames();
    let content = part(&rt, menu, "content");
    assert_eq!(attr(&rt, content, "style").as_deref(), Some("left: 40px; top: 54px"));
}

#[test]
fn test_context_menu_outside_area_is_ignored() {
    let mut rt = runtime();
    let (menu, _, items) = context_menu(&mut rt);
    assert!(rt.context_menu(items[0], 0.0, 0.0));
    assert!(!has(&rt, menu, "open"));
}

#[test]
fn test_context_menu_arrows_do_not_wrap() {
    let mut rt = runtime();
    let (menu, area, items) = context_menu(&mut rt);
    rt.context_menu(area, 10.0, 10.0);

    rt.key_down(Key::ArrowUp);
    assert_eq!(rt.active_element(), Some(items[0]));
    rt.key_down(Key::End);
    rt.key_down(Key::ArrowDown);
    assert_eq!(rt.active_element(), Some(items[2]));

    rt.key_down(Key::Escape);
    assert!(!has(&rt, menu, "open"));
    assert_eq!(rt.document_listener_count(), 0);
}

fn menubar(rt: &mut Runtime) -> (NodeId, Vec<NodeId>, Vec<Vec<NodeId>>) {
    let bar = create(rt, MENUBAR, &[]);
    let mut menus = Vec::new();
    let mut items = Vec::new();
    for (label, entries) in [("File", ["New", "Open"]), ("Edit", ["Undo", "Redo"]), ("View", ["Zoom", "Reset"])] {
        let menu = child(rt, bar, MENUBAR_MENU, &[("label", label)], "");
        items.push(entries.iter().map(|e| child(rt, menu, MENU_ITEM, &[], e)).collect());
        menus.push(menu);
    }
    attach(rt, bar);
    (bar, menus, items)
}

#[test]
fn test_menubar_single_tab_stop() {
    let mut rt = runtime();
    let (_, menus, _) = menubar(&mut rt);
    let stops: Vec<String> = menus
        .iter()
        .map(|&m| attr(&rt, part(&rt, m, "trigger"), "tabindex").unwrap_or_default())
        .collect();
    assert_eq!(stops, vec!["0", "-1", "-1"]);
}

#[test]
fn test_menubar_arrows_wrap_between_triggers() {
    let mut rt = runtime();
    let (_, menus, _) = menubar(&mut rt);
    rt.focus(part(&rt, menus[0], "trigger"));

    rt.key_down(Key::ArrowLeft);
    assert_eq!(rt.active_element(), Some(part(&rt, menus[2], "trigger")));
    assert!(has(&rt, menus[2], "data-active"));
    assert!(!has(&rt, menus[0], "data-active"));

    rt.key_down(Key::ArrowRight);
    assert_eq!(rt.active_element(), Some(part(&rt, menus[0], "trigger")));
}

#[test]
fn test_menubar_switches_open_menu() {
    let mut rt = runtime();
    let (_, menus, items) = menubar(&mut rt);
    rt.focus(part(&rt, menus[0], "trigger"));

    rt.key_down(Key::ArrowDown);
    assert!(has(&rt, menus[0], "open"));
    assert_eq!(rt.active_element(), Some(items[0][0]));

    rt.key_down(Key::ArrowRight);
    assert!(!has(&rt, menus[0], "open"));
    assert!(has(&rt, menus[1], "open"));
    assert_eq!(rt.active_element(), Some(items[1][0]));
    assert_eq!(rt.document_listener_count(), 2);

    // Items inside a menubar menu wrap
    rt.key_down(Key::ArrowUp);
    assert_eq!(rt.active_element(), Some(items[1][1]));
}

#[test]
fn test_menubar_opening_one_closes_others() {
    let mut rt = runtime();
    let (_, menus, _) = menubar(&mut rt);

    rt.click(part(&rt, menus[0], "trigger"));
    rt.click(part(&rt, menus[1], "trigger"));
    assert!(!has(&rt, menus[0], "open"));
    assert!(has(&rt, menus[1], "open"));
    assert!(has(&rt, menus[1], "data-active"));
}

#[test]
fn test_menubar_hover_opens_after_delay() {
    let mut rt = runtime();
    let (_, menus, _) = menubar(&mut rt);
    let delay = rt.config().hover_open_delay_ms;

    rt.hover(menus[1]);
    rt.advance_time(delay - 1);
    assert!(!has(&rt, menus[1], "open"));
    rt.advance_time(1);
    assert!(has(&rt, menus[1], "open"));
    assert_eq!(rt.active_element(), Some(part(&rt, menus[1], "trigger")));

    // Leaving before the delay cancels
    rt.hover(menus[2]);
    rt.unhover(menus[2]);
    rt.advance_time(delay * 2);
    assert!(!has(&rt, menus[2], "open"));
    assert_eq!(rt.pending_timers(), 0);
}

/// Items currently holding the tab stop
fn tab_stops(rt: &Runtime, items: &[NodeId]) -> Vec<NodeId> {
    items
        .iter()
        .copied()
        .filter(|&i| rt.get_attribute(i, "tabindex") == Some("0"))
        .collect()
}

#[test]
fn test_dropdown_open_attribute_seeds_tab_stop() {
    let mut rt = runtime();
    let (menu, trigger, items) = dropdown(&mut rt);
    rt.focus(trigger);

    rt.set_attribute(menu, "open", "").unwrap();
    assert_eq!(tab_stops(&rt, &items), vec![items[0]]);
    // Opening from outside leaves focus where it was
    assert_eq!(rt.active_element(), Some(trigger));

    // Arrow navigation moves the single stop along
    rt.focus(items[0]);
    rt.key_down(Key::ArrowDown);
    assert_eq!(tab_stops(&rt, &items), vec![items[1]]);
}

#[test]
fn test_dropdown_open_attribute_skips_disabled_first_item() {
    let mut rt = runtime();
    let (menu, _, items) = dropdown(&mut rt);
    rt.set_attribute(items[0], "disabled", "").unwrap();

    rt.set_attribute(menu, "open", "").unwrap();
    assert_eq!(tab_stops(&rt, &items), vec![items[1]]);
}

#[test]
fn test_context_menu_open_attribute_seeds_tab_stop() {
    let mut rt = runtime();
    let (menu, _, items) = context_menu(&mut rt);

    rt.set_attribute(menu, "open", "").unwrap();
    assert!(has(&rt, menu, "open"));
    assert_eq!(tab_stops(&rt, &items), vec![items[0]]);
}

#[test]
fn test_menubar_hover_open_seeds_tab_stop() {
    let mut rt = runtime();
    let (_, menus, items) = menubar(&mut rt);
    let delay = rt.config().hover_open_delay_ms;

    rt.hover(menus[2]);
    rt.advance_time(delay);
    assert!(has(&rt, menus[2], "open"));
    assert_eq!(tab_stops(&rt, &items[2]), vec![items[2][0]]);
    assert_eq!(rt.active_element(), Some(part(&rt, menus[2], "trigger")));
}

#[test]
fn test_menu_item_keeps_checkable_roles() {
    let mut rt = runtime();
    let menu = create(&mut rt, DROPDOWN_MENU, &[]);
    child(&mut rt, menu, "button", &[("slot", "trigger")], "View");
    let checkbox = child(&mut rt, menu, MENU_ITEM, &[("role", "menuitemcheckbox")], "Wrap lines");
    let radio = child(&mut rt, menu, MENU_ITEM, &[("role", "menuitemradio")], "Compact");
    let button = child(&mut rt, menu, MENU_ITEM, &[("role", "button")], "Reset");
    let bogus = child(&mut rt, menu, MENU_ITEM, &[("role", "gadget")], "Other");
    attach(&mut rt, menu);

    assert_eq!(attr(&rt, checkbox, "role").as_deref(), Some("menuitemcheckbox"));
    assert_eq!(attr(&rt, radio, "role").as_deref(), Some("menuitemradio"));
    assert_eq!(attr(&rt, button, "role").as_deref(), Some("menuitem"));
    assert_eq!(attr(&rt, bogus, "role").as_deref(), Some("menuitem"));
}
