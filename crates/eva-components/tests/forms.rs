mod common;

use common::*;
use eva_components::tags::{RADIO_GROUP, RADIO_GROUP_ITEM, SELECT, SELECT_ITEM};
use eva_runtime::Runtime;
use eva_runtime::dom::{EventName, Key, NodeId};

// =============================================================================
// Select
// =============================================================================

fn select(rt: &mut Runtime, attrs: &[(&str, &str)]) -> (NodeId, Vec<NodeId>) {
    let select = create(rt, SELECT, attrs);
    let options = [("apple", "Apple"), ("banana", "Banana"), ("cherry", "Cherry")]
        .iter()
        .map(|&(value, label)| child(rt, select, SELECT_ITEM, &[("value", value)], label))
        .collect();
    attach(rt, select);
    (select, options)
}

fn shown_value(rt: &Runtime, select: NodeId) -> String {
    rt.text_content(part(rt, select, "value"))
}

#[test]
fn test_select_placeholder() {
    let mut rt = runtime();
    let (plain, _) = select(&mut rt, &[]);
    assert_eq!(shown_value(&rt, plain), "Select an option");

    let (custom, _) = select(&mut rt, &[("placeholder", "Pick a fruit")]);
    assert_eq!(shown_value(&rt, custom), "Pick a fruit");
}

#[test]
fn test_select_keyboard_choice() {
    let mut rt = runtime();
    let (select, options) = select(&mut rt, &[]);
    let changes = record(&mut rt, select, EventName::Change);

    rt.click(part(&rt, select, "trigger"));
    assert!(has(&rt, select, "open"));
    assert_eq!(rt.active_element(), Some(options[0]));

    rt.key_down(Key::ArrowDown);
    rt.key_down(Key::ArrowDown);
    // No wrap at the end
    rt.key_down(Key::ArrowDown);
    assert_eq!(rt.active_element(), Some(options[2]));

    rt.key_down(Key::Enter);
    assert!(!has(&rt, select, "open"));
    assert_eq!(attr(&rt, select, "value").as_deref(), Some("cherry"));
    assert_eq!(shown_value(&rt, select), "Cherry");
    assert_eq!(with_attr(&rt, &options, "selected"), vec![options[2]]);
    assert_eq!(attr(&rt, options[2], "aria-selected").as_deref(), Some("true"));
    assert_eq!(rt.active_element(), Some(part(&rt, select, "trigger")));
    assert_eq!(values(&changes), vec!["cherry"]);
    assert_eq!(rt.document_listener_count(), 0);
}

#[test]
fn test_select_reopens_on_current_option() {
    let mut rt = runtime();
    let (select, options) = select(&mut rt, &[("value", "banana")]);
    assert_eq!(shown_value(&rt, select), "Banana");

    rt.focus(part(&rt, select, "trigger"));
    rt.key_down(Key::Enter);
    assert_eq!(rt.active_element(), Some(options[1]));

    rt.key_down(Key::Escape);
    assert!(!has(&rt, select, "open"));
    assert_eq!(attr(&rt, select, "value").as_deref(), Some("banana"));
}

#[test]
fn test_select_click_and_outside_click() {
    let mut rt = runtime();
    let (select, options) = select(&mut rt, &[]);
    let body = rt.body();
    let outside = child(&mut rt, body, "button", &[], "Elsewhere");

    rt.click(part(&rt, select, "trigger"));
    rt.click(options[1]);
    assert_eq!(attr(&rt, select, "value").as_deref(), Some("banana"));
    assert!(has(&rt, options[1], "selected"));

    rt.click(part(&rt, select, "trigger"));
    rt.click(outside);
    assert!(!has(&rt, select, "open"));
    assert_eq!(attr(&rt, select, "value").as_deref(), Some("banana"));
}

#[test]
fn test_disabled_select_stays_closed() {
    let mut rt = runtime();
    let (select, _) = select(&mut rt, &[("disabled", "")]);
    rt.click(part(&rt, select, "trigger"));
    assert!(!has(&rt, select, "open"));
}

#[test]
fn test_select_restores_option_deselected_from_outside() {
    let mut rt = runtime();
    let (select, options) = select(&mut rt, &[("value", "banana")]);
    assert!(has(&rt, options[1], "selected"));

    rt.remove_attribute(options[1], "selected");
    assert_eq!(attr(&rt, select, "value").as_deref(), Some("banana"));
    assert_eq!(with_attr(&rt, &options, "selected"), vec![options[1]]);
    assert_eq!(attr(&rt, options[1], "aria-selected").as_deref(), Some("true"));
    assert_eq!(shown_value(&rt, select), "Banana");

    // Options that are not the value can be deselected freely
    rt.click(part(&rt, select, "trigger"));
    rt.click(options[2]);
    assert_eq!(with_attr(&rt, &options, "selected"), vec![options[2]]);
    assert_eq!(attr(&rt, options[1], "aria-selected").as_deref(), Some("false"));
}

// =============================================================================
// Radio group
// =============================================================================

fn radio_group(rt: &mut Runtime, attrs: &[(&str, &str)]) -> (NodeId, Vec<NodeId>) {
    let group = create(rt, RADIO_GROUP, attrs);
    let items = vec![
        child(rt, group, RADIO_GROUP_ITEM, &[("value", "email")], "Email"),
        child(rt, group, RADIO_GROUP_ITEM, &[("value", "sms"), ("disabled", "")], "SMS"),
        child(rt, group, RADIO_GROUP_ITEM, &[("value", "post")], "Post"),
    ];
    attach(rt, group);
    (group, items)
}

fn tab_stops(rt: &Runtime, items: &[NodeId]) -> Vec<NodeId> {
    items.iter().copied().filter(|&i| rt.get_attribute(i, "tabindex") == Some("0")).collect()
}

#[test]
fn test_radio_initial_state() {
    let mut rt = runtime();
    let (group, items) = radio_group(&mut rt, &[("name", "contact")]);
    assert_eq!(attr(&rt, group, "role").as_deref(), Some("radiogroup"));
    assert!(with_attr(&rt, &items, "checked").is_empty());
    assert_eq!(tab_stops(&rt, &items), vec![items[0]]);
    assert_eq!(attr(&rt, items[2], "name").as_deref(), Some("contact"));
    assert_eq!(attr(&rt, items[2], "aria-checked").as_deref(), Some("false"));
}

#[test]
fn test_radio_click_selects_exclusively() {
    let mut rt = runtime();
    let (group, items) = radio_group(&mut rt, &[]);
    let changes = record(&mut rt, group, EventName::Change);

    rt.click(items[2]);
    assert_eq!(with_attr(&rt, &items, "checked"), vec![items[2]]);
    assert_eq!(attr(&rt, items[2], "aria-checked").as_deref(), Some("true"));
    assert_eq!(tab_stops(&rt, &items), vec![items[2]]);
    let radio = part(&rt, items[2], "radio");
    assert_eq!(attr(&rt, radio, "data-state").as_deref(), Some("checked"));

    rt.click(items[0]);
    assert_eq!(with_attr(&rt, &items, "checked"), vec![items[0]]);
    rt.click(items[1]);
    assert_eq!(with_attr(&rt, &items, "checked"), vec![items[0]]);
    assert_eq!(values(&changes), vec!["post", "email"]);
}

#[test]
fn test_radio_arrows_wrap_and_skip_disabled() {
    let mut rt = runtime();
    let (group, items) = radio_group(&mut rt, &[]);
    rt.click(items[0]);

    rt.key_down(Key::ArrowDown);
    assert_eq!(rt.active_element(), Some(items[2]));
    assert_eq!(attr(&rt, group, "value").as_deref(), Some("post"));

    rt.key_down(Key::ArrowRight);
    assert_eq!(rt.active_element(), Some(items[0]));
    assert_eq!(with_attr(&rt, &items, "checked"), vec![items[0]]);

    rt.key_down(Key::ArrowUp);
    assert_eq!(rt.active_element(), Some(items[2]));
}

#[test]
fn test_radio_space_and_external_check() {
    let mut rt = runtime();
    let (group, items) = radio_group(&mut rt, &[]);

    rt.focus(items[0]);
    rt.key_down(Key::Space);
    assert_eq!(attr(&rt, group, "value").as_deref(), Some("email"));

    rt.set_attribute(items[2], "checked", "").unwrap();
    assert_eq!(attr(&rt, group, "value").as_deref(), Some("post"));
    assert_eq!(with_attr(&rt, &items, "checked"), vec![items[2]]);

    rt.set_attribute(group, "value", "email").unwrap();
    assert_eq!(with_attr(&rt, &items, "checked"), vec![items[0]]);
}

#[test]
fn test_disabled_group_ignores_selection() {
    let mut rt = runtime();
    let (group, items) = radio_group(&mut rt, &[("disabled", "")]);
    rt.click(items[0]);
    assert!(with_attr(&rt, &items, "checked").is_empty());
    assert!(tab_stops(&rt, &items).is_empty());
    assert!(!has(&rt, group, "value"));
}

#[test]
fn test_radio_restores_item_unchecked_from_outside() {
    let mut rt = runtime();
    let (group, items) = radio_group(&mut rt, &[]);
    let changes = record(&mut rt, group, EventName::Change);
    rt.click(items[0]);

    rt.remove_attribute(items[0], "checked");
    assert_eq!(attr(&rt, group, "value").as_deref(), Some("email"));
    assert_eq!(with_attr(&rt, &items, "checked"), vec![items[0]]);
    assert_eq!(attr(&rt, items[0], "aria-checked").as_deref(), Some("true"));
    assert_eq!(tab_stops(&rt, &items), vec![items[0]]);
    assert_eq!(values(&changes), vec!["email"]);

    // Switching still unchecks the previous item
    rt.click(items[2]);
    assert_eq!(with_attr(&rt, &items, "checked"), vec![items[2]]);
}
