mod common;

use common::*;
use eva_components::tags::{CAROUSEL, CAROUSEL_ITEM};
use eva_runtime::Runtime;
use eva_runtime::dom::{EventDetail, EventName, Key, NodeId};
use eva_runtime::i18n::TranslationTable;

fn carousel(rt: &mut Runtime, attrs: &[(&str, &str)], count: usize) -> (NodeId, Vec<NodeId>) {
    let carousel = create(rt, CAROUSEL, attrs);
    let slides = (0..count)
        .map(|i| child(rt, carousel, CAROUSEL_ITEM, &[], &format!("Slide body {i}")))
        .collect();
    attach(rt, carousel);
    (carousel, slides)
}

fn index(rt: &Runtime, carousel: NodeId) -> Option<String> {
    attr(rt, carousel, "current-index")
}

fn live_text(rt: &Runtime, carousel: NodeId) -> String {
    rt.text_content(part(rt, carousel, "live-region"))
}

#[test]
fn test_next_wraps_and_announces() {
    let mut rt = runtime();
    let (carousel, slides) = carousel(&mut rt, &[("current-index", "3")], 4);
    assert_eq!(index(&rt, carousel).as_deref(), Some("3"));

    rt.click(part(&rt, carousel, "next"));
    assert_eq!(index(&rt, carousel).as_deref(), Some("0"));
    assert!(!has(&rt, slides[0], "hidden"));
    assert!(has(&rt, slides[3], "hidden"));

    // Announced only after the quiet window
    assert_eq!(live_text(&rt, carousel), "");
    let quiet = rt.config().announce_debounce_ms;
    rt.advance_time(quiet);
    assert_eq!(live_text(&rt, carousel), "Slide 1 of 4");
}

#[test]
fn test_previous_wraps() {
    let mut rt = runtime();
    let (carousel, _) = carousel(&mut rt, &[], 4);
    let changes = record(&mut rt, carousel, EventName::SlideChange);

    rt.click(part(&rt, carousel, "previous"));
    assert_eq!(index(&rt, carousel).as_deref(), Some("3"));
    assert_eq!(*changes.borrow(), vec![EventDetail::Index { index: 3 }]);
}

#[test]
fn test_rapid_changes_announce_last_state() {
    let mut rt = runtime();
    let (carousel, _) = carousel(&mut rt, &[], 5);

    for _ in 0..3 {
        rt.click(part(&rt, carousel, "next"));
        rt.advance_time(100);
    }
    assert_eq!(live_text(&rt, carousel), "");
    rt.advance_time(200);
    assert_eq!(live_text(&rt, carousel), "Slide 4 of 5");
}

#[test]
fn test_go_to_out_of_range_is_ignored() {
    let mut rt = runtime();
    let (carousel, _) = carousel(&mut rt, &[], 3);
    let changes = record(&mut rt, carousel, EventName::SlideChange);

    rt.set_attribute(carousel, "current-index", "7").unwrap();
    assert_eq!(index(&rt, carousel).as_deref(), Some("0"));
    rt.set_attribute(carousel, "current-index", "2").unwrap();
    assert_eq!(index(&rt, carousel).as_deref(), Some("2"));
    assert_eq!(changes.borrow().len(), 1);
}

#[test]
fn test_slides_are_labelled() {
    let mut rt = runtime();
    let (_, slides) = carousel(&mut rt, &[], 2);
    assert_eq!(attr(&rt, slides[1], "aria-roledescription").as_deref(), Some("slide"));
    assert_eq!(attr(&rt, slides[1], "aria-label").as_deref(), Some("Slide 2 of 2"));
    assert_eq!(attr(&rt, slides[1], "role").as_deref(), Some("group"));
}

#[test]
fn test_indicator_keys_move_focus_without_changing_slide() {
    let mut rt = runtime();
    let (carousel, _) = carousel(&mut rt, &[], 3);
    let indicator = |rt: &Runtime, i: usize| rt.query_parts(carousel, "indicator")[i];

    assert_eq!(attr(&rt, indicator(&rt, 0), "aria-current").as_deref(), Some("true"));
    rt.focus(indicator(&rt, 0));

    rt.key_down(Key::ArrowLeft);
    assert_eq!(rt.active_element(), Some(indicator(&rt, 2)));
    assert_eq!(index(&rt, carousel).as_deref(), Some("0"));
    assert_eq!(attr(&rt, indicator(&rt, 2), "tabindex").as_deref(), Some("0"));
    assert_eq!(attr(&rt, indicator(&rt, 0), "tabindex").as_deref(), Some("-1"));

    rt.key_down(Key::ArrowRight);
    rt.key_down(Key::End);
    assert_eq!(rt.active_element(), Some(indicator(&rt, 2)));

    rt.key_down(Key::Enter);
    assert_eq!(index(&rt, carousel).as_deref(), Some("2"));
    assert_eq!(attr(&rt, indicator(&rt, 2), "aria-current").as_deref(), Some("true"));
    assert_eq!(rt.active_element(), Some(indicator(&rt, 2)));
}

#[test]
fn test_autoplay_pauses_on_hover() {
    let mut rt = runtime();
    let (carousel, _) = carousel(&mut rt, &[("auto-play", ""), ("interval", "1000")], 3);

    rt.advance_time(1000);
    assert_eq!(index(&rt, carousel).as_deref(), Some("1"));

    rt.hover(carousel);
    rt.advance_time(3000);
    assert_eq!(index(&rt, carousel).as_deref(), Some("1"));

    rt.unhover(carousel);
    rt.advance_time(1000);
    assert_eq!(index(&rt, carousel).as_deref(), Some("2"));
}

#[test]
fn test_huge_interval_does_not_overflow() {
    let mut rt = runtime();
    let max = u64::MAX.to_string();
    let (carousel, _) = carousel(&mut rt, &[("auto-play", ""), ("interval", max.as_str())], 3);

    rt.advance_time(1_000);
    assert_eq!(index(&rt, carousel).as_deref(), Some("0"));

    // The clock saturates; the interval fires once and is then spent
    rt.advance_time(u64::MAX);
    assert_eq!(index(&rt, carousel).as_deref(), Some("1"));
    assert_eq!(rt.pending_timers(), 0);
}

#[test]
fn test_detach_cancels_timers() {
    let mut rt = runtime();
    let (carousel, _) = carousel(&mut rt, &[("auto-play", "")], 3);
    rt.click(part(&rt, carousel, "next"));
    assert_eq!(rt.pending_timers(), 2);

    rt.remove(carousel);
    assert_eq!(rt.pending_timers(), 0);
    rt.advance_time(60_000);
}

#[test]
fn test_structural_change_recounts() {
    let mut rt = runtime();
    let (carousel, slides) = carousel(&mut rt, &[("current-index", "2")], 3);

    rt.remove(slides[2]);
    assert_eq!(index(&rt, carousel).as_deref(), Some("1"));
    assert_eq!(rt.query_parts(carousel, "indicator").len(), 2);

    child(&mut rt, carousel, CAROUSEL_ITEM, &[], "New");
    assert_eq!(rt.query_parts(carousel, "indicator").len(), 3);
}

#[test]
fn test_translated_announcement() {
    let mut rt = runtime();
    rt.locale().add_table(
        "fr",
        TranslationTable::new().with("carousel.slideOf", "Diapositive {current} sur {total}"),
    );
    rt.set_locale("fr");
    let (carousel, _) = carousel(&mut rt, &[], 2);

    rt.click(part(&rt, carousel, "next"));
    rt.advance_time(1_000);
    assert_eq!(live_text(&rt, carousel), "Diapositive 2 sur 2");
}
