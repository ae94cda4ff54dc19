//! Tests for stylesheets realized against an in-memory rule store.

use std::collections::BTreeSet;
use std::sync::Arc;

use tessera_style::prelude::*;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Declarations of a `sel{k:v;k:v}` text, ignoring their order.
fn declaration_set(css: &str) -> BTreeSet<String> {
    let open = css.find('{').expect("Missing opening brace");
    let body = &css[open + 1..css.len() - 1];
    body.split(';')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_group_selector_render_format() {
    let rule = Rule::with_pointers([Pointer::class("a"), Pointer::class("b")])
        .property(&keys::COLOR, Color::RED);
    assert_eq!(rule.render(), ".a,.b{color:red}");
}

#[test]
fn test_empty_rule_keeps_braces() {
    let sheet = StyleSheet::new(SheetConfig::preview()).with_rules(Rule::new(".empty"));
    assert_eq!(sheet.render_css(), ".empty{}");
}

#[test]
fn test_multiple_declarations_render_as_set() {
    let rule = Rule::new(".box")
        .property(&keys::WIDTH, Length::px(10.0))
        .property(&keys::HEIGHT, Length::percent(50.0))
        .property(&keys::DISPLAY, Display::Flex);

    let rendered = rule.render();
    assert!(rendered.starts_with(".box{"));
    assert!(!rendered.ends_with(";}"));
    assert_eq!(
        declaration_set(&rendered),
        ["display:flex", "height:50%", "width:10px"]
            .into_iter()
            .map(String::from)
            .collect()
    );
}

#[test]
fn test_upsert_same_key_last_wins() {
    let rule = Rule::new(".a")
        .property(&keys::COLOR, Color::RED)
        .property(&keys::COLOR, Color::hex(0x00ff00));
    assert_eq!(rule.declarations().len(), 1);
    assert_eq!(rule.render(), ".a{color:#00ff00}");
}

#[test]
fn test_important_twice_appends_twice() {
    // Not idempotent: each call appends the suffix again.
    let rule = Rule::new(".a").properties(keys::COLOR.value(Color::RED).important().important());
    assert_eq!(rule.render(), ".a{color:red!important!important}");
}

#[test]
fn test_conditional_tree_flattens_in_order() {
    let show_extra = false;
    let sheet = StyleSheet::new(SheetConfig::preview()).with_rules(rules![
        Rule::new(".first"),
        optional(show_extra.then(|| Rule::new(".extra"))),
        either(show_extra, Rule::new(".wide"), Rule::new(".narrow")),
        sequence([Rule::new(".x"), Rule::new(".y")]),
        empty(),
    ]);

    let selectors: Vec<_> = sheet.rules().iter().map(Rule::selector_text).collect();
    assert_eq!(selectors, [".first", ".narrow", ".x", ".y"]);
}

#[test]
fn test_apply_inserts_in_document_order() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let sheet = StyleSheet::default().with_rules(rules![
        "@charset \"utf-8\";",
        Rule::new(".a").property(&keys::Z_INDEX, 2),
        Keyframes::new("fade").frame("to", keys::OPACITY.value(0.0)),
        Media::new("print", Rule::new(".a").property(&keys::DISPLAY, Display::None)),
    ]);

    assert_eq!(sheet.apply(store.clone()), Ok(4));
    assert_eq!(
        store.css_texts(),
        [
            "@charset \"utf-8\";",
            ".a{z-index:2}",
            "@keyframes fade{to{opacity:0}}",
            "@media print{.a{display:none}}",
        ]
    );
}

#[test]
fn test_disabled_toggle_sequence_without_reinsertion() {
    let store = Arc::new(MemoryStore::new());
    let sheet = StyleSheet::default().with_rules(Rule::new(".a"));
    sheet.apply(store.clone()).expect("Failed to apply stylesheet");

    sheet.set_disabled(true);
    sheet.set_disabled(false);
    sheet.set_disabled(true);

    assert_eq!(store.disabled_history(), vec![true, false, true]);
    assert_eq!(store.len(), 1);
    assert!(sheet.is_disabled());
}

#[test]
fn test_reapply_without_clearing_duplicates_rules() {
    // Known limitation: apply replays from scratch.
    let store = Arc::new(MemoryStore::new());
    let sheet = StyleSheet::default().with_rules(Rule::new(".a").property(&keys::COLOR, Color::RED));

    sheet.apply(store.clone()).expect("Failed to apply stylesheet");
    sheet.apply(store.clone()).expect("Failed to apply stylesheet");
    assert_eq!(store.css_texts(), [".a{color:red}", ".a{color:red}"]);
}

#[test]
fn test_reapply_after_clearing_store() {
    let store = Arc::new(MemoryStore::new());
    let color = State::new(Color::RED);
    let sheet = StyleSheet::default().with_rules(Rule::new(".a").properties(keys::COLOR.bind(color.clone())));

    sheet.apply(store.clone()).expect("Failed to apply stylesheet");
    store.clear();
    sheet.apply(store.clone()).expect("Failed to apply stylesheet");

    color.set(Color::BLUE);
    assert_eq!(store.css_texts(), [".a{color:blue}"]);
}

#[test]
fn test_rejected_insertion_is_skipped() {
    let store = Arc::new(MemoryStore::rejecting(|css| css.contains("broken")));
    let sheet = StyleSheet::default().with_rules(rules![
        Rule::new(".ok-1"),
        Rule::new(".broken"),
        Rule::new(".ok-2"),
    ]);

    assert_eq!(sheet.apply(store.clone()), Ok(2));
    assert_eq!(store.css_texts(), [".ok-1{}", ".ok-2{}"]);

    // The skipped rule still accepts mutations in memory.
    let rules = sheet.rules();
    let broken = &rules[1];
    broken.set("color", "red");
    assert!(!broken.is_realized());
    assert_eq!(broken.render(), ".broken{color:red}");
}

#[test]
fn test_alias_declarations_update_together() {
    let store = Arc::new(MemoryStore::new());
    let select = State::new(UserSelect::None);
    let sheet = StyleSheet::default().with_rules(
        Rule::new(".label").properties(keys::USER_SELECT.bind(select.clone()).with_alias("-webkit-user-select")),
    );
    sheet.apply(store.clone()).expect("Failed to apply stylesheet");

    select.set(UserSelect::Text);

    let rule = store.rule(0).expect("Missing rule");
    assert_eq!(rule.declaration("user-select").as_deref(), Some("text"));
    assert_eq!(rule.declaration("-webkit-user-select").as_deref(), Some("text"));
    assert_eq!(rule.declaration_count(), 2);
}

#[test]
fn test_optional_state_none_removes_live_declaration() {
    let store = Arc::new(MemoryStore::new());
    let height = State::new(Some(Length::px(5.0)));
    let sheet = StyleSheet::default()
        .with_rules(Rule::new(".a").properties(Property::bind_optional(&keys::HEIGHT, height.clone())));
    sheet.apply(store.clone()).expect("Failed to apply stylesheet");
    assert_eq!(store.css_texts(), [".a{height:5px}"]);

    height.set(None);
    assert_eq!(store.css_texts(), [".a{}"]);
}

#[test]
fn test_reactive_color_channels_update_live_rule() {
    let store = Arc::new(MemoryStore::new());
    let green = State::new(0u8);
    let alpha = State::new(1.0f32);
    let color = ReactiveColor::new(State::new(10), green.clone(), State::new(30), alpha.clone());
    let sheet = StyleSheet::default()
        .with_rules(Rule::new(".swatch").properties(keys::BACKGROUND_COLOR.reactive(color)));
    sheet.apply(store.clone()).expect("Failed to apply stylesheet");

    green.set(20);
    assert_eq!(store.css_texts(), [".swatch{background-color:rgba(10,20,30,1)}"]);

    alpha.set(0.5);
    assert_eq!(store.css_texts(), [".swatch{background-color:rgba(10,20,30,0.5)}"]);
}

#[test]
fn test_keyframe_state_change_rerenders_block() {
    let store = Arc::new(MemoryStore::new());
    let end = State::new(0.0f32);
    let sheet = StyleSheet::default().with_rules(
        Keyframes::new("fade")
            .frame("from", keys::OPACITY.value(1.0))
            .frame("to", keys::OPACITY.bind(end.clone())),
    );
    sheet.apply(store.clone()).expect("Failed to apply stylesheet");

    end.set(0.25);
    assert_eq!(
        store.css_texts(),
        ["@keyframes fade{from{opacity:1}to{opacity:0.25}}"]
    );
    assert_eq!(sheet.keyframes().len(), 1);
}

#[test]
fn test_static_preview_tracks_state_without_store() {
    let store = Arc::new(MemoryStore::new());
    let width = State::new(Length::px(1.0));
    let sheet = StyleSheet::new(SheetConfig::preview())
        .with_rules(Rule::new(".a").properties(keys::WIDTH.bind(width.clone())));

    assert!(sheet.apply(store.clone()).is_err());
    width.set(Length::Auto);

    assert!(store.is_empty());
    assert_eq!(sheet.render_css(), ".a{width:auto}");
}

#[test]
fn test_dropping_sheet_releases_listeners() {
    let width = State::new(Length::px(1.0));
    let sheet = StyleSheet::default().with_rules(Rule::new(".a").properties(keys::WIDTH.bind(width.clone())));
    assert_eq!(width.subscriber_count(), 1);

    drop(sheet);
    assert_eq!(width.subscriber_count(), 0);
}
