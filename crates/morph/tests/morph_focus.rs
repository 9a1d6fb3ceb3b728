mod common;

use common::{RecordingCallbacks, assert_markup_eq, fixture, inner_options};
use dom::SelectionRange;
use morph::{ContentSource, MorphOptions, MorphStyle, morph, morph_with_callbacks};

#[test]
fn a_dropped_value_attribute_clears_the_live_value() {
    let (mut doc, main) = fixture("<main><input id=\"x\" type=\"text\"></main>");
    let input = doc.children(main)[0];
    doc.set_value(input, "typed");

    morph(
        &mut doc,
        main,
        ContentSource::Html("<span>note</span><input id=\"x\" type=\"text\">"),
        &inner_options(),
    );

    assert_markup_eq(
        &doc,
        main,
        "<main><span>note</span><input id=\"x\" type=\"text\"></main>",
    );
    assert_eq!(doc.children(main)[1], input, "the input node is reused");
    assert_eq!(doc.value(input), "", "no value attribute means no value");
}

#[test]
fn ignore_active_value_freezes_the_focused_controls_value() {
    let (mut doc, main) = fixture(
        "<main><input id=\"x\" class=\"a\" type=\"text\" value=\"init\"></main>",
    );
    let input = doc.children(main)[0];
    doc.set_value(input, "typed");
    doc.set_active_element(Some(input));
    let options = MorphOptions {
        style: MorphStyle::InnerHtml,
        ignore_active_value: true,
        ..MorphOptions::default()
    };

    morph(
        &mut doc,
        main,
        ContentSource::Html(
            "<input id=\"x\" class=\"b\" type=\"text\" value=\"server\">",
        ),
        &options,
    );

    assert_eq!(doc.value(input), "typed", "what the user typed stays");
    assert_eq!(doc.attribute(input, "value"), Some("init"));
    assert_eq!(
        doc.attribute(input, "class"),
        Some("b"),
        "other attributes still update"
    );
}

#[test]
fn ignore_active_skips_the_focused_element_entirely() {
    let (mut doc, main) =
        fixture("<main><input id=\"x\" class=\"a\"><p>t</p></main>");
    let input = doc.children(main)[0];
    doc.set_active_element(Some(input));
    let options = MorphOptions {
        style: MorphStyle::InnerHtml,
        ignore_active: true,
        ..MorphOptions::default()
    };

    morph(
        &mut doc,
        main,
        ContentSource::Html("<input id=\"x\" class=\"b\"><p>u</p>"),
        &options,
    );

    assert_eq!(doc.attribute(input, "class"), Some("a"));
    assert_eq!(doc.text_content(doc.children(main)[1]), "u");
    assert_eq!(doc.active_element(), Some(input));
}

#[test]
fn focus_and_selection_are_restored_to_a_recreated_control() {
    let (mut doc, main) = fixture("<main><input id=\"a\" type=\"text\"></main>");
    let input = doc.children(main)[0];
    doc.set_active_element(Some(input));
    doc.set_selection(Some(SelectionRange { start: 2, end: 5 }));

    morph(
        &mut doc,
        main,
        ContentSource::Html("<section><textarea id=\"a\"></textarea></section>"),
        &inner_options(),
    );

    let textarea = doc
        .element_by_html_id(main, "a")
        .expect("the recreated control");
    assert_ne!(textarea, input, "a tag change is a different control");
    assert_eq!(doc.active_element(), Some(textarea));
    assert_eq!(doc.selection(), Some(SelectionRange { start: 2, end: 5 }));
}

#[test]
fn restore_focus_can_be_disabled() {
    let (mut doc, main) = fixture("<main><input id=\"a\" type=\"text\"></main>");
    let input = doc.children(main)[0];
    doc.set_active_element(Some(input));
    doc.set_selection(Some(SelectionRange { start: 1, end: 1 }));
    let options = MorphOptions {
        style: MorphStyle::InnerHtml,
        restore_focus: false,
        ..MorphOptions::default()
    };

    morph(
        &mut doc,
        main,
        ContentSource::Html("<section><textarea id=\"a\"></textarea></section>"),
        &options,
    );

    assert_eq!(doc.active_element(), None);
    assert_eq!(doc.selection(), None);
}

#[test]
fn selection_is_not_forced_onto_a_disabled_control() {
    let (mut doc, main) = fixture("<main><input id=\"a\" type=\"text\"></main>");
    let input = doc.children(main)[0];
    doc.set_active_element(Some(input));
    doc.set_selection(Some(SelectionRange { start: 1, end: 3 }));

    morph(
        &mut doc,
        main,
        ContentSource::Html("<section><textarea id=\"a\" disabled></textarea></section>"),
        &inner_options(),
    );

    let textarea = doc
        .element_by_html_id(main, "a")
        .expect("the recreated control");
    assert_eq!(doc.active_element(), Some(textarea));
    assert_eq!(doc.selection(), None);
}

#[test]
fn scanning_stops_at_the_focused_subtree() {
    let (mut doc, main) = fixture(
        "<main><div class=\"a\"><input id=\"f\" type=\"text\"></div>\
         <div class=\"b\"><span id=\"s\">s</span></div></main>",
    );
    let div_a = doc.children(main)[0];
    let div_b = doc.children(main)[1];
    let input = doc.children(div_a)[0];
    let span = doc.children(div_b)[0];
    doc.set_active_element(Some(input));
    let mut callbacks = RecordingCallbacks::default();

    morph_with_callbacks(
        &mut doc,
        main,
        ContentSource::Html(
            "<div class=\"c\"><span id=\"s\">s</span></div>\
             <div class=\"d\"><input id=\"f\" type=\"text\"></div>",
        ),
        &inner_options(),
        &mut callbacks,
    );

    assert_markup_eq(
        &doc,
        main,
        "<main><div class=\"c\"><span id=\"s\">s</span></div>\
         <div class=\"d\"><input id=\"f\" type=\"text\"></div></main>",
    );
    assert_eq!(
        doc.children(main)[1],
        div_a,
        "the focus-holding container is morphed in place, not displaced"
    );
    assert_ne!(doc.children(main)[0], div_b);
    assert_eq!(doc.element_by_html_id(main, "s"), Some(span));
    assert_eq!(doc.active_element(), Some(input));
    assert_eq!(callbacks.removed(), vec![div_b]);
}

#[test]
fn checked_state_follows_the_new_markup() {
    let (mut doc, main) = fixture("<main><input type=\"checkbox\" checked></main>");
    let checkbox = doc.children(main)[0];
    doc.set_boolean_property(checkbox, "checked", false);

    morph(
        &mut doc,
        main,
        ContentSource::Html("<input type=\"checkbox\" checked>"),
        &inner_options(),
    );
    assert!(doc.boolean_property(checkbox, "checked"));

    morph(
        &mut doc,
        main,
        ContentSource::Html("<input type=\"checkbox\">"),
        &inner_options(),
    );
    assert!(!doc.boolean_property(checkbox, "checked"));
    assert!(!doc.has_attribute(checkbox, "checked"));
}

#[test]
fn textarea_content_syncs_live_value_and_text() {
    let (mut doc, main) = fixture("<main><textarea id=\"t\">old</textarea></main>");
    let textarea = doc.children(main)[0];
    doc.set_value(textarea, "user edits");

    morph(
        &mut doc,
        main,
        ContentSource::Html("<textarea id=\"t\">new</textarea>"),
        &inner_options(),
    );

    assert_eq!(doc.value(textarea), "new");
    assert_eq!(doc.text_content(textarea), "new");
}

#[test]
fn option_selection_follows_the_new_markup() {
    let (mut doc, main) = fixture(
        "<main><select><option selected>a</option><option>b</option></select></main>",
    );
    let select = doc.children(main)[0];
    let first = doc.children(select)[0];
    let second = doc.children(select)[1];

    morph(
        &mut doc,
        main,
        ContentSource::Html("<select><option>a</option><option selected>b</option></select>"),
        &inner_options(),
    );

    assert!(!doc.boolean_property(first, "selected"));
    assert!(doc.boolean_property(second, "selected"));
    assert!(!doc.has_attribute(first, "selected"));
    assert!(doc.has_attribute(second, "selected"));
}

#[test]
fn file_inputs_never_sync_their_live_value() {
    let (mut doc, main) = fixture("<main><input type=\"file\"></main>");
    let input = doc.children(main)[0];
    doc.set_value(input, "/tmp/upload.bin");

    morph(
        &mut doc,
        main,
        ContentSource::Html("<input type=\"file\" value=\"x\">"),
        &inner_options(),
    );

    assert_eq!(doc.value(input), "/tmp/upload.bin");
    assert_eq!(
        doc.attribute(input, "value"),
        Some("x"),
        "the attribute still copies; only the live value is exempt"
    );
}
