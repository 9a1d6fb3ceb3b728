mod common;

use common::{RecordingCallbacks, assert_markup_eq, fixture, inner_options};
use morph::{AttributeUpdateKind, ContentSource, morph_with_callbacks};

#[test]
fn addition_veto_blocks_inserts() {
    let (mut doc, main) = fixture("<main><p>a</p></main>");
    let mut callbacks = RecordingCallbacks {
        veto_additions: true,
        ..RecordingCallbacks::default()
    };

    morph_with_callbacks(
        &mut doc,
        main,
        ContentSource::Html("<p>a</p><span>x</span>"),
        &inner_options(),
        &mut callbacks,
    );

    assert_markup_eq(&doc, main, "<main><p>a</p></main>");
    assert!(callbacks.added().is_empty());
}

#[test]
fn removal_veto_keeps_nodes() {
    let (mut doc, main) = fixture("<main><p>a</p><div>z</div></main>");
    let mut callbacks = RecordingCallbacks {
        veto_removals: true,
        ..RecordingCallbacks::default()
    };

    morph_with_callbacks(
        &mut doc,
        main,
        ContentSource::Html("<p>a</p>"),
        &inner_options(),
        &mut callbacks,
    );

    assert_markup_eq(&doc, main, "<main><p>a</p><div>z</div></main>");
    assert!(callbacks.removed().is_empty());
}

#[test]
fn morph_veto_freezes_a_subtree() {
    let (mut doc, main) = fixture("<main><p id=\"keep\" class=\"a\">x</p></main>");
    let p = doc.children(main)[0];
    let mut callbacks = RecordingCallbacks {
        veto_morph_ids: vec!["keep".to_owned()],
        ..RecordingCallbacks::default()
    };

    morph_with_callbacks(
        &mut doc,
        main,
        ContentSource::Html("<p id=\"keep\" class=\"b\">y</p>"),
        &inner_options(),
        &mut callbacks,
    );

    assert_eq!(doc.attribute(p, "class"), Some("a"));
    assert_eq!(doc.text_content(p), "x");
    assert!(
        callbacks.events.is_empty(),
        "a vetoed morph reports nothing, not even completion"
    );
}

#[test]
fn attribute_freeze_blocks_updates_and_removals() {
    let (mut doc, main) = fixture("<main><div class=\"a\" data-keep=\"1\">t</div></main>");
    let div = doc.children(main)[0];
    let mut callbacks = RecordingCallbacks {
        frozen_attributes: vec!["class".to_owned(), "data-keep".to_owned()],
        ..RecordingCallbacks::default()
    };

    morph_with_callbacks(
        &mut doc,
        main,
        ContentSource::Html("<div class=\"b\">t</div>"),
        &inner_options(),
        &mut callbacks,
    );

    assert_eq!(doc.attribute(div, "class"), Some("a"));
    assert_eq!(doc.attribute(div, "data-keep"), Some("1"));
    assert!(
        callbacks
            .attribute_events
            .contains(&("class".to_owned(), AttributeUpdateKind::Update))
    );
    assert!(
        callbacks
            .attribute_events
            .contains(&("data-keep".to_owned(), AttributeUpdateKind::Remove))
    );
}
