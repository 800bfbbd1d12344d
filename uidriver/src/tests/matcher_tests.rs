//! Tests for the built-in matchers

use super::fixtures::{element, RecordingInjector, TestNode};
use crate::matcher::{By, Matcher};
use crate::UiElement;

fn el(node: std::sync::Arc<TestNode>) -> UiElement {
    element(&node, &RecordingInjector::new())
}

#[test]
fn text_match_ignores_case_and_zero_width_whitespace() {
    // Accessibility text frequently carries zero-width joiners and
    // non-breaking spaces that the caller cannot see.
    let noisy = el(TestNode::leaf("Sign\u{200B} In\u{FEFF}"));
    assert!(By::text("sign\u{00A0}in").matches(&noisy));
    assert!(!By::text("sign out").matches(&noisy));
}

#[test]
fn non_breaking_space_compares_equal_to_plain_space() {
    // A non-breaking space is still a word separator; it must not make
    // "sign in" collapse into "signin" on either side of the comparison.
    let plain = el(TestNode::leaf("Sign In"));
    assert!(By::text("sign\u{00A0}in").matches(&plain));

    let nbsp = el(TestNode::leaf("Sign\u{00A0}In"));
    assert!(By::text("sign in").matches(&nbsp));
    assert!(!By::text("signin").matches(&nbsp));
}

#[test]
fn text_match_rejects_elements_without_text() {
    let no_text = el(TestNode::builder().class_name("Image").build());
    assert!(!By::text("anything").matches(&no_text));
}

#[test]
fn text_contains_matches_fragments() {
    let target = el(TestNode::leaf("Terms and Conditions"));
    assert!(By::text_contains("and cond").matches(&target));
    assert!(!By::text_contains("privacy").matches(&target));
}

#[test]
fn content_description_match() {
    let target = el(TestNode::builder().content_description("Close dialog").build());
    assert!(By::content_description("close dialog").matches(&target));
    assert!(!By::content_description("open dialog").matches(&target));
}

#[test]
fn class_name_match_is_exact() {
    let target = el(TestNode::builder().class_name("android.widget.Button").build());
    assert!(By::class_name("android.widget.Button").matches(&target));
    // Class names are identifiers, not user text; no normalization applies.
    assert!(!By::class_name("android.widget.button").matches(&target));
}

#[test]
fn visible_match() {
    let hidden = el(TestNode::builder().text("x").invisible().build());
    assert!(By::visible(false).matches(&hidden));
    assert!(!By::visible(true).matches(&hidden));
}

#[test]
fn all_of_requires_every_matcher() {
    let target = el(TestNode::builder()
        .text("OK")
        .class_name("Button")
        .build());
    let both = By::all_of(vec![
        Box::new(By::text("ok")),
        Box::new(By::class_name("Button")),
    ]);
    assert!(both.matches(&target));

    let mismatched = By::all_of(vec![
        Box::new(By::text("ok")),
        Box::new(By::class_name("CheckBox")),
    ]);
    assert!(!mismatched.matches(&target));
}

#[test]
fn descriptions_read_like_selectors() {
    assert_eq!(By::text("Save").to_string(), r#"text="Save""#);
    assert_eq!(By::text_contains("Sav").to_string(), r#"text*="Sav""#);
    assert_eq!(
        By::content_description("icon").to_string(),
        r#"content_desc="icon""#
    );
    assert_eq!(By::class_name("Button").to_string(), r#"class="Button""#);
    assert_eq!(By::visible(true).to_string(), "visible=true");
    assert_eq!(
        By::all_of(vec![
            Box::new(By::text("a")),
            Box::new(By::visible(true)),
        ])
        .to_string(),
        r#"all_of(text="a", visible=true)"#
    );
    assert_eq!(By::predicate("third row", |_| true).to_string(), "third row");
}
