use crate::element::UiElement;
use std::fmt;

/// A stateless, side-effect-free predicate over UI elements.
///
/// The `Display` form is the matcher's description and ends up in
/// `ElementNotFound` and `Timeout` messages, so it should read like a
/// selector, e.g. `text="Save"`. Matchers are evaluated repeatedly under
/// polling and must stay cheap.
pub trait Matcher: fmt::Display + Send + Sync {
    fn matches(&self, element: &UiElement) -> bool;
}

/// Factory for the built-in matchers.
///
/// ```
/// use uidriver::By;
/// let matcher = By::text("Save");
/// assert_eq!(matcher.to_string(), r#"text="Save""#);
/// ```
pub struct By;

impl By {
    /// Match on the element's text, ignoring case and zero-width whitespace.
    pub fn text(expected: impl Into<String>) -> ByText {
        ByText {
            expected: expected.into(),
        }
    }

    /// Match elements whose text contains the given fragment.
    pub fn text_contains(fragment: impl Into<String>) -> ByTextContains {
        ByTextContains {
            fragment: fragment.into(),
        }
    }

    /// Match on the accessibility content description.
    pub fn content_description(expected: impl Into<String>) -> ByContentDescription {
        ByContentDescription {
            expected: expected.into(),
        }
    }

    /// Match on the element's class name, exactly.
    pub fn class_name(expected: impl Into<String>) -> ByClassName {
        ByClassName {
            expected: expected.into(),
        }
    }

    /// Match on visibility.
    pub fn visible(visible: bool) -> ByVisible {
        ByVisible { visible }
    }

    /// Wrap an arbitrary predicate. `description` is what failure messages
    /// will show, so make it name the condition, not the closure.
    pub fn predicate<F>(description: impl Into<String>, predicate: F) -> ByPredicate<F>
    where
        F: Fn(&UiElement) -> bool + Send + Sync,
    {
        ByPredicate {
            description: description.into(),
            predicate,
        }
    }

    /// Match only when every given matcher accepts the element.
    pub fn all_of(matchers: Vec<Box<dyn Matcher>>) -> AllOf {
        AllOf { matchers }
    }
}

/// Normalize text for comparison: drop zero-width characters, fold
/// non-breaking spaces into plain spaces, then lowercase. Accessibility
/// trees are littered with invisible-whitespace variants of the same phrase.
fn normalize(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '\u{200B}' // zero-width space
            | '\u{200C}' // zero-width non-joiner
            | '\u{200D}' // zero-width joiner
            | '\u{FEFF}' => None, // zero-width no-break space
            '\u{00A0}' => Some(' '), // non-breaking space
            c => Some(c),
        })
        .collect::<String>()
        .to_lowercase()
}

pub struct ByText {
    expected: String,
}

impl Matcher for ByText {
    fn matches(&self, element: &UiElement) -> bool {
        element
            .text()
            .is_some_and(|text| normalize(&text) == normalize(&self.expected))
    }
}

impl fmt::Display for ByText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text={:?}", self.expected)
    }
}

pub struct ByTextContains {
    fragment: String,
}

impl Matcher for ByTextContains {
    fn matches(&self, element: &UiElement) -> bool {
        element
            .text()
            .is_some_and(|text| normalize(&text).contains(&normalize(&self.fragment)))
    }
}

impl fmt::Display for ByTextContains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text*={:?}", self.fragment)
    }
}

pub struct ByContentDescription {
    expected: String,
}

impl Matcher for ByContentDescription {
    fn matches(&self, element: &UiElement) -> bool {
        element
            .content_description()
            .is_some_and(|desc| normalize(&desc) == normalize(&self.expected))
    }
}

impl fmt::Display for ByContentDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content_desc={:?}", self.expected)
    }
}

pub struct ByClassName {
    expected: String,
}

impl Matcher for ByClassName {
    fn matches(&self, element: &UiElement) -> bool {
        element.class_name().is_some_and(|name| name == self.expected)
    }
}

impl fmt::Display for ByClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class={:?}", self.expected)
    }
}

pub struct ByVisible {
    visible: bool,
}

impl Matcher for ByVisible {
    fn matches(&self, element: &UiElement) -> bool {
        element.is_visible() == self.visible
    }
}

impl fmt::Display for ByVisible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visible={}", self.visible)
    }
}

pub struct ByPredicate<F> {
    description: String,
    predicate: F,
}

impl<F> Matcher for ByPredicate<F>
where
    F: Fn(&UiElement) -> bool + Send + Sync,
{
    fn matches(&self, element: &UiElement) -> bool {
        (self.predicate)(element)
    }
}

impl<F> fmt::Display for ByPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

pub struct AllOf {
    matchers: Vec<Box<dyn Matcher>>,
}

impl Matcher for AllOf {
    fn matches(&self, element: &UiElement) -> bool {
        self.matchers.iter().all(|m| m.matches(element))
    }
}

impl fmt::Display for AllOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all_of(")?;
        for (i, matcher) in self.matchers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{matcher}")?;
        }
        write!(f, ")")
    }
}
