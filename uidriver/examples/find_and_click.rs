//! Drives a tiny in-memory UI tree end to end: wait for a button, click it,
//! type into a field, then dump the tree.
//!
//! Run with: cargo run --example find_and_click

use anyhow::Result;
use std::sync::Arc;
use uidriver::{
    AccessibilityEngine, AutomationError, By, Driver, InputEvent, InputInjector, MatchFinder,
    Rect, ScreenshotResult, UiElement, UiElementAttributes, UiElementImpl,
};

/// Injector that just prints what would be delivered.
#[derive(Debug)]
struct PrintingInjector;

impl InputInjector for PrintingInjector {
    fn inject(&self, event: &InputEvent) -> bool {
        println!("  inject {event:?}");
        true
    }
}

#[derive(Debug)]
struct DemoNode {
    attributes: UiElementAttributes,
    children: Vec<Arc<DemoNode>>,
}

#[derive(Debug, Clone)]
struct DemoElement {
    node: Arc<DemoNode>,
    injector: Arc<PrintingInjector>,
}

impl UiElementImpl for DemoElement {
    fn object_id(&self) -> usize {
        Arc::as_ptr(&self.node) as usize
    }

    fn attributes(&self) -> UiElementAttributes {
        self.node.attributes.clone()
    }

    fn children(&self) -> Result<Vec<UiElement>, AutomationError> {
        Ok(self
            .node
            .children
            .iter()
            .map(|child| {
                UiElement::new(Box::new(DemoElement {
                    node: child.clone(),
                    injector: self.injector.clone(),
                }))
            })
            .collect())
    }

    fn injector(&self) -> &dyn InputInjector {
        self.injector.as_ref()
    }

    fn clone_box(&self) -> Box<dyn UiElementImpl> {
        Box::new(self.clone())
    }
}

struct DemoEngine {
    root: Arc<DemoNode>,
    injector: Arc<PrintingInjector>,
}

impl AccessibilityEngine for DemoEngine {
    fn root_element(&self) -> UiElement {
        UiElement::new(Box::new(DemoElement {
            node: self.root.clone(),
            injector: self.injector.clone(),
        }))
    }

    fn take_screenshot(&self) -> Result<Option<ScreenshotResult>, AutomationError> {
        Ok(None)
    }
}

fn node(text: &str, class: &str, bounds: Rect, children: Vec<Arc<DemoNode>>) -> Arc<DemoNode> {
    Arc::new(DemoNode {
        attributes: UiElementAttributes {
            text: Some(text.to_string()),
            content_description: None,
            class_name: Some(class.to_string()),
            bounds,
            visible: true,
        },
        children,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let root = node(
        "window",
        "Window",
        Rect::new(0.0, 0.0, 800.0, 600.0),
        vec![
            node("Search", "TextField", Rect::new(20.0, 20.0, 400.0, 40.0), vec![]),
            node("Go", "Button", Rect::new(440.0, 20.0, 80.0, 40.0), vec![]),
        ],
    );
    let driver = Driver::new(Arc::new(DemoEngine {
        root,
        injector: Arc::new(PrintingInjector),
    }));

    println!("waiting for the Go button");
    let button = driver.on(&MatchFinder::new(By::text("Go")))?;
    println!("clicking {:?}", button.bounds());
    button.click()?;

    println!("typing into the search field");
    let field = driver.find(&MatchFinder::new(By::class_name("TextField")))?;
    field.type_text("uidriver")?;

    let dump = std::env::temp_dir().join("find_and_click_tree.json");
    if driver.dump_tree(&dump) {
        println!("tree dumped to {}", dump.display());
    }
    Ok(())
}
