//! `InputSurface` over a contentEditable element.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use loom_editor_core::{InputSurface, MarkupNode, Rect, SurfaceError, SurfaceSelection};
use wasm_bindgen::JsCast;

use crate::cursor::{read_selection, rect_from_dom, restore_caret};
use crate::dom_sync::markup_from_children;

type KeyHandler = Rc<dyn Fn(&web_sys::KeyboardEvent)>;

/// A contentEditable element seen through the editor's surface seam.
///
/// Keydown events caught by [`listen_keydown`](InputSurface::listen_keydown)
/// are forwarded to the key handler given at construction.
pub struct BrowserSurface {
    element: web_sys::HtmlElement,
    on_key: KeyHandler,
}

impl BrowserSurface {
    pub fn new(element: web_sys::HtmlElement) -> Self {
        Self::with_key_handler(element, |_| {})
    }

    pub fn with_key_handler(
        element: web_sys::HtmlElement,
        on_key: impl Fn(&web_sys::KeyboardEvent) + 'static,
    ) -> Self {
        Self {
            element,
            on_key: Rc::new(on_key),
        }
    }

    pub fn element(&self) -> &web_sys::HtmlElement {
        &self.element
    }
}

impl InputSurface for BrowserSurface {
    type KeyListener = EventListener;

    fn is_mounted(&self) -> bool {
        self.element.is_connected()
    }

    fn selection(&self) -> Option<SurfaceSelection> {
        read_selection(&self.element)
    }

    fn bounding_box(&self) -> Option<Rect> {
        Some(rect_from_dom(&self.element.get_bounding_client_rect()))
    }

    fn plain_text(&self) -> String {
        // textContent, not innerText: it matches the concatenated run values
        // without layout-dependent newlines.
        self.element.text_content().unwrap_or_default()
    }

    fn read_markup(&self) -> Result<Vec<MarkupNode>, SurfaceError> {
        Ok(markup_from_children(&self.element))
    }

    fn write_markup(&mut self, markup: &str) -> Result<(), SurfaceError> {
        self.element.set_inner_html(markup);
        Ok(())
    }

    fn restore_caret(&mut self, offset: usize) -> Result<(), SurfaceError> {
        restore_caret(&self.element, offset)
    }

    fn listen_keydown(&mut self) -> Result<EventListener, SurfaceError> {
        let document = self.element.owner_document().ok_or("no document")?;
        let on_key = Rc::clone(&self.on_key);
        Ok(EventListener::new_with_options(
            &document,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                if let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                    on_key(event);
                }
            },
        ))
    }
}
