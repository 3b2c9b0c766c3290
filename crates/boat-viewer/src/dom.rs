//! Host page access - container lookup, canvas insertion, and text output

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

#[derive(Error, Debug)]
pub enum HostError {
    #[error("No browser window")]
    NoWindow,
    #[error("No document")]
    NoDocument,
    #[error("No #{0} element found")]
    MissingElement(String),
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        HostError::Dom(format!("{:?}", value))
    }
}

#[cfg(target_arch = "wasm32")]
fn window() -> Result<web_sys::Window, HostError> {
    web_sys::window().ok_or(HostError::NoWindow)
}

// No browser outside wasm; every DOM call reports a missing window
#[cfg(not(target_arch = "wasm32"))]
fn window() -> Result<web_sys::Window, HostError> {
    Err(HostError::NoWindow)
}

fn document() -> Result<Document, HostError> {
    window()?.document().ok_or(HostError::NoDocument)
}

fn element(id: &str) -> Result<Element, HostError> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| HostError::MissingElement(id.to_string()))
}

/// Create the render canvas inside the container, reusing one left over
/// from a previous start
pub fn attach_canvas(container_id: &str, canvas_id: &str) -> Result<(), HostError> {
    let document = document()?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| HostError::MissingElement(container_id.to_string()))?;

    if document.get_element_by_id(canvas_id).is_some() {
        return Ok(());
    }

    let canvas = document.create_element("canvas")?;
    canvas.set_id(canvas_id);
    canvas.set_attribute("style", "display: block; outline: none;")?;
    container.append_child(&canvas)?;

    tracing::debug!("Attached #{} to #{}", canvas_id, container_id);
    Ok(())
}

/// Current client size of an element in CSS pixels
pub fn element_size(id: &str) -> Result<(f32, f32), HostError> {
    let element = element(id)?;
    Ok((element.client_width() as f32, element.client_height() as f32))
}

/// Replace an element's text content
pub fn set_text(id: &str, text: &str) -> Result<(), HostError> {
    element(id)?.set_text_content(Some(text));
    Ok(())
}

/// Raise `flag` whenever the browser window is resized
pub fn watch_window_resize(flag: Arc<AtomicBool>) -> Result<(), HostError> {
    let window = window()?;

    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        flag.store(true, Ordering::Relaxed);
    }) as Box<dyn FnMut(web_sys::Event)>);

    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    // Listener stays registered for the lifetime of the page
    closure.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_build_has_no_host() {
        assert!(matches!(set_text("boat-part-title", "Hull"), Err(HostError::NoWindow)));
        assert!(matches!(element_size("boat-3d"), Err(HostError::NoWindow)));
    }

    #[test]
    fn test_missing_element_message() {
        let e = HostError::MissingElement("boat-3d".to_string());
        assert_eq!(e.to_string(), "No #boat-3d element found");
    }
}
