//! WASM bindings for the page view

use crate::document::{Document, UpdateOrigin};
use crate::error::MeasureError;
use crate::layout::{BlockRange, CaretCoords, LayoutMeasurer, PagesPerRow};
use crate::settings::PageSettings;
use crate::view::ViewMode;
use crate::PageView;
use js_sys::{Float64Array, Function, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Resolve a header/footer template for one page
#[wasm_bindgen(js_name = resolveTemplate)]
pub fn resolve_template(template: &str, page_number: usize, total_pages: usize, title: &str) -> String {
    crate::template::resolve(template, page_number, total_pages, title)
}

/// Measurer backed by the host's editing surface callbacks:
/// `heightOf(start, end) -> number`, `coordsAt(pos) -> {top, left, bottom}`
/// and `contentHeight() -> number`.
struct JsMeasurer {
    height_of: Function,
    coords_at: Function,
    content_height: Function,
}

fn finite(value: JsValue) -> Result<f32, MeasureError> {
    match value.as_f64() {
        Some(v) if v.is_finite() => Ok(v as f32),
        Some(_) => Err(MeasureError::NonFinite),
        None => Err(MeasureError::NotRendered),
    }
}

impl LayoutMeasurer for JsMeasurer {
    fn height_of(&self, range: BlockRange) -> Result<f32, MeasureError> {
        let value = self
            .height_of
            .call2(
                &JsValue::NULL,
                &JsValue::from(range.start as u32),
                &JsValue::from(range.end as u32),
            )
            .map_err(|_| MeasureError::NotRendered)?;
        finite(value)
    }

    fn coords_at(&self, pos: usize) -> Result<CaretCoords, MeasureError> {
        let value = self
            .coords_at
            .call1(&JsValue::NULL, &JsValue::from(pos as u32))
            .map_err(|_| MeasureError::NotRendered)?;
        if value.is_null() || value.is_undefined() {
            return Err(MeasureError::NotRendered);
        }
        let field = |name: &str| {
            Reflect::get(&value, &JsValue::from_str(name))
                .map_err(|_| MeasureError::NotRendered)
                .and_then(finite)
        };
        let top = field("top")?;
        Ok(CaretCoords {
            top,
            left: field("left").unwrap_or(0.0),
            bottom: field("bottom").unwrap_or(top),
        })
    }

    fn content_height(&self) -> f32 {
        self.content_height
            .call0(&JsValue::NULL)
            .ok()
            .and_then(|v| v.as_f64())
            .filter(|v| v.is_finite())
            .map(|v| v as f32)
            .unwrap_or(0.0)
    }
}

/// Stand-in before the host attached a surface: every lookup fails, so
/// frame work is skipped and retried
struct Detached;

impl LayoutMeasurer for Detached {
    fn height_of(&self, _range: BlockRange) -> Result<f32, MeasureError> {
        Err(MeasureError::NotRendered)
    }

    fn coords_at(&self, _pos: usize) -> Result<CaretCoords, MeasureError> {
        Err(MeasureError::NotRendered)
    }

    fn content_height(&self) -> f32 {
        0.0
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("null"))
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// WASM-exposed page view wrapper. Diffs, frames and status are returned
/// as JSON strings.
#[wasm_bindgen]
pub struct WasmPageView {
    view: PageView,
    measurer: Option<JsMeasurer>,
}

#[wasm_bindgen]
impl WasmPageView {
    /// Create a page view with default settings
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            view: PageView::new(PageSettings::default()),
            measurer: None,
        }
    }

    /// Create a page view from persisted settings JSON
    #[wasm_bindgen(js_name = withSettings)]
    pub fn with_settings(settings_json: &str) -> Result<WasmPageView, JsError> {
        let settings = PageSettings::from_json(settings_json).map_err(js_error)?;
        Ok(Self {
            view: PageView::new(settings),
            measurer: None,
        })
    }

    /// Attach a new editing surface through its measurement callbacks
    #[wasm_bindgen(js_name = attachSurface)]
    pub fn attach_surface(&mut self, height_of: Function, coords_at: Function, content_height: Function) {
        self.measurer = Some(JsMeasurer {
            height_of,
            coords_at,
            content_height,
        });
        self.view.attach_surface();
    }

    /// Discard the view: pending timers and frame work are dropped
    pub fn teardown(&mut self) {
        self.measurer = None;
        self.view.teardown();
    }

    #[wasm_bindgen(js_name = updateSettings)]
    pub fn update_settings(&mut self, settings_json: &str) -> Result<(), JsError> {
        let settings = PageSettings::from_json(settings_json).map_err(js_error)?;
        self.view.update_settings(settings).map_err(js_error)
    }

    #[wasm_bindgen(js_name = getSettings)]
    pub fn get_settings(&self) -> Result<String, JsError> {
        self.view.settings().to_json().map_err(js_error)
    }

    #[wasm_bindgen(js_name = setDocumentInfo)]
    pub fn set_document_info(&mut self, title: &str, number: Option<String>) {
        let document = self.view.document_mut();
        document.set_title(title);
        document.set_number(number);
    }

    /// Content tree changed on the live surface (`blocks_json` is an array of blocks)
    #[wasm_bindgen(js_name = contentChanged)]
    pub fn content_changed(&mut self, blocks_json: &str, now: f64) -> Result<(), JsError> {
        let blocks = Document::parse_blocks(blocks_json).map_err(js_error)?;
        self.view
            .document_mut()
            .replace_blocks(blocks, UpdateOrigin::Surface);
        self.view.on_content_changed(now);
        Ok(())
    }

    /// Content replaced programmatically (file load, template insertion)
    #[wasm_bindgen(js_name = setContent)]
    pub fn set_content(&mut self, blocks_json: &str, now: f64) -> Result<(), JsError> {
        let blocks = Document::parse_blocks(blocks_json).map_err(js_error)?;
        self.view.replace_content(blocks, now);
        Ok(())
    }

    #[wasm_bindgen(js_name = selectionChanged)]
    pub fn selection_changed(&mut self, caret_pos: usize, now: f64) -> String {
        let measurer = match &self.measurer {
            Some(measurer) => measurer as &dyn LayoutMeasurer,
            None => &Detached,
        };
        to_json(&self.view.on_selection_change(measurer, caret_pos, now))
    }

    #[wasm_bindgen(js_name = pageClick)]
    pub fn page_click(&mut self, page: usize, x: f32, y: f32) -> String {
        to_json(&self.view.on_page_click(page, x, y))
    }

    pub fn scroll(&mut self, offset: f32, now: f64) -> String {
        to_json(&self.view.on_scroll(offset, now))
    }

    #[wasm_bindgen(js_name = userScrollInput)]
    pub fn user_scroll_input(&mut self) {
        self.view.on_user_scroll_input();
    }

    pub fn resize(&mut self, container_width: f32, viewport_height: f32) {
        self.view.on_resize(container_width, viewport_height);
    }

    /// Run deferred work; call from `requestAnimationFrame`
    #[wasm_bindgen(js_name = animationFrame)]
    pub fn animation_frame(&mut self, now: f64) -> String {
        let measurer = match &self.measurer {
            Some(measurer) => measurer as &dyn LayoutMeasurer,
            None => &Detached,
        };
        to_json(&self.view.on_animation_frame(now, measurer))
    }

    /// Scroll to a page; out-of-range numbers are clamped
    #[wasm_bindgen(js_name = navigateToPage)]
    pub fn navigate_to_page(&mut self, page: f64, now: f64) -> usize {
        let page = if page.is_finite() { page as i64 } else { 0 };
        self.view.navigate_to_page(page, now)
    }

    #[wasm_bindgen(js_name = getCurrentPage)]
    pub fn get_current_page(&self) -> usize {
        self.view.current_page()
    }

    #[wasm_bindgen(js_name = getTotalPages)]
    pub fn get_total_pages(&self) -> usize {
        self.view.total_pages()
    }

    #[wasm_bindgen(js_name = getActivePage)]
    pub fn get_active_page(&self) -> usize {
        self.view.active_page()
    }

    #[wasm_bindgen(js_name = getZoom)]
    pub fn get_zoom(&self) -> f32 {
        self.view.zoom()
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, zoom: f32) {
        self.view.set_zoom(zoom);
    }

    /// 1, 2, 3, or 0 for auto
    #[wasm_bindgen(js_name = getPagesPerRow)]
    pub fn get_pages_per_row(&self) -> u32 {
        self.view.pages_per_row().as_count()
    }

    #[wasm_bindgen(js_name = setPagesPerRow)]
    pub fn set_pages_per_row(&mut self, count: u32) -> bool {
        match PagesPerRow::from_count(count) {
            Some(pages_per_row) => {
                self.view.set_pages_per_row(pages_per_row);
                true
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = getViewMode)]
    pub fn get_view_mode(&self) -> String {
        self.view.view_mode().name().to_string()
    }

    #[wasm_bindgen(js_name = setViewMode)]
    pub fn set_view_mode(&mut self, mode: &str) -> bool {
        match ViewMode::from_name(mode) {
            Some(mode) => {
                self.view.set_view_mode(mode);
                true
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = toggleViewMode)]
    pub fn toggle_view_mode(&mut self) -> String {
        self.view.toggle_view_mode().name().to_string()
    }

    /// Current page, total, zoom and mode (JSON)
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> String {
        to_json(&self.view.status())
    }

    /// Frame list for every page (JSON)
    #[wasm_bindgen(js_name = getFrames)]
    pub fn get_frames(&self) -> String {
        to_json(&self.view.frames())
    }

    /// Page records (JSON)
    #[wasm_bindgen(js_name = getPages)]
    pub fn get_pages(&self) -> String {
        to_json(&self.view.pages())
    }

    /// Start offsets of every page, for hosts that position clips themselves
    #[wasm_bindgen(js_name = getPageOffsets)]
    pub fn get_page_offsets(&self) -> Float64Array {
        let offsets: Vec<f64> = self
            .view
            .pages()
            .iter()
            .map(|p| p.start_offset as f64)
            .collect();
        Float64Array::from(offsets.as_slice())
    }

    #[wasm_bindgen(js_name = getMirrorHtml)]
    pub fn get_mirror_html(&self) -> String {
        self.view.mirror_html().to_string()
    }

    #[wasm_bindgen(js_name = isVisible)]
    pub fn is_visible(&self, page: usize) -> bool {
        self.view.is_visible(page)
    }
}

impl Default for WasmPageView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_measurer_skips_frames() {
        let mut view = WasmPageView::new();
        assert!(view.content_changed(r#"[{"id":1,"type":"paragraph"}]"#, 0.0).is_ok());
        let diff = view.animation_frame(500.0);
        assert!(!diff.contains("pagesChanged"));
        assert_eq!(view.get_total_pages(), 1);
        assert!(Detached.height_of(BlockRange::single(0)).is_err());
    }

    #[test]
    fn test_mode_and_grid_setters() {
        let mut view = WasmPageView::new();
        assert_eq!(view.get_view_mode(), "scroll");
        assert!(view.set_view_mode("page"));
        assert!(!view.set_view_mode("grid"));
        assert!(view.set_pages_per_row(0));
        assert_eq!(view.get_pages_per_row(), 0);
        assert!(!view.set_pages_per_row(4));
        assert_eq!(view.toggle_view_mode(), "scroll");
    }

    #[test]
    fn test_resolve_template_export() {
        assert_eq!(resolve_template("{{page.current}}/{{page.total}}", 2, 5, "Brief"), "2/5");
    }
}
