//! Thin bindings over the global Leaflet (`L`) object loaded by `index.html`.
//!
//! Only the handful of calls the story pages need are bound. Anything that
//! builds option objects goes through [`js_value`], so the shapes stay in one
//! readable `json!` literal.

use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{prelude::*, JsCast};

use crate::api::Story;
use crate::error::AppError;
use crate::utils::geo::Coordinates;
use crate::utils::time::format_long_date;

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
const STORY_MARKER_COLOR: &str = "#2563eb";
const STORY_MARKER_FILL: &str = "#3b82f6";
pub const FOCUS_ZOOM: f64 = 15.0;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L, js_name = Map)]
    pub type LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    fn leaflet_map(container: &web_sys::HtmlElement, options: &JsValue) -> LeafletMap;

    #[wasm_bindgen(method, js_name = invalidateSize)]
    fn invalidate_size(this: &LeafletMap) -> LeafletMap;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &JsValue, zoom: f64) -> LeafletMap;

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &LeafletMap, bounds: &JsValue, options: &JsValue) -> LeafletMap;

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LeafletMap, layer: &Layer) -> LeafletMap;

    #[wasm_bindgen(method)]
    fn on(this: &LeafletMap, event: &str, handler: &js_sys::Function) -> LeafletMap;

    #[wasm_bindgen(method)]
    fn off(this: &LeafletMap, event: &str, handler: &js_sys::Function) -> LeafletMap;

    #[wasm_bindgen(method)]
    fn remove(this: &LeafletMap);

    #[wasm_bindgen(method, js_name = getContainer)]
    fn get_container(this: &LeafletMap) -> web_sys::HtmlElement;

    #[wasm_bindgen(js_namespace = L)]
    pub type Layer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    fn circle_marker(lat_lng: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(lat_lng: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    fn div_icon(options: &JsValue) -> JsValue;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, map: &LeafletMap) -> Layer;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Layer, html: &str) -> Layer;

    #[wasm_bindgen(method, js_name = openPopup)]
    fn open_popup(this: &Layer) -> Layer;
}

/// Converts a JSON literal into a plain JS object.
pub fn js_value(value: Value) -> JsValue {
    js_sys::JSON::parse(&value.to_string()).unwrap_or(JsValue::UNDEFINED)
}

fn lat_lng(at: Coordinates) -> JsValue {
    js_value(json!([at.lat, at.lon]))
}

fn pin_options(class_name: &str, icon_html: &str) -> JsValue {
    let icon = div_icon(&js_value(json!({
        "className": class_name,
        "html": icon_html,
        "iconSize": [30, 30],
        "iconAnchor": [15, 30]
    })));
    let options = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&options, &"icon".into(), &icon);
    options.into()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Popup body for a story marker. Every user-provided field is escaped.
pub fn story_popup_html(story: &Story) -> String {
    let name = if story.author_name.trim().is_empty() {
        "Tanpa Nama"
    } else {
        story.author_name.as_str()
    };
    let description = if story.description.trim().is_empty() {
        "Tidak ada deskripsi"
    } else {
        story.description.as_str()
    };
    format!(
        "<div class=\"story-popup\"><h4>{}</h4><p>{}</p><img src=\"{}\" alt=\"Foto story\" class=\"story-popup-photo\"><p class=\"story-popup-date\">{}</p></div>",
        escape_html(name),
        escape_html(description),
        escape_html(&story.photo_url),
        format_long_date(story.created_at),
    )
}

pub fn selection_popup_html(at: Coordinates) -> String {
    format!(
        "<div><strong>Lokasi Dipilih</strong><br>Latitude: {:.6}<br>Longitude: {:.6}</div>",
        at.lat, at.lon
    )
}

fn leaflet_loaded() -> bool {
    js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("L")).unwrap_or(false)
}

/// One Leaflet map instance plus the layers this app put on it.
pub struct StoryMap {
    map: LeafletMap,
    markers: RefCell<Vec<(Layer, Coordinates)>>,
    selection: RefCell<Option<Layer>>,
    current_location: RefCell<Option<Layer>>,
    click_handler: RefCell<Option<Closure<dyn FnMut(JsValue)>>>,
}

impl StoryMap {
    pub fn mount(
        container: &web_sys::HtmlElement,
        center: Coordinates,
        zoom: f64,
    ) -> Result<Self, AppError> {
        if !leaflet_loaded() {
            return Err(AppError::Device("Gagal memuat peta".into()));
        }

        let map = leaflet_map(
            container,
            &js_value(json!({
                "center": [center.lat, center.lon],
                "zoom": zoom,
                "zoomControl": true,
                "attributionControl": true
            })),
        );
        tile_layer(
            TILE_URL,
            &js_value(json!({ "attribution": TILE_ATTRIBUTION, "maxZoom": 19 })),
        )
        .add_to(&map);
        log::debug!("map mounted on #{}", container.id());

        Ok(Self {
            map,
            markers: RefCell::new(Vec::new()),
            selection: RefCell::new(None),
            current_location: RefCell::new(None),
            click_handler: RefCell::new(None),
        })
    }

    /// Replaces the story markers. Stories without coordinates are skipped.
    /// Returns how many markers were placed.
    pub fn show_stories(&self, stories: &[Story]) -> usize {
        self.clear_markers();
        let mut markers = self.markers.borrow_mut();
        for story in stories {
            let Some(at) = story.coordinates().filter(|c| c.is_valid()) else {
                continue;
            };
            let layer = circle_marker(
                &lat_lng(at),
                &js_value(json!({
                    "color": STORY_MARKER_COLOR,
                    "fillColor": STORY_MARKER_FILL,
                    "fillOpacity": 0.8,
                    "radius": 8
                })),
            )
            .add_to(&self.map);
            layer.bind_popup(&story_popup_html(story));
            markers.push((layer, at));
        }
        markers.len()
    }

    pub fn clear_markers(&self) {
        for (layer, _) in self.markers.borrow_mut().drain(..) {
            self.map.remove_layer(&layer);
        }
    }

    /// Fits the view around every story marker; `false` when there are none.
    pub fn fit_to_markers(&self) -> bool {
        let markers = self.markers.borrow();
        if markers.is_empty() {
            return false;
        }
        let bounds: Vec<[f64; 2]> = markers.iter().map(|(_, at)| [at.lat, at.lon]).collect();
        self.map.fit_bounds(
            &js_value(json!(bounds)),
            &js_value(json!({ "padding": [24, 24] })),
        );
        true
    }

    /// Recomputes the viewport after the container changed size.
    pub fn refresh_size(&self) {
        self.map.invalidate_size();
    }

    pub fn center(&self, at: Coordinates, zoom: f64) {
        self.map.set_view(&lat_lng(at), zoom);
    }

    pub fn mark_current_location(&self, at: Coordinates) {
        if let Some(previous) = self.current_location.borrow_mut().take() {
            self.map.remove_layer(&previous);
        }
        let layer = marker(
            &lat_lng(at),
            &pin_options(
                "current-location-marker",
                "<i class=\"fas fa-location-arrow\"></i>",
            ),
        )
        .add_to(&self.map);
        layer.bind_popup("Lokasi Anda saat ini").open_popup();
        self.current_location.replace(Some(layer));
        self.center(at, FOCUS_ZOOM);
    }

    /// Calls `on_pick` with the clicked coordinates until the map is destroyed.
    pub fn enable_selection(&self, on_pick: impl Fn(Coordinates) + 'static) {
        self.disable_selection();
        let handler = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let Ok(lat_lng) = js_sys::Reflect::get(&event, &"latlng".into()) else {
                return;
            };
            let read = |key: &str| {
                js_sys::Reflect::get(&lat_lng, &key.into())
                    .ok()
                    .and_then(|v| v.as_f64())
            };
            if let (Some(lat), Some(lng)) = (read("lat"), read("lng")) {
                on_pick(Coordinates::new(lat, lng));
            }
        });
        self.map.on("click", handler.as_ref().unchecked_ref());
        let _ = self
            .map
            .get_container()
            .style()
            .set_property("cursor", "crosshair");
        self.click_handler.replace(Some(handler));
    }

    pub fn disable_selection(&self) {
        if let Some(handler) = self.click_handler.borrow_mut().take() {
            self.map.off("click", handler.as_ref().unchecked_ref());
            let _ = self.map.get_container().style().remove_property("cursor");
        }
    }

    /// Draws the pin for a picked location, or removes it with `None`.
    pub fn set_selection(&self, at: Option<Coordinates>) {
        if let Some(previous) = self.selection.borrow_mut().take() {
            self.map.remove_layer(&previous);
        }
        if let Some(at) = at {
            let layer = marker(
                &lat_lng(at),
                &pin_options("selection-marker", "<i class=\"fas fa-map-pin\"></i>"),
            )
            .add_to(&self.map);
            layer.bind_popup(&selection_popup_html(at)).open_popup();
            self.selection.replace(Some(layer));
        }
    }

    pub fn destroy(self) {
        self.disable_selection();
        self.clear_markers();
        self.map.remove();
        log::debug!("map destroyed");
    }
}

/// Map owned by a page view, mounted once its container is in the DOM.
/// Calls made before mounting, or after release, do nothing.
#[derive(Clone, Default)]
pub struct MapSlot {
    map: Rc<RefCell<Option<StoryMap>>>,
}

impl MapSlot {
    pub fn mount(
        &self,
        container: &web_sys::HtmlElement,
        center: Coordinates,
        zoom: f64,
    ) -> Result<(), AppError> {
        self.release();
        let map = StoryMap::mount(container, center, zoom)?;
        self.map.replace(Some(map));
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.map.borrow().is_some()
    }

    pub fn with<R>(&self, f: impl FnOnce(&StoryMap) -> R) -> Option<R> {
        self.map.borrow().as_ref().map(f)
    }

    /// Destroys the map. Returns `false` when nothing was mounted.
    pub fn release(&self) -> bool {
        let taken = self.map.borrow_mut().take();
        match taken {
            Some(map) => {
                map.destroy();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{at, story};

    #[test]
    fn escapes_markup_in_user_text() {
        assert_eq!(
            escape_html("<img src=x onerror=\"alert('x')\">&"),
            "&lt;img src=x onerror=&quot;alert(&#39;x&#39;)&quot;&gt;&amp;"
        );
        assert_eq!(escape_html("Kota Tua"), "Kota Tua");
    }

    #[test]
    fn popup_escapes_and_fills_placeholders() {
        let mut s = story("s1", "<b>Budi</b>", "  ", at(2025, 1, 2));
        s.photo_url = "https://example.com/p.jpg".into();
        let html = story_popup_html(&s);
        assert!(html.contains("&lt;b&gt;Budi&lt;/b&gt;"));
        assert!(html.contains("Tidak ada deskripsi"));
        assert!(html.contains("2 Januari 2025"));

        s.author_name = String::new();
        assert!(story_popup_html(&s).contains("Tanpa Nama"));
    }

    #[test]
    fn selection_popup_shows_six_decimals() {
        let html = selection_popup_html(Coordinates::new(-6.2, 106.816666));
        assert!(html.contains("Latitude: -6.200000"));
        assert!(html.contains("Longitude: 106.816666"));
    }

    #[test]
    fn unmounted_slot_ignores_calls() {
        let slot = MapSlot::default();
        assert!(!slot.is_mounted());
        assert_eq!(slot.with(|map| map.fit_to_markers()), None);
        assert!(!slot.release());
    }
}
