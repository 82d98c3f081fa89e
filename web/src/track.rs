//! The road as drawn in the DOM, animated with the Web Animations API.

use js_sys::{Array, Object, Reflect};
use shared::animation::{Animation, EngineControls, Track};
use shared::model::CarId;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

#[wasm_bindgen]
extern "C" {
    /// Any element, seen through `Element.animate`.
    #[wasm_bindgen(extends = Element)]
    type Animatable;

    #[wasm_bindgen(method)]
    fn animate(this: &Animatable, keyframes: &Array, options: &Object) -> web_sys::Animation;
}

pub fn road_id(id: CarId) -> String {
    format!("road-{}", id)
}

fn translate(px: f64) -> JsValue {
    let frame = Object::new();
    let _ = Reflect::set(&frame, &"transform".into(), &format!("translateX({}px)", px).into());
    frame.into()
}

fn timing(duration_ms: f64) -> Object {
    let options = Object::new();
    let _ = Reflect::set(&options, &"duration".into(), &duration_ms.into());
    let _ = Reflect::set(&options, &"fill".into(), &"forwards".into());
    let _ = Reflect::set(&options, &"easing".into(), &"linear".into());
    options
}

fn set_disabled(button: Option<Element>, disabled: bool) {
    let Some(button) = button else {
        return;
    };
    let result = if disabled {
        button.set_attribute("disabled", "")
    } else {
        button.remove_attribute("disabled")
    };
    if let Err(err) = result {
        warn!("could not toggle engine button: {:?}", err);
    }
}

pub struct DomAnimation(web_sys::Animation);

impl Animation for DomAnimation {
    fn pause(&self) {
        if let Err(err) = self.0.pause() {
            warn!("pause failed: {:?}", err);
        }
    }

    fn cancel(&self) {
        self.0.cancel();
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DomTrack {
    correction: f64,
}

impl DomTrack {
    pub fn new(correction: f64) -> Self {
        Self { correction }
    }

    fn road(&self, id: CarId) -> Option<Element> {
        let road = web_sys::window()?
            .document()?
            .get_element_by_id(&road_id(id));
        if road.is_none() {
            debug!("car {} is no longer on the page", id);
        }
        road
    }

    fn car(&self, road: &Element) -> Option<HtmlElement> {
        road.query_selector(".car-wrapper")
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()
    }
}

impl Track for DomTrack {
    type Handle = DomAnimation;

    fn animate(&self, id: CarId, duration_ms: f64) -> Option<DomAnimation> {
        let road = self.road(id)?;
        let car = self.car(&road)?;
        let width = road
            .dyn_ref::<HtmlElement>()
            .map(|road| f64::from(road.offset_width()))
            .unwrap_or_default();
        let distance = (width - self.correction).max(0.0);

        let keyframes = Array::of2(&translate(0.0), &translate(distance));
        let car = car.unchecked_ref::<Animatable>();
        Some(DomAnimation(car.animate(&keyframes, &timing(duration_ms))))
    }

    fn rewind(&self, id: CarId) {
        let Some(car) = self.road(id).and_then(|road| self.car(&road)) else {
            return;
        };
        if let Err(err) = car.style().set_property("transform", "translateX(0px)") {
            warn!("could not rewind car {}: {:?}", id, err);
        }
    }

    fn set_engine_controls(&self, id: CarId, controls: EngineControls) {
        let Some(road) = self.road(id) else {
            return;
        };
        set_disabled(road.query_selector(".go").ok().flatten(), !controls.go);
        set_disabled(road.query_selector(".back").ok().flatten(), !controls.stop);
    }
}
