//! Element table standing in for the rendered document
//!
//! Every animatable thing on the page (a section, a heading, an FAQ card, its
//! icon...) is an [`Element`] addressed by an [`ElementId`]. The host writes
//! layout and natural content heights; the transition engine writes visual
//! state; renderers read both.

use std::collections::BTreeMap;
use std::fmt;

use crate::motion::{Property, Rgb, Value};

/// Stable identifier of an element in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Explicit or intrinsic height
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightValue {
    /// Size to content
    Auto,
    Px(f64),
}

/// Document-space box written by the host's layout pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    pub top: f64,
    pub height: f64,
}

/// Current visual state of an element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub opacity: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub rotation: f64,
    pub clip_reveal: f64,
    pub height: HeightValue,
    pub color: Rgb,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            rotate_x: 0.0,
            rotate_y: 0.0,
            rotation: 0.0,
            clip_reveal: 1.0,
            height: HeightValue::Auto,
            color: Rgb::BLACK,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    /// Debug name, e.g. "faq.card[2]"
    pub label: String,
    pub layout: LayoutBox,
    /// Height the content would take at `HeightValue::Auto`, once known
    pub natural_height: Option<f64>,
    pub visual: VisualState,
}

impl Element {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            layout: LayoutBox::default(),
            natural_height: None,
            visual: VisualState::default(),
        }
    }

    /// Resolved pixel height (auto resolves to the natural height)
    pub fn resolved_height(&self) -> f64 {
        match self.visual.height {
            HeightValue::Px(px) => px,
            HeightValue::Auto => self.natural_height.unwrap_or(self.layout.height),
        }
    }

    pub fn read(&self, property: Property) -> Value {
        let v = &self.visual;
        match property {
            Property::Opacity => Value::Scalar(v.opacity),
            Property::TranslateX => Value::Scalar(v.translate_x),
            Property::TranslateY => Value::Scalar(v.translate_y),
            Property::Scale => Value::Scalar(v.scale),
            Property::RotateX => Value::Scalar(v.rotate_x),
            Property::RotateY => Value::Scalar(v.rotate_y),
            Property::Rotation => Value::Scalar(v.rotation),
            Property::ClipReveal => Value::Scalar(v.clip_reveal),
            Property::Height => Value::Scalar(self.resolved_height()),
            Property::Color => Value::Color(v.color),
        }
    }

    /// Write a value; a value of the wrong kind is ignored
    pub fn write(&mut self, property: Property, value: Value) {
        let v = &mut self.visual;
        match (property, value) {
            (Property::Color, Value::Color(c)) => v.color = c,
            (Property::Opacity, Value::Scalar(x)) => v.opacity = x,
            (Property::TranslateX, Value::Scalar(x)) => v.translate_x = x,
            (Property::TranslateY, Value::Scalar(x)) => v.translate_y = x,
            (Property::Scale, Value::Scalar(x)) => v.scale = x,
            (Property::RotateX, Value::Scalar(x)) => v.rotate_x = x,
            (Property::RotateY, Value::Scalar(x)) => v.rotate_y = x,
            (Property::Rotation, Value::Scalar(x)) => v.rotation = x,
            (Property::ClipReveal, Value::Scalar(x)) => v.clip_reveal = x,
            (Property::Height, Value::Scalar(x)) => v.height = HeightValue::Px(x.max(0.0)),
            _ => {}
        }
    }
}

/// The element table
#[derive(Debug, Default)]
pub struct Scene {
    elements: BTreeMap<ElementId, Element>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, Element::new(label));
        id
    }

    /// Remove an element; later lookups resolve to nothing
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.elements.remove(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn set_layout(&mut self, id: ElementId, top: f64, height: f64) -> bool {
        match self.elements.get_mut(&id) {
            Some(el) => {
                el.layout = LayoutBox { top, height };
                true
            }
            None => false,
        }
    }

    pub fn set_natural_height(&mut self, id: ElementId, height: f64) -> bool {
        match self.elements.get_mut(&id) {
            Some(el) => {
                el.natural_height = Some(height.max(0.0));
                true
            }
            None => false,
        }
    }

    /// Apply a set of values immediately, with no tween
    pub fn apply(&mut self, id: ElementId, props: &crate::motion::Props) -> bool {
        match self.elements.get_mut(&id) {
            Some(el) => {
                for (property, value) in props.iter() {
                    el.write(property, value);
                }
                true
            }
            None => false,
        }
    }

    pub fn set_height(&mut self, id: ElementId, height: HeightValue) -> bool {
        match self.elements.get_mut(&id) {
            Some(el) => {
                el.visual.height = height;
                true
            }
            None => false,
        }
    }

    /// First half of the measure-then-animate pattern: switch the element to
    /// auto height and report the pixel height it takes
    ///
    /// Returns `None` when the element is gone. Content that has not been
    /// laid out yet measures as its layout box.
    pub fn measure_auto_height(&mut self, id: ElementId) -> Option<f64> {
        let el = self.elements.get_mut(&id)?;
        el.visual.height = HeightValue::Auto;
        Some(el.resolved_height())
    }

    pub fn read(&self, id: ElementId, property: Property) -> Option<Value> {
        self.elements.get(&id).map(|el| el.read(property))
    }

    pub fn write(&mut self, id: ElementId, property: Property, value: Value) -> bool {
        match self.elements.get_mut(&id) {
            Some(el) => {
                el.write(property, value);
                true
            }
            None => false,
        }
    }

    pub fn visual(&self, id: ElementId) -> Option<&VisualState> {
        self.elements.get(&id).map(|el| &el.visual)
    }
}
