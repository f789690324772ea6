use core::ops::{Deref, DerefMut};

use coiled::{Affine, Rect};

/// A scalar presentation channel (the equivalent of the `--translate-x` style custom properties).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Property {
    TranslateX,
    TranslateY,
    ScaleX,
    ScaleY,
}

/// Every scalar presentation property, cleared before measuring untransformed layout.
pub(crate) const PRESENTATION: [Property; 4] = [
    Property::TranslateX,
    Property::TranslateY,
    Property::ScaleX,
    Property::ScaleY,
];

/// A transform declared on the element by its styling, plus the origin it is applied about.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclaredTransform {
    pub matrix: Affine,
    /// Origin relative to the element's top-left corner.
    pub origin_x: f64,
    pub origin_y: f64,
}

/// The handle an adapter provides for one rendered element.
///
/// Reads return geometry in the rendering surface's absolute coordinate space *with* the
/// current presentation applied; animators clear presentation through [`MeasureGuard`] before
/// reading untransformed geometry.
///
/// Writes (`set_*`) go to a presentation layer that does not affect layout.
pub trait Element {
    /// Raised when geometry cannot be read (detached element, missing parent, ...).
    type Error;

    fn rect(&self) -> Result<Rect, Self::Error>;

    fn parent_rect(&self) -> Result<Rect, Self::Error>;

    /// The transform the element's styling declares (the animation target).
    ///
    /// Elements without one return the identity about the top-left corner.
    fn declared_transform(&self) -> Result<DeclaredTransform, Self::Error> {
        Ok(DeclaredTransform::default())
    }

    fn property(&self, property: Property) -> Option<f64>;

    /// Sets (`Some`) or clears (`None`) a presentation property.
    fn set_property(&mut self, property: Property, value: Option<f64>);

    /// The presentation transform override, if any. Applied about the top-left corner.
    fn transform(&self) -> Option<Affine> {
        None
    }

    fn set_transform(&mut self, _transform: Option<Affine>) {}

    /// Sets a transform on every child element, applied about each child's top-left corner.
    fn set_children_transform(&mut self, _transform: Option<Affine>) {}
}

/// Clears presentation state for the duration of a measurement and restores it on drop.
///
/// Restoration also happens when the measurement returns early with an error, so sampling on
/// the same frame always sees the presentation it left behind.
pub struct MeasureGuard<'a, E: Element + ?Sized> {
    element: &'a mut E,
    saved: Vec<(Property, Option<f64>)>,
    saved_transform: Option<Option<Affine>>,
}

impl<'a, E: Element + ?Sized> MeasureGuard<'a, E> {
    /// Saves and clears `properties`.
    pub fn clear(element: &'a mut E, properties: &[Property]) -> Self {
        let mut saved = Vec::with_capacity(properties.len());
        for &p in properties {
            saved.push((p, element.property(p)));
            element.set_property(p, None);
        }
        Self {
            element,
            saved,
            saved_transform: None,
        }
    }

    /// Also saves and clears the presentation transform.
    pub fn clear_transform(mut self) -> Self {
        if self.saved_transform.is_none() {
            self.saved_transform = Some(self.element.transform());
            self.element.set_transform(None);
        }
        self
    }
}

impl<E: Element + ?Sized> Deref for MeasureGuard<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.element
    }
}

impl<E: Element + ?Sized> DerefMut for MeasureGuard<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.element
    }
}

impl<E: Element + ?Sized> Drop for MeasureGuard<'_, E> {
    fn drop(&mut self) {
        if let Some(transform) = self.saved_transform.take() {
            self.element.set_transform(transform);
        }
        for (p, value) in self.saved.drain(..).rev() {
            self.element.set_property(p, value);
        }
    }
}
