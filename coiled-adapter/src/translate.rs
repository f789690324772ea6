use coiled::AxisState;

use crate::{Animator, Element, Frame, MeasureGuard, PRESENTATION, Property};

/// Animates an element's absolute top-left position with `translate`.
///
/// Axes: `[x, y]`. The element is laid out at its target; each frame translates it by the
/// current offset from that target.
#[derive(Clone, Copy, Debug, Default)]
pub struct Translate;

impl<E: Element> Animator<E> for Translate {
    fn axis_count(&self) -> usize {
        2
    }

    fn measure(&self, element: &mut E, _axes: &[AxisState]) -> Result<Vec<f64>, E::Error> {
        let guard = MeasureGuard::clear(element, &PRESENTATION);
        let rect = guard.rect()?;
        Ok(vec![rect.x, rect.y])
    }

    fn apply_frame(&mut self, element: &mut E, frame: &Frame<'_>) {
        write_translate(element, frame);
    }
}

pub(crate) fn write_translate<E: Element>(element: &mut E, frame: &Frame<'_>) {
    if frame.is_at_rest() {
        element.set_property(Property::TranslateX, None);
        element.set_property(Property::TranslateY, None);
        return;
    }
    element.set_property(Property::TranslateX, Some(frame.offset(0)));
    element.set_property(Property::TranslateY, Some(frame.offset(1)));
}
