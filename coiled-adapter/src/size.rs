use coiled::{Affine, AxisState};

use crate::{Animator, Element, Frame, MeasureGuard, PRESENTATION, Property};

/// Animates an element's width and height with `scale`.
///
/// Axes: `[width, height]`. Each frame scales the element by `current / target` and
/// counter-scales its children by `target / current` so their content is not distorted.
#[derive(Clone, Copy, Debug, Default)]
pub struct Size;

impl<E: Element> Animator<E> for Size {
    fn axis_count(&self) -> usize {
        2
    }

    fn measure(&self, element: &mut E, _axes: &[AxisState]) -> Result<Vec<f64>, E::Error> {
        let guard = MeasureGuard::clear(element, &PRESENTATION);
        let rect = guard.rect()?;
        Ok(vec![rect.width, rect.height])
    }

    fn apply_frame(&mut self, element: &mut E, frame: &Frame<'_>) {
        if frame.is_at_rest() {
            element.set_property(Property::ScaleX, None);
            element.set_property(Property::ScaleY, None);
            element.set_children_transform(None);
            return;
        }
        let (Some(target_w), Some(target_h)) = (frame.target(0), frame.target(1)) else {
            return;
        };
        let current_w = target_w + frame.offset(0);
        let current_h = target_h + frame.offset(1);

        element.set_property(Property::ScaleX, Some(ratio(current_w, target_w)));
        element.set_property(Property::ScaleY, Some(ratio(current_h, target_h)));
        element.set_children_transform(Some(Affine::scale(
            ratio(target_w, current_w),
            ratio(target_h, current_h),
        )));
    }
}

/// `num / den`, or `1` when the box is collapsed on that axis.
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 1.0 } else { num / den }
}
