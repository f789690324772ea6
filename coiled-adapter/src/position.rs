use coiled::AxisState;

use crate::translate::write_translate;
use crate::{Animator, Element, Frame, MeasureGuard, PRESENTATION};

/// Animates an element's centre, measured relative to its parent's box.
///
/// Axes: `[centre_x, centre_y]`. Measuring against the parent keeps targets stable while a
/// scroll container moves parent and child together.
///
/// Nested scroll containers, reparenting and nested animated elements are not accounted for.
#[derive(Clone, Copy, Debug, Default)]
pub struct Position;

impl<E: Element> Animator<E> for Position {
    fn axis_count(&self) -> usize {
        2
    }

    fn measure(&self, element: &mut E, _axes: &[AxisState]) -> Result<Vec<f64>, E::Error> {
        let guard = MeasureGuard::clear(element, &PRESENTATION);
        let parent = guard.parent_rect()?;
        let center = guard.rect()?.center();
        Ok(vec![center.x - parent.x, center.y - parent.y])
    }

    fn apply_frame(&mut self, element: &mut E, frame: &Frame<'_>) {
        write_translate(element, frame);
    }
}
