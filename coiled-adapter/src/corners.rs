use coiled::{Affine, AxisState, Point, Rect, Spring};

use crate::{AnimateError, Animator, Element, Frame, MeasureGuard, PRESENTATION, retarget_axes};

/// Animates an element's declared transform by springing its four corners.
///
/// Axes: `[tl.x, tl.y, tr.x, tr.y, bl.x, bl.y, br.x, br.y]`, in absolute coordinates after the
/// declared transform is applied about its origin. Each frame writes the affine transform that
/// maps the untransformed box onto the animated top-left, top-right and bottom-left corners.
///
/// Transforms on ancestors are not accounted for.
#[derive(Clone, Copy, Debug, Default)]
pub struct Corners {
    layout: Option<Rect>,
}

impl Corners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Untransformed layout box recorded by the last successful retarget.
    pub fn layout(&self) -> Option<Rect> {
        self.layout
    }

    fn measure_corners<E: Element>(&self, element: &mut E) -> Result<(Rect, Vec<f64>), E::Error> {
        let guard = MeasureGuard::clear(element, &PRESENTATION).clear_transform();
        let rect = guard.rect()?;
        let declared = guard.declared_transform()?;
        drop(guard);

        let (ox, oy) = (declared.origin_x, declared.origin_y);
        let origin = Point::new(rect.x + ox, rect.y + oy);
        let mut targets = Vec::with_capacity(8);
        for (x, y) in [
            (-ox, -oy),
            (rect.width - ox, -oy),
            (-ox, rect.height - oy),
            (rect.width - ox, rect.height - oy),
        ] {
            let p = declared.matrix.transform_point(Point::new(x, y));
            targets.push(p.x + origin.x);
            targets.push(p.y + origin.y);
        }
        Ok((rect, targets))
    }
}

impl<E: Element> Animator<E> for Corners {
    fn axis_count(&self) -> usize {
        8
    }

    fn measure(&self, element: &mut E, _axes: &[AxisState]) -> Result<Vec<f64>, E::Error> {
        self.measure_corners(element).map(|(_, targets)| targets)
    }

    fn retarget(
        &mut self,
        element: &mut E,
        axes: &mut [AxisState],
        spring: &Spring,
        now_ms: f64,
    ) -> Result<bool, AnimateError<E::Error>> {
        let (rect, targets) = self
            .measure_corners(element)
            .map_err(AnimateError::Measure)?;
        let changed = retarget_axes(axes, &targets, spring, now_ms)?;
        self.layout = Some(rect);
        Ok(changed)
    }

    fn apply_frame(&mut self, element: &mut E, frame: &Frame<'_>) {
        if frame.is_at_rest() {
            element.set_transform(None);
            return;
        }
        let Some(layout) = self.layout else {
            return;
        };
        let corner = |i: usize| {
            Point::new(
                frame.value(2 * i).unwrap_or_default(),
                frame.value(2 * i + 1).unwrap_or_default(),
            )
        };
        let Some(absolute) =
            Affine::from_corners(layout.width, layout.height, corner(0), corner(1), corner(2))
        else {
            return;
        };
        element.set_transform(Some(Affine {
            e: absolute.e - layout.x,
            f: absolute.f - layout.y,
            ..absolute
        }));
    }
}
