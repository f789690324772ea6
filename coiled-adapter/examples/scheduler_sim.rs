use coiled::{Rect, Spring};
use coiled_adapter::{BoxedAnimator, Element, Property, Scheduler, Size, Translate};
use std::collections::HashMap;

/// A headless "element": a layout box plus a bag of presentation properties.
#[derive(Debug, Default)]
struct Node {
    layout: Rect,
    props: HashMap<Property, f64>,
}

impl Element for Node {
    type Error = std::convert::Infallible;

    fn rect(&self) -> Result<Rect, Self::Error> {
        let tx = self.props.get(&Property::TranslateX).copied().unwrap_or(0.0);
        let ty = self.props.get(&Property::TranslateY).copied().unwrap_or(0.0);
        Ok(Rect::new(
            self.layout.x + tx,
            self.layout.y + ty,
            self.layout.width,
            self.layout.height,
        ))
    }

    fn parent_rect(&self) -> Result<Rect, Self::Error> {
        Ok(Rect::default())
    }

    fn property(&self, property: Property) -> Option<f64> {
        self.props.get(&property).copied()
    }

    fn set_property(&mut self, property: Property, value: Option<f64>) {
        match value {
            Some(v) => self.props.insert(property, v),
            None => self.props.remove(&property),
        };
    }
}

fn main() {
    // Example: a host UI loop driving the scheduler.
    //
    // A host would:
    // - call commit(now) after each layout-affecting change (reads only)
    // - call tick(now) from its frame callback while needs_frame() (writes only)
    // - unmount the element when it leaves the tree
    let mut sched: Scheduler<Node, &'static str> = Scheduler::new(Spring::default());
    let animators: Vec<BoxedAnimator<Node>> = vec![Box::new(Translate), Box::new(Size)];
    let card = sched.mount(
        Node {
            layout: Rect::new(0.0, 0.0, 120.0, 80.0),
            ..Node::default()
        },
        animators,
        Some("card"),
    );

    // First measurement: adopted at rest.
    sched.commit(0.0).expect("infallible element");

    // The card moves and grows.
    if let Some(node) = sched.element_mut(card.key()) {
        node.layout = Rect::new(200.0, 40.0, 240.0, 80.0);
    }
    sched.commit(16.0).expect("infallible element");

    let mut now_ms = 16.0;
    while sched.needs_frame() {
        sched.tick(now_ms);
        if now_ms as u64 % 64 == 0 {
            let node = sched.element(card.key()).expect("mounted");
            println!(
                "t={now_ms}ms phase={:?} translate_x={:?} scale_x={:?}",
                sched.phase(card.key()),
                node.props.get(&Property::TranslateX),
                node.props.get(&Property::ScaleX),
            );
        }
        now_ms += 16.0;
    }

    println!("settled at t={now_ms}ms phase={:?}", sched.phase(card.key()));
    let node = sched.unmount(card).expect("mounted");
    println!("unmounted: layout={:?} props={:?}", node.layout, node.props);
}
