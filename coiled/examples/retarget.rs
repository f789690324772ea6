// Example: one spring axis interrupted mid-flight (velocity carries over).
use coiled::{AxisState, Spring, SpringConfig};

fn main() {
    let spring = Spring::new(SpringConfig::default()).expect("default spring is underdamped");
    println!("alpha={} beta={}", spring.alpha(), spring.beta());

    // The first target is adopted at rest; the jump to 100 is what animates.
    let mut axis = AxisState::new(&spring, 0.0);
    axis.retarget(&spring, 0.0, 0.0);
    axis.retarget(&spring, 100.0, 0.0);

    let mut now_ms = 0.0;
    loop {
        now_ms += 16.0;

        // Simulate the layout changing again at ~120ms.
        if (120.0..136.0).contains(&now_ms) {
            let v = axis.velocity_at(now_ms);
            axis.retarget(&spring, 40.0, now_ms);
            println!("t={now_ms}ms retarget -> 40 (v={v:.1}, v'={:.1})", axis.velocity_at(now_ms));
        }

        let value = axis.value_at(now_ms).unwrap_or_default();
        println!("t={now_ms}ms value={value:.3}");

        if axis.is_done(now_ms) {
            break;
        }
    }

    println!("done: t={now_ms}ms end={:?}", axis.params().end_time());
}
