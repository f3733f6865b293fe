//! Monotonic clock shared by the page and the headless runner

/// Seconds since an arbitrary origin (page load on the web, first call natively)
#[cfg(target_arch = "wasm32")]
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Per-frame timestamps for code that wants a delta rather than a clock
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now`; returns seconds since the previous frame
    /// (zero for the first one)
    pub fn step(&mut self, now: f64) -> f32 {
        let dt = self.last.map_or(0.0, |last| (now - last).max(0.0));
        self.last = Some(now);
        dt as f32
    }

    /// Record a frame at the current time
    pub fn tick(&mut self) -> (f64, f32) {
        let now = now_seconds();
        (now, self.step(now))
    }
}
