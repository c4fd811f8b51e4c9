use web_time::Instant;

/// Monotonic wall clock in milliseconds since construction.
///
/// Works on native and wasm targets; pass it to [`crate::Runtime::pump`].
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
