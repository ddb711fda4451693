#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
}

impl TickContext {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            dt_seconds: 0.0,
        }
    }

    pub fn with_dt(mut self, dt_seconds: f32) -> Self {
        self.dt_seconds = dt_seconds;
        self
    }
}
