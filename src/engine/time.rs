/// Fixed-timestep accumulator. Frame time goes in, whole simulation ticks
/// come out; the remainder carries over to the next frame.
#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f32,
    max_ticks_per_frame: u32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(dt: f32, max_ticks_per_frame: u32) -> Self {
        Self {
            dt,
            max_ticks_per_frame,
            accumulator: 0.0,
        }
    }

    /// Add `frame_dt` seconds and return how many ticks to run now. Backlog
    /// beyond `max_ticks_per_frame` is dropped so a stall cannot snowball.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        if ticks == self.max_ticks_per_frame && self.accumulator >= self.dt {
            log::debug!(
                "dropping {:.3}s of simulation backlog",
                self.accumulator - self.accumulator % self.dt
            );
            self.accumulator %= self.dt;
        }
        ticks
    }

    /// How far into the next tick the current frame falls (0..1).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }
}
