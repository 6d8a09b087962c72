use rand::Rng;
use rand::rngs::ThreadRng;

pub const PID_MIN: u32 = 1000;
pub const PID_MAX: u32 = 91000;

/// Source of the uniform draws and pids the generator consumes.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn draw(&mut self) -> f64;
    /// Pid in `[PID_MIN, PID_MAX)`.
    fn pid(&mut self) -> u32;
}

/// Adapts any `rand` generator.
#[derive(Debug)]
pub struct RngSource<R>(pub R);

impl RngSource<ThreadRng> {
    pub fn thread() -> Self {
        RngSource(rand::thread_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn draw(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    fn pid(&mut self) -> u32 {
        self.0.gen_range(PID_MIN..PID_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn seeded_source_stays_in_range() {
        let mut source = RngSource(StdRng::seed_from_u64(7));
        for _ in 0..5_000 {
            let d = source.draw();
            assert!((0.0..1.0).contains(&d));
            let pid = source.pid();
            assert!((PID_MIN..PID_MAX).contains(&pid));
        }
    }
}
