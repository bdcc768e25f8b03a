use crate::app::ports::Pacer;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Sleeps the current thread for a uniformly random duration.
#[derive(Debug, Default)]
pub struct RandomDelay;

impl Pacer for RandomDelay {
    fn pause(&mut self, min_secs: f64, max_secs: f64) -> f64 {
        let secs = pick_delay(&mut rand::thread_rng(), min_secs, max_secs);
        info!("Waiting {:.2} seconds before next request...", secs);
        thread::sleep(Duration::from_secs_f64(secs));
        secs
    }
}

/// Counts requested pauses without sleeping. Clones share the count.
#[derive(Debug, Clone, Default)]
pub struct NoDelay {
    pauses: Arc<AtomicUsize>,
}

impl NoDelay {
    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

impl Pacer for NoDelay {
    fn pause(&mut self, min_secs: f64, _max_secs: f64) -> f64 {
        self.pauses.fetch_add(1, Ordering::SeqCst);
        min_secs
    }
}

fn pick_delay<R: Rng>(rng: &mut R, min_secs: f64, max_secs: f64) -> f64 {
    if max_secs <= min_secs {
        return min_secs.max(0.0);
    }
    rng.gen_range(min_secs..=max_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_stays_within_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let secs = pick_delay(&mut rng, 1.0, 3.0);
            assert!((1.0..=3.0).contains(&secs));
        }
    }

    #[test]
    fn degenerate_range_uses_minimum() {
        let mut rng = rand::thread_rng();
        assert_eq!(pick_delay(&mut rng, 2.0, 2.0), 2.0);
        assert_eq!(pick_delay(&mut rng, 0.0, 0.0), 0.0);
    }

    #[test]
    fn no_delay_clones_share_the_count() {
        let pacer = NoDelay::default();
        let mut boxed: Box<dyn Pacer> = Box::new(pacer.clone());
        boxed.pause(1.0, 2.0);
        boxed.pause(1.0, 2.0);
        assert_eq!(pacer.pauses(), 2);
    }
}
