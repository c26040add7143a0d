use rand::Rng;

/// Randomly discards a fixed share of events
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EventRejector {
    /// An event is rejected if a uniform integer in 0..=99 is at most this
    pub percentage: u32,
}

impl EventRejector {
    pub fn new(percentage: u32) -> Self {
        Self { percentage }
    }

    pub fn should_reject<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_range(0..=99u32) <= self.percentage
    }
}
