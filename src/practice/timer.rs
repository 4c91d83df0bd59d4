use std::time::{Duration, Instant};

/// A one-shot deadline owned by the practice session. Polled by the view
/// loop; once cancelled or fired it never fires again.
#[derive(Debug)]
pub struct AdvanceTimer
{
    due: Instant,
    active: bool,
}

impl AdvanceTimer
{
    pub fn start(now: Instant, delay: Duration) -> Self
    {
        Self {
            due: now + delay,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool
    {
        self.active
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool
    {
        if self.active && now >= self.due {
            self.active = false;
            return true;
        }
        false
    }

    pub fn cancel(&mut self)
    {
        self.active = false;
    }
}
