//! Periodic triggers driven by elapsed host time
//!
//! The host feeds wall-clock deltas; the scheduler hands back due triggers one
//! at a time in chronological order so the caller can stop mid-frame.

/// Which periodic trigger fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Physics/motion/collision step
    Sim,
    /// Obstacle spawn attempt
    Spawn,
}

/// One fixed-period trigger, like a browser interval
#[derive(Debug, Clone)]
pub struct PeriodicTrigger {
    period_ms: f64,
    /// Time left until the next firing
    until_next_ms: f64,
    active: bool,
}

impl PeriodicTrigger {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            until_next_ms: period_ms,
            active: false,
        }
    }

    /// Arm the trigger; first firing is one full period away
    pub fn start(&mut self) {
        self.until_next_ms = self.period_ms;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    fn due_in(&self) -> Option<f64> {
        self.active.then_some(self.until_next_ms)
    }
}

/// Sim and spawn triggers sharing one timeline
#[derive(Debug, Clone)]
pub struct Scheduler {
    sim: PeriodicTrigger,
    spawn: PeriodicTrigger,
}

impl Scheduler {
    pub fn new(sim_period_ms: f64, spawn_period_ms: f64) -> Self {
        Self {
            sim: PeriodicTrigger::new(sim_period_ms),
            spawn: PeriodicTrigger::new(spawn_period_ms),
        }
    }

    /// Start both triggers from zero elapsed time
    pub fn start(&mut self) {
        self.sim.start();
        self.spawn.start();
    }

    /// Stop both triggers; nothing fires until the next `start`
    pub fn cancel(&mut self) {
        self.sim.cancel();
        self.spawn.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.sim.is_active() || self.spawn.is_active()
    }

    pub fn trigger(&self, which: Trigger) -> &PeriodicTrigger {
        match which {
            Trigger::Sim => &self.sim,
            Trigger::Spawn => &self.spawn,
        }
    }

    /// Next trigger to fire and how far away it is. Ties go to the sim trigger.
    pub fn next_due(&self) -> Option<(Trigger, f64)> {
        match (self.sim.due_in(), self.spawn.due_in()) {
            (Some(sim), Some(spawn)) if spawn < sim => Some((Trigger::Spawn, spawn)),
            (Some(sim), _) => Some((Trigger::Sim, sim)),
            (None, Some(spawn)) => Some((Trigger::Spawn, spawn)),
            (None, None) => None,
        }
    }

    /// Fire the next trigger if it falls within `budget_ms`, spending the
    /// time up to it. Returns `None` once nothing more is due this frame.
    pub fn pop_due(&mut self, budget_ms: &mut f64) -> Option<Trigger> {
        let (which, wait) = self.next_due()?;
        if wait > *budget_ms {
            return None;
        }
        self.elapse(wait);
        *budget_ms -= wait;

        let trigger = match which {
            Trigger::Sim => &mut self.sim,
            Trigger::Spawn => &mut self.spawn,
        };
        trigger.until_next_ms += trigger.period_ms;
        Some(which)
    }

    /// Let time pass without firing anything
    pub fn elapse(&mut self, ms: f64) {
        for trigger in [&mut self.sim, &mut self.spawn] {
            if trigger.active {
                trigger.until_next_ms -= ms;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler, mut budget: f64) -> Vec<Trigger> {
        let mut fired = Vec::new();
        while let Some(t) = scheduler.pop_due(&mut budget) {
            fired.push(t);
        }
        scheduler.elapse(budget);
        fired
    }

    #[test]
    fn test_idle_until_started() {
        let mut scheduler = Scheduler::new(17.0, 2000.0);
        assert!(!scheduler.is_running());
        assert!(drain(&mut scheduler, 5000.0).is_empty());
    }

    #[test]
    fn test_fires_on_period() {
        let mut scheduler = Scheduler::new(17.0, 2000.0);
        scheduler.start();
        assert!(drain(&mut scheduler, 16.0).is_empty());
        assert_eq!(drain(&mut scheduler, 1.0), vec![Trigger::Sim]);
        // 34 ms total elapsed after this frame: one more sim tick
        assert_eq!(drain(&mut scheduler, 17.0), vec![Trigger::Sim]);
    }

    #[test]
    fn test_spawn_interleaves_in_time_order() {
        let mut scheduler = Scheduler::new(17.0, 2000.0);
        scheduler.start();
        let fired = drain(&mut scheduler, 2010.0);
        let sims = fired.iter().filter(|t| **t == Trigger::Sim).count();
        assert_eq!(sims, 118); // 2010 / 17
        // Spawn lands between the 117th (1989 ms) and 118th (2006 ms) sim tick
        assert_eq!(fired.iter().position(|t| *t == Trigger::Spawn), Some(117));
    }

    #[test]
    fn test_tie_goes_to_sim() {
        let mut scheduler = Scheduler::new(10.0, 20.0);
        scheduler.start();
        assert_eq!(
            drain(&mut scheduler, 20.0),
            vec![Trigger::Sim, Trigger::Sim, Trigger::Spawn]
        );
    }

    #[test]
    fn test_cancel_stops_everything() {
        let mut scheduler = Scheduler::new(17.0, 2000.0);
        scheduler.start();
        let mut budget = 100.0;
        assert_eq!(scheduler.pop_due(&mut budget), Some(Trigger::Sim));
        scheduler.cancel();
        assert_eq!(scheduler.pop_due(&mut budget), None);
        assert!(scheduler.next_due().is_none());
    }

    #[test]
    fn test_restart_resets_phase() {
        let mut scheduler = Scheduler::new(17.0, 2000.0);
        scheduler.start();
        drain(&mut scheduler, 1999.0);
        scheduler.cancel();
        scheduler.start();
        assert_eq!(scheduler.next_due(), Some((Trigger::Sim, 17.0)));
        assert!(!drain(&mut scheduler, 1000.0).contains(&Trigger::Spawn));
    }
}
