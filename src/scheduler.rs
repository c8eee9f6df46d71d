//! Deferred tasks bound to a run
//!
//! Banners clear and level completion is signalled after a real-time delay.
//! Each task remembers the run that scheduled it; the owner re-validates the
//! run and app state before acting on anything returned by `take_due`.

/// Work to perform once a delay has elapsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// Hide the banner if it still shows this text
    ClearAnnouncement(String),
    /// All waves are cleared; tell the shell the level is done
    SignalLevelComplete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask {
    pub run_id: u64,
    /// Host clock (ms) at which the task becomes due
    pub due_ms: f64,
    pub task: Deferred,
}

/// Pending deferred tasks, kept in schedule order
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, run_id: u64, now_ms: f64, delay_ms: f64, task: Deferred) {
        log::debug!("Run {} scheduled {:?} in {} ms", run_id, task, delay_ms);
        self.tasks.push(ScheduledTask {
            run_id,
            due_ms: now_ms + delay_ms.max(0.0),
            task,
        });
    }

    /// Remove and return every task due at `now_ms`, earliest first
    pub fn take_due(&mut self, now_ms: f64) -> Vec<ScheduledTask> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| t.due_ms <= now_ms);
        self.tasks = pending;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due
    }

    /// Shift a run's pending tasks later (time spent paused)
    pub fn postpone(&mut self, run_id: u64, by_ms: f64) {
        for task in self.tasks.iter_mut().filter(|t| t.run_id == run_id) {
            task.due_ms += by_ms.max(0.0);
        }
    }

    /// Drop every task of a run; returns how many were dropped
    pub fn cancel_run(&mut self, run_id: u64) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.run_id != run_id);
        before - self.tasks.len()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_come_due_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, 0.0, 2000.0, Deferred::ClearAnnouncement("WAVE 2".into()));
        scheduler.schedule(1, 0.0, 1500.0, Deferred::SignalLevelComplete);

        assert!(scheduler.take_due(1499.0).is_empty());
        let due = scheduler.take_due(2500.0);
        assert_eq!(
            due.iter().map(|t| t.task.clone()).collect::<Vec<_>>(),
            vec![
                Deferred::SignalLevelComplete,
                Deferred::ClearAnnouncement("WAVE 2".into())
            ]
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_cancel_only_that_run() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, 0.0, 10.0, Deferred::SignalLevelComplete);
        scheduler.schedule(2, 0.0, 10.0, Deferred::SignalLevelComplete);
        assert_eq!(scheduler.cancel_run(1), 1);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.take_due(10.0)[0].run_id, 2);
    }

    #[test]
    fn test_postpone_shifts_due_time() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(3, 100.0, 1500.0, Deferred::SignalLevelComplete);
        scheduler.postpone(3, 5000.0);
        assert!(scheduler.take_due(1600.0).is_empty());
        assert_eq!(scheduler.take_due(6600.0).len(), 1);
    }
}
