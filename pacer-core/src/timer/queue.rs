//! Fixed-capacity timer queue

/// Default number of concurrently scheduled tasks
pub const TIMER_SLOTS: usize = 8;

/// Errors that can occur when scheduling a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Every slot holds a live task
    Full,
}

/// Handle to a scheduled task
///
/// Carries the slot generation, so a handle kept after its task finished
/// can never cancel an unrelated task that later reused the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskHandle {
    slot: u8,
    generation: u16,
}

#[derive(Debug, Clone, Copy)]
struct Entry<T> {
    task: T,
    /// Time the current interval started
    armed_at: u32,
    /// Interval length in ms
    delay_ms: u32,
    /// Re-arm after firing instead of being removed
    repeat: bool,
    /// Scheduling order, breaks deadline ties
    order: u32,
    generation: u16,
}

/// Polled timer queue with `N` slots
///
/// Times are wrapping `u32` milliseconds from any monotonic clock.
#[derive(Debug)]
pub struct TimerQueue<T, const N: usize = TIMER_SLOTS> {
    slots: [Option<Entry<T>>; N],
    generations: [u16; N],
    next_order: u32,
}

impl<T: Copy, const N: usize> Default for TimerQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> TimerQueue<T, N> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            slots: [None; N],
            generations: [0; N],
            next_order: 0,
        }
    }

    /// Schedule `task` to fire once, `delay_ms` after `now`
    pub fn after(&mut self, delay_ms: u32, now: u32, task: T) -> Result<TaskHandle, TimerError> {
        self.insert(delay_ms, now, task, false)
    }

    /// Schedule `task` to fire every `period_ms`, first at `now + period_ms`
    pub fn every(&mut self, period_ms: u32, now: u32, task: T) -> Result<TaskHandle, TimerError> {
        self.insert(period_ms.max(1), now, task, true)
    }

    fn insert(
        &mut self,
        delay_ms: u32,
        now: u32,
        task: T,
        repeat: bool,
    ) -> Result<TaskHandle, TimerError> {
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(TimerError::Full)?;

        let generation = self.generations[slot].wrapping_add(1);
        self.generations[slot] = generation;

        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.slots[slot] = Some(Entry {
            task,
            armed_at: now,
            delay_ms,
            repeat,
            order,
            generation,
        });

        Ok(TaskHandle {
            slot: slot as u8,
            generation,
        })
    }

    /// Cancel a scheduled task
    ///
    /// Returns false if the task already finished or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.slot as usize) else {
            return false;
        };

        if slot.as_ref().map(|e| e.generation) == Some(handle.generation) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Check if the task behind `handle` is still scheduled
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        matches!(
            self.slots.get(handle.slot as usize),
            Some(Some(e)) if e.generation == handle.generation
        )
    }

    /// Take the next due task
    ///
    /// Returns the task whose deadline passed longest ago, or None if
    /// nothing is due at `now`. One-shot tasks are removed; repeating tasks
    /// are re-armed from `now`, so periods missed by a late poll collapse
    /// into a single firing. Call in a loop to drain everything due.
    pub fn poll(&mut self, now: u32) -> Option<T> {
        let mut due: Option<(usize, u32, u32)> = None;

        for (i, slot) in self.slots.iter().enumerate() {
            let Some(entry) = slot else { continue };
            let elapsed = now.wrapping_sub(entry.armed_at);
            if elapsed < entry.delay_ms {
                continue;
            }

            let overdue = elapsed - entry.delay_ms;
            let earlier = match due {
                None => true,
                Some((_, best_overdue, best_order)) => {
                    overdue > best_overdue || (overdue == best_overdue && entry.order < best_order)
                }
            };
            if earlier {
                due = Some((i, overdue, entry.order));
            }
        }

        let (index, _, _) = due?;
        let slot = &mut self.slots[index];
        let entry = (*slot)?;

        if entry.repeat {
            *slot = Some(Entry {
                armed_at: now,
                ..entry
            });
        } else {
            *slot = None;
        }

        Some(entry.task)
    }

    /// Number of scheduled tasks
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Check if no task is scheduled
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
