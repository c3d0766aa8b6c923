//! Microtask queue
//!
//! FIFO queue of continuations over some context type. The owner drains
//! it between turns; tasks scheduled while draining run in the same
//! drain, after everything already queued.

use std::collections::VecDeque;

/// FIFO microtask queue over a context `C`
pub struct Microtasks<C> {
    queue: VecDeque<Box<dyn FnOnce(&mut C)>>,
}

impl<C> Microtasks<C> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Queue a continuation
    pub fn schedule(&mut self, task: impl FnOnce(&mut C) + 'static) {
        self.queue.push_back(Box::new(task));
    }

    /// Take the next continuation, if any
    pub fn pop(&mut self) -> Option<Box<dyn FnOnce(&mut C)>> {
        self.queue.pop_front()
    }

    /// Number of queued continuations
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<C> Default for Microtasks<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for Microtasks<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Microtasks")
            .field("queued", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut tasks: Microtasks<Vec<u32>> = Microtasks::new();
        tasks.schedule(|out| out.push(1));
        tasks.schedule(|out| out.push(2));

        let mut out = Vec::new();
        while let Some(task) = tasks.pop() {
            task(&mut out);
        }
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn test_tasks_scheduled_during_drain_run_after() {
        struct Ctx {
            tasks: Microtasks<Ctx>,
            out: Vec<u32>,
        }

        let mut ctx = Ctx {
            tasks: Microtasks::new(),
            out: Vec::new(),
        };
        ctx.tasks.schedule(|c: &mut Ctx| {
            c.out.push(1);
            c.tasks.schedule(|c: &mut Ctx| c.out.push(3));
        });
        ctx.tasks.schedule(|c: &mut Ctx| c.out.push(2));

        while let Some(task) = ctx.tasks.pop() {
            task(&mut ctx);
        }
        assert_eq!(ctx.out, vec![1, 2, 3]);
    }
}
