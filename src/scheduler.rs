use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Cancellation token for one scheduled task. Cloning shares the same flag,
/// so a handle can outlive the task set that issued it.
#[derive(Clone, Debug)]
pub struct TaskHandle {
    live: Rc<Cell<bool>>,
}

impl TaskHandle {
    fn new() -> Self {
        Self {
            live: Rc::new(Cell::new(true)),
        }
    }

    pub fn cancel(&self) {
        self.live.set(false);
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }
}

/// A unit of deferred work: fire time, optional repeat interval, liveness
/// flag checked at fire time, and the callback itself.
pub struct Task<C> {
    due: Duration,
    seq: u64,
    every: Option<Duration>,
    handle: TaskHandle,
    run: Box<dyn FnMut(&mut C)>,
}

impl<C> Task<C> {
    /// Liveness must be re-checked at the point of execution, not only at
    /// scheduling time; this is what keeps a late-firing task from executing
    /// after its session was canceled.
    pub fn is_live(&self) -> bool {
        self.handle.is_live()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.every
    }

    pub fn invoke(&mut self, ctx: &mut C) {
        (self.run)(ctx)
    }
}

/// Cancelable collection of delayed one-shot callbacks plus repeating
/// callbacks, owned by a single hold session. Purely in-memory; the owner
/// drives it by calling `take_due` from its tick.
pub struct TaskSet<C> {
    tasks: Vec<Task<C>>,
    // Every handle issued since the last cancel_all, including tasks
    // currently taken out for execution.
    issued: Vec<TaskHandle>,
    seq: u64,
}

impl<C> TaskSet<C> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            issued: Vec::new(),
            seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Schedule a one-shot callback firing at absolute time `due`.
    pub fn schedule_at(
        &mut self,
        due: Duration,
        run: impl FnMut(&mut C) + 'static,
    ) -> TaskHandle {
        self.push(due, None, Box::new(run))
    }

    /// Schedule a repeating callback, first firing at `first` and then every
    /// `every` after each invocation.
    pub fn schedule_repeating_at(
        &mut self,
        first: Duration,
        every: Duration,
        run: impl FnMut(&mut C) + 'static,
    ) -> TaskHandle {
        self.push(first, Some(every), Box::new(run))
    }

    fn push(
        &mut self,
        due: Duration,
        every: Option<Duration>,
        run: Box<dyn FnMut(&mut C)>,
    ) -> TaskHandle {
        let handle = TaskHandle::new();
        self.seq += 1;
        self.tasks.push(Task {
            due,
            seq: self.seq,
            every,
            handle: handle.clone(),
            run,
        });
        self.issued.push(handle.clone());
        handle
    }

    /// Invalidate every handle issued since the last cancel_all and drop all
    /// pending tasks. Idempotent; a task already taken out for execution is
    /// suppressed through its (now dead) liveness flag.
    pub fn cancel_all(&mut self) {
        for handle in self.issued.drain(..) {
            handle.cancel();
        }
        self.tasks.clear();
    }

    /// Remove and return every live task due at `now`, ordered by fire time
    /// and then by scheduling order.
    pub fn take_due(&mut self, now: Duration) -> Vec<Task<C>> {
        let mut due = Vec::new();
        let mut rest = Vec::with_capacity(self.tasks.len());
        for task in self.tasks.drain(..) {
            if !task.is_live() {
                continue;
            }
            if task.due <= now {
                due.push(task);
            } else {
                rest.push(task);
            }
        }
        self.tasks = rest;
        due.sort_by_key(|t| (t.due, t.seq));
        due
    }

    /// Re-insert a repeating task with a new fire time.
    pub fn put_back(&mut self, mut task: Task<C>, due: Duration) {
        task.due = due;
        self.tasks.push(task);
    }
}

impl<C> Default for TaskSet<C> {
    fn default() -> Self {
        Self::new()
    }
}
