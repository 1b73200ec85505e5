use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    Continue,
    Stop(T),
}

// Single-threaded cooperative scheduler. Tasks run strictly in FIFO order and
// a task that continues goes to the back of the queue, so tasks that always
// continue interleave one activation at a time.
#[derive(Debug)]
pub struct RunQueue<K> {
    tasks: VecDeque<K>,
}

impl<K: Copy> RunQueue<K> {
    pub fn new() -> Self {
        RunQueue { tasks: VecDeque::new() }
    }

    pub fn push(&mut self, task: K) {
        self.tasks.push_back(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // Runs until a task stops, which cancels everything still queued. Returns
    // None only if the queue drains without any task stopping.
    pub fn run<T>(&mut self, mut activate: impl FnMut(K) -> Step<T>) -> Option<T> {
        while let Some(task) = self.tasks.pop_front() {
            match activate(task) {
                Step::Continue => self.tasks.push_back(task),
                Step::Stop(ret) => {
                    self.tasks.clear();
                    return Some(ret);
                }
            }
        }
        None
    }
}

impl<K: Copy> Default for RunQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
