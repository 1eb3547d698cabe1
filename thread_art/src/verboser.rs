/// Progress of a long running operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    /// A segment was added; total segment count so far.
    Growing(usize),
    /// Threads are being cut back to this many segments.
    Truncating(usize),
    /// Retained segments are being drawn again.
    Replaying(usize),
    Measuring,
}

pub trait Verboser {
    fn verbose(&mut self, message: Message);
}

pub struct Silent;

impl Verboser for Silent {
    fn verbose(&mut self, _: Message) {}
}

impl<F: FnMut(Message)> Verboser for F {
    fn verbose(&mut self, message: Message) {
        self(message)
    }
}
