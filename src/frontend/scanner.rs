use std::{array, iter::Flatten, mem};

use derive_more::TryFrom;

#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFrom)]
#[try_from(repr)]
#[repr(u8)]
pub enum Command {
    Inc = b'+',
    Dec = b'-',
    MoveRight = b'>',
    MoveLeft = b'<',
    LoopOpen = b'[',
    LoopClose = b']',
    Output = b'.',
    Input = b',',
}

/// One classified source byte. Every byte maps to exactly one symbol;
/// anything that is not a command is a comment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Command(Command),
    Ignored,
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Self {
        Command::try_from(byte).map_or(Symbol::Ignored, Symbol::Command)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Prologue,
    /// Net change of the current cell, never zero.
    FlushData(i64),
    /// Net change of the pointer, never zero.
    FlushPtr(i64),
    LoopOpen,
    LoopClose,
    Output,
    Input,
    Epilogue,
}

/// The two pending run accumulators.
///
/// At most one of them is non-zero between steps: a symbol of one category
/// flushes the other category's run before it is accumulated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pending {
    pub data_delta: i64,
    pub ptr_delta: i64,
}

type Queue = Flatten<array::IntoIter<Option<Event>, 3>>;

/// Events produced by a single step, in emission order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Emitted([Option<Event>; 3]);

impl Emitted {
    fn one(event: Option<Event>) -> Self {
        Emitted([event, None, None])
    }
}

impl IntoIterator for Emitted {
    type Item = Event;
    type IntoIter = Queue;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter().flatten()
    }
}

impl Pending {
    fn flush_data(&mut self) -> Option<Event> {
        (self.data_delta != 0)
            .then(|| Event::FlushData(mem::take(&mut self.data_delta)))
    }

    fn flush_ptr(&mut self) -> Option<Event> {
        (self.ptr_delta != 0)
            .then(|| Event::FlushPtr(mem::take(&mut self.ptr_delta)))
    }

    fn add_data(&mut self, delta: i64) -> Emitted {
        let flushed = self.flush_ptr();
        self.data_delta += delta;
        Emitted::one(flushed)
    }

    fn add_ptr(&mut self, delta: i64) -> Emitted {
        let flushed = self.flush_data();
        self.ptr_delta += delta;
        Emitted::one(flushed)
    }

    fn flush_then(&mut self, event: Option<Event>) -> Emitted {
        // data before pointer; the two runs touch independent state
        Emitted([self.flush_data(), self.flush_ptr(), event])
    }

    pub fn step(&mut self, symbol: Symbol) -> Emitted {
        use Command as C;
        match symbol {
            Symbol::Command(C::Inc) => self.add_data(1),
            Symbol::Command(C::Dec) => self.add_data(-1),
            Symbol::Command(C::MoveRight) => self.add_ptr(1),
            Symbol::Command(C::MoveLeft) => self.add_ptr(-1),
            Symbol::Command(C::LoopOpen) => {
                self.flush_then(Some(Event::LoopOpen))
            }
            Symbol::Command(C::LoopClose) => {
                self.flush_then(Some(Event::LoopClose))
            }
            Symbol::Command(C::Output) => self.flush_then(Some(Event::Output)),
            Symbol::Command(C::Input) => self.flush_then(Some(Event::Input)),
            Symbol::Ignored => Emitted::default(),
        }
    }

    /// Flushes whatever is left at the end of the stream.
    pub fn finish(&mut self) -> Emitted {
        self.flush_then(None)
    }
}

/// Lazily folds a byte stream into body events (no prologue or epilogue).
pub struct Scanner<I> {
    bytes: I,
    pending: Pending,
    queued: Queue,
    processed: usize,
    finished: bool,
}

impl<I: Iterator<Item = u8>> Scanner<I> {
    pub fn new<T>(bytes: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Scanner {
            bytes: bytes.into_iter(),
            pending: Pending::default(),
            queued: Emitted::default().into_iter(),
            processed: 0,
            finished: false,
        }
    }

    /// Number of source bytes consumed so far, comments included.
    pub fn processed(&self) -> usize {
        self.processed
    }
}

impl<I: Iterator<Item = u8>> Iterator for Scanner<I> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        loop {
            if let Some(event) = self.queued.next() {
                return Some(event);
            }
            if self.finished {
                return None;
            }

            self.queued = match self.bytes.next() {
                Some(byte) => {
                    self.processed += 1;
                    self.pending.step(byte.into())
                }
                None => {
                    self.finished = true;
                    self.pending.finish()
                }
            }
            .into_iter();
        }
    }
}

pub fn scan(source: &[u8]) -> Vec<Event> {
    Scanner::new(source.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use Event as E;

    #[test]
    fn classifies_every_byte() {
        for byte in 0..=u8::MAX {
            let symbol = Symbol::from(byte);
            let expected = b"+-><[].,".contains(&byte);
            assert_eq!(matches!(symbol, Symbol::Command(_)), expected);
        }
        assert_eq!(Symbol::from(b'['), Symbol::Command(Command::LoopOpen));
        assert_eq!(Symbol::from(b'x'), Symbol::Ignored);
    }

    #[test]
    fn folds_increments() {
        assert!(scan(b"").is_empty());
        assert_eq!(scan(b"+"), vec![E::FlushData(1)]);
        assert_eq!(scan(b"+++++++"), vec![E::FlushData(7)]);
        assert_eq!(scan(b"<<<<"), vec![E::FlushPtr(-4)]);
    }

    #[test]
    fn switching_category_flushes() {
        assert_eq!(scan(b"+++>>"), vec![E::FlushData(3), E::FlushPtr(2)]);
        assert_eq!(scan(b"--<"), vec![E::FlushData(-2), E::FlushPtr(-1)]);
        assert_eq!(
            scan(b"+>-<"),
            vec![
                E::FlushData(1),
                E::FlushPtr(1),
                E::FlushData(-1),
                E::FlushPtr(-1),
            ]
        );
    }

    #[test]
    fn net_zero_runs_emit_nothing() {
        assert!(scan(b"+-").is_empty());
        assert!(scan(b"+++---").is_empty());
        assert!(scan(b"><").is_empty());
        assert_eq!(scan(b"+-."), vec![E::Output]);
    }

    #[test]
    fn ignored_bytes_do_not_break_runs() {
        assert_eq!(scan(b"+  +"), vec![E::FlushData(2)]);
        assert_eq!(scan(b"> comment\n>"), vec![E::FlushPtr(2)]);
        assert!(scan(b"hello world").is_empty());
    }

    #[test]
    fn structural_symbols_flush_both_runs() {
        assert_eq!(scan(b"++."), vec![E::FlushData(2), E::Output]);
        assert_eq!(scan(b">>,"), vec![E::FlushPtr(2), E::Input]);
        assert_eq!(scan(b"[]"), vec![E::LoopOpen, E::LoopClose]);
    }

    #[test]
    fn translates_reference_programs() {
        assert_eq!(
            scan(b"++>-."),
            vec![E::FlushData(2), E::FlushPtr(1), E::FlushData(-1), E::Output]
        );
        assert_eq!(
            scan(b"[->+<]"),
            vec![
                E::LoopOpen,
                E::FlushData(-1),
                E::FlushPtr(1),
                E::FlushData(1),
                E::FlushPtr(-1),
                E::LoopClose,
            ]
        );
    }

    #[test]
    fn unbalanced_brackets_pass_through() {
        assert_eq!(scan(b"]]["), vec![E::LoopClose, E::LoopClose, E::LoopOpen]);
    }

    #[test]
    fn at_most_one_accumulator_is_pending() {
        let mut pending = Pending::default();
        for byte in b"++>><-+<<+-+>.>-,[+]" {
            pending.step(Symbol::from(*byte));
            assert!(pending.data_delta == 0 || pending.ptr_delta == 0);
        }
    }

    #[test]
    fn step_reports_flushed_run() {
        let mut pending = Pending::default();
        assert_eq!(pending.step(Symbol::from(b'+')).into_iter().count(), 0);
        assert_eq!(pending.step(Symbol::from(b'+')).into_iter().count(), 0);
        let emitted: Vec<_> =
            pending.step(Symbol::from(b'>')).into_iter().collect();
        assert_eq!(emitted, vec![E::FlushData(2)]);
        assert_eq!(pending, Pending { data_delta: 0, ptr_delta: 1 });

        let emitted: Vec<_> = pending.finish().into_iter().collect();
        assert_eq!(emitted, vec![E::FlushPtr(1)]);
        assert_eq!(pending, Pending::default());
    }

    #[test]
    fn counts_processed_bytes() {
        let mut scanner = Scanner::new(b"+ + x".iter().copied());
        assert_eq!(scanner.by_ref().count(), 1);
        assert_eq!(scanner.processed(), 5);
    }
}
