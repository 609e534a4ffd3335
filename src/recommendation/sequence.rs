//! Ordering for overlapping recommendation requests.
//!
//! A request that is overtaken by a newer one while waiting on the agent must
//! not overwrite the newer result. Each request takes a [Ticket] before
//! calling the agent and checks it is still the latest once the agent answers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one request in the order they were issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Hands out increasing tickets and remembers the newest one.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a new request. It supersedes every earlier ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no ticket has been issued since `ticket`.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::RequestSequencer;

    #[test]
    fn newer_ticket_supersedes_older() {
        let sequencer = RequestSequencer::new();

        let first = sequencer.issue();
        assert!(sequencer.is_latest(first));

        let second = sequencer.issue();
        assert!(!sequencer.is_latest(first));
        assert!(sequencer.is_latest(second));
        assert!(first < second);
    }

    #[test]
    fn tickets_are_unique_across_threads() {
        let sequencer = Arc::new(RequestSequencer::new());

        let handles = (0..8)
            .map(|_| {
                let sequencer = sequencer.clone();
                thread::spawn(move || (0..100).map(|_| sequencer.issue()).collect::<Vec<_>>())
            })
            .collect::<Vec<_>>();

        let mut tickets = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>();
        let last = *tickets.iter().max().unwrap();
        tickets.sort();
        tickets.dedup();

        assert_eq!(tickets.len(), 800);
        assert!(sequencer.is_latest(last));
    }
}
