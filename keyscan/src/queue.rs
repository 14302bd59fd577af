//! Bounded FIFO of key events.
//!
//! `head` and `tail` are free-running `u32` counters, the slot of a counter is
//! `counter & (N - 1)` and the depth is `head - tail` in wrapping arithmetic,
//! so the counters may overflow freely. When the producer catches up with an
//! unread slot the oldest event is dropped and counted in
//! [`EventQueue::overflows`].

use keyscan_types::KeyEvent;

pub struct EventQueue<const N: usize> {
    buffer: [KeyEvent; N],
    /// Producer cursor
    head: u32,
    /// Consumer cursor
    tail: u32,
    /// Events dropped because the queue was full
    overflows: u32,
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventQueue<N> {
    const MASK: u32 = {
        assert!(N.is_power_of_two(), "event queue capacity must be a power of two");
        assert!(N <= 1 << 31, "event queue capacity is too large");
        (N - 1) as u32
    };

    pub const fn new() -> Self {
        let _ = Self::MASK;
        Self {
            buffer: [KeyEvent::from_byte(0); N],
            head: 0,
            tail: 0,
            overflows: 0,
        }
    }

    /// Append an event, dropping the oldest unread one if the queue is full.
    pub fn push(&mut self, event: KeyEvent) {
        if self.len() == N {
            self.tail = self.tail.wrapping_add(1);
            self.overflows = self.overflows.wrapping_add(1);
            warn!("Event queue full, dropped the oldest event");
        }
        self.buffer[(self.head & Self::MASK) as usize] = event;
        self.head = self.head.wrapping_add(1);
    }

    /// Remove and return the oldest unread event.
    pub fn pop(&mut self) -> Option<KeyEvent> {
        if self.is_empty() {
            return None;
        }
        let event = self.buffer[(self.tail & Self::MASK) as usize];
        self.tail = self.tail.wrapping_add(1);
        Some(event)
    }

    /// The unread event `offset` places after the oldest one.
    pub fn peek(&self, offset: usize) -> Option<KeyEvent> {
        if offset >= self.len() {
            return None;
        }
        let index = self.tail.wrapping_add(offset as u32) & Self::MASK;
        Some(self.buffer[index as usize])
    }

    /// Number of unread events.
    pub fn len(&self) -> usize {
        self.head.wrapping_sub(self.tail) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Total number of events ever pushed, wrapping.
    pub fn produced(&self) -> u32 {
        self.head
    }

    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Drop every unread event and reset the counters.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.overflows = 0;
    }

    /// Unread events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = KeyEvent> + '_ {
        (0..self.len()).filter_map(|offset| self.peek(offset))
    }

    #[cfg(test)]
    fn with_counters(head: u32, tail: u32) -> Self {
        let mut queue = Self::new();
        queue.head = head;
        queue.tail = tail;
        queue
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // Init logger for tests
    #[ctor::ctor]
    fn init_log() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    #[test]
    fn test_fifo_order() {
        let mut queue: EventQueue<8> = EventQueue::new();
        let events = [
            KeyEvent::press(3),
            KeyEvent::press(12),
            KeyEvent::release(3),
            KeyEvent::release(12),
        ];
        for event in events {
            queue.push(event);
        }
        assert_eq!(queue.len(), 4);

        // peek sees what pop will return
        let peeked: Vec<_> = (0..4).map(|i| queue.peek(i).unwrap()).collect();
        assert_eq!(peeked, events);
        assert_eq!(queue.peek(4), None);
        assert_eq!(queue.iter().collect::<Vec<_>>(), events);

        let popped: Vec<_> = core::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(popped, events);
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.produced(), 4);
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let mut queue: EventQueue<4> = EventQueue::new();
        for key in 0..6 {
            queue.push(KeyEvent::press(key));
        }
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.overflows(), 2);
        assert_eq!(
            queue.iter().map(|e| e.key()).collect::<Vec<_>>(),
            vec![2, 3, 4, 5]
        );
        assert_eq!(queue.pop(), Some(KeyEvent::press(2)));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_depth_across_counter_wrap() {
        let mut queue: EventQueue<8> = EventQueue::with_counters(u32::MAX - 1, u32::MAX - 1);
        assert_eq!(queue.len(), 0);

        for key in 0..5 {
            queue.push(KeyEvent::press(key));
        }
        // head wrapped past zero, tail did not
        assert!(queue.produced() < 4);
        assert_eq!(queue.len(), 5);

        assert_eq!(queue.pop(), Some(KeyEvent::press(0)));
        assert_eq!(queue.pop(), Some(KeyEvent::press(1)));
        assert_eq!(queue.pop(), Some(KeyEvent::press(2)));
        // Both counters wrapped
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek(1), Some(KeyEvent::press(4)));
    }

    #[test]
    fn test_overflow_across_counter_wrap() {
        let mut queue: EventQueue<4> = EventQueue::with_counters(u32::MAX, u32::MAX);
        for key in 0..7 {
            queue.push(KeyEvent::release(key));
        }
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.overflows(), 3);
        assert_eq!(queue.pop(), Some(KeyEvent::release(3)));
    }

    #[test]
    fn test_clear() {
        let mut queue: EventQueue<4> = EventQueue::new();
        queue.push(KeyEvent::press(1));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.produced(), 0);
        assert_eq!(queue.peek(0), None);
    }
}
