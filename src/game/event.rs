//! Event System
//!
//! The runtime does not call the HUD or the logger directly when its flags
//! change. It sends events that the application shell drains once per frame:
//!
//! 1. Key P pressed -> runtime flips collision, sends a `HudStatus`
//! 2. Shell drains `status` -> HUD text redrawn with the new flags
//! 3. Shell drains `cinematic` -> lifecycle beats logged
//!
//! Queues are only ever written by the runtime's single update pass.

use crate::math::Vec3;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Most recent event without consuming the queue
    pub fn last(&self) -> Option<&T> {
        self.events.last()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all runtime events.
#[derive(Debug, Default)]
pub struct Events {
    /// Flags changed; the HUD should redraw
    pub status: EventQueue<HudStatus>,

    /// Cinematic started or finished
    pub cinematic: EventQueue<CinematicEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all event queues. Call at end of frame.
    pub fn clear_all(&mut self) {
        self.status.clear();
        self.cinematic.clear();
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// Snapshot of the three user-facing flags, sent after every change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudStatus {
    pub collision_enabled: bool,
    pub free_camera: bool,
    pub cinematic_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CinematicEvent {
    Started,
    /// Sequence ran to its end or was aborted; the player is back in control at `player_position`
    Finished { aborted: bool, player_position: Vec3 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue() {
        let mut queue: EventQueue<i32> = EventQueue::new();

        queue.send(1);
        queue.send(2);
        queue.send(3);

        assert_eq!(queue.last(), Some(&3));

        let collected: Vec<_> = queue.drain().collect();
        assert_eq!(collected, vec![1, 2, 3]);
        assert_eq!(queue.last(), None);
    }

    #[test]
    fn test_events_container() {
        let mut events = Events::new();

        events.status.send(HudStatus {
            collision_enabled: true,
            free_camera: false,
            cinematic_active: false,
        });
        events.cinematic.send(CinematicEvent::Started);

        assert!(events.status.last().is_some());
        assert_eq!(events.cinematic.last(), Some(&CinematicEvent::Started));

        events.clear_all();
        assert_eq!(events.status.last(), None);
        assert_eq!(events.cinematic.last(), None);
    }
}
