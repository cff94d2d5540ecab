use crossbeam_channel::{Receiver, Sender, unbounded};

/// Input supplied by the external input-handling collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer position in screen coordinates.
    PointerMoved { x: i32, y: i32 },
    Activate,
    Deactivate,
    Lock,
    Reset,
    ToggleMultiMeasurement,
    SetMultiMeasurement(bool),
    /// Stop the loop after the current tick.
    Shutdown,
}

/// Create a connected handle/queue pair.
pub fn input_channel() -> (InputHandle, InputQueue) {
    let (tx, rx) = unbounded();
    (InputHandle { tx }, InputQueue { rx })
}

/// Sending side, cloneable across input threads.
#[derive(Debug, Clone)]
pub struct InputHandle {
    tx: Sender<InputEvent>,
}

impl InputHandle {
    /// Queue an event. Returns `false` once the loop has gone away.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn pointer_moved(&self, x: i32, y: i32) -> bool {
        self.send(InputEvent::PointerMoved { x, y })
    }
}

/// Receiving side, drained by the loop once per tick.
#[derive(Debug)]
pub struct InputQueue {
    rx: Receiver<InputEvent>,
}

impl InputQueue {
    /// Everything queued so far, in arrival order. Never blocks.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_events_in_order_and_empties_the_queue() {
        let (handle, queue) = input_channel();
        handle.send(InputEvent::Activate);
        handle.pointer_moved(3, 4);
        handle.send(InputEvent::Lock);

        assert_eq!(
            queue.drain(),
            vec![
                InputEvent::Activate,
                InputEvent::PointerMoved { x: 3, y: 4 },
                InputEvent::Lock
            ]
        );
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn events_from_other_threads_arrive() {
        let (handle, queue) = input_channel();
        let sender = handle.clone();
        std::thread::spawn(move || {
            for i in 0..10 {
                sender.pointer_moved(i, i);
            }
        })
        .join()
        .unwrap();

        assert_eq!(queue.drain().len(), 10);
    }

    #[test]
    fn send_reports_a_dropped_queue() {
        let (handle, queue) = input_channel();
        drop(queue);
        assert!(!handle.send(InputEvent::Activate));
    }
}
