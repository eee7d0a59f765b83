use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::warn;

use crate::ticker::FrameEvent;

/// Notifications published by a chaser
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", content = "frame", rename_all = "snake_case")]
pub enum ChaseEvent {
    /// Motion is pending; fired from the update pass
    Update(FrameEvent),
    /// The value changed since the last render
    Render(FrameEvent),
    /// The value settled exactly on the target
    Idle(FrameEvent),
}

impl ChaseEvent {
    pub fn kind(&self) -> ChaseEventKind {
        match self {
            ChaseEvent::Update(_) => ChaseEventKind::Update,
            ChaseEvent::Render(_) => ChaseEventKind::Render,
            ChaseEvent::Idle(_) => ChaseEventKind::Idle,
        }
    }

    pub fn frame(&self) -> &FrameEvent {
        match self {
            ChaseEvent::Update(frame) | ChaseEvent::Render(frame) | ChaseEvent::Idle(frame) => {
                frame
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChaseEventKind {
    Update,
    Render,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Rc<dyn Fn(&FrameEvent)>;

/// Observer registry with an optional channel sink
#[derive(Default)]
pub(crate) struct Emitter {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, ChaseEventKind, Callback)>>,
    sender: RefCell<Option<mpsc::UnboundedSender<ChaseEvent>>>,
}

impl Emitter {
    pub fn on(&self, kind: ChaseEventKind, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, kind, callback));
        id
    }

    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _, _)| *lid != id);
        before != listeners.len()
    }

    pub fn set_sender(&self, tx: Option<mpsc::UnboundedSender<ChaseEvent>>) {
        *self.sender.borrow_mut() = tx;
    }

    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
        self.sender.borrow_mut().take();
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `event` to every matching callback and the channel sink
    ///
    /// Callbacks run against a snapshot so they may register or remove
    /// listeners while being notified.
    pub fn emit(&self, event: ChaseEvent) {
        let kind = event.kind();
        let callbacks: Vec<Callback> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, cb)| Rc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(event.frame());
        }

        let sender = self.sender.borrow().clone();
        if let Some(tx) = sender {
            if tx.send(event).is_err() {
                warn!("Failed to send chase event: receiver dropped");
                self.sender.borrow_mut().take();
            }
        }
    }
}
