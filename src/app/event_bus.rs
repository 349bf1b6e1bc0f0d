use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::event::DomainEvent;

pub(crate) struct EventBusRuntime {
    tasks: Vec<JoinHandle<()>>,
}

impl EventBusRuntime {
    pub(crate) fn spawn() -> (
        UnboundedSender<DomainEvent>,
        UnboundedReceiver<DomainEvent>,
        Self,
    ) {
        let (tx, rx) = unbounded_channel();
        let tasks = vec![spawn_input_task(tx.clone())];
        (tx, rx, Self { tasks })
    }

    pub(crate) fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

fn spawn_input_task(tx: UnboundedSender<DomainEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut input_stream = EventStream::new();
        while let Some(event) = input_stream.next().await {
            let loop_event = match event {
                Ok(event) if is_relevant(&event) => DomainEvent::Input(event),
                Ok(_) => continue,
                Err(err) => {
                    warn!(error = %err, "terminal input stream failed");
                    DomainEvent::InputError(err.to_string())
                }
            };
            if tx.send(loop_event).is_err() {
                return;
            }
        }
    })
}

/// Focus and paste events never change the session.
fn is_relevant(event: &Event) -> bool {
    matches!(event, Event::Key(_) | Event::Mouse(_) | Event::Resize(_, _))
}
