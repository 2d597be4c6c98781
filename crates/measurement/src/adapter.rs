use std::{error, fmt};

use futures::{Stream, StreamExt};
use model::{
    measurement::{FinalizedMeasurement, MeasurementMode},
    point::{GeoPoint, LatLng},
};
use serde::{Deserialize, Serialize};
use tokio::{
    sync::{mpsc, oneshot},
    task::{JoinError, JoinHandle},
};
use tokio_util::sync::CancellationToken;
use utility::id::Id;

use crate::{
    format::FormattedValue,
    session::{Outcome, Session},
};

/// A pointer event from the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MapEvent {
    #[serde(rename = "click")]
    Click { latlng: LatLng },
    /// Only the signal matters, the position is not used.
    #[serde(rename = "dblclick")]
    DoubleClick { latlng: LatLng },
}

/// Applies a single map event to `session`.
pub fn dispatch(session: &mut Session, event: MapEvent) -> Outcome {
    match event {
        MapEvent::Click { latlng } => session.add_point(latlng),
        MapEvent::DoubleClick { .. } if session.mode() == MeasurementMode::Area => {
            session.finish_area()
        }
        MapEvent::DoubleClick { .. } => Outcome::Ignored,
    }
}

#[derive(Debug)]
pub enum AdapterError {
    /// The session task is gone, either detached or panicked.
    Detached,
    Join(JoinError),
}

impl error::Error for AdapterError {}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Detached => write!(f, "The measuring session is no longer attached."),
            Self::Join(why) => write!(f, "The measuring session task failed: {}", why),
        }
    }
}

impl From<oneshot::error::RecvError> for AdapterError {
    fn from(_: oneshot::error::RecvError) -> Self {
        Self::Detached
    }
}

impl<T> From<mpsc::error::SendError<T>> for AdapterError {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        Self::Detached
    }
}

impl From<JoinError> for AdapterError {
    fn from(why: JoinError) -> Self {
        Self::Join(why)
    }
}

/// State of a session at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub mode: MeasurementMode,
    pub points: Vec<GeoPoint>,
    pub measurements: Vec<FinalizedMeasurement>,
}

#[derive(Debug)]
enum Command {
    SetMode {
        mode: MeasurementMode,
        responder: oneshot::Sender<()>,
    },
    FinishArea {
        responder: oneshot::Sender<Outcome>,
    },
    Delete {
        id: Id<FinalizedMeasurement>,
        responder: oneshot::Sender<bool>,
    },
    ClearAll {
        responder: oneshot::Sender<()>,
    },
    Snapshot {
        responder: oneshot::Sender<Snapshot>,
    },
    RunningValue {
        responder: oneshot::Sender<Option<FormattedValue>>,
    },
}

fn handle_command(session: &mut Session, command: Command) {
    let delivered = match command {
        Command::SetMode { mode, responder } => {
            session.set_mode(mode);
            responder.send(()).is_ok()
        }
        Command::FinishArea { responder } => responder.send(session.finish_area()).is_ok(),
        Command::Delete { id, responder } => {
            responder.send(session.delete_measurement(&id)).is_ok()
        }
        Command::ClearAll { responder } => {
            session.clear_all();
            responder.send(()).is_ok()
        }
        Command::Snapshot { responder } => responder
            .send(Snapshot {
                mode: session.mode(),
                points: session.current_points().to_vec(),
                measurements: session.measurements().to_vec(),
            })
            .is_ok(),
        Command::RunningValue { responder } => {
            responder.send(session.running_value()).is_ok()
        }
    };
    if !delivered {
        log::warn!("Can not respond to session command!");
    }
}

/// Binds `session` to a stream of map events.
///
/// The session moves into a task that applies events and commands one at a
/// time. Events already waiting in the stream are applied before commands.
/// When the stream ends the session keeps serving commands until it is
/// detached.
pub fn attach<S>(session: Session, events: S) -> SessionHandle
where
    S: Stream<Item = MapEvent> + Send + Unpin + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Command>(32);
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let mut session = session;
    let mut events = events.fuse();

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                Some(event) = events.next() => {
                    let outcome = dispatch(&mut session, event);
                    log::trace!("{:?} -> {:?}", event, outcome);
                }
                command = rx.recv() => match command {
                    Some(command) => handle_command(&mut session, command),
                    None => break,
                },
            }
        }
        session
    });

    SessionHandle {
        commands: tx,
        cancel,
        task,
    }
}

/// Handle to a session that was attached to a map surface.
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    cancel: CancellationToken,
    task: JoinHandle<Session>,
}

impl SessionHandle {
    async fn ask<R>(
        &self,
        command: impl FnOnce(oneshot::Sender<R>) -> Command,
    ) -> Result<R, AdapterError> {
        let (responder, response) = oneshot::channel();
        self.commands.send(command(responder)).await?;
        Ok(response.await?)
    }

    pub async fn set_mode(&self, mode: MeasurementMode) -> Result<(), AdapterError> {
        self.ask(|responder| Command::SetMode { mode, responder }).await
    }

    pub async fn finish_area(&self) -> Result<Outcome, AdapterError> {
        self.ask(|responder| Command::FinishArea { responder }).await
    }

    pub async fn delete_measurement(
        &self,
        id: Id<FinalizedMeasurement>,
    ) -> Result<bool, AdapterError> {
        self.ask(|responder| Command::Delete { id, responder }).await
    }

    pub async fn clear_all(&self) -> Result<(), AdapterError> {
        self.ask(|responder| Command::ClearAll { responder }).await
    }

    pub async fn snapshot(&self) -> Result<Snapshot, AdapterError> {
        self.ask(|responder| Command::Snapshot { responder }).await
    }

    pub async fn running_value(&self) -> Result<Option<FormattedValue>, AdapterError> {
        self.ask(|responder| Command::RunningValue { responder }).await
    }

    /// Stops listening to map events and returns the session. Events that
    /// were not applied yet are dropped.
    pub async fn detach(self) -> Result<Session, AdapterError> {
        self.cancel.cancel();
        Ok(self.task.await?)
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use model::measurement::MeasurementKind;
    use serde_json::json;
    use tokio_stream::wrappers::ReceiverStream;

    use super::*;

    fn click(lat: f64, lng: f64) -> MapEvent {
        MapEvent::Click {
            latlng: LatLng::new(lat, lng),
        }
    }

    fn double_click() -> MapEvent {
        MapEvent::DoubleClick {
            latlng: LatLng::new(0.0, 0.0),
        }
    }

    #[test]
    fn parses_map_payloads() {
        let event: MapEvent = serde_json::from_value(json!({
            "type": "click",
            "latlng": {"lat": 54.32, "lng": 10.12}
        }))
        .unwrap();
        assert_eq!(event, click(54.32, 10.12));

        let event: MapEvent = serde_json::from_value(json!({
            "type": "dblclick",
            "latlng": {"lat": 0.0, "lng": 0.0}
        }))
        .unwrap();
        assert_eq!(event, double_click());
    }

    #[test]
    fn clicks_are_ignored_while_idle() {
        let mut session = Session::new();
        assert_eq!(dispatch(&mut session, click(1.0, 1.0)), Outcome::Ignored);
        assert_eq!(dispatch(&mut session, double_click()), Outcome::Ignored);
        assert!(session.current_points().is_empty());
    }

    #[test]
    fn double_click_only_finishes_areas() {
        let mut session = Session::new();
        session.set_mode(MeasurementMode::Distance);
        dispatch(&mut session, click(1.0, 1.0));
        assert_eq!(dispatch(&mut session, double_click()), Outcome::Ignored);
        assert_eq!(session.current_points().len(), 1);

        session.set_mode(MeasurementMode::Area);
        for (lat, lng) in [(0.0, 0.0), (0.0, 0.001), (0.001, 0.001)] {
            assert_eq!(dispatch(&mut session, click(lat, lng)), Outcome::Accepted);
        }
        let measurement = dispatch(&mut session, double_click()).finalized().unwrap();
        assert_eq!(measurement.kind, MeasurementKind::Area);
    }

    #[tokio::test]
    async fn attached_session_applies_events_in_order() {
        let (tx, rx) = mpsc::channel(16);
        let handle = attach(Session::new(), ReceiverStream::new(rx));

        handle.set_mode(MeasurementMode::Area).await.unwrap();
        for (lat, lng) in [(0.0, 0.0), (0.0, 0.001), (0.001, 0.001)] {
            tx.send(click(lat, lng)).await.unwrap();
        }
        let running = handle.running_value().await.unwrap();
        assert!(running.is_some());

        tx.send(double_click()).await.unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.mode, MeasurementMode::Area);
        assert!(snapshot.points.is_empty());
        assert_eq!(snapshot.measurements.len(), 1);
        assert_eq!(snapshot.measurements[0].label, running.unwrap().to_string());

        let session = handle.detach().await.unwrap();
        assert_eq!(session.measurements(), snapshot.measurements.as_slice());
    }

    #[tokio::test]
    async fn commands_reach_the_attached_session() {
        let events = stream::iter(vec![click(0.0, 0.0), click(0.0, 0.001)]);
        let handle = attach(Session::new(), events);

        // the clicks arrive while idle
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.measurements.is_empty());

        handle.set_mode(MeasurementMode::Area).await.unwrap();
        assert_eq!(handle.finish_area().await.unwrap(), Outcome::Ignored);
        assert!(!handle
            .delete_measurement(Id::new("measurement-0".to_owned()))
            .await
            .unwrap());
        handle.clear_all().await.unwrap();
        assert_eq!(
            handle.snapshot().await.unwrap().mode,
            MeasurementMode::None
        );
        handle.detach().await.unwrap();
    }

    #[tokio::test]
    async fn detached_session_gets_no_more_events() {
        let (tx, rx) = mpsc::channel(16);
        let mut session = Session::new();
        session.set_mode(MeasurementMode::Distance);
        let handle = attach(session, ReceiverStream::new(rx));

        tx.send(click(0.0, 0.0)).await.unwrap();
        assert_eq!(handle.snapshot().await.unwrap().points.len(), 1);

        let session = handle.detach().await.unwrap();
        // the stream was dropped together with the task
        assert!(tx.send(click(0.0, 0.001)).await.is_err());
        assert_eq!(session.current_points().len(), 1);
        assert!(session.measurements().is_empty());
    }
}
