use measurement::adapter::{MapEvent, SessionHandle};
use model::measurement::{FinalizedMeasurement, MeasurementMode};
use serde::Deserialize;
use tokio::sync::mpsc;
use utility::id::Id;

/// A recorded measuring session.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Event(MapEvent),
    Mode { mode: MeasurementMode },
    Delete { delete: Id<FinalizedMeasurement> },
    Clear { clear: bool },
}

impl Script {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Feeds every step to an attached session, events through `events`
    /// and everything else as commands.
    pub async fn replay(
        &self,
        handle: &SessionHandle,
        events: &mpsc::Sender<MapEvent>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        for step in &self.steps {
            match step {
                Step::Event(event) => events.send(*event).await?,
                Step::Mode { mode } => handle.set_mode(*mode).await?,
                Step::Delete { delete } => {
                    if !handle.delete_measurement(delete.clone()).await? {
                        log::warn!("There is no measurement {} to delete.", delete);
                    }
                }
                Step::Clear { clear: true } => handle.clear_all().await?,
                Step::Clear { clear: false } => {}
            }
        }
        // queued events are applied before any command
        handle.snapshot().await?;
        Ok(())
    }
}
