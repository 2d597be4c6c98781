use chrono::Local;
use model::{
    measurement::{FinalizedMeasurement, MeasurementKind, MeasurementMode},
    point::{GeoPoint, LatLng},
};
use tokio::task::JoinHandle;
use utility::id::Id;

use crate::{
    bridge::PersistenceBridge,
    format::{format_measurement, measure, FormattedValue},
};

/// What an input did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The input was rejected and the session is unchanged.
    Ignored,
    /// The session changed but nothing was finished.
    Accepted,
    Finalized(FinalizedMeasurement),
}

impl Outcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }

    pub fn finalized(self) -> Option<FinalizedMeasurement> {
        match self {
            Self::Finalized(measurement) => Some(measurement),
            _ => None,
        }
    }
}

pub type SaveCallback = Box<dyn FnMut(&FinalizedMeasurement) + Send>;

/// One live measuring session, owned by a single map view.
///
/// Points are collected for the active mode. Distances finish on their second
/// point, areas when [`Session::finish_area`] is called with at least three
/// points. Switching modes drops unfinished points but never finished
/// measurements.
#[derive(Default)]
pub struct Session {
    mode: MeasurementMode,
    points: Vec<GeoPoint>,
    measurements: Vec<FinalizedMeasurement>,
    next_point_id: u64,
    last_measurement_stamp: i64,
    on_save: Option<SaveCallback>,
    bridge: Option<PersistenceBridge>,
    pending_saves: Vec<JoinHandle<()>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback that sees every finished measurement, before it is
    /// handed to the persistence bridge.
    pub fn on_save<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&FinalizedMeasurement) + Send + 'static,
    {
        self.on_save = Some(Box::new(callback));
        self
    }

    /// Saves every finished measurement through `bridge` in the background.
    pub fn with_bridge(mut self, bridge: PersistenceBridge) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn mode(&self) -> MeasurementMode {
        self.mode
    }

    pub fn current_points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn measurements(&self) -> &[FinalizedMeasurement] {
        &self.measurements
    }

    pub fn set_mode(&mut self, mode: MeasurementMode) {
        self.mode = mode;
        self.points.clear();
    }

    pub fn add_point(&mut self, position: LatLng) -> Outcome {
        let Some(kind) = self.mode.kind() else {
            return Outcome::Ignored;
        };

        let id = Id::new(format!("point-{}", self.next_point_id));
        self.next_point_id += 1;
        self.points.push(GeoPoint::new(id, position));

        if kind == MeasurementKind::Distance && self.points.len() == kind.min_points() {
            let points = std::mem::take(&mut self.points);
            return Outcome::Finalized(self.finalize(kind, points));
        }
        Outcome::Accepted
    }

    pub fn finish_area(&mut self) -> Outcome {
        if self.mode != MeasurementMode::Area
            || self.points.len() < MeasurementKind::Area.min_points()
        {
            return Outcome::Ignored;
        }
        let points = std::mem::take(&mut self.points);
        Outcome::Finalized(self.finalize(MeasurementKind::Area, points))
    }

    /// Ends measuring and forgets everything, finished measurements included.
    pub fn clear_all(&mut self) {
        self.mode = MeasurementMode::None;
        self.points.clear();
        self.measurements.clear();
    }

    /// Removes a finished measurement. Returns whether it existed.
    pub fn delete_measurement(&mut self, id: &Id<FinalizedMeasurement>) -> bool {
        let before = self.measurements.len();
        self.measurements.retain(|measurement| &measurement.id != id);
        self.measurements.len() != before
    }

    /// The value of the unfinished measurement, for live display.
    pub fn running_value(&self) -> Option<FormattedValue> {
        let kind = self.mode.kind()?;
        if self.points.len() < kind.min_points() {
            return None;
        }
        Some(format_measurement(measure(kind, &self.points), kind))
    }

    /// Number of background saves that have not completed yet.
    pub fn pending_saves(&mut self) -> usize {
        self.pending_saves.retain(|save| !save.is_finished());
        self.pending_saves.len()
    }

    /// Hands out the background saves so they can be awaited.
    pub fn take_pending_saves(&mut self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut self.pending_saves)
    }

    fn finalize(
        &mut self,
        kind: MeasurementKind,
        points: Vec<GeoPoint>,
    ) -> FinalizedMeasurement {
        let value = measure(kind, &points);
        let formatted = format_measurement(value, kind);
        let measurement = FinalizedMeasurement {
            id: self.next_measurement_id(),
            kind,
            points,
            value,
            label: formatted.to_string(),
            unit: formatted.unit,
        };
        log::debug!("finished {} measurement {}", kind, measurement.label);

        self.measurements.push(measurement.clone());
        if let Some(on_save) = self.on_save.as_mut() {
            on_save(&measurement);
        }
        if let Some(save) = self.bridge.as_ref().and_then(|bridge| bridge.save(&measurement))
        {
            self.pending_saves.retain(|save| !save.is_finished());
            self.pending_saves.push(save);
        }
        measurement
    }

    /// Millisecond stamp, bumped when two measurements finish within the same
    /// millisecond.
    fn next_measurement_id(&mut self) -> Id<FinalizedMeasurement> {
        let stamp = Local::now()
            .timestamp_millis()
            .max(self.last_measurement_stamp + 1);
        self.last_measurement_stamp = stamp;
        Id::new(format!("measurement-{}", stamp))
    }
}
