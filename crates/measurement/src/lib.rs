//! Interactive distance and area measuring on a map.
//!
//! A [`session::Session`] collects the points a user places, finishes
//! measurements and keeps the finished ones. [`adapter`] feeds it from map
//! events, [`bridge`] hands finished measurements to a
//! [`store::MeasurementStore`].

pub mod adapter;
pub mod bridge;
pub mod format;
pub mod session;
pub mod store;
