//! Record store: raw records partitioned by unit, plus their power records.
//!
//! Power partitions are a pure function of the raw partitions and are only
//! refreshed by [`RecordStore::derive_power`]. The pipeline builds a fresh
//! store per run with [`RecordStore::build`], so nothing carries over between
//! runs. The store is not synchronized; use it from one thread at a time.

use std::fmt;

use tracing::{debug, warn};

use crate::error::PowerError;
use crate::record::{PowerRecord, RawRecord, Unit};

/// One of the four named collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    DistanceRaw,
    DurationRaw,
    DistancePower,
    DurationPower,
}

impl Partition {
    pub const ALL: [Partition; 4] = [
        Partition::DistanceRaw,
        Partition::DurationRaw,
        Partition::DistancePower,
        Partition::DurationPower,
    ];

    /// Output file the partition is written to.
    pub fn file_name(self) -> &'static str {
        match self {
            Partition::DistanceRaw => "distanceList.txt",
            Partition::DurationRaw => "durationList.txt",
            Partition::DistancePower => "distancePowerList.txt",
            Partition::DurationPower => "durationPowerList.txt",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Partition::DistanceRaw | Partition::DistancePower => Unit::Distance,
            Partition::DurationRaw | Partition::DurationPower => Unit::Duration,
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Partition::DistanceRaw => "distance",
            Partition::DurationRaw => "duration",
            Partition::DistancePower => "distance-power",
            Partition::DurationPower => "duration-power",
        };
        f.write_str(name)
    }
}

/// A raw record whose power could not be derived.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub record: RawRecord,
    pub error: PowerError,
}

#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    distance: Vec<RawRecord>,
    duration: Vec<RawRecord>,
    distance_power: Vec<PowerRecord>,
    duration_power: Vec<PowerRecord>,
    skipped: Vec<SkippedRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store for one run: ingest `records` and derive power.
    pub fn build(records: impl IntoIterator<Item = RawRecord>) -> Self {
        let mut store = Self::new();
        store.ingest(records);
        store.derive_power();
        store
    }

    /// Drop every partition.
    pub fn reset(&mut self) {
        self.distance.clear();
        self.duration.clear();
        self.distance_power.clear();
        self.duration_power.clear();
        self.skipped.clear();
    }

    /// Append records to the raw partition matching each record's unit,
    /// keeping input order. Power partitions go stale until
    /// [`RecordStore::derive_power`] runs.
    pub fn ingest(&mut self, records: impl IntoIterator<Item = RawRecord>) {
        for record in records {
            match record.unit() {
                Unit::Distance => self.distance.push(record),
                Unit::Duration => self.duration.push(record),
            }
        }
    }

    /// Recompute both power partitions from scratch.
    ///
    /// A record whose power cannot be derived is left out of its power
    /// partition and reported via [`RecordStore::skipped`].
    pub fn derive_power(&mut self) -> &[SkippedRecord] {
        self.skipped.clear();
        self.distance_power = derive_all(&self.distance, &mut self.skipped);
        self.duration_power = derive_all(&self.duration, &mut self.skipped);
        debug!(
            distance = self.distance_power.len(),
            duration = self.duration_power.len(),
            skipped = self.skipped.len(),
            "derived power partitions"
        );
        &self.skipped
    }

    pub fn raw(&self, unit: Unit) -> &[RawRecord] {
        match unit {
            Unit::Distance => &self.distance,
            Unit::Duration => &self.duration,
        }
    }

    pub fn power(&self, unit: Unit) -> &[PowerRecord] {
        match unit {
            Unit::Distance => &self.distance_power,
            Unit::Duration => &self.duration_power,
        }
    }

    /// Records left out by the last derivation.
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    pub fn len(&self, partition: Partition) -> usize {
        match partition {
            Partition::DistanceRaw | Partition::DurationRaw => self.raw(partition.unit()).len(),
            Partition::DistancePower | Partition::DurationPower => {
                self.power(partition.unit()).len()
            }
        }
    }

    /// One output line per record, in partition order.
    pub fn serialize(&self, partition: Partition) -> Vec<String> {
        match partition {
            Partition::DistanceRaw | Partition::DurationRaw => self
                .raw(partition.unit())
                .iter()
                .map(ToString::to_string)
                .collect(),
            Partition::DistancePower | Partition::DurationPower => self
                .power(partition.unit())
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

fn derive_all(raw: &[RawRecord], skipped: &mut Vec<SkippedRecord>) -> Vec<PowerRecord> {
    raw.iter()
        .filter_map(|record| match PowerRecord::derive(record) {
            Ok(power) => Some(power),
            Err(error) => {
                warn!(record = %record, error = %error, "skipping power derivation");
                skipped.push(SkippedRecord {
                    record: record.clone(),
                    error,
                });
                None
            }
        })
        .collect()
}
