//! Aggregation model: fold scanned run logs into per-worker-count averages.

use crate::Result;
use crate::error::ScanError;
use crate::experiment::{Configuration, Experiment, MissingLogPolicy, RunIdentity, SequenceScope};
use crate::runlog::{LogScan, RecordParser, scan_log};

use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;

/// Running sums for one worker count of one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSlot {
    pub worker_count: u32,
    pub total_time_sum: f64,
    pub comm_event_count_sum: u64,
    pub comm_time_sum: f64,
    pub runs: RunCounts,
}

/// How the log files behind one slot turned out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub completed: usize,
    pub timed_out: usize,
    pub missing: usize,
}

impl RunCounts {
    pub fn scanned(&self) -> usize {
        self.completed + self.timed_out
    }
}

impl AggregateSlot {
    pub fn new(worker_count: u32) -> Self {
        Self {
            worker_count,
            total_time_sum: 0.0,
            comm_event_count_sum: 0,
            comm_time_sum: 0.0,
            runs: RunCounts::default(),
        }
    }

    /// Sequence number the next communication record of this series must carry.
    pub fn next_sequence(&self) -> u64 {
        self.comm_event_count_sum + 1
    }

    pub fn fold_scan(&mut self, scan: &LogScan) {
        for event in &scan.events {
            self.comm_time_sum += event.duration_seconds;
            self.comm_event_count_sum += 1;
        }
        match scan.completion {
            Some(record) => {
                self.total_time_sum += record.total_runtime_seconds;
                self.runs.completed += 1;
            }
            None => self.runs.timed_out += 1,
        }
    }

    pub fn record_missing(&mut self) {
        self.runs.missing += 1;
    }

    /// Divide the sums into averages.
    ///
    /// Total time is divided by the full case count, so missing and timed-out
    /// runs count as zero seconds. Event time is averaged per event and the
    /// event count per case; both stay zero when no event was seen.
    pub fn averages(&self, case_count: usize) -> SlotAverages {
        let cases = case_count as f64;
        let average_total_time = if case_count > 0 {
            self.total_time_sum / cases
        } else {
            0.0
        };

        let (average_comm_event_count, average_comm_event_time) = if self.comm_event_count_sum > 0
        {
            let events = self.comm_event_count_sum as f64;
            let per_case = if case_count > 0 { events / cases } else { 0.0 };
            (per_case, self.comm_time_sum / events)
        } else {
            (0.0, 0.0)
        };

        SlotAverages {
            average_total_time,
            average_comm_event_count,
            average_comm_event_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotAverages {
    pub average_total_time: f64,
    pub average_comm_event_count: f64,
    pub average_comm_event_time: f64,
}

/// One zero-initialized slot per worker count, owned by a single configuration run.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSlots {
    slots: Vec<AggregateSlot>,
}

impl AggregateSlots {
    pub fn new(worker_counts: &[u32]) -> Self {
        Self {
            slots: worker_counts.iter().map(|&w| AggregateSlot::new(w)).collect(),
        }
    }

    pub fn slots(&self) -> &[AggregateSlot] {
        &self.slots
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AggregateSlot> {
        self.slots.iter_mut()
    }

    pub fn finalize(
        self,
        configuration: &Configuration,
        case_count: usize,
    ) -> ConfigurationMetrics {
        let mut metrics = ConfigurationMetrics {
            name: configuration.name.clone(),
            label: configuration.label.clone(),
            directory: configuration.directory.clone(),
            worker_counts: Vec::with_capacity(self.slots.len()),
            average_total_time: Vec::with_capacity(self.slots.len()),
            average_comm_event_count: Vec::with_capacity(self.slots.len()),
            average_comm_event_time: Vec::with_capacity(self.slots.len()),
            runs: Vec::with_capacity(self.slots.len()),
        };

        for slot in &self.slots {
            let averages = slot.averages(case_count);
            metrics.worker_counts.push(slot.worker_count);
            metrics.average_total_time.push(averages.average_total_time);
            metrics
                .average_comm_event_count
                .push(averages.average_comm_event_count);
            metrics
                .average_comm_event_time
                .push(averages.average_comm_event_time);
            metrics.runs.push(slot.runs);
        }

        metrics
    }
}

/// Finalized, read-only averages of one configuration, indexed parallel to `worker_counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationMetrics {
    pub name: String,
    pub label: String,
    pub directory: PathBuf,
    pub worker_counts: Vec<u32>,
    pub average_total_time: Vec<f64>,
    pub average_comm_event_count: Vec<f64>,
    pub average_comm_event_time: Vec<f64>,
    pub runs: Vec<RunCounts>,
}

impl ConfigurationMetrics {
    /// True if at least one log at this worker index was scanned.
    pub fn has_data(&self, index: usize) -> bool {
        self.runs.get(index).is_some_and(|r| r.scanned() > 0)
    }
}

/// Drives the scanner over every (worker count, case) log of a configuration.
pub struct MetricAggregator<'e> {
    experiment: &'e Experiment,
    parser: RecordParser,
}

impl<'e> MetricAggregator<'e> {
    pub fn new(experiment: &'e Experiment) -> Result<Self> {
        Ok(Self {
            experiment,
            parser: RecordParser::new()?,
        })
    }

    /// Fold all logs of `configuration` into fresh slots, without finalizing.
    ///
    /// Worker counts are visited in the outer loop and cases in the inner loop,
    /// both in listed order. A malformed record aborts the pass. A missing log
    /// is skipped with a warning unless the experiment says to fail.
    pub fn collect(
        &self,
        configuration: &Configuration,
    ) -> std::result::Result<AggregateSlots, ScanError> {
        let experiment = self.experiment;
        let mut slots = AggregateSlots::new(&experiment.worker_counts);

        for slot in slots.iter_mut() {
            for case in &experiment.cases {
                let run =
                    RunIdentity::new(configuration.name.as_str(), slot.worker_count, case.as_str());
                let path = run.log_path(&configuration.directory);
                let expected = match experiment.sequence_scope {
                    SequenceScope::Series => slot.next_sequence(),
                    SequenceScope::Run => 1,
                };

                match scan_log(&self.parser, &path, expected) {
                    Ok(scan) => {
                        debug!(
                            "{}: {} communication events, completion {:?}",
                            scan.path.display(),
                            scan.events.len(),
                            scan.completion.map(|c| c.total_runtime_seconds)
                        );
                        if scan.timed_out() {
                            warn!(
                                "{}: {} timed out with {} workers",
                                configuration.directory.display(),
                                run.case,
                                run.worker_count
                            );
                        }
                        slot.fold_scan(&scan);
                    }
                    Err(e)
                        if e.is_missing_log()
                            && experiment.missing_logs == MissingLogPolicy::Skip =>
                    {
                        warn!(
                            "{}: no log for {} with {} workers ({} does not exist)",
                            configuration.directory.display(),
                            run.case,
                            run.worker_count,
                            path.display()
                        );
                        slot.record_missing();
                    }
                    Err(e) if experiment.sequence_scope == SequenceScope::Series => {
                        return Err(e.into_restart_hint());
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(slots)
    }

    /// Aggregate and finalize one configuration.
    pub fn aggregate(
        &self,
        configuration: &Configuration,
    ) -> std::result::Result<ConfigurationMetrics, ScanError> {
        let slots = self.collect(configuration)?;
        let metrics = slots.finalize(configuration, self.experiment.cases.len());

        info!("{} avg. runtime: {:?}", metrics.name, metrics.average_total_time);
        info!(
            "{} avg. communication sessions: {:?}",
            metrics.name, metrics.average_comm_event_count
        );
        info!(
            "{} avg. session time: {:?}",
            metrics.name, metrics.average_comm_event_time
        );

        Ok(metrics)
    }

    /// Aggregate every configuration of the experiment, each with its own slots.
    pub fn aggregate_all(&self) -> std::result::Result<Vec<ConfigurationMetrics>, ScanError> {
        self.experiment
            .configurations
            .iter()
            .map(|c| self.aggregate(c))
            .collect()
    }
}
