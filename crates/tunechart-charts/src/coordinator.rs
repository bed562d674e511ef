//! Update coordinator: owns the dataset, the active selection and the
//! registered renderers, and redraws every renderer when the selection
//! changes.

use crate::dataset::Dataset;
use crate::filter::filter_records;
use crate::traits::ChartRenderer;
use tracing::{info, instrument, warn};
use tunechart_common::{FilterCriteria, Record, TunechartError};

/// A renderer that returned an error during an update.
#[derive(Debug)]
pub struct RendererFailure {
    /// Renderer name.
    pub renderer: String,
    /// The error it returned.
    pub error: TunechartError,
}

/// Outcome of one update pass.
#[derive(Debug)]
pub struct UpdateReport {
    /// Selection the pass rendered.
    pub criteria: FilterCriteria,
    /// Records that passed the filter.
    pub records: usize,
    /// Renderers that completed, in invocation order.
    pub rendered: Vec<String>,
    /// Renderers that failed, in invocation order.
    pub failures: Vec<RendererFailure>,
}

impl UpdateReport {
    /// Whether every renderer completed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether renderers were invoked and none of them completed.
    pub fn all_failed(&self) -> bool {
        self.rendered.is_empty() && !self.failures.is_empty()
    }

    /// Number of renderers invoked.
    pub fn attempted(&self) -> usize {
        self.rendered.len() + self.failures.len()
    }
}

/// Pushes the filtered record set to every registered renderer.
///
/// A coordinator only exists once a dataset has been loaded, so renderers
/// are never invoked without data.
pub struct UpdateCoordinator {
    dataset: Dataset,
    criteria: FilterCriteria,
    filtered: Vec<Record>,
    renderers: Vec<Box<dyn ChartRenderer>>,
}

impl UpdateCoordinator {
    /// Creates a coordinator with no constraint selected.
    pub fn new(dataset: Dataset) -> Self {
        let filtered = dataset.records().to_vec();
        Self {
            dataset,
            criteria: FilterCriteria::all(),
            filtered,
            renderers: Vec::new(),
        }
    }

    /// Appends a renderer. Registering the same renderer twice draws it twice.
    pub fn register(&mut self, renderer: impl ChartRenderer + 'static) {
        self.renderers.push(Box::new(renderer));
    }

    /// Names of the registered renderers, in registration order.
    pub fn renderer_names(&self) -> Vec<&str> {
        self.renderers.iter().map(|renderer| renderer.name()).collect()
    }

    /// The loaded dataset.
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Active selection.
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Records matching the active selection.
    pub fn filtered(&self) -> &[Record] {
        &self.filtered
    }

    /// Applies a new selection and redraws every renderer.
    #[instrument(skip_all, fields(criteria = %criteria))]
    pub fn on_filter_change(&mut self, criteria: FilterCriteria) -> UpdateReport {
        self.filtered = filter_records(self.dataset.records(), &criteria);
        self.criteria = criteria;
        self.notify()
    }

    /// Redraws every renderer with the active selection.
    pub fn refresh(&mut self) -> UpdateReport {
        let criteria = self.criteria.clone();
        self.on_filter_change(criteria)
    }

    fn notify(&self) -> UpdateReport {
        let mut report = UpdateReport {
            criteria: self.criteria.clone(),
            records: self.filtered.len(),
            rendered: Vec::with_capacity(self.renderers.len()),
            failures: Vec::new(),
        };

        for renderer in &self.renderers {
            match renderer.render(&self.filtered, &self.criteria) {
                Ok(()) => report.rendered.push(renderer.name().to_string()),
                Err(error) => {
                    warn!(renderer = renderer.name(), error = %error, "Renderer failed");
                    report.failures.push(RendererFailure {
                        renderer: renderer.name().to_string(),
                        error,
                    });
                }
            }
        }

        info!(
            records = report.records,
            rendered = report.rendered.len(),
            failed = report.failures.len(),
            "Update complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tunechart_common::test_utils::{init_test_logging, record_fixtures::sample_records};
    use tunechart_common::Result;

    type CallLog = Arc<Mutex<Vec<(String, usize, FilterCriteria)>>>;

    struct Recording {
        name: &'static str,
        log: CallLog,
    }

    impl ChartRenderer for Recording {
        fn name(&self) -> &str {
            self.name
        }

        fn render(&self, records: &[Record], criteria: &FilterCriteria) -> Result<()> {
            assert!(records.iter().all(|r| criteria.matches(r)));
            self.log
                .lock()
                .unwrap()
                .push((self.name.to_string(), records.len(), criteria.clone()));
            Ok(())
        }
    }

    struct Failing;

    impl ChartRenderer for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn render(&self, _records: &[Record], _criteria: &FilterCriteria) -> Result<()> {
            Err(TunechartError::chart("boom"))
        }
    }

    fn coordinator() -> UpdateCoordinator {
        UpdateCoordinator::new(Dataset::from_records(sample_records()))
    }

    #[test]
    fn test_new_coordinator_is_unconstrained() {
        let coordinator = coordinator();
        assert!(coordinator.criteria().is_unconstrained());
        assert_eq!(coordinator.filtered().len(), 5);
        assert!(coordinator.renderer_names().is_empty());
    }

    #[test]
    fn test_renderers_called_in_registration_order_with_same_set() {
        init_test_logging();
        let log = CallLog::default();
        let mut coordinator = coordinator();
        coordinator.register(Recording { name: "first", log: Arc::clone(&log) });
        coordinator.register(Recording { name: "second", log: Arc::clone(&log) });
        coordinator.register(Recording { name: "first", log: Arc::clone(&log) });

        let criteria = FilterCriteria::all().with_year(2023);
        let report = coordinator.on_filter_change(criteria.clone());

        assert!(report.is_success());
        assert_eq!(report.records, 4);
        assert_eq!(report.rendered, vec!["first", "second", "first"]);

        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(_, count, c)| *count == 4 && *c == criteria));
        assert_eq!(coordinator.criteria(), &criteria);
    }

    #[test]
    fn test_failure_is_contained() {
        let log = CallLog::default();
        let mut coordinator = coordinator();
        coordinator.register(Failing);
        coordinator.register(Recording { name: "after", log: Arc::clone(&log) });

        let report = coordinator.on_filter_change(FilterCriteria::all().with_country("Germany"));

        assert!(!report.is_success());
        assert!(!report.all_failed());
        assert_eq!(report.attempted(), 2);
        assert_eq!(report.failures[0].renderer, "failing");
        assert_eq!(report.rendered, vec!["after"]);
        assert_eq!(log.lock().unwrap()[0].1, 2);
    }

    #[test]
    fn test_all_failed() {
        let mut coordinator = coordinator();
        coordinator.register(Failing);
        assert!(coordinator.refresh().all_failed());
    }

    #[test]
    fn test_refresh_reuses_criteria() {
        let log = CallLog::default();
        let mut coordinator = coordinator();
        coordinator.register(Recording { name: "chart", log: Arc::clone(&log) });

        let criteria = FilterCriteria::all().with_country("United States");
        coordinator.on_filter_change(criteria.clone());
        let report = coordinator.refresh();

        assert_eq!(report.criteria, criteria);
        assert_eq!(report.records, 2);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_no_match_still_notifies() {
        let log = CallLog::default();
        let mut coordinator = coordinator();
        coordinator.register(Recording { name: "chart", log: Arc::clone(&log) });

        let report = coordinator.on_filter_change(FilterCriteria::all().with_year(1999));
        assert_eq!(report.records, 0);
        assert_eq!(log.lock().unwrap()[0].1, 0);
    }

    #[test]
    fn test_dataset_is_not_mutated() {
        let mut coordinator = coordinator();
        coordinator.on_filter_change(FilterCriteria::all().with_year(2022));
        assert_eq!(coordinator.dataset().records(), sample_records().as_slice());
    }
}
