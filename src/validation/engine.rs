use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task;

use super::complex::ComplexElementValidator;
use super::result::CheckResult;
use super::simple::SimpleElementValidator;
use crate::core::ValidatorOptions;
use crate::error::{ConformanceError, Result};
use crate::report::ConfigurableDetections;
use crate::storage::ValueSetLibrary;
use crate::types::{Element, Entry, Extensibility, Usage, ValueSetSpec};
#[cfg(feature = "tracing")]
use crate::utils::{BatchStats, Timer};

/// Walks a message element tree and checks every value set binding.
#[derive(Clone)]
pub struct Validator {
    detections: Arc<ConfigurableDetections>,
    simple: SimpleElementValidator,
    complex: ComplexElementValidator,
    options: ValidatorOptions,
}

impl Validator {
    pub fn new(detections: Arc<ConfigurableDetections>) -> Self {
        Self::with_options(detections, ValidatorOptions::default())
    }

    pub fn with_options(
        detections: Arc<ConfigurableDetections>,
        options: ValidatorOptions,
    ) -> Self {
        let simple = SimpleElementValidator::new(Arc::clone(&detections));
        let complex = ComplexElementValidator::new(Arc::clone(&detections), simple.clone());
        Self {
            detections,
            simple,
            complex,
            options,
        }
    }

    /// Validator using the configuration shipped with the crate.
    pub fn with_reference_config() -> Result<Self> {
        Ok(Self::new(Arc::new(ConfigurableDetections::reference()?)))
    }

    pub fn detections(&self) -> &ConfigurableDetections {
        &self.detections
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Checks every bound element of the tree, in pre-order.
    pub fn check_message(&self, root: &Element, library: &dyn ValueSetLibrary) -> Vec<Entry> {
        let mut entries = Vec::new();
        self.walk(root, library, &mut entries);
        entries
    }

    fn walk(&self, element: &Element, library: &dyn ValueSetLibrary, entries: &mut Vec<Entry>) {
        let req = element.req();
        let spec = req.spec().filter(|s| !s.value_set_id.trim().is_empty());

        if let Some(spec) = spec {
            if req.usage != Usage::X {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    path = %element.location().path,
                    value_set = %spec.value_set_id,
                    "checking binding"
                );
                for result in self.check_element(element, spec, library) {
                    if let Some(entry) = self.adjust(req.usage, spec, library, result) {
                        entries.push(entry);
                    }
                }
            }
        }

        for child in element.children() {
            self.walk(child, library, entries);
        }
    }

    /// Raw results for one element against `spec`, without usage adjustment.
    pub fn check_element(
        &self,
        element: &Element,
        spec: &ValueSetSpec,
        library: &dyn ValueSetLibrary,
    ) -> Vec<CheckResult> {
        match element {
            Element::Simple(simple) => {
                let result = self.simple.check_element(simple, Some(spec), library);
                if result.has_detection() { vec![result] } else { Vec::new() }
            }
            Element::Complex(complex) => self.complex.check(complex, Some(spec), library),
        }
    }

    /// First non-passing entry for one element, if any.
    pub fn check_value_set(
        &self,
        element: &Element,
        spec: &ValueSetSpec,
        library: &dyn ValueSetLibrary,
    ) -> Option<Entry> {
        self.check_element(element, spec, library)
            .into_iter()
            .find(|r| !r.passed)
            .and_then(|r| r.detection)
            .map(|d| d.entry)
    }

    fn adjust(
        &self,
        usage: Usage,
        spec: &ValueSetSpec,
        library: &dyn ValueSetLibrary,
        result: CheckResult,
    ) -> Option<Entry> {
        let detection = result.detection?;
        if result.passed && !self.options.report_passing_codes {
            return None;
        }

        let entry = if detection.kind.is_code_not_found() && self.is_open(spec, library) {
            self.detections.to_alert(&detection.entry)
        } else {
            detection.entry
        };

        if usage == Usage::O {
            return Some(self.detections.to_alert(&entry));
        }
        Some(entry)
    }

    fn is_open(&self, spec: &ValueSetSpec, library: &dyn ValueSetLibrary) -> bool {
        library
            .get(&spec.value_set_id)
            .is_ok_and(|vs| vs.extensibility == Some(Extensibility::Open))
    }

    /// Validates independent messages concurrently; results keep input order.
    pub async fn validate_batch(
        &self,
        messages: Vec<Element>,
        library: Arc<dyn ValueSetLibrary>,
    ) -> Result<Vec<Vec<Entry>>> {
        if messages.is_empty() {
            return Ok(Vec::new());
        }

        #[cfg(feature = "tracing")]
        let timer = Timer::new();
        #[cfg(feature = "tracing")]
        let count = messages.len();
        let semaphore = Arc::new(Semaphore::new(
            self.options.performance_config.max_concurrent_validations.max(1),
        ));

        let tasks: Vec<_> = messages
            .into_iter()
            .map(|message| {
                let validator = self.clone();
                let library = Arc::clone(&library);
                let sem = Arc::clone(&semaphore);

                task::spawn(async move {
                    let _permit = sem.acquire_owned().await.map_err(|e| ConformanceError::Runtime {
                        message: format!("Failed to acquire semaphore: {e}"),
                    })?;

                    task::spawn_blocking(move || {
                        validator.check_message(&message, library.as_ref())
                    })
                    .await
                    .map_err(|e| ConformanceError::Runtime {
                        message: format!("Message validation task failed: {e}"),
                    })
                })
            })
            .collect();

        let results = try_join_all(tasks)
            .await
            .map_err(|e| ConformanceError::Runtime {
                message: format!("Batch validation task failed: {e}"),
            })?
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        #[cfg(feature = "tracing")]
        {
            let stats = BatchStats::new(count, results.iter().map(Vec::len).sum(), timer.elapsed());
            tracing::info!(
                messages = stats.messages,
                detections = stats.detections,
                elapsed_ms = timer.elapsed_ms() as u64,
                messages_per_second = stats.messages_per_second(),
                "batch validation completed"
            );
        }

        Ok(results)
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
