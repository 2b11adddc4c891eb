//! Configurable construction and classification of report entries.
//!
//! Every finding kind has a base `{category, classification, template}` triple
//! read from `report.<kind>.*`. Value set findings additionally walk the
//! `report.<kind>.overrides` tree along binding strength, extensibility and
//! stability, in that order.


use super::kind::{DetectionKind, SeverityAxes};
use super::template::EntryTemplate;
use crate::core::DetectionConfig;
use crate::error::Result;
use crate::types::{Entry, Location, Trace, ValueSet, ValueSetDetails, ValueSetSpec};

/// A report entry together with the kind of finding that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub kind: DetectionKind,
    pub entry: Entry,
}

impl Detection {
    pub fn new(kind: DetectionKind, entry: Entry) -> Self {
        Self { kind, entry }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigurableDetections {
    config: DetectionConfig,
    bases: Vec<EntryTemplate>,
    alert: String,
    warning: String,
}

impl ConfigurableDetections {
    /// Fails when a mandatory key is absent for any finding kind.
    pub fn new(config: DetectionConfig) -> Result<Self> {
        let bases = DetectionKind::ALL
            .iter()
            .map(|kind| -> Result<EntryTemplate> {
                let prefix = format!("report.{}", kind.key());
                Ok(EntryTemplate::new(
                    config.require(&format!("{prefix}.category"))?,
                    config.require(&format!("{prefix}.classification"))?,
                    config.require(&format!("{prefix}.template"))?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let alert = config.require("report.classification.alert")?.to_string();
        let warning = config.require("report.classification.warning")?.to_string();

        Ok(Self {
            config,
            bases,
            alert,
            warning,
        })
    }

    pub fn reference() -> Result<Self> {
        Self::new(DetectionConfig::reference()?)
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn alert_classification(&self) -> &str {
        &self.alert
    }

    pub fn warning_classification(&self) -> &str {
        &self.warning
    }

    pub fn base(&self, kind: DetectionKind) -> &EntryTemplate {
        &self.bases[kind as usize]
    }

    /// Resolves the effective template of `kind` for the given axes.
    ///
    /// At each step an optional `default` node applies first, then the walk
    /// descends into the step's node and applies it. The walk stops at the
    /// first step without a node and keeps what was resolved so far.
    pub fn resolve(&self, kind: DetectionKind, axes: &SeverityAxes) -> EntryTemplate {
        let mut cursor = self.base(kind).clone();
        if !kind.is_cascading() {
            return cursor;
        }

        let mut path = format!("report.{}.overrides", kind.key());
        if !self.config.has_path(&path) {
            return cursor;
        }

        for step in axes.steps() {
            let default = format!("{path}.default");
            if self.config.has_path(&default) {
                cursor = self.override_with(cursor, &default);
            }

            let next = format!("{path}.{step}");
            if !self.config.has_path(&next) {
                #[cfg(feature = "tracing")]
                tracing::trace!(kind = %kind, path = %path, step, "override walk stopped");
                return cursor;
            }
            path = next;
            cursor = self.override_with(cursor, &path);
        }

        cursor
    }

    fn override_with(&self, current: EntryTemplate, path: &str) -> EntryTemplate {
        let pick = |field: &str, fallback: String| {
            self.config
                .get(&format!("{path}.{field}"))
                .map_or(fallback, str::to_string)
        };
        EntryTemplate {
            category: pick("category", current.category),
            classification: pick("classification", current.classification),
            template: pick("template", current.template),
        }
    }

    /// Copy of `entry` classified at the alert level. Idempotent.
    pub fn to_alert(&self, entry: &Entry) -> Entry {
        entry.reclassified(&self.alert)
    }

    pub fn to_warning(&self, entry: &Entry) -> Entry {
        entry.reclassified(&self.warning)
    }

    pub fn alert(&self, detection: &Detection) -> Detection {
        Detection::new(detection.kind, self.to_alert(&detection.entry))
    }

    fn detect(
        &self,
        kind: DetectionKind,
        template: &EntryTemplate,
        location: &Location,
        args: &[(&str, &str)],
        details: Option<ValueSetDetails>,
    ) -> Detection {
        #[cfg(feature = "performance-metrics")]
        metrics::counter!("hl7v2_vs_detections_total", "kind" => kind.key()).increment(1);

        let mut entry = Entry::new(
            location,
            template.render(args),
            template.category.clone(),
            template.classification.clone(),
        );
        if let Some(details) = details {
            entry = entry.with_value_set_details(details);
        }
        Detection::new(kind, entry)
    }

    fn axes(vs: Option<&ValueSet>, spec: Option<&ValueSetSpec>) -> SeverityAxes {
        SeverityAxes::new(
            spec.and_then(|s| s.binding_strength),
            vs.and_then(|v| v.extensibility),
            vs.and_then(|v| v.stability),
        )
    }

    pub fn code_not_found_simple(
        &self,
        location: &Location,
        value: &str,
        vs: &ValueSet,
        spec: Option<&ValueSetSpec>,
    ) -> Detection {
        let kind = DetectionKind::CodeNotFoundSimple;
        let template = self.resolve(kind, &Self::axes(Some(vs), spec));
        self.detect(
            kind,
            &template,
            location,
            &[("value", value), ("location", location.pretty().as_str()), ("vs", vs.id.as_str())],
            Some(ValueSetDetails::from_parts(Some(vs), spec)),
        )
    }

    /// Multi-binding miss; `tried` names every candidate set joined by " or ".
    pub fn code_not_found(
        &self,
        location: &Location,
        value: &str,
        tried: &str,
        spec: Option<&ValueSetSpec>,
    ) -> Detection {
        let kind = DetectionKind::CodeNotFound;
        let template = self.resolve(kind, &Self::axes(None, spec));
        self.detect(
            kind,
            &template,
            location,
            &[("value", value), ("location", location.pretty().as_str()), ("vs", tried)],
            Some(ValueSetDetails {
                id: Some(tried.to_string()),
                ..ValueSetDetails::from_parts(None, spec)
            }),
        )
    }

    /// Required, permitted or excluded code match.
    pub fn code_found(
        &self,
        kind: DetectionKind,
        location: &Location,
        value: &str,
        vs: &ValueSet,
        spec: Option<&ValueSetSpec>,
    ) -> Detection {
        let template = self.resolve(kind, &Self::axes(Some(vs), spec));
        self.detect(
            kind,
            &template,
            location,
            &[("value", value), ("location", location.pretty().as_str()), ("vs", vs.id.as_str())],
            Some(ValueSetDetails::from_parts(Some(vs), spec)),
        )
    }

    pub fn vs_not_found(&self, location: &Location, value: &str, spec: &ValueSetSpec) -> Detection {
        let kind = DetectionKind::VsNotFound;
        self.detect(
            kind,
            self.base(kind),
            location,
            &[
                ("value", value),
                ("location", location.pretty().as_str()),
                ("vs", spec.value_set_id.as_str()),
            ],
            Some(ValueSetDetails::from_parts(None, Some(spec))),
        )
    }

    pub fn vs_not_found_binding(&self, location: &Location, spec: &ValueSetSpec) -> Detection {
        let kind = DetectionKind::VsNotFoundBinding;
        self.detect(
            kind,
            self.base(kind),
            location,
            &[("location", location.pretty().as_str()), ("vs", spec.value_set_id.as_str())],
            Some(ValueSetDetails::from_parts(None, Some(spec))),
        )
    }

    pub fn empty_vs(
        &self,
        location: &Location,
        vs: &ValueSet,
        spec: Option<&ValueSetSpec>,
    ) -> Detection {
        let kind = DetectionKind::EmptyVs;
        self.detect(
            kind,
            self.base(kind),
            location,
            &[("location", location.pretty().as_str()), ("vs", vs.id.as_str())],
            Some(ValueSetDetails::from_parts(Some(vs), spec)),
        )
    }

    pub fn vs_error(
        &self,
        location: &Location,
        message: &str,
        vs: Option<&ValueSet>,
        spec: Option<&ValueSetSpec>,
    ) -> Detection {
        let kind = DetectionKind::VsError;
        let details =
            (vs.is_some() || spec.is_some()).then(|| ValueSetDetails::from_parts(vs, spec));
        self.detect(
            kind,
            self.base(kind),
            location,
            &[("message", message), ("location", location.pretty().as_str())],
            details,
        )
    }

    pub fn binding_location(
        &self,
        location: &Location,
        message: &str,
        vs: Option<&ValueSet>,
        spec: Option<&ValueSetSpec>,
    ) -> Detection {
        let kind = DetectionKind::BindingLocation;
        let details =
            (vs.is_some() || spec.is_some()).then(|| ValueSetDetails::from_parts(vs, spec));
        self.detect(
            kind,
            self.base(kind),
            location,
            &[("message", message), ("location", location.pretty().as_str())],
            details,
        )
    }

    pub fn vs_no_validation(&self, location: &Location, spec: &ValueSetSpec) -> Detection {
        let kind = DetectionKind::VsNoValidation;
        self.detect(
            kind,
            self.base(kind),
            location,
            &[("location", location.pretty().as_str()), ("vs", spec.value_set_id.as_str())],
            Some(ValueSetDetails::from_parts(None, Some(spec))),
        )
    }

    pub fn coded_element(
        &self,
        location: &Location,
        message: &str,
        vs: Option<&ValueSet>,
        spec: Option<&ValueSetSpec>,
    ) -> Detection {
        let kind = DetectionKind::CodedElement;
        let details =
            (vs.is_some() || spec.is_some()).then(|| ValueSetDetails::from_parts(vs, spec));
        self.detect(
            kind,
            self.base(kind),
            location,
            &[("message", message), ("location", location.pretty().as_str())],
            details,
        )
    }

    /// Both sides of an exclusive-or binding are valued from the bound sets.
    pub fn coded_element_xor(
        &self,
        location: &Location,
        message: &str,
        vs: Option<&ValueSet>,
        spec: &ValueSetSpec,
        stack_trace: Vec<Trace>,
    ) -> Detection {
        let kind = DetectionKind::CodedElementXor;
        let template = self.resolve(kind, &Self::axes(vs, Some(spec)));
        let mut detection = self.detect(
            kind,
            &template,
            location,
            &[("message", message), ("location", location.pretty().as_str())],
            Some(ValueSetDetails::from_parts(vs, Some(spec))),
        );
        if !stack_trace.is_empty() {
            detection.entry = detection.entry.with_stack_trace(stack_trace);
        }
        detection
    }

    pub fn invalid_code_system(
        &self,
        location: &Location,
        expected: &str,
        found: &str,
        vs: &ValueSet,
        spec: Option<&ValueSetSpec>,
    ) -> Detection {
        let kind = DetectionKind::InvalidCodeSystem;
        self.detect(
            kind,
            self.base(kind),
            location,
            &[
                ("expected", expected),
                ("found", found),
                ("location", location.pretty().as_str()),
                ("vs", vs.id.as_str()),
            ],
            Some(ValueSetDetails::from_parts(Some(vs), spec)),
        )
    }
}
