// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Reporting of draw-time findings.
//!
//! Validation at a draw never fails with an error value. Every finding becomes a [`Diagnostic`],
//! identified by the VUID of the rule it violates, and is handed to a [`DiagnosticSink`]. Whether
//! anything was reported is returned to the caller as a `bool`.
//!
//! Two sinks are provided: [`LogSink`] forwards to the `log` facade, and [`DiagnosticCollector`]
//! keeps everything in memory so that it can be inspected afterwards.

use crate::validation::VUIDType;
use foldhash::HashSet;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::{
    borrow::Cow,
    fmt::{Display, Error as FmtError, Formatter},
};

/// How serious a finding is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// A validity rule was violated. The draw has undefined behavior.
    Error,

    /// Something is probably a mistake, but the draw is valid.
    Warning,
}

/// Identifies a Vulkan object that a diagnostic refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    pub object_type: ash::vk::ObjectType,
    pub handle: u64,
}

impl ObjectHandle {
    #[inline]
    pub const fn new(object_type: ash::vk::ObjectType, handle: u64) -> Self {
        Self {
            object_type,
            handle,
        }
    }
}

/// A single finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The VUID of the rule that produced the finding.
    pub rule_id: &'static str,

    pub severity: Severity,

    /// The objects involved, such as the bound pipeline or shader objects.
    pub objects: SmallVec<[ObjectHandle; 2]>,

    /// A human-readable description, prefixed with the command that was being validated.
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "[{}] {}", self.rule_id, self.message)
    }
}

/// Receives diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// A sink that forwards diagnostics to the `log` facade, under the `vulkano_dyncheck` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => log::error!(target: "vulkano_dyncheck", "{}", diagnostic),
            Severity::Warning => log::warn!(target: "vulkano_dyncheck", "{}", diagnostic),
        }
    }
}

/// A sink that stores diagnostics in memory.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything that was collected so far.
    #[inline]
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock())
    }

    /// Returns a copy of everything that was collected so far.
    #[inline]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    /// Returns the rule ids of everything that was collected so far, in order.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.diagnostics
            .lock()
            .iter()
            .map(|diagnostic| diagnostic.rule_id)
            .collect()
    }

    /// Returns whether a diagnostic with `rule_id` was collected.
    pub fn contains(&self, rule_id: &str) -> bool {
        self.diagnostics
            .lock()
            .iter()
            .any(|diagnostic| diagnostic.rule_id == rule_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.diagnostics.lock().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.lock().is_empty()
    }

    #[inline]
    pub fn clear(&self) {
        self.diagnostics.lock().clear();
    }
}

impl DiagnosticSink for DiagnosticCollector {
    #[inline]
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }
}

/// Settings that control which diagnostics are reported.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidationSettings {
    /// Rule ids that are never reported.
    ///
    /// The default value is empty.
    pub suppressed_rules: HashSet<String>,

    /// Whether to warn when a state was set since the last bind, but the bound pipeline does not
    /// have it as dynamic state.
    ///
    /// The default value is `true`.
    pub report_stale_state: bool,

    /// Whether errors returned by recording commands are also reported to the sink, with the
    /// first VUID of the error as rule id.
    ///
    /// The default value is `false`.
    pub report_recording_errors_as_diagnostics: bool,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: crate::NonExhaustive,
}

impl ValidationSettings {
    /// Returns the default settings.
    #[inline]
    pub fn new() -> Self {
        Self {
            suppressed_rules: HashSet::default(),
            report_stale_state: true,
            report_recording_errors_as_diagnostics: false,
            _ne: crate::NonExhaustive(()),
        }
    }

    /// Returns whether `rule_id` is suppressed.
    #[inline]
    pub fn is_suppressed(&self, rule_id: &str) -> bool {
        self.suppressed_rules.contains(rule_id)
    }
}

impl Default for ValidationSettings {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// The command that is being validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// The kind of command. This selects the `VUID-vkCmd*-` prefix of rule ids.
    pub vuid_type: VUIDType,

    /// An optional description of the arguments, appended to the command name in messages.
    pub argument: Option<Cow<'static, str>>,
}

impl Location {
    #[inline]
    pub const fn new(vuid_type: VUIDType) -> Self {
        Self {
            vuid_type,
            argument: None,
        }
    }

    /// Adds a description of the arguments.
    #[inline]
    pub fn with_argument(mut self, argument: impl Into<Cow<'static, str>>) -> Self {
        self.argument = Some(argument.into());
        self
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match &self.argument {
            Some(argument) => write!(f, "{}({})", self.vuid_type.command_name(), argument),
            None => write!(f, "{}()", self.vuid_type.command_name()),
        }
    }
}

impl From<VUIDType> for Location {
    #[inline]
    fn from(vuid_type: VUIDType) -> Self {
        Self::new(vuid_type)
    }
}

/// Filters findings through the settings and forwards them to the sink.
pub(crate) struct Emitter<'a> {
    settings: &'a ValidationSettings,
    sink: &'a dyn DiagnosticSink,
    location: &'a Location,
    violations: u32,
    warnings: u32,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(
        settings: &'a ValidationSettings,
        sink: &'a dyn DiagnosticSink,
        location: &'a Location,
    ) -> Self {
        Self {
            settings,
            sink,
            location,
            violations: 0,
            warnings: 0,
        }
    }

    #[inline]
    pub(crate) fn vuid_type(&self) -> VUIDType {
        self.location.vuid_type
    }

    /// Reports a violation. Returns whether it was recorded, which is `false` only if the rule
    /// is suppressed.
    pub(crate) fn emit(
        &mut self,
        rule_id: &'static str,
        objects: impl IntoIterator<Item = ObjectHandle>,
        message: impl Display,
    ) -> bool {
        self.report(Severity::Error, rule_id, objects, message)
    }

    /// Reports a warning. Warnings never count as violations.
    pub(crate) fn warn(
        &mut self,
        rule_id: &'static str,
        objects: impl IntoIterator<Item = ObjectHandle>,
        message: impl Display,
    ) -> bool {
        self.report(Severity::Warning, rule_id, objects, message)
    }

    fn report(
        &mut self,
        severity: Severity,
        rule_id: &'static str,
        objects: impl IntoIterator<Item = ObjectHandle>,
        message: impl Display,
    ) -> bool {
        if self.settings.is_suppressed(rule_id) {
            log::trace!(target: "vulkano_dyncheck", "suppressed {}", rule_id);
            return false;
        }

        match severity {
            Severity::Error => self.violations += 1,
            Severity::Warning => self.warnings += 1,
        }

        self.sink.report(Diagnostic {
            rule_id,
            severity,
            objects: objects.into_iter().collect(),
            message: format!("{}: {}", self.location, message),
        });

        true
    }

    /// Returns the number of violations recorded so far.
    #[inline]
    pub(crate) fn violations(&self) -> u32 {
        self.violations
    }

    /// Returns the number of warnings recorded so far.
    #[inline]
    pub(crate) fn warnings(&self) -> u32 {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppressed_rules_are_dropped() {
        let collector = DiagnosticCollector::new();
        let mut settings = ValidationSettings::new();
        settings
            .suppressed_rules
            .insert("VUID-vkCmdDraw-None-07840".to_owned());
        let location = Location::new(VUIDType::Draw);

        let mut emitter = Emitter::new(&settings, &collector, &location);
        assert!(!emitter.emit("VUID-vkCmdDraw-None-07840", [], "suppressed"));
        assert!(emitter.emit("VUID-vkCmdDraw-None-07841", [], "reported"));
        assert!(emitter.warn("VUID-vkCmdDraw-None-08608", [], "stale"));

        assert_eq!(emitter.violations(), 1);
        assert_eq!(emitter.warnings(), 1);
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDraw-None-07841", "VUID-vkCmdDraw-None-08608"],
        );
    }

    #[test]
    fn message_is_prefixed_with_command() {
        let collector = DiagnosticCollector::new();
        let settings = ValidationSettings::new();
        let location = Location::new(VUIDType::DrawIndexed).with_argument("index_count: 3");

        let mut emitter = Emitter::new(&settings, &collector, &location);
        emitter.emit("VUID-vkCmdDrawIndexed-None-07840", [], "something is wrong");

        let diagnostics = collector.take();
        assert_eq!(
            diagnostics[0].message,
            "vkCmdDrawIndexed(index_count: 3): something is wrong",
        );
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert!(collector.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn settings_from_json() {
        let settings: ValidationSettings = serde_json::from_str(
            r#"{ "suppressed_rules": ["VUID-vkCmdDraw-None-08608"], "report_stale_state": false }"#,
        )
        .unwrap();

        assert!(settings.is_suppressed("VUID-vkCmdDraw-None-08608"));
        assert!(!settings.report_stale_state);
        assert!(!settings.report_recording_errors_as_diagnostics);
    }
}
