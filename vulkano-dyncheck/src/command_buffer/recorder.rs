// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use super::{state::DynamicStateTracker, RenderingInfo};
use crate::{
    device::DeviceCapabilities,
    diagnostic::{Diagnostic, DiagnosticSink, Location, Severity, ValidationSettings},
    pipeline::{
        graphics::GraphicsPipeline, ray_tracing::RayTracingPipeline, DynamicState,
        PipelineBindPoint,
    },
    query::QueryType,
    shader::ShaderObjectSet,
    validation::{self, ValidationOutcome},
    ValidationError,
};
use smallvec::SmallVec;
use std::{fmt::Debug, sync::Arc};

/// A recording session of one command buffer.
///
/// Commands are recorded by calling the `set_*`, `bind_*` and `begin_*`/`end_*` methods. Each
/// of them checks its own arguments and returns an error if they are invalid, in which case
/// nothing is recorded. The `_unchecked` variants record without checking.
///
/// Before a draw or trace command, call [`validate`](Self::validate) to check that the state the
/// bound pipeline or shader objects need has been set and is consistent.
pub struct CommandRecorder {
    pub(super) device: Arc<DeviceCapabilities>,
    pub(super) settings: ValidationSettings,
    pub(super) sink: Arc<dyn DiagnosticSink>,
    pub(super) tracker: DynamicStateTracker,

    pub(super) graphics_pipeline: Option<Arc<GraphicsPipeline>>,
    pub(super) ray_tracing_pipeline: Option<Arc<RayTracingPipeline>>,
    pub(super) shader_objects: ShaderObjectSet,

    pub(super) rendering: Option<RenderingInfo>,
    pub(super) active_queries: SmallVec<[QueryType; 4]>,
    pub(super) inherited_viewport_depth_count: Option<u32>,
}

impl CommandRecorder {
    /// Starts a new recording session, with the default settings.
    #[inline]
    pub fn new(device: Arc<DeviceCapabilities>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_settings(device, sink, ValidationSettings::new())
    }

    /// Starts a new recording session.
    pub fn with_settings(
        device: Arc<DeviceCapabilities>,
        sink: Arc<dyn DiagnosticSink>,
        settings: ValidationSettings,
    ) -> Self {
        Self {
            device,
            settings,
            sink,
            tracker: DynamicStateTracker::new(),
            graphics_pipeline: None,
            ray_tracing_pipeline: None,
            shader_objects: ShaderObjectSet::new(),
            rendering: None,
            active_queries: SmallVec::new(),
            inherited_viewport_depth_count: None,
        }
    }

    /// Returns the capabilities of the device that the command buffer is recorded for.
    #[inline]
    pub fn device(&self) -> &Arc<DeviceCapabilities> {
        &self.device
    }

    #[inline]
    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut ValidationSettings {
        &mut self.settings
    }

    #[inline]
    pub(crate) fn sink(&self) -> &dyn DiagnosticSink {
        &*self.sink
    }

    /// Returns the record of which dynamic state has been set.
    #[inline]
    pub fn tracker(&self) -> &DynamicStateTracker {
        &self.tracker
    }

    /// Returns the bound graphics pipeline, if any.
    #[inline]
    pub fn graphics_pipeline(&self) -> Option<&Arc<GraphicsPipeline>> {
        self.graphics_pipeline.as_ref()
    }

    /// Returns the bound ray tracing pipeline, if any.
    #[inline]
    pub fn ray_tracing_pipeline(&self) -> Option<&Arc<RayTracingPipeline>> {
        self.ray_tracing_pipeline.as_ref()
    }

    /// Returns the bound graphics shader objects.
    #[inline]
    pub fn shader_objects(&self) -> &ShaderObjectSet {
        &self.shader_objects
    }

    /// Returns the attachments of the current render pass instance, if inside one.
    #[inline]
    pub fn rendering(&self) -> Option<&RenderingInfo> {
        self.rendering.as_ref()
    }

    /// Returns whether a query of type `query_type` is active.
    #[inline]
    pub fn is_query_active(&self, query_type: QueryType) -> bool {
        self.active_queries.contains(&query_type)
    }

    /// Returns the number of viewport depths inherited from the primary command buffer, if the
    /// command buffer inherits its viewport and scissor state.
    #[inline]
    pub fn inherited_viewport_depth_count(&self) -> Option<u32> {
        self.inherited_viewport_depth_count
    }

    /// Checks the dynamic state for a draw or trace command at `bind_point`.
    ///
    /// Every problem is reported to the sink. Returns whether at least one error was reported.
    /// Warnings and suppressed rules do not count.
    #[inline]
    pub fn validate(&self, bind_point: PipelineBindPoint, location: impl Into<Location>) -> bool {
        self.validate_detailed(bind_point, location).violations != 0
    }

    /// Same as [`validate`](Self::validate), but returns a summary of what was found.
    pub fn validate_detailed(
        &self,
        bind_point: PipelineBindPoint,
        location: impl Into<Location>,
    ) -> ValidationOutcome {
        validation::validate_dynamic_state(self, bind_point, &location.into())
    }

    pub(super) fn validate_dynamic_state_supported(
        &self,
        state: DynamicState,
    ) -> Result<(), Box<ValidationError>> {
        if !state.is_supported(&self.device) {
            return Err(Box::new(ValidationError {
                problem: format!("`DynamicState::{:?}` is not supported by the device", state)
                    .into(),
                requires_one_of: state.requires_one_of(),
                vuids: state.vuids(),
                ..Default::default()
            }));
        }

        Ok(())
    }

    /// Passes an error returned by a recording command through, reporting it to the sink first
    /// if the settings ask for that.
    pub(super) fn recording_error(
        &self,
        command: &str,
        err: Box<ValidationError>,
    ) -> Box<ValidationError> {
        if self.settings.report_recording_errors_as_diagnostics {
            let rule_id = err
                .vuids
                .first()
                .copied()
                .unwrap_or("UNASSIGNED-vulkano-dyncheck-recording-error");

            if !self.settings.is_suppressed(rule_id) {
                self.sink.report(Diagnostic {
                    rule_id,
                    severity: Severity::Error,
                    objects: SmallVec::new(),
                    message: format!("{}: {}", command, err),
                });
            }
        }

        err
    }
}

impl Debug for CommandRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRecorder")
            .field("device", &self.device)
            .field("settings", &self.settings)
            .field("tracker", &self.tracker)
            .field("graphics_pipeline", &self.graphics_pipeline)
            .field("ray_tracing_pipeline", &self.ray_tracing_pipeline)
            .field("shader_objects", &self.shader_objects)
            .field("rendering", &self.rendering)
            .field("active_queries", &self.active_queries)
            .field(
                "inherited_viewport_depth_count",
                &self.inherited_viewport_depth_count,
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagnostic::DiagnosticCollector, pipeline::graphics::rasterization::CullMode,
        tests::full_device,
    };

    #[test]
    fn gate_is_checked() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder =
            CommandRecorder::new(Arc::new(DeviceCapabilities::default()), collector.clone());

        let err = recorder.set_cull_mode(CullMode::Back).unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetCullMode-None-08971"]);
        assert!(!recorder
            .tracker()
            .is_set(DynamicState::CullMode, crate::command_buffer::SetScope::Session));

        // Not reported unless asked for.
        assert!(collector.is_empty());
    }

    #[test]
    fn recording_errors_as_diagnostics() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut settings = ValidationSettings::new();
        settings.report_recording_errors_as_diagnostics = true;
        let mut recorder = CommandRecorder::with_settings(
            Arc::new(DeviceCapabilities::default()),
            collector.clone(),
            settings,
        );

        assert!(recorder.set_cull_mode(CullMode::Back).is_err());
        let diagnostics = collector.take();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, "VUID-vkCmdSetCullMode-None-08971");
        assert!(diagnostics[0].message.starts_with("vkCmdSetCullMode: "));

        recorder
            .settings_mut()
            .suppressed_rules
            .insert("VUID-vkCmdSetCullMode-None-08971".to_owned());
        assert!(recorder.set_cull_mode(CullMode::Back).is_err());
        assert!(collector.is_empty());
    }

    #[test]
    fn nothing_bound_is_not_a_violation() {
        let collector = Arc::new(DiagnosticCollector::new());
        let recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());

        let outcome = recorder.validate_detailed(
            PipelineBindPoint::Graphics,
            crate::validation::VUIDType::Draw,
        );
        assert_eq!(outcome.violations, 0);
        assert!(!outcome.consistency_checked);
        assert!(!recorder.validate(
            PipelineBindPoint::Compute,
            crate::validation::VUIDType::Draw,
        ));
        assert!(collector.is_empty());
    }
}
