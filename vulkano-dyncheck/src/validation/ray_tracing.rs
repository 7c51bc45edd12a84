// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use super::ValidationOutcome;
use crate::{
    command_buffer::{CommandRecorder, SetScope},
    diagnostic::Emitter,
    pipeline::DynamicState,
};

/// Validates the state of the ray tracing bind point. The stack size is the only state that a
/// ray tracing pipeline can leave dynamic.
pub(super) fn validate(recorder: &CommandRecorder, emitter: &mut Emitter<'_>) -> ValidationOutcome {
    let Some(pipeline) = recorder.ray_tracing_pipeline() else {
        log::debug!(target: "vulkano_dyncheck", "no ray tracing pipeline is bound");

        return ValidationOutcome::default();
    };

    let state = DynamicState::RayTracingPipelineStackSize;
    let is_set = recorder.tracker().is_set(state, SetScope::SinceBind);
    let mut outcome = ValidationOutcome::default();

    if pipeline.is_dynamic(state) {
        if !is_set {
            outcome.missing.insert(state);
            emitter.emit(
                vuid!(emitter.vuid_type(), "None-09458"),
                [pipeline.object_handle()],
                format_args!(
                    "`{}` state is dynamic, but the command buffer never called `{}` since the \
                    last bind",
                    state.name(),
                    state.command(),
                ),
            );
        }
    } else if is_set && recorder.settings().report_stale_state {
        emitter.warn(
            vuid!(emitter.vuid_type(), "None-08608"),
            [pipeline.object_handle()],
            format_args!(
                "`{}` was called, but the bound pipeline has a static stack size, the value is \
                ignored",
                state.command(),
            ),
        );
    }

    outcome.consistency_checked = outcome.missing.is_empty();
    outcome
}

#[cfg(test)]
mod tests {
    use crate::{
        command_buffer::CommandRecorder,
        diagnostic::{DiagnosticCollector, Severity},
        pipeline::{
            ray_tracing::{RayTracingPipeline, RayTracingPipelineCreateInfo},
            DynamicState, PipelineBindPoint,
        },
        tests::full_device,
        validation::VUIDType,
    };
    use std::sync::Arc;

    #[test]
    fn stack_size_must_be_set() {
        let device = Arc::new(full_device());
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(device.clone(), collector.clone());
        let pipeline = RayTracingPipeline::new(
            &device,
            RayTracingPipelineCreateInfo {
                dynamic_state: [DynamicState::RayTracingPipelineStackSize].into(),
                ..Default::default()
            },
        )
        .unwrap();

        recorder.set_ray_tracing_pipeline_stack_size(4096).unwrap();
        recorder.bind_pipeline_ray_tracing(pipeline).unwrap();

        let outcome =
            recorder.validate_detailed(PipelineBindPoint::RayTracing, VUIDType::TraceRays);
        assert_eq!(outcome.violations, 1);
        assert!(!outcome.consistency_checked);
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdTraceRaysKHR-None-09458"]);

        collector.clear();
        recorder.set_ray_tracing_pipeline_stack_size(4096).unwrap();
        assert!(!recorder.validate(PipelineBindPoint::RayTracing, VUIDType::TraceRaysIndirect));
    }

    #[test]
    fn static_stack_size_is_stale() {
        let device = Arc::new(full_device());
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(device.clone(), collector.clone());
        recorder
            .bind_pipeline_ray_tracing(
                RayTracingPipeline::new(&device, RayTracingPipelineCreateInfo::default()).unwrap(),
            )
            .unwrap();
        recorder.set_ray_tracing_pipeline_stack_size(4096).unwrap();

        let outcome =
            recorder.validate_detailed(PipelineBindPoint::RayTracing, VUIDType::TraceRays);
        assert_eq!(outcome.violations, 0);
        assert_eq!(outcome.warnings, 1);
        assert!(outcome.consistency_checked);

        let diagnostics = collector.take();
        assert_eq!(diagnostics[0].rule_id, "VUID-vkCmdTraceRaysKHR-None-08608");
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn nothing_bound_is_not_an_error() {
        let collector = Arc::new(DiagnosticCollector::new());
        let recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());

        assert!(!recorder.validate(PipelineBindPoint::RayTracing, VUIDType::TraceRays));
        assert!(collector.is_empty());
    }
}
