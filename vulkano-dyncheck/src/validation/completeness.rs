// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Checks that the state the bound configuration leaves dynamic was set since the last bind.

use super::{resolve::EffectiveView, VUIDType};
use crate::{
    device::DeviceCapabilities,
    diagnostic::Emitter,
    pipeline::{DynamicState, DynamicStateSet, PipelineBindPoint},
    shader::ShaderStage,
};

/// States of a pipeline whose presence depends on other state, or that are counted per index.
/// They are checked by the consistency rules instead.
const DEFERRED: [DynamicState; 17] = [
    DynamicState::Viewport,
    DynamicState::Scissor,
    DynamicState::ViewportWithCount,
    DynamicState::ScissorWithCount,
    DynamicState::LineWidth,
    DynamicState::DepthBias,
    DynamicState::BlendConstants,
    DynamicState::DepthBounds,
    DynamicState::StencilCompareMask,
    DynamicState::StencilWriteMask,
    DynamicState::StencilReference,
    DynamicState::LineStipple,
    DynamicState::DiscardRectangle,
    DynamicState::ColorBlendEnable,
    DynamicState::ColorBlendEquation,
    DynamicState::ColorWriteMask,
    DynamicState::ColorBlendAdvanced,
];

/// States of a pipeline that are only needed when another state is enabled.
const DEFERRED_ENABLES: [DynamicState; 2] = [
    DynamicState::ViewportWScaling,
    DynamicState::ViewportShadingRatePalette,
];

/// Returns the VUID that is reported when a pipeline leaves `state` dynamic and it was not set.
fn pipeline_vuid(vuid_type: VUIDType, state: DynamicState) -> &'static str {
    match state {
        DynamicState::CullMode => vuid!(vuid_type, "None-07840"),
        DynamicState::FrontFace => vuid!(vuid_type, "None-07841"),
        DynamicState::PrimitiveTopology => vuid!(vuid_type, "None-07842"),
        DynamicState::DepthTestEnable => vuid!(vuid_type, "None-07843"),
        DynamicState::DepthWriteEnable => vuid!(vuid_type, "None-07844"),
        DynamicState::DepthCompareOp => vuid!(vuid_type, "None-07845"),
        DynamicState::DepthBoundsTestEnable => vuid!(vuid_type, "None-07846"),
        DynamicState::StencilTestEnable => vuid!(vuid_type, "None-07847"),
        DynamicState::StencilOp => vuid!(vuid_type, "None-07848"),
        DynamicState::PatchControlPoints => vuid!(vuid_type, "None-04875"),
        DynamicState::RasterizerDiscardEnable => vuid!(vuid_type, "None-04876"),
        DynamicState::DepthBiasEnable => vuid!(vuid_type, "None-04877"),
        DynamicState::LogicOp => vuid!(vuid_type, "logicOp-04878"),
        DynamicState::PrimitiveRestartEnable => vuid!(vuid_type, "None-04879"),
        DynamicState::VertexInput => vuid!(vuid_type, "None-04914"),
        DynamicState::VertexInputBindingStride => vuid!(vuid_type, "pStrides-04913"),
        DynamicState::ColorWriteEnable => vuid!(vuid_type, "None-07749"),
        DynamicState::DiscardRectangleEnable => vuid!(vuid_type, "None-07880"),
        DynamicState::DiscardRectangleMode => vuid!(vuid_type, "None-07881"),
        DynamicState::ExclusiveScissorEnable => vuid!(vuid_type, "None-07878"),
        DynamicState::ExclusiveScissor => vuid!(vuid_type, "None-07879"),
        DynamicState::TessellationDomainOrigin => vuid!(vuid_type, "None-07619"),
        DynamicState::DepthClampEnable => vuid!(vuid_type, "None-07620"),
        DynamicState::PolygonMode => vuid!(vuid_type, "None-07621"),
        DynamicState::RasterizationSamples => vuid!(vuid_type, "None-07622"),
        DynamicState::SampleMask => vuid!(vuid_type, "None-07623"),
        DynamicState::AlphaToCoverageEnable => vuid!(vuid_type, "None-07624"),
        DynamicState::AlphaToOneEnable => vuid!(vuid_type, "None-07625"),
        DynamicState::LogicOpEnable => vuid!(vuid_type, "None-07626"),
        DynamicState::RasterizationStream => vuid!(vuid_type, "None-07630"),
        DynamicState::ConservativeRasterizationMode => vuid!(vuid_type, "None-07631"),
        DynamicState::ExtraPrimitiveOverestimationSize => vuid!(vuid_type, "None-07632"),
        DynamicState::DepthClipEnable => vuid!(vuid_type, "None-07633"),
        DynamicState::SampleLocationsEnable => vuid!(vuid_type, "None-07634"),
        DynamicState::ProvokingVertexMode => vuid!(vuid_type, "None-07636"),
        DynamicState::LineRasterizationMode => vuid!(vuid_type, "None-07637"),
        DynamicState::LineStippleEnable => vuid!(vuid_type, "None-07638"),
        DynamicState::DepthClipNegativeOneToOne => vuid!(vuid_type, "None-07639"),
        DynamicState::ViewportWScalingEnable => vuid!(vuid_type, "None-07640"),
        DynamicState::ViewportSwizzle => vuid!(vuid_type, "None-07641"),
        DynamicState::CoverageToColorEnable => vuid!(vuid_type, "None-07642"),
        DynamicState::CoverageToColorLocation => vuid!(vuid_type, "None-07643"),
        DynamicState::CoverageModulationMode => vuid!(vuid_type, "None-07644"),
        DynamicState::CoverageModulationTableEnable => vuid!(vuid_type, "None-07645"),
        DynamicState::CoverageModulationTable => vuid!(vuid_type, "None-07646"),
        DynamicState::ShadingRateImageEnable => vuid!(vuid_type, "None-07647"),
        DynamicState::RepresentativeFragmentTestEnable => vuid!(vuid_type, "None-07648"),
        DynamicState::CoverageReductionMode => vuid!(vuid_type, "None-07649"),
        DynamicState::SampleLocations => vuid!(vuid_type, "None-06666"),
        DynamicState::FragmentShadingRate => vuid!(vuid_type, "None-09238"),
        DynamicState::AttachmentFeedbackLoopEnable => vuid!(vuid_type, "None-08877"),
        _ => vuid!(vuid_type, "commandBuffer-02701"),
    }
}

/// A state that must be set when shader objects are bound, depending only on which stages are
/// bound and what the device has enabled.
struct ShaderObjectRequirement {
    state: DynamicState,
    vuid: fn(VUIDType) -> &'static str,
    applies: fn(&EffectiveView<'_>, &DeviceCapabilities) -> bool,
}

macro_rules! shader_object_requirements {
    ($($state:ident, $id:literal, |$view:ident, $device:ident| $applies:expr;)+) => {
        &[$(
            ShaderObjectRequirement {
                state: DynamicState::$state,
                vuid: |vuid_type| vuid!(vuid_type, $id),
                applies: |$view, $device| $applies,
            },
        )+]
    };
}

#[allow(unused_variables)]
const SHADER_OBJECT_REQUIREMENTS: &[ShaderObjectRequirement] = shader_object_requirements! {
    RasterizerDiscardEnable, "None-08639", |view, device| true;
    VertexInput, "None-08882", |view, device| view.has_stage(ShaderStage::Vertex);
    PrimitiveTopology, "None-07842", |view, device| view.has_stage(ShaderStage::Vertex);
    PrimitiveRestartEnable, "None-04879", |view, device| view.has_stage(ShaderStage::Vertex);
    PatchControlPoints, "None-04875", |view, device| {
        view.has_stage(ShaderStage::TessellationEvaluation)
    };
    TessellationDomainOrigin, "None-09237", |view, device| {
        view.has_stage(ShaderStage::TessellationEvaluation)
    };
    LineWidth, "None-08619", |view, device| {
        [ShaderStage::TessellationEvaluation, ShaderStage::Geometry]
            .into_iter()
            .filter_map(|stage| view.stage(stage))
            .any(|info| info.outputs_lines())
    };
    RasterizationStream, "None-08660", |view, device| {
        device.enabled_features.geometry_streams && view.has_stage(ShaderStage::Geometry)
    };
    DepthClipEnable, "None-08663", |view, device| device.enabled_features.depth_clip_enable;
    DepthClipNegativeOneToOne, "None-08673", |view, device| {
        device.enabled_features.depth_clip_control
    };
    ViewportWScalingEnable, "None-08674", |view, device| {
        device.enabled_extensions.nv_clip_space_w_scaling
    };
    ViewportSwizzle, "None-08675", |view, device| device.enabled_extensions.nv_viewport_swizzle;
    ExclusiveScissorEnable, "None-09235", |view, device| {
        device.enabled_features.exclusive_scissor
    };
    DiscardRectangleEnable, "None-08648", |view, device| {
        device.enabled_extensions.ext_discard_rectangles
    };
};

/// Runs the completeness pass and returns the states that are missing.
pub(super) fn check(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) -> DynamicStateSet {
    match view.pipeline() {
        Some(pipeline) => {
            let vuid_type = emitter.vuid_type();
            let required = required_pipeline_state(pipeline.dynamic_state());
            let missing = required - *view.tracker.set_since_bind();

            for state in missing.iter() {
                emit_missing(view, emitter, state, pipeline_vuid(vuid_type, state));
            }

            if view.recorder.settings().report_stale_state {
                warn_stale(view, emitter, pipeline.dynamic_state());
            }

            missing
        }
        None => {
            let mut missing = DynamicStateSet::empty();

            for requirement in SHADER_OBJECT_REQUIREMENTS {
                if missing.contains(requirement.state)
                    || view.is_set(requirement.state)
                    || !(requirement.applies)(view, view.device)
                {
                    continue;
                }

                missing.insert(requirement.state);
                let rule_id = (requirement.vuid)(emitter.vuid_type());
                emit_missing(view, emitter, requirement.state, rule_id);
            }

            missing
        }
    }
}

/// Returns the states of a pipeline that must be set no matter what else is set.
fn required_pipeline_state(dynamic_state: &DynamicStateSet) -> DynamicStateSet {
    let mut required = *dynamic_state - DynamicStateSet::from(DEFERRED)
        - DynamicStateSet::from(DEFERRED_ENABLES);

    // `vkCmdSetVertexInputEXT` provides the strides too.
    if dynamic_state.contains(DynamicState::VertexInput) {
        required.remove(DynamicState::VertexInputBindingStride);
    }

    required
}

pub(super) fn emit_missing(
    view: &EffectiveView<'_>,
    emitter: &mut Emitter<'_>,
    state: DynamicState,
    rule_id: &'static str,
) -> bool {
    emitter.emit(
        rule_id,
        view.objects(),
        format_args!(
            "`{}` state is dynamic, but the command buffer never called `{}` since the last \
            bind",
            state.name(),
            state.command(),
        ),
    )
}

/// Warns about graphics state that was set since the last bind, but that the pipeline has as
/// static state. The pipeline's value is used instead of it.
fn warn_stale(
    view: &EffectiveView<'_>,
    emitter: &mut Emitter<'_>,
    dynamic_state: &DynamicStateSet,
) {
    let mut stale: DynamicStateSet = view
        .tracker
        .set_since_bind()
        .iter()
        .filter(|state| state.bind_point() == PipelineBindPoint::Graphics)
        .collect();
    stale -= *dynamic_state;

    if dynamic_state.contains(DynamicState::VertexInput) {
        stale.remove(DynamicState::VertexInputBindingStride);
    }

    if stale.is_empty() {
        return;
    }

    emitter.warn(
        vuid!(emitter.vuid_type(), "None-08608"),
        view.objects(),
        format_args!(
            "{} set state that the bound pipeline has as static state, the values are \
            ignored",
            stale.commands(),
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        command_buffer::CommandRecorder,
        diagnostic::{DiagnosticCollector, Severity, ValidationSettings},
        pipeline::graphics::rasterization::{CullMode, FrontFace},
        shader::{EntryPointInfo, ShaderObject},
        tests::{full_device, pipeline_with},
    };
    use std::sync::Arc;

    #[test]
    fn missing_state_is_reported_once_each() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::CullMode, DynamicState::FrontFace],
                |_| (),
            ))
            .unwrap();

        let outcome = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert_eq!(outcome.violations, 2);
        assert_eq!(
            outcome.missing,
            [DynamicState::CullMode, DynamicState::FrontFace].into(),
        );
        assert!(!outcome.consistency_checked);
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDraw-None-07840", "VUID-vkCmdDraw-None-07841"],
        );

        let message = &collector.diagnostics()[0].message;
        assert!(message.contains("VK_DYNAMIC_STATE_CULL_MODE"));
        assert!(message.contains("vkCmdSetCullMode"));
    }

    #[test]
    fn rule_ids_follow_the_command() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::CullMode], |_| ()))
            .unwrap();

        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::DrawIndexedIndirect));
        assert!(collector.contains("VUID-vkCmdDrawIndexedIndirect-None-07840"));
    }

    #[test]
    fn binding_clears_what_was_set() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        let pipeline = pipeline_with([DynamicState::CullMode], |_| ());

        recorder.set_cull_mode(CullMode::Back).unwrap();
        recorder.bind_pipeline_graphics(pipeline.clone()).unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        recorder.set_cull_mode(CullMode::Back).unwrap();
        collector.clear();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        recorder.bind_pipeline_graphics(pipeline).unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
    }

    #[test]
    fn strides_come_with_vertex_input() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [
                    DynamicState::VertexInput,
                    DynamicState::VertexInputBindingStride,
                ],
                |_| (),
            ))
            .unwrap();

        let outcome = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert_eq!(outcome.missing, [DynamicState::VertexInput].into());
    }

    #[test]
    fn stale_state_is_a_warning() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::CullMode], |_| ()))
            .unwrap();
        recorder.set_cull_mode(CullMode::Back).unwrap();
        recorder.set_front_face(FrontFace::Clockwise).unwrap();

        let outcome = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert_eq!(outcome.violations, 0);
        assert_eq!(outcome.warnings, 1);

        let diagnostics = collector.take();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, "VUID-vkCmdDraw-None-08608");
        assert_eq!(diagnostics[0].severity, Severity::Warning);

        recorder.settings_mut().report_stale_state = false;
        recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert!(collector.is_empty());
    }

    #[test]
    fn shader_objects_require_by_stage() {
        let device = Arc::new(full_device());
        let collector = Arc::new(DiagnosticCollector::new());
        let mut settings = ValidationSettings::new();
        settings.report_stale_state = false;
        let mut recorder =
            CommandRecorder::with_settings(device.clone(), collector.clone(), settings);

        let vertex =
            ShaderObject::new(&device, EntryPointInfo::new(ShaderStage::Vertex)).unwrap();
        recorder
            .bind_shaders(&[ShaderStage::Vertex], &[Some(vertex)])
            .unwrap();

        let outcome = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert!(outcome.missing.contains(DynamicState::RasterizerDiscardEnable));
        assert!(outcome.missing.contains(DynamicState::VertexInput));
        assert!(outcome.missing.contains(DynamicState::PrimitiveTopology));
        assert!(!outcome.missing.contains(DynamicState::PatchControlPoints));
        assert!(collector.contains("VUID-vkCmdDraw-None-08639"));
        assert!(collector.contains("VUID-vkCmdDraw-None-08882"));
    }
}
