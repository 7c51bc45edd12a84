// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! State that is only required when the effective value of other state enables it.

use super::super::{completeness::emit_missing, resolve::EffectiveView, VUIDType};
use crate::{
    diagnostic::Emitter,
    pipeline::{
        graphics::{
            input_assembly::PrimitiveTopologyClass,
            multisample::CoverageModulationMode,
            rasterization::{ConservativeRasterizationMode, CullMode, PolygonMode},
        },
        DynamicState, DynamicStateSet,
    },
    shader::ShaderStage,
};

struct ConditionalRequirement {
    state: DynamicState,
    vuid: fn(VUIDType) -> &'static str,
    applies: fn(&EffectiveView<'_>) -> bool,
}

macro_rules! conditional_requirements {
    ($($state:ident, $id:literal, |$view:ident| $applies:expr;)+) => {
        &[$(
            ConditionalRequirement {
                state: DynamicState::$state,
                vuid: |vuid_type| vuid!(vuid_type, $id),
                applies: |$view| $applies,
            },
        )+]
    };
}

const PIPELINE: &[ConditionalRequirement] = conditional_requirements! {
    LineWidth, "None-07833", |view| view.rasterizes() && view.draws_lines();
    DepthBias, "None-07834", |view| {
        view.rasterizes() && view.depth_bias_enable() == Some(true)
    };
    BlendConstants, "None-07835", |view| view.rasterizes() && uses_blend_constants(view);
    DepthBounds, "None-07836", |view| {
        view.rasterizes() && view.depth_bounds_test_enable() == Some(true)
    };
    StencilCompareMask, "None-07837", |view| stencil(view);
    StencilWriteMask, "None-07838", |view| stencil(view);
    StencilReference, "None-07839", |view| stencil(view);
    LineStipple, "None-07849", |view| {
        view.rasterizes() && view.line_stipple_enable() == Some(true) && view.draws_lines()
    };
};

#[allow(unused_variables)]
const SHADER_OBJECTS: &[ConditionalRequirement] = conditional_requirements! {
    ViewportWithCount, "None-08635", |view| true;
    ScissorWithCount, "None-08635", |view| true;
    CullMode, "None-08627", |view| view.rasterizes();
    FrontFace, "None-08628", |view| {
        view.rasterizes()
            && (view.cull_mode().is_some_and(|mode| mode != CullMode::None)
                || view.stencil_test_enable() == Some(true))
    };
    DepthTestEnable, "None-08629", |view| view.rasterizes();
    DepthWriteEnable, "None-08630", |view| view.rasterizes();
    DepthCompareOp, "None-08631", |view| {
        view.rasterizes() && view.depth_test_enable() == Some(true)
    };
    DepthBoundsTestEnable, "None-08632", |view| {
        view.rasterizes() && view.device.enabled_features.depth_bounds
    };
    DepthBounds, "None-08622", |view| {
        view.rasterizes() && view.depth_bounds_test_enable() == Some(true)
    };
    DepthBiasEnable, "None-08640", |view| view.rasterizes();
    DepthBias, "None-08620", |view| {
        view.rasterizes() && view.depth_bias_enable() == Some(true)
    };
    DepthClampEnable, "None-08650", |view| {
        view.rasterizes() && view.device.enabled_features.depth_clamp
    };
    StencilTestEnable, "None-08633", |view| view.rasterizes();
    StencilOp, "None-08634", |view| stencil(view);
    StencilCompareMask, "None-08623", |view| stencil(view);
    StencilWriteMask, "None-08624", |view| stencil(view);
    StencilReference, "None-08625", |view| stencil(view);
    PolygonMode, "None-08651", |view| view.rasterizes();
    RasterizationSamples, "None-08652", |view| view.rasterizes();
    SampleMask, "None-08653", |view| view.rasterizes();
    AlphaToCoverageEnable, "None-08654", |view| view.rasterizes();
    AlphaToOneEnable, "None-08655", |view| {
        view.rasterizes() && view.device.enabled_features.alpha_to_one
    };
    LineWidth, "None-08617", |view| view.polygon_mode() == Some(PolygonMode::Line);
    LineWidth, "None-08618", |view| view.rasterizes() && vertex_lines(view);
    ConservativeRasterizationMode, "None-08661", |view| {
        view.rasterizes() && view.device.enabled_extensions.ext_conservative_rasterization
    };
    ExtraPrimitiveOverestimationSize, "None-08662", |view| {
        view.rasterizes()
            && view.conservative_rasterization_mode()
                == Some(ConservativeRasterizationMode::Overestimate)
    };
    SampleLocationsEnable, "None-08664", |view| {
        view.rasterizes() && view.device.enabled_extensions.ext_sample_locations
    };
    SampleLocations, "None-08626", |view| {
        view.rasterizes() && view.sample_locations_enable() == Some(true)
    };
    ProvokingVertexMode, "None-08665", |view| {
        view.rasterizes()
            && view.has_stage(ShaderStage::Vertex)
            && view.device.enabled_extensions.ext_provoking_vertex
    };
    CoverageModulationMode, "None-08678", |view| {
        view.rasterizes() && view.device.enabled_extensions.nv_framebuffer_mixed_samples
    };
    CoverageModulationTableEnable, "None-08679", |view| {
        view.rasterizes()
            && view
                .coverage_modulation_mode()
                .is_some_and(|mode| mode != CoverageModulationMode::None)
    };
    CoverageModulationTable, "None-08680", |view| {
        view.rasterizes() && view.coverage_modulation_table_enable() == Some(true)
    };
    CoverageReductionMode, "None-08683", |view| {
        view.rasterizes() && view.device.enabled_extensions.nv_coverage_reduction_mode
    };
    RepresentativeFragmentTestEnable, "None-08682", |view| {
        view.rasterizes() && view.device.enabled_extensions.nv_representative_fragment_test
    };
    ViewportCoarseSampleOrder, "None-09233", |view| {
        view.rasterizes() && view.device.enabled_features.shading_rate_image
    };
    ShadingRateImageEnable, "None-08681", |view| {
        view.rasterizes() && view.device.enabled_features.shading_rate_image
    };
    ViewportShadingRatePalette, "None-09234", |view| {
        view.rasterizes() && view.shading_rate_image_enable() == Some(true)
    };
    LineRasterizationMode, "None-08666", |view| {
        line_rasterization(view) && view.polygon_mode() == Some(PolygonMode::Line)
    };
    LineStippleEnable, "None-08669", |view| {
        line_rasterization(view) && view.polygon_mode() == Some(PolygonMode::Line)
    };
    LineStipple, "None-08672", |view| {
        line_rasterization(view) && view.line_stipple_enable() == Some(true)
    };
    LineRasterizationMode, "None-08667", |view| line_rasterization(view) && vertex_lines(view);
    LineStippleEnable, "None-08670", |view| line_rasterization(view) && vertex_lines(view);
    LineRasterizationMode, "None-08668", |view| {
        line_rasterization(view) && shader_lines(view)
    };
    LineStippleEnable, "None-08671", |view| line_rasterization(view) && shader_lines(view);
    ViewportWScaling, "None-09232", |view| view.viewport_w_scaling_enable() == Some(true);
    ExclusiveScissor, "None-08638", |view| view.exclusive_scissor_enable() == Some(true);
    LogicOpEnable, "None-08656", |view| {
        fragment(view) && view.device.enabled_features.logic_op
    };
    LogicOp, "None-08641", |view| fragment(view) && view.logic_op_enable() == Some(true);
    ColorBlendEnable, "None-08657", |view| fragment(view) && view.color_attachment_count() > 0;
    ColorBlendEquation, "None-09418", |view| {
        fragment(view)
            && view.color_attachment_count() > 0
            && !view.is_set(DynamicState::ColorBlendAdvanced)
    };
    ColorWriteMask, "None-08659", |view| fragment(view) && view.color_attachment_count() > 0;
    FragmentShadingRate, "None-09238", |view| {
        fragment(view) && view.device.enabled_features.pipeline_fragment_shading_rate
    };
    AttachmentFeedbackLoopEnable, "None-08880", |view| {
        fragment(view) && view.device.enabled_features.attachment_feedback_loop_dynamic_state
    };
    CoverageToColorEnable, "None-08676", |view| {
        fragment(view) && view.device.enabled_extensions.nv_fragment_coverage_to_color
    };
    CoverageToColorLocation, "None-08677", |view| {
        fragment(view) && view.coverage_to_color_enable() == Some(true)
    };
    ColorWriteEnable, "None-08646", |view| {
        fragment(view) && view.device.enabled_features.color_write_enable
    };
    DiscardRectangleMode, "None-08649", |view| view.discard_rectangle_enable() == Some(true);
    DiscardRectangle, "None-09236", |view| view.discard_rectangle_enable() == Some(true);
    ViewportWithCount, "None-08642", |view| {
        !view
            .device
            .properties
            .primitive_fragment_shading_rate_with_multiple_viewports
            && view
                .last_pre_rasterization_stage()
                .is_some_and(|info| info.writes_primitive_shading_rate)
    };
};

fn stencil(view: &EffectiveView<'_>) -> bool {
    view.rasterizes() && view.stencil_test_enable() == Some(true)
}

fn fragment(view: &EffectiveView<'_>) -> bool {
    view.rasterizes() && view.has_stage(ShaderStage::Fragment)
}

/// Whether a vertex shader is bound and the topology assembles lines.
fn vertex_lines(view: &EffectiveView<'_>) -> bool {
    view.has_stage(ShaderStage::Vertex)
        && view
            .topology()
            .is_some_and(|topology| topology.class() == PrimitiveTopologyClass::Line)
}

/// Whether a tessellation or geometry shader outputs lines.
fn shader_lines(view: &EffectiveView<'_>) -> bool {
    [ShaderStage::TessellationEvaluation, ShaderStage::Geometry]
        .into_iter()
        .filter_map(|stage| view.stage(stage))
        .any(|info| info.outputs_lines())
}

fn line_rasterization(view: &EffectiveView<'_>) -> bool {
    view.rasterizes()
        && (view.device.enabled_extensions.ext_line_rasterization
            || view.device.enabled_extensions.khr_line_rasterization)
}

fn uses_blend_constants(view: &EffectiveView<'_>) -> bool {
    (0..view.color_attachment_count()).any(|index| {
        view.color_blend_enable(index) == Some(true)
            && view
                .color_blend_equation(index)
                .is_some_and(|blend| blend.uses_constant_factor())
    })
}

/// Returns the states that the effective values require but that were not set.
pub(super) fn check(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) -> DynamicStateSet {
    let table = if view.is_shader_objects() {
        SHADER_OBJECTS
    } else {
        PIPELINE
    };
    let mut reported = DynamicStateSet::empty();

    for requirement in table {
        let state = requirement.state;

        if reported.contains(state)
            || !view.is_dynamic(state)
            || view.is_set(state)
            || !(requirement.applies)(view)
        {
            continue;
        }

        reported.insert(state);
        emit_missing(view, emitter, state, (requirement.vuid)(emitter.vuid_type()));
    }

    reported
}

#[cfg(test)]
mod tests {
    use crate::{
        command_buffer::CommandRecorder,
        diagnostic::DiagnosticCollector,
        pipeline::{
            graphics::{
                depth_stencil::{DepthStencilState, StencilState},
                input_assembly::{InputAssemblyState, PrimitiveTopology},
                rasterization::{PolygonMode, RasterizationState},
            },
            DynamicState, PipelineBindPoint,
        },
        tests::{full_device, pipeline_with},
        validation::VUIDType,
    };
    use std::sync::Arc;

    #[test]
    fn conditional_misses_are_reported_as_missing() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::DepthBiasEnable, DynamicState::DepthBias],
                |_| (),
            ))
            .unwrap();
        recorder.set_depth_bias_enable(true).unwrap();

        let outcome = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert!(outcome.consistency_checked);
        assert_eq!(outcome.missing, [DynamicState::DepthBias].into());

        recorder.set_depth_bias(1.0, 0.0, 1.0).unwrap();
        let outcome = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert!(outcome.missing.is_empty());
        assert_eq!(outcome.violations, 0);
    }

    #[test]
    fn depth_bias_follows_its_enable() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::DepthBiasEnable, DynamicState::DepthBias],
                |_| (),
            ))
            .unwrap();

        recorder.set_depth_bias_enable(false).unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        recorder.set_depth_bias_enable(true).unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-None-07834"]);

        collector.clear();
        recorder.set_depth_bias(1.0, 0.0, 1.0).unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert!(collector.is_empty());
    }

    #[test]
    fn line_width_only_for_lines() {
        let mut device = full_device();
        device.properties.dynamic_primitive_topology_unrestricted = true;
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(device), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::LineWidth, DynamicState::PrimitiveTopology],
                |create_info| {
                    create_info.input_assembly_state = Some(InputAssemblyState {
                        topology: PrimitiveTopology::LineList,
                        ..Default::default()
                    });
                },
            ))
            .unwrap();

        recorder
            .set_primitive_topology(PrimitiveTopology::TriangleList)
            .unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        recorder
            .set_primitive_topology(PrimitiveTopology::LineStrip)
            .unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-None-07833"]);
    }

    #[test]
    fn static_enables_gate_the_parameters() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [
                    DynamicState::StencilCompareMask,
                    DynamicState::StencilWriteMask,
                    DynamicState::StencilReference,
                ],
                |create_info| {
                    create_info.depth_stencil_state = Some(DepthStencilState {
                        stencil: Some(StencilState::default()),
                        ..Default::default()
                    });
                },
            ))
            .unwrap();

        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(
            collector.rule_ids(),
            [
                "VUID-vkCmdDraw-None-07837",
                "VUID-vkCmdDraw-None-07838",
                "VUID-vkCmdDraw-None-07839",
            ],
        );
    }

    #[test]
    fn nothing_is_needed_when_rasterization_is_discarded() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::LineWidth], |create_info| {
                create_info.rasterization_state = Some(RasterizationState {
                    rasterizer_discard_enable: true,
                    polygon_mode: PolygonMode::Line,
                    ..Default::default()
                });
            }))
            .unwrap();

        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
    }
}
