// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Combines the bound configuration with the recorded state.
//!
//! A value is *effective* if the rules should check it: for state that is dynamic, the value set
//! since the last bind; for state that is static, the value the pipeline was created with.

use crate::{
    command_buffer::{
        CommandRecorder, DynamicStateTracker, DynamicStateValues, RenderingInfo, SetScope,
    },
    device::DeviceCapabilities,
    diagnostic::ObjectHandle,
    image::SampleCount,
    pipeline::{
        graphics::{
            color_blend::{AttachmentBlend, ColorBlendAdvanced, ColorComponents},
            input_assembly::{PrimitiveTopology, PrimitiveTopologyClass},
            multisample::CoverageModulationMode,
            rasterization::{ConservativeRasterizationMode, CullMode, PolygonMode},
            GraphicsPipeline,
        },
        DynamicState, PipelineBindPoint,
    },
    shader::{EntryPointInfo, ShaderObjectSet, ShaderStage},
};
use smallvec::{smallvec, SmallVec};

/// What is bound at the graphics bind point.
#[derive(Clone, Copy, Debug)]
pub(crate) enum BoundConfiguration<'a> {
    Pipeline(&'a GraphicsPipeline),
    ShaderObjects(&'a ShaderObjectSet),
}

/// The bound graphics configuration together with everything the rules look at.
#[derive(Clone, Copy)]
pub(crate) struct EffectiveView<'a> {
    pub(crate) bound: BoundConfiguration<'a>,
    pub(crate) recorder: &'a CommandRecorder,
    pub(crate) device: &'a DeviceCapabilities,
    pub(crate) tracker: &'a DynamicStateTracker,
}

impl<'a> EffectiveView<'a> {
    /// Returns `None` if neither a pipeline nor any shader object is bound at `bind_point`. A
    /// bound pipeline takes precedence.
    pub(crate) fn resolve(
        recorder: &'a CommandRecorder,
        bind_point: PipelineBindPoint,
    ) -> Option<Self> {
        if bind_point != PipelineBindPoint::Graphics {
            return None;
        }

        let bound = if let Some(pipeline) = recorder.graphics_pipeline() {
            BoundConfiguration::Pipeline(pipeline)
        } else if !recorder.shader_objects().is_empty() {
            BoundConfiguration::ShaderObjects(recorder.shader_objects())
        } else {
            return None;
        };

        Some(Self {
            bound,
            recorder,
            device: recorder.device(),
            tracker: recorder.tracker(),
        })
    }

    #[inline]
    pub(crate) fn pipeline(&self) -> Option<&'a GraphicsPipeline> {
        match self.bound {
            BoundConfiguration::Pipeline(pipeline) => Some(pipeline),
            BoundConfiguration::ShaderObjects(_) => None,
        }
    }

    #[inline]
    pub(crate) fn is_shader_objects(&self) -> bool {
        matches!(self.bound, BoundConfiguration::ShaderObjects(_))
    }

    /// Returns whether `state` must come from the command buffer. With shader objects, every
    /// state is dynamic.
    #[inline]
    pub(crate) fn is_dynamic(&self, state: DynamicState) -> bool {
        match self.bound {
            BoundConfiguration::Pipeline(pipeline) => pipeline.is_dynamic(state),
            BoundConfiguration::ShaderObjects(_) => true,
        }
    }

    #[inline]
    pub(crate) fn is_set(&self, state: DynamicState) -> bool {
        self.tracker.is_set(state, SetScope::SinceBind)
    }

    /// Returns whether `index` of the indexed `state` was set since the last bind.
    #[inline]
    pub(crate) fn is_index_set(&self, state: DynamicState, index: u32) -> bool {
        self.tracker.is_index_set(state, index)
    }

    #[inline]
    pub(crate) fn rendering(&self) -> Option<&'a RenderingInfo> {
        self.recorder.rendering()
    }

    /// Returns the handles of the bound objects, for diagnostics.
    pub(crate) fn objects(&self) -> SmallVec<[ObjectHandle; 2]> {
        match self.bound {
            BoundConfiguration::Pipeline(pipeline) => smallvec![pipeline.object_handle()],
            BoundConfiguration::ShaderObjects(shaders) => {
                shaders.iter().map(|shader| shader.object_handle()).collect()
            }
        }
    }

    pub(crate) fn stage(&self, stage: ShaderStage) -> Option<&'a EntryPointInfo> {
        match self.bound {
            BoundConfiguration::Pipeline(pipeline) => pipeline.stage(stage),
            BoundConfiguration::ShaderObjects(shaders) => shaders.info(stage),
        }
    }

    #[inline]
    pub(crate) fn has_stage(&self, stage: ShaderStage) -> bool {
        self.stage(stage).is_some()
    }

    pub(crate) fn last_pre_rasterization_stage(&self) -> Option<&'a EntryPointInfo> {
        match self.bound {
            BoundConfiguration::Pipeline(pipeline) => pipeline.last_pre_rasterization_stage(),
            BoundConfiguration::ShaderObjects(shaders) => shaders.last_pre_rasterization_stage(),
        }
    }

    /// Returns the number of color attachments that per-attachment state must cover.
    pub(crate) fn color_attachment_count(&self) -> u32 {
        match self.bound {
            BoundConfiguration::Pipeline(pipeline) => pipeline.color_attachment_count(),
            BoundConfiguration::ShaderObjects(_) => self
                .rendering()
                .map_or(0, |rendering| rendering.color_attachment_count()),
        }
    }

    /// Returns the recorded values if `state` was set since the last bind.
    #[inline]
    pub(crate) fn if_set<T>(
        &self,
        state: DynamicState,
        value: impl FnOnce(&'a DynamicStateValues) -> Option<T>,
    ) -> Option<T> {
        if self.is_set(state) {
            value(self.tracker.values())
        } else {
            None
        }
    }

    fn effective<T>(
        &self,
        state: DynamicState,
        dynamic: impl FnOnce(&'a DynamicStateValues) -> Option<T>,
        fixed: impl FnOnce(&'a GraphicsPipeline) -> Option<T>,
    ) -> Option<T> {
        match self.bound {
            BoundConfiguration::Pipeline(pipeline) if !pipeline.is_dynamic(state) => {
                fixed(pipeline)
            }
            _ => self.if_set(state, dynamic),
        }
    }

    fn effective_indexed<T>(
        &self,
        state: DynamicState,
        index: u32,
        dynamic: impl FnOnce(&'a DynamicStateValues) -> Option<T>,
        fixed: impl FnOnce(&'a GraphicsPipeline) -> Option<T>,
    ) -> Option<T> {
        match self.bound {
            BoundConfiguration::Pipeline(pipeline) if !pipeline.is_dynamic(state) => {
                fixed(pipeline)
            }
            _ if self.is_index_set(state, index) => dynamic(self.tracker.values()),
            _ => None,
        }
    }

    pub(crate) fn topology(&self) -> Option<PrimitiveTopology> {
        self.effective(
            DynamicState::PrimitiveTopology,
            |v| v.primitive_topology,
            |p| p.input_assembly_state().map(|s| s.topology),
        )
    }

    pub(crate) fn primitive_restart_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::PrimitiveRestartEnable,
            |v| v.primitive_restart_enable,
            |p| {
                Some(
                    p.input_assembly_state()
                        .is_some_and(|s| s.primitive_restart_enable),
                )
            },
        )
    }

    pub(crate) fn rasterizer_discard_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::RasterizerDiscardEnable,
            |v| v.rasterizer_discard_enable,
            |p| {
                Some(
                    p.rasterization_state()
                        .is_some_and(|s| s.rasterizer_discard_enable),
                )
            },
        )
    }

    /// Returns whether primitives are known to reach the rasterizer.
    #[inline]
    pub(crate) fn rasterizes(&self) -> bool {
        self.rasterizer_discard_enable() == Some(false)
    }

    pub(crate) fn polygon_mode(&self) -> Option<PolygonMode> {
        self.effective(
            DynamicState::PolygonMode,
            |v| v.polygon_mode,
            |p| Some(p.rasterization_state().map_or(PolygonMode::Fill, |s| s.polygon_mode)),
        )
    }

    pub(crate) fn cull_mode(&self) -> Option<CullMode> {
        self.effective(
            DynamicState::CullMode,
            |v| v.cull_mode,
            |p| p.rasterization_state().map(|s| s.cull_mode),
        )
    }

    pub(crate) fn depth_bias_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::DepthBiasEnable,
            |v| v.depth_bias_enable,
            |p| Some(p.rasterization_state().is_some_and(|s| s.depth_bias.is_some())),
        )
    }

    pub(crate) fn line_stipple_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::LineStippleEnable,
            |v| v.line_stipple_enable,
            |p| Some(p.rasterization_state().is_some_and(|s| s.line_stipple.is_some())),
        )
    }

    pub(crate) fn conservative_rasterization_mode(&self) -> Option<ConservativeRasterizationMode> {
        self.effective(
            DynamicState::ConservativeRasterizationMode,
            |v| v.conservative_rasterization_mode,
            |p| {
                Some(p.rasterization_state().map_or(
                    ConservativeRasterizationMode::Disabled,
                    |s| s.conservative_rasterization_mode(),
                ))
            },
        )
    }

    pub(crate) fn rasterization_stream(&self) -> Option<u32> {
        self.effective(
            DynamicState::RasterizationStream,
            |v| v.rasterization_stream,
            |p| Some(p.rasterization_state().map_or(0, |s| s.rasterization_stream)),
        )
    }

    pub(crate) fn depth_test_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::DepthTestEnable,
            |v| v.depth_test_enable,
            |p| Some(p.depth_stencil_state().is_some_and(|s| s.depth.is_some())),
        )
    }

    pub(crate) fn depth_write_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::DepthWriteEnable,
            |v| v.depth_write_enable,
            |p| {
                Some(
                    p.depth_stencil_state()
                        .and_then(|s| s.depth.as_ref())
                        .is_some_and(|depth| depth.write_enable),
                )
            },
        )
    }

    pub(crate) fn depth_bounds_test_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::DepthBoundsTestEnable,
            |v| v.depth_bounds_test_enable,
            |p| Some(p.depth_stencil_state().is_some_and(|s| s.depth_bounds.is_some())),
        )
    }

    pub(crate) fn stencil_test_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::StencilTestEnable,
            |v| v.stencil_test_enable,
            |p| Some(p.depth_stencil_state().is_some_and(|s| s.stencil.is_some())),
        )
    }

    /// Returns whether the stencil write mask of either face has a bit set.
    pub(crate) fn stencil_writes(&self) -> Option<bool> {
        self.effective(
            DynamicState::StencilWriteMask,
            |v| {
                v.stencil_write_mask
                    .map(|mask| mask.front.unwrap_or(0) != 0 || mask.back.unwrap_or(0) != 0)
            },
            |p| {
                Some(
                    p.depth_stencil_state()
                        .and_then(|s| s.stencil.as_ref())
                        .is_some_and(|s| s.front.write_mask != 0 || s.back.write_mask != 0),
                )
            },
        )
    }

    pub(crate) fn rasterization_samples(&self) -> Option<SampleCount> {
        self.effective(
            DynamicState::RasterizationSamples,
            |v| v.rasterization_samples,
            |p| {
                Some(
                    p.multisample_state()
                        .map_or(SampleCount::Sample1, |s| s.rasterization_samples),
                )
            },
        )
    }

    pub(crate) fn alpha_to_coverage_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::AlphaToCoverageEnable,
            |v| v.alpha_to_coverage_enable,
            |p| Some(p.multisample_state().is_some_and(|s| s.alpha_to_coverage_enable)),
        )
    }

    pub(crate) fn sample_locations_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::SampleLocationsEnable,
            |v| v.sample_locations_enable,
            |p| Some(p.multisample_state().is_some_and(|s| s.sample_locations_enable())),
        )
    }

    pub(crate) fn coverage_to_color_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::CoverageToColorEnable,
            |v| v.coverage_to_color_enable,
            |p| {
                Some(
                    p.multisample_state()
                        .is_some_and(|s| s.coverage_to_color_location.is_some()),
                )
            },
        )
    }

    pub(crate) fn coverage_to_color_location(&self) -> Option<u32> {
        self.effective(
            DynamicState::CoverageToColorLocation,
            |v| v.coverage_to_color_location,
            |p| p.multisample_state().and_then(|s| s.coverage_to_color_location),
        )
    }

    pub(crate) fn coverage_modulation_mode(&self) -> Option<CoverageModulationMode> {
        self.effective(
            DynamicState::CoverageModulationMode,
            |v| v.coverage_modulation_mode,
            |p| p.multisample_state().map(|s| s.coverage_modulation_mode),
        )
    }

    pub(crate) fn coverage_modulation_table_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::CoverageModulationTableEnable,
            |v| v.coverage_modulation_table_enable,
            |p| {
                Some(
                    p.multisample_state()
                        .is_some_and(|s| s.coverage_modulation_table.is_some()),
                )
            },
        )
    }

    pub(crate) fn logic_op_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::LogicOpEnable,
            |v| v.logic_op_enable,
            |p| Some(p.color_blend_state().is_some_and(|s| s.logic_op.is_some())),
        )
    }

    pub(crate) fn discard_rectangle_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::DiscardRectangleEnable,
            |v| v.discard_rectangle_enable,
            |p| Some(p.discard_rectangle_state().is_some()),
        )
    }

    pub(crate) fn viewport_w_scaling_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::ViewportWScalingEnable,
            |v| v.viewport_w_scaling_enable,
            |p| Some(p.viewport_state().is_some_and(|s| s.viewport_w_scaling_enable)),
        )
    }

    pub(crate) fn shading_rate_image_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::ShadingRateImageEnable,
            |v| v.shading_rate_image_enable,
            |p| Some(p.viewport_state().is_some_and(|s| s.shading_rate_image_enable)),
        )
    }

    /// Returns whether any exclusive scissor is enabled.
    pub(crate) fn exclusive_scissor_enable(&self) -> Option<bool> {
        self.effective(
            DynamicState::ExclusiveScissorEnable,
            |v| {
                v.exclusive_scissor_enable.as_ref().map(|enables| {
                    enables.iter().any(|(&index, &enable)| {
                        enable && self.is_index_set(DynamicState::ExclusiveScissorEnable, index)
                    })
                })
            },
            |p| Some(p.viewport_state().is_some_and(|s| !s.exclusive_scissors.is_empty())),
        )
    }

    /// Returns the number of viewports that the draw uses.
    pub(crate) fn viewport_count(&self) -> Option<u32> {
        self.effective(
            DynamicState::ViewportWithCount,
            |v| v.viewport_with_count.as_ref().map(|v| v.len() as u32),
            |p| p.viewport_state().map(|s| s.viewports.len() as u32),
        )
    }

    pub(crate) fn scissor_count(&self) -> Option<u32> {
        self.effective(
            DynamicState::ScissorWithCount,
            |v| v.scissor_with_count.as_ref().map(|v| v.len() as u32),
            |p| p.viewport_state().map(|s| s.scissors.len() as u32),
        )
    }

    pub(crate) fn color_blend_enable(&self, index: u32) -> Option<bool> {
        self.effective_indexed(
            DynamicState::ColorBlendEnable,
            index,
            |v| v.color_blend_enable.as_ref()?.get(&index).copied(),
            |p| {
                p.color_blend_state()?
                    .attachments
                    .get(index as usize)
                    .map(|a| a.blend.is_some())
            },
        )
    }

    pub(crate) fn color_blend_equation(&self, index: u32) -> Option<AttachmentBlend> {
        self.effective_indexed(
            DynamicState::ColorBlendEquation,
            index,
            |v| v.color_blend_equation.as_ref()?.get(&index).copied(),
            |p| p.color_blend_state()?.attachments.get(index as usize)?.blend,
        )
    }

    /// Returns the advanced blend parameters of an attachment. These only exist as dynamic state.
    pub(crate) fn color_blend_advanced(&self, index: u32) -> Option<ColorBlendAdvanced> {
        self.effective_indexed(
            DynamicState::ColorBlendAdvanced,
            index,
            |v| v.color_blend_advanced.as_ref()?.get(&index).copied(),
            |_| None,
        )
    }

    pub(crate) fn color_write_mask(&self, index: u32) -> Option<ColorComponents> {
        self.effective_indexed(
            DynamicState::ColorWriteMask,
            index,
            |v| v.color_write_mask.as_ref()?.get(&index).copied(),
            |p| {
                p.color_blend_state()?
                    .attachments
                    .get(index as usize)
                    .map(|a| a.color_write_mask)
            },
        )
    }

    /// Returns whether any color attachment has blending enabled.
    pub(crate) fn blends(&self) -> bool {
        (0..self.color_attachment_count()).any(|index| self.color_blend_enable(index) == Some(true))
    }

    /// Returns whether the draw produces line primitives when it reaches the rasterizer.
    pub(crate) fn draws_lines(&self) -> bool {
        if self.polygon_mode() == Some(PolygonMode::Line) {
            return true;
        }

        match self.last_pre_rasterization_stage() {
            Some(info) if info.stage != ShaderStage::Vertex => info.outputs_lines(),
            _ => self
                .topology()
                .is_some_and(|topology| topology.class() == PrimitiveTopologyClass::Line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        command_buffer::CommandRecorder,
        diagnostic::DiagnosticCollector,
        pipeline::graphics::{
            input_assembly::InputAssemblyState, rasterization::RasterizationState,
        },
        tests::{full_device, pipeline_with},
    };
    use std::sync::Arc;

    #[test]
    fn static_values_come_from_the_pipeline() {
        let mut recorder = CommandRecorder::new(
            Arc::new(full_device()),
            Arc::new(DiagnosticCollector::new()),
        );
        let pipeline = pipeline_with(
            [DynamicState::CullMode],
            |create_info| {
                create_info.input_assembly_state = Some(InputAssemblyState {
                    topology: PrimitiveTopology::LineList,
                    ..Default::default()
                });
                create_info.rasterization_state = Some(RasterizationState {
                    cull_mode: CullMode::Front,
                    ..Default::default()
                });
            },
        );
        recorder.bind_pipeline_graphics(pipeline).unwrap();

        let view = EffectiveView::resolve(&recorder, PipelineBindPoint::Graphics).unwrap();
        assert_eq!(view.topology(), Some(PrimitiveTopology::LineList));
        assert!(view.draws_lines());
        // Dynamic and not set yet.
        assert_eq!(view.cull_mode(), None);

        recorder.set_cull_mode(CullMode::Back).unwrap();
        let view = EffectiveView::resolve(&recorder, PipelineBindPoint::Graphics).unwrap();
        assert_eq!(view.cull_mode(), Some(CullMode::Back));
    }

    #[test]
    fn values_from_before_the_bind_are_not_effective() {
        let mut recorder = CommandRecorder::new(
            Arc::new(full_device()),
            Arc::new(DiagnosticCollector::new()),
        );
        recorder.set_cull_mode(CullMode::Back).unwrap();
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::CullMode], |_| ()))
            .unwrap();

        let view = EffectiveView::resolve(&recorder, PipelineBindPoint::Graphics).unwrap();
        assert_eq!(view.cull_mode(), None);
        assert_eq!(recorder.tracker().values().cull_mode, Some(CullMode::Back));
    }

    #[test]
    fn attachment_values_from_before_the_bind_are_not_effective() {
        let mut recorder = CommandRecorder::new(
            Arc::new(full_device()),
            Arc::new(DiagnosticCollector::new()),
        );
        let pipeline = pipeline_with([DynamicState::ColorBlendEnable], |_| ());

        recorder.bind_pipeline_graphics(pipeline.clone()).unwrap();
        recorder.set_color_blend_enable(0, [true, true]).unwrap();
        recorder.bind_pipeline_graphics(pipeline).unwrap();
        recorder.set_color_blend_enable(0, [false]).unwrap();

        let view = EffectiveView::resolve(&recorder, PipelineBindPoint::Graphics).unwrap();
        assert_eq!(view.color_blend_enable(0), Some(false));
        assert_eq!(view.color_blend_enable(1), None);
    }

    #[test]
    fn nothing_bound() {
        let recorder = CommandRecorder::new(
            Arc::new(full_device()),
            Arc::new(DiagnosticCollector::new()),
        );
        assert!(EffectiveView::resolve(&recorder, PipelineBindPoint::Graphics).is_none());
    }
}
