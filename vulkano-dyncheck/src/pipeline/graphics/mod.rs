// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! A pipeline that performs graphics processing operations.
//!
//! Unlike a compute pipeline, which performs general-purpose work, a graphics pipeline is geared
//! specifically towards doing graphical processing. To that end, it consists of several shaders,
//! with additional state and glue logic in between.
//!
//! A graphics pipeline performs many separate steps, that execute more or less in sequence.
//! Due to the parallel nature of a GPU, no strict ordering guarantees may exist.
//!
//! Graphics pipelines come in two different forms:
//! - *Primitive shading* graphics pipelines, which contain a vertex shader, vertex input and
//!   input assembly state, and optionally tessellation shaders and/or a geometry shader.
//! - *Mesh shading* graphics pipelines, which contain a mesh shader, and optionally a task shader.
//!
//! Each piece of fixed-function state below can be baked into the pipeline, or left dynamic by
//! listing the matching [`DynamicState`] in
//! [`GraphicsPipelineCreateInfo::dynamic_state`]. Dynamic state must then be set in the command
//! buffer before drawing, which is what the validation in this crate checks.

use self::{
    color_blend::ColorBlendState, depth_stencil::DepthStencilState,
    discard_rectangle::DiscardRectangleState, fragment_shading_rate::FragmentShadingRateState,
    input_assembly::InputAssemblyState, multisample::MultisampleState,
    rasterization::RasterizationState, tessellation::TessellationState,
    vertex_input::VertexInputState, viewport::ViewportState,
};
use crate::{
    device::DeviceCapabilities,
    diagnostic::ObjectHandle,
    macros::impl_id_counter,
    pipeline::{DynamicState, DynamicStateSet},
    shader::{EntryPointInfo, ShaderStage, ShaderStages},
    ValidationError,
};
use smallvec::SmallVec;
use std::{num::NonZero, sync::Arc};

pub mod color_blend;
pub mod depth_stencil;
pub mod discard_rectangle;
pub mod fragment_shading_rate;
pub mod input_assembly;
pub mod multisample;
pub mod rasterization;
pub mod tessellation;
pub mod vertex_input;
pub mod viewport;

/// Defines how the implementation should perform a draw operation.
///
/// This object contains the shaders and the various fixed states that describe how the
/// implementation should perform the various operations needed by a draw command.
#[derive(Debug)]
pub struct GraphicsPipeline {
    id: NonZero<u64>,

    stages: SmallVec<[EntryPointInfo; 5]>,
    vertex_input_state: Option<VertexInputState>,
    input_assembly_state: Option<InputAssemblyState>,
    tessellation_state: Option<TessellationState>,
    viewport_state: Option<ViewportState>,
    rasterization_state: Option<RasterizationState>,
    multisample_state: Option<MultisampleState>,
    depth_stencil_state: Option<DepthStencilState>,
    color_blend_state: Option<ColorBlendState>,
    discard_rectangle_state: Option<DiscardRectangleState>,
    fragment_shading_rate_state: Option<FragmentShadingRateState>,
    dynamic_state: DynamicStateSet,
}

impl GraphicsPipeline {
    /// Creates a new `GraphicsPipeline`.
    pub fn new(
        device: &DeviceCapabilities,
        create_info: GraphicsPipelineCreateInfo,
    ) -> Result<Arc<GraphicsPipeline>, Box<ValidationError>> {
        create_info
            .validate(device)
            .map_err(|err| err.add_context("create_info"))?;

        let GraphicsPipelineCreateInfo {
            stages,
            vertex_input_state,
            input_assembly_state,
            tessellation_state,
            viewport_state,
            rasterization_state,
            multisample_state,
            depth_stencil_state,
            color_blend_state,
            discard_rectangle_state,
            fragment_shading_rate_state,
            dynamic_state,
            _ne: _,
        } = create_info;

        Ok(Arc::new(GraphicsPipeline {
            id: Self::next_id(),
            stages,
            vertex_input_state,
            input_assembly_state,
            tessellation_state,
            viewport_state,
            rasterization_state,
            multisample_state,
            depth_stencil_state,
            color_blend_state,
            discard_rectangle_state,
            fragment_shading_rate_state,
            dynamic_state,
        }))
    }

    /// Returns the reflection data of the shader stages.
    #[inline]
    pub fn stages(&self) -> &[EntryPointInfo] {
        &self.stages
    }

    /// Returns the reflection data of a particular stage.
    ///
    /// `None` is returned if the pipeline does not contain this stage.
    #[inline]
    pub fn stage(&self, stage: ShaderStage) -> Option<&EntryPointInfo> {
        self.stages.iter().find(|info| info.stage == stage)
    }

    /// Returns the set of stages that the pipeline contains.
    #[inline]
    pub fn shader_stages(&self) -> ShaderStages {
        self.stages.iter().map(|info| info.stage).collect()
    }

    /// Returns the last stage before rasterization, if any.
    pub fn last_pre_rasterization_stage(&self) -> Option<&EntryPointInfo> {
        [
            ShaderStage::Mesh,
            ShaderStage::Geometry,
            ShaderStage::TessellationEvaluation,
            ShaderStage::Vertex,
        ]
        .into_iter()
        .find_map(|stage| self.stage(stage))
    }

    /// Returns the vertex input state used to create this pipeline.
    #[inline]
    pub fn vertex_input_state(&self) -> Option<&VertexInputState> {
        self.vertex_input_state.as_ref()
    }

    /// Returns the input assembly state used to create this pipeline.
    #[inline]
    pub fn input_assembly_state(&self) -> Option<&InputAssemblyState> {
        self.input_assembly_state.as_ref()
    }

    /// Returns the tessellation state used to create this pipeline.
    #[inline]
    pub fn tessellation_state(&self) -> Option<&TessellationState> {
        self.tessellation_state.as_ref()
    }

    /// Returns the viewport state used to create this pipeline.
    #[inline]
    pub fn viewport_state(&self) -> Option<&ViewportState> {
        self.viewport_state.as_ref()
    }

    /// Returns the rasterization state used to create this pipeline.
    #[inline]
    pub fn rasterization_state(&self) -> Option<&RasterizationState> {
        self.rasterization_state.as_ref()
    }

    /// Returns the multisample state used to create this pipeline.
    #[inline]
    pub fn multisample_state(&self) -> Option<&MultisampleState> {
        self.multisample_state.as_ref()
    }

    /// Returns the depth/stencil state used to create this pipeline.
    #[inline]
    pub fn depth_stencil_state(&self) -> Option<&DepthStencilState> {
        self.depth_stencil_state.as_ref()
    }

    /// Returns the color blend state used to create this pipeline.
    #[inline]
    pub fn color_blend_state(&self) -> Option<&ColorBlendState> {
        self.color_blend_state.as_ref()
    }

    /// Returns the discard rectangle state used to create this pipeline.
    #[inline]
    pub fn discard_rectangle_state(&self) -> Option<&DiscardRectangleState> {
        self.discard_rectangle_state.as_ref()
    }

    /// Returns the fragment shading rate state used to create this pipeline.
    #[inline]
    pub fn fragment_shading_rate_state(&self) -> Option<&FragmentShadingRateState> {
        self.fragment_shading_rate_state.as_ref()
    }

    /// Returns the states that are dynamic in this pipeline.
    #[inline]
    pub fn dynamic_state(&self) -> &DynamicStateSet {
        &self.dynamic_state
    }

    /// Returns whether `state` is dynamic in this pipeline.
    #[inline]
    pub fn is_dynamic(&self, state: DynamicState) -> bool {
        self.dynamic_state.contains(state)
    }

    /// Returns the number of color attachments that the color blend state describes.
    #[inline]
    pub fn color_attachment_count(&self) -> u32 {
        self.color_blend_state
            .as_ref()
            .map_or(0, |state| state.attachments.len() as u32)
    }

    /// Returns the handle that diagnostics use to refer to the pipeline.
    #[inline]
    pub fn object_handle(&self) -> ObjectHandle {
        ObjectHandle::new(ash::vk::ObjectType::PIPELINE, self.id.get())
    }
}

impl_id_counter!(GraphicsPipeline);

/// Parameters to create a new `GraphicsPipeline`.
#[derive(Clone, Debug)]
pub struct GraphicsPipelineCreateInfo {
    /// The reflection data of the shader stages to use.
    ///
    /// Each stage may appear at most once.
    ///
    /// The default value is empty.
    pub stages: SmallVec<[EntryPointInfo; 5]>,

    /// The vertex input state.
    ///
    /// The default value is `None`.
    pub vertex_input_state: Option<VertexInputState>,

    /// The input assembly state.
    ///
    /// The default value is `None`.
    pub input_assembly_state: Option<InputAssemblyState>,

    /// The tessellation state.
    ///
    /// The default value is `None`.
    pub tessellation_state: Option<TessellationState>,

    /// The viewport state.
    ///
    /// The default value is `None`.
    pub viewport_state: Option<ViewportState>,

    /// The rasterization state.
    ///
    /// The default value is `None`.
    pub rasterization_state: Option<RasterizationState>,

    /// The multisample state.
    ///
    /// The default value is `None`.
    pub multisample_state: Option<MultisampleState>,

    /// The depth/stencil state.
    ///
    /// The default value is `None`.
    pub depth_stencil_state: Option<DepthStencilState>,

    /// The color blend state.
    ///
    /// The default value is `None`.
    pub color_blend_state: Option<ColorBlendState>,

    /// The discard rectangle state.
    ///
    /// If this is `Some`, the
    /// [`ext_discard_rectangles`](crate::device::DeviceExtensions::ext_discard_rectangles)
    /// extension must be enabled on the device.
    ///
    /// The default value is `None`.
    pub discard_rectangle_state: Option<DiscardRectangleState>,

    /// The fragment shading rate state.
    ///
    /// The default value is `None`.
    pub fragment_shading_rate_state: Option<FragmentShadingRateState>,

    /// The state that must be set dynamically in the command buffer instead of being baked in.
    ///
    /// The default value is empty.
    pub dynamic_state: DynamicStateSet,

    pub _ne: crate::NonExhaustive,
}

impl Default for GraphicsPipelineCreateInfo {
    #[inline]
    fn default() -> Self {
        Self {
            stages: SmallVec::new(),
            vertex_input_state: None,
            input_assembly_state: None,
            tessellation_state: None,
            viewport_state: None,
            rasterization_state: None,
            multisample_state: None,
            depth_stencil_state: None,
            color_blend_state: None,
            discard_rectangle_state: None,
            fragment_shading_rate_state: None,
            dynamic_state: DynamicStateSet::empty(),
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl GraphicsPipelineCreateInfo {
    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let Self {
            stages,
            vertex_input_state,
            input_assembly_state,
            tessellation_state,
            viewport_state,
            rasterization_state,
            multisample_state,
            depth_stencil_state,
            color_blend_state,
            discard_rectangle_state,
            fragment_shading_rate_state,
            dynamic_state,
            _ne: _,
        } = self;

        let mut stages_present = ShaderStages::empty();

        for (stage_index, info) in stages.iter().enumerate() {
            info.stage.validate_device(device).map_err(|err| {
                err.add_context(format!("stages[{}].stage", stage_index))
                    .set_vuids(&["VUID-VkPipelineShaderStageCreateInfo-stage-parameter"])
            })?;

            if !info.stage.is_graphics() {
                return Err(Box::new(ValidationError {
                    context: format!("stages[{}].stage", stage_index).into(),
                    problem: "is not a graphics stage".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-stage-06897"],
                    ..Default::default()
                }));
            }

            if stages_present.contains_enum(info.stage) {
                return Err(Box::new(ValidationError {
                    context: "stages".into(),
                    problem: format!(
                        "contains more than one element whose stage is `ShaderStage::{:?}`",
                        info.stage,
                    )
                    .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-stage-06897"],
                    ..Default::default()
                }));
            }

            stages_present |= info.stage.into();
        }

        for state in dynamic_state.iter() {
            if !state.is_supported(device) {
                return Err(Box::new(ValidationError {
                    context: "dynamic_state".into(),
                    problem: format!("contains `DynamicState::{:?}`", state).into(),
                    requires_one_of: state.requires_one_of(),
                    vuids: &["VUID-VkPipelineDynamicStateCreateInfo-pDynamicStates-parameter"],
                    ..Default::default()
                }));
            }
        }

        if dynamic_state.contains(DynamicState::Viewport)
            && dynamic_state.contains(DynamicState::ViewportWithCount)
        {
            return Err(Box::new(ValidationError {
                context: "dynamic_state".into(),
                problem: "contains both `DynamicState::Viewport` and \
                    `DynamicState::ViewportWithCount`"
                    .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04132"],
                ..Default::default()
            }));
        }

        if dynamic_state.contains(DynamicState::Scissor)
            && dynamic_state.contains(DynamicState::ScissorWithCount)
        {
            return Err(Box::new(ValidationError {
                context: "dynamic_state".into(),
                problem: "contains both `DynamicState::Scissor` and \
                    `DynamicState::ScissorWithCount`"
                    .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04133"],
                ..Default::default()
            }));
        }

        if let Some(vertex_input_state) = vertex_input_state {
            if !dynamic_state.contains(DynamicState::VertexInput) {
                vertex_input_state
                    .validate(device)
                    .map_err(|err| err.add_context("vertex_input_state"))?;
            }
        }

        if let Some(input_assembly_state) = input_assembly_state {
            input_assembly_state
                .validate(device)
                .map_err(|err| err.add_context("input_assembly_state"))?;
        }

        if let Some(tessellation_state) = tessellation_state {
            tessellation_state
                .validate(device)
                .map_err(|err| err.add_context("tessellation_state"))?;
        }

        if let Some(viewport_state) = viewport_state {
            viewport_state
                .validate(device)
                .map_err(|err| err.add_context("viewport_state"))?;

            let viewport_with_count = dynamic_state.contains(DynamicState::ViewportWithCount);
            let scissor_with_count = dynamic_state.contains(DynamicState::ScissorWithCount);

            if viewport_with_count && !viewport_state.viewports.is_empty() {
                return Err(Box::new(ValidationError {
                    problem: "`dynamic_state` contains `DynamicState::ViewportWithCount`, but \
                        `viewport_state.viewports` is not empty"
                        .into(),
                    vuids: &["VUID-VkPipelineViewportStateCreateInfo-viewportCount-04135"],
                    ..Default::default()
                }));
            }

            if scissor_with_count && !viewport_state.scissors.is_empty() {
                return Err(Box::new(ValidationError {
                    problem: "`dynamic_state` contains `DynamicState::ScissorWithCount`, but \
                        `viewport_state.scissors` is not empty"
                        .into(),
                    vuids: &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-04136"],
                    ..Default::default()
                }));
            }

            if !viewport_with_count
                && !scissor_with_count
                && viewport_state.viewports.len() != viewport_state.scissors.len()
            {
                return Err(Box::new(ValidationError {
                    context: "viewport_state".into(),
                    problem: "the length of `viewports` and the length of `scissors` are not \
                        equal"
                        .into(),
                    vuids: &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-04134"],
                    ..Default::default()
                }));
            }
        }

        if let Some(rasterization_state) = rasterization_state {
            rasterization_state
                .validate(device)
                .map_err(|err| err.add_context("rasterization_state"))?;
        }

        if let Some(multisample_state) = multisample_state {
            multisample_state
                .validate(device)
                .map_err(|err| err.add_context("multisample_state"))?;
        }

        if let Some(depth_stencil_state) = depth_stencil_state {
            depth_stencil_state
                .validate(device)
                .map_err(|err| err.add_context("depth_stencil_state"))?;
        }

        if let Some(color_blend_state) = color_blend_state {
            color_blend_state
                .validate(device)
                .map_err(|err| err.add_context("color_blend_state"))?;
        }

        if let Some(discard_rectangle_state) = discard_rectangle_state {
            discard_rectangle_state
                .validate(device)
                .map_err(|err| err.add_context("discard_rectangle_state"))?;
        }

        if let Some(fragment_shading_rate_state) = fragment_shading_rate_state {
            fragment_shading_rate_state
                .validate(device)
                .map_err(|err| err.add_context("fragment_shading_rate_state"))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::full_device;

    #[test]
    fn unsupported_dynamic_state() {
        let create_info = GraphicsPipelineCreateInfo {
            dynamic_state: [DynamicState::CullMode].into(),
            ..Default::default()
        };

        let err = GraphicsPipeline::new(&DeviceCapabilities::default(), create_info.clone())
            .unwrap_err();
        assert_eq!(err.context, "create_info.dynamic_state");
        assert!(!err.requires_one_of.is_empty());

        assert!(GraphicsPipeline::new(&full_device(), create_info).is_ok());
    }

    #[test]
    fn viewport_with_count_exclusive() {
        let create_info = GraphicsPipelineCreateInfo {
            dynamic_state: [DynamicState::Viewport, DynamicState::ViewportWithCount].into(),
            ..Default::default()
        };
        let err = GraphicsPipeline::new(&full_device(), create_info).unwrap_err();
        assert_eq!(
            err.vuids,
            ["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04132"],
        );

        let create_info = GraphicsPipelineCreateInfo {
            dynamic_state: [DynamicState::Scissor, DynamicState::ScissorWithCount].into(),
            ..Default::default()
        };
        let err = GraphicsPipeline::new(&full_device(), create_info).unwrap_err();
        assert_eq!(
            err.vuids,
            ["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04133"],
        );
    }

    #[test]
    fn viewport_scissor_count_mismatch() {
        let mut viewport_state = ViewportState::with_count(2);
        viewport_state.scissors.pop();

        let create_info = GraphicsPipelineCreateInfo {
            viewport_state: Some(viewport_state),
            ..Default::default()
        };
        let err = GraphicsPipeline::new(&full_device(), create_info).unwrap_err();
        assert_eq!(
            err.vuids,
            ["VUID-VkPipelineViewportStateCreateInfo-scissorCount-04134"],
        );
    }

    #[test]
    fn duplicate_stage() {
        let create_info = GraphicsPipelineCreateInfo {
            stages: [
                EntryPointInfo::new(ShaderStage::Vertex),
                EntryPointInfo::new(ShaderStage::Vertex),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        assert!(GraphicsPipeline::new(&full_device(), create_info).is_err());
    }

    #[test]
    fn ids() {
        let a = GraphicsPipeline::new(&full_device(), Default::default()).unwrap();
        let b = GraphicsPipeline::new(&full_device(), Default::default()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.object_handle().object_type, ash::vk::ObjectType::PIPELINE);
    }
}
