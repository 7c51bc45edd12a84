// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use crate::{
    command_buffer::{CommandRecorder, DynamicStateValue, SampleMask, StencilFaceValues},
    image::{ImageAspects, SampleCount},
    pipeline::{
        graphics::{
            color_blend::{
                AttachmentBlend, BlendFactor, BlendOverlap, ColorBlendAdvanced, ColorComponents,
                LogicOp,
            },
            depth_stencil::{CompareOp, StencilFaces, StencilOps},
            discard_rectangle::DiscardRectangleMode,
            fragment_shading_rate::{
                FragmentShadingRateCombinerOp, FragmentShadingRateState, FragmentShadingRateVuids,
            },
            input_assembly::PrimitiveTopology,
            multisample::{CoverageModulationMode, CoverageReductionMode, SampleLocationsInfo},
            rasterization::{
                ConservativeRasterizationMode, CullMode, DepthBiasState, FrontFace,
                LineRasterizationMode, LineStipple, PolygonMode, ProvokingVertexMode,
            },
            tessellation::TessellationDomainOrigin,
            vertex_input::VertexInputState,
            viewport::{
                CoarseSampleOrder, Scissor, ShadingRatePalette, Viewport, ViewportSwizzle,
                ViewportWScaling,
            },
        },
        DynamicState,
    },
    Requires, RequiresAllOf, RequiresOneOf, ValidationError,
};
use foldhash::HashMap;
use smallvec::SmallVec;
use std::ops::RangeInclusive;

/// Numbers `values` consecutively, starting at `first`. Values past `u32::MAX` are dropped.
fn indexed<T>(first: u32, values: impl IntoIterator<Item = T>) -> HashMap<u32, T> {
    values
        .into_iter()
        .enumerate()
        .map_while(|(offset, value)| {
            let index = u32::try_from(offset).ok().and_then(|o| first.checked_add(o))?;
            Some((index, value))
        })
        .collect()
}

/// Returns whether `first..first + count` reaches past `limit`.
fn exceeds_limit(first: u32, count: usize, limit: u32) -> bool {
    u64::from(first) + count as u64 > u64::from(limit)
}

fn stencil_faces<T: Copy>(faces: StencilFaces, value: T) -> StencilFaceValues<T> {
    StencilFaceValues {
        front: faces.intersects(StencilFaces::FRONT).then_some(value),
        back: faces.intersects(StencilFaces::BACK).then_some(value),
    }
}

// Setters whose only requirement is that the state is supported by the device.
macro_rules! gated_setters {
    {
        $(
            $(#[doc = $doc:literal])*
            $state:ident => $set:ident, $set_unchecked:ident($arg:ident: $ty:ty);
        )+
    } => {
        impl CommandRecorder {
            $(
                $(#[doc = $doc])*
                pub fn $set(&mut self, $arg: $ty) -> Result<&mut Self, Box<ValidationError>> {
                    self.validate_dynamic_state_supported(DynamicState::$state)
                        .map_err(|err| {
                            self.recording_error(DynamicState::$state.command(), err)
                        })?;

                    Ok(self.$set_unchecked($arg))
                }

                #[doc = concat!(
                    "Same as [`", stringify!($set), "`](Self::", stringify!($set),
                    "), but without checking the arguments."
                )]
                #[inline]
                pub fn $set_unchecked(&mut self, $arg: $ty) -> &mut Self {
                    self.tracker.mark_set(DynamicStateValue::$state($arg));
                    self
                }
            )+
        }
    };
}

gated_setters! {
    /// Sets the dynamic blend constants for future draw calls.
    BlendConstants => set_blend_constants, set_blend_constants_unchecked(constants: [f32; 4]);

    /// Sets the dynamic cull mode for future draw calls.
    CullMode => set_cull_mode, set_cull_mode_unchecked(cull_mode: CullMode);

    /// Sets the dynamic front face for future draw calls.
    FrontFace => set_front_face, set_front_face_unchecked(face: FrontFace);

    /// Sets whether dynamic depth testing is enabled for future draw calls.
    DepthTestEnable => set_depth_test_enable, set_depth_test_enable_unchecked(enable: bool);

    /// Sets whether dynamic depth writes are enabled for future draw calls.
    DepthWriteEnable => set_depth_write_enable, set_depth_write_enable_unchecked(enable: bool);

    /// Sets the dynamic depth compare op for future draw calls.
    DepthCompareOp => set_depth_compare_op, set_depth_compare_op_unchecked(compare_op: CompareOp);

    /// Sets whether dynamic depth bounds testing is enabled for future draw calls.
    DepthBoundsTestEnable => set_depth_bounds_test_enable,
        set_depth_bounds_test_enable_unchecked(enable: bool);

    /// Sets whether dynamic stencil testing is enabled for future draw calls.
    StencilTestEnable => set_stencil_test_enable, set_stencil_test_enable_unchecked(enable: bool);

    /// Sets whether dynamic rasterizer discard is enabled for future draw calls.
    RasterizerDiscardEnable => set_rasterizer_discard_enable,
        set_rasterizer_discard_enable_unchecked(enable: bool);

    /// Sets whether dynamic depth bias is enabled for future draw calls.
    DepthBiasEnable => set_depth_bias_enable, set_depth_bias_enable_unchecked(enable: bool);

    /// Sets whether dynamic primitive restart is enabled for future draw calls.
    PrimitiveRestartEnable => set_primitive_restart_enable,
        set_primitive_restart_enable_unchecked(enable: bool);

    DiscardRectangleEnable => set_discard_rectangle_enable,
        set_discard_rectangle_enable_unchecked(enable: bool);

    DiscardRectangleMode => set_discard_rectangle_mode,
        set_discard_rectangle_mode_unchecked(mode: DiscardRectangleMode);

    /// Sets the dynamic ray tracing pipeline stack size for future trace calls.
    RayTracingPipelineStackSize => set_ray_tracing_pipeline_stack_size,
        set_ray_tracing_pipeline_stack_size_unchecked(stack_size: u32);

    /// Sets the dynamic logic op for future draw calls.
    LogicOp => set_logic_op, set_logic_op_unchecked(logic_op: LogicOp);

    TessellationDomainOrigin => set_tessellation_domain_origin,
        set_tessellation_domain_origin_unchecked(domain_origin: TessellationDomainOrigin);

    /// Sets the dynamic rasterization sample count for future draw calls.
    RasterizationSamples => set_rasterization_samples,
        set_rasterization_samples_unchecked(samples: SampleCount);

    AlphaToCoverageEnable => set_alpha_to_coverage_enable,
        set_alpha_to_coverage_enable_unchecked(enable: bool);

    ConservativeRasterizationMode => set_conservative_rasterization_mode,
        set_conservative_rasterization_mode_unchecked(mode: ConservativeRasterizationMode);

    SampleLocationsEnable => set_sample_locations_enable,
        set_sample_locations_enable_unchecked(enable: bool);

    LineStippleEnable => set_line_stipple_enable, set_line_stipple_enable_unchecked(enable: bool);

    ViewportWScalingEnable => set_viewport_w_scaling_enable,
        set_viewport_w_scaling_enable_unchecked(enable: bool);

    CoverageToColorEnable => set_coverage_to_color_enable,
        set_coverage_to_color_enable_unchecked(enable: bool);

    /// Sets the dynamic fragment output location that coverage is written to.
    CoverageToColorLocation => set_coverage_to_color_location,
        set_coverage_to_color_location_unchecked(location: u32);

    CoverageModulationMode => set_coverage_modulation_mode,
        set_coverage_modulation_mode_unchecked(mode: CoverageModulationMode);

    CoverageModulationTableEnable => set_coverage_modulation_table_enable,
        set_coverage_modulation_table_enable_unchecked(enable: bool);

    CoverageModulationTable => set_coverage_modulation_table,
        set_coverage_modulation_table_unchecked(table: Vec<f32>);

    ShadingRateImageEnable => set_shading_rate_image_enable,
        set_shading_rate_image_enable_unchecked(enable: bool);

    RepresentativeFragmentTestEnable => set_representative_fragment_test_enable,
        set_representative_fragment_test_enable_unchecked(enable: bool);

    CoverageReductionMode => set_coverage_reduction_mode,
        set_coverage_reduction_mode_unchecked(mode: CoverageReductionMode);
}

impl CommandRecorder {
    /// Sets the dynamic viewports for future draw calls.
    ///
    /// `viewports[i]` is stored at index `first_viewport + i`. Viewports set by earlier calls at
    /// other indices are kept.
    pub fn set_viewport(
        &mut self,
        first_viewport: u32,
        viewports: impl IntoIterator<Item = Viewport>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        let viewports: SmallVec<[Viewport; 2]> = viewports.into_iter().collect();
        self.validate_set_viewport(first_viewport, &viewports)
            .map_err(|err| self.recording_error("vkCmdSetViewport", err))?;

        Ok(self.set_viewport_unchecked(first_viewport, viewports))
    }

    fn validate_set_viewport(
        &self,
        first_viewport: u32,
        viewports: &[Viewport],
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::Viewport)?;

        if self.inherited_viewport_depth_count.is_some() {
            return Err(Box::new(ValidationError {
                problem: "the command buffer inherits its viewport and scissor state".into(),
                vuids: &["VUID-vkCmdSetViewport-commandBuffer-04821"],
                ..Default::default()
            }));
        }

        if viewports.is_empty() {
            return Err(Box::new(ValidationError {
                context: "viewports".into(),
                problem: "is empty".into(),
                vuids: &["VUID-vkCmdSetViewport-viewportCount-arraylength"],
                ..Default::default()
            }));
        }

        let properties = &self.device.properties;

        if exceeds_limit(first_viewport, viewports.len(), properties.max_viewports) {
            return Err(Box::new(ValidationError {
                problem: "`first_viewport + viewports.len()` exceeds the `max_viewports` limit"
                    .into(),
                vuids: &["VUID-vkCmdSetViewport-firstViewport-01223"],
                ..Default::default()
            }));
        }

        if !self.device.enabled_features.multi_viewport {
            if first_viewport != 0 {
                return Err(Box::new(ValidationError {
                    context: "first_viewport".into(),
                    problem: "is not 0".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "multi_viewport",
                    )])]),
                    vuids: &["VUID-vkCmdSetViewport-firstViewport-01224"],
                }));
            }

            if viewports.len() > 1 {
                return Err(Box::new(ValidationError {
                    context: "viewports".into(),
                    problem: "the length is greater than 1".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "multi_viewport",
                    )])]),
                    vuids: &["VUID-vkCmdSetViewport-viewportCount-01225"],
                }));
            }
        }

        for (index, viewport) in viewports.iter().enumerate() {
            viewport
                .validate(&self.device)
                .map_err(|err| err.add_context(format!("viewports[{}]", index)))?;
        }

        Ok(())
    }

    #[inline]
    pub fn set_viewport_unchecked(
        &mut self,
        first_viewport: u32,
        viewports: impl IntoIterator<Item = Viewport>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::Viewport(indexed(first_viewport, viewports)));
        self
    }

    /// Sets the dynamic scissors for future draw calls.
    pub fn set_scissor(
        &mut self,
        first_scissor: u32,
        scissors: impl IntoIterator<Item = Scissor>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        let scissors: SmallVec<[Scissor; 2]> = scissors.into_iter().collect();
        self.validate_set_scissor(first_scissor, &scissors)
            .map_err(|err| self.recording_error("vkCmdSetScissor", err))?;

        Ok(self.set_scissor_unchecked(first_scissor, scissors))
    }

    fn validate_set_scissor(
        &self,
        first_scissor: u32,
        scissors: &[Scissor],
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::Scissor)?;

        if self.inherited_viewport_depth_count.is_some() {
            return Err(Box::new(ValidationError {
                problem: "the command buffer inherits its viewport and scissor state".into(),
                vuids: &["VUID-vkCmdSetScissor-viewportScissor2D-04789"],
                ..Default::default()
            }));
        }

        if scissors.is_empty() {
            return Err(Box::new(ValidationError {
                context: "scissors".into(),
                problem: "is empty".into(),
                vuids: &["VUID-vkCmdSetScissor-scissorCount-arraylength"],
                ..Default::default()
            }));
        }

        if exceeds_limit(first_scissor, scissors.len(), self.device.properties.max_viewports) {
            return Err(Box::new(ValidationError {
                problem: "`first_scissor + scissors.len()` exceeds the `max_viewports` limit"
                    .into(),
                vuids: &["VUID-vkCmdSetScissor-firstScissor-00592"],
                ..Default::default()
            }));
        }

        if !self.device.enabled_features.multi_viewport {
            if first_scissor != 0 {
                return Err(Box::new(ValidationError {
                    context: "first_scissor".into(),
                    problem: "is not 0".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "multi_viewport",
                    )])]),
                    vuids: &["VUID-vkCmdSetScissor-firstScissor-00593"],
                }));
            }

            if scissors.len() > 1 {
                return Err(Box::new(ValidationError {
                    context: "scissors".into(),
                    problem: "the length is greater than 1".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "multi_viewport",
                    )])]),
                    vuids: &["VUID-vkCmdSetScissor-scissorCount-00594"],
                }));
            }
        }

        for (index, scissor) in scissors.iter().enumerate() {
            if scissor.offset[0] < 0 || scissor.offset[1] < 0 {
                return Err(Box::new(ValidationError {
                    context: format!("scissors[{}].offset", index).into(),
                    problem: "is negative".into(),
                    vuids: &["VUID-vkCmdSetScissor-x-00595"],
                    ..Default::default()
                }));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn set_scissor_unchecked(
        &mut self,
        first_scissor: u32,
        scissors: impl IntoIterator<Item = Scissor>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::Scissor(indexed(first_scissor, scissors)));
        self
    }

    /// Sets the dynamic line width for future draw calls.
    pub fn set_line_width(&mut self, line_width: f32) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_line_width(line_width)
            .map_err(|err| self.recording_error("vkCmdSetLineWidth", err))?;

        Ok(self.set_line_width_unchecked(line_width))
    }

    fn validate_set_line_width(&self, line_width: f32) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::LineWidth)?;

        if line_width != 1.0 && !self.device.enabled_features.wide_lines {
            return Err(Box::new(ValidationError {
                context: "line_width".into(),
                problem: "is not 1.0".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "wide_lines",
                )])]),
                vuids: &["VUID-vkCmdSetLineWidth-lineWidth-00788"],
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_line_width_unchecked(&mut self, line_width: f32) -> &mut Self {
        self.tracker.mark_set(DynamicStateValue::LineWidth(line_width));
        self
    }

    /// Sets the dynamic depth bias values for future draw calls.
    pub fn set_depth_bias(
        &mut self,
        constant_factor: f32,
        clamp: f32,
        slope_factor: f32,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_depth_bias(constant_factor, clamp, slope_factor)
            .map_err(|err| self.recording_error("vkCmdSetDepthBias", err))?;

        Ok(self.set_depth_bias_unchecked(constant_factor, clamp, slope_factor))
    }

    fn validate_set_depth_bias(
        &self,
        _constant_factor: f32,
        clamp: f32,
        _slope_factor: f32,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::DepthBias)?;

        if clamp != 0.0 && !self.device.enabled_features.depth_bias_clamp {
            return Err(Box::new(ValidationError {
                context: "clamp".into(),
                problem: "is not 0.0".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "depth_bias_clamp",
                )])]),
                vuids: &["VUID-vkCmdSetDepthBias-depthBiasClamp-00790"],
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_depth_bias_unchecked(
        &mut self,
        constant_factor: f32,
        clamp: f32,
        slope_factor: f32,
    ) -> &mut Self {
        self.tracker.mark_set(DynamicStateValue::DepthBias(DepthBiasState {
            constant_factor,
            clamp,
            slope_factor,
        }));
        self
    }

    /// Sets the dynamic depth bounds for future draw calls.
    pub fn set_depth_bounds(
        &mut self,
        bounds: RangeInclusive<f32>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_depth_bounds(&bounds)
            .map_err(|err| self.recording_error("vkCmdSetDepthBounds", err))?;

        Ok(self.set_depth_bounds_unchecked(bounds))
    }

    fn validate_set_depth_bounds(
        &self,
        bounds: &RangeInclusive<f32>,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::DepthBounds)?;

        if !self.device.enabled_extensions.ext_depth_range_unrestricted {
            if !(0.0..=1.0).contains(bounds.start()) {
                return Err(Box::new(ValidationError {
                    context: "bounds.start".into(),
                    problem: "is not between 0.0 and 1.0 inclusive".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_depth_range_unrestricted"),
                    ])]),
                    vuids: &["VUID-vkCmdSetDepthBounds-minDepthBounds-00600"],
                }));
            }

            if !(0.0..=1.0).contains(bounds.end()) {
                return Err(Box::new(ValidationError {
                    context: "bounds.end".into(),
                    problem: "is not between 0.0 and 1.0 inclusive".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_depth_range_unrestricted"),
                    ])]),
                    vuids: &["VUID-vkCmdSetDepthBounds-maxDepthBounds-00601"],
                }));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn set_depth_bounds_unchecked(&mut self, bounds: RangeInclusive<f32>) -> &mut Self {
        self.tracker.mark_set(DynamicStateValue::DepthBounds(bounds));
        self
    }

    /// Sets the dynamic stencil compare mask on one or both faces for future draw calls.
    pub fn set_stencil_compare_mask(
        &mut self,
        faces: StencilFaces,
        compare_mask: u32,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_stencil_faces(DynamicState::StencilCompareMask, faces)
            .map_err(|err| self.recording_error("vkCmdSetStencilCompareMask", err))?;

        Ok(self.set_stencil_compare_mask_unchecked(faces, compare_mask))
    }

    #[inline]
    pub fn set_stencil_compare_mask_unchecked(
        &mut self,
        faces: StencilFaces,
        compare_mask: u32,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::StencilCompareMask(stencil_faces(
                faces,
                compare_mask,
            )));
        self
    }

    /// Sets the dynamic stencil write mask on one or both faces for future draw calls.
    pub fn set_stencil_write_mask(
        &mut self,
        faces: StencilFaces,
        write_mask: u32,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_stencil_faces(DynamicState::StencilWriteMask, faces)
            .map_err(|err| self.recording_error("vkCmdSetStencilWriteMask", err))?;

        Ok(self.set_stencil_write_mask_unchecked(faces, write_mask))
    }

    #[inline]
    pub fn set_stencil_write_mask_unchecked(
        &mut self,
        faces: StencilFaces,
        write_mask: u32,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::StencilWriteMask(stencil_faces(
                faces, write_mask,
            )));
        self
    }

    /// Sets the dynamic stencil reference on one or both faces for future draw calls.
    pub fn set_stencil_reference(
        &mut self,
        faces: StencilFaces,
        reference: u32,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_stencil_faces(DynamicState::StencilReference, faces)
            .map_err(|err| self.recording_error("vkCmdSetStencilReference", err))?;

        Ok(self.set_stencil_reference_unchecked(faces, reference))
    }

    #[inline]
    pub fn set_stencil_reference_unchecked(
        &mut self,
        faces: StencilFaces,
        reference: u32,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::StencilReference(stencil_faces(
                faces, reference,
            )));
        self
    }

    /// Sets the dynamic stencil ops on one or both faces for future draw calls.
    pub fn set_stencil_op(
        &mut self,
        faces: StencilFaces,
        ops: StencilOps,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_stencil_op(faces, ops)
            .map_err(|err| self.recording_error("vkCmdSetStencilOp", err))?;

        Ok(self.set_stencil_op_unchecked(faces, ops))
    }

    fn validate_set_stencil_op(
        &self,
        faces: StencilFaces,
        ops: StencilOps,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_stencil_faces(DynamicState::StencilOp, faces)?;
        ops.validate(&self.device)
            .map_err(|err| err.add_context("ops"))?;

        Ok(())
    }

    #[inline]
    pub fn set_stencil_op_unchecked(&mut self, faces: StencilFaces, ops: StencilOps) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::StencilOp(stencil_faces(faces, ops)));
        self
    }

    fn validate_stencil_faces(
        &self,
        state: DynamicState,
        faces: StencilFaces,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(state)?;

        if faces.is_empty() {
            return Err(Box::new(ValidationError {
                context: "faces".into(),
                problem: "is empty".into(),
                vuids: match state {
                    DynamicState::StencilCompareMask => {
                        &["VUID-vkCmdSetStencilCompareMask-faceMask-requiredbitmask"]
                    }
                    DynamicState::StencilWriteMask => {
                        &["VUID-vkCmdSetStencilWriteMask-faceMask-requiredbitmask"]
                    }
                    DynamicState::StencilReference => {
                        &["VUID-vkCmdSetStencilReference-faceMask-requiredbitmask"]
                    }
                    _ => &["VUID-vkCmdSetStencilOp-faceMask-requiredbitmask"],
                },
                ..Default::default()
            }));
        }

        Ok(())
    }

    /// Sets the dynamic primitive topology for future draw calls.
    pub fn set_primitive_topology(
        &mut self,
        topology: PrimitiveTopology,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_primitive_topology(topology)
            .map_err(|err| self.recording_error("vkCmdSetPrimitiveTopology", err))?;

        Ok(self.set_primitive_topology_unchecked(topology))
    }

    fn validate_set_primitive_topology(
        &self,
        topology: PrimitiveTopology,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::PrimitiveTopology)?;

        topology.validate_device(&self.device).map_err(|err| {
            err.add_context("topology")
                .set_vuids(&["VUID-vkCmdSetPrimitiveTopology-primitiveTopology-parameter"])
        })?;

        Ok(())
    }

    #[inline]
    pub fn set_primitive_topology_unchecked(&mut self, topology: PrimitiveTopology) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::PrimitiveTopology(topology));
        self
    }

    /// Sets the dynamic viewports with count for future draw calls.
    ///
    /// Unlike [`set_viewport`](Self::set_viewport), this replaces all viewports, and also sets
    /// the viewport count.
    pub fn set_viewport_with_count(
        &mut self,
        viewports: impl IntoIterator<Item = Viewport>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        let viewports: SmallVec<[Viewport; 2]> = viewports.into_iter().collect();
        self.validate_set_viewport_with_count(&viewports)
            .map_err(|err| self.recording_error("vkCmdSetViewportWithCount", err))?;

        Ok(self.set_viewport_with_count_unchecked(viewports))
    }

    fn validate_set_viewport_with_count(
        &self,
        viewports: &[Viewport],
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ViewportWithCount)?;

        if self.inherited_viewport_depth_count.is_some() {
            return Err(Box::new(ValidationError {
                problem: "the command buffer inherits its viewport and scissor state".into(),
                vuids: &["VUID-vkCmdSetViewportWithCount-commandBuffer-04819"],
                ..Default::default()
            }));
        }

        if viewports.is_empty() {
            return Err(Box::new(ValidationError {
                context: "viewports".into(),
                problem: "is empty".into(),
                vuids: &["VUID-vkCmdSetViewportWithCount-viewportCount-arraylength"],
                ..Default::default()
            }));
        }

        if viewports.len() as u32 > self.device.properties.max_viewports {
            return Err(Box::new(ValidationError {
                context: "viewports".into(),
                problem: "the length exceeds the `max_viewports` limit".into(),
                vuids: &["VUID-vkCmdSetViewportWithCount-viewportCount-03394"],
                ..Default::default()
            }));
        }

        if viewports.len() > 1 && !self.device.enabled_features.multi_viewport {
            return Err(Box::new(ValidationError {
                context: "viewports".into(),
                problem: "the length is greater than 1".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multi_viewport",
                )])]),
                vuids: &["VUID-vkCmdSetViewportWithCount-viewportCount-03395"],
            }));
        }

        for (index, viewport) in viewports.iter().enumerate() {
            viewport
                .validate(&self.device)
                .map_err(|err| err.add_context(format!("viewports[{}]", index)))?;
        }

        Ok(())
    }

    #[inline]
    pub fn set_viewport_with_count_unchecked(
        &mut self,
        viewports: impl IntoIterator<Item = Viewport>,
    ) -> &mut Self {
        self.tracker.mark_set(DynamicStateValue::ViewportWithCount(
            viewports.into_iter().collect(),
        ));
        self
    }

    /// Sets the dynamic scissors with count for future draw calls.
    pub fn set_scissor_with_count(
        &mut self,
        scissors: impl IntoIterator<Item = Scissor>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        let scissors: SmallVec<[Scissor; 2]> = scissors.into_iter().collect();
        self.validate_set_scissor_with_count(&scissors)
            .map_err(|err| self.recording_error("vkCmdSetScissorWithCount", err))?;

        Ok(self.set_scissor_with_count_unchecked(scissors))
    }

    fn validate_set_scissor_with_count(
        &self,
        scissors: &[Scissor],
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ScissorWithCount)?;

        if self.inherited_viewport_depth_count.is_some() {
            return Err(Box::new(ValidationError {
                problem: "the command buffer inherits its viewport and scissor state".into(),
                vuids: &["VUID-vkCmdSetScissorWithCount-commandBuffer-04820"],
                ..Default::default()
            }));
        }

        if scissors.is_empty() {
            return Err(Box::new(ValidationError {
                context: "scissors".into(),
                problem: "is empty".into(),
                vuids: &["VUID-vkCmdSetScissorWithCount-scissorCount-arraylength"],
                ..Default::default()
            }));
        }

        if scissors.len() as u32 > self.device.properties.max_viewports {
            return Err(Box::new(ValidationError {
                context: "scissors".into(),
                problem: "the length exceeds the `max_viewports` limit".into(),
                vuids: &["VUID-vkCmdSetScissorWithCount-scissorCount-03397"],
                ..Default::default()
            }));
        }

        if scissors.len() > 1 && !self.device.enabled_features.multi_viewport {
            return Err(Box::new(ValidationError {
                context: "scissors".into(),
                problem: "the length is greater than 1".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multi_viewport",
                )])]),
                vuids: &["VUID-vkCmdSetScissorWithCount-scissorCount-03398"],
            }));
        }

        for (index, scissor) in scissors.iter().enumerate() {
            if scissor.offset[0] < 0 || scissor.offset[1] < 0 {
                return Err(Box::new(ValidationError {
                    context: format!("scissors[{}].offset", index).into(),
                    problem: "is negative".into(),
                    vuids: &["VUID-vkCmdSetScissorWithCount-x-03399"],
                    ..Default::default()
                }));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn set_scissor_with_count_unchecked(
        &mut self,
        scissors: impl IntoIterator<Item = Scissor>,
    ) -> &mut Self {
        self.tracker.mark_set(DynamicStateValue::ScissorWithCount(
            scissors.into_iter().collect(),
        ));
        self
    }

    /// Records the strides that `vkCmdBindVertexBuffers2` gives for the vertex buffers bound at
    /// `first_binding` and onwards.
    pub fn set_vertex_input_binding_stride(
        &mut self,
        first_binding: u32,
        strides: impl IntoIterator<Item = u32>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::VertexInputBindingStride)
            .map_err(|err| self.recording_error("vkCmdBindVertexBuffers2", err))?;

        Ok(self.set_vertex_input_binding_stride_unchecked(first_binding, strides))
    }

    #[inline]
    pub fn set_vertex_input_binding_stride_unchecked(
        &mut self,
        first_binding: u32,
        strides: impl IntoIterator<Item = u32>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::VertexInputBindingStride(indexed(
                first_binding,
                strides,
            )));
        self
    }

    /// Sets the dynamic viewport W scaling factors for future draw calls.
    pub fn set_viewport_w_scaling(
        &mut self,
        first_viewport: u32,
        scalings: impl IntoIterator<Item = ViewportWScaling>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        let scalings: SmallVec<[ViewportWScaling; 2]> = scalings.into_iter().collect();
        self.validate_set_viewport_w_scaling(first_viewport, &scalings)
            .map_err(|err| self.recording_error("vkCmdSetViewportWScalingNV", err))?;

        Ok(self.set_viewport_w_scaling_unchecked(first_viewport, scalings))
    }

    fn validate_set_viewport_w_scaling(
        &self,
        first_viewport: u32,
        scalings: &[ViewportWScaling],
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ViewportWScaling)?;

        if exceeds_limit(first_viewport, scalings.len(), self.device.properties.max_viewports) {
            return Err(Box::new(ValidationError {
                problem: "`first_viewport + scalings.len()` exceeds the `max_viewports` limit"
                    .into(),
                vuids: &["VUID-vkCmdSetViewportWScalingNV-firstViewport-01324"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_viewport_w_scaling_unchecked(
        &mut self,
        first_viewport: u32,
        scalings: impl IntoIterator<Item = ViewportWScaling>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ViewportWScaling(indexed(
                first_viewport,
                scalings,
            )));
        self
    }

    /// Sets the dynamic discard rectangles for future draw calls.
    pub fn set_discard_rectangle(
        &mut self,
        first_rectangle: u32,
        rectangles: impl IntoIterator<Item = Scissor>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        let rectangles: SmallVec<[Scissor; 2]> = rectangles.into_iter().collect();
        self.validate_set_discard_rectangle(first_rectangle, &rectangles)
            .map_err(|err| self.recording_error("vkCmdSetDiscardRectangleEXT", err))?;

        Ok(self.set_discard_rectangle_unchecked(first_rectangle, rectangles))
    }

    fn validate_set_discard_rectangle(
        &self,
        first_rectangle: u32,
        rectangles: &[Scissor],
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::DiscardRectangle)?;

        if self.inherited_viewport_depth_count.is_some() {
            return Err(Box::new(ValidationError {
                problem: "the command buffer inherits its viewport and scissor state".into(),
                vuids: &["VUID-vkCmdSetDiscardRectangleEXT-viewportScissor2D-04788"],
                ..Default::default()
            }));
        }

        if exceeds_limit(
            first_rectangle,
            rectangles.len(),
            self.device.properties.max_discard_rectangles,
        ) {
            return Err(Box::new(ValidationError {
                problem: "`first_rectangle + rectangles.len()` exceeds the \
                    `max_discard_rectangles` limit"
                    .into(),
                vuids: &["VUID-vkCmdSetDiscardRectangleEXT-firstDiscardRectangle-00585"],
                ..Default::default()
            }));
        }

        for (index, rectangle) in rectangles.iter().enumerate() {
            if rectangle.offset[0] < 0 || rectangle.offset[1] < 0 {
                return Err(Box::new(ValidationError {
                    context: format!("rectangles[{}].offset", index).into(),
                    problem: "is negative".into(),
                    vuids: &["VUID-vkCmdSetDiscardRectangleEXT-x-00587"],
                    ..Default::default()
                }));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn set_discard_rectangle_unchecked(
        &mut self,
        first_rectangle: u32,
        rectangles: impl IntoIterator<Item = Scissor>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::DiscardRectangle(indexed(
                first_rectangle,
                rectangles,
            )));
        self
    }

    /// Sets the dynamic sample locations for future draw calls.
    pub fn set_sample_locations(
        &mut self,
        sample_locations_info: SampleLocationsInfo,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_sample_locations(&sample_locations_info)
            .map_err(|err| self.recording_error("vkCmdSetSampleLocationsEXT", err))?;

        Ok(self.set_sample_locations_unchecked(sample_locations_info))
    }

    fn validate_set_sample_locations(
        &self,
        sample_locations_info: &SampleLocationsInfo,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::SampleLocations)?;
        sample_locations_info
            .validate(&self.device)
            .map_err(|err| err.add_context("sample_locations_info"))?;

        Ok(())
    }

    #[inline]
    pub fn set_sample_locations_unchecked(
        &mut self,
        sample_locations_info: SampleLocationsInfo,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::SampleLocations(sample_locations_info));
        self
    }

    /// Sets the dynamic shading rate palettes of the viewports for future draw calls.
    pub fn set_viewport_shading_rate_palette(
        &mut self,
        first_viewport: u32,
        palettes: impl IntoIterator<Item = ShadingRatePalette>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        let palettes: SmallVec<[ShadingRatePalette; 2]> = palettes.into_iter().collect();
        self.validate_set_viewport_shading_rate_palette(first_viewport, &palettes)
            .map_err(|err| self.recording_error("vkCmdSetViewportShadingRatePaletteNV", err))?;

        Ok(self.set_viewport_shading_rate_palette_unchecked(first_viewport, palettes))
    }

    fn validate_set_viewport_shading_rate_palette(
        &self,
        first_viewport: u32,
        palettes: &[ShadingRatePalette],
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ViewportShadingRatePalette)?;

        if exceeds_limit(first_viewport, palettes.len(), self.device.properties.max_viewports) {
            return Err(Box::new(ValidationError {
                problem: "`first_viewport + palettes.len()` exceeds the `max_viewports` limit"
                    .into(),
                vuids: &["VUID-vkCmdSetViewportShadingRatePaletteNV-firstViewport-02067"],
                ..Default::default()
            }));
        }

        for (index, palette) in palettes.iter().enumerate() {
            palette
                .validate(&self.device)
                .map_err(|err| err.add_context(format!("palettes[{}]", index)))?;
        }

        Ok(())
    }

    #[inline]
    pub fn set_viewport_shading_rate_palette_unchecked(
        &mut self,
        first_viewport: u32,
        palettes: impl IntoIterator<Item = ShadingRatePalette>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ViewportShadingRatePalette(indexed(
                first_viewport,
                palettes,
            )));
        self
    }

    /// Sets the dynamic coarse sample order for future draw calls.
    pub fn set_coarse_sample_order(
        &mut self,
        sample_order: CoarseSampleOrder,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_coarse_sample_order(&sample_order)
            .map_err(|err| self.recording_error("vkCmdSetCoarseSampleOrderNV", err))?;

        Ok(self.set_coarse_sample_order_unchecked(sample_order))
    }

    fn validate_set_coarse_sample_order(
        &self,
        sample_order: &CoarseSampleOrder,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ViewportCoarseSampleOrder)?;
        sample_order.validate(&self.device)?;

        Ok(())
    }

    #[inline]
    pub fn set_coarse_sample_order_unchecked(
        &mut self,
        sample_order: CoarseSampleOrder,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ViewportCoarseSampleOrder(sample_order));
        self
    }

    /// Sets which exclusive scissors are enabled, for future draw calls.
    pub fn set_exclusive_scissor_enable(
        &mut self,
        first_exclusive_scissor: u32,
        enables: impl IntoIterator<Item = bool>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ExclusiveScissorEnable)
            .map_err(|err| self.recording_error("vkCmdSetExclusiveScissorEnableNV", err))?;

        Ok(self.set_exclusive_scissor_enable_unchecked(first_exclusive_scissor, enables))
    }

    #[inline]
    pub fn set_exclusive_scissor_enable_unchecked(
        &mut self,
        first_exclusive_scissor: u32,
        enables: impl IntoIterator<Item = bool>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ExclusiveScissorEnable(indexed(
                first_exclusive_scissor,
                enables,
            )));
        self
    }

    /// Sets the dynamic exclusive scissors for future draw calls.
    pub fn set_exclusive_scissor(
        &mut self,
        first_exclusive_scissor: u32,
        scissors: impl IntoIterator<Item = Scissor>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        let scissors: SmallVec<[Scissor; 2]> = scissors.into_iter().collect();
        self.validate_set_exclusive_scissor(first_exclusive_scissor, &scissors)
            .map_err(|err| self.recording_error("vkCmdSetExclusiveScissorNV", err))?;

        Ok(self.set_exclusive_scissor_unchecked(first_exclusive_scissor, scissors))
    }

    fn validate_set_exclusive_scissor(
        &self,
        first_exclusive_scissor: u32,
        scissors: &[Scissor],
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ExclusiveScissor)?;

        if exceeds_limit(
            first_exclusive_scissor,
            scissors.len(),
            self.device.properties.max_viewports,
        ) {
            return Err(Box::new(ValidationError {
                problem: "`first_exclusive_scissor + scissors.len()` exceeds the \
                    `max_viewports` limit"
                    .into(),
                vuids: &["VUID-vkCmdSetExclusiveScissorNV-firstExclusiveScissor-02034"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_exclusive_scissor_unchecked(
        &mut self,
        first_exclusive_scissor: u32,
        scissors: impl IntoIterator<Item = Scissor>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ExclusiveScissor(indexed(
                first_exclusive_scissor,
                scissors,
            )));
        self
    }

    /// Sets the dynamic pipeline fragment shading rate and combiner ops for future draw calls.
    pub fn set_fragment_shading_rate(
        &mut self,
        fragment_size: [u32; 2],
        combiner_ops: [FragmentShadingRateCombinerOp; 2],
    ) -> Result<&mut Self, Box<ValidationError>> {
        let state = FragmentShadingRateState {
            fragment_size,
            combiner_ops,
            ..FragmentShadingRateState::new()
        };
        self.validate_set_fragment_shading_rate(&state)
            .map_err(|err| self.recording_error("vkCmdSetFragmentShadingRateKHR", err))?;

        Ok(self.set_fragment_shading_rate_unchecked(fragment_size, combiner_ops))
    }

    fn validate_set_fragment_shading_rate(
        &self,
        state: &FragmentShadingRateState,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::FragmentShadingRate)?;
        state.validate_with_vuids(
            &self.device,
            &FragmentShadingRateVuids::SET_FRAGMENT_SHADING_RATE,
        )?;

        Ok(())
    }

    #[inline]
    pub fn set_fragment_shading_rate_unchecked(
        &mut self,
        fragment_size: [u32; 2],
        combiner_ops: [FragmentShadingRateCombinerOp; 2],
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::FragmentShadingRate(FragmentShadingRateState {
                fragment_size,
                combiner_ops,
                ..FragmentShadingRateState::new()
            }));
        self
    }

    /// Sets the dynamic line stipple for future draw calls.
    pub fn set_line_stipple(
        &mut self,
        factor: u32,
        pattern: u16,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_line_stipple(factor, pattern)
            .map_err(|err| self.recording_error("vkCmdSetLineStippleKHR", err))?;

        Ok(self.set_line_stipple_unchecked(factor, pattern))
    }

    fn validate_set_line_stipple(&self, factor: u32, _pattern: u16) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::LineStipple)?;

        if !(1..=256).contains(&factor) {
            return Err(Box::new(ValidationError {
                context: "factor".into(),
                problem: "is not between 1 and 256 inclusive".into(),
                vuids: &["VUID-vkCmdSetLineStippleKHR-lineStippleFactor-02776"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_line_stipple_unchecked(&mut self, factor: u32, pattern: u16) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::LineStipple(LineStipple { factor, pattern }));
        self
    }

    /// Sets the dynamic vertex input for future draw calls.
    ///
    /// This also sets the vertex input binding strides, to the strides of `vertex_input_state`.
    pub fn set_vertex_input(
        &mut self,
        vertex_input_state: VertexInputState,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_vertex_input(&vertex_input_state)
            .map_err(|err| self.recording_error("vkCmdSetVertexInputEXT", err))?;

        Ok(self.set_vertex_input_unchecked(vertex_input_state))
    }

    fn validate_set_vertex_input(
        &self,
        vertex_input_state: &VertexInputState,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::VertexInput)?;
        vertex_input_state
            .validate(&self.device)
            .map_err(|err| err.add_context("vertex_input_state"))?;

        Ok(())
    }

    pub fn set_vertex_input_unchecked(&mut self, vertex_input_state: VertexInputState) -> &mut Self {
        let strides = vertex_input_state
            .bindings
            .iter()
            .map(|(&binding, description)| (binding, description.stride))
            .collect();
        self.tracker
            .mark_set(DynamicStateValue::VertexInputBindingStride(strides));
        self.tracker
            .mark_set(DynamicStateValue::VertexInput(vertex_input_state));
        self
    }

    /// Sets the dynamic number of patch control points for future draw calls.
    pub fn set_patch_control_points(
        &mut self,
        num: u32,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_patch_control_points(num)
            .map_err(|err| self.recording_error("vkCmdSetPatchControlPointsEXT", err))?;

        Ok(self.set_patch_control_points_unchecked(num))
    }

    fn validate_set_patch_control_points(&self, num: u32) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::PatchControlPoints)?;

        if num == 0 || num > self.device.properties.max_tessellation_patch_size {
            return Err(Box::new(ValidationError {
                context: "num".into(),
                problem: "is not between 1 and the `max_tessellation_patch_size` limit \
                    inclusive"
                    .into(),
                vuids: &["VUID-vkCmdSetPatchControlPointsEXT-patchControlPoints-04874"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_patch_control_points_unchecked(&mut self, num: u32) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::PatchControlPoints(num));
        self
    }

    /// Sets whether writes to each color attachment are enabled, for future draw calls.
    ///
    /// The number of values given is the attachment count of the state.
    pub fn set_color_write_enable(
        &mut self,
        enables: impl IntoIterator<Item = bool>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        let enables: SmallVec<[bool; 4]> = enables.into_iter().collect();
        self.validate_set_color_write_enable(&enables)
            .map_err(|err| self.recording_error("vkCmdSetColorWriteEnableEXT", err))?;

        Ok(self.set_color_write_enable_unchecked(enables))
    }

    fn validate_set_color_write_enable(&self, enables: &[bool]) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ColorWriteEnable)?;

        if enables.len() as u32 > self.device.properties.max_color_attachments {
            return Err(Box::new(ValidationError {
                context: "enables".into(),
                problem: "the length exceeds the `max_color_attachments` limit".into(),
                vuids: &["VUID-vkCmdSetColorWriteEnableEXT-attachmentCount-06656"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_color_write_enable_unchecked(
        &mut self,
        enables: impl IntoIterator<Item = bool>,
    ) -> &mut Self {
        self.tracker.mark_set(DynamicStateValue::ColorWriteEnable(
            enables.into_iter().collect(),
        ));
        self
    }

    /// Sets whether dynamic depth clamping is enabled for future draw calls.
    pub fn set_depth_clamp_enable(&mut self, enable: bool) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_depth_clamp_enable(enable)
            .map_err(|err| self.recording_error("vkCmdSetDepthClampEnableEXT", err))?;

        Ok(self.set_depth_clamp_enable_unchecked(enable))
    }

    fn validate_set_depth_clamp_enable(&self, enable: bool) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::DepthClampEnable)?;

        if enable && !self.device.enabled_features.depth_clamp {
            return Err(Box::new(ValidationError {
                context: "enable".into(),
                problem: "is `true`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "depth_clamp",
                )])]),
                vuids: &["VUID-vkCmdSetDepthClampEnableEXT-depthClamp-07449"],
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_depth_clamp_enable_unchecked(&mut self, enable: bool) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::DepthClampEnable(enable));
        self
    }

    /// Sets the dynamic polygon mode for future draw calls.
    pub fn set_polygon_mode(
        &mut self,
        polygon_mode: PolygonMode,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_polygon_mode(polygon_mode)
            .map_err(|err| self.recording_error("vkCmdSetPolygonModeEXT", err))?;

        Ok(self.set_polygon_mode_unchecked(polygon_mode))
    }

    fn validate_set_polygon_mode(
        &self,
        polygon_mode: PolygonMode,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::PolygonMode)?;

        match polygon_mode {
            PolygonMode::Line | PolygonMode::Point
                if !self.device.enabled_features.fill_mode_non_solid =>
            {
                return Err(Box::new(ValidationError {
                    context: "polygon_mode".into(),
                    problem: "is `PolygonMode::Line` or `PolygonMode::Point`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "fill_mode_non_solid",
                    )])]),
                    vuids: &["VUID-vkCmdSetPolygonModeEXT-fillModeNonSolid-07424"],
                }));
            }
            PolygonMode::FillRectangle if !self.device.enabled_extensions.nv_fill_rectangle => {
                return Err(Box::new(ValidationError {
                    context: "polygon_mode".into(),
                    problem: "is `PolygonMode::FillRectangle`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("nv_fill_rectangle"),
                    ])]),
                    vuids: &["VUID-vkCmdSetPolygonModeEXT-polygonMode-07425"],
                }));
            }
            _ => (),
        }

        Ok(())
    }

    #[inline]
    pub fn set_polygon_mode_unchecked(&mut self, polygon_mode: PolygonMode) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::PolygonMode(polygon_mode));
        self
    }

    /// Sets the dynamic sample mask for future draw calls.
    ///
    /// `samples` is the sample count that `mask` is given for.
    pub fn set_sample_mask(
        &mut self,
        samples: SampleCount,
        mask: [u32; 2],
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::SampleMask)
            .map_err(|err| self.recording_error("vkCmdSetSampleMaskEXT", err))?;

        Ok(self.set_sample_mask_unchecked(samples, mask))
    }

    #[inline]
    pub fn set_sample_mask_unchecked(&mut self, samples: SampleCount, mask: [u32; 2]) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::SampleMask(SampleMask { samples, mask }));
        self
    }

    pub fn set_alpha_to_one_enable(
        &mut self,
        enable: bool,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_alpha_to_one_enable(enable)
            .map_err(|err| self.recording_error("vkCmdSetAlphaToOneEnableEXT", err))?;

        Ok(self.set_alpha_to_one_enable_unchecked(enable))
    }

    fn validate_set_alpha_to_one_enable(&self, enable: bool) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::AlphaToOneEnable)?;

        if enable && !self.device.enabled_features.alpha_to_one {
            return Err(Box::new(ValidationError {
                context: "enable".into(),
                problem: "is `true`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "alpha_to_one",
                )])]),
                vuids: &["VUID-vkCmdSetAlphaToOneEnableEXT-alphaToOne-07607"],
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_alpha_to_one_enable_unchecked(&mut self, enable: bool) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::AlphaToOneEnable(enable));
        self
    }

    /// Sets whether logic ops are enabled, for future draw calls.
    pub fn set_logic_op_enable(&mut self, enable: bool) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_logic_op_enable(enable)
            .map_err(|err| self.recording_error("vkCmdSetLogicOpEnableEXT", err))?;

        Ok(self.set_logic_op_enable_unchecked(enable))
    }

    fn validate_set_logic_op_enable(&self, enable: bool) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::LogicOpEnable)?;

        if enable && !self.device.enabled_features.logic_op {
            return Err(Box::new(ValidationError {
                context: "enable".into(),
                problem: "is `true`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "logic_op",
                )])]),
                vuids: &["VUID-vkCmdSetLogicOpEnableEXT-logicOp-07366"],
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_logic_op_enable_unchecked(&mut self, enable: bool) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::LogicOpEnable(enable));
        self
    }

    /// Sets whether blending is enabled for each color attachment, for future draw calls.
    pub fn set_color_blend_enable(
        &mut self,
        first_attachment: u32,
        enables: impl IntoIterator<Item = bool>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ColorBlendEnable)
            .map_err(|err| self.recording_error("vkCmdSetColorBlendEnableEXT", err))?;

        Ok(self.set_color_blend_enable_unchecked(first_attachment, enables))
    }

    #[inline]
    pub fn set_color_blend_enable_unchecked(
        &mut self,
        first_attachment: u32,
        enables: impl IntoIterator<Item = bool>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ColorBlendEnable(indexed(
                first_attachment,
                enables,
            )));
        self
    }

    /// Sets the blend factors and ops of each color attachment, for future draw calls.
    pub fn set_color_blend_equation(
        &mut self,
        first_attachment: u32,
        equations: impl IntoIterator<Item = AttachmentBlend>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        let equations: SmallVec<[AttachmentBlend; 2]> = equations.into_iter().collect();
        self.validate_set_color_blend_equation(&equations)
            .map_err(|err| self.recording_error("vkCmdSetColorBlendEquationEXT", err))?;

        Ok(self.set_color_blend_equation_unchecked(first_attachment, equations))
    }

    fn validate_set_color_blend_equation(
        &self,
        equations: &[AttachmentBlend],
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ColorBlendEquation)?;

        for (index, equation) in equations.iter().enumerate() {
            validate_color_blend_equation(&self.device, equation)
                .map_err(|err| err.add_context(format!("equations[{}]", index)))?;
        }

        Ok(())
    }

    #[inline]
    pub fn set_color_blend_equation_unchecked(
        &mut self,
        first_attachment: u32,
        equations: impl IntoIterator<Item = AttachmentBlend>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ColorBlendEquation(indexed(
                first_attachment,
                equations,
            )));
        self
    }

    /// Sets the color write mask of each color attachment, for future draw calls.
    pub fn set_color_write_mask(
        &mut self,
        first_attachment: u32,
        masks: impl IntoIterator<Item = ColorComponents>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ColorWriteMask)
            .map_err(|err| self.recording_error("vkCmdSetColorWriteMaskEXT", err))?;

        Ok(self.set_color_write_mask_unchecked(first_attachment, masks))
    }

    #[inline]
    pub fn set_color_write_mask_unchecked(
        &mut self,
        first_attachment: u32,
        masks: impl IntoIterator<Item = ColorComponents>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ColorWriteMask(indexed(
                first_attachment,
                masks,
            )));
        self
    }

    /// Sets the vertex stream that is rasterized, for future draw calls.
    pub fn set_rasterization_stream(
        &mut self,
        stream: u32,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_rasterization_stream(stream)
            .map_err(|err| self.recording_error("vkCmdSetRasterizationStreamEXT", err))?;

        Ok(self.set_rasterization_stream_unchecked(stream))
    }

    fn validate_set_rasterization_stream(&self, stream: u32) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::RasterizationStream)?;

        let properties = &self.device.properties;

        if !self.device.enabled_features.transform_feedback {
            return Err(Box::new(ValidationError {
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "transform_feedback",
                )])]),
                vuids: &["VUID-vkCmdSetRasterizationStreamEXT-transformFeedback-07411"],
                ..Default::default()
            }));
        }

        if stream >= properties.max_transform_feedback_streams {
            return Err(Box::new(ValidationError {
                context: "stream".into(),
                problem: "is not less than the `max_transform_feedback_streams` limit".into(),
                vuids: &["VUID-vkCmdSetRasterizationStreamEXT-rasterizationStream-07412"],
                ..Default::default()
            }));
        }

        if stream != 0 && !properties.transform_feedback_rasterization_stream_select {
            return Err(Box::new(ValidationError {
                context: "stream".into(),
                problem: "is not 0, but the `transform_feedback_rasterization_stream_select` \
                    property is `false`"
                    .into(),
                vuids: &["VUID-vkCmdSetRasterizationStreamEXT-rasterizationStream-07413"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_rasterization_stream_unchecked(&mut self, stream: u32) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::RasterizationStream(stream));
        self
    }

    /// Sets the dynamic extra overestimation size for conservative rasterization.
    pub fn set_extra_primitive_overestimation_size(
        &mut self,
        size: f32,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_extra_primitive_overestimation_size(size)
            .map_err(|err| {
                self.recording_error("vkCmdSetExtraPrimitiveOverestimationSizeEXT", err)
            })?;

        Ok(self.set_extra_primitive_overestimation_size_unchecked(size))
    }

    fn validate_set_extra_primitive_overestimation_size(
        &self,
        size: f32,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ExtraPrimitiveOverestimationSize)?;

        if !(0.0..=self.device.properties.max_extra_primitive_overestimation_size).contains(&size) {
            return Err(Box::new(ValidationError {
                context: "size".into(),
                problem: "is not between 0.0 and the `max_extra_primitive_overestimation_size` \
                    limit inclusive"
                    .into(),
                vuids: &[
                    "VUID-vkCmdSetExtraPrimitiveOverestimationSizeEXT-extraPrimitiveOverestimationSize-07428",
                ],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_extra_primitive_overestimation_size_unchecked(&mut self, size: f32) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ExtraPrimitiveOverestimationSize(size));
        self
    }

    pub fn set_depth_clip_enable(&mut self, enable: bool) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_depth_clip_enable(enable)
            .map_err(|err| self.recording_error("vkCmdSetDepthClipEnableEXT", err))?;

        Ok(self.set_depth_clip_enable_unchecked(enable))
    }

    fn validate_set_depth_clip_enable(&self, _enable: bool) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::DepthClipEnable)?;

        if !self.device.enabled_features.depth_clip_enable {
            return Err(Box::new(ValidationError {
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "depth_clip_enable",
                )])]),
                vuids: &["VUID-vkCmdSetDepthClipEnableEXT-depthClipEnable-07451"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_depth_clip_enable_unchecked(&mut self, enable: bool) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::DepthClipEnable(enable));
        self
    }

    /// Sets the advanced blend parameters of each color attachment, for future draw calls.
    pub fn set_color_blend_advanced(
        &mut self,
        first_attachment: u32,
        advanced: impl IntoIterator<Item = ColorBlendAdvanced>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        let advanced: SmallVec<[ColorBlendAdvanced; 2]> = advanced.into_iter().collect();
        self.validate_set_color_blend_advanced(&advanced)
            .map_err(|err| self.recording_error("vkCmdSetColorBlendAdvancedEXT", err))?;

        Ok(self.set_color_blend_advanced_unchecked(first_attachment, advanced))
    }

    fn validate_set_color_blend_advanced(
        &self,
        advanced: &[ColorBlendAdvanced],
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ColorBlendAdvanced)?;

        let properties = &self.device.properties;

        for (index, advanced) in advanced.iter().enumerate() {
            if !advanced.advanced_blend_op.is_advanced() {
                return Err(Box::new(ValidationError {
                    context: format!("advanced[{}].advanced_blend_op", index).into(),
                    problem: "is not an advanced blend op".into(),
                    vuids: &["VUID-VkColorBlendAdvancedEXT-advancedBlendOp-parameter"],
                    ..Default::default()
                }));
            }

            if !advanced.src_premultiplied && !properties.advanced_blend_non_premultiplied_src_color
            {
                return Err(Box::new(ValidationError {
                    context: format!("advanced[{}].src_premultiplied", index).into(),
                    problem: "is `false`, but the `advanced_blend_non_premultiplied_src_color` \
                        property is `false`"
                        .into(),
                    vuids: &["VUID-VkColorBlendAdvancedEXT-srcPremultiplied-07505"],
                    ..Default::default()
                }));
            }

            if !advanced.dst_premultiplied && !properties.advanced_blend_non_premultiplied_dst_color
            {
                return Err(Box::new(ValidationError {
                    context: format!("advanced[{}].dst_premultiplied", index).into(),
                    problem: "is `false`, but the `advanced_blend_non_premultiplied_dst_color` \
                        property is `false`"
                        .into(),
                    vuids: &["VUID-VkColorBlendAdvancedEXT-dstPremultiplied-07506"],
                    ..Default::default()
                }));
            }

            if advanced.blend_overlap != BlendOverlap::Uncorrelated
                && !properties.advanced_blend_correlated_overlap
            {
                return Err(Box::new(ValidationError {
                    context: format!("advanced[{}].blend_overlap", index).into(),
                    problem: "is not `BlendOverlap::Uncorrelated`, but the \
                        `advanced_blend_correlated_overlap` property is `false`"
                        .into(),
                    vuids: &["VUID-VkColorBlendAdvancedEXT-blendOverlap-07507"],
                    ..Default::default()
                }));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn set_color_blend_advanced_unchecked(
        &mut self,
        first_attachment: u32,
        advanced: impl IntoIterator<Item = ColorBlendAdvanced>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ColorBlendAdvanced(indexed(
                first_attachment,
                advanced,
            )));
        self
    }

    /// Sets the dynamic provoking vertex mode for future draw calls.
    pub fn set_provoking_vertex_mode(
        &mut self,
        mode: ProvokingVertexMode,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_provoking_vertex_mode(mode)
            .map_err(|err| self.recording_error("vkCmdSetProvokingVertexModeEXT", err))?;

        Ok(self.set_provoking_vertex_mode_unchecked(mode))
    }

    fn validate_set_provoking_vertex_mode(
        &self,
        mode: ProvokingVertexMode,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ProvokingVertexMode)?;

        if mode == ProvokingVertexMode::LastVertex
            && !self.device.enabled_features.provoking_vertex_last
        {
            return Err(Box::new(ValidationError {
                context: "mode".into(),
                problem: "is `ProvokingVertexMode::LastVertex`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "provoking_vertex_last",
                )])]),
                vuids: &["VUID-vkCmdSetProvokingVertexModeEXT-provokingVertexMode-07447"],
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_provoking_vertex_mode_unchecked(&mut self, mode: ProvokingVertexMode) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ProvokingVertexMode(mode));
        self
    }

    /// Sets the dynamic line rasterization mode for future draw calls.
    pub fn set_line_rasterization_mode(
        &mut self,
        mode: LineRasterizationMode,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_line_rasterization_mode(mode)
            .map_err(|err| self.recording_error("vkCmdSetLineRasterizationModeEXT", err))?;

        Ok(self.set_line_rasterization_mode_unchecked(mode))
    }

    fn validate_set_line_rasterization_mode(
        &self,
        mode: LineRasterizationMode,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::LineRasterizationMode)?;

        let features = &self.device.enabled_features;

        let (enabled, requires_one_of, vuids): (_, _, &'static [&'static str]) = match mode {
            LineRasterizationMode::Rectangular => (
                features.rectangular_lines,
                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "rectangular_lines",
                )])]),
                &["VUID-vkCmdSetLineRasterizationModeEXT-lineRasterizationMode-07418"],
            ),
            LineRasterizationMode::Bresenham => (
                features.bresenham_lines,
                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature("bresenham_lines")])]),
                &["VUID-vkCmdSetLineRasterizationModeEXT-lineRasterizationMode-07419"],
            ),
            LineRasterizationMode::RectangularSmooth => (
                features.smooth_lines,
                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature("smooth_lines")])]),
                &["VUID-vkCmdSetLineRasterizationModeEXT-lineRasterizationMode-07420"],
            ),
            _ => return Ok(()),
        };

        if !enabled {
            return Err(Box::new(ValidationError {
                context: "mode".into(),
                problem: format!("is `LineRasterizationMode::{:?}`", mode).into(),
                requires_one_of,
                vuids,
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_line_rasterization_mode_unchecked(
        &mut self,
        mode: LineRasterizationMode,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::LineRasterizationMode(mode));
        self
    }

    /// Sets whether the clip space depth range is [-1, 1] instead of [0, 1], for future draw
    /// calls.
    pub fn set_depth_clip_negative_one_to_one(
        &mut self,
        negative_one_to_one: bool,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_depth_clip_negative_one_to_one(negative_one_to_one)
            .map_err(|err| self.recording_error("vkCmdSetDepthClipNegativeOneToOneEXT", err))?;

        Ok(self.set_depth_clip_negative_one_to_one_unchecked(negative_one_to_one))
    }

    fn validate_set_depth_clip_negative_one_to_one(
        &self,
        _negative_one_to_one: bool,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::DepthClipNegativeOneToOne)?;

        if !self.device.enabled_features.depth_clip_control {
            return Err(Box::new(ValidationError {
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "depth_clip_control",
                )])]),
                vuids: &["VUID-vkCmdSetDepthClipNegativeOneToOneEXT-depthClipControl-07453"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_depth_clip_negative_one_to_one_unchecked(
        &mut self,
        negative_one_to_one: bool,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::DepthClipNegativeOneToOne(negative_one_to_one));
        self
    }

    /// Sets the dynamic viewport swizzles for future draw calls.
    pub fn set_viewport_swizzle(
        &mut self,
        first_viewport: u32,
        swizzles: impl IntoIterator<Item = ViewportSwizzle>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::ViewportSwizzle)
            .map_err(|err| self.recording_error("vkCmdSetViewportSwizzleNV", err))?;

        Ok(self.set_viewport_swizzle_unchecked(first_viewport, swizzles))
    }

    #[inline]
    pub fn set_viewport_swizzle_unchecked(
        &mut self,
        first_viewport: u32,
        swizzles: impl IntoIterator<Item = ViewportSwizzle>,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::ViewportSwizzle(indexed(
                first_viewport,
                swizzles,
            )));
        self
    }

    /// Sets the aspects of attachments that may be read in the same draw that writes them.
    pub fn set_attachment_feedback_loop_enable(
        &mut self,
        aspects: ImageAspects,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_attachment_feedback_loop_enable(aspects)
            .map_err(|err| self.recording_error("vkCmdSetAttachmentFeedbackLoopEnableEXT", err))?;

        Ok(self.set_attachment_feedback_loop_enable_unchecked(aspects))
    }

    fn validate_set_attachment_feedback_loop_enable(
        &self,
        aspects: ImageAspects,
    ) -> Result<(), Box<ValidationError>> {
        self.validate_dynamic_state_supported(DynamicState::AttachmentFeedbackLoopEnable)?;

        if !aspects.is_empty() && !self.device.enabled_features.attachment_feedback_loop_layout {
            return Err(Box::new(ValidationError {
                context: "aspects".into(),
                problem: "is not empty".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "attachment_feedback_loop_layout",
                )])]),
                vuids: &["VUID-vkCmdSetAttachmentFeedbackLoopEnableEXT-attachmentFeedbackLoopLayout-08864"],
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_attachment_feedback_loop_enable_unchecked(
        &mut self,
        aspects: ImageAspects,
    ) -> &mut Self {
        self.tracker
            .mark_set(DynamicStateValue::AttachmentFeedbackLoopEnable(aspects));
        self
    }
}

fn validate_color_blend_equation(
    device: &crate::device::DeviceCapabilities,
    equation: &AttachmentBlend,
) -> Result<(), Box<ValidationError>> {
    let &AttachmentBlend {
        src_color_blend_factor,
        dst_color_blend_factor,
        color_blend_op,
        src_alpha_blend_factor,
        dst_alpha_blend_factor,
        alpha_blend_op,
    } = equation;

    if color_blend_op.is_advanced() {
        return Err(Box::new(ValidationError {
            context: "color_blend_op".into(),
            problem: "is an advanced blend op".into(),
            vuids: &["VUID-VkColorBlendEquationEXT-colorBlendOp-07361"],
            ..Default::default()
        }));
    }

    if alpha_blend_op.is_advanced() {
        return Err(Box::new(ValidationError {
            context: "alpha_blend_op".into(),
            problem: "is an advanced blend op".into(),
            vuids: &["VUID-VkColorBlendEquationEXT-colorBlendOp-07361"],
            ..Default::default()
        }));
    }

    if !device.enabled_features.dual_src_blend {
        let factors: [(BlendFactor, &'static str, &'static [&'static str]); 4] = [
            (
                src_color_blend_factor,
                "src_color_blend_factor",
                &["VUID-VkColorBlendEquationEXT-dualSrcBlend-07357"],
            ),
            (
                dst_color_blend_factor,
                "dst_color_blend_factor",
                &["VUID-VkColorBlendEquationEXT-dualSrcBlend-07358"],
            ),
            (
                src_alpha_blend_factor,
                "src_alpha_blend_factor",
                &["VUID-VkColorBlendEquationEXT-dualSrcBlend-07359"],
            ),
            (
                dst_alpha_blend_factor,
                "dst_alpha_blend_factor",
                &["VUID-VkColorBlendEquationEXT-dualSrcBlend-07360"],
            ),
        ];

        for (factor, context, vuids) in factors {
            if factor.is_dual_source() {
                return Err(Box::new(ValidationError {
                    context: context.into(),
                    problem: "is a dual-source blend factor".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "dual_src_blend",
                    )])]),
                    vuids,
                }));
            }
        }
    }

    if device.enabled_extensions.khr_portability_subset
        && !device.enabled_features.constant_alpha_color_blend_factors
    {
        if matches!(
            src_color_blend_factor,
            BlendFactor::ConstantAlpha | BlendFactor::OneMinusConstantAlpha
        ) {
            return Err(Box::new(ValidationError {
                context: "src_color_blend_factor".into(),
                problem: "is `BlendFactor::ConstantAlpha` or `BlendFactor::OneMinusConstantAlpha`"
                    .into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "constant_alpha_color_blend_factors",
                )])]),
                vuids: &["VUID-VkColorBlendEquationEXT-constantAlphaColorBlendFactors-07362"],
            }));
        }

        if matches!(
            dst_color_blend_factor,
            BlendFactor::ConstantAlpha | BlendFactor::OneMinusConstantAlpha
        ) {
            return Err(Box::new(ValidationError {
                context: "dst_color_blend_factor".into(),
                problem: "is `BlendFactor::ConstantAlpha` or `BlendFactor::OneMinusConstantAlpha`"
                    .into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "constant_alpha_color_blend_factors",
                )])]),
                vuids: &["VUID-VkColorBlendEquationEXT-constantAlphaColorBlendFactors-07363"],
            }));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        command_buffer::{CommandRecorder, SetScope, StencilFaceValues},
        device::{DeviceCapabilities, DeviceFeatures},
        diagnostic::DiagnosticCollector,
        pipeline::{
            graphics::{
                color_blend::{AttachmentBlend, BlendFactor, BlendOp},
                depth_stencil::StencilFaces,
                rasterization::{LineRasterizationMode, PolygonMode},
                vertex_input::{VertexInputBindingDescription, VertexInputRate, VertexInputState},
                viewport::{Scissor, Viewport},
            },
            DynamicState,
        },
        tests::full_device,
    };
    use std::sync::Arc;

    fn recorder(device: DeviceCapabilities) -> CommandRecorder {
        CommandRecorder::new(Arc::new(device), Arc::new(DiagnosticCollector::new()))
    }

    #[test]
    fn viewport_ranges_merge() {
        let mut recorder = recorder(full_device());
        recorder
            .set_viewport(0, [Viewport::default()])
            .unwrap()
            .set_viewport(2, [Viewport::default(), Viewport::default()])
            .unwrap();

        let mut indices: Vec<_> = recorder
            .tracker()
            .values()
            .viewport
            .as_ref()
            .unwrap()
            .keys()
            .copied()
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, [0, 2, 3]);
    }

    #[test]
    fn viewport_requires_multi_viewport() {
        let mut device = full_device();
        device.enabled_features.multi_viewport = false;
        let mut recorder = recorder(device);

        let err = recorder.set_viewport(1, [Viewport::default()]).unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetViewport-firstViewport-01224"]);

        let err = recorder
            .set_scissor(0, [Scissor::default(), Scissor::default()])
            .unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetScissor-scissorCount-00594"]);

        assert!(!recorder
            .tracker()
            .is_set(DynamicState::Viewport, SetScope::Session));
    }

    #[test]
    fn viewport_limit() {
        let mut recorder = recorder(full_device());
        let max = recorder.device().properties.max_viewports;

        let err = recorder
            .set_viewport(max, [Viewport::default()])
            .unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetViewport-firstViewport-01223"]);
    }

    #[test]
    fn ranges_ending_past_u32_max() {
        let mut recorder = recorder(full_device());

        let err = recorder
            .set_viewport(u32::MAX, [Viewport::default()])
            .unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetViewport-firstViewport-01223"]);

        let err = recorder
            .set_scissor(u32::MAX, [Scissor::default(), Scissor::default()])
            .unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetScissor-firstScissor-00592"]);

        recorder
            .set_color_blend_enable(u32::MAX, [true, false])
            .unwrap();
        let enables = recorder
            .tracker()
            .values()
            .color_blend_enable
            .as_ref()
            .unwrap();
        assert_eq!(enables.len(), 1);
        assert_eq!(enables.get(&u32::MAX), Some(&true));
    }

    #[test]
    fn inherited_viewports_cannot_be_set() {
        let mut recorder = recorder(full_device());
        recorder.set_inherited_viewport_depth_count(1).unwrap();

        let err = recorder.set_viewport(0, [Viewport::default()]).unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetViewport-commandBuffer-04821"]);

        let err = recorder
            .set_scissor_with_count([Scissor::default()])
            .unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetScissorWithCount-commandBuffer-04820"]);
    }

    #[test]
    fn line_width_requires_wide_lines() {
        let mut device = full_device();
        device.enabled_features.wide_lines = false;
        let mut recorder = recorder(device);

        recorder.set_line_width(1.0).unwrap();
        let err = recorder.set_line_width(2.0).unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetLineWidth-lineWidth-00788"]);
        assert_eq!(recorder.tracker().values().line_width, Some(1.0));
    }

    #[test]
    fn depth_bounds_range() {
        let mut recorder = recorder(DeviceCapabilities::default());
        recorder.set_depth_bounds(0.0..=1.0).unwrap();

        let err = recorder.set_depth_bounds(0.0..=2.0).unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetDepthBounds-maxDepthBounds-00601"]);
    }

    #[test]
    fn stencil_faces_are_tracked_separately() {
        let mut recorder = recorder(full_device());
        recorder
            .set_stencil_reference(StencilFaces::FRONT, 1)
            .unwrap()
            .set_stencil_reference(StencilFaces::BACK, 2)
            .unwrap();

        assert_eq!(
            recorder.tracker().values().stencil_reference,
            Some(StencilFaceValues {
                front: Some(1),
                back: Some(2),
            }),
        );

        let err = recorder
            .set_stencil_write_mask(StencilFaces::empty(), 0xff)
            .unwrap_err();
        assert_eq!(
            err.vuids,
            ["VUID-vkCmdSetStencilWriteMask-faceMask-requiredbitmask"],
        );
    }

    #[test]
    fn polygon_mode_features() {
        let mut recorder = recorder(DeviceCapabilities {
            enabled_features: DeviceFeatures {
                extended_dynamic_state3_polygon_mode: true,
                ..DeviceFeatures::empty()
            },
            ..Default::default()
        });

        recorder.set_polygon_mode(PolygonMode::Fill).unwrap();
        let err = recorder.set_polygon_mode(PolygonMode::Line).unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetPolygonModeEXT-fillModeNonSolid-07424"]);
        let err = recorder
            .set_polygon_mode(PolygonMode::FillRectangle)
            .unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetPolygonModeEXT-polygonMode-07425"]);
    }

    #[test]
    fn line_rasterization_mode_features() {
        let mut device = full_device();
        device.enabled_features.bresenham_lines = false;
        let mut recorder = recorder(device);

        recorder
            .set_line_rasterization_mode(LineRasterizationMode::Rectangular)
            .unwrap();
        let err = recorder
            .set_line_rasterization_mode(LineRasterizationMode::Bresenham)
            .unwrap_err();
        assert_eq!(
            err.vuids,
            ["VUID-vkCmdSetLineRasterizationModeEXT-lineRasterizationMode-07419"],
        );
    }

    #[test]
    fn color_blend_equation_rejects_advanced_ops() {
        let mut recorder = recorder(full_device());
        recorder
            .set_color_blend_equation(0, [AttachmentBlend::alpha()])
            .unwrap();

        let err = recorder
            .set_color_blend_equation(
                0,
                [AttachmentBlend {
                    color_blend_op: BlendOp::Multiply,
                    ..AttachmentBlend::alpha()
                }],
            )
            .unwrap_err();
        assert_eq!(err.vuids, ["VUID-VkColorBlendEquationEXT-colorBlendOp-07361"]);
        assert!(err.context.starts_with("equations[0]"));
    }

    #[test]
    fn color_blend_equation_dual_source() {
        let mut device = full_device();
        device.enabled_features.dual_src_blend = false;
        let mut recorder = recorder(device);

        let err = recorder
            .set_color_blend_equation(
                1,
                [AttachmentBlend {
                    dst_alpha_blend_factor: BlendFactor::Src1Alpha,
                    ..AttachmentBlend::alpha()
                }],
            )
            .unwrap_err();
        assert_eq!(err.vuids, ["VUID-VkColorBlendEquationEXT-dualSrcBlend-07360"]);
    }

    #[test]
    fn rasterization_stream_limits() {
        let mut recorder = recorder(full_device());
        let max = recorder.device().properties.max_transform_feedback_streams;

        recorder.set_rasterization_stream(0).unwrap();
        let err = recorder.set_rasterization_stream(max).unwrap_err();
        assert_eq!(
            err.vuids,
            ["VUID-vkCmdSetRasterizationStreamEXT-rasterizationStream-07412"],
        );
    }

    #[test]
    fn patch_control_points_limit() {
        let mut recorder = recorder(full_device());
        recorder.set_patch_control_points(3).unwrap();

        for num in [0, recorder.device().properties.max_tessellation_patch_size + 1] {
            let err = recorder.set_patch_control_points(num).unwrap_err();
            assert_eq!(
                err.vuids,
                ["VUID-vkCmdSetPatchControlPointsEXT-patchControlPoints-04874"],
            );
        }
    }

    #[test]
    fn vertex_input_also_sets_strides() {
        let mut recorder = recorder(full_device());
        recorder
            .set_vertex_input(VertexInputState::new().binding(
                1,
                VertexInputBindingDescription {
                    stride: 16,
                    input_rate: VertexInputRate::Vertex,
                },
            ))
            .unwrap();

        let tracker = recorder.tracker();
        assert!(tracker.is_set(DynamicState::VertexInput, SetScope::SinceBind));
        assert!(tracker.is_set(DynamicState::VertexInputBindingStride, SetScope::SinceBind));
        assert_eq!(
            tracker
                .values()
                .vertex_input_binding_stride
                .as_ref()
                .and_then(|strides| strides.get(&1).copied()),
            Some(16),
        );
    }

    #[test]
    fn line_stipple_factor() {
        let mut recorder = recorder(full_device());
        recorder.set_line_stipple(256, 0xffff).unwrap();

        let err = recorder.set_line_stipple(0, 0xffff).unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdSetLineStippleKHR-lineStippleFactor-02776"]);
    }
}
