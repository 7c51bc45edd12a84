// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The registry of state that can be supplied dynamically.
//!
//! Every [`DynamicState`] has a dense index, which [`DynamicStateSet`] uses as a bit position,
//! the name of the recording command that supplies it, and the device features or extensions
//! that gate that command.

use super::PipelineBindPoint;
use crate::{device::DeviceCapabilities, Requires, RequiresAllOf, RequiresOneOf, Version};
use std::fmt::{Debug, Display, Error as FmtError, Formatter};

macro_rules! dynamic_states {
    (@requires APIVersion $version:ident) => { Requires::APIVersion(Version::$version) };
    (@requires DeviceFeature $feature:ident) => { Requires::DeviceFeature(stringify!($feature)) };
    (@requires DeviceExtension $extension:ident) => {
        Requires::DeviceExtension(stringify!($extension))
    };

    {
        $(
            $(#[doc = $doc:literal])*
            $name:ident = $ffi:ident {
                command: $command:literal,
                $(requires: [
                    $([ $($kind:ident($requirement:ident)),+ $(,)? ]),+ $(,)?
                ],)?
                $(vuids: [ $($vuid:literal),+ $(,)? ],)?
            },
        )+
    } => {
        /// A part of the pipeline configuration that can be supplied by a command at recording
        /// time instead of being baked into the pipeline.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[non_exhaustive]
        #[repr(u8)]
        pub enum DynamicState {
            $(
                $(#[doc = $doc])*
                $name,
            )+
        }

        impl DynamicState {
            /// All dynamic states, in index order.
            pub const ALL: [DynamicState; DynamicState::COUNT] = [$(DynamicState::$name),+];

            /// The number of dynamic states.
            pub const COUNT: usize = [$(stringify!($name)),+].len();

            /// Returns the Vulkan name of the state, e.g. `VK_DYNAMIC_STATE_CULL_MODE`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$name => concat!("VK_DYNAMIC_STATE_", stringify!($ffi)),)+
                }
            }

            /// Returns the name of the command that sets the state.
            pub const fn command(self) -> &'static str {
                match self {
                    $(Self::$name => $command,)+
                }
            }

            /// Returns the API versions, features or extensions that allow the state to be
            /// dynamic. An empty value means the state is part of core Vulkan 1.0.
            pub fn requires_one_of(self) -> RequiresOneOf {
                match self {
                    $(
                        Self::$name => RequiresOneOf(&[
                            $($(
                                RequiresAllOf(&[
                                    $(dynamic_states!(@requires $kind $requirement)),+
                                ]),
                            )+)?
                        ]),
                    )+
                }
            }

            /// Returns the VUIDs that the command setting the state violates if it is recorded
            /// while none of [`requires_one_of`](Self::requires_one_of) is met.
            pub fn vuids(self) -> &'static [&'static str] {
                match self {
                    $(
                        Self::$name => &[$($($vuid),+)?],
                    )+
                }
            }
        }

        impl From<DynamicState> for ash::vk::DynamicState {
            #[inline]
            fn from(val: DynamicState) -> Self {
                match val {
                    $(DynamicState::$name => ash::vk::DynamicState::$ffi,)+
                }
            }
        }

        impl TryFrom<ash::vk::DynamicState> for DynamicState {
            type Error = ();

            #[inline]
            fn try_from(val: ash::vk::DynamicState) -> Result<Self, Self::Error> {
                Ok(match val {
                    $(ash::vk::DynamicState::$ffi => DynamicState::$name,)+
                    _ => return Err(()),
                })
            }
        }
    };
}

dynamic_states! {
    /// The elements of the viewport state's `viewports`.
    Viewport = VIEWPORT {
        command: "vkCmdSetViewport",
    },

    /// The elements of the viewport state's `scissors`.
    Scissor = SCISSOR {
        command: "vkCmdSetScissor",
    },

    /// The rasterization state's `line_width`.
    LineWidth = LINE_WIDTH {
        command: "vkCmdSetLineWidth",
    },

    /// The factors of the rasterization state's `depth_bias`.
    DepthBias = DEPTH_BIAS {
        command: "vkCmdSetDepthBias",
    },

    /// The color blend state's `blend_constants`.
    BlendConstants = BLEND_CONSTANTS {
        command: "vkCmdSetBlendConstants",
    },

    /// The range of the depth bounds test.
    DepthBounds = DEPTH_BOUNDS {
        command: "vkCmdSetDepthBounds",
    },

    StencilCompareMask = STENCIL_COMPARE_MASK {
        command: "vkCmdSetStencilCompareMask",
    },

    StencilWriteMask = STENCIL_WRITE_MASK {
        command: "vkCmdSetStencilWriteMask",
    },

    StencilReference = STENCIL_REFERENCE {
        command: "vkCmdSetStencilReference",
    },

    /// The rasterization state's `cull_mode`.
    CullMode = CULL_MODE {
        command: "vkCmdSetCullMode",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetCullMode-None-08971"],
    },

    /// The rasterization state's `front_face`.
    FrontFace = FRONT_FACE {
        command: "vkCmdSetFrontFace",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetFrontFace-None-08971"],
    },

    /// The input assembly state's `topology`.
    ///
    /// Unless `dynamic_primitive_topology_unrestricted` is supported, the value must be of the
    /// same [`PrimitiveTopologyClass`] as the pipeline's topology.
    ///
    /// [`PrimitiveTopologyClass`]: crate::pipeline::graphics::input_assembly::PrimitiveTopologyClass
    PrimitiveTopology = PRIMITIVE_TOPOLOGY {
        command: "vkCmdSetPrimitiveTopology",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetPrimitiveTopology-None-08971"],
    },

    /// Both the number and the elements of the viewport state's `viewports`.
    ViewportWithCount = VIEWPORT_WITH_COUNT {
        command: "vkCmdSetViewportWithCount",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetViewportWithCount-None-08971"],
    },

    /// Both the number and the elements of the viewport state's `scissors`.
    ScissorWithCount = SCISSOR_WITH_COUNT {
        command: "vkCmdSetScissorWithCount",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetScissorWithCount-None-08971"],
    },

    /// The `stride` of each vertex input binding, supplied when binding vertex buffers.
    VertexInputBindingStride = VERTEX_INPUT_BINDING_STRIDE {
        command: "vkCmdBindVertexBuffers2",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdBindVertexBuffers2-None-08971"],
    },

    DepthTestEnable = DEPTH_TEST_ENABLE {
        command: "vkCmdSetDepthTestEnable",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetDepthTestEnable-None-08971"],
    },

    DepthWriteEnable = DEPTH_WRITE_ENABLE {
        command: "vkCmdSetDepthWriteEnable",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetDepthWriteEnable-None-08971"],
    },

    DepthCompareOp = DEPTH_COMPARE_OP {
        command: "vkCmdSetDepthCompareOp",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetDepthCompareOp-None-08971"],
    },

    DepthBoundsTestEnable = DEPTH_BOUNDS_TEST_ENABLE {
        command: "vkCmdSetDepthBoundsTestEnable",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetDepthBoundsTestEnable-None-08971"],
    },

    StencilTestEnable = STENCIL_TEST_ENABLE {
        command: "vkCmdSetStencilTestEnable",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetStencilTestEnable-None-08971"],
    },

    /// The fail, pass, depth fail and compare operations of both stencil faces.
    StencilOp = STENCIL_OP {
        command: "vkCmdSetStencilOp",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetStencilOp-None-08971"],
    },

    RasterizerDiscardEnable = RASTERIZER_DISCARD_ENABLE {
        command: "vkCmdSetRasterizerDiscardEnable",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state2)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetRasterizerDiscardEnable-None-08970"],
    },

    /// Whether depth bias is enabled. The factors are [`DynamicState::DepthBias`].
    DepthBiasEnable = DEPTH_BIAS_ENABLE {
        command: "vkCmdSetDepthBiasEnable",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state2)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetDepthBiasEnable-None-08970"],
    },

    PrimitiveRestartEnable = PRIMITIVE_RESTART_ENABLE {
        command: "vkCmdSetPrimitiveRestartEnable",
        requires: [
            [APIVersion(V1_3)],
            [DeviceFeature(extended_dynamic_state2)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetPrimitiveRestartEnable-None-08970"],
    },

    ViewportWScaling = VIEWPORT_W_SCALING_NV {
        command: "vkCmdSetViewportWScalingNV",
        requires: [
            [DeviceExtension(nv_clip_space_w_scaling)],
        ],
    },

    /// The rectangles of the discard rectangle state.
    DiscardRectangle = DISCARD_RECTANGLE_EXT {
        command: "vkCmdSetDiscardRectangleEXT",
        requires: [
            [DeviceExtension(ext_discard_rectangles)],
        ],
    },

    DiscardRectangleEnable = DISCARD_RECTANGLE_ENABLE_EXT {
        command: "vkCmdSetDiscardRectangleEnableEXT",
        requires: [
            [DeviceExtension(ext_discard_rectangles)],
        ],
        vuids: ["VUID-vkCmdSetDiscardRectangleEnableEXT-specVersion-07851"],
    },

    DiscardRectangleMode = DISCARD_RECTANGLE_MODE_EXT {
        command: "vkCmdSetDiscardRectangleModeEXT",
        requires: [
            [DeviceExtension(ext_discard_rectangles)],
        ],
        vuids: ["VUID-vkCmdSetDiscardRectangleModeEXT-specVersion-07852"],
    },

    /// The custom sample locations, including their per-pixel sample count and grid size.
    SampleLocations = SAMPLE_LOCATIONS_EXT {
        command: "vkCmdSetSampleLocationsEXT",
        requires: [
            [DeviceExtension(ext_sample_locations)],
        ],
    },

    /// The stack size of a ray tracing pipeline. This is the only state that applies to the ray
    /// tracing bind point.
    RayTracingPipelineStackSize = RAY_TRACING_PIPELINE_STACK_SIZE_KHR {
        command: "vkCmdSetRayTracingPipelineStackSizeKHR",
        requires: [
            [DeviceExtension(khr_ray_tracing_pipeline)],
        ],
    },

    ViewportShadingRatePalette = VIEWPORT_SHADING_RATE_PALETTE_NV {
        command: "vkCmdSetViewportShadingRatePaletteNV",
        requires: [
            [DeviceFeature(shading_rate_image)],
        ],
        vuids: ["VUID-vkCmdSetViewportShadingRatePaletteNV-None-02064"],
    },

    ViewportCoarseSampleOrder = VIEWPORT_COARSE_SAMPLE_ORDER_NV {
        command: "vkCmdSetCoarseSampleOrderNV",
        requires: [
            [DeviceExtension(nv_shading_rate_image)],
        ],
    },

    ExclusiveScissorEnable = EXCLUSIVE_SCISSOR_ENABLE_NV {
        command: "vkCmdSetExclusiveScissorEnableNV",
        requires: [
            [DeviceFeature(exclusive_scissor)],
        ],
        vuids: ["VUID-vkCmdSetExclusiveScissorEnableNV-exclusiveScissor-07853"],
    },

    ExclusiveScissor = EXCLUSIVE_SCISSOR_NV {
        command: "vkCmdSetExclusiveScissorNV",
        requires: [
            [DeviceFeature(exclusive_scissor)],
        ],
        vuids: ["VUID-vkCmdSetExclusiveScissorNV-None-02031"],
    },

    /// The pipeline fragment size and the combiner operations.
    FragmentShadingRate = FRAGMENT_SHADING_RATE_KHR {
        command: "vkCmdSetFragmentShadingRateKHR",
        requires: [
            [DeviceFeature(pipeline_fragment_shading_rate)],
            [DeviceFeature(primitive_fragment_shading_rate)],
            [DeviceFeature(attachment_fragment_shading_rate)],
        ],
        vuids: ["VUID-vkCmdSetFragmentShadingRateKHR-pipelineFragmentShadingRate-04509"],
    },

    /// The factor and pattern of stippled lines.
    LineStipple = LINE_STIPPLE_EXT {
        command: "vkCmdSetLineStippleKHR",
        requires: [
            [DeviceExtension(ext_line_rasterization)],
            [DeviceExtension(khr_line_rasterization)],
        ],
    },

    /// The complete vertex input state, both bindings and attributes.
    VertexInput = VERTEX_INPUT_EXT {
        command: "vkCmdSetVertexInputEXT",
        requires: [
            [DeviceFeature(vertex_input_dynamic_state)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetVertexInputEXT-None-08546"],
    },

    PatchControlPoints = PATCH_CONTROL_POINTS_EXT {
        command: "vkCmdSetPatchControlPointsEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state2_patch_control_points)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetPatchControlPointsEXT-None-09422"],
    },

    LogicOp = LOGIC_OP_EXT {
        command: "vkCmdSetLogicOpEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state2_logic_op)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetLogicOpEXT-None-09422"],
    },

    /// The per-attachment color write enables.
    ColorWriteEnable = COLOR_WRITE_ENABLE_EXT {
        command: "vkCmdSetColorWriteEnableEXT",
        requires: [
            [DeviceFeature(color_write_enable)],
        ],
        vuids: ["VUID-vkCmdSetColorWriteEnableEXT-None-04803"],
    },

    TessellationDomainOrigin = TESSELLATION_DOMAIN_ORIGIN_EXT {
        command: "vkCmdSetTessellationDomainOriginEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_tessellation_domain_origin)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetTessellationDomainOriginEXT-None-09423"],
    },

    DepthClampEnable = DEPTH_CLAMP_ENABLE_EXT {
        command: "vkCmdSetDepthClampEnableEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_depth_clamp_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetDepthClampEnableEXT-None-09423"],
    },

    PolygonMode = POLYGON_MODE_EXT {
        command: "vkCmdSetPolygonModeEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_polygon_mode)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetPolygonModeEXT-None-09423"],
    },

    /// The multisample state's `rasterization_samples`.
    RasterizationSamples = RASTERIZATION_SAMPLES_EXT {
        command: "vkCmdSetRasterizationSamplesEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_rasterization_samples)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetRasterizationSamplesEXT-None-09423"],
    },

    SampleMask = SAMPLE_MASK_EXT {
        command: "vkCmdSetSampleMaskEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_sample_mask)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetSampleMaskEXT-None-09423"],
    },

    AlphaToCoverageEnable = ALPHA_TO_COVERAGE_ENABLE_EXT {
        command: "vkCmdSetAlphaToCoverageEnableEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_alpha_to_coverage_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetAlphaToCoverageEnableEXT-None-09423"],
    },

    AlphaToOneEnable = ALPHA_TO_ONE_ENABLE_EXT {
        command: "vkCmdSetAlphaToOneEnableEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_alpha_to_one_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetAlphaToOneEnableEXT-None-09423"],
    },

    LogicOpEnable = LOGIC_OP_ENABLE_EXT {
        command: "vkCmdSetLogicOpEnableEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_logic_op_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetLogicOpEnableEXT-None-09423"],
    },

    /// The per-attachment blend enables.
    ColorBlendEnable = COLOR_BLEND_ENABLE_EXT {
        command: "vkCmdSetColorBlendEnableEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_color_blend_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetColorBlendEnableEXT-None-09423"],
    },

    /// The per-attachment blend factors and operations.
    ColorBlendEquation = COLOR_BLEND_EQUATION_EXT {
        command: "vkCmdSetColorBlendEquationEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_color_blend_equation)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetColorBlendEquationEXT-None-09423"],
    },

    /// The per-attachment color write masks.
    ColorWriteMask = COLOR_WRITE_MASK_EXT {
        command: "vkCmdSetColorWriteMaskEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_color_write_mask)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetColorWriteMaskEXT-None-09423"],
    },

    RasterizationStream = RASTERIZATION_STREAM_EXT {
        command: "vkCmdSetRasterizationStreamEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_rasterization_stream)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetRasterizationStreamEXT-None-09423"],
    },

    ConservativeRasterizationMode = CONSERVATIVE_RASTERIZATION_MODE_EXT {
        command: "vkCmdSetConservativeRasterizationModeEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_conservative_rasterization_mode)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetConservativeRasterizationModeEXT-None-09423"],
    },

    ExtraPrimitiveOverestimationSize = EXTRA_PRIMITIVE_OVERESTIMATION_SIZE_EXT {
        command: "vkCmdSetExtraPrimitiveOverestimationSizeEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_extra_primitive_overestimation_size)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetExtraPrimitiveOverestimationSizeEXT-None-09423"],
    },

    DepthClipEnable = DEPTH_CLIP_ENABLE_EXT {
        command: "vkCmdSetDepthClipEnableEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_depth_clip_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetDepthClipEnableEXT-None-09423"],
    },

    SampleLocationsEnable = SAMPLE_LOCATIONS_ENABLE_EXT {
        command: "vkCmdSetSampleLocationsEnableEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_sample_locations_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetSampleLocationsEnableEXT-None-09423"],
    },

    /// The per-attachment advanced blend parameters.
    ColorBlendAdvanced = COLOR_BLEND_ADVANCED_EXT {
        command: "vkCmdSetColorBlendAdvancedEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_color_blend_advanced)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetColorBlendAdvancedEXT-None-09423"],
    },

    ProvokingVertexMode = PROVOKING_VERTEX_MODE_EXT {
        command: "vkCmdSetProvokingVertexModeEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_provoking_vertex_mode)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetProvokingVertexModeEXT-None-09423"],
    },

    LineRasterizationMode = LINE_RASTERIZATION_MODE_EXT {
        command: "vkCmdSetLineRasterizationModeEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_line_rasterization_mode)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetLineRasterizationModeEXT-None-09423"],
    },

    LineStippleEnable = LINE_STIPPLE_ENABLE_EXT {
        command: "vkCmdSetLineStippleEnableEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_line_stipple_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetLineStippleEnableEXT-None-09423"],
    },

    DepthClipNegativeOneToOne = DEPTH_CLIP_NEGATIVE_ONE_TO_ONE_EXT {
        command: "vkCmdSetDepthClipNegativeOneToOneEXT",
        requires: [
            [DeviceFeature(extended_dynamic_state3_depth_clip_negative_one_to_one)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetDepthClipNegativeOneToOneEXT-None-09423"],
    },

    ViewportWScalingEnable = VIEWPORT_W_SCALING_ENABLE_NV {
        command: "vkCmdSetViewportWScalingEnableNV",
        requires: [
            [DeviceFeature(extended_dynamic_state3_viewport_w_scaling_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetViewportWScalingEnableNV-None-09423"],
    },

    ViewportSwizzle = VIEWPORT_SWIZZLE_NV {
        command: "vkCmdSetViewportSwizzleNV",
        requires: [
            [DeviceFeature(extended_dynamic_state3_viewport_swizzle)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetViewportSwizzleNV-None-09423"],
    },

    CoverageToColorEnable = COVERAGE_TO_COLOR_ENABLE_NV {
        command: "vkCmdSetCoverageToColorEnableNV",
        requires: [
            [DeviceFeature(extended_dynamic_state3_coverage_to_color_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetCoverageToColorEnableNV-None-09423"],
    },

    CoverageToColorLocation = COVERAGE_TO_COLOR_LOCATION_NV {
        command: "vkCmdSetCoverageToColorLocationNV",
        requires: [
            [DeviceFeature(extended_dynamic_state3_coverage_to_color_location)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetCoverageToColorLocationNV-None-09423"],
    },

    CoverageModulationMode = COVERAGE_MODULATION_MODE_NV {
        command: "vkCmdSetCoverageModulationModeNV",
        requires: [
            [DeviceFeature(extended_dynamic_state3_coverage_modulation_mode)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetCoverageModulationModeNV-None-09423"],
    },

    CoverageModulationTableEnable = COVERAGE_MODULATION_TABLE_ENABLE_NV {
        command: "vkCmdSetCoverageModulationTableEnableNV",
        requires: [
            [DeviceFeature(extended_dynamic_state3_coverage_modulation_table_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetCoverageModulationTableEnableNV-None-09423"],
    },

    CoverageModulationTable = COVERAGE_MODULATION_TABLE_NV {
        command: "vkCmdSetCoverageModulationTableNV",
        requires: [
            [DeviceFeature(extended_dynamic_state3_coverage_modulation_table)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetCoverageModulationTableNV-None-09423"],
    },

    ShadingRateImageEnable = SHADING_RATE_IMAGE_ENABLE_NV {
        command: "vkCmdSetShadingRateImageEnableNV",
        requires: [
            [DeviceFeature(extended_dynamic_state3_shading_rate_image_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetShadingRateImageEnableNV-None-09423"],
    },

    RepresentativeFragmentTestEnable = REPRESENTATIVE_FRAGMENT_TEST_ENABLE_NV {
        command: "vkCmdSetRepresentativeFragmentTestEnableNV",
        requires: [
            [DeviceFeature(extended_dynamic_state3_representative_fragment_test_enable)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetRepresentativeFragmentTestEnableNV-None-09423"],
    },

    CoverageReductionMode = COVERAGE_REDUCTION_MODE_NV {
        command: "vkCmdSetCoverageReductionModeNV",
        requires: [
            [DeviceFeature(extended_dynamic_state3_coverage_reduction_mode)],
            [DeviceFeature(shader_object)],
        ],
        vuids: ["VUID-vkCmdSetCoverageReductionModeNV-None-09423"],
    },

    /// The image aspects that may be read while they are also written as attachments.
    AttachmentFeedbackLoopEnable = ATTACHMENT_FEEDBACK_LOOP_ENABLE_EXT {
        command: "vkCmdSetAttachmentFeedbackLoopEnableEXT",
        requires: [
            [DeviceFeature(attachment_feedback_loop_dynamic_state)],
        ],
        vuids: [
            "VUID-vkCmdSetAttachmentFeedbackLoopEnableEXT-attachmentFeedbackLoopDynamicState-08862",
        ],
    },
}

/// The registry entry of a dynamic state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DynamicStateDescription {
    /// The Vulkan name, e.g. `VK_DYNAMIC_STATE_CULL_MODE`.
    pub name: &'static str,

    /// The command that sets the state, e.g. `vkCmdSetCullMode`.
    pub command: &'static str,

    /// The gate: what the device needs for the state to be dynamic.
    pub requires_one_of: RequiresOneOf,
}

impl DynamicState {
    /// Returns the dense index of the state, in `0..DynamicState::COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the state with the given dense index.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the registry entry of the state.
    #[inline]
    pub fn describe(self) -> DynamicStateDescription {
        DynamicStateDescription {
            name: self.name(),
            command: self.command(),
            requires_one_of: self.requires_one_of(),
        }
    }

    /// Returns whether `device` allows the state to be dynamic.
    #[inline]
    pub fn is_supported(self, device: &DeviceCapabilities) -> bool {
        device.supports(self.requires_one_of())
    }

    /// Returns the bind point whose binds reset the state's since-bind status.
    #[inline]
    pub const fn bind_point(self) -> PipelineBindPoint {
        match self {
            Self::RayTracingPipelineStackSize => PipelineBindPoint::RayTracing,
            _ => PipelineBindPoint::Graphics,
        }
    }

    /// Returns whether the state holds one value per viewport, scissor, rectangle or
    /// attachment, set in ranges by a `first`/`count` pair.
    #[inline]
    pub const fn is_indexed(self) -> bool {
        matches!(
            self,
            Self::Viewport
                | Self::Scissor
                | Self::ViewportWScaling
                | Self::DiscardRectangle
                | Self::ViewportShadingRatePalette
                | Self::ExclusiveScissorEnable
                | Self::ExclusiveScissor
                | Self::ColorBlendEnable
                | Self::ColorBlendEquation
                | Self::ColorWriteMask
                | Self::ColorBlendAdvanced
                | Self::ViewportSwizzle
        )
    }
}

const WORDS: usize = DynamicState::COUNT.div_ceil(64);

/// A set of [`DynamicState`]s, stored as a bitset indexed by [`DynamicState::index`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DynamicStateSet([u64; WORDS]);

impl DynamicStateSet {
    /// Returns an empty set.
    #[inline]
    pub const fn empty() -> Self {
        Self([0; WORDS])
    }

    /// Returns a set containing every dynamic state.
    #[inline]
    pub fn all() -> Self {
        DynamicState::ALL.into_iter().collect()
    }

    #[inline]
    const fn position(state: DynamicState) -> (usize, u64) {
        let index = state.index();
        (index / 64, 1 << (index % 64))
    }

    /// Adds `state` to the set. Returns whether it was newly added.
    #[inline]
    pub fn insert(&mut self, state: DynamicState) -> bool {
        let (word, bit) = Self::position(state);
        let added = self.0[word] & bit == 0;
        self.0[word] |= bit;
        added
    }

    /// Removes `state` from the set. Returns whether it was present.
    #[inline]
    pub fn remove(&mut self, state: DynamicState) -> bool {
        let (word, bit) = Self::position(state);
        let present = self.0[word] & bit != 0;
        self.0[word] &= !bit;
        present
    }

    #[inline]
    pub const fn contains(&self, state: DynamicState) -> bool {
        let (word, bit) = Self::position(state);
        self.0[word] & bit != 0
    }

    /// Removes every state from the set.
    #[inline]
    pub fn clear(&mut self) {
        self.0 = [0; WORDS];
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&word| word == 0)
    }

    /// Returns the number of states in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.iter().map(|word| word.count_ones() as usize).sum()
    }

    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        let mut result = *self;
        result.0.iter_mut().zip(other.0).for_each(|(a, b)| *a |= b);
        result
    }

    #[inline]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = *self;
        result.0.iter_mut().zip(other.0).for_each(|(a, b)| *a &= b);
        result
    }

    /// Returns the states in `self` that are not in `other`.
    #[inline]
    pub fn difference(&self, other: &Self) -> Self {
        let mut result = *self;
        result.0.iter_mut().zip(other.0).for_each(|(a, b)| *a &= !b);
        result
    }

    /// Returns whether every state in `self` is also in `other`.
    #[inline]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.difference(other).is_empty()
    }

    /// Iterates over the states in the set in index order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = DynamicState> + '_ {
        DynamicState::ALL
            .into_iter()
            .filter(move |&state| self.contains(state))
    }

    /// Returns the commands that set the states in the set, separated by `, `.
    pub fn commands(&self) -> String {
        let mut commands: Vec<&'static str> = self.iter().map(DynamicState::command).collect();
        commands.dedup();
        commands.join(", ")
    }
}

impl FromIterator<DynamicState> for DynamicStateSet {
    fn from_iter<T: IntoIterator<Item = DynamicState>>(iter: T) -> Self {
        let mut set = Self::empty();

        for state in iter {
            set.insert(state);
        }

        set
    }
}

impl<const N: usize> From<[DynamicState; N]> for DynamicStateSet {
    #[inline]
    fn from(val: [DynamicState; N]) -> Self {
        val.into_iter().collect()
    }
}

impl Extend<DynamicState> for DynamicStateSet {
    fn extend<T: IntoIterator<Item = DynamicState>>(&mut self, iter: T) {
        for state in iter {
            self.insert(state);
        }
    }
}

impl std::ops::BitOr for DynamicStateSet {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(&rhs)
    }
}

impl std::ops::BitOrAssign for DynamicStateSet {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(&rhs);
    }
}

impl std::ops::BitAnd for DynamicStateSet {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(&rhs)
    }
}

impl std::ops::BitAndAssign for DynamicStateSet {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        *self = self.intersection(&rhs);
    }
}

impl std::ops::Sub for DynamicStateSet {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.difference(&rhs)
    }
}

impl std::ops::SubAssign for DynamicStateSet {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.difference(&rhs);
    }
}

impl Debug for DynamicStateSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Display for DynamicStateSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let mut states = self.iter();

        if let Some(first) = states.next() {
            write!(f, "{}", first.name())?;

            for state in states {
                write!(f, ", {}", state.name())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceExtensions, DeviceFeatures};

    #[test]
    fn indices_are_dense() {
        for (index, state) in DynamicState::ALL.into_iter().enumerate() {
            assert_eq!(state.index(), index);
            assert_eq!(DynamicState::from_index(index), Some(state));
        }

        assert_eq!(DynamicState::from_index(DynamicState::COUNT), None);
    }

    #[test]
    fn ash_round_trip() {
        for state in DynamicState::ALL {
            let raw: ash::vk::DynamicState = state.into();
            assert_eq!(DynamicState::try_from(raw), Ok(state));
        }

        assert_eq!(
            ash::vk::DynamicState::from(DynamicState::CullMode),
            ash::vk::DynamicState::CULL_MODE,
        );
        assert!(DynamicState::try_from(ash::vk::DynamicState::from_raw(-1)).is_err());
    }

    #[test]
    fn describe() {
        let description = DynamicState::CullMode.describe();
        assert_eq!(description.name, "VK_DYNAMIC_STATE_CULL_MODE");
        assert_eq!(description.command, "vkCmdSetCullMode");
        assert_eq!(description.requires_one_of.len(), 3);

        let description = DynamicState::Viewport.describe();
        assert_eq!(description.command, "vkCmdSetViewport");
        assert!(description.requires_one_of.is_empty());
    }

    #[test]
    fn gates() {
        let core = DeviceCapabilities::default();
        assert!(DynamicState::Viewport.is_supported(&core));
        assert!(!DynamicState::CullMode.is_supported(&core));
        assert!(!DynamicState::PolygonMode.is_supported(&core));

        let eds = DeviceCapabilities {
            enabled_features: DeviceFeatures {
                extended_dynamic_state: true,
                ..DeviceFeatures::empty()
            },
            ..Default::default()
        };
        assert!(DynamicState::CullMode.is_supported(&eds));
        assert!(!DynamicState::RasterizerDiscardEnable.is_supported(&eds));

        let shader_object = DeviceCapabilities {
            enabled_features: DeviceFeatures {
                shader_object: true,
                ..DeviceFeatures::empty()
            },
            ..Default::default()
        };
        assert!(DynamicState::PolygonMode.is_supported(&shader_object));
        assert!(!DynamicState::ColorWriteEnable.is_supported(&shader_object));

        let discard = DeviceCapabilities {
            enabled_extensions: DeviceExtensions {
                ext_discard_rectangles: true,
                ..DeviceExtensions::empty()
            },
            ..Default::default()
        };
        assert!(DynamicState::DiscardRectangleMode.is_supported(&discard));
    }

    #[test]
    fn set_operations() {
        let mut set = DynamicStateSet::empty();
        assert!(set.is_empty());
        assert!(set.insert(DynamicState::CullMode));
        assert!(!set.insert(DynamicState::CullMode));
        assert!(set.insert(DynamicState::AttachmentFeedbackLoopEnable));
        assert_eq!(set.len(), 2);
        assert!(set.contains(DynamicState::AttachmentFeedbackLoopEnable));

        let other = DynamicStateSet::from([DynamicState::CullMode, DynamicState::FrontFace]);
        assert_eq!(
            (set & other).iter().collect::<Vec<_>>(),
            [DynamicState::CullMode],
        );
        assert_eq!(
            (set - other).iter().collect::<Vec<_>>(),
            [DynamicState::AttachmentFeedbackLoopEnable],
        );
        assert_eq!((set | other).len(), 3);
        assert!((set & other).is_subset(&set));

        assert!(set.remove(DynamicState::CullMode));
        assert!(!set.remove(DynamicState::CullMode));
        assert_eq!(DynamicStateSet::all().len(), DynamicState::COUNT);
    }

    #[test]
    fn display() {
        let set = DynamicStateSet::from([DynamicState::FrontFace, DynamicState::Viewport]);
        assert_eq!(
            set.to_string(),
            "VK_DYNAMIC_STATE_VIEWPORT, VK_DYNAMIC_STATE_FRONT_FACE",
        );
        assert_eq!(set.commands(), "vkCmdSetViewport, vkCmdSetFrontFace");
    }
}
