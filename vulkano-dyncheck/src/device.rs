// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! What the device supports.
//!
//! Validation never queries a driver. Instead, the caller describes the device once with a
//! [`DeviceCapabilities`] and shares it with every [`CommandRecorder`] created for that device.
//!
//! [`CommandRecorder`]: crate::command_buffer::CommandRecorder

use crate::{
    format::{Format, FormatFeatures},
    image::{SampleCount, SampleCounts},
    NonExhaustive, Requires, RequiresOneOf, Version,
};
use foldhash::HashMap;

macro_rules! device_toggles {
    {
        $(#[doc = $ty_doc:literal])*
        $ty:ident {
            $(
                $(#[doc = $field_doc:literal])*
                $field:ident,
            )+
        }
    } => {
        $(#[doc = $ty_doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(default))]
        pub struct $ty {
            $(
                $(#[doc = $field_doc])*
                pub $field: bool,
            )+
        }

        impl $ty {
            /// Returns a value with nothing enabled.
            #[inline]
            pub const fn empty() -> Self {
                Self {
                    $($field: false,)+
                }
            }

            /// Returns a value with everything enabled.
            #[inline]
            pub const fn all() -> Self {
                Self {
                    $($field: true,)+
                }
            }

            /// Looks up a toggle by its snake-case name. Returns `false` for unknown names.
            pub fn is_enabled(&self, name: &str) -> bool {
                match name {
                    $(stringify!($field) => self.$field,)+
                    _ => false,
                }
            }

            /// Returns the names of everything that is enabled.
            pub fn iter_enabled(&self) -> impl Iterator<Item = &'static str> + '_ {
                [$((stringify!($field), self.$field)),+]
                    .into_iter()
                    .filter_map(|(name, enabled)| enabled.then_some(name))
            }
        }
    };
}

device_toggles! {
    /// The device features that have been enabled.
    DeviceFeatures {
        alpha_to_one,
        attachment_feedback_loop_dynamic_state,
        attachment_feedback_loop_layout,
        attachment_fragment_shading_rate,
        bresenham_lines,
        color_write_enable,
        constant_alpha_color_blend_factors,
        depth_bias_clamp,
        depth_bounds,
        depth_clamp,
        depth_clip_control,
        depth_clip_enable,
        dual_src_blend,
        exclusive_scissor,
        extended_dynamic_state,
        extended_dynamic_state2,
        extended_dynamic_state2_logic_op,
        extended_dynamic_state2_patch_control_points,
        extended_dynamic_state3_alpha_to_coverage_enable,
        extended_dynamic_state3_alpha_to_one_enable,
        extended_dynamic_state3_color_blend_advanced,
        extended_dynamic_state3_color_blend_enable,
        extended_dynamic_state3_color_blend_equation,
        extended_dynamic_state3_color_write_mask,
        extended_dynamic_state3_conservative_rasterization_mode,
        extended_dynamic_state3_coverage_modulation_mode,
        extended_dynamic_state3_coverage_modulation_table,
        extended_dynamic_state3_coverage_modulation_table_enable,
        extended_dynamic_state3_coverage_reduction_mode,
        extended_dynamic_state3_coverage_to_color_enable,
        extended_dynamic_state3_coverage_to_color_location,
        extended_dynamic_state3_depth_clamp_enable,
        extended_dynamic_state3_depth_clip_enable,
        extended_dynamic_state3_depth_clip_negative_one_to_one,
        extended_dynamic_state3_extra_primitive_overestimation_size,
        extended_dynamic_state3_line_rasterization_mode,
        extended_dynamic_state3_line_stipple_enable,
        extended_dynamic_state3_logic_op_enable,
        extended_dynamic_state3_polygon_mode,
        extended_dynamic_state3_provoking_vertex_mode,
        extended_dynamic_state3_rasterization_samples,
        extended_dynamic_state3_rasterization_stream,
        extended_dynamic_state3_representative_fragment_test_enable,
        extended_dynamic_state3_sample_locations_enable,
        extended_dynamic_state3_sample_mask,
        extended_dynamic_state3_shading_rate_image_enable,
        extended_dynamic_state3_tessellation_domain_origin,
        extended_dynamic_state3_viewport_swizzle,
        extended_dynamic_state3_viewport_w_scaling_enable,
        fill_mode_non_solid,
        geometry_shader,
        geometry_streams,
        legacy_vertex_attributes,
        logic_op,
        mesh_shader,
        multi_viewport,
        pipeline_fragment_shading_rate,
        primitive_fragment_shading_rate,
        primitive_topology_list_restart,
        primitive_topology_patch_list_restart,
        primitives_generated_query_with_non_zero_streams,
        provoking_vertex_last,
        rectangular_lines,
        shader_object,
        shading_rate_image,
        smooth_lines,
        stippled_bresenham_lines,
        stippled_rectangular_lines,
        stippled_smooth_lines,
        task_shader,
        tessellation_shader,
        transform_feedback,
        variable_multisample_rate,
        vertex_input_dynamic_state,
        wide_lines,
    }
}

device_toggles! {
    /// The device extensions that have been enabled.
    DeviceExtensions {
        amd_mixed_attachment_samples,
        ext_attachment_feedback_loop_dynamic_state,
        ext_blend_operation_advanced,
        ext_color_write_enable,
        ext_conservative_rasterization,
        ext_depth_clip_control,
        ext_depth_clip_enable,
        ext_depth_range_unrestricted,
        ext_discard_rectangles,
        ext_extended_dynamic_state,
        ext_extended_dynamic_state2,
        ext_extended_dynamic_state3,
        ext_line_rasterization,
        ext_primitives_generated_query,
        ext_provoking_vertex,
        ext_sample_locations,
        ext_shader_object,
        ext_transform_feedback,
        ext_vertex_input_dynamic_state,
        khr_fragment_shading_rate,
        khr_line_rasterization,
        khr_portability_subset,
        khr_ray_tracing_pipeline,
        nv_clip_space_w_scaling,
        nv_coverage_reduction_mode,
        nv_fill_rectangle,
        nv_fragment_coverage_to_color,
        nv_framebuffer_mixed_samples,
        nv_inherited_viewport_scissor,
        nv_representative_fragment_test,
        nv_scissor_exclusive,
        nv_shading_rate_image,
        nv_viewport_swizzle,
    }
}

/// Limits and properties of the device that dynamic state is checked against.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceProperties {
    pub max_viewports: u32,
    pub max_color_attachments: u32,
    pub max_tessellation_patch_size: u32,
    pub max_discard_rectangles: u32,
    pub max_transform_feedback_streams: u32,
    pub transform_feedback_rasterization_stream_select: bool,
    pub max_extra_primitive_overestimation_size: f32,
    pub conservative_point_and_line_rasterization: bool,
    pub advanced_blend_max_color_attachments: u32,
    pub advanced_blend_non_premultiplied_src_color: bool,
    pub advanced_blend_non_premultiplied_dst_color: bool,
    pub advanced_blend_correlated_overlap: bool,
    pub shading_rate_palette_size: u32,
    pub primitive_fragment_shading_rate_with_multiple_viewports: bool,
    pub fragment_shading_rate_non_trivial_combiner_ops: bool,
    pub framebuffer_no_attachments_sample_counts: SampleCounts,
    pub sample_location_sample_counts: SampleCounts,
    pub dynamic_primitive_topology_unrestricted: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: NonExhaustive,
}

impl Default for DeviceProperties {
    /// Returns the limits of a typical desktop implementation.
    #[inline]
    fn default() -> Self {
        Self {
            max_viewports: 16,
            max_color_attachments: 8,
            max_tessellation_patch_size: 32,
            max_discard_rectangles: 4,
            max_transform_feedback_streams: 4,
            transform_feedback_rasterization_stream_select: true,
            max_extra_primitive_overestimation_size: 0.75,
            conservative_point_and_line_rasterization: false,
            advanced_blend_max_color_attachments: 1,
            advanced_blend_non_premultiplied_src_color: true,
            advanced_blend_non_premultiplied_dst_color: true,
            advanced_blend_correlated_overlap: true,
            shading_rate_palette_size: 16,
            primitive_fragment_shading_rate_with_multiple_viewports: false,
            fragment_shading_rate_non_trivial_combiner_ops: true,
            framebuffer_no_attachments_sample_counts: SampleCounts::SAMPLE_1
                | SampleCounts::SAMPLE_2
                | SampleCounts::SAMPLE_4
                | SampleCounts::SAMPLE_8,
            sample_location_sample_counts: SampleCounts::SAMPLE_1
                | SampleCounts::SAMPLE_2
                | SampleCounts::SAMPLE_4
                | SampleCounts::SAMPLE_8,
            dynamic_primitive_topology_unrestricted: false,
            _ne: NonExhaustive(()),
        }
    }
}

/// Everything validation needs to know about the device.
///
/// This is the capability lookup that the rules consult. It is immutable once recording starts;
/// share it between recorders with an `Arc`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceCapabilities {
    /// The API version that the device was created with.
    pub api_version: Version,

    pub enabled_features: DeviceFeatures,

    pub enabled_extensions: DeviceExtensions,

    pub properties: DeviceProperties,

    /// The optimal-tiling features of each format. Formats that are absent support nothing.
    pub format_features: HashMap<Format, FormatFeatures>,

    /// `maxSampleLocationGridSize` for each sample count, as reported by
    /// `vkGetPhysicalDeviceMultisamplePropertiesEXT`. Counts that are absent report `[0, 0]`.
    pub max_sample_location_grid_sizes: HashMap<SampleCount, [u32; 2]>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: NonExhaustive,
}

impl Default for DeviceCapabilities {
    #[inline]
    fn default() -> Self {
        Self {
            api_version: Version::V1_0,
            enabled_features: DeviceFeatures::empty(),
            enabled_extensions: DeviceExtensions::empty(),
            properties: DeviceProperties::default(),
            format_features: HashMap::default(),
            max_sample_location_grid_sizes: HashMap::default(),
            _ne: NonExhaustive(()),
        }
    }
}

impl DeviceCapabilities {
    /// Returns whether a single requirement is met.
    pub fn satisfies(&self, requires: Requires) -> bool {
        match requires {
            Requires::APIVersion(version) => self.api_version >= version,
            Requires::DeviceFeature(name) => self.enabled_features.is_enabled(name),
            Requires::DeviceExtension(name) => self.enabled_extensions.is_enabled(name),
        }
    }

    /// Returns whether at least one of the alternatives is fully met.
    ///
    /// An empty set of alternatives is always met.
    pub fn supports(&self, requires_one_of: RequiresOneOf) -> bool {
        requires_one_of.is_empty()
            || requires_one_of
                .0
                .iter()
                .any(|all_of| all_of.0.iter().all(|&requires| self.satisfies(requires)))
    }

    /// Returns the features of `format`.
    #[inline]
    pub fn format_features(&self, format: Format) -> FormatFeatures {
        self.format_features
            .get(&format)
            .copied()
            .unwrap_or_default()
    }

    /// Returns the maximum sample location grid size for `samples`.
    #[inline]
    pub fn max_sample_location_grid_size(&self, samples: SampleCount) -> [u32; 2] {
        self.max_sample_location_grid_sizes
            .get(&samples)
            .copied()
            .unwrap_or_default()
    }

    /// Returns whether either of the mixed-samples extensions is enabled, which allows color and
    /// depth attachments to have different sample counts than the rasterizer.
    #[inline]
    pub fn allows_mixed_attachment_samples(&self) -> bool {
        self.enabled_extensions.amd_mixed_attachment_samples
            || self.enabled_extensions.nv_framebuffer_mixed_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequiresAllOf;

    #[test]
    fn toggles_by_name() {
        let features = DeviceFeatures {
            extended_dynamic_state: true,
            ..DeviceFeatures::empty()
        };

        assert!(features.is_enabled("extended_dynamic_state"));
        assert!(!features.is_enabled("extended_dynamic_state2"));
        assert!(!features.is_enabled("no_such_feature"));
        assert_eq!(
            features.iter_enabled().collect::<Vec<_>>(),
            ["extended_dynamic_state"],
        );
    }

    #[test]
    fn supports_alternatives() {
        let device = DeviceCapabilities {
            api_version: Version::V1_2,
            enabled_extensions: DeviceExtensions {
                ext_extended_dynamic_state: true,
                ..DeviceExtensions::empty()
            },
            ..Default::default()
        };

        assert!(device.supports(RequiresOneOf(&[])));
        assert!(device.supports(RequiresOneOf(&[
            RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
            RequiresAllOf(&[Requires::DeviceExtension("ext_extended_dynamic_state")]),
        ])));
        assert!(!device.supports(RequiresOneOf(&[
            RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
            RequiresAllOf(&[
                Requires::DeviceExtension("ext_extended_dynamic_state"),
                Requires::DeviceFeature("extended_dynamic_state"),
            ]),
        ])));
    }

    #[test]
    fn absent_format_has_no_features() {
        let device = DeviceCapabilities::default();
        assert!(device.format_features(Format::R8G8B8A8_UNORM).is_empty());
        assert_eq!(device.max_sample_location_grid_size(SampleCount::Sample4), [0, 0]);
    }
}
