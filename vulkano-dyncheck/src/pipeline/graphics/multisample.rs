// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Generates multiple fragments per framebuffer pixel when rasterizing. This can be used for
//! anti-aliasing.

use crate::{
    device::DeviceCapabilities, image::SampleCount, macros::vulkan_enum, Requires, RequiresAllOf,
    RequiresOneOf, ValidationError,
};

/// State of the multisampling.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MultisampleState {
    /// The number of rasterization samples to take per pixel. The GPU will pick this many
    /// different locations within each pixel and assign to each of these locations a different
    /// depth value. The depth and stencil test will then be run for each sample.
    ///
    /// The default value is [`SampleCount::Sample1`].
    pub rasterization_samples: SampleCount,

    /// A mask of bits that is ANDed with the coverage mask of each set of `rasterization_samples`
    /// samples. Only the first `rasterization_samples / 32` bits are used, the rest is ignored.
    ///
    /// The default value is `[0xFFFFFFFF; 2]`.
    pub sample_mask: [u32; 2],

    /// Controls whether the alpha value of the fragment will be used in an implementation-defined
    /// way to determine which samples get disabled or not. For example if the alpha value is 0.5,
    /// then about half of the samples will be discarded. If you render to a multisample image,
    /// this means that the color will end up being mixed with whatever color was underneath,
    /// which gives the same effect as alpha blending.
    ///
    /// The default value is `false`.
    pub alpha_to_coverage_enable: bool,

    /// Controls whether the alpha value of all the samples will be forced to 1.0 (or the
    /// maximum possible value) after the effects of `alpha_to_coverage` have been applied.
    ///
    /// If set to `true`, the [`alpha_to_one`](crate::device::DeviceFeatures::alpha_to_one)
    /// feature must be enabled on the device.
    ///
    /// The default value is `false`.
    pub alpha_to_one_enable: bool,

    /// Custom sample locations.
    ///
    /// If set to `Some`, the
    /// [`ext_sample_locations`](crate::device::DeviceExtensions::ext_sample_locations)
    /// extension must be enabled on the device.
    ///
    /// The default value is `None`.
    pub sample_locations: Option<SampleLocationsState>,

    /// If `Some`, the coverage of each fragment is written to the color attachment at this
    /// location.
    ///
    /// The default value is `None`.
    pub coverage_to_color_location: Option<u32>,

    /// How color and alpha values are modulated by the coverage when the rasterization sample
    /// count is higher than the color attachment sample count.
    ///
    /// The default value is [`CoverageModulationMode::None`].
    pub coverage_modulation_mode: CoverageModulationMode,

    /// If `Some`, a table of modulation factors, one per covered sample count, replaces the
    /// default coverage modulation.
    ///
    /// The default value is `None`.
    pub coverage_modulation_table: Option<Vec<f32>>,

    /// How the coverage is reduced to the color sample count.
    ///
    /// The default value is [`CoverageReductionMode::Merge`].
    pub coverage_reduction_mode: CoverageReductionMode,

    /// Whether the representative fragment test is enabled.
    ///
    /// The default value is `false`.
    pub representative_fragment_test_enable: bool,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: crate::NonExhaustive,
}

impl MultisampleState {
    /// Creates a `MultisampleState` with multisampling disabled.
    #[inline]
    pub fn new() -> Self {
        Self {
            rasterization_samples: SampleCount::Sample1,
            sample_mask: [0xFFFFFFFF; 2],
            alpha_to_coverage_enable: false,
            alpha_to_one_enable: false,
            sample_locations: None,
            coverage_to_color_location: None,
            coverage_modulation_mode: CoverageModulationMode::None,
            coverage_modulation_table: None,
            coverage_reduction_mode: CoverageReductionMode::Merge,
            representative_fragment_test_enable: false,
            _ne: crate::NonExhaustive(()),
        }
    }

    /// Returns whether custom sample locations are enabled.
    #[inline]
    pub fn sample_locations_enable(&self) -> bool {
        self.sample_locations
            .as_ref()
            .is_some_and(|state| state.sample_locations_enable)
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let &Self {
            rasterization_samples,
            sample_mask: _,
            alpha_to_coverage_enable: _,
            alpha_to_one_enable,
            ref sample_locations,
            coverage_to_color_location,
            coverage_modulation_mode,
            ref coverage_modulation_table,
            coverage_reduction_mode,
            representative_fragment_test_enable,
            _ne: _,
        } = self;

        rasterization_samples.validate_device(device).map_err(|err| {
            err.add_context("rasterization_samples").set_vuids(&[
                "VUID-VkPipelineMultisampleStateCreateInfo-rasterizationSamples-parameter",
            ])
        })?;

        if alpha_to_one_enable && !device.enabled_features.alpha_to_one {
            return Err(Box::new(ValidationError {
                context: "alpha_to_one_enable".into(),
                problem: "is `true`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "alpha_to_one",
                )])]),
                vuids: &["VUID-VkPipelineMultisampleStateCreateInfo-alphaToOneEnable-00785"],
                ..Default::default()
            }));
        }

        if let Some(sample_locations) = sample_locations {
            if !device.enabled_extensions.ext_sample_locations {
                return Err(Box::new(ValidationError {
                    context: "sample_locations".into(),
                    problem: "is `Some`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_sample_locations"),
                    ])]),
                    ..Default::default()
                }));
            }

            sample_locations
                .sample_locations_info
                .validate(device)
                .map_err(|err| err.add_context("sample_locations.sample_locations_info"))?;
        }

        if coverage_to_color_location.is_some()
            && !device.enabled_extensions.nv_fragment_coverage_to_color
        {
            return Err(Box::new(ValidationError {
                context: "coverage_to_color_location".into(),
                problem: "is `Some`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "nv_fragment_coverage_to_color",
                )])]),
                ..Default::default()
            }));
        }

        if (coverage_modulation_mode != CoverageModulationMode::None
            || coverage_modulation_table.is_some())
            && !device.enabled_extensions.nv_framebuffer_mixed_samples
        {
            return Err(Box::new(ValidationError {
                problem: "`coverage_modulation_mode` is not `CoverageModulationMode::None`, or \
                    `coverage_modulation_table` is `Some`"
                    .into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "nv_framebuffer_mixed_samples",
                )])]),
                ..Default::default()
            }));
        }

        if coverage_reduction_mode != CoverageReductionMode::Merge
            && !device.enabled_extensions.nv_coverage_reduction_mode
        {
            return Err(Box::new(ValidationError {
                context: "coverage_reduction_mode".into(),
                problem: "is not `CoverageReductionMode::Merge`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "nv_coverage_reduction_mode",
                )])]),
                ..Default::default()
            }));
        }

        if representative_fragment_test_enable
            && !device.enabled_extensions.nv_representative_fragment_test
        {
            return Err(Box::new(ValidationError {
                context: "representative_fragment_test_enable".into(),
                problem: "is `true`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "nv_representative_fragment_test",
                )])]),
                ..Default::default()
            }));
        }

        Ok(())
    }
}

impl Default for MultisampleState {
    /// Returns [`MultisampleState::new()`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// The sample locations part of a pipeline's multisample state.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleLocationsState {
    /// Whether custom sample locations are used.
    pub sample_locations_enable: bool,

    /// The sample locations to use when they are enabled.
    pub sample_locations_info: SampleLocationsInfo,
}

/// A grid of custom sample locations. This is also the value of the `SampleLocations` dynamic
/// state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleLocationsInfo {
    /// The number of sample locations per pixel.
    pub sample_locations_per_pixel: SampleCount,

    /// The size of the pixel grid that the locations are defined for.
    pub sample_location_grid_size: [u32; 2],

    /// The sample locations, as `[x, y]` pairs in the range `[0, 1]`. There must be
    /// `sample_locations_per_pixel` times the number of pixels in the grid.
    pub sample_locations: Vec<[f32; 2]>,
}

impl Default for SampleLocationsInfo {
    #[inline]
    fn default() -> Self {
        Self {
            sample_locations_per_pixel: SampleCount::Sample1,
            sample_location_grid_size: [1, 1],
            sample_locations: vec![[0.5, 0.5]],
        }
    }
}

impl SampleLocationsInfo {
    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let &Self {
            sample_locations_per_pixel,
            sample_location_grid_size,
            ref sample_locations,
        } = self;

        if !device
            .properties
            .sample_location_sample_counts
            .contains_enum(sample_locations_per_pixel)
        {
            return Err(Box::new(ValidationError {
                context: "sample_locations_per_pixel".into(),
                problem: "is not one of the `sample_location_sample_counts` of the device".into(),
                vuids: &["VUID-VkSampleLocationsInfoEXT-sampleLocationsPerPixel-01526"],
                ..Default::default()
            }));
        }

        let expected = sample_locations_per_pixel.count() as u64
            * sample_location_grid_size[0] as u64
            * sample_location_grid_size[1] as u64;

        if sample_locations.len() as u64 != expected {
            return Err(Box::new(ValidationError {
                context: "sample_locations".into(),
                problem: format!(
                    "has {} elements, but `sample_locations_per_pixel` times the grid size is {}",
                    sample_locations.len(),
                    expected,
                )
                .into(),
                vuids: &["VUID-VkSampleLocationsInfoEXT-sampleLocationsCount-01527"],
                ..Default::default()
            }));
        }

        Ok(())
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// How the coverage modulates color and alpha when rasterizing with more samples than the
    /// color attachment has.
    CoverageModulationMode = CoverageModulationModeNV(i32);

    /// No modulation.
    None = NONE,

    /// The color components are modulated.
    Rgb = RGB,

    /// The alpha component is modulated.
    Alpha = ALPHA,

    /// All components are modulated.
    Rgba = RGBA,
}

impl Default for CoverageModulationMode {
    #[inline]
    fn default() -> Self {
        CoverageModulationMode::None
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// How the rasterization coverage is reduced to the color sample count.
    CoverageReductionMode = CoverageReductionModeNV(i32);

    /// Samples that map to the same color sample are merged.
    Merge = MERGE,

    /// Only the samples that map directly to a color sample are kept.
    Truncate = TRUNCATE,
}

impl Default for CoverageReductionMode {
    #[inline]
    fn default() -> Self {
        CoverageReductionMode::Merge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::SampleCounts;

    #[test]
    fn sample_location_count() {
        let device = DeviceCapabilities::default();
        let mut info = SampleLocationsInfo {
            sample_locations_per_pixel: SampleCount::Sample4,
            sample_location_grid_size: [2, 1],
            sample_locations: vec![[0.5, 0.5]; 8],
        };
        assert!(info.validate(&device).is_ok());

        info.sample_locations.pop();
        let err = info.validate(&device).unwrap_err();
        assert_eq!(
            err.vuids,
            ["VUID-VkSampleLocationsInfoEXT-sampleLocationsCount-01527"],
        );
    }

    #[test]
    fn sample_location_sample_counts() {
        let mut device = DeviceCapabilities::default();
        device.properties.sample_location_sample_counts = SampleCounts::SAMPLE_1;

        let info = SampleLocationsInfo {
            sample_locations_per_pixel: SampleCount::Sample2,
            sample_location_grid_size: [1, 1],
            sample_locations: vec![[0.5, 0.5]; 2],
        };
        assert!(info.validate(&device).is_err());
    }
}
