// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Configures the area of the framebuffer that pixels will be written to.
//!
//! There are two different concepts to determine where things will be drawn:
//!
//! - The viewport is the region of the image which corresponds to the vertex coordinates `-1.0` to
//!   `1.0`.
//! - Any pixel outside of the scissor box will be discarded.
//!
//! In other words, modifying the viewport will stretch the image, while modifying the scissor box
//! acts like a filter.
//!
//! If the corresponding dynamic states are enabled on the pipeline, the viewports and scissors
//! listed here only provide the counts, and the actual values must be set in the command buffer
//! before drawing.

use crate::{
    device::DeviceCapabilities, macros::vulkan_enum, Requires, RequiresAllOf, RequiresOneOf,
    ValidationError,
};
use smallvec::{smallvec, SmallVec};
use std::ops::RangeInclusive;

/// List of viewports and scissors that are used when rendering.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewportState {
    /// Specifies the viewport transforms.
    ///
    /// When either `DynamicState::Viewport` or `DynamicState::ViewportWithCount` is dynamic, only
    /// the length of this list matters, and the values are set in the command buffer instead.
    /// With `ViewportWithCount` even the length is set dynamically.
    ///
    /// The default value is a single element of `Viewport::default()`.
    pub viewports: SmallVec<[Viewport; 2]>,

    /// Specifies the scissor rectangles.
    ///
    /// The same rules apply as for `viewports`, with `DynamicState::Scissor` and
    /// `DynamicState::ScissorWithCount`.
    ///
    /// The default value is a single element of `Scissor::default()`.
    pub scissors: SmallVec<[Scissor; 2]>,

    /// Whether viewport W scaling is applied.
    ///
    /// If set to `true`, the
    /// [`nv_clip_space_w_scaling`](crate::device::DeviceExtensions::nv_clip_space_w_scaling)
    /// extension must be enabled on the device.
    ///
    /// The default value is `false`.
    pub viewport_w_scaling_enable: bool,

    /// The W scaling factor of each viewport.
    ///
    /// The default value is empty.
    pub viewport_w_scalings: Vec<ViewportWScaling>,

    /// The coordinate swizzle of each viewport. If empty, no swizzling is done.
    ///
    /// If not empty, the
    /// [`nv_viewport_swizzle`](crate::device::DeviceExtensions::nv_viewport_swizzle) extension
    /// must be enabled on the device.
    ///
    /// The default value is empty.
    pub viewport_swizzles: Vec<ViewportSwizzle>,

    /// The exclusive scissor rectangles. If empty, no exclusive scissor test is done.
    ///
    /// If not empty, the [`exclusive_scissor`](crate::device::DeviceFeatures::exclusive_scissor)
    /// feature must be enabled on the device.
    ///
    /// The default value is empty.
    pub exclusive_scissors: Vec<Scissor>,

    /// Whether the shading rate image is used.
    ///
    /// If set to `true`, the [`shading_rate_image`](crate::device::DeviceFeatures::shading_rate_image)
    /// feature must be enabled on the device.
    ///
    /// The default value is `false`.
    pub shading_rate_image_enable: bool,

    /// The shading rate palette of each viewport.
    ///
    /// The default value is empty.
    pub shading_rate_palettes: Vec<ShadingRatePalette>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: crate::NonExhaustive,
}

impl ViewportState {
    /// Creates a `ViewportState` with a single viewport and scissor, both covering everything.
    #[inline]
    pub fn new() -> Self {
        Self {
            viewports: smallvec![Viewport::default()],
            scissors: smallvec![Scissor::default()],
            viewport_w_scaling_enable: false,
            viewport_w_scalings: Vec::new(),
            viewport_swizzles: Vec::new(),
            exclusive_scissors: Vec::new(),
            shading_rate_image_enable: false,
            shading_rate_palettes: Vec::new(),
            _ne: crate::NonExhaustive(()),
        }
    }

    /// Creates a `ViewportState` with `count` viewports and scissors, for use with dynamic
    /// viewports and scissors.
    #[inline]
    pub fn with_count(count: usize) -> Self {
        Self {
            viewports: smallvec![Viewport::default(); count],
            scissors: smallvec![Scissor::default(); count],
            ..Self::new()
        }
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let Self {
            viewports,
            scissors,
            viewport_w_scaling_enable,
            viewport_w_scalings: _,
            viewport_swizzles,
            exclusive_scissors,
            shading_rate_image_enable,
            shading_rate_palettes,
            _ne: _,
        } = self;

        let properties = &device.properties;

        for (index, viewport) in viewports.iter().enumerate() {
            viewport
                .validate(device)
                .map_err(|err| err.add_context(format!("viewports[{}]", index)))?;
        }

        if viewports.len() > 1 && !device.enabled_features.multi_viewport {
            return Err(Box::new(ValidationError {
                context: "viewports".into(),
                problem: "the length is greater than 1".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multi_viewport",
                )])]),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-viewportCount-01216"],
                ..Default::default()
            }));
        }

        if scissors.len() > 1 && !device.enabled_features.multi_viewport {
            return Err(Box::new(ValidationError {
                context: "scissors".into(),
                problem: "the length is greater than 1".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multi_viewport",
                )])]),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-01217"],
                ..Default::default()
            }));
        }

        if viewports.len() as u32 > properties.max_viewports {
            return Err(Box::new(ValidationError {
                context: "viewports".into(),
                problem: "the length exceeds the `max_viewports` limit".into(),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-viewportCount-01218"],
                ..Default::default()
            }));
        }

        if scissors.len() as u32 > properties.max_viewports {
            return Err(Box::new(ValidationError {
                context: "scissors".into(),
                problem: "the length exceeds the `max_viewports` limit".into(),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-01219"],
                ..Default::default()
            }));
        }

        if *viewport_w_scaling_enable && !device.enabled_extensions.nv_clip_space_w_scaling {
            return Err(Box::new(ValidationError {
                context: "viewport_w_scaling_enable".into(),
                problem: "is `true`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "nv_clip_space_w_scaling",
                )])]),
                ..Default::default()
            }));
        }

        if !viewport_swizzles.is_empty() && !device.enabled_extensions.nv_viewport_swizzle {
            return Err(Box::new(ValidationError {
                context: "viewport_swizzles".into(),
                problem: "is not empty".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "nv_viewport_swizzle",
                )])]),
                ..Default::default()
            }));
        }

        if !exclusive_scissors.is_empty() && !device.enabled_features.exclusive_scissor {
            return Err(Box::new(ValidationError {
                context: "exclusive_scissors".into(),
                problem: "is not empty".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "exclusive_scissor",
                )])]),
                vuids: &[
                    "VUID-VkPipelineViewportExclusiveScissorStateCreateInfoNV-exclusiveScissorCount-02027",
                ],
                ..Default::default()
            }));
        }

        if (*shading_rate_image_enable || !shading_rate_palettes.is_empty())
            && !device.enabled_features.shading_rate_image
        {
            return Err(Box::new(ValidationError {
                problem: "`shading_rate_image_enable` is `true`, or `shading_rate_palettes` is \
                    not empty"
                    .into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "shading_rate_image",
                )])]),
                vuids: &[
                    "VUID-VkPipelineViewportShadingRateImageStateCreateInfoNV-shadingRateImageEnable-02054",
                ],
                ..Default::default()
            }));
        }

        for (index, palette) in shading_rate_palettes.iter().enumerate() {
            palette
                .validate(device)
                .map_err(|err| err.add_context(format!("shading_rate_palettes[{}]", index)))?;
        }

        Ok(())
    }
}

impl Default for ViewportState {
    /// Returns [`ViewportState::new()`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// State of a single viewport.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Coordinates in pixels of the top-left hand corner of the viewport.
    ///
    /// The default value is `[0.0; 2]`.
    pub offset: [f32; 2],

    /// Dimensions in pixels of the viewport.
    ///
    /// The default value is `[1.0; 2]`.
    pub extent: [f32; 2],

    /// Minimum and maximum values of the depth.
    ///
    /// The values `0.0` to `1.0` of each vertex's Z coordinate will be mapped to this
    /// `depth_range` before being compared to the existing depth value.
    ///
    /// This is equivalents to `glDepthRange` in OpenGL, except that OpenGL uses the Z coordinate
    /// range from `-1.0` to `1.0` instead.
    ///
    /// The default value is `0.0..=1.0`.
    pub depth_range: RangeInclusive<f32>,
}

impl Default for Viewport {
    #[inline]
    fn default() -> Self {
        Self {
            offset: [0.0; 2],
            extent: [1.0; 2],
            depth_range: 0.0..=1.0,
        }
    }
}

impl Viewport {
    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let &Self {
            offset: _,
            extent,
            ref depth_range,
        } = self;

        if extent[0] <= 0.0 {
            return Err(Box::new(ValidationError {
                context: "extent[0]".into(),
                problem: "is not greater than zero".into(),
                vuids: &["VUID-VkViewport-width-01770"],
                ..Default::default()
            }));
        }

        if !device.enabled_extensions.ext_depth_range_unrestricted {
            if !(0.0..=1.0).contains(depth_range.start()) {
                return Err(Box::new(ValidationError {
                    context: "depth_range.start".into(),
                    problem: "is not between 0.0 and 1.0 inclusive".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_depth_range_unrestricted"),
                    ])]),
                    vuids: &["VUID-VkViewport-minDepth-01234"],
                    ..Default::default()
                }));
            }

            if !(0.0..=1.0).contains(depth_range.end()) {
                return Err(Box::new(ValidationError {
                    context: "depth_range.end".into(),
                    problem: "is not between 0.0 and 1.0 inclusive".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_depth_range_unrestricted"),
                    ])]),
                    vuids: &["VUID-VkViewport-maxDepth-01235"],
                    ..Default::default()
                }));
            }
        }

        Ok(())
    }
}

/// A two-dimensional subregion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scissor {
    /// Coordinates of the top-left hand corner of the box.
    ///
    /// The default value is `[0; 2]`.
    pub offset: [i32; 2],

    /// Dimensions of the box.
    ///
    /// The default value is `[i32::MAX as u32; 2]`.
    pub extent: [u32; 2],
}

impl Default for Scissor {
    #[inline]
    fn default() -> Self {
        Self {
            offset: [0; 2],
            extent: [i32::MAX as u32; 2],
        }
    }
}

impl Scissor {
    /// Returns a scissor that, when used, will instruct the pipeline to draw to the entire
    /// framebuffer no matter its size.
    #[inline]
    pub fn irrelevant() -> Scissor {
        Self::default()
    }
}

/// The W scaling factors of a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportWScaling {
    pub xcoeff: f32,
    pub ycoeff: f32,
}

impl Default for ViewportWScaling {
    #[inline]
    fn default() -> Self {
        Self {
            xcoeff: 1.0,
            ycoeff: 1.0,
        }
    }
}

/// How the coordinates of a viewport are swizzled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportSwizzle {
    pub x: CoordinateSwizzle,
    pub y: CoordinateSwizzle,
    pub z: CoordinateSwizzle,
    pub w: CoordinateSwizzle,
}

impl Default for ViewportSwizzle {
    /// Returns the identity swizzle.
    #[inline]
    fn default() -> Self {
        Self {
            x: CoordinateSwizzle::PositiveX,
            y: CoordinateSwizzle::PositiveY,
            z: CoordinateSwizzle::PositiveZ,
            w: CoordinateSwizzle::PositiveW,
        }
    }
}

vulkan_enum! {
    /// The source of one coordinate of a swizzled viewport.
    CoordinateSwizzle = ViewportCoordinateSwizzleNV(i32);

    PositiveX = POSITIVE_X,
    NegativeX = NEGATIVE_X,
    PositiveY = POSITIVE_Y,
    NegativeY = NEGATIVE_Y,
    PositiveZ = POSITIVE_Z,
    NegativeZ = NEGATIVE_Z,
    PositiveW = POSITIVE_W,
    NegativeW = NEGATIVE_W,
}

/// The shading rates that a shading rate image can select from, for one viewport.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShadingRatePalette {
    pub entries: Vec<ShadingRatePaletteEntry>,
}

impl ShadingRatePalette {
    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let count = self.entries.len() as u32;

        if count == 0 || count > device.properties.shading_rate_palette_size {
            return Err(Box::new(ValidationError {
                context: "entries".into(),
                problem: "the length is not between 1 and the `shading_rate_palette_size` \
                    property inclusive"
                    .into(),
                vuids: &["VUID-VkShadingRatePaletteNV-shadingRatePaletteEntryCount-02071"],
                ..Default::default()
            }));
        }

        Ok(())
    }
}

vulkan_enum! {
    /// A shading rate that a shading rate image can refer to.
    ShadingRatePaletteEntry = ShadingRatePaletteEntryNV(i32);

    NoInvocations = NO_INVOCATIONS,
    SixteenInvocationsPerPixel = TYPE_16_INVOCATIONS_PER_PIXEL,
    EightInvocationsPerPixel = TYPE_8_INVOCATIONS_PER_PIXEL,
    FourInvocationsPerPixel = TYPE_4_INVOCATIONS_PER_PIXEL,
    TwoInvocationsPerPixel = TYPE_2_INVOCATIONS_PER_PIXEL,
    OneInvocationPerPixel = TYPE_1_INVOCATION_PER_PIXEL,
    OneInvocationPer2x1Pixels = TYPE_1_INVOCATION_PER_2X1_PIXELS,
    OneInvocationPer1x2Pixels = TYPE_1_INVOCATION_PER_1X2_PIXELS,
    OneInvocationPer2x2Pixels = TYPE_1_INVOCATION_PER_2X2_PIXELS,
    OneInvocationPer4x2Pixels = TYPE_1_INVOCATION_PER_4X2_PIXELS,
    OneInvocationPer2x4Pixels = TYPE_1_INVOCATION_PER_2X4_PIXELS,
    OneInvocationPer4x4Pixels = TYPE_1_INVOCATION_PER_4X4_PIXELS,
}

/// The order in which samples of a coarse fragment are assigned to shader invocations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoarseSampleOrder {
    pub sample_order_type: CoarseSampleOrderType,

    /// Must be empty unless `sample_order_type` is `CoarseSampleOrderType::Custom`.
    pub custom_sample_orders: Vec<CoarseSampleOrderCustom>,
}

impl CoarseSampleOrder {
    pub(crate) fn validate(&self, _device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        if self.sample_order_type != CoarseSampleOrderType::Custom
            && !self.custom_sample_orders.is_empty()
        {
            return Err(Box::new(ValidationError {
                problem: "`sample_order_type` is not `CoarseSampleOrderType::Custom`, but \
                    `custom_sample_orders` is not empty"
                    .into(),
                vuids: &["VUID-vkCmdSetCoarseSampleOrderNV-sampleOrderType-02081"],
                ..Default::default()
            }));
        }

        Ok(())
    }
}

vulkan_enum! {
    CoarseSampleOrderType = CoarseSampleOrderTypeNV(i32);

    Default = DEFAULT,
    Custom = CUSTOM,
    PixelMajor = PIXEL_MAJOR,
    SampleMajor = SAMPLE_MAJOR,
}

impl Default for CoarseSampleOrderType {
    #[inline]
    fn default() -> Self {
        CoarseSampleOrderType::Default
    }
}

/// A custom sample order for one shading rate and sample count.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoarseSampleOrderCustom {
    pub shading_rate: ShadingRatePaletteEntry,
    pub sample_count: u32,
    pub sample_locations: Vec<CoarseSampleLocation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoarseSampleLocation {
    pub pixel_x: u32,
    pub pixel_y: u32,
    pub sample: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_viewports_need_feature() {
        let state = ViewportState::with_count(2);
        let err = state.validate(&DeviceCapabilities::default()).unwrap_err();
        assert_eq!(
            err.vuids,
            ["VUID-VkPipelineViewportStateCreateInfo-viewportCount-01216"],
        );

        let mut device = DeviceCapabilities::default();
        device.enabled_features.multi_viewport = true;
        assert!(state.validate(&device).is_ok());
    }

    #[test]
    fn viewport_depth_range() {
        let device = DeviceCapabilities::default();
        let viewport = Viewport {
            depth_range: 0.0..=2.0,
            ..Default::default()
        };
        assert!(viewport.validate(&device).is_err());

        let mut device = device;
        device.enabled_extensions.ext_depth_range_unrestricted = true;
        assert!(viewport.validate(&device).is_ok());
    }

    #[test]
    fn palette_size() {
        let device = DeviceCapabilities::default();
        assert!(ShadingRatePalette::default().validate(&device).is_err());
        assert!(ShadingRatePalette {
            entries: vec![ShadingRatePaletteEntry::OneInvocationPerPixel],
        }
        .validate(&device)
        .is_ok());
    }
}
