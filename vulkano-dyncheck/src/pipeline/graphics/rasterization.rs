// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Configures how primitives should be converted into collections of fragments.

use crate::{
    device::DeviceCapabilities, macros::vulkan_enum, Requires, RequiresAllOf, RequiresOneOf,
    ValidationError,
};

/// The state in a graphics pipeline describing how the rasterization stage should behave.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RasterizationState {
    /// If true, then the depth value of the vertices will be clamped to the range [0.0, 1.0]. If
    /// false, fragments whose depth is outside of this range will be discarded.
    ///
    /// If enabled, the [`depth_clamp`](crate::device::DeviceFeatures::depth_clamp) feature must be
    /// enabled on the device.
    ///
    /// The default value is `false`.
    pub depth_clamp_enable: bool,

    /// If true, all the fragments will be discarded, and the fragment shader will not be run.
    ///
    /// The default value is `false`.
    pub rasterizer_discard_enable: bool,

    /// This setting can ask the rasterizer to downgrade triangles into lines or points, or lines
    /// into points.
    ///
    /// The default value is [`PolygonMode::Fill`].
    pub polygon_mode: PolygonMode,

    /// Specifies whether front faces or back faces should be discarded, or none, or both.
    ///
    /// The default value is [`CullMode::None`].
    pub cull_mode: CullMode,

    /// Specifies which triangle orientation is considered to be the front of the triangle.
    ///
    /// The default value is [`FrontFace::CounterClockwise`].
    pub front_face: FrontFace,

    /// Sets how to modify depth values in the rasterization stage.
    ///
    /// If set to `None`, depth biasing is disabled, the depth values will pass to the fragment
    /// shader unmodified. If `DynamicState::DepthBiasEnable` is dynamic, `Some` only provides the
    /// factors.
    ///
    /// The default value is `None`.
    pub depth_bias: Option<DepthBiasState>,

    /// Width, in pixels, of lines when drawing lines.
    ///
    /// The default value is `1.0`.
    pub line_width: f32,

    /// The rasterization mode for lines.
    ///
    /// The default value is [`LineRasterizationMode::Default`].
    pub line_rasterization_mode: LineRasterizationMode,

    /// Enables and sets the parameters for line stippling.
    ///
    /// The default value is `None`.
    pub line_stipple: Option<LineStipple>,

    /// The conservative rasterization state. `None` is the same as
    /// [`ConservativeRasterizationMode::Disabled`].
    ///
    /// The default value is `None`.
    pub conservative: Option<RasterizationConservativeState>,

    /// The vertex stream that is rasterized.
    ///
    /// The default value is `0`.
    pub rasterization_stream: u32,

    /// The vertex that provides the values of flat-shaded outputs.
    ///
    /// The default value is [`ProvokingVertexMode::FirstVertex`].
    pub provoking_vertex_mode: ProvokingVertexMode,

    /// Whether depth clipping is enabled. `None` means that it follows the inverse of
    /// `depth_clamp_enable`.
    ///
    /// The default value is `None`.
    pub depth_clip_enable: Option<bool>,

    /// Whether the clip volume uses a depth range of `-1.0..=1.0` instead of `0.0..=1.0`.
    ///
    /// The default value is `false`.
    pub depth_clip_negative_one_to_one: bool,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: crate::NonExhaustive,
}

impl Default for RasterizationState {
    #[inline]
    fn default() -> Self {
        Self {
            depth_clamp_enable: false,
            rasterizer_discard_enable: false,
            polygon_mode: Default::default(),
            cull_mode: Default::default(),
            front_face: Default::default(),
            depth_bias: None,
            line_width: 1.0,
            line_rasterization_mode: Default::default(),
            line_stipple: None,
            conservative: None,
            rasterization_stream: 0,
            provoking_vertex_mode: Default::default(),
            depth_clip_enable: None,
            depth_clip_negative_one_to_one: false,
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl RasterizationState {
    /// Returns the conservative rasterization mode.
    #[inline]
    pub fn conservative_rasterization_mode(&self) -> ConservativeRasterizationMode {
        self.conservative
            .map_or(ConservativeRasterizationMode::Disabled, |conservative| {
                conservative.mode
            })
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let &Self {
            depth_clamp_enable,
            rasterizer_discard_enable: _,
            polygon_mode,
            cull_mode,
            front_face,
            depth_bias: _,
            line_width: _,
            line_rasterization_mode,
            line_stipple: _,
            conservative,
            rasterization_stream: _,
            provoking_vertex_mode,
            depth_clip_enable: _,
            depth_clip_negative_one_to_one: _,
            _ne: _,
        } = self;

        polygon_mode.validate_device(device).map_err(|err| {
            err.add_context("polygon_mode").set_vuids(&[
                "VUID-VkPipelineRasterizationStateCreateInfo-polygonMode-parameter",
            ])
        })?;

        cull_mode.validate_device(device).map_err(|err| {
            err.add_context("cull_mode").set_vuids(&[
                "VUID-VkPipelineRasterizationStateCreateInfo-cullMode-parameter",
            ])
        })?;

        front_face.validate_device(device).map_err(|err| {
            err.add_context("front_face").set_vuids(&[
                "VUID-VkPipelineRasterizationStateCreateInfo-frontFace-parameter",
            ])
        })?;

        line_rasterization_mode
            .validate_device(device)
            .map_err(|err| err.add_context("line_rasterization_mode"))?;

        provoking_vertex_mode
            .validate_device(device)
            .map_err(|err| err.add_context("provoking_vertex_mode"))?;

        if depth_clamp_enable && !device.enabled_features.depth_clamp {
            return Err(Box::new(ValidationError {
                context: "depth_clamp_enable".into(),
                problem: "is `true`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "depth_clamp",
                )])]),
                vuids: &["VUID-VkPipelineRasterizationStateCreateInfo-depthClampEnable-00782"],
                ..Default::default()
            }));
        }

        if let Some(conservative) = conservative {
            conservative
                .validate(device)
                .map_err(|err| err.add_context("conservative"))?;
        }

        Ok(())
    }
}

/// The values to use for depth biasing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepthBiasState {
    /// Specifies a constant factor to be multiplied to every depth value.
    ///
    /// The default value is `1.0`.
    pub constant_factor: f32,

    /// The maximum (or minimum) depth bias of a fragment.
    ///
    /// Setting this to a value other than 0.0 requires the
    /// [`depth_bias_clamp`](crate::device::DeviceFeatures::depth_bias_clamp) feature to be enabled
    /// on the device.
    ///
    /// The default value is `0.0`.
    pub clamp: f32,

    /// A scalar factor to multiply with a fragment's slope in depth bias calculations.
    ///
    /// The default value is `1.0`.
    pub slope_factor: f32,
}

impl Default for DepthBiasState {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl DepthBiasState {
    /// Returns a default `DepthBiasState`.
    #[inline]
    pub const fn new() -> Self {
        Self {
            constant_factor: 1.0,
            clamp: 0.0,
            slope_factor: 1.0,
        }
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// Specifies the culling mode.
    ///
    /// This setting works in pair with `front_face`. The `front_face` setting tells the GPU whether
    /// clockwise or counter-clockwise correspond to the front and the back of each triangle. Then
    /// `cull_mode` lets you specify whether front faces should be discarded, back faces should be
    /// discarded, or none, or both.
    CullMode = CullModeFlags(u32);

    /// No culling.
    None = NONE,

    /// The faces facing the front of the screen (ie. facing the user) will be removed.
    Front = FRONT,

    /// The faces facing the back of the screen will be removed.
    Back = BACK,

    /// All faces will be removed.
    FrontAndBack = FRONT_AND_BACK,
}

impl Default for CullMode {
    #[inline]
    fn default() -> CullMode {
        CullMode::None
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// Specifies which triangle orientation corresponds to the front or the triangle.
    FrontFace = FrontFace(i32);

    /// Triangles whose vertices are oriented counter-clockwise on the screen will be considered
    /// as facing their front. Otherwise they will be considered as facing their back.
    CounterClockwise = COUNTER_CLOCKWISE,

    /// Triangles whose vertices are oriented clockwise on the screen will be considered
    /// as facing their front. Otherwise they will be considered as facing their back.
    Clockwise = CLOCKWISE,
}

impl Default for FrontFace {
    #[inline]
    fn default() -> FrontFace {
        FrontFace::CounterClockwise
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// How polygons are rasterized.
    PolygonMode = PolygonMode(i32);

    /// Polygons are filled.
    Fill = FILL,

    /// Only the edges of polygons are drawn, as lines.
    Line = LINE,

    /// Only the vertices of polygons are drawn, as points.
    Point = POINT,

    /// The whole bounding rectangle of each triangle is filled.
    FillRectangle = FILL_RECTANGLE_NV
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(nv_fill_rectangle)]),
    ]),
}

impl Default for PolygonMode {
    #[inline]
    fn default() -> PolygonMode {
        PolygonMode::Fill
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// The rasterization mode to use for lines.
    LineRasterizationMode = LineRasterizationModeEXT(i32);

    /// If the `strict_lines` device property is `true`, then this is the same as `Rectangular`.
    /// Otherwise, lines are drawn as parallelograms.
    Default = DEFAULT,

    /// Lines are drawn as if they were rectangles extruded from the line.
    ///
    /// The [`rectangular_lines`](crate::device::DeviceFeatures::rectangular_lines) feature must be
    /// enabled on the device.
    Rectangular = RECTANGULAR,

    /// Lines are drawn by determining which pixel diamonds the line intersects and exits.
    ///
    /// The [`bresenham_lines`](crate::device::DeviceFeatures::bresenham_lines) feature must be
    /// enabled on the device.
    Bresenham = BRESENHAM,

    /// As `Rectangular`, but with alpha falloff.
    ///
    /// The [`smooth_lines`](crate::device::DeviceFeatures::smooth_lines) feature must be
    /// enabled on the device.
    RectangularSmooth = RECTANGULAR_SMOOTH,
}

impl Default for LineRasterizationMode {
    #[inline]
    fn default() -> Self {
        Self::Default
    }
}

/// The parameters of a stippled line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineStipple {
    /// The repeat factor used in stippled line rasterization. Must be between 1 and 256 inclusive.
    pub factor: u32,

    /// The bit pattern used in stippled line rasterization.
    pub pattern: u16,
}

/// The state in a graphics pipeline describing how the conservative rasterization mode should
/// behave.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterizationConservativeState {
    /// Sets the conservative rasterization mode.
    ///
    /// The default value is [`ConservativeRasterizationMode::Disabled`].
    pub mode: ConservativeRasterizationMode,

    /// The extra size in pixels to increase the generating primitive during conservative
    /// rasterization. If the mode is set to anything other than
    /// [`ConservativeRasterizationMode::Overestimate`] this value is ignored.
    ///
    ///  The default value is 0.0.
    pub overestimation_size: f32,
}

impl Default for RasterizationConservativeState {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl RasterizationConservativeState {
    /// Returns a default `RasterizationConservativeState`.
    #[inline]
    pub const fn new() -> Self {
        Self {
            mode: ConservativeRasterizationMode::Disabled,
            overestimation_size: 0.0,
        }
    }

    pub(crate) fn validate(self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let Self {
            mode,
            overestimation_size,
        } = self;

        let properties = &device.properties;

        mode.validate_device(device).map_err(|err| {
            err.add_context("mode").set_vuids(&[
                "VUID-VkPipelineRasterizationConservativeStateCreateInfoEXT-conservativeRasterizationMode-parameter",
            ])
        })?;

        if !(0.0..=properties.max_extra_primitive_overestimation_size)
            .contains(&overestimation_size)
        {
            return Err(Box::new(ValidationError {
                context: "overestimation_size".into(),
                problem: "is not between 0.0 and the `max_extra_primitive_overestimation_size` \
                    limit inclusive"
                    .into(),
                vuids: &[
                    "VUID-VkPipelineRasterizationConservativeStateCreateInfoEXT-extraPrimitiveOverestimationSize-01769",
                ],
                ..Default::default()
            }));
        }

        Ok(())
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// Describes how fragments will be generated based on how much is covered by a primitive.
    ConservativeRasterizationMode = ConservativeRasterizationModeEXT(i32);

    /// Conservative rasterization is disabled and rasterization proceeds as normal.
    Disabled = DISABLED,

    /// Fragments will be generated if any part of a primitive touches a pixel.
    Overestimate = OVERESTIMATE,

    /// Fragments will be generated only if a primitive completely covers a pixel.
    Underestimate = UNDERESTIMATE,
}

impl Default for ConservativeRasterizationMode {
    #[inline]
    fn default() -> ConservativeRasterizationMode {
        ConservativeRasterizationMode::Disabled
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// Specifies which vertex of a primitive is the provoking vertex, whose values are used for
    /// flat-shaded outputs.
    ProvokingVertexMode = ProvokingVertexModeEXT(i32);

    /// The first vertex of the primitive.
    FirstVertex = FIRST_VERTEX,

    /// The last vertex of the primitive.
    ///
    /// The [`provoking_vertex_last`](crate::device::DeviceFeatures::provoking_vertex_last)
    /// feature must be enabled on the device.
    LastVertex = LAST_VERTEX
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(provoking_vertex_last)]),
    ]),
}

impl Default for ProvokingVertexMode {
    #[inline]
    fn default() -> Self {
        Self::FirstVertex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_clamp_requires_feature() {
        let state = RasterizationState {
            depth_clamp_enable: true,
            ..Default::default()
        };

        let err = state.validate(&DeviceCapabilities::default()).unwrap_err();
        assert_eq!(err.context, "depth_clamp_enable");
        assert_eq!(
            err.vuids,
            ["VUID-VkPipelineRasterizationStateCreateInfo-depthClampEnable-00782"],
        );
    }

    #[test]
    fn overestimation_size_range() {
        let device = DeviceCapabilities::default();
        let conservative = RasterizationConservativeState {
            mode: ConservativeRasterizationMode::Overestimate,
            overestimation_size: 2.0,
        };
        assert!(conservative.validate(&device).is_err());

        let conservative = RasterizationConservativeState {
            overestimation_size: 0.5,
            ..conservative
        };
        assert!(conservative.validate(&device).is_ok());
    }
}
