// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Configures how the color output of the fragment shader is written to the attachment.
//!
//! # Blending in details
//!
//! There are three kinds of color attachments for the purpose of blending:
//!
//! - Attachments with a floating-point or fixed point format.
//! - Attachments with a (non-normalized) integer format.
//! - Attachments with a normalized integer format.
//!
//! For floating-point and fixed-point formats, the blending operation is applied. For integer
//! formats, the logic operation is applied. For normalized integer formats, the logic operation
//! will take precedence if it is activated, otherwise the blending operation is applied.

use crate::{
    device::DeviceCapabilities,
    macros::{vulkan_bitflags, vulkan_enum},
    Requires, RequiresAllOf, RequiresOneOf, ValidationError,
};

/// Describes how the color output of the fragment shader is written to the attachment. See the
/// documentation of the `blend` module for more info.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ColorBlendState {
    /// Sets the logical operation to perform between the incoming fragment color and the existing
    /// fragment in the framebuffer attachment.
    ///
    /// If set to `Some`, the [`logic_op`](crate::device::DeviceFeatures::logic_op) feature must be
    /// enabled on the device.
    ///
    /// The default value is `None`.
    pub logic_op: Option<LogicOp>,

    /// Sets the blend and output state for each color attachment. The number of elements must match
    /// the number of color attachments in the framebuffer.
    ///
    /// The default value is empty.
    pub attachments: Vec<ColorBlendAttachmentState>,

    /// The constant color to use for some of the `BlendFactor` variants.
    ///
    /// The default value is `[0.0; 4]`.
    pub blend_constants: [f32; 4],

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: crate::NonExhaustive,
}

impl Default for ColorBlendState {
    #[inline]
    fn default() -> Self {
        Self {
            logic_op: None,
            attachments: Vec::new(),
            blend_constants: [0.0; 4],
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl ColorBlendState {
    /// Returns a default `ColorBlendState` with `count` duplicates of `attachment_state`.
    #[inline]
    pub fn with_attachment_states(count: u32, attachment_state: ColorBlendAttachmentState) -> Self {
        Self {
            attachments: std::iter::repeat(attachment_state)
                .take(count as usize)
                .collect(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let &Self {
            logic_op,
            ref attachments,
            blend_constants: _,
            _ne: _,
        } = self;

        if let Some(logic_op) = logic_op {
            if !device.enabled_features.logic_op {
                return Err(Box::new(ValidationError {
                    context: "logic_op".into(),
                    problem: "is `Some`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "logic_op",
                    )])]),
                    vuids: &["VUID-VkPipelineColorBlendStateCreateInfo-logicOpEnable-00606"],
                    ..Default::default()
                }));
            }

            logic_op.validate_device(device).map_err(|err| {
                err.add_context("logic_op").set_vuids(&[
                    "VUID-VkPipelineColorBlendStateCreateInfo-logicOpEnable-00607",
                ])
            })?;
        }

        for (index, state) in attachments.iter().enumerate() {
            state
                .validate(device)
                .map_err(|err| err.add_context(format!("attachments[{}]", index)))?;
        }

        Ok(())
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// Which logical operation to apply to the output values.
    ///
    /// The operation is applied individually for each channel (red, green, blue and alpha).
    ///
    /// Only relevant for integer or unsigned attachments.
    ///
    /// Also note that some implementations don't support logic operations.
    LogicOp = LogicOp(i32);

    /// Returns `0`.
    Clear = CLEAR,

    /// Returns `source & destination`.
    And = AND,

    /// Returns `source & !destination`.
    AndReverse = AND_REVERSE,

    /// Returns `source`.
    Copy = COPY,

    /// Returns `!source & destination`.
    AndInverted = AND_INVERTED,

    /// Returns `destination`.
    Noop = NO_OP,

    /// Returns `source ^ destination`.
    Xor = XOR,

    /// Returns `source | destination`.
    Or = OR,

    /// Returns `!(source | destination)`.
    Nor = NOR,

    /// Returns `!(source ^ destination)`.
    Equivalent = EQUIVALENT,

    /// Returns `!destination`.
    Invert = INVERT,

    /// Returns `source | !destination.
    OrReverse = OR_REVERSE,

    /// Returns `!source`.
    CopyInverted = COPY_INVERTED,

    /// Returns `!source | destination`.
    OrInverted = OR_INVERTED,

    /// Returns `!(source & destination)`.
    Nand = NAND,

    /// Returns `!0` (all bits set to 1).
    Set = SET,
}

impl Default for LogicOp {
    #[inline]
    fn default() -> LogicOp {
        LogicOp::Noop
    }
}

/// Describes how a framebuffer color attachment is handled in the pipeline during the color
/// blend stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorBlendAttachmentState {
    /// The blend parameters for the attachment.
    ///
    /// If set to `None`, blending is disabled, and all incoming pixels will be used directly.
    ///
    /// The default value is `None`.
    pub blend: Option<AttachmentBlend>,

    /// Sets which components of the final pixel value are written to the attachment.
    ///
    /// The default value is `ColorComponents::all()`.
    pub color_write_mask: ColorComponents,

    /// Sets whether anything at all is written to the attachment. If enabled, the pixel data
    /// that is written is determined by the `color_write_mask`. If disabled, the mask is ignored
    /// and nothing is written.
    ///
    /// The default value is `true`.
    pub color_write_enable: bool,
}

impl Default for ColorBlendAttachmentState {
    #[inline]
    fn default() -> Self {
        Self {
            blend: None,
            color_write_mask: ColorComponents::all(),
            color_write_enable: true,
        }
    }
}

impl ColorBlendAttachmentState {
    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let &Self {
            ref blend,
            color_write_mask: _,
            color_write_enable,
        } = self;

        if let Some(blend) = blend {
            blend
                .validate(device)
                .map_err(|err| err.add_context("blend"))?;
        }

        if !color_write_enable && !device.enabled_features.color_write_enable {
            return Err(Box::new(ValidationError {
                context: "color_write_enable".into(),
                problem: "is `false`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "color_write_enable",
                )])]),
                vuids: &["VUID-VkPipelineColorWriteCreateInfoEXT-pAttachments-04801"],
                ..Default::default()
            }));
        }

        Ok(())
    }
}

/// Describes how the blending system should behave for an attachment.
///
/// This is also the value of the `ColorBlendEquation` dynamic state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttachmentBlend {
    /// The operation to apply to the source color component before applying `color_op`.
    pub src_color_blend_factor: BlendFactor,

    /// The operation to apply to the destination color component before applying `color_op`.
    pub dst_color_blend_factor: BlendFactor,

    /// The operation to apply between the color components of the source and destination pixels,
    /// to produce the final pixel value.
    pub color_blend_op: BlendOp,

    /// The operation to apply to the source alpha component before applying `alpha_op`.
    pub src_alpha_blend_factor: BlendFactor,

    /// The operation to apply to the destination alpha component before applying `alpha_op`.
    pub dst_alpha_blend_factor: BlendFactor,

    /// The operation to apply between the alpha component of the source and destination pixels,
    /// to produce the final pixel value.
    pub alpha_blend_op: BlendOp,
}

impl AttachmentBlend {
    /// Builds an `AttachmentBlend` where the output of the fragment shader is ignored and the
    /// destination is untouched.
    #[inline]
    pub fn ignore_source() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::Zero,
            dst_color_blend_factor: BlendFactor::DstColor,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::Zero,
            dst_alpha_blend_factor: BlendFactor::DstColor,
            alpha_blend_op: BlendOp::Add,
        }
    }

    /// Builds an `AttachmentBlend` where the output will be merged with the existing value
    /// based on the alpha of the source.
    #[inline]
    pub fn alpha() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::SrcAlpha,
            dst_color_blend_factor: BlendFactor::OneMinusSrcAlpha,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::SrcAlpha,
            dst_alpha_blend_factor: BlendFactor::OneMinusSrcAlpha,
            alpha_blend_op: BlendOp::Add,
        }
    }

    /// Builds an `AttachmentBlend` where the colors are added, and alpha is set to the maximum of
    /// the two.
    #[inline]
    pub fn additive() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::One,
            dst_color_blend_factor: BlendFactor::One,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::One,
            dst_alpha_blend_factor: BlendFactor::One,
            alpha_blend_op: BlendOp::Max,
        }
    }

    /// Builds an `AttachmentBlend` that mixes in the blend constants.
    #[inline]
    pub fn constant() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::ConstantColor,
            dst_color_blend_factor: BlendFactor::OneMinusConstantColor,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::ConstantAlpha,
            dst_alpha_blend_factor: BlendFactor::OneMinusConstantAlpha,
            alpha_blend_op: BlendOp::Add,
        }
    }

    /// Returns whether any of the blend factors reads the blend constants.
    #[inline]
    pub fn uses_constant_factor(&self) -> bool {
        [
            self.src_color_blend_factor,
            self.dst_color_blend_factor,
            self.src_alpha_blend_factor,
            self.dst_alpha_blend_factor,
        ]
        .into_iter()
        .any(BlendFactor::is_constant)
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let &Self {
            src_color_blend_factor,
            dst_color_blend_factor,
            color_blend_op,
            src_alpha_blend_factor,
            dst_alpha_blend_factor,
            alpha_blend_op,
        } = self;

        color_blend_op.validate_device(device).map_err(|err| {
            err.add_context("color_blend_op").set_vuids(&[
                "VUID-VkPipelineColorBlendAttachmentState-colorBlendOp-parameter",
            ])
        })?;

        alpha_blend_op.validate_device(device).map_err(|err| {
            err.add_context("alpha_blend_op").set_vuids(&[
                "VUID-VkPipelineColorBlendAttachmentState-alphaBlendOp-parameter",
            ])
        })?;

        if !device.enabled_features.dual_src_blend {
            let factors: [(BlendFactor, &str, &'static [&'static str]); 4] = [
                (
                    src_color_blend_factor,
                    "src_color_blend_factor",
                    &["VUID-VkPipelineColorBlendAttachmentState-srcColorBlendFactor-00608"],
                ),
                (
                    dst_color_blend_factor,
                    "dst_color_blend_factor",
                    &["VUID-VkPipelineColorBlendAttachmentState-dstColorBlendFactor-00609"],
                ),
                (
                    src_alpha_blend_factor,
                    "src_alpha_blend_factor",
                    &["VUID-VkPipelineColorBlendAttachmentState-srcAlphaBlendFactor-00610"],
                ),
                (
                    dst_alpha_blend_factor,
                    "dst_alpha_blend_factor",
                    &["VUID-VkPipelineColorBlendAttachmentState-dstAlphaBlendFactor-00611"],
                ),
            ];

            for (factor, context, vuids) in factors {
                if factor.is_dual_source() {
                    return Err(Box::new(ValidationError {
                        context: context.into(),
                        problem: "is `BlendFactor::Src1*`".into(),
                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                            Requires::DeviceFeature("dual_src_blend"),
                        ])]),
                        vuids,
                        ..Default::default()
                    }));
                }
            }
        }

        if device.enabled_extensions.khr_portability_subset
            && !device.enabled_features.constant_alpha_color_blend_factors
            && [src_color_blend_factor, dst_color_blend_factor]
                .into_iter()
                .any(|factor| {
                    matches!(
                        factor,
                        BlendFactor::ConstantAlpha | BlendFactor::OneMinusConstantAlpha
                    )
                })
        {
            return Err(Box::new(ValidationError {
                problem: "this device is a portability subset device, and a color blend factor \
                    is `BlendFactor::ConstantAlpha` or `BlendFactor::OneMinusConstantAlpha`"
                    .into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "constant_alpha_color_blend_factors",
                )])]),
                vuids: &[
                    "VUID-VkPipelineColorBlendAttachmentState-constantAlphaColorBlendFactors-04454",
                    "VUID-VkPipelineColorBlendAttachmentState-constantAlphaColorBlendFactors-04455",
                ],
                ..Default::default()
            }));
        }

        Ok(())
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// The operation that takes `source` (output from the fragment shader), `destination` (value
    /// currently in the framebuffer attachment) and `blend_constant` input values,
    /// and produces new inputs to be fed to `BlendOp`.
    ///
    /// Some operations take `source1` as an input, representing the second source value. The
    /// [`dual_src_blend`](crate::device::DeviceFeatures::dual_src_blend) feature must be enabled
    /// on the device when these are used.
    BlendFactor impl {
        /// Returns whether the factor reads the blend constants.
        #[inline]
        pub fn is_constant(self) -> bool {
            matches!(
                self,
                Self::ConstantColor
                    | Self::OneMinusConstantColor
                    | Self::ConstantAlpha
                    | Self::OneMinusConstantAlpha
            )
        }

        /// Returns whether the factor reads the second source value.
        #[inline]
        pub fn is_dual_source(self) -> bool {
            matches!(
                self,
                Self::Src1Color | Self::OneMinusSrc1Color | Self::Src1Alpha | Self::OneMinusSrc1Alpha
            )
        }
    }
    = BlendFactor(i32);

    /// Always `0`.
    Zero = ZERO,

    /// Always `1`.
    One = ONE,

    /// `source` component-wise.
    SrcColor = SRC_COLOR,

    /// `1 - source` component-wise.
    OneMinusSrcColor = ONE_MINUS_SRC_COLOR,

    /// `destination` component-wise.
    DstColor = DST_COLOR,

    /// `1 - destination` component-wise.
    OneMinusDstColor = ONE_MINUS_DST_COLOR,

    /// `source.a` for all components.
    SrcAlpha = SRC_ALPHA,

    /// `1 - source.a` for all components.
    OneMinusSrcAlpha = ONE_MINUS_SRC_ALPHA,

    /// `destination.a` for all components.
    DstAlpha = DST_ALPHA,

    /// `1 - destination.a` for all components.
    OneMinusDstAlpha = ONE_MINUS_DST_ALPHA,

    /// `blend_constants` component-wise.
    ConstantColor = CONSTANT_COLOR,

    /// `1 - blend_constants` component-wise.
    OneMinusConstantColor = ONE_MINUS_CONSTANT_COLOR,

    /// `blend_constants.a` for all components.
    ConstantAlpha = CONSTANT_ALPHA,

    /// `1 - blend_constants.a` for all components.
    OneMinusConstantAlpha = ONE_MINUS_CONSTANT_ALPHA,

    /// For the alpha component, always `1`. For the color components,
    /// `min(source.a, 1 - destination.a)` for all components.
    SrcAlphaSaturate = SRC_ALPHA_SATURATE,

    /// `source1` component-wise.
    Src1Color = SRC1_COLOR,

    /// `1 - source1` component-wise.
    OneMinusSrc1Color = ONE_MINUS_SRC1_COLOR,

    /// `source1.a` for all components.
    Src1Alpha = SRC1_ALPHA,

    /// `1 - source1.a` for all components.
    OneMinusSrc1Alpha = ONE_MINUS_SRC1_ALPHA,
}

vulkan_enum! {
    #[non_exhaustive]

    /// The arithmetic operation that is applied between the `source` and `destination` component
    /// values, after the appropriate `BlendFactor` is applied to both.
    ///
    /// The advanced operations, from `Zero` onwards, ignore the blend factors and require the
    /// [`ext_blend_operation_advanced`](crate::device::DeviceExtensions::ext_blend_operation_advanced)
    /// extension.
    BlendOp impl {
        /// Returns whether this is one of the advanced blend operations.
        #[inline]
        pub fn is_advanced(self) -> bool {
            !matches!(
                self,
                Self::Add | Self::Subtract | Self::ReverseSubtract | Self::Min | Self::Max
            )
        }
    }
    = BlendOp(i32);

    /// `source + destination`.
    Add = ADD,

    /// `source - destination`.
    Subtract = SUBTRACT,

    /// `destination - source`.
    ReverseSubtract = REVERSE_SUBTRACT,

    /// `min(source, destination)`.
    Min = MIN,

    /// `max(source, destination)`.
    Max = MAX,

    Zero = ZERO_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Src = SRC_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Dst = DST_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    SrcOver = SRC_OVER_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    DstOver = DST_OVER_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    SrcIn = SRC_IN_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    DstIn = DST_IN_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    SrcOut = SRC_OUT_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    DstOut = DST_OUT_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    SrcAtop = SRC_ATOP_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    DstAtop = DST_ATOP_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Xor = XOR_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Multiply = MULTIPLY_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Screen = SCREEN_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Overlay = OVERLAY_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Darken = DARKEN_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Lighten = LIGHTEN_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Colordodge = COLORDODGE_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Colorburn = COLORBURN_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Hardlight = HARDLIGHT_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Softlight = SOFTLIGHT_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Difference = DIFFERENCE_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Exclusion = EXCLUSION_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Invert = INVERT_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    InvertRgb = INVERT_RGB_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Lineardodge = LINEARDODGE_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Linearburn = LINEARBURN_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Vividlight = VIVIDLIGHT_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Linearlight = LINEARLIGHT_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Pinlight = PINLIGHT_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Hardmix = HARDMIX_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    HslHue = HSL_HUE_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    HslSaturation = HSL_SATURATION_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    HslColor = HSL_COLOR_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    HslLuminosity = HSL_LUMINOSITY_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Plus = PLUS_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    PlusClamped = PLUS_CLAMPED_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    PlusClampedAlpha = PLUS_CLAMPED_ALPHA_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    PlusDarker = PLUS_DARKER_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Minus = MINUS_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    MinusClamped = MINUS_CLAMPED_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Contrast = CONTRAST_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    InvertOvg = INVERT_OVG_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Red = RED_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Green = GREEN_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),

    Blue = BLUE_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_blend_operation_advanced)]),
    ]),
}

vulkan_bitflags! {
    /// A mask specifying color components that can be written to a framebuffer attachment.
    ColorComponents = ColorComponentFlags(u32);

    /// The red component.
    R = R,

    /// The green component.
    G = G,

    /// The blue component.
    B = B,

    /// The alpha component.
    A = A,
}

/// The advanced blend parameters of one attachment, the value of the `ColorBlendAdvanced`
/// dynamic state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorBlendAdvanced {
    /// The advanced blend operation that is used when blending is enabled for the attachment.
    pub advanced_blend_op: BlendOp,

    /// Whether the source color is premultiplied by its alpha.
    pub src_premultiplied: bool,

    /// Whether the destination color is premultiplied by its alpha.
    pub dst_premultiplied: bool,

    /// How the coverage of the source and destination overlap.
    pub blend_overlap: BlendOverlap,

    /// Whether the results are clamped to `[0, 1]` before being stored.
    pub clamp_results: bool,
}

impl Default for ColorBlendAdvanced {
    #[inline]
    fn default() -> Self {
        Self {
            advanced_blend_op: BlendOp::SrcOver,
            src_premultiplied: true,
            dst_premultiplied: true,
            blend_overlap: BlendOverlap::Uncorrelated,
            clamp_results: false,
        }
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// How the coverage of the source and destination of an advanced blend operation overlap.
    BlendOverlap = BlendOverlapEXT(i32);

    /// The coverage is uncorrelated.
    Uncorrelated = UNCORRELATED,

    /// The source and destination coverage are considered to have minimal overlap.
    Disjoint = DISJOINT,

    /// The source and destination coverage are considered to have maximal overlap.
    Conjoint = CONJOINT,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_factors() {
        assert!(AttachmentBlend::constant().uses_constant_factor());
        assert!(!AttachmentBlend::alpha().uses_constant_factor());
        assert!(!AttachmentBlend::additive().uses_constant_factor());
    }

    #[test]
    fn dual_source_requires_feature() {
        let blend = AttachmentBlend {
            dst_alpha_blend_factor: BlendFactor::Src1Alpha,
            ..AttachmentBlend::alpha()
        };

        let err = blend.validate(&DeviceCapabilities::default()).unwrap_err();
        assert_eq!(err.context, "dst_alpha_blend_factor");
        assert_eq!(
            err.vuids,
            ["VUID-VkPipelineColorBlendAttachmentState-dstAlphaBlendFactor-00611"],
        );
    }

    #[test]
    fn advanced_ops() {
        assert!(!BlendOp::Max.is_advanced());
        assert!(BlendOp::Multiply.is_advanced());
        assert!(BlendOp::Multiply
            .validate_device(&DeviceCapabilities::default())
            .is_err());
    }
}
