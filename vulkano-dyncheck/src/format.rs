// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Formats of attachments and vertex attributes.
//!
//! Only the properties that dynamic state validation looks at are described: the numeric format
//! of the color components, their bit widths, and which aspects a depth/stencil format has.

use crate::{image::ImageAspects, macros::vulkan_bitflags, macros::vulkan_enum};

macro_rules! format_table {
    {
        $(
            $name:ident: $numeric:ident $bits:expr, $aspects:ident;
        )+
    } => {
        vulkan_enum! {
            /// An image or vertex attribute format.
            Format
            impl {
                /// Every format that is described.
                pub const ALL: &'static [Format] = &[$(Format::$name,)+];

                /// Returns the numeric format of the color components, or `None` for
                /// depth/stencil formats.
                pub fn numeric_format_color(self) -> Option<NumericFormat> {
                    match self {
                        $(Self::$name => format_table!(@numeric $numeric),)+
                    }
                }

                /// Returns the number of bits in each of the R, G, B and A components.
                /// A component that is absent has zero bits.
                pub fn components(self) -> [u8; 4] {
                    match self {
                        $(Self::$name => $bits,)+
                    }
                }

                /// Returns the aspects of an image with this format.
                pub fn aspects(self) -> ImageAspects {
                    match self {
                        $(Self::$name => ImageAspects::$aspects,)+
                    }
                }
            }
            = Format(i32);

            $(
                $name = $name,
            )+
        }
    };

    (@numeric NONE) => { None };
    (@numeric $numeric:ident) => { Some(NumericFormat::$numeric) };
}

format_table! {
    R8_UNORM: UNORM [8, 0, 0, 0], COLOR;
    R8_UINT: UINT [8, 0, 0, 0], COLOR;
    R8_SINT: SINT [8, 0, 0, 0], COLOR;
    R8G8_UNORM: UNORM [8, 8, 0, 0], COLOR;
    R8G8B8A8_UNORM: UNORM [8, 8, 8, 8], COLOR;
    R8G8B8A8_SRGB: SRGB [8, 8, 8, 8], COLOR;
    R8G8B8A8_UINT: UINT [8, 8, 8, 8], COLOR;
    R8G8B8A8_SINT: SINT [8, 8, 8, 8], COLOR;
    B8G8R8A8_UNORM: UNORM [8, 8, 8, 8], COLOR;
    B8G8R8A8_SRGB: SRGB [8, 8, 8, 8], COLOR;
    A2B10G10R10_UNORM_PACK32: UNORM [10, 10, 10, 2], COLOR;
    R16_UINT: UINT [16, 0, 0, 0], COLOR;
    R16_SINT: SINT [16, 0, 0, 0], COLOR;
    R16_SFLOAT: SFLOAT [16, 0, 0, 0], COLOR;
    R16G16_SFLOAT: SFLOAT [16, 16, 0, 0], COLOR;
    R16G16B16A16_UINT: UINT [16, 16, 16, 16], COLOR;
    R16G16B16A16_SFLOAT: SFLOAT [16, 16, 16, 16], COLOR;
    R32_UINT: UINT [32, 0, 0, 0], COLOR;
    R32_SINT: SINT [32, 0, 0, 0], COLOR;
    R32_SFLOAT: SFLOAT [32, 0, 0, 0], COLOR;
    R32G32_SFLOAT: SFLOAT [32, 32, 0, 0], COLOR;
    R32G32B32_SFLOAT: SFLOAT [32, 32, 32, 0], COLOR;
    R32G32B32A32_UINT: UINT [32, 32, 32, 32], COLOR;
    R32G32B32A32_SINT: SINT [32, 32, 32, 32], COLOR;
    R32G32B32A32_SFLOAT: SFLOAT [32, 32, 32, 32], COLOR;
    R64_UINT: UINT [64, 0, 0, 0], COLOR;
    R64_SINT: SINT [64, 0, 0, 0], COLOR;
    R64_SFLOAT: SFLOAT [64, 0, 0, 0], COLOR;
    R64G64_SFLOAT: SFLOAT [64, 64, 0, 0], COLOR;
    R64G64B64_SFLOAT: SFLOAT [64, 64, 64, 0], COLOR;
    R64G64B64A64_SFLOAT: SFLOAT [64, 64, 64, 64], COLOR;
    B10G11R11_UFLOAT_PACK32: UFLOAT [11, 11, 10, 0], COLOR;
    E5B9G9R9_UFLOAT_PACK32: UFLOAT [9, 9, 9, 0], COLOR;
    D16_UNORM: NONE [0, 0, 0, 0], DEPTH;
    X8_D24_UNORM_PACK32: NONE [0, 0, 0, 0], DEPTH;
    D32_SFLOAT: NONE [0, 0, 0, 0], DEPTH;
    S8_UINT: NONE [0, 0, 0, 0], STENCIL;
    D16_UNORM_S8_UINT: NONE [0, 0, 0, 0], DEPTH_STENCIL;
    D24_UNORM_S8_UINT: NONE [0, 0, 0, 0], DEPTH_STENCIL;
    D32_SFLOAT_S8_UINT: NONE [0, 0, 0, 0], DEPTH_STENCIL;
}

impl Format {
    /// Returns the number of components that are present.
    #[inline]
    pub fn component_count(self) -> u32 {
        self.components().into_iter().filter(|&bits| bits != 0).count() as u32
    }

    /// Returns whether the components of this format are 64 bits wide.
    #[inline]
    pub fn is_64bit(self) -> bool {
        self.components()[0] == 64
    }

    /// Returns whether this format has a depth or stencil aspect.
    #[inline]
    pub fn is_depth_stencil(self) -> bool {
        self.aspects()
            .intersects(ImageAspects::DEPTH | ImageAspects::STENCIL)
    }
}

/// The numeric format of the color components of a format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::upper_case_acronyms)]
pub enum NumericFormat {
    /// Signed floating-point number.
    SFLOAT,
    /// Unsigned floating-point number.
    UFLOAT,
    /// Signed integer.
    SINT,
    /// Unsigned integer.
    UINT,
    /// Signed integer that is converted to a floating-point value in the range `[-1, 1]`.
    SNORM,
    /// Unsigned integer that is converted to a floating-point value in the range `[0, 1]`.
    UNORM,
    /// Like `UNORM`, but with the sRGB transfer function applied.
    SRGB,
}

impl NumericFormat {
    /// Returns the numeric type that a shader sees when reading this format.
    #[inline]
    pub const fn numeric_type(self) -> NumericType {
        match self {
            NumericFormat::SFLOAT
            | NumericFormat::UFLOAT
            | NumericFormat::SNORM
            | NumericFormat::UNORM
            | NumericFormat::SRGB => NumericType::Float,
            NumericFormat::SINT => NumericType::Int,
            NumericFormat::UINT => NumericType::Uint,
        }
    }
}

/// The numeric base type of a shader interface variable or of the data read from a format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericType {
    Float,
    Int,
    Uint,
}

vulkan_bitflags! {
    /// The features supported by a format for optimally tiled images and for buffers.
    FormatFeatures = FormatFeatureFlags2(u64);

    SAMPLED_IMAGE = SAMPLED_IMAGE,
    COLOR_ATTACHMENT = COLOR_ATTACHMENT,

    /// The format can be used as a color attachment with blending enabled.
    COLOR_ATTACHMENT_BLEND = COLOR_ATTACHMENT_BLEND,
    DEPTH_STENCIL_ATTACHMENT = DEPTH_STENCIL_ATTACHMENT,
    VERTEX_BUFFER = VERTEX_BUFFER,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components() {
        assert_eq!(Format::R32G32B32_SFLOAT.component_count(), 3);
        assert_eq!(Format::E5B9G9R9_UFLOAT_PACK32.component_count(), 3);
        assert!(Format::R64G64_SFLOAT.is_64bit());
        assert!(!Format::R32G32_SFLOAT.is_64bit());
    }

    #[test]
    fn numeric_types() {
        assert_eq!(
            Format::R8G8B8A8_UNORM
                .numeric_format_color()
                .map(NumericFormat::numeric_type),
            Some(NumericType::Float),
        );
        assert_eq!(
            Format::R32_SINT
                .numeric_format_color()
                .map(NumericFormat::numeric_type),
            Some(NumericType::Int),
        );
        assert_eq!(Format::D32_SFLOAT.numeric_format_color(), None);
    }

    #[test]
    fn depth_stencil_aspects() {
        assert!(Format::D24_UNORM_S8_UINT.is_depth_stencil());
        assert!(Format::D24_UNORM_S8_UINT
            .aspects()
            .contains(ImageAspects::DEPTH | ImageAspects::STENCIL));
        assert!(!Format::B8G8R8A8_SRGB.is_depth_stencil());
    }

    #[test]
    fn ash_round_trip() {
        let raw: ash::vk::Format = Format::E5B9G9R9_UFLOAT_PACK32.into();
        assert_eq!(raw, ash::vk::Format::E5B9G9R9_UFLOAT_PACK32);
        assert_eq!(Format::try_from(raw), Ok(Format::E5B9G9R9_UFLOAT_PACK32));
        assert!(Format::try_from(ash::vk::Format::BC1_RGB_UNORM_BLOCK).is_err());
    }
}
