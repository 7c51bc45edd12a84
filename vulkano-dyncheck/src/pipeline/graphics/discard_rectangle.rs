// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! A test to discard pixels that would be written to certain areas of a framebuffer.
//!
//! The discard rectangle test is similar to, but separate from the scissor test.

use crate::{
    device::DeviceCapabilities, macros::vulkan_enum, pipeline::graphics::viewport::Scissor,
    Requires, RequiresAllOf, RequiresOneOf, ValidationError,
};

/// The state in a graphics pipeline describing how the discard rectangle test should behave.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiscardRectangleState {
    /// Sets whether the discard rectangle test operates inclusively or exclusively.
    ///
    /// The default value is [`DiscardRectangleMode::Exclusive`].
    pub mode: DiscardRectangleMode,

    /// Specifies the discard rectangles.
    ///
    /// When `DynamicState::DiscardRectangle` is dynamic, only the length of this list is used,
    /// and the rectangles themselves are set in the command buffer. The length is then the
    /// number of rectangles that must be set before drawing.
    ///
    /// The default value is empty.
    pub rectangles: Vec<Scissor>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: crate::NonExhaustive,
}

impl DiscardRectangleState {
    /// Creates a `DiscardRectangleState` in exclusive mode with zero rectangles.
    #[inline]
    pub fn new() -> Self {
        Self {
            mode: DiscardRectangleMode::Exclusive,
            rectangles: Vec::new(),
            _ne: crate::NonExhaustive(()),
        }
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let &Self {
            mode: _,
            ref rectangles,
            _ne: _,
        } = self;

        if !device.enabled_extensions.ext_discard_rectangles {
            return Err(Box::new(ValidationError {
                problem: "a discard rectangle state was provided".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "ext_discard_rectangles",
                )])]),
                ..Default::default()
            }));
        }

        if rectangles.len() as u32 > device.properties.max_discard_rectangles {
            return Err(Box::new(ValidationError {
                context: "rectangles".into(),
                problem: "the length exceeds the `max_discard_rectangles` limit".into(),
                vuids: &[
                    "VUID-VkPipelineDiscardRectangleStateCreateInfoEXT-discardRectangleCount-00582",
                ],
                ..Default::default()
            }));
        }

        Ok(())
    }
}

impl Default for DiscardRectangleState {
    /// Returns [`DiscardRectangleState::new()`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// The mode in which the discard rectangle test operates.
    DiscardRectangleMode = DiscardRectangleModeEXT(i32);

    /// Samples that are inside a rectangle are kept, samples that are outside all rectangles
    /// are discarded.
    Inclusive = INCLUSIVE,

    /// Samples that are inside a rectangle are discarded, samples that are outside all
    /// rectangles are kept.
    Exclusive = EXCLUSIVE,
}

impl Default for DiscardRectangleMode {
    #[inline]
    fn default() -> Self {
        DiscardRectangleMode::Exclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_limit() {
        let mut device = DeviceCapabilities::default();
        device.enabled_extensions.ext_discard_rectangles = true;

        let mut state = DiscardRectangleState {
            rectangles: vec![Scissor::default(); 4],
            ..Default::default()
        };
        assert!(state.validate(&device).is_ok());

        state.rectangles.push(Scissor::default());
        assert!(state.validate(&device).is_err());
    }
}
