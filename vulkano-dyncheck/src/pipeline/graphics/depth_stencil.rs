// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Configures the operation of the depth, stencil and depth bounds tests.
//!
//! The depth test passes of fails depending on how the depth value of each fragment compares
//! to the existing depth value in the depth buffer at that fragment's location. Depth values
//! are always between 0.0 and 1.0.
//!
//! The depth bounds test allows you to ask the GPU to exclude fragments that are outside of a
//! certain range. This is done in addition to the regular depth test.
//!
//! The stencil test passes or fails depending on how a reference value compares to the existing
//! value in the stencil buffer at each fragment's location. Depending on the outcome of the
//! depth and stencil tests, the value of the stencil buffer at that location can be updated.

use crate::{
    device::DeviceCapabilities,
    macros::{vulkan_bitflags, vulkan_enum},
    Requires, RequiresAllOf, RequiresOneOf, ValidationError,
};
use std::ops::RangeInclusive;

/// The state in a graphics pipeline describing how the depth, depth bounds and stencil tests
/// should behave.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DepthStencilState {
    /// The state of the depth test.
    ///
    /// If set to `None`, the depth test is disabled, all fragments will pass and no depth writes
    /// are performed.
    ///
    /// The default value is `None`.
    pub depth: Option<DepthState>,

    /// The minimum and maximum depth values to use for the depth bounds test.
    /// Fragments with values outside this range are discarded.
    ///
    /// If set to `None`, the depth bounds test is disabled, all fragments will pass.
    ///
    /// The default value is `None`.
    pub depth_bounds: Option<RangeInclusive<f32>>,

    /// The state of the stencil test.
    ///
    /// If set to `None`, the stencil test is disabled, all fragments will pass and no stencil
    /// writes are performed.
    ///
    /// The default value is `None`.
    pub stencil: Option<StencilState>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: crate::NonExhaustive,
}

impl Default for DepthStencilState {
    /// Creates a `DepthStencilState` where all tests are disabled and have no effect.
    #[inline]
    fn default() -> Self {
        Self {
            depth: None,
            depth_bounds: None,
            stencil: None,
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl DepthStencilState {
    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let Self {
            depth,
            depth_bounds,
            stencil,
            _ne: _,
        } = self;

        if let Some(depth_state) = depth {
            depth_state
                .compare_op
                .validate_device(device)
                .map_err(|err| {
                    err.add_context("depth.compare_op").set_vuids(&[
                        "VUID-VkPipelineDepthStencilStateCreateInfo-depthCompareOp-parameter",
                    ])
                })?;
        }

        if depth_bounds.is_some() && !device.enabled_features.depth_bounds {
            return Err(Box::new(ValidationError {
                context: "depth_bounds".into(),
                problem: "is `Some`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "depth_bounds",
                )])]),
                vuids: &[
                    "VUID-VkPipelineDepthStencilStateCreateInfo-depthBoundsTestEnable-00598",
                ],
                ..Default::default()
            }));
        }

        if let Some(stencil_state) = stencil {
            stencil_state
                .front
                .ops
                .validate(device)
                .map_err(|err| err.add_context("stencil.front.ops"))?;
            stencil_state
                .back
                .ops
                .validate(device)
                .map_err(|err| err.add_context("stencil.back.ops"))?;
        }

        Ok(())
    }
}

/// The state in a graphics pipeline describing how the depth test should behave when enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepthState {
    /// Sets whether the value in the depth buffer will be updated when the depth test succeeds.
    ///
    /// The default value is `false`.
    pub write_enable: bool,

    /// Comparison operation to use between the depth value of each incoming fragment and the depth
    /// value currently in the depth buffer.
    ///
    /// The default value is [`CompareOp::Always`].
    pub compare_op: CompareOp,
}

impl Default for DepthState {
    /// Creates a `DepthState` with depth writes disabled and `compare_op` set to always pass.
    #[inline]
    fn default() -> Self {
        Self {
            write_enable: false,
            compare_op: CompareOp::Always,
        }
    }
}

impl DepthState {
    /// Returns a `DepthState` with a `Less` depth test and depth writes enabled.
    #[inline]
    pub fn simple() -> Self {
        Self {
            compare_op: CompareOp::Less,
            write_enable: true,
        }
    }
}

/// The state in a graphics pipeline describing how the stencil test should behave when enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StencilState {
    /// The stencil operation state to use for points and lines, and for triangles whose front is
    /// facing the user.
    pub front: StencilOpState,

    /// The stencil operation state to use for triangles whose back is facing the user.
    pub back: StencilOpState,
}

/// Stencil test operations for a single face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StencilOpState {
    /// The stencil operations to perform.
    pub ops: StencilOps,

    /// A bitmask that selects the bits of the unsigned integer stencil values participating in the
    /// stencil test. Ignored if `compare_op` is `Never` or `Always`.
    pub compare_mask: u32,

    /// A bitmask that selects the bits of the unsigned integer stencil values updated by the
    /// stencil test in the stencil framebuffer attachment. Ignored if the relevant operation is
    /// `Keep`.
    pub write_mask: u32,

    /// Reference value that is used in the unsigned stencil comparison. The stencil test is
    /// considered to pass if the `compare_op` between the stencil buffer value and this reference
    /// value yields true.
    pub reference: u32,
}

impl Default for StencilOpState {
    /// Creates a `StencilOpState` with `compare_op` set to `Never`, the stencil operations set to
    /// `Keep`, and the masks and reference values set to `u32::MAX`.
    #[inline]
    fn default() -> StencilOpState {
        StencilOpState {
            ops: Default::default(),
            compare_mask: u32::MAX,
            write_mask: u32::MAX,
            reference: u32::MAX,
        }
    }
}

/// The stencil operations of one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StencilOps {
    /// The operation to perform when the stencil test failed.
    pub fail_op: StencilOp,

    /// The operation to perform when both the depth test and the stencil test passed.
    pub pass_op: StencilOp,

    /// The operation to perform when the stencil test passed but the depth test failed.
    pub depth_fail_op: StencilOp,

    /// The comparison to perform between the existing stencil value in the stencil buffer, and
    /// the reference value (given by `reference`).
    pub compare_op: CompareOp,
}

impl Default for StencilOps {
    /// Creates a `StencilOps` with `compare_op` set to `Never` and the stencil operations set to
    /// `Keep`.
    #[inline]
    fn default() -> Self {
        Self {
            pass_op: StencilOp::Keep,
            fail_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            compare_op: CompareOp::Never,
        }
    }
}

impl StencilOps {
    pub(crate) fn validate(self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let Self {
            fail_op,
            pass_op,
            depth_fail_op,
            compare_op,
        } = self;

        fail_op.validate_device(device).map_err(|err| {
            err.add_context("fail_op")
                .set_vuids(&["VUID-VkStencilOpState-failOp-parameter"])
        })?;
        pass_op.validate_device(device).map_err(|err| {
            err.add_context("pass_op")
                .set_vuids(&["VUID-VkStencilOpState-passOp-parameter"])
        })?;
        depth_fail_op.validate_device(device).map_err(|err| {
            err.add_context("depth_fail_op")
                .set_vuids(&["VUID-VkStencilOpState-depthFailOp-parameter"])
        })?;
        compare_op.validate_device(device).map_err(|err| {
            err.add_context("compare_op")
                .set_vuids(&["VUID-VkStencilOpState-compareOp-parameter"])
        })?;

        Ok(())
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// Operation to perform after the depth and stencil tests.
    StencilOp = StencilOp(i32);

    Keep = KEEP,
    Zero = ZERO,
    Replace = REPLACE,
    IncrementAndClamp = INCREMENT_AND_CLAMP,
    DecrementAndClamp = DECREMENT_AND_CLAMP,
    Invert = INVERT,
    IncrementAndWrap = INCREMENT_AND_WRAP,
    DecrementAndWrap = DECREMENT_AND_WRAP,
}

vulkan_bitflags! {
    /// Specifies the faces that a stencil command applies to.
    StencilFaces = StencilFaceFlags(u32);

    /// The front face.
    FRONT = FRONT,

    /// The back face.
    BACK = BACK,
}

vulkan_enum! {
    #[non_exhaustive]

    /// Specifies how two values should be compared to decide whether a test passes or fails.
    ///
    /// Used for both depth testing and stencil testing.
    CompareOp = CompareOp(i32);

    /// The test never passes.
    Never = NEVER,

    /// The test passes if `value < reference_value`.
    Less = LESS,

    /// The test passes if `value == reference_value`.
    Equal = EQUAL,

    /// The test passes if `value <= reference_value`.
    LessOrEqual = LESS_OR_EQUAL,

    /// The test passes if `value > reference_value`.
    Greater = GREATER,

    /// The test passes if `value != reference_value`.
    NotEqual = NOT_EQUAL,

    /// The test passes if `value >= reference_value`.
    GreaterOrEqual = GREATER_OR_EQUAL,

    /// The test always passes.
    Always = ALWAYS,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_bounds_requires_feature() {
        let state = DepthStencilState {
            depth_bounds: Some(0.0..=1.0),
            ..Default::default()
        };

        assert!(state.validate(&DeviceCapabilities::default()).is_err());
    }

    #[test]
    fn stencil_faces() {
        let both = StencilFaces::FRONT | StencilFaces::BACK;
        assert_eq!(
            ash::vk::StencilFaceFlags::from(both),
            ash::vk::StencilFaceFlags::FRONT_AND_BACK,
        );
        assert!(both.contains(StencilFaces::BACK));
    }
}
