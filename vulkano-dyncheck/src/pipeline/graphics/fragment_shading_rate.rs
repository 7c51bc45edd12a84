// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Fragment shading rate introduces the ability to change the rate at which fragments are shaded.
//!
//! This feature is part of the `khr_fragment_shading_rate` device extension.
//!
//! The fragment shading rate can be controlled per-draw, per-primitive, and per-region:
//! - Per-draw shading rate requires the `pipeline_fragment_shading_rate` feature to be enabled on
//!   the device, and the rate can be set in a graphics pipeline or dynamically via
//!   `set_fragment_shading_rate`.
//! - Per-primitive shading rate requires the `primitive_fragment_shading_rate` feature to be
//!   enabled on the device, and is set in the last active pre-rasterization shader stage.
//! - Per-region shading rate requires the `attachment_fragment_shading_rate` feature to be
//!   enabled on the device and an additional specialised fragment shading rate image attachment.
//!
//! The combiner operations determine how the three rates are combined into the final one.

use crate::{
    device::DeviceCapabilities, macros::vulkan_enum, Requires, RequiresAllOf, RequiresOneOf,
    ValidationError,
};

/// The state in a graphics pipeline describing the fragment shading rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FragmentShadingRateState {
    /// The pipeline fragment shading rate.
    ///
    /// The default value is `[1, 1]`.
    pub fragment_size: [u32; 2],

    /// Determines how the pipeline, primitive, and attachment shading rates are combined for
    /// fragments generated.
    ///
    /// The default value is `[FragmentShadingRateCombinerOp::Keep; 2]`.
    pub combiner_ops: [FragmentShadingRateCombinerOp; 2],

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: crate::NonExhaustive,
}

impl FragmentShadingRateState {
    /// Creates a new `FragmentShadingRateState` with a 1x1 fragment size and both combiner
    /// operations set to `Keep`.
    #[inline]
    pub const fn new() -> Self {
        Self {
            fragment_size: [1, 1],
            combiner_ops: [FragmentShadingRateCombinerOp::Keep; 2],
            _ne: crate::NonExhaustive(()),
        }
    }

    /// Checks the fragment size and combiner operations against the device.
    ///
    /// The same checks apply to the pipeline state and to `vkCmdSetFragmentShadingRateKHR`, with
    /// different VUIDs.
    pub(crate) fn validate_with_vuids(
        &self,
        device: &DeviceCapabilities,
        vuids: &FragmentShadingRateVuids,
    ) -> Result<(), Box<ValidationError>> {
        let &Self {
            fragment_size: [width, height],
            combiner_ops,
            _ne: _,
        } = self;

        let features = &device.enabled_features;

        if !(features.pipeline_fragment_shading_rate
            || features.primitive_fragment_shading_rate
            || features.attachment_fragment_shading_rate)
        {
            return Err(Box::new(ValidationError {
                requires_one_of: RequiresOneOf(&[
                    RequiresAllOf(&[Requires::DeviceFeature("pipeline_fragment_shading_rate")]),
                    RequiresAllOf(&[Requires::DeviceFeature("primitive_fragment_shading_rate")]),
                    RequiresAllOf(&[Requires::DeviceFeature(
                        "attachment_fragment_shading_rate",
                    )]),
                ]),
                vuids: vuids.feature,
                ..Default::default()
            }));
        }

        for op in combiner_ops {
            op.validate_device(device)
                .map_err(|err| err.add_context("combiner_ops"))?;
        }

        if !features.pipeline_fragment_shading_rate {
            if width != 1 {
                return Err(Box::new(ValidationError {
                    context: "fragment_size[0]".into(),
                    problem: "is not 1".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "pipeline_fragment_shading_rate",
                    )])]),
                    vuids: vuids.width_pipeline,
                    ..Default::default()
                }));
            }

            if height != 1 {
                return Err(Box::new(ValidationError {
                    context: "fragment_size[1]".into(),
                    problem: "is not 1".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "pipeline_fragment_shading_rate",
                    )])]),
                    vuids: vuids.height_pipeline,
                    ..Default::default()
                }));
            }
        }

        if !features.primitive_fragment_shading_rate
            && combiner_ops[0] != FragmentShadingRateCombinerOp::Keep
        {
            return Err(Box::new(ValidationError {
                context: "combiner_ops[0]".into(),
                problem: "is not `FragmentShadingRateCombinerOp::Keep`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "primitive_fragment_shading_rate",
                )])]),
                vuids: vuids.primitive_combiner,
                ..Default::default()
            }));
        }

        if !features.attachment_fragment_shading_rate
            && combiner_ops[1] != FragmentShadingRateCombinerOp::Keep
        {
            return Err(Box::new(ValidationError {
                context: "combiner_ops[1]".into(),
                problem: "is not `FragmentShadingRateCombinerOp::Keep`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "attachment_fragment_shading_rate",
                )])]),
                vuids: vuids.attachment_combiner,
                ..Default::default()
            }));
        }

        if !device
            .properties
            .fragment_shading_rate_non_trivial_combiner_ops
            && combiner_ops.iter().any(|op| !op.is_trivial())
        {
            return Err(Box::new(ValidationError {
                context: "combiner_ops".into(),
                problem: "contains an operation other than `Keep` or `Replace`, but the \
                    `fragment_shading_rate_non_trivial_combiner_ops` property is `false`"
                    .into(),
                vuids: vuids.non_trivial_combiner,
                ..Default::default()
            }));
        }

        for (index, size, zero, power_of_two, too_large) in [
            (0, width, vuids.width_zero, vuids.width_power_of_two, vuids.width_max),
            (1, height, vuids.height_zero, vuids.height_power_of_two, vuids.height_max),
        ] {
            if size == 0 {
                return Err(Box::new(ValidationError {
                    context: format!("fragment_size[{}]", index).into(),
                    problem: "is zero".into(),
                    vuids: zero,
                    ..Default::default()
                }));
            }

            if !size.is_power_of_two() {
                return Err(Box::new(ValidationError {
                    context: format!("fragment_size[{}]", index).into(),
                    problem: "is not a power of two".into(),
                    vuids: power_of_two,
                    ..Default::default()
                }));
            }

            if size > 4 {
                return Err(Box::new(ValidationError {
                    context: format!("fragment_size[{}]", index).into(),
                    problem: "is greater than 4".into(),
                    vuids: too_large,
                    ..Default::default()
                }));
            }
        }

        Ok(())
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        self.validate_with_vuids(device, &FragmentShadingRateVuids::PIPELINE)
    }
}

impl Default for FragmentShadingRateState {
    /// Returns [`FragmentShadingRateState::new()`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// The VUIDs reported by [`FragmentShadingRateState::validate_with_vuids`].
pub(crate) struct FragmentShadingRateVuids {
    pub(crate) feature: &'static [&'static str],
    pub(crate) width_pipeline: &'static [&'static str],
    pub(crate) height_pipeline: &'static [&'static str],
    pub(crate) primitive_combiner: &'static [&'static str],
    pub(crate) attachment_combiner: &'static [&'static str],
    pub(crate) non_trivial_combiner: &'static [&'static str],
    pub(crate) width_zero: &'static [&'static str],
    pub(crate) height_zero: &'static [&'static str],
    pub(crate) width_power_of_two: &'static [&'static str],
    pub(crate) height_power_of_two: &'static [&'static str],
    pub(crate) width_max: &'static [&'static str],
    pub(crate) height_max: &'static [&'static str],
}

impl FragmentShadingRateVuids {
    pub(crate) const PIPELINE: Self = Self {
        feature: &[],
        width_pipeline: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04494"],
        height_pipeline: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04495"],
        primitive_combiner: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04501"],
        attachment_combiner: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04502"],
        non_trivial_combiner: &["VUID-VkGraphicsPipelineCreateInfo-fragmentShadingRateNonTrivialCombinerOps-04506"],
        width_zero: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04494"],
        height_zero: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04495"],
        width_power_of_two: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04496"],
        height_power_of_two: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04497"],
        width_max: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04498"],
        height_max: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04499"],
    };

    pub(crate) const SET_FRAGMENT_SHADING_RATE: Self = Self {
        feature: &["VUID-vkCmdSetFragmentShadingRateKHR-pipelineFragmentShadingRate-04509"],
        width_pipeline: &["VUID-vkCmdSetFragmentShadingRateKHR-pipelineFragmentShadingRate-04507"],
        height_pipeline: &["VUID-vkCmdSetFragmentShadingRateKHR-pipelineFragmentShadingRate-04508"],
        primitive_combiner: &["VUID-vkCmdSetFragmentShadingRateKHR-primitiveFragmentShadingRate-04510"],
        attachment_combiner: &["VUID-vkCmdSetFragmentShadingRateKHR-attachmentFragmentShadingRate-04511"],
        non_trivial_combiner: &["VUID-vkCmdSetFragmentShadingRateKHR-fragmentSizeNonTrivialCombinerOps-04512"],
        width_zero: &["VUID-vkCmdSetFragmentShadingRateKHR-pFragmentSize-04513"],
        height_zero: &["VUID-vkCmdSetFragmentShadingRateKHR-pFragmentSize-04514"],
        width_power_of_two: &["VUID-vkCmdSetFragmentShadingRateKHR-pFragmentSize-04515"],
        height_power_of_two: &["VUID-vkCmdSetFragmentShadingRateKHR-pFragmentSize-04516"],
        width_max: &["VUID-vkCmdSetFragmentShadingRateKHR-pFragmentSize-04517"],
        height_max: &["VUID-vkCmdSetFragmentShadingRateKHR-pFragmentSize-04518"],
    };
}

vulkan_enum! {
    #[non_exhaustive]

    /// Control how fragment shading rates are combined.
    FragmentShadingRateCombinerOp impl {
        /// Returns whether the operation is `Keep` or `Replace`, which every implementation
        /// supports.
        #[inline]
        pub fn is_trivial(self) -> bool {
            matches!(self, Self::Keep | Self::Replace)
        }
    }
    = FragmentShadingRateCombinerOpKHR(i32);

    /// Specifies a combiner operation of combine(Axy,Bxy) = Axy.
    Keep = KEEP,

    /// Specifies a combiner operation of combine(Axy,Bxy) = Bxy.
    Replace = REPLACE,

    /// Specifies a combiner operation of combine(Axy,Bxy) = min(Axy,Bxy).
    Min = MIN,

    /// Specifies a combiner operation of combine(Axy,Bxy) = max(Axy,Bxy).
    Max = MAX,

    /// Specifies a combiner operation of combine(Axy,Bxy) = Axy*Bxy.
    Mul = MUL,
}

impl Default for FragmentShadingRateCombinerOp {
    #[inline]
    fn default() -> Self {
        Self::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DeviceCapabilities {
        let mut device = DeviceCapabilities::default();
        device.enabled_features.pipeline_fragment_shading_rate = true;
        device
    }

    fn check(state: FragmentShadingRateState, device: &DeviceCapabilities) -> &'static str {
        match state.validate_with_vuids(device, &FragmentShadingRateVuids::SET_FRAGMENT_SHADING_RATE) {
            Ok(()) => "ok",
            Err(err) => err.vuids.first().copied().unwrap_or("no vuid"),
        }
    }

    #[test]
    fn needs_some_feature() {
        assert_eq!(
            check(FragmentShadingRateState::new(), &DeviceCapabilities::default()),
            "VUID-vkCmdSetFragmentShadingRateKHR-pipelineFragmentShadingRate-04509",
        );
    }

    #[test]
    fn fragment_sizes() {
        let device = device();
        let with_size = |fragment_size| FragmentShadingRateState {
            fragment_size,
            ..FragmentShadingRateState::new()
        };

        assert_eq!(check(with_size([2, 4]), &device), "ok");
        assert_eq!(
            check(with_size([0, 1]), &device),
            "VUID-vkCmdSetFragmentShadingRateKHR-pFragmentSize-04513",
        );
        assert_eq!(
            check(with_size([1, 3]), &device),
            "VUID-vkCmdSetFragmentShadingRateKHR-pFragmentSize-04516",
        );
        assert_eq!(
            check(with_size([8, 1]), &device),
            "VUID-vkCmdSetFragmentShadingRateKHR-pFragmentSize-04517",
        );
    }

    #[test]
    fn combiners() {
        let mut device = device();
        let state = FragmentShadingRateState {
            combiner_ops: [
                FragmentShadingRateCombinerOp::Keep,
                FragmentShadingRateCombinerOp::Mul,
            ],
            ..FragmentShadingRateState::new()
        };
        assert_eq!(
            check(state, &device),
            "VUID-vkCmdSetFragmentShadingRateKHR-attachmentFragmentShadingRate-04511",
        );

        device.enabled_features.attachment_fragment_shading_rate = true;
        device
            .properties
            .fragment_shading_rate_non_trivial_combiner_ops = false;
        assert_eq!(
            check(state, &device),
            "VUID-vkCmdSetFragmentShadingRateKHR-fragmentSizeNonTrivialCombinerOps-04512",
        );
    }
}
