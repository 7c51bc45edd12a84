// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Ray tracing pipelines.
//!
//! The only state of a ray tracing pipeline that can be dynamic is the pipeline stack size,
//! [`DynamicState::RayTracingPipelineStackSize`].

use crate::{
    device::DeviceCapabilities,
    diagnostic::ObjectHandle,
    macros::impl_id_counter,
    pipeline::{DynamicState, DynamicStateSet, PipelineBindPoint},
    Requires, RequiresAllOf, RequiresOneOf, ValidationError,
};
use std::{num::NonZero, sync::Arc};

/// Defines how the implementation should perform ray tracing operations.
#[derive(Debug)]
pub struct RayTracingPipeline {
    id: NonZero<u64>,
    dynamic_state: DynamicStateSet,
}

impl RayTracingPipeline {
    /// Creates a new `RayTracingPipeline`.
    pub fn new(
        device: &DeviceCapabilities,
        create_info: RayTracingPipelineCreateInfo,
    ) -> Result<Arc<RayTracingPipeline>, Box<ValidationError>> {
        create_info
            .validate(device)
            .map_err(|err| err.add_context("create_info"))?;

        let RayTracingPipelineCreateInfo {
            dynamic_state,
            _ne: _,
        } = create_info;

        Ok(Arc::new(RayTracingPipeline {
            id: Self::next_id(),
            dynamic_state,
        }))
    }

    /// Returns the states that are dynamic in this pipeline.
    #[inline]
    pub fn dynamic_state(&self) -> &DynamicStateSet {
        &self.dynamic_state
    }

    /// Returns whether `state` is dynamic in this pipeline.
    #[inline]
    pub fn is_dynamic(&self, state: DynamicState) -> bool {
        self.dynamic_state.contains(state)
    }

    /// Returns the handle that diagnostics use to refer to the pipeline.
    #[inline]
    pub fn object_handle(&self) -> ObjectHandle {
        ObjectHandle::new(ash::vk::ObjectType::PIPELINE, self.id.get())
    }
}

impl_id_counter!(RayTracingPipeline);

/// Parameters to create a new `RayTracingPipeline`.
#[derive(Clone, Debug)]
pub struct RayTracingPipelineCreateInfo {
    /// The state that must be set dynamically in the command buffer.
    ///
    /// Only `DynamicState::RayTracingPipelineStackSize` is allowed.
    ///
    /// The default value is empty.
    pub dynamic_state: DynamicStateSet,

    pub _ne: crate::NonExhaustive,
}

impl Default for RayTracingPipelineCreateInfo {
    #[inline]
    fn default() -> Self {
        Self {
            dynamic_state: DynamicStateSet::empty(),
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl RayTracingPipelineCreateInfo {
    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        if !device.enabled_extensions.khr_ray_tracing_pipeline {
            return Err(Box::new(ValidationError {
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "khr_ray_tracing_pipeline",
                )])]),
                ..Default::default()
            }));
        }

        for state in self.dynamic_state.iter() {
            if state.bind_point() != PipelineBindPoint::RayTracing {
                return Err(Box::new(ValidationError {
                    context: "dynamic_state".into(),
                    problem: format!(
                        "contains `DynamicState::{:?}`, which is not a ray tracing state",
                        state,
                    )
                    .into(),
                    vuids: &["VUID-VkRayTracingPipelineCreateInfoKHR-pDynamicStates-03602"],
                    ..Default::default()
                }));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::full_device;

    #[test]
    fn only_stack_size_is_dynamic() {
        let device = full_device();

        let create_info = RayTracingPipelineCreateInfo {
            dynamic_state: [DynamicState::RayTracingPipelineStackSize].into(),
            ..Default::default()
        };
        let pipeline = RayTracingPipeline::new(&device, create_info).unwrap();
        assert!(pipeline.is_dynamic(DynamicState::RayTracingPipelineStackSize));

        let create_info = RayTracingPipelineCreateInfo {
            dynamic_state: [DynamicState::CullMode].into(),
            ..Default::default()
        };
        assert!(RayTracingPipeline::new(&device, create_info).is_err());
    }
}
