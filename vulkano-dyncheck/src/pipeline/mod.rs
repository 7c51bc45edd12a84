// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Descriptions of the pipelines that can be bound while recording.
//!
//! A pipeline fixes most of its configuration when it is created. Anything listed in its
//! `dynamic_state` is left open and must instead be supplied by a recording command before the
//! pipeline is used. The types in this module do not create anything on a device; they describe
//! pipelines that the caller created, so that their dynamic state can be validated.

pub use self::dynamic_state::{DynamicState, DynamicStateDescription, DynamicStateSet};
use crate::macros::vulkan_enum;

mod dynamic_state;
pub mod graphics;
pub mod ray_tracing;

vulkan_enum! {
    #[non_exhaustive]

    /// The type of a pipeline.
    ///
    /// When binding a pipeline or descriptor sets in a command buffer, the state for each bind
    /// point is independent from the others. This means that it is possible, for example, to bind
    /// a graphics pipeline without disturbing any bound ray tracing pipeline.
    PipelineBindPoint = PipelineBindPoint(i32);

    /// Compute pipelines. No state of a compute pipeline can be dynamic.
    Compute = COMPUTE,

    /// Graphics pipelines and graphics shader objects.
    Graphics = GRAPHICS,

    /// Ray tracing pipelines.
    RayTracing = RAY_TRACING_KHR
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(khr_ray_tracing_pipeline)]),
    ]),
}
