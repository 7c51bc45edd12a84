// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Queries that can be active while drawing.
//!
//! Only the type of an active query matters here: a `PrimitivesGenerated` query observes the
//! rasterization stream, which restricts the values that stream may take.

use crate::macros::vulkan_enum;

vulkan_enum! {
    #[non_exhaustive]

    /// The type of a query.
    QueryType = QueryType(i32);

    /// Tracks the number of samples that pass per-fragment tests (e.g. the depth test).
    Occlusion = OCCLUSION,

    /// Tracks statistics on pipeline invocations and their input data.
    PipelineStatistics = PIPELINE_STATISTICS,

    /// Writes timestamps at chosen points in a command buffer.
    Timestamp = TIMESTAMP,

    /// Queries the number of primitives and vertices written by transform feedback.
    TransformFeedbackStream = TRANSFORM_FEEDBACK_STREAM_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_transform_feedback)]),
    ]),

    /// Queries the number of primitives emitted to a stream before rasterization.
    PrimitivesGenerated = PRIMITIVES_GENERATED_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_primitives_generated_query)]),
    ]),
}
