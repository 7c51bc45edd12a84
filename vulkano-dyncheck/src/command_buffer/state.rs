// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The record of which dynamic state was set, and to what.
//!
//! Each [`DynamicState`] has two status bits. The *session* bit is set by the first command that
//! supplies the state and is never cleared. The *since-bind* bit is set by the same commands, and
//! cleared for every state of a bind point when a pipeline or shader object is bound there. The
//! values themselves survive binds.
//!
//! States that hold one value per viewport, rectangle or attachment store a map from index to
//! value. Every command merges its range into the map, so the map is the union of all ranges
//! set during the session. Which indices were set since the last bind is tracked separately.

use crate::{
    image::{ImageAspects, SampleCount},
    pipeline::{
        graphics::{
            color_blend::{AttachmentBlend, ColorBlendAdvanced, ColorComponents, LogicOp},
            depth_stencil::{CompareOp, StencilOps},
            discard_rectangle::DiscardRectangleMode,
            fragment_shading_rate::FragmentShadingRateState,
            input_assembly::PrimitiveTopology,
            multisample::{CoverageModulationMode, CoverageReductionMode, SampleLocationsInfo},
            rasterization::{
                ConservativeRasterizationMode, CullMode, DepthBiasState, FrontFace,
                LineRasterizationMode, LineStipple, PolygonMode, ProvokingVertexMode,
            },
            tessellation::TessellationDomainOrigin,
            vertex_input::VertexInputState,
            viewport::{
                CoarseSampleOrder, Scissor, ShadingRatePalette, Viewport, ViewportSwizzle,
                ViewportWScaling,
            },
        },
        DynamicState, DynamicStateSet, PipelineBindPoint,
    },
};
use foldhash::{HashMap, HashSet};
use smallvec::SmallVec;
use std::ops::RangeInclusive;

/// Which status bit to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetScope {
    /// Whether the state was set at any point during the session.
    Session,

    /// Whether the state was set after the most recent bind at its bind point.
    SinceBind,
}

/// A value that is stored per stencil face.
///
/// A face is `None` until a command that includes it in its face mask is recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StencilFaceValues<T> {
    pub front: Option<T>,
    pub back: Option<T>,
}

impl<T: Copy> StencilFaceValues<T> {
    /// Returns the values of both faces, if both were set.
    #[inline]
    pub fn both(&self) -> Option<[T; 2]> {
        Some([self.front?, self.back?])
    }
}

/// The value of the `SampleMask` dynamic state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleMask {
    /// The sample count that the mask was specified for.
    pub samples: SampleCount,

    /// The mask. Only the first `samples / 32` words, rounded up, are meaningful.
    pub mask: [u32; 2],
}

/// Combines a newly recorded value with the value that is already stored.
trait Merge {
    fn merge(&mut self, new: Self);
}

impl<T> Merge for HashMap<u32, T> {
    #[inline]
    fn merge(&mut self, new: Self) {
        self.extend(new);
    }
}

impl<T> Merge for StencilFaceValues<T> {
    #[inline]
    fn merge(&mut self, new: Self) {
        if new.front.is_some() {
            self.front = new.front;
        }

        if new.back.is_some() {
            self.back = new.back;
        }
    }
}

macro_rules! dynamic_state_values {
    (@store replace, $slot:expr, $value:expr) => {
        *$slot = Some($value)
    };
    (@store merge, $slot:expr, $value:expr) => {
        match $slot {
            Some(existing) => existing.merge($value),
            slot @ None => *slot = Some($value),
        }
    };

    {
        $(
            $(#[doc = $doc:literal])*
            $name:ident($field:ident: $ty:ty) => $mode:ident,
        )+
    } => {
        /// A recorded value of one dynamic state, tagged with the state it belongs to.
        #[derive(Clone, Debug, PartialEq)]
        #[non_exhaustive]
        pub enum DynamicStateValue {
            $(
                $(#[doc = $doc])*
                $name($ty),
            )+
        }

        impl DynamicStateValue {
            /// Returns the state that the value belongs to.
            pub fn dynamic_state(&self) -> DynamicState {
                match self {
                    $(Self::$name(_) => DynamicState::$name,)+
                }
            }
        }

        /// The recorded values of all dynamic states.
        ///
        /// A field is `None` if no command has set the state during the session.
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct DynamicStateValues {
            $(
                $(#[doc = $doc])*
                pub $field: Option<$ty>,
            )+
        }

        impl DynamicStateValues {
            /// Returns the value of `state`, or `None` if it was never set.
            pub fn get(&self, state: DynamicState) -> Option<DynamicStateValue> {
                match state {
                    $(DynamicState::$name => self.$field.clone().map(DynamicStateValue::$name),)+
                }
            }

            fn store(&mut self, value: DynamicStateValue) {
                match value {
                    $(
                        DynamicStateValue::$name(value) => {
                            dynamic_state_values!(@store $mode, &mut self.$field, value)
                        }
                    )+
                }
            }
        }
    };
}

dynamic_state_values! {
    Viewport(viewport: HashMap<u32, Viewport>) => merge,
    Scissor(scissor: HashMap<u32, Scissor>) => merge,
    LineWidth(line_width: f32) => replace,
    DepthBias(depth_bias: DepthBiasState) => replace,
    BlendConstants(blend_constants: [f32; 4]) => replace,
    DepthBounds(depth_bounds: RangeInclusive<f32>) => replace,
    StencilCompareMask(stencil_compare_mask: StencilFaceValues<u32>) => merge,
    StencilWriteMask(stencil_write_mask: StencilFaceValues<u32>) => merge,
    StencilReference(stencil_reference: StencilFaceValues<u32>) => merge,
    CullMode(cull_mode: CullMode) => replace,
    FrontFace(front_face: FrontFace) => replace,
    PrimitiveTopology(primitive_topology: PrimitiveTopology) => replace,
    ViewportWithCount(viewport_with_count: SmallVec<[Viewport; 2]>) => replace,
    ScissorWithCount(scissor_with_count: SmallVec<[Scissor; 2]>) => replace,
    /// The strides given to `vkCmdBindVertexBuffers2`, by binding.
    VertexInputBindingStride(vertex_input_binding_stride: HashMap<u32, u32>) => merge,
    DepthTestEnable(depth_test_enable: bool) => replace,
    DepthWriteEnable(depth_write_enable: bool) => replace,
    DepthCompareOp(depth_compare_op: CompareOp) => replace,
    DepthBoundsTestEnable(depth_bounds_test_enable: bool) => replace,
    StencilTestEnable(stencil_test_enable: bool) => replace,
    StencilOp(stencil_op: StencilFaceValues<StencilOps>) => merge,
    RasterizerDiscardEnable(rasterizer_discard_enable: bool) => replace,
    DepthBiasEnable(depth_bias_enable: bool) => replace,
    PrimitiveRestartEnable(primitive_restart_enable: bool) => replace,
    ViewportWScaling(viewport_w_scaling: HashMap<u32, ViewportWScaling>) => merge,
    DiscardRectangle(discard_rectangle: HashMap<u32, Scissor>) => merge,
    DiscardRectangleEnable(discard_rectangle_enable: bool) => replace,
    DiscardRectangleMode(discard_rectangle_mode: DiscardRectangleMode) => replace,
    SampleLocations(sample_locations: SampleLocationsInfo) => replace,
    RayTracingPipelineStackSize(ray_tracing_pipeline_stack_size: u32) => replace,
    ViewportShadingRatePalette(viewport_shading_rate_palette: HashMap<u32, ShadingRatePalette>) => merge,
    ViewportCoarseSampleOrder(viewport_coarse_sample_order: CoarseSampleOrder) => replace,
    ExclusiveScissorEnable(exclusive_scissor_enable: HashMap<u32, bool>) => merge,
    ExclusiveScissor(exclusive_scissor: HashMap<u32, Scissor>) => merge,
    FragmentShadingRate(fragment_shading_rate: FragmentShadingRateState) => replace,
    LineStipple(line_stipple: LineStipple) => replace,
    VertexInput(vertex_input: VertexInputState) => replace,
    PatchControlPoints(patch_control_points: u32) => replace,
    LogicOp(logic_op: LogicOp) => replace,
    ColorWriteEnable(color_write_enable: SmallVec<[bool; 4]>) => replace,
    TessellationDomainOrigin(tessellation_domain_origin: TessellationDomainOrigin) => replace,
    DepthClampEnable(depth_clamp_enable: bool) => replace,
    PolygonMode(polygon_mode: PolygonMode) => replace,
    RasterizationSamples(rasterization_samples: SampleCount) => replace,
    SampleMask(sample_mask: SampleMask) => replace,
    AlphaToCoverageEnable(alpha_to_coverage_enable: bool) => replace,
    AlphaToOneEnable(alpha_to_one_enable: bool) => replace,
    LogicOpEnable(logic_op_enable: bool) => replace,
    ColorBlendEnable(color_blend_enable: HashMap<u32, bool>) => merge,
    ColorBlendEquation(color_blend_equation: HashMap<u32, AttachmentBlend>) => merge,
    ColorWriteMask(color_write_mask: HashMap<u32, ColorComponents>) => merge,
    RasterizationStream(rasterization_stream: u32) => replace,
    ConservativeRasterizationMode(conservative_rasterization_mode: ConservativeRasterizationMode) => replace,
    ExtraPrimitiveOverestimationSize(extra_primitive_overestimation_size: f32) => replace,
    DepthClipEnable(depth_clip_enable: bool) => replace,
    SampleLocationsEnable(sample_locations_enable: bool) => replace,
    ColorBlendAdvanced(color_blend_advanced: HashMap<u32, ColorBlendAdvanced>) => merge,
    ProvokingVertexMode(provoking_vertex_mode: ProvokingVertexMode) => replace,
    LineRasterizationMode(line_rasterization_mode: LineRasterizationMode) => replace,
    LineStippleEnable(line_stipple_enable: bool) => replace,
    DepthClipNegativeOneToOne(depth_clip_negative_one_to_one: bool) => replace,
    ViewportWScalingEnable(viewport_w_scaling_enable: bool) => replace,
    ViewportSwizzle(viewport_swizzle: HashMap<u32, ViewportSwizzle>) => merge,
    CoverageToColorEnable(coverage_to_color_enable: bool) => replace,
    CoverageToColorLocation(coverage_to_color_location: u32) => replace,
    CoverageModulationMode(coverage_modulation_mode: CoverageModulationMode) => replace,
    CoverageModulationTableEnable(coverage_modulation_table_enable: bool) => replace,
    CoverageModulationTable(coverage_modulation_table: Vec<f32>) => replace,
    ShadingRateImageEnable(shading_rate_image_enable: bool) => replace,
    RepresentativeFragmentTestEnable(representative_fragment_test_enable: bool) => replace,
    CoverageReductionMode(coverage_reduction_mode: CoverageReductionMode) => replace,
    /// The aspects that may be read from an attachment that is also written.
    AttachmentFeedbackLoopEnable(attachment_feedback_loop_enable: ImageAspects) => replace,
}

impl DynamicStateValue {
    /// Returns the indices that the value covers. Empty if the state is not indexed.
    fn indices(&self) -> SmallVec<[u32; 4]> {
        match self {
            Self::Viewport(values) => values.keys().copied().collect(),
            Self::Scissor(values) => values.keys().copied().collect(),
            Self::ViewportWScaling(values) => values.keys().copied().collect(),
            Self::DiscardRectangle(values) => values.keys().copied().collect(),
            Self::ViewportShadingRatePalette(values) => values.keys().copied().collect(),
            Self::ExclusiveScissorEnable(values) => values.keys().copied().collect(),
            Self::ExclusiveScissor(values) => values.keys().copied().collect(),
            Self::ColorBlendEnable(values) => values.keys().copied().collect(),
            Self::ColorBlendEquation(values) => values.keys().copied().collect(),
            Self::ColorWriteMask(values) => values.keys().copied().collect(),
            Self::ColorBlendAdvanced(values) => values.keys().copied().collect(),
            Self::ViewportSwizzle(values) => values.keys().copied().collect(),
            _ => SmallVec::new(),
        }
    }
}

/// Tracks the status and values of dynamic state in a recording session.
#[derive(Clone, Debug, Default)]
pub struct DynamicStateTracker {
    set_since_session: DynamicStateSet,
    set_since_bind: DynamicStateSet,
    indices_since_bind: HashMap<DynamicState, HashSet<u32>>,
    values: DynamicStateValues,
}

impl DynamicStateTracker {
    /// Returns a tracker in which nothing is set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the state of `value` was set, and stores the value.
    ///
    /// Values that are stored per index are merged with the existing ones.
    pub fn mark_set(&mut self, value: DynamicStateValue) {
        let state = value.dynamic_state();
        self.set_since_session.insert(state);
        self.set_since_bind.insert(state);

        if state.is_indexed() {
            self.indices_since_bind
                .entry(state)
                .or_default()
                .extend(value.indices());
        }

        self.values.store(value);
    }

    /// Clears the since-bind status of every state at `bind_point`, including the indices of
    /// indexed states.
    pub fn on_bind(&mut self, bind_point: PipelineBindPoint) {
        for state in DynamicState::ALL {
            if state.bind_point() == bind_point {
                self.set_since_bind.remove(state);
            }
        }

        self.indices_since_bind
            .retain(|state, _| state.bind_point() != bind_point);
    }

    /// Returns whether `state` was set within `scope`.
    #[inline]
    pub fn is_set(&self, state: DynamicState, scope: SetScope) -> bool {
        match scope {
            SetScope::Session => self.set_since_session.contains(state),
            SetScope::SinceBind => self.set_since_bind.contains(state),
        }
    }

    /// Returns whether `index` of the indexed `state` was set since the last bind.
    #[inline]
    pub fn is_index_set(&self, state: DynamicState, index: u32) -> bool {
        self.indices_since_bind
            .get(&state)
            .is_some_and(|indices| indices.contains(&index))
    }

    /// Returns the recorded value of `state`, or `None` if it was never set.
    #[inline]
    pub fn value_of(&self, state: DynamicState) -> Option<DynamicStateValue> {
        self.values.get(state)
    }

    /// Returns the recorded values.
    #[inline]
    pub fn values(&self) -> &DynamicStateValues {
        &self.values
    }

    /// Returns the states that were set since the last bind at their bind point.
    #[inline]
    pub fn set_since_bind(&self) -> &DynamicStateSet {
        &self.set_since_bind
    }

    /// Returns the states that were set during the session.
    #[inline]
    pub fn set_since_session(&self) -> &DynamicStateSet {
        &self.set_since_session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_set_sets_both_bits() {
        let mut tracker = DynamicStateTracker::new();
        assert!(!tracker.is_set(DynamicState::CullMode, SetScope::Session));
        assert!(tracker.value_of(DynamicState::CullMode).is_none());

        tracker.mark_set(DynamicStateValue::CullMode(CullMode::Back));
        assert!(tracker.is_set(DynamicState::CullMode, SetScope::Session));
        assert!(tracker.is_set(DynamicState::CullMode, SetScope::SinceBind));
        assert_eq!(
            tracker.value_of(DynamicState::CullMode),
            Some(DynamicStateValue::CullMode(CullMode::Back)),
        );
        assert_eq!(tracker.values().cull_mode, Some(CullMode::Back));
    }

    #[test]
    fn mark_set_is_idempotent() {
        let mut once = DynamicStateTracker::new();
        once.mark_set(DynamicStateValue::LineWidth(2.0));

        let mut twice = once.clone();
        twice.mark_set(DynamicStateValue::LineWidth(2.0));

        assert_eq!(once.set_since_session(), twice.set_since_session());
        assert_eq!(once.set_since_bind(), twice.set_since_bind());
        assert_eq!(once.values(), twice.values());
    }

    #[test]
    fn bind_clears_only_since_bind() {
        let mut tracker = DynamicStateTracker::new();
        tracker.mark_set(DynamicStateValue::CullMode(CullMode::Front));
        tracker.mark_set(DynamicStateValue::RayTracingPipelineStackSize(64));

        tracker.on_bind(PipelineBindPoint::Graphics);
        assert!(tracker.is_set(DynamicState::CullMode, SetScope::Session));
        assert!(!tracker.is_set(DynamicState::CullMode, SetScope::SinceBind));
        assert!(tracker.is_set(DynamicState::RayTracingPipelineStackSize, SetScope::SinceBind));
        assert_eq!(tracker.values().cull_mode, Some(CullMode::Front));

        tracker.on_bind(PipelineBindPoint::RayTracing);
        assert!(!tracker.is_set(DynamicState::RayTracingPipelineStackSize, SetScope::SinceBind));
        assert!(tracker.set_since_bind().is_subset(tracker.set_since_session()));
    }

    #[test]
    fn per_index_values_merge() {
        let mut tracker = DynamicStateTracker::new();
        let viewports = |indices: &[u32]| {
            indices
                .iter()
                .map(|&index| (index, Viewport::default()))
                .collect::<HashMap<_, _>>()
        };

        tracker.mark_set(DynamicStateValue::Viewport(viewports(&[0])));
        tracker.mark_set(DynamicStateValue::Viewport(viewports(&[2, 3])));

        let stored = tracker.values().viewport.as_ref().unwrap();
        let mut keys: Vec<_> = stored.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, [0, 2, 3]);
    }

    #[test]
    fn bind_forgets_indices() {
        let mut tracker = DynamicStateTracker::new();
        let viewport = |index: u32| {
            DynamicStateValue::Viewport([(index, Viewport::default())].into_iter().collect())
        };

        tracker.mark_set(viewport(1));
        assert!(tracker.is_index_set(DynamicState::Viewport, 1));

        tracker.on_bind(PipelineBindPoint::Graphics);
        tracker.mark_set(viewport(0));
        assert!(tracker.is_index_set(DynamicState::Viewport, 0));
        assert!(!tracker.is_index_set(DynamicState::Viewport, 1));
        assert!(tracker.values().viewport.as_ref().unwrap().contains_key(&1));
    }

    #[test]
    fn stencil_faces_merge() {
        let mut tracker = DynamicStateTracker::new();
        tracker.mark_set(DynamicStateValue::StencilReference(StencilFaceValues {
            front: Some(1),
            back: None,
        }));
        assert_eq!(tracker.values().stencil_reference.unwrap().both(), None);

        tracker.mark_set(DynamicStateValue::StencilReference(StencilFaceValues {
            front: None,
            back: Some(2),
        }));
        assert_eq!(tracker.values().stencil_reference.unwrap().both(), Some([1, 2]));
    }

    #[test]
    fn every_state_round_trips_through_its_value() {
        let value = DynamicStateValue::AttachmentFeedbackLoopEnable(ImageAspects::COLOR);
        assert_eq!(value.dynamic_state(), DynamicState::AttachmentFeedbackLoopEnable);

        let mut tracker = DynamicStateTracker::new();
        tracker.mark_set(value.clone());
        assert_eq!(
            tracker.value_of(DynamicState::AttachmentFeedbackLoopEnable),
            Some(value),
        );
    }
}
