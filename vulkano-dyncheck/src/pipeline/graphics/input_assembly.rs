// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Configures how input vertices are assembled into primitives.

use crate::{device::DeviceCapabilities, macros::vulkan_enum, ValidationError};

/// The state in a graphics pipeline describing how the input assembly stage should behave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputAssemblyState {
    /// The type of primitives.
    ///
    /// If `DynamicState::PrimitiveTopology` is dynamic, only the class of this topology is
    /// fixed: the dynamic topology must belong to the same [`PrimitiveTopologyClass`], unless
    /// the `dynamic_primitive_topology_unrestricted` property is `true`.
    ///
    /// The default value is [`PrimitiveTopology::TriangleList`].
    pub topology: PrimitiveTopology,

    /// If true, then when drawing with an index buffer, the special index value consisting of the
    /// maximum unsigned value (`0xff`, `0xffff` or `0xffffffff`) will tell the GPU that it is the
    /// end of the current primitive. A new primitive will restart at the next index.
    ///
    /// "List" topologies require a feature to be enabled on the device when combined with
    /// primitive restart.
    ///
    /// The default value is `false`.
    pub primitive_restart_enable: bool,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: crate::NonExhaustive,
}

impl InputAssemblyState {
    /// Creates an `InputAssemblyState` with the `TriangleList` topology and primitive restart
    /// disabled.
    #[inline]
    pub const fn new() -> Self {
        Self {
            topology: PrimitiveTopology::TriangleList,
            primitive_restart_enable: false,
            _ne: crate::NonExhaustive(()),
        }
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let &Self {
            topology,
            primitive_restart_enable: _,
            _ne: _,
        } = self;

        topology.validate_device(device).map_err(|err| {
            err.add_context("topology").set_vuids(&[
                "VUID-VkPipelineInputAssemblyStateCreateInfo-topology-parameter",
            ])
        })?;

        Ok(())
    }
}

impl Default for InputAssemblyState {
    /// Returns [`InputAssemblyState::new()`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

vulkan_enum! {
    #[non_exhaustive]

    /// Describes how vertices must be grouped together to form primitives.
    ///
    /// When enabling primitive restart, "list" topologies require a feature to be enabled on the
    /// device:
    /// - The `PatchList` topology requires the
    ///   [`primitive_topology_patch_list_restart`](crate::device::DeviceFeatures::primitive_topology_patch_list_restart)
    ///   feature.
    /// - All other "list" topologies require the
    ///   [`primitive_topology_list_restart`](crate::device::DeviceFeatures::primitive_topology_list_restart)
    ///   feature.
    PrimitiveTopology impl {
        /// Returns the topology class of this topology.
        #[inline]
        pub fn class(self) -> PrimitiveTopologyClass {
            match self {
                Self::PointList => PrimitiveTopologyClass::Point,
                Self::LineList
                | Self::LineStrip
                | Self::LineListWithAdjacency
                | Self::LineStripWithAdjacency => PrimitiveTopologyClass::Line,
                Self::TriangleList
                | Self::TriangleStrip
                | Self::TriangleFan
                | Self::TriangleListWithAdjacency
                | Self::TriangleStripWithAdjacency => PrimitiveTopologyClass::Triangle,
                Self::PatchList => PrimitiveTopologyClass::Patch,
            }
        }

        /// Returns whether this is one of the "list" topologies, which restart after every
        /// primitive anyway.
        #[inline]
        pub fn is_list(self) -> bool {
            matches!(
                self,
                Self::PointList
                    | Self::LineList
                    | Self::TriangleList
                    | Self::LineListWithAdjacency
                    | Self::TriangleListWithAdjacency
                    | Self::PatchList
            )
        }
    }
    = PrimitiveTopology(i32);

    /// A series of separate point primitives.
    PointList = POINT_LIST,

    /// A series of separate line primitives.
    LineList = LINE_LIST,

    /// A series of consecutive line primitives, with consecutive lines sharing a vertex.
    LineStrip = LINE_STRIP,

    /// A series of separate triangle primitives.
    TriangleList = TRIANGLE_LIST,

    /// A series of consecutive triangle primitives, with consecutive triangles sharing an edge
    /// (two vertices).
    TriangleStrip = TRIANGLE_STRIP,

    /// A series of consecutive triangle primitives, with all triangles sharing a common vertex
    /// (the first).
    TriangleFan = TRIANGLE_FAN,

    /// As `LineList, but with adjacency, used in combination with geometry shaders. Requires the
    /// [`geometry_shader`](crate::device::DeviceFeatures::geometry_shader) feature.
    LineListWithAdjacency = LINE_LIST_WITH_ADJACENCY
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(geometry_shader)]),
    ]),

    /// As `LineStrip`, but with adjacency, used in combination with geometry shaders. Requires the
    /// [`geometry_shader`](crate::device::DeviceFeatures::geometry_shader) feature.
    LineStripWithAdjacency = LINE_STRIP_WITH_ADJACENCY
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(geometry_shader)]),
    ]),

    /// As `TriangleList`, but with adjacency, used in combination with geometry shaders. Requires
    /// the [`geometry_shader`](crate::device::DeviceFeatures::geometry_shader) feature.
    TriangleListWithAdjacency = TRIANGLE_LIST_WITH_ADJACENCY
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(geometry_shader)]),
    ]),

    /// As `TriangleStrip`, but with adjacency, used in combination with geometry shaders. Requires
    /// the [`geometry_shader`](crate::device::DeviceFeatures::geometry_shader) feature.
    TriangleStripWithAdjacency = TRIANGLE_STRIP_WITH_ADJACENCY
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(geometry_shader)]),
    ]),

    /// Separate patch primitives, used in combination with tessellation shaders. Requires the
    /// [`tessellation_shader`](crate::device::DeviceFeatures::tessellation_shader) feature.
    PatchList = PATCH_LIST
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(tessellation_shader)]),
    ]),
}

impl Default for PrimitiveTopology {
    #[inline]
    fn default() -> Self {
        PrimitiveTopology::TriangleList
    }
}

/// Describes the shape of a primitive topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveTopologyClass {
    Point,
    Line,
    Triangle,
    Patch,
}

impl PrimitiveTopologyClass {
    /// Returns a representative example of this topology class.
    pub fn example(self) -> PrimitiveTopology {
        match self {
            Self::Point => PrimitiveTopology::PointList,
            Self::Line => PrimitiveTopology::LineList,
            Self::Triangle => PrimitiveTopology::TriangleList,
            Self::Patch => PrimitiveTopology::PatchList,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes() {
        const ALL: [PrimitiveTopology; 11] = [
            PrimitiveTopology::PointList,
            PrimitiveTopology::LineList,
            PrimitiveTopology::LineStrip,
            PrimitiveTopology::TriangleList,
            PrimitiveTopology::TriangleStrip,
            PrimitiveTopology::TriangleFan,
            PrimitiveTopology::LineListWithAdjacency,
            PrimitiveTopology::LineStripWithAdjacency,
            PrimitiveTopology::TriangleListWithAdjacency,
            PrimitiveTopology::TriangleStripWithAdjacency,
            PrimitiveTopology::PatchList,
        ];

        assert_eq!(ALL.len(), PrimitiveTopology::COUNT);

        // Same-class membership must be symmetric, and each class contains its example.
        for a in ALL {
            assert_eq!(a.class().example().class(), a.class());

            for b in ALL {
                assert_eq!(a.class() == b.class(), b.class() == a.class());
            }
        }

        assert_eq!(
            ALL.iter()
                .filter(|t| t.class() == PrimitiveTopologyClass::Line)
                .count(),
            4,
        );
    }

    #[test]
    fn list_topologies() {
        assert!(PrimitiveTopology::TriangleList.is_list());
        assert!(PrimitiveTopology::PatchList.is_list());
        assert!(!PrimitiveTopology::TriangleStrip.is_list());
        assert!(!PrimitiveTopology::LineStripWithAdjacency.is_list());
    }

    #[test]
    fn adjacency_requires_geometry_shader() {
        let device = DeviceCapabilities::default();
        let err = PrimitiveTopology::LineListWithAdjacency
            .validate_device(&device)
            .unwrap_err();
        assert!(!err.requires_one_of.is_empty());
        assert!(PrimitiveTopology::TriangleFan.validate_device(&device).is_ok());
    }
}
