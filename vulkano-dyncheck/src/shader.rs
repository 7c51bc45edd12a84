// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Shader reflection and shader objects.
//!
//! Validation does not parse SPIR-V. The facts it needs about a shader entry point, such as the
//! locations and types of its inputs and the execution modes it declares, are supplied by the
//! caller as an [`EntryPointInfo`]. This is the same information that vulkano extracts from the
//! module when it is loaded.
//!
//! A [`ShaderObject`] is a single stage that can be bound on its own, without a pipeline. Shader
//! objects leave almost all state dynamic.

use crate::{
    device::DeviceCapabilities,
    diagnostic::ObjectHandle,
    format::NumericType,
    macros::{impl_id_counter, vulkan_bitflags_enum},
    pipeline::graphics::input_assembly::PrimitiveTopologyClass,
    Requires, RequiresAllOf, RequiresOneOf, ValidationError,
};
use std::{num::NonZero, sync::Arc};

vulkan_bitflags_enum! {
    #[non_exhaustive]

    /// A set of [`ShaderStage`] values.
    ShaderStages impl {
        /// Creates a `ShaderStages` struct with all graphics stages set to `true`.
        #[inline]
        pub const fn all_graphics() -> ShaderStages {
            ShaderStages::VERTEX
                .union(ShaderStages::TESSELLATION_CONTROL)
                .union(ShaderStages::TESSELLATION_EVALUATION)
                .union(ShaderStages::GEOMETRY)
                .union(ShaderStages::FRAGMENT)
                .union(ShaderStages::TASK)
                .union(ShaderStages::MESH)
        }

        /// Returns the stages that can be the last stage before rasterization.
        #[inline]
        pub const fn pre_rasterization() -> ShaderStages {
            ShaderStages::VERTEX
                .union(ShaderStages::TESSELLATION_EVALUATION)
                .union(ShaderStages::GEOMETRY)
                .union(ShaderStages::MESH)
        }
    },

    /// A shader stage within a pipeline.
    ShaderStage impl {
        /// Returns whether the stage is part of the graphics bind point.
        #[inline]
        pub fn is_graphics(self) -> bool {
            ShaderStages::all_graphics().contains_enum(self)
        }
    },

    = ShaderStageFlags(u32);

    /// The vertex shader.
    VERTEX, Vertex = VERTEX,

    /// The tessellation control shader.
    TESSELLATION_CONTROL, TessellationControl = TESSELLATION_CONTROL
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(tessellation_shader)]),
    ]),

    /// The tessellation evaluation shader.
    TESSELLATION_EVALUATION, TessellationEvaluation = TESSELLATION_EVALUATION
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(tessellation_shader)]),
    ]),

    /// The geometry shader.
    GEOMETRY, Geometry = GEOMETRY
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(geometry_shader)]),
    ]),

    /// The fragment shader.
    FRAGMENT, Fragment = FRAGMENT,

    /// The compute shader.
    COMPUTE, Compute = COMPUTE,

    /// The task shader.
    TASK, Task = TASK_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(task_shader)]),
    ]),

    /// The mesh shader.
    MESH, Mesh = MESH_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(mesh_shader)]),
    ]),
}

/// One variable of a shader's input or output interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShaderInterfaceEntry {
    /// The location of the variable.
    pub location: u32,

    /// The first component of the location that the variable occupies.
    pub component: u32,

    /// The numeric type of the components.
    pub numeric_type: NumericType,

    /// The width in bits of each component, 32 or 64.
    pub bit_width: u32,

    /// The number of components, 1 to 4.
    pub component_count: u32,
}

impl ShaderInterfaceEntry {
    /// Returns a 32-bit entry with `component_count` components, starting at component 0.
    #[inline]
    pub const fn new(location: u32, numeric_type: NumericType, component_count: u32) -> Self {
        Self {
            location,
            component: 0,
            numeric_type,
            bit_width: 32,
            component_count,
        }
    }

    /// Returns whether the components are 64 bits wide.
    #[inline]
    pub fn is_64bit(&self) -> bool {
        self.bit_width == 64
    }

    /// Returns whether the variable covers the fourth component of its location.
    #[inline]
    pub fn covers_alpha(&self) -> bool {
        self.component + self.component_count > 3
    }
}

/// The reflection data of a shader entry point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryPointInfo {
    /// The stage that the entry point is for.
    pub stage: ShaderStage,

    /// The variables that the entry point reads from the previous stage or the vertex input.
    pub input_interface: Vec<ShaderInterfaceEntry>,

    /// The variables that the entry point writes to the next stage or the color attachments.
    pub output_interface: Vec<ShaderInterfaceEntry>,

    /// Whether the entry point calls `InterpolateAtSample`.
    pub uses_interpolate_at_sample: bool,

    /// For tessellation evaluation, geometry and mesh shaders, the class of the primitives that
    /// are produced, as declared by the execution mode.
    pub output_primitive: Option<PrimitiveTopologyClass>,

    /// For geometry shaders, whether the `GeometryStreams` capability is used.
    pub uses_geometry_streams: bool,

    /// Whether the entry point writes the `PrimitiveShadingRateKHR` built-in.
    pub writes_primitive_shading_rate: bool,

    /// For fragment shaders, whether the `EarlyFragmentTests` execution mode is declared.
    pub early_fragment_tests: bool,

    /// For fragment shaders, whether depth is read through a tile image.
    pub reads_tile_image_depth: bool,

    /// For fragment shaders, whether stencil is read through a tile image.
    pub reads_tile_image_stencil: bool,

    #[cfg_attr(feature = "serde", serde(skip, default = "crate::NonExhaustive::new"))]
    pub _ne: crate::NonExhaustive,
}

impl EntryPointInfo {
    /// Returns an entry point for `stage` with empty interfaces and no execution modes.
    #[inline]
    pub fn new(stage: ShaderStage) -> Self {
        Self {
            stage,
            input_interface: Vec::new(),
            output_interface: Vec::new(),
            uses_interpolate_at_sample: false,
            output_primitive: None,
            uses_geometry_streams: false,
            writes_primitive_shading_rate: false,
            early_fragment_tests: false,
            reads_tile_image_depth: false,
            reads_tile_image_stencil: false,
            _ne: crate::NonExhaustive(()),
        }
    }

    /// Returns the input variable at `location`, if there is one.
    #[inline]
    pub fn input(&self, location: u32) -> Option<&ShaderInterfaceEntry> {
        self.input_interface
            .iter()
            .find(|entry| entry.location == location)
    }

    /// Returns whether an output variable writes the alpha component of location 0.
    #[inline]
    pub fn writes_location_0_alpha(&self) -> bool {
        self.output_interface
            .iter()
            .any(|entry| entry.location == 0 && entry.covers_alpha())
    }

    /// Returns whether the entry point produces line primitives.
    #[inline]
    pub fn outputs_lines(&self) -> bool {
        self.output_primitive == Some(PrimitiveTopologyClass::Line)
    }
}

/// A single shader stage that is bound without a pipeline.
#[derive(Debug)]
pub struct ShaderObject {
    id: NonZero<u64>,
    info: EntryPointInfo,
}

impl ShaderObject {
    /// Creates a new `ShaderObject`.
    ///
    /// The [`shader_object`](crate::device::DeviceFeatures::shader_object) feature must be
    /// enabled on the device.
    pub fn new(
        device: &DeviceCapabilities,
        info: EntryPointInfo,
    ) -> Result<Arc<ShaderObject>, Box<ValidationError>> {
        Self::validate_new(device, &info)?;

        Ok(Arc::new(ShaderObject {
            id: Self::next_id(),
            info,
        }))
    }

    fn validate_new(
        device: &DeviceCapabilities,
        info: &EntryPointInfo,
    ) -> Result<(), Box<ValidationError>> {
        if !device.enabled_features.shader_object {
            return Err(Box::new(ValidationError {
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "shader_object",
                )])]),
                vuids: &["VUID-vkCreateShadersEXT-None-08400"],
                ..Default::default()
            }));
        }

        info.stage.validate_device(device).map_err(|err| {
            err.add_context("info.stage")
                .set_vuids(&["VUID-VkShaderCreateInfoEXT-stage-parameter"])
        })?;

        if !info.stage.is_graphics() {
            return Err(Box::new(ValidationError {
                context: "info.stage".into(),
                problem: "is not a graphics stage".into(),
                ..Default::default()
            }));
        }

        Ok(())
    }

    /// Returns the reflection data of the shader.
    #[inline]
    pub fn info(&self) -> &EntryPointInfo {
        &self.info
    }

    /// Returns the stage of the shader.
    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.info.stage
    }

    /// Returns the handle that diagnostics use to refer to the shader.
    #[inline]
    pub fn object_handle(&self) -> ObjectHandle {
        ObjectHandle::new(ash::vk::ObjectType::SHADER_EXT, self.id.get())
    }
}

impl_id_counter!(ShaderObject);

const GRAPHICS_STAGES: [ShaderStage; 7] = [
    ShaderStage::Vertex,
    ShaderStage::TessellationControl,
    ShaderStage::TessellationEvaluation,
    ShaderStage::Geometry,
    ShaderStage::Fragment,
    ShaderStage::Task,
    ShaderStage::Mesh,
];

/// The shader objects bound to the graphics stages.
#[derive(Clone, Debug, Default)]
pub struct ShaderObjectSet {
    slots: [Option<Arc<ShaderObject>>; 7],
}

impl ShaderObjectSet {
    /// Returns an empty set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(stage: ShaderStage) -> Option<usize> {
        GRAPHICS_STAGES.iter().position(|&s| s == stage)
    }

    /// Returns the shader bound to `stage`.
    #[inline]
    pub fn get(&self, stage: ShaderStage) -> Option<&Arc<ShaderObject>> {
        Self::slot(stage).and_then(|index| self.slots[index].as_ref())
    }

    /// Returns the reflection data of the shader bound to `stage`.
    #[inline]
    pub fn info(&self, stage: ShaderStage) -> Option<&EntryPointInfo> {
        self.get(stage).map(|shader| shader.info())
    }

    /// Returns whether a shader is bound to `stage`.
    #[inline]
    pub fn is_bound(&self, stage: ShaderStage) -> bool {
        self.get(stage).is_some()
    }

    /// Binds `shader` to `stage`, or unbinds the stage if `shader` is `None`.
    ///
    /// Stages that are not graphics stages are ignored.
    pub(crate) fn bind(&mut self, stage: ShaderStage, shader: Option<Arc<ShaderObject>>) {
        if let Some(index) = Self::slot(stage) {
            self.slots[index] = shader;
        }
    }

    /// Returns the set of stages that have a shader bound.
    pub fn bound_stages(&self) -> ShaderStages {
        GRAPHICS_STAGES
            .into_iter()
            .zip(&self.slots)
            .filter(|(_, slot)| slot.is_some())
            .map(|(stage, _)| stage)
            .collect()
    }

    /// Returns whether no stage has a shader bound.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Returns an iterator over the bound shaders.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ShaderObject>> {
        self.slots.iter().flatten()
    }

    /// Returns the last bound stage before rasterization, if any.
    pub fn last_pre_rasterization_stage(&self) -> Option<&EntryPointInfo> {
        [
            ShaderStage::Mesh,
            ShaderStage::Geometry,
            ShaderStage::TessellationEvaluation,
            ShaderStage::Vertex,
        ]
        .into_iter()
        .find_map(|stage| self.info(stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DeviceCapabilities {
        let mut device = DeviceCapabilities::default();
        device.enabled_features.shader_object = true;
        device
    }

    #[test]
    fn shader_object_requires_feature() {
        let err = ShaderObject::new(
            &DeviceCapabilities::default(),
            EntryPointInfo::new(ShaderStage::Vertex),
        )
        .unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCreateShadersEXT-None-08400"]);

        assert!(ShaderObject::new(&device(), EntryPointInfo::new(ShaderStage::Compute)).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn entry_point_info_from_json() {
        let mut info = EntryPointInfo::new(ShaderStage::Fragment);
        info.output_interface
            .push(ShaderInterfaceEntry::new(0, NumericType::Float, 4));
        info.early_fragment_tests = true;

        let json = serde_json::to_string(&info).unwrap();
        let parsed: EntryPointInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, info);
    }

    #[test]
    fn ids_are_unique() {
        let a = ShaderObject::new(&device(), EntryPointInfo::new(ShaderStage::Vertex)).unwrap();
        let b = ShaderObject::new(&device(), EntryPointInfo::new(ShaderStage::Vertex)).unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(*a, *b);
    }

    #[test]
    fn object_set() {
        let vertex = ShaderObject::new(&device(), EntryPointInfo::new(ShaderStage::Vertex)).unwrap();
        let fragment =
            ShaderObject::new(&device(), EntryPointInfo::new(ShaderStage::Fragment)).unwrap();

        let mut set = ShaderObjectSet::new();
        assert!(set.is_empty());

        set.bind(ShaderStage::Vertex, Some(vertex));
        set.bind(ShaderStage::Fragment, Some(fragment));
        assert_eq!(
            set.bound_stages(),
            ShaderStages::VERTEX | ShaderStages::FRAGMENT,
        );
        assert_eq!(
            set.last_pre_rasterization_stage().map(|info| info.stage),
            Some(ShaderStage::Vertex),
        );

        set.bind(ShaderStage::Vertex, None);
        assert!(!set.is_bound(ShaderStage::Vertex));
        assert_eq!(set.iter().count(), 1);
    }

    #[test]
    fn location_0_alpha() {
        let mut info = EntryPointInfo::new(ShaderStage::Fragment);
        info.output_interface
            .push(ShaderInterfaceEntry::new(0, NumericType::Float, 3));
        assert!(!info.writes_location_0_alpha());

        info.output_interface[0].component_count = 4;
        assert!(info.writes_location_0_alpha());
    }
}
