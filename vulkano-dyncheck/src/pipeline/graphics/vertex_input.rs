// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Configures how data from vertex buffers is read into vertex shader input locations.
//!
//! The vertex input stage is the stage where data is read from a buffer and fed into the vertex
//! shader. Each attribute is read from a binding, at an offset, with a format. The same
//! description is used by `vkCmdSetVertexInputEXT` when `DynamicState::VertexInput` is dynamic.

use crate::{
    device::DeviceCapabilities,
    format::{Format, FormatFeatures},
    ValidationError,
};
use foldhash::HashMap;

/// Defines how the vertex input stage interprets the vertex buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VertexInputState {
    /// A description of the vertex buffers that the vertex input stage will read from.
    pub bindings: HashMap<u32, VertexInputBindingDescription>,

    /// Describes, for each shader input location, the mapping between elements in a vertex
    /// buffer and the components of that location in the shader.
    pub attributes: HashMap<u32, VertexInputAttributeDescription>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub _ne: crate::NonExhaustive,
}

impl Default for VertexInputState {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl VertexInputState {
    /// Constructs a new `VertexInputState` with no bindings or attributes.
    #[inline]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::default(),
            attributes: HashMap::default(),
            _ne: crate::NonExhaustive(()),
        }
    }

    /// Adds a single binding.
    #[inline]
    pub fn binding(mut self, binding: u32, description: VertexInputBindingDescription) -> Self {
        self.bindings.insert(binding, description);
        self
    }

    /// Adds a single attribute.
    #[inline]
    pub fn attribute(
        mut self,
        location: u32,
        description: VertexInputAttributeDescription,
    ) -> Self {
        self.attributes.insert(location, description);
        self
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let Self {
            bindings,
            attributes,
            _ne: _,
        } = self;

        for (&location, attribute_desc) in attributes {
            let &VertexInputAttributeDescription {
                binding,
                format,
                offset: _,
            } = attribute_desc;

            if !bindings.contains_key(&binding) {
                return Err(Box::new(ValidationError {
                    problem: format!(
                        "`attributes[{}].binding` is {}, which is not a key of `bindings`",
                        location, binding,
                    )
                    .into(),
                    vuids: &[
                        "VUID-VkPipelineVertexInputStateCreateInfo-binding-00615",
                        "VUID-vkCmdSetVertexInputEXT-binding-04793",
                    ],
                    ..Default::default()
                }));
            }

            if !device
                .format_features(format)
                .intersects(FormatFeatures::VERTEX_BUFFER)
            {
                return Err(Box::new(ValidationError {
                    context: format!("attributes[{}].format", location).into(),
                    problem: "the format features do not include `FormatFeatures::VERTEX_BUFFER`"
                        .into(),
                    vuids: &[
                        "VUID-VkVertexInputAttributeDescription-format-00623",
                        "VUID-VkVertexInputAttributeDescription2EXT-format-04805",
                    ],
                    ..Default::default()
                }));
            }
        }

        Ok(())
    }
}

/// Describes a single vertex buffer binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexInputBindingDescription {
    /// The number of bytes from the start of one element in the vertex buffer to the start of
    /// the next element.
    pub stride: u32,

    /// How often the vertex input should advance to the next element.
    pub input_rate: VertexInputRate,
}

/// Describes a single vertex buffer attribute mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexInputAttributeDescription {
    /// The vertex buffer binding number that this attribute should take its data from.
    pub binding: u32,

    /// The size and type of the vertex data.
    pub format: Format,

    /// Number of bytes between the start of a vertex buffer element and the location of
    /// attribute.
    pub offset: u32,
}

/// How the vertex source should be unrolled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexInputRate {
    /// Each element of the source corresponds to a vertex.
    Vertex,

    /// Each element of the source corresponds to `divisor` instances.
    Instance { divisor: u32 },
}

impl From<VertexInputRate> for ash::vk::VertexInputRate {
    #[inline]
    fn from(val: VertexInputRate) -> Self {
        match val {
            VertexInputRate::Vertex => ash::vk::VertexInputRate::VERTEX,
            VertexInputRate::Instance { .. } => ash::vk::VertexInputRate::INSTANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_needs_binding_and_format() {
        let mut device = DeviceCapabilities::default();
        let attribute = VertexInputAttributeDescription {
            binding: 0,
            format: Format::R32G32_SFLOAT,
            offset: 0,
        };

        let state = VertexInputState::new().attribute(0, attribute);
        assert!(state.validate(&device).is_err());

        let state = state.binding(
            0,
            VertexInputBindingDescription {
                stride: 8,
                input_rate: VertexInputRate::Vertex,
            },
        );
        let err = state.validate(&device).unwrap_err();
        assert_eq!(err.context, "attributes[0].format");

        device
            .format_features
            .insert(Format::R32G32_SFLOAT, FormatFeatures::VERTEX_BUFFER);
        assert!(state.validate(&device).is_ok());
    }
}
