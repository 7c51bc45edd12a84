// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Recording of commands that set dynamic state.
//!
//! A [`CommandRecorder`] stands for one command buffer being recorded. It does not produce any
//! Vulkan commands; it keeps track of what the commands recorded so far have set, so that the
//! rules can be checked when a draw or trace command is recorded.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use vulkano_dyncheck::{
//!     command_buffer::CommandRecorder,
//!     device::{DeviceCapabilities, DeviceFeatures},
//!     diagnostic::DiagnosticCollector,
//!     pipeline::{
//!         graphics::{
//!             rasterization::{CullMode, RasterizationState},
//!             GraphicsPipeline, GraphicsPipelineCreateInfo,
//!         },
//!         DynamicState, PipelineBindPoint,
//!     },
//!     validation::VUIDType,
//! };
//!
//! let device = Arc::new(DeviceCapabilities {
//!     enabled_features: DeviceFeatures {
//!         extended_dynamic_state: true,
//!         ..DeviceFeatures::empty()
//!     },
//!     ..Default::default()
//! });
//!
//! let pipeline = GraphicsPipeline::new(
//!     &device,
//!     GraphicsPipelineCreateInfo {
//!         rasterization_state: Some(RasterizationState::default()),
//!         dynamic_state: [DynamicState::CullMode].into(),
//!         ..Default::default()
//!     },
//! )
//! .unwrap();
//!
//! let collector = Arc::new(DiagnosticCollector::new());
//! let mut recorder = CommandRecorder::new(device, collector.clone());
//! recorder.bind_pipeline_graphics(pipeline).unwrap();
//!
//! // The cull mode was never set.
//! assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
//! assert!(collector.contains("VUID-vkCmdDraw-None-07840"));
//!
//! recorder.set_cull_mode(CullMode::Back).unwrap();
//! collector.clear();
//! assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
//! ```

pub use self::{
    recorder::CommandRecorder,
    state::{
        DynamicStateTracker, DynamicStateValue, DynamicStateValues, SampleMask, SetScope,
        StencilFaceValues,
    },
};
use crate::{format::Format, image::SampleCount};

mod commands;
mod recorder;
mod state;

/// The attachments of the render pass instance that draws are recorded in.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderingInfo {
    /// The attachments, in any order. Color attachments are numbered in the order in which they
    /// appear among the attachments whose role is [`AttachmentRole::Color`].
    ///
    /// The default value is empty.
    pub attachments: Vec<AttachmentInfo>,

    /// If multisampled rendering to single-sampled attachments is enabled, the sample count
    /// that rasterization uses.
    ///
    /// The default value is `None`.
    pub multisampled_render_to_single_sampled: Option<SampleCount>,

    pub _ne: crate::NonExhaustive,
}

impl Default for RenderingInfo {
    #[inline]
    fn default() -> Self {
        Self {
            attachments: Vec::new(),
            multisampled_render_to_single_sampled: None,
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl RenderingInfo {
    /// Returns the color attachments, with their color attachment index.
    pub fn color_attachments(&self) -> impl Iterator<Item = (u32, &AttachmentInfo)> {
        self.attachments
            .iter()
            .filter(|attachment| attachment.role == AttachmentRole::Color)
            .enumerate()
            .map(|(index, attachment)| (index as u32, attachment))
    }

    /// Returns the number of color attachments.
    #[inline]
    pub fn color_attachment_count(&self) -> u32 {
        self.color_attachments().count() as u32
    }

    /// Returns the depth/stencil attachment, if there is one.
    #[inline]
    pub fn depth_stencil_attachment(&self) -> Option<&AttachmentInfo> {
        self.attachments
            .iter()
            .find(|attachment| attachment.role == AttachmentRole::DepthStencil)
    }

    /// Returns whether rasterization writes to at least one attachment.
    #[inline]
    pub fn has_attachments(&self) -> bool {
        self.attachments.iter().any(|attachment| {
            matches!(
                attachment.role,
                AttachmentRole::Color | AttachmentRole::DepthStencil
            )
        })
    }
}

/// One attachment of a render pass instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub format: Format,
    pub samples: SampleCount,
    pub role: AttachmentRole,

    /// Whether the image was created with the `SAMPLE_LOCATIONS_COMPATIBLE_DEPTH` flag.
    ///
    /// Only meaningful for depth/stencil attachments.
    pub sample_locations_compatible: bool,
}

impl AttachmentInfo {
    /// Returns a single-sampled attachment with the given format and role.
    #[inline]
    pub fn new(format: Format, role: AttachmentRole) -> Self {
        Self {
            format,
            samples: SampleCount::Sample1,
            role,
            sample_locations_compatible: false,
        }
    }

    /// Returns a color attachment with the given format and sample count.
    #[inline]
    pub fn color(format: Format, samples: SampleCount) -> Self {
        Self {
            samples,
            ..Self::new(format, AttachmentRole::Color)
        }
    }

    /// Returns a depth/stencil attachment with the given format and sample count.
    #[inline]
    pub fn depth_stencil(format: Format, samples: SampleCount) -> Self {
        Self {
            samples,
            ..Self::new(format, AttachmentRole::DepthStencil)
        }
    }
}

/// How an attachment is used by the render pass instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachmentRole {
    Color,
    DepthStencil,
    Input,
    Resolve,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_attachment_numbering() {
        let rendering_info = RenderingInfo {
            attachments: vec![
                AttachmentInfo::depth_stencil(Format::D32_SFLOAT, SampleCount::Sample4),
                AttachmentInfo::color(Format::R8G8B8A8_UNORM, SampleCount::Sample4),
                AttachmentInfo::new(Format::R8G8B8A8_UNORM, AttachmentRole::Resolve),
                AttachmentInfo::color(Format::R16G16B16A16_SFLOAT, SampleCount::Sample4),
            ],
            ..Default::default()
        };

        let colors: Vec<_> = rendering_info
            .color_attachments()
            .map(|(index, attachment)| (index, attachment.format))
            .collect();
        assert_eq!(
            colors,
            [
                (0, Format::R8G8B8A8_UNORM),
                (1, Format::R16G16B16A16_SFLOAT),
            ],
        );
        assert_eq!(rendering_info.color_attachment_count(), 2);
        assert_eq!(
            rendering_info.depth_stencil_attachment().map(|a| a.format),
            Some(Format::D32_SFLOAT),
        );
        assert!(rendering_info.has_attachments());
        assert!(!RenderingInfo::default().has_attachments());
    }
}
