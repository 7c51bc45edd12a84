// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use crate::{
    command_buffer::{AttachmentRole, CommandRecorder, RenderingInfo},
    Requires, RequiresAllOf, RequiresOneOf, ValidationError,
};

impl CommandRecorder {
    /// Begins a render pass instance with the given attachments.
    ///
    /// Draws recorded until [`end_rendering`](Self::end_rendering) are checked against these
    /// attachments.
    pub fn begin_rendering(
        &mut self,
        rendering_info: RenderingInfo,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_begin_rendering(&rendering_info)
            .map_err(|err| self.recording_error("vkCmdBeginRendering", err))?;

        Ok(self.begin_rendering_unchecked(rendering_info))
    }

    fn validate_begin_rendering(
        &self,
        rendering_info: &RenderingInfo,
    ) -> Result<(), Box<ValidationError>> {
        if self.rendering.is_some() {
            return Err(Box::new(ValidationError {
                problem: "a render pass instance is already active".into(),
                vuids: &["VUID-vkCmdBeginRendering-renderpass"],
                ..Default::default()
            }));
        }

        let color_attachment_count = rendering_info.color_attachment_count();

        if color_attachment_count > self.device.properties.max_color_attachments {
            return Err(Box::new(ValidationError {
                context: "rendering_info.attachments".into(),
                problem: "the number of color attachments exceeds the `max_color_attachments` \
                    limit"
                    .into(),
                vuids: &["VUID-VkRenderingInfo-colorAttachmentCount-06106"],
                ..Default::default()
            }));
        }

        if rendering_info
            .attachments
            .iter()
            .filter(|attachment| attachment.role == AttachmentRole::DepthStencil)
            .count()
            > 1
        {
            return Err(Box::new(ValidationError {
                context: "rendering_info.attachments".into(),
                problem: "contains more than one depth/stencil attachment".into(),
                ..Default::default()
            }));
        }

        Ok(())
    }

    pub fn begin_rendering_unchecked(&mut self, rendering_info: RenderingInfo) -> &mut Self {
        log::trace!(
            target: "vulkano_dyncheck",
            "begin rendering with {} attachments",
            rendering_info.attachments.len(),
        );

        self.rendering = Some(rendering_info);
        self
    }

    /// Ends the active render pass instance.
    pub fn end_rendering(&mut self) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_end_rendering()
            .map_err(|err| self.recording_error("vkCmdEndRendering", err))?;

        Ok(self.end_rendering_unchecked())
    }

    fn validate_end_rendering(&self) -> Result<(), Box<ValidationError>> {
        if self.rendering.is_none() {
            return Err(Box::new(ValidationError {
                problem: "no render pass instance is active".into(),
                vuids: &["VUID-vkCmdEndRendering-None-06161"],
                ..Default::default()
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn end_rendering_unchecked(&mut self) -> &mut Self {
        self.rendering = None;
        self
    }

    /// Declares that the command buffer is a secondary command buffer that inherits its viewport
    /// and scissor state from the primary command buffer, with `viewport_depth_count` viewports.
    ///
    /// Afterwards, the viewport and scissor state can no longer be set, and graphics pipelines
    /// that are bound must have it as dynamic state.
    pub fn set_inherited_viewport_depth_count(
        &mut self,
        viewport_depth_count: u32,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_set_inherited_viewport_depth_count(viewport_depth_count)
            .map_err(|err| self.recording_error("vkBeginCommandBuffer", err))?;

        Ok(self.set_inherited_viewport_depth_count_unchecked(viewport_depth_count))
    }

    fn validate_set_inherited_viewport_depth_count(
        &self,
        viewport_depth_count: u32,
    ) -> Result<(), Box<ValidationError>> {
        if !self.device.enabled_extensions.nv_inherited_viewport_scissor {
            return Err(Box::new(ValidationError {
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "nv_inherited_viewport_scissor",
                )])]),
                vuids: &["VUID-VkCommandBufferInheritanceViewportScissorInfoNV-viewportScissor2D-04782"],
                ..Default::default()
            }));
        }

        if viewport_depth_count == 0 {
            return Err(Box::new(ValidationError {
                context: "viewport_depth_count".into(),
                problem: "is 0".into(),
                vuids: &["VUID-VkCommandBufferInheritanceViewportScissorInfoNV-viewportScissor2D-04784"],
                ..Default::default()
            }));
        }

        if viewport_depth_count > 1 && !self.device.enabled_features.multi_viewport {
            return Err(Box::new(ValidationError {
                context: "viewport_depth_count".into(),
                problem: "is greater than 1".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multi_viewport",
                )])]),
                vuids: &["VUID-VkCommandBufferInheritanceViewportScissorInfoNV-viewportScissor2D-04783"],
            }));
        }

        Ok(())
    }

    #[inline]
    pub fn set_inherited_viewport_depth_count_unchecked(
        &mut self,
        viewport_depth_count: u32,
    ) -> &mut Self {
        self.inherited_viewport_depth_count = Some(viewport_depth_count);
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        command_buffer::{AttachmentInfo, CommandRecorder, RenderingInfo},
        device::DeviceCapabilities,
        diagnostic::DiagnosticCollector,
        format::Format,
        image::SampleCount,
        tests::full_device,
    };
    use std::sync::Arc;

    #[test]
    fn rendering_nests_once() {
        let mut recorder = CommandRecorder::new(
            Arc::new(full_device()),
            Arc::new(DiagnosticCollector::new()),
        );
        let rendering_info = RenderingInfo {
            attachments: vec![AttachmentInfo::color(
                Format::R8G8B8A8_UNORM,
                SampleCount::Sample1,
            )],
            ..Default::default()
        };

        recorder.begin_rendering(rendering_info.clone()).unwrap();
        assert_eq!(recorder.rendering(), Some(&rendering_info));

        let err = recorder.begin_rendering(rendering_info).unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdBeginRendering-renderpass"]);

        recorder.end_rendering().unwrap();
        assert!(recorder.rendering().is_none());
        let err = recorder.end_rendering().unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdEndRendering-None-06161"]);
    }

    #[test]
    fn inherited_viewports_require_extension() {
        let mut recorder = CommandRecorder::new(
            Arc::new(DeviceCapabilities::default()),
            Arc::new(DiagnosticCollector::new()),
        );
        assert!(recorder.set_inherited_viewport_depth_count(1).is_err());
        assert_eq!(recorder.inherited_viewport_depth_count(), None);
    }
}
