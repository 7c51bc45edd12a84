// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use crate::{
    command_buffer::CommandRecorder,
    pipeline::{
        graphics::GraphicsPipeline, ray_tracing::RayTracingPipeline, DynamicState,
        PipelineBindPoint,
    },
    shader::{ShaderObject, ShaderStage, ShaderStages},
    Requires, RequiresAllOf, RequiresOneOf, ValidationError,
};
use std::sync::Arc;

impl CommandRecorder {
    /// Binds a graphics pipeline for future draw calls.
    ///
    /// This unbinds any shader objects, and marks every graphics state as not set since the last
    /// bind. The values that were set are kept.
    pub fn bind_pipeline_graphics(
        &mut self,
        pipeline: Arc<GraphicsPipeline>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_bind_pipeline_graphics(&pipeline)
            .map_err(|err| self.recording_error("vkCmdBindPipeline", err))?;

        Ok(self.bind_pipeline_graphics_unchecked(pipeline))
    }

    fn validate_bind_pipeline_graphics(
        &self,
        pipeline: &GraphicsPipeline,
    ) -> Result<(), Box<ValidationError>> {
        if self.inherited_viewport_depth_count.is_some() {
            if !(pipeline.is_dynamic(DynamicState::Viewport)
                || pipeline.is_dynamic(DynamicState::ViewportWithCount))
                || !(pipeline.is_dynamic(DynamicState::Scissor)
                    || pipeline.is_dynamic(DynamicState::ScissorWithCount))
            {
                return Err(Box::new(ValidationError {
                    problem: "the command buffer inherits its viewport and scissor state, but \
                        the pipeline does not have dynamic viewports and scissors"
                        .into(),
                    vuids: &["VUID-vkCmdBindPipeline-commandBuffer-04808"],
                    ..Default::default()
                }));
            }

            if pipeline.discard_rectangle_state().is_some()
                && !pipeline.is_dynamic(DynamicState::DiscardRectangle)
            {
                return Err(Box::new(ValidationError {
                    problem: "the command buffer inherits its viewport and scissor state, but \
                        the pipeline has static discard rectangles"
                        .into(),
                    vuids: &["VUID-vkCmdBindPipeline-commandBuffer-04809"],
                    ..Default::default()
                }));
            }
        }

        Ok(())
    }

    pub fn bind_pipeline_graphics_unchecked(&mut self, pipeline: Arc<GraphicsPipeline>) -> &mut Self {
        log::debug!(
            target: "vulkano_dyncheck",
            "binding graphics pipeline {:?}, dynamic state: {}",
            pipeline.id(),
            pipeline.dynamic_state(),
        );

        self.shader_objects = Default::default();
        self.graphics_pipeline = Some(pipeline);
        self.tracker.on_bind(PipelineBindPoint::Graphics);
        self
    }

    /// Binds a ray tracing pipeline for future trace calls.
    pub fn bind_pipeline_ray_tracing(
        &mut self,
        pipeline: Arc<RayTracingPipeline>,
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_bind_pipeline_ray_tracing(&pipeline)
            .map_err(|err| self.recording_error("vkCmdBindPipeline", err))?;

        Ok(self.bind_pipeline_ray_tracing_unchecked(pipeline))
    }

    fn validate_bind_pipeline_ray_tracing(
        &self,
        _pipeline: &RayTracingPipeline,
    ) -> Result<(), Box<ValidationError>> {
        if !self.device.enabled_extensions.khr_ray_tracing_pipeline {
            return Err(Box::new(ValidationError {
                context: "pipeline_bind_point".into(),
                problem: "is `PipelineBindPoint::RayTracing`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "khr_ray_tracing_pipeline",
                )])]),
                vuids: &["VUID-vkCmdBindPipeline-pipelineBindPoint-parameter"],
            }));
        }

        Ok(())
    }

    pub fn bind_pipeline_ray_tracing_unchecked(
        &mut self,
        pipeline: Arc<RayTracingPipeline>,
    ) -> &mut Self {
        log::debug!(
            target: "vulkano_dyncheck",
            "binding ray tracing pipeline {:?}",
            pipeline.id(),
        );

        self.ray_tracing_pipeline = Some(pipeline);
        self.tracker.on_bind(PipelineBindPoint::RayTracing);
        self
    }

    /// Binds shader objects to graphics stages, or unbinds them, for future draw calls.
    ///
    /// `shaders[i]` is bound to `stages[i]`; a `None` unbinds the stage. Stages that are not in
    /// `stages` keep their shader. If any stage is given, the graphics pipeline is unbound.
    pub fn bind_shaders(
        &mut self,
        stages: &[ShaderStage],
        shaders: &[Option<Arc<ShaderObject>>],
    ) -> Result<&mut Self, Box<ValidationError>> {
        self.validate_bind_shaders(stages, shaders)
            .map_err(|err| self.recording_error("vkCmdBindShadersEXT", err))?;

        Ok(self.bind_shaders_unchecked(stages, shaders))
    }

    fn validate_bind_shaders(
        &self,
        stages: &[ShaderStage],
        shaders: &[Option<Arc<ShaderObject>>],
    ) -> Result<(), Box<ValidationError>> {
        if !self.device.enabled_features.shader_object {
            return Err(Box::new(ValidationError {
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "shader_object",
                )])]),
                vuids: &["VUID-vkCmdBindShadersEXT-None-08462"],
                ..Default::default()
            }));
        }

        if stages.len() != shaders.len() {
            return Err(Box::new(ValidationError {
                problem: "`stages` and `shaders` do not have the same length".into(),
                ..Default::default()
            }));
        }

        let mut seen = ShaderStages::empty();

        for (index, (&stage, shader)) in stages.iter().zip(shaders).enumerate() {
            if seen.contains_enum(stage) {
                return Err(Box::new(ValidationError {
                    context: format!("stages[{}]", index).into(),
                    problem: "occurs more than once in `stages`".into(),
                    vuids: &["VUID-vkCmdBindShadersEXT-pStages-08463"],
                    ..Default::default()
                }));
            }

            seen |= stage.into();

            if let Some(shader) = shader {
                if shader.stage() != stage {
                    return Err(Box::new(ValidationError {
                        problem: format!(
                            "`shaders[{0}]` was created for `ShaderStage::{1:?}`, but \
                            `stages[{0}]` is `ShaderStage::{2:?}`",
                            index,
                            shader.stage(),
                            stage,
                        )
                        .into(),
                        vuids: &["VUID-vkCmdBindShadersEXT-pShaders-08469"],
                        ..Default::default()
                    }));
                }
            }
        }

        Ok(())
    }

    pub fn bind_shaders_unchecked(
        &mut self,
        stages: &[ShaderStage],
        shaders: &[Option<Arc<ShaderObject>>],
    ) -> &mut Self {
        let mut graphics = false;

        for (&stage, shader) in stages.iter().zip(shaders) {
            if stage.is_graphics() {
                self.shader_objects.bind(stage, shader.clone());
                graphics = true;
            }
        }

        if graphics {
            log::debug!(
                target: "vulkano_dyncheck",
                "binding shader objects, bound stages: {:?}",
                self.shader_objects.bound_stages(),
            );

            self.graphics_pipeline = None;
            self.tracker.on_bind(PipelineBindPoint::Graphics);
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        command_buffer::{CommandRecorder, SetScope},
        diagnostic::DiagnosticCollector,
        pipeline::{
            graphics::{
                rasterization::CullMode, viewport::ViewportState, GraphicsPipeline,
                GraphicsPipelineCreateInfo,
            },
            DynamicState,
        },
        shader::{EntryPointInfo, ShaderObject, ShaderStage},
        tests::full_device,
    };
    use std::sync::Arc;

    fn recorder() -> CommandRecorder {
        CommandRecorder::new(
            Arc::new(full_device()),
            Arc::new(DiagnosticCollector::new()),
        )
    }

    #[test]
    fn bind_clears_since_bind_only() {
        let mut recorder = recorder();
        recorder.set_cull_mode(CullMode::Back).unwrap();

        let pipeline =
            GraphicsPipeline::new(recorder.device(), GraphicsPipelineCreateInfo::default()).unwrap();
        recorder.bind_pipeline_graphics(pipeline).unwrap();

        let tracker = recorder.tracker();
        assert!(!tracker.is_set(DynamicState::CullMode, SetScope::SinceBind));
        assert!(tracker.is_set(DynamicState::CullMode, SetScope::Session));
        assert_eq!(tracker.values().cull_mode, Some(CullMode::Back));
    }

    #[test]
    fn shaders_and_pipeline_replace_each_other() {
        let mut recorder = recorder();
        let device = recorder.device().clone();

        let pipeline = GraphicsPipeline::new(&device, GraphicsPipelineCreateInfo::default()).unwrap();
        recorder.bind_pipeline_graphics(pipeline.clone()).unwrap();

        let vertex = ShaderObject::new(&device, EntryPointInfo::new(ShaderStage::Vertex)).unwrap();
        recorder
            .bind_shaders(&[ShaderStage::Vertex], &[Some(vertex)])
            .unwrap();
        assert!(recorder.graphics_pipeline().is_none());
        assert!(recorder.shader_objects().is_bound(ShaderStage::Vertex));

        recorder.bind_pipeline_graphics(pipeline).unwrap();
        assert!(recorder.shader_objects().is_empty());
    }

    #[test]
    fn bind_shaders_checks_stages() {
        let mut recorder = recorder();
        let device = recorder.device().clone();
        let fragment =
            ShaderObject::new(&device, EntryPointInfo::new(ShaderStage::Fragment)).unwrap();

        let err = recorder
            .bind_shaders(&[ShaderStage::Vertex], &[Some(fragment)])
            .unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdBindShadersEXT-pShaders-08469"]);

        let err = recorder
            .bind_shaders(&[ShaderStage::Vertex, ShaderStage::Vertex], &[None, None])
            .unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdBindShadersEXT-pStages-08463"]);
    }

    #[test]
    fn inherited_viewports_need_dynamic_pipeline() {
        let mut recorder = recorder();
        recorder.set_inherited_viewport_depth_count(1).unwrap();

        let pipeline = GraphicsPipeline::new(
            recorder.device(),
            GraphicsPipelineCreateInfo {
                viewport_state: Some(ViewportState::new()),
                ..Default::default()
            },
        )
        .unwrap();
        let err = recorder.bind_pipeline_graphics(pipeline).unwrap_err();
        assert_eq!(err.vuids, ["VUID-vkCmdBindPipeline-commandBuffer-04808"]);
    }
}
