// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Counts and sample numbers that have to agree with each other.

use super::{super::resolve::EffectiveView, missing_indices};
use crate::{
    diagnostic::Emitter,
    image::SampleCount,
    pipeline::{
        graphics::{multisample::SampleLocationsInfo, viewport::ViewportState, GraphicsPipeline},
        DynamicState,
    },
    shader::ShaderStage,
};

pub(super) fn check(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    if !view.rasterizes() {
        return;
    }

    match view.pipeline() {
        Some(pipeline) => {
            if let Some(viewport_state) = pipeline.viewport_state() {
                pipeline_viewports(view, pipeline, viewport_state, emitter);
            }

            pipeline_sample_mask(view, pipeline, emitter);
            pipeline_sample_locations(view, pipeline, emitter);
            rasterization_samples(view, pipeline, emitter);
        }
        None => shader_object_viewports(view, emitter),
    }

    color_write_enable_count(view, emitter);
    sample_location_grid(view, emitter);
    multisampled_render_to_single_sampled(view, emitter);
    per_viewport_arrays(view, emitter);
}

fn pipeline_viewports(
    view: &EffectiveView<'_>,
    pipeline: &GraphicsPipeline,
    viewport_state: &ViewportState,
    emitter: &mut Emitter<'_>,
) {
    let vuid_type = emitter.vuid_type();
    let viewport_count = viewport_state.viewports.len() as u32;
    let scissor_count = viewport_state.scissors.len() as u32;

    if let Some(inherited) = view.recorder.inherited_viewport_depth_count() {
        if pipeline.is_dynamic(DynamicState::Viewport) && viewport_count > inherited {
            emitter.emit(
                vuid!(vuid_type, "None-07850"),
                view.objects(),
                format_args!(
                    "the bound pipeline uses {} viewports, but only {} viewport depths are \
                    inherited",
                    viewport_count, inherited,
                ),
            );
        }

        return;
    }

    if pipeline.is_dynamic(DynamicState::Viewport) {
        let missing = missing_indices(view, DynamicState::Viewport, viewport_count);

        if !missing.is_empty() {
            emitter.emit(
                vuid!(vuid_type, "None-07831"),
                view.objects(),
                format_args!(
                    "the bound pipeline uses {} viewports, but viewports {:?} were not set by \
                    `vkCmdSetViewport` since the last bind",
                    viewport_count, missing,
                ),
            );
        }
    }

    if pipeline.is_dynamic(DynamicState::Scissor) {
        let missing = missing_indices(view, DynamicState::Scissor, scissor_count);

        if !missing.is_empty() {
            emitter.emit(
                vuid!(vuid_type, "None-07832"),
                view.objects(),
                format_args!(
                    "the bound pipeline uses {} scissors, but scissors {:?} were not set by \
                    `vkCmdSetScissor` since the last bind",
                    scissor_count, missing,
                ),
            );
        }
    }

    let dynamic_viewport_count = pipeline.is_dynamic(DynamicState::ViewportWithCount);
    let dynamic_scissor_count = pipeline.is_dynamic(DynamicState::ScissorWithCount);

    match (dynamic_viewport_count, dynamic_scissor_count) {
        (true, false) => {
            let count = view.viewport_count();

            if count != Some(scissor_count) {
                emitter.emit(
                    vuid!(vuid_type, "viewportCount-03417"),
                    view.objects(),
                    format_args!(
                        "the viewport count set by `vkCmdSetViewportWithCount` ({}) does not \
                        match the scissor count of the bound pipeline ({})",
                        DisplayCount(count),
                        scissor_count,
                    ),
                );
            }
        }
        (false, true) => {
            let count = view.scissor_count();

            if count != Some(viewport_count) {
                emitter.emit(
                    vuid!(vuid_type, "scissorCount-03418"),
                    view.objects(),
                    format_args!(
                        "the scissor count set by `vkCmdSetScissorWithCount` ({}) does not \
                        match the viewport count of the bound pipeline ({})",
                        DisplayCount(count),
                        viewport_count,
                    ),
                );
            }
        }
        (true, true) => {
            let (viewports, scissors) = (view.viewport_count(), view.scissor_count());

            if viewports.is_none() || viewports != scissors {
                emitter.emit(
                    vuid!(vuid_type, "viewportCount-03419"),
                    view.objects(),
                    format_args!(
                        "the viewport count set by `vkCmdSetViewportWithCount` ({}) does not \
                        match the scissor count set by `vkCmdSetScissorWithCount` ({})",
                        DisplayCount(viewports),
                        DisplayCount(scissors),
                    ),
                );
            }
        }
        (false, false) => (),
    }
}

fn shader_object_viewports(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    if let (Some(viewports), Some(scissors)) = (view.viewport_count(), view.scissor_count()) {
        if viewports != scissors {
            emitter.emit(
                vuid!(emitter.vuid_type(), "None-08635"),
                view.objects(),
                format_args!(
                    "the viewport count set by `vkCmdSetViewportWithCount` ({}) does not match \
                    the scissor count set by `vkCmdSetScissorWithCount` ({})",
                    viewports, scissors,
                ),
            );
        }
    }
}

fn color_write_enable_count(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    let Some(enables) = view.if_set(DynamicState::ColorWriteEnable, |v| {
        v.color_write_enable.as_ref()
    }) else {
        return;
    };

    let rule_id = match view.pipeline() {
        Some(pipeline) if pipeline.is_dynamic(DynamicState::ColorWriteEnable) => {
            vuid!(emitter.vuid_type(), "attachmentCount-07750")
        }
        Some(_) => return,
        None if view.has_stage(ShaderStage::Fragment)
            && view.device.enabled_features.color_write_enable =>
        {
            vuid!(emitter.vuid_type(), "None-08647")
        }
        None => return,
    };
    let attachment_count = view.color_attachment_count();

    if (enables.len() as u32) < attachment_count {
        emitter.emit(
            rule_id,
            view.objects(),
            format_args!(
                "`vkCmdSetColorWriteEnableEXT` was given {} values, but there are {} color \
                attachments",
                enables.len(),
                attachment_count,
            ),
        );
    }
}

fn pipeline_sample_mask(
    view: &EffectiveView<'_>,
    pipeline: &GraphicsPipeline,
    emitter: &mut Emitter<'_>,
) {
    if !pipeline.is_dynamic(DynamicState::SampleMask) {
        return;
    }

    let Some(mask) = view.if_set(DynamicState::SampleMask, |v| v.sample_mask) else {
        return;
    };
    let Some(samples) = view.rasterization_samples() else {
        return;
    };

    if mask.samples.count() < samples.count() {
        let rule_id = if pipeline.is_dynamic(DynamicState::RasterizationSamples) {
            vuid!(emitter.vuid_type(), "samples-07473")
        } else {
            vuid!(emitter.vuid_type(), "samples-07472")
        };

        emitter.emit(
            rule_id,
            view.objects(),
            format_args!(
                "the sample mask was set for {:?}, which is less than the rasterization sample \
                count {:?}",
                mask.samples, samples,
            ),
        );
    }
}

fn pipeline_sample_locations(
    view: &EffectiveView<'_>,
    pipeline: &GraphicsPipeline,
    emitter: &mut Emitter<'_>,
) {
    let vuid_type = emitter.vuid_type();
    let dynamic_samples = pipeline.is_dynamic(DynamicState::RasterizationSamples);

    if pipeline.is_dynamic(DynamicState::SampleLocations) {
        let (Some(info), Some(samples)) = (
            view.if_set(DynamicState::SampleLocations, |v| v.sample_locations.as_ref()),
            view.rasterization_samples(),
        ) else {
            return;
        };

        if info.sample_locations_per_pixel != samples {
            let rule_id = if dynamic_samples {
                vuid!(vuid_type, "sampleLocationsPerPixel-07483")
            } else {
                vuid!(vuid_type, "sampleLocationsPerPixel-07482")
            };

            emitter.emit(
                rule_id,
                view.objects(),
                format_args!(
                    "the sample locations were set for {:?} per pixel, but the rasterization \
                    sample count is {:?}",
                    info.sample_locations_per_pixel, samples,
                ),
            );
        }
    } else if dynamic_samples && view.sample_locations_enable() == Some(true) {
        let (Some(info), Some(samples)) = (
            pipeline
                .multisample_state()
                .and_then(|s| s.sample_locations.as_ref())
                .map(|s| &s.sample_locations_info),
            view.if_set(DynamicState::RasterizationSamples, |v| v.rasterization_samples),
        ) else {
            return;
        };

        let max_grid_size = view.device.max_sample_location_grid_size(samples);
        let [width, height] = grid_mismatch(info, max_grid_size);

        if width {
            emitter.emit(
                vuid!(vuid_type, "sampleLocationsEnable-07936"),
                view.objects(),
                grid_message("width", info, max_grid_size[0], samples),
            );
        }

        if height {
            emitter.emit(
                vuid!(vuid_type, "sampleLocationsEnable-07937"),
                view.objects(),
                grid_message("height", info, max_grid_size[1], samples),
            );
        }

        if info.sample_locations_per_pixel != samples {
            emitter.emit(
                vuid!(vuid_type, "sampleLocationsEnable-07938"),
                view.objects(),
                format_args!(
                    "the bound pipeline has sample locations for {:?} per pixel, but \
                    `vkCmdSetRasterizationSamplesEXT` set {:?}",
                    info.sample_locations_per_pixel, samples,
                ),
            );
        }
    }
}

/// Sample locations that were set dynamically must tile the maximum grid of the rasterization
/// sample count.
fn sample_location_grid(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    if view.sample_locations_enable() != Some(true)
        || !view.is_dynamic(DynamicState::SampleLocations)
    {
        return;
    }

    let (Some(info), Some(samples)) = (
        view.if_set(DynamicState::SampleLocations, |v| v.sample_locations.as_ref()),
        view.rasterization_samples(),
    ) else {
        return;
    };

    let vuid_type = emitter.vuid_type();
    let max_grid_size = view.device.max_sample_location_grid_size(samples);
    let [width, height] = grid_mismatch(info, max_grid_size);

    if width {
        emitter.emit(
            vuid!(vuid_type, "sampleLocationsEnable-07485"),
            view.objects(),
            grid_message("width", info, max_grid_size[0], samples),
        );
    }

    if height {
        emitter.emit(
            vuid!(vuid_type, "sampleLocationsEnable-07486"),
            view.objects(),
            grid_message("height", info, max_grid_size[1], samples),
        );
    }
}

/// Returns, per dimension, whether the maximum grid size is not a multiple of the grid size.
/// A zero grid size is never a mismatch.
fn grid_mismatch(info: &SampleLocationsInfo, max_grid_size: [u32; 2]) -> [bool; 2] {
    [0, 1].map(|dimension| {
        max_grid_size[dimension]
            .checked_rem(info.sample_location_grid_size[dimension])
            .is_some_and(|remainder| remainder != 0)
    })
}

fn grid_message(
    dimension: &'static str,
    info: &SampleLocationsInfo,
    max: u32,
    samples: SampleCount,
) -> String {
    let index = usize::from(dimension == "height");

    format!(
        "the maximum sample location grid {} for {:?} is {}, which is not a multiple of the \
        sample location grid {} {}",
        dimension, samples, max, dimension, info.sample_location_grid_size[index],
    )
}

fn rasterization_samples(
    view: &EffectiveView<'_>,
    pipeline: &GraphicsPipeline,
    emitter: &mut Emitter<'_>,
) {
    if !pipeline.is_dynamic(DynamicState::RasterizationSamples)
        || view.device.enabled_features.variable_multisample_rate
    {
        return;
    }

    let Some(rendering) = view.rendering() else {
        return;
    };

    if rendering.has_attachments() {
        return;
    }

    let Some(samples) = view.if_set(DynamicState::RasterizationSamples, |v| {
        v.rasterization_samples
    }) else {
        return;
    };

    let supported = view.device.properties.framebuffer_no_attachments_sample_counts;

    if !supported.contains_enum(samples) {
        emitter.emit(
            vuid!(emitter.vuid_type(), "rasterizationSamples-07471"),
            view.objects(),
            format_args!(
                "the render pass instance has no attachments, and `vkCmdSetRasterizationSamplesEXT` \
                set {:?}, which is not in `framebuffer_no_attachments_sample_counts` ({:?})",
                samples, supported,
            ),
        );
    }
}

fn multisampled_render_to_single_sampled(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    let Some(expected) = view
        .rendering()
        .and_then(|rendering| rendering.multisampled_render_to_single_sampled)
    else {
        return;
    };
    let Some(samples) = view.rasterization_samples() else {
        return;
    };

    if samples == expected {
        return;
    }

    let rule_id = if view.is_dynamic(DynamicState::RasterizationSamples) {
        vuid!(emitter.vuid_type(), "rasterizationSamples-09211")
    } else {
        vuid!(emitter.vuid_type(), "multisampledRenderToSingleSampled-07935")
    };

    emitter.emit(
        rule_id,
        view.objects(),
        format_args!(
            "the render pass instance renders to single-sampled attachments with {:?}, but the \
            rasterization sample count is {:?}",
            expected, samples,
        ),
    );
}

/// Per-viewport NVIDIA state must cover every viewport that the draw uses.
fn per_viewport_arrays(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    let Some(viewport_count) = view.viewport_count() else {
        return;
    };
    let vuid_type = emitter.vuid_type();
    let shader_objects = view.is_shader_objects();

    if view.viewport_w_scaling_enable() == Some(true)
        && view.is_dynamic(DynamicState::ViewportWScaling)
    {
        let missing = missing_indices(view, DynamicState::ViewportWScaling, viewport_count);

        if !missing.is_empty() {
            let rule_id = if shader_objects {
                vuid!(vuid_type, "None-08636")
            } else {
                vuid!(vuid_type, "commandBuffer-02701")
            };

            emitter.emit(
                rule_id,
                view.objects(),
                format_args!(
                    "viewport W scaling is enabled, but viewports {:?} have no scaling set by \
                    `vkCmdSetViewportWScalingNV`",
                    missing,
                ),
            );
        }
    }

    if view.shading_rate_image_enable() == Some(true)
        && view.is_dynamic(DynamicState::ViewportShadingRatePalette)
    {
        let missing =
            missing_indices(view, DynamicState::ViewportShadingRatePalette, viewport_count);

        if !missing.is_empty() {
            let rule_id = if shader_objects {
                vuid!(vuid_type, "None-08637")
            } else {
                vuid!(vuid_type, "commandBuffer-02701")
            };

            emitter.emit(
                rule_id,
                view.objects(),
                format_args!(
                    "the shading rate image is enabled, but viewports {:?} have no palette set \
                    by `vkCmdSetViewportShadingRatePaletteNV`",
                    missing,
                ),
            );
        }
    }

    if view.is_set(DynamicState::ViewportSwizzle) {
        let missing = missing_indices(view, DynamicState::ViewportSwizzle, viewport_count);

        if !missing.is_empty() && view.is_dynamic(DynamicState::ViewportSwizzle) {
            emitter.emit(
                vuid!(vuid_type, "viewportCount-09421"),
                view.objects(),
                format_args!(
                    "viewports {:?} have no swizzle set by `vkCmdSetViewportSwizzleNV`",
                    missing,
                ),
            );
        }
    }
}

/// Displays a count that may not have been set.
struct DisplayCount(Option<u32>);

impl std::fmt::Display for DisplayCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(count) => write!(f, "{}", count),
            None => write!(f, "never set"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        command_buffer::{CommandRecorder, RenderingInfo},
        diagnostic::DiagnosticCollector,
        image::SampleCount,
        pipeline::{
            graphics::{
                multisample::MultisampleState,
                viewport::{Scissor, Viewport, ViewportState},
            },
            DynamicState, PipelineBindPoint,
        },
        tests::{full_device, pipeline_with},
        validation::VUIDType,
    };
    use smallvec::smallvec;
    use std::sync::Arc;

    fn two_viewports(create_info: &mut crate::pipeline::graphics::GraphicsPipelineCreateInfo) {
        create_info.viewport_state = Some(ViewportState::with_count(2));
    }

    #[test]
    fn every_dynamic_viewport_must_be_set() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::Viewport], two_viewports))
            .unwrap();

        recorder.set_viewport(0, [Viewport::default()]).unwrap();
        let outcome = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert!(outcome.consistency_checked);
        assert_eq!(outcome.violations, 1);
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-None-07831"]);
        assert!(collector.diagnostics()[0].message.contains("[1]"));

        collector.clear();
        recorder.set_viewport(1, [Viewport::default()]).unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
    }

    #[test]
    fn inherited_viewports_limit_the_count() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder.set_inherited_viewport_depth_count(1).unwrap();
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::Viewport, DynamicState::Scissor],
                two_viewports,
            ))
            .unwrap();

        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::DrawIndexed));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDrawIndexed-None-07850"]);
    }

    #[test]
    fn viewport_and_scissor_counts_must_match() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::ViewportWithCount, DynamicState::ScissorWithCount],
                |create_info| {
                    create_info.viewport_state = Some(ViewportState {
                        viewports: smallvec![],
                        scissors: smallvec![],
                        ..Default::default()
                    });
                },
            ))
            .unwrap();

        recorder
            .set_viewport_with_count([Viewport::default(), Viewport::default()])
            .unwrap();
        recorder.set_scissor_with_count([Scissor::default()]).unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-viewportCount-03419"]);

        collector.clear();
        recorder
            .set_scissor_with_count([Scissor::default(), Scissor::default()])
            .unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
    }

    #[test]
    fn sample_mask_must_cover_the_samples() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::SampleMask], |create_info| {
                create_info.multisample_state = Some(MultisampleState {
                    rasterization_samples: SampleCount::Sample4,
                    ..Default::default()
                });
            }))
            .unwrap();

        recorder
            .set_sample_mask(SampleCount::Sample2, [0b11, 0])
            .unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-samples-07472"]);

        collector.clear();
        recorder
            .set_sample_mask(SampleCount::Sample4, [0b1111, 0])
            .unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
    }

    #[test]
    fn rendering_to_single_sampled_attachments() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::RasterizationSamples],
                |_| (),
            ))
            .unwrap();
        recorder
            .begin_rendering(RenderingInfo {
                multisampled_render_to_single_sampled: Some(SampleCount::Sample4),
                ..Default::default()
            })
            .unwrap();

        recorder
            .set_rasterization_samples(SampleCount::Sample2)
            .unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDraw-rasterizationSamples-09211"],
        );
    }
}
