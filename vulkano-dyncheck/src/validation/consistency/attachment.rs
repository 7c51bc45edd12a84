// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Per-attachment and per-rectangle state must be set for every index that the draw uses.

use super::{super::resolve::EffectiveView, missing_indices};
use crate::{
    diagnostic::Emitter,
    pipeline::{graphics::GraphicsPipeline, DynamicState},
    shader::ShaderStage,
};

pub(super) fn check(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    match view.pipeline() {
        Some(pipeline) => {
            discard_rectangles(view, pipeline, emitter);

            if view.rasterizes() {
                pipeline_attachments(view, pipeline, emitter);
            }
        }
        None => {
            if view.rasterizes() && view.has_stage(ShaderStage::Fragment) {
                shader_object_attachments(view, emitter);
            }
        }
    }
}

fn discard_rectangles(
    view: &EffectiveView<'_>,
    pipeline: &GraphicsPipeline,
    emitter: &mut Emitter<'_>,
) {
    let Some(discard_rectangle_state) = pipeline.discard_rectangle_state() else {
        return;
    };

    if !pipeline.is_dynamic(DynamicState::DiscardRectangle) {
        return;
    }

    let missing = missing_indices(
        view,
        DynamicState::DiscardRectangle,
        discard_rectangle_state.rectangles.len() as u32,
    );

    if let Some(&index) = missing.first() {
        emitter.emit(
            vuid!(emitter.vuid_type(), "None-07751"),
            view.objects(),
            format_args!(
                "the bound pipeline uses {} discard rectangles, but rectangle {} was not set by \
                `vkCmdSetDiscardRectangleEXT`",
                discard_rectangle_state.rectangles.len(),
                index,
            ),
        );
    }
}

fn pipeline_attachments(
    view: &EffectiveView<'_>,
    pipeline: &GraphicsPipeline,
    emitter: &mut Emitter<'_>,
) {
    let count = view.color_attachment_count();

    if count == 0 {
        return;
    }

    let vuid_type = emitter.vuid_type();
    let rows = [
        (
            DynamicState::ColorBlendEnable,
            vuid!(vuid_type, "firstAttachment-07476"),
            missing_indices(view, DynamicState::ColorBlendEnable, count),
        ),
        (
            DynamicState::ColorBlendEquation,
            vuid!(vuid_type, "firstAttachment-07477"),
            missing_indices(view, DynamicState::ColorBlendEquation, count),
        ),
        (
            DynamicState::ColorWriteMask,
            vuid!(vuid_type, "firstAttachment-07478"),
            missing_indices(view, DynamicState::ColorWriteMask, count),
        ),
        (
            DynamicState::ColorBlendAdvanced,
            vuid!(vuid_type, "firstAttachment-07479"),
            missing_indices(view, DynamicState::ColorBlendAdvanced, count),
        ),
    ];

    for (state, rule_id, missing) in rows {
        if let (true, Some(&index)) = (pipeline.is_dynamic(state), missing.first()) {
            emit_unset_attachment(view, emitter, rule_id, state, index);
        }
    }
}

fn shader_object_attachments(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    let count = view.color_attachment_count();
    let vuid_type = emitter.vuid_type();
    let mut reported = [false; 4];
    let unset_equation = if view.device.enabled_extensions.ext_blend_operation_advanced {
        vuid!(vuid_type, "rasterizerDiscardEnable-09416")
    } else {
        vuid!(vuid_type, "None-08658")
    };

    for index in 0..count {
        match view.color_blend_enable(index) {
            None => {
                if !reported[0] {
                    reported[0] = true;
                    emit_unset_attachment(
                        view,
                        emitter,
                        vuid!(vuid_type, "None-09417"),
                        DynamicState::ColorBlendEnable,
                        index,
                    );
                }
            }
            Some(true) => match view.color_blend_equation(index) {
                None if view.color_blend_advanced(index).is_none() => {
                    if !reported[1] {
                        reported[1] = true;
                        emit_unset_attachment(
                            view,
                            emitter,
                            unset_equation,
                            DynamicState::ColorBlendEquation,
                            index,
                        );
                    }
                }
                Some(blend)
                    if blend.uses_constant_factor()
                        && !view.is_set(DynamicState::BlendConstants) =>
                {
                    if !reported[2] {
                        reported[2] = true;
                        emitter.emit(
                            vuid!(vuid_type, "None-08621"),
                            view.objects(),
                            format_args!(
                                "color attachment {} blends with a constant factor, but \
                                `vkCmdSetBlendConstants` was not called since the last bind",
                                index,
                            ),
                        );
                    }
                }
                _ => (),
            },
            Some(false) => (),
        }

        if view.color_write_mask(index).is_none() && !reported[3] {
            reported[3] = true;
            emit_unset_attachment(
                view,
                emitter,
                vuid!(vuid_type, "None-09419"),
                DynamicState::ColorWriteMask,
                index,
            );
        }
    }
}

fn emit_unset_attachment(
    view: &EffectiveView<'_>,
    emitter: &mut Emitter<'_>,
    rule_id: &'static str,
    state: DynamicState,
    index: u32,
) {
    emitter.emit(
        rule_id,
        view.objects(),
        format_args!(
            "`{}` was not set for color attachment {} by `{}`",
            state.name(),
            index,
            state.command(),
        ),
    );
}

#[cfg(test)]
mod tests {
    use crate::{
        command_buffer::{AttachmentInfo, CommandRecorder, RenderingInfo},
        diagnostic::DiagnosticCollector,
        format::Format,
        image::SampleCount,
        pipeline::{
            graphics::{
                color_blend::{
                    AttachmentBlend, BlendFactor, ColorBlendAttachmentState, ColorBlendState,
                    ColorComponents,
                },
                discard_rectangle::DiscardRectangleState,
                viewport::Scissor,
            },
            DynamicState, PipelineBindPoint,
        },
        shader::{EntryPointInfo, ShaderObject, ShaderStage},
        tests::{full_device, pipeline_with, set_shader_object_defaults, shader_object_device},
        validation::VUIDType,
    };
    use std::sync::Arc;

    #[test]
    fn first_unset_attachment_is_reported() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::ColorWriteMask],
                |create_info| {
                    create_info.color_blend_state = Some(ColorBlendState::with_attachment_states(
                        3,
                        ColorBlendAttachmentState::default(),
                    ));
                },
            ))
            .unwrap();

        recorder
            .set_color_write_mask(0, [ColorComponents::all()])
            .unwrap();
        recorder
            .set_color_write_mask(2, [ColorComponents::all()])
            .unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDraw-firstAttachment-07478"],
        );
        assert!(collector.diagnostics()[0].message.contains("color attachment 1"));
    }

    #[test]
    fn discard_rectangles_cover_the_pipeline() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::DiscardRectangle],
                |create_info| {
                    create_info.discard_rectangle_state = Some(DiscardRectangleState {
                        rectangles: vec![Scissor::default(); 2],
                        ..Default::default()
                    });
                },
            ))
            .unwrap();

        recorder
            .set_discard_rectangle(0, [Scissor::default()])
            .unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-None-07751"]);

        collector.clear();
        recorder
            .set_discard_rectangle(1, [Scissor::default()])
            .unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
    }

    #[test]
    fn shader_objects_need_blend_constants() {
        let device = Arc::new(shader_object_device());
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(device.clone(), collector.clone());
        let fragment =
            ShaderObject::new(&device, EntryPointInfo::new(ShaderStage::Fragment)).unwrap();

        recorder
            .begin_rendering(RenderingInfo {
                attachments: vec![AttachmentInfo::color(
                    Format::R8G8B8A8_UNORM,
                    SampleCount::Sample1,
                )],
                ..Default::default()
            })
            .unwrap();
        recorder
            .bind_shaders(&[ShaderStage::Fragment], &[Some(fragment)])
            .unwrap();
        set_shader_object_defaults(&mut recorder);

        recorder.set_color_blend_enable(0, [true]).unwrap();
        recorder
            .set_color_blend_equation(
                0,
                [AttachmentBlend {
                    src_color_blend_factor: BlendFactor::ConstantColor,
                    ..AttachmentBlend::alpha()
                }],
            )
            .unwrap();
        recorder
            .set_color_write_mask(0, [ColorComponents::all()])
            .unwrap();

        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-None-08621"]);

        collector.clear();
        recorder.set_blend_constants([0.0; 4]).unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
    }
}
