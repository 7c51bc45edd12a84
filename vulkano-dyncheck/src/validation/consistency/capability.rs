// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Dynamic values checked against the device's properties and the formats of the current
//! attachments.

use super::super::resolve::EffectiveView;
use crate::{
    command_buffer::AttachmentRole,
    diagnostic::Emitter,
    format::{Format, FormatFeatures},
    pipeline::{
        graphics::{
            color_blend::ColorComponents,
            input_assembly::PrimitiveTopologyClass,
            rasterization::{ConservativeRasterizationMode, PolygonMode},
        },
        DynamicState,
    },
    query::QueryType,
    shader::ShaderStage,
};

pub(super) fn check(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    primitives_generated_query(view, emitter);

    if !view.rasterizes() {
        return;
    }

    advanced_blend_attachments(view, emitter);
    conservative_rasterization(view, emitter);

    if view.rendering().is_some() {
        blend_format_features(view, emitter);
        attachment_samples(view, emitter);
        shared_exponent_write_mask(view, emitter);
        depth_sample_locations(view, emitter);
        coverage_to_color_format(view, emitter);
    }
}

fn advanced_blend_attachments(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    if !view.is_dynamic(DynamicState::ColorBlendAdvanced) {
        return;
    }

    let limit = view.device.properties.advanced_blend_max_color_attachments;
    let count = (0..view.color_attachment_count())
        .filter(|&index| {
            view.color_blend_enable(index) == Some(true)
                && view.color_blend_advanced(index).is_some()
        })
        .count() as u32;

    if count > limit {
        emitter.emit(
            vuid!(emitter.vuid_type(), "advancedBlendMaxColorAttachments-07480"),
            view.objects(),
            format_args!(
                "{} color attachments use advanced blending, but the \
                `advanced_blend_max_color_attachments` property is {}",
                count, limit,
            ),
        );
    }
}

fn conservative_rasterization(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    if view
        .device
        .properties
        .conservative_point_and_line_rasterization
        || !view.is_dynamic(DynamicState::ConservativeRasterizationMode)
    {
        return;
    }

    match view.conservative_rasterization_mode() {
        None | Some(ConservativeRasterizationMode::Disabled) => return,
        Some(_) => (),
    }

    if view.draws_lines() || draws_points(view) {
        emitter.emit(
            vuid!(emitter.vuid_type(), "conservativePointAndLineRasterization-07499"),
            view.objects(),
            "conservative rasterization is enabled for point or line primitives, but the \
            `conservative_point_and_line_rasterization` property is `false`",
        );
    }
}

fn draws_points(view: &EffectiveView<'_>) -> bool {
    if view.polygon_mode() == Some(PolygonMode::Point) {
        return true;
    }

    match view.last_pre_rasterization_stage() {
        Some(info) if info.stage != ShaderStage::Vertex => {
            info.output_primitive == Some(PrimitiveTopologyClass::Point)
        }
        _ => view
            .topology()
            .is_some_and(|topology| topology.class() == PrimitiveTopologyClass::Point),
    }
}

fn primitives_generated_query(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    if view
        .device
        .enabled_features
        .primitives_generated_query_with_non_zero_streams
        || !view.is_dynamic(DynamicState::RasterizationStream)
        || !view.recorder.is_query_active(QueryType::PrimitivesGenerated)
    {
        return;
    }

    if let Some(stream) = view.rasterization_stream().filter(|&stream| stream != 0) {
        emitter.emit(
            vuid!(
                emitter.vuid_type(),
                "primitivesGeneratedQueryWithNonZeroStreams-07481"
            ),
            view.objects(),
            format_args!(
                "a primitives generated query is active and the rasterization stream is {}, but \
                the `primitives_generated_query_with_non_zero_streams` feature is not enabled",
                stream,
            ),
        );
    }
}

/// Color attachments that blend must have a format that supports blending.
fn blend_format_features(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    let Some(rendering) = view.rendering() else {
        return;
    };

    let rule_id = if view.is_shader_objects() {
        vuid!(emitter.vuid_type(), "None-08643")
    } else if view.is_dynamic(DynamicState::ColorBlendEnable) {
        vuid!(emitter.vuid_type(), "pColorBlendEnables-07470")
    } else {
        return;
    };

    let offender = rendering.color_attachments().find(|&(index, attachment)| {
        view.color_blend_enable(index) == Some(true)
            && !view
                .device
                .format_features(attachment.format)
                .intersects(FormatFeatures::COLOR_ATTACHMENT_BLEND)
    });

    if let Some((index, attachment)) = offender {
        emitter.emit(
            rule_id,
            view.objects(),
            format_args!(
                "blending is enabled for color attachment {}, but its format \
                `Format::{:?}` does not support `FormatFeatures::COLOR_ATTACHMENT_BLEND`",
                index, attachment.format,
            ),
        );
    }
}

/// Without mixed-samples support, every color and depth/stencil attachment must have the
/// rasterization sample count.
fn attachment_samples(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    let Some(rendering) = view.rendering() else {
        return;
    };

    if view.device.allows_mixed_attachment_samples()
        || rendering.multisampled_render_to_single_sampled.is_some()
        || !view.is_dynamic(DynamicState::RasterizationSamples)
    {
        return;
    }

    let Some(samples) = view.rasterization_samples() else {
        return;
    };

    let offender = rendering.attachments.iter().find(|attachment| {
        matches!(
            attachment.role,
            AttachmentRole::Color | AttachmentRole::DepthStencil
        ) && attachment.samples != samples
    });

    if let Some(attachment) = offender {
        let rule_id = if view.is_shader_objects() {
            vuid!(emitter.vuid_type(), "rasterizationSamples-08644")
        } else {
            vuid!(emitter.vuid_type(), "rasterizationSamples-07474")
        };

        emitter.emit(
            rule_id,
            view.objects(),
            format_args!(
                "the rasterization sample count is {:?}, but a {:?} attachment has {:?}",
                samples, attachment.role, attachment.samples,
            ),
        );
    }
}

/// A shared-exponent attachment can only be written as a whole color, or not at all.
fn shared_exponent_write_mask(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    let Some(rendering) = view.rendering() else {
        return;
    };

    if !view.is_dynamic(DynamicState::ColorWriteMask) {
        return;
    }

    let rgb = ColorComponents::R | ColorComponents::G | ColorComponents::B;
    let offender = rendering
        .color_attachments()
        .filter(|(_, attachment)| attachment.format == Format::E5B9G9R9_UFLOAT_PACK32)
        .find_map(|(index, _)| {
            view.color_write_mask(index)
                .filter(|&mask| !mask.is_empty() && mask != rgb)
                .map(|mask| (index, mask))
        });

    if let Some((index, mask)) = offender {
        emitter.emit(
            vuid!(emitter.vuid_type(), "None-09116"),
            view.objects(),
            format_args!(
                "color attachment {} has format `Format::E5B9G9R9_UFLOAT_PACK32`, but its color \
                write mask is {:?}, which is neither empty nor R, G and B",
                index, mask,
            ),
        );
    }
}

fn depth_sample_locations(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    let Some(depth_stencil) = view
        .rendering()
        .and_then(|rendering| rendering.depth_stencil_attachment())
    else {
        return;
    };

    if depth_stencil.sample_locations_compatible
        || !view.is_dynamic(DynamicState::SampleLocationsEnable)
        || view.sample_locations_enable() != Some(true)
    {
        return;
    }

    emitter.emit(
        vuid!(emitter.vuid_type(), "sampleLocationsEnable-07484"),
        view.objects(),
        "sample locations are enabled, but the depth/stencil attachment was not created as \
        compatible with custom sample locations",
    );
}

/// Coverage can only be written to a single-component integer attachment.
fn coverage_to_color_format(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    if !view.is_dynamic(DynamicState::CoverageToColorEnable)
        || view.coverage_to_color_enable() != Some(true)
    {
        return;
    }

    let (Some(rendering), Some(location)) = (view.rendering(), view.coverage_to_color_location())
    else {
        return;
    };

    let Some((_, attachment)) = rendering
        .color_attachments()
        .find(|&(index, _)| index == location)
    else {
        return;
    };

    if !matches!(
        attachment.format,
        Format::R8_UINT
            | Format::R8_SINT
            | Format::R16_UINT
            | Format::R16_SINT
            | Format::R32_UINT
            | Format::R32_SINT
    ) {
        emitter.emit(
            vuid!(emitter.vuid_type(), "rasterizerDiscardEnable-09420"),
            view.objects(),
            format_args!(
                "coverage is written to color attachment {}, whose format `Format::{:?}` is \
                not a single-component 8, 16 or 32-bit integer format",
                location, attachment.format,
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        command_buffer::{AttachmentInfo, CommandRecorder, RenderingInfo},
        device::{DeviceCapabilities, DeviceExtensions, DeviceFeatures},
        diagnostic::DiagnosticCollector,
        format::{Format, FormatFeatures},
        image::SampleCount,
        pipeline::{
            graphics::color_blend::{
                ColorBlendAttachmentState, ColorBlendState, ColorComponents,
            },
            DynamicState, PipelineBindPoint,
        },
        query::QueryType,
        tests::{full_device, pipeline_with},
        validation::VUIDType,
    };
    use std::sync::Arc;

    fn one_color_attachment(format: Format, samples: SampleCount) -> RenderingInfo {
        RenderingInfo {
            attachments: vec![AttachmentInfo::color(format, samples)],
            ..Default::default()
        }
    }

    #[test]
    fn blending_needs_a_blendable_format() {
        let mut device = full_device();
        device
            .format_features
            .insert(Format::R32_UINT, FormatFeatures::COLOR_ATTACHMENT);
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(device), collector.clone());
        recorder
            .begin_rendering(one_color_attachment(Format::R32_UINT, SampleCount::Sample1))
            .unwrap();
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::ColorBlendEnable],
                |create_info| {
                    create_info.color_blend_state = Some(ColorBlendState::with_attachment_states(
                        1,
                        ColorBlendAttachmentState::default(),
                    ));
                },
            ))
            .unwrap();

        recorder.set_color_blend_enable(0, [false]).unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        recorder.set_color_blend_enable(0, [true]).unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDraw-pColorBlendEnables-07470"],
        );
    }

    #[test]
    fn attachment_samples_match_without_mixed_samples() {
        let device = DeviceCapabilities {
            enabled_extensions: DeviceExtensions {
                amd_mixed_attachment_samples: false,
                nv_framebuffer_mixed_samples: false,
                ..DeviceExtensions::all()
            },
            ..full_device()
        };
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(device), collector.clone());
        recorder
            .begin_rendering(one_color_attachment(
                Format::R8G8B8A8_UNORM,
                SampleCount::Sample4,
            ))
            .unwrap();
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::RasterizationSamples], |_| ()))
            .unwrap();

        recorder
            .set_rasterization_samples(SampleCount::Sample4)
            .unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        recorder
            .set_rasterization_samples(SampleCount::Sample1)
            .unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDraw-rasterizationSamples-07474"],
        );
    }

    #[test]
    fn shared_exponent_formats_write_all_or_nothing() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .begin_rendering(one_color_attachment(
                Format::E5B9G9R9_UFLOAT_PACK32,
                SampleCount::Sample1,
            ))
            .unwrap();
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::ColorWriteMask], |create_info| {
                create_info.color_blend_state = Some(ColorBlendState::with_attachment_states(
                    1,
                    ColorBlendAttachmentState::default(),
                ));
            }))
            .unwrap();

        recorder
            .set_color_write_mask(0, [ColorComponents::R])
            .unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-None-09116"]);

        collector.clear();
        recorder
            .set_color_write_mask(
                0,
                [ColorComponents::R | ColorComponents::G | ColorComponents::B],
            )
            .unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
    }

    #[test]
    fn non_zero_stream_with_primitives_generated_query() {
        let device = DeviceCapabilities {
            enabled_features: DeviceFeatures {
                primitives_generated_query_with_non_zero_streams: false,
                ..DeviceFeatures::all()
            },
            ..full_device()
        };
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(device), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::RasterizationStream], |_| ()))
            .unwrap();
        recorder.set_rasterization_stream(1).unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        recorder.begin_query(QueryType::PrimitivesGenerated).unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDraw-primitivesGeneratedQueryWithNonZeroStreams-07481"],
        );
    }
}
