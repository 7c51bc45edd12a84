// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Dynamic values checked against what the bound shaders declare.

use super::super::resolve::EffectiveView;
use crate::{
    diagnostic::Emitter,
    pipeline::{graphics::vertex_input::VertexInputState, DynamicState},
    shader::{EntryPointInfo, ShaderInterfaceEntry, ShaderStage},
};
use smallvec::SmallVec;

pub(super) fn check(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    if let Some(vertex) = view.stage(ShaderStage::Vertex) {
        if view.is_dynamic(DynamicState::VertexInput) {
            if let Some(vertex_input_state) =
                view.if_set(DynamicState::VertexInput, |v| v.vertex_input.as_ref())
            {
                vertex_input(view, vertex, vertex_input_state, emitter);
            }
        }
    }

    primitive_shading_rate(view, emitter);

    if !view.rasterizes() {
        return;
    }

    if let Some(fragment) = view.stage(ShaderStage::Fragment) {
        interpolate_at_sample(view, fragment, emitter);
        alpha_to_coverage(view, fragment, emitter);
        tile_image_reads(view, fragment, emitter);
    }
}

/// Every vertex shader input must be fed by an attribute with a compatible format. The lowest
/// offending location is reported.
fn vertex_input(
    view: &EffectiveView<'_>,
    vertex: &EntryPointInfo,
    vertex_input_state: &VertexInputState,
    emitter: &mut Emitter<'_>,
) {
    let vuid_type = emitter.vuid_type();
    let mut inputs: SmallVec<[&ShaderInterfaceEntry; 8]> = vertex.input_interface.iter().collect();
    inputs.sort_by_key(|input| input.location);

    for input in inputs {
        let Some(attribute) = vertex_input_state.attributes.get(&input.location) else {
            emitter.emit(
                vuid!(vuid_type, "Input-07939"),
                view.objects(),
                format_args!(
                    "the vertex shader has an input at location {}, but \
                    `vkCmdSetVertexInputEXT` did not provide an attribute for it",
                    input.location,
                ),
            );

            return;
        };

        let format = attribute.format;

        let Some(numeric_format) = format.numeric_format_color() else {
            continue;
        };

        let problem = if numeric_format.numeric_type() != input.numeric_type {
            Some((
                vuid!(vuid_type, "Input-08734"),
                format!(
                    "the numeric type of the format is `{:?}`, but the shader input is of type \
                    `{:?}`",
                    numeric_format.numeric_type(),
                    input.numeric_type,
                ),
            ))
        } else if format.is_64bit() && !input.is_64bit() {
            Some((
                vuid!(vuid_type, "format-08936"),
                "the format has 64-bit components, but the shader input is not 64-bit".to_owned(),
            ))
        } else if !format.is_64bit() && input.is_64bit() {
            Some((
                vuid!(vuid_type, "format-08937"),
                "the shader input is 64-bit, but the format does not have 64-bit components"
                    .to_owned(),
            ))
        } else if format.is_64bit() && input.component_count > format.component_count() {
            Some((
                vuid!(vuid_type, "format-09203"),
                format!(
                    "the shader input has {} components, but the format has only {}",
                    input.component_count,
                    format.component_count(),
                ),
            ))
        } else {
            None
        };

        if let Some((rule_id, problem)) = problem {
            emitter.emit(
                rule_id,
                view.objects(),
                format_args!(
                    "the vertex attribute at location {} has format `Format::{:?}`: {}",
                    input.location, format, problem,
                ),
            );

            return;
        }
    }
}

fn interpolate_at_sample(
    view: &EffectiveView<'_>,
    fragment: &EntryPointInfo,
    emitter: &mut Emitter<'_>,
) {
    if fragment.uses_interpolate_at_sample
        && view.is_dynamic(DynamicState::SampleLocationsEnable)
        && view.sample_locations_enable() == Some(true)
    {
        emitter.emit(
            vuid!(emitter.vuid_type(), "sampleLocationsEnable-07487"),
            view.objects(),
            "sample locations are enabled, but the fragment shader uses `InterpolateAtSample`",
        );
    }
}

fn alpha_to_coverage(
    view: &EffectiveView<'_>,
    fragment: &EntryPointInfo,
    emitter: &mut Emitter<'_>,
) {
    if !view.is_dynamic(DynamicState::AlphaToCoverageEnable)
        || view.alpha_to_coverage_enable() != Some(true)
        || fragment.writes_location_0_alpha()
    {
        return;
    }

    let rule_id = if view.is_shader_objects() {
        vuid!(emitter.vuid_type(), "alphaToCoverageEnable-08920")
    } else {
        vuid!(emitter.vuid_type(), "alphaToCoverageEnable-08919")
    };

    emitter.emit(
        rule_id,
        view.objects(),
        "alpha to coverage is enabled, but the fragment shader does not write the alpha \
        component of location 0",
    );
}

/// A fragment shader that reads depth or stencil through a tile image and declares early
/// fragment tests must not also write that aspect.
fn tile_image_reads(
    view: &EffectiveView<'_>,
    fragment: &EntryPointInfo,
    emitter: &mut Emitter<'_>,
) {
    if !fragment.early_fragment_tests {
        return;
    }

    let vuid_type = emitter.vuid_type();

    if fragment.reads_tile_image_depth
        && view.is_dynamic(DynamicState::DepthWriteEnable)
        && view.depth_write_enable() == Some(true)
    {
        emitter.emit(
            vuid!(vuid_type, "pDepthAttachment-08715"),
            view.objects(),
            "the fragment shader reads depth from a tile image with early fragment tests, but \
            depth writes are enabled",
        );
    }

    if fragment.reads_tile_image_stencil
        && view.is_dynamic(DynamicState::StencilWriteMask)
        && view.stencil_writes() == Some(true)
    {
        emitter.emit(
            vuid!(vuid_type, "pStencilAttachment-08716"),
            view.objects(),
            "the fragment shader reads stencil from a tile image with early fragment tests, but \
            the stencil write mask is not zero",
        );
    }
}

fn primitive_shading_rate(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    if view
        .device
        .properties
        .primitive_fragment_shading_rate_with_multiple_viewports
        || !view.is_dynamic(DynamicState::ViewportWithCount)
    {
        return;
    }

    let writes_shading_rate = view
        .last_pre_rasterization_stage()
        .is_some_and(|info| info.writes_primitive_shading_rate);

    let Some(viewport_count) = view.viewport_count() else {
        return;
    };

    if !writes_shading_rate || viewport_count == 1 {
        return;
    }

    let rule_id = if view.is_shader_objects() {
        vuid!(emitter.vuid_type(), "None-08642")
    } else {
        vuid!(
            emitter.vuid_type(),
            "primitiveFragmentShadingRateWithMultipleViewports-04552"
        )
    };

    emitter.emit(
        rule_id,
        view.objects(),
        format_args!(
            "the last pre-rasterization shader writes `PrimitiveShadingRateKHR`, but {} \
            viewports were set and the \
            `primitive_fragment_shading_rate_with_multiple_viewports` property is `false`",
            viewport_count,
        ),
    );
}

#[cfg(test)]
mod tests {
    use crate::{
        command_buffer::CommandRecorder,
        diagnostic::DiagnosticCollector,
        format::{Format, NumericType},
        pipeline::{
            graphics::vertex_input::{
                VertexInputAttributeDescription, VertexInputBindingDescription, VertexInputRate,
                VertexInputState,
            },
            DynamicState, PipelineBindPoint,
        },
        shader::{EntryPointInfo, ShaderInterfaceEntry, ShaderStage},
        tests::{full_device, pipeline_with},
        validation::VUIDType,
    };
    use std::sync::Arc;

    fn vertex_input_state(format: Format) -> VertexInputState {
        VertexInputState::new()
            .binding(
                0,
                VertexInputBindingDescription {
                    stride: 16,
                    input_rate: VertexInputRate::Vertex,
                },
            )
            .attribute(
                0,
                VertexInputAttributeDescription {
                    binding: 0,
                    format,
                    offset: 0,
                },
            )
    }

    #[test]
    fn vertex_attributes_match_the_shader() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::VertexInput], |create_info| {
                let mut vertex = EntryPointInfo::new(ShaderStage::Vertex);
                vertex.input_interface = vec![
                    ShaderInterfaceEntry::new(0, NumericType::Float, 4),
                    ShaderInterfaceEntry::new(1, NumericType::Float, 2),
                ];
                create_info.stages[0] = vertex;
            }))
            .unwrap();

        recorder
            .set_vertex_input(vertex_input_state(Format::R32G32B32A32_SFLOAT))
            .unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-Input-07939"]);

        collector.clear();
        recorder
            .set_vertex_input(
                vertex_input_state(Format::R32G32B32A32_UINT).attribute(
                    1,
                    VertexInputAttributeDescription {
                        binding: 0,
                        format: Format::R32G32_SFLOAT,
                        offset: 0,
                    },
                ),
            )
            .unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-Input-08734"]);

        collector.clear();
        recorder
            .set_vertex_input(
                vertex_input_state(Format::R64G64_SFLOAT).attribute(
                    1,
                    VertexInputAttributeDescription {
                        binding: 0,
                        format: Format::R32G32_SFLOAT,
                        offset: 0,
                    },
                ),
            )
            .unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-format-08936"]);
    }

    #[test]
    fn alpha_to_coverage_needs_alpha() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::AlphaToCoverageEnable],
                |create_info| {
                    let mut fragment = EntryPointInfo::new(ShaderStage::Fragment);
                    fragment.output_interface =
                        vec![ShaderInterfaceEntry::new(0, NumericType::Float, 3)];
                    create_info.stages[1] = fragment;
                },
            ))
            .unwrap();

        recorder.set_alpha_to_coverage_enable(false).unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        recorder.set_alpha_to_coverage_enable(true).unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDraw-alphaToCoverageEnable-08919"],
        );
    }

    #[test]
    fn tile_image_depth_reads_forbid_writes() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::DepthWriteEnable],
                |create_info| {
                    let mut fragment = EntryPointInfo::new(ShaderStage::Fragment);
                    fragment.early_fragment_tests = true;
                    fragment.reads_tile_image_depth = true;
                    create_info.stages[1] = fragment;
                },
            ))
            .unwrap();

        recorder.set_depth_write_enable(true).unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDraw-pDepthAttachment-08715"],
        );
    }
}
