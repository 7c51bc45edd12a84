// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Helpers shared by the tests of every module, and tests that go through the whole crate.

use crate::{
    command_buffer::CommandRecorder,
    device::{DeviceCapabilities, DeviceExtensions, DeviceFeatures},
    format::{Format, FormatFeatures},
    image::SampleCount,
    pipeline::{
        graphics::{
            input_assembly::InputAssemblyState,
            rasterization::{CullMode, FrontFace, PolygonMode, RasterizationState},
            viewport::{Scissor, Viewport},
            GraphicsPipeline, GraphicsPipelineCreateInfo,
        },
        DynamicStateSet,
    },
    shader::{EntryPointInfo, ShaderStage},
    Version,
};
use std::sync::Arc;

const SAMPLE_COUNTS: [SampleCount; 7] = [
    SampleCount::Sample1,
    SampleCount::Sample2,
    SampleCount::Sample4,
    SampleCount::Sample8,
    SampleCount::Sample16,
    SampleCount::Sample32,
    SampleCount::Sample64,
];

/// A device that has every feature and extension enabled, and every format feature.
pub(crate) fn full_device() -> DeviceCapabilities {
    DeviceCapabilities {
        api_version: Version::V1_3,
        enabled_features: DeviceFeatures::all(),
        enabled_extensions: DeviceExtensions::all(),
        format_features: Format::ALL
            .iter()
            .map(|&format| (format, FormatFeatures::all()))
            .collect(),
        max_sample_location_grid_sizes: SAMPLE_COUNTS
            .into_iter()
            .map(|samples| (samples, [4, 4]))
            .collect(),
        ..Default::default()
    }
}

/// A device with shader objects and nothing else beyond Vulkan 1.3.
pub(crate) fn shader_object_device() -> DeviceCapabilities {
    DeviceCapabilities {
        enabled_features: DeviceFeatures {
            shader_object: true,
            ..DeviceFeatures::empty()
        },
        enabled_extensions: DeviceExtensions {
            ext_shader_object: true,
            ..DeviceExtensions::empty()
        },
        ..full_device()
    }
}

/// Creates a pipeline with a vertex and a fragment shader, in that order, default input assembly
/// and rasterization state, and `dynamic_state` dynamic. `f` can change anything before the
/// pipeline is created.
pub(crate) fn pipeline_with(
    dynamic_state: impl Into<DynamicStateSet>,
    f: impl FnOnce(&mut GraphicsPipelineCreateInfo),
) -> Arc<GraphicsPipeline> {
    let mut create_info = GraphicsPipelineCreateInfo {
        stages: [
            EntryPointInfo::new(ShaderStage::Vertex),
            EntryPointInfo::new(ShaderStage::Fragment),
        ]
        .into_iter()
        .collect(),
        input_assembly_state: Some(InputAssemblyState::default()),
        rasterization_state: Some(RasterizationState::default()),
        dynamic_state: dynamic_state.into(),
        ..Default::default()
    };
    f(&mut create_info);

    GraphicsPipeline::new(&full_device(), create_info).unwrap()
}

/// Sets everything that a fragment shader object needs on [`shader_object_device`] to draw with
/// rasterization enabled and no color attachments.
pub(crate) fn set_shader_object_defaults(recorder: &mut CommandRecorder) {
    recorder
        .set_rasterizer_discard_enable(false)
        .unwrap()
        .set_viewport_with_count([Viewport::default()])
        .unwrap()
        .set_scissor_with_count([Scissor::default()])
        .unwrap()
        .set_cull_mode(CullMode::None)
        .unwrap()
        .set_front_face(FrontFace::CounterClockwise)
        .unwrap()
        .set_depth_test_enable(false)
        .unwrap()
        .set_depth_write_enable(false)
        .unwrap()
        .set_depth_bias_enable(false)
        .unwrap()
        .set_stencil_test_enable(false)
        .unwrap()
        .set_polygon_mode(PolygonMode::Fill)
        .unwrap()
        .set_rasterization_samples(SampleCount::Sample1)
        .unwrap()
        .set_sample_mask(SampleCount::Sample1, [u32::MAX; 2])
        .unwrap()
        .set_alpha_to_coverage_enable(false)
        .unwrap();
}

mod scenarios {
    use super::*;
    use crate::{
        command_buffer::{AttachmentInfo, RenderingInfo, SetScope},
        diagnostic::{DiagnosticCollector, Severity},
        pipeline::{
            graphics::{
                color_blend::{ColorBlendAttachmentState, ColorBlendState, ColorComponents},
                input_assembly::PrimitiveTopology,
                viewport::ViewportState,
            },
            DynamicState, PipelineBindPoint,
        },
        shader::ShaderObject,
        validation::VUIDType,
    };

    const TOPOLOGIES: [PrimitiveTopology; 11] = [
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

    fn new_recorder(device: DeviceCapabilities) -> (CommandRecorder, Arc<DiagnosticCollector>) {
        let collector = Arc::new(DiagnosticCollector::new());
        let recorder = CommandRecorder::new(Arc::new(device), collector.clone());

        (recorder, collector)
    }

    #[test]
    fn unset_cull_mode_is_missing() {
        let (mut recorder, collector) = new_recorder(full_device());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::CullMode], |_| ()))
            .unwrap();

        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        let diagnostics = collector.take();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, "VUID-vkCmdDraw-None-07840");
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn set_cull_mode_is_complete() {
        let (mut recorder, collector) = new_recorder(full_device());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::CullMode], |_| ()))
            .unwrap();
        recorder.set_cull_mode(CullMode::Back).unwrap();

        let outcome = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert_eq!(outcome.violations, 0);
        assert!(outcome.consistency_checked);
        assert!(collector.is_empty());
    }

    #[test]
    fn unset_viewport_slot() {
        let (mut recorder, collector) = new_recorder(full_device());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::Viewport], |create_info| {
                create_info.viewport_state = Some(ViewportState::with_count(2));
            }))
            .unwrap();
        recorder.set_viewport(0, [Viewport::default()]).unwrap();

        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-None-07831"]);
    }

    #[test]
    fn viewports_from_before_a_rebind_do_not_count() {
        let (mut recorder, collector) = new_recorder(full_device());
        let pipeline = pipeline_with([DynamicState::Viewport], |create_info| {
            create_info.viewport_state = Some(ViewportState::with_count(2));
        });

        recorder.bind_pipeline_graphics(pipeline.clone()).unwrap();
        recorder.set_viewport(1, [Viewport::default()]).unwrap();
        recorder.bind_pipeline_graphics(pipeline).unwrap();
        recorder.set_viewport(0, [Viewport::default()]).unwrap();

        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        let diagnostics = collector.take();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, "VUID-vkCmdDraw-None-07831");
        assert!(diagnostics[0].message.contains("[1]"));

        recorder.set_viewport(1, [Viewport::default()]).unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
    }

    #[test]
    fn rasterization_samples_differ_from_the_attachment() {
        let device = DeviceCapabilities {
            enabled_extensions: DeviceExtensions {
                amd_mixed_attachment_samples: false,
                nv_framebuffer_mixed_samples: false,
                ..DeviceExtensions::all()
            },
            ..full_device()
        };
        let (mut recorder, collector) = new_recorder(device);
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
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::RasterizationSamples],
                |create_info| {
                    create_info.color_blend_state = Some(ColorBlendState::with_attachment_states(
                        1,
                        ColorBlendAttachmentState::default(),
                    ));
                },
            ))
            .unwrap();
        recorder
            .set_rasterization_samples(SampleCount::Sample4)
            .unwrap();

        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        let diagnostics = collector.take();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].rule_id,
            "VUID-vkCmdDraw-rasterizationSamples-07474",
        );
        assert!(diagnostics[0].message.contains("Sample4"));
        assert!(diagnostics[0].message.contains("Sample1"));
    }

    #[test]
    fn redundant_sets_are_idempotent() {
        let (mut recorder, collector) = new_recorder(full_device());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::CullMode, DynamicState::DepthBiasEnable],
                |_| (),
            ))
            .unwrap();

        recorder.set_cull_mode(CullMode::Front).unwrap();
        let once = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        let once_ids = collector.rule_ids();
        collector.clear();

        recorder.set_cull_mode(CullMode::Front).unwrap();
        let twice = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert_eq!(once, twice);
        assert_eq!(once_ids, collector.rule_ids());
    }

    #[test]
    fn rebinding_clears_since_bind_only() {
        let (mut recorder, _) = new_recorder(full_device());
        let pipeline = pipeline_with([DynamicState::CullMode], |_| ());

        recorder.set_cull_mode(CullMode::Back).unwrap();
        recorder.set_line_width(1.0).unwrap();
        recorder.bind_pipeline_graphics(pipeline).unwrap();

        for state in DynamicState::ALL {
            if state.bind_point() == PipelineBindPoint::Graphics {
                assert!(!recorder.tracker().is_set(state, SetScope::SinceBind));
            }
        }

        assert!(recorder
            .tracker()
            .is_set(DynamicState::CullMode, SetScope::Session));
        assert!(recorder
            .tracker()
            .is_set(DynamicState::LineWidth, SetScope::Session));
    }

    #[test]
    fn missing_state_stops_the_consistency_pass() {
        let (mut recorder, collector) = new_recorder(full_device());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::CullMode, DynamicState::PrimitiveTopology],
                |_| (),
            ))
            .unwrap();
        // Would be a class violation if it were checked.
        recorder
            .set_primitive_topology(PrimitiveTopology::PointList)
            .unwrap();

        let outcome = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert!(!outcome.consistency_checked);
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-None-07840"]);

        collector.clear();
        recorder.set_cull_mode(CullMode::None).unwrap();
        let outcome = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert!(outcome.consistency_checked);
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDraw-dynamicPrimitiveTopologyUnrestricted-07500"],
        );
    }

    #[test]
    fn topology_classes_are_symmetric() {
        for fixed in TOPOLOGIES {
            let (mut recorder, collector) = new_recorder(full_device());
            recorder
                .bind_pipeline_graphics(pipeline_with(
                    [DynamicState::PrimitiveTopology],
                    |create_info| {
                        create_info.input_assembly_state = Some(InputAssemblyState {
                            topology: fixed,
                            ..Default::default()
                        });
                    },
                ))
                .unwrap();

            for dynamic in TOPOLOGIES {
                collector.clear();
                recorder.set_primitive_topology(dynamic).unwrap();
                recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw);

                assert_eq!(
                    collector.contains("VUID-vkCmdDraw-dynamicPrimitiveTopologyUnrestricted-07500"),
                    fixed.class() != dynamic.class(),
                    "{:?} and {:?}",
                    fixed,
                    dynamic,
                );
            }
        }
    }

    #[test]
    fn first_offending_attachment_only() {
        let (mut recorder, collector) = new_recorder(full_device());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::ColorWriteMask],
                |create_info| {
                    create_info.color_blend_state = Some(ColorBlendState::with_attachment_states(
                        6,
                        ColorBlendAttachmentState::default(),
                    ));
                },
            ))
            .unwrap();
        recorder
            .set_color_write_mask(0, [ColorComponents::all(); 2])
            .unwrap();
        recorder
            .set_color_write_mask(3, [ColorComponents::all(); 2])
            .unwrap();

        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        let diagnostics = collector.take();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("color attachment 2"));
    }

    #[test]
    fn fragment_shader_object_with_defaults() {
        let device = Arc::new(shader_object_device());
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(device.clone(), collector.clone());
        let fragment =
            ShaderObject::new(&device, EntryPointInfo::new(ShaderStage::Fragment)).unwrap();
        recorder
            .bind_shaders(&[ShaderStage::Fragment], &[Some(fragment)])
            .unwrap();

        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(collector.rule_ids(), ["VUID-vkCmdDraw-None-08639"]);

        collector.clear();
        set_shader_object_defaults(&mut recorder);
        let outcome = recorder.validate_detailed(PipelineBindPoint::Graphics, VUIDType::Draw);
        assert!(outcome.consistency_checked);
        assert_eq!(outcome.violations, 0, "{:?}", collector.rule_ids());
    }
}
