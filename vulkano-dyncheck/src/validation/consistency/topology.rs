// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use super::super::resolve::EffectiveView;
use crate::{
    diagnostic::Emitter,
    pipeline::{graphics::input_assembly::PrimitiveTopology, DynamicState},
};

pub(super) fn check(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    topology_class(view, emitter);
    list_restart(view, emitter);
}

/// A pipeline created with one topology class can only draw with topologies of that class,
/// unless the device allows any topology.
fn topology_class(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    let Some(pipeline) = view.pipeline() else {
        return;
    };

    if view.device.properties.dynamic_primitive_topology_unrestricted
        || !pipeline.is_dynamic(DynamicState::PrimitiveTopology)
    {
        return;
    }

    let (Some(dynamic), Some(input_assembly_state)) =
        (view.topology(), pipeline.input_assembly_state())
    else {
        return;
    };

    if dynamic.class() != input_assembly_state.topology.class() {
        emitter.emit(
            vuid!(
                emitter.vuid_type(),
                "dynamicPrimitiveTopologyUnrestricted-07500"
            ),
            view.objects(),
            format_args!(
                "the primitive topology was set to `PrimitiveTopology::{:?}`, but the bound \
                pipeline was created with `PrimitiveTopology::{:?}`, which is of a different \
                class, and the `dynamic_primitive_topology_unrestricted` property is `false`",
                dynamic, input_assembly_state.topology,
            ),
        );
    }
}

/// Primitive restart with a list topology needs a feature. Pipeline creation checks this for
/// static values, so it only has to be checked when either value is dynamic.
fn list_restart(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) {
    if !view.is_dynamic(DynamicState::PrimitiveRestartEnable)
        && !view.is_dynamic(DynamicState::PrimitiveTopology)
    {
        return;
    }

    let (Some(true), Some(topology)) = (view.primitive_restart_enable(), view.topology()) else {
        return;
    };

    if !topology.is_list() {
        return;
    }

    let features = &view.device.enabled_features;
    let (supported, feature) = match topology {
        PrimitiveTopology::PatchList => (
            features.primitive_topology_patch_list_restart,
            "primitive_topology_patch_list_restart",
        ),
        _ => (
            features.primitive_topology_list_restart,
            "primitive_topology_list_restart",
        ),
    };

    if !supported {
        emitter.emit(
            vuid!(emitter.vuid_type(), "primitiveTopology-09637"),
            view.objects(),
            format_args!(
                "primitive restart is enabled with `PrimitiveTopology::{:?}`, but the `{}` \
                feature is not enabled",
                topology, feature,
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        command_buffer::CommandRecorder,
        device::{DeviceCapabilities, DeviceFeatures},
        diagnostic::DiagnosticCollector,
        pipeline::{
            graphics::input_assembly::{InputAssemblyState, PrimitiveTopology},
            DynamicState, PipelineBindPoint,
        },
        tests::{full_device, pipeline_with},
        validation::VUIDType,
    };
    use std::sync::Arc;

    #[test]
    fn dynamic_topology_keeps_its_class() {
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(full_device()), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::PrimitiveTopology], |_| ()))
            .unwrap();

        recorder
            .set_primitive_topology(PrimitiveTopology::TriangleStrip)
            .unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));

        recorder
            .set_primitive_topology(PrimitiveTopology::LineList)
            .unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDraw-dynamicPrimitiveTopologyUnrestricted-07500"],
        );
    }

    #[test]
    fn unrestricted_topology() {
        let mut device = full_device();
        device.properties.dynamic_primitive_topology_unrestricted = true;
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(device), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with([DynamicState::PrimitiveTopology], |_| ()))
            .unwrap();

        recorder
            .set_primitive_topology(PrimitiveTopology::PointList)
            .unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::Draw));
    }

    #[test]
    fn list_restart_needs_the_feature() {
        let device = DeviceCapabilities {
            enabled_features: DeviceFeatures {
                primitive_topology_list_restart: false,
                ..DeviceFeatures::all()
            },
            ..full_device()
        };
        let collector = Arc::new(DiagnosticCollector::new());
        let mut recorder = CommandRecorder::new(Arc::new(device), collector.clone());
        recorder
            .bind_pipeline_graphics(pipeline_with(
                [DynamicState::PrimitiveRestartEnable],
                |create_info| {
                    create_info.input_assembly_state = Some(InputAssemblyState {
                        topology: PrimitiveTopology::TriangleList,
                        ..Default::default()
                    });
                },
            ))
            .unwrap();

        recorder.set_primitive_restart_enable(false).unwrap();
        assert!(!recorder.validate(PipelineBindPoint::Graphics, VUIDType::DrawIndexed));

        recorder.set_primitive_restart_enable(true).unwrap();
        assert!(recorder.validate(PipelineBindPoint::Graphics, VUIDType::DrawIndexed));
        assert_eq!(
            collector.rule_ids(),
            ["VUID-vkCmdDrawIndexed-primitiveTopology-09637"],
        );
    }
}
