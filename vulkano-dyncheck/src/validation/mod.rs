// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The rules that are checked at a draw or trace command.
//!
//! Validation runs in two passes. The first pass checks that every piece of state that the bound
//! configuration leaves dynamic was set since the last bind. Only if nothing is missing does the
//! second pass run, which checks the values against each other, against the bound shaders, the
//! current attachments and the device.
//!
//! Every rule is identified by the Vulkan VUID that it enforces. The VUID depends on the command
//! being validated, which is given by a [`VUIDType`].

macro_rules! vuid {
    ($vuid_type:expr, $id:literal) => {
        match $vuid_type {
            $crate::validation::VUIDType::Draw => concat!("VUID-vkCmdDraw-", $id),
            $crate::validation::VUIDType::DrawIndirect => concat!("VUID-vkCmdDrawIndirect-", $id),
            $crate::validation::VUIDType::DrawIndirectCount => {
                concat!("VUID-vkCmdDrawIndirectCount-", $id)
            }
            $crate::validation::VUIDType::DrawIndexed => concat!("VUID-vkCmdDrawIndexed-", $id),
            $crate::validation::VUIDType::DrawIndexedIndirect => {
                concat!("VUID-vkCmdDrawIndexedIndirect-", $id)
            }
            $crate::validation::VUIDType::DrawIndexedIndirectCount => {
                concat!("VUID-vkCmdDrawIndexedIndirectCount-", $id)
            }
            $crate::validation::VUIDType::DrawMeshTasks => {
                concat!("VUID-vkCmdDrawMeshTasksEXT-", $id)
            }
            $crate::validation::VUIDType::DrawMeshTasksIndirect => {
                concat!("VUID-vkCmdDrawMeshTasksIndirectEXT-", $id)
            }
            $crate::validation::VUIDType::DrawMeshTasksIndirectCount => {
                concat!("VUID-vkCmdDrawMeshTasksIndirectCountEXT-", $id)
            }
            $crate::validation::VUIDType::TraceRays => concat!("VUID-vkCmdTraceRaysKHR-", $id),
            $crate::validation::VUIDType::TraceRaysIndirect => {
                concat!("VUID-vkCmdTraceRaysIndirectKHR-", $id)
            }
        }
    };
}

mod completeness;
mod consistency;
mod ray_tracing;
mod resolve;

use self::resolve::EffectiveView;
use crate::{
    command_buffer::CommandRecorder,
    diagnostic::{Emitter, Location},
    pipeline::{DynamicStateSet, PipelineBindPoint},
};

/// The command that validation is run for. It selects the VUIDs that are reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VUIDType {
    Draw,
    DrawIndirect,
    DrawIndirectCount,
    DrawIndexed,
    DrawIndexedIndirect,
    DrawIndexedIndirectCount,
    DrawMeshTasks,
    DrawMeshTasksIndirect,
    DrawMeshTasksIndirectCount,
    TraceRays,
    TraceRaysIndirect,
}

impl VUIDType {
    /// Returns the name of the Vulkan command.
    pub const fn command_name(self) -> &'static str {
        match self {
            VUIDType::Draw => "vkCmdDraw",
            VUIDType::DrawIndirect => "vkCmdDrawIndirect",
            VUIDType::DrawIndirectCount => "vkCmdDrawIndirectCount",
            VUIDType::DrawIndexed => "vkCmdDrawIndexed",
            VUIDType::DrawIndexedIndirect => "vkCmdDrawIndexedIndirect",
            VUIDType::DrawIndexedIndirectCount => "vkCmdDrawIndexedIndirectCount",
            VUIDType::DrawMeshTasks => "vkCmdDrawMeshTasksEXT",
            VUIDType::DrawMeshTasksIndirect => "vkCmdDrawMeshTasksIndirectEXT",
            VUIDType::DrawMeshTasksIndirectCount => "vkCmdDrawMeshTasksIndirectCountEXT",
            VUIDType::TraceRays => "vkCmdTraceRaysKHR",
            VUIDType::TraceRaysIndirect => "vkCmdTraceRaysIndirectKHR",
        }
    }

    /// Returns the bind point whose state the command consumes.
    pub const fn bind_point(self) -> PipelineBindPoint {
        match self {
            VUIDType::TraceRays | VUIDType::TraceRaysIndirect => PipelineBindPoint::RayTracing,
            _ => PipelineBindPoint::Graphics,
        }
    }

    /// Returns whether the command draws with mesh shading instead of vertex input.
    #[inline]
    pub const fn is_mesh(self) -> bool {
        matches!(
            self,
            VUIDType::DrawMeshTasks
                | VUIDType::DrawMeshTasksIndirect
                | VUIDType::DrawMeshTasksIndirectCount
        )
    }
}

/// A summary of one validation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// The number of errors that were reported. Suppressed rules are not counted.
    pub violations: u32,

    /// The number of warnings that were reported.
    pub warnings: u32,

    /// The states that were required but not set since the last bind. This includes states
    /// that are only required because of another effective value, such as the cull mode of
    /// shader objects once rasterization is enabled. Rules that would read one of these states
    /// are skipped.
    pub missing: DynamicStateSet,

    /// Whether the values were checked for consistency. This is skipped when nothing is bound,
    /// and when required state is missing.
    pub consistency_checked: bool,
}

pub(crate) fn validate_dynamic_state(
    recorder: &CommandRecorder,
    bind_point: PipelineBindPoint,
    location: &Location,
) -> ValidationOutcome {
    let mut emitter = Emitter::new(recorder.settings(), recorder.sink(), location);

    let mut outcome = match bind_point {
        PipelineBindPoint::Compute => {
            log::trace!(
                target: "vulkano_dyncheck",
                "{}: compute pipelines have no dynamic state",
                location,
            );

            return ValidationOutcome::default();
        }
        PipelineBindPoint::RayTracing => ray_tracing::validate(recorder, &mut emitter),
        PipelineBindPoint::Graphics => {
            let Some(view) = EffectiveView::resolve(recorder, bind_point) else {
                log::debug!(
                    target: "vulkano_dyncheck",
                    "{}: no graphics pipeline or shader object is bound",
                    location,
                );

                return ValidationOutcome::default();
            };

            log::trace!(
                target: "vulkano_dyncheck",
                "{}: validating against {:?}",
                location,
                view.objects(),
            );

            let mut missing = completeness::check(&view, &mut emitter);
            let consistency_checked = missing.is_empty();

            if consistency_checked {
                missing |= consistency::check(&view, &mut emitter);
            } else {
                log::trace!(
                    target: "vulkano_dyncheck",
                    "{}: skipping consistency checks, missing {:?}",
                    location,
                    missing,
                );
            }

            ValidationOutcome {
                missing,
                consistency_checked,
                ..Default::default()
            }
        }
    };

    outcome.violations = emitter.violations();
    outcome.warnings = emitter.warnings();

    log::trace!(
        target: "vulkano_dyncheck",
        "{}: {} violations, {} warnings",
        location,
        outcome.violations,
        outcome.warnings,
    );

    outcome
}
