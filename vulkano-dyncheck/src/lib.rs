// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

#![doc(html_logo_url = "https://raw.githubusercontent.com/vulkano-rs/vulkano/master/logo.png")]
//! Draw-time validation of Vulkan dynamic state.
//!
//! A graphics pipeline can leave parts of its configuration *dynamic*, meaning that the value
//! must be supplied by a command recorded into the command buffer before the next draw. Shader
//! objects go further and leave nearly everything dynamic. This crate tracks those commands and
//! checks, at every draw or trace, that the state the bound configuration needs was supplied and
//! that the supplied values are consistent with each other, with the bound shaders and with the
//! device.
//!
//! # Brief summary
//!
//! - [`DynamicState`](crate::pipeline::DynamicState) is the closed set of aspects that can be
//!   dynamic. [`DynamicState::describe`](crate::pipeline::DynamicState::describe) tells you the
//!   command that sets each one and the features or extensions it requires.
//!
//! - [`DeviceCapabilities`](crate::device::DeviceCapabilities) describes what the device
//!   supports. It is supplied by the caller; this crate never talks to a driver.
//!
//! - [`GraphicsPipeline`](crate::pipeline::graphics::GraphicsPipeline),
//!   [`RayTracingPipeline`](crate::pipeline::ray_tracing::RayTracingPipeline) and
//!   [`ShaderObject`](crate::shader::ShaderObject) describe what can be bound.
//!
//! - [`CommandRecorder`](crate::command_buffer::CommandRecorder) is a recording session. Its
//!   `set_*` methods record dynamic state, its `bind_*` methods bind pipelines or shader objects,
//!   and [`validate`](crate::command_buffer::CommandRecorder::validate) runs the rules at a draw
//!   or trace location.
//!
//! - Violations are reported as [`Diagnostic`](crate::diagnostic::Diagnostic)s to a
//!   [`DiagnosticSink`](crate::diagnostic::DiagnosticSink). Every rule has a stable identifier,
//!   the Vulkan VUID it enforces, which can be suppressed through
//!   [`ValidationSettings`](crate::diagnostic::ValidationSettings).
//!
//! Errors in the arguments of a recording command are returned immediately as
//! [`ValidationError`]s, the same way vulkano reports them.

pub use ash::vk::Handle;
use std::{
    borrow::Cow,
    error::Error,
    fmt::{Display, Error as FmtError, Formatter},
};
pub use version::Version;

#[macro_use]
mod macros;
pub mod command_buffer;
pub mod device;
pub mod diagnostic;
pub mod format;
pub mod image;
pub mod pipeline;
pub mod query;
pub mod shader;
#[cfg(test)]
mod tests;
pub mod validation;
mod version;

/// A helper type for non-exhaustive structs.
///
/// This type cannot be constructed outside this crate. Structures with a field of this type can
/// only be constructed by calling a constructor function or `Default::default()`. The effect is
/// similar to the standard Rust `#[non_exhaustive]` attribute, except that it does not prevent
/// update syntax from being used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)] // add traits as needed
pub struct NonExhaustive(pub(crate) ());

impl NonExhaustive {
    /// Used by `serde` to fill in skipped fields of structs that have no `Default`.
    #[cfg(feature = "serde")]
    pub(crate) const fn new() -> Self {
        Self(())
    }
}

/// The arguments or other context of a call to a recording or creation function violated a
/// validity rule.
#[derive(Clone, Debug, Default)]
pub struct ValidationError {
    /// The context in which the problem exists (e.g. a specific parameter).
    pub context: Cow<'static, str>,

    /// A description of the problem.
    pub problem: Cow<'static, str>,

    /// If applicable, settings that the user could enable to avoid the problem in the future.
    pub requires_one_of: RequiresOneOf,

    /// *Valid Usage IDs* (VUIDs) in the Vulkan specification that relate to the problem.
    pub vuids: &'static [&'static str],
}

impl ValidationError {
    /// Prepends `context` to the existing context, separated by a `.`.
    pub(crate) fn add_context(
        mut self: Box<Self>,
        context: impl Into<Cow<'static, str>>,
    ) -> Box<Self> {
        if self.context.is_empty() {
            self.context = context.into();
        } else {
            self.context = format!("{}.{}", context.into(), self.context).into();
        }

        self
    }

    /// Replaces the VUIDs with a set that is specific to the calling command.
    pub(crate) fn set_vuids(mut self: Box<Self>, vuids: &'static [&'static str]) -> Box<Self> {
        self.vuids = vuids;
        self
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        if self.context.is_empty() {
            write!(f, "{}", self.problem)?;
        } else {
            write!(f, "{}: {}", self.context, self.problem)?;
        }

        if !self.requires_one_of.is_empty() {
            if self.context.is_empty() && self.problem.is_empty() {
                write!(f, "{}", self.requires_one_of)?;
            } else {
                write!(f, " -- {}", self.requires_one_of)?;
            }
        }

        if !self.vuids.is_empty() {
            write!(f, " (Vulkan VUIDs: {}", self.vuids[0])?;

            for vuid in &self.vuids[1..] {
                write!(f, ", {}", vuid)?;
            }

            write!(f, ")")?;
        }

        Ok(())
    }
}

impl Error for ValidationError {}

/// Used in errors to indicate a set of alternatives that needs to be available/enabled to allow
/// a given operation.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct RequiresOneOf(pub &'static [RequiresAllOf]);

impl RequiresOneOf {
    /// Returns the number of alternatives.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are any alternatives.
    ///
    /// An empty `RequiresOneOf` means the operation is part of core Vulkan 1.0.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for RequiresOneOf {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        Display::fmt(self, f)
    }
}

impl Display for RequiresOneOf {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "requires one of: ")?;

        if let Some((first, rest)) = self.0.split_first() {
            if first.0.len() > 1 {
                write!(f, "({})", first)?;
            } else {
                write!(f, "{}", first)?;
            }

            for rest in rest {
                if rest.0.len() > 1 {
                    write!(f, " or ({})", rest)?;
                } else {
                    write!(f, " or {}", rest)?;
                }
            }
        }

        Ok(())
    }
}

/// Used in errors to indicate a set of requirements that all need to be available/enabled to
/// allow a given operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequiresAllOf(pub &'static [Requires]);

impl Display for RequiresAllOf {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        if let Some((first, rest)) = self.0.split_first() {
            write!(f, "{}", first)?;

            for rest in rest {
                write!(f, " + {}", rest)?;
            }
        }

        Ok(())
    }
}

/// Something that needs to be supported or enabled to allow a particular operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requires {
    APIVersion(Version),
    DeviceFeature(&'static str),
    DeviceExtension(&'static str),
}

impl Display for Requires {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Requires::APIVersion(Version { major, minor, .. }) => {
                write!(f, "Vulkan API version {}.{}", major, minor)
            }
            Requires::DeviceFeature(device_feature) => {
                write!(f, "device feature `{}`", device_feature)
            }
            Requires::DeviceExtension(device_extension) => {
                write!(f, "device extension `{}`", device_extension)
            }
        }
    }
}
