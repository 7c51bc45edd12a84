// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Checks that the effective values agree with each other, with the bound shaders, with the
//! attachments of the current render pass instance and with the device.
//!
//! Each family of rules reports at most one diagnostic per rule. Rules that look at indexed
//! state report the lowest index that is wrong.

mod attachment;
mod capability;
mod conditional;
mod numeric;
mod reflection;
mod topology;

use super::resolve::EffectiveView;
use crate::{
    diagnostic::Emitter,
    pipeline::{DynamicState, DynamicStateSet},
};
use smallvec::SmallVec;

/// Runs every family of rules. Returns the states that are only required because of another
/// effective value, and that were not set.
pub(super) fn check(view: &EffectiveView<'_>, emitter: &mut Emitter<'_>) -> DynamicStateSet {
    let missing = conditional::check(view, emitter);
    numeric::check(view, emitter);
    attachment::check(view, emitter);
    topology::check(view, emitter);
    reflection::check(view, emitter);
    capability::check(view, emitter);

    missing
}

/// Returns the indices below `count` of the indexed `state` that were not set since the last
/// bind.
fn missing_indices(
    view: &EffectiveView<'_>,
    state: DynamicState,
    count: u32,
) -> SmallVec<[u32; 4]> {
    (0..count)
        .filter(|&index| !view.is_index_set(state, index))
        .collect()
}
