// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Image properties that the rasterization rules depend on.

use crate::macros::{vulkan_bitflags, vulkan_bitflags_enum};

vulkan_bitflags_enum! {
    #[non_exhaustive]

    /// A set of [`SampleCount`] values.
    SampleCounts,

    /// The number of samples per texel of an image.
    SampleCount impl {
        /// Returns the number of samples as an integer.
        #[inline]
        pub const fn count(self) -> u32 {
            self as u32
        }
    },

    = SampleCountFlags(u32);

    /// 1 sample per texel.
    SAMPLE_1, Sample1 = TYPE_1,

    /// 2 samples per texel.
    SAMPLE_2, Sample2 = TYPE_2,

    /// 4 samples per texel.
    SAMPLE_4, Sample4 = TYPE_4,

    /// 8 samples per texel.
    SAMPLE_8, Sample8 = TYPE_8,

    /// 16 samples per texel.
    SAMPLE_16, Sample16 = TYPE_16,

    /// 32 samples per texel.
    SAMPLE_32, Sample32 = TYPE_32,

    /// 64 samples per texel.
    SAMPLE_64, Sample64 = TYPE_64,
}

impl SampleCounts {
    /// Returns the maximum sample count in `self`.
    #[inline]
    pub const fn max_count(self) -> SampleCount {
        if self.intersects(SampleCounts::SAMPLE_64) {
            SampleCount::Sample64
        } else if self.intersects(SampleCounts::SAMPLE_32) {
            SampleCount::Sample32
        } else if self.intersects(SampleCounts::SAMPLE_16) {
            SampleCount::Sample16
        } else if self.intersects(SampleCounts::SAMPLE_8) {
            SampleCount::Sample8
        } else if self.intersects(SampleCounts::SAMPLE_4) {
            SampleCount::Sample4
        } else if self.intersects(SampleCounts::SAMPLE_2) {
            SampleCount::Sample2
        } else {
            SampleCount::Sample1
        }
    }
}

impl Default for SampleCount {
    #[inline]
    fn default() -> Self {
        SampleCount::Sample1
    }
}

vulkan_bitflags! {
    /// A set of aspects of an image.
    ImageAspects
    impl {
        /// Both the depth and the stencil aspect.
        pub const DEPTH_STENCIL: Self = Self::DEPTH.union(Self::STENCIL);
    }
    = ImageAspectFlags(u32);

    /// The single aspect of images with a color format.
    COLOR = COLOR,

    /// The depth component of a depth/stencil image.
    DEPTH = DEPTH,

    /// The stencil component of a depth/stencil image.
    STENCIL = STENCIL,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_value() {
        assert_eq!(SampleCount::Sample1.count(), 1);
        assert_eq!(SampleCount::Sample4.count(), 4);
        assert_eq!(SampleCount::Sample64.count(), 64);
    }

    #[test]
    fn sample_counts_iter() {
        let counts = SampleCounts::SAMPLE_1 | SampleCounts::SAMPLE_4;
        assert!(counts.contains_enum(SampleCount::Sample4));
        assert!(!counts.contains_enum(SampleCount::Sample2));
        assert_eq!(counts.max_count(), SampleCount::Sample4);
        assert_eq!(
            counts.into_iter().collect::<Vec<_>>(),
            [SampleCount::Sample1, SampleCount::Sample4],
        );
    }
}
