//! Named image lists for interactive split/merge front ends.
//!
//! A UI keeps one [`MergeQueue`] for the images the user has dropped in
//! and gets a [`SplitOutput`] back from [`split_image`]. Button state is
//! read from queries such as [`MergeQueue::can_merge`] after every change
//! instead of being tracked in flags.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::buffer::{Image, PixelBuffer};
use crate::error::StripError;
use crate::geometry::{StripOrientation, StripPolicy};
use crate::merge::merge;
use crate::split::split;

/// Default file stem for a merged strip.
pub const MERGED_DEFAULT_NAME: &str = "MergedImage";

/// An image with a display name (usually the file stem).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub image: Image,
}

impl AsRef<PixelBuffer> for Entry {
    fn as_ref(&self) -> &PixelBuffer {
        &self.image.buffer
    }
}

impl AsRef<Image> for Entry {
    fn as_ref(&self) -> &Image {
        &self.image
    }
}

/// Ordered images waiting to be merged. List order is strip order.
#[derive(Clone, Debug, Default)]
pub struct MergeQueue {
    entries: Vec<Entry>,
    policy: StripPolicy,
}

impl MergeQueue {
    pub fn new(policy: StripPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &StripPolicy {
        &self.policy
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append at the end of the list.
    pub fn push(&mut self, name: impl Into<String>, image: Image) {
        self.entries.push(Entry {
            name: name.into(),
            image,
        });
    }

    pub fn remove(&mut self, index: usize) -> Option<Entry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop the entry at `dragged` into the gap before row `drop_row`
    /// (`drop_row == len()` is the gap after the last row), the way a
    /// table view reports an internal drag.
    ///
    /// Returns `false` and leaves the list alone if either index is out of
    /// range.
    pub fn move_entry(&mut self, dragged: usize, drop_row: usize) -> bool {
        if dragged >= self.entries.len() || drop_row > self.entries.len() {
            return false;
        }
        let entry = self.entries.remove(dragged);
        let dest = if dragged < drop_row {
            drop_row - 1
        } else {
            drop_row
        };
        self.entries.insert(dest, entry);
        true
    }

    /// At least two images are queued.
    pub fn can_merge(&self) -> bool {
        self.entries.len() >= 2
    }

    /// There is an entry to remove.
    pub fn can_remove(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Merge every queued image, in list order.
    pub fn merge(&self, orientation: StripOrientation) -> Result<Image, StripError> {
        merge_images(&self.entries, orientation, &self.policy)
    }
}

/// Validate and merge `images` in slice order, keeping their shared format.
pub fn merge_images<I>(
    images: &[I],
    orientation: StripOrientation,
    policy: &StripPolicy,
) -> Result<Image, StripError>
where
    I: AsRef<Image> + AsRef<PixelBuffer>,
{
    policy.validate_merge_formats(images.iter().map(|i| &AsRef::<Image>::as_ref(i).format))?;
    let geometry = policy.validate_merge(images, orientation)?;
    let buffer = merge(images, orientation, &geometry)?;
    let format = AsRef::<Image>::as_ref(&images[0]).format.clone();
    Image::new(buffer, format)
}

/// Tiles cut from one strip, named `image0`, `image1`, ...
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitOutput {
    pub orientation: StripOrientation,
    pub tiles: Vec<Entry>,
}

impl SplitOutput {
    /// There is something to save.
    pub fn can_save(&self) -> bool {
        !self.tiles.is_empty()
    }

    /// `image{i}.{extension}` for every tile, in strip order.
    pub fn file_names(&self, extension: &str) -> Vec<String> {
        self.tiles
            .iter()
            .map(|t| format!("{}.{extension}", t.name))
            .collect()
    }
}

/// Validate and split `strip`. Every tile keeps the strip's pixel format.
pub fn split_image(strip: &Image, policy: &StripPolicy) -> Result<SplitOutput, StripError> {
    let geometry = policy.validate_split(&strip.buffer)?;
    let buffers = split(&strip.buffer, &geometry)?;
    let tiles = buffers
        .into_iter()
        .enumerate()
        .map(|(i, buffer)| {
            Ok(Entry {
                name: format!("image{i}"),
                image: Image::new(buffer, strip.format.clone())?,
            })
        })
        .collect::<Result<Vec<_>, StripError>>()?;
    Ok(SplitOutput {
        orientation: geometry.orientation(),
        tiles,
    })
}
