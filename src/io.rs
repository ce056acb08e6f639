//! File-system helpers (`std` feature).

use std::path::{Path, PathBuf};
use std::string::String;
use std::vec::Vec;

use enough::Stop;

use crate::buffer::Image;
use crate::decode::{DecodeOutput, DecodeRequest};
use crate::encode::{EncodeRequest, TargetFormat};
use crate::error::StripError;
use crate::limits::Limits;
use crate::session::{MERGED_DEFAULT_NAME, MergeQueue, SplitOutput};

/// Read and decode `path`. Returns the file stem as a display name.
pub fn read_image(
    path: impl AsRef<Path>,
    limits: Option<&Limits>,
    stop: impl Stop,
) -> Result<(String, DecodeOutput), StripError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let mut request = DecodeRequest::new(&data);
    if let Some(limits) = limits {
        request = request.with_limits(limits);
    }
    let decoded = request.decode(stop)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((name, decoded))
}

/// Encode `image` to `path` with its extension replaced by the target's.
/// Returns the path actually written.
pub fn write_image(
    path: impl AsRef<Path>,
    image: &Image,
    target: TargetFormat,
    stop: impl Stop,
) -> Result<PathBuf, StripError> {
    let path = path.as_ref().with_extension(target.extension());
    let bytes = EncodeRequest::new(target).encode(image, stop)?;
    std::fs::write(&path, bytes)?;
    Ok(path)
}

impl MergeQueue {
    /// Decode `path` and append it, named after the file stem.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        stop: impl Stop,
    ) -> Result<(), StripError> {
        let limits = (!self.policy().limits.is_unbounded()).then(|| self.policy().limits.clone());
        let (name, decoded) = read_image(path, limits.as_ref(), stop)?;
        self.push(name, decoded.into_image());
        Ok(())
    }
}

impl SplitOutput {
    /// Write every tile to `dir` as `image{i}.{ext}`. Stops at the first
    /// failure; tiles already written stay on disk.
    pub fn save_all(
        &self,
        dir: impl AsRef<Path>,
        target: TargetFormat,
        stop: impl Stop,
    ) -> Result<Vec<PathBuf>, StripError> {
        let dir = dir.as_ref();
        let request = EncodeRequest::new(target);
        let mut written = Vec::with_capacity(self.tiles.len());
        for (tile, file_name) in self.tiles.iter().zip(self.file_names(target.extension())) {
            let path = dir.join(file_name);
            let bytes = request.encode_dyn(&tile.image, &stop)?;
            std::fs::write(&path, bytes)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// `dir/MergedImage.{ext}` for `target`.
pub fn merged_image_path(dir: impl AsRef<Path>, target: TargetFormat) -> PathBuf {
    dir.as_ref()
        .join(MERGED_DEFAULT_NAME)
        .with_extension(target.extension())
}
