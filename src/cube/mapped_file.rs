//! # Memory-mapped raw cube files
//!
//! [`MappedCube`] maps a headerless file of native-endian `f32` pixels read-only and
//! lends the volume to a [`Cube`]. The operating system pages the data in on demand, so
//! cubes larger than RAM stay addressable as an ordinary slice.
//!
//! The element size reported by the producer of the file must match the pixel type
//! (`size_of::<f32>()` bytes) and the file length must match the declared extents;
//! both are checked before any pixel is read.
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use cubescan::cube::{mapped_file::MappedCube, FrameMetadata};
//!
//! # fn run() -> Result<(), cubescan::cubescan_errors::CubeScanError> {
//! let mapped = MappedCube::open(Utf8Path::new("cube.raw"), 2048, 4096, 60, 4)?;
//! let cube = mapped.cube(FrameMetadata::uniform(60))?;
//! # Ok(()) }
//! ```
use std::{
    fs::File,
    io::{BufWriter, Write},
    mem::size_of,
};

use camino::Utf8Path;
use memmap2::Mmap;
use tracing::info;

use crate::{
    constants::Pixel,
    cube::{volume_len, Cube, FrameMetadata},
    cubescan_errors::CubeScanError,
};

/// Owner of a read-only mapping of a raw pixel volume.
#[derive(Debug)]
pub struct MappedCube {
    mmap: Mmap,
    size_x: usize,
    size_y: usize,
    size_k: usize,
}

impl MappedCube {
    /// Map a raw cube file.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: file holding `size_x · size_y · size_k` pixels, frame after frame.
    /// * `size_x`, `size_y`, `size_k`: extents of the volume.
    /// * `byte_per_element`: element size declared by the producer of the file.
    ///
    /// Return
    /// ----------
    /// * The mapping, or
    ///   [`CubeScanError::PixelTypeMismatch`] if `byte_per_element` is not the pixel size,
    ///   [`CubeScanError::CubeExtentsOverflow`] if the extents overflow the address space,
    ///   [`CubeScanError::CubeSizeMismatch`] if the file length disagrees with the extents,
    ///   [`CubeScanError::UnreadableFile`] if the file cannot be opened or mapped.
    pub fn open(
        path: &Utf8Path,
        size_x: usize,
        size_y: usize,
        size_k: usize,
        byte_per_element: usize,
    ) -> Result<Self, CubeScanError> {
        if byte_per_element != size_of::<Pixel>() {
            return Err(CubeScanError::PixelTypeMismatch {
                expected: size_of::<Pixel>(),
                found: byte_per_element,
            });
        }
        if size_x == 0 || size_y == 0 || size_k == 0 {
            return Err(CubeScanError::EmptyCube(size_x, size_y, size_k));
        }
        let expected = volume_len(size_x, size_y, size_k)?
            .checked_mul(size_of::<Pixel>())
            .ok_or(CubeScanError::CubeExtentsOverflow(size_x, size_y, size_k))?
            as u64;

        let unreadable = |source| CubeScanError::UnreadableFile {
            path: path.to_string(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;
        let found = file.metadata().map_err(unreadable)?.len();
        if found != expected {
            return Err(CubeScanError::CubeSizeMismatch {
                path: path.to_string(),
                expected,
                found,
            });
        }

        // The mapping is read-only; the file must not be truncated while mapped.
        let mmap = unsafe { Mmap::map(&file).map_err(unreadable)? };

        info!(
            %path,
            size_x,
            size_y,
            size_k,
            bytes = found,
            "mapped cube file"
        );

        Ok(MappedCube {
            mmap,
            size_x,
            size_y,
            size_k,
        })
    }

    /// Extents of the mapped volume as `(size_x, size_y, size_k)`.
    pub fn size(&self) -> (usize, usize, usize) {
        (self.size_x, self.size_y, self.size_k)
    }

    /// The mapped pixels.
    pub fn pixels(&self) -> Result<&[Pixel], CubeScanError> {
        bytemuck::try_cast_slice(&self.mmap[..]).map_err(|_| CubeScanError::MisalignedCube)
    }

    /// Borrow the mapped volume as a [`Cube`] described by `metadata`.
    pub fn cube(&self, metadata: FrameMetadata) -> Result<Cube<'_>, CubeScanError> {
        Cube::new(
            self.size_x,
            self.size_y,
            self.size_k,
            self.pixels()?,
            metadata,
        )
    }
}

/// Write `pixels` as a raw native-endian cube file readable by [`MappedCube::open`].
pub fn write_raw_cube(path: &Utf8Path, pixels: &[Pixel]) -> Result<(), CubeScanError> {
    let file = File::create(path).map_err(|source| CubeScanError::UnreadableFile {
        path: path.to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytemuck::cast_slice(pixels))?;
    writer.flush()?;
    Ok(())
}
