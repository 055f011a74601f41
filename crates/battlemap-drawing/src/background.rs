//! Background image references. Only the file path and where the image is
//! placed are kept; pixels are the renderer's business.

use std::io::{BufRead, Write};

use battlemap_core::{BoundingRect, SerializationError, ShapeError};

use crate::serialization::{check_representable, MapDataReader, MapDataWriter};

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pub path: String,
    pub placement: BoundingRect,
}

impl BackgroundImage {
    pub fn new(path: impl Into<String>, placement: BoundingRect) -> Self {
        Self {
            path: path.into(),
            placement,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundImages {
    images: Vec<BackgroundImage>,
}

impl BackgroundImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an image reference. A blank or multi-line path is rejected.
    pub fn add(&mut self, image: BackgroundImage) -> Result<(), ShapeError> {
        check_representable("image path", &image.path)?;
        self.images.push(image);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<BackgroundImage> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    pub fn images(&self) -> &[BackgroundImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn bounding_rect(&self) -> BoundingRect {
        self.images
            .iter()
            .fold(BoundingRect::empty(), |acc, image| acc.union(&image.placement))
    }

    pub fn serialize<W: Write>(&self, out: &mut MapDataWriter<W>) -> Result<(), SerializationError> {
        out.start_array()?;
        for image in &self.images {
            out.start_object()?;
            out.write_string(&image.path)?;
            out.write_float(image.placement.left)?;
            out.write_float(image.placement.top)?;
            out.write_float(image.placement.right)?;
            out.write_float(image.placement.bottom)?;
            out.end_object()?;
        }
        out.end_array()
    }

    pub fn deserialize<R: BufRead>(input: &mut MapDataReader<R>) -> Result<Self, SerializationError> {
        let depth = input.expect_array_start()?;
        let mut images = Vec::new();
        while input.has_more_array_items(depth)? {
            input.expect_object_start()?;
            let path = input.read_string()?;
            let placement = BoundingRect::new(
                input.read_float()?,
                input.read_float()?,
                input.read_float()?,
                input.read_float()?,
            );
            input.expect_object_end()?;
            images.push(BackgroundImage { path, placement });
        }
        input.expect_array_end()?;
        Ok(Self { images })
    }
}
