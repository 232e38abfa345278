//! Scene collaborator: the registry of items the rendering layer draws.
//!
//! The landmark model only needs to tell the scene which groups and markers
//! exist. [`LabelerScene`] is the concrete scene used by the tool; it also
//! tracks the background photograph, whose size becomes the scene rect.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_SCENE_HEIGHT, DEFAULT_SCENE_WIDTH};
use crate::format::FormatError;
use crate::model::{GroupId, MarkerHandle, Point, Rect};

/// Something the scene renders and delivers input to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneItem {
    /// A group outline.
    Group(GroupId),
    /// A single marker.
    Marker(MarkerHandle),
}

/// Item registration interface consumed by the landmark model.
pub trait Scene {
    /// Register an item for rendering.
    fn add_item(&mut self, item: SceneItem);

    /// Unregister an item. Returns false if it was not registered.
    fn remove_item(&mut self, item: SceneItem) -> bool;

    /// Whether the item is currently registered.
    fn contains_item(&self, item: &SceneItem) -> bool;

    /// Number of registered items.
    fn item_count(&self) -> usize;
}

/// Background photograph shown under the landmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Scene holding the photograph and the landmark items.
#[derive(Debug, Clone)]
pub struct LabelerScene {
    items: HashSet<SceneItem>,
    rect: Rect,
    image: Option<BackgroundImage>,
}

impl LabelerScene {
    pub fn new() -> Self {
        Self {
            items: HashSet::new(),
            rect: Rect::new(0.0, 0.0, DEFAULT_SCENE_WIDTH, DEFAULT_SCENE_HEIGHT),
            image: None,
        }
    }

    pub fn scene_rect(&self) -> Rect {
        self.rect
    }

    pub fn image(&self) -> Option<&BackgroundImage> {
        self.image.as_ref()
    }

    /// Load the background photograph. The scene rect follows the image size.
    ///
    /// On failure the current image and rect are kept.
    pub fn set_image(&mut self, path: impl AsRef<Path>) -> Result<&BackgroundImage, FormatError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FormatError::ImageNotFound {
                path: path.to_path_buf(),
            });
        }
        let (width, height) = image::image_dimensions(path)?;
        if width == 0 || height == 0 {
            return Err(FormatError::invalid_format(format!(
                "image {} has no pixels",
                path.display()
            )));
        }

        log::info!("Loaded image {:?} ({}x{})", path, width, height);
        self.rect = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        Ok(self.image.insert(BackgroundImage {
            path: path.to_path_buf(),
            width,
            height,
        }))
    }

    /// Drop the photograph and return to the default scene rect.
    pub fn clear_image(&mut self) {
        self.image = None;
        self.rect = Rect::new(0.0, 0.0, DEFAULT_SCENE_WIDTH, DEFAULT_SCENE_HEIGHT);
    }

    /// Whether a point lies on the scene (the photograph, if one is loaded).
    pub fn contains_point(&self, p: &Point) -> bool {
        self.rect.contains(p)
    }

    pub fn marker_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, SceneItem::Marker(_)))
            .count()
    }

    pub fn group_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, SceneItem::Group(_)))
            .count()
    }
}

impl Default for LabelerScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for LabelerScene {
    fn add_item(&mut self, item: SceneItem) {
        if !self.items.insert(item) {
            log::warn!("Scene item {:?} was already registered", item);
        }
    }

    fn remove_item(&mut self, item: SceneItem) -> bool {
        self.items.remove(&item)
    }

    fn contains_item(&self, item: &SceneItem) -> bool {
        self.items.contains(item)
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }
}
