use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use crate::field::EncodedTexture;
use crate::foundation::core::{RasterSize, Rect};
use crate::foundation::error::{GlassError, GlassResult};
use crate::host::blur::gaussian_blur;
use crate::host::raster::{self, PixelRegion};
use crate::host::{EventSource, FilterHandle, GlassHost, GlassStyle, ListenerId, TargetId};

/// A displacement filter registered with a [`SoftwareHost`].
#[derive(Clone, Debug)]
pub struct FilterRecord {
    /// Name the effect registered the filter under.
    pub id: String,
    /// Declared raster region.
    pub size: RasterSize,
    /// Current texture, if one was pushed.
    pub texture: Option<EncodedTexture>,
    /// Current displacement scale.
    pub scale: f64,
    /// Number of texture replacements received.
    pub texture_uploads: u64,
}

/// Style currently applied to a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedStyle {
    /// The treatment.
    pub style: GlassStyle,
    /// Filter chained into it.
    pub filter: FilterHandle,
    /// Resolved CSS declarations, as a browser host would set them.
    pub declarations: Vec<(&'static str, String)>,
}

#[derive(Clone, Debug)]
struct Surface {
    bounds: Rect,
    style: Option<AppliedStyle>,
}

/// In-process host that keeps surfaces, filters and listeners in memory and can composite a
/// styled surface over a backdrop on the CPU.
#[derive(Debug)]
pub struct SoftwareHost {
    next_id: u64,
    surfaces: HashMap<TargetId, Surface>,
    filters: HashMap<FilterHandle, FilterRecord>,
    listeners: HashMap<ListenerId, EventSource>,
    filters_supported: bool,
}

impl Default for SoftwareHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareHost {
    /// Empty host with filter support.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            surfaces: HashMap::new(),
            filters: HashMap::new(),
            listeners: HashMap::new(),
            filters_supported: true,
        }
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Register a surface occupying `bounds`.
    pub fn add_surface(&mut self, bounds: Rect) -> TargetId {
        let id = TargetId(self.alloc_id());
        self.surfaces.insert(
            id,
            Surface {
                bounds,
                style: None,
            },
        );
        id
    }

    /// Move or resize a surface. The caller dispatches the resize event.
    pub fn set_surface_rect(&mut self, target: TargetId, bounds: Rect) -> GlassResult<()> {
        let surface = self.surface_mut(target)?;
        surface.bounds = bounds;
        Ok(())
    }

    /// Toggle availability of the displacement filter primitive.
    pub fn set_filters_supported(&mut self, supported: bool) {
        self.filters_supported = supported;
    }

    /// Registered filter, if any.
    pub fn filter(&self, handle: FilterHandle) -> Option<&FilterRecord> {
        self.filters.get(&handle)
    }

    /// Number of registered filters.
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Style applied to `target`, if any.
    pub fn applied_style(&self, target: TargetId) -> Option<&AppliedStyle> {
        self.surfaces.get(&target).and_then(|s| s.style.as_ref())
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of live listeners on `source`.
    pub fn listeners_on(&self, source: EventSource) -> usize {
        self.listeners.values().filter(|&&s| s == source).count()
    }

    fn surface(&self, target: TargetId) -> GlassResult<&Surface> {
        self.surfaces
            .get(&target)
            .ok_or_else(|| GlassError::host(format!("unknown target {target:?}")))
    }

    fn surface_mut(&mut self, target: TargetId) -> GlassResult<&mut Surface> {
        self.surfaces
            .get_mut(&target)
            .ok_or_else(|| GlassError::host(format!("unknown target {target:?}")))
    }

    fn filter_mut(&mut self, handle: FilterHandle) -> GlassResult<&mut FilterRecord> {
        self.filters
            .get_mut(&handle)
            .ok_or_else(|| GlassError::host(format!("unknown filter {handle:?}")))
    }

    /// Render `backdrop` with `target`'s glass treatment painted over the target's bounds.
    ///
    /// Unstyled targets leave the backdrop untouched. The shadow is recorded in the style but
    /// not rasterized.
    #[tracing::instrument(level = "debug", skip(self, backdrop))]
    pub fn composite(&self, target: TargetId, backdrop: &RgbaImage) -> GlassResult<RgbaImage> {
        let surface = self.surface(target)?;
        let mut out = backdrop.clone();
        let Some(applied) = &surface.style else {
            return Ok(out);
        };
        let filter = self
            .filters
            .get(&applied.filter)
            .ok_or_else(|| GlassError::host("styled target references a removed filter"))?;

        let (bw, bh) = backdrop.dimensions();
        let region = PixelRegion::covering(surface.bounds, bw, bh)?;
        let style = &applied.style;

        let mut panel = match &filter.texture {
            Some(tex) => raster::displace(backdrop, region, tex, filter.scale),
            None => {
                image::imageops::crop_imm(backdrop, region.x, region.y, region.width, region.height)
                    .to_image()
            }
        };
        panel = gaussian_blur(&panel, style.blur_px)?;
        for p in panel.pixels_mut() {
            *p = Rgba(raster::adjust_color(
                p.0,
                style.contrast,
                style.brightness,
                style.saturate,
            ));
        }
        raster::fill_over(&mut panel, style.tint);
        raster::stroke_border(&mut panel, style.border_px, style.border);

        image::imageops::replace(&mut out, &panel, i64::from(region.x), i64::from(region.y));
        Ok(out)
    }
}

impl GlassHost for SoftwareHost {
    fn bounding_box(&self, target: TargetId) -> GlassResult<Rect> {
        Ok(self.surface(target)?.bounds)
    }

    fn create_displacement_filter(
        &mut self,
        id: &str,
        width: u32,
        height: u32,
    ) -> GlassResult<FilterHandle> {
        if !self.filters_supported {
            return Err(GlassError::host("displacement filters are not supported"));
        }
        let size = RasterSize::new(width, height)?;
        let handle = FilterHandle(self.alloc_id());
        self.filters.insert(
            handle,
            FilterRecord {
                id: id.to_string(),
                size,
                texture: None,
                scale: 0.0,
                texture_uploads: 0,
            },
        );
        tracing::trace!(?handle, id, width, height, "filter created");
        Ok(handle)
    }

    fn resize_filter(&mut self, handle: FilterHandle, width: u32, height: u32) -> GlassResult<()> {
        let size = RasterSize::new(width, height)?;
        self.filter_mut(handle)?.size = size;
        Ok(())
    }

    fn set_filter_texture(
        &mut self,
        handle: FilterHandle,
        texture: &EncodedTexture,
    ) -> GlassResult<()> {
        let record = self.filter_mut(handle)?;
        if texture.size() != record.size {
            return Err(GlassError::host(format!(
                "texture {}x{} does not match filter region {}x{}",
                texture.size().width,
                texture.size().height,
                record.size.width,
                record.size.height
            )));
        }
        record.texture = Some(texture.clone());
        record.texture_uploads += 1;
        Ok(())
    }

    fn set_filter_scale(&mut self, handle: FilterHandle, scale: f64) -> GlassResult<()> {
        if !scale.is_finite() {
            return Err(GlassError::host("filter scale must be finite"));
        }
        self.filter_mut(handle)?.scale = scale;
        Ok(())
    }

    fn remove_filter(&mut self, handle: FilterHandle) {
        if self.filters.remove(&handle).is_some() {
            tracing::trace!(?handle, "filter removed");
        }
    }

    fn apply_style(
        &mut self,
        target: TargetId,
        style: &GlassStyle,
        handle: FilterHandle,
    ) -> GlassResult<()> {
        let filter_id = self
            .filters
            .get(&handle)
            .map(|f| f.id.clone())
            .ok_or_else(|| GlassError::host(format!("unknown filter {handle:?}")))?;
        let surface = self.surface_mut(target)?;
        surface.style = Some(AppliedStyle {
            style: style.clone(),
            filter: handle,
            declarations: style.css_declarations(&filter_id),
        });
        Ok(())
    }

    fn clear_style(&mut self, target: TargetId) {
        if let Some(surface) = self.surfaces.get_mut(&target) {
            surface.style = None;
        }
    }

    fn subscribe(&mut self, source: EventSource) -> GlassResult<ListenerId> {
        if let EventSource::PointerMove(target) = source {
            self.surface(target)?;
        }
        let id = ListenerId(self.alloc_id());
        self.listeners.insert(id, source);
        Ok(id)
    }

    fn unsubscribe(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/software.rs"]
mod tests;
