use std::sync::Arc;

use super::*;
use crate::foundation::core::Rect;
use crate::foundation::error::GlassError;
use crate::host::{GlassStyle, SoftwareHost};
use crate::shape::{Identity, LensConfig, RoundedRectLens};

fn lens(follow_pointer: bool) -> SharedShape {
    Arc::new(
        RoundedRectLens::new(LensConfig {
            follow_pointer,
            ..LensConfig::default()
        })
        .unwrap(),
    )
}

/// Forwards to a [`SoftwareHost`], recording scale pushes and optionally refusing resizes.
struct RecordingHost {
    inner: SoftwareHost,
    scales: Vec<f64>,
    refuse_resize: bool,
}

impl GlassHost for RecordingHost {
    fn bounding_box(&self, target: TargetId) -> GlassResult<Rect> {
        self.inner.bounding_box(target)
    }

    fn create_displacement_filter(
        &mut self,
        id: &str,
        width: u32,
        height: u32,
    ) -> GlassResult<FilterHandle> {
        self.inner.create_displacement_filter(id, width, height)
    }

    fn resize_filter(&mut self, handle: FilterHandle, width: u32, height: u32) -> GlassResult<()> {
        if self.refuse_resize {
            return Err(GlassError::host("resize refused"));
        }
        self.inner.resize_filter(handle, width, height)
    }

    fn set_filter_texture(
        &mut self,
        handle: FilterHandle,
        texture: &EncodedTexture,
    ) -> GlassResult<()> {
        self.inner.set_filter_texture(handle, texture)
    }

    fn set_filter_scale(&mut self, handle: FilterHandle, scale: f64) -> GlassResult<()> {
        self.scales.push(scale);
        self.inner.set_filter_scale(handle, scale)
    }

    fn remove_filter(&mut self, handle: FilterHandle) {
        self.inner.remove_filter(handle);
    }

    fn apply_style(
        &mut self,
        target: TargetId,
        style: &GlassStyle,
        handle: FilterHandle,
    ) -> GlassResult<()> {
        self.inner.apply_style(target, style, handle)
    }

    fn clear_style(&mut self, target: TargetId) {
        self.inner.clear_style(target);
    }

    fn subscribe(&mut self, source: EventSource) -> GlassResult<ListenerId> {
        self.inner.subscribe(source)
    }

    fn unsubscribe(&mut self, listener: ListenerId) {
        self.inner.unsubscribe(listener);
    }
}

fn recording_host(w: f64, h: f64) -> (RecordingHost, TargetId) {
    let (inner, t) = host_with_target(w, h);
    let host = RecordingHost {
        inner,
        scales: Vec::new(),
        refuse_resize: false,
    };
    (host, t)
}

fn host_with_target(w: f64, h: f64) -> (SoftwareHost, TargetId) {
    let mut host = SoftwareHost::new();
    let t = host.add_surface(Rect::new(10.0, 20.0, 10.0 + w, 20.0 + h));
    (host, t)
}

#[test]
fn construction_registers_everything() {
    let (mut host, t) = host_with_target(100.0, 100.0);
    let fx = GlassEffect::new(&mut host, t, lens(false), GlassOptions::default()).unwrap();

    assert!(fx.id().starts_with("liquid-glass-"));
    assert_eq!(fx.size(), RasterSize::new(100, 100).unwrap());
    assert_eq!(fx.stats().regenerations, 1);
    assert!(!fx.is_pointer_dependent());

    let rec = host.filter(fx.filter()).unwrap();
    assert_eq!(rec.id, fx.filter_id());
    assert_eq!(rec.texture.as_ref(), fx.texture());
    assert_eq!(rec.scale, fx.texture().unwrap().filter_scale(1.0));
    assert_eq!(host.applied_style(t).unwrap().filter, fx.filter());
    assert_eq!(host.listeners_on(EventSource::PointerMove(t)), 1);
    assert_eq!(host.listeners_on(EventSource::Resize), 1);
}

#[test]
fn pointer_moves_skip_static_shapes() {
    let (mut host, t) = host_with_target(40.0, 30.0);
    let mut fx = GlassEffect::new(&mut host, t, lens(false), GlassOptions::default()).unwrap();
    for i in 0..5 {
        let moved = fx
            .on_pointer_move(&mut host, Point::new(15.0 + f64::from(i), 25.0))
            .unwrap();
        assert!(!moved);
    }
    assert_eq!(fx.stats().regenerations, 1);
    assert_eq!(fx.stats().pointer_events, 5);
    assert_eq!(host.filter(fx.filter()).unwrap().texture_uploads, 1);
}

#[test]
fn pointer_moves_regenerate_pointer_shapes_once_each() {
    let (mut host, t) = host_with_target(40.0, 30.0);
    let mut fx = GlassEffect::new(&mut host, t, lens(true), GlassOptions::default()).unwrap();
    assert!(fx.is_pointer_dependent());
    for i in 0..3u32 {
        assert!(
            fx.on_pointer_move(&mut host, Point::new(20.0 + f64::from(i), 35.0))
                .unwrap()
        );
        assert_eq!(fx.stats().regenerations, 2 + u64::from(i));
    }
    assert_eq!(fx.pointer(), PointerState::new(12.0 / 40.0, 0.5));
    assert_eq!(host.filter(fx.filter()).unwrap().texture_uploads, 4);
}

#[test]
fn resize_regenerates_static_shapes() {
    let (mut host, t) = host_with_target(100.0, 100.0);
    let mut fx = GlassEffect::new(&mut host, t, lens(false), GlassOptions::default()).unwrap();

    assert!(!fx.on_resize(&mut host).unwrap());
    assert_eq!(fx.stats().regenerations, 1);

    host.set_surface_rect(t, Rect::new(10.0, 20.0, 210.0, 120.0))
        .unwrap();
    assert!(fx.on_resize(&mut host).unwrap());
    assert_eq!(fx.stats().regenerations, 2);
    assert_eq!(fx.stats().resizes, 1);

    let rec = host.filter(fx.filter()).unwrap();
    assert_eq!(rec.size, RasterSize::new(200, 100).unwrap());
    assert_eq!(rec.texture.as_ref().unwrap().size().width, 200);
}

#[test]
fn pixel_ratio_scales_raster_and_filter_scale() {
    let (mut host, t) = host_with_target(50.0, 20.0);
    let opts = GlassOptions {
        pixel_ratio: 2.0,
        ..GlassOptions::default()
    };
    let fx = GlassEffect::new(&mut host, t, lens(false), opts).unwrap();
    assert_eq!(fx.size(), RasterSize::new(100, 40).unwrap());
    let rec = host.filter(fx.filter()).unwrap();
    assert_eq!(rec.scale, fx.texture().unwrap().max_scale());
}

#[test]
fn destroy_restores_target_and_is_idempotent() {
    let (mut host, t) = host_with_target(30.0, 30.0);
    let mut fx = GlassEffect::new(&mut host, t, lens(true), GlassOptions::default()).unwrap();
    fx.destroy(&mut host);

    assert!(fx.is_destroyed());
    assert!(fx.texture().is_none());
    assert!(host.applied_style(t).is_none());
    assert_eq!(host.filter_count(), 0);
    assert_eq!(host.listener_count(), 0);

    fx.destroy(&mut host);
    assert!(!fx.on_pointer_move(&mut host, Point::new(20.0, 30.0)).unwrap());
    assert!(!fx.on_resize(&mut host).unwrap());
    assert_eq!(fx.stats().regenerations, 1);
}

#[test]
fn missing_filter_support_leaves_target_untouched() {
    let (mut host, t) = host_with_target(30.0, 30.0);
    host.set_filters_supported(false);
    let err = GlassEffect::new(&mut host, t, Arc::new(Identity), GlassOptions::default())
        .unwrap_err();
    assert!(matches!(err, GlassError::Host(_)));
    assert!(host.applied_style(t).is_none());
    assert_eq!(host.listener_count(), 0);
}

#[test]
fn degenerate_geometry_is_a_configuration_error() {
    let (mut host, t) = host_with_target(0.0, 30.0);
    let err = GlassEffect::new(&mut host, t, Arc::new(Identity), GlassOptions::default())
        .unwrap_err();
    assert!(matches!(err, GlassError::Validation(_)));
    assert_eq!(host.filter_count(), 0);
}

#[test]
fn invalid_options_are_rejected_before_host_calls() {
    let (mut host, t) = host_with_target(30.0, 30.0);
    let opts = GlassOptions {
        pixel_ratio: 0.0,
        ..GlassOptions::default()
    };
    assert!(GlassEffect::new(&mut host, t, Arc::new(Identity), opts).is_err());
    assert_eq!(host.filter_count(), 0);
}

#[test]
fn options_parse_from_json() {
    let opts = GlassOptions::from_json_str(r#"{ "pixel_ratio": 2.0, "style": { "blur_px": 0.0 } }"#)
        .unwrap();
    assert_eq!(opts.pixel_ratio, 2.0);
    assert_eq!(opts.style.blur_px, 0.0);
    assert!(GlassOptions::from_json_str(r#"{ "pixel_ratio": -1.0 }"#).is_err());
}

#[test]
fn initial_scale_is_pushed_before_the_first_field() {
    let opts = GlassOptions::from_json_str(r#"{ "initial_scale": 7.5 }"#).unwrap();
    assert_eq!(opts.initial_scale, 7.5);
    assert_eq!(GlassOptions::default().initial_scale, 10.0);

    let (mut host, t) = recording_host(40.0, 40.0);
    let fx = GlassEffect::new(&mut host, t, lens(false), opts).unwrap();
    let field_scale = fx.texture().unwrap().filter_scale(1.0);
    assert_eq!(host.scales, vec![7.5, field_scale]);
    assert_eq!(host.inner.filter(fx.filter()).unwrap().scale, field_scale);

    assert!(GlassOptions::from_json_str(r#"{ "initial_scale": 1e400 }"#).is_err());
}

#[test]
fn refused_resize_keeps_previous_state() {
    let (mut host, t) = recording_host(40.0, 40.0);
    let mut fx = GlassEffect::new(&mut host, t, lens(false), GlassOptions::default()).unwrap();
    let before = fx.texture().cloned();

    host.refuse_resize = true;
    host.inner
        .set_surface_rect(t, Rect::new(10.0, 20.0, 90.0, 60.0))
        .unwrap();
    assert!(matches!(fx.on_resize(&mut host), Err(GlassError::Host(_))));
    assert_eq!(fx.size(), RasterSize::new(40, 40).unwrap());
    assert_eq!(fx.stats().regenerations, 1);
    assert_eq!(fx.stats().resizes, 0);
    assert_eq!(fx.texture().cloned(), before);

    host.refuse_resize = false;
    assert!(fx.on_resize(&mut host).unwrap());
    assert_eq!(fx.size(), RasterSize::new(80, 40).unwrap());
    assert_eq!(fx.stats().regenerations, 2);
}

#[test]
fn collapsed_target_keeps_last_texture() {
    let (mut host, t) = host_with_target(40.0, 40.0);
    let mut fx = GlassEffect::new(&mut host, t, lens(false), GlassOptions::default()).unwrap();
    let before = fx.texture().cloned();

    host.set_surface_rect(t, Rect::new(10.0, 20.0, 10.0, 20.0))
        .unwrap();
    assert!(!fx.on_resize(&mut host).unwrap());
    assert_eq!(fx.texture().cloned(), before);
    assert_eq!(fx.size(), RasterSize::new(40, 40).unwrap());

    host.set_surface_rect(t, Rect::new(10.0, 20.0, 50.0, 60.0))
        .unwrap();
    assert!(!fx.on_resize(&mut host).unwrap());
    assert_eq!(fx.stats().regenerations, 1);
}

#[test]
fn oversized_blur_is_rejected_at_construction() {
    let opts = GlassOptions::from_json_str(r#"{ "style": { "blur_px": 100.0 } }"#);
    assert!(matches!(opts, Err(GlassError::Validation(_))));
}
