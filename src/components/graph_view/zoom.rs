//! Pan/zoom controller bound to the rendering surface.
//!
//! The controller owns the current [`ViewTransform`] and turns pointer input
//! (wheel, drag, double click) into [`ZoomEvent`]s. It never touches the graph
//! model: the only consumer of an event is the nested group's `transform`
//! attribute.
//!
//! Wheel zoom follows the usual exponential mapping
//! `k' = k * 2^(-deltaY * f)`, where `f` depends on the wheel delta mode, and
//! keeps the point under the cursor fixed.

use super::layout::Point;

/// Affine pan/zoom transform: `translate(x, y) scale(k)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation.
	pub x: f64,
	/// Vertical translation.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	/// No translation, scale 1.
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// Value for the SVG `transform` attribute.
	pub fn to_attr(&self) -> String {
		format!("translate({},{}) scale({})", self.x, self.y, self.k)
	}

	/// Map a point from group space to surface space.
	pub fn apply(&self, p: Point) -> Point {
		(p.0 * self.k + self.x, p.1 * self.k + self.y)
	}

	/// Map a point from surface space back to group space.
	pub fn invert(&self, p: Point) -> Point {
		((p.0 - self.x) / self.k, (p.1 - self.y) / self.k)
	}

	/// Rescale to `k`, keeping the surface point `anchor` fixed.
	pub fn scale_about(&self, k: f64, anchor: Point) -> Self {
		let ratio = k / self.k;
		Self {
			x: anchor.0 - (anchor.0 - self.x) * ratio,
			y: anchor.1 - (anchor.1 - self.y) * ratio,
			k,
		}
	}
}

/// Unit of a wheel event's delta, as reported by the browser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WheelDeltaMode {
	/// `DOM_DELTA_PIXEL`.
	#[default]
	Pixel,
	/// `DOM_DELTA_LINE`.
	Line,
	/// `DOM_DELTA_PAGE`.
	Page,
}

impl WheelDeltaMode {
	/// From the DOM `WheelEvent.deltaMode` value.
	pub fn from_dom(mode: u32) -> Self {
		match mode {
			1 => WheelDeltaMode::Line,
			2 => WheelDeltaMode::Page,
			_ => WheelDeltaMode::Pixel,
		}
	}

	fn factor(self) -> f64 {
		match self {
			WheelDeltaMode::Pixel => 0.002,
			WheelDeltaMode::Line => 0.05,
			WheelDeltaMode::Page => 1.0,
		}
	}
}

/// Zoom behaviour configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomConfig {
	/// Allowed zoom range `(min_k, max_k)`.
	pub scale_extent: (f64, f64),
	/// Zoom multiplier applied by a double click.
	pub double_click_factor: f64,
	/// Wheel multiplier applied while Ctrl is held (pinch gestures).
	pub ctrl_wheel_boost: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			scale_extent: (0.1, 10.0),
			double_click_factor: 2.0,
			ctrl_wheel_boost: 10.0,
		}
	}
}

/// What produced a zoom event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomSource {
	/// Mouse wheel or trackpad.
	Wheel,
	/// Drag pan.
	Pan,
	/// Double click.
	DoubleClick,
	/// [`ZoomController::fit`].
	Fit,
	/// [`ZoomController::reset`].
	Reset,
}

/// Emitted whenever the transform changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomEvent {
	/// Transform after the change.
	pub transform: ViewTransform,
	/// Gesture that caused it.
	pub source: ZoomSource,
}

/// Tracks an in-progress surface pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Primary button held on the surface.
	pub active: bool,
	/// Pointer x when the drag began.
	pub start_x: f64,
	/// Pointer y when the drag began.
	pub start_y: f64,
	/// Transform x when the drag began.
	pub transform_start_x: f64,
	/// Transform y when the drag began.
	pub transform_start_y: f64,
}

/// Gesture handling for one rendering surface.
#[derive(Clone, Debug, Default)]
pub struct ZoomController {
	config: ZoomConfig,
	transform: ViewTransform,
	pan: PanState,
}

impl ZoomController {
	/// Controller at the identity transform.
	pub fn new(config: ZoomConfig) -> Self {
		Self {
			config,
			transform: ViewTransform::IDENTITY,
			pan: PanState::default(),
		}
	}

	/// Current transform.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Zoom configuration.
	pub fn config(&self) -> &ZoomConfig {
		&self.config
	}

	/// Whether a drag pan is in progress.
	pub fn is_panning(&self) -> bool {
		self.pan.active
	}

	fn clamp(&self, k: f64) -> f64 {
		let (min, max) = self.config.scale_extent;
		k.clamp(min, max)
	}

	fn emit(&mut self, transform: ViewTransform, source: ZoomSource) -> Option<ZoomEvent> {
		if transform == self.transform {
			return None;
		}
		self.transform = transform;
		Some(ZoomEvent { transform, source })
	}

	/// Zoom about `(x, y)` (surface coordinates) for one wheel step.
	pub fn wheel(
		&mut self,
		x: f64,
		y: f64,
		delta_y: f64,
		mode: WheelDeltaMode,
		ctrl: bool,
	) -> Option<ZoomEvent> {
		let boost = if ctrl { self.config.ctrl_wheel_boost } else { 1.0 };
		let exponent = -delta_y * mode.factor() * boost;
		let k = self.clamp(self.transform.k * 2f64.powf(exponent));
		let next = self.transform.scale_about(k, (x, y));
		self.emit(next, ZoomSource::Wheel)
	}

	/// Zoom in about `(x, y)`; zoom out instead when `shift` is held.
	pub fn double_click(&mut self, x: f64, y: f64, shift: bool) -> Option<ZoomEvent> {
		let factor = if shift {
			1.0 / self.config.double_click_factor
		} else {
			self.config.double_click_factor
		};
		let k = self.clamp(self.transform.k * factor);
		let next = self.transform.scale_about(k, (x, y));
		self.emit(next, ZoomSource::DoubleClick)
	}

	/// Start panning from `(x, y)`.
	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Continue an active pan.
	pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<ZoomEvent> {
		if !self.pan.active {
			return None;
		}
		let next = ViewTransform {
			x: self.pan.transform_start_x + (x - self.pan.start_x),
			y: self.pan.transform_start_y + (y - self.pan.start_y),
			k: self.transform.k,
		};
		self.emit(next, ZoomSource::Pan)
	}

	/// End a drag pan.
	pub fn pointer_up(&mut self) {
		self.pan.active = false;
	}

	/// Scale and centre `content` (group-space size) inside `viewport`
	/// (surface size). Never zooms in past 100%.
	pub fn fit(&mut self, content: (f64, f64), viewport: (f64, f64)) -> Option<ZoomEvent> {
		if content.0 <= 0.0 || content.1 <= 0.0 {
			return None;
		}
		let k = self.clamp((viewport.0 / content.0).min(viewport.1 / content.1).min(1.0));
		let next = ViewTransform {
			x: (viewport.0 - content.0 * k) / 2.0,
			y: (viewport.1 - content.1 * k) / 2.0,
			k,
		};
		self.emit(next, ZoomSource::Fit)
	}

	/// Return to the identity transform.
	pub fn reset(&mut self) -> Option<ZoomEvent> {
		self.pan.active = false;
		self.emit(ViewTransform::IDENTITY, ZoomSource::Reset)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_identity_attr() {
		assert_eq!(
			ViewTransform::default().to_attr(),
			"translate(0,0) scale(1)"
		);
	}

	#[test]
	fn test_wheel_zooms_about_cursor() {
		let mut zoom = ZoomController::default();
		let before = zoom.transform().invert((100.0, 50.0));
		let event = zoom
			.wheel(100.0, 50.0, -500.0, WheelDeltaMode::Pixel, false)
			.unwrap();

		assert_eq!(event.source, ZoomSource::Wheel);
		assert!((event.transform.k - 2.0).abs() < 1e-9);
		let after = zoom.transform().invert((100.0, 50.0));
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn test_wheel_respects_scale_extent() {
		let mut zoom = ZoomController::default();
		for _ in 0..20 {
			zoom.wheel(0.0, 0.0, 500.0, WheelDeltaMode::Pixel, false);
		}
		assert!((zoom.transform().k - 0.1).abs() < 1e-9);
		// Already at the limit: no further event.
		assert!(
			zoom.wheel(0.0, 0.0, 500.0, WheelDeltaMode::Pixel, false)
				.is_none()
		);
	}

	#[test]
	fn test_line_mode_scales_faster() {
		let mut pixel = ZoomController::default();
		let mut line = ZoomController::default();
		pixel.wheel(0.0, 0.0, -3.0, WheelDeltaMode::Pixel, false);
		line.wheel(0.0, 0.0, -3.0, WheelDeltaMode::Line, false);
		assert!(line.transform().k > pixel.transform().k);
		assert_eq!(WheelDeltaMode::from_dom(1), WheelDeltaMode::Line);
		assert_eq!(WheelDeltaMode::from_dom(7), WheelDeltaMode::Pixel);
	}

	#[test]
	fn test_drag_pans() {
		let mut zoom = ZoomController::default();
		assert!(zoom.pointer_move(10.0, 10.0).is_none());

		zoom.pointer_down(10.0, 10.0);
		assert!(zoom.is_panning());
		let event = zoom.pointer_move(40.0, -5.0).unwrap();
		assert_eq!(event.source, ZoomSource::Pan);
		assert_eq!(
			event.transform,
			ViewTransform {
				x: 30.0,
				y: -15.0,
				k: 1.0
			}
		);

		zoom.pointer_up();
		assert!(zoom.pointer_move(100.0, 100.0).is_none());
	}

	#[test]
	fn test_double_click_and_reset() {
		let mut zoom = ZoomController::default();
		let event = zoom.double_click(0.0, 0.0, false).unwrap();
		assert_eq!(event.transform.k, 2.0);
		let event = zoom.double_click(0.0, 0.0, true).unwrap();
		assert_eq!(event.transform.k, 1.0);

		zoom.pointer_down(0.0, 0.0);
		zoom.pointer_move(5.0, 5.0);
		let event = zoom.reset().unwrap();
		assert_eq!(event.transform, ViewTransform::IDENTITY);
		assert!(zoom.reset().is_none());
	}

	#[test]
	fn test_fit_centres_content() {
		let mut zoom = ZoomController::default();
		let event = zoom.fit((1000.0, 250.0), (500.0, 500.0)).unwrap();
		assert_eq!(event.source, ZoomSource::Fit);
		assert_eq!(event.transform.k, 0.5);
		assert_eq!(event.transform.x, 0.0);
		assert_eq!(event.transform.y, 187.5);

		let mut zoom = ZoomController::default();
		let event = zoom.fit((100.0, 100.0), (500.0, 500.0)).unwrap();
		assert_eq!(event.transform.k, 1.0);
		assert_eq!(event.transform.x, 200.0);
		assert!(zoom.fit((0.0, 10.0), (500.0, 500.0)).is_none());
	}

	#[test]
	fn test_apply_inverts() {
		let t = ViewTransform {
			x: 12.0,
			y: -4.0,
			k: 2.5,
		};
		let p = t.apply((3.0, 7.0));
		assert_eq!(t.invert(p), (3.0, 7.0));
	}
}
