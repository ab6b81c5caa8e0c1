//! Visual theming for the graph view.
//!
//! A [`Theme`] is a colour palette plus the surface size variables. [`Theming`]
//! turns it into the shadow root style sheet and appends any style modules
//! registered for the element.

use std::fmt::Write;

/// Custom property holding the rendering surface width.
pub const WIDTH_VAR: &str = "--graph-view-width";
/// Custom property holding the rendering surface height.
pub const HEIGHT_VAR: &str = "--graph-view-height";
/// Shadow part name of the rendering surface.
pub const SURFACE_PART: &str = "svg";

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with alpha `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// CSS value: hex when opaque, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node outline style.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Outline fill.
	pub fill: Color,
	/// Outline stroke.
	pub stroke: Color,
	/// Stroke width in px.
	pub stroke_width: f64,
}

/// Edge line and arrowhead style.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	/// Path stroke.
	pub stroke: Color,
	/// Stroke width in px.
	pub stroke_width: f64,
	/// Arrowhead fill.
	pub arrow_fill: Color,
}

/// Text style shared by node and edge labels.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelStyle {
	/// Text color.
	pub color: Color,
	/// CSS font family.
	pub font_family: &'static str,
	/// Font size in px.
	pub font_size: f64,
	/// Backdrop drawn behind edge labels.
	pub backdrop: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	/// Theme name, as accepted by [`Theme::by_name`].
	pub name: &'static str,
	/// Default surface width in px (`--graph-view-width`).
	pub width: f64,
	/// Default surface height in px (`--graph-view-height`).
	pub height: f64,
	/// Card background.
	pub background: Color,
	/// Node outline style.
	pub node: NodeStyle,
	/// Edge style.
	pub edge: EdgeStyle,
	/// Label text style.
	pub label: LabelStyle,
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

impl Theme {
	/// Light card with slate outlines (default)
	pub fn default_theme() -> Self {
		let background = Color::rgb(255, 255, 255);
		Self {
			name: "default",
			width: 500.0,
			height: 500.0,
			background,
			node: NodeStyle {
				fill: background,
				stroke: Color::rgb(51, 51, 51),
				stroke_width: 1.5,
			},
			edge: EdgeStyle {
				stroke: Color::rgb(51, 51, 51),
				stroke_width: 1.5,
				arrow_fill: Color::rgb(51, 51, 51),
			},
			label: LabelStyle {
				color: Color::rgb(33, 33, 33),
				font_family: "\"Helvetica Neue\", Helvetica, Arial, sans-serif",
				font_size: 14.0,
				backdrop: background.with_alpha(0.85),
			},
		}
	}

	/// Dark surface with muted steel-blue nodes
	pub fn midnight() -> Self {
		let background = Color::rgb(18, 20, 28);
		let accent = Color::rgb(94, 129, 172);
		Self {
			name: "midnight",
			width: 500.0,
			height: 500.0,
			background,
			node: NodeStyle {
				fill: Color::rgb(30, 35, 42),
				stroke: accent,
				stroke_width: 1.5,
			},
			edge: EdgeStyle {
				stroke: Color::rgba(140, 160, 180, 0.7),
				stroke_width: 1.5,
				arrow_fill: Color::rgb(140, 160, 180),
			},
			label: LabelStyle {
				color: Color::rgb(220, 225, 232),
				font_family: "\"Helvetica Neue\", Helvetica, Arial, sans-serif",
				font_size: 14.0,
				backdrop: background.with_alpha(0.8),
			},
		}
	}

	/// Warm paper tones for print-like output
	pub fn paper() -> Self {
		let background = Color::rgb(250, 246, 238);
		let ink = Color::rgb(92, 74, 60);
		Self {
			name: "paper",
			width: 500.0,
			height: 500.0,
			background,
			node: NodeStyle {
				fill: Color::rgb(243, 235, 220),
				stroke: ink,
				stroke_width: 1.0,
			},
			edge: EdgeStyle {
				stroke: ink.with_alpha(0.8),
				stroke_width: 1.0,
				arrow_fill: ink,
			},
			label: LabelStyle {
				color: ink.darken(0.3),
				font_family: "Georgia, \"Times New Roman\", serif",
				font_size: 13.0,
				backdrop: background.with_alpha(0.9),
			},
		}
	}

	/// Look up a built-in theme by name.
	pub fn by_name(name: &str) -> Option<Self> {
		match name {
			"default" => Some(Self::default_theme()),
			"midnight" => Some(Self::midnight()),
			"paper" => Some(Self::paper()),
			_ => None,
		}
	}

	/// Names of all built-in themes.
	pub fn names() -> &'static [&'static str] {
		&["default", "midnight", "paper"]
	}
}

/// Theme plus extra style modules registered for the element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Theming {
	theme: Theme,
	modules: Vec<String>,
}

impl Theming {
	/// Theming with no extra modules.
	pub fn new(theme: Theme) -> Self {
		Self {
			theme,
			modules: Vec::new(),
		}
	}

	/// Active theme.
	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	/// Swap the theme. Registered modules are kept.
	pub fn set_theme(&mut self, theme: Theme) {
		self.theme = theme;
	}

	/// Append a style module. Modules are emitted after the theme rules, in
	/// registration order, so they can override them.
	pub fn register_styles(&mut self, css: impl Into<String>) {
		self.modules.push(css.into());
	}

	/// Registered style modules, in order.
	pub fn modules(&self) -> &[String] {
		&self.modules
	}

	/// Default surface size in px.
	pub fn surface_size(&self) -> (f64, f64) {
		(self.theme.width, self.theme.height)
	}

	/// Style sheet for the shadow root.
	pub fn css(&self) -> String {
		let t = &self.theme;
		let mut css = String::new();
		let _ = write!(
			css,
			":host {{\n\tdisplay: block;\n\t{WIDTH_VAR}: {}px;\n\t{HEIGHT_VAR}: {}px;\n}}\n\
			 .card {{\n\tdisplay: inline-block;\n\tbackground: {};\n}}\n\
			 svg {{\n\twidth: var({WIDTH_VAR});\n\theight: var({HEIGHT_VAR});\n\toverflow: hidden;\n\tcursor: grab;\n}}\n\
			 svg.panning {{\n\tcursor: grabbing;\n}}\n",
			t.width,
			t.height,
			t.background.to_css(),
		);
		let _ = write!(
			css,
			".node rect,\n.node circle,\n.node ellipse,\n.node polygon {{\n\tfill: {};\n\tstroke: {};\n\tstroke-width: {}px;\n}}\n\
			 .edgePath path {{\n\tfill: none;\n\tstroke: {};\n\tstroke-width: {}px;\n}}\n\
			 .edgePath .arrowhead {{\n\tfill: {};\n\tstroke: none;\n}}\n",
			t.node.fill.to_css(),
			t.node.stroke.to_css(),
			t.node.stroke_width,
			t.edge.stroke.to_css(),
			t.edge.stroke_width,
			t.edge.arrow_fill.to_css(),
		);
		let _ = write!(
			css,
			"text {{\n\tfill: {};\n\tfont-family: {};\n\tfont-size: {}px;\n\tpointer-events: none;\n}}\n\
			 .edgeLabel rect {{\n\tfill: {};\n\tstroke: none;\n}}\n",
			t.label.color.to_css(),
			t.label.font_family,
			t.label.font_size,
			t.label.backdrop.to_css(),
		);
		for module in &self.modules {
			css.push_str(module);
			if !module.ends_with('\n') {
				css.push('\n');
			}
		}
		css
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_color_css() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(
			Color::rgb(10, 20, 30).with_alpha(0.5).to_css(),
			"rgba(10, 20, 30, 0.5)"
		);
		assert_eq!(Color::rgb(200, 100, 50).darken(0.5), Color::rgb(100, 50, 25));
	}

	#[test]
	fn test_host_declares_size_variables() {
		let css = Theming::default().css();
		assert!(css.contains(":host {\n\tdisplay: block;\n\t--graph-view-width: 500px;\n\t--graph-view-height: 500px;\n}"));
		assert!(css.contains("width: var(--graph-view-width);"));
		assert!(css.contains("height: var(--graph-view-height);"));
		assert!(css.contains("overflow: hidden;"));
	}

	#[test]
	fn test_modules_follow_theme_rules() {
		let mut theming = Theming::new(Theme::midnight());
		theming.register_styles(".node rect { fill: hotpink; }");
		theming.register_styles(".edgePath path { stroke-dasharray: 4; }\n");
		let css = theming.css();

		let theme_rule = css.find(".node rect,").unwrap();
		let first = css.find("fill: hotpink").unwrap();
		let second = css.find("stroke-dasharray").unwrap();
		assert!(theme_rule < first);
		assert!(first < second);
		assert_eq!(theming.modules().len(), 2);
	}

	#[test]
	fn test_named_themes() {
		for name in Theme::names() {
			assert_eq!(Theme::by_name(name).unwrap().name, *name);
		}
		assert!(Theme::by_name("neon").is_none());
		assert_eq!(Theming::default().surface_size(), (500.0, 500.0));
	}
}
