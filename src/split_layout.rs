//! A two pane layout whose divider can be dragged to resize the left pane.
//!
//! [SplitLayout] models the drag as a small state machine. The rendered page
//! runs the same rules in the browser, using the widths from
//! [SplitLayoutConfig] as data attributes.

use std::fmt::Display;

use maud::{Markup, PreEscaped, html};

/// A pane width, either absolute or relative to the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Width {
    Pixels(f64),
    Percent(f64),
}

impl Width {
    /// The width in pixels inside a container `container_width` pixels wide.
    pub fn to_pixels(self, container_width: f64) -> f64 {
        match self {
            Width::Pixels(pixels) => pixels,
            Width::Percent(percent) => container_width * percent / 100.0,
        }
    }
}

impl Display for Width {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Width::Pixels(pixels) => write!(f, "{pixels}px"),
            Width::Percent(percent) => write!(f, "{percent}%"),
        }
    }
}

/// The starting width of the left pane and the limits it can be dragged to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitLayoutConfig {
    pub initial: Width,
    pub min: Width,
    pub max: Width,
}

impl Default for SplitLayoutConfig {
    fn default() -> Self {
        Self {
            initial: Width::Percent(25.0),
            min: Width::Percent(15.0),
            max: Width::Percent(40.0),
        }
    }
}

/// Whether the divider is being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeState {
    Idle {
        width: Width,
    },
    Dragging {
        /// Pointer X position when the drag started.
        start_x: f64,
        /// Left pane width in pixels when the drag started.
        start_width_px: f64,
        width: Width,
    },
}

/// The left pane width of a split layout and the drag in progress, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitLayout {
    config: SplitLayoutConfig,
    state: ResizeState,
}

impl SplitLayout {
    pub fn new(config: SplitLayoutConfig) -> Self {
        Self {
            state: ResizeState::Idle {
                width: config.initial,
            },
            config,
        }
    }

    pub fn state(&self) -> ResizeState {
        self.state
    }

    /// The current width of the left pane.
    pub fn width(&self) -> Width {
        match self.state {
            ResizeState::Idle { width } | ResizeState::Dragging { width, .. } => width,
        }
    }

    /// Start dragging the divider from pointer position `x`.
    pub fn pointer_down(&mut self, x: f64, container_width: f64) {
        if let ResizeState::Idle { width } = self.state {
            self.state = ResizeState::Dragging {
                start_x: x,
                start_width_px: width.to_pixels(container_width),
                width,
            };
        }
    }

    /// Move the divider to follow the pointer, keeping the pane between the
    /// configured limits. Does nothing unless a drag is in progress.
    pub fn pointer_move(&mut self, x: f64, container_width: f64) {
        let ResizeState::Dragging {
            start_x,
            start_width_px,
            ..
        } = self.state
        else {
            return;
        };

        let min_px = self.config.min.to_pixels(container_width);
        let max_px = self.config.max.to_pixels(container_width);
        let clamped_px = (start_width_px + (x - start_x)).max(min_px).min(max_px);

        let width = match self.config.initial {
            Width::Percent(_) if container_width > 0.0 => {
                Width::Percent(clamped_px * 100.0 / container_width)
            }
            Width::Percent(_) => self.width(),
            Width::Pixels(_) => Width::Pixels(clamped_px.round()),
        };

        self.state = ResizeState::Dragging {
            start_x,
            start_width_px,
            width,
        };
    }

    /// Finish the drag, keeping the current width.
    pub fn pointer_up(&mut self) {
        self.state = ResizeState::Idle {
            width: self.width(),
        };
    }
}

/// Browser side of [SplitLayout::pointer_move]: the same clamp of
/// `start width + (x - start x)` to `data-min`/`data-max`, written back in the
/// unit of `data-initial`.
const SPLIT_LAYOUT_SCRIPT: &str = r#"
(function() {
    const container = document.getElementById('split-layout');
    const pane = document.getElementById('split-left');
    const handle = document.getElementById('split-handle');
    if (!container || !pane || !handle) { return; }

    const toPixels = (width, containerWidth) =>
        width.endsWith('%') ? containerWidth * parseFloat(width) / 100 : parseFloat(width);
    const usesPercent = container.dataset.initial.endsWith('%');
    let drag = null;

    handle.addEventListener('pointerdown', (event) => {
        drag = { startX: event.clientX, startWidth: pane.getBoundingClientRect().width };
        handle.setPointerCapture(event.pointerId);
        event.preventDefault();
    });

    handle.addEventListener('pointermove', (event) => {
        if (!drag) { return; }
        const containerWidth = container.getBoundingClientRect().width;
        const min = toPixels(container.dataset.min, containerWidth);
        const max = toPixels(container.dataset.max, containerWidth);
        const width = Math.min(Math.max(drag.startWidth + event.clientX - drag.startX, min), max);
        pane.style.width = usesPercent
            ? (width / containerWidth * 100) + '%'
            : Math.round(width) + 'px';
    });

    const stop = () => { drag = null; };
    handle.addEventListener('pointerup', stop);
    handle.addEventListener('pointercancel', stop);
})();
"#;

/// Render `left` and `right` side by side with a draggable divider.
pub fn split_layout_view(config: &SplitLayoutConfig, left: &Markup, right: &Markup) -> Markup {
    html! {
        div
            id="split-layout"
            class="flex h-screen w-full overflow-hidden"
            data-initial=(config.initial)
            data-min=(config.min)
            data-max=(config.max)
        {
            aside
                id="split-left"
                class="h-full shrink-0 overflow-auto p-4 bg-white dark:bg-gray-800"
                style={ "width: " (config.initial) ";" }
            {
                (left)
            }

            div
                id="split-handle"
                class="w-1 shrink-0 cursor-col-resize bg-gray-200 hover:bg-blue-500 dark:bg-gray-700"
                role="separator"
                aria-orientation="vertical"
            {}

            main class="h-full min-w-0 flex-1 overflow-auto"
            {
                (right)
            }
        }

        script { (PreEscaped(SPLIT_LAYOUT_SCRIPT)) }
    }
}

#[cfg(test)]
mod tests {
    use maud::html;
    use scraper::{Html, Selector};

    use super::{ResizeState, SplitLayout, SplitLayoutConfig, Width, split_layout_view};

    fn pixel_config() -> SplitLayoutConfig {
        SplitLayoutConfig {
            initial: Width::Pixels(200.0),
            min: Width::Pixels(150.0),
            max: Width::Pixels(300.0),
        }
    }

    #[test]
    fn formats_widths_as_css() {
        assert_eq!(Width::Percent(25.0).to_string(), "25%");
        assert_eq!(Width::Pixels(200.0).to_string(), "200px");
    }

    #[test]
    fn drag_past_max_clamps_to_max() {
        let mut layout = SplitLayout::new(pixel_config());

        layout.pointer_down(100.0, 1000.0);
        layout.pointer_move(600.0, 1000.0);
        layout.pointer_up();

        assert_eq!(
            layout.state(),
            ResizeState::Idle {
                width: Width::Pixels(300.0)
            }
        );
    }

    #[test]
    fn drag_past_min_clamps_to_min() {
        let mut layout = SplitLayout::new(pixel_config());

        layout.pointer_down(500.0, 1000.0);
        layout.pointer_move(0.0, 1000.0);

        assert_eq!(layout.width(), Width::Pixels(150.0));
    }

    #[test]
    fn pixel_widths_are_rounded() {
        let mut layout = SplitLayout::new(pixel_config());

        layout.pointer_down(10.0, 1000.0);
        layout.pointer_move(30.6, 1000.0);

        assert_eq!(layout.width(), Width::Pixels(221.0));
    }

    #[test]
    fn percent_widths_stay_percent() {
        let mut layout = SplitLayout::new(SplitLayoutConfig::default());

        layout.pointer_down(250.0, 1000.0);
        layout.pointer_move(350.0, 1000.0);

        assert_eq!(layout.width(), Width::Percent(35.0));
    }

    #[test]
    fn percent_limits_follow_container_width() {
        let mut layout = SplitLayout::new(SplitLayoutConfig::default());

        layout.pointer_down(0.0, 1000.0);
        layout.pointer_move(900.0, 1000.0);

        assert_eq!(layout.width(), Width::Percent(40.0));
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let mut layout = SplitLayout::new(pixel_config());

        layout.pointer_move(900.0, 1000.0);

        assert_eq!(
            layout.state(),
            ResizeState::Idle {
                width: Width::Pixels(200.0)
            }
        );
    }

    #[test]
    fn second_drag_starts_from_last_width() {
        let mut layout = SplitLayout::new(pixel_config());
        layout.pointer_down(0.0, 1000.0);
        layout.pointer_move(50.0, 1000.0);
        layout.pointer_up();

        layout.pointer_down(100.0, 1000.0);

        assert_eq!(
            layout.state(),
            ResizeState::Dragging {
                start_x: 100.0,
                start_width_px: 250.0,
                width: Width::Pixels(250.0),
            }
        );
    }

    #[test]
    fn view_uses_initial_width_and_limits() {
        let markup = split_layout_view(
            &SplitLayoutConfig::default(),
            &html!(nav { "menu" }),
            &html!(p { "content" }),
        );

        let html = Html::parse_fragment(&markup.into_string());
        let container = html
            .select(&Selector::parse("#split-layout").unwrap())
            .next()
            .expect("layout container missing");
        assert_eq!(container.value().attr("data-min"), Some("15%"));
        assert_eq!(container.value().attr("data-max"), Some("40%"));

        let pane = html
            .select(&Selector::parse("#split-left").unwrap())
            .next()
            .expect("left pane missing");
        assert_eq!(pane.value().attr("style"), Some("width: 25%;"));
    }

    /// Resolve a rendered width the way the inline script's `toPixels` does.
    fn script_pixels(width: &str, container_width: f64) -> f64 {
        match width.strip_suffix('%') {
            Some(percent) => container_width * percent.parse::<f64>().unwrap() / 100.0,
            None => width.trim_end_matches("px").parse().unwrap(),
        }
    }

    #[test]
    fn rendered_limits_match_drag_clamp() {
        let config = pixel_config();
        let markup = split_layout_view(&config, &html!(nav {}), &html!(p {}));
        let html = Html::parse_fragment(&markup.into_string());
        let container = html
            .select(&Selector::parse("#split-layout").unwrap())
            .next()
            .expect("layout container missing");
        let min = container.value().attr("data-min").unwrap();
        let max = container.value().attr("data-max").unwrap();
        let initial = container.value().attr("data-initial").unwrap();
        assert_eq!(initial, "200px");

        for (start_x, end_x) in [(100.0, 600.0), (500.0, 0.0), (10.0, 30.6)] {
            let mut layout = SplitLayout::new(config);
            layout.pointer_down(start_x, 1000.0);
            layout.pointer_move(end_x, 1000.0);

            let script_width = (script_pixels(initial, 1000.0) + end_x - start_x)
                .max(script_pixels(min, 1000.0))
                .min(script_pixels(max, 1000.0))
                .round();
            assert_eq!(layout.width(), Width::Pixels(script_width));
        }
    }
}
