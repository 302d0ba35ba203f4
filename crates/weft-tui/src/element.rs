//! Element — a retained node in the scene graph.

use crate::event::Event;
use crate::geometry::Rect;
use crate::layout::LayoutStyle;
use crate::style::Style;

/// Handle to an element in an [`crate::tree::ElementTree`].
///
/// Ids are non-owning: they survive reparenting, and operations on an
/// id whose element has been destroyed silently no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u64);

/// What an element is: a container of children or a text leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// Lays out children along its main axis.
    Container,
    /// Displays text content; its intrinsic size derives from the text.
    Text,
}

/// Box-drawing line style for an element's border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderStyle {
    /// Light single lines.
    Single,
    /// Double lines.
    Double,
    /// Light lines with rounded corners.
    Rounded,
    /// Heavy lines.
    Thick,
}

/// The eight glyphs used to draw a border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderGlyphs {
    /// Top-left corner.
    pub top_left: char,
    /// Top edge.
    pub top: char,
    /// Top-right corner.
    pub top_right: char,
    /// Right edge.
    pub right: char,
    /// Bottom-right corner.
    pub bottom_right: char,
    /// Bottom edge.
    pub bottom: char,
    /// Bottom-left corner.
    pub bottom_left: char,
    /// Left edge.
    pub left: char,
}

impl BorderStyle {
    /// The glyph set for this border style.
    pub const fn glyphs(self) -> BorderGlyphs {
        match self {
            BorderStyle::Single => BorderGlyphs {
                top_left: '\u{250c}',
                top: '\u{2500}',
                top_right: '\u{2510}',
                right: '\u{2502}',
                bottom_right: '\u{2518}',
                bottom: '\u{2500}',
                bottom_left: '\u{2514}',
                left: '\u{2502}',
            },
            BorderStyle::Double => BorderGlyphs {
                top_left: '\u{2554}',
                top: '\u{2550}',
                top_right: '\u{2557}',
                right: '\u{2551}',
                bottom_right: '\u{255d}',
                bottom: '\u{2550}',
                bottom_left: '\u{255a}',
                left: '\u{2551}',
            },
            BorderStyle::Rounded => BorderGlyphs {
                top_left: '\u{256d}',
                top: '\u{2500}',
                top_right: '\u{256e}',
                right: '\u{2502}',
                bottom_right: '\u{256f}',
                bottom: '\u{2500}',
                bottom_left: '\u{2570}',
                left: '\u{2502}',
            },
            BorderStyle::Thick => BorderGlyphs {
                top_left: '\u{250f}',
                top: '\u{2501}',
                top_right: '\u{2513}',
                right: '\u{2503}',
                bottom_right: '\u{251b}',
                bottom: '\u{2501}',
                bottom_left: '\u{2517}',
                left: '\u{2503}',
            },
        }
    }
}

/// Horizontal alignment of text within the content box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Event and focus callbacks attached to an element.
#[derive(Default)]
pub(crate) struct Hooks {
    pub(crate) on_focus: Option<Box<dyn FnMut()>>,
    pub(crate) on_blur: Option<Box<dyn FnMut()>>,
    pub(crate) on_click: Option<Box<dyn FnMut()>>,
    pub(crate) on_event: Option<Box<dyn FnMut(&Event) -> bool>>,
}

/// A retained element: styles, content, children, and computed layout.
pub struct Element {
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) kind: ElementKind,
    pub(crate) layout: LayoutStyle,
    pub(crate) visual: Style,
    pub(crate) border: Option<BorderStyle>,
    pub(crate) title: Option<String>,
    pub(crate) title_align: TextAlign,
    pub(crate) text: Option<String>,
    pub(crate) text_align: TextAlign,
    pub(crate) focusable: bool,
    pub(crate) hooks: Hooks,

    // Computed by the layout solver.
    pub(crate) rect: Rect,
    pub(crate) content_rect: Rect,
    pub(crate) dirty: bool,
    pub(crate) intrinsic: Option<(u16, u16)>,
}

impl Element {
    /// Create a container element with default styles.
    pub fn container() -> Self {
        Self::with_kind(ElementKind::Container)
    }

    /// Create a text leaf.
    pub fn text(content: impl Into<String>) -> Self {
        let mut el = Self::with_kind(ElementKind::Text);
        el.text = Some(content.into());
        el
    }

    fn with_kind(kind: ElementKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            kind,
            layout: LayoutStyle::default(),
            visual: Style::default(),
            border: None,
            title: None,
            title_align: TextAlign::Center,
            text: None,
            text_align: TextAlign::Left,
            focusable: false,
            hooks: Hooks::default(),
            rect: Rect::default(),
            content_rect: Rect::default(),
            dirty: true,
            intrinsic: None,
        }
    }

    /// Builder: set the layout style.
    #[must_use]
    pub fn layout(mut self, layout: LayoutStyle) -> Self {
        self.layout = layout;
        self
    }

    /// Builder: set the visual style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.visual = style;
        self
    }

    /// Builder: set a border.
    #[must_use]
    pub fn border(mut self, border: BorderStyle) -> Self {
        self.border = Some(border);
        self
    }

    /// Builder: set a border title (drawn centered on the top edge).
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: set the title's placement on the top edge.
    #[must_use]
    pub fn title_align(mut self, align: TextAlign) -> Self {
        self.title_align = align;
        self
    }

    /// Builder: set text alignment.
    #[must_use]
    pub fn text_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    /// Builder: mark the element focusable.
    #[must_use]
    pub fn focusable(mut self, val: bool) -> Self {
        self.focusable = val;
        self
    }

    /// The element kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The computed border-box rectangle from the last layout pass.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The computed content-box rectangle (border box inset by padding).
    pub fn content_rect(&self) -> Rect {
        self.content_rect
    }

    /// The element's layout style.
    pub fn layout_style(&self) -> &LayoutStyle {
        &self.layout
    }

    /// The element's visual style.
    pub fn visual_style(&self) -> Style {
        self.visual
    }

    /// The element's text content, if any.
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Whether the element participates in the focus ring.
    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    /// Child ids in paint order.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}
