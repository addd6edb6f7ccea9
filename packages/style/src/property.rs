use serde::{Deserialize, Serialize};

/// Style property addressed by a utility class.
///
/// Declaration order is the canonical serialization order: layout, flexbox
/// and grid, spacing, sizing, typography, background, border, effects.
/// Side, axis and corner utilities have their own properties so they never
/// share a key with the shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    // Layout
    Display,
    Position,
    Inset,
    InsetX,
    InsetY,
    Top,
    Right,
    Bottom,
    Left,
    ZIndex,
    Overflow,
    OverflowX,
    OverflowY,
    Visibility,

    // Flexbox & grid
    FlexDirection,
    FlexWrap,
    Flex,
    FlexGrow,
    FlexShrink,
    GridCols,
    GridRows,
    Gap,
    GapX,
    GapY,
    AlignItems,
    JustifyContent,
    JustifyItems,
    JustifySelf,
    AlignSelf,
    Order,

    // Spacing
    Padding,
    PaddingX,
    PaddingY,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    Margin,
    MarginX,
    MarginY,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    SpaceX,
    SpaceY,

    // Sizing
    Width,
    MinWidth,
    MaxWidth,
    Height,
    MinHeight,
    MaxHeight,

    // Typography
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    LineHeight,
    LetterSpacing,
    TextAlign,
    TextColor,
    TextDecoration,
    TextTransform,
    TextOverflow,
    WhiteSpace,

    // Background
    BackgroundColor,

    // Border
    BorderWidth,
    BorderXWidth,
    BorderYWidth,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderStyle,
    BorderColor,
    BorderRadius,
    RadiusTop,
    RadiusRight,
    RadiusBottom,
    RadiusLeft,
    RadiusTopLeft,
    RadiusTopRight,
    RadiusBottomRight,
    RadiusBottomLeft,

    // Effects
    Shadow,
    Opacity,
    Cursor,
    Transition,
    Duration,
}

impl Property {
    /// Utility prefix, or `None` for properties spelled as bare keywords
    pub fn prefix(self) -> Option<&'static str> {
        use Property::*;
        Some(match self {
            Display | Position | Visibility | FontStyle | TextDecoration | TextTransform
            | TextOverflow => return None,
            Inset => "inset",
            InsetX => "inset-x",
            InsetY => "inset-y",
            Top => "top",
            Right => "right",
            Bottom => "bottom",
            Left => "left",
            ZIndex => "z",
            Overflow => "overflow",
            OverflowX => "overflow-x",
            OverflowY => "overflow-y",
            FlexDirection | FlexWrap | Flex => "flex",
            FlexGrow => "grow",
            FlexShrink => "shrink",
            GridCols => "grid-cols",
            GridRows => "grid-rows",
            Gap => "gap",
            GapX => "gap-x",
            GapY => "gap-y",
            AlignItems => "items",
            JustifyContent => "justify",
            JustifyItems => "justify-items",
            JustifySelf => "justify-self",
            AlignSelf => "self",
            Order => "order",
            Padding => "p",
            PaddingX => "px",
            PaddingY => "py",
            PaddingTop => "pt",
            PaddingRight => "pr",
            PaddingBottom => "pb",
            PaddingLeft => "pl",
            Margin => "m",
            MarginX => "mx",
            MarginY => "my",
            MarginTop => "mt",
            MarginRight => "mr",
            MarginBottom => "mb",
            MarginLeft => "ml",
            SpaceX => "space-x",
            SpaceY => "space-y",
            Width => "w",
            MinWidth => "min-w",
            MaxWidth => "max-w",
            Height => "h",
            MinHeight => "min-h",
            MaxHeight => "max-h",
            FontFamily | FontWeight => "font",
            FontSize | TextAlign | TextColor => "text",
            LineHeight => "leading",
            LetterSpacing => "tracking",
            WhiteSpace => "whitespace",
            BackgroundColor => "bg",
            BorderWidth | BorderStyle | BorderColor => "border",
            BorderXWidth => "border-x",
            BorderYWidth => "border-y",
            BorderTopWidth => "border-t",
            BorderRightWidth => "border-r",
            BorderBottomWidth => "border-b",
            BorderLeftWidth => "border-l",
            BorderRadius => "rounded",
            RadiusTop => "rounded-t",
            RadiusRight => "rounded-r",
            RadiusBottom => "rounded-b",
            RadiusLeft => "rounded-l",
            RadiusTopLeft => "rounded-tl",
            RadiusTopRight => "rounded-tr",
            RadiusBottomRight => "rounded-br",
            RadiusBottomLeft => "rounded-bl",
            Shadow => "shadow",
            Opacity => "opacity",
            Cursor => "cursor",
            Transition => "transition",
            Duration => "duration",
        })
    }

    /// CSS-style display name
    pub fn name(self) -> &'static str {
        use Property::*;
        match self {
            Display => "display",
            Position => "position",
            Inset => "inset",
            InsetX => "inset-inline",
            InsetY => "inset-block",
            Top => "top",
            Right => "right",
            Bottom => "bottom",
            Left => "left",
            ZIndex => "z-index",
            Overflow => "overflow",
            OverflowX => "overflow-x",
            OverflowY => "overflow-y",
            Visibility => "visibility",
            FlexDirection => "flex-direction",
            FlexWrap => "flex-wrap",
            Flex => "flex",
            FlexGrow => "flex-grow",
            FlexShrink => "flex-shrink",
            GridCols => "grid-template-columns",
            GridRows => "grid-template-rows",
            Gap => "gap",
            GapX => "column-gap",
            GapY => "row-gap",
            AlignItems => "align-items",
            JustifyContent => "justify-content",
            JustifyItems => "justify-items",
            JustifySelf => "justify-self",
            AlignSelf => "align-self",
            Order => "order",
            Padding => "padding",
            PaddingX => "padding-inline",
            PaddingY => "padding-block",
            PaddingTop => "padding-top",
            PaddingRight => "padding-right",
            PaddingBottom => "padding-bottom",
            PaddingLeft => "padding-left",
            Margin => "margin",
            MarginX => "margin-inline",
            MarginY => "margin-block",
            MarginTop => "margin-top",
            MarginRight => "margin-right",
            MarginBottom => "margin-bottom",
            MarginLeft => "margin-left",
            SpaceX => "space-x",
            SpaceY => "space-y",
            Width => "width",
            MinWidth => "min-width",
            MaxWidth => "max-width",
            Height => "height",
            MinHeight => "min-height",
            MaxHeight => "max-height",
            FontFamily => "font-family",
            FontSize => "font-size",
            FontWeight => "font-weight",
            FontStyle => "font-style",
            LineHeight => "line-height",
            LetterSpacing => "letter-spacing",
            TextAlign => "text-align",
            TextColor => "color",
            TextDecoration => "text-decoration-line",
            TextTransform => "text-transform",
            TextOverflow => "text-overflow",
            WhiteSpace => "white-space",
            BackgroundColor => "background-color",
            BorderWidth => "border-width",
            BorderXWidth => "border-inline-width",
            BorderYWidth => "border-block-width",
            BorderTopWidth => "border-top-width",
            BorderRightWidth => "border-right-width",
            BorderBottomWidth => "border-bottom-width",
            BorderLeftWidth => "border-left-width",
            BorderStyle => "border-style",
            BorderColor => "border-color",
            BorderRadius => "border-radius",
            RadiusTop => "border-top-radius",
            RadiusRight => "border-right-radius",
            RadiusBottom => "border-bottom-radius",
            RadiusLeft => "border-left-radius",
            RadiusTopLeft => "border-top-left-radius",
            RadiusTopRight => "border-top-right-radius",
            RadiusBottomRight => "border-bottom-right-radius",
            RadiusBottomLeft => "border-bottom-left-radius",
            Shadow => "box-shadow",
            Opacity => "opacity",
            Cursor => "cursor",
            Transition => "transition-property",
            Duration => "transition-duration",
        }
    }
}

/// Utility prefixes. Decoding picks the longest one that matches, so
/// `gap-x-2` is a `gap-x` utility and never a `gap` one.
pub(crate) const PREFIXES: &[&str] = &[
    "inset", "inset-x", "inset-y", "top", "right", "bottom", "left", "z",
    "overflow", "overflow-x", "overflow-y",
    "flex", "grow", "shrink", "grid-cols", "grid-rows", "gap", "gap-x", "gap-y",
    "items", "justify", "justify-items", "justify-self", "self", "order",
    "p", "px", "py", "pt", "pr", "pb", "pl",
    "m", "mx", "my", "mt", "mr", "mb", "ml", "space-x", "space-y",
    "w", "min-w", "max-w", "h", "min-h", "max-h",
    "font", "text", "leading", "tracking", "whitespace",
    "bg",
    "border", "border-x", "border-y", "border-t", "border-r", "border-b", "border-l",
    "rounded", "rounded-t", "rounded-r", "rounded-b", "rounded-l",
    "rounded-tl", "rounded-tr", "rounded-br", "rounded-bl",
    "shadow", "opacity", "cursor", "transition", "duration",
];

/// Bare keyword utilities and the declaration they stand for
pub(crate) fn keyword(token: &str) -> Option<(Property, &'static str)> {
    use Property::*;
    Some(match token {
        "flex" | "inline-flex" | "block" | "inline-block" | "inline" | "grid" | "inline-grid"
        | "hidden" | "contents" | "table" | "flow-root" => (Display, display_value(token)?),
        "static" | "fixed" | "absolute" | "relative" | "sticky" => (Position, position_value(token)?),
        "visible" => (Visibility, "visible"),
        "invisible" => (Visibility, "invisible"),
        "italic" => (FontStyle, "italic"),
        "not-italic" => (FontStyle, "not-italic"),
        "underline" => (TextDecoration, "underline"),
        "overline" => (TextDecoration, "overline"),
        "line-through" => (TextDecoration, "line-through"),
        "no-underline" => (TextDecoration, "no-underline"),
        "uppercase" => (TextTransform, "uppercase"),
        "lowercase" => (TextTransform, "lowercase"),
        "capitalize" => (TextTransform, "capitalize"),
        "normal-case" => (TextTransform, "normal-case"),
        "truncate" => (TextOverflow, "truncate"),
        "text-ellipsis" => (TextOverflow, "text-ellipsis"),
        "text-clip" => (TextOverflow, "text-clip"),
        "border" => (BorderWidth, DEFAULT),
        "border-x" => (BorderXWidth, DEFAULT),
        "border-y" => (BorderYWidth, DEFAULT),
        "border-t" => (BorderTopWidth, DEFAULT),
        "border-r" => (BorderRightWidth, DEFAULT),
        "border-b" => (BorderBottomWidth, DEFAULT),
        "border-l" => (BorderLeftWidth, DEFAULT),
        "rounded" => (BorderRadius, DEFAULT),
        "rounded-t" => (RadiusTop, DEFAULT),
        "rounded-r" => (RadiusRight, DEFAULT),
        "rounded-b" => (RadiusBottom, DEFAULT),
        "rounded-l" => (RadiusLeft, DEFAULT),
        "rounded-tl" => (RadiusTopLeft, DEFAULT),
        "rounded-tr" => (RadiusTopRight, DEFAULT),
        "rounded-br" => (RadiusBottomRight, DEFAULT),
        "rounded-bl" => (RadiusBottomLeft, DEFAULT),
        "shadow" => (Shadow, DEFAULT),
        "grow" => (FlexGrow, DEFAULT),
        "shrink" => (FlexShrink, DEFAULT),
        "transition" => (Transition, DEFAULT),
        _ => return None,
    })
}

/// Value of a prefix utility written without a suffix (`border`, `rounded`)
pub const DEFAULT: &str = "DEFAULT";

fn display_value(token: &str) -> Option<&'static str> {
    [
        "flex",
        "inline-flex",
        "block",
        "inline-block",
        "inline",
        "grid",
        "inline-grid",
        "hidden",
        "contents",
        "table",
        "flow-root",
    ]
    .into_iter()
    .find(|value| *value == token)
}

fn position_value(token: &str) -> Option<&'static str> {
    ["static", "fixed", "absolute", "relative", "sticky"]
        .into_iter()
        .find(|value| *value == token)
}

const PALETTE: &[&str] = &[
    "slate", "gray", "zinc", "neutral", "stone", "red", "orange", "amber", "yellow", "lime",
    "green", "emerald", "teal", "cyan", "sky", "blue", "indigo", "violet", "purple", "fuchsia",
    "pink", "rose",
];
const SHADES: &[&str] = &[
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900", "950",
];
const COLOR_KEYWORDS: &[&str] = &["inherit", "current", "transparent", "black", "white"];
const RADII: &[&str] = &["none", "sm", "md", "lg", "xl", "2xl", "3xl", "full"];
const OVERFLOW: &[&str] = &["auto", "hidden", "clip", "visible", "scroll"];

fn arbitrary(value: &str) -> Option<&str> {
    value.strip_prefix('[')?.strip_suffix(']')
}

fn is_length(value: &str) -> bool {
    arbitrary(value).is_some_and(|inner| inner.starts_with(|c: char| c.is_ascii_digit() || c == '.'))
}

fn is_number(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Palette colors (`gray-200`, `black/50`), color keywords and arbitrary
/// color literals (`[#fff]`)
fn is_color(value: &str) -> bool {
    let value = match value.rsplit_once('/') {
        Some((color, alpha)) if is_number(alpha) || arbitrary(alpha).is_some() => color,
        _ => value,
    };

    if let Some(inner) = arbitrary(value) {
        return ["#", "rgb", "hsl", "oklch", "color:"]
            .iter()
            .any(|start| inner.starts_with(start));
    }
    if COLOR_KEYWORDS.contains(&value) {
        return true;
    }
    match value.rsplit_once('-') {
        Some((name, shade)) => PALETTE.contains(&name) && SHADES.contains(&shade),
        None => false,
    }
}

/// Pick the property for a prefix and value.
///
/// Returns `None` when the value does not clearly belong to one property,
/// so the token stays opaque instead of sharing a key with another utility.
pub(crate) fn resolve(prefix: &str, value: &str) -> Option<Property> {
    use Property::*;
    let one_of = |values: &[&str]| values.iter().any(|v| *v == value) || arbitrary(value).is_some();

    let property = match prefix {
        "text" => match value {
            "xs" | "sm" | "base" | "lg" => FontSize,
            v if v.ends_with("xl") && v[..v.len() - 2].chars().all(|c| c.is_ascii_digit()) => FontSize,
            "left" | "center" | "right" | "justify" | "start" | "end" => TextAlign,
            _ if is_color(value) => TextColor,
            _ if is_length(value) => FontSize,
            _ => return None,
        },
        "font" => match value {
            "thin" | "extralight" | "light" | "normal" | "medium" | "semibold" | "bold"
            | "extrabold" | "black" => FontWeight,
            "sans" | "serif" | "mono" => FontFamily,
            _ if is_length(value) => FontWeight,
            _ if arbitrary(value).is_some() => FontFamily,
            _ => return None,
        },
        "border" => match value {
            "solid" | "dashed" | "dotted" | "double" | "hidden" | "none" => BorderStyle,
            _ if is_number(value) || is_length(value) => BorderWidth,
            _ if is_color(value) => BorderColor,
            _ => return None,
        },
        "border-x" | "border-y" | "border-t" | "border-r" | "border-b" | "border-l" => {
            if !(is_number(value) || is_length(value)) {
                return None;
            }
            match prefix {
                "border-x" => BorderXWidth,
                "border-y" => BorderYWidth,
                "border-t" => BorderTopWidth,
                "border-r" => BorderRightWidth,
                "border-b" => BorderBottomWidth,
                _ => BorderLeftWidth,
            }
        }
        "rounded" | "rounded-t" | "rounded-r" | "rounded-b" | "rounded-l" | "rounded-tl"
        | "rounded-tr" | "rounded-br" | "rounded-bl" => {
            if !one_of(RADII) {
                return None;
            }
            match prefix {
                "rounded" => BorderRadius,
                "rounded-t" => RadiusTop,
                "rounded-r" => RadiusRight,
                "rounded-b" => RadiusBottom,
                "rounded-l" => RadiusLeft,
                "rounded-tl" => RadiusTopLeft,
                "rounded-tr" => RadiusTopRight,
                "rounded-br" => RadiusBottomRight,
                _ => RadiusBottomLeft,
            }
        }
        "flex" => match value {
            "row" | "row-reverse" | "col" | "col-reverse" => FlexDirection,
            "wrap" | "wrap-reverse" | "nowrap" => FlexWrap,
            "1" | "auto" | "initial" | "none" => Flex,
            _ if arbitrary(value).is_some() => Flex,
            _ => return None,
        },
        "overflow" | "overflow-x" | "overflow-y" => {
            if !OVERFLOW.contains(&value) {
                return None;
            }
            match prefix {
                "overflow" => Overflow,
                "overflow-x" => OverflowX,
                _ => OverflowY,
            }
        }
        "justify" if one_of(&["normal", "start", "end", "center", "between", "around", "evenly", "stretch"]) => {
            JustifyContent
        }
        "justify-items" if one_of(&["start", "end", "center", "stretch", "normal"]) => JustifyItems,
        "justify-self" if one_of(&["auto", "start", "end", "center", "stretch"]) => JustifySelf,
        "items" if one_of(&["start", "end", "center", "baseline", "stretch"]) => AlignItems,
        "self" if one_of(&["auto", "start", "end", "center", "stretch", "baseline"]) => AlignSelf,
        "shadow" if one_of(&["sm", "md", "lg", "xl", "2xl", "inner", "none"]) => Shadow,
        "transition" if one_of(&["all", "colors", "opacity", "shadow", "transform", "none"]) => Transition,
        "grow" | "shrink" if is_number(value) || arbitrary(value).is_some() => {
            if prefix == "grow" {
                FlexGrow
            } else {
                FlexShrink
            }
        }
        "bg" if is_color(value) => BackgroundColor,
        "space-x" | "space-y" if value == "reverse" => return None,
        "inset" => Inset,
        "inset-x" => InsetX,
        "inset-y" => InsetY,
        "top" => Top,
        "right" => Right,
        "bottom" => Bottom,
        "left" => Left,
        "z" => ZIndex,
        "grid-cols" => GridCols,
        "grid-rows" => GridRows,
        "gap" => Gap,
        "gap-x" => GapX,
        "gap-y" => GapY,
        "order" => Order,
        "p" => Padding,
        "px" => PaddingX,
        "py" => PaddingY,
        "pt" => PaddingTop,
        "pr" => PaddingRight,
        "pb" => PaddingBottom,
        "pl" => PaddingLeft,
        "m" => Margin,
        "mx" => MarginX,
        "my" => MarginY,
        "mt" => MarginTop,
        "mr" => MarginRight,
        "mb" => MarginBottom,
        "ml" => MarginLeft,
        "space-x" => SpaceX,
        "space-y" => SpaceY,
        "w" => Width,
        "min-w" => MinWidth,
        "max-w" => MaxWidth,
        "h" => Height,
        "min-h" => MinHeight,
        "max-h" => MaxHeight,
        "leading" => LineHeight,
        "tracking" => LetterSpacing,
        "whitespace" => WhiteSpace,
        "opacity" => Opacity,
        "cursor" => Cursor,
        "duration" => Duration,
        _ => return None,
    };

    Some(property)
}
