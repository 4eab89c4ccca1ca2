//! Closed groups of mutually exclusive rendered variants.
//!
//! A group (e.g. density profiles) is a plain enum declared once with
//! [`tagged_group!`](crate::tagged_group). Each variant has a unique tag;
//! rendering the group yields
//!
//! ```text
//! { "typeID": { <tag>: <bool>, ... }, "data": <variant mapping> }
//! ```
//!
//! where exactly the active variant's tag is `true`. The variant mapping is
//! validated against the variant's own schema and the wrapper against the
//! group schema.

use serde_json::{Map, Value};

use crate::error::RenderError;
use crate::render::{RenderContext, RenderedObject};

/// A closed set of tagged variants.
///
/// Implemented by [`tagged_group!`](crate::tagged_group); the macro keeps the
/// tag table, the exhaustive `tag()` match and the enum in lockstep.
pub trait TaggedGroup {
    /// Schema identifier of the `{typeID, data}` wrapper.
    const GROUP_SCHEMA_ID: &'static str;
    /// Every tag of the group, in declaration order.
    const TAGS: &'static [&'static str];

    /// Tag of the active variant.
    fn tag(&self) -> &'static str;

    /// The active variant as a rendered object.
    fn variant(&self) -> &dyn RenderedObject;
}

/// Build the `{typeID, data}` wrapper for `group`.
///
/// The inner data is rendered (and therefore validated) here; the wrapper
/// itself is validated by the caller's `render`.
pub fn tagged_wrapper<G: TaggedGroup + ?Sized>(
    group: &G,
    ctx: &RenderContext<'_>,
) -> Result<Value, RenderError> {
    let active = group.tag();
    let data = group.variant().render(ctx)?;
    let type_id: Map<String, Value> = G::TAGS
        .iter()
        .map(|&tag| (tag.to_string(), Value::Bool(tag == active)))
        .collect();

    let mut wrapper = Map::new();
    wrapper.insert("typeID".to_string(), Value::Object(type_id));
    wrapper.insert("data".to_string(), data);
    Ok(Value::Object(wrapper))
}

/// `true` if no tag appears twice. Evaluated at compile time by
/// [`tagged_group!`](crate::tagged_group).
pub const fn tags_unique(tags: &[&str]) -> bool {
    let mut i = 0;
    while i < tags.len() {
        let mut j = i + 1;
        while j < tags.len() {
            if str_eq(tags[i], tags[j]) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Declare a closed tagged group.
///
/// ```
/// use picdeck_core::render::{encode, RenderContext, RenderedObject};
/// use picdeck_core::{tagged_group, RenderError, TaggedGroup, Value};
///
/// #[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// pub struct Square { side: f64 }
///
/// impl RenderedObject for Square {
///     fn schema_id(&self) -> &'static str { "urn:picdeck:doc.square" }
///     fn serialize(&self, _: &RenderContext<'_>) -> Result<Value, RenderError> {
///         encode(self.schema_id(), self)
///     }
/// }
///
/// tagged_group! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub enum Shape: "urn:picdeck:doc.shape" {
///         "square" => Square(Square),
///     }
/// }
///
/// assert_eq!(Shape::TAGS, &["square"]);
/// assert_eq!(Shape::from(Square { side: 1.0 }).tag(), "square");
/// ```
#[macro_export]
macro_rules! tagged_group {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $schema:literal {
            $( $(#[$vmeta:meta])* $tag:literal => $variant:ident($inner:ty) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant($inner), )+
        }

        impl $crate::group::TaggedGroup for $name {
            const GROUP_SCHEMA_ID: &'static str = $schema;
            const TAGS: &'static [&'static str] = &[$($tag),+];

            fn tag(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => $tag, )+
                }
            }

            fn variant(&self) -> &dyn $crate::render::RenderedObject {
                match self {
                    $( Self::$variant(v) => v, )+
                }
            }
        }

        const _: () = assert!(
            $crate::group::tags_unique(<$name as $crate::group::TaggedGroup>::TAGS),
            concat!("duplicate tag in group ", stringify!($name)),
        );

        impl $crate::render::RenderedObject for $name {
            fn schema_id(&self) -> &'static str {
                $schema
            }

            fn serialize(
                &self,
                ctx: &$crate::render::RenderContext<'_>,
            ) -> Result<$crate::Value, $crate::RenderError> {
                $crate::group::tagged_wrapper(self, ctx)
            }
        }

        $(
            impl From<$inner> for $name {
                fn from(v: $inner) -> Self {
                    Self::$variant(v)
                }
            }
        )+
    };
}
