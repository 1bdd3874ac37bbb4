// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene tree: object identifiers, kinds, flags and errors.

use atlas_strand::Kind;

/// Identifier for an object in the [`World`](crate::World).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// - On creation a fresh slot starts at generation `1`.
/// - On removal the slot is freed and every `ObjectId` pointing at it is stale.
/// - On reuse the generation is incremented, producing a distinct `ObjectId`.
///
/// Stale ids never alias a different live object; use
/// [`World::is_alive`](crate::World::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32, pub(crate) u32);

impl ObjectId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index, stable for the lifetime of the object.
    ///
    /// This is also the object's record index in [`World::geometry`](crate::World::geometry).
    #[must_use]
    pub const fn slot(self) -> usize {
        self.idx()
    }

    /// Generation of the slot when this id was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

/// What an object represents.
///
/// Only [`World`](ObjectKind::World), [`Group`](ObjectKind::Group) and
/// [`Composite`](ObjectKind::Composite) hold children.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    /// The root of a world. There is exactly one per [`World`](crate::World).
    World,
    /// Plain positioned container.
    Group,
    /// Container whose children are alternative renditions of one image
    /// (thumbnail plus tiled levels).
    Composite,
    /// A single, non-tiled image.
    Image,
    /// A deep-zoom image streamed in tiles.
    TiledImage,
    /// A filled or outlined rectangle.
    Box,
    /// A block of text.
    Text,
}

impl ObjectKind {
    /// Returns `true` if objects of this kind may have children.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::World | Self::Group | Self::Composite)
    }

    /// Strand tag recorded for this kind by
    /// [`World::world_strand`](crate::World::world_strand).
    #[must_use]
    pub const fn tag(self) -> Kind {
        Kind(match self {
            Self::World => 2,
            Self::Group => 3,
            Self::Composite => 4,
            Self::Image => 5,
            Self::TiledImage => 6,
            Self::Box => 7,
            Self::Text => 8,
        })
    }

    /// Inverse of [`ObjectKind::tag`].
    #[must_use]
    pub const fn from_tag(tag: Kind) -> Option<Self> {
        Some(match tag.0 {
            2 => Self::World,
            3 => Self::Group,
            4 => Self::Composite,
            5 => Self::Image,
            6 => Self::TiledImage,
            7 => Self::Box,
            8 => Self::Text,
            _ => return None,
        })
    }
}

bitflags::bitflags! {
    /// Object flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u8 {
        /// Participates in painting, bounds and hit testing.
        const VISIBLE     = 0b0000_0001;
        /// May be the target of input events.
        const INTERACTIVE = 0b0000_0010;
    }
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::INTERACTIVE
    }
}

bitflags::bitflags! {
    /// Event kinds an object listens for.
    ///
    /// An object is a hit-test candidate for an event kind only when it is
    /// [`INTERACTIVE`](ObjectFlags::INTERACTIVE) and its mask intersects the
    /// kind's bit. Listener registries keep this mask in sync.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventMask: u32 {
        /// Pointer press.
        const POINTER_DOWN = 1 << 0;
        /// Pointer release.
        const POINTER_UP   = 1 << 1;
        /// Pointer motion.
        const POINTER_MOVE = 1 << 2;
        /// Press and release on the same object.
        const CLICK        = 1 << 3;
        /// Wheel or trackpad scroll.
        const WHEEL        = 1 << 4;
        /// Drag start, drag and drag end.
        const DRAG         = 1 << 5;
        /// Pointer enter and leave.
        const HOVER        = 1 << 6;
    }
}

/// Errors returned by structural [`World`](crate::World) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The id is stale or was never issued by this world.
    #[error("unknown object {0:?}")]
    UnknownObject(ObjectId),
    /// The object cannot hold children.
    #[error("object {0:?} cannot hold children")]
    NotAContainer(ObjectId),
    /// Appending would make an object its own ancestor.
    #[error("appending {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Intended parent.
        parent: ObjectId,
        /// Object being appended.
        child: ObjectId,
    },
    /// The world root cannot be re-parented or removed.
    #[error("the world root cannot be moved")]
    RootImmovable,
}
