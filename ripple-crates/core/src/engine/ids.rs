use std::fmt::Display;
use std::fmt::Formatter;

use crate::containers::StorageKey;

macro_rules! define_id {
    ($(#[$documentation:meta])* $name:ident) => {
        $(#[$documentation])*
        #[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn from(value: u32) -> Self {
                $name(value)
            }

            pub fn unpack(self) -> u32 {
                self.0
            }
        }

        impl StorageKey for $name {
            fn index(&self) -> usize {
                self.0 as usize
            }

            fn create_from_index(index: usize) -> Self {
                $name(index as u32)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// A variable which stores its own value in the engine.
    IntVarId
);
define_id!(
    /// A view, which is computed from its parent on every read.
    ViewId
);
define_id!(
    /// An invariant owned by the engine.
    InvariantId
);

/// Identifies an input within a specific invariant, so that a notification can tell the
/// invariant which of its inputs changed. A local id can be thought of as the index of the input
/// in the invariant.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalId(u32);

impl LocalId {
    pub const fn from(value: u32) -> Self {
        LocalId(value)
    }

    pub fn unpack(self) -> u32 {
        self.0
    }
}

impl StorageKey for LocalId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        LocalId::from(index as u32)
    }
}

impl Display for LocalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything an invariant can read: a stored variable or a view.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum VarId {
    Var(IntVarId),
    View(ViewId),
}

impl VarId {
    pub fn as_int_var(self) -> Option<IntVarId> {
        match self {
            VarId::Var(id) => Some(id),
            VarId::View(_) => None,
        }
    }

    pub fn is_view(self) -> bool {
        matches!(self, VarId::View(_))
    }
}

impl From<IntVarId> for VarId {
    fn from(value: IntVarId) -> Self {
        VarId::Var(value)
    }
}

impl From<ViewId> for VarId {
    fn from(value: ViewId) -> Self {
        VarId::View(value)
    }
}

impl Display for VarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VarId::Var(id) => id.fmt(f),
            VarId::View(id) => id.fmt(f),
        }
    }
}
