use std::any::TypeId;
use std::fmt;

/// Identifies a Rust type inside the registry.
///
/// Equality and hashing only look at the [`TypeId`]; the name is kept for
/// diagnostics and generated SQL.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped, `Vec<u8>` rather than
    /// `alloc::vec::Vec<u8>`.
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut segment = String::new();

        for c in self.name.chars() {
            match c {
                '<' | '>' | ',' | ' ' | '[' | ']' | ';' | '&' | '(' | ')' => {
                    out.push_str(last_segment(&segment));
                    segment.clear();
                    out.push(c);
                }
                c => segment.push(c),
            }
        }
        out.push_str(last_segment(&segment));
        out
    }

    /// Whether values of this type can be produced by an auto-increment column.
    pub fn is_integer(&self) -> bool {
        self.id == TypeId::of::<i16>()
            || self.id == TypeId::of::<i32>()
            || self.id == TypeId::of::<i64>()
    }

    pub fn is_uuid(&self) -> bool {
        self.id == TypeId::of::<uuid::Uuid>()
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TypeKey({})", self.short_name())
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(&self.short_name())
    }
}
