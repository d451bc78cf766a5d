use super::Error;

/// A consistency rule checked when the mapper is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaRule {
    /// No schema was registered at all.
    EmptySchema,
    /// Two schemas share a name.
    DuplicateSchema,
    /// Two tables resolve to the same path, or one type is mapped twice.
    DuplicateTable,
    /// Two columns of a table share a name.
    DuplicateColumn,
    /// Two procedures resolve to the same path.
    DuplicateProcedure,
    /// One serializer list holds two entries for the same type.
    DuplicateSerializer,
    /// A constraint is declared twice for the same property.
    DuplicateConstraint,
    /// A foreign key is declared twice for the same property.
    DuplicateForeignKey,
    /// A declaration names a property the model does not have.
    UnknownProperty,
    /// A foreign key is not bound to any table.
    ForeignKeyUnbound,
    /// A foreign key points to a type no table maps.
    ForeignKeyTarget,
    /// A foreign key's type differs from the target's primary key type.
    ForeignKeyType,
    /// `UNIQUE` declared on a primary key.
    RedundantConstraint,
    /// A constraint that does not apply to the column's role.
    InvalidConstraint,
    /// Auto-increment on a non-integer primary key.
    AutoIncrementType,
    /// Auto-uuid on a non-uuid primary key.
    AutoUuidType,
    /// An input property is nullable.
    NullableInput,
    /// An output property carries a default value.
    DefaultedOutput,
    /// A column's parent handle does not point back to its table.
    ColumnParent,
    /// A foreign key's target table is not part of the registry.
    ForeignTableUnregistered,
    /// A procedure argument's parent handle does not point back to its procedure.
    ArgumentParent,
    /// A property type has no registered serializer.
    SerializerMissing,
}

impl SchemaRule {
    pub fn as_str(self) -> &'static str {
        use SchemaRule::*;

        match self {
            EmptySchema => "empty-schema",
            DuplicateSchema => "duplicate-schema",
            DuplicateTable => "duplicate-table",
            DuplicateColumn => "duplicate-column",
            DuplicateProcedure => "duplicate-procedure",
            DuplicateSerializer => "duplicate-serializer",
            DuplicateConstraint => "duplicate-constraint",
            DuplicateForeignKey => "duplicate-foreign-key",
            UnknownProperty => "unknown-property",
            ForeignKeyUnbound => "foreign-key-unbound",
            ForeignKeyTarget => "foreign-key-target",
            ForeignKeyType => "foreign-key-type",
            RedundantConstraint => "redundant-constraint",
            InvalidConstraint => "invalid-constraint",
            AutoIncrementType => "auto-increment-type",
            AutoUuidType => "auto-uuid-type",
            NullableInput => "nullable-input",
            DefaultedOutput => "defaulted-output",
            ColumnParent => "column-parent",
            ForeignTableUnregistered => "foreign-table-unregistered",
            ArgumentParent => "argument-parent",
            SerializerMissing => "serializer-missing",
        }
    }
}

impl core::fmt::Display for SchemaRule {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single broken rule, located by the path of the offending element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Violation {
    pub rule: SchemaRule,
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(rule: SchemaRule, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl core::fmt::Display for Violation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "[{}] {}: {}", self.rule, self.path, self.message)
    }
}

/// Error raised once by the mapper's validation pass, listing every violation found.
#[derive(Debug)]
pub(super) struct SchemaValidationError {
    violations: Box<[Violation]>,
}

impl std::error::Error for SchemaValidationError {}

impl core::fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema ({} violation", self.violations.len())?;
        if self.violations.len() != 1 {
            f.write_str("s")?;
        }
        f.write_str(")")?;

        for violation in self.violations.iter() {
            write!(f, "; {violation}")?;
        }

        Ok(())
    }
}

impl Error {
    /// Creates a schema validation error.
    ///
    /// Violations are sorted so the same broken registry always yields the same error
    /// regardless of registration order.
    pub fn schema_validation(violations: impl IntoIterator<Item = Violation>) -> Error {
        let mut violations: Vec<_> = violations.into_iter().collect();
        violations.sort();
        violations.dedup();

        Error::from(super::ErrorKind::SchemaValidation(SchemaValidationError {
            violations: violations.into_boxed_slice(),
        }))
    }

    /// Returns `true` if this error is a schema validation error.
    pub fn is_schema_validation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::SchemaValidation(_))
    }

    /// Returns the violations carried by a schema validation error.
    pub fn violations(&self) -> &[Violation] {
        match self.kind() {
            super::ErrorKind::SchemaValidation(err) => &err.violations,
            _ => &[],
        }
    }
}
