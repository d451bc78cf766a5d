use super::{
    serializer, Arg, Column, ColumnKind, Mapper, Model, ModelDescriptor, Procedure, ProcedureId,
    Schema, SchemaDef, Table, TableDef, TableId, TypeKey, TypeSerializer, C,
};
use crate::{
    driver::{Bind, Row},
    stmt::{Value, WireType},
    Error, Result, SchemaRule, Violation,
};
use std::collections::{HashMap, HashSet};

/// Collects schema definitions and compiles them into a [`Mapper`].
#[derive(Debug, Default)]
pub struct Builder {
    serializers: Vec<TypeSerializer>,
    schemas: Vec<SchemaDef>,
    procedures: Vec<ModelDescriptor>,
    inputs: Vec<ModelDescriptor>,
    outputs: Vec<ModelDescriptor>,
}

/// Used to track state during the build process
struct BuildMapper<'a> {
    builder: &'a Builder,
    schemas: Vec<Schema>,
    tables: Vec<Table>,
    procedures: Vec<Procedure>,
    violations: Vec<Violation>,

    /// First unresolved serializer, kept as the cause of the validation error.
    missing: Option<(String, String)>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Global serializers, consulted after table and schema overrides.
    pub fn serializers(&mut self, serializers: impl IntoIterator<Item = TypeSerializer>) -> &mut Self {
        self.serializers.extend(serializers);
        self
    }

    pub fn schema(&mut self, schema: SchemaDef) -> &mut Self {
        self.schemas.push(schema);
        self
    }

    /// Registers a procedure that lives outside any schema.
    pub fn procedure<P: Model>(&mut self) -> &mut Self {
        self.procedures.push(P::describe());
        self
    }

    /// Registers a type used to carry custom query parameters.
    pub fn input<T: Model>(&mut self) -> &mut Self {
        self.inputs.push(T::describe());
        self
    }

    /// Registers a type custom queries decode rows into.
    pub fn output<T: Model>(&mut self) -> &mut Self {
        self.outputs.push(T::describe());
        self
    }

    /// Runs the compile pass. Either every rule holds and the mapper is returned, or
    /// a single error lists every violation found.
    pub fn build(&self) -> Result<Mapper> {
        let mut build = BuildMapper {
            builder: self,
            schemas: vec![],
            tables: vec![],
            procedures: vec![],
            violations: vec![],
            missing: None,
        };

        for def in &self.schemas {
            build.build_schema(def);
        }

        for descriptor in &self.procedures {
            build.build_procedure(None, descriptor);
        }

        build.link_foreign_keys();
        build.resolve_shapes(&self.inputs, "input");
        build.resolve_shapes(&self.outputs, "output");

        let BuildMapper {
            schemas,
            tables,
            procedures,
            mut violations,
            missing,
            ..
        } = build;

        let mapper = Mapper::new(
            schemas,
            tables,
            procedures,
            self.serializers.clone(),
            self.inputs.clone(),
            self.outputs.clone(),
        );

        violations.extend(mapper.violations());

        if violations.is_empty() {
            log::debug!(
                "compiled mapper; schemas={} tables={} procedures={}",
                mapper.schemas().len(),
                mapper.tables().len(),
                mapper.procedures().len()
            );
            return Ok(mapper);
        }

        let err = Error::schema_validation(violations);
        match missing {
            Some((owner, ty)) => Err(Error::serializer_missing(owner, ty).context(err)),
            None => Err(err),
        }
    }
}

impl BuildMapper<'_> {
    fn build_schema(&mut self, def: &SchemaDef) {
        let schema_index = self.schemas.len();
        self.schemas.push(Schema {
            name: def.name.clone(),
            tables: vec![],
            procedures: vec![],
            serializers: def.serializers.clone(),
        });

        for table in &def.tables {
            if let Some(id) = self.build_table(def, table) {
                self.schemas[schema_index].tables.push(id);
            }
        }

        for descriptor in &def.procedures {
            let id = self.build_procedure(Some(def), descriptor);
            self.schemas[schema_index].procedures.push(id);
        }
    }

    fn build_table(&mut self, schema: &SchemaDef, def: &TableDef) -> Option<TableId> {
        let descriptor = &def.descriptor;
        let path = format!("{}.{}", schema.name, descriptor.name);

        let Some(primary) = descriptor.property(&def.primary_key) else {
            self.violation(
                SchemaRule::UnknownProperty,
                &path,
                format!(
                    "primary key `{}` is not a property of `{}`",
                    def.primary_key, descriptor.name
                ),
            );
            return None;
        };

        let foreign_keys = self.collect_foreign_keys(&path, descriptor, def);
        let constraints = self.collect_constraints(&path, descriptor, def);

        let id = TableId(self.tables.len());
        let builder = self.builder;
        let scopes = [
            &def.serializers[..],
            &schema.serializers[..],
            &builder.serializers[..],
        ];
        let no_constraints = HashSet::new();

        let mut primary_column = None;
        let mut foreign_columns = vec![];
        let mut other_columns = vec![];

        for property in &descriptor.properties {
            let column_path = format!("{path}.{}", property.name);
            let serializer = self.resolve(&scopes, &column_path, property.ty);
            let tags = constraints.get(property.name).unwrap_or(&no_constraints);

            if property.name == primary.name {
                self.check_primary_tags(&column_path, tags);
                let kind = ColumnKind::Primary {
                    auto_increment: tags.contains(&C::AutoInc),
                    auto_uuid: tags.contains(&C::AutoUuid),
                };
                primary_column = Some(Column::new(id, property, &serializer, kind));
            } else if let Some(target_ty) = foreign_keys.get(property.name) {
                self.check_tags(&column_path, tags, &[C::AutoInc, C::AutoUuid], "foreign key");
                let kind = ColumnKind::Foreign {
                    target: None,
                    target_ty: *target_ty,
                    cascade_delete: tags.contains(&C::CascadeDelete),
                    cascade_update: tags.contains(&C::CascadeUpdate),
                };
                let mut column = Column::new(id, property, &serializer, kind);
                column.unique = tags.contains(&C::Unique);
                foreign_columns.push(column);
            } else {
                self.check_tags(
                    &column_path,
                    tags,
                    &[C::AutoInc, C::AutoUuid, C::CascadeDelete, C::CascadeUpdate],
                    "plain column",
                );
                let mut column = Column::new(id, property, &serializer, ColumnKind::Other);
                column.unique = tags.contains(&C::Unique);
                other_columns.push(column);
            }
        }

        self.tables.push(Table {
            id,
            schema: schema.name.clone(),
            name: descriptor.name.to_string(),
            ty: descriptor.ty,
            descriptor: descriptor.clone(),
            primary_column: primary_column?,
            foreign_columns,
            other_columns,
            serializers: def.serializers.clone(),
        });

        Some(id)
    }

    fn collect_foreign_keys(
        &mut self,
        path: &str,
        descriptor: &ModelDescriptor,
        def: &TableDef,
    ) -> HashMap<&'static str, TypeKey> {
        let mut foreign_keys = HashMap::new();

        for (name, target) in &def.foreign_keys {
            let column_path = format!("{path}.{name}");

            let Some(property) = descriptor.property(name) else {
                self.violation(
                    SchemaRule::UnknownProperty,
                    &column_path,
                    format!("foreign key `{name}` is not a property of `{}`", descriptor.name),
                );
                continue;
            };

            if *name == def.primary_key {
                self.violation(
                    SchemaRule::InvalidConstraint,
                    &column_path,
                    "a primary key cannot also be a foreign key",
                );
                continue;
            }

            if foreign_keys.insert(property.name, *target).is_some() {
                self.violation(
                    SchemaRule::DuplicateForeignKey,
                    &column_path,
                    "foreign key declared more than once",
                );
            }
        }

        foreign_keys
    }

    fn collect_constraints(
        &mut self,
        path: &str,
        descriptor: &ModelDescriptor,
        def: &TableDef,
    ) -> HashMap<&'static str, HashSet<C>> {
        let mut constraints: HashMap<&'static str, HashSet<C>> = HashMap::new();

        for (name, tags) in &def.constraints {
            let column_path = format!("{path}.{name}");

            let Some(property) = descriptor.property(name) else {
                self.violation(
                    SchemaRule::UnknownProperty,
                    &column_path,
                    format!("constraint target `{name}` is not a property of `{}`", descriptor.name),
                );
                continue;
            };

            let entry = constraints.entry(property.name).or_default();
            for tag in tags {
                if !entry.insert(*tag) {
                    self.violation(
                        SchemaRule::DuplicateConstraint,
                        &column_path,
                        format!("constraint {tag} declared more than once"),
                    );
                }
            }
        }

        constraints
    }

    fn check_primary_tags(&mut self, path: &str, tags: &HashSet<C>) {
        if tags.contains(&C::Unique) {
            self.violation(
                SchemaRule::RedundantConstraint,
                path,
                "primary key is already unique",
            );
        }

        if tags.contains(&C::AutoInc) && tags.contains(&C::AutoUuid) {
            self.violation(
                SchemaRule::InvalidConstraint,
                path,
                "primary key cannot be both AUTO_INC and AUTO_UUID",
            );
        }

        self.check_tags(
            path,
            tags,
            &[C::CascadeDelete, C::CascadeUpdate],
            "primary key",
        );
    }

    fn check_tags(&mut self, path: &str, tags: &HashSet<C>, forbidden: &[C], role: &str) {
        for tag in forbidden {
            if tags.contains(tag) {
                self.violation(
                    SchemaRule::InvalidConstraint,
                    path,
                    format!("constraint {tag} is not allowed on a {role}"),
                );
            }
        }
    }

    fn build_procedure(
        &mut self,
        schema: Option<&SchemaDef>,
        descriptor: &ModelDescriptor,
    ) -> ProcedureId {
        let id = ProcedureId(self.procedures.len());
        let path = match schema {
            Some(schema) => format!("{}.{}", schema.name, descriptor.name),
            None => descriptor.name.to_string(),
        };

        let builder = self.builder;
        let empty: &[TypeSerializer] = &[];
        let scopes = [
            schema.map(|schema| &schema.serializers[..]).unwrap_or(empty),
            &builder.serializers[..],
        ];

        let args = descriptor
            .properties
            .iter()
            .map(|property| {
                let serializer =
                    self.resolve(&scopes, &format!("{path}.{}", property.name), property.ty);
                Arg::new(id, property, &serializer)
            })
            .collect();

        self.procedures.push(Procedure {
            id,
            schema: schema.map(|schema| schema.name.clone()),
            name: descriptor.name.to_string(),
            ty: descriptor.ty,
            args,
        });

        id
    }

    /// Points every foreign column at the table mapping its target type, preferring
    /// tables in the column's own schema.
    fn link_foreign_keys(&mut self) {
        let mut lookup: HashMap<TypeKey, Vec<(String, TableId)>> = HashMap::new();
        for table in &self.tables {
            lookup
                .entry(table.ty)
                .or_default()
                .push((table.schema.clone(), table.id));
        }

        for table in &mut self.tables {
            for column in &mut table.foreign_columns {
                let ColumnKind::Foreign {
                    target, target_ty, ..
                } = &mut column.kind
                else {
                    continue;
                };

                let Some(candidates) = lookup.get(&*target_ty) else {
                    continue;
                };

                *target = candidates
                    .iter()
                    .find(|(schema, _)| *schema == table.schema)
                    .or_else(|| candidates.first())
                    .map(|(_, id)| *id);
            }
        }
    }

    /// Input and output types resolve their serializers against the global list.
    fn resolve_shapes(&mut self, shapes: &[ModelDescriptor], role: &str) {
        let builder = self.builder;
        let scopes = [&builder.serializers[..]];
        for shape in shapes {
            for property in &shape.properties {
                let owner = format!("{role} {}.{}", shape.name, property.name);
                self.resolve(&scopes, &owner, property.ty);
            }
        }
    }

    fn resolve(&mut self, scopes: &[&[TypeSerializer]], owner: &str, ty: TypeKey) -> TypeSerializer {
        match serializer::resolve(scopes, owner, ty) {
            Ok(serializer) => serializer.clone(),
            Err(_) => {
                self.violation(
                    SchemaRule::SerializerMissing,
                    owner,
                    format!("no serializer registered for `{}`", ty.short_name()),
                );

                let candidate = (owner.to_string(), ty.short_name());
                if self.missing.as_ref().map_or(true, |first| candidate < *first) {
                    self.missing = Some(candidate);
                }

                unresolved(ty)
            }
        }
    }

    fn violation(&mut self, rule: SchemaRule, path: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(rule, path, message));
    }
}

/// Stand-in for a serializer that could not be resolved. The build fails before it
/// can ever be called.
fn unresolved(ty: TypeKey) -> TypeSerializer {
    TypeSerializer {
        ty,
        wire_type: WireType::Blob,
        db_type: String::new(),
        encoder: encode_unresolved,
        decoder: decode_unresolved,
    }
}

fn encode_unresolved(_: &mut dyn Bind, _: usize, _: &Value) -> Result<()> {
    Err(Error::serializer_missing("unresolved column", "unknown"))
}

fn decode_unresolved(_: &dyn Row, _: usize) -> Result<Value> {
    Err(Error::serializer_missing("unresolved column", "unknown"))
}
