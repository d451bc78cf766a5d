use super::{ColumnKind, Mapper, ProcedureId, Table, TableId, TypeSerializer};
use crate::{Error, Result, SchemaRule, Violation};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

struct Verify<'a> {
    mapper: &'a Mapper,
    violations: Vec<Violation>,
}

impl Mapper {
    /// Re-runs every structural check on the compiled descriptors.
    pub fn verify(&self) -> Result<()> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::schema_validation(violations))
        }
    }

    pub(super) fn violations(&self) -> Vec<Violation> {
        let mut verify = Verify {
            mapper: self,
            violations: vec![],
        };
        verify.verify();
        verify.violations
    }
}

impl Verify<'_> {
    fn verify(&mut self) {
        let mapper = self.mapper;
        self.verify_schemas_exist();
        self.verify_schema_names_are_unique();
        self.verify_table_paths_are_unique();
        self.verify_types_are_mapped_once();
        self.verify_procedure_paths_are_unique();
        self.verify_serializers_are_unique();

        for (index, table) in mapper.tables().iter().enumerate() {
            self.verify_columns_are_unique(table);
            self.verify_column_parents(index, table);
            self.verify_primary_key(table);
            self.verify_foreign_keys(table);
        }

        self.verify_argument_parents();
        self.verify_inputs_are_not_nullable();
        self.verify_outputs_have_no_defaults();
    }

    fn verify_schemas_exist(&mut self) {
        let mapper = self.mapper;
        if mapper.schemas().is_empty() {
            self.violation(SchemaRule::EmptySchema, "<mapper>", "no schema registered");
        }
    }

    fn verify_schema_names_are_unique(&mut self) {
        let mapper = self.mapper;
        let mut names = HashSet::new();
        for schema in mapper.schemas() {
            if !names.insert(&schema.name) {
                self.violation(
                    SchemaRule::DuplicateSchema,
                    &schema.name,
                    "schema registered more than once",
                );
            }
        }
    }

    fn verify_table_paths_are_unique(&mut self) {
        let mapper = self.mapper;
        let mut paths: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for table in mapper.tables() {
            paths.entry(table.path()).or_default().push(table.ty.name());
        }

        for (path, mut types) in paths {
            if types.len() > 1 {
                types.sort_unstable();
                let message = format!("table registered by {}", quoted(&types));
                self.violation(SchemaRule::DuplicateTable, &path, message);
            }
        }
    }

    fn verify_types_are_mapped_once(&mut self) {
        let mapper = self.mapper;
        let mut mapped: HashMap<_, Vec<&Table>> = HashMap::new();
        for table in mapper.tables() {
            mapped.entry(table.ty).or_default().push(table);
        }

        for (ty, tables) in mapped {
            let schemas: BTreeSet<_> = tables.iter().map(|table| &table.schema).collect();
            if schemas.len() < 2 {
                continue;
            }

            let mut paths: Vec<_> = tables.iter().map(|table| table.path()).collect();
            paths.sort_unstable();
            paths.dedup();

            let message = format!("type `{ty}` is mapped by {}", quoted(&paths));
            self.violation(SchemaRule::DuplicateTable, &paths[0], message);
        }
    }

    fn verify_procedure_paths_are_unique(&mut self) {
        let mapper = self.mapper;
        let mut paths = HashSet::new();
        for procedure in mapper.procedures() {
            let path = procedure.path();
            if !paths.insert(path.clone()) {
                self.violation(
                    SchemaRule::DuplicateProcedure,
                    &path,
                    "procedure registered more than once",
                );
            }
        }
    }

    fn verify_serializers_are_unique(&mut self) {
        let mapper = self.mapper;

        self.verify_serializer_list("<global>", mapper.serializers());
        for schema in mapper.schemas() {
            self.verify_serializer_list(&schema.name, &schema.serializers);
        }
        for table in mapper.tables() {
            self.verify_serializer_list(&table.path(), &table.serializers);
        }
    }

    fn verify_serializer_list(&mut self, path: &str, serializers: &[TypeSerializer]) {
        let mut seen = HashSet::new();
        for serializer in serializers {
            if !seen.insert(serializer.ty) {
                let message = format!("more than one serializer for `{}`", serializer.ty);
                self.violation(SchemaRule::DuplicateSerializer, path, message);
            }
        }
    }

    fn verify_columns_are_unique(&mut self, table: &Table) {
        let mut names = HashSet::new();
        for column in table.columns() {
            if !names.insert(&column.name) {
                let path = format!("{}.{}", table.path(), column.name);
                self.violation(SchemaRule::DuplicateColumn, &path, "column defined twice");
            }
        }
    }

    fn verify_column_parents(&mut self, index: usize, table: &Table) {
        if table.id != TableId(index) {
            self.violation(
                SchemaRule::ColumnParent,
                &table.path(),
                format!("table id {:?} does not match its registry slot", table.id),
            );
        }

        for column in table.columns() {
            if column.table != table.id {
                let path = format!("{}.{}", table.path(), column.name);
                let message = format!(
                    "column belongs to {:?} but is stored in {:?}",
                    column.table, table.id
                );
                self.violation(SchemaRule::ColumnParent, &path, message);
            }
        }
    }

    fn verify_primary_key(&mut self, table: &Table) {
        let column = &table.primary_column;
        let path = format!("{}.{}", table.path(), column.name);

        if !column.is_primary() {
            self.violation(
                SchemaRule::InvalidConstraint,
                &path,
                "primary column is not tagged as a primary key",
            );
        }

        if column.is_auto_increment() && !column.ty.is_integer() {
            let message = format!(
                "AUTO_INC requires an integer primary key, found `{}`",
                column.ty
            );
            self.violation(SchemaRule::AutoIncrementType, &path, message);
        }

        if column.is_auto_uuid() && !column.ty.is_uuid() {
            let message = format!("AUTO_UUID requires a uuid primary key, found `{}`", column.ty);
            self.violation(SchemaRule::AutoUuidType, &path, message);
        }
    }

    fn verify_foreign_keys(&mut self, table: &Table) {
        let mapper = self.mapper;

        for column in &table.foreign_columns {
            let path = format!("{}.{}", table.path(), column.name);

            let ColumnKind::Foreign {
                target, target_ty, ..
            } = &column.kind
            else {
                self.violation(
                    SchemaRule::InvalidConstraint,
                    &path,
                    "foreign column is not tagged as a foreign key",
                );
                continue;
            };

            let Some(target) = target else {
                if mapper.table_by_ty(*target_ty).is_some() {
                    let message = format!("foreign key to `{target_ty}` was never linked");
                    self.violation(SchemaRule::ForeignKeyUnbound, &path, message);
                } else {
                    let message = format!("foreign key points to `{target_ty}`, which no table maps");
                    self.violation(SchemaRule::ForeignKeyTarget, &path, message);
                }
                continue;
            };

            let Some(referenced) = registered_table(mapper, *target) else {
                let message = format!("referenced table {target:?} is not registered");
                self.violation(SchemaRule::ForeignTableUnregistered, &path, message);
                continue;
            };

            if referenced.ty != *target_ty {
                let message = format!(
                    "foreign key points to `{target_ty}` but is linked to `{}`",
                    referenced.path()
                );
                self.violation(SchemaRule::ForeignTableUnregistered, &path, message);
                continue;
            }

            let pk = &referenced.primary_column;
            if pk.ty != column.ty {
                let message = format!(
                    "foreign key type `{}` does not match primary key `{}.{}` of type `{}`",
                    column.ty,
                    referenced.path(),
                    pk.name,
                    pk.ty
                );
                self.violation(SchemaRule::ForeignKeyType, &path, message);
            }
        }
    }

    fn verify_argument_parents(&mut self) {
        let mapper = self.mapper;
        for (index, procedure) in mapper.procedures().iter().enumerate() {
            if procedure.id != ProcedureId(index) {
                let message = format!(
                    "procedure id {:?} does not match its registry slot",
                    procedure.id
                );
                self.violation(SchemaRule::ArgumentParent, &procedure.path(), message);
            }

            for arg in &procedure.args {
                if arg.procedure != procedure.id {
                    let path = format!("{}.{}", procedure.path(), arg.name);
                    let message = format!(
                        "argument belongs to {:?} but is stored in {:?}",
                        arg.procedure, procedure.id
                    );
                    self.violation(SchemaRule::ArgumentParent, &path, message);
                }
            }
        }
    }

    fn verify_inputs_are_not_nullable(&mut self) {
        let mapper = self.mapper;
        for input in mapper.inputs() {
            for property in &input.properties {
                if property.nullable {
                    let path = format!("{}.{}", input.name, property.name);
                    self.violation(
                        SchemaRule::NullableInput,
                        &path,
                        "input properties must not be nullable",
                    );
                }
            }
        }
    }

    fn verify_outputs_have_no_defaults(&mut self) {
        let mapper = self.mapper;
        for output in mapper.outputs() {
            for property in &output.properties {
                if property.defaulted {
                    let path = format!("{}.{}", output.name, property.name);
                    self.violation(
                        SchemaRule::DefaultedOutput,
                        &path,
                        "output properties must not have default values",
                    );
                }
            }
        }
    }

    fn violation(&mut self, rule: SchemaRule, path: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(rule, path, message));
    }
}

/// `` `a`, `b` and `c` ``
fn quoted(items: &[impl AsRef<str>]) -> String {
    let items: Vec<_> = items.iter().map(|item| format!("`{}`", item.as_ref())).collect();
    match items.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
        _ => items.concat(),
    }
}

fn registered_table(mapper: &Mapper, id: TableId) -> Option<&Table> {
    mapper.tables().get(id.0).filter(|table| table.id == id)
}
