//! Models shared by the end-to-end scenarios.

use relmap::{model, serializers, Db, Mapper, Result, SchemaDef, TableDef, C};
use uuid::Uuid;

model! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Parent {
        pub pk: Option<i32>,
        pub value: String,
    }
}

impl Parent {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            pk: None,
            value: value.into(),
        }
    }
}

model! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Child {
        pub pk: Option<i64>,
        pub parent: i32,
        pub note: Option<String>,
    }
}

model! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Token {
        pub pk: Option<Uuid>,
        pub label: String,
    }
}

model! {
    /// Keyed by the caller rather than the database.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Setting {
        pub name: String,
        pub enabled: bool,
        pub weight: f64,
    }
}

model! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Summary {
        pub parent: i32,
        pub children: i64,
    }
}

model! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct ByValue {
        pub value: String,
    }
}

model! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct AddParent {
        pub value: String,
    }
}

pub fn mapper() -> Mapper {
    let mut builder = Mapper::builder();
    builder
        .serializers(serializers::basic())
        .schema(
            SchemaDef::new("main")
                .table(TableDef::new::<Parent>("pk").constraint("pk", [C::AutoInc]))
                .table(
                    TableDef::new::<Child>("pk")
                        .constraint("pk", [C::AutoInc])
                        .foreign_key::<Parent>("parent")
                        .constraint("parent", [C::CascadeDelete]),
                )
                .table(
                    TableDef::new::<Token>("pk")
                        .constraint("pk", [C::AutoUuid])
                        .constraint("label", [C::Unique]),
                )
                .table(TableDef::new::<Setting>("name"))
                .procedure::<AddParent>(),
        )
        .input::<ByValue>()
        .output::<Summary>();
    builder.build().expect("invalid mapping")
}

/// Creates every table, parents before the tables referencing them.
pub fn create_all(db: &mut Db<'_>) -> Result<()> {
    db.table().create::<Parent>()?;
    db.table().create::<Child>()?;
    db.table().create::<Token>()?;
    db.table().create::<Setting>()?;
    Ok(())
}
