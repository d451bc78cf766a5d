use super::Serializer;

use std::fmt::Write;

impl Serializer<'_> {
    /// PlantUML class diagram of every schema: one class per table listing its
    /// primary and foreign keys, and one edge per foreign key.
    pub fn plant_uml(&self) -> String {
        let mapper = self.mapper;
        let mut lines = vec![
            "@startuml".to_string(),
            "skinparam backgroundColor darkgray".to_string(),
            "skinparam ClassBackgroundColor lightgray".to_string(),
        ];
        let mut edges = vec![];

        for schema in mapper.schemas() {
            lines.push(String::new());
            lines.push(format!("package {} <<Folder>> {{", schema.name));

            for id in &schema.tables {
                let table = mapper.table_by_id(*id);
                let pk = &table.primary_column;

                lines.push(format!("\t class {} {{", table.path()));
                lines.push(format!("\t\t {}: {}", pk.name, pk.ty));

                for column in &table.foreign_columns {
                    let Some(target) = column.foreign_table().map(|id| mapper.table_by_id(id))
                    else {
                        continue;
                    };
                    lines.push(format!("\t\t {}: {}", column.name, target.name));
                    edges.push(format!(
                        "{} -down-> {}: {}",
                        table.path(),
                        target.path(),
                        column.name
                    ));
                }

                lines.push("\t }".to_string());
            }

            lines.push("}".to_string());
        }

        let mut out = lines.join("\n");
        out.push_str("\n\n");
        for edge in edges {
            let _ = writeln!(out, "{edge}");
        }
        out.push_str("\n@enduml");
        out
    }
}
