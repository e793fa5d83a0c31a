#[cfg(test)]
pub mod test {
    use crate::schema::{FieldDef, FieldType, Schema};
    use crate::value::Value;

    /// Two-field record: a plain string and a documented integer.
    pub fn small_schema() -> Schema {
        Schema::new(
            "SmallConfig",
            vec![
                FieldDef::new("name", FieldType::Str, Value::Str("Joe".into())),
                FieldDef::new("age", FieldType::Int, Value::Int(-1))
                    .doc("Pass -1 if you don't want to tell"),
            ],
        )
        .doc("A small config")
    }

    /// A record exercising lists and tuples.
    pub fn list_schema() -> Schema {
        Schema::new(
            "ConfigWithList",
            vec![
                FieldDef::new(
                    "names",
                    FieldType::List(Box::new(FieldType::Str)),
                    Value::List(vec![]),
                ),
                FieldDef::new(
                    "rect",
                    FieldType::Tuple(vec![FieldType::Int, FieldType::Int]),
                    Value::Tuple(vec![Value::Int(3), Value::Int(4)]),
                ),
            ],
        )
        .doc("With lists")
    }

    /// Nested records, one of them with a field-level doc.
    pub fn nested_schema() -> Schema {
        Schema::new(
            "RecursiveConfig",
            vec![
                FieldDef::record("small", small_schema()),
                FieldDef::record("lists", list_schema()).doc("Annot for a sub-config"),
            ],
        )
        .doc("Recursivity!")
    }

    #[test]
    fn fixtures_are_valid_schemas() {
        small_schema().validate().unwrap();
        list_schema().validate().unwrap();
        nested_schema().validate().unwrap();
    }
}
