mod m0001_initial;
mod m0002_indexes;
mod m0003_unique_constraints;
mod m0004_seed_reference_data;

use cetane::prelude::MigrationRegistry;

pub fn registry() -> MigrationRegistry {
    let mut reg = MigrationRegistry::new();
    reg.register(m0001_initial::migration());
    reg.register(m0002_indexes::migration());
    reg.register(m0003_unique_constraints::migration());
    reg.register(m0004_seed_reference_data::migration());
    reg
}

#[cfg(test)]
mod tests {
    use super::*;
    use cetane::backend::Postgres;

    #[test]
    fn registry_resolves_a_dependency_order() {
        let reg = registry();
        let ordered = reg.resolve_order().expect("migration order should resolve");
        assert_eq!(ordered.len(), 4);
        assert_eq!(ordered[0], "0001_initial_schema");
    }

    #[test]
    fn every_migration_generates_postgres_sql() {
        let reg = registry();
        let backend = Postgres;
        for name in reg.resolve_order().expect("migration order should resolve") {
            let migration = reg.get(name).expect("migration present after resolve");
            let statements = migration.forward_sql(&backend);
            assert!(!statements.is_empty(), "{name} produced no SQL for Postgres");
            for stmt in &statements {
                assert!(!stmt.contains("AUTOINCREMENT"), "{name} emitted SQLite AUTOINCREMENT for Postgres");
            }
        }
    }
}
