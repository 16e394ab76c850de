use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0004_seed_reference_data")
        .depends_on(&["0001_initial_schema"])
        .operation(RunSql::new(
            r#"INSERT INTO regulation_types (code, name) VALUES
    ('UU', 'Undang-Undang'),
    ('PP', 'Peraturan Pemerintah'),
    ('PERPRES', 'Peraturan Presiden'),
    ('PERMEN', 'Peraturan Menteri'),
    ('PERDA', 'Peraturan Daerah'),
    ('TAP_MPR', 'Ketetapan MPR'),
    ('KEPPRES', 'Keputusan Presiden'),
    ('INPRES', 'Instruksi Presiden'),
    ('PENPRES', 'Penetapan Presiden'),
    ('UUDRT', 'Undang-Undang Darurat'),
    ('PERPPU', 'Peraturan Pemerintah Pengganti Undang-Undang'),
    ('PERBAN', 'Peraturan Badan'),
    ('UUD', 'Undang-Undang Dasar')
ON CONFLICT (code) DO NOTHING"#,
        ))
        .operation(RunSql::new(
            r#"INSERT INTO relationship_types (code, inverse_code) VALUES
    ('amends', 'amended_by'),
    ('amended_by', 'amends'),
    ('revokes', 'revoked_by'),
    ('revoked_by', 'revokes')
ON CONFLICT (code) DO NOTHING"#,
        ))
}
