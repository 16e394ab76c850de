use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0001_initial_schema")
        .operation(RunSql::new(
            r#"CREATE TABLE regulation_types (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL
)"#,
        ))
        .operation(RunSql::new(
            r#"CREATE TABLE works (
    id SERIAL PRIMARY KEY,
    frbr_uri TEXT NOT NULL,
    title TEXT NOT NULL,
    regulation_type TEXT NOT NULL REFERENCES regulation_types(code),
    number TEXT NOT NULL,
    year INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'in_force',
    source_page_url TEXT,
    pdf_url TEXT,
    slug TEXT,
    pdf_quality TEXT,
    parse_method TEXT,
    parse_confidence DOUBLE PRECISION,
    parse_warnings TEXT,
    pemrakarsa TEXT,
    tempat_penetapan TEXT,
    tanggal_penetapan TEXT,
    pejabat_penetap TEXT,
    nomor_pengundangan TEXT,
    nomor_tambahan TEXT,
    tanggal_pengundangan TEXT,
    pejabat_pengundangan TEXT,
    tentang TEXT,
    parsed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)"#,
        ))
        .operation(RunSql::new(
            r#"CREATE TABLE document_nodes (
    id SERIAL PRIMARY KEY,
    work_id INTEGER NOT NULL REFERENCES works(id) ON DELETE CASCADE,
    node_type TEXT NOT NULL,
    number TEXT NOT NULL,
    heading TEXT,
    content TEXT NOT NULL,
    parent_id INTEGER REFERENCES document_nodes(id) ON DELETE CASCADE,
    path TEXT NOT NULL,
    depth INTEGER NOT NULL,
    sort_order INTEGER NOT NULL
)"#,
        ))
        .operation(RunSql::new(
            r#"CREATE TABLE legal_chunks (
    id SERIAL PRIMARY KEY,
    work_id INTEGER NOT NULL REFERENCES works(id) ON DELETE CASCADE,
    node_id INTEGER REFERENCES document_nodes(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    metadata TEXT NOT NULL DEFAULT '{}'
)"#,
        ))
        .operation(RunSql::new(
            r#"CREATE TABLE scraper_runs (
    id SERIAL PRIMARY KEY,
    source_id TEXT NOT NULL,
    jobs_discovered INTEGER NOT NULL DEFAULT 0,
    jobs_processed INTEGER NOT NULL DEFAULT 0,
    jobs_succeeded INTEGER NOT NULL DEFAULT 0,
    jobs_failed INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'running',
    error_message TEXT,
    started_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    completed_at TIMESTAMPTZ
)"#,
        ))
        .operation(RunSql::new(
            r#"CREATE TABLE crawl_jobs (
    id SERIAL PRIMARY KEY,
    source_id TEXT NOT NULL,
    url TEXT NOT NULL,
    pdf_url TEXT,
    regulation_type TEXT,
    number TEXT,
    year INTEGER,
    frbr_uri TEXT,
    title TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    error_message TEXT,
    pdf_sha256 TEXT,
    pdf_size INTEGER,
    pdf_local_path TEXT,
    pdf_storage_url TEXT,
    work_id INTEGER REFERENCES works(id),
    extraction_version INTEGER NOT NULL DEFAULT 0,
    run_id INTEGER REFERENCES scraper_runs(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    last_crawled_at TIMESTAMPTZ,
    pdf_downloaded_at TIMESTAMPTZ
)"#,
        ))
        .operation(RunSql::new(
            r#"CREATE TABLE discovery_progress (
    source_id TEXT NOT NULL,
    regulation_type TEXT NOT NULL,
    total_seen INTEGER NOT NULL DEFAULT 0,
    pages_crawled INTEGER NOT NULL DEFAULT 0,
    total_pages INTEGER NOT NULL DEFAULT 0,
    last_discovered_at TIMESTAMPTZ,
    PRIMARY KEY (source_id, regulation_type)
)"#,
        ))
        .operation(RunSql::new(
            r#"CREATE TABLE relationship_types (
    code TEXT PRIMARY KEY,
    inverse_code TEXT REFERENCES relationship_types(code)
)"#,
        ))
        .operation(RunSql::new(
            r#"CREATE TABLE work_relationships (
    id SERIAL PRIMARY KEY,
    source_work_id INTEGER NOT NULL REFERENCES works(id) ON DELETE CASCADE,
    target_work_id INTEGER NOT NULL REFERENCES works(id) ON DELETE CASCADE,
    relationship_type TEXT NOT NULL REFERENCES relationship_types(code)
)"#,
        ))
}
